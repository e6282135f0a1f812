//! Focus / short-break / long-break cycling over the countdown engine.
//!
//! Durations are snapshotted from an explicitly passed `Settings` when an
//! interval starts; a settings change arriving mid-interval is queued and
//! applied at the next transition, so a running interval keeps the contract
//! it started with.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::session::DraftFocusSession;
use crate::settings::Settings;

use super::countdown::{Countdown, CountdownStatus};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    Focus,
    ShortBreak,
    LongBreak,
}

/// Mode changes and timer completions are related but distinct: a reset
/// changes mode without completing anything, and a completion always comes
/// with the transition it caused.
#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    ModeChanged {
        from: SessionMode,
        to: SessionMode,
    },
    TimerCompleted {
        mode: SessionMode,
    },
    /// A focus interval ran to completion; the draft awaits its check-in.
    FocusCompleted {
        draft: DraftFocusSession,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct MachineSnapshot {
    pub mode: SessionMode,
    pub status: CountdownStatus,
    pub seconds_remaining: u64,
    pub completed_focus_count: u32,
    pub session_label: String,
    pub session_note: String,
}

#[derive(Debug)]
pub struct PomodoroMachine {
    user_id: String,
    mode: SessionMode,
    completed_focus_count: u32,
    countdown: Countdown,
    settings: Settings,
    queued_settings: Option<Settings>,
    session_label: String,
    session_note: String,
}

impl PomodoroMachine {
    pub fn new(user_id: String, settings: Settings) -> Self {
        let countdown = Countdown::new(settings.pomodoro_duration);
        Self {
            user_id,
            mode: SessionMode::Focus,
            completed_focus_count: 0,
            countdown,
            settings,
            queued_settings: None,
            session_label: String::new(),
            session_note: String::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            mode: self.mode,
            status: self.countdown.status(),
            seconds_remaining: self.countdown.seconds_remaining(),
            completed_focus_count: self.completed_focus_count,
            session_label: self.session_label.clone(),
            session_note: self.session_note.clone(),
        }
    }

    pub fn start(&mut self) {
        self.countdown.start();
    }

    pub fn pause(&mut self) {
        self.countdown.pause();
    }

    /// User-initiated abort: back to Focus, count untouched, label/note
    /// discarded, no completion fired. An aborted interval never counts as
    /// completed.
    pub fn reset(&mut self) -> Vec<MachineEvent> {
        let mut events = Vec::new();
        if self.mode != SessionMode::Focus {
            events.push(MachineEvent::ModeChanged {
                from: self.mode,
                to: SessionMode::Focus,
            });
        }
        self.mode = SessionMode::Focus;
        self.session_label.clear();
        self.session_note.clear();
        self.apply_queued_settings();
        // Not running after a reset, so this cannot fail.
        let _ = self.countdown.set_duration(self.settings.pomodoro_duration);
        events
    }

    /// Label/note for the focus interval in progress; carried into the draft
    /// when the interval completes.
    pub fn set_session_info(&mut self, label: String, note: String) {
        self.session_label = label;
        self.session_note = note;
    }

    /// New settings take effect immediately when nothing is running,
    /// otherwise at the next transition.
    pub fn update_settings(&mut self, settings: Settings) {
        if self.countdown.is_running() {
            self.queued_settings = Some(settings);
        } else {
            self.settings = settings;
            let _ = self.countdown.set_duration(self.duration_for(self.mode));
        }
    }

    /// Advances one simulated second and returns the events it produced.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<MachineEvent> {
        if !self.countdown.tick() {
            return Vec::new();
        }

        let finished_mode = self.mode;
        let mut events = vec![MachineEvent::TimerCompleted {
            mode: finished_mode,
        }];

        self.apply_queued_settings();

        match finished_mode {
            SessionMode::Focus => {
                self.completed_focus_count += 1;
                let next = if self.completed_focus_count % self.settings.pomodoros_until_long_break
                    == 0
                {
                    SessionMode::LongBreak
                } else {
                    SessionMode::ShortBreak
                };
                events.push(MachineEvent::FocusCompleted {
                    draft: DraftFocusSession {
                        user_id: self.user_id.clone(),
                        label: self.session_label.clone(),
                        note: self.session_note.clone(),
                        duration_minutes: self.settings.pomodoro_duration as i64,
                        break_minutes: self.duration_for(next) as i64,
                        completed_at: now,
                    },
                });
                self.transition_to(next, &mut events);
            }
            SessionMode::ShortBreak | SessionMode::LongBreak => {
                self.session_label.clear();
                self.session_note.clear();
                self.transition_to(SessionMode::Focus, &mut events);
            }
        }

        events
    }

    fn transition_to(&mut self, next: SessionMode, events: &mut Vec<MachineEvent>) {
        events.push(MachineEvent::ModeChanged {
            from: self.mode,
            to: next,
        });
        self.mode = next;
        // The countdown just finished, so it is not running and this
        // re-arms it for the next interval.
        let _ = self.countdown.set_duration(self.duration_for(next));
    }

    fn apply_queued_settings(&mut self) {
        if let Some(settings) = self.queued_settings.take() {
            self.settings = settings;
        }
    }

    fn duration_for(&self, mode: SessionMode) -> u64 {
        match mode {
            SessionMode::Focus => self.settings.pomodoro_duration,
            SessionMode::ShortBreak => self.settings.short_break,
            SessionMode::LongBreak => self.settings.long_break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> Settings {
        Settings {
            pomodoro_duration: 1,
            short_break: 1,
            long_break: 1,
            pomodoros_until_long_break: 4,
            ..Settings::default()
        }
    }

    fn run_to_completion(machine: &mut PomodoroMachine) -> Vec<MachineEvent> {
        machine.start();
        let now = Utc::now();
        for _ in 0..59 {
            assert!(machine.tick(now).is_empty());
        }
        machine.tick(now)
    }

    fn next_mode(events: &[MachineEvent]) -> SessionMode {
        events
            .iter()
            .find_map(|e| match e {
                MachineEvent::ModeChanged { to, .. } => Some(*to),
                _ => None,
            })
            .expect("transition should emit a mode change")
    }

    #[test]
    fn four_focus_completions_cycle_short_breaks_then_long_break() {
        let mut machine = PomodoroMachine::new("user-1".into(), test_settings());
        let mut modes = vec![machine.snapshot().mode];

        // Focus -> break -> Focus -> ... until the 4th focus earns LongBreak.
        for _ in 0..7 {
            let events = run_to_completion(&mut machine);
            modes.push(next_mode(&events));
        }

        use SessionMode::*;
        assert_eq!(
            modes,
            vec![Focus, ShortBreak, Focus, ShortBreak, Focus, ShortBreak, Focus, LongBreak]
        );
        assert_eq!(machine.snapshot().completed_focus_count, 4);
    }

    #[test]
    fn focus_completion_produces_draft_with_label_and_durations() {
        let mut settings = test_settings();
        settings.pomodoro_duration = 1;
        settings.short_break = 5;
        let mut machine = PomodoroMachine::new("user-1".into(), settings);
        machine.set_session_info("Deep work".into(), "refactor".into());

        let events = run_to_completion(&mut machine);
        let draft = events
            .iter()
            .find_map(|e| match e {
                MachineEvent::FocusCompleted { draft } => Some(draft.clone()),
                _ => None,
            })
            .expect("focus completion should produce a draft");

        assert_eq!(draft.user_id, "user-1");
        assert_eq!(draft.label, "Deep work");
        assert_eq!(draft.note, "refactor");
        assert_eq!(draft.duration_minutes, 1);
        assert_eq!(draft.break_minutes, 5);
    }

    #[test]
    fn break_completion_returns_to_focus_and_clears_session_info() {
        let mut machine = PomodoroMachine::new("user-1".into(), test_settings());
        machine.set_session_info("label".into(), "note".into());
        run_to_completion(&mut machine); // Focus -> ShortBreak
        let events = run_to_completion(&mut machine); // ShortBreak -> Focus

        assert_eq!(next_mode(&events), SessionMode::Focus);
        assert!(!events
            .iter()
            .any(|e| matches!(e, MachineEvent::FocusCompleted { .. })));
        let snapshot = machine.snapshot();
        assert!(snapshot.session_label.is_empty());
        assert!(snapshot.session_note.is_empty());
    }

    #[test]
    fn reset_changes_mode_without_completing_or_counting() {
        let mut machine = PomodoroMachine::new("user-1".into(), test_settings());
        run_to_completion(&mut machine); // now in ShortBreak
        machine.start();
        machine.tick(Utc::now());

        let events = machine.reset();
        assert_eq!(
            events,
            vec![MachineEvent::ModeChanged {
                from: SessionMode::ShortBreak,
                to: SessionMode::Focus,
            }]
        );
        assert_eq!(machine.snapshot().completed_focus_count, 1);
        assert_eq!(machine.snapshot().seconds_remaining, 60);
    }

    #[test]
    fn reset_during_focus_emits_no_mode_change() {
        let mut machine = PomodoroMachine::new("user-1".into(), test_settings());
        machine.start();
        machine.tick(Utc::now());
        assert!(machine.reset().is_empty());
        assert_eq!(machine.snapshot().completed_focus_count, 0);
    }

    #[test]
    fn settings_change_mid_run_applies_at_next_transition() {
        let mut machine = PomodoroMachine::new("user-1".into(), test_settings());
        machine.start();
        machine.tick(Utc::now());

        let mut updated = test_settings();
        updated.short_break = 10;
        machine.update_settings(updated);

        // The running focus interval keeps its original duration.
        assert_eq!(machine.snapshot().seconds_remaining, 59);

        let now = Utc::now();
        for _ in 0..58 {
            machine.tick(now);
        }
        let events = machine.tick(now);
        assert_eq!(next_mode(&events), SessionMode::ShortBreak);
        // The queued settings shaped the break that follows.
        assert_eq!(machine.snapshot().seconds_remaining, 10 * 60);
    }

    #[test]
    fn settings_change_while_idle_applies_immediately() {
        let mut machine = PomodoroMachine::new("user-1".into(), test_settings());
        let mut updated = test_settings();
        updated.pomodoro_duration = 25;
        machine.update_settings(updated);
        assert_eq!(machine.snapshot().seconds_remaining, 25 * 60);
    }
}
