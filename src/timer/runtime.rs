//! Per-user session machines behind one lock, each driven by a one-second
//! ticker task while running. The lock serializes every tick and control
//! call, so no two ticks can ever run concurrently for the same machine.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time;

use crate::models::session::DraftFocusSession;
use crate::settings::Settings;

use super::machine::{MachineEvent, MachineSnapshot, PomodoroMachine};

struct UserTimer {
    machine: PomodoroMachine,
    ticker: Option<JoinHandle<()>>,
    /// Completed focus interval waiting for its check-in.
    draft: Option<DraftFocusSession>,
}

#[derive(Clone)]
pub struct TimerRuntime {
    timers: Arc<Mutex<HashMap<String, UserTimer>>>,
    events: broadcast::Sender<String>,
    tick_interval: Duration,
}

impl TimerRuntime {
    pub fn new(events: broadcast::Sender<String>) -> Self {
        Self {
            timers: Arc::new(Mutex::new(HashMap::new())),
            events,
            tick_interval: Duration::from_secs(1),
        }
    }

    pub async fn start(&self, user_id: &str, settings: Settings) {
        let mut timers = self.timers.lock().await;
        let entry = timers
            .entry(user_id.to_string())
            .or_insert_with(|| UserTimer {
                machine: PomodoroMachine::new(user_id.to_string(), settings),
                ticker: None,
                draft: None,
            });
        entry.machine.start();

        if let Some(handle) = entry.ticker.take() {
            handle.abort();
        }
        entry.ticker = Some(self.spawn_ticker(user_id.to_string()));
    }

    pub async fn pause(&self, user_id: &str) {
        let mut timers = self.timers.lock().await;
        if let Some(entry) = timers.get_mut(user_id) {
            entry.machine.pause();
            if let Some(handle) = entry.ticker.take() {
                handle.abort();
            }
        }
    }

    pub async fn reset(&self, user_id: &str) {
        let mut timers = self.timers.lock().await;
        if let Some(entry) = timers.get_mut(user_id) {
            if let Some(handle) = entry.ticker.take() {
                handle.abort();
            }
            let events = entry.machine.reset();
            publish_events(&self.events, user_id, &events, &mut entry.draft);
        }
    }

    pub async fn set_session_info(&self, user_id: &str, settings: Settings, label: String, note: String) {
        let mut timers = self.timers.lock().await;
        let entry = timers
            .entry(user_id.to_string())
            .or_insert_with(|| UserTimer {
                machine: PomodoroMachine::new(user_id.to_string(), settings),
                ticker: None,
                draft: None,
            });
        entry.machine.set_session_info(label, note);
    }

    pub async fn snapshot(&self, user_id: &str, settings: Settings) -> MachineSnapshot {
        let mut timers = self.timers.lock().await;
        let entry = timers
            .entry(user_id.to_string())
            .or_insert_with(|| UserTimer {
                machine: PomodoroMachine::new(user_id.to_string(), settings),
                ticker: None,
                draft: None,
            });
        entry.machine.snapshot()
    }

    /// Hands the parked draft to the check-in flow, clearing it.
    pub async fn take_draft(&self, user_id: &str) -> Option<DraftFocusSession> {
        let mut timers = self.timers.lock().await;
        timers.get_mut(user_id).and_then(|entry| entry.draft.take())
    }

    /// Settings changed: every machine picks the new values up, queued past
    /// the end of any interval currently running.
    pub async fn update_settings(&self, settings: Settings) {
        let mut timers = self.timers.lock().await;
        for entry in timers.values_mut() {
            entry.machine.update_settings(settings.clone());
        }
    }

    fn spawn_ticker(&self, user_id: String) -> JoinHandle<()> {
        let timers = self.timers.clone();
        let events_tx = self.events.clone();
        let tick_interval = self.tick_interval;

        tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // The first tick of a tokio interval fires immediately; skip it
            // so the first elapsed second is a real second.
            interval.tick().await;
            loop {
                interval.tick().await;

                let mut guard = timers.lock().await;
                let Some(entry) = guard.get_mut(&user_id) else {
                    break;
                };
                let events = entry.machine.tick(Utc::now());
                publish_events(&events_tx, &user_id, &events, &mut entry.draft);

                if !entry.machine.is_running() {
                    break;
                }
            }
        })
    }
}

fn publish_events(
    events_tx: &broadcast::Sender<String>,
    user_id: &str,
    events: &[MachineEvent],
    draft_slot: &mut Option<DraftFocusSession>,
) {
    for event in events {
        let payload = match event {
            MachineEvent::ModeChanged { from, to } => json!({
                "type": "mode_changed",
                "user_id": user_id,
                "from": from,
                "to": to,
            }),
            MachineEvent::TimerCompleted { mode } => json!({
                "type": "timer_completed",
                "user_id": user_id,
                "mode": mode,
            }),
            MachineEvent::FocusCompleted { draft } => {
                if draft_slot.is_some() {
                    tracing::warn!(user_id = %user_id, "Replacing unchecked focus draft");
                }
                *draft_slot = Some(draft.clone());
                json!({
                    "type": "draft_ready",
                    "user_id": user_id,
                    "label": draft.label,
                    "duration_minutes": draft.duration_minutes,
                })
            }
        };
        // Nobody listening is fine; the stream is best-effort.
        let _ = events_tx.send(payload.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::countdown::CountdownStatus;

    fn minute_settings() -> Settings {
        Settings {
            pomodoro_duration: 1,
            short_break: 1,
            long_break: 1,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn snapshot_materializes_an_idle_machine() {
        let (tx, _rx) = broadcast::channel(16);
        let runtime = TimerRuntime::new(tx);
        let snapshot = runtime.snapshot("user-1", minute_settings()).await;
        assert_eq!(snapshot.status, CountdownStatus::Idle);
        assert_eq!(snapshot.seconds_remaining, 60);
        assert_eq!(snapshot.completed_focus_count, 0);
    }

    #[tokio::test]
    async fn pause_stops_the_ticker_and_freezes_state() {
        let (tx, _rx) = broadcast::channel(16);
        let runtime = TimerRuntime::new(tx);
        runtime.start("user-1", minute_settings()).await;
        runtime.pause("user-1").await;

        let before = runtime.snapshot("user-1", minute_settings()).await;
        assert_eq!(before.status, CountdownStatus::Paused);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let after = runtime.snapshot("user-1", minute_settings()).await;
        assert_eq!(before.seconds_remaining, after.seconds_remaining);
    }

    #[tokio::test]
    async fn reset_returns_machine_to_idle_focus() {
        let (tx, _rx) = broadcast::channel(16);
        let runtime = TimerRuntime::new(tx);
        runtime.start("user-1", minute_settings()).await;
        runtime.reset("user-1").await;

        let snapshot = runtime.snapshot("user-1", minute_settings()).await;
        assert_eq!(snapshot.status, CountdownStatus::Idle);
        assert_eq!(snapshot.seconds_remaining, 60);
    }

    #[tokio::test]
    async fn take_draft_is_empty_until_a_focus_interval_completes() {
        let (tx, _rx) = broadcast::channel(16);
        let runtime = TimerRuntime::new(tx);
        runtime.start("user-1", minute_settings()).await;
        assert!(runtime.take_draft("user-1").await.is_none());
    }
}
