//! Tick-driven countdown. The runtime feeds it one `tick()` per elapsed
//! second; keeping the clock external makes every timing property testable
//! with simulated ticks.

use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CountdownError {
    #[error("cannot change duration while the countdown is running")]
    Running,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CountdownStatus {
    Idle,
    Running,
    Paused,
    /// Terminal until `reset()`: the completion already fired and must not
    /// fire again for this run.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    duration_minutes: u64,
    seconds_remaining: u64,
    status: CountdownStatus,
}

impl Countdown {
    pub fn new(duration_minutes: u64) -> Self {
        let duration_minutes = duration_minutes.max(1);
        Self {
            duration_minutes,
            seconds_remaining: duration_minutes * 60,
            status: CountdownStatus::Idle,
        }
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == CountdownStatus::Running
    }

    pub fn seconds_remaining(&self) -> u64 {
        self.seconds_remaining
    }

    /// No-op unless idle or paused. A finished run stays finished until
    /// `reset()`.
    pub fn start(&mut self) {
        if matches!(self.status, CountdownStatus::Idle | CountdownStatus::Paused) {
            self.status = CountdownStatus::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.status == CountdownStatus::Running {
            self.status = CountdownStatus::Paused;
        }
    }

    /// Cancels any pending completion and restores the full duration.
    pub fn reset(&mut self) {
        self.seconds_remaining = self.duration_minutes * 60;
        self.status = CountdownStatus::Idle;
    }

    /// Rejected while running: a live run keeps the duration it started
    /// with. Otherwise behaves like `reset()` with the new duration, which
    /// also re-arms a finished run.
    pub fn set_duration(&mut self, duration_minutes: u64) -> Result<(), CountdownError> {
        if self.is_running() {
            return Err(CountdownError::Running);
        }
        self.duration_minutes = duration_minutes.max(1);
        self.reset();
        Ok(())
    }

    /// Advances one second. Returns `true` exactly once per run, on the tick
    /// that takes the remaining time to zero; the transition into `Finished`
    /// disarms further completions.
    pub fn tick(&mut self) -> bool {
        if self.status != CountdownStatus::Running {
            return false;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.status = CountdownStatus::Finished;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_minute_run_completes_exactly_once_after_sixty_ticks() {
        let mut countdown = Countdown::new(1);
        countdown.start();

        let mut completions = 0;
        for _ in 0..60 {
            if countdown.tick() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(countdown.seconds_remaining(), 0);
        assert_eq!(countdown.status(), CountdownStatus::Finished);

        // Further ticks must not re-fire.
        for _ in 0..10 {
            assert!(!countdown.tick());
        }
    }

    #[test]
    fn reset_mid_run_cancels_pending_completion() {
        let mut countdown = Countdown::new(1);
        countdown.start();
        for _ in 0..30 {
            countdown.tick();
        }
        assert_eq!(countdown.seconds_remaining(), 30);

        countdown.reset();
        assert_eq!(countdown.seconds_remaining(), 60);
        assert_eq!(countdown.status(), CountdownStatus::Idle);

        // Ticking while idle does nothing.
        assert!(!countdown.tick());
        assert_eq!(countdown.seconds_remaining(), 60);
    }

    #[test]
    fn pause_freezes_remaining_time() {
        let mut countdown = Countdown::new(2);
        countdown.start();
        countdown.tick();
        countdown.pause();
        assert!(!countdown.tick());
        assert_eq!(countdown.seconds_remaining(), 119);

        countdown.start();
        assert!(!countdown.tick());
        assert_eq!(countdown.seconds_remaining(), 118);
    }

    #[test]
    fn set_duration_rejected_while_running() {
        let mut countdown = Countdown::new(25);
        countdown.start();
        assert_eq!(countdown.set_duration(50), Err(CountdownError::Running));
        // The original duration survives the rejected change.
        countdown.reset();
        assert_eq!(countdown.seconds_remaining(), 25 * 60);
    }

    #[test]
    fn set_duration_while_idle_resets_remaining() {
        let mut countdown = Countdown::new(25);
        countdown.set_duration(5).unwrap();
        assert_eq!(countdown.seconds_remaining(), 300);
    }

    #[test]
    fn set_duration_rearms_a_finished_run() {
        let mut countdown = Countdown::new(1);
        countdown.start();
        for _ in 0..60 {
            countdown.tick();
        }
        assert_eq!(countdown.status(), CountdownStatus::Finished);

        countdown.set_duration(1).unwrap();
        assert_eq!(countdown.status(), CountdownStatus::Idle);
        countdown.start();
        let fired = (0..60).filter(|_| countdown.tick()).count();
        assert_eq!(fired, 1);
    }
}
