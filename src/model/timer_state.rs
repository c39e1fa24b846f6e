use std::time::Duration;

/// Round clock, advanced one second per tick while the round is live.
/// Transitions return a new state rather than mutating in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerState {
    pub elapsed: Duration,
    pub running: bool,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            elapsed: Duration::from_secs(0),
            running: true,
        }
    }
}

impl TimerState {
    pub fn advanced(&self) -> TimerState {
        let mut new_state = self.clone();
        if new_state.running {
            new_state.elapsed += Duration::from_secs(1);
        }
        new_state
    }

    pub fn stopped(&self) -> TimerState {
        let mut new_state = self.clone();
        new_state.running = false;
        new_state
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.as_secs()
    }
}
