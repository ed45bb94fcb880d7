use std::time::{Duration, Instant};

/// Minimum spacing between acted-on serial events.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    last_action: Option<Instant>,
}

impl Cooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_action: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        if self.window.is_zero() {
            return true;
        }

        match self.last_action {
            Some(last) => now.saturating_duration_since(last) >= self.window,
            None => true,
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.last_action = Some(now);
    }
}
