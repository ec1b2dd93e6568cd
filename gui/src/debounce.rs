use std::time::Duration;
use tracing::debug;

/// Generation-counting debouncer. Every edit bumps the generation and
/// schedules a wake-up; a wake-up only fires if no newer edit happened
/// during the quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer {
    generation: u64,
    quiet_period: Duration,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            generation: 0,
            quiet_period,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Registers an edit and returns the generation its wake-up must carry.
    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Drops any pending wake-up.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    pub fn is_settled(&self, generation: u64) -> bool {
        let settled = generation == self.generation;
        if !settled {
            debug!(
                "Debounce wake-up {} superseded by {}",
                generation, self.generation
            );
        }
        settled
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}
