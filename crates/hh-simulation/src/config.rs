use chrono::{DateTime, TimeDelta, Utc};

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic combat.
    pub seed: u64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// World seconds that pass per tick.
    pub tick_seconds: f64,
    /// World time of tick zero.
    pub start: DateTime<Utc>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_events: 0,
            tick_seconds: 1.0,
            start: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set how many world seconds pass per tick.
    pub fn with_tick_seconds(mut self, seconds: f64) -> Self {
        self.tick_seconds = seconds;
        self
    }

    /// Set the world time of tick zero.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    /// Tick length as a duration, rounded to the millisecond. Negative or
    /// non-finite values give a zero-length tick; values beyond what a
    /// duration can hold are clamped.
    pub fn tick_length(&self) -> TimeDelta {
        if self.tick_seconds.is_finite() && self.tick_seconds > 0.0 {
            TimeDelta::try_milliseconds((self.tick_seconds * 1000.0).round() as i64)
                .unwrap_or(TimeDelta::MAX)
        } else {
            TimeDelta::zero()
        }
    }
}
