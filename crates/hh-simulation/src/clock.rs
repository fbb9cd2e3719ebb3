use chrono::{DateTime, TimeDelta, Utc};

/// Tracks simulation time: a monotonic tick counter and the UTC world time
/// the current tick runs at.
#[derive(Debug, Clone)]
pub struct SimClock {
    tick: u64,
    now: DateTime<Utc>,
    tick_length: TimeDelta,
}

impl SimClock {
    /// Create a clock at tick 0.
    pub fn new(start: DateTime<Utc>, tick_length: TimeDelta) -> Self {
        Self {
            tick: 0,
            now: start,
            tick_length,
        }
    }

    /// Advance by one tick of the configured length. Returns the new tick
    /// number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.now = self
            .now
            .checked_add_signed(self.tick_length)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.tick
    }

    /// Advance by one tick to an externally supplied time. Time never runs
    /// backwards; an earlier `now` keeps the current time.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> u64 {
        self.tick += 1;
        self.now = self.now.max(now);
        self.tick
    }

    /// Number of ticks run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// World time of the current tick.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Duration added by [`SimClock::advance`].
    pub fn tick_length(&self) -> TimeDelta {
        self.tick_length
    }
}
