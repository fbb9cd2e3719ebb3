use chrono::{DateTime, Utc};
use hh_core::Location;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::world::World;

/// Narration produced by updating one location: event kinds paired with the
/// line a player would read.
pub type Narration = Vec<(SimEventKind, String)>;

/// Everything a system may touch while it runs: the world, the clock it
/// reads time from, the event log it narrates into, and the shared RNG.
pub struct SimContext<'a> {
    /// Every location and door.
    pub world: &'a mut World,
    /// Clock of the running tick.
    pub clock: &'a SimClock,
    /// Log that emitted events go to.
    pub events: &'a mut EventLog,
    /// Seeded RNG shared by all systems.
    pub rng: &'a mut StdRng,
}

impl SimContext<'_> {
    /// Record an event at the current tick and forward it to subscribers.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        let event = SimEvent::new(self.clock.tick(), kind, description);
        self.events.push(event);
    }

    /// Number of the running tick.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// World time of the running tick.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Run `update` on every location in ID order and emit what it narrates.
    /// Returns the number of events emitted.
    pub fn update_locations(
        &mut self,
        mut update: impl FnMut(&mut Location, DateTime<Utc>, &mut StdRng) -> Narration,
    ) -> usize {
        let now = self.now();
        let mut emitted = 0;
        for id in self.world.location_ids() {
            let Some(location) = self.world.location_mut(&id) else {
                continue;
            };
            let narration = update(location, now, self.rng);
            emitted += narration.len();
            for (kind, description) in narration {
                self.emit(kind, description);
            }
        }
        emitted
    }
}
