use chrono::{DateTime, Utc};
use crossbeam_channel::Receiver;
use hh_core::{Direction, InstanceId, LiveObject};
use hh_factory::ObjectFactory;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::cleanup::CleanupSystem;
use crate::clock::SimClock;
use crate::combat::CombatSystem;
use crate::config::SimConfig;
use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::{EventLog, SimEvent, SimEventKind};
use crate::system::System;
use crate::world::World;

/// The top-level simulation orchestrator.
///
/// Owns the world, clock, RNG, event log, and registered systems. A new
/// simulation runs combat and then cleanup each tick; further systems run
/// after those, in registration order.
pub struct Simulation {
    world: World,
    clock: SimClock,
    rng: StdRng,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
    initialized: bool,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Create a simulation with the standard combat and cleanup systems.
    pub fn new(world: World, config: SimConfig) -> Self {
        let mut sim = Self::bare(world, config);
        sim.add_system(CombatSystem::new());
        sim.add_system(CleanupSystem::new());
        sim
    }

    /// Create a simulation with no systems registered.
    pub fn bare(world: World, config: SimConfig) -> Self {
        Self {
            world,
            clock: SimClock::new(config.start, config.tick_length()),
            rng: StdRng::seed_from_u64(config.seed),
            events: EventLog::new(config.max_events),
            systems: Vec::new(),
            initialized: false,
        }
    }

    /// Build the world from a factory and wrap it in a new simulation.
    pub fn from_factory(factory: &ObjectFactory, config: SimConfig) -> SimResult<Self> {
        Ok(Self::new(World::from_factory(factory)?, config))
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Initialize all registered systems.
    pub fn init(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.for_each_system(|system, ctx| system.init(ctx))?;
        self.initialized = true;
        Ok(())
    }

    /// Advance by one tick of the configured length.
    pub fn tick(&mut self) -> SimResult<u64> {
        if !self.initialized {
            self.init()?;
        }
        let tick = self.clock.advance();
        self.for_each_system(|system, ctx| system.tick(ctx))?;
        Ok(tick)
    }

    /// Advance by one tick that runs at the given world time.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> SimResult<u64> {
        if !self.initialized {
            self.init()?;
        }
        let tick = self.clock.advance_to(now);
        self.for_each_system(|system, ctx| system.tick(ctx))?;
        Ok(tick)
    }

    /// Advance the simulation by `n` ticks.
    pub fn run(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    fn for_each_system(
        &mut self,
        mut f: impl FnMut(&mut dyn System, &mut SimContext<'_>) -> SimResult<()>,
    ) -> SimResult<()> {
        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                world: &mut self.world,
                clock: &self.clock,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            let result = f(system.as_mut(), &mut ctx);
            if let Err(err) = &result {
                warn!(system = system.name(), tick = self.clock.tick(), error = %err, "system failed");
            }
            self.systems[i] = system;
            result?;
        }
        Ok(())
    }

    /// Rebuild the world from the factory. The clock, RNG, and event log
    /// carry on.
    pub fn reset(&mut self, factory: &ObjectFactory) -> SimResult<()> {
        self.world.reset(factory)?;
        info!(tick = self.clock.tick(), "world reset");
        Ok(())
    }

    /// Open a subscription to every event emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<SimEvent> {
        self.events.subscribe()
    }

    /// Emit an event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    // -----------------------------------------------------------------------
    // World operations that narrate what they did
    // -----------------------------------------------------------------------

    /// Move an object between holders in one location.
    pub fn move_object(
        &mut self,
        location: &str,
        instance: InstanceId,
        target: InstanceId,
    ) -> SimResult<()> {
        self.world.move_object(location, instance, target)?;
        let (name, holder) = self
            .world
            .location(location)
            .and_then(|l| {
                let found = l.root.find_instance(instance)?;
                Some((found.object.name.clone(), found.owner.name.clone()))
            })
            .unwrap_or_default();
        self.emit(
            SimEventKind::Moved {
                object: instance,
                from: location.to_string(),
                to: location.to_string(),
            },
            format!("The {name} is now in the {holder}."),
        );
        Ok(())
    }

    /// Move an object to the floor of another location.
    pub fn transfer(&mut self, from: &str, to: &str, instance: InstanceId) -> SimResult<()> {
        self.world.transfer(from, to, instance)?;
        self.narrate_move(instance, from, to);
        Ok(())
    }

    /// Walk `instance` out of `from` in `direction`. Returns the ID of the
    /// location it arrived in.
    pub fn travel(
        &mut self,
        from: &str,
        instance: InstanceId,
        direction: Direction,
    ) -> SimResult<String> {
        let to = self.world.exit_destination(from, direction)?.to_string();
        self.world.transfer(from, &to, instance)?;
        self.narrate_move(instance, from, &to);
        Ok(to)
    }

    fn narrate_move(&mut self, instance: InstanceId, from: &str, to: &str) {
        let (name, place) = self
            .world
            .location(to)
            .and_then(|l| {
                let object = l.root.get_instance(instance)?;
                Some((object.name.clone(), l.name.clone()))
            })
            .unwrap_or_default();
        self.emit(
            SimEventKind::Moved {
                object: instance,
                from: from.to_string(),
                to: to.to_string(),
            },
            format!("The {name} arrives in {place}."),
        );
    }

    /// Unlock a door with a key.
    pub fn unlock_door(&mut self, door_id: &str, key: &LiveObject) -> SimResult<()> {
        self.world.unlock_door(door_id, key)?;
        let door = self
            .world
            .door(door_id)
            .map(|d| d.name.clone())
            .ok_or_else(|| SimError::DoorNotFound(door_id.to_string()))?;
        self.emit(
            SimEventKind::DoorUnlocked {
                door: door_id.to_string(),
                key: key.instance,
            },
            format!("The {door} is unlocked."),
        );
        Ok(())
    }

    /// Make two characters fight each other.
    pub fn engage(&mut self, location: &str, a: InstanceId, b: InstanceId) -> SimResult<()> {
        self.world.add_fight_opponent(location, a, b)?;
        self.world.add_fight_opponent(location, b, a)
    }

    /// The world as it stands after the last tick.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Every event recorded so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Mutable access to a system by concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// Extract the world, consuming the simulation.
    pub fn into_world(self) -> World {
        self.world
    }

    /// Number of ticks run so far.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
