//! Tick-based world simulation for Hollowhold.
//!
//! A [`World`] holds every location built from the object factory. A
//! [`Simulation`] owns the world together with a clock, a seeded RNG, and an
//! event log, and runs its systems once per tick: combat first, then
//! cleanup of the dead.

/// Death cleanup: dropping inventories and removing bodies.
pub mod cleanup;
/// Simulation clock for tracking ticks and world time.
pub mod clock;
/// Combat: per-tick character updates.
pub mod combat;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types, the event log, and subscriptions.
pub mod event;
/// Top-level simulation orchestrator.
pub mod simulation;
/// The trait that all simulation systems implement.
pub mod system;
/// The location graph and the operations a command layer needs.
pub mod world;

/// Re-export of [`cleanup::CleanupSystem`].
pub use cleanup::CleanupSystem;
/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`combat::CombatSystem`].
pub use combat::CombatSystem;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of [`context::Narration`] and [`context::SimContext`].
pub use context::{Narration, SimContext};
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`system::System`].
pub use system::System;
/// Re-export of [`world::World`].
pub use world::World;
