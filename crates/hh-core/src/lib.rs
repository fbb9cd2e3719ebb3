//! Core types for Hollowhold: live objects, containers, and locations.
//!
//! This crate defines the runtime object model that definition records are
//! resolved into. It knows nothing about where records come from; the
//! `hh-factory` crate loads them from disk and dispatches to the resolvers
//! in [`resolve`].

/// Containment rules: capacity, weight, and size checks plus nested search.
pub mod container;
/// Error types used throughout the crate.
pub mod error;
/// Type-specific object state (doors, armour, weapons, characters, food).
pub mod kinds;
/// Locations, exits, and directions.
pub mod location;
/// Live objects and their identifiers.
pub mod object;
/// Data-authored object records as they appear in definition files.
pub mod record;
/// Resolvers that turn records into live objects.
pub mod resolve;
/// Conversion of magnitude strings ("10cm", "2kg") into canonical units.
pub mod units;

/// Re-export containment types.
pub use container::{Capacity, ConstraintViolation, Container, Found, MoveError, Rejected};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export type-specific state.
pub use kinds::{Armour, Attack, AttackRoll, Character, Door, Food, Weapon};
/// Re-export location types.
pub use location::{Direction, Exit, Location};
/// Re-export live object types.
pub use object::{Dimensions, InstanceId, LiveObject, ObjectClass, ObjectKind};
/// Re-export record types.
pub use record::ObjectRecord;
