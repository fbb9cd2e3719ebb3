//! Object factory for Hollowhold.
//!
//! Loads JSON object definitions from one or more data roots, indexes them
//! by ID and name, and stamps out fresh live objects and locations on
//! demand. Every creation resolves the stored record again, so live objects
//! never share mutable state.

/// Loader configuration.
pub mod config;
/// Error types for the factory.
pub mod error;
/// The factory itself: loading, creation, validation, name lookup.
pub mod factory;
/// Mapping from declared type tags to resolvers.
pub mod registry;

pub use config::FactoryConfig;
pub use error::{FactoryError, FactoryResult, ValidationFailure};
pub use factory::{Definition, LoadReport, ObjectFactory, SkippedDefinition};
pub use registry::{Resolver, ResolverRegistry};
