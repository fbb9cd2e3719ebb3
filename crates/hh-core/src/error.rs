use crate::units::UnitError;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while resolving a record into a live object.
///
/// These are fatal for the one object being built. Expected gameplay
/// failures (a full bag, a missing item) are not errors; see
/// [`crate::container::ConstraintViolation`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A structural field is malformed or missing.
    #[error("configuration error in \"{id}\": {message}")]
    Configuration {
        /// ID of the offending object.
        id: String,
        /// What was wrong with it.
        message: String,
    },

    /// A dimension or weight magnitude could not be parsed.
    #[error("invalid {field} in \"{id}\": {source}")]
    Unit {
        /// ID of the offending object.
        id: String,
        /// Which field failed ("Height", "Weight", ...).
        field: &'static str,
        /// The underlying parse failure.
        source: UnitError,
    },
}

impl CoreError {
    /// Shorthand for a [`CoreError::Configuration`].
    pub fn configuration(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            id: id.into(),
            message: message.into(),
        }
    }

    /// The ID of the object that failed.
    pub fn object_id(&self) -> &str {
        match self {
            Self::Configuration { id, .. } | Self::Unit { id, .. } => id,
        }
    }
}
