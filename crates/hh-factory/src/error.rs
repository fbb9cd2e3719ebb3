use std::path::PathBuf;

use hh_core::CoreError;

/// Alias for `Result<T, FactoryError>`.
pub type FactoryResult<T> = Result<T, FactoryError>;

/// One object that could not be built during validation.
#[derive(Debug)]
pub struct ValidationFailure {
    /// ID of the definition that failed.
    pub id: String,
    /// Why it could not be built.
    pub error: FactoryError,
}

/// Errors raised while loading definitions or creating objects.
#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    /// A file or directory could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A definition file is not valid JSON or misses required keys.
    #[error("malformed definition {}: {source}", .path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// No definition with this ID was loaded.
    #[error("unknown object: \"{0}\"")]
    NotFound(String),

    /// The declared type has no registered resolver.
    #[error("\"{id}\" declares unknown object type \"{object_type}\"")]
    UnknownType {
        /// ID of the definition.
        id: String,
        /// The unrecognized type tag.
        object_type: String,
    },

    /// Two definitions share an ID.
    #[error("duplicate object id \"{id}\" (first defined in {})", .first.display())]
    DuplicateId {
        /// The shared ID.
        id: String,
        /// File of the definition loaded first.
        first: PathBuf,
    },

    /// The object exists but is not of the requested variant.
    #[error("\"{id}\" is not a {expected} (found {found})")]
    WrongVariant {
        /// ID of the definition.
        id: String,
        /// The class that was asked for.
        expected: String,
        /// The class the definition resolves to.
        found: String,
    },

    /// Resolution of the record failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Starting contents of a definition refer back to the definition itself.
    #[error("\"{id}\" contains itself (via {})", .chain.join(" -> "))]
    RecursiveContents {
        /// ID of the definition being created.
        id: String,
        /// IDs from the outermost holder down to the repeat.
        chain: Vec<String>,
    },

    /// Starting contents do not fit their holder.
    #[error("starting contents of \"{id}\" rejected: {reason}")]
    ContentsRejected {
        /// ID of the holder.
        id: String,
        /// The constraint that refused an item.
        reason: String,
    },

    /// One or more definitions failed to construct.
    #[error("{} definition(s) failed validation", .0.len())]
    Validation(Vec<ValidationFailure>),
}

impl FactoryError {
    /// True for lookups of unknown IDs, which callers usually treat as an
    /// ordinary "not here" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
