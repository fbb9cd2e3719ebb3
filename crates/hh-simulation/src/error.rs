use hh_core::{Direction, InstanceId, MoveError};
use hh_factory::FactoryError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by world operations and systems.
///
/// Player-facing refusals (a locked door, no exit that way) carry a message
/// that can be shown as is.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No location with this ID exists.
    #[error("location not found: \"{0}\"")]
    LocationNotFound(String),

    /// The object is not anywhere in the given location.
    #[error("object {instance} is not in \"{location}\"")]
    ObjectNotFound {
        /// ID of the location searched.
        location: String,
        /// The missing object.
        instance: InstanceId,
    },

    /// An exit names a door the world does not have.
    #[error("door not found: \"{0}\"")]
    DoorNotFound(String),

    /// The location has no exit in that direction.
    #[error("You can't go {direction} from here.")]
    NoExit {
        /// The direction asked for.
        direction: Direction,
    },

    /// The exit's door is locked.
    #[error("The {door} is locked.")]
    DoorLocked {
        /// Name of the door.
        door: String,
    },

    /// The key did not fit or the door had no lock.
    #[error("{0}")]
    Unlock(String),

    /// A fight was requested with something that is not a living character.
    #[error("{0} is not a character")]
    NotACharacter(String),

    /// Moving an object failed.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Building the world from definitions failed.
    #[error(transparent)]
    Factory(#[from] FactoryError),

    /// Raised by custom systems.
    #[error("system error: {0}")]
    SystemError(String),
}
