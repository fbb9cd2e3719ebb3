//! Doors gating exits between locations.

use crate::object::{LiveObject, ObjectKind};

/// Weight given to doors that do not declare one, so they can never be
/// picked up.
pub const DEFAULT_DOOR_WEIGHT_KG: f64 = 1000.0;

/// Lock state of a door.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Door {
    /// Record ID of the key that opens this door, if any.
    pub key_id: Option<String>,
    /// Locked doors block travel through their exit.
    pub locked: bool,
}

impl LiveObject {
    /// Try to unlock this door with `key`. Only the object whose record ID
    /// matches the door's key ID works.
    pub fn unlock(&mut self, key: &LiveObject) -> Result<(), String> {
        let name = self.name.clone();
        let ObjectKind::Door(door) = &mut self.kind else {
            return Err(format!("The {name} has no lock."));
        };
        if !door.locked {
            return Ok(());
        }
        match &door.key_id {
            Some(key_id) if *key_id == key.id => {
                door.locked = false;
                Ok(())
            }
            Some(_) => Err(format!("The {} does not fit the lock of the {name}.", key.name)),
            None => Err(format!("The {name} cannot be unlocked with the {}.", key.name)),
        }
    }

    /// Lock the door again. Fails for anything without a lock.
    pub fn lock(&mut self) -> Result<(), String> {
        match &mut self.kind {
            ObjectKind::Door(door) => {
                door.locked = true;
                Ok(())
            }
            _ => Err(format!("The {} has no lock.", self.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oak_door() -> LiveObject {
        LiveObject::new("oak_door", "oak door").with_kind(ObjectKind::Door(Door {
            key_id: Some("brass_key".into()),
            locked: true,
        }))
    }

    #[test]
    fn matching_key_unlocks() {
        let mut door = oak_door();
        let key = LiveObject::new("brass_key", "brass key");
        door.unlock(&key).unwrap();
        assert!(!door.as_door().unwrap().locked);
    }

    #[test]
    fn wrong_key_names_both_objects() {
        let mut door = oak_door();
        let key = LiveObject::new("iron_key", "iron key");
        let reason = door.unlock(&key).unwrap_err();
        assert!(reason.contains("iron key"));
        assert!(reason.contains("oak door"));
        assert!(door.as_door().unwrap().locked);
    }

    #[test]
    fn unlocking_a_non_door_fails() {
        let mut chest = LiveObject::new("rock", "rock");
        let key = LiveObject::new("brass_key", "brass key");
        assert!(chest.unlock(&key).is_err());
        assert!(chest.lock().is_err());
    }

    #[test]
    fn describe_reports_lock_state() {
        let mut door = oak_door();
        assert!(door.describe().iter().any(|l| l == "The oak door is locked."));
        door.unlock(&LiveObject::new("brass_key", "key")).unwrap();
        assert!(door.describe().iter().any(|l| l == "The oak door is unlocked."));
        door.lock().unwrap();
        assert!(door.as_door().unwrap().locked);
    }
}
