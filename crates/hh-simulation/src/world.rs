use std::collections::BTreeMap;

use hh_core::container::{move_within, transfer};
use hh_core::{Direction, InstanceId, LiveObject, Location};
use hh_factory::ObjectFactory;
use tracing::info;

use crate::error::{SimError, SimResult};

/// Every location of a running game, plus the doors between them.
///
/// Doors live here rather than inside a location so that both sides of a
/// doorway see the same lock state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    locations: BTreeMap<String, Location>,
    doors: BTreeMap<String, LiveObject>,
}

impl World {
    /// An empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh world from every location the factory knows about.
    pub fn from_factory(factory: &ObjectFactory) -> SimResult<Self> {
        let locations = factory.create_all_locations()?;
        let doors = factory.create_exit_doors(&locations)?;
        info!(
            locations = locations.len(),
            doors = doors.len(),
            "world built"
        );
        Ok(Self { locations, doors })
    }

    /// Discard everything and rebuild from the factory. On failure the
    /// current world is left untouched.
    pub fn reset(&mut self, factory: &ObjectFactory) -> SimResult<()> {
        *self = Self::from_factory(factory)?;
        Ok(())
    }

    /// Add a location, replacing any with the same ID.
    pub fn insert_location(&mut self, location: Location) {
        self.locations.insert(location.id.clone(), location);
    }

    /// Add a door, replacing any with the same ID.
    pub fn insert_door(&mut self, door: LiveObject) {
        self.doors.insert(door.id.clone(), door);
    }

    /// The location with this ID.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Mutable access to the location with this ID.
    pub fn location_mut(&mut self, id: &str) -> Option<&mut Location> {
        self.locations.get_mut(id)
    }

    /// All locations, ordered by ID.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    /// IDs of all locations, sorted.
    pub fn location_ids(&self) -> Vec<String> {
        self.locations.keys().cloned().collect()
    }

    /// The location play begins in: the one marked as start, or the first
    /// by ID if none is.
    pub fn start_location(&self) -> Option<&Location> {
        self.locations
            .values()
            .find(|l| l.start)
            .or_else(|| self.locations.values().next())
    }

    /// The door with this ID.
    pub fn door(&self, id: &str) -> Option<&LiveObject> {
        self.doors.get(id)
    }

    /// The ID of the location holding `instance` anywhere in its tree.
    pub fn locate(&self, instance: InstanceId) -> Option<&str> {
        self.locations
            .values()
            .find(|l| l.root.contains_instance(instance))
            .map(|l| l.id.as_str())
    }

    /// Find the first object stamped from record `id`, searching locations
    /// in ID order. Returns the location ID and the object's instance.
    pub fn find_by_id(&self, id: &str) -> Option<(&str, InstanceId)> {
        self.locations.values().find_map(|l| {
            l.root
                .find_by_id(id)
                .map(|found| (l.id.as_str(), found.object.instance))
        })
    }

    fn require_location(&self, id: &str) -> SimResult<&Location> {
        self.location(id)
            .ok_or_else(|| SimError::LocationNotFound(id.to_string()))
    }

    fn require_location_mut(&mut self, id: &str) -> SimResult<&mut Location> {
        self.location_mut(id)
            .ok_or_else(|| SimError::LocationNotFound(id.to_string()))
    }

    /// Where the exit in `direction` leads. Fails if there is no such exit
    /// or its door is locked.
    pub fn exit_destination(&self, location: &str, direction: Direction) -> SimResult<&str> {
        let exit = self
            .require_location(location)?
            .exit(direction)
            .ok_or(SimError::NoExit { direction })?;

        if let Some(door_id) = &exit.door {
            let door = self
                .doors
                .get(door_id)
                .ok_or_else(|| SimError::DoorNotFound(door_id.clone()))?;
            if door.as_door().is_some_and(|d| d.locked) {
                return Err(SimError::DoorLocked {
                    door: door.name.clone(),
                });
            }
        }
        Ok(&exit.destination)
    }

    /// Unlock a door with a candidate key.
    pub fn unlock_door(&mut self, door_id: &str, key: &LiveObject) -> SimResult<()> {
        let door = self
            .doors
            .get_mut(door_id)
            .ok_or_else(|| SimError::DoorNotFound(door_id.to_string()))?;
        door.unlock(key).map_err(SimError::Unlock)
    }

    /// Move an object to another holder in the same location. `target` may
    /// be the location root.
    pub fn move_object(
        &mut self,
        location: &str,
        instance: InstanceId,
        target: InstanceId,
    ) -> SimResult<()> {
        let location = self.require_location_mut(location)?;
        move_within(&mut location.root, instance, target)?;
        Ok(())
    }

    /// Move an object from anywhere in one location to the floor of
    /// another. The move is atomic: on failure nothing changes.
    pub fn transfer(&mut self, from: &str, to: &str, instance: InstanceId) -> SimResult<()> {
        if from == to {
            let location = self.require_location_mut(from)?;
            let root = location.root.instance;
            move_within(&mut location.root, instance, root)?;
            return Ok(());
        }

        self.require_location(from)?;
        let mut destination = self
            .locations
            .remove(to)
            .ok_or_else(|| SimError::LocationNotFound(to.to_string()))?;
        let result = match self.locations.get_mut(from) {
            Some(source) => {
                transfer(&mut source.root, &mut destination.root, instance).map_err(SimError::from)
            }
            None => Err(SimError::LocationNotFound(from.to_string())),
        };
        self.locations.insert(to.to_string(), destination);
        result
    }

    /// Add `target` to the fight set of `attacker`. Both must be living
    /// characters in the same location.
    pub fn add_fight_opponent(
        &mut self,
        location: &str,
        attacker: InstanceId,
        target: InstanceId,
    ) -> SimResult<()> {
        let location_id = location;
        let location = self.require_location_mut(location_id)?;
        let not_found = |instance| SimError::ObjectNotFound {
            location: location_id.to_string(),
            instance,
        };

        let target_object = location
            .root
            .get_instance(target)
            .ok_or_else(|| not_found(target))?;
        if target_object.as_character().is_none() || attacker == target {
            return Err(SimError::NotACharacter(target_object.name.clone()));
        }

        let attacker_object = location
            .root
            .get_instance_mut(attacker)
            .ok_or_else(|| not_found(attacker))?;
        let name = attacker_object.name.clone();
        let character = attacker_object
            .as_character_mut()
            .ok_or(SimError::NotACharacter(name))?;
        character.add_fight_opponent(target);
        Ok(())
    }
}
