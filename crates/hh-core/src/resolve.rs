//! Per-type resolvers: record in, live object out.
//!
//! [`resolve`] always runs the base resolution (identity, text, dimensions,
//! weight) before handing the object to a type resolver, so no type can end
//! up with unparsed magnitudes.

use chrono::TimeDelta;
use tracing::warn;

use crate::container::{Capacity, Container};
use crate::error::{CoreError, CoreResult};
use crate::kinds::armour::parse_reduction;
use crate::kinds::door::DEFAULT_DOOR_WEIGHT_KG;
use crate::kinds::{Armour, Attack, Character, Door, Food, Weapon};
use crate::location::{Direction, Exit, Location};
use crate::object::{LiveObject, ObjectKind};
use crate::record::{CapacityRecord, ObjectRecord};
use crate::units;

/// Fills in the type-specific part of an already base-resolved object.
pub type ObjectResolver = fn(LiveObject, &ObjectRecord) -> CoreResult<LiveObject>;

/// Resolve `record` as object `id` using `resolver` for the type-specific
/// part.
///
/// Objects with a zero dimension are still built, but a warning is logged:
/// the size check cannot do its job for them.
pub fn resolve(record: &ObjectRecord, id: &str, resolver: ObjectResolver) -> CoreResult<LiveObject> {
    let base = LiveObject::from_record(record, id)?;
    let object = resolver(base, record)?;
    if let Some(problem) = size_problem(&object) {
        warn!(object = %object.id, "{problem}");
    }
    Ok(object)
}

fn size_problem(object: &LiveObject) -> Option<&'static str> {
    if !object.dimensions.is_degenerate() {
        return None;
    }
    Some(match object.kind {
        ObjectKind::Container(_) => "container has a zero dimension and will not fit anything",
        _ => "object has a zero dimension and will fit into containers it should not",
    })
}

/// Plain objects: nothing beyond the base.
pub fn resolve_item(object: LiveObject, _record: &ObjectRecord) -> CoreResult<LiveObject> {
    Ok(object)
}

/// Containers: a `Capacity` is required.
pub fn resolve_container(object: LiveObject, record: &ObjectRecord) -> CoreResult<LiveObject> {
    let capacity = record
        .capacity
        .as_ref()
        .ok_or_else(|| CoreError::configuration(&object.id, "containers need a Capacity"))?;
    let capacity = resolve_capacity(&object.id, capacity)?;
    Ok(object.with_kind(ObjectKind::Container(Container::new(capacity))))
}

/// Doors: heavy unless a weight is given, and always answer to "door".
/// A door with a key starts locked unless `Locked` says otherwise.
pub fn resolve_door(mut object: LiveObject, record: &ObjectRecord) -> CoreResult<LiveObject> {
    if record.weight.is_none() {
        object.weight = DEFAULT_DOOR_WEIGHT_KG;
    }
    if !object.answers_to("door") {
        object.aliases.push("door".to_string());
    }
    let door = Door {
        key_id: record.key_id.clone(),
        locked: record.locked.unwrap_or(record.key_id.is_some()),
    };
    Ok(object.with_kind(ObjectKind::Door(door)))
}

/// Armour: a malformed `Reduction` is fatal.
pub fn resolve_armour(object: LiveObject, record: &ObjectRecord) -> CoreResult<LiveObject> {
    let reduction = match &record.reduction {
        Some(raw) => parse_reduction(&object.id, raw)?,
        None => 0.0,
    };
    let max_hp = record.max_hp.or(record.hp).unwrap_or(0).max(0);
    let armour = Armour {
        reduction,
        hp: record.hp.unwrap_or(max_hp).clamp(0, max_hp),
        max_hp,
    };
    Ok(object.with_kind(ObjectKind::Armour(armour)))
}

/// Weapons: attacks with malformed damage deal none.
pub fn resolve_weapon(object: LiveObject, record: &ObjectRecord) -> CoreResult<LiveObject> {
    let attacks = record
        .attacks
        .iter()
        .map(|a| Attack::from_record(&object.id, a))
        .collect();
    Ok(object.with_kind(ObjectKind::Weapon(Weapon { attacks })))
}

/// Food.
pub fn resolve_food(object: LiveObject, record: &ObjectRecord) -> CoreResult<LiveObject> {
    let food = Food {
        restores: record.restores.unwrap_or(0),
    };
    Ok(object.with_kind(ObjectKind::Food(food)))
}

/// Characters: HP is capped at the maximum and dexterity at 100.
/// A negative or non-finite `AttackInterval` is rejected.
pub fn resolve_character(object: LiveObject, record: &ObjectRecord) -> CoreResult<LiveObject> {
    let defaults = Character::default();
    let max_hp = record.max_hp.or(record.hp).unwrap_or(defaults.max_hp);
    let hp = record.hp.unwrap_or(max_hp).min(max_hp);

    let interval = record.attack_interval.unwrap_or(1.0);
    if !interval.is_finite() || interval < 0.0 {
        return Err(CoreError::configuration(
            &object.id,
            format!("AttackInterval {interval} must be a non-negative number of seconds"),
        ));
    }

    let inventory = match &record.capacity {
        Some(capacity) => Container::new(resolve_capacity(&object.id, capacity)?),
        None => Container::unbounded(),
    };

    let character = Character {
        hp,
        max_hp,
        dexterity: record.dexterity.unwrap_or(defaults.dexterity).min(100),
        attacks: record
            .attacks
            .iter()
            .map(|a| Attack::from_record(&object.id, a))
            .collect(),
        attack_interval: TimeDelta::try_milliseconds((interval * 1000.0).round() as i64)
            .unwrap_or(TimeDelta::MAX),
        next_attack: None,
        fighting: Vec::new(),
        inventory,
    };
    Ok(object.with_kind(ObjectKind::Character(character)))
}

/// Resolve a location's own fields. Starting contents are added by the
/// caller, which knows how to create objects by ID.
pub fn resolve_location(record: &ObjectRecord, id: &str) -> CoreResult<Location> {
    let name = record.name.clone().unwrap_or_else(|| id.to_string());
    let mut location = Location::new(id, name);
    location.description = record.description.lines();

    for exit in &record.exits {
        let direction = Direction::parse(&exit.direction).ok_or_else(|| {
            CoreError::configuration(id, format!("unknown exit direction \"{}\"", exit.direction))
        })?;
        if location.exit(direction).is_some() {
            return Err(CoreError::configuration(
                id,
                format!("more than one exit leads {direction}"),
            ));
        }
        location.exits.push(Exit {
            direction,
            destination: exit.to.clone(),
            door: exit.door.clone(),
        });
    }
    Ok(location)
}

fn resolve_capacity(id: &str, capacity: &CapacityRecord) -> CoreResult<Capacity> {
    let weight_kg = units::parse_weight(&capacity.weight).map_err(|source| CoreError::Unit {
        id: id.to_string(),
        field: "Capacity.Weight",
        source,
    })?;
    Ok(Capacity::new(capacity.items, weight_kg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectClass;
    use crate::record::{AttackRecord, ExitRecord};

    fn record(json: &str) -> ObjectRecord {
        ObjectRecord::from_json(json).unwrap()
    }

    #[test]
    fn container_resolves_capacity_and_dimensions() {
        let rec = record(
            r#"{ "ObjectType": "Container", "Name": "crate",
                 "Height": "0.6", "Width": "0.4", "Depth": "0.3",
                 "Capacity": { "Items": 1, "Weight": "5kg" } }"#,
        );
        let object = resolve(&rec, "crate", resolve_container).unwrap();
        let container = object.container().unwrap();
        assert_eq!(container.capacity.items, 1);
        assert!((container.capacity.weight_kg - 5.0).abs() < 1e-9);
        assert_eq!(object.dimensions.sorted_desc(), [0.6, 0.4, 0.3]);
    }

    #[test]
    fn container_without_capacity_is_rejected() {
        let rec = record(r#"{ "ObjectType": "Container" }"#);
        let err = resolve(&rec, "crate", resolve_container).unwrap_err();
        assert_eq!(err.object_id(), "crate");
    }

    #[test]
    fn door_defaults_heavy_and_gains_alias() {
        let rec = record(r#"{ "ObjectType": "Door", "Name": "oak door", "KeyID": "brass_key" }"#);
        let door = resolve(&rec, "oak_door", resolve_door).unwrap();
        assert!((door.weight - DEFAULT_DOOR_WEIGHT_KG).abs() < 1e-9);
        assert!(door.answers_to("door"));
        assert!(door.as_door().unwrap().locked);

        let light = record(r#"{ "ObjectType": "Door", "Weight": "20kg", "Locked": false }"#);
        let door = resolve(&light, "screen", resolve_door).unwrap();
        assert!((door.weight - 20.0).abs() < 1e-9);
        assert!(!door.as_door().unwrap().locked);
    }

    #[test]
    fn armour_bad_percentage_is_fatal() {
        let rec = record(r#"{ "ObjectType": "Armour", "Reduction": "75" }"#);
        let err = resolve(&rec, "mail", resolve_armour).unwrap_err();
        assert!(matches!(err, CoreError::Configuration { ref id, .. } if id == "mail"));
    }

    #[test]
    fn armour_resolves_condition() {
        let rec = record(r#"{ "ObjectType": "Armour", "Reduction": "40%", "HP": 12 }"#);
        let object = resolve(&rec, "mail", resolve_armour).unwrap();
        match object.kind {
            ObjectKind::Armour(a) => {
                assert!((a.reduction - 0.4).abs() < 1e-9);
                assert_eq!((a.hp, a.max_hp), (12, 12));
            }
            other => panic!("expected armour, got {other:?}"),
        }
    }

    #[test]
    fn weapon_tolerates_bad_damage_strings() {
        let mut rec = ObjectRecord::new("Weapon");
        rec.attacks = vec![
            AttackRecord {
                name: "slash".into(),
                damage: "4-9".into(),
            },
            AttackRecord {
                name: "pommel".into(),
                damage: "nine".into(),
            },
        ];
        let object = resolve(&rec, "sword", resolve_weapon).unwrap();
        let ObjectKind::Weapon(weapon) = &object.kind else {
            panic!("expected weapon");
        };
        assert_eq!(weapon.attacks[0], Attack::new("slash", 4, 9));
        assert_eq!(weapon.attacks[1], Attack::new("pommel", 0, 0));
    }

    #[test]
    fn character_resolves_combat_fields() {
        let rec = record(
            r#"{ "ObjectType": "Character", "Name": "goblin", "HP": 12, "Dexterity": 140,
                 "AttackInterval": 2.5, "Attacks": [{ "Name": "stab", "Damage": "1-3" }],
                 "Height": "1m", "Width": "50cm", "Depth": "30cm",
                 "Capacity": { "Items": 3, "Weight": "10kg" } }"#,
        );
        let object = resolve(&rec, "goblin", resolve_character).unwrap();
        assert_eq!(object.class(), ObjectClass::Character);
        let c = object.as_character().unwrap();
        assert_eq!((c.hp, c.max_hp), (12, 12));
        assert_eq!(c.dexterity, 100);
        assert_eq!(c.attack_interval, TimeDelta::milliseconds(2500));
        assert_eq!(c.inventory.capacity.items, 3);
        assert_eq!(c.attacks.len(), 1);
    }

    #[test]
    fn character_rejects_negative_interval() {
        let rec = record(r#"{ "ObjectType": "Character", "AttackInterval": -1 }"#);
        assert!(resolve(&rec, "ghost", resolve_character).is_err());
    }

    #[test]
    fn every_resolver_runs_base_resolution() {
        let resolvers: [ObjectResolver; 6] = [
            resolve_item,
            resolve_door,
            resolve_armour,
            resolve_weapon,
            resolve_food,
            resolve_character,
        ];
        let mut rec = ObjectRecord::new("Any");
        rec.height = Some("1m".into());
        rec.width = Some("20cm".into());
        rec.depth = Some("5cm".into());
        for resolver in resolvers {
            let object = resolve(&rec, "thing", resolver).unwrap();
            assert_eq!(object.dimensions.sorted_desc(), [1.0, 0.2, 0.05]);
        }
    }

    #[test]
    fn zero_sized_objects_are_flagged() {
        let mut rec = ObjectRecord::new("Any");
        rec.capacity = Some(CapacityRecord {
            items: 2,
            weight: "1kg".into(),
        });
        let item = resolve(&rec, "speck", resolve_item).unwrap();
        assert!(size_problem(&item).is_some_and(|p| p.contains("will fit into")));
        let bag = resolve(&rec, "pouch", resolve_container).unwrap();
        assert!(size_problem(&bag).is_some_and(|p| p.contains("will not fit anything")));
        let rat = resolve(&rec, "rat", resolve_character).unwrap();
        assert!(size_problem(&rat).is_some());

        rec.height = Some("10cm".into());
        rec.width = Some("10cm".into());
        rec.depth = Some("1cm".into());
        let coin = resolve(&rec, "coin", resolve_item).unwrap();
        assert!(size_problem(&coin).is_none());
    }

    #[test]
    fn location_resolves_exits() {
        let mut rec = ObjectRecord::new("Location");
        rec.name = Some("Cellar".into());
        rec.exits = vec![ExitRecord {
            direction: "up".into(),
            to: "kitchen".into(),
            door: Some("trapdoor".into()),
        }];
        let cellar = resolve_location(&rec, "cellar").unwrap();
        assert_eq!(cellar.name, "Cellar");
        let exit = cellar.exit(Direction::Up).unwrap();
        assert_eq!(exit.destination, "kitchen");
        assert_eq!(exit.door.as_deref(), Some("trapdoor"));
    }

    #[test]
    fn location_rejects_bad_or_duplicate_exits() {
        let mut rec = ObjectRecord::new("Location");
        rec.exits = vec![ExitRecord {
            direction: "widdershins".into(),
            to: "x".into(),
            door: None,
        }];
        assert!(resolve_location(&rec, "odd").is_err());

        rec.exits = vec![
            ExitRecord {
                direction: "n".into(),
                to: "a".into(),
                door: None,
            },
            ExitRecord {
                direction: "north".into(),
                to: "b".into(),
                door: None,
            },
        ];
        assert!(resolve_location(&rec, "odd").is_err());
    }
}
