use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::container::Container;
use crate::error::{CoreError, CoreResult};
use crate::kinds::{Armour, Character, Door, Food, Weapon};
use crate::record::ObjectRecord;
use crate::units;

/// Identity of one live object.
///
/// Record IDs are shared by every object stamped from the same template;
/// instance IDs are unique per object, so two bags from one record stay
/// distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    /// Generate a new random instance ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Physical extent in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    /// Height in meters.
    pub height: f64,
    /// Width in meters.
    pub width: f64,
    /// Depth in meters.
    pub depth: f64,
}

impl Dimensions {
    /// Extents in meters, in no particular order.
    pub fn new(height: f64, width: f64, depth: f64) -> Self {
        Self {
            height,
            width,
            depth,
        }
    }

    /// Extent that fits anything; used for location roots.
    pub fn unbounded() -> Self {
        Self::new(f64::INFINITY, f64::INFINITY, f64::INFINITY)
    }

    /// The three extents, largest first.
    pub fn sorted_desc(&self) -> [f64; 3] {
        let mut dims = [self.height, self.width, self.depth];
        dims.sort_by(|a, b| b.total_cmp(a));
        dims
    }

    /// True if any extent is zero.
    pub fn is_degenerate(&self) -> bool {
        self.height <= 0.0 || self.width <= 0.0 || self.depth <= 0.0
    }
}

/// Type-specific state of a live object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    /// A plain object with no behavior beyond the base fields.
    Item,
    /// Holds other objects within limits.
    Container(Container),
    /// Gates an exit; lives at world level.
    Door(Door),
    /// Absorbs damage when carried.
    Armour(Armour),
    /// Provides attacks.
    Weapon(Weapon),
    /// Restores HP when eaten.
    Food(Food),
    /// Fights, carries an inventory, and can die.
    Character(Character),
}

/// Discriminant of [`ObjectKind`], used to request a specific variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    /// See [`ObjectKind::Item`].
    Item,
    /// See [`ObjectKind::Container`].
    Container,
    /// See [`ObjectKind::Door`].
    Door,
    /// See [`ObjectKind::Armour`].
    Armour,
    /// See [`ObjectKind::Weapon`].
    Weapon,
    /// See [`ObjectKind::Food`].
    Food,
    /// See [`ObjectKind::Character`].
    Character,
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Item => "object",
            Self::Container => "container",
            Self::Door => "door",
            Self::Armour => "armour",
            Self::Weapon => "weapon",
            Self::Food => "food",
            Self::Character => "character",
        };
        write!(f, "{name}")
    }
}

impl ObjectKind {
    /// Which variant this is.
    pub fn class(&self) -> ObjectClass {
        match self {
            Self::Item => ObjectClass::Item,
            Self::Container(_) => ObjectClass::Container,
            Self::Door(_) => ObjectClass::Door,
            Self::Armour(_) => ObjectClass::Armour,
            Self::Weapon(_) => ObjectClass::Weapon,
            Self::Food(_) => ObjectClass::Food,
            Self::Character(_) => ObjectClass::Character,
        }
    }
}

/// A resolved, mutable runtime object.
///
/// Dimensions and weight are always numeric; a live object is never seen
/// holding the raw magnitude strings of its record.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveObject {
    /// Unique identity of this instance.
    pub instance: InstanceId,
    /// ID of the record this object was stamped from.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Additional names the object answers to.
    pub aliases: Vec<String>,
    /// Short description lines.
    pub description: Vec<String>,
    /// Detailed text shown on close inspection.
    pub examine: Vec<String>,
    /// Extent in meters.
    pub dimensions: Dimensions,
    /// Own weight in kilograms, excluding anything held.
    pub weight: f64,
    /// Type-specific state.
    pub kind: ObjectKind,
}

impl LiveObject {
    /// Create a plain object with zero extent and weight.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            instance: InstanceId::new(),
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
            description: Vec::new(),
            examine: Vec::new(),
            dimensions: Dimensions::default(),
            weight: 0.0,
            kind: ObjectKind::Item,
        }
    }

    /// Base resolution shared by every object type: identity, text, and the
    /// numeric dimensions and weight. Missing magnitudes resolve to zero.
    pub fn from_record(record: &ObjectRecord, id: &str) -> CoreResult<Self> {
        let magnitude = |field: &'static str,
                         raw: &Option<String>,
                         parse: fn(&str) -> units::UnitResult<f64>|
         -> CoreResult<f64> {
            match raw {
                Some(raw) => parse(raw).map_err(|source| CoreError::Unit {
                    id: id.to_string(),
                    field,
                    source,
                }),
                None => Ok(0.0),
            }
        };

        let dimensions = Dimensions::new(
            magnitude("Height", &record.height, units::parse_length)?,
            magnitude("Width", &record.width, units::parse_length)?,
            magnitude("Depth", &record.depth, units::parse_length)?,
        );
        let weight = magnitude("Weight", &record.weight, units::parse_weight)?;

        Ok(Self {
            instance: InstanceId::new(),
            id: id.to_string(),
            name: record.name.clone().unwrap_or_else(|| id.to_string()),
            aliases: record.aliases.clone(),
            description: record.description.lines(),
            examine: record.examine.lines(),
            dimensions,
            weight,
            kind: ObjectKind::Item,
        })
    }

    /// Set the extents, in meters.
    pub fn with_dimensions(mut self, height: f64, width: f64, depth: f64) -> Self {
        self.dimensions = Dimensions::new(height, width, depth);
        self
    }

    /// Set the own weight, in kilograms.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the type-specific state.
    pub fn with_kind(mut self, kind: ObjectKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add a name the object also answers to.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Which kind of object this is.
    pub fn class(&self) -> ObjectClass {
        self.kind.class()
    }

    /// True if `name` matches the display name or an alias, ignoring case.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Character state, if this is a character.
    pub fn as_character(&self) -> Option<&Character> {
        match &self.kind {
            ObjectKind::Character(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable character state, if this is a character.
    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match &mut self.kind {
            ObjectKind::Character(c) => Some(c),
            _ => None,
        }
    }

    /// Door state, if this is a door.
    pub fn as_door(&self) -> Option<&Door> {
        match &self.kind {
            ObjectKind::Door(d) => Some(d),
            _ => None,
        }
    }

    /// True for characters whose HP has run out.
    pub fn is_dead_character(&self) -> bool {
        self.as_character().is_some_and(Character::is_dead)
    }

    /// Text shown on "look": description plus type-specific state.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = self.description.clone();
        match &self.kind {
            ObjectKind::Item | ObjectKind::Food(_) => {}
            ObjectKind::Container(_) => lines.extend(self.list_contents("")),
            ObjectKind::Door(door) => {
                let state = if door.locked { "locked" } else { "unlocked" };
                lines.push(format!("The {} is {state}.", self.name));
            }
            ObjectKind::Armour(armour) => {
                lines.push(format!(
                    "It absorbs {:.0}% of incoming damage ({}/{} condition).",
                    armour.reduction * 100.0,
                    armour.hp,
                    armour.max_hp
                ));
            }
            ObjectKind::Weapon(weapon) => {
                for attack in &weapon.attacks {
                    lines.push(format!("{}: {}", attack.name, attack.damage_label()));
                }
            }
            ObjectKind::Character(character) => {
                lines.push(format!(
                    "{} has {}/{} HP.",
                    self.name, character.hp, character.max_hp
                ));
                if !character.inventory.contents.is_empty() {
                    lines.extend(self.list_contents(""));
                }
            }
        }
        lines
    }

    /// Text shown on "examine", falling back to the description.
    pub fn examine_text(&self) -> Vec<String> {
        if self.examine.is_empty() {
            self.describe()
        } else {
            self.examine.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_id_display_shows_short_form() {
        let id = InstanceId(Uuid::parse_str("a3f2b1c8-1234-5678-9abc-def012345678").unwrap());
        assert_eq!(id.to_string(), "a3f2b1c8");
    }

    #[test]
    fn sorted_dimensions_are_descending() {
        let dims = Dimensions::new(0.3, 0.6, 0.4);
        assert_eq!(dims.sorted_desc(), [0.6, 0.4, 0.3]);
    }

    #[test]
    fn base_resolution_parses_magnitudes() {
        let mut record = ObjectRecord::new("Object");
        record.name = Some("lantern".into());
        record.height = Some("30cm".into());
        record.width = Some("20cm".into());
        record.depth = Some("200mm".into());
        record.weight = Some("1.5kg".into());

        let object = LiveObject::from_record(&record, "lantern").unwrap();
        assert_eq!(object.name, "lantern");
        assert!((object.dimensions.height - 0.3).abs() < 1e-9);
        assert!((object.dimensions.depth - 0.2).abs() < 1e-9);
        assert!((object.weight - 1.5).abs() < 1e-9);
        assert_eq!(object.class(), ObjectClass::Item);
    }

    #[test]
    fn name_defaults_to_id() {
        let record = ObjectRecord::new("Object");
        let object = LiveObject::from_record(&record, "pebble").unwrap();
        assert_eq!(object.name, "pebble");
        assert!(object.dimensions.is_degenerate());
    }

    #[test]
    fn bad_magnitude_names_object_and_field() {
        let mut record = ObjectRecord::new("Object");
        record.weight = Some("heavy".into());
        let err = LiveObject::from_record(&record, "anvil").unwrap_err();
        assert_eq!(err.object_id(), "anvil");
        assert!(err.to_string().contains("Weight"));
    }

    #[test]
    fn answers_to_name_and_alias() {
        let object = LiveObject::new("bag", "Bag").with_alias("sack");
        assert!(object.answers_to("bag"));
        assert!(object.answers_to("SACK"));
        assert!(!object.answers_to("box"));
    }
}
