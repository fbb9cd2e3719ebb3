//! Object records: the immutable templates live objects are stamped from.

use serde::{Deserialize, Serialize};

/// Free text that may be authored as one string or as a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextBlock {
    /// A single string, split on newlines when read.
    Text(String),
    /// Explicit lines.
    Lines(Vec<String>),
}

impl Default for TextBlock {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl TextBlock {
    /// The text as individual lines.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Text(text) => text.lines().map(str::to_string).collect(),
            Self::Lines(lines) => lines.clone(),
        }
    }

    /// True if there is no text besides whitespace.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Lines(lines) => lines.iter().all(|l| l.trim().is_empty()),
        }
    }
}

/// Item and weight limits of a container, as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapacityRecord {
    /// Most objects held at once.
    pub items: usize,
    /// Weight limit as a magnitude string, e.g. `"5kg"`.
    pub weight: String,
}

/// A named attack with a `"min-max"` damage string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttackRecord {
    /// Label used in narration.
    pub name: String,
    /// Damage range, e.g. `"4-9"`.
    pub damage: String,
}

/// A directional exit, optionally gated by a door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExitRecord {
    /// Direction name or abbreviation.
    pub direction: String,
    /// ID of the destination location.
    pub to: String,
    /// ID of the door gating the exit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door: Option<String>,
}

/// One data-defined object definition.
///
/// Only `ObjectType` is required. Which of the remaining fields matter
/// depends on the declared type; unused ones are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectRecord {
    /// Explicit ID. Defaults to the file stem.
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Type tag that picks the resolver.
    pub object_type: String,
    /// Display name. Defaults to the ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extra names the object answers to.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Short description.
    #[serde(default)]
    pub description: TextBlock,
    /// Text shown on close inspection.
    #[serde(default)]
    pub examine: TextBlock,

    // Raw magnitudes, resolved through `units`.
    /// Height, e.g. `"30cm"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    /// Width, e.g. `"30cm"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    /// Depth, e.g. `"30cm"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    /// Own weight, e.g. `"2kg"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    // Containers, characters, locations
    /// Item and weight limits of a holder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<CapacityRecord>,
    /// IDs of the starting contents, repeated for several copies.
    #[serde(default)]
    pub contents: Vec<String>,

    // Doors
    /// ID of the key that opens a door.
    #[serde(rename = "KeyID", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// Initial lock state; defaults to locked when a key is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    // Armour
    /// Damage reduction as a percentage, e.g. `"25%"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduction: Option<String>,

    // Armour and characters
    /// Starting HP or armour condition.
    #[serde(rename = "HP", default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    /// Maximum HP; defaults to `HP`.
    #[serde(rename = "MaxHP", default, skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,

    // Characters and weapons
    /// Hit chance in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dexterity: Option<u8>,
    /// Seconds between attacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_interval: Option<f64>,
    /// Named attacks with damage ranges.
    #[serde(default)]
    pub attacks: Vec<AttackRecord>,

    // Food
    /// HP restored when eaten.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restores: Option<i32>,

    // Locations
    /// Ways out of a location.
    #[serde(default)]
    pub exits: Vec<ExitRecord>,
}

impl ObjectRecord {
    /// Create a record of the given type with everything else defaulted.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            ..Default::default()
        }
    }

    /// Parse a record from JSON.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}
