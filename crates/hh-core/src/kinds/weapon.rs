//! Weapons and the named attacks shared with characters.

use tracing::warn;

use crate::record::AttackRecord;

/// A named attack with an inclusive damage range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attack {
    /// Verb-like label used in narration, e.g. "slash".
    pub name: String,
    /// Lowest damage rolled.
    pub min_damage: i32,
    /// Highest damage rolled.
    pub max_damage: i32,
}

impl Attack {
    /// An attack dealing `min_damage..=max_damage`.
    pub fn new(name: impl Into<String>, min_damage: i32, max_damage: i32) -> Self {
        Self {
            name: name.into(),
            min_damage,
            max_damage,
        }
    }

    /// Resolve an authored attack. A malformed damage string is logged and
    /// leaves the attack doing no damage; the object is still usable.
    pub fn from_record(owner_id: &str, record: &AttackRecord) -> Self {
        match parse_damage(&record.damage) {
            Ok((min, max)) => Self::new(&record.name, min, max),
            Err(reason) => {
                warn!(
                    object = owner_id,
                    attack = %record.name,
                    damage = %record.damage,
                    %reason,
                    "malformed damage range; damage set to 0"
                );
                Self::new(&record.name, 0, 0)
            }
        }
    }

    /// Human-readable range, e.g. "4-9 damage".
    pub fn damage_label(&self) -> String {
        format!("{}-{} damage", self.min_damage, self.max_damage)
    }
}

/// Parse a `"min-max"` damage range into two non-negative integers.
pub fn parse_damage(raw: &str) -> Result<(i32, i32), String> {
    let (min, max) = raw
        .trim()
        .split_once('-')
        .ok_or_else(|| format!("expected \"min-max\", got \"{raw}\""))?;
    let min: i32 = min
        .trim()
        .parse()
        .map_err(|_| format!("invalid minimum in \"{raw}\""))?;
    let max: i32 = max
        .trim()
        .parse()
        .map_err(|_| format!("invalid maximum in \"{raw}\""))?;
    if min < 0 || max < min {
        return Err(format!("range \"{raw}\" is out of order"));
    }
    Ok((min, max))
}

/// A weapon's set of attacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Weapon {
    /// Attacks granted to whoever wields it.
    pub attacks: Vec<Attack>,
}
