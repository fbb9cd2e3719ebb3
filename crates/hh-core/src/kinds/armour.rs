//! Armour: damage reduction that wears down as it absorbs hits.

use crate::error::{CoreError, CoreResult};

/// Protective gear carried by a character.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Armour {
    /// Fraction of incoming damage absorbed, 0.0..=1.0.
    pub reduction: f64,
    /// Remaining condition. Each point of damage absorbed wears one off.
    pub hp: i32,
    /// Condition when new or repaired.
    pub max_hp: i32,
}

impl Armour {
    /// Restore full condition.
    pub fn repair(&mut self) {
        self.hp = self.max_hp;
    }

    /// Worn-out armour no longer protects.
    pub fn is_broken(&self) -> bool {
        self.hp <= 0
    }

    /// Absorb part of `damage`. Returns the damage that gets through and
    /// wears the armour down by the amount absorbed.
    pub fn absorb(&mut self, damage: i32) -> i32 {
        if self.is_broken() || damage <= 0 {
            return damage.max(0);
        }
        let absorbed = ((f64::from(damage) * self.reduction).round() as i32).min(self.hp);
        self.hp -= absorbed;
        damage - absorbed
    }
}

/// Parse a reduction such as `"75%"` into `0.75`.
///
/// The trailing `%` is required and the value must lie in 0..=100.
pub fn parse_reduction(id: &str, raw: &str) -> CoreResult<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').ok_or_else(|| {
        CoreError::configuration(id, format!("reduction \"{raw}\" must be a percentage like \"75%\""))
    })?;
    let value: f64 = number.trim().parse().map_err(|_| {
        CoreError::configuration(id, format!("reduction \"{raw}\" is not a number"))
    })?;
    if !(0.0..=100.0).contains(&value) {
        return Err(CoreError::configuration(
            id,
            format!("reduction \"{raw}\" must be between 0% and 100%"),
        ));
    }
    Ok(value / 100.0)
}
