//! Characters: HP, attacks, and the fight set.
//!
//! A character fights on a tick only when it has at least one opponent,
//! at least one attack, and its attack cooldown has elapsed. Every attempt
//! (hit or miss) restarts the cooldown.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rand::rngs::StdRng;

use crate::container::Container;
use crate::kinds::food::Food;
use crate::kinds::weapon::Attack;
use crate::object::{InstanceId, ObjectKind};

/// The outcome of one attack attempt, to be applied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackRoll {
    /// The opponent picked for this attack.
    pub target: InstanceId,
    /// Name of the attack used.
    pub attack: String,
    /// Whether the dexterity roll succeeded.
    pub hit: bool,
    /// Raw damage before armour; zero on a miss.
    pub damage: i32,
}

/// Combat state and inventory of a character.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    /// Current HP. Zero or below means dead.
    pub hp: i32,
    /// Ceiling for healing.
    pub max_hp: i32,
    /// Hit chance in percent, 0..=100.
    pub dexterity: u8,
    /// Attacks to pick from; a character without any never fights.
    pub attacks: Vec<Attack>,
    /// Cooldown between two attack attempts.
    pub attack_interval: TimeDelta,
    /// Earliest time of the next attack; `None` means immediately.
    pub next_attack: Option<DateTime<Utc>>,
    /// Opponents currently engaged, in the order they were added.
    pub fighting: Vec<InstanceId>,
    /// What the character carries.
    pub inventory: Container,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            hp: 10,
            max_hp: 10,
            dexterity: 50,
            attacks: Vec::new(),
            attack_interval: TimeDelta::seconds(1),
            next_attack: None,
            fighting: Vec::new(),
            inventory: Container::unbounded(),
        }
    }
}

impl Character {
    /// Dead once HP reaches zero.
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Whether any opponent is engaged.
    pub fn is_fighting(&self) -> bool {
        !self.fighting.is_empty()
    }

    /// Engage an opponent. Adding the same opponent twice has no effect.
    pub fn add_fight_opponent(&mut self, opponent: InstanceId) {
        if !self.fighting.contains(&opponent) {
            self.fighting.push(opponent);
        }
    }

    /// Stop fighting an opponent. Returns false if it was not engaged.
    pub fn disengage(&mut self, opponent: InstanceId) -> bool {
        let before = self.fighting.len();
        self.fighting.retain(|id| *id != opponent);
        self.fighting.len() != before
    }

    /// True if the cooldown has elapsed at `now`.
    pub fn can_attack_at(&self, now: DateTime<Utc>) -> bool {
        self.next_attack.is_none_or(|next| now >= next)
    }

    /// Attempt one attack. Picks an opponent and an attack uniformly at
    /// random; the attack hits when a roll in `0..100` is below dexterity.
    pub fn fight(&mut self, now: DateTime<Utc>, rng: &mut StdRng) -> Option<AttackRoll> {
        if self.is_dead()
            || self.fighting.is_empty()
            || self.attacks.is_empty()
            || !self.can_attack_at(now)
        {
            return None;
        }
        // Intervals past the end of the calendar mean "never again".
        self.next_attack = Some(
            now.checked_add_signed(self.attack_interval)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        );

        let target = self.fighting[rng.random_range(0..self.fighting.len())];
        let attack = &self.attacks[rng.random_range(0..self.attacks.len())];
        let roll: u8 = rng.random_range(0..100);
        let hit = roll < self.dexterity;
        let damage = if hit {
            let low = attack.min_damage.min(attack.max_damage);
            let high = attack.min_damage.max(attack.max_damage);
            rng.random_range(low..=high)
        } else {
            0
        };

        Some(AttackRoll {
            target,
            attack: attack.name.clone(),
            hit,
            damage,
        })
    }

    /// Take a hit. Carried armour absorbs part of it first; the best intact
    /// piece is used. Returns the damage actually dealt.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        let armour = self
            .inventory
            .contents
            .iter_mut()
            .filter_map(|object| match &mut object.kind {
                ObjectKind::Armour(armour) if !armour.is_broken() => Some(armour),
                _ => None,
            })
            .max_by(|a, b| a.reduction.total_cmp(&b.reduction));

        let dealt = match armour {
            Some(armour) => armour.absorb(damage),
            None => damage.max(0),
        };
        self.hp = self.hp.saturating_sub(dealt);
        dealt
    }

    /// Restore HP, capped at the maximum. Returns the amount gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount.max(0)).min(self.max_hp);
        self.hp.saturating_sub(before)
    }

    /// Eat `food`, healing by what it restores. Returns the amount gained.
    pub fn eat(&mut self, food: &Food) -> i32 {
        self.heal(food.restores)
    }

    /// Highest reduction among intact carried armour.
    pub fn damage_reduction(&self) -> f64 {
        self.inventory
            .contents
            .iter()
            .filter_map(|object| match &object.kind {
                ObjectKind::Armour(armour) if !armour.is_broken() => Some(armour.reduction),
                _ => None,
            })
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Armour;
    use crate::object::LiveObject;
    use chrono::TimeZone;
    use rand::SeedableRng;

    fn fighter() -> Character {
        Character {
            hp: 30,
            max_hp: 30,
            dexterity: 100,
            attacks: vec![Attack::new("punch", 10, 20)],
            attack_interval: TimeDelta::seconds(5),
            ..Default::default()
        }
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn idle_character_does_not_fight() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = fighter();
        assert!(c.fight(t(0), &mut rng).is_none());
        assert!(c.next_attack.is_none());
    }

    #[test]
    fn no_attacks_means_no_fight() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut c = Character {
            attacks: Vec::new(),
            ..fighter()
        };
        c.add_fight_opponent(InstanceId::new());
        assert!(c.fight(t(0), &mut rng).is_none());
    }

    #[test]
    fn cooldown_gates_attacks() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut c = fighter();
        let foe = InstanceId::new();
        c.add_fight_opponent(foe);

        let roll = c.fight(t(0), &mut rng).unwrap();
        assert_eq!(roll.target, foe);
        assert!(roll.hit);
        assert!((10..=20).contains(&roll.damage));
        assert_eq!(c.next_attack, Some(t(5)));

        assert!(c.fight(t(1), &mut rng).is_none());
        assert!(c.fight(t(4), &mut rng).is_none());
        assert!(c.fight(t(5), &mut rng).is_some());
        assert_eq!(c.next_attack, Some(t(10)));
    }

    #[test]
    fn zero_dexterity_always_misses_but_still_cools_down() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = Character {
            dexterity: 0,
            ..fighter()
        };
        c.add_fight_opponent(InstanceId::new());
        for i in 0..20 {
            let roll = c.fight(t(i * 5), &mut rng).unwrap();
            assert!(!roll.hit);
            assert_eq!(roll.damage, 0);
        }
    }

    #[test]
    fn dead_characters_do_not_fight() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut c = fighter();
        c.add_fight_opponent(InstanceId::new());
        c.hp = 0;
        assert!(c.is_dead());
        assert!(c.fight(t(0), &mut rng).is_none());
    }

    #[test]
    fn fight_set_has_no_duplicates() {
        let mut c = fighter();
        let foe = InstanceId::new();
        c.add_fight_opponent(foe);
        c.add_fight_opponent(foe);
        assert_eq!(c.fighting.len(), 1);
        assert!(c.disengage(foe));
        assert!(!c.disengage(foe));
        assert!(!c.is_fighting());
    }

    #[test]
    fn armour_reduces_damage() {
        let mut c = fighter();
        let vest = LiveObject::new("vest", "leather vest").with_kind(ObjectKind::Armour(Armour {
            reduction: 0.25,
            hp: 20,
            max_hp: 20,
        }));
        let plate = LiveObject::new("plate", "plate").with_kind(ObjectKind::Armour(Armour {
            reduction: 0.5,
            hp: 20,
            max_hp: 20,
        }));
        c.inventory.contents.push(vest);
        c.inventory.contents.push(plate);
        assert!((c.damage_reduction() - 0.5).abs() < 1e-9);

        assert_eq!(c.take_damage(10), 5);
        assert_eq!(c.hp, 25);
    }

    #[test]
    fn heal_is_capped() {
        let mut c = fighter();
        c.take_damage(12);
        assert_eq!(c.hp, 18);
        assert_eq!(c.eat(&Food { restores: 50 }), 12);
        assert_eq!(c.hp, 30);
        assert_eq!(c.heal(-5), 0);
    }

    #[test]
    fn huge_values_saturate() {
        let mut c = fighter();
        c.hp = 5;
        assert_eq!(c.eat(&Food { restores: i32::MAX }), 25);
        assert_eq!(c.hp, 30);

        c.take_damage(i32::MAX);
        c.take_damage(i32::MAX);
        assert_eq!(c.hp, i32::MIN);
        assert!(c.is_dead());
    }

    #[test]
    fn endless_cooldown_does_not_overflow() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut c = Character {
            attack_interval: TimeDelta::MAX,
            ..fighter()
        };
        c.add_fight_opponent(InstanceId::new());
        assert!(c.fight(t(0), &mut rng).is_some());
        assert_eq!(c.next_attack, Some(DateTime::<Utc>::MAX_UTC));
        assert!(c.fight(t(1_000_000), &mut rng).is_none());
    }
}
