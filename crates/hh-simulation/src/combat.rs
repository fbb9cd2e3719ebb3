use std::any::Any;

use chrono::{DateTime, Utc};
use hh_core::{InstanceId, Location};
use rand::rngs::StdRng;
use tracing::debug;

use crate::context::{Narration, SimContext};
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Runs every character's update once per tick: prune opponents that are
/// gone, then attack if the cooldown allows it.
#[derive(Debug, Default)]
pub struct CombatSystem;

impl CombatSystem {
    /// A combat system.
    pub fn new() -> Self {
        Self
    }
}

impl System for CombatSystem {
    fn name(&self) -> &str {
        "combat"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let emitted = ctx.update_locations(update_location);
        if emitted > 0 {
            debug!(tick = ctx.tick(), events = emitted, "combat round");
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Update every object in `location` once.
///
/// The set of objects to update is taken before anything runs, so an object
/// that is moved in or out of the location by another object's update does
/// not change who acts this tick. Objects that have vanished by the time
/// their turn comes are skipped.
pub fn update_location(
    location: &mut Location,
    now: DateTime<Utc>,
    rng: &mut StdRng,
) -> Narration {
    let mut narration = Vec::new();
    for instance in location.root.descendants() {
        update_character(location, instance, now, rng, &mut narration);
    }
    narration
}

fn update_character(
    location: &mut Location,
    instance: InstanceId,
    now: DateTime<Utc>,
    rng: &mut StdRng,
    narration: &mut Narration,
) {
    let opponents = match location.root.get_instance(instance) {
        Some(object) => match object.as_character() {
            Some(character) if !character.is_dead() => character.fighting.clone(),
            _ => return,
        },
        None => return,
    };

    let gone: Vec<InstanceId> = opponents
        .into_iter()
        .filter(|opponent| {
            !location
                .root
                .get_instance(*opponent)
                .is_some_and(|o| o.as_character().is_some_and(|c| !c.is_dead()))
        })
        .collect();

    let Some(attacker) = location.root.get_instance_mut(instance) else {
        return;
    };
    let attacker_name = attacker.name.clone();
    let Some(character) = attacker.as_character_mut() else {
        return;
    };
    for opponent in &gone {
        character.disengage(*opponent);
    }
    let roll = character.fight(now, rng);

    for opponent in gone {
        narration.push((
            SimEventKind::Disengaged {
                character: instance,
                opponent,
            },
            format!("{attacker_name} stops fighting."),
        ));
    }

    let Some(roll) = roll else {
        return;
    };
    let Some(target) = location.root.get_instance_mut(roll.target) else {
        return;
    };
    let target_name = target.name.clone();

    if !roll.hit {
        narration.push((
            SimEventKind::AttackMissed {
                attacker: instance,
                target: roll.target,
                attack: roll.attack.clone(),
            },
            format!(
                "{attacker_name} tries to {} {target_name} but misses.",
                roll.attack
            ),
        ));
        return;
    }

    let dealt = target
        .as_character_mut()
        .map_or(0, |defender| defender.take_damage(roll.damage));
    let mut line = format!(
        "{attacker_name} uses {} on {target_name} for {dealt} damage.",
        roll.attack
    );
    if target.is_dead_character() {
        line.push_str(&format!(" {target_name} falls."));
    }
    narration.push((
        SimEventKind::AttackHit {
            attacker: instance,
            target: roll.target,
            attack: roll.attack,
            damage: dealt,
        },
        line,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use hh_core::{Armour, Attack, Character, LiveObject, ObjectKind};
    use rand::SeedableRng;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn fighter(name: &str, dexterity: u8, interval: i64) -> LiveObject {
        LiveObject::new(name, name).with_kind(ObjectKind::Character(Character {
            hp: 30,
            max_hp: 30,
            dexterity,
            attacks: vec![Attack::new("punch", 10, 20)],
            attack_interval: TimeDelta::seconds(interval),
            ..Default::default()
        }))
    }

    fn arena(a: LiveObject, b: LiveObject) -> (Location, InstanceId, InstanceId) {
        let (ia, ib) = (a.instance, b.instance);
        let mut location = Location::new("arena", "Arena");
        location.drop_all(vec![a, b]);
        (location, ia, ib)
    }

    fn hp(location: &Location, instance: InstanceId) -> i32 {
        location
            .root
            .get_instance(instance)
            .and_then(LiveObject::as_character)
            .map(|c| c.hp)
            .unwrap()
    }

    fn engage(location: &mut Location, attacker: InstanceId, target: InstanceId) {
        location
            .root
            .get_instance_mut(attacker)
            .and_then(LiveObject::as_character_mut)
            .unwrap()
            .add_fight_opponent(target);
    }

    #[test]
    fn attack_then_cooldown() {
        let mut rng = StdRng::seed_from_u64(5);
        let (mut arena, a, b) = arena(fighter("a", 100, 5), fighter("b", 100, 5));
        engage(&mut arena, a, b);

        let events = update_location(&mut arena, t(0), &mut rng);
        assert_eq!(events.len(), 1);
        let SimEventKind::AttackHit { damage, .. } = &events[0].0 else {
            panic!("expected a hit, got {:?}", events[0]);
        };
        assert!((10..=20).contains(damage));
        assert_eq!(hp(&arena, b), 30 - damage);

        let events = update_location(&mut arena, t(1), &mut rng);
        assert!(events.is_empty());
        assert_eq!(hp(&arena, b), 30 - damage);
    }

    #[test]
    fn misses_are_narrated_without_damage() {
        let mut rng = StdRng::seed_from_u64(5);
        let (mut arena, a, b) = arena(fighter("a", 0, 1), fighter("b", 0, 1));
        engage(&mut arena, a, b);

        let events = update_location(&mut arena, t(0), &mut rng);
        assert!(matches!(events[0].0, SimEventKind::AttackMissed { .. }));
        assert!(events[0].1.contains("misses"));
        assert_eq!(hp(&arena, b), 30);
    }

    #[test]
    fn armour_on_the_defender_reduces_damage() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut attacker = fighter("a", 100, 5);
        if let ObjectKind::Character(c) = &mut attacker.kind {
            c.attacks = vec![Attack::new("smash", 10, 10)];
        }
        let mut defender = fighter("b", 100, 5);
        defender
            .add(LiveObject::new("shield", "shield").with_kind(ObjectKind::Armour(Armour {
                reduction: 0.5,
                hp: 100,
                max_hp: 100,
            })))
            .unwrap();
        let (mut arena, a, b) = arena(attacker, defender);
        engage(&mut arena, a, b);

        update_location(&mut arena, t(0), &mut rng);
        assert_eq!(hp(&arena, b), 25);
    }

    #[test]
    fn absent_opponents_are_disengaged() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut arena, a, b) = arena(fighter("a", 100, 1), fighter("b", 100, 1));
        engage(&mut arena, a, b);
        arena.root.remove(b).unwrap();

        let events = update_location(&mut arena, t(0), &mut rng);
        assert_eq!(
            events[0].0,
            SimEventKind::Disengaged {
                character: a,
                opponent: b
            }
        );
        let character = arena.root.get_instance(a).and_then(LiveObject::as_character).unwrap();
        assert!(!character.is_fighting());
        assert!(character.next_attack.is_none());
    }

    #[test]
    fn objects_are_updated_as_of_the_tick_start() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut arena, a, b) = arena(fighter("a", 100, 1), fighter("b", 100, 1));
        engage(&mut arena, a, b);
        engage(&mut arena, b, a);
        // One hit from either side is enough to kill.
        for id in [a, b] {
            arena
                .root
                .get_instance_mut(id)
                .and_then(LiveObject::as_character_mut)
                .unwrap()
                .hp = 1;
        }

        let events = update_location(&mut arena, t(0), &mut rng);
        // `a` acts first and kills `b`, who does not get to strike back.
        assert_eq!(events.len(), 1);
        assert!(events[0].1.ends_with("falls."));
        assert!(hp(&arena, b) <= 0);
        assert_eq!(hp(&arena, a), 1);
    }
}
