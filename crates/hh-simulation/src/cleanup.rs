use std::any::Any;

use hh_core::{InstanceId, LiveObject, Location};
use tracing::debug;

use crate::context::{Narration, SimContext};
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Removes dead characters after combat has run. Each body's inventory is
/// dropped on the floor of its location, and the dead are struck from every
/// surviving character's fight set.
#[derive(Debug, Default)]
pub struct CleanupSystem;

impl CleanupSystem {
    /// A cleanup system.
    pub fn new() -> Self {
        Self
    }
}

impl System for CleanupSystem {
    fn name(&self) -> &str {
        "cleanup"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let mut dead = Vec::new();
        ctx.update_locations(|location, _, _| {
            let narration = cleanup_location(location);
            dead.extend(narration.iter().filter_map(|(kind, _)| match kind {
                SimEventKind::Died { character } => Some(*character),
                _ => None,
            }));
            narration
        });

        if !dead.is_empty() {
            debug!(count = dead.len(), "removed dead characters");
            for id in ctx.world.location_ids() {
                if let Some(location) = ctx.world.location_mut(&id) {
                    forget_opponents(&mut location.root, &dead);
                }
            }
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

/// Remove every dead character in `location`, wherever it is held, and
/// drop what it carried on the location floor.
pub fn cleanup_location(location: &mut Location) -> Narration {
    let dead: Vec<InstanceId> = location
        .characters()
        .into_iter()
        .filter(|c| c.is_dead_character())
        .map(|c| c.instance)
        .collect();

    let mut narration = Vec::new();
    for instance in dead {
        let Some(mut body) = location.root.detach(instance) else {
            continue;
        };
        let dropped = body.remove_all();
        narration.push((
            SimEventKind::Died {
                character: instance,
            },
            format!("{} dies.", capitalized(&body.name)),
        ));

        if !dropped.is_empty() {
            let names: Vec<&str> = dropped.iter().map(|o| o.name.as_str()).collect();
            narration.push((
                SimEventKind::Dropped {
                    character: instance,
                    objects: dropped.iter().map(|o| o.instance).collect(),
                },
                format!("{} drops {}.", capitalized(&body.name), names.join(", ")),
            ));
        }
        location.drop_all(dropped);
    }
    narration
}

/// Strike `dead` from the fight set of every character at or below `root`.
fn forget_opponents(root: &mut LiveObject, dead: &[InstanceId]) {
    if let Some(character) = root.as_character_mut() {
        character.fighting.retain(|id| !dead.contains(id));
    }
    if let Some(container) = root.container_mut() {
        for object in &mut container.contents {
            forget_opponents(object, dead);
        }
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
