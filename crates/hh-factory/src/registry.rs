use std::collections::HashMap;

use hh_core::resolve::{
    ObjectResolver, resolve_armour, resolve_character, resolve_container, resolve_door,
    resolve_food, resolve_item, resolve_weapon,
};

/// What a type tag resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Resolver {
    /// A live object, built by the given type resolver.
    Object(ObjectResolver),
    /// A location.
    Location {
        /// Marks the tag used for the starting location.
        start: bool,
    },
}

/// Maps declared `ObjectType` tags (case-insensitive) to resolvers.
#[derive(Debug, Clone)]
pub struct ResolverRegistry {
    entries: HashMap<String, Resolver>,
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("Object", Resolver::Object(resolve_item));
        registry.register("Item", Resolver::Object(resolve_item));
        registry.register("Container", Resolver::Object(resolve_container));
        registry.register("Door", Resolver::Object(resolve_door));
        registry.register("Armour", Resolver::Object(resolve_armour));
        registry.register("Armor", Resolver::Object(resolve_armour));
        registry.register("Weapon", Resolver::Object(resolve_weapon));
        registry.register("Food", Resolver::Object(resolve_food));
        registry.register("Character", Resolver::Object(resolve_character));
        registry.register("Location", Resolver::Location { start: false });
        registry.register("StartLocation", Resolver::Location { start: true });
        registry
    }
}

impl ResolverRegistry {
    /// A registry that knows no types at all.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register or replace the resolver for a type tag.
    pub fn register(&mut self, tag: &str, resolver: Resolver) {
        self.entries.insert(tag.to_lowercase(), resolver);
    }

    /// The resolver registered for `tag`.
    pub fn get(&self, tag: &str) -> Option<Resolver> {
        self.entries.get(&tag.to_lowercase()).copied()
    }

    /// True if `tag` names a location type.
    pub fn is_location(&self, tag: &str) -> bool {
        matches!(self.get(tag), Some(Resolver::Location { .. }))
    }
}
