use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use hh_core::resolve::{resolve, resolve_location};
use hh_core::{CoreError, Location, LiveObject, ObjectClass, ObjectRecord};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::FactoryConfig;
use crate::error::{FactoryError, FactoryResult, ValidationFailure};
use crate::registry::{Resolver, ResolverRegistry};

/// A loaded, unresolved definition.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Unique ID, from the `ID` field or the file stem.
    pub id: String,
    /// Declared type tag.
    pub object_type: String,
    /// Display name.
    pub name: String,
    /// The record as parsed.
    pub record: ObjectRecord,
    /// File the definition was read from.
    pub source: PathBuf,
}

/// A definition file that was skipped during a bulk load.
#[derive(Debug, Clone)]
pub struct SkippedDefinition {
    /// The file that was skipped.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of [`ObjectFactory::load_root`].
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of definitions added.
    pub loaded: usize,
    /// Files that could not be loaded, in walk order.
    pub skipped: Vec<SkippedDefinition>,
}

/// Holds every loaded definition and creates live objects from them.
///
/// Definitions are kept in their unresolved form. Each creation resolves
/// the record again, so two objects created from one ID never share state.
#[derive(Debug, Clone, Default)]
pub struct ObjectFactory {
    config: FactoryConfig,
    registry: ResolverRegistry,
    definitions: BTreeMap<String, Definition>,
    /// Lowercased names and aliases, mapped to the spelling they were
    /// defined with.
    names: BTreeMap<String, String>,
}

impl ObjectFactory {
    /// An empty factory with the default resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different loader configuration.
    pub fn with_config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a different set of type resolvers.
    pub fn with_registry(mut self, registry: ResolverRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The loader configuration.
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Number of loaded definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// True if a definition with this ID is loaded.
    pub fn contains(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// The stored definition for `id`.
    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    /// All definitions, ordered by ID.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.values()
    }

    /// True if the definition declares a location type.
    pub fn is_location(&self, definition: &Definition) -> bool {
        self.registry.is_location(&definition.object_type)
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Recursively load every definition file under `root`.
    ///
    /// A malformed file is logged and skipped unless the factory is strict.
    /// Files are visited in name order so loads are reproducible.
    pub fn load_root(&mut self, root: &Path) -> FactoryResult<LoadReport> {
        std::fs::metadata(root).map_err(|source| FactoryError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut report = LoadReport::default();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let (path, result) = match entry {
                Ok(entry) if self.is_definition_file(entry.path()) => {
                    let path = entry.into_path();
                    let result = self.load_file(&path);
                    (path, result)
                }
                Ok(_) => continue,
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    let result = Err(FactoryError::Io {
                        path: path.clone(),
                        source: err.into(),
                    });
                    (path, result)
                }
            };

            match result {
                Ok(id) => {
                    debug!(id = %id, path = %path.display(), "loaded definition");
                    report.loaded += 1;
                }
                Err(err) if self.config.strict => return Err(err),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping definition");
                    report.skipped.push(SkippedDefinition {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            root = %root.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "loaded object definitions"
        );
        Ok(report)
    }

    /// Load a single definition file. The file stem is the default ID.
    pub fn load_file(&mut self, path: &Path) -> FactoryResult<String> {
        let source = std::fs::read_to_string(path).map_err(|source| FactoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.load_str(&source, &stem, path)
    }

    /// Parse, validate, and store one definition. `fallback_id` is used when
    /// the record has no `ID`. Returns the ID it was stored under.
    pub fn load_str(
        &mut self,
        source: &str,
        fallback_id: &str,
        path: &Path,
    ) -> FactoryResult<String> {
        let record = ObjectRecord::from_json(source).map_err(|source| FactoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let id = record
            .id
            .clone()
            .unwrap_or_else(|| fallback_id.to_string())
            .trim()
            .to_string();
        if id.is_empty() {
            return Err(
                CoreError::configuration(path.display().to_string(), "definition has no ID").into(),
            );
        }
        if let Some(existing) = self.definitions.get(&id) {
            return Err(FactoryError::DuplicateId {
                id,
                first: existing.source.clone(),
            });
        }

        let resolver = self.resolver_for(&id, &record.object_type)?;
        let (name, aliases) = match resolver {
            Resolver::Object(resolver) => {
                let object = resolve(&record, &id, resolver)?;
                (object.name, object.aliases)
            }
            Resolver::Location { .. } => (resolve_location(&record, &id)?.name, Vec::new()),
        };

        for known in std::iter::once(&name).chain(&aliases) {
            self.names
                .entry(known.to_lowercase())
                .or_insert_with(|| known.clone());
        }
        self.definitions.insert(
            id.clone(),
            Definition {
                id: id.clone(),
                object_type: record.object_type.clone(),
                name,
                record,
                source: path.to_path_buf(),
            },
        );
        Ok(id)
    }

    fn is_definition_file(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(self.config.extension.as_str()))
    }

    fn resolver_for(&self, id: &str, object_type: &str) -> FactoryResult<Resolver> {
        self.registry
            .get(object_type)
            .ok_or_else(|| FactoryError::UnknownType {
                id: id.to_string(),
                object_type: object_type.to_string(),
            })
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create a fresh live object, including its starting contents.
    pub fn create_object(&self, id: &str) -> FactoryResult<LiveObject> {
        self.create_nested(id, &mut Vec::new())
    }

    /// Like [`create_object`](Self::create_object), but also require the
    /// object to be of the given class.
    pub fn create_object_as(&self, id: &str, class: ObjectClass) -> FactoryResult<LiveObject> {
        let object = self.create_object(id)?;
        if object.class() == class {
            Ok(object)
        } else {
            Err(FactoryError::WrongVariant {
                id: id.to_string(),
                expected: class.to_string(),
                found: object.class().to_string(),
            })
        }
    }

    fn create_nested(&self, id: &str, chain: &mut Vec<String>) -> FactoryResult<LiveObject> {
        if chain.iter().any(|outer| outer == id) {
            let mut chain = chain.clone();
            chain.push(id.to_string());
            return Err(FactoryError::RecursiveContents {
                id: id.to_string(),
                chain,
            });
        }

        let definition = self.lookup(id)?;
        let resolver = match self.resolver_for(id, &definition.object_type)? {
            Resolver::Object(resolver) => resolver,
            Resolver::Location { .. } => {
                return Err(FactoryError::WrongVariant {
                    id: id.to_string(),
                    expected: "object".to_string(),
                    found: "location".to_string(),
                });
            }
        };
        let mut object = resolve(&definition.record, id, resolver)?;

        chain.push(id.to_string());
        for child_id in &definition.record.contents {
            let child = self.create_nested(child_id, chain)?;
            object
                .add(child)
                .map_err(|rejected| FactoryError::ContentsRejected {
                    id: id.to_string(),
                    reason: rejected.violation.to_string(),
                })?;
        }
        chain.pop();

        Ok(object)
    }

    /// Create one location with its starting contents.
    pub fn create_location(&self, id: &str) -> FactoryResult<Location> {
        let definition = self.lookup(id)?;
        let start = match self.resolver_for(id, &definition.object_type)? {
            Resolver::Location { start } => start,
            Resolver::Object(_) => {
                return Err(FactoryError::WrongVariant {
                    id: id.to_string(),
                    expected: "location".to_string(),
                    found: definition.object_type.to_lowercase(),
                });
            }
        };

        let mut location = resolve_location(&definition.record, id)?;
        location.start = start;
        let mut chain = vec![id.to_string()];
        for child_id in &definition.record.contents {
            let child = self.create_nested(child_id, &mut chain)?;
            location
                .root
                .add(child)
                .map_err(|rejected| FactoryError::ContentsRejected {
                    id: id.to_string(),
                    reason: rejected.violation.to_string(),
                })?;
        }
        Ok(location)
    }

    /// Create every location, checking that all exits lead somewhere known.
    pub fn create_all_locations(&self) -> FactoryResult<BTreeMap<String, Location>> {
        let mut locations = BTreeMap::new();
        for definition in self.definitions.values() {
            if self.is_location(definition) {
                locations.insert(definition.id.clone(), self.create_location(&definition.id)?);
            }
        }

        for location in locations.values() {
            for exit in &location.exits {
                if !locations.contains_key(&exit.destination) {
                    return Err(CoreError::configuration(
                        &location.id,
                        format!("exit {} leads to unknown location \"{}\"", exit.direction, exit.destination),
                    )
                    .into());
                }
            }
        }
        Ok(locations)
    }

    /// Create one door per distinct door ID referenced by an exit. Both sides
    /// of a doorway share the same door object.
    pub fn create_exit_doors(
        &self,
        locations: &BTreeMap<String, Location>,
    ) -> FactoryResult<BTreeMap<String, LiveObject>> {
        let door_ids: BTreeSet<&str> = locations
            .values()
            .flat_map(|l| &l.exits)
            .filter_map(|e| e.door.as_deref())
            .collect();

        door_ids
            .into_iter()
            .map(|id| Ok((id.to_string(), self.create_object_as(id, ObjectClass::Door)?)))
            .collect()
    }

    /// Try to build everything, collecting every failure instead of
    /// stopping at the first. Returns the number of definitions checked.
    pub fn validate_objects(&self) -> FactoryResult<usize> {
        let mut failures = Vec::new();
        for definition in self.definitions.values() {
            let result = if self.is_location(definition) {
                self.create_location(&definition.id).and_then(|location| {
                    for door in location.exits.iter().filter_map(|e| e.door.as_deref()) {
                        self.create_object_as(door, ObjectClass::Door)?;
                    }
                    Ok(())
                })
            } else {
                self.create_object(&definition.id).map(|_| ())
            };
            if let Err(error) = result {
                failures.push(ValidationFailure {
                    id: definition.id.clone(),
                    error,
                });
            }
        }

        if let Err(error) = self.create_all_locations() {
            failures.push(ValidationFailure {
                id: "<world>".to_string(),
                error,
            });
        }

        if failures.is_empty() {
            Ok(self.definitions.len())
        } else {
            Err(FactoryError::Validation(failures))
        }
    }

    fn lookup(&self, id: &str) -> FactoryResult<&Definition> {
        self.definitions
            .get(id)
            .ok_or_else(|| FactoryError::NotFound(id.to_string()))
    }

    // -----------------------------------------------------------------------
    // Names
    // -----------------------------------------------------------------------

    /// Resolve a name or alias as typed by a player. Returns the known
    /// spelling and whether a plural ending had to be stripped to find it.
    pub fn get_object_name(&self, candidate: &str) -> Option<(String, bool)> {
        let candidate = candidate.trim().to_lowercase();
        if let Some(name) = self.names.get(&candidate) {
            return Some((name.clone(), false));
        }
        ["s", "es"]
            .iter()
            .filter_map(|suffix| candidate.strip_suffix(suffix))
            .find_map(|stem| self.names.get(stem))
            .map(|name| (name.clone(), true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hh_core::{ConstraintViolation, ObjectKind};
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn load(files: &[(&str, &str)]) -> ObjectFactory {
        let dir = tempfile::tempdir().unwrap();
        for (relative, contents) in files {
            write(dir.path(), relative, contents);
        }
        let mut factory = ObjectFactory::new();
        factory.load_root(dir.path()).unwrap();
        factory
    }

    const CRATE: &str = r#"{ "ObjectType": "Container", "Name": "crate",
        "Height": "0.6m", "Width": "40cm", "Depth": "0.3",
        "Capacity": { "Items": 1, "Weight": "5kg" } }"#;
    const ANVIL: &str =
        r#"{ "ObjectType": "Object", "Name": "anvil", "Height": "0.1", "Width": "0.1", "Depth": "0.1", "Weight": "6kg" }"#;
    const COIN: &str =
        r#"{ "ObjectType": "Object", "Name": "coin", "Height": "1cm", "Width": "1cm", "Depth": "1mm", "Weight": "10g" }"#;
    const POLE: &str =
        r#"{ "ObjectType": "Object", "Name": "pole", "Height": "0.6", "Width": "0.05", "Depth": "0.05", "Weight": "1kg" }"#;

    #[test]
    fn load_root_recurses_and_defaults_ids() {
        let factory = load(&[
            ("items/coin.json", COIN),
            ("items/deep/pole.json", POLE),
            ("readme.txt", "not a definition"),
        ]);
        assert_eq!(factory.len(), 2);
        assert!(factory.contains("coin"));
        assert!(factory.contains("pole"));
        assert_eq!(factory.definition("pole").unwrap().object_type, "Object");
    }

    #[test]
    fn explicit_id_wins_over_file_name() {
        let factory = load(&[("whatever.json", r#"{ "ID": "lamp", "ObjectType": "Object" }"#)]);
        assert!(factory.contains("lamp"));
        assert!(!factory.contains("whatever"));
    }

    #[test]
    fn malformed_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "coin.json", COIN);
        write(dir.path(), "broken.json", "{ not json");
        write(dir.path(), "dragon.json", r#"{ "ObjectType": "Dragon" }"#);
        write(
            dir.path(),
            "vest.json",
            r#"{ "ObjectType": "Armour", "Reduction": "75" }"#,
        );

        let mut factory = ObjectFactory::new();
        let report = factory.load_root(dir.path()).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped.len(), 3);
        assert!(factory.contains("coin"));
        assert!(!factory.contains("vest"));
    }

    #[test]
    fn strict_load_stops_at_first_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", "{ not json");
        write(dir.path(), "b.json", COIN);

        let mut factory =
            ObjectFactory::new().with_config(FactoryConfig::default().with_strict(true));
        let err = factory.load_root(dir.path()).unwrap_err();
        assert!(matches!(err, FactoryError::Parse { .. }));
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let mut factory = ObjectFactory::new();
        let err = factory
            .load_root(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(err, FactoryError::Io { .. }));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut factory = ObjectFactory::new();
        factory.load_str(COIN, "coin", Path::new("a.json")).unwrap();
        let err = factory
            .load_str(COIN, "coin", Path::new("b.json"))
            .unwrap_err();
        assert!(matches!(err, FactoryError::DuplicateId { .. }));
    }

    #[test]
    fn unknown_id_is_not_found() {
        let factory = load(&[("coin.json", COIN)]);
        let err = factory.create_object("ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn container_rejections_end_to_end() {
        let factory = load(&[
            ("crate.json", CRATE),
            ("anvil.json", ANVIL),
            ("coin.json", COIN),
            ("pole.json", POLE),
        ]);

        let mut crate_ = factory.create_object("crate").unwrap();
        let anvil = factory.create_object("anvil").unwrap();
        let rejected = crate_.add(anvil).unwrap_err();
        assert!(matches!(rejected.violation, ConstraintViolation::Weight { .. }));
        assert!(rejected.violation.to_string().contains("too heavy"));

        crate_.add(factory.create_object("coin").unwrap()).unwrap();
        let rejected = crate_.add(factory.create_object("coin").unwrap()).unwrap_err();
        assert!(matches!(rejected.violation, ConstraintViolation::Capacity { .. }));

        let mut empty = factory.create_object("crate").unwrap();
        let rejected = empty.add(factory.create_object("pole").unwrap()).unwrap_err();
        assert!(matches!(rejected.violation, ConstraintViolation::Size { .. }));
        assert!(empty.contents().is_empty());
    }

    #[test]
    fn created_objects_are_independent() {
        let factory = load(&[(
            "guard.json",
            r#"{ "ObjectType": "Character", "Name": "guard", "HP": 20 }"#,
        )]);
        let mut first = factory.create_object("guard").unwrap();
        let second = factory.create_object("guard").unwrap();
        assert_ne!(first.instance, second.instance);

        first.as_character_mut().unwrap().hp = 1;
        assert_eq!(second.as_character().unwrap().hp, 20);

        let mut a = first.clone();
        a.instance = second.instance;
        a.as_character_mut().unwrap().hp = 20;
        assert_eq!(a, second);
    }

    #[test]
    fn starting_contents_are_created_nested() {
        let factory = load(&[
            (
                "chest.json",
                r#"{ "ObjectType": "Container", "Name": "chest", "Height": "1", "Width": "1", "Depth": "1",
                     "Capacity": { "Items": 5, "Weight": "50kg" }, "Contents": ["pouch"] }"#,
            ),
            (
                "pouch.json",
                r#"{ "ObjectType": "Container", "Name": "pouch", "Height": "0.2", "Width": "0.2", "Depth": "0.2",
                     "Capacity": { "Items": 5, "Weight": "1kg" }, "Contents": ["coin", "coin"] }"#,
            ),
            ("coin.json", COIN),
        ]);

        let chest = factory.create_object("chest").unwrap();
        let found = chest.find_by_name("coin").unwrap();
        assert_eq!(found.owner.name, "pouch");
        assert!((chest.total_weight() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn self_containing_definitions_fail() {
        let factory = load(&[
            (
                "box.json",
                r#"{ "ObjectType": "Container", "Height": "1", "Width": "1", "Depth": "1",
                     "Capacity": { "Items": 5, "Weight": "50kg" }, "Contents": ["box"] }"#,
            ),
        ]);
        let err = factory.create_object("box").unwrap_err();
        assert!(matches!(err, FactoryError::RecursiveContents { .. }));
    }

    #[test]
    fn create_object_as_checks_variant() {
        let factory = load(&[("coin.json", COIN), ("crate.json", CRATE)]);
        assert!(factory.create_object_as("crate", ObjectClass::Container).is_ok());
        let err = factory
            .create_object_as("coin", ObjectClass::Weapon)
            .unwrap_err();
        assert_eq!(err.to_string(), "\"coin\" is not a weapon (found object)");
    }

    #[test]
    fn locations_with_contents_and_shared_doors() {
        let factory = load(&[
            (
                "hall.json",
                r#"{ "ObjectType": "StartLocation", "Name": "Hall", "Contents": ["coin"],
                     "Exits": [ { "Direction": "north", "To": "vault", "Door": "vault_door" } ] }"#,
            ),
            (
                "vault.json",
                r#"{ "ObjectType": "Location", "Name": "Vault",
                     "Exits": [ { "Direction": "s", "To": "hall", "Door": "vault_door" } ] }"#,
            ),
            ("vault_door.json", r#"{ "ObjectType": "Door", "Name": "iron door", "KeyID": "key" }"#),
            ("coin.json", COIN),
        ]);

        let locations = factory.create_all_locations().unwrap();
        assert_eq!(locations.len(), 2);
        assert!(locations["hall"].start);
        assert!(!locations["vault"].start);
        assert_eq!(locations["hall"].root.contents()[0].name, "coin");

        let doors = factory.create_exit_doors(&locations).unwrap();
        assert_eq!(doors.len(), 1);
        assert!(matches!(doors["vault_door"].kind, ObjectKind::Door(_)));

        let err = factory.create_object("hall").unwrap_err();
        assert!(matches!(err, FactoryError::WrongVariant { .. }));
    }

    #[test]
    fn dangling_exit_is_a_configuration_error() {
        let factory = load(&[(
            "hall.json",
            r#"{ "ObjectType": "Location", "Exits": [ { "Direction": "up", "To": "attic" } ] }"#,
        )]);
        let err = factory.create_all_locations().unwrap_err();
        assert!(err.to_string().contains("attic"));
    }

    #[test]
    fn validation_collects_every_failure() {
        let factory = load(&[
            ("coin.json", COIN),
            (
                "bag.json",
                r#"{ "ObjectType": "Container", "Name": "bag", "Height": "0.5", "Width": "0.5", "Depth": "0.5",
                     "Capacity": { "Items": 5, "Weight": "5kg" }, "Contents": ["ghost"] }"#,
            ),
            (
                "sack.json",
                r#"{ "ObjectType": "Container", "Name": "sack", "Height": "0.5", "Width": "0.5", "Depth": "0.5",
                     "Capacity": { "Items": 5, "Weight": "5kg" }, "Contents": ["phantom"] }"#,
            ),
        ]);

        let Err(FactoryError::Validation(failures)) = factory.validate_objects() else {
            panic!("expected validation failures");
        };
        let ids: Vec<_> = failures.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["bag", "sack"]);
        assert!(failures.iter().all(|f| f.error.is_not_found()));
    }

    #[test]
    fn valid_world_passes_validation() {
        let factory = load(&[("coin.json", COIN), ("crate.json", CRATE)]);
        assert_eq!(factory.validate_objects().unwrap(), 2);
    }

    #[test]
    fn plural_names_resolve() {
        let factory = load(&[
            (
                "bag.json",
                r#"{ "ObjectType": "Container", "Name": "bag", "Aliases": ["sack"],
                     "Capacity": { "Items": 1, "Weight": "1kg" } }"#,
            ),
            ("box.json", r#"{ "ObjectType": "Object", "Name": "box" }"#),
            ("door.json", r#"{ "ObjectType": "Door", "Name": "gate" }"#),
        ]);

        assert_eq!(factory.get_object_name("bag"), Some(("bag".to_string(), false)));
        assert_eq!(factory.get_object_name("bags"), Some(("bag".to_string(), true)));
        assert_eq!(factory.get_object_name("Sacks"), Some(("sack".to_string(), true)));
        assert_eq!(factory.get_object_name("boxes"), Some(("box".to_string(), true)));
        assert_eq!(factory.get_object_name("doors"), Some(("door".to_string(), true)));
        assert_eq!(factory.get_object_name("dragons"), None);
    }
}
