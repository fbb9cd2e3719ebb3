use std::fmt;

use tracing::error;

use crate::container::Container;
use crate::object::{Dimensions, LiveObject, ObjectKind};

/// Direction of an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// North.
    North,
    /// South.
    South,
    /// East.
    East,
    /// West.
    West,
    /// Up.
    Up,
    /// Down.
    Down,
    /// Northeast.
    Northeast,
    /// Northwest.
    Northwest,
    /// Southeast.
    Southeast,
    /// Southwest.
    Southwest,
    /// Inside.
    In,
    /// Outside.
    Out,
}

impl Direction {
    /// Parse a direction, accepting the usual abbreviations.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "n" | "north" => Some(Self::North),
            "s" | "south" => Some(Self::South),
            "e" | "east" => Some(Self::East),
            "w" | "west" => Some(Self::West),
            "u" | "up" => Some(Self::Up),
            "d" | "down" => Some(Self::Down),
            "ne" | "northeast" => Some(Self::Northeast),
            "nw" | "northwest" => Some(Self::Northwest),
            "se" | "southeast" => Some(Self::Southeast),
            "sw" | "southwest" => Some(Self::Southwest),
            "in" | "inside" => Some(Self::In),
            "out" | "outside" => Some(Self::Out),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
            Self::Northeast => "northeast",
            Self::Northwest => "northwest",
            Self::Southeast => "southeast",
            Self::Southwest => "southwest",
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A way out of a location, optionally through a door.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    /// Which way the exit leads.
    pub direction: Direction,
    /// ID of the destination location.
    pub destination: String,
    /// Record ID of the gating door.
    pub door: Option<String>,
}

/// A named place with exits and a root container for everything in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Record ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description lines.
    pub description: Vec<String>,
    /// Ways out, at most one per direction.
    pub exits: Vec<Exit>,
    /// Marks the location where play begins.
    pub start: bool,
    /// Unbounded holder for everything in the location.
    pub root: LiveObject,
}

impl Location {
    /// An empty location with no exits.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let name = name.into();
        let root = LiveObject::new(id.clone(), name.clone())
            .with_kind(ObjectKind::Container(Container::unbounded()));
        let root = LiveObject {
            dimensions: Dimensions::unbounded(),
            ..root
        };
        Self {
            id,
            name,
            description: Vec::new(),
            exits: Vec::new(),
            start: false,
            root,
        }
    }

    /// The exit leading `direction`, if any.
    pub fn exit(&self, direction: Direction) -> Option<&Exit> {
        self.exits.iter().find(|e| e.direction == direction)
    }

    /// Characters anywhere in this location, including those held inside
    /// containers or carried by other characters. Depth first.
    pub fn characters(&self) -> Vec<&LiveObject> {
        let mut found = Vec::new();
        collect_characters(&self.root, &mut found);
        found
    }

    /// Put objects on the floor. The root has no limits, so this only fails
    /// if the root has been replaced with something that is not a holder.
    pub fn drop_all(&mut self, objects: Vec<LiveObject>) {
        for object in objects {
            if let Err(rejected) = self.root.add(object) {
                error!(
                    location = %self.id,
                    reason = %rejected.violation,
                    "location refused a dropped object"
                );
            }
        }
    }

    /// Description, visible exits, and a contents listing.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        lines.extend(self.description.iter().cloned());
        if !self.exits.is_empty() {
            let exits: Vec<&str> = self.exits.iter().map(|e| e.direction.name()).collect();
            lines.push(format!("Exits: {}", exits.join(", ")));
        }
        if !self.root.contents().is_empty() {
            lines.extend(self.root.list_contents(""));
        }
        lines
    }
}

fn collect_characters<'a>(holder: &'a LiveObject, found: &mut Vec<&'a LiveObject>) {
    for object in holder.contents() {
        if object.as_character().is_some() {
            found.push(object);
        }
        collect_characters(object, found);
    }
}
