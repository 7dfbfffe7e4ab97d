use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::world::normalize_id;

/// A cardinal direction. Rooms connect only along these four axes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// North.
    North,
    /// South.
    South,
    /// East.
    East,
    /// West.
    West,
}

impl Direction {
    /// Parse a direction from player input.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "n" | "north" => Some(Self::North),
            "s" | "south" => Some(Self::South),
            "e" | "east" => Some(Self::East),
            "w" | "west" => Some(Self::West),
            _ => None,
        }
    }

    /// Display name for this direction.
    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

/// A node of the navigable map graph.
///
/// Adjacency is stored as room *ids*, never as references to other rooms;
/// neighbours are resolved through the [`crate::WorldRegistry`] on demand.
/// Exits are not required to be symmetric. The contained-item list is
/// ordered and holds canonical item ids.
#[derive(Debug, Clone)]
pub struct Room {
    /// Unique id, matched after [`normalize_id`] normalization.
    pub id: String,
    /// Display name shown to the player.
    pub name: String,
    /// Long description shown on the first visit and by analyze.
    pub description: String,
    /// Whether the room is currently locked.
    pub locked: bool,
    /// Id of the item required to unlock this room, if any.
    pub unlock_key: Option<String>,
    exits: BTreeMap<Direction, String>,
    items: Vec<String>,
}

impl Room {
    /// Create an unlocked room with no exits and no items.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            locked: false,
            unlock_key: None,
            exits: BTreeMap::new(),
            items: Vec::new(),
        }
    }

    /// Lock the room behind the given key item.
    pub fn locked_by(mut self, key_id: impl Into<String>) -> Self {
        self.locked = true;
        self.unlock_key = Some(key_id.into());
        self
    }

    /// Add an exit towards an adjacent room id.
    pub fn with_exit(mut self, direction: Direction, room_id: impl Into<String>) -> Self {
        self.exits.insert(direction, room_id.into());
        self
    }

    /// Place an item in the room.
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.items.push(item_id.into());
        self
    }

    /// The adjacent room id in the given direction, if an exit exists.
    pub fn exit(&self, direction: Direction) -> Option<&str> {
        self.exits.get(&direction).map(String::as_str)
    }

    /// All exits, in fixed direction order (north, south, east, west).
    pub fn exits(&self) -> impl Iterator<Item = (Direction, &str)> {
        self.exits.iter().map(|(d, id)| (*d, id.as_str()))
    }

    /// Canonical ids of the items currently in the room, in order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Append an item to the room's contents.
    pub fn add_item(&mut self, item_id: impl Into<String>) {
        self.items.push(item_id.into());
    }

    /// Whether an item with the given id is present (normalized match).
    pub fn contains_item(&self, item_id: &str) -> bool {
        let wanted = normalize_id(item_id);
        self.items.iter().any(|id| normalize_id(id) == wanted)
    }

    /// Remove and return the first item matching the given id.
    ///
    /// Matching is case-insensitive and separator-normalized; the returned
    /// id is the canonical one stored in the room.
    pub fn take_item(&mut self, item_id: &str) -> Option<String> {
        let wanted = normalize_id(item_id);
        let pos = self.items.iter().position(|id| normalize_id(id) == wanted)?;
        Some(self.items.remove(pos))
    }

    /// Remove every item from the room.
    pub fn clear_items(&mut self) {
        self.items.clear();
    }
}
