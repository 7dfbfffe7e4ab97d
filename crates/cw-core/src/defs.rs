use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::WorldResult;
use crate::item::Item;
use crate::room::{Direction, Room};
use crate::world::WorldRegistry;

/// Static definition of an item, as found in world data files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemDef {
    /// Unique item id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Descriptive text.
    pub description: String,
    /// Weight in kilograms.
    pub weight: f64,
    /// Whether the item can be picked up.
    #[serde(default)]
    pub pickable: bool,
    /// Whether the item can be used on a locked room.
    #[serde(default)]
    pub usable: bool,
    /// Whether the item can be analyzed.
    #[serde(default)]
    pub analyzable: bool,
    /// Display tag, opaque to the engine.
    #[serde(default)]
    pub tag: String,
}

/// Static definition of a room, as found in world data files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoomDef {
    /// Unique room id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Whether the room starts locked.
    #[serde(default)]
    pub locked: bool,
    /// Item id required to unlock the room.
    #[serde(default)]
    pub unlock_key: Option<String>,
    /// Adjacent room ids per direction.
    #[serde(default)]
    pub exits: BTreeMap<Direction, String>,
    /// Item ids initially present in the room.
    #[serde(default)]
    pub items: Vec<String>,
}

/// A complete set of static world definitions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorldDef {
    /// All item definitions.
    pub items: Vec<ItemDef>,
    /// All room definitions.
    pub rooms: Vec<RoomDef>,
}

impl WorldDef {
    /// Parse world definitions from a JSON document.
    pub fn from_json(json: &str) -> WorldResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a validated [`WorldRegistry`] from these definitions.
    ///
    /// Duplicate ids and dangling references are fatal here; a dataset
    /// that does not build is unusable.
    pub fn build(self) -> WorldResult<WorldRegistry> {
        let mut world = WorldRegistry::new();

        for def in self.items {
            let mut item = Item::new(def.id, def.name, def.description, def.weight)?
                .with_tag(def.tag);
            item.pickable = def.pickable;
            item.usable = def.usable;
            item.analyzable = def.analyzable;
            world.add_item(item)?;
        }

        for def in self.rooms {
            let mut room = Room::new(def.id, def.name, def.description);
            room.locked = def.locked;
            room.unlock_key = def.unlock_key;
            for (direction, target) in def.exits {
                room = room.with_exit(direction, target);
            }
            for item_id in def.items {
                room = room.with_item(item_id);
            }
            world.add_room(room)?;
        }

        world.validate()?;
        log::debug!(
            "world built: {} rooms, {} items",
            world.rooms().count(),
            world.items().count()
        );
        Ok(world)
    }
}
