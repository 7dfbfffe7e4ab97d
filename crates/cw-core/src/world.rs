use std::collections::HashMap;

use crate::error::{WorldError, WorldResult};
use crate::item::Item;
use crate::room::Room;

/// Normalize an id for comparison: lowercase, with the `_` separator
/// stripped, so `"zona_est"` and `"ZonaEst"` resolve identically.
///
/// Every id comparison in the engine goes through this function; comparing
/// raw strings anywhere would make lookups silently diverge.
pub fn normalize_id(id: &str) -> String {
    id.to_lowercase().replace('_', "")
}

/// The owning arena for all rooms and items in the world.
///
/// Built once at startup from static definitions and passed by reference
/// to every component that needs lookups. Registration of a duplicate id
/// is a configuration error, not a runtime condition; nothing is ever
/// removed after load.
#[derive(Debug, Clone, Default)]
pub struct WorldRegistry {
    items: HashMap<String, Item>,
    rooms: HashMap<String, Room>,
    room_order: Vec<String>,
}

impl WorldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item definition.
    pub fn add_item(&mut self, item: Item) -> WorldResult<()> {
        let key = normalize_id(&item.id);
        if self.items.contains_key(&key) {
            return Err(WorldError::DuplicateItem(item.id));
        }
        self.items.insert(key, item);
        Ok(())
    }

    /// Register a room.
    pub fn add_room(&mut self, room: Room) -> WorldResult<()> {
        let key = normalize_id(&room.id);
        if self.rooms.contains_key(&key) {
            return Err(WorldError::DuplicateRoom(room.id));
        }
        self.room_order.push(key.clone());
        self.rooms.insert(key, room);
        Ok(())
    }

    /// Look up an item by id (normalized match).
    pub fn find_item(&self, id: &str) -> Option<&Item> {
        self.items.get(&normalize_id(id))
    }

    /// Look up an item mutably by id (normalized match).
    pub fn find_item_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.get_mut(&normalize_id(id))
    }

    /// Look up a room by id (normalized match).
    pub fn find_room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(&normalize_id(id))
    }

    /// Look up a room mutably by id (normalized match).
    pub fn find_room_mut(&mut self, id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(&normalize_id(id))
    }

    /// All rooms, in registration order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.room_order.iter().filter_map(|key| self.rooms.get(key))
    }

    /// All items, in no particular order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Check cross-references: every exit, unlock key, and placed item
    /// must resolve in the registry. Called once after load.
    pub fn validate(&self) -> WorldResult<()> {
        for room in self.rooms() {
            for (_, target) in room.exits() {
                if self.find_room(target).is_none() {
                    return Err(WorldError::UnknownRoom(target.to_string()));
                }
            }
            if let Some(key) = &room.unlock_key {
                if self.find_item(key).is_none() {
                    return Err(WorldError::UnknownItem(key.clone()));
                }
            }
            for item_id in room.items() {
                if self.find_item(item_id).is_none() {
                    return Err(WorldError::UnknownItem(item_id.clone()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::Direction;

    fn sample_item(id: &str) -> Item {
        Item::new(id, id.to_uppercase(), "", 1.0).unwrap()
    }

    #[test]
    fn normalize_strips_separator_and_case() {
        assert_eq!(normalize_id("Zona_Est"), "zonaest");
        assert_eq!(normalize_id("zonaest"), "zonaest");
    }

    #[test]
    fn duplicate_item_is_fatal() {
        let mut world = WorldRegistry::new();
        world.add_item(sample_item("key_1")).unwrap();

        // Same id after normalization.
        let err = world.add_item(sample_item("Key1")).unwrap_err();
        assert!(matches!(err, WorldError::DuplicateItem(_)));
    }

    #[test]
    fn duplicate_room_is_fatal() {
        let mut world = WorldRegistry::new();
        world.add_room(Room::new("hub", "Hub", "")).unwrap();
        let err = world.add_room(Room::new("HUB", "Hub 2", "")).unwrap_err();
        assert!(matches!(err, WorldError::DuplicateRoom(_)));
    }

    #[test]
    fn lookup_is_normalized() {
        let mut world = WorldRegistry::new();
        world.add_item(sample_item("access_code")).unwrap();

        assert!(world.find_item("AccessCode").is_some());
        assert!(world.find_item("access_code").is_some());
        assert!(world.find_item("missing").is_none());
    }

    #[test]
    fn rooms_iterate_in_registration_order() {
        let mut world = WorldRegistry::new();
        world.add_room(Room::new("b", "B", "")).unwrap();
        world.add_room(Room::new("a", "A", "")).unwrap();

        let ids: Vec<_> = world.rooms().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn validate_catches_dangling_exit() {
        let mut world = WorldRegistry::new();
        world
            .add_room(Room::new("hub", "Hub", "").with_exit(Direction::North, "nowhere"))
            .unwrap();

        let err = world.validate().unwrap_err();
        assert!(matches!(err, WorldError::UnknownRoom(_)));
    }

    #[test]
    fn validate_catches_dangling_item() {
        let mut world = WorldRegistry::new();
        world
            .add_room(Room::new("hub", "Hub", "").with_item("ghost"))
            .unwrap();

        let err = world.validate().unwrap_err();
        assert!(matches!(err, WorldError::UnknownItem(_)));
    }
}
