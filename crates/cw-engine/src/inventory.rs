//! Player inventory management.

use cw_core::{WorldError, WorldRegistry, normalize_id};

use crate::error::EngineResult;

/// The player's LIFO, weight-capped item container.
///
/// The stack holds canonical item ids, index 0 being the top. Only the top
/// item is directly usable or droppable; reaching a buried item means
/// dropping everything above it first. That is a design constraint of the
/// game, not an oversight.
#[derive(Debug, Clone)]
pub struct Inventory {
    capacity: f64,
    stack: Vec<String>,
}

impl Inventory {
    /// Create an empty inventory with the given weight capacity.
    ///
    /// Returns a validation error if `capacity` is negative.
    pub fn new(capacity: f64) -> EngineResult<Self> {
        if capacity < 0.0 {
            return Err(WorldError::Validation(format!(
                "inventory capacity must be non-negative, got {capacity}"
            ))
            .into());
        }
        Ok(Self {
            capacity,
            stack: Vec::new(),
        })
    }

    /// The fixed weight capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Item ids from top to bottom.
    pub fn items(&self) -> &[String] {
        &self.stack
    }

    /// The id of the top item, if any.
    pub fn top(&self) -> Option<&str> {
        self.stack.first().map(String::as_str)
    }

    /// Whether the inventory holds no items.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of items held.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether an item with the given id is held (normalized match).
    pub fn contains(&self, item_id: &str) -> bool {
        let wanted = normalize_id(item_id);
        self.stack.iter().any(|id| normalize_id(id) == wanted)
    }

    /// Total weight of the contained items, recomputed on demand.
    ///
    /// Inventories are tiny; no caching. Ids that no longer resolve in the
    /// registry contribute nothing.
    pub fn current_load(&self, world: &WorldRegistry) -> f64 {
        self.stack
            .iter()
            .filter_map(|id| world.find_item(id))
            .map(|item| item.weight())
            .sum()
    }

    /// Push an item on top if it fits within the capacity.
    ///
    /// Returns false, with no mutation, if the item does not resolve or
    /// the capacity would be exceeded.
    pub fn try_add(&mut self, world: &WorldRegistry, item_id: &str) -> bool {
        let Some(item) = world.find_item(item_id) else {
            return false;
        };
        if self.current_load(world) + item.weight() > self.capacity {
            return false;
        }
        self.stack.insert(0, item.id.clone());
        true
    }

    /// Push an item on top unconditionally, skipping the capacity check.
    ///
    /// Only the save-restore path uses this: a restore must succeed even
    /// if data drift pushed the total past the capacity.
    pub fn force_add(&mut self, item_id: impl Into<String>) {
        self.stack.insert(0, item_id.into());
    }

    /// Remove the top item and leave it in the given room.
    ///
    /// Returns false, with no mutation, if the inventory is empty or the
    /// room id does not resolve.
    pub fn drop_top(&mut self, world: &mut WorldRegistry, room_id: &str) -> bool {
        if self.stack.is_empty() {
            return false;
        }
        let Some(room) = world.find_room_mut(room_id) else {
            return false;
        };
        let top = self.stack.remove(0);
        room.add_item(top);
        true
    }

    /// Move a matching item from the room to the top of the stack.
    ///
    /// Matching is case-insensitive and separator-normalized. Returns
    /// false, with no mutation, if either id does not resolve, the item is
    /// absent from the room, or adding it would exceed the capacity.
    pub fn pick_up(&mut self, world: &mut WorldRegistry, room_id: &str, item_id: &str) -> bool {
        let Some(item) = world.find_item(item_id) else {
            return false;
        };
        let canonical = item.id.clone();
        let weight = item.weight();
        if self.current_load(world) + weight > self.capacity {
            return false;
        }
        let Some(room) = world.find_room_mut(room_id) else {
            return false;
        };
        match room.take_item(&canonical) {
            Some(found) => {
                self.stack.insert(0, found);
                true
            }
            None => false,
        }
    }

    /// Empty the inventory without returning items anywhere.
    ///
    /// Used immediately before a save restore.
    pub fn clear_all(&mut self) {
        self.stack.clear();
    }
}
