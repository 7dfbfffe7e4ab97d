//! Versioned session snapshots on disk.
//!
//! A snapshot captures the session plus the mutable world fields (room
//! lock state and contents). Restoring never constructs new items: every
//! id is resolved back to the canonical registry entry, preserving the
//! shared-reference identity of items.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cw_core::{WorldError, WorldRegistry, normalize_id};

use crate::error::{EngineError, EngineResult};
use crate::session::SessionState;

/// Filename prefix shared by all save files in a save directory.
pub const SAVE_PREFIX: &str = "save";

/// The mutable state of one room, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Room id.
    pub id: String,
    /// Lock state at save time.
    pub locked: bool,
    /// Ids of the items in the room, in order.
    pub item_ids: Vec<String>,
}

/// A full serialized session + mutable world state.
///
/// Ordered collections are used throughout so that identical states
/// serialize identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Id of the room the player is in.
    pub current_room_id: String,
    /// Inventory item ids, top to bottom.
    pub inventory_item_ids: Vec<String>,
    /// Per-room mutable state.
    pub rooms: Vec<RoomSnapshot>,
    /// Whether the tutorial was completed.
    pub tutorial_completed: bool,
    /// Ids of visited rooms.
    pub visited_room_ids: BTreeSet<String>,
    /// Id of the last dialogue node reached, if any.
    pub last_dialogue_id: Option<String>,
    /// The placeholder map.
    pub placeholders: BTreeMap<String, String>,
    /// Ids of story events already fired.
    pub activated_event_ids: BTreeSet<String>,
}

impl Snapshot {
    /// Capture the current session and world state.
    pub fn capture(session: &SessionState, world: &WorldRegistry) -> Self {
        Self {
            current_room_id: session.current_room.clone(),
            inventory_item_ids: session.inventory.items().to_vec(),
            rooms: world
                .rooms()
                .map(|room| RoomSnapshot {
                    id: room.id.clone(),
                    locked: room.locked,
                    item_ids: room.items().to_vec(),
                })
                .collect(),
            tutorial_completed: session.tutorial_completed,
            visited_room_ids: session.visited_rooms.iter().cloned().collect(),
            last_dialogue_id: session.last_dialogue.clone(),
            placeholders: session
                .placeholders
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            activated_event_ids: session.activated_events.iter().cloned().collect(),
        }
    }

    /// Apply this snapshot to a session and world.
    ///
    /// Restore order matters: flag sets and the placeholder map are
    /// replaced wholesale first, then the current room is resolved (fatal
    /// if it no longer exists), then the inventory is rebuilt bottom-up
    /// with forced insertions, and finally every room's lock state and
    /// contents are overwritten from the snapshot. Snapshot entries that
    /// no longer resolve in the registry are dropped with a warning.
    pub fn restore(
        &self,
        session: &mut SessionState,
        world: &mut WorldRegistry,
    ) -> EngineResult<()> {
        session.tutorial_completed = self.tutorial_completed;
        session.visited_rooms = self.visited_room_ids.iter().map(|id| normalize_id(id)).collect();
        session.activated_events = self
            .activated_event_ids
            .iter()
            .map(|id| normalize_id(id))
            .collect();
        session.last_dialogue = self.last_dialogue_id.clone();
        session.placeholders = self
            .placeholders
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let current = world
            .find_room(&self.current_room_id)
            .ok_or_else(|| WorldError::UnknownRoom(self.current_room_id.clone()))?;
        session.current_room = current.id.clone();

        // Iterating the saved list from last to first rebuilds the exact
        // top-to-bottom order, because each forced insertion goes to the
        // new top. The capacity check is skipped deliberately.
        session.inventory.clear_all();
        for item_id in self.inventory_item_ids.iter().rev() {
            match world.find_item(item_id) {
                Some(item) => session.inventory.force_add(item.id.clone()),
                None => log::warn!("dropping unknown inventory item \"{item_id}\" from save"),
            }
        }

        for room_snap in &self.rooms {
            let canonical: Vec<String> = room_snap
                .item_ids
                .iter()
                .filter_map(|id| match world.find_item(id) {
                    Some(item) => Some(item.id.clone()),
                    None => {
                        log::warn!("dropping unknown room item \"{id}\" from save");
                        None
                    }
                })
                .collect();

            let Some(room) = world.find_room_mut(&room_snap.id) else {
                log::warn!("dropping unknown room \"{}\" from save", room_snap.id);
                continue;
            };
            room.locked = room_snap.locked;
            room.clear_items();
            for id in canonical {
                room.add_item(id);
            }
        }

        Ok(())
    }
}

/// Reads and writes numbered save files in a fixed directory.
#[derive(Debug, Clone)]
pub struct SaveManager {
    dir: PathBuf,
}

impl SaveManager {
    /// Create a manager rooted at the given save directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The save directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the save file with the given stem, e.g. `save01`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Write a new numbered snapshot and return its path.
    ///
    /// The filename is the highest numeric suffix among existing
    /// `save*.json` files plus one; the directory is created on demand.
    pub fn save(&self, session: &SessionState, world: &WorldRegistry) -> EngineResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let index = self.next_index()?;
        let path = self.path_for(&format!("{SAVE_PREFIX}{index:02}"));

        let snapshot = Snapshot::capture(session, world);
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        log::info!("session saved to {}", path.display());
        Ok(path)
    }

    /// Load a snapshot from `path` and apply it.
    ///
    /// A missing or malformed file is fatal for this operation.
    pub fn load(
        &self,
        path: &Path,
        session: &mut SessionState,
        world: &mut WorldRegistry,
    ) -> EngineResult<()> {
        let json = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&json).map_err(EngineError::MalformedSave)?;
        snapshot.restore(session, world)?;
        log::info!("session restored from {}", path.display());
        Ok(())
    }

    /// Highest numeric suffix among existing save files, plus one.
    fn next_index(&self) -> EngineResult<u32> {
        let mut highest = 0;
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            let Some(digits) = stem.strip_prefix(SAVE_PREFIX) else {
                continue;
            };
            if let Ok(n) = digits.parse::<u32>() {
                highest = highest.max(n);
            }
        }
        Ok(highest + 1)
    }
}
