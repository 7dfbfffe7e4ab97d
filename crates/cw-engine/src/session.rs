//! Mutable per-playthrough session state.

use std::collections::{HashMap, HashSet};

use cw_core::normalize_id;

use crate::error::EngineResult;
use crate::inventory::Inventory;

/// The full mutable state of one playthrough.
///
/// Created fresh at new-game start or reconstructed wholesale by the save
/// system. Room membership is tracked by id; the room itself lives in the
/// world registry.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// The player's chosen name.
    pub player_name: String,
    /// The player's inventory.
    pub inventory: Inventory,
    /// Id of the room the player is currently in.
    pub current_room: String,
    /// Normalized ids of rooms already visited.
    pub visited_rooms: HashSet<String>,
    /// Normalized ids of one-time story events already fired.
    pub activated_events: HashSet<String>,
    /// Id of the last non-sentinel dialogue node reached.
    pub last_dialogue: Option<String>,
    /// Whether the tutorial has been completed.
    pub tutorial_completed: bool,
    /// Narrative placeholders substituted into dialogue text.
    pub placeholders: HashMap<String, String>,
}

impl SessionState {
    /// Create a fresh session in the given starting room.
    pub fn new(
        player_name: impl Into<String>,
        capacity: f64,
        start_room: impl Into<String>,
    ) -> EngineResult<Self> {
        Ok(Self {
            player_name: player_name.into(),
            inventory: Inventory::new(capacity)?,
            current_room: start_room.into(),
            visited_rooms: HashSet::new(),
            activated_events: HashSet::new(),
            last_dialogue: None,
            tutorial_completed: false,
            placeholders: HashMap::new(),
        })
    }

    /// Whether the room has been visited before (normalized match).
    pub fn has_visited(&self, room_id: &str) -> bool {
        self.visited_rooms.contains(&normalize_id(room_id))
    }

    /// Mark a room as visited. Returns true on the first visit.
    pub fn visit(&mut self, room_id: &str) -> bool {
        self.visited_rooms.insert(normalize_id(room_id))
    }

    /// Fire a one-time event. Returns true if it had not fired before.
    pub fn activate_event(&mut self, event_id: &str) -> bool {
        self.activated_events.insert(normalize_id(event_id))
    }

    /// Look up a placeholder value.
    pub fn placeholder(&self, key: &str) -> Option<&str> {
        self.placeholders.get(key).map(String::as_str)
    }

    /// Set a placeholder value.
    pub fn set_placeholder(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.placeholders.insert(key.into(), value.into());
    }
}
