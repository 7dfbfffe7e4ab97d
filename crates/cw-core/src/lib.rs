//! Core world model for the Coldwake interactive fiction engine.
//!
//! A world is a fixed graph of [`Room`]s connected by cardinal-direction
//! exits, plus a registry of [`Item`] definitions. Rooms and items are
//! created once at load time from static definitions and owned by a single
//! [`WorldRegistry`] arena; everything else refers to them by id. Only the
//! mutable fields (room lock state, room contents, item capability flags)
//! change during play.

/// Static definition types deserialized from world data files.
pub mod defs;
/// Error types for world construction and lookup.
pub mod error;
/// Item definitions and capability flags.
pub mod item;
/// Rooms, exits, and cardinal directions.
pub mod room;
/// The world registry: the owning arena for rooms and items.
pub mod world;

pub use defs::{ItemDef, RoomDef, WorldDef};
pub use error::{WorldError, WorldResult};
pub use item::Item;
pub use room::{Direction, Room};
pub use world::{WorldRegistry, normalize_id};
