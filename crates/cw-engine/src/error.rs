//! Engine error types.

use cw_core::WorldError;

/// Alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal engine failures.
///
/// These abort the operation that raised them: they indicate an unusable
/// dataset, a corrupt save file, or a reference that no longer resolves.
/// Expected in-game rejections are [`CommandError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// World construction or lookup failed.
    #[error(transparent)]
    World(#[from] WorldError),

    /// A dialogue node id did not resolve in the graph.
    #[error("dialogue node not found: \"{0}\"")]
    DialogueNotFound(String),

    /// Two dialogue nodes share the same (normalized) id.
    #[error("duplicate dialogue node id: \"{0}\"")]
    DuplicateDialogue(String),

    /// A dialogue node declares both choices and a linear continuation.
    #[error("dialogue node \"{0}\" has both choices and a next id")]
    AmbiguousDialogue(String),

    /// The presentation collaborator returned an out-of-range choice index.
    #[error("invalid choice index: {0}")]
    InvalidChoice(usize),

    /// Save data could not be deserialized.
    #[error("malformed save data: {0}")]
    MalformedSave(#[from] serde_json::Error),

    /// A filesystem operation on the save directory failed.
    #[error("save I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a player command was rejected.
///
/// These are categorical, not exceptional: each one is reported to the
/// presentation collaborator and leaves world and session state untouched.
/// Validation fully precedes mutation for every verb.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The first token matched no verb or alias.
    #[error("I don't know that command. Try \"help\".")]
    CommandNotRecognized,

    /// The verb was recognized but its argument was missing or malformed.
    #[error("that's not how this command works. Try \"help\".")]
    ArgumentInvalid,

    /// The named item does not exist in the world.
    #[error("no such item exists.")]
    ItemNotFound,

    /// The item exists but is not in the current room.
    #[error("that item is not in this room.")]
    ItemNotInRoom,

    /// The item is not in the inventory.
    #[error("you are not carrying that.")]
    ItemNotInInventory,

    /// The item's pickable flag is off.
    #[error("you can't pick that up.")]
    ItemNotPickable,

    /// The item's usable flag is off.
    #[error("that item has no obvious use.")]
    ItemNotUsable,

    /// The item's analyzable flag is off.
    #[error("there is nothing to learn from that item.")]
    ItemNotAnalyzable,

    /// Adding the item would exceed the inventory weight capacity.
    #[error("that is too heavy; drop something first.")]
    InventoryFull,

    /// No adjacent room exists in the requested direction.
    #[error("there is nothing that way.")]
    RoomNotFound,

    /// The adjacent room is locked; carries the unlock item for guidance.
    #[error("that door is locked. It needs: {required}")]
    RoomLocked {
        /// Display name of the item required to unlock the room.
        required: String,
    },

    /// A use command targeted a room that is not locked.
    #[error("that door is not locked.")]
    RoomNotLocked,

    /// The top inventory item does not match the room's unlock key.
    #[error("that is not the right key for this door.")]
    IncompatibleKey,

    /// State-drift guard: the analyzed room is not the player's room.
    #[error("you can't analyze a room from a distance.")]
    NotInThisRoom,

    /// The named save file does not exist.
    #[error("no save file with that name exists.")]
    SaveFileNotFound,

    /// A fatal engine failure surfaced while executing the command.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
