use crate::error::{WorldError, WorldResult};

/// An interactive object: a key, a document, a device.
///
/// Items are value definitions loaded once at startup, but two fields are
/// mutable at runtime: the capability flags (a key can stop being usable
/// after it opens a door) and nothing else. An item moved between a room
/// and an inventory is always the same registry entry referenced by id,
/// never a copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Unique id, matched after [`crate::normalize_id`] normalization.
    pub id: String,
    /// Display name shown to the player.
    pub name: String,
    /// Descriptive text shown by the analyze command.
    pub description: String,
    /// Whether the item can be picked up from a room.
    pub pickable: bool,
    /// Whether the item can be used to unlock a room.
    pub usable: bool,
    /// Whether the analyze command works on this item.
    pub analyzable: bool,
    /// Display tag (color or style hint), opaque to the engine.
    pub tag: String,
    weight: f64,
}

impl Item {
    /// Create an item with all capability flags off.
    ///
    /// Returns a validation error if `weight` is negative.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        weight: f64,
    ) -> WorldResult<Self> {
        if weight < 0.0 {
            return Err(WorldError::Validation(format!(
                "item weight must be non-negative, got {weight}"
            )));
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            pickable: false,
            usable: false,
            analyzable: false,
            tag: String::new(),
            weight,
        })
    }

    /// Mark the item as pickable.
    pub fn pickable(mut self) -> Self {
        self.pickable = true;
        self
    }

    /// Mark the item as usable.
    pub fn usable(mut self) -> Self {
        self.usable = true;
        self
    }

    /// Mark the item as analyzable.
    pub fn analyzable(mut self) -> Self {
        self.analyzable = true;
        self
    }

    /// Set the display tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Weight in kilograms. Always non-negative.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}
