/// Alias for `Result<T, WorldError>`.
pub type WorldResult<T> = Result<T, WorldError>;

/// Errors that can occur when building or querying a world.
///
/// All of these indicate an unusable dataset and are fatal at load time;
/// none of them correspond to recoverable in-game conditions.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// An item with the same (normalized) id is already registered.
    #[error("duplicate item id: \"{0}\"")]
    DuplicateItem(String),

    /// A room with the same (normalized) id is already registered.
    #[error("duplicate room id: \"{0}\"")]
    DuplicateRoom(String),

    /// A referenced item id does not resolve in the registry.
    #[error("unknown item id: \"{0}\"")]
    UnknownItem(String),

    /// A referenced room id does not resolve in the registry.
    #[error("unknown room id: \"{0}\"")]
    UnknownRoom(String),

    /// A value failed construction-time validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// World data could not be deserialized.
    #[error("malformed world data: {0}")]
    Malformed(#[from] serde_json::Error),
}
