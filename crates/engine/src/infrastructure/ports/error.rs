//! Error types for port operations.

/// Persistence store errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying storage failed - includes the key for tracing.
    #[error("Storage error for '{key}': {message}")]
    Io { key: String, message: String },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Key is not usable by this store.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl StoreError {
    pub fn io(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Io {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CombatError {
    #[error("Combat failed: {0}")]
    Failed(String),
    #[error("Malformed combat result: {0}")]
    MalformedResult(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Character not found: {0}")]
    CharacterNotFound(String),
    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Inventory rejected '{item}': {reason}")]
    Rejected { item: String, reason: String },
    #[error("Inventory unavailable: {0}")]
    Unavailable(String),
}
