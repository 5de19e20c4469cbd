use thiserror::Error;

use crate::shop::types::SceneId;

/// Errors that can arise while rendering the armor shop or touching the host store.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Module records and seed files are JSON encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, seed files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// The shop scene was installed without its buy scene child.
    #[error("can't find a buy scene that's a child of scene id={scene_id}")]
    MissingChildScene { scene_id: SceneId },

    /// The shop scene has no parent to return to.
    #[error("can't find a parent of scene id={scene_id}")]
    MissingParentScene { scene_id: SceneId },

    /// Shop configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
