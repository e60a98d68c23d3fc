//! Storage abstraction for drawing persistence.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::drawing::Drawing;
use crate::wall_types::WallTypeRegistry;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Drawing not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Drawing storage backend.
///
/// Drawings are stored in their JSON form; loading resolves wall types
/// against the registry passed in.
pub trait Storage: Send + Sync {
    /// Save a drawing under `id`, replacing any previous version.
    fn save(&self, id: &str, drawing: &Drawing) -> StorageResult<()>;

    /// Load a drawing.
    fn load(&self, id: &str, registry: &WallTypeRegistry) -> StorageResult<Drawing>;

    /// Delete a drawing. Missing ids are not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all drawing ids.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a drawing exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
