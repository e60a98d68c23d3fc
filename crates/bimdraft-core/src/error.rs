//! Error types for the drafting core.

use crate::entities::EntityKind;
use thiserror::Error;

/// Errors raised by the geometry and entity layer.
///
/// These are programmer errors (bad indices, unknown registry entries) and
/// propagate to the caller. Degenerate geometry and snap misses are not
/// errors.
#[derive(Debug, Error)]
pub enum DraftError {
    /// A wall references a wall type the registry does not know.
    #[error("Unknown wall type: {0}")]
    UnknownWallType(String),

    /// Vertex index outside the polyline.
    #[error("Vertex index {index} out of bounds (polyline has {len} vertices)")]
    VertexIndexOutOfBounds { index: usize, len: usize },

    /// Removing a vertex would leave fewer vertices than allowed.
    #[error("Polyline needs at least {min} vertices, got {actual}")]
    PolylineTooShort { min: usize, actual: usize },

    /// Geometry that cannot be constructed at all.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Entity kind without a concrete implementation.
    #[error("Unsupported entity type: {0:?}")]
    UnsupportedEntity(EntityKind),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a settings or drawing file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for drafting operations.
pub type DraftResult<T> = Result<T, DraftError>;
