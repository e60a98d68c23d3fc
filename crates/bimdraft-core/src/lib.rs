//! BimDraft Core Library
//!
//! Platform-agnostic 2D drafting core: the entity model, object snapping,
//! polar tracking and the interactive drawing tools.

pub mod camera;
pub mod drawing;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod settings;
pub mod snap;
pub mod storage;
pub mod tools;
pub mod tracking;
pub mod wall_types;

pub use camera::Camera;
pub use drawing::Drawing;
pub use entities::{
    Arc, Circle, Dimension, Entity, EntityId, EntityKind, EntityProperties, EntityRecord,
    EntityTrait, Line, Polyline, Rectangle, Room, Text, Wall,
};
pub use error::{DraftError, DraftResult};
pub use geometry::Vector2;
pub use input::{KeyEventData, Modifiers, MouseButton, MouseEventData};
pub use settings::DraftSettings;
pub use snap::{SnapManager, SnapResult, SnapSettings, SnapType};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use tools::{DrawingTool, ToolContext, ToolEvent, ToolKind, ToolManager, ToolState};
pub use tracking::{DynamicInput, PolarTracking};
pub use wall_types::{WallType, WallTypeRegistry};
