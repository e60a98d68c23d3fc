//! Interactive drawing tools.
//!
//! Every tool is a small state machine over [`ToolState`]. Shared plumbing
//! (point resolution, previews, the completed buffer, Escape) lives in the
//! provided methods of [`DrawingTool`]; a tool implements point capture,
//! preview construction and its own keys.

mod arc;
mod circle;
mod dimension;
mod line;
mod manager;
mod polyline;
mod rectangle;
mod select;
mod transform;
mod wall_split;

pub use arc::ArcTool;
pub use circle::{CircleTool, circle_through};
pub use dimension::DimensionTool;
pub use line::LineTool;
pub use manager::ToolManager;
pub use polyline::PolylineTool;
pub use rectangle::{RectangleTool, checked_rectangle_walls, rectangle_walls};
pub use select::SelectTool;
pub use transform::{MoveTool, RotateTool, ScaleTool, rotation_between, scale_factor};
pub use wall_split::WallSplitTool;

use crate::drawing::Drawing;
use crate::entities::{DEFAULT_LAYER, Entity, EntityId, EntityTrait};
use crate::geometry::Vector2;
use crate::input::{KeyEventData, MouseButton, MouseEventData};
use crate::settings::DraftSettings;
use crate::snap::SnapManager;
use crate::wall_types::WallType;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Line,
    Arc,
    Circle,
    Rectangle,
    Polyline,
    Dimension,
    Move,
    Rotate,
    Scale,
    WallSplit,
}

impl ToolKind {
    pub const ALL: [ToolKind; 11] = [
        ToolKind::Select,
        ToolKind::Line,
        ToolKind::Arc,
        ToolKind::Circle,
        ToolKind::Rectangle,
        ToolKind::Polyline,
        ToolKind::Dimension,
        ToolKind::Move,
        ToolKind::Rotate,
        ToolKind::Scale,
        ToolKind::WallSplit,
    ];

    /// Build a fresh tool. Tools that create walls take `wall_type`.
    pub fn create(self, wall_type: &WallType) -> Box<dyn DrawingTool> {
        match self {
            ToolKind::Select => Box::new(SelectTool::new()),
            ToolKind::Line => Box::new(LineTool::new()),
            ToolKind::Arc => Box::new(ArcTool::new()),
            ToolKind::Circle => Box::new(CircleTool::new()),
            ToolKind::Rectangle => Box::new(RectangleTool::new(wall_type.clone())),
            ToolKind::Polyline => Box::new(PolylineTool::new()),
            ToolKind::Dimension => Box::new(DimensionTool::new()),
            ToolKind::Move => Box::new(MoveTool::new()),
            ToolKind::Rotate => Box::new(RotateTool::new()),
            ToolKind::Scale => Box::new(ScaleTool::new()),
            ToolKind::WallSplit => Box::new(WallSplitTool::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Line => "Line",
            ToolKind::Arc => "Arc",
            ToolKind::Circle => "Circle",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Polyline => "Polyline",
            ToolKind::Dimension => "Dimension",
            ToolKind::Move => "Move",
            ToolKind::Rotate => "Rotate",
            ToolKind::Scale => "Scale",
            ToolKind::WallSplit => "Wall Split",
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolState {
    /// Not activated; ignores input.
    #[default]
    Idle,
    /// Waiting for the next point.
    Active,
    /// At least one point captured and a preview is showing.
    Preview,
    /// A result sits in the completed buffer. Capture state is already
    /// reset, so the next click starts a new shape.
    Complete,
}

/// Notifications a tool raises for the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolEvent {
    SelectionChanged(Vec<EntityId>),
    EntitiesModified(Vec<EntityId>),
    /// The tool never deletes; the application removes these.
    DeleteRequested(Vec<EntityId>),
}

/// What a tool may touch while handling one event.
pub struct ToolContext<'a> {
    pub drawing: &'a mut Drawing,
    pub snap: &'a mut SnapManager,
    pub settings: &'a DraftSettings,
    /// World to screen projection of the current view.
    pub project: &'a dyn Fn(Vector2) -> Vector2,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        drawing: &'a mut Drawing,
        snap: &'a mut SnapManager,
        settings: &'a DraftSettings,
        project: &'a dyn Fn(Vector2) -> Vector2,
    ) -> Self {
        Self {
            drawing,
            snap,
            settings,
            project,
        }
    }

    /// Layered point resolution: object snap, then polar tracking from
    /// `base`, then the grid.
    pub fn resolve_point(&mut self, raw: Vector2, base: Option<Vector2>) -> Vector2 {
        if let Some(hit) = self
            .snap
            .find_snap(raw, base, self.drawing.entities(), self.project)
        {
            return hit.point;
        }
        if let Some(tracked) = base.and_then(|b| self.settings.polar.track(b, raw)) {
            return tracked.point;
        }
        self.settings.grid.snap(raw)
    }

    /// Convert a screen-pixel length at `at` into world units.
    pub fn world_distance(&self, pixels: f64, at: Vector2) -> f64 {
        let origin = (self.project)(at);
        let unit = (self.project)(at + Vector2::new(1.0, 0.0));
        let scale = origin.distance_to(unit);
        if scale < f64::EPSILON { pixels } else { pixels / scale }
    }
}

/// Capture state shared by all tools.
#[derive(Debug, Clone)]
pub struct ToolCore {
    pub state: ToolState,
    /// Points captured so far.
    pub points: Vec<Vector2>,
    /// Last resolved cursor position.
    pub cursor: Option<Vector2>,
    pub preview: Vec<Entity>,
    completed: Vec<Entity>,
    events: Vec<ToolEvent>,
    /// Layer assigned to newly created entities.
    pub layer: String,
}

impl Default for ToolCore {
    fn default() -> Self {
        Self {
            state: ToolState::Idle,
            points: Vec::new(),
            cursor: None,
            preview: Vec::new(),
            completed: Vec::new(),
            events: Vec::new(),
            layer: DEFAULT_LAYER.to_string(),
        }
    }
}

impl ToolCore {
    pub fn last_point(&self) -> Option<Vector2> {
        self.points.last().copied()
    }

    /// Queue a newly created entity on the tool's layer.
    pub fn commit(&mut self, entity: impl Into<Entity>) {
        let mut entity = entity.into();
        entity.properties_mut().layer = self.layer.clone();
        log::debug!("Committed {:?} {}", entity.kind(), entity.id());
        self.completed.push(entity);
    }

    /// Queue an entity as is (copies keep their source layer).
    pub fn commit_copy(&mut self, entity: Entity) {
        log::debug!("Committed copy {}", entity.id());
        self.completed.push(entity);
    }

    pub fn emit(&mut self, event: ToolEvent) {
        self.events.push(event);
    }

    /// Drop captured points and the preview.
    pub fn clear_capture(&mut self) {
        self.points.clear();
        self.preview.clear();
    }
}

/// Drawing tool contract.
pub trait DrawingTool: std::fmt::Debug {
    fn kind(&self) -> ToolKind;

    fn core(&self) -> &ToolCore;

    fn core_mut(&mut self) -> &mut ToolCore;

    /// Handle one resolved point.
    fn capture_point(&mut self, ctx: &mut ToolContext<'_>, point: Vector2);

    /// Preview for the captured points plus the live cursor. Empty when
    /// there is not enough to show.
    fn build_preview(&self, cursor: Vector2) -> Vec<Entity>;

    /// Tool keys. Returns true when consumed.
    fn handle_tool_key(&mut self, _ctx: &mut ToolContext<'_>, _key: &KeyEventData) -> bool {
        false
    }

    /// Tool-specific part of [`DrawingTool::reset`].
    fn on_reset(&mut self) {}

    fn state(&self) -> ToolState {
        self.core().state
    }

    /// Last captured point; the base for tracking and perpendicular snaps.
    fn base_point(&self) -> Option<Vector2> {
        self.core().last_point()
    }

    fn activate(&mut self) {
        self.reset();
        self.core_mut().state = ToolState::Active;
        log::debug!("Activated {} tool", self.kind().name());
    }

    fn deactivate(&mut self) {
        self.reset();
        self.core_mut().state = ToolState::Idle;
    }

    /// Back to waiting for the first point (never back to `Idle`).
    fn reset(&mut self) {
        self.on_reset();
        let core = self.core_mut();
        core.clear_capture();
        core.cursor = None;
        if core.state != ToolState::Idle {
            core.state = ToolState::Active;
        }
    }

    /// Mark a result as ready and clear capture state.
    fn finish(&mut self) {
        self.reset();
        self.core_mut().state = ToolState::Complete;
    }

    fn on_mouse_down(&mut self, ctx: &mut ToolContext<'_>, event: &MouseEventData) {
        if event.button != MouseButton::Left || self.state() == ToolState::Idle {
            return;
        }
        let point = ctx.resolve_point(event.world_pos, self.base_point());
        self.capture_point(ctx, point);
        self.refresh_preview();
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext<'_>, event: &MouseEventData) {
        if self.state() == ToolState::Idle {
            return;
        }
        let point = ctx.resolve_point(event.world_pos, self.base_point());
        self.core_mut().cursor = Some(point);
        self.refresh_preview();
    }

    fn on_mouse_up(&mut self, _ctx: &mut ToolContext<'_>, _event: &MouseEventData) {}

    /// Tool keys first, then the shared Escape.
    fn on_key_down(&mut self, ctx: &mut ToolContext<'_>, key: &KeyEventData) -> bool {
        if self.state() == ToolState::Idle {
            return false;
        }
        if self.handle_tool_key(ctx, key) {
            return true;
        }
        if key.is("Escape") {
            self.reset();
            return true;
        }
        false
    }

    /// Typed coordinate entry; bypasses snapping.
    fn input_point(&mut self, ctx: &mut ToolContext<'_>, point: Vector2) {
        if self.state() != ToolState::Idle {
            self.capture_point(ctx, point);
            self.refresh_preview();
        }
    }

    /// Rebuild the preview from the stored cursor and derive the state
    /// from the captured points.
    fn refresh_preview(&mut self) {
        let preview = match self.core().cursor {
            Some(cursor) if !self.core().points.is_empty() => self.build_preview(cursor),
            _ => Vec::new(),
        };
        let core = self.core_mut();
        core.preview = preview;
        match core.state {
            ToolState::Idle | ToolState::Complete if core.points.is_empty() => {}
            _ if core.points.is_empty() => core.state = ToolState::Active,
            _ => core.state = ToolState::Preview,
        }
    }

    fn preview(&self) -> &[Entity] {
        &self.core().preview
    }

    /// Drain finished entities. A `Complete` tool goes back to `Active`.
    fn take_completed(&mut self) -> Vec<Entity> {
        let core = self.core_mut();
        if core.state == ToolState::Complete {
            core.state = ToolState::Active;
        }
        std::mem::take(&mut core.completed)
    }

    fn take_events(&mut self) -> Vec<ToolEvent> {
        std::mem::take(&mut self.core_mut().events)
    }
}
