//! Tool manager: owns the active tool and routes input to it.

use super::{DrawingTool, ToolContext, ToolEvent, ToolKind};
use crate::drawing::Drawing;
use crate::entities::{Entity, WallCornerTable};
use crate::error::DraftResult;
use crate::geometry::Vector2;
use crate::input::{KeyEventData, MouseEventData};
use crate::settings::DraftSettings;
use crate::snap::{SnapManager, SnapResult};
use crate::tracking::DynamicInput;
use crate::wall_types::{WallType, WallTypeRegistry};

/// Tool manager handles tool state and interactions.
///
/// Completed entities are moved into the drawing after every event, each
/// batch behind one undo step. Tool events queue up until
/// [`ToolManager::take_events`].
#[derive(Debug)]
pub struct ToolManager {
    /// Currently active tool
    tool: Box<dyn DrawingTool>,
    snap: SnapManager,
    settings: DraftSettings,
    /// Wall type handed to wall-creating tools
    wall_type: WallType,
    /// Typed coordinate buffer
    input: DynamicInput,
    events: Vec<ToolEvent>,
}

impl ToolManager {
    /// Create a manager with the select tool active. The default wall type
    /// named in `settings` must exist in `registry`.
    pub fn new(settings: DraftSettings, registry: &WallTypeRegistry) -> DraftResult<Self> {
        let wall_type = registry.get(&settings.default_wall_type)?.clone();
        let tool = build_tool(ToolKind::Select, &wall_type, &settings);
        Ok(Self {
            tool,
            snap: SnapManager::new(settings.snap.clone()),
            settings,
            wall_type,
            input: DynamicInput::new(),
            events: Vec::new(),
        })
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn tool(&self) -> &dyn DrawingTool {
        self.tool.as_ref()
    }

    /// Switch tools. The old tool drops any in-progress capture.
    pub fn set_tool(&mut self, kind: ToolKind) {
        self.tool.deactivate();
        self.tool = build_tool(kind, &self.wall_type, &self.settings);
        self.input.clear();
        self.snap.clear_last_result();
        log::debug!("Switched to {} tool", kind.name());
    }

    pub fn wall_type(&self) -> &WallType {
        &self.wall_type
    }

    /// Change the wall type for subsequent walls. Restarts a wall tool.
    pub fn set_wall_type(&mut self, wall_type: WallType) {
        self.wall_type = wall_type;
        if self.current_tool() == ToolKind::Rectangle {
            self.set_tool(ToolKind::Rectangle);
        }
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: DraftSettings) {
        self.snap = SnapManager::new(settings.snap.clone());
        self.tool.core_mut().layer = settings.default_layer.clone();
        self.settings = settings;
    }

    /// Wall end connections using the configured join tolerance.
    pub fn wall_corners(&self, drawing: &Drawing) -> WallCornerTable {
        drawing.wall_corners(self.settings.wall_join_tolerance)
    }

    pub fn snap(&self) -> &SnapManager {
        &self.snap
    }

    pub fn snap_mut(&mut self) -> &mut SnapManager {
        &mut self.snap
    }

    /// Snap indicator for the last cursor position.
    pub fn last_snap(&self) -> Option<&SnapResult> {
        self.snap.last_result()
    }

    pub fn dynamic_input(&self) -> &DynamicInput {
        &self.input
    }

    pub fn preview(&self) -> &[Entity] {
        self.tool.preview()
    }

    pub fn on_mouse_down(
        &mut self,
        drawing: &mut Drawing,
        project: &dyn Fn(Vector2) -> Vector2,
        event: &MouseEventData,
    ) {
        self.dispatch(drawing, project, |tool, ctx| tool.on_mouse_down(ctx, event));
    }

    pub fn on_mouse_move(
        &mut self,
        drawing: &mut Drawing,
        project: &dyn Fn(Vector2) -> Vector2,
        event: &MouseEventData,
    ) {
        self.dispatch(drawing, project, |tool, ctx| tool.on_mouse_move(ctx, event));
    }

    pub fn on_mouse_up(
        &mut self,
        drawing: &mut Drawing,
        project: &dyn Fn(Vector2) -> Vector2,
        event: &MouseEventData,
    ) {
        self.dispatch(drawing, project, |tool, ctx| tool.on_mouse_up(ctx, event));
    }

    /// Keyboard routing. Coordinate characters feed the dynamic input
    /// buffer while a drawing tool is active; Enter submits it. Everything
    /// else goes to the tool. Returns true when the key was consumed.
    pub fn on_key_down(
        &mut self,
        drawing: &mut Drawing,
        project: &dyn Fn(Vector2) -> Vector2,
        key: &KeyEventData,
    ) -> bool {
        if self.accepts_typed_input(key) {
            if let Some(c) = key.char() {
                if self.input.push_char(c) {
                    return true;
                }
            }
            if self.input.is_active() {
                if key.is("Enter") {
                    self.submit_typed_point(drawing, project);
                    return true;
                }
                if key.is("Backspace") {
                    self.input.backspace();
                    return true;
                }
                if key.is("Escape") {
                    self.input.clear();
                    return true;
                }
            }
        }
        let mut consumed = false;
        self.dispatch(drawing, project, |tool, ctx| consumed = tool.on_key_down(ctx, key));
        consumed
    }

    fn accepts_typed_input(&self, key: &KeyEventData) -> bool {
        self.current_tool() != ToolKind::Select && !key.ctrl && !key.alt
    }

    fn submit_typed_point(&mut self, drawing: &mut Drawing, project: &dyn Fn(Vector2) -> Vector2) {
        let origin = self.tool.base_point();
        let cursor = self
            .tool
            .core()
            .cursor
            .or(origin)
            .unwrap_or(Vector2::ZERO);
        let parsed = self.input.parse(origin, cursor);
        match parsed {
            Some(point) => {
                log::debug!("Typed point ({:.3}, {:.3})", point.x, point.y);
                self.dispatch(drawing, project, |tool, ctx| tool.input_point(ctx, point));
            }
            None => log::warn!("Could not parse typed input '{}'", self.input.buffer()),
        }
        self.input.clear();
    }

    /// Run one tool callback with a fresh context, then move results into
    /// the drawing.
    fn dispatch(
        &mut self,
        drawing: &mut Drawing,
        project: &dyn Fn(Vector2) -> Vector2,
        f: impl FnOnce(&mut dyn DrawingTool, &mut ToolContext<'_>),
    ) {
        {
            let mut ctx = ToolContext::new(drawing, &mut self.snap, &self.settings, project);
            f(self.tool.as_mut(), &mut ctx);
        }
        self.flush(drawing);
    }

    fn flush(&mut self, drawing: &mut Drawing) {
        let completed = self.tool.take_completed();
        if !completed.is_empty() {
            drawing.push_undo();
            let count = completed.len();
            for entity in completed {
                drawing.add_entity(entity);
            }
            log::info!("Added {} entities from {} tool", count, self.current_tool().name());
        }
        self.events.extend(self.tool.take_events());
    }

    /// Drain queued tool events.
    pub fn take_events(&mut self) -> Vec<ToolEvent> {
        std::mem::take(&mut self.events)
    }

    /// Carry out the deletions requested in `events` behind one undo step.
    /// Returns the number of entities removed.
    pub fn apply_deletions(drawing: &mut Drawing, events: &[ToolEvent]) -> usize {
        let ids: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                ToolEvent::DeleteRequested(ids) => Some(ids.iter().copied()),
                _ => None,
            })
            .flatten()
            .filter(|id| drawing.contains(*id))
            .collect();
        if ids.is_empty() {
            return 0;
        }
        drawing.push_undo();
        let removed = ids
            .into_iter()
            .filter_map(|id| drawing.remove_entity(id))
            .count();
        log::info!("Deleted {} entities", removed);
        removed
    }
}

/// Fresh, activated tool drawing on the configured default layer.
fn build_tool(kind: ToolKind, wall_type: &WallType, settings: &DraftSettings) -> Box<dyn DrawingTool> {
    let mut tool = kind.create(wall_type);
    tool.core_mut().layer = settings.default_layer.clone();
    tool.activate();
    tool
}
