//! Click-by-click polyline tool.
//!
//! Enter finishes an open polyline, `C` or a click on the first vertex
//! closes it, Backspace removes the last vertex.

use super::{DrawingTool, ToolContext, ToolCore, ToolKind};
use crate::entities::{Entity, Polyline};
use crate::geometry::Vector2;
use crate::input::KeyEventData;

#[derive(Debug, Default)]
pub struct PolylineTool {
    core: ToolCore,
}

impl PolylineTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn commit(&mut self, closed: bool) {
        let vertices = std::mem::take(&mut self.core.points);
        match Polyline::new(vertices, closed) {
            Ok(polyline) => {
                self.core.commit(polyline);
                self.finish();
            }
            Err(err) => {
                log::warn!("Polyline discarded: {err}");
                self.reset();
            }
        }
    }
}

impl DrawingTool for PolylineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Polyline
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn capture_point(&mut self, ctx: &mut ToolContext<'_>, point: Vector2) {
        let points = &self.core.points;
        if points.len() >= 3 && point.distance_to(points[0]) <= ctx.settings.polyline_close_tolerance {
            self.commit(true);
            return;
        }
        self.core.points.push(point);
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        if self.core.points.is_empty() {
            return Vec::new();
        }
        let mut vertices = self.core.points.clone();
        vertices.push(cursor);
        Polyline::new(vertices, false)
            .map(|p| vec![p.into()])
            .unwrap_or_default()
    }

    fn handle_tool_key(&mut self, _ctx: &mut ToolContext<'_>, key: &KeyEventData) -> bool {
        let count = self.core.points.len();
        if key.is("Enter") {
            if count >= 2 {
                self.commit(false);
            }
            return true;
        }
        if key.is("c") {
            if count >= 3 {
                self.commit(true);
            }
            return true;
        }
        if key.is("Backspace") {
            if self.core.points.pop().is_some() {
                self.refresh_preview();
            }
            return true;
        }
        false
    }
}
