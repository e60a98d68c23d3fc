//! Three-point arc tool: start, a point on the arc, end.

use super::{DrawingTool, ToolContext, ToolCore, ToolKind};
use crate::entities::{Arc, Entity, Line};
use crate::geometry::Vector2;

#[derive(Debug, Default)]
pub struct ArcTool {
    core: ToolCore,
}

impl ArcTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingTool for ArcTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Arc
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn capture_point(&mut self, _ctx: &mut ToolContext<'_>, point: Vector2) {
        if self.core.points.len() < 2 {
            self.core.points.push(point);
            return;
        }
        let (p1, p2) = (self.core.points[0], self.core.points[1]);
        match Arc::through_points(p1, p2, point) {
            Some(arc) => {
                self.core.commit(arc);
                self.finish();
            }
            None => {
                log::warn!("Arc points are colinear, discarding");
                self.reset();
            }
        }
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        match self.core.points.as_slice() {
            [p1] => vec![Line::new(*p1, cursor).into()],
            [p1, p2] => match Arc::through_points(*p1, *p2, cursor) {
                Some(arc) => vec![arc.into()],
                None => vec![Line::new(*p1, cursor).into()],
            },
            _ => Vec::new(),
        }
    }
}
