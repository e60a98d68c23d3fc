//! Center-radius circle tool.

use super::{DrawingTool, ToolContext, ToolCore, ToolKind};
use crate::entities::{Circle, Entity};
use crate::error::{DraftError, DraftResult};
use crate::geometry::{EPSILON, Vector2};

/// Circle centered on `center` passing through `edge`. Coincident points
/// give no circle.
pub fn circle_through(center: Vector2, edge: Vector2) -> DraftResult<Circle> {
    let radius = center.distance_to(edge);
    if radius <= EPSILON {
        return Err(DraftError::InvalidGeometry("circle radius is zero".to_string()));
    }
    Ok(Circle::new(center, radius))
}

#[derive(Debug, Default)]
pub struct CircleTool {
    core: ToolCore,
}

impl CircleTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingTool for CircleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Circle
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn capture_point(&mut self, _ctx: &mut ToolContext<'_>, point: Vector2) {
        let Some(center) = self.core.last_point() else {
            self.core.points.push(point);
            return;
        };
        match circle_through(center, point) {
            Ok(circle) => {
                self.core.commit(circle);
                self.finish();
            }
            Err(err) => {
                log::warn!("{err}, discarding");
                self.reset();
            }
        }
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        self.core
            .last_point()
            .map(|center| vec![Circle::new(center, center.distance_to(cursor)).into()])
            .unwrap_or_default()
    }
}
