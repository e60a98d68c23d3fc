//! Rectangle tool. Two opposite corners produce four joined walls.

use super::{DrawingTool, ToolContext, ToolCore, ToolKind};
use crate::entities::{Entity, Wall};
use crate::error::{DraftError, DraftResult};
use crate::geometry::Vector2;
use crate::wall_types::WallType;

/// Four walls around the box spanned by `a` and `b`, head to tail:
/// bottom, left, top, right (y-down world).
pub fn rectangle_walls(a: Vector2, b: Vector2, wall_type: &WallType) -> Vec<Wall> {
    let min = Vector2::new(a.x.min(b.x), a.y.min(b.y));
    let max = Vector2::new(a.x.max(b.x), a.y.max(b.y));
    let corners = [
        Vector2::new(max.x, max.y),
        Vector2::new(min.x, max.y),
        Vector2::new(min.x, min.y),
        Vector2::new(max.x, min.y),
    ];
    (0..4)
        .map(|i| Wall::new(corners[i], corners[(i + 1) % 4], wall_type.clone()))
        .collect()
}

/// [`rectangle_walls`], refusing corners closer than `min_corner_distance`.
pub fn checked_rectangle_walls(
    a: Vector2,
    b: Vector2,
    wall_type: &WallType,
    min_corner_distance: f64,
) -> DraftResult<Vec<Wall>> {
    let distance = a.distance_to(b);
    if distance < min_corner_distance {
        return Err(DraftError::InvalidGeometry(format!(
            "rectangle corners {distance:.3} apart, minimum is {min_corner_distance}"
        )));
    }
    Ok(rectangle_walls(a, b, wall_type))
}

#[derive(Debug)]
pub struct RectangleTool {
    core: ToolCore,
    wall_type: WallType,
}

impl RectangleTool {
    pub fn new(wall_type: WallType) -> Self {
        Self {
            core: ToolCore::default(),
            wall_type,
        }
    }

    pub fn wall_type(&self) -> &WallType {
        &self.wall_type
    }

    pub fn set_wall_type(&mut self, wall_type: WallType) {
        self.wall_type = wall_type;
    }
}

impl DrawingTool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn capture_point(&mut self, ctx: &mut ToolContext<'_>, point: Vector2) {
        let Some(first) = self.core.last_point() else {
            self.core.points.push(point);
            return;
        };
        match checked_rectangle_walls(first, point, &self.wall_type, ctx.settings.rect_min_corner_distance) {
            Ok(walls) => {
                for wall in walls {
                    self.core.commit(wall);
                }
                self.finish();
            }
            Err(err) => {
                log::warn!("{err}, discarding");
                self.reset();
            }
        }
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        match self.core.last_point() {
            Some(first) => rectangle_walls(first, cursor, &self.wall_type)
                .into_iter()
                .map(Entity::from)
                .collect(),
            None => Vec::new(),
        }
    }
}
