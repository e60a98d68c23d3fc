//! Linear dimension tool: two measured points, then the text position.

use super::{DrawingTool, ToolContext, ToolCore, ToolKind};
use crate::entities::{Dimension, Entity, Line};
use crate::geometry::Vector2;

#[derive(Debug, Default)]
pub struct DimensionTool {
    core: ToolCore,
}

impl DimensionTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingTool for DimensionTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Dimension
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn capture_point(&mut self, _ctx: &mut ToolContext<'_>, point: Vector2) {
        if let [start, end] = self.core.points[..] {
            self.core.commit(Dimension::new(start, end, point));
            self.finish();
        } else {
            self.core.points.push(point);
        }
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        match self.core.points[..] {
            [start] => vec![Line::new(start, cursor).into()],
            [start, end] => vec![Dimension::new(start, end, cursor).into()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::*;

    #[test]
    fn test_three_clicks_make_a_dimension() {
        let mut h = Harness::new();
        let mut tool = DimensionTool::new();
        tool.activate();
        h.click(&mut tool, v(0.0, 0.0));
        h.hover(&mut tool, v(6.0, 0.0));
        assert!(matches!(tool.preview(), [Entity::Line(_)]));

        h.click(&mut tool, v(6.0, 0.0));
        h.hover(&mut tool, v(3.0, -2.0));
        assert!(matches!(tool.preview(), [Entity::Dimension(_)]));

        h.click(&mut tool, v(3.0, -2.0));
        let done = tool.take_completed();
        let [Entity::Dimension(dim)] = done.as_slice() else {
            panic!("expected one dimension");
        };
        assert!((dim.measurement() - 6.0).abs() < 1e-12);
        assert_eq!(dim.display_text(), "6.00");
        assert_eq!(dim.text_position(), v(3.0, -2.0));
    }
}
