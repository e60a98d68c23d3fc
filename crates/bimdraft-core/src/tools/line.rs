//! Two-click line tool.

use super::{DrawingTool, ToolContext, ToolCore, ToolKind};
use crate::entities::{Entity, Line};
use crate::geometry::Vector2;

#[derive(Debug, Default)]
pub struct LineTool {
    core: ToolCore,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingTool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    fn capture_point(&mut self, _ctx: &mut ToolContext<'_>, point: Vector2) {
        match self.core.last_point() {
            None => self.core.points.push(point),
            Some(start) => {
                self.core.commit(Line::new(start, point));
                self.finish();
            }
        }
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        self.core
            .last_point()
            .map(|start| vec![Line::new(start, cursor).into()])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityTrait;
    use crate::tools::ToolState;
    use crate::tools::test_support::*;

    #[test]
    fn test_two_clicks_make_a_line() {
        let mut h = Harness::new();
        let mut tool = LineTool::new();
        tool.activate();

        h.click(&mut tool, v(0.0, 0.0));
        assert_eq!(tool.state(), ToolState::Preview);
        h.hover(&mut tool, v(4.0, 3.0));
        assert_eq!(tool.preview().len(), 1);

        h.click(&mut tool, v(4.0, 3.0));
        assert_eq!(tool.state(), ToolState::Complete);
        assert!(tool.preview().is_empty());

        let done = tool.take_completed();
        assert_eq!(done.len(), 1);
        match &done[0] {
            Entity::Line(line) => {
                assert_eq!(line.start(), v(0.0, 0.0));
                assert_eq!(line.end(), v(4.0, 3.0));
                assert_eq!(line.properties().layer, "0");
            }
            other => panic!("expected a line, got {:?}", other.kind()),
        }
        assert_eq!(tool.state(), ToolState::Active);
    }

    #[test]
    fn test_escape_discards_first_point() {
        let mut h = Harness::new();
        let mut tool = LineTool::new();
        tool.activate();
        h.click(&mut tool, v(1.0, 1.0));
        assert!(h.key(&mut tool, "Escape"));
        assert_eq!(tool.state(), ToolState::Active);
        assert!(tool.core().points.is_empty());
        assert!(tool.take_completed().is_empty());
    }

    #[test]
    fn test_second_point_snaps_to_existing_endpoint() {
        let mut h = Harness::new();
        h.drawing.add_entity(Line::new(v(10.0, 10.0), v(20.0, 10.0)));
        let mut tool = LineTool::new();
        tool.activate();
        h.click(&mut tool, v(0.0, 0.0));
        h.click(&mut tool, v(10.6, 9.7));
        let done = tool.take_completed();
        let Entity::Line(line) = &done[0] else {
            panic!("expected a line");
        };
        assert_eq!(line.end(), v(10.0, 10.0));
    }
}
