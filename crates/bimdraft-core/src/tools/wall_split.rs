//! Wall split tool. Draws a split line across walls; the split itself is
//! left to the application.

use super::{DrawingTool, ToolContext, ToolCore, ToolKind};
use crate::entities::{Entity, Line};
use crate::geometry::Vector2;

#[derive(Debug, Default)]
pub struct WallSplitTool {
    core: ToolCore,
}

impl WallSplitTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingTool for WallSplitTool {
    fn kind(&self) -> ToolKind {
        ToolKind::WallSplit
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
    use crate::tools::test_support::*;

    #[test]
    fn test_split_line_is_committed() {
        let mut h = Harness::new();
        let mut tool = WallSplitTool::new();
        tool.activate();
        h.click(&mut tool, v(5.0, -3.0));
        h.click(&mut tool, v(5.0, 3.0));
        let done = tool.take_completed();
        let [Entity::Line(line)] = done.as_slice() else {
            panic!("expected one line");
        };
        assert_eq!(line.start(), v(5.0, -3.0));
        assert_eq!(line.end(), v(5.0, 3.0));
    }
}
