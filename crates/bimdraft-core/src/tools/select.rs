//! Selection tool: pick, shift-toggle, window select and drag-move.

use super::{DrawingTool, ToolContext, ToolCore, ToolEvent, ToolKind, ToolState};
use crate::entities::{Entity, EntityId, EntityTrait, Rectangle};
use crate::geometry::{Vector2, translation};
use crate::input::{KeyEventData, MouseButton, MouseEventData};

/// An in-progress drag of the selection.
#[derive(Debug)]
struct DragState {
    originals: Vec<Entity>,
    last: Vector2,
    moved: bool,
}

/// Click, shift-toggle, window and drag selection. A window takes the
/// entities whose geometry it touches ([`EntityTrait::intersects_rectangle`]),
/// not those whose bounding boxes overlap it.
#[derive(Debug, Default)]
pub struct SelectTool {
    core: ToolCore,
    drag: Option<DragState>,
    /// Window selection in progress; true when adding to the selection.
    window_additive: Option<bool>,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn selection_changed(&mut self, ctx: &ToolContext<'_>) {
        self.core
            .emit(ToolEvent::SelectionChanged(ctx.drawing.selected_ids()));
    }

    fn start_drag(&mut self, ctx: &ToolContext<'_>, at: Vector2) {
        let originals: Vec<Entity> = ctx
            .drawing
            .selected_unlocked_ids()
            .into_iter()
            .filter_map(|id| ctx.drawing.get(id).cloned())
            .collect();
        if originals.is_empty() {
            return;
        }
        self.drag = Some(DragState {
            originals,
            last: at,
            moved: false,
        });
        self.core.state = ToolState::Preview;
    }

    fn drag_to(&mut self, ctx: &mut ToolContext<'_>, point: Vector2) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let delta = point - drag.last;
        if delta.length_squared() == 0.0 {
            return;
        }
        if !drag.moved {
            ctx.drawing.push_undo();
            drag.moved = true;
        }
        let matrix = translation(delta);
        for original in &drag.originals {
            if let Some(entity) = ctx.drawing.get_mut(original.id()) {
                entity.transform(&matrix);
            }
        }
        drag.last = point;
    }

    /// Put dragged entities back and drop the undo entry the drag pushed.
    fn cancel_drag(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        if !drag.moved {
            return;
        }
        for original in drag.originals {
            if let Some(entity) = ctx.drawing.get_mut(original.id()) {
                *entity = original;
            }
        }
        ctx.drawing.discard_last_undo();
        log::debug!("Drag cancelled");
    }

    /// Window hits are [`EntityTrait::intersects_rectangle`] hits: a window
    /// lying wholly inside a circle, rectangle or room misses it.
    fn finish_window(&mut self, ctx: &mut ToolContext<'_>, additive: bool, end: Vector2) {
        let Some(start) = self.core.points.first().copied() else {
            return;
        };
        let min = Vector2::new(start.x.min(end.x), start.y.min(end.y));
        let max = Vector2::new(start.x.max(end.x), start.y.max(end.y));
        let ids = ctx.drawing.entities_in_rect(min, max);
        if additive {
            for id in &ids {
                ctx.drawing.set_selected(*id, true);
            }
        } else {
            ctx.drawing.select_only(&ids);
        }
        log::debug!("Window selected {} entities", ids.len());
        self.selection_changed(ctx);
    }

    fn dragged_ids(drag: &DragState) -> Vec<EntityId> {
        drag.originals.iter().map(|e| e.id()).collect()
    }
}

impl DrawingTool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn core(&self) -> &ToolCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ToolCore {
        &mut self.core
    }

    /// Selection works on raw clicks; typed points have no meaning here.
    fn capture_point(&mut self, _ctx: &mut ToolContext<'_>, _point: Vector2) {}

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        match (self.window_additive, self.core.points.first()) {
            (Some(_), Some(start)) => vec![Rectangle::from_corners(*start, cursor).into()],
            _ => Vec::new(),
        }
    }

    fn on_reset(&mut self) {
        self.drag = None;
        self.window_additive = None;
    }

    fn on_mouse_down(&mut self, ctx: &mut ToolContext<'_>, event: &MouseEventData) {
        if event.button != MouseButton::Left || self.state() == ToolState::Idle {
            return;
        }
        let point = event.world_pos;
        let tolerance = ctx.world_distance(ctx.settings.pick_tolerance, point);
        match ctx.drawing.pick(point, tolerance) {
            Some(id) if event.shift => {
                ctx.drawing.toggle_selected(id);
                self.selection_changed(ctx);
            }
            Some(id) => {
                if !ctx.drawing.is_selected(id) {
                    ctx.drawing.select_only(&[id]);
                    self.selection_changed(ctx);
                }
                self.start_drag(ctx, point);
            }
            None => {
                self.core.points = vec![point];
                self.core.cursor = Some(point);
                self.window_additive = Some(event.shift);
                self.core.state = ToolState::Preview;
            }
        }
    }

    fn on_mouse_move(&mut self, ctx: &mut ToolContext<'_>, event: &MouseEventData) {
        if self.state() == ToolState::Idle {
            return;
        }
        let point = event.world_pos;
        self.core.cursor = Some(point);
        if self.drag.is_some() {
            self.drag_to(ctx, point);
        } else if self.window_additive.is_some() {
            self.core.preview = self.build_preview(point);
        }
    }

    fn on_mouse_up(&mut self, ctx: &mut ToolContext<'_>, event: &MouseEventData) {
        if event.button != MouseButton::Left {
            return;
        }
        if let Some(drag) = self.drag.take() {
            if drag.moved {
                self.core
                    .emit(ToolEvent::EntitiesModified(Self::dragged_ids(&drag)));
            }
        } else if let Some(additive) = self.window_additive {
            self.finish_window(ctx, additive, event.world_pos);
        }
        self.reset();
    }

    fn handle_tool_key(&mut self, ctx: &mut ToolContext<'_>, key: &KeyEventData) -> bool {
        if key.is("Escape") {
            if self.drag.is_some() {
                self.cancel_drag(ctx);
            } else if self.window_additive.is_none() && !ctx.drawing.selected_ids().is_empty() {
                ctx.drawing.clear_selection();
                self.selection_changed(ctx);
            }
            self.reset();
            return true;
        }
        if key.is("Delete") || key.is("Backspace") {
            let ids = ctx.drawing.selected_unlocked_ids();
            if !ids.is_empty() {
                self.core.emit(ToolEvent::DeleteRequested(ids));
            }
            return true;
        }
        if key.ctrl && key.is("a") {
            ctx.drawing.select_all();
            self.selection_changed(ctx);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, Line, Rectangle};
    use crate::input::Modifiers;
    use crate::tools::test_support::*;

    fn shift_click(h: &mut Harness, tool: &mut SelectTool, p: Vector2) {
        let mut event = mouse(p);
        event.shift = true;
        tool.on_mouse_down(&mut h.ctx(), &event);
        tool.on_mouse_up(&mut h.ctx(), &event);
    }

    fn window(h: &mut Harness, tool: &mut SelectTool, from: Vector2, to: Vector2, shift: bool) {
        let mut down = mouse(from);
        down.shift = shift;
        tool.on_mouse_down(&mut h.ctx(), &down);
        tool.on_mouse_move(&mut h.ctx(), &mouse(to));
        tool.on_mouse_up(&mut h.ctx(), &mouse(to));
    }

    fn drag(h: &mut Harness, tool: &mut SelectTool, from: Vector2, to: Vector2) {
        tool.on_mouse_down(&mut h.ctx(), &mouse(from));
        tool.on_mouse_move(&mut h.ctx(), &mouse(to));
    }

    fn setup() -> (Harness, SelectTool, EntityId, EntityId) {
        let mut h = Harness::new();
        let a = h.drawing.add_entity(Line::new(v(0.0, 0.0), v(10.0, 0.0)));
        let b = h.drawing.add_entity(Circle::new(v(20.0, 20.0), 2.0));
        let mut tool = SelectTool::new();
        tool.activate();
        (h, tool, a, b)
    }

    #[test]
    fn test_click_selects_topmost() {
        let (mut h, mut tool, a, _) = setup();
        h.click(&mut tool, v(5.0, 0.2));
        assert_eq!(h.drawing.selected_ids(), vec![a]);
        assert_eq!(tool.take_events(), vec![ToolEvent::SelectionChanged(vec![a])]);
    }

    #[test]
    fn test_pick_tolerance_is_in_pixels() {
        let (mut h, mut tool, _, _) = setup();
        // 5px at 10px per unit is half a unit.
        h.click(&mut tool, v(5.0, 0.6));
        assert!(h.drawing.selected_ids().is_empty());
        h.click(&mut tool, v(5.0, 0.4));
        assert_eq!(h.drawing.selected_ids().len(), 1);
    }

    #[test]
    fn test_shift_click_toggles() {
        let (mut h, mut tool, a, b) = setup();
        h.click(&mut tool, v(5.0, 0.0));
        shift_click(&mut h, &mut tool, v(22.0, 20.0));
        let mut selected = h.drawing.selected_ids();
        selected.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(selected, expected);

        shift_click(&mut h, &mut tool, v(5.0, 0.0));
        assert_eq!(h.drawing.selected_ids(), vec![b]);
    }

    #[test]
    fn test_window_replaces_or_adds() {
        let (mut h, mut tool, a, b) = setup();
        h.drawing.select_only(&[b]);

        drag(&mut h, &mut tool, v(-1.0, -1.0), v(11.0, 1.0));
        assert!(matches!(tool.preview(), [Entity::Rectangle(_)]));
        tool.on_mouse_up(&mut h.ctx(), &mouse(v(11.0, 1.0)));
        assert_eq!(h.drawing.selected_ids(), vec![a]);
        assert!(tool.preview().is_empty());

        let mut event = mouse(v(17.0, 17.0));
        event.shift = true;
        tool.on_mouse_down(&mut h.ctx(), &event);
        tool.on_mouse_up(&mut h.ctx(), &mouse(v(23.0, 23.0)));
        assert_eq!(h.drawing.selected_ids().len(), 2);
    }

    #[test]
    fn test_empty_window_clears_selection() {
        let (mut h, mut tool, a, _) = setup();
        h.drawing.select_only(&[a]);
        drag(&mut h, &mut tool, v(40.0, 40.0), v(50.0, 50.0));
        tool.on_mouse_up(&mut h.ctx(), &mouse(v(50.0, 50.0)));
        assert!(h.drawing.selected_ids().is_empty());
    }

    #[test]
    fn test_drag_moves_selection_with_one_undo() {
        let (mut h, mut tool, a, _) = setup();
        drag(&mut h, &mut tool, v(5.0, 0.0), v(6.0, 1.0));
        tool.on_mouse_move(&mut h.ctx(), &mouse(v(8.0, 3.0)));
        assert!(tool.is_dragging());
        tool.on_mouse_up(&mut h.ctx(), &mouse(v(8.0, 3.0)));

        let Some(Entity::Line(line)) = h.drawing.get(a) else {
            panic!("line missing");
        };
        assert_eq!(line.start(), v(3.0, 3.0));
        assert_eq!(line.end(), v(13.0, 3.0));
        assert!(tool
            .take_events()
            .contains(&ToolEvent::EntitiesModified(vec![a])));

        assert!(h.drawing.undo());
        assert!(!h.drawing.can_undo());
    }

    #[test]
    fn test_escape_reverts_drag() {
        let (mut h, mut tool, a, _) = setup();
        drag(&mut h, &mut tool, v(5.0, 0.0), v(7.5, 2.25));
        assert!(h.key(&mut tool, "Escape"));

        let Some(Entity::Line(line)) = h.drawing.get(a) else {
            panic!("line missing");
        };
        assert_eq!(line.start(), v(0.0, 0.0));
        assert!(!h.drawing.can_undo());
        assert!(!tool.is_dragging());
        assert_eq!(tool.state(), ToolState::Active);
    }

    #[test]
    fn test_delete_requests_removal() {
        let (mut h, mut tool, a, _) = setup();
        h.drawing.select_only(&[a]);
        tool.take_events();
        assert!(h.key(&mut tool, "Delete"));
        assert_eq!(tool.take_events(), vec![ToolEvent::DeleteRequested(vec![a])]);
        assert!(h.drawing.contains(a));
    }

    #[test]
    fn test_ctrl_a_selects_all() {
        let (mut h, mut tool, _, _) = setup();
        let key = KeyEventData::new("a").with_modifiers(Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        });
        assert!(tool.on_key_down(&mut h.ctx(), &key));
        assert_eq!(h.drawing.selected_ids().len(), 2);
    }

    #[test]
    fn test_window_inside_closed_shape_misses_it() {
        let (mut h, mut tool, _, b) = setup();
        let rect = h.drawing.add_entity(Rectangle::from_corners(v(30.0, 0.0), v(40.0, 10.0)));

        window(&mut h, &mut tool, v(19.5, 19.5), v(20.5, 20.5), false);
        assert!(h.drawing.selected_ids().is_empty());
        window(&mut h, &mut tool, v(34.0, 4.0), v(36.0, 6.0), false);
        assert!(h.drawing.selected_ids().is_empty());

        // Reaching across the outline selects.
        window(&mut h, &mut tool, v(19.5, 19.5), v(23.0, 20.5), false);
        assert_eq!(h.drawing.selected_ids(), vec![b]);
        window(&mut h, &mut tool, v(34.0, 4.0), v(41.0, 6.0), false);
        assert_eq!(h.drawing.selected_ids(), vec![rect]);
    }

    #[test]
    fn test_shift_window_keeps_existing_selection() {
        let (mut h, mut tool, a, b) = setup();
        h.drawing.select_only(&[a]);
        tool.take_events();

        window(&mut h, &mut tool, v(17.0, 17.0), v(23.0, 23.0), true);
        let mut selected = h.drawing.selected_ids();
        selected.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(selected, expected);
        assert!(matches!(
            tool.take_events().as_slice(),
            [ToolEvent::SelectionChanged(ids)] if ids.len() == 2
        ));

        // An additive window over nothing leaves the selection alone.
        window(&mut h, &mut tool, v(40.0, 40.0), v(50.0, 50.0), true);
        assert_eq!(h.drawing.selected_ids().len(), 2);

        // Without shift the same empty window clears it.
        window(&mut h, &mut tool, v(40.0, 40.0), v(50.0, 50.0), false);
        assert!(h.drawing.selected_ids().is_empty());
    }
}
