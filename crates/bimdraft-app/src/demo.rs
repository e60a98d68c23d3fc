//! Scripted drafting session: drives the tool manager the way a user
//! would and returns the resulting drawing.

use bimdraft_core::entities::{HorizontalAlignment, RoomType, TextAlignment, VerticalAlignment};
use bimdraft_core::{
    Camera, DraftResult, DraftSettings, Drawing, KeyEventData, Modifiers, MouseButton,
    MouseEventData, Room, Text, ToolKind, ToolManager, Vector2, WallTypeRegistry,
};
use kurbo::Size;

const VIEWPORT: Size = Size::new(1280.0, 800.0);

struct Script {
    tools: ToolManager,
    drawing: Drawing,
    camera: Camera,
}

impl Script {
    fn click(&mut self, x: f64, y: f64) {
        let project = self.camera.projection();
        let event = MouseEventData::from_world(&self.camera, Vector2::new(x, y), MouseButton::Left, Modifiers::NONE);
        self.tools.on_mouse_move(&mut self.drawing, &project, &event);
        self.tools.on_mouse_down(&mut self.drawing, &project, &event);
        self.tools.on_mouse_up(&mut self.drawing, &project, &event);
        if let Some(snap) = self.tools.last_snap() {
            log::debug!("  snapped to {} at ({:.2}, {:.2})", snap.kind.label(), snap.point.x, snap.point.y);
        }
    }

    fn type_keys(&mut self, keys: &[&str]) {
        let project = self.camera.projection();
        for key in keys {
            self.tools
                .on_key_down(&mut self.drawing, &project, &KeyEventData::new(*key));
        }
    }

    fn tool(&mut self, kind: ToolKind) {
        log::info!("{} tool", kind.name());
        self.tools.set_tool(kind);
    }
}

/// Lay out a small two-room plan.
pub fn run(settings: DraftSettings, registry: &WallTypeRegistry) -> DraftResult<Drawing> {
    let mut drawing = Drawing::new();
    drawing.name = "Demo plan".to_string();
    let mut script = Script {
        tools: ToolManager::new(settings, registry)?,
        drawing,
        camera: Camera::new(),
    };

    // Exterior shell as four joined walls.
    script.tools.set_wall_type(registry.get("exterior-2x6")?.clone());
    script.tool(ToolKind::Rectangle);
    script.click(0.0, 0.0);
    script.click(24.0, 16.0);

    // Partition from the top wall midpoint, length typed in.
    script.tool(ToolKind::Line);
    script.click(12.1, 0.1);
    script.type_keys(&["1", "6", "<", "9", "0", "Enter"]);

    script.tool(ToolKind::Dimension);
    script.click(0.0, 0.0);
    script.click(24.0, 0.0);
    script.click(12.0, -3.0);

    script.tool(ToolKind::Circle);
    script.click(18.0, 8.0);
    script.click(19.0, 8.0);

    // Copy the column one bay over.
    script.tool(ToolKind::Select);
    script.click(19.0, 8.0);
    script.tool(ToolKind::Move);
    script.type_keys(&["c"]);
    script.click(18.0, 8.0);
    script.click(18.0, 12.0);

    let mut drawing = script.drawing;
    for (corners, room_type, name, number) in [
        ([0.0, 12.0], RoomType::LivingRoom, "Living", "101"),
        ([12.0, 24.0], RoomType::Kitchen, "Kitchen", "102"),
    ] {
        let [x0, x1] = corners;
        let mut room = Room::new(
            vec![
                Vector2::new(x0, 0.0),
                Vector2::new(x1, 0.0),
                Vector2::new(x1, 16.0),
                Vector2::new(x0, 16.0),
            ],
            room_type,
        );
        room.set_name(name);
        room.set_number(number);
        let mut label = Text::new(room.label_point(), name, 0.5);
        label.set_alignment(TextAlignment::new(HorizontalAlignment::Center, VerticalAlignment::Middle));
        drawing.add_entity(room);
        drawing.add_entity(label);
    }

    if script.camera.zoom_extents(&drawing, VIEWPORT, 40.0) {
        log::info!(
            "Fitted view at {:.1} px/ft, snap radius {:.2} ft",
            script.camera.zoom,
            script.camera.snap_radius(&script.tools.settings().snap)
        );
    }
    Ok(drawing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bimdraft_core::{Entity, EntityKind};

    fn count(drawing: &Drawing, kind: EntityKind) -> usize {
        drawing.entities().filter(|e| e.kind() == kind).count()
    }

    #[test]
    fn test_demo_plan() {
        let registry = WallTypeRegistry::with_defaults();
        let drawing = run(DraftSettings::default(), &registry).unwrap();

        assert_eq!(count(&drawing, EntityKind::Wall), 4);
        assert_eq!(drawing.wall_corners(DraftSettings::default().wall_join_tolerance).connected_end_count(), 8);
        assert!(drawing.walls().all(|w| w.wall_type().id == "exterior-2x6"));
        assert_eq!(count(&drawing, EntityKind::Dimension), 1);
        assert_eq!(count(&drawing, EntityKind::Circle), 2);
        assert_eq!(count(&drawing, EntityKind::Room), 2);
        assert_eq!(count(&drawing, EntityKind::Text), 2);

        let partition = drawing
            .entities()
            .find_map(|e| match e {
                Entity::Line(line) => Some(line),
                _ => None,
            })
            .unwrap();
        assert_eq!(partition.start(), Vector2::new(12.0, 0.0));
        assert!(partition.end().approx_eq(Vector2::new(12.0, 16.0), 1e-9));
    }
}
