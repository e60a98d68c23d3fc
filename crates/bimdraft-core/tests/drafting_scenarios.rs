//! End-to-end drafting scenarios driven through the public API.

use bimdraft_core::entities::{RoomType, WallCornerTable};
use bimdraft_core::geometry::scale;
use bimdraft_core::tools::ScaleTool;
use bimdraft_core::{
    Arc, Camera, Circle, Dimension, DraftSettings, Drawing, Entity, EntityTrait, KeyEventData,
    Line, Modifiers, MouseButton, MouseEventData, Polyline, Rectangle, Room, SnapManager,
    SnapSettings, SnapType, Text, ToolKind, ToolManager, Vector2, Wall, WallTypeRegistry,
};
use std::f64::consts::PI;

fn v(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y)
}

/// A manager, an empty drawing and a default camera (20 px per unit).
struct Session {
    tools: ToolManager,
    drawing: Drawing,
    camera: Camera,
}

impl Session {
    fn new() -> Self {
        let registry = WallTypeRegistry::with_defaults();
        Self {
            tools: ToolManager::new(DraftSettings::default(), &registry).unwrap(),
            drawing: Drawing::new(),
            camera: Camera::new(),
        }
    }

    fn click(&mut self, world: Vector2) {
        let project = self.camera.projection();
        let event = MouseEventData::from_world(&self.camera, world, MouseButton::Left, Modifiers::NONE);
        self.tools.on_mouse_move(&mut self.drawing, &project, &event);
        self.tools.on_mouse_down(&mut self.drawing, &project, &event);
        self.tools.on_mouse_up(&mut self.drawing, &project, &event);
    }

    fn key(&mut self, key: &str) {
        let project = self.camera.projection();
        self.tools
            .on_key_down(&mut self.drawing, &project, &KeyEventData::new(key));
    }
}

fn sample_entities(registry: &WallTypeRegistry) -> Vec<Entity> {
    let mut text = Text::new(v(1.0, 2.0), "LEVEL 1", 0.5);
    text.set_rotation(0.3);
    let mut dimension = Dimension::new(v(0.0, 0.0), v(8.0, 0.0), v(4.0, -1.0));
    dimension.set_text_override(Some("8'-0\"".to_string()));
    vec![
        Line::new(v(0.0, 0.0), v(3.0, 4.0)).into(),
        Circle::new(v(5.0, 5.0), 2.5).into(),
        Arc::new(v(0.0, 0.0), 4.0, 0.0, PI).into(),
        Rectangle::from_corners(v(6.0, 1.0), v(2.0, 3.0)).into(),
        Polyline::new(vec![v(0.0, 0.0), v(4.0, 0.0), v(4.0, 3.0)], true).unwrap().into(),
        Wall::with_type_id(v(0.0, 0.0), v(12.0, 0.0), "exterior-2x6", registry).unwrap().into(),
        Room::new(vec![v(0.0, 0.0), v(12.0, 0.0), v(12.0, 10.0), v(0.0, 10.0)], RoomType::Kitchen).into(),
        text.into(),
        dimension.into(),
    ]
}

#[test]
fn round_trip_preserves_every_entity() {
    let registry = WallTypeRegistry::with_defaults();
    let mut drawing = Drawing::new();
    for mut entity in sample_entities(&registry) {
        entity.properties_mut().line_weight = Some(0.35);
        drawing.add_entity(entity);
    }

    let json = drawing.to_json().unwrap();
    let loaded = Drawing::from_json(&json, &registry).unwrap();

    assert_eq!(loaded.len(), drawing.len());
    for (original, back) in drawing.entities().zip(loaded.entities()) {
        assert_eq!(back.properties(), original.properties());
        assert_eq!(back.kind(), original.kind());
        assert_eq!(back.bounding_box(), original.bounding_box());
        assert_eq!(back.serialize().unwrap(), original.serialize().unwrap());
    }
}

#[test]
fn bounding_boxes_contain_their_defining_points() {
    let registry = WallTypeRegistry::with_defaults();
    for entity in sample_entities(&registry) {
        let snaps = entity.snap_points(&SnapType::ALL);
        assert!(!snaps.is_empty(), "{:?} offers no snap points", entity.kind());
        for snap in snaps {
            assert!(
                entity.is_in_bounding_box(snap.point),
                "{:?} {:?} point outside its bounds",
                entity.kind(),
                snap.kind
            );
        }
    }
}

#[test]
fn scaled_rectangle_box_scales_consistently() {
    let mut entity: Entity = Rectangle::from_corners(v(1.0, 1.0), v(3.0, 2.0)).into();
    let before = entity.bounding_box();
    entity.transform(&scale(2.0, 3.0));
    let after = entity.bounding_box();
    assert_eq!(after.x0, before.x0 * 2.0);
    assert_eq!(after.x1, before.x1 * 2.0);
    assert_eq!(after.y0, before.y0 * 3.0);
    assert_eq!(after.y1, before.y1 * 3.0);
}

#[test]
fn nearest_point_matches_distance() {
    let registry = WallTypeRegistry::with_defaults();
    let samples = [v(7.0, -3.0), v(2.0, 2.0), v(-5.0, 6.0), v(10.0, 10.0)];
    for entity in sample_entities(&registry) {
        let Some(nearest) = entity.as_nearest() else {
            continue;
        };
        for p in samples {
            let distance = entity.distance_to_point(p);
            let expected = p.distance_to(nearest.nearest_point(p));
            assert!(
                (distance - expected).abs() < 1e-9,
                "{:?}: {} vs {}",
                entity.kind(),
                distance,
                expected
            );
        }
    }
}

#[test]
fn snap_miss_then_hit() {
    let camera = Camera::new();
    let project = camera.projection();
    let mut drawing = Drawing::new();
    let line = drawing.add_entity(Line::new(v(0.0, 0.0), v(10.0, 0.0)));
    let mut snap = SnapManager::new(SnapSettings::default());

    // One world unit is 20 pixels at the default zoom.
    assert!(snap.find_snap(v(10.0, 1.0), None, drawing.entities(), &project).is_none());

    let hit = snap.find_snap(v(10.0, 0.4), None, drawing.entities(), &project).unwrap();
    assert_eq!(hit.kind, SnapType::Endpoint);
    assert_eq!(hit.entity, line);
    assert_eq!(hit.point, v(10.0, 0.0));
    assert_eq!(snap.last_result(), Some(&hit));
}

#[test]
fn snap_priority_beats_distance() {
    let camera = Camera::new();
    let project = camera.projection();
    let mut drawing = Drawing::new();
    drawing.add_entity(Line::new(v(0.0, 0.0), v(10.0, 0.0)));
    drawing.add_entity(Line::new(v(10.5, -3.0), v(10.5, 3.0)));
    let mut snap = SnapManager::new(SnapSettings::default());

    // The midpoint (10.5, 0) is closer, the endpoint (10, 0) ranks higher.
    let hit = snap.find_snap(v(10.4, 0.0), None, drawing.entities(), &project).unwrap();
    assert_eq!(hit.kind, SnapType::Endpoint);
    assert_eq!(hit.point, v(10.0, 0.0));
}

#[test]
fn snap_same_type_closer_wins() {
    let camera = Camera::new();
    let project = camera.projection();
    let mut drawing = Drawing::new();
    drawing.add_entity(Line::new(v(0.0, 0.0), v(10.0, 0.0)));
    let near = drawing.add_entity(Line::new(v(10.5, 0.0), v(20.0, 0.0)));
    let mut snap = SnapManager::new(SnapSettings::default());

    let hit = snap.find_snap(v(10.3, 0.0), None, drawing.entities(), &project).unwrap();
    assert_eq!(hit.kind, SnapType::Endpoint);
    assert_eq!(hit.entity, near);
}

#[test]
fn removed_entities_stop_snapping() {
    let camera = Camera::new();
    let project = camera.projection();
    let mut drawing = Drawing::new();
    let id = drawing.add_entity(Line::new(v(0.0, 0.0), v(10.0, 0.0)));
    let mut snap = SnapManager::new(SnapSettings::default());

    assert!(snap.find_snap(v(10.0, 0.1), None, drawing.entities(), &project).is_some());
    drawing.remove_entity(id);
    assert!(snap.find_snap(v(10.0, 0.1), None, drawing.entities(), &project).is_none());
}

#[test]
fn rectangle_tool_builds_joined_walls() {
    let mut session = Session::new();
    session.tools.set_tool(ToolKind::Rectangle);
    session.click(v(0.0, 0.0));
    session.click(v(10.0, 8.0));

    let walls: Vec<&Wall> = session.drawing.walls().collect();
    assert_eq!(walls.len(), 4);
    let perimeter: f64 = walls.iter().map(|w| w.length()).sum();
    assert!((perimeter - 36.0).abs() < 1e-12);

    let corners: WallCornerTable = Wall::detect_corners(walls, session.tools.settings().wall_join_tolerance);
    assert_eq!(corners.connected_end_count(), 8);
    assert_eq!(corners.unjoined_end_count(), 0);
}

#[test]
fn scale_with_equal_distances_is_identity() {
    let tool = ScaleTool::new();
    let matrix = tool.scale_matrix(v(0.0, 0.0), v(5.0, 0.0), v(0.0, 5.0));
    assert_eq!(matrix, kurbo::Affine::IDENTITY);

    let mut session = Session::new();
    let id = session.drawing.add_entity(Circle::new(v(20.0, 20.0), 3.0));
    session.drawing.select_only(&[id]);
    let before = session.drawing.get(id).unwrap().bounding_box();

    session.tools.set_tool(ToolKind::Scale);
    session.click(v(0.0, 0.0));
    session.click(v(5.0, 0.0));
    session.click(v(0.0, 5.0));

    assert_eq!(session.drawing.get(id).unwrap().bounding_box(), before);
    assert!(session.drawing.can_undo());
}

#[test]
fn polyline_closes_on_first_vertex() {
    let mut session = Session::new();
    session.tools.set_tool(ToolKind::Polyline);
    session.click(v(0.0, 0.0));
    session.click(v(6.0, 0.0));
    session.click(v(6.0, 4.0));
    session.click(v(0.2, 0.1));

    let polylines: Vec<&Polyline> = session
        .drawing
        .entities()
        .filter_map(|e| match e {
            Entity::Polyline(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(polylines.len(), 1);
    assert!(polylines[0].is_closed());
    assert_eq!(polylines[0].vertex_count(), 3);
}

#[test]
fn typed_polar_input_draws_a_line() {
    let mut session = Session::new();
    session.tools.set_tool(ToolKind::Line);
    session.click(v(2.0, 2.0));
    for key in ["5", "<", "9", "0", "Enter"] {
        session.key(key);
    }

    let line = session
        .drawing
        .entities()
        .find_map(|e| match e {
            Entity::Line(l) => Some(l),
            _ => None,
        })
        .unwrap();
    assert!(line.end().approx_eq(v(2.0, 7.0), 1e-9));
}

#[test]
fn window_inside_closed_shapes_selects_nothing() {
    let mut drawing = Drawing::new();
    let circle = drawing.add_entity(Circle::new(v(0.0, 0.0), 5.0));
    let rect = drawing.add_entity(Rectangle::from_corners(v(20.0, 0.0), v(30.0, 10.0)));
    let room = drawing.add_entity(Room::new(
        vec![v(40.0, 0.0), v(52.0, 0.0), v(52.0, 9.0), v(40.0, 9.0)],
        RoomType::Bedroom,
    ));

    assert!(drawing.entities_in_rect(v(-1.0, -1.0), v(1.0, 1.0)).is_empty());
    assert!(drawing.entities_in_rect(v(24.0, 4.0), v(26.0, 6.0)).is_empty());
    assert!(drawing.entities_in_rect(v(45.0, 3.0), v(47.0, 5.0)).is_empty());

    assert_eq!(drawing.entities_in_rect(v(-1.0, -1.0), v(6.0, 1.0)), vec![circle]);
    assert_eq!(drawing.entities_in_rect(v(24.0, 4.0), v(26.0, 11.0)), vec![rect]);
    assert_eq!(drawing.entities_in_rect(v(39.0, 3.0), v(47.0, 5.0)), vec![room]);

    // A window swallowing everything hits all three.
    assert_eq!(drawing.entities_in_rect(v(-10.0, -10.0), v(60.0, 20.0)).len(), 3);
}
