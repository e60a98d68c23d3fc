//! Plain-text drawing summary.

use bimdraft_core::{DraftSettings, Drawing, Entity, EntityTrait};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Walls count as joined within `settings.wall_join_tolerance`.
pub fn summary(drawing: &Drawing, settings: &DraftSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", drawing.name, drawing.id);

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entity in drawing.entities() {
        *counts.entry(format!("{:?}", entity.kind())).or_default() += 1;
    }
    let _ = writeln!(out, "entities: {}", drawing.len());
    for (kind, count) in &counts {
        let _ = writeln!(out, "  {:<10} {}", kind, count);
    }

    if let Some(bounds) = drawing.bounds() {
        let _ = writeln!(
            out,
            "extents: ({:.2}, {:.2}) to ({:.2}, {:.2})",
            bounds.x0, bounds.y0, bounds.x1, bounds.y1
        );
    }

    let wall_length: f64 = drawing.walls().map(|w| w.length()).sum();
    if wall_length > 0.0 {
        let corners = drawing.wall_corners(settings.wall_join_tolerance);
        let _ = writeln!(
            out,
            "walls: {:.2} ft centerline, {} joined ends, {} open ends",
            wall_length,
            corners.connected_end_count(),
            corners.unjoined_end_count()
        );
    }

    for entity in drawing.entities() {
        if let Entity::Room(room) = entity {
            let props = room.room_properties();
            let _ = writeln!(
                out,
                "room {} {}: {:.2} sq ft, {:.2} ft perimeter ({})",
                props.number,
                props.name,
                props.area,
                props.perimeter,
                entity.id()
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bimdraft_core::entities::RoomType;
    use bimdraft_core::{Room, Vector2, Wall, WallTypeRegistry};

    #[test]
    fn test_summary_lists_rooms_and_counts() {
        let mut drawing = Drawing::new();
        drawing.name = "Plan".to_string();
        let mut room = Room::new(
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(10.0, 0.0),
                Vector2::new(10.0, 12.0),
                Vector2::new(0.0, 12.0),
            ],
            RoomType::Office,
        );
        room.set_name("Study");
        room.set_number("204");
        drawing.add_entity(room);

        let text = summary(&drawing, &DraftSettings::default());
        assert!(text.starts_with("Plan ("));
        assert!(text.contains("Room       1"));
        assert!(text.contains("room 204 Study: 120.00 sq ft, 44.00 ft perimeter"));
        assert!(!text.contains("walls:"));
    }

    #[test]
    fn test_wall_joins_use_configured_tolerance() {
        let registry = WallTypeRegistry::with_defaults();
        let mut drawing = Drawing::new();
        for (a, b) in [((0.0, 0.0), (10.0, 0.0)), ((10.05, 0.0), (10.05, 8.0))] {
            let wall = Wall::with_type_id(Vector2::new(a.0, a.1), Vector2::new(b.0, b.1), "interior-2x4", &registry)
                .unwrap();
            drawing.add_entity(wall);
        }

        let strict = summary(&drawing, &DraftSettings::default());
        assert!(strict.contains("0 joined ends, 4 open ends"));

        let mut loose = DraftSettings::default();
        loose.wall_join_tolerance = 0.1;
        assert!(summary(&drawing, &loose).contains("2 joined ends, 2 open ends"));
    }
}
