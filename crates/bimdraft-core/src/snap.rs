//! Object snapping: candidate collection and priority-ordered resolution.

use crate::entities::{Entity, EntityId, EntityTrait};
use crate::geometry::{Vector2, segment_intersection_point};
use serde::{Deserialize, Serialize};

/// Screen-space snap radius in pixels.
pub const DEFAULT_SNAP_DISTANCE: f64 = 15.0;

/// Default grid spacing in drawing units.
pub const DEFAULT_GRID_SIZE: f64 = 1.0;

/// Kind of feature a snap candidate lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapType {
    Endpoint,
    Midpoint,
    Center,
    Quadrant,
    Intersection,
    Perpendicular,
    Nearest,
    Node,
}

impl SnapType {
    pub const ALL: [SnapType; 8] = [
        SnapType::Endpoint,
        SnapType::Midpoint,
        SnapType::Center,
        SnapType::Quadrant,
        SnapType::Intersection,
        SnapType::Perpendicular,
        SnapType::Nearest,
        SnapType::Node,
    ];

    /// Types enumerated directly by the entities; the rest are candidates the
    /// manager computes itself.
    pub fn is_static(self) -> bool {
        !matches!(
            self,
            SnapType::Intersection | SnapType::Perpendicular | SnapType::Nearest
        )
    }

    /// Short marker label for on-screen feedback.
    pub fn label(self) -> &'static str {
        match self {
            SnapType::Endpoint => "END",
            SnapType::Midpoint => "MID",
            SnapType::Center => "CEN",
            SnapType::Quadrant => "QUA",
            SnapType::Intersection => "INT",
            SnapType::Perpendicular => "PER",
            SnapType::Nearest => "NEA",
            SnapType::Node => "NOD",
        }
    }
}

/// A feature point offered by an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub point: Vector2,
    pub kind: SnapType,
    pub entity: EntityId,
}

/// The winning candidate of a snap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub point: Vector2,
    pub kind: SnapType,
    pub entity: EntityId,
    /// Screen-space distance to the cursor in pixels.
    pub distance: f64,
}

fn default_true() -> bool {
    true
}

fn default_snap_distance() -> f64 {
    DEFAULT_SNAP_DISTANCE
}

fn default_enabled_types() -> Vec<SnapType> {
    vec![
        SnapType::Endpoint,
        SnapType::Midpoint,
        SnapType::Center,
        SnapType::Quadrant,
        SnapType::Intersection,
        SnapType::Perpendicular,
        SnapType::Node,
    ]
}

fn default_priority() -> Vec<SnapType> {
    vec![
        SnapType::Endpoint,
        SnapType::Intersection,
        SnapType::Midpoint,
        SnapType::Center,
        SnapType::Quadrant,
        SnapType::Node,
        SnapType::Perpendicular,
        SnapType::Nearest,
    ]
}

/// Object snap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Threshold in screen pixels.
    #[serde(default = "default_snap_distance")]
    pub snap_distance: f64,
    #[serde(default = "default_enabled_types")]
    pub enabled_types: Vec<SnapType>,
    /// Earlier entries win over later ones; unlisted types rank last.
    #[serde(default = "default_priority")]
    pub priority: Vec<SnapType>,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            snap_distance: DEFAULT_SNAP_DISTANCE,
            enabled_types: default_enabled_types(),
            priority: default_priority(),
        }
    }
}

/// Resolves the best snap candidate for a cursor position.
///
/// Holds configuration and the last result only; entities are passed in on
/// every query, so the drawing store stays the single source of snappable
/// geometry.
#[derive(Debug, Clone, Default)]
pub struct SnapManager {
    settings: SnapSettings,
    last_result: Option<SnapResult>,
}

impl SnapManager {
    pub fn new(settings: SnapSettings) -> Self {
        Self {
            settings,
            last_result: None,
        }
    }

    pub fn settings(&self) -> &SnapSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
        if !enabled {
            self.last_result = None;
        }
    }

    pub fn is_type_enabled(&self, kind: SnapType) -> bool {
        self.settings.enabled_types.contains(&kind)
    }

    pub fn enable_type(&mut self, kind: SnapType) {
        if !self.is_type_enabled(kind) {
            self.settings.enabled_types.push(kind);
        }
    }

    pub fn disable_type(&mut self, kind: SnapType) {
        self.settings.enabled_types.retain(|k| *k != kind);
    }

    pub fn set_enabled_types(&mut self, types: impl IntoIterator<Item = SnapType>) {
        self.settings.enabled_types.clear();
        for kind in types {
            self.enable_type(kind);
        }
    }

    pub fn set_priority(&mut self, priority: Vec<SnapType>) {
        self.settings.priority = priority;
    }

    pub fn set_snap_distance(&mut self, pixels: f64) {
        self.settings.snap_distance = pixels;
    }

    /// Rank of a snap type; types missing from the priority list rank last.
    pub fn priority_index(&self, kind: SnapType) -> usize {
        self.settings
            .priority
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(self.settings.priority.len())
    }

    /// Result of the most recent query, for redraws.
    pub fn last_result(&self) -> Option<&SnapResult> {
        self.last_result.as_ref()
    }

    pub fn clear_last_result(&mut self) {
        self.last_result = None;
    }

    /// Find the best snap for `cursor` (world space).
    ///
    /// `base` is the last captured point of the active tool, used as the
    /// origin of perpendicular feet. `project` maps world to screen; the
    /// threshold and the distance tie-break are measured after projection.
    pub fn find_snap<'a>(
        &mut self,
        cursor: Vector2,
        base: Option<Vector2>,
        entities: impl IntoIterator<Item = &'a Entity>,
        project: &dyn Fn(Vector2) -> Vector2,
    ) -> Option<SnapResult> {
        if !self.settings.enabled {
            self.last_result = None;
            return None;
        }

        let entities: Vec<&Entity> = entities
            .into_iter()
            .filter(|e| e.properties().visible)
            .collect();
        let candidates = self.collect_candidates(cursor, base, &entities);

        let screen_cursor = project(cursor);
        let threshold = self.settings.snap_distance;
        let mut best: Option<(usize, SnapResult)> = None;
        for candidate in candidates {
            let distance = project(candidate.point).distance_to(screen_cursor);
            if distance > threshold {
                continue;
            }
            let rank = self.priority_index(candidate.kind);
            let better = match &best {
                None => true,
                Some((best_rank, best_result)) => {
                    rank < *best_rank || (rank == *best_rank && distance < best_result.distance)
                }
            };
            if better {
                best = Some((
                    rank,
                    SnapResult {
                        point: candidate.point,
                        kind: candidate.kind,
                        entity: candidate.entity,
                        distance,
                    },
                ));
            }
        }

        self.last_result = best.map(|(_, result)| result);
        if let Some(result) = &self.last_result {
            log::trace!(
                "Snap {:?} at ({:.3}, {:.3}), {:.1}px",
                result.kind,
                result.point.x,
                result.point.y,
                result.distance
            );
        }
        self.last_result
    }

    fn collect_candidates(
        &self,
        cursor: Vector2,
        base: Option<Vector2>,
        entities: &[&Entity],
    ) -> Vec<SnapPoint> {
        let static_types: Vec<SnapType> = self
            .settings
            .enabled_types
            .iter()
            .copied()
            .filter(|k| k.is_static())
            .collect();

        let mut candidates: Vec<SnapPoint> = entities
            .iter()
            .flat_map(|e| e.snap_points(&static_types))
            .collect();

        if self.is_type_enabled(SnapType::Nearest) {
            candidates.extend(entities.iter().filter_map(|e| {
                e.as_nearest().map(|n| SnapPoint {
                    point: n.nearest_point(cursor),
                    kind: SnapType::Nearest,
                    entity: e.id(),
                })
            }));
        }

        if self.is_type_enabled(SnapType::Perpendicular) {
            let from = base.unwrap_or(cursor);
            candidates.extend(entities.iter().filter_map(|e| {
                e.as_perpendicular()
                    .and_then(|p| p.perpendicular_foot(from))
                    .map(|point| SnapPoint {
                        point,
                        kind: SnapType::Perpendicular,
                        entity: e.id(),
                    })
            }));
        }

        if self.is_type_enabled(SnapType::Intersection) {
            candidates.extend(intersection_points(entities));
        }

        candidates
    }
}

/// Crossings between straight segments of distinct entities. Quadratic in
/// the number of segments.
fn intersection_points(entities: &[&Entity]) -> Vec<SnapPoint> {
    let segments: Vec<(EntityId, Vec<(Vector2, Vector2)>)> = entities
        .iter()
        .map(|e| (e.id(), e.straight_segments()))
        .filter(|(_, segs)| !segs.is_empty())
        .collect();

    let mut out = Vec::new();
    for (i, (id, segs_a)) in segments.iter().enumerate() {
        for (_, segs_b) in &segments[i + 1..] {
            for &(a1, a2) in segs_a {
                for &(b1, b2) in segs_b {
                    if let Some(point) = segment_intersection_point(a1, a2, b1, b2) {
                        out.push(SnapPoint {
                            point,
                            kind: SnapType::Intersection,
                            entity: *id,
                        });
                    }
                }
            }
        }
    }
    out
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Vector2, grid_size: f64) -> Vector2 {
    Vector2::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

fn default_grid_size() -> f64 {
    DEFAULT_GRID_SIZE
}

/// Grid snapping, the unconditional last step of point resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSnap {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_grid_size")]
    pub size: f64,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            enabled: true,
            size: DEFAULT_GRID_SIZE,
        }
    }
}

impl GridSnap {
    /// Snapped point, or the input unchanged when disabled.
    pub fn snap(&self, point: Vector2) -> Vector2 {
        if self.enabled && self.size > 0.0 {
            snap_to_grid(point, self.size)
        } else {
            point
        }
    }
}
