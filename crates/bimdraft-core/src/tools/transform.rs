//! Modify tools: move, rotate and scale the selection.
//!
//! The first click captures the base point together with the unlocked
//! selected entities. Copy mode (`C`) commits transformed duplicates
//! instead of changing the originals.

use super::{DrawingTool, ToolContext, ToolCore, ToolEvent, ToolKind};
use crate::drawing::Drawing;
use crate::entities::{Entity, EntityId, EntityTrait, Line};
use crate::geometry::{EPSILON, Vector2, rotation_about, scale_about, translation};
use crate::input::KeyEventData;
use kurbo::Affine;

/// Ratio of the new to the reference distance from `base`. A degenerate
/// reference gives 1.
pub fn scale_factor(base: Vector2, reference: Vector2, new: Vector2) -> f64 {
    let reference_distance = base.distance_to(reference);
    if reference_distance < EPSILON {
        return 1.0;
    }
    base.distance_to(new) / reference_distance
}

/// Signed angle from the `reference` direction to the `destination`
/// direction, both seen from `center`.
pub fn rotation_between(center: Vector2, reference: Vector2, destination: Vector2) -> f64 {
    (destination - center).angle() - (reference - center).angle()
}

/// Selection snapshot taken when the base point is captured.
#[derive(Debug, Default)]
struct ModifyTargets {
    ids: Vec<EntityId>,
    originals: Vec<Entity>,
    copy: bool,
}

impl ModifyTargets {
    /// Returns false when nothing modifiable is selected.
    fn capture(&mut self, drawing: &Drawing) -> bool {
        self.ids = drawing.selected_unlocked_ids();
        self.originals = self
            .ids
            .iter()
            .filter_map(|id| drawing.get(*id).cloned())
            .collect();
        if self.ids.is_empty() {
            log::debug!("Nothing selected to modify");
        }
        !self.ids.is_empty()
    }

    fn clear(&mut self) {
        self.ids.clear();
        self.originals.clear();
    }

    fn preview(&self, matrix: &Affine) -> Vec<Entity> {
        self.originals
            .iter()
            .map(|entity| {
                let mut ghost = entity.clone();
                ghost.transform(matrix);
                ghost
            })
            .collect()
    }

    /// Transform in place, or queue transformed duplicates in copy mode.
    fn apply(&mut self, ctx: &mut ToolContext<'_>, core: &mut ToolCore, matrix: &Affine) {
        if self.copy {
            for original in &self.originals {
                let mut copy = original.duplicate();
                copy.transform(matrix);
                core.commit_copy(copy);
            }
        } else {
            ctx.drawing.push_undo();
            for id in &self.ids {
                if let Some(entity) = ctx.drawing.get_mut(*id) {
                    entity.transform(matrix);
                }
            }
            core.emit(ToolEvent::EntitiesModified(self.ids.clone()));
        }
        log::debug!("Modified {} entities (copy: {})", self.ids.len(), self.copy);
        self.clear();
    }

    fn toggle_copy(&mut self) {
        self.copy = !self.copy;
        log::debug!("Copy mode {}", if self.copy { "on" } else { "off" });
    }
}

/// Shared `DrawingTool` accessors and key handling for modify tools.
macro_rules! modify_tool_common {
    ($kind:expr) => {
        fn kind(&self) -> ToolKind {
            $kind
        }

        fn core(&self) -> &ToolCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ToolCore {
            &mut self.core
        }

        fn on_reset(&mut self) {
            self.targets.clear();
        }
    };
}

/// Two clicks: base point, destination.
#[derive(Debug, Default)]
pub struct MoveTool {
    core: ToolCore,
    targets: ModifyTargets,
}

impl MoveTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_copy(&self) -> bool {
        self.targets.copy
    }
}

impl DrawingTool for MoveTool {
    modify_tool_common!(ToolKind::Move);

    fn capture_point(&mut self, ctx: &mut ToolContext<'_>, point: Vector2) {
        let Some(base) = self.core.last_point() else {
            if self.targets.capture(ctx.drawing) {
                self.core.points.push(point);
            }
            return;
        };
        let matrix = translation(point - base);
        self.targets.apply(ctx, &mut self.core, &matrix);
        self.finish();
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        match self.core.last_point() {
            Some(base) => self.targets.preview(&translation(cursor - base)),
            None => Vec::new(),
        }
    }

    fn handle_tool_key(&mut self, _ctx: &mut ToolContext<'_>, key: &KeyEventData) -> bool {
        if key.is("c") {
            self.targets.toggle_copy();
            return true;
        }
        false
    }
}

/// Three clicks: center, reference direction, destination direction.
#[derive(Debug, Default)]
pub struct RotateTool {
    core: ToolCore,
    targets: ModifyTargets,
}

impl RotateTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_copy(&self) -> bool {
        self.targets.copy
    }
}

impl DrawingTool for RotateTool {
    modify_tool_common!(ToolKind::Rotate);

    fn capture_point(&mut self, ctx: &mut ToolContext<'_>, point: Vector2) {
        match self.core.points[..] {
            [] => {
                if self.targets.capture(ctx.drawing) {
                    self.core.points.push(point);
                }
            }
            [_] => self.core.points.push(point),
            [center, reference, ..] => {
                let matrix = rotation_about(center, rotation_between(center, reference, point));
                self.targets.apply(ctx, &mut self.core, &matrix);
                self.finish();
            }
        }
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        match self.core.points[..] {
            [center] => vec![Line::new(center, cursor).into()],
            [center, reference] => {
                let matrix = rotation_about(center, rotation_between(center, reference, cursor));
                self.targets.preview(&matrix)
            }
            _ => Vec::new(),
        }
    }

    fn handle_tool_key(&mut self, _ctx: &mut ToolContext<'_>, key: &KeyEventData) -> bool {
        if key.is("c") {
            self.targets.toggle_copy();
            return true;
        }
        false
    }
}

/// Three clicks: base point, reference point, new point.
///
/// `U` toggles the uniform flag, but only uniform scaling is built; the
/// flag is kept for configuration round trips.
#[derive(Debug)]
pub struct ScaleTool {
    core: ToolCore,
    targets: ModifyTargets,
    uniform: bool,
}

impl Default for ScaleTool {
    fn default() -> Self {
        Self {
            core: ToolCore::default(),
            targets: ModifyTargets::default(),
            uniform: true,
        }
    }
}

impl ScaleTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_uniform(&self) -> bool {
        self.uniform
    }

    pub fn is_copy(&self) -> bool {
        self.targets.copy
    }

    /// Uniform scaling about `base` by the distance ratio of `new` to
    /// `reference`. Direction plays no part.
    pub fn scale_matrix(&self, base: Vector2, reference: Vector2, new: Vector2) -> Affine {
        scale_about(base, scale_factor(base, reference, new))
    }
}

impl DrawingTool for ScaleTool {
    modify_tool_common!(ToolKind::Scale);

    fn capture_point(&mut self, ctx: &mut ToolContext<'_>, point: Vector2) {
        match self.core.points[..] {
            [] => {
                if self.targets.capture(ctx.drawing) {
                    self.core.points.push(point);
                }
            }
            [_] => self.core.points.push(point),
            [base, reference, ..] => {
                let matrix = self.scale_matrix(base, reference, point);
                self.targets.apply(ctx, &mut self.core, &matrix);
                self.finish();
            }
        }
    }

    fn build_preview(&self, cursor: Vector2) -> Vec<Entity> {
        match self.core.points[..] {
            [base] => vec![Line::new(base, cursor).into()],
            [base, reference] => self.targets.preview(&self.scale_matrix(base, reference, cursor)),
            _ => Vec::new(),
        }
    }

    fn handle_tool_key(&mut self, _ctx: &mut ToolContext<'_>, key: &KeyEventData) -> bool {
        if key.is("u") {
            self.uniform = !self.uniform;
            log::debug!("Uniform scale {}", if self.uniform { "on" } else { "off" });
            return true;
        }
        if key.is("c") {
            self.targets.toggle_copy();
            return true;
        }
        false
    }
}
