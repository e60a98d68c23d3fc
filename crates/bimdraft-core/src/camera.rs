//! View camera: drawing units to screen pixels.
//!
//! Snapping and picking measure their thresholds in pixels, so the camera is
//! also where those thresholds turn into drawing units.

use crate::drawing::Drawing;
use crate::geometry::{EPSILON, Vector2};
use crate::settings::DraftSettings;
use crate::snap::SnapSettings;
use kurbo::{Affine, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Screen pixels per drawing unit at "100%".
pub const DEFAULT_ZOOM: f64 = 20.0;

/// Zoom factor of one wheel notch.
pub const ZOOM_STEP: f64 = 1.25;

/// Pan and zoom of the drawing view.
///
/// `offset` is where the drawing origin lands on screen and `zoom` is the
/// number of pixels per drawing unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset: Vec2,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
            min_zoom: 0.5,
            max_zoom: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drawing to screen.
    pub fn transform(&self) -> Affine {
        Affine::new([self.zoom, 0.0, 0.0, self.zoom, self.offset.x, self.offset.y])
    }

    pub fn world_to_screen(&self, world: Vector2) -> Vector2 {
        Vector2::new(world.x * self.zoom + self.offset.x, world.y * self.zoom + self.offset.y)
    }

    pub fn screen_to_world(&self, screen: Vector2) -> Vector2 {
        Vector2::new((screen.x - self.offset.x) / self.zoom, (screen.y - self.offset.y) / self.zoom)
    }

    /// The world to screen function handed to snapping and the tools.
    pub fn projection(&self) -> impl Fn(Vector2) -> Vector2 + Copy + '_ {
        move |p| self.world_to_screen(p)
    }

    pub fn screen_to_world_distance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    pub fn world_to_screen_distance(&self, length: f64) -> f64 {
        length * self.zoom
    }

    /// Snap threshold in drawing units at the current zoom.
    pub fn snap_radius(&self, snap: &SnapSettings) -> f64 {
        self.screen_to_world_distance(snap.snap_distance)
    }

    /// Select-tool pick radius in drawing units at the current zoom.
    pub fn pick_radius(&self, settings: &DraftSettings) -> f64 {
        self.screen_to_world_distance(settings.pick_tolerance)
    }

    /// Drawing-space rectangle covered by a viewport of `size` pixels.
    pub fn visible_rect(&self, size: Size) -> Rect {
        let a = self.screen_to_world(Vector2::ZERO);
        let b = self.screen_to_world(Vector2::new(size.width, size.height));
        Rect::new(a.x, a.y, b.x, b.y)
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Scale by `factor` around a screen point that stays put.
    pub fn zoom_at(&mut self, anchor: Vector2, factor: f64) {
        let zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        let world = self.screen_to_world(anchor);
        self.zoom = zoom;
        self.offset = Vec2::new(anchor.x - world.x * zoom, anchor.y - world.y * zoom);
    }

    /// Wheel zoom: positive `notches` zoom in.
    pub fn zoom_steps(&mut self, anchor: Vector2, notches: i32) {
        self.zoom_at(anchor, ZOOM_STEP.powi(notches));
    }

    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = DEFAULT_ZOOM;
    }

    /// Center `bounds` in the viewport, leaving `padding` pixels on each
    /// side. A degenerate extent (a lone point or an axis-parallel line)
    /// only constrains the axes it spans.
    pub fn fit_to_bounds(&mut self, bounds: Rect, viewport: Size, padding: f64) {
        let room_x = (viewport.width - 2.0 * padding).max(1.0);
        let room_y = (viewport.height - 2.0 * padding).max(1.0);
        let fit_x = (bounds.width() > EPSILON).then(|| room_x / bounds.width());
        let fit_y = (bounds.height() > EPSILON).then(|| room_y / bounds.height());
        let zoom = match (fit_x, fit_y) {
            (Some(x), Some(y)) => x.min(y),
            (Some(z), None) | (None, Some(z)) => z,
            (None, None) => self.zoom,
        };
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);

        let center = bounds.center();
        self.offset = Vec2::new(
            viewport.width / 2.0 - center.x * self.zoom,
            viewport.height / 2.0 - center.y * self.zoom,
        );
    }

    /// Fit the whole drawing. An empty drawing resets the view and returns
    /// false.
    pub fn zoom_extents(&mut self, drawing: &Drawing, viewport: Size, padding: f64) -> bool {
        match drawing.bounds() {
            Some(bounds) => {
                self.fit_to_bounds(bounds, viewport, padding);
                true
            }
            None => {
                self.reset();
                false
            }
        }
    }
}
