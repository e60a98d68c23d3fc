//! Single-line text annotation.

use super::{BoundsCache, EntityKind, EntityProperties, EntityTrait, push_snap};
use crate::geometry::{
    Vector2, average_scale, bounds_of, chain_segments, distance_to_rect, rotation_about,
    rotation_angle, segments_intersect_rect,
};
use crate::snap::{SnapPoint, SnapType};
use kurbo::{Affine, BezPath, Rect};
use serde::{Deserialize, Serialize};

/// Approximate glyph advance as a fraction of the text height.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Descender depth below the baseline as a fraction of the text height.
const DESCENT_FACTOR: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    #[default]
    Baseline,
    Bottom,
    Middle,
    Top,
}

/// Where the anchor sits relative to the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextAlignment {
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl TextAlignment {
    pub fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self { horizontal, vertical }
    }
}

/// A text annotation anchored at a point.
#[derive(Debug, Clone)]
pub struct Text {
    props: EntityProperties,
    position: Vector2,
    content: String,
    height: f64,
    rotation: f64,
    alignment: TextAlignment,
    font_family: String,
    bold: bool,
    italic: bool,
    bounds: BoundsCache,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TextData {
    position: Vector2,
    content: String,
    height: f64,
    #[serde(default)]
    rotation: f64,
    #[serde(default)]
    alignment: TextAlignment,
    font_family: String,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
}

impl Text {
    pub fn new(position: Vector2, content: impl Into<String>, height: f64) -> Self {
        Self {
            props: EntityProperties::new(EntityKind::Text),
            position,
            content: content.into(),
            height,
            rotation: 0.0,
            alignment: TextAlignment::default(),
            font_family: "Arial".to_string(),
            bold: false,
            italic: false,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn from_data(props: EntityProperties, data: TextData) -> Self {
        Self {
            props,
            position: data.position,
            content: data.content,
            height: data.height,
            rotation: data.rotation,
            alignment: data.alignment,
            font_family: data.font_family,
            bold: data.bold,
            italic: data.italic,
            bounds: BoundsCache::default(),
        }
    }

    pub(crate) fn data(&self) -> TextData {
        TextData {
            position: self.position,
            content: self.content.clone(),
            height: self.height,
            rotation: self.rotation,
            alignment: self.alignment,
            font_family: self.font_family.clone(),
            bold: self.bold,
            italic: self.italic,
        }
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn is_bold(&self) -> bool {
        self.bold
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
        self.bounds.invalidate();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.bounds.invalidate();
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
        self.bounds.invalidate();
    }

    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
        self.bounds.invalidate();
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
        self.bounds.invalidate();
    }

    pub fn set_font(&mut self, family: impl Into<String>, bold: bool, italic: bool) {
        self.font_family = family.into();
        self.bold = bold;
        self.italic = italic;
    }

    /// Estimated advance width of the string.
    pub fn estimated_width(&self) -> f64 {
        self.content.chars().count() as f64 * self.height * CHAR_WIDTH_FACTOR
    }

    /// Corners of the (rotated) text box.
    pub fn outline(&self) -> [Vector2; 4] {
        let w = self.estimated_width();
        let h = self.height;
        let (x0, x1) = match self.alignment.horizontal {
            HorizontalAlignment::Left => (0.0, w),
            HorizontalAlignment::Center => (-w / 2.0, w / 2.0),
            HorizontalAlignment::Right => (-w, 0.0),
        };
        let (y0, y1) = match self.alignment.vertical {
            VerticalAlignment::Top => (0.0, h),
            VerticalAlignment::Middle => (-h / 2.0, h / 2.0),
            VerticalAlignment::Bottom => (-h, 0.0),
            VerticalAlignment::Baseline => (-(1.0 - DESCENT_FACTOR) * h, DESCENT_FACTOR * h),
        };
        let p = self.position;
        let rotate = rotation_about(p, self.rotation);
        [
            Vector2::new(p.x + x0, p.y + y0),
            Vector2::new(p.x + x1, p.y + y0),
            Vector2::new(p.x + x1, p.y + y1),
            Vector2::new(p.x + x0, p.y + y1),
        ]
        .map(|c| c.transform(&rotate))
    }
}

impl EntityTrait for Text {
    fn properties(&self) -> &EntityProperties {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut EntityProperties {
        &mut self.props
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get_or_compute(|| {
            let [a, b, c, d] = self.outline();
            bounds_of(&[a, b, c, d, self.position])
        })
    }

    /// Distance to the text box.
    fn distance_to_point(&self, point: Vector2) -> f64 {
        distance_to_rect(self.bounding_box(), point)
    }

    fn intersects_rectangle(&self, min: Vector2, max: Vector2) -> bool {
        segments_intersect_rect(&chain_segments(&self.outline(), true), min, max)
    }

    fn transform(&mut self, matrix: &Affine) {
        self.position = self.position.transform(matrix);
        self.height *= average_scale(matrix);
        self.rotation += rotation_angle(matrix);
        self.bounds.invalidate();
    }

    fn snap_points(&self, types: &[SnapType]) -> Vec<SnapPoint> {
        let mut out = Vec::new();
        push_snap(&mut out, types, SnapType::Node, self.props.id, [self.position]);
        out
    }

    fn to_path(&self) -> BezPath {
        let outline = self.outline();
        let mut path = BezPath::new();
        path.move_to(outline[0]);
        for p in &outline[1..] {
            path.line_to(*p);
        }
        path.close_path();
        path
    }
}
