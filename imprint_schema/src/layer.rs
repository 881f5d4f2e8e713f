// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer union: text, shape, image, icon, and vector-path layers.
//!
//! Layers are a tagged variant rather than a trait hierarchy so that the
//! renderer and the patch validator can both dispatch exhaustively; adding a
//! variant is a compile-visible event everywhere layers are consumed.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{BlendModeKind, Color, CornerRadii, Paint, StrokeSpec, Transform2D};

/// Identifier for a layer within a document.
///
/// Ids are allocated from a per-document counter and never reused within that
/// document, so a stale id can never alias a different live layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Fields shared by every layer variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerCommon {
    /// Identity within the owning document.
    pub id: LayerId,
    /// Human-readable name.
    pub name: String,
    /// Whether the layer participates in rendering.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether mutation commands targeting this layer are rejected.
    #[serde(default)]
    pub locked: bool,
    /// Layer opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Compositing mode against the layers below.
    #[serde(default)]
    pub blend: BlendModeKind,
    /// Semantic tags used for queries ("name", "accent", "frame", ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Placement in document space.
    pub transform: Transform2D,
    /// Optional per-corner rounding of the layer box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radii: Option<CornerRadii>,
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

impl LayerCommon {
    /// A visible, unlocked, fully opaque layer with the given placement.
    pub fn new(id: LayerId, name: impl Into<String>, transform: Transform2D) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            opacity: 1.0,
            blend: BlendModeKind::Normal,
            tags: Vec::new(),
            transform,
            corner_radii: None,
        }
    }

    /// Returns true if the layer carries the given semantic tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Horizontal paragraph alignment within the text box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
    /// Justified (last line flush left).
    Justify,
}

/// Per-paragraph styling. Paragraphs are the `\n`-separated sections of the
/// layer's text, matched positionally; missing entries default to
/// [`TextAlign::Left`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Horizontal alignment for this paragraph.
    #[serde(default)]
    pub align: TextAlign,
}

/// Character styling applied to a whole text layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font family name, resolved against the renderer's font store.
    pub font_family: String,
    /// Font size in document units.
    pub font_size: f32,
    /// CSS-style weight (400 regular, 700 bold, ...).
    #[serde(default = "default_weight")]
    pub font_weight: u16,
    /// Glyph paint.
    pub fill: Paint,
    /// Italic style flag.
    #[serde(default)]
    pub italic: bool,
    /// Underline decoration flag.
    #[serde(default)]
    pub underline: bool,
    /// Render text in uppercase regardless of stored casing.
    #[serde(default)]
    pub uppercase: bool,
    /// Additional advance between glyphs, in document units.
    #[serde(default)]
    pub letter_spacing: f32,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f32,
}

fn default_weight() -> u16 {
    400
}

fn default_line_height() -> f32 {
    1.2
}

impl TextStyle {
    /// A regular-weight style in the given family/size with a solid fill.
    pub fn new(font_family: impl Into<String>, font_size: f32, fill: Color) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            font_weight: 400,
            fill: Paint::solid(fill),
            italic: false,
            underline: false,
            uppercase: false,
            letter_spacing: 0.0,
            line_height: default_line_height(),
        }
    }
}

/// A text layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    /// Shared layer fields.
    pub common: LayerCommon,
    /// Text content; `\n` separates paragraphs.
    pub text: String,
    /// Default character style.
    pub style: TextStyle,
    /// Per-paragraph overrides, matched positionally against `text`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<Paragraph>,
}

/// Geometric family of a shape layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShapeType {
    /// The layer box itself (optionally rounded via `corner_radii`).
    Rectangle,
    /// An ellipse inscribed in the layer box.
    Ellipse,
    /// A line across the layer box from the top-left to the bottom-right.
    Line,
    /// A regular polygon inscribed in the layer box.
    Polygon {
        /// Number of sides, at least 3.
        sides: u32,
    },
    /// A star inscribed in the layer box.
    Star {
        /// Number of outer points, at least 3.
        points: u32,
        /// Inner radius as a fraction of the outer radius, in `(0, 1)`.
        inner_ratio: f32,
    },
}

/// A shape layer with ordered fills and strokes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeLayer {
    /// Shared layer fields.
    pub common: LayerCommon,
    /// Which geometry the layer box describes.
    pub shape: ShapeType,
    /// Fills painted bottom-up.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    /// Strokes painted over the fills, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<StrokeSpec>,
}

/// How image content is fitted into the layer box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFit {
    /// Scale preserving aspect ratio so the box is fully covered; overflow is
    /// clipped.
    #[default]
    Cover,
    /// Scale preserving aspect ratio so the image fits entirely inside.
    Contain,
    /// Stretch to exactly fill the box.
    Fill,
    /// Natural size, anchored at the box origin.
    None,
}

/// Simple per-image color adjustments.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageFilters {
    /// Brightness multiplier (1.0 = unchanged).
    pub brightness: f32,
    /// Contrast multiplier (1.0 = unchanged).
    pub contrast: f32,
    /// Saturation multiplier (1.0 = unchanged).
    pub saturation: f32,
}

/// An opaque reference to image content resolved by the renderer's
/// image store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

/// A raster image layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    /// Shared layer fields.
    pub common: LayerCommon,
    /// Reference to the image content.
    pub image: ImageRef,
    /// Fit mode within the layer box.
    #[serde(default)]
    pub fit: ImageFit,
    /// Optional color adjustments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<ImageFilters>,
}

/// An opaque symbolic icon reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconId(pub String);

/// A monochrome icon layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IconLayer {
    /// Shared layer fields.
    pub common: LayerCommon,
    /// Which icon to draw.
    pub icon: IconId,
    /// Icon tint.
    pub color: Color,
}

/// A single path segment command in local layer coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PathCmd {
    /// Move the current point without drawing.
    MoveTo {
        /// X coordinate of the new point.
        x: f32,
        /// Y coordinate of the new point.
        y: f32,
    },
    /// Draw a line to the given point.
    LineTo {
        /// X coordinate of the line end.
        x: f32,
        /// Y coordinate of the line end.
        y: f32,
    },
    /// Draw a quadratic Bézier with one control point.
    QuadTo {
        /// X coordinate of the control point.
        x1: f32,
        /// Y coordinate of the control point.
        y1: f32,
        /// X coordinate of the curve end.
        x: f32,
        /// Y coordinate of the curve end.
        y: f32,
    },
    /// Draw a cubic Bézier with two control points.
    CurveTo {
        /// X coordinate of the first control point.
        x1: f32,
        /// Y coordinate of the first control point.
        y1: f32,
        /// X coordinate of the second control point.
        x2: f32,
        /// Y coordinate of the second control point.
        y2: f32,
        /// X coordinate of the curve end.
        x: f32,
        /// Y coordinate of the curve end.
        y: f32,
    },
    /// Close the current subpath.
    Close,
}

/// A freeform vector path layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathLayer {
    /// Shared layer fields.
    pub common: LayerCommon,
    /// Path geometry in local coordinates.
    pub commands: Vec<PathCmd>,
    /// Optional fill paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Paint>,
    /// Optional stroke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<StrokeSpec>,
}

/// An atomic visual element in a design document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum Layer {
    /// Styled, wrapped text.
    Text(TextLayer),
    /// A filled/stroked geometric shape.
    Shape(ShapeLayer),
    /// Raster image content.
    Image(ImageLayer),
    /// A symbolic tinted icon.
    Icon(IconLayer),
    /// A freeform vector path.
    Path(PathLayer),
}

impl Layer {
    /// The shared fields of this layer.
    pub fn common(&self) -> &LayerCommon {
        match self {
            Self::Text(l) => &l.common,
            Self::Shape(l) => &l.common,
            Self::Image(l) => &l.common,
            Self::Icon(l) => &l.common,
            Self::Path(l) => &l.common,
        }
    }

    /// Mutable access to the shared fields of this layer.
    pub fn common_mut(&mut self) -> &mut LayerCommon {
        match self {
            Self::Text(l) => &mut l.common,
            Self::Shape(l) => &mut l.common,
            Self::Image(l) => &mut l.common,
            Self::Icon(l) => &mut l.common,
            Self::Path(l) => &mut l.common,
        }
    }

    /// The layer's id.
    #[inline]
    pub fn id(&self) -> LayerId {
        self.common().id
    }

    /// A short name for the variant, used in prompts and diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Shape(_) => "shape",
            Self::Image(_) => "image",
            Self::Icon(_) => "icon",
            Self::Path(_) => "path",
        }
    }
}
