// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint sources for fills and strokes: solid colors, gradients, and
//! procedural patterns.
//!
//! Patterns are described parametrically (motif + spacing + rotation) and
//! tiled as vector geometry at render time, never rasterized from a bitmap,
//! so they rescale losslessly between preview and print export.

use serde::{Deserialize, Serialize};

use crate::Color;

/// A fill or stroke color source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Paint {
    /// A flat color fill.
    Solid {
        /// The fill color.
        color: Color,
    },
    /// A linear or radial gradient.
    Gradient(GradientSpec),
    /// A procedural repeating pattern.
    Pattern(PatternSpec),
}

impl Paint {
    /// Construct a solid paint.
    #[inline]
    pub const fn solid(color: Color) -> Self {
        Self::Solid { color }
    }

    /// The dominant color of this paint: the solid color, the first gradient
    /// stop, or the pattern ink.
    pub fn primary_color(&self) -> Color {
        match self {
            Self::Solid { color } => *color,
            Self::Gradient(g) => g.stops.first().map(|s| s.color).unwrap_or(Color::BLACK),
            Self::Pattern(p) => p.color,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::solid(Color::BLACK)
    }
}

/// The geometric family of a gradient.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GradientKind {
    /// Interpolate along the box diagonal axis (rotated by the spec's
    /// transform, if any).
    Linear,
    /// Interpolate radially from the box center.
    Radial,
}

/// A single gradient color stop.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Offset along the gradient axis in `[0, 1]`.
    pub offset: f32,
    /// Stop color.
    pub color: Color,
}

/// How a gradient continues beyond its defined stop range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpreadMode {
    /// Clamp to the edge stop colors.
    #[default]
    Pad,
    /// Repeat the stop sequence.
    Repeat,
    /// Mirror the stop sequence on each repetition.
    Reflect,
}

impl SpreadMode {
    /// Convert to the peniko extend mode.
    #[inline]
    pub fn to_peniko(self) -> peniko::Extend {
        match self {
            Self::Pad => peniko::Extend::Pad,
            Self::Repeat => peniko::Extend::Repeat,
            Self::Reflect => peniko::Extend::Reflect,
        }
    }
}

/// A gradient paint description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    /// Linear or radial.
    pub kind: GradientKind,
    /// Ordered color stops. Offsets are expected to be non-decreasing.
    pub stops: Vec<GradientStop>,
    /// Optional affine applied in paint space, as kurbo coefficients
    /// `[a, b, c, d, e, f]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<[f64; 6]>,
    /// Behavior outside the stop range.
    #[serde(default)]
    pub spread: SpreadMode,
}

impl GradientSpec {
    /// A two-stop linear gradient from `start` to `end`.
    pub fn linear(start: Color, end: Color) -> Self {
        Self {
            kind: GradientKind::Linear,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: start,
                },
                GradientStop {
                    offset: 1.0,
                    color: end,
                },
            ],
            transform: None,
            spread: SpreadMode::Pad,
        }
    }
}

/// The repeating motif of a procedural pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternMotif {
    /// Filled circles on a square grid.
    Dots,
    /// Parallel bars.
    Stripes,
    /// Orthogonal thin lines.
    Grid,
    /// Two stripe directions crossed at 90°.
    Crosshatch,
}

/// A procedural pattern paint description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Which motif to tile.
    pub motif: PatternMotif,
    /// Ink color of the motif.
    pub color: Color,
    /// Uniform scale applied to the motif geometry.
    pub scale: f32,
    /// Rotation of the whole tiling, in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Opacity of the tiled motif in `[0, 1]`.
    pub opacity: f32,
    /// Center-to-center spacing between motif repetitions, in document units.
    pub spacing: f32,
}

impl PatternSpec {
    /// A pattern with neutral scale/rotation/opacity.
    pub fn new(motif: PatternMotif, color: Color, spacing: f32) -> Self {
        Self {
            motif,
            color,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            spacing,
        }
    }
}
