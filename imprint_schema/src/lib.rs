// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imprint Schema: the layer-based design document model.
//!
//! This crate defines the plain-old-data entities shared by every other
//! Imprint crate:
//!
//! - [`Document`]: an immutable value owning layer storage, render order,
//!   selection, and metadata. Edits return new values; unchanged layers are
//!   structurally shared.
//! - [`Layer`]: a tagged variant over text, shape, image, icon, and path
//!   layers, so that renderers and validators dispatch exhaustively.
//! - [`Paint`], [`StrokeSpec`], [`BlendModeKind`]: color sources and stroke
//!   parameters, convertible to [`peniko`]/[`kurbo`] types at the rendering
//!   seam.
//!
//! # Position in the stack
//!
//! Everything here is serializable data with no behavior beyond pure value
//! edits and validation. The document store (`imprint_store`) mediates
//! mutation through commands; the renderer (`imprint_render`) consumes
//! read-only references; the template generator and revision engine build on
//! both. This crate depends on none of them.

mod blend;
mod color;
mod document;
mod geometry;
mod layer;
mod paint;
mod stroke;

pub use blend::BlendModeKind;
pub use color::{Color, ColorParseError};
pub use document::{
    DocMeta, Document, DocumentError, FRAME_TAG, LayerNotFound, LoadError, RemoveError,
};
pub use geometry::{CornerRadii, Transform2D, Vec2F};
pub use layer::{
    IconId, IconLayer, ImageFilters, ImageFit, ImageLayer, ImageRef, Layer, LayerCommon, LayerId,
    Paragraph, PathCmd, PathLayer, ShapeLayer, ShapeType, TextAlign, TextLayer, TextStyle,
};
pub use paint::{
    GradientKind, GradientSpec, GradientStop, Paint, PatternMotif, PatternSpec, SpreadMode,
};
pub use stroke::{LineCap, LineJoin, StrokeAlign, StrokeSpec};
