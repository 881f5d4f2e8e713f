// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imprint Render: deterministic CPU rasterization of design documents.
//!
//! Rendering walks a document's layer stack bottom to top and lowers it into
//! [`vello_cpu`] draw calls: per-layer transforms and compositing layers
//! (blend/opacity), shape and path geometry, procedural pattern tiling, text
//! layout with skrifa metrics, and image/icon assets resolved through the
//! renderer's stores. The same document at the same scale always produces
//! the same pixels.
//!
//! # Position in the stack
//!
//! This crate consumes read-only [`imprint_schema::Document`] values; it
//! never mutates documents and carries no editing state. Editors render with
//! [`OverlayFlags`] for bleed/safe guides; [`Renderer::export_png`] renders
//! without them and attaches physical print metadata.

mod assets;
mod export;
mod overlay;
mod paint;
mod scene;
pub mod text;

pub use assets::{FontStore, IconGlyph, IconStore, ImageStore, RasterImage};
pub use export::{ExportError, PngExport, encode_png};
pub use overlay::OverlayFlags;

use imprint_schema::Document;
use vello_cpu::{Pixmap, RenderContext, RenderMode, RenderSettings};

/// A finished render: unpremultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes, `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// The RGBA value at `(x, y)`. Panics outside the raster in tests'
    /// favor; callers index within bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// Why a render failed before any pixel work.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The scale is zero, negative, or not finite.
    #[error("render scale {0} is not a positive finite number")]
    InvalidScale(f32),
    /// The scaled page exceeds the rasterizer's dimension limit.
    #[error("raster {0}x{1} exceeds the {max} px per-side limit", max = u16::MAX)]
    TooLarge(u32, u32),
}

/// A configured renderer: asset stores plus the render entry points.
#[derive(Debug, Default)]
pub struct Renderer {
    /// Fonts resolved by family name.
    pub fonts: FontStore,
    /// Images resolved by [`imprint_schema::ImageRef`].
    pub images: ImageStore,
    /// Icons resolved by [`imprint_schema::IconId`].
    pub icons: IconStore,
}

impl Renderer {
    /// A renderer with empty asset stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterize the document at `scale` device pixels per document unit.
    ///
    /// A scale of `k` yields a raster exactly `k×` the page size, with all
    /// layout proportional.
    pub fn render(
        &self,
        doc: &Document,
        scale: f32,
        flags: OverlayFlags,
    ) -> Result<Raster, RenderError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RenderError::InvalidScale(scale));
        }
        let page = doc.page_size();
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "rounded, non-negative, checked below"
        )]
        let (width, height) = (
            (f64::from(page.x) * f64::from(scale)).round().max(1.0) as u32,
            (f64::from(page.y) * f64::from(scale)).round().max(1.0) as u32,
        );
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(RenderError::TooLarge(width, height));
        }
        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let (w16, h16) = (width as u16, height as u16);

        let settings = RenderSettings {
            // Keep output stable on the u8 pipeline across configurations.
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        let mut ctx = RenderContext::new_with(w16, h16, settings);

        let assets = scene::Assets {
            fonts: &self.fonts,
            images: &self.images,
            icons: &self.icons,
        };
        scene::paint_document(&mut ctx, doc, scale, &assets);
        if !flags.is_empty() {
            overlay::draw_overlays(&mut ctx, doc, scale, flags);
        }

        ctx.flush();
        let mut pixmap = Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        let unpremul = pixmap.take_unpremultiplied();
        let mut pixels = Vec::with_capacity(unpremul.len() * 4);
        for p in unpremul {
            pixels.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        Ok(Raster {
            width,
            height,
            pixels,
        })
    }
}

/// Rasterize with no registered assets. Text lays out but draws no glyphs;
/// images and icons are skipped.
pub fn render(doc: &Document, scale: f32, flags: OverlayFlags) -> Result<Raster, RenderError> {
    Renderer::new().render(doc, scale, flags)
}
