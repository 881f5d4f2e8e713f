// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PNG export with print metadata.
//!
//! Export always renders without overlays. Encoding works on a finished
//! raster, so a failure can never leave the document or renderer in a bad
//! state.

use imprint_schema::Document;

use crate::overlay::{OverlayFlags, margin_px};
use crate::{Raster, RenderError, Renderer};

/// An encoded PNG plus the physical print metadata for that render.
#[derive(Clone, Debug)]
pub struct PngExport {
    /// Encoded PNG file contents.
    pub bytes: Vec<u8>,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// The scale the document was rendered at.
    pub scale: f32,
    /// Bleed inset in millimeters, carried from the document.
    pub bleed_mm: f64,
    /// Safe inset in millimeters, carried from the document.
    pub safe_mm: f64,
    /// Bleed inset in device pixels at this scale.
    pub bleed_px: f64,
    /// Safe inset in device pixels at this scale.
    pub safe_px: f64,
}

/// Why an export failed.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The underlying render failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// PNG encoding failed.
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Encode a raster as an RGBA8 PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, png::EncodingError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, raster.width, raster.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&raster.pixels)?;
    }
    Ok(bytes)
}

impl Renderer {
    /// Render the document at `scale` (no overlays) and encode it as PNG
    /// with physical margin metadata.
    pub fn export_png(&self, doc: &Document, scale: f32) -> Result<PngExport, ExportError> {
        let raster = self.render(doc, scale, OverlayFlags::empty())?;
        let bytes = encode_png(&raster)?;
        Ok(PngExport {
            bytes,
            width: raster.width,
            height: raster.height,
            scale,
            bleed_mm: doc.meta.bleed_mm,
            safe_mm: doc.meta.safe_mm,
            bleed_px: margin_px(doc.meta.bleed_mm, doc.meta.units_per_mm, scale),
            safe_px: margin_px(doc.meta.safe_mm, doc.meta.units_per_mm, scale),
        })
    }
}
