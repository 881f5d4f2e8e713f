// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editor overlays: bleed bands and the safe-area guide.
//!
//! Overlays are drawn in device pixels on top of the composed page, gated
//! by [`OverlayFlags`]. Export never draws them.

use imprint_schema::Document;
use peniko::Color as PenikoColor;
use vello_cpu::RenderContext;
use vello_cpu::kurbo::{Affine, Rect, Stroke};

bitflags::bitflags! {
    /// Which editor guides to draw over the rendered page.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OverlayFlags: u8 {
        /// Translucent bands marking the bleed inset at each page edge.
        const BLEED     = 0b0000_0001;
        /// Dashed rectangle marking the safe inset.
        const SAFE_AREA = 0b0000_0010;
    }
}

/// Bleed band tint (translucent red).
const BLEED_COLOR: PenikoColor = PenikoColor::from_rgba8(220, 38, 38, 90);
/// Safe-area guide tint.
const SAFE_COLOR: PenikoColor = PenikoColor::from_rgba8(14, 165, 233, 220);

/// Width of a physical margin in device pixels at the given scale.
pub(crate) fn margin_px(mm: f64, units_per_mm: f64, scale: f32) -> f64 {
    mm * units_per_mm * f64::from(scale)
}

pub(crate) fn draw_overlays(
    ctx: &mut RenderContext,
    doc: &Document,
    scale: f32,
    flags: OverlayFlags,
) {
    let page = doc.page_size();
    let (w, h) = (
        f64::from(page.x * scale),
        f64::from(page.y * scale),
    );
    ctx.set_transform(Affine::IDENTITY);

    if flags.contains(OverlayFlags::BLEED) {
        let b = margin_px(doc.meta.bleed_mm, doc.meta.units_per_mm, scale);
        if b > 0.0 {
            ctx.set_paint(BLEED_COLOR);
            ctx.fill_rect(&Rect::new(0.0, 0.0, w, b));
            ctx.fill_rect(&Rect::new(0.0, h - b, w, h));
            ctx.fill_rect(&Rect::new(0.0, b, b, h - b));
            ctx.fill_rect(&Rect::new(w - b, b, w, h - b));
        }
    }

    if flags.contains(OverlayFlags::SAFE_AREA) {
        let s = margin_px(doc.meta.safe_mm, doc.meta.units_per_mm, scale);
        if s > 0.0 && s * 2.0 < w && s * 2.0 < h {
            ctx.set_paint(SAFE_COLOR);
            let mut stroke = Stroke::new(1.0);
            stroke = stroke.with_dashes(0.0, [4.0, 4.0]);
            ctx.set_stroke(stroke);
            ctx.stroke_rect(&Rect::new(s, s, w - s, h - s));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_scales_with_render_scale() {
        // 3 mm at 4 units/mm: 12 units, 24 px at scale 2.
        assert_eq!(margin_px(3.0, 4.0, 1.0), 12.0);
        assert_eq!(margin_px(3.0, 4.0, 2.0), 24.0);
    }

    #[test]
    fn flags_compose() {
        let both = OverlayFlags::BLEED | OverlayFlags::SAFE_AREA;
        assert!(both.contains(OverlayFlags::BLEED));
        assert!(!OverlayFlags::empty().contains(OverlayFlags::SAFE_AREA));
    }
}
