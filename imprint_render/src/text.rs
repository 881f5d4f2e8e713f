// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text layout and glyph rendering.
//!
//! Layout (wrapping, alignment, auto-fit) happens in document units so it is
//! independent of the render scale; only glyph rasterization sees device
//! pixels, through the layer transform. Measurement uses skrifa advance
//! metrics when the family is registered in the [`FontStore`] and falls back
//! to `0.6 × font_size` per character otherwise, so layout is deterministic
//! with or without font assets. Glyph outlines are only drawn when a font is
//! present.

use imprint_schema::{TextAlign, TextLayer, TextStyle};
use kurbo::Affine;
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::OutlinePen;
use skrifa::{FontRef, GlyphId, MetadataProvider};
use vello_cpu::RenderContext;
use vello_cpu::kurbo::{Affine as CpuAffine, BezPath, Rect};

use crate::assets::FontStore;
use crate::paint;

/// Auto-fit never shrinks text below this fraction of the requested size.
pub const MIN_FIT_FACTOR: f32 = 0.6;

/// A laid-out line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// Line content after uppercase transformation.
    pub text: String,
    /// Measured width in document units at the layout font size.
    pub width: f32,
    /// Horizontal alignment inherited from the line's paragraph.
    pub align: TextAlign,
    /// True for the last line of its paragraph (justify leaves it flush
    /// left).
    pub paragraph_end: bool,
}

/// The result of wrapping and fitting a text layer into a box.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    /// Wrapped lines, top to bottom.
    pub lines: Vec<Line>,
    /// Effective font size after auto-fit, in document units.
    pub font_size: f32,
}

impl TextLayout {
    /// Width of the widest line.
    pub fn max_line_width(&self) -> f32 {
        self.lines.iter().map(|l| l.width).fold(0.0, f32::max)
    }
}

/// Glyph advance source for one measurement pass.
enum Advances<'a> {
    Font(FontRef<'a>, GlyphMetrics<'a>),
    Fallback,
}

fn advances<'a>(store: &'a FontStore, style: &TextStyle, font_size: f32) -> Advances<'a> {
    let Some(bytes) = store.get(&style.font_family) else {
        return Advances::Fallback;
    };
    match FontRef::new(bytes) {
        Ok(font_ref) => {
            let metrics =
                GlyphMetrics::new(&font_ref, Size::new(font_size), LocationRef::default());
            // GlyphMetrics borrows the FontRef's data, both share 'a.
            Advances::Font(font_ref, metrics)
        }
        Err(err) => {
            log::warn!("font family '{}' has invalid bytes: {err}", style.font_family);
            Advances::Fallback
        }
    }
}

impl Advances<'_> {
    fn advance(&self, ch: char, font_size: f32) -> f32 {
        match self {
            Self::Font(font_ref, metrics) => {
                let gid = font_ref.charmap().map(ch);
                gid.and_then(|g| metrics.advance_width(g))
                    .unwrap_or(font_size * 0.6)
            }
            Self::Fallback => font_size * 0.6,
        }
    }
}

/// Measure a line of already-transformed text in document units.
fn measure(adv: &Advances<'_>, text: &str, style: &TextStyle, font_size: f32) -> f32 {
    let mut width = 0.0_f32;
    let mut chars = 0_usize;
    for ch in text.chars() {
        width += adv.advance(ch, font_size);
        chars += 1;
    }
    if chars > 1 {
        width += style.letter_spacing * (chars - 1) as f32;
    }
    width
}

/// Greedy word wrap of one paragraph at a fixed font size.
fn wrap_paragraph(
    adv: &Advances<'_>,
    paragraph: &str,
    style: &TextStyle,
    font_size: f32,
    max_width: f32,
    align: TextAlign,
    out: &mut Vec<Line>,
) {
    let words: Vec<&str> = paragraph.split_whitespace().collect();
    if words.is_empty() {
        out.push(Line {
            text: String::new(),
            width: 0.0,
            align,
            paragraph_end: true,
        });
        return;
    }

    let start = out.len();
    let mut current = String::new();
    for word in words {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || measure(adv, &candidate, style, font_size) <= max_width {
            current = candidate;
        } else {
            let width = measure(adv, &current, style, font_size);
            out.push(Line {
                text: std::mem::take(&mut current),
                width,
                align,
                paragraph_end: false,
            });
            current = word.to_string();
        }
    }
    let width = measure(adv, &current, style, font_size);
    out.push(Line {
        text: current,
        width,
        align,
        paragraph_end: false,
    });
    if let Some(last) = out.get_mut(start..).and_then(|s| s.last_mut()) {
        last.paragraph_end = true;
    }
}

fn wrap_at_size(
    adv: &Advances<'_>,
    layer: &TextLayer,
    font_size: f32,
    max_width: f32,
) -> Vec<Line> {
    let text = if layer.style.uppercase {
        layer.text.to_uppercase()
    } else {
        layer.text.clone()
    };
    let mut lines = Vec::new();
    for (idx, paragraph) in text.split('\n').enumerate() {
        let align = layer
            .paragraphs
            .get(idx)
            .map(|p| p.align)
            .unwrap_or_default();
        wrap_paragraph(adv, paragraph, &layer.style, font_size, max_width, align, &mut lines);
    }
    lines
}

/// Wrap a text layer into its box, shrinking the font size until the widest
/// line fits, floored at [`MIN_FIT_FACTOR`] of the requested size.
pub fn layout_text(store: &FontStore, layer: &TextLayer, max_width: f32) -> TextLayout {
    let requested = layer.style.font_size;
    let adv = advances(store, &layer.style, requested);
    let floor = requested * MIN_FIT_FACTOR;

    let mut font_size = requested;
    loop {
        let lines = wrap_at_size(&adv, layer, font_size, max_width);
        let widest = lines.iter().map(|l| l.width).fold(0.0, f32::max);
        if widest <= max_width || font_size <= floor {
            if font_size < requested {
                log::debug!("auto-fit {}: {requested} -> {font_size}", layer.common.id);
            }
            return TextLayout { lines, font_size };
        }
        // Shrink in small proportional steps; the clamp makes the last wrap
        // happen at exactly the floor size.
        font_size = (font_size * 0.95).max(floor);
    }
}

/// Records a skrifa outline into a vello path, flipping Y so glyphs are
/// upright in screen coordinates.
struct GlyphPathPen {
    path: BezPath,
    origin: (f32, f32),
}

impl GlyphPathPen {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (
            f64::from(self.origin.0 + x),
            f64::from(self.origin.1 - y),
        )
    }
}

impl OutlinePen for GlyphPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let c = self.point(x1, y1);
        let p = self.point(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.point(x1, y1);
        let c2 = self.point(x2, y2);
        let p = self.point(x, y);
        self.path.curve_to(c1, c2, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// X offset of a line inside the box for its alignment. Justify is handled
/// separately by widening word gaps.
fn line_offset(line: &Line, box_width: f32) -> f32 {
    match line.align {
        TextAlign::Left | TextAlign::Justify => 0.0,
        TextAlign::Center => ((box_width - line.width) * 0.5).max(0.0),
        TextAlign::Right => (box_width - line.width).max(0.0),
    }
}

/// Draw a text layer into the context under the given layer transform.
///
/// `affine` maps local document units into device pixels. Without a
/// registered font this draws nothing (layout-only); with one, it fills glyph
/// outlines and underline bars with the style paint.
pub(crate) fn draw_text(
    ctx: &mut RenderContext,
    store: &FontStore,
    layer: &TextLayer,
    affine: Affine,
    box_width: f32,
    box_height: f32,
) {
    let layout = layout_text(store, layer, box_width);
    let style = &layer.style;

    let Some(bytes) = store.get(&style.font_family) else {
        log::debug!(
            "font family '{}' not registered; skipping glyphs for {}",
            style.font_family,
            layer.common.id
        );
        return;
    };
    let Ok(font_ref) = FontRef::new(bytes) else {
        return;
    };
    let outlines = font_ref.outline_glyphs();
    let charmap = font_ref.charmap();
    let metrics = GlyphMetrics::new(
        &font_ref,
        Size::new(layout.font_size),
        LocationRef::default(),
    );

    let local = Rect::new(0.0, 0.0, f64::from(box_width), f64::from(box_height));
    let has_brush = paint::set_paint(ctx, &style.fill, local);
    if !has_brush {
        // Patterned glyph fills degrade to the pattern ink color.
        ctx.set_paint(style.fill.primary_color().to_peniko());
    }
    ctx.set_transform(CpuAffine::new(affine.as_coeffs()));

    let line_pitch = layout.font_size * style.line_height;
    // First baseline sits one font size below the box top, an approximation
    // of the ascent that keeps layout font-independent.
    let mut baseline = layout.font_size;

    for line in &layout.lines {
        if line.text.is_empty() {
            baseline += line_pitch;
            continue;
        }

        // Justified lines (except paragraph ends) spread the slack across
        // word gaps.
        let gaps = line.text.split(' ').count().saturating_sub(1);
        let justify_extra = if line.align == TextAlign::Justify && !line.paragraph_end && gaps > 0 {
            (box_width - line.width).max(0.0) / gaps as f32
        } else {
            0.0
        };

        let mut x = line_offset(line, box_width);
        let line_start = x;
        for ch in line.text.chars() {
            if ch == ' ' {
                x += advance_for(&charmap, &metrics, ch, layout.font_size)
                    + style.letter_spacing
                    + justify_extra;
                continue;
            }
            if let Some(gid) = charmap.map(ch) {
                let mut pen = GlyphPathPen {
                    path: BezPath::new(),
                    origin: (x, baseline),
                };
                if let Some(outline) = outlines.get(gid)
                    && outline
                        .draw(Size::new(layout.font_size), &mut pen)
                        .is_ok()
                    && !pen.path.is_empty()
                {
                    ctx.fill_path(&pen.path);
                }
            }
            x += advance_for(&charmap, &metrics, ch, layout.font_size) + style.letter_spacing;
        }

        if style.underline {
            let thickness = f64::from(layout.font_size) * 0.06;
            let y = f64::from(baseline) + f64::from(layout.font_size) * 0.12;
            let end = if line.align == TextAlign::Justify && !line.paragraph_end {
                f64::from(box_width)
            } else {
                f64::from(x - style.letter_spacing)
            };
            let bar = Rect::new(f64::from(line_start), y, end, y + thickness);
            ctx.fill_rect(&bar);
        }

        baseline += line_pitch;
    }

    paint::clear_paint_transform(ctx);
}

fn advance_for(
    charmap: &skrifa::charmap::Charmap<'_>,
    metrics: &GlyphMetrics<'_>,
    ch: char,
    font_size: f32,
) -> f32 {
    charmap
        .map(ch)
        .and_then(|g: GlyphId| metrics.advance_width(g))
        .unwrap_or(font_size * 0.6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprint_schema::{Color, LayerCommon, LayerId, Paragraph, Transform2D, Vec2F};

    fn text_layer(text: &str, font_size: f32) -> TextLayer {
        TextLayer {
            common: LayerCommon::new(
                LayerId(1),
                "t",
                Transform2D::new(Vec2F::ZERO, Vec2F::new(100.0, 40.0)),
            ),
            text: text.into(),
            style: TextStyle::new("Unregistered", font_size, Color::BLACK),
            paragraphs: Vec::new(),
        }
    }

    #[test]
    fn wrap_honors_box_width_with_fallback_metrics() {
        // Fallback advance is 0.6 * 10 = 6 units/char. "alpha beta gamma"
        // at 60 units fits ~10 chars per line.
        let layer = text_layer("alpha beta gamma", 10.0);
        let layout = layout_text(&FontStore::new(), &layer, 60.0);
        assert!(layout.lines.len() > 1);
        assert!(layout.max_line_width() <= 60.0);
        assert_eq!(layout.font_size, 10.0);
    }

    #[test]
    fn letter_spacing_widens_lines() {
        let mut wide = text_layer("spacing", 10.0);
        wide.style.letter_spacing = 2.0;
        let plain = text_layer("spacing", 10.0);
        let store = FontStore::new();
        let w = layout_text(&store, &wide, 500.0).max_line_width();
        let p = layout_text(&store, &plain, 500.0).max_line_width();
        assert!((w - (p + 2.0 * 6.0)).abs() < 1e-3, "{w} vs {p}");
    }

    #[test]
    fn auto_fit_floors_at_sixty_percent() {
        // A single long word that can never fit 20 units forces the floor.
        let layer = text_layer("incompressible", 10.0);
        let layout = layout_text(&FontStore::new(), &layer, 20.0);
        assert!((layout.font_size - 6.0).abs() < 1e-6);
        assert!(layout.max_line_width() > 20.0, "cannot fit, stays overflowing");
    }

    #[test]
    fn auto_fit_shrinks_just_enough() {
        // One word of 10 chars: width 6*size. Fits 45 units at size 7.5.
        let layer = text_layer("abcdefghij", 10.0);
        let layout = layout_text(&FontStore::new(), &layer, 45.0);
        assert!(layout.font_size < 10.0 && layout.font_size >= 6.0);
        assert!(layout.max_line_width() <= 45.0);
    }

    #[test]
    fn uppercase_applies_before_measurement() {
        let mut layer = text_layer("shout", 10.0);
        layer.style.uppercase = true;
        let layout = layout_text(&FontStore::new(), &layer, 500.0);
        assert_eq!(layout.lines[0].text, "SHOUT");
    }

    #[test]
    fn paragraph_alignment_is_positional() {
        let mut layer = text_layer("one\ntwo", 10.0);
        layer.paragraphs = vec![
            Paragraph { align: TextAlign::Center },
            Paragraph { align: TextAlign::Right },
        ];
        let layout = layout_text(&FontStore::new(), &layer, 100.0);
        assert_eq!(layout.lines[0].align, TextAlign::Center);
        assert_eq!(layout.lines[1].align, TextAlign::Right);
        let right = &layout.lines[1];
        assert!((line_offset(right, 100.0) - (100.0 - right.width)).abs() < 1e-4);
    }
}
