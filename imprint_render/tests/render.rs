// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-probe tests for the CPU renderer.
//!
//! These render small documents and assert on individual pixels rather than
//! snapshot images, so they stay byte-exact across platforms on the u8
//! pipeline.

use imprint_render::{OverlayFlags, Raster, RenderError, Renderer};
use imprint_schema::{
    Color, Document, Layer, LayerCommon, LayerId, Paint, ShapeLayer, ShapeType, StrokeSpec,
    Transform2D, Vec2F,
};

fn rect(name: &str, pos: Vec2F, size: Vec2F, color: Color) -> Layer {
    Layer::Shape(ShapeLayer {
        common: LayerCommon::new(LayerId(0), name, Transform2D::new(pos, size)),
        shape: ShapeType::Rectangle,
        fills: vec![Paint::solid(color)],
        strokes: Vec::new(),
    })
}

/// A 100x80 page with a red rectangle covering the middle half.
fn red_rect_doc() -> Document {
    let doc = Document::new("probe", 100.0, 80.0);
    let (doc, _) = doc.add_layer(rect(
        "red",
        Vec2F::new(25.0, 20.0),
        Vec2F::new(50.0, 40.0),
        Color::from_rgba8(255, 0, 0, 255),
    ));
    doc
}

fn render(doc: &Document, scale: f32) -> Raster {
    Renderer::new()
        .render(doc, scale, OverlayFlags::empty())
        .unwrap()
}

#[test]
fn raster_dimensions_follow_scale_exactly() {
    let doc = red_rect_doc();
    for (scale, w, h) in [(1.0, 100, 80), (2.0, 200, 160), (0.5, 50, 40)] {
        let raster = render(&doc, scale);
        assert_eq!((raster.width, raster.height), (w, h), "at scale {scale}");
        assert_eq!(raster.pixels.len(), (w * h * 4) as usize);
    }
}

#[test]
fn solid_fill_probes_its_color_at_every_scale() {
    let doc = red_rect_doc();
    for scale in [1.0_f32, 2.0, 3.0] {
        let raster = render(&doc, scale);
        let (cx, cy) = (raster.width / 2, raster.height / 2);
        assert_eq!(raster.pixel(cx, cy), [255, 0, 0, 255], "center at {scale}x");
        // Just inside the page corner the root frame shows through.
        assert_eq!(raster.pixel(2, 2), [255, 255, 255, 255], "corner at {scale}x");
    }
}

#[test]
fn invisible_layers_leave_no_pixels() {
    let mut doc = red_rect_doc();
    let red = *doc.layer_order.last().unwrap();
    doc = doc
        .update_layer(red, |l| l.common_mut().visible = false)
        .unwrap();
    let raster = render(&doc, 1.0);
    assert_eq!(raster.pixel(50, 40), [255, 255, 255, 255]);
}

#[test]
fn opacity_blends_toward_the_backdrop() {
    let mut doc = red_rect_doc();
    let red = *doc.layer_order.last().unwrap();
    doc = doc
        .update_layer(red, |l| l.common_mut().opacity = 0.5)
        .unwrap();
    let raster = render(&doc, 1.0);
    let [r, g, b, a] = raster.pixel(50, 40);
    assert_eq!(a, 255);
    assert!(r > 200, "red channel stays dominant, got {r}");
    assert!(
        (100..200).contains(&g) && (100..200).contains(&b),
        "half red over white lightens green/blue, got {g}/{b}"
    );
}

#[test]
fn layer_order_decides_which_fill_wins() {
    let doc = Document::new("stack", 50.0, 50.0);
    let (doc, _) = doc.add_layer(rect(
        "under",
        Vec2F::ZERO,
        Vec2F::new(50.0, 50.0),
        Color::from_rgba8(0, 0, 255, 255),
    ));
    let (doc, top) = doc.add_layer(rect(
        "over",
        Vec2F::ZERO,
        Vec2F::new(50.0, 50.0),
        Color::from_rgba8(0, 255, 0, 255),
    ));
    let raster = render(&doc, 1.0);
    assert_eq!(raster.pixel(25, 25), [0, 255, 0, 255]);

    // Sending the top layer to the bottom of the stack flips the winner.
    let doc = doc.reorder_layer(top, 0).unwrap();
    let raster = render(&doc, 1.0);
    assert_eq!(raster.pixel(25, 25), [0, 0, 255, 255]);
}

#[test]
fn strokes_outline_without_filling() {
    let doc = Document::new("stroked", 100.0, 80.0);
    let (doc, _) = doc.add_layer(Layer::Shape(ShapeLayer {
        common: LayerCommon::new(
            LayerId(0),
            "outline",
            Transform2D::new(Vec2F::new(25.0, 20.0), Vec2F::new(50.0, 40.0)),
        ),
        shape: ShapeType::Rectangle,
        fills: Vec::new(),
        strokes: vec![StrokeSpec::new(
            Paint::solid(Color::from_rgba8(0, 0, 0, 255)),
            6.0,
        )],
    }));
    let raster = render(&doc, 1.0);
    // Top edge midpoint sits inside the 6-wide centered stroke.
    assert_eq!(raster.pixel(50, 20), [0, 0, 0, 255]);
    // The interior is unfilled, so the root frame shows through.
    assert_eq!(raster.pixel(50, 40), [255, 255, 255, 255]);
}

#[test]
fn saved_and_reloaded_documents_render_identical_pixels() {
    let doc = red_rect_doc();
    let reloaded = Document::load_json(&doc.save_json().unwrap()).unwrap();
    let a = render(&doc, 2.0);
    let b = render(&reloaded, 2.0);
    assert_eq!(a.pixels, b.pixels);
}

#[test]
fn rendering_is_deterministic() {
    let doc = red_rect_doc();
    let a = render(&doc, 1.5);
    let b = render(&doc, 1.5);
    assert_eq!(a.pixels, b.pixels);
}

#[test]
fn overlays_mark_the_bleed_band() {
    let doc = red_rect_doc();
    let plain = render(&doc, 1.0);
    let guided = Renderer::new()
        .render(&doc, 1.0, OverlayFlags::BLEED)
        .unwrap();
    // bleed_mm 3.0 at 4 units/mm puts pixel (2, 2) inside the band.
    assert_ne!(guided.pixel(2, 2), plain.pixel(2, 2));
    // The page center is outside every band and unaffected.
    assert_eq!(guided.pixel(50, 40), plain.pixel(50, 40));
}

#[test]
fn invalid_scales_are_rejected() {
    let doc = red_rect_doc();
    let renderer = Renderer::new();
    for bad in [0.0_f32, -1.0, f32::NAN, f32::INFINITY] {
        let err = renderer
            .render(&doc, bad, OverlayFlags::empty())
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidScale(_)), "scale {bad}");
    }
}

#[test]
fn oversized_rasters_are_rejected() {
    let doc = Document::new("big", 40_000.0, 100.0);
    let err = Renderer::new()
        .render(&doc, 2.0, OverlayFlags::empty())
        .unwrap_err();
    assert_eq!(err, RenderError::TooLarge(80_000, 200));
}

#[test]
fn export_png_carries_print_metadata() {
    let doc = red_rect_doc();
    let export = Renderer::new().export_png(&doc, 2.0).unwrap();
    assert_eq!((export.width, export.height), (200, 160));
    assert_eq!(export.scale, 2.0);
    // Defaults: 3 mm bleed and 5 mm safe at 4 units/mm.
    assert_eq!(export.bleed_px, 3.0 * 4.0 * 2.0);
    assert_eq!(export.safe_px, 5.0 * 4.0 * 2.0);
    assert_eq!(&export.bytes[..8], b"\x89PNG\r\n\x1a\n");
}
