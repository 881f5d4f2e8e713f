// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lowering of a document's layer stack into `vello_cpu` draw calls.
//!
//! Layers are visited in `layer_order`, bottom to top. Each visible layer
//! gets its transform installed as the CTM (document units with the render
//! scale folded in), an optional compositing layer for blend/opacity, and
//! then variant-specific geometry. Everything is clipped to the root frame.

use imprint_schema::{
    Document, IconLayer, ImageFit, ImageLayer, Layer, PathCmd, PathLayer, ShapeLayer, ShapeType,
    StrokeAlign, StrokeSpec,
};
use kurbo::Affine;
use peniko::Fill;
use vello_cpu::RenderContext;
use vello_cpu::kurbo::{
    Affine as CpuAffine, BezPath, Circle, Ellipse, Rect, RoundedRect, Shape as _, Stroke,
};

use crate::assets::{FontStore, IconStore, ImageStore, RasterImage};
use crate::{paint, text};

const PATH_TOLERANCE: f64 = 0.1;

pub(crate) struct Assets<'a> {
    pub fonts: &'a FontStore,
    pub images: &'a ImageStore,
    pub icons: &'a IconStore,
}

fn to_cpu(affine: Affine) -> CpuAffine {
    CpuAffine::new(affine.as_coeffs())
}

/// Paint the whole document at the given scale. The context is expected to
/// match the scaled page size.
pub(crate) fn paint_document(
    ctx: &mut RenderContext,
    doc: &Document,
    scale: f32,
    assets: &Assets<'_>,
) {
    let page = doc.page_size();
    let scale = f64::from(scale);

    // Clip everything to the page bounds, honoring the root frame's corner
    // rounding so exports of rounded cards have transparent corners.
    let page_rect = Rect::new(
        0.0,
        0.0,
        f64::from(page.x) * scale,
        f64::from(page.y) * scale,
    );
    let page_clip = match doc.layer(doc.root_frame).and_then(|l| l.common().corner_radii) {
        Some(radii) if !radii.is_zero() => {
            let r = radii.to_kurbo(scale);
            RoundedRect::from_rect(page_rect, (r.top_left, r.top_right, r.bottom_right, r.bottom_left))
                .to_path(PATH_TOLERANCE)
        }
        _ => page_rect.to_path(PATH_TOLERANCE),
    };
    ctx.set_transform(CpuAffine::IDENTITY);
    ctx.push_clip_layer(&page_clip);

    for layer in doc.layers_ordered() {
        let common = layer.common();
        if !common.visible {
            continue;
        }

        let blend = (!common.blend.is_normal()).then(|| common.blend.to_peniko());
        let opacity = (common.opacity < 1.0).then_some(common.opacity.clamp(0.0, 1.0));
        let composited = blend.is_some() || opacity.is_some();
        if composited {
            ctx.push_layer(None, blend, opacity, None, None);
        }

        let affine = common.transform.to_affine(scale);
        ctx.set_transform(to_cpu(affine));

        match layer {
            Layer::Shape(shape) => draw_shape(ctx, shape),
            Layer::Text(text_layer) => text::draw_text(
                ctx,
                assets.fonts,
                text_layer,
                affine,
                common.transform.size.x,
                common.transform.size.y,
            ),
            Layer::Image(image) => draw_image(ctx, assets.images, image),
            Layer::Icon(icon) => draw_icon(ctx, assets.icons, icon),
            Layer::Path(path) => draw_path_layer(ctx, path),
        }

        if composited {
            ctx.pop_layer();
        }
    }

    ctx.pop_layer(); // page clip
}

/// Build the local-space outline for a shape layer.
fn shape_outline(shape: &ShapeLayer) -> BezPath {
    let size = shape.common.transform.size;
    let (w, h) = (f64::from(size.x), f64::from(size.y));
    let rect = Rect::new(0.0, 0.0, w, h);
    match shape.shape {
        ShapeType::Rectangle => match shape.common.corner_radii {
            Some(radii) if !radii.is_zero() => {
                let r = radii.to_kurbo(1.0);
                RoundedRect::from_rect(
                    rect,
                    (r.top_left, r.top_right, r.bottom_right, r.bottom_left),
                )
                .to_path(PATH_TOLERANCE)
            }
            _ => rect.to_path(PATH_TOLERANCE),
        },
        ShapeType::Ellipse => {
            Ellipse::new(rect.center(), (w * 0.5, h * 0.5), 0.0).to_path(PATH_TOLERANCE)
        }
        ShapeType::Line => {
            let mut p = BezPath::new();
            p.move_to((0.0, 0.0));
            p.line_to((w, h));
            p
        }
        ShapeType::Polygon { sides } => regular_polygon(rect, sides.max(3)),
        ShapeType::Star {
            points,
            inner_ratio,
        } => star(rect, points.max(3), f64::from(inner_ratio.clamp(0.01, 0.99))),
    }
}

fn regular_polygon(rect: Rect, sides: u32) -> BezPath {
    let center = rect.center();
    let (rx, ry) = (rect.width() * 0.5, rect.height() * 0.5);
    let mut path = BezPath::new();
    for i in 0..sides {
        let angle =
            std::f64::consts::TAU * f64::from(i) / f64::from(sides) - std::f64::consts::FRAC_PI_2;
        let point = (center.x + rx * angle.cos(), center.y + ry * angle.sin());
        if i == 0 {
            path.move_to(point);
        } else {
            path.line_to(point);
        }
    }
    path.close_path();
    path
}

fn star(rect: Rect, points: u32, inner_ratio: f64) -> BezPath {
    let center = rect.center();
    let (rx, ry) = (rect.width() * 0.5, rect.height() * 0.5);
    let mut path = BezPath::new();
    for i in 0..points * 2 {
        let ratio = if i % 2 == 0 { 1.0 } else { inner_ratio };
        let angle = std::f64::consts::TAU * f64::from(i) / f64::from(points * 2)
            - std::f64::consts::FRAC_PI_2;
        let point = (
            center.x + rx * ratio * angle.cos(),
            center.y + ry * ratio * angle.sin(),
        );
        if i == 0 {
            path.move_to(point);
        } else {
            path.line_to(point);
        }
    }
    path.close_path();
    path
}

fn draw_shape(ctx: &mut RenderContext, shape: &ShapeLayer) {
    let size = shape.common.transform.size;
    let local = Rect::new(0.0, 0.0, f64::from(size.x), f64::from(size.y));
    let outline = shape_outline(shape);

    // Lines have no interior; fills only apply to closed shapes.
    let fillable = !matches!(shape.shape, ShapeType::Line);
    if fillable {
        for fill in &shape.fills {
            fill_path_with(ctx, fill, &outline, local);
        }
    }
    for stroke in &shape.strokes {
        stroke_path_with(ctx, stroke, &outline, local, fillable);
    }
}

/// Fill a local path with a paint, handling the pattern case by clipping to
/// the path and tiling the motif.
pub(crate) fn fill_path_with(
    ctx: &mut RenderContext,
    fill: &imprint_schema::Paint,
    outline: &BezPath,
    local: Rect,
) {
    if paint::set_paint(ctx, fill, local) {
        ctx.set_fill_rule(Fill::NonZero);
        ctx.fill_path(outline);
        paint::clear_paint_transform(ctx);
    } else if let imprint_schema::Paint::Pattern(spec) = fill {
        ctx.push_clip_layer(outline);
        ctx.set_paint(paint::pattern_color(spec));
        ctx.set_fill_rule(Fill::NonZero);
        ctx.fill_path(&paint::pattern_path(spec, local));
        ctx.pop_layer();
    }
}

fn stroke_to_cpu(spec: &StrokeSpec, width_factor: f64) -> Stroke {
    let mut stroke = Stroke::new(f64::from(spec.width) * width_factor);
    stroke.miter_limit = f64::from(spec.miter_limit);
    stroke.join = match spec.join {
        imprint_schema::LineJoin::Miter => vello_cpu::kurbo::Join::Miter,
        imprint_schema::LineJoin::Round => vello_cpu::kurbo::Join::Round,
        imprint_schema::LineJoin::Bevel => vello_cpu::kurbo::Join::Bevel,
    };
    let cap = match spec.cap {
        imprint_schema::LineCap::Butt => vello_cpu::kurbo::Cap::Butt,
        imprint_schema::LineCap::Round => vello_cpu::kurbo::Cap::Round,
        imprint_schema::LineCap::Square => vello_cpu::kurbo::Cap::Square,
    };
    stroke.start_cap = cap;
    stroke.end_cap = cap;
    if !spec.dash.is_empty() {
        stroke = stroke.with_dashes(0.0, spec.dash.iter().map(|d| f64::from(*d)));
    }
    stroke
}

/// Stroke a local path, emulating inner/outer alignment by clipping to the
/// shape region (or its complement) while stroking at doubled width.
pub(crate) fn stroke_path_with(
    ctx: &mut RenderContext,
    spec: &StrokeSpec,
    outline: &BezPath,
    local: Rect,
    closed: bool,
) {
    if !paint::set_paint(ctx, &spec.paint, local) {
        // Patterned strokes degrade to the pattern ink color.
        ctx.set_paint(spec.paint.primary_color().to_peniko());
    }

    let align = if closed { spec.align } else { StrokeAlign::Center };
    match align {
        StrokeAlign::Center => {
            ctx.set_stroke(stroke_to_cpu(spec, 1.0));
            ctx.stroke_path(outline);
        }
        StrokeAlign::Inner => {
            ctx.push_clip_layer(outline);
            ctx.set_stroke(stroke_to_cpu(spec, 2.0));
            ctx.stroke_path(outline);
            ctx.pop_layer();
        }
        StrokeAlign::Outer => {
            // Clip to the complement of the shape: the shape path plus an
            // enclosing rect, filled even-odd.
            let margin = f64::from(spec.width) * 2.0;
            let mut complement = local.inflate(margin, margin).to_path(PATH_TOLERANCE);
            complement.extend(outline.elements().iter().copied());
            ctx.set_fill_rule(Fill::EvenOdd);
            ctx.push_layer(Some(&complement), None, None, None, None);
            ctx.set_fill_rule(Fill::NonZero);
            ctx.set_stroke(stroke_to_cpu(spec, 2.0));
            ctx.stroke_path(outline);
            ctx.pop_layer();
        }
    }
    paint::clear_paint_transform(ctx);
}

fn draw_path_layer(ctx: &mut RenderContext, layer: &PathLayer) {
    let size = layer.common.transform.size;
    let local = Rect::new(0.0, 0.0, f64::from(size.x), f64::from(size.y));
    let path = build_path(&layer.commands);
    if path.is_empty() {
        return;
    }
    if let Some(fill) = &layer.fill {
        fill_path_with(ctx, fill, &path, local);
    }
    if let Some(stroke) = &layer.stroke {
        stroke_path_with(ctx, stroke, &path, local, true);
    }
}

/// Build a vello path from schema path commands.
pub(crate) fn build_path(commands: &[PathCmd]) -> BezPath {
    let mut path = BezPath::new();
    for cmd in commands {
        match *cmd {
            PathCmd::MoveTo { x, y } => path.move_to((f64::from(x), f64::from(y))),
            PathCmd::LineTo { x, y } => path.line_to((f64::from(x), f64::from(y))),
            PathCmd::QuadTo { x1, y1, x, y } => {
                path.quad_to((f64::from(x1), f64::from(y1)), (f64::from(x), f64::from(y)));
            }
            PathCmd::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => path.curve_to(
                (f64::from(x1), f64::from(y1)),
                (f64::from(x2), f64::from(y2)),
                (f64::from(x), f64::from(y)),
            ),
            PathCmd::Close => path.close_path(),
        }
    }
    path
}

fn draw_icon(ctx: &mut RenderContext, icons: &IconStore, layer: &IconLayer) {
    let Some(glyph) = icons.get(&layer.icon) else {
        log::warn!("icon '{}' not registered; skipping {}", layer.icon.0, layer.common.id);
        return;
    };
    let size = layer.common.transform.size;
    let box_min = f64::from(size.x.min(size.y));
    let s = box_min / f64::from(glyph.viewbox.max(f32::EPSILON));
    // Uniform contain fit, centered in the box.
    let dx = (f64::from(size.x) - f64::from(glyph.viewbox) * s) * 0.5;
    let dy = (f64::from(size.y) - f64::from(glyph.viewbox) * s) * 0.5;

    let mut path = build_path(&glyph.commands);
    path.apply_affine(CpuAffine::translate((dx, dy)) * CpuAffine::scale(s));
    ctx.set_paint(layer.color.to_peniko());
    ctx.set_fill_rule(Fill::NonZero);
    ctx.fill_path(&path);
}

fn draw_image(ctx: &mut RenderContext, images: &ImageStore, layer: &ImageLayer) {
    let Some(image) = images.get(&layer.image) else {
        log::warn!(
            "image '{}' not registered; skipping {}",
            layer.image.0,
            layer.common.id
        );
        return;
    };
    if image.width == 0 || image.height == 0 {
        return;
    }

    let size = layer.common.transform.size;
    let (bw, bh) = (f64::from(size.x), f64::from(size.y));
    let (iw, ih) = (f64::from(image.width), f64::from(image.height));

    // Document units per image pixel, then centering offset.
    let (sx, sy, dx, dy) = match layer.fit {
        ImageFit::Cover => {
            let s = (bw / iw).max(bh / ih);
            (s, s, (bw - iw * s) * 0.5, (bh - ih * s) * 0.5)
        }
        ImageFit::Contain => {
            let s = (bw / iw).min(bh / ih);
            (s, s, (bw - iw * s) * 0.5, (bh - ih * s) * 0.5)
        }
        ImageFit::Fill => (bw / iw, bh / ih, 0.0, 0.0),
        ImageFit::None => (1.0, 1.0, 0.0, 0.0),
    };

    // Clip to the layer box (with corner rounding) so cover overflow and
    // natural-size overhang stay inside.
    let box_rect = Rect::new(0.0, 0.0, bw, bh);
    let clip = match layer.common.corner_radii {
        Some(radii) if !radii.is_zero() => {
            let r = radii.to_kurbo(1.0);
            RoundedRect::from_rect(
                box_rect,
                (r.top_left, r.top_right, r.bottom_right, r.bottom_left),
            )
            .to_path(PATH_TOLERANCE)
        }
        _ => box_rect.to_path(PATH_TOLERANCE),
    };
    ctx.push_clip_layer(&clip);

    let pixels = match layer.filters {
        Some(filters) => filtered_pixels(image, filters),
        None => image.pixels.clone(),
    };
    let data = peniko::Blob::from(pixels);
    let image_data = peniko::ImageData {
        data,
        format: peniko::ImageFormat::Rgba8,
        alpha_type: peniko::ImageAlphaType::Alpha,
        width: image.width,
        height: image.height,
    };
    let source = vello_cpu::ImageSource::from_peniko_image_data(&image_data);
    let cpu_image = vello_cpu::Image {
        image: source,
        sampler: peniko::ImageSampler::default(),
    };

    let saved = *ctx.transform();
    let local = CpuAffine::translate((dx, dy)) * CpuAffine::scale_non_uniform(sx, sy);
    ctx.set_transform(saved * local);
    ctx.set_paint(cpu_image);
    ctx.fill_rect(&Rect::new(0.0, 0.0, iw, ih));
    ctx.set_transform(saved);
    ctx.pop_layer();
}

/// Apply brightness/contrast/saturation to a copy of the pixel buffer.
fn filtered_pixels(image: &RasterImage, filters: imprint_schema::ImageFilters) -> Vec<u8> {
    let brightness = filters.brightness.max(0.0);
    let contrast = filters.contrast.max(0.0);
    let saturation = filters.saturation.max(0.0);

    let mut out = image.pixels.clone();
    for px in out.chunks_exact_mut(4) {
        let mut rgb = [
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
        ];
        for c in &mut rgb {
            *c *= brightness;
            *c = (*c - 0.5) * contrast + 0.5;
        }
        // Rec. 709 luma for the desaturation axis.
        let luma = 0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2];
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "channels are clamped to [0, 255] before casting"
        )]
        for (slot, c) in px.iter_mut().take(3).zip(rgb) {
            let v = luma + (c - luma) * saturation;
            *slot = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprint_schema::{CornerRadii, LayerCommon, LayerId, Transform2D, Vec2F};

    fn shape(kind: ShapeType) -> ShapeLayer {
        ShapeLayer {
            common: LayerCommon::new(
                LayerId(1),
                "s",
                Transform2D::new(Vec2F::ZERO, Vec2F::new(80.0, 60.0)),
            ),
            shape: kind,
            fills: Vec::new(),
            strokes: Vec::new(),
        }
    }

    #[test]
    fn polygon_vertex_count() {
        let path = regular_polygon(Rect::new(0.0, 0.0, 10.0, 10.0), 6);
        // move + 5 lines + close
        assert_eq!(path.elements().len(), 7);
    }

    #[test]
    fn star_alternates_radii() {
        let path = star(Rect::new(0.0, 0.0, 10.0, 10.0), 5, 0.5);
        assert_eq!(path.elements().len(), 12);
    }

    #[test]
    fn rectangle_uses_corner_radii() {
        let mut s = shape(ShapeType::Rectangle);
        s.common.corner_radii = Some(CornerRadii::uniform(8.0));
        let rounded = shape_outline(&s);
        s.common.corner_radii = None;
        let square = shape_outline(&s);
        assert_ne!(rounded.elements().len(), square.elements().len());
    }

    #[test]
    fn image_fit_scales() {
        // 100x50 image into an 80x60 box.
        let (bw, bh, iw, ih) = (80.0_f64, 60.0_f64, 100.0_f64, 50.0_f64);
        let cover = (bw / iw).max(bh / ih);
        let contain = (bw / iw).min(bh / ih);
        assert!(cover > contain);
        assert_eq!(cover, 1.2);
        assert_eq!(contain, 0.8);
    }

    #[test]
    fn filters_identity_is_noop() {
        let img = RasterImage::solid(2, 2, [100, 150, 200, 255]);
        let out = filtered_pixels(
            &img,
            imprint_schema::ImageFilters {
                brightness: 1.0,
                contrast: 1.0,
                saturation: 1.0,
            },
        );
        assert_eq!(out, img.pixels);
    }
}
