// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lowering of document paints into `vello_cpu` brushes and, for patterns,
//! tiled vector geometry.

use imprint_schema::{GradientKind, GradientSpec, Paint, PatternMotif, PatternSpec};
use peniko::{ColorStop, Gradient, GradientKind as PenikoGradientKind};
use peniko::{LinearGradientPosition, RadialGradientPosition};
use vello_cpu::RenderContext;
use vello_cpu::kurbo::{Affine, BezPath, Circle, Rect, Shape as _};

const PATH_TOLERANCE: f64 = 0.1;

/// Set the context paint for a solid or gradient paint, sized against the
/// local rectangle the paint covers.
///
/// Returns `false` for [`Paint::Pattern`], which has no brush form; callers
/// tile it via [`pattern_path`] instead. Gradients with a paint-space
/// transform set the context's paint transform; callers reset it afterwards
/// with [`clear_paint_transform`].
pub(crate) fn set_paint(ctx: &mut RenderContext, paint: &Paint, local: Rect) -> bool {
    match paint {
        Paint::Solid { color } => {
            ctx.set_paint(color.to_peniko());
            true
        }
        Paint::Gradient(spec) => {
            ctx.set_paint(gradient_brush(spec, local));
            if let Some(coeffs) = spec.transform {
                ctx.set_paint_transform(Affine::new(coeffs));
            }
            true
        }
        Paint::Pattern(_) => false,
    }
}

/// Reset any paint transform a gradient may have installed.
pub(crate) fn clear_paint_transform(ctx: &mut RenderContext) {
    ctx.set_paint_transform(Affine::IDENTITY);
}

/// Build a peniko gradient sized against the local rectangle.
///
/// Linear gradients run along the rectangle diagonal; radial gradients spread
/// from the center out to the half-diagonal, so the whole rectangle is
/// covered before the spread mode takes over.
pub(crate) fn gradient_brush(spec: &GradientSpec, local: Rect) -> Gradient {
    let stops: Vec<ColorStop> = spec
        .stops
        .iter()
        .map(|s| ColorStop::from((s.offset, s.color.to_peniko())))
        .collect();
    let kind = match spec.kind {
        GradientKind::Linear => PenikoGradientKind::Linear(LinearGradientPosition::new(
            (local.x0, local.y0),
            (local.x1, local.y1),
        )),
        GradientKind::Radial => {
            let center = local.center();
            #[expect(
                clippy::cast_possible_truncation,
                reason = "gradient radius precision is well within f32"
            )]
            let radius = (local.width().hypot(local.height()) * 0.5) as f32;
            PenikoGradientKind::Radial(RadialGradientPosition::new_two_point(
                (center.x, center.y),
                0.0,
                (center.x, center.y),
                radius.max(f32::EPSILON),
            ))
        }
    };
    Gradient {
        kind,
        extend: spec.spread.to_peniko(),
        stops: stops.as_slice().into(),
        ..Gradient::default()
    }
}

/// Tile a pattern motif across the local rectangle as one vector path.
///
/// The tiling is rotated about the rectangle center and extended past the
/// rectangle far enough that the rotated tiling still covers it; callers clip
/// to the shape being painted, so overdraw is invisible.
pub(crate) fn pattern_path(spec: &PatternSpec, local: Rect) -> BezPath {
    let spacing = f64::from(spec.spacing * spec.scale.max(f32::EPSILON)).max(1e-3);
    let center = local.center();
    // Cover the rotated rect: half-diagonal reach from the center.
    let reach = local.width().hypot(local.height()) * 0.5 + spacing;
    let steps = (2.0 * reach / spacing).ceil() as i64 + 1;

    let mut path = BezPath::new();
    let stripes = |thickness: f64, path: &mut BezPath| {
        for i in 0..steps {
            let x = center.x - reach + i as f64 * spacing;
            let bar = Rect::new(
                x - thickness * 0.5,
                center.y - reach,
                x + thickness * 0.5,
                center.y + reach,
            );
            path.extend(bar.to_path(PATH_TOLERANCE));
        }
    };

    match spec.motif {
        PatternMotif::Dots => {
            let radius = spacing * 0.18;
            for i in 0..steps {
                for j in 0..steps {
                    let cx = center.x - reach + i as f64 * spacing;
                    let cy = center.y - reach + j as f64 * spacing;
                    path.extend(Circle::new((cx, cy), radius).to_path(PATH_TOLERANCE));
                }
            }
        }
        PatternMotif::Stripes => stripes(spacing * 0.3, &mut path),
        PatternMotif::Grid => {
            stripes(spacing * 0.08, &mut path);
            let mut cross = BezPath::new();
            stripes(spacing * 0.08, &mut cross);
            cross.apply_affine(Affine::rotate_about(
                std::f64::consts::FRAC_PI_2,
                center,
            ));
            path.extend(cross);
        }
        PatternMotif::Crosshatch => {
            let mut a = BezPath::new();
            stripes(spacing * 0.12, &mut a);
            let mut b = a.clone();
            a.apply_affine(Affine::rotate_about(std::f64::consts::FRAC_PI_4, center));
            b.apply_affine(Affine::rotate_about(-std::f64::consts::FRAC_PI_4, center));
            path.extend(a);
            path.extend(b);
        }
    }

    if spec.rotation != 0.0 {
        path.apply_affine(Affine::rotate_about(
            f64::from(spec.rotation).to_radians(),
            center,
        ));
    }
    path
}

/// The fill color of a pattern: the ink color with the pattern opacity
/// multiplied in.
pub(crate) fn pattern_color(spec: &PatternSpec) -> peniko::Color {
    spec.color
        .with_alpha(spec.color.a * spec.opacity.clamp(0.0, 1.0))
        .to_peniko()
}
