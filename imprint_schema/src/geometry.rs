// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-old-data geometry for layers, with conversions into [`kurbo`] types.

use serde::{Deserialize, Serialize};

/// A 2D point or extent in document units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2F {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl Vec2F {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Vec2F {
    #[inline]
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Placement of a layer in document space.
///
/// `position` is the top-left corner of the layer's box, `size` its extent,
/// and `rotation` a clockwise rotation in degrees about the box center.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Top-left corner of the layer box.
    pub position: Vec2F,
    /// Width and height of the layer box.
    pub size: Vec2F,
    /// Rotation in degrees, clockwise, about the box center.
    #[serde(default)]
    pub rotation: f32,
}

impl Transform2D {
    /// Create an axis-aligned transform with no rotation.
    #[inline]
    pub const fn new(position: Vec2F, size: Vec2F) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
        }
    }

    /// The local bounding rectangle `(0, 0, size.x, size.y)` as a kurbo rect.
    #[inline]
    pub fn local_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(0.0, 0.0, f64::from(self.size.x), f64::from(self.size.y))
    }

    /// The affine mapping local layer coordinates into document coordinates,
    /// with an additional uniform `scale` applied on the outside.
    ///
    /// Rotation is applied about the center of the layer box, matching how
    /// documents describe rotated layers.
    pub fn to_affine(&self, scale: f64) -> kurbo::Affine {
        let cx = f64::from(self.size.x) * 0.5;
        let cy = f64::from(self.size.y) * 0.5;
        let rotate = if self.rotation == 0.0 {
            kurbo::Affine::IDENTITY
        } else {
            kurbo::Affine::rotate_about(
                f64::from(self.rotation).to_radians(),
                kurbo::Point::new(cx, cy),
            )
        };
        kurbo::Affine::scale(scale)
            * kurbo::Affine::translate((f64::from(self.position.x), f64::from(self.position.y)))
            * rotate
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::new(Vec2F::ZERO, Vec2F::new(100.0, 100.0))
    }
}

/// Per-corner radii for a rounded layer box.
///
/// Radii are specified clockwise starting from the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii {
    /// The radius of the top-left corner.
    pub top_left: f32,
    /// The radius of the top-right corner.
    pub top_right: f32,
    /// The radius of the bottom-right corner.
    pub bottom_right: f32,
    /// The radius of the bottom-left corner.
    pub bottom_left: f32,
}

impl CornerRadii {
    /// Create radii with potentially different values per corner.
    #[inline]
    pub const fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    /// Create radii with a single value for all corners.
    #[inline]
    pub const fn uniform(radius: f32) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    /// Convert to kurbo's rounded-rect radii type, scaled uniformly.
    #[inline]
    pub fn to_kurbo(self, scale: f64) -> kurbo::RoundedRectRadii {
        kurbo::RoundedRectRadii::new(
            f64::from(self.top_left) * scale,
            f64::from(self.top_right) * scale,
            f64::from(self.bottom_right) * scale,
            f64::from(self.bottom_left) * scale,
        )
    }

    /// If all radii are equal, returns the uniform radius; otherwise `None`.
    #[inline]
    pub fn as_single_radius(self) -> Option<f32> {
        let epsilon = 1e-6_f32;
        if (self.top_left - self.top_right).abs() < epsilon
            && (self.top_right - self.bottom_right).abs() < epsilon
            && (self.bottom_right - self.bottom_left).abs() < epsilon
        {
            Some(self.top_left)
        } else {
            None
        }
    }

    /// Returns true if every corner is square.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.as_single_radius().is_some_and(|r| r == 0.0)
    }
}

impl From<f32> for CornerRadii {
    #[inline]
    fn from(radius: f32) -> Self {
        Self::uniform(radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_preserves_center() {
        let t = Transform2D {
            position: Vec2F::new(10.0, 20.0),
            size: Vec2F::new(40.0, 30.0),
            rotation: 90.0,
        };
        let center = t.to_affine(1.0) * kurbo::Point::new(20.0, 15.0);
        assert!((center.x - 30.0).abs() < 1e-9, "center x moved: {center:?}");
        assert!((center.y - 35.0).abs() < 1e-9, "center y moved: {center:?}");
    }

    #[test]
    fn affine_scales_uniformly() {
        let t = Transform2D::new(Vec2F::new(5.0, 5.0), Vec2F::new(10.0, 10.0));
        let p1 = t.to_affine(1.0) * kurbo::Point::new(10.0, 10.0);
        let p2 = t.to_affine(2.0) * kurbo::Point::new(10.0, 10.0);
        assert_eq!(p2.x, p1.x * 2.0);
        assert_eq!(p2.y, p1.y * 2.0);
    }

    #[test]
    fn single_radius_detection() {
        assert_eq!(CornerRadii::uniform(4.0).as_single_radius(), Some(4.0));
        assert_eq!(
            CornerRadii::new(1.0, 2.0, 3.0, 4.0).as_single_radius(),
            None
        );
    }
}
