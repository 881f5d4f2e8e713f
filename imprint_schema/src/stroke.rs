// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke descriptions carried by shape, path, and frame layers.

use serde::{Deserialize, Serialize};

use crate::Paint;

/// Where a stroke sits relative to the shape outline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeAlign {
    /// Entirely inside the shape region.
    Inner,
    /// Centered on the outline.
    #[default]
    Center,
    /// Entirely outside the shape region.
    Outer,
}

/// Stroke end-cap style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineCap {
    /// Flat cap at the endpoint.
    #[default]
    Butt,
    /// Semicircular cap.
    Round,
    /// Square cap extending half a width past the endpoint.
    Square,
}

/// Stroke join style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineJoin {
    /// Sharp corner, subject to the miter limit.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

/// A full stroke description: paint plus geometry parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeSpec {
    /// Stroke paint.
    pub paint: Paint,
    /// Stroke width in document units.
    pub width: f32,
    /// Alignment relative to the outline.
    #[serde(default)]
    pub align: StrokeAlign,
    /// Dash pattern (on/off lengths). Empty means solid.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f32>,
    /// End-cap style.
    #[serde(default)]
    pub cap: LineCap,
    /// Join style.
    #[serde(default)]
    pub join: LineJoin,
    /// Miter limit for [`LineJoin::Miter`].
    #[serde(default = "default_miter_limit")]
    pub miter_limit: f32,
}

fn default_miter_limit() -> f32 {
    4.0
}

impl StrokeSpec {
    /// A solid centered stroke.
    pub fn new(paint: Paint, width: f32) -> Self {
        Self {
            paint,
            width,
            align: StrokeAlign::Center,
            dash: Vec::new(),
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: default_miter_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize() {
        let spec: StrokeSpec = serde_json::from_str(
            r#"{"paint":{"type":"solid","color":{"r":0.0,"g":0.0,"b":0.0,"a":1.0}},"width":1.5}"#,
        )
        .unwrap();
        assert_eq!(spec.align, StrokeAlign::Center);
        assert_eq!(spec.miter_limit, 4.0);
        assert!(spec.dash.is_empty());
    }
}
