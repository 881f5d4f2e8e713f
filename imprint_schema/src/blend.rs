// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer compositing modes, convertible to [`peniko::BlendMode`].

use serde::{Deserialize, Serialize};

/// Standard compositing modes for layers.
///
/// The set mirrors the CSS/PDF blend modes that peniko's `Mix` supports, so
/// every variant lowers losslessly to the renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendModeKind {
    /// Source-over with no mixing.
    #[default]
    Normal,
    /// Multiply source and backdrop.
    Multiply,
    /// Inverse-multiply (brightens).
    Screen,
    /// Multiply or screen depending on the backdrop.
    Overlay,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Brighten backdrop toward the source.
    ColorDodge,
    /// Darken backdrop toward the source.
    ColorBurn,
    /// Overlay with source and backdrop swapped.
    HardLight,
    /// Softer variant of hard-light.
    SoftLight,
    /// Absolute channel difference.
    Difference,
    /// Lower-contrast difference.
    Exclusion,
    /// Source hue with backdrop saturation/luminosity.
    Hue,
    /// Source saturation with backdrop hue/luminosity.
    Saturation,
    /// Source hue+saturation with backdrop luminosity.
    Color,
    /// Source luminosity with backdrop hue/saturation.
    Luminosity,
}

impl BlendModeKind {
    /// Convert to a peniko blend mode (mix paired with source-over compose).
    pub fn to_peniko(self) -> peniko::BlendMode {
        use peniko::Mix;
        let mix = match self {
            Self::Normal => Mix::Normal,
            Self::Multiply => Mix::Multiply,
            Self::Screen => Mix::Screen,
            Self::Overlay => Mix::Overlay,
            Self::Darken => Mix::Darken,
            Self::Lighten => Mix::Lighten,
            Self::ColorDodge => Mix::ColorDodge,
            Self::ColorBurn => Mix::ColorBurn,
            Self::HardLight => Mix::HardLight,
            Self::SoftLight => Mix::SoftLight,
            Self::Difference => Mix::Difference,
            Self::Exclusion => Mix::Exclusion,
            Self::Hue => Mix::Hue,
            Self::Saturation => Mix::Saturation,
            Self::Color => Mix::Color,
            Self::Luminosity => Mix::Luminosity,
        };
        peniko::BlendMode::from(mix)
    }

    /// Returns true for the default source-over mode.
    #[inline]
    pub fn is_normal(self) -> bool {
        self == Self::Normal
    }
}
