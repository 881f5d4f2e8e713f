// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight-alpha RGBA color with hex parsing, convertible to [`peniko::Color`].

use core::fmt;
use serde::{Deserialize, Serialize};

/// A straight-alpha sRGB color with components in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

/// Error produced when parsing a hex color string fails.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color {0:?}")]
pub struct ColorParseError(pub String);

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a color from float components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit components.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Convert to 8-bit components, clamping to the valid range.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "components are clamped to [0, 255] before casting"
    )]
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Parse a hex color of the form `#rgb`, `#rrggbb`, or `#rrggbbaa`.
    ///
    /// The leading `#` is optional. Parsing is case-insensitive.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let err = || ColorParseError(s.to_string());
        // The arms below slice at fixed byte offsets; multibyte input must
        // fail as a parse error, not a char-boundary panic.
        if !hex.is_ascii() {
            return Err(err());
        }
        let byte = |h: &str| u8::from_str_radix(h, 16).map_err(|_| err());
        match hex.len() {
            3 => {
                // Expand each nibble: "a" -> 0xaa.
                let nibble = |h: &str| u8::from_str_radix(h, 16).map_err(|_| err());
                Ok(Self::from_rgba8(
                    nibble(&hex[0..1])? * 17,
                    nibble(&hex[1..2])? * 17,
                    nibble(&hex[2..3])? * 17,
                    255,
                ))
            }
            6 => Ok(Self::from_rgba8(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                255,
            )),
            8 => Ok(Self::from_rgba8(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => Err(err()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when the color is not fully opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Return this color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Convert to a peniko color for rendering.
    #[inline]
    pub fn to_peniko(self) -> peniko::Color {
        let [r, g, b, a] = self.to_rgba8();
        peniko::Color::from_rgba8(r, g, b, a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let c = Color::from_hex("#b45309").unwrap();
        assert_eq!(c.to_hex(), "#b45309");
        assert_eq!(Color::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn short_hex_expands() {
        assert_eq!(
            Color::from_hex("#fff").unwrap(),
            Color::from_rgba8(255, 255, 255, 255)
        );
        assert_eq!(
            Color::from_hex("123").unwrap(),
            Color::from_rgba8(0x11, 0x22, 0x33, 255)
        );
    }

    #[test]
    fn hex_with_alpha() {
        let c = Color::from_hex("#11223380").unwrap();
        assert_eq!(c.to_rgba8(), [0x11, 0x22, 0x33, 0x80]);
        assert_eq!(c.to_hex(), "#11223380");
    }

    #[test]
    fn invalid_hex_rejected() {
        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn multibyte_input_is_a_parse_error() {
        // Byte lengths 3, 6, and 8 with non-ASCII content must not reach
        // the fixed-offset slicing.
        for bad in ["€", "#€", "€€", "#日本語", "ab€", "#mañana9"] {
            assert_eq!(
                Color::from_hex(bad),
                Err(ColorParseError(bad.to_string())),
                "input {bad:?}"
            );
        }
    }
}
