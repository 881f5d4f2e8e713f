// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asset stores resolving the opaque references carried by documents.
//!
//! Documents refer to fonts by family name, images by [`ImageRef`], and icons
//! by [`IconId`]; the stores here map those references to concrete bytes and
//! geometry. A renderer with empty stores still renders every document, it
//! just degrades: text lays out with heuristic metrics and draws no glyphs,
//! and missing images/icons are skipped with a warning.

use std::sync::Arc;

use hashbrown::HashMap;
use imprint_schema::{IconId, ImageRef, PathCmd};

/// Font bytes registered per family name.
#[derive(Clone, Debug, Default)]
pub struct FontStore {
    families: HashMap<String, Arc<Vec<u8>>>,
}

impl FontStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font bytes for a family name, replacing any prior entry.
    pub fn register(&mut self, family: impl Into<String>, bytes: Vec<u8>) {
        self.families.insert(family.into(), Arc::new(bytes));
    }

    /// Look up the font bytes for a family.
    pub fn get(&self, family: &str) -> Option<&[u8]> {
        self.families.get(family).map(|b| b.as_slice())
    }
}

/// Decoded RGBA8 pixels for an image asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Unpremultiplied RGBA8 bytes, row-major, `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// A single-color image, mostly useful in tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// Image content registered per [`ImageRef`].
#[derive(Clone, Debug, Default)]
pub struct ImageStore {
    images: HashMap<String, Arc<RasterImage>>,
}

impl ImageStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register image content under a reference key.
    pub fn register(&mut self, key: impl Into<String>, image: RasterImage) {
        self.images.insert(key.into(), Arc::new(image));
    }

    /// Resolve an image reference.
    pub fn get(&self, image: &ImageRef) -> Option<&RasterImage> {
        self.images.get(&image.0).map(|i| i.as_ref())
    }
}

/// Vector geometry for a symbolic icon, expressed in a square viewbox.
#[derive(Clone, Debug, PartialEq)]
pub struct IconGlyph {
    /// Path geometry in viewbox coordinates.
    pub commands: Vec<PathCmd>,
    /// Side length of the square viewbox the commands are expressed in.
    pub viewbox: f32,
}

/// Icon geometry registered per [`IconId`].
#[derive(Clone, Debug, Default)]
pub struct IconStore {
    icons: HashMap<String, Arc<IconGlyph>>,
}

impl IconStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register icon geometry under an id.
    pub fn register(&mut self, id: impl Into<String>, glyph: IconGlyph) {
        self.icons.insert(id.into(), Arc::new(glyph));
    }

    /// Resolve an icon id.
    pub fn get(&self, icon: &IconId) -> Option<&IconGlyph> {
        self.icons.get(&icon.0).map(|g| g.as_ref())
    }
}
