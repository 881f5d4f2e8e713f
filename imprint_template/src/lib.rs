// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imprint Template: parametric document generation.
//!
//! Documents are generated by composing three independent axes instead of
//! hand-coding every template: a [`Recipe`] positions colorless layer stubs
//! from a flat [`ContentConfig`], a [`Theme`] colors them by role, and an
//! [`AccentKit`] adds decorative geometry behind or above the content. The
//! distinct template count is the product of the axis sizes, and
//! [`generate`] is fully deterministic, so a sampled combination can always
//! be reproduced from its inputs.
//!
//! # Position in the stack
//!
//! This crate only builds [`imprint_schema::Document`] values; editing them
//! afterwards goes through `imprint_store` like any other document, and
//! rendering through `imprint_render`.

mod accent;
mod batch;
mod content;
mod generate;
mod recipe;
mod registry;
mod theme;

pub use accent::{AccentAnchor, AccentKit};
pub use batch::{batch_generate, is_header_row, parse_rows};
pub use content::{CONTENT_FIELDS, ContentConfig};
pub use generate::{CARD_SIZE, generate};
pub use recipe::{LayerStub, Recipe, Role, StubKind};
pub use registry::{Registry, Suggestion};
pub use theme::{Palette, Theme};
