// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recipes: pure layout functions from content to positioned, colorless stubs.
//!
//! A recipe decides where things go and how big they are, never what color
//! they get. Stubs carry a [`Role`] so the theme pass can color them later;
//! a stub may also carry a source color the generator keeps when asked to
//! preserve source colors.

use imprint_schema::{Color, ShapeType, TextAlign, Transform2D, Vec2F};

use crate::ContentConfig;

/// The semantic slot a stub fills. Themes color by role; the role also
/// becomes a tag on the realized layer so later queries and revisions can
/// find it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The page background.
    Background,
    /// Primary name line.
    Name,
    /// Role or subtitle line.
    Title,
    /// Company or brand line.
    Company,
    /// Contact details (email, phone, website).
    Contact,
    /// Free-form tagline.
    Tagline,
    /// Decorative accent geometry.
    Accent,
}

impl Role {
    /// The semantic tag carried by layers realized from this role.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Name => "name",
            Self::Title => "title",
            Self::Company => "company",
            Self::Contact => "contact",
            Self::Tagline => "tagline",
            Self::Accent => "decorative",
        }
    }
}

/// What kind of layer a stub realizes into.
#[derive(Clone, Debug, PartialEq)]
pub enum StubKind {
    /// A text layer.
    Text {
        /// The text content.
        text: String,
        /// Font family name.
        font_family: String,
        /// Font size in document units.
        font_size: f32,
        /// CSS-style weight.
        weight: u16,
        /// Horizontal alignment within the stub box.
        align: TextAlign,
        /// Force uppercase rendering.
        uppercase: bool,
        /// Extra advance between glyphs, document units.
        letter_spacing: f32,
    },
    /// A shape layer.
    Shape {
        /// The shape geometry.
        shape: ShapeType,
    },
}

/// A positioned, colorless layer-to-be.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerStub {
    /// Semantic slot, drives theme coloring and tagging.
    pub role: Role,
    /// Layer name in the realized document.
    pub name: String,
    /// Placement in document space.
    pub transform: Transform2D,
    /// What the stub realizes into.
    pub kind: StubKind,
    /// Color the stub's source material carried, if any. Used instead of
    /// the theme color when the generator is asked to keep source colors.
    pub source_color: Option<Color>,
}

impl LayerStub {
    /// A text stub with sensible defaults (Inter, regular weight, left).
    pub fn text(role: Role, name: impl Into<String>, transform: Transform2D, text: impl Into<String>, font_size: f32) -> Self {
        Self {
            role,
            name: name.into(),
            transform,
            kind: StubKind::Text {
                text: text.into(),
                font_family: "Inter".into(),
                font_size,
                weight: 400,
                align: TextAlign::Left,
                uppercase: false,
                letter_spacing: 0.0,
            },
            source_color: None,
        }
    }

    /// A rectangle shape stub.
    pub fn rect(role: Role, name: impl Into<String>, transform: Transform2D) -> Self {
        Self {
            role,
            name: name.into(),
            transform,
            kind: StubKind::Shape {
                shape: ShapeType::Rectangle,
            },
            source_color: None,
        }
    }

    /// Set the text weight. No effect on shape stubs.
    pub fn weight(mut self, w: u16) -> Self {
        if let StubKind::Text { weight, .. } = &mut self.kind {
            *weight = w;
        }
        self
    }

    /// Set the text alignment. No effect on shape stubs.
    pub fn align(mut self, a: TextAlign) -> Self {
        if let StubKind::Text { align, .. } = &mut self.kind {
            *align = a;
        }
        self
    }

    /// Render the text uppercase with the given letter spacing.
    pub fn caps(mut self, spacing: f32) -> Self {
        if let StubKind::Text {
            uppercase,
            letter_spacing,
            ..
        } = &mut self.kind
        {
            *uppercase = true;
            *letter_spacing = spacing;
        }
        self
    }

    /// Attach a source color.
    pub fn source(mut self, color: Color) -> Self {
        self.source_color = Some(color);
        self
    }
}

/// A named layout axis: content in, positioned colorless stubs out.
#[derive(Clone, Debug)]
pub struct Recipe {
    /// Stable identifier used in generated document ids.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Style tags matched by suggestion filters ("minimal", "classic", ...).
    pub styles: &'static [&'static str],
    layout: fn(Vec2F, &ContentConfig) -> Vec<LayerStub>,
}

impl Recipe {
    /// Build a recipe around a layout function.
    pub fn new(
        id: &'static str,
        name: &'static str,
        styles: &'static [&'static str],
        layout: fn(Vec2F, &ContentConfig) -> Vec<LayerStub>,
    ) -> Self {
        Self {
            id,
            name,
            styles,
            layout,
        }
    }

    /// Lay out the content on a page of the given size.
    pub fn layout(&self, page: Vec2F, cfg: &ContentConfig) -> Vec<LayerStub> {
        (self.layout)(page, cfg)
    }

    /// Whether this recipe carries the given style tag.
    pub fn has_style(&self, style: &str) -> bool {
        self.styles.iter().any(|s| s.eq_ignore_ascii_case(style))
    }
}

fn frac(page: Vec2F, x: f32, y: f32, w: f32, h: f32) -> Transform2D {
    Transform2D::new(
        Vec2F::new(page.x * x, page.y * y),
        Vec2F::new(page.x * w, page.y * h),
    )
}

/// Centered, sparse layout: a thin rule, the name, the title, contacts at
/// the foot. The emptiness is the design.
pub(crate) fn layout_centered(page: Vec2F, cfg: &ContentConfig) -> Vec<LayerStub> {
    let mut stubs = Vec::new();
    stubs.push(LayerStub::rect(
        Role::Accent,
        "Accent Line",
        frac(page, 0.48, 0.34, 0.04, 0.006),
    ));
    stubs.push(
        LayerStub::text(
            Role::Name,
            "Name",
            frac(page, 0.1, 0.40, 0.8, 0.14),
            &cfg.name,
            page.y * 0.085,
        )
        .weight(600)
        .align(TextAlign::Center)
        .caps(page.y * 0.012),
    );
    if !cfg.title.is_empty() {
        stubs.push(
            LayerStub::text(
                Role::Title,
                "Title",
                frac(page, 0.1, 0.55, 0.8, 0.08),
                &cfg.title,
                page.y * 0.045,
            )
            .align(TextAlign::Center)
            .caps(page.y * 0.008),
        );
    }
    let contact = cfg.contact_lines().join("\n");
    if !contact.is_empty() {
        stubs.push(
            LayerStub::text(
                Role::Contact,
                "Contact",
                frac(page, 0.1, 0.78, 0.8, 0.16),
                contact,
                page.y * 0.035,
            )
            .align(TextAlign::Center),
        );
    }
    stubs
}

/// Left accent bar with a right-of-bar content block.
pub(crate) fn layout_sidebar(page: Vec2F, cfg: &ContentConfig) -> Vec<LayerStub> {
    let mut stubs = Vec::new();
    stubs.push(LayerStub::rect(
        Role::Accent,
        "Side Bar",
        frac(page, 0.0, 0.0, 0.06, 1.0),
    ));
    if !cfg.company.is_empty() {
        stubs.push(
            LayerStub::text(
                Role::Company,
                "Company",
                frac(page, 0.12, 0.14, 0.8, 0.08),
                &cfg.company,
                page.y * 0.05,
            )
            .weight(700)
            .caps(page.y * 0.01),
        );
    }
    stubs.push(
        LayerStub::text(
            Role::Name,
            "Name",
            frac(page, 0.12, 0.40, 0.8, 0.12),
            &cfg.name,
            page.y * 0.08,
        )
        .weight(600),
    );
    if !cfg.title.is_empty() {
        stubs.push(LayerStub::text(
            Role::Title,
            "Title",
            frac(page, 0.12, 0.54, 0.8, 0.07),
            &cfg.title,
            page.y * 0.04,
        ));
    }
    let contact = cfg.contact_lines().join("\n");
    if !contact.is_empty() {
        stubs.push(LayerStub::text(
            Role::Contact,
            "Contact",
            frac(page, 0.12, 0.72, 0.8, 0.22),
            contact,
            page.y * 0.034,
        ));
    }
    stubs
}

/// Full-width header band with the company name in it, content below.
pub(crate) fn layout_banded(page: Vec2F, cfg: &ContentConfig) -> Vec<LayerStub> {
    let mut stubs = Vec::new();
    stubs.push(LayerStub::rect(
        Role::Accent,
        "Header Band",
        frac(page, 0.0, 0.0, 1.0, 0.24),
    ));
    if !cfg.company.is_empty() {
        stubs.push(
            LayerStub::text(
                Role::Company,
                "Company",
                frac(page, 0.08, 0.055, 0.84, 0.12),
                &cfg.company,
                page.y * 0.06,
            )
            .weight(700)
            .caps(page.y * 0.01),
        );
    }
    stubs.push(
        LayerStub::text(
            Role::Name,
            "Name",
            frac(page, 0.08, 0.38, 0.84, 0.12),
            &cfg.name,
            page.y * 0.075,
        )
        .weight(600),
    );
    if !cfg.title.is_empty() {
        stubs.push(LayerStub::text(
            Role::Title,
            "Title",
            frac(page, 0.08, 0.52, 0.84, 0.07),
            &cfg.title,
            page.y * 0.042,
        ));
    }
    if !cfg.tagline.is_empty() {
        stubs.push(LayerStub::text(
            Role::Tagline,
            "Tagline",
            frac(page, 0.08, 0.64, 0.84, 0.07),
            &cfg.tagline,
            page.y * 0.036,
        ));
    }
    let contact = cfg.contact_lines().join("\n");
    if !contact.is_empty() {
        stubs.push(
            LayerStub::text(
                Role::Contact,
                "Contact",
                frac(page, 0.08, 0.78, 0.84, 0.18),
                contact,
                page.y * 0.032,
            )
            .align(TextAlign::Right),
        );
    }
    stubs
}
