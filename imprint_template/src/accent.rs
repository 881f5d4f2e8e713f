// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accent kits: decorative stub makers anchored behind or above content.

use imprint_schema::{ShapeType, Vec2F};

use crate::{LayerStub, Role};

/// Where a kit's layers sit relative to the recipe's content layers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccentAnchor {
    /// Between the background and the content.
    BehindContent,
    /// On top of the content.
    AboveContent,
}

/// A named decoration axis producing stubs at a given anchor.
#[derive(Clone, Debug)]
pub struct AccentKit {
    /// Stable identifier used in generated document ids.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Style tags matched by suggestion filters.
    pub styles: &'static [&'static str],
    make: fn(Vec2F, AccentAnchor) -> Vec<LayerStub>,
}

impl AccentKit {
    /// Produce the kit's stubs for one anchor on a page of the given size.
    pub fn make(&self, page: Vec2F, anchor: AccentAnchor) -> Vec<LayerStub> {
        (self.make)(page, anchor)
    }

    /// Whether this kit carries the given style tag.
    pub fn has_style(&self, style: &str) -> bool {
        self.styles.iter().any(|s| s.eq_ignore_ascii_case(style))
    }
}

fn make_none(_page: Vec2F, _anchor: AccentAnchor) -> Vec<LayerStub> {
    Vec::new()
}

/// Thin rules hugging the top and bottom page edges, behind content.
fn make_rules(page: Vec2F, anchor: AccentAnchor) -> Vec<LayerStub> {
    if anchor != AccentAnchor::BehindContent {
        return Vec::new();
    }
    let inset = page.y * 0.06;
    let thickness = page.y * 0.008;
    vec![
        LayerStub::rect(
            Role::Accent,
            "Top Rule",
            frame_rect(page, inset, thickness, true),
        ),
        LayerStub::rect(
            Role::Accent,
            "Bottom Rule",
            frame_rect(page, inset, thickness, false),
        ),
    ]
}

fn frame_rect(page: Vec2F, inset: f32, thickness: f32, top: bool) -> imprint_schema::Transform2D {
    let y = if top {
        inset
    } else {
        page.y - inset - thickness
    };
    imprint_schema::Transform2D::new(
        Vec2F::new(inset, y),
        Vec2F::new(page.x - 2.0 * inset, thickness),
    )
}

/// A large quarter-circle bleeding off the top-right corner, above content.
fn make_corner(page: Vec2F, anchor: AccentAnchor) -> Vec<LayerStub> {
    if anchor != AccentAnchor::AboveContent {
        return Vec::new();
    }
    let d = page.y * 0.5;
    let mut stub = LayerStub::rect(
        Role::Accent,
        "Corner Disc",
        imprint_schema::Transform2D::new(Vec2F::new(page.x - d * 0.5, -d * 0.5), Vec2F::new(d, d)),
    );
    stub.kind = crate::StubKind::Shape {
        shape: ShapeType::Ellipse,
    };
    vec![stub]
}

pub(crate) fn builtin_kits() -> Vec<AccentKit> {
    vec![
        AccentKit {
            id: "none",
            name: "No Accents",
            styles: &["minimal", "clean"],
            make: make_none,
        },
        AccentKit {
            id: "rules",
            name: "Frame Rules",
            styles: &["classic", "professional"],
            make: make_rules,
        },
        AccentKit {
            id: "corner",
            name: "Corner Disc",
            styles: &["modern", "bold"],
            make: make_corner,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kits_respect_their_anchor() {
        let page = Vec2F::new(350.0, 200.0);
        for kit in builtin_kits() {
            let behind = kit.make(page, AccentAnchor::BehindContent);
            let above = kit.make(page, AccentAnchor::AboveContent);
            match kit.id {
                "none" => assert!(behind.is_empty() && above.is_empty()),
                "rules" => {
                    assert_eq!(behind.len(), 2, "rules sit behind content");
                    assert!(above.is_empty());
                }
                "corner" => {
                    assert!(behind.is_empty());
                    assert_eq!(above.len(), 1, "disc sits above content");
                }
                other => panic!("unknown builtin kit {other}"),
            }
        }
    }
}
