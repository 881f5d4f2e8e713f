// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic composition of the three template axes into a document.

use imprint_schema::{
    Color, Document, Layer, LayerCommon, LayerId, Paint, Paragraph, ShapeLayer, TextLayer,
    TextStyle, Vec2F,
};

use crate::{AccentAnchor, AccentKit, LayerStub, Recipe, Role, StubKind, Theme};

/// Default page size in document units: 87.5 x 50 mm at 4 units/mm.
pub const CARD_SIZE: Vec2F = Vec2F::new(350.0, 200.0);

/// Realize a stub into a colorless layer carrying its role tag.
fn realize(stub: &LayerStub) -> Layer {
    let mut common = LayerCommon::new(LayerId(0), stub.name.clone(), stub.transform);
    common.tags.push(stub.role.tag().into());
    match &stub.kind {
        StubKind::Text {
            text,
            font_family,
            font_size,
            weight,
            align,
            uppercase,
            letter_spacing,
        } => {
            // Colorless until the theme pass runs.
            let mut style = TextStyle::new(font_family.clone(), *font_size, Color::BLACK);
            style.font_weight = *weight;
            style.uppercase = *uppercase;
            style.letter_spacing = *letter_spacing;
            Layer::Text(TextLayer {
                common,
                text: text.clone(),
                style,
                paragraphs: vec![Paragraph { align: *align }],
            })
        }
        StubKind::Shape { shape } => Layer::Shape(ShapeLayer {
            common,
            shape: *shape,
            fills: vec![Paint::solid(Color::BLACK)],
            strokes: Vec::new(),
        }),
    }
}

fn add_stubs(
    mut doc: Document,
    stubs: &[LayerStub],
    realized: &mut Vec<(LayerId, Role, Option<Color>)>,
) -> Document {
    for stub in stubs {
        let (next, id) = doc.add_layer(realize(stub));
        realized.push((id, stub.role, stub.source_color));
        doc = next;
    }
    doc
}

/// Generate a complete document from one recipe, theme, and accent kit.
///
/// Composition order is fixed: background, behind accents, recipe content,
/// theme coloring over everything so far, above accents. Repeated calls
/// with equal arguments produce structurally identical documents, layer
/// ids included.
pub fn generate(
    cfg: &crate::ContentConfig,
    recipe: &Recipe,
    theme: &Theme,
    kit: &AccentKit,
    use_source_colors: bool,
) -> Document {
    let doc_id = format!("{}--{}--{}", recipe.id, theme.id, kit.id);
    let mut doc = Document::new(doc_id, CARD_SIZE.x, CARD_SIZE.y);
    doc.meta.title = if cfg.name.is_empty() {
        recipe.name.to_owned()
    } else {
        cfg.name.clone()
    };

    // Background: the root frame takes the theme's background color.
    let root = doc.root_frame;
    doc = doc
        .update_layer(root, |l| {
            if let Layer::Shape(shape) = l {
                shape.fills = vec![Paint::solid(theme.palette.background)];
            }
        })
        .unwrap_or_else(|_| unreachable!("root frame always exists"));

    let mut realized = Vec::new();
    doc = add_stubs(
        doc,
        &kit.make(CARD_SIZE, AccentAnchor::BehindContent),
        &mut realized,
    );
    doc = add_stubs(doc, &recipe.layout(CARD_SIZE, cfg), &mut realized);

    // Theme pass over everything realized so far.
    for (id, role, source) in realized.drain(..) {
        let color = match source {
            Some(c) if use_source_colors => c,
            _ => theme.color_for(role),
        };
        doc = doc
            .update_layer(id, |l| match l {
                Layer::Text(text) => text.style.fill = Paint::solid(color),
                Layer::Shape(shape) => shape.fills = vec![Paint::solid(color)],
                Layer::Path(path) => path.fill = Some(Paint::solid(color)),
                Layer::Icon(icon) => icon.color = color,
                Layer::Image(_) => {}
            })
            .unwrap_or_else(|_| unreachable!("realized ids are live"));
    }

    // Above accents keep the theme's accent color directly.
    let mut above = Vec::new();
    doc = add_stubs(
        doc,
        &kit.make(CARD_SIZE, AccentAnchor::AboveContent),
        &mut above,
    );
    for (id, role, source) in above {
        let color = match source {
            Some(c) if use_source_colors => c,
            _ => theme.color_for(role),
        };
        doc = doc
            .update_layer(id, |l| {
                if let Layer::Shape(shape) = l {
                    shape.fills = vec![Paint::solid(color)];
                }
            })
            .unwrap_or_else(|_| unreachable!("realized ids are live"));
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;
    use imprint_schema::Transform2D;

    fn cfg() -> crate::ContentConfig {
        crate::ContentConfig {
            name: "Ada Lovelace".into(),
            title: "Analyst".into(),
            company: "Analytical Engines".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn generation_is_deterministic_ids_included() {
        let reg = Registry::builtin();
        for recipe in reg.recipes() {
            let theme = reg.theme("slate").unwrap();
            let kit = reg.kit("corner").unwrap();
            let a = generate(&cfg(), recipe, theme, kit, false);
            let b = generate(&cfg(), recipe, theme, kit, false);
            assert_eq!(a, b, "recipe {}", recipe.id);
            a.validate().unwrap();
        }
    }

    #[test]
    fn composition_order_stacks_behind_content_above() {
        let reg = Registry::builtin();
        let doc = generate(
            &cfg(),
            reg.recipe("classic-band").unwrap(),
            reg.theme("ink").unwrap(),
            reg.kit("rules").unwrap(),
            false,
        );
        let tags: Vec<&str> = doc
            .layers_ordered()
            .map(|l| l.common().tags.first().map_or("", String::as_str))
            .collect();
        // Root frame, then the kit's behind layers, then recipe content.
        assert_eq!(tags[0], "frame");
        assert_eq!(&tags[1..3], &["decorative", "decorative"]);
        assert!(tags[3..].iter().any(|t| *t == "name"));
    }

    #[test]
    fn above_accents_land_on_top_of_content() {
        let reg = Registry::builtin();
        let doc = generate(
            &cfg(),
            reg.recipe("sidebar").unwrap(),
            reg.theme("ink").unwrap(),
            reg.kit("corner").unwrap(),
            false,
        );
        let top = doc.layers_ordered().last().unwrap();
        assert_eq!(top.common().name, "Corner Disc");
    }

    #[test]
    fn theme_pass_colors_roles_from_the_palette() {
        let reg = Registry::builtin();
        let theme = reg.theme("terracotta").unwrap();
        let doc = generate(
            &cfg(),
            reg.recipe("centered-minimal").unwrap(),
            theme,
            reg.kit("none").unwrap(),
            false,
        );
        let name_id = doc.layers_tagged("name")[0];
        let Some(Layer::Text(text)) = doc.layer(name_id) else {
            panic!("name layer is text");
        };
        assert_eq!(text.style.fill, Paint::solid(theme.palette.ink));
    }

    #[test]
    fn source_colors_survive_when_requested() {
        let reg = Registry::builtin();
        let red = Color::from_rgba8(200, 30, 30, 255);
        let recipe = Recipe::new("src", "Source", &[], |page, cfg| {
            vec![
                crate::LayerStub::text(
                    Role::Name,
                    "Name",
                    Transform2D::new(Vec2F::ZERO, Vec2F::new(page.x, 30.0)),
                    &cfg.name,
                    16.0,
                )
                .source(Color::from_rgba8(200, 30, 30, 255)),
            ]
        });
        let theme = reg.theme("ink").unwrap();
        let kit = reg.kit("none").unwrap();

        let kept = generate(&cfg(), &recipe, theme, kit, true);
        let themed = generate(&cfg(), &recipe, theme, kit, false);
        let probe = |doc: &Document| {
            let id = doc.layers_tagged("name")[0];
            let Some(Layer::Text(text)) = doc.layer(id) else {
                panic!("name layer is text");
            };
            text.style.fill.clone()
        };
        assert_eq!(probe(&kept), Paint::solid(red));
        assert_eq!(probe(&themed), Paint::solid(theme.palette.ink));
    }
}
