// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building the structured revision request sent to the generator.

use imprint_schema::{Document, Layer, LayerId, Paint};
use serde_json::{Value, json};

use crate::Scope;

fn paint_value(paint: &Paint) -> Value {
    // Prompts only need the dominant color; full gradient/pattern specs
    // would bloat the request without changing what the model can do.
    json!(paint.primary_color().to_hex())
}

fn layer_value(layer: &Layer) -> Value {
    let common = layer.common();
    let mut value = json!({
        "id": common.id.0,
        "variant": layer.variant_name(),
        "name": common.name,
        "tags": common.tags,
        "visible": common.visible,
        "opacity": common.opacity,
    });
    let extra = match layer {
        Layer::Text(l) => json!({
            "text": l.text,
            "fontSize": l.style.font_size,
            "fontFamily": l.style.font_family,
            "color": paint_value(&l.style.fill),
        }),
        Layer::Shape(l) => json!({
            "fills": l.fills.iter().map(paint_value).collect::<Vec<_>>(),
            "strokes": l.strokes.iter().map(|s| paint_value(&s.paint)).collect::<Vec<_>>(),
        }),
        Layer::Image(l) => json!({ "image": l.image.0 }),
        Layer::Icon(l) => json!({ "icon": l.icon.0, "color": l.color.to_hex() }),
        Layer::Path(l) => json!({
            "fill": l.fill.as_ref().map(paint_value),
        }),
    };
    if let (Value::Object(base), Value::Object(extra)) = (&mut value, extra) {
        base.extend(extra);
    }
    value
}

/// Assembles one structured revision request.
///
/// The request carries the full layer tree (ids, variants, tags, current
/// field values), the instruction, the scope name, the locked ids, and the
/// response-format contract the parser expects.
#[derive(Debug)]
pub struct PromptBuilder<'a> {
    doc: &'a Document,
    instruction: &'a str,
    scope: Scope,
    locked: &'a [LayerId],
}

impl<'a> PromptBuilder<'a> {
    /// Start a request for one instruction against one document.
    pub fn new(doc: &'a Document, instruction: &'a str, scope: Scope, locked: &'a [LayerId]) -> Self {
        Self {
            doc,
            instruction,
            scope,
            locked,
        }
    }

    /// The request text handed to the generator.
    pub fn build(&self) -> String {
        let layers: Vec<Value> = self.doc.layers_ordered().map(layer_value).collect();
        let payload = json!({
            "instruction": self.instruction,
            "scope": self.scope.name(),
            "lockedLayerIds": self.locked.iter().map(|id| id.0).collect::<Vec<_>>(),
            "selection": self.doc.selection.iter().map(|id| id.0).collect::<Vec<_>>(),
            "layers": layers,
        });
        format!(
            "You are revising a layered design document.\n\
             Respond with a single JSON object of the form\n\
             {{\"intents\": [{{\"target\": <id | \"tag:NAME\" | \"selection\">, \"action\": ..., ...}}], \"ops\": [...]}}.\n\
             Only touch fields permitted by the scope; never touch locked layers.\n\n{}",
            serde_json::to_string_pretty(&payload).unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprint_schema::{
        Color, LayerCommon, TextLayer, TextStyle, Transform2D,
    };

    fn doc() -> Document {
        let doc = Document::new("d", 200.0, 100.0);
        let mut common = LayerCommon::new(LayerId(0), "Headline", Transform2D::default());
        common.tags.push("name".into());
        let (doc, _) = doc.add_layer(Layer::Text(TextLayer {
            common,
            text: "Alice".into(),
            style: TextStyle::new("Inter", 12.0, Color::from_hex("#111111").unwrap()),
            paragraphs: Vec::new(),
        }));
        doc
    }

    #[test]
    fn prompt_carries_instruction_scope_and_layer_values() {
        let doc = doc();
        let prompt = PromptBuilder::new(&doc, "make it warmer", Scope::ColorsOnly, &[]).build();
        assert!(prompt.contains("make it warmer"));
        assert!(prompt.contains("colors-only"));
        assert!(prompt.contains("\"Alice\""));
        assert!(prompt.contains("#111111"));
        assert!(prompt.contains("\"tags\""));
    }

    #[test]
    fn locked_ids_are_listed() {
        let doc = doc();
        let locked = [LayerId(2)];
        let prompt = PromptBuilder::new(&doc, "x", Scope::FullRedesign, &locked).build();
        assert!(prompt.contains("\"lockedLayerIds\": [\n    2\n  ]"));
    }
}
