// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! High-level intents and their compilation into primitive patch ops.
//!
//! Intents are what generators are encouraged to produce: declarative edits
//! against a symbolic target. Compilation resolves the target against the
//! live document and picks the variant-appropriate op, so the generator
//! never needs to know which layer variant carries which color field.

use imprint_schema::{Color, Document, Layer, LayerId, Paint, Vec2F};
use imprint_store::PatchOp;
use serde::{Deserialize, Serialize};

/// What an intent points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TargetRepr", into = "TargetRepr")]
pub enum IntentTarget {
    /// One explicit layer id.
    Id(LayerId),
    /// Every layer carrying a semantic tag.
    TagQuery(String),
    /// The document's current selection.
    Selection,
}

/// Wire form of a target: a number, `"L3"`, `"tag:name"`, or `"selection"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum TargetRepr {
    Num(u64),
    Text(String),
}

impl TryFrom<TargetRepr> for IntentTarget {
    type Error = String;

    fn try_from(repr: TargetRepr) -> Result<Self, Self::Error> {
        match repr {
            TargetRepr::Num(n) => Ok(Self::Id(LayerId(n))),
            TargetRepr::Text(s) => {
                if s.eq_ignore_ascii_case("selection") {
                    return Ok(Self::Selection);
                }
                if let Some(tag) = s.strip_prefix("tag:") {
                    return Ok(Self::TagQuery(tag.to_owned()));
                }
                let digits = s.strip_prefix('L').unwrap_or(&s);
                digits
                    .parse::<u64>()
                    .map(|n| Self::Id(LayerId(n)))
                    .map_err(|_| format!("unrecognized intent target {s:?}"))
            }
        }
    }
}

impl From<IntentTarget> for TargetRepr {
    fn from(target: IntentTarget) -> Self {
        match target {
            IntentTarget::Id(id) => Self::Num(id.0),
            IntentTarget::TagQuery(tag) => Self::Text(format!("tag:{tag}")),
            IntentTarget::Selection => Self::Text("selection".to_owned()),
        }
    }
}

/// The declarative edit an intent requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum IntentAction {
    /// Replace the text content.
    SetText {
        /// New content.
        value: String,
    },
    /// Re-color the layer, whatever its variant.
    SetColor {
        /// New color as a hex string.
        value: String,
    },
    /// Change the font size of a text layer.
    SetFontSize {
        /// New size in document units.
        value: f32,
    },
    /// Change the layer opacity.
    SetOpacity {
        /// New opacity in `[0, 1]`.
        value: f32,
    },
    /// Move the layer box.
    Move {
        /// New left edge.
        x: f32,
        /// New top edge.
        y: f32,
    },
    /// Resize the layer box.
    Resize {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
    /// Make the layer visible.
    Show,
    /// Hide the layer.
    Hide,
    /// Rename the layer.
    Rename {
        /// New name.
        value: String,
    },
}

/// One declarative edit against a symbolic target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// What to edit.
    pub target: IntentTarget,
    /// The edit itself.
    #[serde(flatten)]
    pub action: IntentAction,
}

/// Why an intent could not be compiled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The target resolved to no layers.
    #[error("intent target resolves to no layers")]
    NoTargets,
    /// A color value did not parse as hex.
    #[error("invalid color value {0:?}")]
    BadColor(String),
}

impl IntentTarget {
    /// Resolve to concrete layer ids against the live document.
    ///
    /// Ids that do not exist resolve to nothing here; the validation gate
    /// reports unknown explicit ids instead.
    pub fn resolve(&self, doc: &Document) -> Vec<LayerId> {
        match self {
            Self::Id(id) => vec![*id],
            Self::TagQuery(tag) => doc.layers_tagged(tag),
            Self::Selection => doc.selection.clone(),
        }
    }
}

/// The variant-appropriate color op for one layer.
fn color_op(doc: &Document, target: LayerId, color: Color) -> PatchOp {
    match doc.layer(target) {
        Some(Layer::Text(_)) => PatchOp::SetTextColor {
            target,
            paint: Paint::solid(color),
        },
        Some(Layer::Path(_)) => PatchOp::SetPathFill {
            target,
            paint: Some(Paint::solid(color)),
        },
        Some(Layer::Icon(_)) => PatchOp::SetIconColor { target, color },
        // Shapes, images, and unknown targets get the generic fill op; the
        // validation gate rejects it where it does not apply.
        _ => PatchOp::SetFills {
            target,
            fills: vec![Paint::solid(color)],
        },
    }
}

/// Expand one intent into concrete ops against the live document.
pub fn compile(doc: &Document, intent: &Intent) -> Result<Vec<PatchOp>, CompileError> {
    let targets = intent.target.resolve(doc);
    if targets.is_empty() {
        return Err(CompileError::NoTargets);
    }
    let mut ops = Vec::with_capacity(targets.len());
    for target in targets {
        let op = match &intent.action {
            IntentAction::SetText { value } => PatchOp::SetText {
                target,
                text: value.clone(),
            },
            IntentAction::SetColor { value } => {
                let color =
                    Color::from_hex(value).map_err(|_| CompileError::BadColor(value.clone()))?;
                color_op(doc, target, color)
            }
            IntentAction::SetFontSize { value } => PatchOp::SetFontSize {
                target,
                size: *value,
            },
            IntentAction::SetOpacity { value } => PatchOp::SetOpacity {
                target,
                opacity: *value,
            },
            IntentAction::Move { x, y } => PatchOp::SetPosition {
                target,
                position: Vec2F::new(*x, *y),
            },
            IntentAction::Resize { width, height } => PatchOp::SetSize {
                target,
                size: Vec2F::new(*width, *height),
            },
            IntentAction::Show => PatchOp::SetVisible {
                target,
                visible: true,
            },
            IntentAction::Hide => PatchOp::SetVisible {
                target,
                visible: false,
            },
            IntentAction::Rename { value } => PatchOp::SetName {
                target,
                name: value.clone(),
            },
        };
        ops.push(op);
    }
    Ok(ops)
}
