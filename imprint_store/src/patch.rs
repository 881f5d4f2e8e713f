// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive field mutations ([`PatchOp`]) and their application to a
//! document.
//!
//! A patch op is the smallest auditable unit of change: one field on one
//! layer (or one structural edit). Ops carry explicit targets and values, are
//! serializable, and classify themselves into a [`FieldKind`] so that
//! permission scopes can be enforced as data rather than code.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use imprint_schema::{
    BlendModeKind, Color, CornerRadii, DocMeta, Document, ImageFilters, Layer, LayerId, Paint,
    StrokeSpec, TextStyle, Vec2F,
};

/// The category of field a [`PatchOp`] mutates.
///
/// Scopes grant permissions in terms of field kinds, so every op maps to
/// exactly one kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Layer display name.
    Name,
    /// Visibility flag.
    Visibility,
    /// Lock flag.
    Lock,
    /// Layer opacity.
    Opacity,
    /// Compositing mode.
    BlendMode,
    /// Box position.
    Position,
    /// Box size.
    Size,
    /// Box rotation.
    Rotation,
    /// Corner rounding.
    CornerRadii,
    /// Semantic tags.
    Tags,
    /// Text content.
    Text,
    /// Whole text style.
    TextStyle,
    /// Text fill paint only.
    TextColor,
    /// Font size only.
    FontSize,
    /// Shape/path fill paints.
    FillPaint,
    /// Shape/path stroke specs.
    StrokePaint,
    /// Image color adjustments.
    ImageFilters,
    /// Icon tint.
    IconColor,
    /// Layer insertion, removal, or reordering.
    Structure,
    /// Selection contents.
    Selection,
    /// Document metadata.
    Meta,
}

/// A single primitive mutation of a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PatchOp {
    /// Rename a layer.
    SetName {
        /// Target layer.
        target: LayerId,
        /// New name.
        name: String,
    },
    /// Show or hide a layer.
    SetVisible {
        /// Target layer.
        target: LayerId,
        /// New visibility.
        visible: bool,
    },
    /// Lock or unlock a layer.
    SetLocked {
        /// Target layer.
        target: LayerId,
        /// New lock state.
        locked: bool,
    },
    /// Change layer opacity.
    SetOpacity {
        /// Target layer.
        target: LayerId,
        /// New opacity in `[0, 1]`.
        opacity: f32,
    },
    /// Change the compositing mode.
    SetBlendMode {
        /// Target layer.
        target: LayerId,
        /// New blend mode.
        blend: BlendModeKind,
    },
    /// Move the layer box.
    SetPosition {
        /// Target layer.
        target: LayerId,
        /// New top-left corner.
        position: Vec2F,
    },
    /// Resize the layer box.
    SetSize {
        /// Target layer.
        target: LayerId,
        /// New extent.
        size: Vec2F,
    },
    /// Rotate the layer box.
    SetRotation {
        /// Target layer.
        target: LayerId,
        /// New rotation in degrees.
        degrees: f32,
    },
    /// Change or clear corner rounding.
    SetCornerRadii {
        /// Target layer.
        target: LayerId,
        /// New radii, or `None` for square corners.
        radii: Option<CornerRadii>,
    },
    /// Replace the semantic tag list.
    SetTags {
        /// Target layer.
        target: LayerId,
        /// New tags.
        tags: Vec<String>,
    },
    /// Replace the text content of a text layer.
    SetText {
        /// Target layer.
        target: LayerId,
        /// New content.
        text: String,
    },
    /// Replace the whole text style of a text layer.
    SetTextStyle {
        /// Target layer.
        target: LayerId,
        /// New style.
        style: Box<TextStyle>,
    },
    /// Replace only the text fill paint of a text layer.
    SetTextColor {
        /// Target layer.
        target: LayerId,
        /// New glyph paint.
        paint: Paint,
    },
    /// Replace only the font size of a text layer.
    SetFontSize {
        /// Target layer.
        target: LayerId,
        /// New size in document units.
        size: f32,
    },
    /// Replace the fill list of a shape layer.
    SetFills {
        /// Target layer.
        target: LayerId,
        /// New fills, bottom-up.
        fills: Vec<Paint>,
    },
    /// Replace a single fill of a shape layer.
    SetFill {
        /// Target layer.
        target: LayerId,
        /// Index into the fill list.
        index: usize,
        /// New paint at that index.
        paint: Paint,
    },
    /// Replace the stroke list of a shape layer.
    SetStrokes {
        /// Target layer.
        target: LayerId,
        /// New strokes, in paint order.
        strokes: Vec<StrokeSpec>,
    },
    /// Replace the fill of a path layer.
    SetPathFill {
        /// Target layer.
        target: LayerId,
        /// New fill, or `None` for unfilled.
        paint: Option<Paint>,
    },
    /// Change or clear the color adjustments of an image layer.
    SetImageFilters {
        /// Target layer.
        target: LayerId,
        /// New adjustments.
        filters: Option<ImageFilters>,
    },
    /// Re-tint an icon layer.
    SetIconColor {
        /// Target layer.
        target: LayerId,
        /// New tint.
        color: Color,
    },
    /// Insert a fully-formed layer (with embedded id) at a position in the
    /// render order.
    InsertLayer {
        /// Layer value, carrying its own id.
        layer: Box<Layer>,
        /// Position in the render order; clamped to the current length.
        index: usize,
    },
    /// Remove a layer. The root frame is never removable.
    RemoveLayer {
        /// Target layer.
        target: LayerId,
    },
    /// Move a layer within the render order.
    ReorderLayer {
        /// Target layer.
        target: LayerId,
        /// New position; clamped to the current length.
        index: usize,
    },
    /// Replace the selection.
    SetSelection {
        /// New selection, in order.
        ids: Vec<LayerId>,
    },
    /// Replace the document metadata wholesale.
    ///
    /// Primarily used to restore `next_id` and print settings on undo.
    SetMeta {
        /// New metadata.
        meta: Box<DocMeta>,
    },
}

/// Why a patch op could not be applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// The target layer id is absent from the document.
    #[error("layer {0} not found")]
    NotFound(LayerId),
    /// The field does not exist on the target layer's variant, or an index
    /// is out of bounds.
    #[error("field is not valid for layer {target} ({detail})")]
    InvalidField {
        /// The op's target.
        target: LayerId,
        /// What made the field invalid.
        detail: String,
    },
    /// The op would remove the root frame.
    #[error("layer {0} is the root frame and cannot be removed")]
    RootFrame(LayerId),
    /// An inserted layer's id collides with an existing layer.
    #[error("layer {0} already exists")]
    DuplicateId(LayerId),
}

impl PatchOp {
    /// The layer this op targets, or `None` for document-level ops.
    pub fn target(&self) -> Option<LayerId> {
        match self {
            Self::SetName { target, .. }
            | Self::SetVisible { target, .. }
            | Self::SetLocked { target, .. }
            | Self::SetOpacity { target, .. }
            | Self::SetBlendMode { target, .. }
            | Self::SetPosition { target, .. }
            | Self::SetSize { target, .. }
            | Self::SetRotation { target, .. }
            | Self::SetCornerRadii { target, .. }
            | Self::SetTags { target, .. }
            | Self::SetText { target, .. }
            | Self::SetTextStyle { target, .. }
            | Self::SetTextColor { target, .. }
            | Self::SetFontSize { target, .. }
            | Self::SetFills { target, .. }
            | Self::SetFill { target, .. }
            | Self::SetStrokes { target, .. }
            | Self::SetPathFill { target, .. }
            | Self::SetImageFilters { target, .. }
            | Self::SetIconColor { target, .. }
            | Self::RemoveLayer { target }
            | Self::ReorderLayer { target, .. } => Some(*target),
            Self::InsertLayer { layer, .. } => Some(layer.id()),
            Self::SetSelection { .. } | Self::SetMeta { .. } => None,
        }
    }

    /// Which field category this op mutates.
    pub fn field_kind(&self) -> FieldKind {
        match self {
            Self::SetName { .. } => FieldKind::Name,
            Self::SetVisible { .. } => FieldKind::Visibility,
            Self::SetLocked { .. } => FieldKind::Lock,
            Self::SetOpacity { .. } => FieldKind::Opacity,
            Self::SetBlendMode { .. } => FieldKind::BlendMode,
            Self::SetPosition { .. } => FieldKind::Position,
            Self::SetSize { .. } => FieldKind::Size,
            Self::SetRotation { .. } => FieldKind::Rotation,
            Self::SetCornerRadii { .. } => FieldKind::CornerRadii,
            Self::SetTags { .. } => FieldKind::Tags,
            Self::SetText { .. } => FieldKind::Text,
            Self::SetTextStyle { .. } => FieldKind::TextStyle,
            Self::SetTextColor { .. } => FieldKind::TextColor,
            Self::SetFontSize { .. } => FieldKind::FontSize,
            Self::SetFills { .. } | Self::SetFill { .. } | Self::SetPathFill { .. } => {
                FieldKind::FillPaint
            }
            Self::SetStrokes { .. } => FieldKind::StrokePaint,
            Self::SetImageFilters { .. } => FieldKind::ImageFilters,
            Self::SetIconColor { .. } => FieldKind::IconColor,
            Self::InsertLayer { .. } | Self::RemoveLayer { .. } | Self::ReorderLayer { .. } => {
                FieldKind::Structure
            }
            Self::SetSelection { .. } => FieldKind::Selection,
            Self::SetMeta { .. } => FieldKind::Meta,
        }
    }
}

fn layer_mut<'d>(doc: &'d mut Document, id: LayerId) -> Result<&'d mut Layer, PatchError> {
    let arc = doc.layers.get_mut(&id).ok_or(PatchError::NotFound(id))?;
    // Copy-on-write: only this layer is re-allocated if it is shared with an
    // older document value.
    Ok(Arc::make_mut(arc))
}

fn invalid(target: LayerId, detail: &str) -> PatchError {
    PatchError::InvalidField {
        target,
        detail: detail.to_string(),
    }
}

fn text_layer_mut<'d>(
    doc: &'d mut Document,
    id: LayerId,
) -> Result<&'d mut imprint_schema::TextLayer, PatchError> {
    match layer_mut(doc, id)? {
        Layer::Text(l) => Ok(l),
        other => Err(invalid(
            id,
            &format!("expected a text layer, found {}", other.variant_name()),
        )),
    }
}

fn shape_layer_mut<'d>(
    doc: &'d mut Document,
    id: LayerId,
) -> Result<&'d mut imprint_schema::ShapeLayer, PatchError> {
    match layer_mut(doc, id)? {
        Layer::Shape(l) => Ok(l),
        other => Err(invalid(
            id,
            &format!("expected a shape layer, found {}", other.variant_name()),
        )),
    }
}

/// Apply a single op to a document in place.
///
/// Fails without modifying the document; callers decide whether a failure is
/// a logged no-op (the store) or a validation rejection (the revision
/// engine). Copy-on-write is per touched layer.
pub fn apply_op(doc: &mut Document, op: &PatchOp) -> Result<(), PatchError> {
    match op {
        PatchOp::SetName { target, name } => {
            layer_mut(doc, *target)?.common_mut().name = name.clone();
        }
        PatchOp::SetVisible { target, visible } => {
            layer_mut(doc, *target)?.common_mut().visible = *visible;
        }
        PatchOp::SetLocked { target, locked } => {
            layer_mut(doc, *target)?.common_mut().locked = *locked;
        }
        PatchOp::SetOpacity { target, opacity } => {
            layer_mut(doc, *target)?.common_mut().opacity = opacity.clamp(0.0, 1.0);
        }
        PatchOp::SetBlendMode { target, blend } => {
            layer_mut(doc, *target)?.common_mut().blend = *blend;
        }
        PatchOp::SetPosition { target, position } => {
            layer_mut(doc, *target)?.common_mut().transform.position = *position;
        }
        PatchOp::SetSize { target, size } => {
            layer_mut(doc, *target)?.common_mut().transform.size = *size;
        }
        PatchOp::SetRotation { target, degrees } => {
            layer_mut(doc, *target)?.common_mut().transform.rotation = *degrees;
        }
        PatchOp::SetCornerRadii { target, radii } => {
            layer_mut(doc, *target)?.common_mut().corner_radii = *radii;
        }
        PatchOp::SetTags { target, tags } => {
            layer_mut(doc, *target)?.common_mut().tags = tags.clone();
        }
        PatchOp::SetText { target, text } => {
            text_layer_mut(doc, *target)?.text = text.clone();
        }
        PatchOp::SetTextStyle { target, style } => {
            text_layer_mut(doc, *target)?.style = (**style).clone();
        }
        PatchOp::SetTextColor { target, paint } => {
            text_layer_mut(doc, *target)?.style.fill = paint.clone();
        }
        PatchOp::SetFontSize { target, size } => {
            text_layer_mut(doc, *target)?.style.font_size = *size;
        }
        PatchOp::SetFills { target, fills } => {
            shape_layer_mut(doc, *target)?.fills = fills.clone();
        }
        PatchOp::SetFill {
            target,
            index,
            paint,
        } => {
            let shape = shape_layer_mut(doc, *target)?;
            let len = shape.fills.len();
            let slot = shape
                .fills
                .get_mut(*index)
                .ok_or_else(|| invalid(*target, &format!("fill index {index} >= {len}")))?;
            *slot = paint.clone();
        }
        PatchOp::SetStrokes { target, strokes } => {
            shape_layer_mut(doc, *target)?.strokes = strokes.clone();
        }
        PatchOp::SetPathFill { target, paint } => match layer_mut(doc, *target)? {
            Layer::Path(l) => l.fill = paint.clone(),
            other => {
                return Err(invalid(
                    *target,
                    &format!("expected a path layer, found {}", other.variant_name()),
                ));
            }
        },
        PatchOp::SetImageFilters { target, filters } => match layer_mut(doc, *target)? {
            Layer::Image(l) => l.filters = *filters,
            other => {
                return Err(invalid(
                    *target,
                    &format!("expected an image layer, found {}", other.variant_name()),
                ));
            }
        },
        PatchOp::SetIconColor { target, color } => match layer_mut(doc, *target)? {
            Layer::Icon(l) => l.color = *color,
            other => {
                return Err(invalid(
                    *target,
                    &format!("expected an icon layer, found {}", other.variant_name()),
                ));
            }
        },
        PatchOp::InsertLayer { layer, index } => {
            let id = layer.id();
            if doc.layers.contains_key(&id) {
                return Err(PatchError::DuplicateId(id));
            }
            doc.layers.insert(id, Arc::new((**layer).clone()));
            let index = (*index).min(doc.layer_order.len());
            doc.layer_order.insert(index, id);
            // Keep future allocations clear of re-inserted ids.
            doc.meta.next_id = doc.meta.next_id.max(id.0 + 1);
        }
        PatchOp::RemoveLayer { target } => {
            if *target == doc.root_frame {
                return Err(PatchError::RootFrame(*target));
            }
            if doc.layers.remove(target).is_none() {
                return Err(PatchError::NotFound(*target));
            }
            doc.layer_order.retain(|l| l != target);
            doc.selection.retain(|l| l != target);
        }
        PatchOp::ReorderLayer { target, index } => {
            if !doc.layers.contains_key(target) {
                return Err(PatchError::NotFound(*target));
            }
            doc.layer_order.retain(|l| l != target);
            let index = (*index).min(doc.layer_order.len());
            doc.layer_order.insert(index, *target);
        }
        PatchOp::SetSelection { ids } => {
            let filtered: Vec<LayerId> = {
                let mut out = Vec::new();
                for id in ids {
                    if doc.layers.contains_key(id) && !out.contains(id) {
                        out.push(*id);
                    }
                }
                out
            };
            doc.selection = filtered;
        }
        PatchOp::SetMeta { meta } => {
            doc.meta = (**meta).clone();
        }
    }
    Ok(())
}

/// Returns true if applying `op` to `doc` would change nothing.
///
/// Ops with invalid or missing targets are *not* no-ops; they surface their
/// error through [`apply_op`] instead.
pub fn is_noop(doc: &Document, op: &PatchOp) -> bool {
    let Some(target) = op.target() else {
        return match op {
            PatchOp::SetSelection { ids } => *ids == doc.selection,
            PatchOp::SetMeta { meta } => **meta == doc.meta,
            _ => false,
        };
    };
    let Some(layer) = doc.layer(target) else {
        return false;
    };
    let common = layer.common();
    match op {
        PatchOp::SetName { name, .. } => *name == common.name,
        PatchOp::SetVisible { visible, .. } => *visible == common.visible,
        PatchOp::SetLocked { locked, .. } => *locked == common.locked,
        PatchOp::SetOpacity { opacity, .. } => opacity.clamp(0.0, 1.0) == common.opacity,
        PatchOp::SetBlendMode { blend, .. } => *blend == common.blend,
        PatchOp::SetPosition { position, .. } => *position == common.transform.position,
        PatchOp::SetSize { size, .. } => *size == common.transform.size,
        PatchOp::SetRotation { degrees, .. } => *degrees == common.transform.rotation,
        PatchOp::SetCornerRadii { radii, .. } => *radii == common.corner_radii,
        PatchOp::SetTags { tags, .. } => *tags == common.tags,
        PatchOp::SetText { text, .. } => matches!(layer, Layer::Text(l) if l.text == *text),
        PatchOp::SetTextStyle { style, .. } => {
            matches!(layer, Layer::Text(l) if l.style == **style)
        }
        PatchOp::SetTextColor { paint, .. } => {
            matches!(layer, Layer::Text(l) if l.style.fill == *paint)
        }
        PatchOp::SetFontSize { size, .. } => {
            matches!(layer, Layer::Text(l) if l.style.font_size == *size)
        }
        PatchOp::SetFills { fills, .. } => {
            matches!(layer, Layer::Shape(l) if l.fills == *fills)
        }
        PatchOp::SetFill { index, paint, .. } => {
            matches!(layer, Layer::Shape(l) if l.fills.get(*index) == Some(paint))
        }
        PatchOp::SetStrokes { strokes, .. } => {
            matches!(layer, Layer::Shape(l) if l.strokes == *strokes)
        }
        PatchOp::SetPathFill { paint, .. } => {
            matches!(layer, Layer::Path(l) if l.fill == *paint)
        }
        PatchOp::SetImageFilters { filters, .. } => {
            matches!(layer, Layer::Image(l) if l.filters == *filters)
        }
        PatchOp::SetIconColor { color, .. } => {
            matches!(layer, Layer::Icon(l) if l.color == *color)
        }
        // Structural ops always change something when their target resolves.
        PatchOp::InsertLayer { .. } | PatchOp::RemoveLayer { .. } => false,
        PatchOp::ReorderLayer { index, .. } => {
            doc.order_index(target) == Some((*index).min(doc.layer_order.len().saturating_sub(1)))
        }
        PatchOp::SetSelection { .. } | PatchOp::SetMeta { .. } => unreachable!(),
    }
}

/// Capture the ops that undo `op` against the current state of `doc`.
///
/// Most ops invert to a single op restoring the prior value; inserting a
/// fresh layer also restores the metadata so id allocation rewinds exactly.
pub fn capture_inverse(doc: &Document, op: &PatchOp) -> Result<Vec<PatchOp>, PatchError> {
    let get = |id: LayerId| doc.layer(id).ok_or(PatchError::NotFound(id));
    let common = |id: LayerId| get(id).map(Layer::common);
    let text = |id: LayerId| match get(id)? {
        Layer::Text(l) => Ok(l),
        other => Err(invalid(
            id,
            &format!("expected a text layer, found {}", other.variant_name()),
        )),
    };
    let shape = |id: LayerId| match get(id)? {
        Layer::Shape(l) => Ok(l),
        other => Err(invalid(
            id,
            &format!("expected a shape layer, found {}", other.variant_name()),
        )),
    };

    let inverse = match op {
        PatchOp::SetName { target, .. } => vec![PatchOp::SetName {
            target: *target,
            name: common(*target)?.name.clone(),
        }],
        PatchOp::SetVisible { target, .. } => vec![PatchOp::SetVisible {
            target: *target,
            visible: common(*target)?.visible,
        }],
        PatchOp::SetLocked { target, .. } => vec![PatchOp::SetLocked {
            target: *target,
            locked: common(*target)?.locked,
        }],
        PatchOp::SetOpacity { target, .. } => vec![PatchOp::SetOpacity {
            target: *target,
            opacity: common(*target)?.opacity,
        }],
        PatchOp::SetBlendMode { target, .. } => vec![PatchOp::SetBlendMode {
            target: *target,
            blend: common(*target)?.blend,
        }],
        PatchOp::SetPosition { target, .. } => vec![PatchOp::SetPosition {
            target: *target,
            position: common(*target)?.transform.position,
        }],
        PatchOp::SetSize { target, .. } => vec![PatchOp::SetSize {
            target: *target,
            size: common(*target)?.transform.size,
        }],
        PatchOp::SetRotation { target, .. } => vec![PatchOp::SetRotation {
            target: *target,
            degrees: common(*target)?.transform.rotation,
        }],
        PatchOp::SetCornerRadii { target, .. } => vec![PatchOp::SetCornerRadii {
            target: *target,
            radii: common(*target)?.corner_radii,
        }],
        PatchOp::SetTags { target, .. } => vec![PatchOp::SetTags {
            target: *target,
            tags: common(*target)?.tags.clone(),
        }],
        PatchOp::SetText { target, .. } => vec![PatchOp::SetText {
            target: *target,
            text: text(*target)?.text.clone(),
        }],
        PatchOp::SetTextStyle { target, .. } => vec![PatchOp::SetTextStyle {
            target: *target,
            style: Box::new(text(*target)?.style.clone()),
        }],
        PatchOp::SetTextColor { target, .. } => vec![PatchOp::SetTextColor {
            target: *target,
            paint: text(*target)?.style.fill.clone(),
        }],
        PatchOp::SetFontSize { target, .. } => vec![PatchOp::SetFontSize {
            target: *target,
            size: text(*target)?.style.font_size,
        }],
        PatchOp::SetFills { target, .. } => vec![PatchOp::SetFills {
            target: *target,
            fills: shape(*target)?.fills.clone(),
        }],
        PatchOp::SetFill { target, index, .. } => {
            let l = shape(*target)?;
            let len = l.fills.len();
            let prior = l
                .fills
                .get(*index)
                .ok_or_else(|| invalid(*target, &format!("fill index {index} >= {len}")))?;
            vec![PatchOp::SetFill {
                target: *target,
                index: *index,
                paint: prior.clone(),
            }]
        }
        PatchOp::SetStrokes { target, .. } => vec![PatchOp::SetStrokes {
            target: *target,
            strokes: shape(*target)?.strokes.clone(),
        }],
        PatchOp::SetPathFill { target, .. } => match get(*target)? {
            Layer::Path(l) => vec![PatchOp::SetPathFill {
                target: *target,
                paint: l.fill.clone(),
            }],
            other => {
                return Err(invalid(
                    *target,
                    &format!("expected a path layer, found {}", other.variant_name()),
                ));
            }
        },
        PatchOp::SetImageFilters { target, .. } => match get(*target)? {
            Layer::Image(l) => vec![PatchOp::SetImageFilters {
                target: *target,
                filters: l.filters,
            }],
            other => {
                return Err(invalid(
                    *target,
                    &format!("expected an image layer, found {}", other.variant_name()),
                ));
            }
        },
        PatchOp::SetIconColor { target, .. } => match get(*target)? {
            Layer::Icon(l) => vec![PatchOp::SetIconColor {
                target: *target,
                color: l.color,
            }],
            other => {
                return Err(invalid(
                    *target,
                    &format!("expected an icon layer, found {}", other.variant_name()),
                ));
            }
        },
        PatchOp::InsertLayer { layer, .. } => {
            let id = layer.id();
            if doc.layers.contains_key(&id) {
                return Err(PatchError::DuplicateId(id));
            }
            vec![
                PatchOp::RemoveLayer { target: id },
                PatchOp::SetMeta {
                    meta: Box::new(doc.meta.clone()),
                },
            ]
        }
        PatchOp::RemoveLayer { target } => {
            if *target == doc.root_frame {
                return Err(PatchError::RootFrame(*target));
            }
            let layer = get(*target)?;
            let index = doc
                .order_index(*target)
                .ok_or(PatchError::NotFound(*target))?;
            let mut ops = vec![PatchOp::InsertLayer {
                layer: Box::new(layer.clone()),
                index,
            }];
            if doc.selection.contains(target) {
                ops.push(PatchOp::SetSelection {
                    ids: doc.selection.clone(),
                });
            }
            ops
        }
        PatchOp::ReorderLayer { target, .. } => vec![PatchOp::ReorderLayer {
            target: *target,
            index: doc
                .order_index(*target)
                .ok_or(PatchError::NotFound(*target))?,
        }],
        PatchOp::SetSelection { .. } => vec![PatchOp::SetSelection {
            ids: doc.selection.clone(),
        }],
        PatchOp::SetMeta { .. } => vec![PatchOp::SetMeta {
            meta: Box::new(doc.meta.clone()),
        }],
    };
    Ok(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprint_schema::{LayerCommon, TextLayer, Transform2D};

    fn doc_with_text() -> (Document, LayerId) {
        let doc = Document::new("d", 200.0, 100.0);
        let layer = Layer::Text(TextLayer {
            common: LayerCommon::new(LayerId(0), "t", Transform2D::default()),
            text: "Alice".into(),
            style: TextStyle::new("Inter", 12.0, Color::BLACK),
            paragraphs: Vec::new(),
        });
        let (doc, id) = doc.add_layer(layer);
        (doc, id)
    }

    #[test]
    fn set_text_applies_and_inverts() {
        let (mut doc, id) = doc_with_text();
        let op = PatchOp::SetText {
            target: id,
            text: "Bob".into(),
        };
        let inverse = capture_inverse(&doc, &op).unwrap();
        apply_op(&mut doc, &op).unwrap();
        assert!(matches!(doc.layer(id), Some(Layer::Text(l)) if l.text == "Bob"));
        for inv in &inverse {
            apply_op(&mut doc, inv).unwrap();
        }
        assert!(matches!(doc.layer(id), Some(Layer::Text(l)) if l.text == "Alice"));
    }

    #[test]
    fn text_op_on_shape_is_invalid_field() {
        let (mut doc, _) = doc_with_text();
        let root = doc.root_frame;
        let op = PatchOp::SetText {
            target: root,
            text: "x".into(),
        };
        let before = doc.clone();
        let err = apply_op(&mut doc, &op).unwrap_err();
        assert!(matches!(err, PatchError::InvalidField { .. }));
        assert_eq!(doc, before, "failed op must not modify the document");
    }

    #[test]
    fn missing_target_is_not_found_and_leaves_doc_unchanged() {
        let (mut doc, _) = doc_with_text();
        let before = doc.clone();
        let op = PatchOp::SetOpacity {
            target: LayerId(999),
            opacity: 0.5,
        };
        assert_eq!(
            apply_op(&mut doc, &op).unwrap_err(),
            PatchError::NotFound(LayerId(999))
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn remove_root_frame_is_rejected() {
        let (mut doc, _) = doc_with_text();
        let root = doc.root_frame;
        let op = PatchOp::RemoveLayer { target: root };
        assert_eq!(
            apply_op(&mut doc, &op).unwrap_err(),
            PatchError::RootFrame(root)
        );
    }

    #[test]
    fn insert_then_inverse_restores_next_id() {
        let (doc, _) = doc_with_text();
        let fresh = LayerId(doc.meta.next_id);
        let layer = Layer::Text(TextLayer {
            common: LayerCommon::new(fresh, "new", Transform2D::default()),
            text: "hi".into(),
            style: TextStyle::new("Inter", 10.0, Color::BLACK),
            paragraphs: Vec::new(),
        });
        let op = PatchOp::InsertLayer {
            layer: Box::new(layer),
            index: usize::MAX,
        };
        let inverse = capture_inverse(&doc, &op).unwrap();

        let mut next = doc.clone();
        apply_op(&mut next, &op).unwrap();
        assert_eq!(next.meta.next_id, fresh.0 + 1);
        for inv in &inverse {
            apply_op(&mut next, inv).unwrap();
        }
        assert_eq!(next, doc);
    }

    #[test]
    fn noop_detection() {
        let (doc, id) = doc_with_text();
        assert!(is_noop(
            &doc,
            &PatchOp::SetText {
                target: id,
                text: "Alice".into()
            }
        ));
        assert!(!is_noop(
            &doc,
            &PatchOp::SetText {
                target: id,
                text: "Bob".into()
            }
        ));
    }

    #[test]
    fn patch_op_serde_round_trip() {
        let op = PatchOp::SetTextColor {
            target: LayerId(3),
            paint: Paint::solid(Color::from_hex("#b45309").unwrap()),
        };
        let json = serde_json::to_string(&op).unwrap();
        let back: PatchOp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
        assert_eq!(op.field_kind(), FieldKind::TextColor);
    }
}
