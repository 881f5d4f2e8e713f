// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document value: layer storage, render order, selection, and metadata.
//!
//! A [`Document`] is an immutable value. Every edit operation returns a new
//! document; unchanged layers are shared between the old and new values via
//! [`Arc`], so edits cost only the layers they touch plus the id tables.

use std::sync::Arc;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{Color, Layer, LayerCommon, LayerId, Paint, ShapeLayer, ShapeType, Transform2D, Vec2F};

/// Tag carried by the root frame layer.
pub const FRAME_TAG: &str = "frame";

/// Document-wide metadata and settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    /// Human-readable title.
    pub title: String,
    /// Document units per millimeter, used to place print guides.
    pub units_per_mm: f64,
    /// Bleed inset in millimeters.
    pub bleed_mm: f64,
    /// Safe-print inset in millimeters.
    pub safe_mm: f64,
    /// Next layer id to allocate. Monotonic; never reused.
    pub next_id: u64,
}

impl Default for DocMeta {
    fn default() -> Self {
        Self {
            title: String::new(),
            // 4 units/mm ≈ 102 dpi working resolution; export scales from here.
            units_per_mm: 4.0,
            bleed_mm: 3.0,
            safe_mm: 5.0,
            next_id: 1,
        }
    }
}

/// Structural problems detected by [`Document::validate`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// An id in `layer_order` has no entry in the layer table.
    #[error("layer {0} is ordered but not stored")]
    OrphanOrder(LayerId),
    /// An id appears in `layer_order` more than once.
    #[error("layer {0} appears in the order more than once")]
    DuplicateOrder(LayerId),
    /// A stored layer does not appear in `layer_order`.
    #[error("layer {0} is stored but not ordered")]
    UnorderedLayer(LayerId),
    /// A stored layer's embedded id disagrees with its table key.
    #[error("layer keyed {key} carries id {carried}")]
    IdMismatch {
        /// Key in the layer table.
        key: LayerId,
        /// Id embedded in the layer value.
        carried: LayerId,
    },
    /// The root frame id is missing from the layer table.
    #[error("root frame {0} is missing")]
    RootMissing(LayerId),
    /// `meta.next_id` would re-allocate an id a stored layer already holds.
    #[error("next_id {next_id} does not clear the highest layer id {max_id}")]
    StaleNextId {
        /// The allocation counter carried by the document.
        next_id: u64,
        /// The highest id currently stored.
        max_id: u64,
    },
}

/// Error for operations that target a layer id absent from the document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("layer {0} not found")]
pub struct LayerNotFound(pub LayerId);

/// Error returned by [`Document::remove_layer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RemoveError {
    /// The target id is absent.
    #[error(transparent)]
    NotFound(#[from] LayerNotFound),
    /// The root frame can never be removed.
    #[error("layer {0} is the root frame and cannot be removed")]
    RootFrame(LayerId),
}

/// Error returned by [`Document::load_json`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The payload is not valid JSON for a document.
    #[error("document payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload decoded but violates a structural invariant.
    #[error("document payload is structurally invalid: {0}")]
    Invalid(#[from] DocumentError),
}

/// A complete, immutable design document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable document identity.
    pub id: String,
    /// Id of the page-bounds layer. Always present, never removable.
    pub root_frame: LayerId,
    /// Render order, bottom to top. Every id is a key in `layers`.
    pub layer_order: Vec<LayerId>,
    /// Layer storage. Values are shared across document versions.
    pub layers: HashMap<LayerId, Arc<Layer>>,
    /// Currently selected layer ids, in selection order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<LayerId>,
    /// Document-wide metadata.
    pub meta: DocMeta,
}

impl Document {
    /// Create an empty document with a white root frame of the given size.
    pub fn new(id: impl Into<String>, width: f32, height: f32) -> Self {
        let mut meta = DocMeta::default();
        let root_id = LayerId(meta.next_id);
        meta.next_id += 1;

        let mut common = LayerCommon::new(
            root_id,
            "Frame",
            Transform2D::new(Vec2F::ZERO, Vec2F::new(width, height)),
        );
        common.tags.push(FRAME_TAG.into());
        let frame = Layer::Shape(ShapeLayer {
            common,
            shape: ShapeType::Rectangle,
            fills: vec![Paint::solid(Color::WHITE)],
            strokes: Vec::new(),
        });

        let mut layers = HashMap::new();
        layers.insert(root_id, Arc::new(frame));
        Self {
            id: id.into(),
            root_frame: root_id,
            layer_order: vec![root_id],
            layers,
            selection: Vec::new(),
            meta,
        }
    }

    /// The page size in document units, taken from the root frame.
    pub fn page_size(&self) -> Vec2F {
        self.layers
            .get(&self.root_frame)
            .map(|l| l.common().transform.size)
            .unwrap_or(Vec2F::new(0.0, 0.0))
    }

    /// Look up a layer by id.
    #[inline]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id).map(Arc::as_ref)
    }

    /// Iterate layers bottom-to-top in render order.
    pub fn layers_ordered(&self) -> impl Iterator<Item = &Layer> {
        self.layer_order.iter().filter_map(|id| self.layer(*id))
    }

    /// Ids of layers carrying the given semantic tag, in render order.
    pub fn layers_tagged(&self, tag: &str) -> Vec<LayerId> {
        self.layers_ordered()
            .filter(|l| l.common().has_tag(tag))
            .map(Layer::id)
            .collect()
    }

    /// Add a layer on top of the stack, allocating a fresh id for it.
    ///
    /// The id embedded in `layer` is replaced; callers use the returned id.
    pub fn add_layer(&self, mut layer: Layer) -> (Self, LayerId) {
        let mut next = self.clone();
        let id = LayerId(next.meta.next_id);
        next.meta.next_id += 1;
        layer.common_mut().id = id;
        next.layers.insert(id, Arc::new(layer));
        next.layer_order.push(id);
        (next, id)
    }

    /// Replace a layer's content through an edit closure.
    ///
    /// Only the touched layer is re-allocated; all other layers remain shared
    /// with `self`. The layer's id is preserved regardless of what the
    /// closure does.
    pub fn update_layer(
        &self,
        id: LayerId,
        edit: impl FnOnce(&mut Layer),
    ) -> Result<Self, LayerNotFound> {
        let current = self.layers.get(&id).ok_or(LayerNotFound(id))?;
        let mut layer = Layer::clone(current);
        edit(&mut layer);
        layer.common_mut().id = id;
        let mut next = self.clone();
        next.layers.insert(id, Arc::new(layer));
        Ok(next)
    }

    /// Remove a layer. The root frame is never removable.
    pub fn remove_layer(&self, id: LayerId) -> Result<Self, RemoveError> {
        if id == self.root_frame {
            return Err(RemoveError::RootFrame(id));
        }
        if !self.layers.contains_key(&id) {
            return Err(LayerNotFound(id).into());
        }
        let mut next = self.clone();
        next.layers.remove(&id);
        next.layer_order.retain(|l| *l != id);
        next.selection.retain(|l| *l != id);
        Ok(next)
    }

    /// Move a layer to a new position in the render order.
    ///
    /// `index` is clamped to the order length.
    pub fn reorder_layer(&self, id: LayerId, index: usize) -> Result<Self, LayerNotFound> {
        if !self.layers.contains_key(&id) {
            return Err(LayerNotFound(id));
        }
        let mut next = self.clone();
        next.layer_order.retain(|l| *l != id);
        let index = index.min(next.layer_order.len());
        next.layer_order.insert(index, id);
        Ok(next)
    }

    /// Current position of a layer in the render order.
    pub fn order_index(&self, id: LayerId) -> Option<usize> {
        self.layer_order.iter().position(|l| *l == id)
    }

    /// Replace the selection, dropping unknown ids and duplicates.
    pub fn with_selection(&self, ids: impl IntoIterator<Item = LayerId>) -> Self {
        let mut next = self.clone();
        next.selection.clear();
        for id in ids {
            if next.layers.contains_key(&id) && !next.selection.contains(&id) {
                next.selection.push(id);
            }
        }
        next
    }

    /// Check the structural invariants: order and storage agree exactly, ids
    /// are self-consistent, the root frame exists, and the id allocator
    /// clears every stored id.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = hashbrown::HashSet::with_capacity(self.layer_order.len());
        for id in &self.layer_order {
            if !seen.insert(*id) {
                return Err(DocumentError::DuplicateOrder(*id));
            }
            if !self.layers.contains_key(id) {
                return Err(DocumentError::OrphanOrder(*id));
            }
        }
        for (key, layer) in &self.layers {
            if layer.id() != *key {
                return Err(DocumentError::IdMismatch {
                    key: *key,
                    carried: layer.id(),
                });
            }
            if !seen.contains(key) {
                return Err(DocumentError::UnorderedLayer(*key));
            }
        }
        if !self.layers.contains_key(&self.root_frame) {
            return Err(DocumentError::RootMissing(self.root_frame));
        }
        // The allocator must stay ahead of every stored id, or the next
        // `add_layer` would alias a live layer.
        if let Some(max_id) = self.layers.keys().map(|id| id.0).max()
            && self.meta.next_id <= max_id
        {
            return Err(DocumentError::StaleNextId {
                next_id: self.meta.next_id,
                max_id,
            });
        }
        Ok(())
    }

    /// Serialize to the JSON interchange form.
    pub fn save_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from the JSON interchange form, re-validating invariants.
    pub fn load_json(payload: &str) -> Result<Self, LoadError> {
        let doc: Self = serde_json::from_str(payload)?;
        doc.validate()?;
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TextLayer, TextStyle};

    fn text(name: &str, content: &str) -> Layer {
        Layer::Text(TextLayer {
            common: LayerCommon::new(
                LayerId(0),
                name,
                Transform2D::new(Vec2F::new(10.0, 10.0), Vec2F::new(120.0, 24.0)),
            ),
            text: content.into(),
            style: TextStyle::new("Inter", 12.0, Color::BLACK),
            paragraphs: Vec::new(),
        })
    }

    #[test]
    fn add_layer_appends_in_insertion_order() {
        let doc = Document::new("d", 300.0, 200.0);
        let (doc, a) = doc.add_layer(text("a", "A"));
        let (doc, b) = doc.add_layer(text("b", "B"));
        let (doc, c) = doc.add_layer(text("c", "C"));
        assert_eq!(doc.layer_order.len(), 4, "root + three added layers");
        assert_eq!(&doc.layer_order[1..], &[a, b, c]);
        doc.validate().unwrap();
    }

    #[test]
    fn ids_are_never_reused() {
        let doc = Document::new("d", 100.0, 100.0);
        let (doc, a) = doc.add_layer(text("a", "A"));
        let doc = doc.remove_layer(a).unwrap();
        let (_, b) = doc.add_layer(text("b", "B"));
        assert_ne!(a, b);
    }

    #[test]
    fn root_frame_is_not_removable() {
        let doc = Document::new("d", 100.0, 100.0);
        let root = doc.root_frame;
        assert_eq!(
            doc.remove_layer(root),
            Err(RemoveError::RootFrame(root))
        );
    }

    #[test]
    fn update_preserves_unrelated_layers_by_reference() {
        let doc = Document::new("d", 100.0, 100.0);
        let (doc, a) = doc.add_layer(text("a", "A"));
        let (doc, b) = doc.add_layer(text("b", "B"));
        let next = doc
            .update_layer(a, |l| l.common_mut().name = "renamed".into())
            .unwrap();
        assert!(Arc::ptr_eq(&doc.layers[&b], &next.layers[&b]));
        assert!(!Arc::ptr_eq(&doc.layers[&a], &next.layers[&a]));
        assert_eq!(next.layer(a).unwrap().common().name, "renamed");
    }

    #[test]
    fn update_missing_layer_is_an_error() {
        let doc = Document::new("d", 100.0, 100.0);
        let missing = LayerId(999);
        assert_eq!(
            doc.update_layer(missing, |_| {}).unwrap_err(),
            LayerNotFound(missing)
        );
    }

    #[test]
    fn selection_drops_unknown_and_duplicate_ids() {
        let doc = Document::new("d", 100.0, 100.0);
        let (doc, a) = doc.add_layer(text("a", "A"));
        let doc = doc.with_selection([a, a, LayerId(999)]);
        assert_eq!(doc.selection, vec![a]);
    }

    #[test]
    fn json_round_trip_preserves_value() {
        let doc = Document::new("d", 300.0, 200.0);
        let (doc, _) = doc.add_layer(text("headline", "Alice"));
        let payload = doc.save_json().unwrap();
        let back = Document::load_json(&payload).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn load_rejects_orphan_order() {
        let doc = Document::new("d", 100.0, 100.0);
        let mut payload: serde_json::Value =
            serde_json::from_str(&doc.save_json().unwrap()).unwrap();
        payload["layer_order"] = serde_json::json!([1, 42]);
        let loaded = Document::load_json(&payload.to_string());
        assert!(
            matches!(loaded, Err(LoadError::Invalid(DocumentError::OrphanOrder(_)))),
            "orphan order id must fail validation"
        );
    }

    #[test]
    fn load_rejects_rewound_id_allocator() {
        let doc = Document::new("d", 100.0, 100.0);
        let (doc, a) = doc.add_layer(text("a", "A"));
        let mut payload: serde_json::Value =
            serde_json::from_str(&doc.save_json().unwrap()).unwrap();
        // A rewound counter would hand the next add_layer an id that
        // aliases layer `a`.
        payload["meta"]["next_id"] = serde_json::json!(a.0);
        let loaded = Document::load_json(&payload.to_string());
        assert!(
            matches!(
                loaded,
                Err(LoadError::Invalid(DocumentError::StaleNextId { .. }))
            ),
            "stale next_id must fail validation"
        );
    }

    #[test]
    fn tag_query_walks_render_order() {
        let doc = Document::new("d", 100.0, 100.0);
        let mut l1 = text("a", "A");
        l1.common_mut().tags.push("name".into());
        let mut l2 = text("b", "B");
        l2.common_mut().tags.push("name".into());
        let (doc, a) = doc.add_layer(l1);
        let (doc, b) = doc.add_layer(l2);
        assert_eq!(doc.layers_tagged("name"), vec![a, b]);
        assert_eq!(doc.layers_tagged(FRAME_TAG), vec![doc.root_frame]);
    }
}
