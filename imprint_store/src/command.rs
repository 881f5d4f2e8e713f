// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Undoable commands built from batches of patch ops.
//!
//! A [`Command`] pairs the ops to apply with the ops that undo them, captured
//! at build time against the document the command will run on. Applying the
//! forward list and then the inverse list yields a document equal to the
//! starting one.

use imprint_schema::{Document, LayerId};

use crate::patch::{self, FieldKind, PatchError, PatchOp};

/// Layer ids locked for the duration of an editing session, on top of each
/// layer's own `locked` flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LockSet(Vec<LayerId>);

impl LockSet {
    /// An empty lock set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a layer id. Locking twice is fine.
    pub fn lock(&mut self, id: LayerId) {
        if !self.0.contains(&id) {
            self.0.push(id);
        }
    }

    /// Unlock a layer id. Unlocking an unlocked id is fine.
    pub fn unlock(&mut self, id: LayerId) {
        self.0.retain(|l| *l != id);
    }

    /// Returns true if the id is in the set.
    pub fn contains(&self, id: LayerId) -> bool {
        self.0.contains(&id)
    }
}

impl FromIterator<LayerId> for LockSet {
    fn from_iter<T: IntoIterator<Item = LayerId>>(iter: T) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.lock(id);
        }
        set
    }
}

/// Why a command could not be built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// An op targets a locked layer.
    #[error("layer {0} is locked")]
    Locked(LayerId),
    /// An op would remove the root frame.
    #[error("layer {0} is the root frame and cannot be removed")]
    RootFrame(LayerId),
    /// An inserted layer's id collides with an existing layer.
    #[error("layer {0} already exists")]
    DuplicateId(LayerId),
}

/// An op that was dropped while building a command, and why.
#[derive(Clone, Debug, PartialEq)]
pub enum SkippedOp {
    /// The target layer does not exist; the op is a no-op.
    NotFound(PatchOp),
    /// The field does not exist on the target's variant.
    InvalidField(PatchOp),
    /// Applying the op would change nothing.
    Unchanged(PatchOp),
}

/// A labelled, reversible batch of patch ops.
///
/// Commands are only constructed through [`Command::build`], which validates
/// every op against the current document and captures exact inverses, so a
/// held `Command` is always applicable to the document it was built for.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    /// Human-readable label, shown in history UIs.
    pub label: String,
    forward: Vec<PatchOp>,
    inverse: Vec<PatchOp>,
}

impl Command {
    /// Validate `ops` against `doc` and build a reversible command.
    ///
    /// Enforcement, in order per op:
    /// - a target in `locks` or with its `locked` flag set fails the whole
    ///   batch with [`CommandError::Locked`]; the only exception is an
    ///   unlock op on a flag-locked layer, which is how layers get unlocked
    ///   at all (the external `locks` set has no such escape hatch);
    /// - removing the root frame fails the batch;
    /// - an op whose target is missing, whose field does not fit the target's
    ///   variant, or whose value equals the current one is dropped and
    ///   reported in the skip list.
    ///
    /// Inverses are captured against a scratch copy that replays the
    /// preceding ops, so batches where a later op depends on an earlier one
    /// still undo exactly. Returns `Ok(None)` when every op was dropped.
    pub fn build(
        doc: &Document,
        label: impl Into<String>,
        ops: Vec<PatchOp>,
        locks: &LockSet,
    ) -> Result<(Option<Self>, Vec<SkippedOp>), CommandError> {
        let mut scratch = doc.clone();
        let mut forward = Vec::with_capacity(ops.len());
        let mut inverse = Vec::new();
        let mut skipped = Vec::new();

        for op in ops {
            if let Some(target) = op.target() {
                if locks.contains(target) {
                    return Err(CommandError::Locked(target));
                }
                let flag_locked = scratch.layer(target).is_some_and(|l| l.common().locked);
                let is_unlock = matches!(op, PatchOp::SetLocked { locked: false, .. });
                if flag_locked && !is_unlock {
                    return Err(CommandError::Locked(target));
                }
            }

            if patch::is_noop(&scratch, &op) {
                skipped.push(SkippedOp::Unchanged(op));
                continue;
            }

            let inv = match patch::capture_inverse(&scratch, &op) {
                Ok(inv) => inv,
                Err(PatchError::NotFound(id)) => {
                    log::warn!("dropping op for missing layer {id}: {op:?}");
                    skipped.push(SkippedOp::NotFound(op));
                    continue;
                }
                Err(PatchError::InvalidField { target, detail }) => {
                    log::warn!("dropping op with invalid field for {target}: {detail}");
                    skipped.push(SkippedOp::InvalidField(op));
                    continue;
                }
                Err(PatchError::RootFrame(id)) => return Err(CommandError::RootFrame(id)),
                Err(PatchError::DuplicateId(id)) => return Err(CommandError::DuplicateId(id)),
            };

            // capture_inverse validated the op against `scratch`, so applying
            // it cannot fail.
            match patch::apply_op(&mut scratch, &op) {
                Ok(()) => {}
                Err(err) => {
                    log::error!("validated op failed to apply: {err}");
                    skipped.push(SkippedOp::InvalidField(op));
                    continue;
                }
            }
            forward.push(op);
            // Blocks are reversed as a whole below; pre-reversing here keeps
            // the in-block order intact after that pass.
            inverse.extend(inv.into_iter().rev());
        }

        if forward.is_empty() {
            return Ok((None, skipped));
        }
        inverse.reverse();
        Ok((
            Some(Self {
                label: label.into(),
                forward,
                inverse,
            }),
            skipped,
        ))
    }

    /// The ops this command applies, in order.
    pub fn forward_ops(&self) -> &[PatchOp] {
        &self.forward
    }

    /// The ops that undo this command, in order.
    pub fn inverse_ops(&self) -> &[PatchOp] {
        &self.inverse
    }

    /// The number of forward ops.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Always false; empty batches build to `None` instead.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// True if any forward op mutates one of the given field kinds.
    pub fn touches(&self, kinds: &[FieldKind]) -> bool {
        self.forward.iter().any(|op| kinds.contains(&op.field_kind()))
    }

    /// Apply the forward ops to a document, producing the next version.
    pub(crate) fn apply_forward(&self, doc: &Document) -> Result<Document, PatchError> {
        let mut next = doc.clone();
        for op in &self.forward {
            patch::apply_op(&mut next, op)?;
        }
        Ok(next)
    }

    /// Apply the inverse ops to a document, producing the prior version.
    pub(crate) fn apply_inverse(&self, doc: &Document) -> Result<Document, PatchError> {
        let mut prior = doc.clone();
        for op in &self.inverse {
            patch::apply_op(&mut prior, op)?;
        }
        Ok(prior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprint_schema::{
        Color, Layer, LayerCommon, Paint, TextLayer, TextStyle, Transform2D, Vec2F,
    };

    fn doc_with_text(text: &str) -> (Document, LayerId) {
        let doc = Document::new("d", 200.0, 100.0);
        let layer = Layer::Text(TextLayer {
            common: LayerCommon::new(LayerId(0), "headline", Transform2D::default()),
            text: text.into(),
            style: TextStyle::new("Inter", 12.0, Color::BLACK),
            paragraphs: Vec::new(),
        });
        let (doc, id) = doc.add_layer(layer);
        (doc, id)
    }

    #[test]
    fn build_then_undo_restores_exactly() {
        let (doc, id) = doc_with_text("Alice");
        let ops = vec![
            PatchOp::SetText {
                target: id,
                text: "Bob".into(),
            },
            PatchOp::SetPosition {
                target: id,
                position: Vec2F::new(10.0, 20.0),
            },
        ];
        let (cmd, skipped) = Command::build(&doc, "edit", ops, &LockSet::new()).unwrap();
        let cmd = cmd.unwrap();
        assert!(skipped.is_empty());

        let next = cmd.apply_forward(&doc).unwrap();
        assert_ne!(next, doc);
        let back = cmd.apply_inverse(&next).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn locked_layer_rejects_whole_batch() {
        let (doc, id) = doc_with_text("Alice");
        let doc = doc
            .update_layer(id, |l| l.common_mut().locked = true)
            .unwrap();
        let ops = vec![PatchOp::SetText {
            target: id,
            text: "Bob".into(),
        }];
        let err = Command::build(&doc, "edit", ops, &LockSet::new()).unwrap_err();
        assert_eq!(err, CommandError::Locked(id));
    }

    #[test]
    fn unlock_op_is_permitted_on_flag_locked_layer() {
        let (doc, id) = doc_with_text("Alice");
        let doc = doc
            .update_layer(id, |l| l.common_mut().locked = true)
            .unwrap();
        let ops = vec![PatchOp::SetLocked {
            target: id,
            locked: false,
        }];
        let (cmd, _) = Command::build(&doc, "unlock", ops, &LockSet::new()).unwrap();
        let next = cmd.unwrap().apply_forward(&doc).unwrap();
        assert!(!next.layer(id).unwrap().common().locked);
    }

    #[test]
    fn lock_set_rejects_even_unlock_ops() {
        let (doc, id) = doc_with_text("Alice");
        let locks: LockSet = [id].into_iter().collect();
        let ops = vec![PatchOp::SetLocked {
            target: id,
            locked: false,
        }];
        let err = Command::build(&doc, "unlock", ops, &locks).unwrap_err();
        assert_eq!(err, CommandError::Locked(id));
    }

    #[test]
    fn missing_target_is_skipped_not_fatal() {
        let (doc, id) = doc_with_text("Alice");
        let ops = vec![
            PatchOp::SetText {
                target: LayerId(999),
                text: "ghost".into(),
            },
            PatchOp::SetText {
                target: id,
                text: "Bob".into(),
            },
        ];
        let (cmd, skipped) = Command::build(&doc, "edit", ops, &LockSet::new()).unwrap();
        let cmd = cmd.unwrap();
        assert_eq!(cmd.len(), 1);
        assert!(matches!(skipped.as_slice(), [SkippedOp::NotFound(_)]));
    }

    #[test]
    fn value_equal_batch_builds_to_none() {
        let (doc, id) = doc_with_text("Alice");
        let ops = vec![PatchOp::SetText {
            target: id,
            text: "Alice".into(),
        }];
        let (cmd, skipped) = Command::build(&doc, "edit", ops, &LockSet::new()).unwrap();
        assert!(cmd.is_none());
        assert!(matches!(skipped.as_slice(), [SkippedOp::Unchanged(_)]));
    }

    #[test]
    fn dependent_ops_undo_in_order() {
        let (doc, id) = doc_with_text("Alice");
        // Remove, then re-select something else; the inverse must restore in
        // reverse order for the selection op to find the layer again.
        let doc = doc.with_selection(vec![id]);
        let ops = vec![
            PatchOp::RemoveLayer { target: id },
            PatchOp::SetSelection { ids: Vec::new() },
        ];
        let (cmd, _) = Command::build(&doc, "remove", ops, &LockSet::new()).unwrap();
        let cmd = cmd.unwrap();
        let next = cmd.apply_forward(&doc).unwrap();
        assert!(next.layer(id).is_none());
        let back = cmd.apply_inverse(&next).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn structure_command_reports_field_kind() {
        let (doc, _id) = doc_with_text("Alice");
        let ops = vec![PatchOp::SetFills {
            target: doc.root_frame,
            fills: vec![Paint::solid(Color::from_hex("#fde68a").unwrap())],
        }];
        let (cmd, _) = Command::build(&doc, "recolor", ops, &LockSet::new()).unwrap();
        let cmd = cmd.unwrap();
        assert!(cmd.touches(&[FieldKind::FillPaint]));
        assert!(!cmd.touches(&[FieldKind::Structure]));
    }
}
