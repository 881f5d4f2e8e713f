// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document store: current document value, bounded undo/redo history,
//! and change subscribers.

use std::collections::VecDeque;
use std::fmt;

use imprint_schema::Document;

use crate::command::{Command, CommandError, LockSet, SkippedOp};
use crate::patch::PatchOp;

/// Default cap on the undo stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Handle returned by [`DocumentStore::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The result of executing a command batch.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplyOutcome {
    /// How many ops were applied. Zero means the document is unchanged and
    /// no history entry was pushed.
    pub applied: usize,
    /// Ops that were dropped during validation, with reasons.
    pub skipped: Vec<SkippedOp>,
}

/// Owns the current document and its editing history.
///
/// Documents are immutable values; every successful command replaces the
/// held document with a new version and retains the command on the undo
/// stack. The stack is bounded: past the limit, the oldest entry is evicted
/// and its change becomes permanent.
pub struct DocumentStore {
    doc: Document,
    locks: LockSet,
    undo: VecDeque<Command>,
    redo: Vec<Command>,
    history_limit: usize,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&Document)>)>,
    next_subscription: u64,
}

impl DocumentStore {
    /// Create a store around a document with the default history limit.
    pub fn new(doc: Document) -> Self {
        Self::with_history_limit(doc, DEFAULT_HISTORY_LIMIT)
    }

    /// Create a store with an explicit history limit. A limit of zero keeps
    /// no history at all; every command is immediately permanent.
    pub fn with_history_limit(doc: Document, history_limit: usize) -> Self {
        Self {
            doc,
            locks: LockSet::new(),
            undo: VecDeque::new(),
            redo: Vec::new(),
            history_limit,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The current document value.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Session-level locks enforced on top of per-layer `locked` flags.
    pub fn locks(&self) -> &LockSet {
        &self.locks
    }

    /// Mutable access to the session lock set.
    pub fn locks_mut(&mut self) -> &mut LockSet {
        &mut self.locks
    }

    /// Validate and run a batch of ops as one undoable command.
    ///
    /// Dropped ops are reported in the outcome; a batch where every op was
    /// dropped leaves the document and history untouched. A successful batch
    /// clears the redo stack.
    pub fn execute(
        &mut self,
        label: impl Into<String>,
        ops: Vec<PatchOp>,
    ) -> Result<ApplyOutcome, CommandError> {
        let (cmd, skipped) = Command::build(&self.doc, label, ops, &self.locks)?;
        let Some(cmd) = cmd else {
            log::debug!("command dropped entirely ({} ops skipped)", skipped.len());
            return Ok(ApplyOutcome {
                applied: 0,
                skipped,
            });
        };
        self.apply_command(cmd, skipped)
    }

    /// Run an already-built command, e.g. one produced by a revision session.
    ///
    /// The command must have been built against the current document.
    pub fn execute_command(&mut self, cmd: Command) -> Result<ApplyOutcome, CommandError> {
        self.apply_command(cmd, Vec::new())
    }

    fn apply_command(
        &mut self,
        cmd: Command,
        skipped: Vec<SkippedOp>,
    ) -> Result<ApplyOutcome, CommandError> {
        let applied = cmd.len();
        match cmd.apply_forward(&self.doc) {
            Ok(next) => self.doc = next,
            Err(err) => {
                // Commands are validated at build time against the document
                // they run on, so this indicates a command built for a
                // different document version.
                log::error!("command '{}' failed to apply: {err}", cmd.label);
                return Ok(ApplyOutcome {
                    applied: 0,
                    skipped,
                });
            }
        }
        self.redo.clear();
        if self.history_limit > 0 {
            if self.undo.len() == self.history_limit {
                self.undo.pop_front();
            }
            self.undo.push_back(cmd);
        }
        self.notify();
        Ok(ApplyOutcome { applied, skipped })
    }

    /// Undo the most recent command. Returns its label, or `None` when the
    /// undo stack is empty.
    pub fn undo(&mut self) -> Option<String> {
        let cmd = self.undo.pop_back()?;
        match cmd.apply_inverse(&self.doc) {
            Ok(prior) => {
                self.doc = prior;
                let label = cmd.label.clone();
                self.redo.push(cmd);
                self.notify();
                Some(label)
            }
            Err(err) => {
                log::error!("undo of '{}' failed: {err}", cmd.label);
                self.undo.push_back(cmd);
                None
            }
        }
    }

    /// Redo the most recently undone command. Returns its label, or `None`
    /// when the redo stack is empty.
    pub fn redo(&mut self) -> Option<String> {
        let cmd = self.redo.pop()?;
        match cmd.apply_forward(&self.doc) {
            Ok(next) => {
                self.doc = next;
                let label = cmd.label.clone();
                self.undo.push_back(cmd);
                self.notify();
                Some(label)
            }
            Err(err) => {
                log::error!("redo of '{}' failed: {err}", cmd.label);
                self.redo.push(cmd);
                None
            }
        }
    }

    /// Whether there is anything to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether there is anything to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Labels of the undo stack, oldest first.
    pub fn undo_labels(&self) -> impl Iterator<Item = &str> {
        self.undo.iter().map(|c| c.label.as_str())
    }

    /// Register a callback invoked after every document change.
    pub fn subscribe(&mut self, f: impl FnMut(&Document) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    fn notify(&mut self) {
        for (_, f) in &mut self.subscribers {
            f(&self.doc);
        }
    }
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("doc", &self.doc.id)
            .field("undo", &self.undo.len())
            .field("redo", &self.redo.len())
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprint_schema::{
        Color, Layer, LayerCommon, LayerId, TextLayer, TextStyle, Transform2D,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_with_text(text: &str) -> (DocumentStore, LayerId) {
        let doc = Document::new("d", 200.0, 100.0);
        let layer = Layer::Text(TextLayer {
            common: LayerCommon::new(LayerId(0), "headline", Transform2D::default()),
            text: text.into(),
            style: TextStyle::new("Inter", 12.0, Color::BLACK),
            paragraphs: Vec::new(),
        });
        let (doc, id) = doc.add_layer(layer);
        (DocumentStore::new(doc), id)
    }

    fn set_text(id: LayerId, text: &str) -> Vec<PatchOp> {
        vec![PatchOp::SetText {
            target: id,
            text: text.into(),
        }]
    }

    #[test]
    fn execute_undo_redo_cycle() {
        let (mut store, id) = store_with_text("Alice");
        let baseline = store.document().clone();

        let outcome = store.execute("rename", set_text(id, "Bob")).unwrap();
        assert_eq!(outcome.applied, 1);
        assert!(store.can_undo());

        assert_eq!(store.undo().as_deref(), Some("rename"));
        assert_eq!(*store.document(), baseline);
        assert!(store.can_redo());

        assert_eq!(store.redo().as_deref(), Some("rename"));
        assert!(matches!(
            store.document().layer(id),
            Some(Layer::Text(l)) if l.text == "Bob"
        ));
    }

    #[test]
    fn all_skipped_batch_pushes_no_history() {
        let (mut store, id) = store_with_text("Alice");
        let outcome = store.execute("noop", set_text(id, "Alice")).unwrap();
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(!store.can_undo());
    }

    #[test]
    fn successful_execute_clears_redo() {
        let (mut store, id) = store_with_text("Alice");
        store.execute("a", set_text(id, "Bob")).unwrap();
        store.undo();
        assert!(store.can_redo());
        store.execute("b", set_text(id, "Carol")).unwrap();
        assert!(!store.can_redo());
    }

    #[test]
    fn history_evicts_oldest_past_limit() {
        let (doc, id) = {
            let (s, id) = store_with_text("v0");
            (s.document().clone(), id)
        };
        let mut store = DocumentStore::with_history_limit(doc, 3);
        for i in 1..=5 {
            store.execute(format!("e{i}"), set_text(id, &format!("v{i}"))).unwrap();
        }
        let labels: Vec<&str> = store.undo_labels().collect();
        assert_eq!(labels, ["e3", "e4", "e5"]);

        // Only the retained entries can be unwound.
        assert!(store.undo().is_some());
        assert!(store.undo().is_some());
        assert!(store.undo().is_some());
        assert!(store.undo().is_none());
        assert!(matches!(
            store.document().layer(id),
            Some(Layer::Text(l)) if l.text == "v2"
        ));
    }

    #[test]
    fn session_locks_block_execution() {
        let (mut store, id) = store_with_text("Alice");
        store.locks_mut().lock(id);
        let err = store.execute("edit", set_text(id, "Bob")).unwrap_err();
        assert_eq!(err, CommandError::Locked(id));
        store.locks_mut().unlock(id);
        assert!(store.execute("edit", set_text(id, "Bob")).is_ok());
    }

    #[test]
    fn subscribers_observe_every_change() {
        let (mut store, id) = store_with_text("Alice");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |doc| {
            if let Some(Layer::Text(l)) = doc.layer(id) {
                sink.borrow_mut().push(l.text.clone());
            }
        });

        store.execute("a", set_text(id, "Bob")).unwrap();
        store.undo();
        store.redo();
        assert_eq!(*seen.borrow(), ["Bob", "Alice", "Bob"]);

        store.unsubscribe(sub);
        store.execute("b", set_text(id, "Carol")).unwrap();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn zero_limit_keeps_no_history() {
        let (doc, id) = {
            let (s, id) = store_with_text("Alice");
            (s.document().clone(), id)
        };
        let mut store = DocumentStore::with_history_limit(doc, 0);
        store.execute("edit", set_text(id, "Bob")).unwrap();
        assert!(!store.can_undo());
    }
}
