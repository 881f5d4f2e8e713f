// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The revision engine: validation gate, execution, and staleness control.
//!
//! Everything a generator produces passes the same gate, whether it arrived
//! as a compiled intent or a raw op: the target must exist, the field must
//! fit the target's variant, the field kind must be inside the scope, and
//! the target must not be locked. Each failing op is dropped alone; the
//! survivors run as one undoable command.

use imprint_schema::{Document, LayerId};
use imprint_store::{DocumentStore, FieldKind, LockSet, PatchOp, apply_op};

use crate::{
    CompileError, GenerationError, ParseError, PromptBuilder, RevisionPlan, Scope, TextGenerator,
    compile, parse_response,
};

/// Why one op was dropped by the validation gate.
#[derive(Clone, Debug, PartialEq)]
pub enum RejectionReason {
    /// The target layer does not exist.
    UnknownTarget(LayerId),
    /// The field does not exist on the target's variant.
    InvalidField(String),
    /// The field kind is outside the active scope.
    OutOfScope(FieldKind),
    /// The target is in the lock-list.
    Locked(LayerId),
    /// An intent failed to compile.
    Uncompilable(CompileError),
}

/// One dropped op (or intent), with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct Rejection {
    /// The op that was dropped, when one was produced at all.
    pub op: Option<PatchOp>,
    /// Why it was dropped.
    pub reason: RejectionReason,
}

/// The end state of one revision request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevisionOutcome {
    /// Ops that were applied to the document.
    pub applied: usize,
    /// Ops and intents dropped by compilation or validation.
    pub rejected: Vec<Rejection>,
    /// Why nothing was applied, when that is the case.
    pub reason: Option<String>,
}

impl RevisionOutcome {
    fn nothing(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Run every produced op through the gate.
///
/// Ops are checked in order against a scratch document that accumulates the
/// survivors, so later ops see the effects of earlier ones (an inserted
/// layer can be recolored by the next op).
pub fn validate_ops(
    doc: &Document,
    ops: Vec<PatchOp>,
    scope: Scope,
    locked: &LockSet,
) -> (Vec<PatchOp>, Vec<Rejection>) {
    let mut scratch = doc.clone();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for op in ops {
        let kind = op.field_kind();
        if !scope.permits(kind) {
            log::warn!("revision op rejected: {kind:?} outside scope {}", scope.name());
            rejected.push(Rejection {
                op: Some(op),
                reason: RejectionReason::OutOfScope(kind),
            });
            continue;
        }
        if let Some(target) = op.target() {
            if locked.contains(target) {
                log::warn!("revision op rejected: layer {target} is locked");
                rejected.push(Rejection {
                    op: Some(op),
                    reason: RejectionReason::Locked(target),
                });
                continue;
            }
            if !matches!(op, PatchOp::InsertLayer { .. }) {
                let Some(layer) = scratch.layer(target) else {
                    log::warn!("revision op rejected: layer {target} not found");
                    rejected.push(Rejection {
                        op: Some(op),
                        reason: RejectionReason::UnknownTarget(target),
                    });
                    continue;
                };
                // Flag-locked layers are dropped here so one locked target
                // cannot sink the whole surviving batch at execution time.
                if layer.common().locked && !matches!(op, PatchOp::SetLocked { locked: false, .. })
                {
                    log::warn!("revision op rejected: layer {target} is flag-locked");
                    rejected.push(Rejection {
                        op: Some(op),
                        reason: RejectionReason::Locked(target),
                    });
                    continue;
                }
            }
        }
        // Variant and index checks come from actually applying the op.
        match apply_op(&mut scratch, &op) {
            Ok(()) => accepted.push(op),
            Err(e) => {
                log::warn!("revision op rejected: {e}");
                rejected.push(Rejection {
                    op: Some(op),
                    reason: RejectionReason::InvalidField(e.to_string()),
                });
            }
        }
    }
    (accepted, rejected)
}

/// Compile a plan's intents, append its raw ops, and validate everything.
fn gate_plan(
    doc: &Document,
    plan: RevisionPlan,
    scope: Scope,
    locked: &LockSet,
) -> (Vec<PatchOp>, Vec<Rejection>) {
    let mut ops = Vec::new();
    let mut rejected = Vec::new();
    for intent in &plan.intents {
        match compile(doc, intent) {
            Ok(compiled) => ops.extend(compiled),
            Err(e) => {
                log::warn!("revision intent rejected: {e}");
                rejected.push(Rejection {
                    op: None,
                    reason: RejectionReason::Uncompilable(e),
                });
            }
        }
    }
    ops.extend(plan.ops);
    let (accepted, mut gate_rejected) = validate_ops(doc, ops, scope, locked);
    rejected.append(&mut gate_rejected);
    (accepted, rejected)
}

fn lock_set(store: &DocumentStore, locked: &[LayerId]) -> LockSet {
    let mut locks = store.locks().clone();
    for id in locked {
        locks.lock(*id);
    }
    locks
}

fn apply_plan(
    store: &mut DocumentStore,
    plan: RevisionPlan,
    instruction: &str,
    scope: Scope,
    locked: &[LayerId],
) -> RevisionOutcome {
    let locks = lock_set(store, locked);
    let (accepted, rejected) = gate_plan(store.document(), plan, scope, &locks);
    if accepted.is_empty() {
        return RevisionOutcome {
            rejected,
            ..RevisionOutcome::nothing("every produced change was rejected")
        };
    }
    // Survivors run as one command, undoable exactly like a manual edit.
    match store.execute(format!("Revise: {instruction}"), accepted) {
        Ok(outcome) => RevisionOutcome {
            applied: outcome.applied,
            rejected,
            reason: (outcome.applied == 0)
                .then(|| "every change already matches the document".to_owned()),
        },
        Err(e) => {
            log::warn!("revision command rejected as a whole: {e}");
            RevisionOutcome {
                rejected,
                ..RevisionOutcome::nothing(e.to_string())
            }
        }
    }
}

/// A token identifying one outstanding revision request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevisionToken(u64);

/// Staleness control for overlapping revision requests.
///
/// Tokens are handed out monotonically by [`RevisionSession::begin`]; a
/// response is applied only if its token is still the latest one issued.
/// When requests overlap, the older response is discarded on arrival no
/// matter which one resolves first.
#[derive(Debug, Default)]
pub struct RevisionSession {
    issued: u64,
}

impl RevisionSession {
    /// A session with no outstanding requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the token for a new request, superseding all earlier ones.
    pub fn begin(&mut self) -> RevisionToken {
        self.issued += 1;
        RevisionToken(self.issued)
    }

    /// Whether a response carrying this token would still be applied.
    pub fn is_current(&self, token: RevisionToken) -> bool {
        token.0 == self.issued
    }

    /// Apply a generator response for the request identified by `token`.
    ///
    /// Stale tokens are discarded without touching the document. Unparsable
    /// responses degrade to a no-change outcome with a reason.
    pub fn apply_response(
        &mut self,
        store: &mut DocumentStore,
        token: RevisionToken,
        response: &str,
        instruction: &str,
        scope: Scope,
        locked: &[LayerId],
    ) -> RevisionOutcome {
        if !self.is_current(token) {
            log::info!(
                "discarding stale revision response (token {} < {})",
                token.0,
                self.issued
            );
            return RevisionOutcome::nothing("superseded by a newer revision request");
        }
        let plan = match parse_response(response) {
            Ok(plan) => plan,
            Err(e) => return RevisionOutcome::nothing(e.to_string()),
        };
        apply_plan(store, plan, instruction, scope, locked)
    }
}

/// One full revision round trip: prompt, generate, parse, gate, execute.
///
/// Generation failure and unparsable output both degrade to a no-change
/// outcome; the document is untouched in every failure path.
pub fn run_revision(
    store: &mut DocumentStore,
    generator: &dyn TextGenerator,
    instruction: &str,
    scope: Scope,
    locked: &[LayerId],
) -> RevisionOutcome {
    let request = PromptBuilder::new(store.document(), instruction, scope, locked).build();
    let response = match generator.complete(&request) {
        Ok(text) if text.trim().is_empty() => {
            return RevisionOutcome::nothing(GenerationError::Empty.to_string());
        }
        Ok(text) => text,
        Err(e) => return RevisionOutcome::nothing(e.to_string()),
    };
    let plan = match parse_response(&response) {
        Ok(plan) => plan,
        Err(e @ (ParseError::NoJson | ParseError::Malformed(_) | ParseError::EmptyPlan)) => {
            return RevisionOutcome::nothing(e.to_string());
        }
    };
    apply_plan(store, plan, instruction, scope, locked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprint_schema::{
        Color, Layer, LayerCommon, Paint, TextLayer, TextStyle, Transform2D,
    };

    fn store_with_tagged_text(text: &str) -> (DocumentStore, LayerId) {
        let doc = Document::new("d", 200.0, 100.0);
        let mut common = LayerCommon::new(LayerId(0), "Headline", Transform2D::default());
        common.tags.push("name".into());
        let (doc, id) = doc.add_layer(Layer::Text(TextLayer {
            common,
            text: text.into(),
            style: TextStyle::new("Inter", 12.0, Color::from_hex("#111111").unwrap()),
            paragraphs: Vec::new(),
        }));
        (DocumentStore::new(doc), id)
    }

    fn text_of(doc: &Document, id: LayerId) -> &str {
        match doc.layer(id) {
            Some(Layer::Text(l)) => &l.text,
            _ => panic!("expected a text layer"),
        }
    }

    #[test]
    fn colors_only_scope_recolors_but_never_rewrites() {
        let (mut store, id) = store_with_tagged_text("Alice");
        let generator = |_req: &str| {
            Ok(r##"{"intents": [
                {"target": "tag:name", "action": "setColor", "value": "#b45309"},
                {"target": "tag:name", "action": "setText", "value": "Bob"}
            ]}"##
                .to_owned())
        };
        let outcome = run_revision(
            &mut store,
            &generator,
            "make it warmer",
            Scope::ColorsOnly,
            &[],
        );
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert!(matches!(
            outcome.rejected[0].reason,
            RejectionReason::OutOfScope(FieldKind::Text)
        ));

        let doc = store.document();
        assert_eq!(text_of(doc, id), "Alice", "text survives a color scope");
        let Some(Layer::Text(l)) = doc.layer(id) else {
            unreachable!()
        };
        assert_eq!(
            l.style.fill,
            Paint::solid(Color::from_hex("#b45309").unwrap())
        );
    }

    #[test]
    fn locked_layers_are_never_touched() {
        let (mut store, id) = store_with_tagged_text("Alice");
        let generator = move |_req: &str| {
            Ok(format!(
                r#"{{"ops": [{{"op": "setTextColor", "target": {}, "paint": {{"type": "solid", "color": {{"r": 1.0, "g": 0.0, "b": 0.0, "a": 1.0}}}}}}]}}"#,
                id.0
            ))
        };
        let before = store.document().clone();
        let outcome = run_revision(&mut store, &generator, "recolor", Scope::ColorsOnly, &[id]);
        assert_eq!(outcome.applied, 0);
        assert!(matches!(
            outcome.rejected[0].reason,
            RejectionReason::Locked(l) if l == id
        ));
        assert_eq!(*store.document(), before);
    }

    #[test]
    fn generation_failure_degrades_to_no_changes() {
        let (mut store, _) = store_with_tagged_text("Alice");
        let generator =
            |_req: &str| Err(GenerationError::Backend("connection reset".into()));
        let before = store.document().clone();
        let outcome = run_revision(&mut store, &generator, "anything", Scope::FullRedesign, &[]);
        assert_eq!(outcome.applied, 0);
        assert!(outcome.reason.is_some());
        assert_eq!(*store.document(), before);
        assert!(!store.can_undo(), "no history entry for a failed revision");
    }

    #[test]
    fn unparsable_response_degrades_to_no_changes() {
        let (mut store, _) = store_with_tagged_text("Alice");
        let generator = |_req: &str| Ok("I would lighten the palette a touch.".to_owned());
        let outcome = run_revision(&mut store, &generator, "lighten", Scope::ColorsOnly, &[]);
        assert_eq!(outcome.applied, 0);
        assert!(outcome.reason.is_some());
    }

    #[test]
    fn already_current_values_leave_no_history() {
        let (mut store, id) = store_with_tagged_text("Alice");
        let generator = move |_req: &str| {
            Ok(format!(
                r#"{{"intents": [{{"target": {}, "action": "setText", "value": "Alice"}}]}}"#,
                id.0
            ))
        };
        let outcome = run_revision(&mut store, &generator, "keep", Scope::TextOnly, &[]);
        assert_eq!(outcome.applied, 0);
        assert!(!store.can_undo(), "idempotent revision records nothing");
    }

    #[test]
    fn a_revision_is_undoable_like_a_manual_edit() {
        let (mut store, id) = store_with_tagged_text("Alice");
        let generator = move |_req: &str| {
            Ok(format!(
                r#"{{"intents": [{{"target": {}, "action": "setText", "value": "Countess"}}]}}"#,
                id.0
            ))
        };
        let before = store.document().clone();
        let outcome = run_revision(&mut store, &generator, "retitle", Scope::TextOnly, &[]);
        assert_eq!(outcome.applied, 1);
        assert_eq!(text_of(store.document(), id), "Countess");
        store.undo().unwrap();
        assert_eq!(*store.document(), before);
    }

    #[test]
    fn stale_responses_are_discarded_on_arrival() {
        let (mut store, id) = store_with_tagged_text("Alice");
        let mut session = RevisionSession::new();

        let first = session.begin();
        let second = session.begin();

        // The newer request resolves first and is applied.
        let newer = format!(
            r#"{{"intents": [{{"target": {}, "action": "setText", "value": "Second"}}]}}"#,
            id.0
        );
        let outcome =
            session.apply_response(&mut store, second, &newer, "second", Scope::TextOnly, &[]);
        assert_eq!(outcome.applied, 1);

        // The older response arrives late and must not be applied.
        let older = format!(
            r#"{{"intents": [{{"target": {}, "action": "setText", "value": "First"}}]}}"#,
            id.0
        );
        let outcome =
            session.apply_response(&mut store, first, &older, "first", Scope::TextOnly, &[]);
        assert_eq!(outcome.applied, 0);
        assert!(outcome.reason.is_some());
        assert_eq!(text_of(store.document(), id), "Second");
    }

    #[test]
    fn unknown_targets_are_rejected_individually() {
        let (mut store, id) = store_with_tagged_text("Alice");
        let generator = move |_req: &str| {
            Ok(format!(
                r#"{{"intents": [
                    {{"target": 999, "action": "setText", "value": "ghost"}},
                    {{"target": {}, "action": "setText", "value": "Ada"}}
                ]}}"#,
                id.0
            ))
        };
        let outcome = run_revision(&mut store, &generator, "edit", Scope::TextOnly, &[]);
        assert_eq!(outcome.applied, 1, "the valid op still lands");
        assert!(matches!(
            outcome.rejected[0].reason,
            RejectionReason::UnknownTarget(LayerId(999))
        ));
        assert_eq!(text_of(store.document(), id), "Ada");
    }
}
