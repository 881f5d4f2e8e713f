// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imprint Revise: natural-language revisions as validated, undoable edits.
//!
//! A revision request travels one fixed path: a [`PromptBuilder`] serializes
//! the document's layer tree with the instruction, scope, and lock-list; an
//! opaque [`TextGenerator`] turns that into text; the parser extracts a
//! [`RevisionPlan`] of intents and raw ops from the surrounding prose; the
//! compiler resolves intent targets against the live document; and a single
//! validation gate drops every op whose target is missing or locked, whose
//! field does not fit the layer's variant, or whose field kind falls outside
//! the active [`Scope`]. Survivors run through the store as one command, so
//! an automated revision undoes exactly like a manual edit.
//!
//! Failure never escalates: a backend error, unparsable output, or a fully
//! rejected plan all degrade to a no-change [`RevisionOutcome`] with a
//! reason, leaving the document untouched.
//!
//! # Position in the stack
//!
//! This crate sits on top of `imprint_store` and never mutates a document
//! directly; the generation output is advisory, the scope is authoritative.

mod engine;
mod generator;
mod intent;
mod parse;
mod prompt;
mod scope;

pub use engine::{
    Rejection, RejectionReason, RevisionOutcome, RevisionSession, RevisionToken, run_revision,
    validate_ops,
};
pub use generator::{GenerationError, TextGenerator};
pub use intent::{CompileError, Intent, IntentAction, IntentTarget, compile};
pub use parse::{ParseError, RevisionPlan, parse_response};
pub use prompt::PromptBuilder;
pub use scope::Scope;
