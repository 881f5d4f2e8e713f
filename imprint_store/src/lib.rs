// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imprint Store: command-based document editing with undo.
//!
//! Edits are expressed as batches of [`PatchOp`] primitives. A batch is
//! validated against the current document, captured together with its exact
//! inverse as a [`Command`], applied, and retained on a bounded undo stack
//! inside [`DocumentStore`]. The same `PatchOp` vocabulary is what the
//! revision engine compiles model output into, so human edits and generated
//! edits share one validation and undo path.
//!
//! Within the stack of Imprint crates, this sits directly above
//! `imprint_schema` and below the template and revision crates.

mod command;
mod patch;
mod store;

pub use command::{Command, CommandError, LockSet, SkippedOp};
pub use patch::{FieldKind, PatchError, PatchOp, apply_op, capture_inverse, is_noop};
pub use store::{ApplyOutcome, DEFAULT_HISTORY_LIMIT, DocumentStore, SubscriptionId};
