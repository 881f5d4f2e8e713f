// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extracting a revision plan from generator output.
//!
//! Responses arrive as prose with JSON somewhere inside. The parser finds
//! the first complete JSON object or array, then accepts high-level intents,
//! raw patch ops, or both; anything unrecognized inside the payload is
//! skipped with a log line rather than failing the whole plan.

use imprint_store::PatchOp;
use serde_json::Value;

use crate::Intent;

/// Why a response produced no plan.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No JSON object or array was found in the response.
    #[error("no JSON payload found in the response")]
    NoJson,
    /// A JSON payload was found but did not parse.
    #[error("malformed JSON payload: {0}")]
    Malformed(String),
    /// The payload parsed but contained neither intents nor ops.
    #[error("response JSON contains neither intents nor ops")]
    EmptyPlan,
}

/// The structured content of one response: intents to compile plus raw ops.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevisionPlan {
    /// High-level edits still to be resolved against the document.
    pub intents: Vec<Intent>,
    /// Ops returned directly by the generator.
    pub ops: Vec<PatchOp>,
}

impl RevisionPlan {
    /// True when the plan contains nothing at all.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && self.ops.is_empty()
    }
}

/// Slice out the first complete JSON object or array, tolerating prose on
/// either side and brackets inside string literals.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let bytes = text.as_bytes();
    let open = bytes[start];
    let close = if open == b'{' { b'}' } else { b']' };
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            _ if *b == open => depth += 1,
            _ if *b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// One element of a plan payload: an intent or a raw op.
fn classify(value: Value, plan: &mut RevisionPlan) {
    let looks_like_op = value.get("op").is_some();
    if looks_like_op {
        match serde_json::from_value::<PatchOp>(value) {
            Ok(op) => plan.ops.push(op),
            Err(e) => log::warn!("skipping unparsable op in response: {e}"),
        }
        return;
    }
    match serde_json::from_value::<Intent>(value) {
        Ok(intent) => plan.intents.push(intent),
        Err(e) => log::warn!("skipping unparsable intent in response: {e}"),
    }
}

/// Parse generator output into a [`RevisionPlan`].
///
/// Accepted shapes: `{"intents": [...], "ops": [...]}` (either key
/// optional), a bare array of intents and/or ops, or a single intent or op
/// object.
pub fn parse_response(text: &str) -> Result<RevisionPlan, ParseError> {
    let payload = extract_json(text).ok_or(ParseError::NoJson)?;
    let value: Value =
        serde_json::from_str(payload).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let mut plan = RevisionPlan::default();
    match value {
        Value::Array(items) => {
            for item in items {
                classify(item, &mut plan);
            }
        }
        Value::Object(mut map) if map.contains_key("intents") || map.contains_key("ops") => {
            if let Some(Value::Array(items)) = map.remove("intents") {
                for item in items {
                    classify(item, &mut plan);
                }
            }
            if let Some(Value::Array(items)) = map.remove("ops") {
                for item in items {
                    classify(item, &mut plan);
                }
            }
        }
        object @ Value::Object(_) => classify(object, &mut plan),
        _ => return Err(ParseError::EmptyPlan),
    }

    if plan.is_empty() {
        return Err(ParseError::EmptyPlan);
    }
    Ok(plan)
}
