// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The opaque text-generation boundary.

/// Why a generation call produced nothing usable.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The backend call itself failed (network, auth, quota, ...).
    #[error("generation backend failed: {0}")]
    Backend(String),
    /// The backend returned an empty response.
    #[error("generation returned an empty response")]
    Empty,
}

/// A provider-agnostic text completion: request text in, response text out.
///
/// The revision engine never interprets failures beyond "no changes were
/// applied"; implementations decide retries, timeouts, and transport.
pub trait TextGenerator {
    /// Complete one request.
    fn complete(&self, request: &str) -> Result<String, GenerationError>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> Result<String, GenerationError>,
{
    fn complete(&self, request: &str) -> Result<String, GenerationError> {
        self(request)
    }
}
