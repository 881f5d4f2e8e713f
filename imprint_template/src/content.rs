// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flat content configuration recipes lay out.

use serde::{Deserialize, Serialize};

/// Field names recognized by [`ContentConfig::set`], in display order.
///
/// Batch headers are matched against these names case-insensitively.
pub const CONTENT_FIELDS: [&str; 7] = [
    "name", "title", "company", "email", "phone", "website", "tagline",
];

/// The text content a generated document is built from.
///
/// Every field is free text; empty fields are simply not laid out by
/// recipes that would otherwise place them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Person or product name. The primary line on most recipes.
    pub name: String,
    /// Role or subtitle.
    pub title: String,
    /// Company or organization.
    pub company: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Website address.
    pub website: String,
    /// Short free-form tagline.
    pub tagline: String,
}

impl ContentConfig {
    /// Read a field by its [`CONTENT_FIELDS`] name.
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "name" => &self.name,
            "title" => &self.title,
            "company" => &self.company,
            "email" => &self.email,
            "phone" => &self.phone,
            "website" => &self.website,
            "tagline" => &self.tagline,
            _ => return None,
        };
        Some(value)
    }

    /// Set a field by name. Returns `false` for unknown field names.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "title" => &mut self.title,
            "company" => &mut self.company,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "website" => &mut self.website,
            "tagline" => &mut self.tagline,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// The contact lines (email, phone, website) that are non-empty.
    pub fn contact_lines(&self) -> Vec<&str> {
        [&self.email, &self.phone, &self.website]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
