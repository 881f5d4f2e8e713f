// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch instantiation from tabular rows.
//!
//! Rows come in as CSV text; each data row fills a [`ContentConfig`] through
//! a column-to-field mapping and generates one document. A header row, when
//! present, is detected by field-name overlap and both consumed as the
//! mapping and skipped as data.

use imprint_schema::Document;

use crate::{AccentKit, CONTENT_FIELDS, ContentConfig, Recipe, Theme, generate};

/// Parse CSV text into rows of cells.
///
/// Handles double-quoted cells, embedded commas and newlines inside quotes,
/// and `""` as an escaped quote. Blank lines between records are dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                _ => cell.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut cell)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut cell));
                if row.iter().any(|c| !c.is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => cell.push(c),
        }
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        if row.iter().any(|c| !c.is_empty()) {
            rows.push(row);
        }
    }
    rows
}

/// Whether a row reads as a header: at least one cell names a known content
/// field, and known names make up at least half of the non-empty cells.
pub fn is_header_row(row: &[String]) -> bool {
    let non_empty = row.iter().filter(|c| !c.trim().is_empty()).count();
    if non_empty == 0 {
        return false;
    }
    let known = row
        .iter()
        .filter(|c| {
            let cell = c.trim();
            CONTENT_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(cell))
        })
        .count();
    known >= 1 && known * 2 >= non_empty
}

fn config_from_row(row: &[String], mapping: &[String]) -> ContentConfig {
    let mut cfg = ContentConfig::default();
    for (cell, field) in row.iter().zip(mapping) {
        if field.is_empty() {
            continue;
        }
        if !cfg.set(field, cell.trim()) {
            log::warn!("row column mapped to unknown field {field:?}, ignored");
        }
    }
    cfg
}

/// Generate one document per data row of `text`.
///
/// If the first row is a header it becomes the mapping (unknown column names
/// map to nothing) and is skipped; otherwise `fallback_mapping` assigns
/// columns to content fields positionally.
pub fn batch_generate(
    text: &str,
    fallback_mapping: &[&str],
    recipe: &Recipe,
    theme: &Theme,
    kit: &AccentKit,
    use_source_colors: bool,
) -> Vec<Document> {
    let rows = parse_rows(text);
    let mut data = rows.as_slice();
    let mapping: Vec<String> = if rows.first().is_some_and(|r| is_header_row(r)) {
        data = &rows[1..];
        rows[0]
            .iter()
            .map(|cell| {
                let cell = cell.trim();
                CONTENT_FIELDS
                    .iter()
                    .find(|f| f.eq_ignore_ascii_case(cell))
                    .map_or_else(String::new, |f| (*f).to_owned())
            })
            .collect()
    } else {
        fallback_mapping.iter().map(|f| (*f).to_owned()).collect()
    };

    data.iter()
        .map(|row| {
            let cfg = config_from_row(row, &mapping);
            generate(&cfg, recipe, theme, kit, use_source_colors)
        })
        .collect()
}
