// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Permission scopes: which field kinds an automated revision may touch.
//!
//! Allow-lists are explicit data rather than code, so enforcement can be
//! audited independently of whatever the generation step produced. The
//! generation output is advisory; the scope is authoritative.

use imprint_store::FieldKind;

/// A permission boundary for one revision request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Text content and sizing only.
    TextOnly,
    /// Fill, stroke, text, and icon colors only.
    ColorsOnly,
    /// Position, size, and rotation only.
    LayoutOnly,
    /// Everything on a single chosen element except locks and structure.
    ElementSpecific,
    /// Everything except locks, selection, and document metadata.
    FullRedesign,
}

const TEXT_ONLY: &[FieldKind] = &[FieldKind::Text, FieldKind::FontSize];

const COLORS_ONLY: &[FieldKind] = &[
    FieldKind::FillPaint,
    FieldKind::StrokePaint,
    FieldKind::TextColor,
    FieldKind::IconColor,
];

const LAYOUT_ONLY: &[FieldKind] = &[FieldKind::Position, FieldKind::Size, FieldKind::Rotation];

const ELEMENT_SPECIFIC: &[FieldKind] = &[
    FieldKind::Name,
    FieldKind::Visibility,
    FieldKind::Opacity,
    FieldKind::BlendMode,
    FieldKind::Position,
    FieldKind::Size,
    FieldKind::Rotation,
    FieldKind::CornerRadii,
    FieldKind::Text,
    FieldKind::TextStyle,
    FieldKind::TextColor,
    FieldKind::FontSize,
    FieldKind::FillPaint,
    FieldKind::StrokePaint,
    FieldKind::ImageFilters,
    FieldKind::IconColor,
];

const FULL_REDESIGN: &[FieldKind] = &[
    FieldKind::Name,
    FieldKind::Visibility,
    FieldKind::Opacity,
    FieldKind::BlendMode,
    FieldKind::Position,
    FieldKind::Size,
    FieldKind::Rotation,
    FieldKind::CornerRadii,
    FieldKind::Tags,
    FieldKind::Text,
    FieldKind::TextStyle,
    FieldKind::TextColor,
    FieldKind::FontSize,
    FieldKind::FillPaint,
    FieldKind::StrokePaint,
    FieldKind::ImageFilters,
    FieldKind::IconColor,
    FieldKind::Structure,
];

impl Scope {
    /// The field kinds this scope permits.
    pub fn allowed(self) -> &'static [FieldKind] {
        match self {
            Self::TextOnly => TEXT_ONLY,
            Self::ColorsOnly => COLORS_ONLY,
            Self::LayoutOnly => LAYOUT_ONLY,
            Self::ElementSpecific => ELEMENT_SPECIFIC,
            Self::FullRedesign => FULL_REDESIGN,
        }
    }

    /// Whether this scope permits mutating the given field kind.
    pub fn permits(self, kind: FieldKind) -> bool {
        self.allowed().contains(&kind)
    }

    /// The scope name as written into prompts.
    pub fn name(self) -> &'static str {
        match self {
            Self::TextOnly => "text-only",
            Self::ColorsOnly => "colors-only",
            Self::LayoutOnly => "layout-only",
            Self::ElementSpecific => "element-specific",
            Self::FullRedesign => "full-redesign",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_scope_permits_locks_selection_or_meta() {
        for scope in [
            Scope::TextOnly,
            Scope::ColorsOnly,
            Scope::LayoutOnly,
            Scope::ElementSpecific,
            Scope::FullRedesign,
        ] {
            assert!(!scope.permits(FieldKind::Lock), "{}", scope.name());
            assert!(!scope.permits(FieldKind::Selection), "{}", scope.name());
            assert!(!scope.permits(FieldKind::Meta), "{}", scope.name());
        }
    }

    #[test]
    fn colors_only_excludes_text_content() {
        assert!(Scope::ColorsOnly.permits(FieldKind::TextColor));
        assert!(!Scope::ColorsOnly.permits(FieldKind::Text));
        assert!(!Scope::ColorsOnly.permits(FieldKind::Position));
    }

    #[test]
    fn only_full_redesign_reaches_structure() {
        assert!(Scope::FullRedesign.permits(FieldKind::Structure));
        for scope in [
            Scope::TextOnly,
            Scope::ColorsOnly,
            Scope::LayoutOnly,
            Scope::ElementSpecific,
        ] {
            assert!(!scope.permits(FieldKind::Structure), "{}", scope.name());
        }
    }
}
