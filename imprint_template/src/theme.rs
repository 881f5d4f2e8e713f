// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Themes: a four-color palette applied over colorless stubs by role.

use imprint_schema::Color;

use crate::Role;

/// The four colors a theme is built from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    /// Page background.
    pub background: Color,
    /// Primary text.
    pub ink: Color,
    /// Secondary text.
    pub muted: Color,
    /// Decorative accents.
    pub accent: Color,
}

/// A named coloring axis. Themes never move anything; they only decide the
/// color each [`Role`] gets.
#[derive(Clone, Debug)]
pub struct Theme {
    /// Stable identifier used in generated document ids.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Mood tags matched by suggestion filters ("warm", "professional", ...).
    pub moods: &'static [&'static str],
    /// The palette.
    pub palette: Palette,
}

impl Theme {
    /// The color this theme assigns to a role.
    pub fn color_for(&self, role: Role) -> Color {
        match role {
            Role::Background => self.palette.background,
            Role::Name | Role::Company => self.palette.ink,
            Role::Title | Role::Contact | Role::Tagline => self.palette.muted,
            Role::Accent => self.palette.accent,
        }
    }

    /// Whether this theme carries the given mood tag.
    pub fn has_mood(&self, mood: &str) -> bool {
        self.moods.iter().any(|m| m.eq_ignore_ascii_case(mood))
    }
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

pub(crate) fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme {
            id: "ink",
            name: "Ink on Paper",
            moods: &["professional", "clean"],
            palette: Palette {
                background: rgb(248, 249, 250),
                ink: rgb(28, 28, 30),
                muted: rgb(106, 106, 106),
                accent: rgb(28, 28, 30),
            },
        },
        Theme {
            id: "slate",
            name: "Slate Night",
            moods: &["bold", "dark"],
            palette: Palette {
                background: rgb(24, 30, 38),
                ink: rgb(240, 244, 248),
                muted: rgb(148, 163, 178),
                accent: rgb(56, 189, 248),
            },
        },
        Theme {
            id: "terracotta",
            name: "Terracotta",
            moods: &["warm", "friendly"],
            palette: Palette {
                background: rgb(252, 247, 240),
                ink: rgb(64, 42, 32),
                muted: rgb(146, 106, 86),
                accent: rgb(180, 83, 9),
            },
        },
        Theme {
            id: "forest",
            name: "Forest",
            moods: &["calm", "natural"],
            palette: Palette {
                background: rgb(244, 248, 244),
                ink: rgb(28, 44, 34),
                muted: rgb(90, 118, 100),
                accent: rgb(34, 120, 72),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_theme_ids_are_unique() {
        let themes = builtin_themes();
        for (i, a) in themes.iter().enumerate() {
            for b in &themes[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn roles_map_onto_the_palette() {
        let theme = &builtin_themes()[0];
        assert_eq!(theme.color_for(Role::Background), theme.palette.background);
        assert_eq!(theme.color_for(Role::Name), theme.palette.ink);
        assert_eq!(theme.color_for(Role::Title), theme.palette.muted);
        assert_eq!(theme.color_for(Role::Accent), theme.palette.accent);
    }
}
