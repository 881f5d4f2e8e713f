// Copyright 2026 the Imprint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The built-in axis registry and deterministic combination sampling.

use crate::{AccentKit, Recipe, Theme, accent, recipe, theme};

/// One sampled combination of the three axes.
#[derive(Clone, Debug)]
pub struct Suggestion<'a> {
    /// The layout axis.
    pub recipe: &'a Recipe,
    /// The coloring axis.
    pub theme: &'a Theme,
    /// The decoration axis.
    pub kit: &'a AccentKit,
}

/// The registered recipes, themes, and accent kits.
#[derive(Clone, Debug)]
pub struct Registry {
    recipes: Vec<Recipe>,
    themes: Vec<Theme>,
    kits: Vec<AccentKit>,
}

impl Registry {
    /// The built-in axis set.
    pub fn builtin() -> Self {
        Self {
            recipes: vec![
                Recipe::new(
                    "centered-minimal",
                    "Centered Minimal",
                    &["minimal", "clean"],
                    recipe::layout_centered,
                ),
                Recipe::new(
                    "sidebar",
                    "Sidebar",
                    &["modern", "bold"],
                    recipe::layout_sidebar,
                ),
                Recipe::new(
                    "classic-band",
                    "Classic Band",
                    &["classic", "professional"],
                    recipe::layout_banded,
                ),
            ],
            themes: theme::builtin_themes(),
            kits: accent::builtin_kits(),
        }
    }

    /// All registered recipes, in registration order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// All registered themes, in registration order.
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// All registered accent kits, in registration order.
    pub fn kits(&self) -> &[AccentKit] {
        &self.kits
    }

    /// Look up a recipe by id.
    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Look up a theme by id.
    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    /// Look up an accent kit by id.
    pub fn kit(&self, id: &str) -> Option<&AccentKit> {
        self.kits.iter().find(|k| k.id == id)
    }

    /// Total distinct combinations across the three axes.
    pub fn combinations(&self) -> usize {
        self.recipes.len() * self.themes.len() * self.kits.len()
    }

    /// Deterministically pick a combination for a style/mood request.
    ///
    /// `style` filters recipes and kits, `mood` filters themes; a filter
    /// that matches nothing falls back to the whole axis rather than
    /// failing. Identical `(style, mood, seed)` always reproduces the
    /// identical combination, so "undo last suggestion" can replay it.
    pub fn suggest(&self, style: Option<&str>, mood: Option<&str>, seed: u64) -> Suggestion<'_> {
        let recipes = filtered(&self.recipes, style, |r, s| r.has_style(s));
        let themes = filtered(&self.themes, mood, |t, m| t.has_mood(m));
        let kits = filtered(&self.kits, style, |k, s| k.has_style(s));

        let mut mix = fnv1a(style.unwrap_or("").as_bytes());
        mix = fnv1a_continue(mix, mood.unwrap_or("").as_bytes());
        let mut pick = splitmix64(mix ^ seed);

        let r = take_index(&mut pick, recipes.len());
        let t = take_index(&mut pick, themes.len());
        let k = take_index(&mut pick, kits.len());
        Suggestion {
            recipe: recipes[r],
            theme: themes[t],
            kit: kits[k],
        }
    }
}

fn filtered<'a, T>(
    axis: &'a [T],
    tag: Option<&str>,
    matches: impl Fn(&T, &str) -> bool,
) -> Vec<&'a T> {
    if let Some(tag) = tag {
        let hits: Vec<&T> = axis.iter().filter(|item| matches(item, tag)).collect();
        if !hits.is_empty() {
            return hits;
        }
        log::debug!("no axis entry matches {tag:?}, falling back to the full axis");
    }
    axis.iter().collect()
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    fnv1a_continue(FNV_OFFSET, bytes)
}

fn fnv1a_continue(mut hash: u64, bytes: &[u8]) -> u64 {
    // Separator keeps ("ab", "") distinct from ("a", "b").
    hash ^= 0x1f;
    hash = hash.wrapping_mul(FNV_PRIME);
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

fn take_index(state: &mut u64, len: usize) -> usize {
    #[expect(clippy::cast_possible_truncation, reason = "idx < len fits usize")]
    let idx = (*state % len as u64) as usize;
    *state = splitmix64(*state);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combination_count_is_the_axis_product() {
        let reg = Registry::builtin();
        assert_eq!(
            reg.combinations(),
            reg.recipes().len() * reg.themes().len() * reg.kits().len()
        );
        assert!(reg.combinations() >= 12, "enough variety to sample");
    }

    #[test]
    fn suggestion_is_deterministic_per_inputs() {
        let reg = Registry::builtin();
        for seed in [0_u64, 1, 42, u64::MAX] {
            let a = reg.suggest(Some("minimal"), Some("warm"), seed);
            let b = reg.suggest(Some("minimal"), Some("warm"), seed);
            assert_eq!(a.recipe.id, b.recipe.id, "seed {seed}");
            assert_eq!(a.theme.id, b.theme.id, "seed {seed}");
            assert_eq!(a.kit.id, b.kit.id, "seed {seed}");
        }
    }

    #[test]
    fn filters_restrict_the_sampled_axes() {
        let reg = Registry::builtin();
        for seed in 0..32 {
            let s = reg.suggest(Some("minimal"), Some("warm"), seed);
            assert!(s.recipe.has_style("minimal"), "seed {seed}");
            assert!(s.theme.has_mood("warm"), "seed {seed}");
            assert!(s.kit.has_style("minimal"), "seed {seed}");
        }
    }

    #[test]
    fn unmatched_filters_fall_back_to_the_full_axis() {
        let reg = Registry::builtin();
        let s = reg.suggest(Some("baroque"), None, 7);
        assert!(reg.recipe(s.recipe.id).is_some());
    }

    #[test]
    fn different_seeds_reach_multiple_combinations() {
        let reg = Registry::builtin();
        let mut seen = std::collections::HashSet::new();
        for seed in 0..64 {
            let s = reg.suggest(None, None, seed);
            seen.insert((s.recipe.id, s.theme.id, s.kit.id));
        }
        assert!(seen.len() > 1, "sampling must not collapse to one point");
    }
}
