//! Translation routing rule

use crate::types::TranslationVariant;

/// Habitat that routes to Yoda regardless of the legendary flag
const CAVE_HABITAT: &str = "cave";

/// Choose the translation for a pokemon
///
/// Cave dwellers (habitat compared case-insensitively, exact match) and
/// legendary pokemon get [`TranslationVariant::Yoda`]; everything else,
/// including pokemon without a habitat, gets
/// [`TranslationVariant::Shakespeare`].
pub fn route(habitat: Option<&str>, is_legendary: bool) -> TranslationVariant {
    let in_cave = habitat.is_some_and(|h| h.eq_ignore_ascii_case(CAVE_HABITAT));

    if in_cave || is_legendary {
        TranslationVariant::Yoda
    } else {
        TranslationVariant::Shakespeare
    }
}
