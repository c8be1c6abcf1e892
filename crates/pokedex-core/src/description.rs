//! Description selection
//!
//! Picks the first flavor text whose locale tag contains the target locale and
//! flattens its line breaks. Upstream order is authoritative.

use crate::error::{Error, Result};
use crate::types::FlavorTextEntry;

/// Characters replaced by a single space in selected descriptions
const BREAK_CHARS: [char; 3] = ['\n', '\r', '\u{000C}'];

/// Select the description for `locale` from `entries`
///
/// Matching is substring based, so `"en"` matches `"en-US"`. Each line feed,
/// carriage return and form feed becomes one space; `"\r\n"` therefore turns
/// into two spaces.
pub fn select_description(entries: &[FlavorTextEntry], locale: &str) -> Result<String> {
    entries
        .iter()
        .find(|entry| entry.locale().contains(locale))
        .map(|entry| normalize_breaks(&entry.flavor_text))
        .ok_or_else(|| Error::NoMatchingLocale {
            locale: locale.to_string(),
        })
}

fn normalize_breaks(text: &str) -> String {
    text.replace(|c: char| BREAK_CHARS.contains(&c), " ")
}
