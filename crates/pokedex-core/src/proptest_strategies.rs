//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! but valid upstream payloads for property testing.

#![cfg(test)]

use crate::types::{FlavorTextEntry, NamedResource, PokemonSpecies};
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

/// Strategy for generating locale tags, weighted towards English variants
pub fn locale_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("en".to_string()),
        Just("en-US".to_string()),
        Just("ja".to_string()),
        Just("ja-Hrkt".to_string()),
        Just("fr".to_string()),
        Just("de".to_string()),
        Just("zh-Hant".to_string()),
    ]
}

/// Strategy for generating flavor text with embedded breaks
pub fn flavor_text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z .,'\n\r\u{000C}-]{1,120}"
}

/// Strategy for generating a single flavor text entry
pub fn flavor_entry_strategy() -> impl Strategy<Value = FlavorTextEntry> {
    (flavor_text_strategy(), locale_strategy())
        .prop_map(|(text, locale)| FlavorTextEntry::new(text, locale))
}

/// Strategy for generating ordered entry lists
pub fn flavor_entries_strategy() -> impl Strategy<Value = Vec<FlavorTextEntry>> {
    vec(flavor_entry_strategy(), 0..8)
}

/// Strategy for generating species records
pub fn species_strategy() -> impl Strategy<Value = PokemonSpecies> {
    (
        option::of("[a-z-]{3,14}"),
        any::<bool>(),
        flavor_entries_strategy(),
    )
        .prop_map(|(habitat, is_legendary, flavor_text_entries)| PokemonSpecies {
            habitat: habitat.map(|name| NamedResource::new(name, "")),
            is_legendary,
            flavor_text_entries,
        })
}
