//! Core types and data structures for the Pokedex service
//!
//! Upstream payloads (PokeAPI and FunTranslations) are deserialized into the
//! minimal shapes below; unknown fields are ignored. [`CreatureInfo`] is the
//! only type serialized back to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `{name, url}` reference as PokeAPI embeds it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name (e.g., "cave", "en")
    pub name: String,

    /// Absolute URL of the resource
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Primary pokemon record from `/api/v2/pokemon/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Pokemon identifier
    pub name: String,

    /// Link to the species resource
    pub species: NamedResource,
}

impl Pokemon {
    /// Locator of the linked species resource
    pub fn species_ref(&self) -> &str {
        &self.species.url
    }
}

/// Species record reached through [`Pokemon::species_ref`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSpecies {
    /// Habitat, null upstream for a number of species
    #[serde(default)]
    pub habitat: Option<NamedResource>,

    /// Legendary flag
    pub is_legendary: bool,

    /// Descriptions in upstream order
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
}

impl PokemonSpecies {
    /// Habitat name, if the species has one
    pub fn habitat_name(&self) -> Option<&str> {
        self.habitat.as_ref().map(|h| h.name.as_str())
    }
}

/// One locale-tagged description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorTextEntry {
    /// Raw description text, may contain line breaks and form feeds
    pub flavor_text: String,

    /// Locale tag of the text
    pub language: NamedResource,

    /// Game version the text comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<NamedResource>,
}

impl FlavorTextEntry {
    pub fn new(text: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            flavor_text: text.into(),
            language: NamedResource::new(locale, ""),
            version: None,
        }
    }

    /// Locale tag of this entry
    pub fn locale(&self) -> &str {
        &self.language.name
    }
}

/// Translation style applied to a description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationVariant {
    /// Used for cave dwellers and legendary pokemon
    Yoda,
    /// Used for everything else
    Shakespeare,
}

impl TranslationVariant {
    /// Path segment of the translation endpoint
    pub fn endpoint(&self) -> &'static str {
        match self {
            TranslationVariant::Yoda => "yoda",
            TranslationVariant::Shakespeare => "shakespeare",
        }
    }
}

impl fmt::Display for TranslationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// FunTranslations response envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    #[serde(default)]
    pub success: Option<TranslationSuccess>,

    #[serde(default)]
    pub contents: Option<TranslationContents>,

    #[serde(default)]
    pub error: Option<TranslationErrorBody>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSuccess {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationContents {
    /// Translated text
    #[serde(default)]
    pub translated: Option<String>,

    /// Text that was submitted
    #[serde(default)]
    pub text: Option<String>,

    /// Name of the translation applied
    #[serde(default)]
    pub translation: Option<String>,
}

/// Error object of a failed translation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,

    #[serde(default)]
    pub message: Option<String>,
}

impl TranslationErrorBody {
    /// Error code rendered as a string, numeric or textual upstream
    pub fn code_string(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Response body returned to API callers
///
/// Field order is part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureInfo {
    pub name: String,
    pub description: String,
    pub habitat: Option<String>,
    pub is_legendary: bool,
}
