//! Lookup and translation pipeline
//!
//! ```text
//! Start -> PokemonResolved -> SpeciesResolved -> DescriptionSelected
//!       -> VariantRouted -> (Translated | FallbackToOriginal) -> Done
//! ```
//!
//! The pokemon, species and description stages fail closed: any failure ends
//! the run with [`PipelineResult::NotFound`] (unknown pokemon only) or
//! [`PipelineResult::UpstreamFailure`]. The translation stage fails open: the
//! untranslated description is kept and the run still succeeds.

use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::config::{UpstreamConfig, DEFAULT_TRANSLATION_TIMEOUT_MS};
use crate::description::select_description;
use crate::error::{Error, Result, Stage};
use crate::pokeapi::{PokeApiClient, PokemonSource};
use crate::routing::route;
use crate::translator::{FunTranslationsClient, Translator};
use crate::types::CreatureInfo;

/// Outcome classification, never serialized to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Ok,
    NotFound,
    UpstreamFailure,
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    /// Pokemon resolved; description is always populated
    Ok(CreatureInfo),
    /// The pokemon does not exist upstream
    NotFound,
    /// An upstream dependency failed or returned unusable data
    UpstreamFailure,
}

impl PipelineResult {
    /// Status of this result
    pub fn status(&self) -> PipelineStatus {
        match self {
            PipelineResult::Ok(_) => PipelineStatus::Ok,
            PipelineResult::NotFound => PipelineStatus::NotFound,
            PipelineResult::UpstreamFailure => PipelineStatus::UpstreamFailure,
        }
    }

    /// Resolved pokemon, if the run succeeded
    pub fn info(&self) -> Option<&CreatureInfo> {
        match self {
            PipelineResult::Ok(info) => Some(info),
            _ => None,
        }
    }

    /// Consume into the resolved pokemon, if the run succeeded
    pub fn into_info(self) -> Option<CreatureInfo> {
        match self {
            PipelineResult::Ok(info) => Some(info),
            _ => None,
        }
    }

    fn from_error(error: &Error) -> Self {
        if error.is_not_found() {
            PipelineResult::NotFound
        } else {
            PipelineResult::UpstreamFailure
        }
    }
}

/// Pipeline orchestrator
///
/// Stateless between runs; clone the `Arc` or share `&Pokedex` freely across
/// concurrent requests.
pub struct Pokedex {
    source: Arc<dyn PokemonSource>,
    translator: Arc<dyn Translator>,
    locale: String,
    translation_timeout: Duration,
}

impl Pokedex {
    /// Compose a pipeline from its collaborators
    pub fn new(
        source: Arc<dyn PokemonSource>,
        translator: Arc<dyn Translator>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            source,
            translator,
            locale: locale.into(),
            translation_timeout: Duration::from_millis(DEFAULT_TRANSLATION_TIMEOUT_MS),
        }
    }

    /// Cap on the whole translation stage, retries included
    pub fn with_translation_timeout(mut self, timeout: Duration) -> Self {
        self.translation_timeout = timeout;
        self
    }

    /// Build the pipeline with the PokeAPI and FunTranslations clients
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        config.validate()?;

        let http_config = config.http_config();
        let source = PokeApiClient::new(&config.pokeapi_url, http_config.clone())?;
        let translator = FunTranslationsClient::new(&config.translator_url, http_config)?;

        Ok(
            Self::new(Arc::new(source), Arc::new(translator), config.locale.clone())
                .with_translation_timeout(config.translation_timeout()),
        )
    }

    /// Locale descriptions are selected for
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolve a pokemon with its untranslated description
    #[instrument(skip(self), fields(locale = %self.locale))]
    pub async fn describe(&self, name: &str) -> PipelineResult {
        match self.resolve(name).await {
            Ok(info) => PipelineResult::Ok(info),
            Err(error) => PipelineResult::from_error(&error),
        }
    }

    /// Resolve a pokemon and translate its description
    ///
    /// A translation failure of any kind keeps the original description,
    /// including a translation stage that outlives its timeout.
    #[instrument(skip(self), fields(locale = %self.locale))]
    pub async fn describe_translated(&self, name: &str) -> PipelineResult {
        let mut info = match self.resolve(name).await {
            Ok(info) => info,
            Err(error) => return PipelineResult::from_error(&error),
        };

        let variant = route(info.habitat.as_deref(), info.is_legendary);
        tracing::debug!(%variant, habitat = ?info.habitat, is_legendary = info.is_legendary, "Translation routed");

        let translation = tokio::time::timeout(
            self.translation_timeout,
            self.translator.translate(&info.description, variant),
        )
        .await;

        match translation {
            Ok(Ok(translated)) if !translated.is_empty() => {
                info.description = translated;
            }
            Ok(Ok(_)) => {
                tracing::warn!(%variant, "Translation came back empty, keeping original description");
            }
            Ok(Err(error)) => {
                tracing::warn!(%variant, %error, "Translation unavailable, keeping original description");
            }
            Err(_) => {
                tracing::warn!(
                    %variant,
                    timeout_ms = self.translation_timeout.as_millis() as u64,
                    "Translation timed out, keeping original description"
                );
            }
        }

        PipelineResult::Ok(info)
    }

    async fn resolve(&self, name: &str) -> Result<CreatureInfo> {
        let pokemon = self.source.fetch_pokemon(name).await?;

        let species = self
            .source
            .fetch_species(pokemon.species_ref())
            .await
            .map_err(|e| e.into_upstream(Stage::Species))?;

        let description = select_description(&species.flavor_text_entries, &self.locale)
            .map_err(|e| {
                tracing::error!(
                    stage = %Stage::Description,
                    pokemon = %pokemon.name,
                    locale = %self.locale,
                    entries = species.flavor_text_entries.len(),
                    "No description for the configured locale"
                );
                e.into_upstream(Stage::Description)
            })?;

        Ok(CreatureInfo {
            name: pokemon.name,
            description,
            habitat: species.habitat.map(|h| h.name),
            is_legendary: species.is_legendary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proptest_strategies::species_strategy;
    use crate::types::{FlavorTextEntry, NamedResource, Pokemon, PokemonSpecies, TranslationVariant};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const DITTO_TEXT: &str =
        "It can freely recombine its own cellular structure to\ntransform into other life-forms.";

    #[derive(Default)]
    struct FakeSource {
        species: HashMap<String, Result<PokemonSpecies>>,
        pokemon_failure: Option<u16>,
    }

    impl FakeSource {
        fn with(mut self, name: &str, species: PokemonSpecies) -> Self {
            self.species.insert(name.to_string(), Ok(species));
            self
        }

        fn with_species_error(mut self, name: &str, error: Error) -> Self {
            self.species.insert(name.to_string(), Err(error));
            self
        }
    }

    #[async_trait]
    impl PokemonSource for FakeSource {
        async fn fetch_pokemon(&self, name: &str) -> Result<Pokemon> {
            if let Some(status) = self.pokemon_failure {
                return Err(Error::Upstream {
                    stage: Stage::Pokemon,
                    message: "down".to_string(),
                    status_code: Some(status),
                    source: None,
                });
            }
            if !self.species.contains_key(name) {
                return Err(Error::NotFound {
                    resource: format!("pokemon '{}'", name),
                });
            }
            Ok(Pokemon {
                name: name.to_string(),
                species: NamedResource::new(name, format!("species://{}", name)),
            })
        }

        async fn fetch_species(&self, species_ref: &str) -> Result<PokemonSpecies> {
            let name = species_ref.trim_start_matches("species://");
            match self.species.get(name) {
                Some(Ok(species)) => Ok(species.clone()),
                Some(Err(Error::NotFound { resource })) => Err(Error::NotFound {
                    resource: resource.clone(),
                }),
                _ => Err(Error::Upstream {
                    stage: Stage::Species,
                    message: "broken".to_string(),
                    status_code: Some(500),
                    source: None,
                }),
            }
        }
    }

    struct FakeTranslator {
        calls: AtomicUsize,
        variants: Mutex<Vec<TranslationVariant>>,
        fail: bool,
    }

    impl FakeTranslator {
        fn working() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                variants: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                variants: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn variants(&self) -> Vec<TranslationVariant> {
            self.variants.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn translate(&self, text: &str, variant: TranslationVariant) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.variants.lock().unwrap().push(variant);
            if self.fail {
                return Err(Error::TranslationUnavailable {
                    variant,
                    code: Some("429".to_string()),
                    message: "Too Many Requests".to_string(),
                });
            }
            Ok(format!("[{}] {}", variant, text))
        }
    }

    fn species(habitat: Option<&str>, is_legendary: bool, entries: Vec<FlavorTextEntry>) -> PokemonSpecies {
        PokemonSpecies {
            habitat: habitat.map(|h| NamedResource::new(h, "")),
            is_legendary,
            flavor_text_entries: entries,
        }
    }

    fn ditto() -> PokemonSpecies {
        species(
            Some("urban"),
            false,
            vec![
                FlavorTextEntry::new("メタモンの説明", "ja-Hrkt"),
                FlavorTextEntry::new(DITTO_TEXT, "en"),
            ],
        )
    }

    fn pokedex(source: FakeSource, translator: Arc<FakeTranslator>) -> Pokedex {
        Pokedex::new(Arc::new(source), translator, "en")
    }

    #[tokio::test]
    async fn test_describe_ditto() {
        let translator = FakeTranslator::working();
        let dex = pokedex(FakeSource::default().with("ditto", ditto()), translator.clone());

        let result = dex.describe("ditto").await;

        assert_eq!(result.status(), PipelineStatus::Ok);
        assert_eq!(
            result.into_info().unwrap(),
            CreatureInfo {
                name: "ditto".to_string(),
                description: "It can freely recombine its own cellular structure to transform into other life-forms.".to_string(),
                habitat: Some("urban".to_string()),
                is_legendary: false,
            }
        );
        assert_eq!(translator.calls(), 0);
    }

    #[tokio::test]
    async fn test_translated_ditto_uses_shakespeare() {
        let translator = FakeTranslator::working();
        let dex = pokedex(FakeSource::default().with("ditto", ditto()), translator.clone());

        let info = dex.describe_translated("ditto").await.into_info().unwrap();

        assert_eq!(translator.variants(), vec![TranslationVariant::Shakespeare]);
        assert!(info.description.starts_with("[shakespeare] It can freely"));
    }

    #[tokio::test]
    async fn test_cave_pokemon_uses_yoda() {
        let onix = species(Some("cave"), false, vec![FlavorTextEntry::new("Onix text", "en")]);
        let translator = FakeTranslator::working();
        let dex = pokedex(FakeSource::default().with("onix", onix), translator.clone());

        let result = dex.describe_translated("onix").await;

        assert_eq!(result.status(), PipelineStatus::Ok);
        assert_eq!(translator.variants(), vec![TranslationVariant::Yoda]);
    }

    #[tokio::test]
    async fn test_legendary_pokemon_uses_yoda() {
        let mewtwo = species(Some("rare"), true, vec![FlavorTextEntry::new("Mewtwo text", "en")]);
        let translator = FakeTranslator::working();
        let dex = pokedex(FakeSource::default().with("mewtwo", mewtwo), translator.clone());

        let info = dex.describe_translated("mewtwo").await.into_info().unwrap();

        assert_eq!(info.description, "[yoda] Mewtwo text");
        assert_eq!(info.habitat.as_deref(), Some("rare"));
        assert!(info.is_legendary);
    }

    #[tokio::test]
    async fn test_unknown_pokemon_is_not_found_without_translation() {
        let translator = FakeTranslator::working();
        let dex = pokedex(FakeSource::default(), translator.clone());

        assert_eq!(dex.describe("idonotexist").await, PipelineResult::NotFound);
        assert_eq!(dex.describe_translated("idonotexist").await, PipelineResult::NotFound);
        assert_eq!(translator.calls(), 0);
    }

    #[tokio::test]
    async fn test_translation_failure_falls_back() {
        let translator = FakeTranslator::failing();
        let dex = pokedex(FakeSource::default().with("ditto", ditto()), translator.clone());

        let untranslated = dex.describe("ditto").await;
        let translated = dex.describe_translated("ditto").await;

        assert_eq!(translator.calls(), 1);
        assert_eq!(translated.status(), PipelineStatus::Ok);
        assert_eq!(translated, untranslated);
    }

    struct HangingTranslator;

    #[async_trait]
    impl Translator for HangingTranslator {
        async fn translate(&self, _text: &str, _variant: TranslationVariant) -> Result<String> {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_hanging_translation_falls_back_after_timeout() {
        let dex = Pokedex::new(
            Arc::new(FakeSource::default().with("ditto", ditto())),
            Arc::new(HangingTranslator),
            "en",
        )
        .with_translation_timeout(Duration::from_millis(50));

        let untranslated = dex.describe("ditto").await;
        let translated = dex.describe_translated("ditto").await;

        assert_eq!(translated.status(), PipelineStatus::Ok);
        assert_eq!(translated, untranslated);
    }

    #[tokio::test]
    async fn test_pokemon_lookup_failure_is_upstream_failure() {
        let translator = FakeTranslator::working();
        let source = FakeSource {
            pokemon_failure: Some(503),
            ..FakeSource::default().with("ditto", ditto())
        };
        let dex = pokedex(source, translator.clone());

        assert_eq!(dex.describe_translated("ditto").await, PipelineResult::UpstreamFailure);
        assert_eq!(translator.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_species_is_upstream_failure() {
        let source = FakeSource::default().with_species_error(
            "ditto",
            Error::NotFound {
                resource: "species".to_string(),
            },
        );
        let dex = pokedex(source, FakeTranslator::working());

        assert_eq!(dex.describe("ditto").await, PipelineResult::UpstreamFailure);
    }

    #[tokio::test]
    async fn test_missing_locale_is_upstream_failure() {
        let source = FakeSource::default().with(
            "ditto",
            species(Some("urban"), false, vec![FlavorTextEntry::new("texte", "fr")]),
        );
        let translator = FakeTranslator::working();
        let dex = pokedex(source, translator.clone());

        assert_eq!(dex.describe_translated("ditto").await, PipelineResult::UpstreamFailure);
        assert_eq!(translator.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_habitat_is_tolerated() {
        let source = FakeSource::default().with(
            "porygon",
            species(None, false, vec![FlavorTextEntry::new("Made of code", "en")]),
        );
        let translator = FakeTranslator::working();
        let dex = pokedex(source, translator.clone());

        let info = dex.describe_translated("porygon").await.into_info().unwrap();

        assert_eq!(info.habitat, None);
        assert_eq!(translator.variants(), vec![TranslationVariant::Shakespeare]);
    }

    #[tokio::test]
    async fn test_pipeline_is_idempotent() {
        let dex = pokedex(FakeSource::default().with("ditto", ditto()), FakeTranslator::working());

        assert_eq!(dex.describe("ditto").await, dex.describe("ditto").await);
        assert_eq!(
            dex.describe_translated("ditto").await,
            dex.describe_translated("ditto").await
        );
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let config = UpstreamConfig {
            pokeapi_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(Pokedex::from_config(&config).is_err());
    }

    proptest! {
        #[test]
        fn prop_ok_description_is_clean(species in species_strategy()) {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
            let has_english = species.flavor_text_entries.iter().any(|e| e.locale().contains("en"));
            let dex = pokedex(FakeSource::default().with("mew", species), FakeTranslator::failing());

            let result = runtime.block_on(dex.describe_translated("mew"));

            if has_english {
                let info = result.into_info().unwrap();
                prop_assert!(!info.description.is_empty());
                prop_assert!(!info.description.contains(['\n', '\r', '\u{000C}']), "description contains line break or form feed");
            } else {
                prop_assert_eq!(result, PipelineResult::UpstreamFailure);
            }
        }
    }
}
