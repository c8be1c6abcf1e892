//! PokeAPI client
//!
//! Resolves a pokemon by name and then its linked species record. Status
//! mapping is identical for both lookups: 404 becomes [`Error::NotFound`],
//! everything else that is not a decoded success becomes [`Error::Upstream`].
//! Retries happen in the shared [`HttpClient`], never here.

use async_trait::async_trait;

use crate::error::{Error, Result, Stage};
use crate::http::{HttpClient, HttpClientConfig, HttpError};
use crate::types::{Pokemon, PokemonSpecies};

/// Default PokeAPI base URL
pub const DEFAULT_POKEAPI_URL: &str = "https://pokeapi.co";

/// Source of pokemon and species records
#[async_trait]
pub trait PokemonSource: Send + Sync {
    /// Look up a pokemon by name
    async fn fetch_pokemon(&self, name: &str) -> Result<Pokemon>;

    /// Follow a species reference taken from a [`Pokemon`]
    async fn fetch_species(&self, species_ref: &str) -> Result<PokemonSpecies>;
}

/// [`PokemonSource`] backed by the PokeAPI REST endpoints
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: HttpClient,
}

impl PokeApiClient {
    /// Create a client for the PokeAPI instance at `base_url`
    pub fn new(base_url: &str, config: HttpClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, config)?,
        })
    }

    fn map_error(error: HttpError, stage: Stage, resource: String) -> Error {
        if error.is_not_found() {
            tracing::warn!(%stage, %resource, "Upstream reported resource as not found");
            return Error::NotFound { resource };
        }

        tracing::error!(
            %stage,
            %resource,
            status = ?error.status_code,
            classification = ?error.classification,
            "Upstream lookup failed: {}",
            error.message
        );

        Error::Upstream {
            stage,
            message: error.message.clone(),
            status_code: error.status_code,
            source: Some(anyhow::Error::new(error)),
        }
    }
}

#[async_trait]
impl PokemonSource for PokeApiClient {
    async fn fetch_pokemon(&self, name: &str) -> Result<Pokemon> {
        let resource = format!("pokemon '{}'", name);
        let url = self
            .http
            .endpoint(&["api", "v2", "pokemon", name])
            .map_err(|e| Self::map_error(e, Stage::Pokemon, resource.clone()))?;

        let pokemon: Pokemon = self
            .http
            .get_json(url)
            .await
            .map_err(|e| Self::map_error(e, Stage::Pokemon, resource))?;

        tracing::info!(stage = %Stage::Pokemon, name = %pokemon.name, "Pokemon resolved");
        Ok(pokemon)
    }

    async fn fetch_species(&self, species_ref: &str) -> Result<PokemonSpecies> {
        let resource = format!("species '{}'", species_ref);
        let url = self
            .http
            .resolve(species_ref)
            .map_err(|e| Self::map_error(e, Stage::Species, resource.clone()))?;

        let species: PokemonSpecies = self
            .http
            .get_json(url)
            .await
            .map_err(|e| Self::map_error(e, Stage::Species, resource))?;

        tracing::info!(
            stage = %Stage::Species,
            habitat = ?species.habitat_name(),
            is_legendary = species.is_legendary,
            descriptions = species.flavor_text_entries.len(),
            "Species resolved"
        );
        Ok(species)
    }
}
