//! Pokedex Core - pokemon lookup and description translation
//!
//! This crate resolves a pokemon through PokeAPI, picks its description for a
//! locale, and optionally rewrites that description through FunTranslations.
//!
//! # Main Components
//!
//! - **Error Handling**: Tagged error type using `thiserror` and `anyhow`
//! - **HTTP Transport**: reqwest client with timeouts and bounded retries
//! - **Upstream Clients**: [`PokeApiClient`] and [`FunTranslationsClient`]
//! - **Pipeline**: [`Pokedex`], which composes everything and owns the
//!   success/failure contract
//!
//! # Example
//!
//! ```no_run
//! use pokedex_core::{Pokedex, PipelineResult, UpstreamConfig};
//!
//! async fn example() -> pokedex_core::Result<()> {
//!     let pokedex = Pokedex::from_config(&UpstreamConfig::default())?;
//!     if let PipelineResult::Ok(info) = pokedex.describe_translated("onix").await {
//!         println!("{}: {}", info.name, info.description);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod description;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod pokeapi;
pub mod routing;
pub mod translator;
pub mod types;

mod proptest_strategies;

// Re-export main types for convenience
pub use config::UpstreamConfig;
pub use description::select_description;
pub use error::{Error, Result, Stage};
pub use pipeline::{PipelineResult, PipelineStatus, Pokedex};
pub use pokeapi::{PokeApiClient, PokemonSource};
pub use routing::route;
pub use translator::{FunTranslationsClient, Translator};
pub use types::{
    CreatureInfo, FlavorTextEntry, NamedResource, Pokemon, PokemonSpecies, TranslationVariant,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
