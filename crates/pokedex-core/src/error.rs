//! Error types for the Pokedex core library
//!
//! Every upstream boundary returns a [`Result`] carrying one of these variants.
//! The pipeline matches on them to decide between `NotFound`, `UpstreamFailure`
//! and the translation fallback, so no variant is ever surfaced to a caller
//! verbatim.

use std::fmt;
use thiserror::Error;

use crate::types::TranslationVariant;

/// Main error type for Pokedex operations
#[derive(Error, Debug)]
pub enum Error {
    /// The requested resource does not exist upstream
    #[error("Not found: {resource}")]
    NotFound {
        resource: String,
    },

    /// An upstream dependency failed or returned something unusable
    #[error("Upstream failure during {stage} lookup: {message}")]
    Upstream {
        stage: Stage,
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// No description entry carries the requested locale
    #[error("No description available for locale '{locale}'")]
    NoMatchingLocale {
        locale: String,
    },

    /// The translation service could not translate the text
    #[error("Translation unavailable ({variant}): {message}")]
    TranslationUnavailable {
        variant: TranslationVariant,
        code: Option<String>,
        message: String,
    },

    /// HTTP/Network related errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Primary pokemon lookup
    Pokemon,
    /// Linked species lookup
    Species,
    /// Description selection
    Description,
    /// Description translation
    Translation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Pokemon => write!(f, "pokemon"),
            Stage::Species => write!(f, "species"),
            Stage::Description => write!(f, "description"),
            Stage::Translation => write!(f, "translation"),
        }
    }
}

impl Error {
    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error means the requested resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Upstream HTTP status associated with this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Upstream { status_code, .. } | Error::Http { status_code, .. } => *status_code,
            Error::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Re-tag this error as an upstream failure at `stage`
    ///
    /// `NotFound` is collapsed too: a missing linked resource is a data
    /// integrity problem upstream, not a missing pokemon.
    pub fn into_upstream(self, stage: Stage) -> Self {
        match self {
            Error::Upstream { .. } => self,
            other => {
                let status_code = other.status_code();
                Error::Upstream {
                    stage,
                    message: other.to_string(),
                    status_code,
                    source: Some(anyhow::Error::new(other)),
                }
            }
        }
    }
}
