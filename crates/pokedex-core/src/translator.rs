//! FunTranslations client
//!
//! Every failure mode (transport fault, non-success status, undecodable
//! envelope, populated `error` object, missing translated text) is reported as
//! [`Error::TranslationUnavailable`] with whatever code and message the
//! upstream provided.

use async_trait::async_trait;

use crate::error::{Error, Result, Stage};
use crate::http::{HttpClient, HttpClientConfig, HttpError};
use crate::types::{TranslationResponse, TranslationVariant};

/// Default FunTranslations base URL
pub const DEFAULT_TRANSLATOR_URL: &str = "https://api.funtranslations.com";

/// Text translation service
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `variant`
    async fn translate(&self, text: &str, variant: TranslationVariant) -> Result<String>;
}

/// [`Translator`] backed by the FunTranslations API
#[derive(Debug, Clone)]
pub struct FunTranslationsClient {
    http: HttpClient,
}

impl FunTranslationsClient {
    /// Create a client for the FunTranslations instance at `base_url`
    pub fn new(base_url: &str, config: HttpClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(base_url, config)?,
        })
    }

    fn unavailable(variant: TranslationVariant, error: HttpError) -> Error {
        tracing::warn!(
            stage = %Stage::Translation,
            %variant,
            status = ?error.status_code,
            code = ?error.upstream_code,
            "Translation request failed: {}",
            error.message
        );

        Error::TranslationUnavailable {
            variant,
            code: error.upstream_code,
            message: error.message,
        }
    }

    /// Extract the translated text from a decoded envelope
    fn extract_translation(variant: TranslationVariant, response: TranslationResponse) -> Result<String> {
        if let Some(error) = response.error {
            let code = error.code_string();
            let message = error
                .message
                .unwrap_or_else(|| "translation service reported an error".to_string());

            tracing::warn!(
                stage = %Stage::Translation,
                %variant,
                code = ?code,
                "Translation service returned an error: {}",
                message
            );
            return Err(Error::TranslationUnavailable { variant, code, message });
        }

        response
            .contents
            .and_then(|contents| contents.translated)
            .ok_or_else(|| Error::TranslationUnavailable {
                variant,
                code: None,
                message: "response carried no translated text".to_string(),
            })
    }
}

#[async_trait]
impl Translator for FunTranslationsClient {
    async fn translate(&self, text: &str, variant: TranslationVariant) -> Result<String> {
        let mut url = self
            .http
            .endpoint(&["translate", variant.endpoint()])
            .map_err(|e| Self::unavailable(variant, e))?;
        url.query_pairs_mut().append_pair("text", text);

        let response: TranslationResponse = self
            .http
            .get_json(url)
            .await
            .map_err(|e| Self::unavailable(variant, e))?;

        let translated = Self::extract_translation(variant, response)?;
        tracing::info!(stage = %Stage::Translation, %variant, "Description translated");
        Ok(translated)
    }
}
