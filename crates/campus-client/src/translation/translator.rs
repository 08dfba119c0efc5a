//! Translation backends.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use campus_core::config::TranslationConfig;
use campus_core::error::AppError;
use campus_core::result::AppResult;

use crate::api::auth::{check, map_reqwest};

/// A machine translation backend.
#[async_trait]
pub trait Translator: Send + Sync + std::fmt::Debug + 'static {
    /// Translate `text` from `source` to `target`.
    async fn translate(&self, text: &str, source: &str, target: &str) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// Translator speaking the LibreTranslate-style JSON API.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    /// Build from configuration.
    pub fn new(config: &TranslationConfig, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> AppResult<String> {
        let body = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest)?;
        let TranslateResponse { translated_text } =
            check(response).await?.json().await.map_err(map_reqwest)?;
        Ok(translated_text)
    }
}
