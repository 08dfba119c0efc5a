//! Cached translation with term preservation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, warn};

use campus_core::config::TranslationConfig;
use campus_core::error::AppError;
use campus_core::result::AppResult;
use campus_core::traits::LocalStore;
use campus_service::AppContext;
use campus_store::keys;

use super::terms::UntranslatableTerms;
use super::translator::{HttpTranslator, Translator};

/// Translates UI and notification text for the current user.
///
/// Results are cached per `target:text` for the lifetime of the service.
/// When the backend fails the original text is returned.
#[derive(Debug, Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
    terms: Arc<UntranslatableTerms>,
    cache: Cache<String, String>,
    source: String,
    local: Arc<dyn LocalStore>,
}

impl TranslationService {
    /// Build a service over any backend.
    pub fn new(
        config: &TranslationConfig,
        translator: Arc<dyn Translator>,
        local: Arc<dyn LocalStore>,
    ) -> AppResult<Self> {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();
        Ok(Self {
            translator,
            terms: Arc::new(UntranslatableTerms::new(config.preserved_terms.iter().cloned())?),
            cache,
            source: normalize(&config.source_language),
            local,
        })
    }

    /// Build a service over the HTTP backend configured in `ctx`.
    pub fn from_context(ctx: &AppContext) -> AppResult<Self> {
        let config = ctx.config();
        let translator = HttpTranslator::new(
            &config.translation,
            Duration::from_secs(config.client.timeout_seconds),
        )?;
        Self::new(&config.translation, Arc::new(translator), ctx.local().clone())
    }

    /// Language content is authored in.
    pub fn source_language(&self) -> &str {
        &self.source
    }

    /// Translate `text` into `target`.
    pub async fn translate(&self, text: &str, target: &str) -> String {
        let target = normalize(target);
        if text.trim().is_empty() || target.is_empty() || target == self.source {
            return text.to_string();
        }

        let key = format!("{target}:{text}");
        if let Some(hit) = self.cache.get(&key).await {
            debug!(target = %target, "Translation cache hit");
            return hit;
        }

        let protected = self.terms.protect(text);
        match self
            .translator
            .translate(&protected.text, &self.source, &target)
            .await
        {
            Ok(translated) => {
                let restored = self.terms.restore(&translated, &protected.originals);
                self.cache.insert(key, restored.clone()).await;
                restored
            }
            Err(e) => {
                warn!(target = %target, error = %e, "Translation failed, keeping original text");
                text.to_string()
            }
        }
    }

    /// Translate into the user's preferred language.
    pub async fn translate_for_user(&self, text: &str) -> String {
        let target = self.preferred_language().await;
        self.translate(text, &target).await
    }

    /// The stored preferred language, or the source language.
    pub async fn preferred_language(&self) -> String {
        match self.local.get(keys::PREFERRED_LANGUAGE).await {
            Ok(Some(raw)) => {
                let lang = normalize(raw.trim_matches('"'));
                if lang.is_empty() { self.source.clone() } else { lang }
            }
            Ok(None) => self.source.clone(),
            Err(e) => {
                warn!(error = %e, "Failed to read preferred language");
                self.source.clone()
            }
        }
    }

    /// Store the preferred language. Accepts codes such as `en` or `pt-BR`.
    pub async fn set_preferred_language(&self, lang: &str) -> AppResult<String> {
        let lang = normalize(lang);
        let valid = !lang.is_empty()
            && lang.len() <= 8
            && lang.chars().all(|c| c.is_ascii_alphabetic() || c == '-');
        if !valid {
            return Err(AppError::validation(format!("Invalid language code '{lang}'")));
        }
        self.local.set(keys::PREFERRED_LANGUAGE, &lang).await?;
        Ok(lang)
    }
}

fn normalize(lang: &str) -> String {
    lang.trim().to_ascii_lowercase()
}
