//! # campus-client
//!
//! Outbound HTTP clients for Campus Notify:
//!
//! - [`api`]: the REST backend (authentication, profile, calendar events,
//!   reference lists) with bearer tokens and bounded retries
//! - [`translation`]: cached machine translation that leaves domain terms intact

pub mod api;
pub mod translation;

pub use api::ApiClient;
pub use translation::{HttpTranslator, TranslationService, Translator, UntranslatableTerms};
