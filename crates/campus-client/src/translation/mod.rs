//! Machine translation with caching and term preservation.

pub mod service;
pub mod terms;
pub mod translator;

pub use service::TranslationService;
pub use terms::{Protected, UntranslatableTerms};
pub use translator::{HttpTranslator, Translator};
