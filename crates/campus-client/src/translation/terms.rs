//! Terms that must come back from translation unchanged.

use regex::{Captures, Regex};

use campus_core::error::AppError;
use campus_core::result::AppResult;

/// Text with its protected terms swapped for placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protected {
    /// Text to send to the translator.
    pub text: String,
    /// Original spellings, indexed by placeholder number.
    pub originals: Vec<String>,
}

/// Finds protected terms and swaps them for opaque placeholders.
///
/// Matching is case-insensitive on whole words, longest term first, so
/// "Google Meet" wins over a shorter overlapping term.
#[derive(Debug, Clone)]
pub struct UntranslatableTerms {
    terms: Vec<String>,
    matcher: Option<Regex>,
    placeholder: Regex,
}

impl UntranslatableTerms {
    /// Build a matcher over `terms`. Blank terms are ignored.
    pub fn new<I, S>(terms: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(Into::into)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        });
        terms.dedup_by(|a, b| a.eq_ignore_ascii_case(b));

        let matcher = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"(?i)\b(?:{alternation})\b"))?)
        };
        // Translators sometimes insert spaces or change case inside tokens.
        let placeholder = compile(r"(?i)_\s*_\s*t\s*(\d+)\s*_\s*_")?;

        Ok(Self {
            terms,
            matcher,
            placeholder,
        })
    }

    /// The configured terms, longest first.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Replace every protected term with a numbered placeholder.
    pub fn protect(&self, text: &str) -> Protected {
        let Some(matcher) = &self.matcher else {
            return Protected {
                text: text.to_string(),
                originals: Vec::new(),
            };
        };
        let mut originals = Vec::new();
        let text = matcher
            .replace_all(text, |caps: &Captures<'_>| {
                let index = originals.len();
                originals.push(caps[0].to_string());
                format!("__T{index}__")
            })
            .into_owned();
        Protected { text, originals }
    }

    /// Put the original terms back into translated text. Placeholders with
    /// an unknown index are left as they are.
    pub fn restore(&self, translated: &str, originals: &[String]) -> String {
        if originals.is_empty() {
            return translated.to_string();
        }
        self.placeholder
            .replace_all(translated, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| originals.get(i))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn compile(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| AppError::configuration(format!("Invalid term pattern: {e}")))
}
