//! Language registry: display names for known language codes.
//!
//! Language existence is decided by the store (a language exists when it has a
//! translation record). This registry only supplies the human-readable label
//! shown next to a code, falling back to the code itself for unknown ones.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A language as exposed by the API and held by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// Short identifier (e.g. "tr", "en")
    pub code: String,

    /// Human-readable label
    pub name: String,

    /// Always true; nothing deactivates a language
    pub is_active: bool,
}

impl Language {
    /// Build an active language whose name comes from the registry.
    pub fn from_code(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: LanguageRegistry::get().display_name(code).to_string(),
            is_active: true,
        }
    }

    /// Build an active language with an explicit name.
    pub fn with_name(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            is_active: true,
        }
    }

    /// The list the client starts with before the server answers.
    pub fn defaults() -> Vec<Language> {
        vec![Language::from_code("tr"), Language::from_code("en")]
    }
}

/// Static metadata for a known language code.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 code
    pub code: &'static str,

    /// Native name used as the display label
    pub native_name: &'static str,
}

/// Global registry of known display names.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global registry instance, initializing it on first use.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: known_languages(),
        })
    }

    /// Look up a language configuration by code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Display name for `code`, or `code` itself when unknown.
    pub fn display_name<'a>(&self, code: &'a str) -> &'a str {
        self.get_by_code(code)
            .map(|lang| lang.native_name)
            .unwrap_or(code)
    }
}

fn known_languages() -> Vec<LanguageConfig> {
    [
        ("tr", "Türkçe"),
        ("en", "English"),
        ("fr", "Français"),
        ("de", "Deutsch"),
        ("es", "Español"),
        ("it", "Italiano"),
        ("ru", "Русский"),
        ("ar", "العربية"),
        ("zh", "中文"),
        ("ja", "日本語"),
    ]
    .into_iter()
    .map(|(code, native_name)| LanguageConfig { code, native_name })
    .collect()
}
