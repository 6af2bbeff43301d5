//! Admin view: languages, every translation key and per-language values.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{error, info};

use crate::client::{ApiClient, FanOutReport, TranslationState};
use crate::languages::Language;
use crate::store::TranslationRecord;

/// User-visible alert text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAlert(pub String);

impl std::fmt::Display for AdminAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLanguageForm {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTranslationForm {
    pub key: String,
    /// Language code → value; languages left out get an empty string
    pub translations: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct AdminView {
    api: ApiClient,
    state: Arc<TranslationState>,
    languages: Vec<Language>,
    translations: Vec<TranslationRecord>,
    pub new_language: NewLanguageForm,
    pub new_translation: NewTranslationForm,
}

impl AdminView {
    pub fn new(state: Arc<TranslationState>) -> Self {
        Self {
            api: state.api().clone(),
            state,
            languages: Vec::new(),
            translations: Vec::new(),
            new_language: NewLanguageForm::default(),
            new_translation: NewTranslationForm::default(),
        }
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn records(&self) -> &[TranslationRecord] {
        &self.translations
    }

    /// Reload languages and all records; each side fails independently
    pub async fn load_data(&mut self) {
        let (languages, translations) =
            tokio::join!(self.api.languages(), self.api.all_translations());

        match languages {
            Ok(languages) => {
                info!("Loaded {} languages", languages.len());
                self.languages = languages;
            }
            Err(e) => error!("Error loading languages: {}", e),
        }

        match translations {
            Ok(translations) => {
                info!("Loaded {} translation records", translations.len());
                self.translations = translations;
            }
            Err(e) => error!("Error loading translations: {}", e),
        }
    }

    /// Submit the new-language form.
    ///
    /// Does nothing unless both code and name are filled in. A failure is
    /// returned as alert text for the operator.
    pub async fn add_language(&mut self) -> Result<Option<Language>, AdminAlert> {
        if self.new_language.code.is_empty() || self.new_language.name.is_empty() {
            return Ok(None);
        }

        info!("Adding language {:?}", self.new_language);
        match self
            .state
            .add_language(&self.new_language.code, &self.new_language.name)
            .await
        {
            Ok(language) => {
                self.load_data().await;
                self.new_language = NewLanguageForm::default();
                Ok(Some(language))
            }
            Err(e) => {
                error!("Error adding language: {}", e);
                Err(AdminAlert(format!("Failed to add language: {}", e)))
            }
        }
    }

    pub async fn delete_language(&mut self, code: &str) {
        match self.state.delete_language(code).await {
            Ok(()) => self.load_data().await,
            Err(e) => error!("Error deleting language: {}", e),
        }
    }

    /// Submit the new-key form: one write per listed language.
    ///
    /// Returns `None` when no key was entered.
    pub async fn add_translation(&mut self) -> Option<FanOutReport> {
        if self.new_translation.key.is_empty() {
            return None;
        }

        let values: BTreeMap<String, String> = self
            .languages
            .iter()
            .map(|lang| {
                let value = self
                    .new_translation
                    .translations
                    .get(&lang.code)
                    .cloned()
                    .unwrap_or_default();
                (lang.code.clone(), value)
            })
            .collect();

        let key = std::mem::take(&mut self.new_translation).key;
        let report = self.state.add_new_translation(&key, &values).await;
        self.load_data().await;
        Some(report)
    }

    /// Edit one key for one language
    pub async fn update_translation(&mut self, key: &str, lang: &str, value: &str) {
        match self.state.update_translation_for_key(key, lang, value).await {
            Ok(()) => {
                if let Some(record) = self.translations.iter_mut().find(|r| r.lang == lang) {
                    record
                        .translations
                        .insert(key.to_string(), value.to_string());
                }
            }
            Err(e) => error!("Error updating '{}' for {}: {}", key, lang, e),
        }
    }

    /// Remove `key` from every listed language that has a record
    pub async fn delete_translation_key(&mut self, key: &str) -> FanOutReport {
        let langs: Vec<String> = self
            .languages
            .iter()
            .filter(|lang| self.translations.iter().any(|r| r.lang == lang.code))
            .map(|lang| lang.code.clone())
            .collect();

        let report = self.state.delete_key_everywhere(key, &langs).await;
        if !report.succeeded.is_empty() {
            self.load_data().await;
        }
        report
    }

    /// Union of keys across all loaded records, in first-seen order
    pub fn all_keys(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.translations
            .iter()
            .flat_map(|record| record.translations.keys())
            .filter(|key| seen.insert(key.as_str()))
            .cloned()
            .collect()
    }

    /// Stored value of `key` for `lang`, if any
    pub fn value(&self, key: &str, lang: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|r| r.lang == lang)
            .and_then(|r| r.translations.get(key))
            .map(String::as_str)
    }

    /// Keys × languages table
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.state.translate("admin.title"));

        let languages: Vec<String> = self
            .languages
            .iter()
            .map(|l| format!("{} ({})", l.name, l.code))
            .collect();
        let _ = writeln!(out, "Languages: {}", languages.join(", "));

        let keys = self.all_keys();
        if keys.is_empty() {
            let _ = writeln!(out, "(no translation keys)");
            return out;
        }

        let key_width = keys.iter().map(|k| k.chars().count()).max().unwrap_or(0).max(3);
        let mut header = format!("{:<width$}", "key", width = key_width);
        for lang in &self.languages {
            let _ = write!(header, " | {}", lang.code);
        }
        let _ = writeln!(out, "{}", header);
        let _ = writeln!(out, "{}", "-".repeat(header.chars().count()));

        for key in &keys {
            let mut row = format!("{:<width$}", key, width = key_width);
            for lang in &self.languages {
                let _ = write!(row, " | {}", self.value(key, &lang.code).unwrap_or("-"));
            }
            let _ = writeln!(out, "{}", row);
        }

        out
    }
}
