//! Observable translation cache shared by every view.
//!
//! Holds the active language, the language list and a key → language → value
//! table. Views read snapshots or subscribe to change notifications; all
//! mutations go through the named methods below.
//!
//! Fetches triggered by a language switch are neither cancelled nor ordered:
//! whichever response arrives last is what the table shows.

use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{ApiClient, ClientError, ClientResult, Preferences};
use crate::languages::Language;
use crate::store::{TranslationMap, TranslationRecord};

/// Key → language code → translated value
pub type TranslationTable = BTreeMap<String, BTreeMap<String, String>>;

/// Shown when the active code is not in the language list
pub const LANGUAGE_PLACEHOLDER: &str = "Choose language";

const DEFAULT_LANGUAGE: &str = "tr";

/// Outcome of an operation sent once per language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutReport {
    /// Languages whose request succeeded (and were applied locally)
    pub succeeded: Vec<String>,
    /// Languages whose request failed, with the error message
    pub failed: Vec<(String, String)>,
}

impl FanOutReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct TranslationState {
    api: ApiClient,
    preferences: Arc<dyn Preferences>,
    current_lang: watch::Sender<String>,
    languages: watch::Sender<Vec<Language>>,
    translations: watch::Sender<TranslationTable>,
}

impl std::fmt::Debug for TranslationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationState")
            .field("api", &self.api.base_url())
            .field("current_lang", &*self.current_lang.borrow())
            .field("languages", &self.languages.borrow().len())
            .field("keys", &self.translations.borrow().len())
            .finish()
    }
}

impl TranslationState {
    /// State with defaults and the saved language restored; nothing fetched yet
    pub fn new(api: ApiClient, preferences: Arc<dyn Preferences>) -> Arc<Self> {
        let initial = preferences
            .language()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        debug!("Initial language: {}", initial);

        Arc::new(Self {
            api,
            preferences,
            current_lang: watch::channel(initial).0,
            languages: watch::channel(Language::defaults()).0,
            translations: watch::channel(TranslationTable::new()).0,
        })
    }

    /// Restore the saved language, then load the language list, then the
    /// active language's translations. Failures are logged and leave defaults.
    pub async fn initialize(api: ApiClient, preferences: Arc<dyn Preferences>) -> Arc<Self> {
        let state = Self::new(api, preferences);

        match state.load_languages().await {
            Ok(_) => {
                let lang = state.current_language();
                state.load_translations(&lang).await;
            }
            Err(e) => error!("Error loading languages: {}", e),
        }

        state
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ==================== Loading ====================

    /// Fetch the language list and publish it
    pub async fn load_languages(&self) -> ClientResult<Vec<Language>> {
        info!("Loading languages");
        let languages = self.api.languages().await?;
        info!("Received {} languages", languages.len());
        self.languages.send_replace(languages.clone());
        Ok(languages)
    }

    /// Fetch `lang`'s map and replace the table with it; errors are logged
    pub async fn load_translations(&self, lang: &str) {
        match self.api.translations(lang).await {
            Ok(map) => {
                let table = map
                    .into_iter()
                    .map(|(key, value)| (key, BTreeMap::from([(lang.to_string(), value)])))
                    .collect();
                self.translations.send_replace(table);
            }
            Err(e) => error!("Error loading translations for {}: {}", lang, e),
        }
    }

    /// Switch the active language, persist it and refetch in the background.
    ///
    /// Returns the fetch task; awaiting it is optional.
    pub fn set_language(self: &Arc<Self>, code: &str) -> JoinHandle<()> {
        info!("Setting language to {}", code);
        self.current_lang.send_replace(code.to_string());

        if let Err(e) = self.preferences.set_language(code) {
            warn!("Could not persist language choice: {}", e);
        }

        let state = Arc::clone(self);
        let code = code.to_string();
        tokio::spawn(async move { state.load_translations(&code).await })
    }

    // ==================== Reads ====================

    pub fn current_language(&self) -> String {
        self.current_lang.borrow().clone()
    }

    /// Value of `key` in the active language, or `key` itself when missing
    pub fn translate(&self, key: &str) -> String {
        let lang = self.current_lang.borrow();
        self.translations
            .borrow()
            .get(key)
            .and_then(|by_lang| by_lang.get(lang.as_str()))
            .filter(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn languages(&self) -> Vec<Language> {
        self.languages.borrow().clone()
    }

    /// Name of the active language, or the placeholder if it is not listed
    pub fn current_language_name(&self) -> String {
        let lang = self.current_lang.borrow();
        self.languages
            .borrow()
            .iter()
            .find(|l| l.code == *lang)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| LANGUAGE_PLACEHOLDER.to_string())
    }

    pub fn translations(&self) -> TranslationTable {
        self.translations.borrow().clone()
    }

    pub fn subscribe_language(&self) -> watch::Receiver<String> {
        self.current_lang.subscribe()
    }

    pub fn subscribe_languages(&self) -> watch::Receiver<Vec<Language>> {
        self.languages.subscribe()
    }

    pub fn subscribe_translations(&self) -> watch::Receiver<TranslationTable> {
        self.translations.subscribe()
    }

    // ==================== Passthroughs ====================

    /// All records pivoted into a key → language → value table
    pub async fn all_translations_formatted(&self) -> ClientResult<TranslationTable> {
        let records = self.api.all_translations().await?;
        Ok(pivot(&records))
    }

    pub async fn add_language(&self, code: &str, name: &str) -> ClientResult<Language> {
        let language = self.api.add_language(code, name).await?;
        self.languages.send_modify(|languages| {
            if !languages.iter().any(|l| l.code == language.code) {
                languages.push(language.clone());
            }
        });
        Ok(language)
    }

    pub async fn delete_language(&self, code: &str) -> ClientResult<()> {
        self.api.delete_language(code).await?;
        self.languages
            .send_modify(|languages| languages.retain(|l| l.code != code));
        self.translations.send_modify(|table| {
            for by_lang in table.values_mut() {
                by_lang.remove(code);
            }
            table.retain(|_, by_lang| !by_lang.is_empty());
        });
        Ok(())
    }

    /// Upsert passthrough that logs failures instead of returning them
    pub async fn update_translation(
        &self,
        lang: &str,
        translations: &TranslationMap,
    ) -> Option<TranslationMap> {
        match self.api.upsert_translations(lang, translations).await {
            Ok(merged) => Some(merged),
            Err(e) => {
                error!("Error updating translations for {}: {}", lang, e);
                None
            }
        }
    }

    /// Set one key for one language, then apply it locally
    pub async fn update_translation_for_key(
        &self,
        key: &str,
        lang: &str,
        value: &str,
    ) -> ClientResult<()> {
        let partial = TranslationMap::from([(key.to_string(), value.to_string())]);
        self.api.upsert_translations(lang, &partial).await?;
        self.apply_value(key, lang, value);
        Ok(())
    }

    /// Send `key` to every language in `values`, one request per language.
    ///
    /// Each success is applied locally as soon as it resolves; failures are
    /// logged and reported, earlier successes stay in place.
    pub async fn add_new_translation(
        &self,
        key: &str,
        values: &BTreeMap<String, String>,
    ) -> FanOutReport {
        let requests = values.iter().map(|(lang, value)| async move {
            let partial = TranslationMap::from([(key.to_string(), value.clone())]);
            let result = self.api.upsert_translations(lang, &partial).await;
            if result.is_ok() {
                self.apply_value(key, lang, value);
            }
            (lang.clone(), result.map(|_| ()))
        });

        collect_report("update", key, join_all(requests).await)
    }

    /// Remove `key` from each of `langs`, one request per language
    pub async fn delete_key_everywhere(&self, key: &str, langs: &[String]) -> FanOutReport {
        let requests = langs.iter().map(|lang| async move {
            let result = self.api.delete_translation_key(lang, key).await;
            if result.is_ok() {
                self.remove_value(key, lang);
            }
            (lang.clone(), result.map(|_| ()))
        });

        collect_report("delete", key, join_all(requests).await)
    }

    fn apply_value(&self, key: &str, lang: &str, value: &str) {
        self.translations.send_modify(|table| {
            table
                .entry(key.to_string())
                .or_default()
                .insert(lang.to_string(), value.to_string());
        });
    }

    fn remove_value(&self, key: &str, lang: &str) {
        self.translations.send_modify(|table| {
            if let Some(by_lang) = table.get_mut(key) {
                by_lang.remove(lang);
                if by_lang.is_empty() {
                    table.remove(key);
                }
            }
        });
    }
}

fn collect_report(
    action: &str,
    key: &str,
    results: Vec<(String, Result<(), ClientError>)>,
) -> FanOutReport {
    let mut report = FanOutReport::default();
    for (lang, result) in results {
        match result {
            Ok(()) => report.succeeded.push(lang),
            Err(e) => {
                error!("Error on {} of '{}' for {}: {}", action, key, lang, e);
                report.failed.push((lang, e.to_string()));
            }
        }
    }
    report
}

/// Pivot per-language records into a key → language → value table
pub(crate) fn pivot(records: &[TranslationRecord]) -> TranslationTable {
    let mut table = TranslationTable::new();
    for record in records {
        for (key, value) in &record.translations {
            table
                .entry(key.clone())
                .or_default()
                .insert(record.lang.clone(), value.clone());
        }
    }
    table
}
