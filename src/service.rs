//! Translation service: CRUD over languages and translation records.
//!
//! Languages are not stored on their own. A language exists exactly when a
//! translation record exists for its code, and its display name is resolved
//! from the registry at read time.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::languages::Language;
use crate::store::{TranslationMap, TranslationRecord, TranslationStore};

#[derive(Clone)]
pub struct TranslationService {
    store: Arc<dyn TranslationStore>,
}

impl TranslationService {
    pub fn new(store: Arc<dyn TranslationStore>) -> Self {
        Self { store }
    }

    /// All translation records, full documents
    pub async fn list_translations(&self) -> ApiResult<Vec<TranslationRecord>> {
        let records = self.store.find_all().await?;
        info!("Loaded {} translation records", records.len());
        Ok(records)
    }

    /// The translation map for `lang`
    pub async fn get_translations(&self, lang: &str) -> ApiResult<TranslationMap> {
        match self.store.find_one(lang).await? {
            Some(record) => Ok(record.translations),
            None => Err(ApiError::NotFound("Translation not found".to_string())),
        }
    }

    /// Merge `partial` into the map for `lang`, creating the record if absent.
    ///
    /// Keys in `partial` overwrite existing values; all other keys are kept.
    /// The read and the write are separate store calls, so two concurrent
    /// upserts for the same language can lose one side's keys.
    pub async fn upsert_translations(
        &self,
        lang: &str,
        partial: TranslationMap,
    ) -> ApiResult<TranslationMap> {
        let mut record = self
            .store
            .find_one(lang)
            .await?
            .unwrap_or_else(|| TranslationRecord::empty(lang));

        record.translations.extend(partial);
        record.updated_at = Utc::now();

        let saved = self.store.save(record).await?;
        Ok(saved.translations)
    }

    /// Remove a single key from `lang`'s map and return what remains
    pub async fn delete_translation_key(&self, lang: &str, key: &str) -> ApiResult<TranslationMap> {
        let mut record = self
            .store
            .find_one(lang)
            .await?
            .ok_or_else(|| ApiError::NotFound("Translation not found".to_string()))?;

        if record.translations.remove(key).is_none() {
            return Ok(record.translations);
        }
        record.updated_at = Utc::now();

        let saved = self.store.save(record).await?;
        Ok(saved.translations)
    }

    /// Languages derived from the stored translation records
    pub async fn list_languages(&self) -> ApiResult<Vec<Language>> {
        let codes = self.store.find_languages().await?;
        Ok(codes.iter().map(|code| Language::from_code(code)).collect())
    }

    /// Create an empty record for `code`.
    ///
    /// `name` is echoed back but never stored; listings always resolve the
    /// name from the registry.
    pub async fn add_language(&self, code: &str, name: &str) -> ApiResult<Language> {
        let inserted = self
            .store
            .insert_if_absent(TranslationRecord::empty(code))
            .await?;

        if !inserted {
            info!("Language already exists: {}", code);
            return Err(ApiError::Conflict("Language already exists".to_string()));
        }

        info!("Added language {}", code);
        Ok(Language::with_name(code, name))
    }

    /// Delete the record for `code`; absent codes are not an error
    pub async fn delete_language(&self, code: &str) -> ApiResult<()> {
        let removed = self.store.delete_one(code).await?;
        info!("Deleted language {} (existed: {})", code, removed);
        Ok(())
    }
}
