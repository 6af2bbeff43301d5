//! Document store for translation records.
//!
//! One record per language code, each holding an open-ended key → string map.
//! Every method is a single-document operation; nothing here spans records or
//! holds locks across calls.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

/// Key → translated string for one language
pub type TranslationMap = BTreeMap<String, String>;

/// Persisted document mapping a language code to its dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub lang: String,
    #[serde(default)]
    pub translations: TranslationMap,
    pub updated_at: DateTime<Utc>,
}

impl TranslationRecord {
    /// A record with no translations yet
    pub fn empty(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            translations: TranslationMap::new(),
            updated_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait TranslationStore: Send + Sync {
    /// All records, ordered by language code
    async fn find_all(&self) -> Result<Vec<TranslationRecord>>;

    /// Language codes of all records, ordered
    async fn find_languages(&self) -> Result<Vec<String>>;

    /// The record for `lang`, if any
    async fn find_one(&self, lang: &str) -> Result<Option<TranslationRecord>>;

    /// Insert or replace the record for `record.lang`
    async fn save(&self, record: TranslationRecord) -> Result<TranslationRecord>;

    /// Insert `record` unless one already exists; returns whether it was inserted
    async fn insert_if_absent(&self, record: TranslationRecord) -> Result<bool>;

    /// Delete the record for `lang`; returns whether one existed
    async fn delete_one(&self, lang: &str) -> Result<bool>;
}

/// Open the store selected by the configuration
pub async fn connect(config: &Config) -> Result<Arc<dyn TranslationStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            info!("Using PostgreSQL translation store");
            Ok(Arc::new(store))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory translation store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
