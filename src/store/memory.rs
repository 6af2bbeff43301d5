use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{TranslationRecord, TranslationStore};

/// In-process store, used when no database is configured and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, TranslationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given records
    pub fn with_records(records: impl IntoIterator<Item = TranslationRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.lang.clone(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<TranslationRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_languages(&self) -> Result<Vec<String>> {
        Ok(self.records.read().await.keys().cloned().collect())
    }

    async fn find_one(&self, lang: &str) -> Result<Option<TranslationRecord>> {
        Ok(self.records.read().await.get(lang).cloned())
    }

    async fn save(&self, record: TranslationRecord) -> Result<TranslationRecord> {
        self.records
            .write()
            .await
            .insert(record.lang.clone(), record.clone());
        Ok(record)
    }

    async fn insert_if_absent(&self, record: TranslationRecord) -> Result<bool> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.lang) {
            return Ok(false);
        }
        records.insert(record.lang.clone(), record);
        Ok(true)
    }

    async fn delete_one(&self, lang: &str) -> Result<bool> {
        Ok(self.records.write().await.remove(lang).is_some())
    }
}
