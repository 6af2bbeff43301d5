use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info};

use super::{TranslationMap, TranslationRecord, TranslationStore};
use crate::retry::{with_retry, RetryConfig};

/// PostgreSQL-backed store; each language is one row with a JSONB document
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct TranslationRow {
    lang: String,
    translations: Json<TranslationMap>,
    updated_at: DateTime<Utc>,
}

impl From<TranslationRow> for TranslationRecord {
    fn from(row: TranslationRow) -> Self {
        Self {
            lang: row.lang,
            translations: row.translations.0,
            updated_at: row.updated_at,
        }
    }
}

impl PgStore {
    /// Connect (with retries) and make sure the schema exists
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = with_retry(&RetryConfig::store_connect(), "PostgreSQL connect", || {
            PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(database_url)
        })
        .await
        .context("Failed to connect to PostgreSQL")?;

        let store = Self { pool };
        store.init_schema().await?;
        info!("PostgreSQL connection established");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS translations (
                lang TEXT PRIMARY KEY,
                translations JSONB NOT NULL DEFAULT '{}'::jsonb,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create translations table")?;

        Ok(())
    }
}

#[async_trait]
impl TranslationStore for PgStore {
    async fn find_all(&self) -> Result<Vec<TranslationRecord>> {
        let rows: Vec<TranslationRow> = sqlx::query_as(
            "SELECT lang, translations, updated_at FROM translations ORDER BY lang",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TranslationRecord::from).collect())
    }

    async fn find_languages(&self) -> Result<Vec<String>> {
        let langs: Vec<String> = sqlx::query_scalar("SELECT lang FROM translations ORDER BY lang")
            .fetch_all(&self.pool)
            .await?;

        Ok(langs)
    }

    async fn find_one(&self, lang: &str) -> Result<Option<TranslationRecord>> {
        let row: Option<TranslationRow> = sqlx::query_as(
            "SELECT lang, translations, updated_at FROM translations WHERE lang = $1",
        )
        .bind(lang)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TranslationRecord::from))
    }

    async fn save(&self, record: TranslationRecord) -> Result<TranslationRecord> {
        debug!("Saving translation record for {}", record.lang);

        let row: TranslationRow = sqlx::query_as(
            r#"
            INSERT INTO translations (lang, translations, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (lang) DO UPDATE
                SET translations = EXCLUDED.translations,
                    updated_at = EXCLUDED.updated_at
            RETURNING lang, translations, updated_at
            "#,
        )
        .bind(&record.lang)
        .bind(Json(&record.translations))
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn insert_if_absent(&self, record: TranslationRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO translations (lang, translations, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (lang) DO NOTHING
            "#,
        )
        .bind(&record.lang)
        .bind(Json(&record.translations))
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_one(&self, lang: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM translations WHERE lang = $1")
            .bind(lang)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
