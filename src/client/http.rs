use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{ClientError, ClientResult};
use crate::api::{AddLanguageRequest, DeleteKeyQuery, HealthResponse, SuccessResponse};
use crate::config::Config;
use crate::languages::Language;
use crate::store::{TranslationMap, TranslationRecord};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the translation service
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:3000/api`
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.api_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with percent-encoded path segments appended
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Decode a success body, or turn the service's `{error}` body into an error
    async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let response = self.http.get(self.url(&["test"])?).send().await?;
        Self::parse(response).await
    }

    pub async fn languages(&self) -> ClientResult<Vec<Language>> {
        debug!("Fetching languages from {}", self.base_url);
        let response = self.http.get(self.url(&["languages"])?).send().await?;
        Self::parse(response).await
    }

    pub async fn add_language(&self, code: &str, name: &str) -> ClientResult<Language> {
        let request = AddLanguageRequest {
            code: code.to_string(),
            name: name.to_string(),
        };
        let response = self
            .http
            .post(self.url(&["languages"])?)
            .json(&request)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_language(&self, code: &str) -> ClientResult<()> {
        let response = self
            .http
            .delete(self.url(&["languages", code])?)
            .send()
            .await?;
        let _: SuccessResponse = Self::parse(response).await?;
        Ok(())
    }

    pub async fn all_translations(&self) -> ClientResult<Vec<TranslationRecord>> {
        let response = self.http.get(self.url(&["translations"])?).send().await?;
        Self::parse(response).await
    }

    pub async fn translations(&self, lang: &str) -> ClientResult<TranslationMap> {
        debug!("Fetching translations for {}", lang);
        let response = self
            .http
            .get(self.url(&["translations", lang])?)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Merge `partial` into `lang` on the server; returns the full merged map
    pub async fn upsert_translations(
        &self,
        lang: &str,
        partial: &TranslationMap,
    ) -> ClientResult<TranslationMap> {
        let response = self
            .http
            .post(self.url(&["translations", lang])?)
            .json(partial)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Remove `key` from `lang`; the key goes in the query string so any
    /// string, `""` and `..` included, reaches the server unchanged
    pub async fn delete_translation_key(&self, lang: &str, key: &str) -> ClientResult<TranslationMap> {
        let query = DeleteKeyQuery {
            key: key.to_string(),
        };
        let response = self
            .http
            .delete(self.url(&["translations", lang])?)
            .query(&query)
            .send()
            .await?;
        Self::parse(response).await
    }
}
