//! HTTP/JSON API of the translation service.
//!
//! ## Endpoints (all under the configured prefix, `/api` by default)
//! - GET    /test                     - liveness message
//! - GET    /languages                - languages derived from stored records
//! - POST   /languages                - add a language (`{code, name}`)
//! - DELETE /languages/:lang          - delete a language, always succeeds
//! - GET    /translations             - all translation records
//! - GET    /translations/:lang       - translation map of one language
//! - POST   /translations/:lang       - merge a partial map into a language
//! - DELETE /translations/:lang?key=  - remove one key from a language
//!
//! Keys travel in the query string: any string is a valid key, including
//! `""`, `.` and `..`, which cannot be carried in a path segment.
//!
//! Errors, unknown paths and unsupported methods included, are returned as
//! `{"error": message}`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::error::ApiError;
use crate::languages::Language;
use crate::service::TranslationService;
use crate::store::{TranslationMap, TranslationRecord};

/// Request body of `POST /languages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLanguageRequest {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

/// Query string of `DELETE /translations/:lang`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteKeyQuery {
    pub key: String,
}

/// Body of `DELETE /languages/:lang`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Body of `GET /test`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub message: String,
}

/// App state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    pub service: TranslationService,
}

/// Routes without a prefix or middleware
pub fn routes(service: TranslationService) -> Router {
    Router::new()
        .route("/test", json_methods(get(health)))
        .route(
            "/languages",
            json_methods(get(list_languages).post(add_language)),
        )
        .route("/languages/:lang", json_methods(delete(delete_language)))
        .route("/translations", json_methods(get(list_translations)))
        .route(
            "/translations/:lang",
            json_methods(
                get(get_translations)
                    .post(upsert_translations)
                    .delete(delete_translation_key),
            ),
        )
        .fallback(not_found)
        .with_state(ApiState { service })
}

/// Unsupported methods on a known path answer with a JSON 405
fn json_methods(methods: MethodRouter<ApiState>) -> MethodRouter<ApiState> {
    methods.fallback(method_not_allowed)
}

/// Full application: routes mounted under `prefix`, with tracing and CORS
pub fn app(service: TranslationService, prefix: &str) -> Router {
    let api = routes(service);
    let router = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api).fallback(not_found)
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}

/// GET /test
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "API is running".to_string(),
    })
}

/// GET /translations
async fn list_translations(
    State(state): State<ApiState>,
) -> Result<Json<Vec<TranslationRecord>>, ApiError> {
    info!("GET /translations");
    let records = state.service.list_translations().await?;
    Ok(Json(records))
}

/// GET /translations/:lang
async fn get_translations(
    State(state): State<ApiState>,
    Path(lang): Path<String>,
) -> Result<Json<TranslationMap>, ApiError> {
    info!("GET /translations/{}", lang);
    let translations = state.service.get_translations(&lang).await?;
    Ok(Json(translations))
}

/// POST /translations/:lang
async fn upsert_translations(
    State(state): State<ApiState>,
    Path(lang): Path<String>,
    body: Result<Json<TranslationMap>, JsonRejection>,
) -> Response {
    info!("POST /translations/{}", lang);

    let partial = match body {
        Ok(Json(partial)) => partial,
        Err(rejection) => return bad_json(rejection).into_response(),
    };

    match state.service.upsert_translations(&lang, partial).await {
        Ok(merged) => Json(merged).into_response(),
        Err(ApiError::Internal(message)) => {
            error!("Translation update error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": message,
                    "details": "Translation update failed",
                })),
            )
                .into_response()
        }
        Err(other) => other.into_response(),
    }
}

/// DELETE /translations/:lang?key=
async fn delete_translation_key(
    State(state): State<ApiState>,
    Path(lang): Path<String>,
    query: Result<Query<DeleteKeyQuery>, QueryRejection>,
) -> Result<Json<TranslationMap>, ApiError> {
    let Query(DeleteKeyQuery { key }) =
        query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    info!("DELETE /translations/{} (key '{}')", lang, key);
    let remaining = state.service.delete_translation_key(&lang, &key).await?;
    Ok(Json(remaining))
}

/// GET /languages
async fn list_languages(State(state): State<ApiState>) -> Result<Json<Vec<Language>>, ApiError> {
    info!("GET /languages");
    let languages = state.service.list_languages().await?;
    info!("Returning {} languages", languages.len());
    Ok(Json(languages))
}

/// POST /languages
async fn add_language(
    State(state): State<ApiState>,
    body: Result<Json<AddLanguageRequest>, JsonRejection>,
) -> Result<Json<Language>, ApiError> {
    let Json(request) = body.map_err(bad_json)?;
    info!("POST /languages ({})", request.code);
    let language = state
        .service
        .add_language(&request.code, &request.name)
        .await?;
    Ok(Json(language))
}

/// DELETE /languages/:lang
async fn delete_language(
    State(state): State<ApiState>,
    Path(lang): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    info!("DELETE /languages/{}", lang);
    state.service.delete_language(&lang).await?;
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, TranslationStore};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt; // For oneshot()

    fn test_app() -> Router {
        app(
            TranslationService::new(Arc::new(MemoryStore::new())),
            "/api",
        )
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/api/test", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "API is running"}));
    }

    #[tokio::test]
    async fn test_merge_upsert_example() {
        let app = test_app();

        let (status, _) = send(&app, "POST", "/api/translations/en", Some(json!({"hello": "Hello"}))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "POST", "/api/translations/en", Some(json!({"bye": "Bye"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"hello": "Hello", "bye": "Bye"}));

        let (status, body) = send(&app, "GET", "/api/translations/en", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"hello": "Hello", "bye": "Bye"}));
    }

    #[tokio::test]
    async fn test_get_unknown_language_is_404() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/api/translations/xx", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_add_language_and_conflict() {
        let app = test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/languages",
            Some(json!({"code": "fr", "name": "French"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"code": "fr", "name": "French", "isActive": true}));

        let (status, body) = send(
            &app,
            "POST",
            "/api/languages",
            Some(json!({"code": "fr", "name": "French"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, body) = send(&app, "GET", "/api/translations/fr", None).await;
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn test_list_languages_uses_registry_names() {
        let app = test_app();
        for code in ["en", "tr", "pt"] {
            send(&app, "POST", "/api/languages", Some(json!({"code": code, "name": "ignored"}))).await;
        }

        let (status, body) = send(&app, "GET", "/api/languages", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"code": "en", "name": "English", "isActive": true},
                {"code": "pt", "name": "pt", "isActive": true},
                {"code": "tr", "name": "Türkçe", "isActive": true},
            ])
        );
    }

    #[tokio::test]
    async fn test_delete_language_always_succeeds() {
        let app = test_app();
        send(&app, "POST", "/api/translations/en", Some(json!({"a": "b"}))).await;

        for _ in 0..2 {
            let (status, body) = send(&app, "DELETE", "/api/languages/en", None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"success": true}));
        }

        let (_, body) = send(&app, "GET", "/api/languages", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_translations_returns_full_records() {
        let app = test_app();
        send(&app, "POST", "/api/translations/en", Some(json!({"hello": "Hello"}))).await;
        send(&app, "POST", "/api/translations/tr", Some(json!({"hello": "Merhaba"}))).await;

        let (status, body) = send(&app, "GET", "/api/translations", None).await;
        assert_eq!(status, StatusCode::OK);

        let records = body.as_array().expect("array");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["lang"], "en");
        assert_eq!(records[0]["translations"], json!({"hello": "Hello"}));
        assert_eq!(records[1]["lang"], "tr");
        assert!(records[1]["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_delete_translation_key_endpoint() {
        let app = test_app();
        send(&app, "POST", "/api/translations/en", Some(json!({"a": "1", "b": "2"}))).await;

        let (status, body) = send(&app, "DELETE", "/api/translations/en?key=a", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"b": "2"}));

        let (status, _) = send(&app, "DELETE", "/api/translations/xx?key=a", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "DELETE", "/api/translations/en", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_delete_dot_and_empty_keys() {
        let app = test_app();
        send(
            &app,
            "POST",
            "/api/translations/en",
            Some(json!({"": "empty", ".": "dot", "..": "dots", "keep": "k"})),
        )
        .await;

        for uri in [
            "/api/translations/en?key=",
            "/api/translations/en?key=.",
            "/api/translations/en?key=..",
        ] {
            let (status, _) = send(&app, "DELETE", uri, None).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
        }

        let (_, body) = send(&app, "GET", "/api/translations/en", None).await;
        assert_eq!(body, json!({"keep": "k"}));
    }

    #[tokio::test]
    async fn test_unmatched_requests_get_json_errors() {
        let app = test_app();

        let (status, body) = send(&app, "GET", "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Route not found"}));

        let (status, body) = send(&app, "GET", "/elsewhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, "PUT", "/api/languages", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed"}));

        let (status, body) = send(&app, "PATCH", "/api/translations/en", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let app = test_app();

        let (status, body) = send(&app, "POST", "/api/translations/en", Some(json!(["not", "a", "map"]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, "POST", "/api/languages", Some(json!({"name": "No code"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_empty_prefix_mounts_at_root() {
        let app = app(TranslationService::new(Arc::new(MemoryStore::new())), "");
        let (status, _) = send(&app, "GET", "/languages", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    struct FailingStore;

    #[async_trait]
    impl TranslationStore for FailingStore {
        async fn find_all(&self) -> anyhow::Result<Vec<TranslationRecord>> {
            Err(anyhow!("connection reset"))
        }
        async fn find_languages(&self) -> anyhow::Result<Vec<String>> {
            Err(anyhow!("connection reset"))
        }
        async fn find_one(&self, _lang: &str) -> anyhow::Result<Option<TranslationRecord>> {
            Err(anyhow!("connection reset"))
        }
        async fn save(&self, _record: TranslationRecord) -> anyhow::Result<TranslationRecord> {
            Err(anyhow!("connection reset"))
        }
        async fn insert_if_absent(&self, _record: TranslationRecord) -> anyhow::Result<bool> {
            Err(anyhow!("connection reset"))
        }
        async fn delete_one(&self, _lang: &str) -> anyhow::Result<bool> {
            Err(anyhow!("connection reset"))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_500_with_raw_message() {
        let app = app(TranslationService::new(Arc::new(FailingStore)), "/api");

        let (status, body) = send(&app, "GET", "/api/languages", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "connection reset"}));

        let (status, body) = send(&app, "POST", "/api/translations/en", Some(json!({"a": "b"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "connection reset", "details": "Translation update failed"})
        );

        let (status, _) = send(&app, "DELETE", "/api/languages/en", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
