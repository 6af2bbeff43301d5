//! Client side of the translation service.
//!
//! # Architecture
//!
//! - `http`: `ApiClient`, one method per service endpoint
//! - `preferences`: local client storage for the chosen language
//! - `state`: `TranslationState`, the observable cache every view reads from

mod http;
mod preferences;
mod state;

pub use http::ApiClient;
pub use preferences::{FilePreferences, MemoryPreferences, Preferences};
pub use state::{FanOutReport, TranslationState, TranslationTable, LANGUAGE_PLACEHOLDER};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status and an `{error}` body
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Local storage error: {0}")]
    Storage(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
