use anyhow::{Context, Result};
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub api_prefix: String,

    // Database (None selects the in-memory store)
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // Client
    pub api_url: String,
    pub client_state_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_prefix: normalize_prefix(
                &std::env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            ),

            // Database
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            // Client
            api_url: std::env::var("API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000/api".to_string()),
            client_state_file: std::env::var("CLIENT_STATE_FILE")
                .unwrap_or_else(|_| ".multilang/preferences.json".to_string()),
        })
    }

    /// Socket address the server listens on
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .context(format!(
                "Invalid listen address {}:{}",
                self.bind_address, self.port
            ))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            api_prefix: "/api".to_string(),
            database_url: None,
            database_max_connections: 5,
            api_url: "http://localhost:3000/api".to_string(),
            client_state_file: ".multilang/preferences.json".to_string(),
        }
    }
}

/// Ensure the prefix starts with '/' and has no trailing '/' ("" stays "")
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
