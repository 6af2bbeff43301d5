//! Preview binary - renders a visitor page in the chosen language
//!
//! Usage:
//!   cargo run --bin preview                      # page1 in the saved language
//!   cargo run --bin preview -- page2             # another page
//!   cargo run --bin preview -- page3 --lang en   # switch language first (persisted)
//!
//! Optional environment variables:
//! - API_URL (defaults to http://localhost:3000/api)
//! - CLIENT_STATE_FILE (defaults to .multilang/preferences.json)

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use multilang_cms::client::{ApiClient, FilePreferences, TranslationState};
use multilang_cms::config::Config;
use multilang_cms::ui::{render_page, Header, Route};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multilang_cms=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut page = String::new();
    let mut lang: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--lang" {
            lang = Some(iter.next().context("--lang requires a language code")?.clone());
        } else {
            page = arg.clone();
        }
    }

    let config = Config::from_env()?;
    let preferences = Arc::new(FilePreferences::new(&config.client_state_file));
    let state =
        TranslationState::initialize(ApiClient::from_config(&config), preferences).await;

    if let Some(code) = lang {
        info!("Switching language to {}", code);
        state
            .set_language(&code)
            .await
            .context("Translation fetch task failed")?;
    }

    let header = Header::new(state.clone());
    print!("{}", header.render());
    println!();
    print!("{}", render_page(Route::resolve(&page), &state));

    Ok(())
}
