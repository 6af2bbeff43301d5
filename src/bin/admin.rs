//! Admin binary - edit languages and translations from the terminal
//!
//! Usage:
//!   cargo run --bin admin                                  # show the translation table
//!   cargo run --bin admin -- add-language fr Français
//!   cargo run --bin admin -- delete-language fr
//!   cargo run --bin admin -- add-key greeting tr=Merhaba en=Hello
//!   cargo run --bin admin -- set greeting de Hallo
//!   cargo run --bin admin -- delete-key greeting
//!
//! Optional environment variables:
//! - API_URL (defaults to http://localhost:3000/api)
//! - CLIENT_STATE_FILE (defaults to .multilang/preferences.json)

use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::info;

use multilang_cms::client::{ApiClient, FanOutReport, FilePreferences, TranslationState};
use multilang_cms::config::Config;
use multilang_cms::ui::{AdminView, NewLanguageForm};

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

    let config = Config::from_env()?;
    let preferences = Arc::new(FilePreferences::new(&config.client_state_file));
    let state =
        TranslationState::initialize(ApiClient::from_config(&config), preferences).await;

    let mut view = AdminView::new(state);
    view.load_data().await;

    match args.first().map(String::as_str) {
        None | Some("list") => {}
        Some("add-language") => {
            let code = arg(&args, 1, "language code")?;
            let name = arg(&args, 2, "language name")?;
            view.new_language = NewLanguageForm { code, name };
            match view.add_language().await {
                Ok(Some(language)) => info!("Language added: {}", language.code),
                Ok(None) => bail!("Both code and name are required"),
                Err(alert) => bail!("{}", alert),
            }
        }
        Some("delete-language") => {
            let code = arg(&args, 1, "language code")?;
            view.delete_language(&code).await;
        }
        Some("add-key") => {
            view.new_translation.key = arg(&args, 1, "translation key")?;
            for pair in &args[2..] {
                let (lang, value) = pair
                    .split_once('=')
                    .context(format!("Expected lang=value, got '{}'", pair))?;
                view.new_translation
                    .translations
                    .insert(lang.to_string(), value.to_string());
            }
            if let Some(report) = view.add_translation().await {
                print_report(&report);
            }
        }
        Some("set") => {
            let key = arg(&args, 1, "translation key")?;
            let lang = arg(&args, 2, "language code")?;
            let value = arg(&args, 3, "value")?;
            view.update_translation(&key, &lang, &value).await;
            view.load_data().await;
        }
        Some("delete-key") => {
            let key = arg(&args, 1, "translation key")?;
            let report = view.delete_translation_key(&key).await;
            print_report(&report);
        }
        Some(other) => bail!(
            "Unknown command '{}'. Expected one of: list, add-language, delete-language, add-key, set, delete-key",
            other
        ),
    }

    print!("{}", view.render());
    Ok(())
}

fn arg(args: &[String], index: usize, what: &str) -> Result<String> {
    args.get(index)
        .cloned()
        .context(format!("Missing argument: {}", what))
}

fn print_report(report: &FanOutReport) {
    if !report.succeeded.is_empty() {
        println!("Updated: {}", report.succeeded.join(", "));
    }
    for (lang, message) in &report.failed {
        println!("Failed for {}: {}", lang, message);
    }
}
