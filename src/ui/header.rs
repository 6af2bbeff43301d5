use std::fmt::Write;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::pages::Route;
use crate::client::TranslationState;
use crate::languages::Language;

/// Navigation bar with the language switcher
#[derive(Debug)]
pub struct Header {
    state: Arc<TranslationState>,
    languages: Vec<Language>,
    current_lang: String,
    languages_rx: watch::Receiver<Vec<Language>>,
    lang_rx: watch::Receiver<String>,
}

impl Header {
    pub fn new(state: Arc<TranslationState>) -> Self {
        let languages_rx = state.subscribe_languages();
        let lang_rx = state.subscribe_language();
        let mut header = Self {
            state,
            languages: Language::defaults(),
            current_lang: "tr".to_string(),
            languages_rx,
            lang_rx,
        };
        header.sync_all();
        header
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn current_lang(&self) -> &str {
        &self.current_lang
    }

    fn sync_all(&mut self) {
        let languages = self.languages_rx.borrow_and_update().clone();
        self.accept_languages(languages);
        self.current_lang = self.lang_rx.borrow_and_update().clone();
    }

    /// An empty list never replaces the one already shown
    fn accept_languages(&mut self, languages: Vec<Language>) {
        if !languages.is_empty() {
            debug!("Header received {} languages", languages.len());
            self.languages = languages;
        }
    }

    /// Pull pending notifications; returns whether anything changed
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;

        if self.languages_rx.has_changed().unwrap_or(false) {
            let languages = self.languages_rx.borrow_and_update().clone();
            self.accept_languages(languages);
            changed = true;
        }

        if self.lang_rx.has_changed().unwrap_or(false) {
            self.current_lang = self.lang_rx.borrow_and_update().clone();
            debug!("Header current language changed: {}", self.current_lang);
            changed = true;
        }

        changed
    }

    /// Wait until the language or the language list changes, then refresh
    pub async fn changed(&mut self) {
        tokio::select! {
            _ = self.languages_rx.changed() => {}
            _ = self.lang_rx.changed() => {}
        }
        self.refresh();
    }

    /// Language switcher selection
    pub fn change_lang(&mut self, code: &str) -> JoinHandle<()> {
        let handle = self.state.set_language(code);
        self.refresh();
        handle
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let nav: Vec<String> = Route::ALL
            .iter()
            .map(|route| format!("{} ({})", self.state.translate(route.nav_key()), route.path()))
            .collect();
        let _ = writeln!(out, "{}", nav.join(" | "));

        let switcher: Vec<String> = self
            .languages
            .iter()
            .map(|lang| {
                if lang.code == self.current_lang {
                    format!("[{}]", lang.name)
                } else {
                    lang.name.clone()
                }
            })
            .collect();
        let _ = writeln!(
            out,
            "{}: {}",
            self.state.current_language_name(),
            switcher.join(" ")
        );

        out
    }
}
