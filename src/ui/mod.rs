//! Presentation components rendered as plain text.
//!
//! Visitor pages and the header only read from `TranslationState`; the admin
//! view also writes back through it.

mod admin;
mod header;
mod pages;

pub use admin::{AdminAlert, AdminView, NewLanguageForm, NewTranslationForm};
pub use header::Header;
pub use pages::{feature_icon, render_page, Route};
