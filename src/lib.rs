//! Multilingual content management.
//!
//! A translation service exposing CRUD over languages and per-language
//! dictionaries, plus the client state and text views that consume it.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod languages;
pub mod retry;
pub mod service;
pub mod store;
pub mod ui;
