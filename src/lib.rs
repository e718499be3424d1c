//! Terminal typing game for learning the standard Zhuyin (Bopomofo) keyboard.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod challenge;
pub mod config;
pub mod event;
pub mod keyboard;
pub mod logging;
pub mod session;
pub mod speech;
pub mod ui;

/// Switch the UI language. Unknown locales fall back to English strings.
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}
