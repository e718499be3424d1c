use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::feedback::Timings;

pub const APP_DIR: &str = "zhuyin-typer";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierKind {
    Gemini,
    Offline,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_shuffle_fallback")]
    pub shuffle_fallback: bool,
    #[serde(default = "default_key_echo_ms")]
    pub key_echo_ms: u64,
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
    #[serde(default = "default_word_pause_ms")]
    pub word_pause_ms: u64,
    #[serde(default = "default_supplier")]
    pub supplier: SupplierKind,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Program and leading arguments; the word is appended as the last one.
    #[serde(default)]
    pub speech_command: Option<Vec<String>>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_topic() -> String {
    "水果".to_string()
}
fn default_word_count() -> usize {
    5
}
fn default_theme() -> String {
    "candy".to_string()
}
fn default_locale() -> String {
    "zh-TW".to_string()
}
fn default_shuffle_fallback() -> bool {
    true
}
fn default_key_echo_ms() -> u64 {
    150
}
fn default_feedback_ms() -> u64 {
    200
}
fn default_word_pause_ms() -> u64 {
    800
}
fn default_supplier() -> SupplierKind {
    SupplierKind::Gemini
}
fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            word_count: default_word_count(),
            theme: default_theme(),
            locale: default_locale(),
            shuffle_fallback: default_shuffle_fallback(),
            key_echo_ms: default_key_echo_ms(),
            feedback_ms: default_feedback_ms(),
            word_pause_ms: default_word_pause_ms(),
            supplier: default_supplier(),
            api_base: default_api_base(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
            speech_command: None,
            log_level: default_log_level(),
        }
    }
}

pub const MAX_WORD_COUNT: usize = 20;
pub const SUPPORTED_LOCALES: &[&str] = &["zh-TW", "en"];

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Clamp values that a hand-edited file may have pushed out of range.
    pub fn normalize(&mut self) {
        self.word_count = self.word_count.clamp(1, MAX_WORD_COUNT);
        if self.topic.trim().is_empty() {
            self.topic = default_topic();
        }
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        if self
            .speech_command
            .as_ref()
            .is_some_and(|argv| argv.is_empty())
        {
            self.speech_command = None;
        }
    }

    pub fn timings(&self) -> Timings {
        Timings {
            key_echo: Duration::from_millis(self.key_echo_ms),
            feedback: Duration::from_millis(self.feedback_ms),
            word_pause: Duration::from_millis(self.word_pause_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
