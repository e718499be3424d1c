use std::env;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::challenge::model::RawWordChallenge;
use crate::keyboard::zhuyin::PhoneticKeyMap;

#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("no API key found in ${0}")]
    MissingCredential(String),
    #[error("word supplier is disabled")]
    Unavailable,
    #[error("request failed: {0}")]
    Network(String),
    #[error("supplier answered with HTTP {0}")]
    Status(u16),
    #[error("could not decode supplier response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("supplier returned no words")]
    Empty,
}

/// Source of topic-specific word lists.
pub trait WordSupplier: Send + Sync {
    fn name(&self) -> &str;

    fn fetch(&self, topic: &str, count: usize) -> Result<Vec<RawWordChallenge>, SupplyError>;
}

/// Supplier used when network lookups are switched off.
pub struct OfflineSupplier;

impl WordSupplier for OfflineSupplier {
    fn name(&self) -> &str {
        "offline"
    }

    fn fetch(&self, _topic: &str, _count: usize) -> Result<Vec<RawWordChallenge>, SupplyError> {
        Err(SupplyError::Unavailable)
    }
}

/// Environment variable consulted when the configured one is unset.
const LEGACY_KEY_ENV: &str = "API_KEY";

/// Asks a Gemini model for a word list via the `generateContent` endpoint.
pub struct GeminiSupplier {
    pub api_base: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout: Duration,
}

impl GeminiSupplier {
    #[cfg_attr(not(feature = "network"), allow(dead_code))]
    fn api_key(&self) -> Result<String, SupplyError> {
        [self.api_key_env.as_str(), LEGACY_KEY_ENV]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or_else(|| SupplyError::MissingCredential(self.api_key_env.clone()))
    }

    #[cfg_attr(not(feature = "network"), allow(dead_code))]
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    pub fn request_body(topic: &str, count: usize) -> Value {
        let instruction = format!(
            "You write typing practice for young learners in Taiwan.\n\
             Return {count} simple Traditional Chinese words (2-3 characters) about the topic.\n\
             Split every character into its Zhuyin symbols and the keys that type them \
             on the standard Zhuyin keyboard. Every key list ends with the tone key; \
             tone 1 is typed with a space.\n\n\
             Layout (symbol:key):\n{}",
            PhoneticKeyMap::global().reference_table()
        );

        let string = json!({ "type": "STRING" });
        let strings = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
        let schema = json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "word": string,
                    "hint": string,
                    "chars": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "char": string,
                                "zhuyin": strings,
                                "keys": strings,
                                "tone": string,
                            },
                            "required": ["char", "zhuyin", "keys", "tone"],
                        },
                    },
                },
                "required": ["word", "chars"],
            },
        });

        json!({
            "systemInstruction": { "parts": [{ "text": instruction }] },
            "contents": [{
                "role": "user",
                "parts": [{ "text": format!("Topic: \"{topic}\"") }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        })
    }

    pub fn parse_response(body: &str) -> Result<Vec<RawWordChallenge>, SupplyError> {
        let response: GenerateResponse = serde_json::from_str(body)?;
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        let text = strip_code_fence(&text);
        if text.is_empty() {
            return Err(SupplyError::Empty);
        }
        let words: Vec<RawWordChallenge> = serde_json::from_str(text)?;
        if words.is_empty() {
            return Err(SupplyError::Empty);
        }
        Ok(words)
    }
}

impl WordSupplier for GeminiSupplier {
    fn name(&self) -> &str {
        "gemini"
    }

    #[cfg(feature = "network")]
    fn fetch(&self, topic: &str, count: usize) -> Result<Vec<RawWordChallenge>, SupplyError> {
        use reqwest::header::CONTENT_TYPE;

        let key = self.api_key()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| SupplyError::Network(e.to_string()))?;
        let response = client
            .post(self.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", key)
            .body(Self::request_body(topic, count).to_string())
            .send()
            .map_err(|e| SupplyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SupplyError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .map_err(|e| SupplyError::Network(e.to_string()))?;
        Self::parse_response(&body)
    }

    #[cfg(not(feature = "network"))]
    fn fetch(&self, _topic: &str, _count: usize) -> Result<Vec<RawWordChallenge>, SupplyError> {
        Err(SupplyError::Unavailable)
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Models sometimes wrap JSON in a markdown fence despite the mime type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
