use std::borrow::Cow;
use std::ops::Deref;

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keyboard::zhuyin::{
    NEUTRAL_TONE_KEY, PhoneticKeyMap, TONE1_KEY, TONE1_SYMBOL, is_tone_key,
};

/// A character as it appears in word-list JSON, before validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCharacter {
    #[serde(rename = "char")]
    pub glyph: String,
    #[serde(rename = "zhuyin", default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub tone: String,
}

/// A word challenge as it appears in word-list JSON, before validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawWordChallenge {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(rename = "chars", default)]
    pub characters: Vec<RawCharacter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CharacterIssue {
    #[error("glyph is empty")]
    EmptyGlyph,
    #[error("no keys")]
    NoKeys,
    #[error("key {0:?} is not a single character")]
    NotSingleKey(String),
    #[error("key {0:?} is not on the Zhuyin layout")]
    UnmappedKey(char),
    #[error("key sequence does not end with a tone key")]
    MissingTone,
    #[error("tone key {0:?} before the end of the sequence")]
    MisplacedTone(char),
    #[error("{keys} keys for {symbols} symbols")]
    LengthMismatch { keys: usize, symbols: usize },
    #[error("symbol {symbol:?} does not match key {key:?}")]
    SymbolMismatch { symbol: String, key: char },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChallengeError {
    #[error("word text is empty")]
    EmptyWord,
    #[error("word {0:?} has no characters")]
    NoCharacters(String),
    #[error("word {word:?}, character {glyph:?}: {issue}")]
    Character {
        word: String,
        glyph: String,
        issue: CharacterIssue,
    },
}

/// One glyph with its key sequence.
///
/// `keys` and `symbols` always have the same length and every key ends with
/// exactly one tone key. Tone 1 has no visible mark; when the source data
/// leaves its blank symbol out, it is filled in during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    glyph: String,
    symbols: Vec<String>,
    keys: Vec<char>,
    tone: String,
}

impl Character {
    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn keys(&self) -> &[char] {
        &self.keys
    }

    /// Tone mark shown beside the symbol column. Blank for tone 1.
    pub fn tone(&self) -> &str {
        &self.tone
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Symbols without the trailing blank tone-1 placeholder.
    pub fn visible_symbols(&self) -> impl Iterator<Item = (usize, &str)> {
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| s.as_str() != TONE1_SYMBOL)
            .map(|(i, s)| (i, s.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordChallenge {
    word: String,
    characters: Vec<Character>,
    hint: Option<String>,
}

impl WordChallenge {
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn total_keys(&self) -> usize {
        self.characters.iter().map(Character::key_count).sum()
    }

    /// The full key sequence that spells this word.
    pub fn key_sequence(&self) -> impl Iterator<Item = char> + '_ {
        self.characters.iter().flat_map(|c| c.keys.iter().copied())
    }

    /// 小貓, assembled in code. Last resort when the bundled list is unusable.
    pub(crate) fn builtin() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            word: "小貓".to_string(),
            characters: vec![
                Character {
                    glyph: "小".to_string(),
                    symbols: strings(&["ㄒ", "ㄧ", "ㄠ", "ˇ"]),
                    keys: vec!['v', 'u', 'l', '3'],
                    tone: "ˇ".to_string(),
                },
                Character {
                    glyph: "貓".to_string(),
                    symbols: strings(&["ㄇ", "ㄠ", TONE1_SYMBOL]),
                    keys: vec!['a', 'l', TONE1_KEY],
                    tone: String::new(),
                },
            ],
            hint: None,
        }
    }
}

impl TryFrom<RawWordChallenge> for WordChallenge {
    type Error = ChallengeError;

    fn try_from(raw: RawWordChallenge) -> Result<Self, Self::Error> {
        let word = raw.word.trim().to_string();
        if word.is_empty() {
            return Err(ChallengeError::EmptyWord);
        }
        if raw.characters.is_empty() {
            return Err(ChallengeError::NoCharacters(word));
        }

        let mut characters = Vec::with_capacity(raw.characters.len());
        for raw_char in raw.characters {
            let glyph = raw_char.glyph.clone();
            let character = validate_character(raw_char).map_err(|issue| {
                ChallengeError::Character {
                    word: word.clone(),
                    glyph,
                    issue,
                }
            })?;
            characters.push(character);
        }

        let hint = raw
            .hint
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());

        Ok(Self {
            word,
            characters,
            hint,
        })
    }
}

/// Key strings from outside the crate may use full-width forms or the
/// ideographic space; NFKC folds those onto the ASCII keys.
fn normalize_key(key: &str) -> Cow<'_, str> {
    let folded = ComposingNormalizerBorrowed::new_nfkc().normalize(key);
    if folded.chars().any(|c| c.is_ascii_uppercase()) {
        Cow::Owned(folded.to_ascii_lowercase())
    } else {
        folded
    }
}

fn validate_character(raw: RawCharacter) -> Result<Character, CharacterIssue> {
    let glyph = raw.glyph.trim().to_string();
    if glyph.is_empty() {
        return Err(CharacterIssue::EmptyGlyph);
    }
    if raw.keys.is_empty() {
        return Err(CharacterIssue::NoKeys);
    }

    let map = PhoneticKeyMap::global();
    let mut keys = Vec::with_capacity(raw.keys.len());
    for key in &raw.keys {
        let normalized = normalize_key(key);
        let mut chars = normalized.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(ch), None) => ch,
            _ => return Err(CharacterIssue::NotSingleKey(key.clone())),
        };
        if !map.is_mapped(key) {
            return Err(CharacterIssue::UnmappedKey(key));
        }
        keys.push(key);
    }

    let (&last, body) = keys.split_last().ok_or(CharacterIssue::NoKeys)?;
    if !is_tone_key(last) {
        return Err(CharacterIssue::MissingTone);
    }
    if let Some(&misplaced) = body.iter().find(|&&k| is_tone_key(k)) {
        return Err(CharacterIssue::MisplacedTone(misplaced));
    }

    let tone_mark = map.symbol_for(last).ok_or(CharacterIssue::UnmappedKey(last))?;
    let mut symbols: Vec<String> = raw.symbols.iter().map(|s| s.trim().to_string()).collect();
    // The neutral mark is written before the syllable; keys put it last.
    if last == NEUTRAL_TONE_KEY
        && symbols.len() > 1
        && symbols.first().map(String::as_str) == Some(tone_mark)
    {
        let mark = symbols.remove(0);
        symbols.push(mark);
    }
    // Tone given only in its own field, or tone 1 left blank.
    if keys.len() == symbols.len() + 1 {
        symbols.push(tone_mark.to_string());
    }
    if let Some(blank) = symbols.last_mut().filter(|s| s.is_empty()) {
        *blank = TONE1_SYMBOL.to_string();
    }
    if keys.len() != symbols.len() {
        return Err(CharacterIssue::LengthMismatch {
            keys: keys.len(),
            symbols: symbols.len(),
        });
    }
    for (&key, symbol) in keys.iter().zip(&symbols) {
        if map.symbol_for(key) != Some(symbol.as_str()) {
            return Err(CharacterIssue::SymbolMismatch {
                symbol: symbol.clone(),
                key,
            });
        }
    }

    // The tone key decides the tone; the wire field is free-form.
    let tone = match tone_mark {
        TONE1_SYMBOL => String::new(),
        mark => mark.to_string(),
    };

    Ok(Character {
        glyph,
        symbols,
        keys,
        tone,
    })
}

/// A non-empty, validated list of challenges for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeList(Vec<WordChallenge>);

impl ChallengeList {
    pub fn new(words: Vec<WordChallenge>) -> Option<Self> {
        if words.is_empty() {
            None
        } else {
            Some(Self(words))
        }
    }

    pub fn single(word: WordChallenge) -> Self {
        Self(vec![word])
    }

    pub fn into_inner(self) -> Vec<WordChallenge> {
        self.0
    }
}

impl Deref for ChallengeList {
    type Target = [WordChallenge];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
pub(crate) fn raw_char(glyph: &str, symbols: &[&str], keys: &[&str], tone: &str) -> RawCharacter {
    RawCharacter {
        glyph: glyph.to_string(),
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        keys: keys.iter().map(|s| s.to_string()).collect(),
        tone: tone.to_string(),
    }
}
