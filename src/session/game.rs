use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::challenge::model::{ChallengeList, Character, WordChallenge};
use crate::challenge::repository::WordRepository;

/// Points for each fully typed word.
pub const WORD_AWARD: u32 = 10;

const MODIFIER_KEYS: &[&str] = &["shift", "control", "alt", "meta"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Loading,
    Playing,
    Completed,
}

/// Identifies one load request. Results carrying an older ticket are stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Any non-modifier key while playing, lower-cased, right or wrong.
    KeyPressed(String),
    KeyCorrect { key: char },
    KeyWrong { expected: char, actual: String },
    CharacterComplete { glyph: String },
    /// Carries the word text so the presentation layer can pronounce it.
    WordComplete { word: String, score: u32 },
    WordAdvanced { word_index: usize },
    GameComplete { score: u32 },
}

/// Read-only copy of the learner's position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub status: GameStatus,
    pub word_index: usize,
    pub char_index: usize,
    pub key_index: usize,
    pub score: u32,
}

enum Keystroke {
    Char(char),
    Named(String),
}

impl Keystroke {
    /// `None` for modifiers and empty identifiers, which never reach matching.
    fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.to_lowercase();
        if lowered.is_empty() || MODIFIER_KEYS.contains(&lowered.as_str()) {
            return None;
        }
        let mut chars = lowered.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(Keystroke::Char(ch)),
            _ => Some(Keystroke::Named(lowered)),
        }
    }

    fn label(&self) -> String {
        match self {
            Keystroke::Char(ch) => ch.to_string(),
            Keystroke::Named(name) => name.clone(),
        }
    }
}

/// The input-matching state machine: word list, cursors, score and the
/// pending advance between words.
pub struct GameState {
    status: GameStatus,
    challenges: Vec<WordChallenge>,
    word_index: usize,
    char_index: usize,
    key_index: usize,
    score: u32,
    word_pause: Duration,
    pending_advance: Option<Instant>,
    load_generation: u64,
}

impl GameState {
    pub fn new(word_pause: Duration) -> Self {
        Self {
            status: GameStatus::Idle,
            challenges: Vec::new(),
            word_index: 0,
            char_index: 0,
            key_index: 0,
            score: 0,
            word_pause,
            pending_advance: None,
            load_generation: 0,
        }
    }

    /// Enter `Loading`. Cancels a pending word advance from the previous
    /// session. Refused while a load is already running.
    pub fn begin_loading(&mut self) -> Option<LoadTicket> {
        if self.status == GameStatus::Loading {
            return None;
        }
        if self.pending_advance.take().is_some() {
            debug!("cancelled pending word advance");
        }
        self.load_generation += 1;
        self.status = GameStatus::Loading;
        Some(LoadTicket(self.load_generation))
    }

    /// Install a freshly loaded list and start playing. Returns false when the
    /// ticket is stale or no load is in progress.
    pub fn finish_loading(&mut self, ticket: LoadTicket, list: ChallengeList) -> bool {
        if self.status != GameStatus::Loading || ticket.0 != self.load_generation {
            debug!(?ticket, "ignoring stale word list");
            return false;
        }
        self.challenges = list.into_inner();
        self.word_index = 0;
        self.char_index = 0;
        self.key_index = 0;
        self.score = 0;
        self.pending_advance = None;
        self.status = GameStatus::Playing;
        info!(words = self.challenges.len(), "game started");
        true
    }

    /// Back to `Idle`, dropping the word list. A load still in flight is
    /// refused when it arrives.
    pub fn reset(&mut self) {
        self.status = GameStatus::Idle;
        self.challenges.clear();
        self.word_index = 0;
        self.char_index = 0;
        self.key_index = 0;
        self.score = 0;
        self.pending_advance = None;
    }

    /// Load synchronously from `repository` and start playing.
    pub fn start_game(&mut self, topic: &str, repository: &WordRepository) -> bool {
        match self.begin_loading() {
            Some(ticket) => self.finish_loading(ticket, repository.load(topic)),
            None => false,
        }
    }

    pub fn handle_key(&mut self, raw: &str, now: Instant) -> Vec<GameEvent> {
        if self.status != GameStatus::Playing {
            return Vec::new();
        }
        let Some(stroke) = Keystroke::parse(raw) else {
            return Vec::new();
        };

        let mut events = vec![GameEvent::KeyPressed(stroke.label())];
        if self.pending_advance.is_some() {
            return events;
        }
        let Some(expected) = self.expected_key() else {
            return events;
        };

        match stroke {
            Keystroke::Char(key) if key == expected => {
                events.push(GameEvent::KeyCorrect { key });
                self.advance_key(now, &mut events);
            }
            other => events.push(GameEvent::KeyWrong {
                expected,
                actual: other.label(),
            }),
        }
        events
    }

    fn advance_key(&mut self, now: Instant, events: &mut Vec<GameEvent>) {
        let word = &self.challenges[self.word_index];
        let character = &word.characters()[self.char_index];

        self.key_index += 1;
        if self.key_index < character.key_count() {
            return;
        }

        self.key_index = 0;
        self.char_index += 1;
        events.push(GameEvent::CharacterComplete {
            glyph: character.glyph().to_string(),
        });
        if self.char_index < word.characters().len() {
            return;
        }

        self.char_index = 0;
        self.score += WORD_AWARD;
        events.push(GameEvent::WordComplete {
            word: word.word().to_string(),
            score: self.score,
        });
        debug!(word = word.word(), score = self.score, "word complete");

        if self.word_index + 1 < self.challenges.len() {
            self.pending_advance = Some(now + self.word_pause);
        } else {
            self.status = GameStatus::Completed;
            events.push(GameEvent::GameComplete { score: self.score });
            info!(score = self.score, "game complete");
        }
    }

    /// Fire the pending word advance once its pause has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<GameEvent> {
        match self.pending_advance {
            Some(due) if self.status == GameStatus::Playing && now >= due => {
                self.pending_advance = None;
                self.word_index += 1;
                self.char_index = 0;
                self.key_index = 0;
                vec![GameEvent::WordAdvanced {
                    word_index: self.word_index,
                }]
            }
            _ => Vec::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn progress(&self) -> Progress {
        Progress {
            status: self.status,
            word_index: self.word_index,
            char_index: self.char_index,
            key_index: self.key_index,
            score: self.score,
        }
    }

    pub fn challenges(&self) -> &[WordChallenge] {
        &self.challenges
    }

    pub fn current_word(&self) -> Option<&WordChallenge> {
        self.challenges.get(self.word_index)
    }

    pub fn current_character(&self) -> Option<&Character> {
        self.current_word()?.characters().get(self.char_index)
    }

    /// The key the learner must press next. `None` outside of play and
    /// during the pause after a word.
    pub fn expected_key(&self) -> Option<char> {
        if self.status != GameStatus::Playing || self.pending_advance.is_some() {
            return None;
        }
        self.current_character()?.keys().get(self.key_index).copied()
    }

    pub fn is_advancing(&self) -> bool {
        self.pending_advance.is_some()
    }

    pub fn advance_due(&self) -> Option<Instant> {
        self.pending_advance
    }

    pub fn words_completed(&self) -> usize {
        match self.status {
            GameStatus::Completed => self.challenges.len(),
            GameStatus::Playing if self.pending_advance.is_some() => self.word_index + 1,
            GameStatus::Playing => self.word_index,
            GameStatus::Idle | GameStatus::Loading => 0,
        }
    }

    pub fn completion_ratio(&self) -> f64 {
        if self.challenges.is_empty() {
            return 0.0;
        }
        self.words_completed() as f64 / self.challenges.len() as f64
    }
}
