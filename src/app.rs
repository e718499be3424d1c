use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::challenge::model::ChallengeList;
use crate::challenge::repository::WordRepository;
use crate::challenge::supplier::{GeminiSupplier, OfflineSupplier, WordSupplier};
use crate::config::{Config, SupplierKind};
use crate::event::AppEvent;
use crate::session::feedback::FeedbackCoordinator;
use crate::session::game::{GameEvent, GameState, GameStatus, LoadTicket};
use crate::speech::Pronouncer;
use crate::ui::components::dashboard::GameSummary;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub fn build_supplier(config: &Config) -> Box<dyn WordSupplier> {
    match config.supplier {
        SupplierKind::Gemini => Box::new(GeminiSupplier {
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            timeout: config.request_timeout(),
        }),
        SupplierKind::Offline => Box::new(OfflineSupplier),
    }
}

pub fn build_repository(config: &Config) -> WordRepository {
    WordRepository::new(
        build_supplier(config),
        config.word_count,
        config.shuffle_fallback,
    )
}

pub struct App {
    pub game: GameState,
    pub feedback: FeedbackCoordinator,
    pub topic_input: LineInput,
    pub config: Config,
    pub theme: &'static Theme,
    pub should_quit: bool,
    /// Topic of the running or last finished game.
    pub active_topic: String,
    /// Wrong keys in the current game.
    pub mistakes: usize,
    repository: Arc<WordRepository>,
    pronouncer: Pronouncer,
    events: mpsc::Sender<AppEvent>,
    /// Where the last used topic is remembered. `None` keeps it in memory.
    config_path: Option<PathBuf>,
}

impl App {
    pub fn new(config: Config, events: mpsc::Sender<AppEvent>) -> Self {
        let repository = build_repository(&config);
        let mut app = Self::with_repository(config, repository, events);
        app.config_path = Some(Config::config_path());
        app
    }

    pub fn with_repository(
        config: Config,
        repository: WordRepository,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_else(|| {
            warn!(theme = %config.theme, "unknown theme, using default");
            Theme::default()
        });
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let timings = config.timings();

        Self {
            game: GameState::new(timings.word_pause),
            feedback: FeedbackCoordinator::new(timings),
            topic_input: LineInput::new(&config.topic),
            active_topic: config.topic.clone(),
            mistakes: 0,
            pronouncer: Pronouncer::new(config.speech_command.clone()),
            repository: Arc::new(repository),
            config,
            theme,
            should_quit: false,
            events,
            config_path: None,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    /// Start a game with the topic from the input line. The word list is
    /// fetched on a worker thread and arrives as `AppEvent::WordsLoaded`.
    pub fn start_game(&mut self) -> bool {
        let topic = self
            .topic_input
            .topic()
            .unwrap_or(self.config.topic.as_str())
            .to_string();
        self.start_game_with(topic)
    }

    /// Play again with the topic of the current game.
    pub fn restart(&mut self) -> bool {
        self.start_game_with(self.active_topic.clone())
    }

    fn start_game_with(&mut self, topic: String) -> bool {
        let Some(ticket) = self.game.begin_loading() else {
            debug!("load already in progress");
            return false;
        };
        self.feedback.clear();
        self.mistakes = 0;
        if topic != self.config.topic {
            self.remember_topic(&topic);
        }
        self.active_topic = topic.clone();
        info!(
            %topic,
            supplier = self.repository.supplier_name(),
            "loading words"
        );

        let repository = Arc::clone(&self.repository);
        let events = self.events.clone();
        thread::spawn(move || {
            let list = repository.load(&topic);
            // The receiver is gone only when the app is shutting down.
            let _ = events.send(AppEvent::WordsLoaded { ticket, list });
        });
        true
    }

    fn remember_topic(&mut self, topic: &str) {
        self.config.topic = topic.to_string();
        let Some(path) = &self.config_path else {
            return;
        };
        // Reload so run-only CLI overrides are not written back.
        let result = Config::load_from(path).and_then(|mut stored| {
            stored.topic = topic.to_string();
            stored.save_to(path)
        });
        if let Err(err) = result {
            warn!(%err, "could not remember topic");
        }
    }

    /// Leave a finished game for the start screen.
    pub fn go_idle(&mut self) {
        self.game.reset();
        self.feedback.clear();
        self.mistakes = 0;
    }

    pub fn on_words_loaded(&mut self, ticket: LoadTicket, list: ChallengeList) {
        if !self.game.finish_loading(ticket, list) {
            return;
        }
        if let Some(word) = self.game.current_word() {
            debug!(first = word.word(), "first word ready");
        }
    }

    /// Forward a key identifier to the game and fan its events out to the
    /// feedback timers and the pronunciation hook.
    pub fn on_key(&mut self, raw: &str, now: Instant) -> Vec<GameEvent> {
        let events = self.game.handle_key(raw, now);
        for event in &events {
            self.feedback.observe(event, now);
            match event {
                GameEvent::KeyWrong { expected, actual } => {
                    self.mistakes += 1;
                    debug!(%expected, %actual, "wrong key");
                }
                GameEvent::WordComplete { word, .. } => {
                    self.pronouncer.speak(word);
                }
                _ => {}
            }
        }
        events
    }

    pub fn on_tick(&mut self, now: Instant) -> Vec<GameEvent> {
        let events = self.game.tick(now);
        for event in &events {
            self.feedback.observe(event, now);
        }
        self.feedback.expire(now);
        events
    }

    pub fn replay_pronunciation(&self) -> bool {
        match self.game.current_word() {
            Some(word) if self.game.status() == GameStatus::Playing => {
                self.pronouncer.speak(word.word())
            }
            _ => false,
        }
    }

    pub fn can_pronounce(&self) -> bool {
        self.pronouncer.is_enabled()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            topic: self.active_topic.clone(),
            score: self.game.score(),
            words: self.game.words_completed(),
            mistakes: self.mistakes,
        }
    }
}
