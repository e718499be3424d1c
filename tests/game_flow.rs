use std::sync::mpsc;
use std::time::{Duration, Instant};

use zhuyin_typer::app::{App, build_repository};
use zhuyin_typer::challenge::fallback;
use zhuyin_typer::challenge::model::RawWordChallenge;
use zhuyin_typer::challenge::repository::WordRepository;
use zhuyin_typer::challenge::supplier::{SupplyError, WordSupplier};
use zhuyin_typer::config::{Config, SupplierKind};
use zhuyin_typer::event::AppEvent;
use zhuyin_typer::session::game::{GameEvent, GameState, GameStatus, WORD_AWARD};

/// Supplier answering with a fixed JSON payload, like a model response body.
struct JsonSupplier(&'static str);

impl WordSupplier for JsonSupplier {
    fn name(&self) -> &str {
        "json"
    }

    fn fetch(&self, _topic: &str, _count: usize) -> Result<Vec<RawWordChallenge>, SupplyError> {
        Ok(serde_json::from_str(self.0)?)
    }
}

const ANIMALS: &str = r#"[
  {"word": "小狗", "hint": "會汪汪叫", "chars": [
    {"char": "小", "zhuyin": ["ㄒ","ㄧ","ㄠ","ˇ"], "keys": ["v","u","l","3"], "tone": "ˇ"},
    {"char": "狗", "zhuyin": ["ㄍ","ㄡ","ˇ"], "keys": ["e",".","3"], "tone": "ˇ"}
  ]},
  {"word": "壞掉", "chars": [
    {"char": "壞", "zhuyin": ["ㄏ","ㄨ","ㄞ","ˋ"], "keys": ["c","j","9"], "tone": "ˋ"}
  ]},
  {"word": "貓", "chars": [
    {"char": "貓", "zhuyin": ["ㄇ","ㄠ"], "keys": ["A","l"," "], "tone": ""}
  ]}
]"#;

fn offline_config() -> Config {
    let mut config = Config::default();
    config.supplier = SupplierKind::Offline;
    config.shuffle_fallback = false;
    config
}

fn wait_for_words(app: &mut App, rx: &mpsc::Receiver<AppEvent>) {
    match rx.recv_timeout(Duration::from_secs(5)) {
        Ok(AppEvent::WordsLoaded { ticket, list }) => app.on_words_loaded(ticket, list),
        _ => panic!("word list never arrived"),
    }
}

fn play_word(app: &mut App, now: Instant) -> Vec<GameEvent> {
    let keys: String = app
        .game
        .current_word()
        .map(|w| w.key_sequence().collect())
        .unwrap_or_default();
    keys.chars()
        .flat_map(|k| app.on_key(&k.to_string(), now))
        .collect()
}

#[test]
fn full_offline_game_through_the_app() {
    let (tx, rx) = mpsc::channel();
    let config = offline_config();
    let pause = config.timings().word_pause;
    let repository = build_repository(&config);
    let mut app = App::with_repository(config, repository, tx);

    assert!(app.start_game());
    wait_for_words(&mut app, &rx);
    assert_eq!(app.status(), GameStatus::Playing);

    let total = app.game.challenges().len();
    assert_eq!(total, fallback::load().len());

    let mut now = Instant::now();
    let mut wrong = 0;
    for _ in 0..total {
        let events = play_word(&mut app, now);
        wrong += events
            .iter()
            .filter(|e| matches!(e, GameEvent::KeyWrong { .. }))
            .count();
        now += pause;
        app.on_tick(now);
    }

    assert_eq!(wrong, 0);
    assert_eq!(app.status(), GameStatus::Completed);
    let summary = app.summary();
    assert_eq!(summary.score, WORD_AWARD * total as u32);
    assert_eq!(summary.words, total);
    assert_eq!(summary.mistakes, 0);
}

#[test]
fn supplied_words_are_validated_one_by_one() {
    let repository = WordRepository::new(Box::new(JsonSupplier(ANIMALS)), 3, true);
    let list = repository.load("動物");
    let words: Vec<&str> = list.iter().map(|w| w.word()).collect();
    assert_eq!(words, vec!["小狗", "貓"]);
    // Upper-case keys from the source are folded.
    assert_eq!(list[1].key_sequence().collect::<String>(), "al ");
}

#[test]
fn garbage_supply_falls_back_to_bundled_words() {
    let repository = WordRepository::new(Box::new(JsonSupplier("{\"nope\": 1}")), 3, true);
    let list = repository.load("動物");
    let mut got: Vec<String> = list.iter().map(|w| w.word().to_string()).collect();
    let mut bundled: Vec<String> = fallback::load()
        .iter()
        .map(|w| w.word().to_string())
        .collect();
    got.sort();
    bundled.sort();
    assert_eq!(got, bundled);
}

#[test]
fn wrong_keys_never_move_the_cursor() {
    let repository = WordRepository::new(Box::new(JsonSupplier(ANIMALS)), 3, false);
    let mut game = GameState::new(Duration::from_millis(800));
    assert!(game.start_game("動物", &repository));
    let now = Instant::now();

    for (i, key) in "vul3e.3".chars().enumerate() {
        let before = game.progress();
        let events = game.handle_key("z", now);
        assert!(
            matches!(events.last(), Some(GameEvent::KeyWrong { expected, .. }) if *expected == key),
            "step {i}"
        );
        assert_eq!(game.progress(), before);
        game.handle_key(&key.to_string(), now);
    }

    assert_eq!(game.score(), WORD_AWARD);
    assert!(game.is_advancing());
    assert_eq!(game.tick(now + Duration::from_millis(800)).len(), 1);
    assert_eq!(game.current_word().map(|w| w.word()), Some("貓"));
}
