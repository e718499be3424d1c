use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use zhuyin_typer::app::App;
use zhuyin_typer::config::{Config, SupplierKind};
use zhuyin_typer::event::{AppEvent, EventHandler};
use zhuyin_typer::session::game::GameStatus;
use zhuyin_typer::session::input::key_name;
use zhuyin_typer::ui::line_input::{InputResult, LineInput};
use zhuyin_typer::ui::screens;
use zhuyin_typer::ui::theme::Theme;
use zhuyin_typer::{logging, set_locale};

const TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(
    name = "zhuyin-typer",
    version,
    about = "Terminal typing game for the Zhuyin (Bopomofo) keyboard"
)]
struct Cli {
    #[arg(short = 'p', long, help = "Topic for the word list, e.g. 動物")]
    topic: Option<String>,

    #[arg(short, long, help = "Theme name (candy, terminal-dark)")]
    theme: Option<String>,

    #[arg(short, long, help = "Interface language (zh-TW, en)")]
    locale: Option<String>,

    #[arg(long, help = "Never ask the network for words; use the bundled list")]
    offline: bool,

    #[arg(short, long, help = "Number of words per game")]
    words: Option<usize>,

    #[arg(long, help = "Print the bundled theme names and exit")]
    list_themes: bool,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(topic) = self.topic {
            config.topic = topic;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(locale) = self.locale {
            config.locale = locale;
        }
        if self.offline {
            config.supplier = SupplierKind::Offline;
        }
        if let Some(words) = self.words {
            config.word_count = words;
        }
        config.normalize();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let (mut config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    cli.apply(&mut config);

    match logging::init(&config.log_level) {
        Ok(path) => info!(log = %path.display(), "starting zhuyin-typer"),
        Err(err) => eprintln!("warning: logging disabled: {err:#}"),
    }
    if let Some(err) = load_error {
        warn!(%err, "could not read config, using defaults");
    }
    set_locale(&config.locale);

    let events = EventHandler::new(TICK_RATE);
    let mut app = App::new(config, events.sender());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Without this some terminals never report bare modifier presses.
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
        )
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "exited with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| screens::render(frame, app, Instant::now()))?;

        let event = events.next()?;
        let now = Instant::now();
        match event {
            AppEvent::Key(key) => handle_key(app, key, now),
            AppEvent::WordsLoaded { ticket, list } => app.on_words_loaded(ticket, list),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }
        // Deadlines are checked after every event so steady typing, which
        // keeps the poll busy, cannot starve them.
        app.on_tick(now);

        if app.should_quit {
            info!("quit");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }
    if key.code == KeyCode::Esc {
        app.should_quit = true;
        return;
    }

    match app.status() {
        GameStatus::Idle => handle_idle_key(app, key),
        GameStatus::Loading => {}
        GameStatus::Playing => handle_playing_key(app, key, now),
        GameStatus::Completed => handle_completed_key(app, key),
    }
}

fn handle_idle_key(app: &mut App, key: KeyEvent) {
    match app.topic_input.handle(key) {
        InputResult::Submit => {
            app.start_game();
        }
        InputResult::Cancel => app.should_quit = true,
        InputResult::Continue => {}
    }
}

fn handle_playing_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Tab => {
            app.replay_pronunciation();
        }
        KeyCode::F(5) => {
            app.restart();
        }
        _ if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
        _ => {
            if let Some(name) = key_name(&key) {
                app.on_key(&name, now);
            }
        }
    }
}

fn handle_completed_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Not Space: it is the tone-1 key that usually ends the game.
        KeyCode::Enter => {
            app.restart();
        }
        KeyCode::Char('t') => {
            // Back to the start screen to pick another topic.
            app.topic_input = LineInput::new(&app.active_topic);
            app.go_idle();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use zhuyin_typer::app::build_repository;
    use zhuyin_typer::challenge::model::ChallengeList;

    use super::*;

    fn finished_app() -> App {
        let (tx, _rx) = mpsc::channel();
        let mut config = Config::default();
        config.supplier = SupplierKind::Offline;
        let repository = build_repository(&config);
        let mut app = App::with_repository(config, repository, tx);

        let first = first_bundled_word();
        let ticket = app.game.begin_loading().unwrap();
        app.on_words_loaded(ticket, first);
        let now = Instant::now();
        for key in "vul3al ".chars() {
            app.on_key(&key.to_string(), now);
        }
        assert_eq!(app.status(), GameStatus::Completed);
        app
    }

    fn first_bundled_word() -> ChallengeList {
        let list = zhuyin_typer::challenge::fallback::load();
        ChallengeList::single(list[0].clone())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn repeated_final_space_stays_on_the_summary() {
        let mut app = finished_app();
        let now = Instant::now();
        handle_key(&mut app, press(KeyCode::Char(' ')), now);
        handle_key(&mut app, press(KeyCode::Char(' ')), now);
        assert_eq!(app.status(), GameStatus::Completed);

        handle_key(&mut app, press(KeyCode::Enter), now);
        assert_eq!(app.status(), GameStatus::Loading);
    }

    #[test]
    fn t_returns_to_topic_screen() {
        let mut app = finished_app();
        handle_key(&mut app, press(KeyCode::Char('t')), Instant::now());
        assert_eq!(app.status(), GameStatus::Idle);
        assert_eq!(app.topic_input.value(), app.active_topic);
    }
}
