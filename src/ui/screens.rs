use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;

use crate::app::App;
use crate::keyboard::display::key_with_symbol;
use crate::keyboard::layout::KeyboardLayout;
use crate::session::feedback::Signal;
use crate::session::game::GameStatus;
use crate::ui::components::dashboard::Dashboard;
use crate::ui::components::keyboard_diagram::KeyboardDiagram;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::components::word_card::{Flash, WordCard};
use crate::ui::layout::{AppLayout, centered_rect, pack_hint_lines};

pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()).fg(colors.fg()));
    frame.render_widget(bg, area);

    match app.status() {
        GameStatus::Idle => render_idle(frame, app),
        GameStatus::Loading => render_loading(frame, app),
        GameStatus::Playing => render_playing(frame, app, now),
        GameStatus::Completed => render_completed(frame, app),
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect, hints: &[&str]) {
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .take(area.height as usize)
        .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.colors.hint()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_idle(frame: &mut Frame, app: &App) {
    let colors = &app.theme.colors;
    let card = centered_rect(50, 60, frame.area());

    let block = Block::bordered()
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let title = Paragraph::new(Line::from(Span::styled(
        t!("app.title").to_string(),
        Style::default()
            .fg(colors.title())
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, rows[1]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        t!("app.subtitle").to_string(),
        Style::default().fg(colors.hint()),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, rows[2]);

    let label = Paragraph::new(Line::from(Span::styled(
        t!("idle.topic_label").to_string(),
        Style::default().fg(colors.fg()),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(label, rows[3]);

    let input_area = centered_rect(70, 100, rows[4]);
    let (before, cursor_ch, after) = app.topic_input.render_parts();
    let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());
    let mut spans = vec![Span::styled(before.to_string(), Style::default().fg(colors.fg()))];
    match cursor_ch {
        Some(ch) => spans.push(Span::styled(ch.to_string(), cursor_style)),
        None => spans.push(Span::styled(" ", cursor_style)),
    }
    spans.push(Span::styled(after.to_string(), Style::default().fg(colors.fg())));
    let input = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .border_style(Style::default().fg(colors.border_focused()))
                .title(format!(" {} ", t!("idle.placeholder"))),
        );
    frame.render_widget(input, input_area);

    let start = Paragraph::new(Line::from(Span::styled(
        t!("idle.start").to_string(),
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(start, rows[5]);

    let hints = [
        t!("idle.help_start"),
        t!("idle.help_topics"),
        t!("idle.help_quit"),
    ];
    let hints: Vec<&str> = hints.iter().map(|h| h.as_ref()).collect();
    render_footer(frame, app, rows[7], &hints);
}

fn render_loading(frame: &mut Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = frame.area();
    let middle = Rect {
        y: area.y + area.height / 2,
        height: 1.min(area.height),
        ..area
    };
    let message = Paragraph::new(Line::from(Span::styled(
        t!("loading.message", topic = app.active_topic.as_str()).to_string(),
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(message, middle);
}

fn render_playing(frame: &mut Frame, app: &App, now: Instant) {
    let colors = &app.theme.colors;
    let layout = AppLayout::new(frame.area());
    let game = &app.game;

    let Some(word) = game.current_word() else {
        return;
    };
    let total = game.challenges().len();

    let mut header = vec![
        Span::styled(
            format!(" {} ", t!("app.title")),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", t!("playing.score", score = game.score())),
            Style::default()
                .fg(colors.celebrate())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " {} ",
                t!(
                    "playing.word_progress",
                    current = game.word_index() + 1,
                    total = total
                )
            ),
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ];
    // Without the keyboard diagram the next key has to be spelled out.
    if layout.keyboard.is_none() {
        if let Some(expected) = game.expected_key() {
            header.push(Span::styled(
                format!(
                    " {} ",
                    t!("playing.next_key", key = key_with_symbol(expected))
                ),
                Style::default().fg(colors.accent()).bg(colors.header_bg()),
            ));
        }
    }
    frame.render_widget(
        Paragraph::new(Line::from(header)).style(Style::default().bg(colors.header_bg())),
        layout.header,
    );

    if let Some(progress_area) = layout.progress {
        let bar = ProgressBar::new(
            &t!("playing.progress_label"),
            game.words_completed(),
            total,
            app.theme,
        );
        frame.render_widget(bar, progress_area);
    }

    let flash = if app.feedback.is_active(Signal::Wrong, now) {
        Some(Flash::Wrong)
    } else if app.feedback.is_active(Signal::Correct, now) {
        Some(Flash::Correct)
    } else {
        None
    };
    let card = WordCard::new(word, app.theme)
        .cursor(game.char_index(), game.key_index())
        .finished(game.is_advancing())
        .flash(flash)
        .celebrate(app.feedback.celebrated_word(now).is_some());
    frame.render_widget(card, layout.card);

    if let Some(keyboard_area) = layout.keyboard {
        let keyboard_layout = KeyboardLayout::daqian();
        let pressed = app
            .feedback
            .echoed_key(now)
            .and_then(single_char);
        let diagram = KeyboardDiagram::new(
            &keyboard_layout,
            game.expected_key(),
            pressed,
            app.theme,
        )
        .compact(layout.tier.compact_keyboard());
        let width = diagram.required_width().min(keyboard_area.width);
        let centered = Rect {
            x: keyboard_area.x + (keyboard_area.width - width) / 2,
            width,
            ..keyboard_area
        };
        frame.render_widget(diagram, centered);
    }

    let mut hints = Vec::new();
    if app.can_pronounce() {
        hints.push(t!("playing.help_replay"));
    }
    hints.push(t!("playing.help_restart"));
    hints.push(t!("playing.help_quit"));
    let hints: Vec<&str> = hints.iter().map(|h| h.as_ref()).collect();
    render_footer(frame, app, layout.footer, &hints);
}

fn render_completed(frame: &mut Frame, app: &App) {
    let summary = app.summary();
    let area = centered_rect(50, 50, frame.area());
    frame.render_widget(Dashboard::new(&summary, app.theme), area);
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::app::build_repository;
    use crate::config::{Config, SupplierKind};
    use crate::event::AppEvent;

    fn offline_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel();
        let mut config = Config::default();
        config.supplier = SupplierKind::Offline;
        config.shuffle_fallback = false;
        let repository = build_repository(&config);
        (App::with_repository(config, repository, tx), rx)
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| render(frame, app, Instant::now()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn every_screen_renders_at_several_sizes() {
        let (mut app, rx) = offline_app();
        for (w, h) in [(120, 40), (60, 24), (30, 10)] {
            draw(&app, w, h);
        }
        app.start_game();
        draw(&app, 80, 24);

        let Ok(AppEvent::WordsLoaded { ticket, list }) = rx.recv() else {
            panic!("expected a word list");
        };
        app.on_words_loaded(ticket, list);
        for (w, h) in [(120, 40), (60, 24), (40, 12), (10, 3)] {
            draw(&app, w, h);
        }
    }

    #[test]
    fn playing_screen_shows_the_current_word() {
        let (mut app, rx) = offline_app();
        app.start_game();
        let Ok(AppEvent::WordsLoaded { ticket, list }) = rx.recv() else {
            panic!("expected a word list");
        };
        app.on_words_loaded(ticket, list);
        let text = draw(&app, 100, 30);
        assert!(text.contains('小'));
        assert!(text.contains('貓'));
        assert!(text.contains('ㄒ'));
    }

    #[test]
    fn single_char_only_accepts_one_char() {
        assert_eq!(single_char("v"), Some('v'));
        assert_eq!(single_char(" "), Some(' '));
        assert_eq!(single_char("enter"), None);
        assert_eq!(single_char(""), None);
    }
}
