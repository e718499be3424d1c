use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

/// End-of-game numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub topic: String,
    pub score: u32,
    pub words: usize,
    pub mistakes: usize,
}

pub struct Dashboard<'a> {
    pub summary: &'a GameSummary,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(summary: &'a GameSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            t!("completed.title").to_string(),
            Style::default()
                .fg(colors.title())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{}  ", t!("completed.score")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                self.summary.score.to_string(),
                Style::default()
                    .fg(colors.celebrate())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        let mistakes_color = if self.summary.mistakes == 0 {
            colors.correct()
        } else {
            colors.wrong()
        };
        let rows = [
            (t!("completed.topic"), self.summary.topic.clone(), colors.accent()),
            (t!("completed.words"), self.summary.words.to_string(), colors.fg()),
            (
                t!("completed.mistakes"),
                self.summary.mistakes.to_string(),
                mistakes_color,
            ),
        ];
        for (slot, (label, value, color)) in layout[3..6].iter().zip(rows) {
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{label}  "), Style::default().fg(colors.hint())),
                Span::styled(value, Style::default().fg(color)),
            ]))
            .alignment(Alignment::Center)
            .render(*slot, buf);
        }

        Paragraph::new(Line::from(Span::styled(
            t!("completed.help").to_string(),
            Style::default().fg(colors.accent()),
        )))
        .alignment(Alignment::Center)
        .render(layout[7], buf);
    }
}
