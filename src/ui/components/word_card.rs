use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::challenge::model::{Character, WordChallenge};
use crate::keyboard::zhuyin::{SymbolClass, classify};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flash {
    Correct,
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Progress {
    Done,
    Current { key_index: usize },
    Upcoming,
}

/// The word being typed: each glyph under its Zhuyin spelling, with typed
/// symbols lit up.
pub struct WordCard<'a> {
    word: &'a WordChallenge,
    char_index: usize,
    key_index: usize,
    /// The whole word is typed and the game is pausing before the next one.
    finished: bool,
    flash: Option<Flash>,
    celebrate: bool,
    theme: &'a Theme,
}

const COLUMN_GAP: usize = 4;

impl<'a> WordCard<'a> {
    pub fn new(word: &'a WordChallenge, theme: &'a Theme) -> Self {
        Self {
            word,
            char_index: 0,
            key_index: 0,
            finished: false,
            flash: None,
            celebrate: false,
            theme,
        }
    }

    pub fn cursor(mut self, char_index: usize, key_index: usize) -> Self {
        self.char_index = char_index;
        self.key_index = key_index;
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = finished;
        self
    }

    pub fn flash(mut self, flash: Option<Flash>) -> Self {
        self.flash = flash;
        self
    }

    pub fn celebrate(mut self, celebrate: bool) -> Self {
        self.celebrate = celebrate;
        self
    }

    fn progress_of(&self, idx: usize) -> Progress {
        if self.finished || idx < self.char_index {
            Progress::Done
        } else if idx == self.char_index {
            Progress::Current {
                key_index: self.key_index,
            }
        } else {
            Progress::Upcoming
        }
    }

    fn symbol_spans(&self, character: &'a Character, progress: Progress) -> Vec<Span<'a>> {
        let colors = &self.theme.colors;
        let mut spans: Vec<Span> = character
            .visible_symbols()
            .map(|(idx, symbol)| {
                let typed = match progress {
                    Progress::Done => true,
                    Progress::Current { key_index } => idx < key_index,
                    Progress::Upcoming => false,
                };
                let style = if typed {
                    Style::default()
                        .fg(colors.symbol_typed())
                        .add_modifier(Modifier::BOLD)
                } else if classify(symbol) == Some(SymbolClass::Tone) {
                    Style::default().fg(colors.tone())
                } else {
                    Style::default().fg(colors.symbol_pending())
                };
                Span::styled(symbol, style)
            })
            .collect();

        spans
    }

    fn glyph_style(&self, progress: Progress) -> Style {
        let colors = &self.theme.colors;
        match progress {
            Progress::Done => Style::default().fg(colors.glyph_done()),
            Progress::Current { .. } => Style::default()
                .fg(colors.glyph())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            Progress::Upcoming => Style::default().fg(colors.symbol_pending()),
        }
    }

    /// Symbol row and glyph row, with every character centred in its own
    /// column.
    fn word_lines(&self) -> (Line<'a>, Line<'a>) {
        let mut symbol_line: Vec<Span> = Vec::new();
        let mut glyph_line: Vec<Span> = Vec::new();

        for (idx, character) in self.word.characters().iter().enumerate() {
            let progress = self.progress_of(idx);
            let symbols = self.symbol_spans(character, progress);
            let symbols_width: usize = symbols.iter().map(Span::width).sum();
            let glyph = Span::styled(character.glyph(), self.glyph_style(progress));
            let glyph_width = glyph.width();
            let column = symbols_width.max(glyph_width);

            if idx > 0 {
                symbol_line.push(Span::raw(" ".repeat(COLUMN_GAP)));
                glyph_line.push(Span::raw(" ".repeat(COLUMN_GAP)));
            }
            push_centered(&mut symbol_line, symbols, symbols_width, column);
            push_centered(&mut glyph_line, vec![glyph], glyph_width, column);
        }

        (Line::from(symbol_line), Line::from(glyph_line))
    }
}

fn push_centered<'a>(line: &mut Vec<Span<'a>>, spans: Vec<Span<'a>>, width: usize, column: usize) {
    let pad = column.saturating_sub(width);
    let left = pad / 2;
    if left > 0 {
        line.push(Span::raw(" ".repeat(left)));
    }
    line.extend(spans);
    if pad - left > 0 {
        line.push(Span::raw(" ".repeat(pad - left)));
    }
}

impl Widget for WordCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let (border, bg) = match self.flash {
            Some(Flash::Wrong) => (colors.wrong(), colors.wrong_bg()),
            Some(Flash::Correct) => (colors.correct(), colors.bg()),
            None => (colors.border_focused(), colors.bg()),
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(bg));
        let inner = block.inner(area);
        block.render(area, buf);

        let (symbol_line, glyph_line) = self.word_lines();
        let mut lines = vec![Line::default(), symbol_line, glyph_line, Line::default()];

        if self.celebrate {
            lines.push(Line::from(Span::styled(
                t!("playing.celebrate", word = self.word.word()).to_string(),
                Style::default()
                    .fg(colors.celebrate())
                    .add_modifier(Modifier::BOLD),
            )));
        } else if self.flash == Some(Flash::Wrong) {
            lines.push(Line::from(Span::styled(
                t!("playing.try_again").to_string(),
                Style::default().fg(colors.wrong()),
            )));
        } else if let Some(hint) = self.word.hint() {
            lines.push(Line::from(Span::styled(
                t!("playing.hint", hint = hint).to_string(),
                Style::default().fg(colors.hint()),
            )));
        }

        // Vertically centre the content.
        let content_height = lines.len() as u16;
        let top = inner.height.saturating_sub(content_height) / 2;
        let body = Rect {
            y: inner.y + top,
            height: inner.height - top,
            ..inner
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(body, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::fallback;

    fn xiao_mao() -> WordChallenge {
        fallback::load()[0].clone()
    }

    fn styled_text(line: &Line, pred: impl Fn(&Style) -> bool) -> String {
        line.spans
            .iter()
            .filter(|s| pred(&s.style))
            .map(|s| s.content.as_ref())
            .collect()
    }

    #[test]
    fn typed_symbols_follow_key_index() {
        let theme = Theme::default();
        let word = xiao_mao();
        let typed = Some(theme.colors.symbol_typed());

        let card = WordCard::new(&word, &theme).cursor(0, 2);
        let (symbols, _) = card.word_lines();
        assert_eq!(styled_text(&symbols, |s| s.fg == typed), "ㄒㄧ");

        let card = WordCard::new(&word, &theme).cursor(1, 1);
        let (symbols, _) = card.word_lines();
        assert_eq!(styled_text(&symbols, |s| s.fg == typed), "ㄒㄧㄠˇㄇ");
    }

    #[test]
    fn finished_word_is_fully_lit() {
        let theme = Theme::default();
        let word = xiao_mao();
        let typed = Some(theme.colors.symbol_typed());
        let card = WordCard::new(&word, &theme).finished(true);
        let (symbols, glyphs) = card.word_lines();
        assert_eq!(styled_text(&symbols, |s| s.fg == typed), "ㄒㄧㄠˇㄇㄠ");
        let done = Some(theme.colors.glyph_done());
        assert_eq!(styled_text(&glyphs, |s| s.fg == done), "小貓");
    }

    #[test]
    fn current_glyph_is_emphasised() {
        let theme = Theme::default();
        let word = xiao_mao();
        let card = WordCard::new(&word, &theme).cursor(1, 0);
        let (_, glyphs) = card.word_lines();
        let current = styled_text(&glyphs, |s| s.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(current, "貓");
    }

    #[test]
    fn columns_line_up() {
        let theme = Theme::default();
        let word = xiao_mao();
        let (symbols, glyphs) = WordCard::new(&word, &theme).word_lines();
        assert_eq!(symbols.width(), glyphs.width());
    }
}
