use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Widget};
use rust_i18n::t;

use crate::keyboard::layout::KeyboardLayout;
use crate::keyboard::zhuyin::{PhoneticKeyMap, SymbolClass, TONE1_KEY, classify};
use crate::ui::theme::{Theme, ThemeColors};

/// On-screen Zhuyin keyboard. Each key shows its symbol and the physical
/// key it sits on.
pub struct KeyboardDiagram<'a> {
    pub layout: &'a KeyboardLayout,
    pub expected_key: Option<char>,
    pub pressed_key: Option<char>,
    pub compact: bool,
    pub theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(
        layout: &'a KeyboardLayout,
        expected_key: Option<char>,
        pressed_key: Option<char>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            layout,
            expected_key,
            pressed_key,
            compact: false,
            theme,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    fn key_width(&self) -> u16 {
        if self.compact { 4 } else { 5 }
    }

    /// Columns needed to draw the widest row, borders included.
    pub fn required_width(&self) -> u16 {
        let widest = self.layout.rows.iter().map(Vec::len).max().unwrap_or(0) as u16;
        widest * self.key_width() + ROW_OFFSETS[ROW_OFFSETS.len() - 1] + 2
    }

    fn key_style(&self, key: char) -> Style {
        let colors = &self.theme.colors;
        if self.expected_key == Some(key) {
            return Style::default()
                .fg(colors.key_expected_fg())
                .bg(colors.key_expected_bg())
                .add_modifier(Modifier::BOLD);
        }
        if self.pressed_key == Some(key) {
            return Style::default()
                .fg(colors.bg())
                .bg(colors.key_pressed_bg());
        }
        let fg = PhoneticKeyMap::global()
            .symbol_for(key)
            .and_then(classify)
            .map(|class| class_color(colors, class))
            .unwrap_or_else(|| colors.symbol_pending());
        Style::default().fg(fg).bg(colors.header_bg())
    }
}

const ROW_OFFSETS: &[u16] = &[0, 2, 3, 5];

fn class_color(colors: &ThemeColors, class: SymbolClass) -> Color {
    match class {
        SymbolClass::Initial => colors.key_initial(),
        SymbolClass::Medial => colors.key_medial(),
        SymbolClass::Final => colors.key_final(),
        SymbolClass::Tone => colors.key_tone(),
    }
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("keyboard.title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let key_width = self.key_width();
        if inner.height < 4 || inner.width < 11 * key_width {
            return;
        }

        let map = PhoneticKeyMap::global();
        let right_edge = inner.x + inner.width;

        for (row_idx, row) in self.layout.rows.iter().enumerate() {
            let y = inner.y + row_idx as u16;
            if y >= inner.y + inner.height {
                break;
            }

            if row.as_slice() == [TONE1_KEY] {
                let label = format!(" {} ", t!("keyboard.space"));
                let bar_width = (6 * key_width).min(inner.width);
                let x = inner.x + (inner.width - bar_width) / 2;
                let style = self.key_style(TONE1_KEY);
                buf.set_string(x, y, " ".repeat(bar_width as usize), style);
                let label_width = Line::from(label.as_str()).width() as u16;
                let label_x = x + bar_width.saturating_sub(label_width) / 2;
                buf.set_string(label_x, y, &label, style);
                continue;
            }

            let offset = ROW_OFFSETS.get(row_idx).copied().unwrap_or(0);
            for (col_idx, &key) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * key_width;
                if x + key_width > right_edge {
                    break;
                }

                let style = self.key_style(key);
                let cell = key_width - 1;
                buf.set_string(x, y, " ".repeat(cell as usize), style);

                let symbol = map.symbol_for(key).unwrap_or("");
                let symbol_x = if self.compact { x } else { x + 1 };
                if !symbol.is_empty() {
                    buf.set_string(symbol_x, y, symbol, style);
                }
                let key_x = x + cell - 1;
                buf.set_string(
                    key_x,
                    y,
                    key.to_string(),
                    style.remove_modifier(Modifier::BOLD).add_modifier(Modifier::DIM),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(diagram: KeyboardDiagram, width: u16) -> Buffer {
        let area = Rect::new(0, 0, width, 7);
        let mut buf = Buffer::empty(area);
        diagram.render(area, &mut buf);
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn draws_symbols_and_keys() {
        let theme = Theme::default();
        let layout = KeyboardLayout::daqian();
        let buf = render(KeyboardDiagram::new(&layout, None, None, &theme), 70);
        let top = row_text(&buf, 1);
        assert!(top.contains('ㄅ'));
        assert!(top.contains('1'));
        let home = row_text(&buf, 3);
        assert!(home.contains('ㄇ'));
    }

    #[test]
    fn expected_key_is_highlighted() {
        let theme = Theme::default();
        let layout = KeyboardLayout::daqian();
        let diagram = KeyboardDiagram::new(&layout, Some('1'), None, &theme);
        let expected_style = diagram.key_style('1');
        let other_style = diagram.key_style('2');
        assert_eq!(expected_style.bg, Some(theme.colors.key_expected_bg()));
        assert_ne!(other_style.bg, expected_style.bg);
    }

    #[test]
    fn pressed_key_uses_echo_colour() {
        let theme = Theme::default();
        let layout = KeyboardLayout::daqian();
        let diagram = KeyboardDiagram::new(&layout, Some('1'), Some('q'), &theme);
        assert_eq!(
            diagram.key_style('q').bg,
            Some(theme.colors.key_pressed_bg())
        );
        // The expected highlight wins when both land on one key.
        let diagram = KeyboardDiagram::new(&layout, Some('q'), Some('q'), &theme);
        assert_eq!(
            diagram.key_style('q').bg,
            Some(theme.colors.key_expected_bg())
        );
    }

    #[test]
    fn unmapped_keys_are_dimmed() {
        let theme = Theme::default();
        let layout = KeyboardLayout::daqian();
        let diagram = KeyboardDiagram::new(&layout, None, None, &theme);
        assert_eq!(diagram.key_style('=').fg, Some(theme.colors.symbol_pending()));
        assert_eq!(diagram.key_style('u').fg, Some(theme.colors.key_medial()));
    }

    #[test]
    fn too_narrow_draws_only_the_border() {
        let theme = Theme::default();
        let layout = KeyboardLayout::daqian();
        let buf = render(KeyboardDiagram::new(&layout, None, None, &theme), 20);
        assert!(!row_text(&buf, 1).contains('ㄅ'));
    }
}
