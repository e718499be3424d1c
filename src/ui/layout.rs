use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;

/// Rows the full keyboard diagram needs, borders included.
pub const KEYBOARD_HEIGHT: u16 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥70 cols: full keyboard with key labels
    Medium, // 50-69 cols: compact keyboard
    Narrow, // <50 cols: word card only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 70 {
            LayoutTier::Wide
        } else if area.width >= 50 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_keyboard(&self, height: u16) -> bool {
        height >= 22 && *self != LayoutTier::Narrow
    }

    pub fn show_progress_bar(&self, height: u16) -> bool {
        height >= 14
    }

    pub fn compact_keyboard(&self) -> bool {
        *self == LayoutTier::Medium
    }
}

/// Regions of the playing screen.
pub struct AppLayout {
    pub header: Rect,
    pub progress: Option<Rect>,
    pub card: Rect,
    pub keyboard: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);
        let show_progress = tier.show_progress_bar(area.height);
        let show_keyboard = tier.show_keyboard(area.height);

        let mut constraints = vec![Constraint::Length(1)];
        if show_progress {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Min(7));
        if show_keyboard {
            constraints.push(Constraint::Length(KEYBOARD_HEIGHT));
        }
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut idx = 0;
        let mut next = || {
            let rect = chunks[idx];
            idx += 1;
            rect
        };
        let header = next();
        let progress = show_progress.then(&mut next);
        let card = next();
        let keyboard = show_keyboard.then(&mut next);
        let footer = next();

        Self {
            header,
            progress,
            card,
            keyboard,
            footer,
            tier,
        }
    }
}

/// Greedily pack key hints into as few lines as fit `width` display columns.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if Line::from(candidate.as_str()).width() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_by_width() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 100, 30)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 60, 30)), LayoutTier::Medium);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 40, 30)), LayoutTier::Narrow);
    }

    #[test]
    fn tall_wide_terminal_gets_every_region() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30));
        let keyboard = layout.keyboard.unwrap();
        assert_eq!(keyboard.height, KEYBOARD_HEIGHT);
        assert!(layout.progress.is_some());
        assert_eq!(layout.footer.y, 29);
        assert!(layout.card.height >= 7);
    }

    #[test]
    fn short_terminal_drops_keyboard_first() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 16));
        assert!(layout.keyboard.is_none());
        assert!(layout.progress.is_some());

        let layout = AppLayout::new(Rect::new(0, 0, 100, 10));
        assert!(layout.progress.is_none());
    }

    #[test]
    fn hints_wrap_by_display_width() {
        let lines = pack_hint_lines(&["[Tab] 再聽一次", "[F5] 重新開始", "[Esc] 離開"], 30);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| Line::from(l.as_str()).width() <= 30));
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 30, 10);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, area);
        let rect = centered_rect(50, 50, Rect::new(0, 0, 120, 40));
        assert_eq!(rect, Rect::new(30, 10, 60, 20));
    }
}
