use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Clear, Widget};

use crate::engine::notification::{Toast, ToastId, ToastPhase};
use crate::ui::layout::toast_slots;
use crate::ui::theme::Theme;

const CLOSE: &str = "×";

/// Clickable close glyph inside a toast slot.
pub fn close_button(slot: Rect) -> Rect {
    Rect::new(slot.right().saturating_sub(3), slot.y + 1, 1, 1)
}

/// Drawn toasts paired with their slots, oldest on top.
pub fn placed<'t>(area: Rect, toasts: &[&'t Toast]) -> Vec<(Rect, &'t Toast)> {
    toast_slots(area, toasts.len())
        .into_iter()
        .zip(toasts.iter().copied())
        .collect()
}

/// Toast whose close glyph sits under the pointer.
pub fn close_hit(area: Rect, toasts: &[&Toast], x: u16, y: u16) -> Option<ToastId> {
    placed(area, toasts)
        .into_iter()
        .find(|(slot, _)| close_button(*slot).contains(Position::new(x, y)))
        .map(|(_, toast)| toast.id)
}

pub struct ToastStack<'a> {
    pub toasts: Vec<&'a Toast>,
    pub theme: &'a Theme,
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        for (slot, toast) in placed(area, &self.toasts) {
            let bg = colors.severity(toast.severity);
            let mut style = Style::default().fg(colors.toast_fg()).bg(bg);
            if toast.phase == ToastPhase::Leaving {
                style = style.add_modifier(Modifier::DIM);
            }

            Clear.render(slot, buf);
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(style)
                .style(style)
                .render(slot, buf);

            let text_width = slot.width.saturating_sub(6) as usize;
            buf.set_stringn(
                slot.x + 1,
                slot.y + 1,
                format!(" {} {}", toast.severity.icon(), toast.message),
                text_width,
                style,
            );
            let close = close_button(slot);
            buf.set_string(close.x, close.y, CLOSE, style.add_modifier(Modifier::BOLD));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::notification::{Notifier, Severity};
    use std::time::{Duration, Instant};

    #[test]
    fn test_close_hit_targets_the_right_toast() {
        let now = Instant::now();
        let mut notifier = Notifier::default();
        let first = notifier.notify("uno", Severity::Info, now);
        let second = notifier.notify("dos", Severity::Error, now);
        notifier.tick(now + Duration::from_millis(150));

        let area = Rect::new(0, 0, 100, 30);
        let shown: Vec<&Toast> = notifier.shown().collect();
        let slots = toast_slots(area, shown.len());
        let c0 = close_button(slots[0]);
        let c1 = close_button(slots[1]);
        assert_eq!(close_hit(area, &shown, c0.x, c0.y), Some(first));
        assert_eq!(close_hit(area, &shown, c1.x, c1.y), Some(second));
        assert_eq!(close_hit(area, &shown, 0, 0), None);
    }

    #[test]
    fn test_render_shows_message_and_close() {
        let now = Instant::now();
        let mut notifier = Notifier::default();
        notifier.notify("Intenta de nuevo", Severity::Warning, now);
        notifier.tick(now + Duration::from_millis(150));

        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        ToastStack {
            toasts: notifier.shown().collect(),
            theme: &theme,
        }
        .render(area, &mut buf);

        let slot = toast_slots(area, 1)[0];
        let row: String = (slot.x..slot.right())
            .map(|x| buf[(x, slot.y + 1)].symbol().to_string())
            .collect();
        assert!(row.contains("Intenta de nuevo"), "row was {row:?}");
        assert!(row.contains(CLOSE));
    }
}
