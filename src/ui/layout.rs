use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const TOAST_WIDTH: u16 = 42;
pub const TOAST_HEIGHT: u16 = 3;
const TOAST_MARGIN: u16 = 1;

pub struct AppLayout {
    pub nav: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(footer_lines),
            ])
            .split(area);

        Self {
            nav: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

/// Slots for stacked toasts, top-right, oldest on top. Toasts that do
/// not fit below the navigation bar are dropped from the end.
pub fn toast_slots(area: Rect, count: usize) -> Vec<Rect> {
    let width = TOAST_WIDTH.min(area.width.saturating_sub(TOAST_MARGIN * 2));
    if width == 0 {
        return Vec::new();
    }
    let x = area.x + area.width - width - TOAST_MARGIN;
    let mut y = area.y + 1 + TOAST_MARGIN;
    let bottom = area.y + area.height;

    let mut slots = Vec::with_capacity(count);
    for _ in 0..count {
        if y + TOAST_HEIGHT > bottom {
            break;
        }
        slots.push(Rect::new(x, y, width, TOAST_HEIGHT));
        y += TOAST_HEIGHT;
    }
    slots
}

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
        if candidate.chars().count() <= width {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_slots_stack_top_right() {
        let area = Rect::new(0, 0, 120, 40);
        let slots = toast_slots(area, 3);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0], Rect::new(120 - TOAST_WIDTH - 1, 2, TOAST_WIDTH, TOAST_HEIGHT));
        assert_eq!(slots[1].y, slots[0].y + TOAST_HEIGHT);
        assert!(slots.iter().all(|r| r.right() <= area.right()));
    }

    #[test]
    fn test_toast_slots_clip_to_height() {
        let area = Rect::new(0, 0, 80, 10);
        assert_eq!(toast_slots(area, 10).len(), 2);
        assert!(toast_slots(Rect::new(0, 0, 2, 10), 1).is_empty());
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[a] uno", "[b] dos", "[c] tres"], 18);
        assert_eq!(lines, vec![" [a] uno  [b] dos".to_string(), " [c] tres".to_string()]);
        assert!(pack_hint_lines(&[], 10).is_empty());
    }
}
