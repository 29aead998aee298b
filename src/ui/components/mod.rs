pub mod home;
pub mod lesson_view;
pub mod nav_bar;
pub mod progress_bar;
pub mod quiz_view;
pub mod search_view;
pub mod toast_stack;
pub mod word_builder_view;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// `label: text` with a block cursor, for single-line inputs.
pub fn input_line<'a>(label: &str, input: &'a LineInput, focused: bool, theme: &Theme) -> Line<'a> {
    let colors = &theme.colors;
    let (before, cursor, after) = input.render_parts();
    let text = Style::default().fg(colors.fg());
    let cursor_style = if focused {
        Style::default().fg(colors.bg()).bg(colors.accent())
    } else {
        text
    };

    let mut spans = vec![
        Span::styled(format!(" {label}: "), Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)),
        Span::styled(before, text),
    ];
    match cursor {
        Some(ch) => spans.push(Span::styled(ch.to_string(), cursor_style)),
        None if focused => spans.push(Span::styled(" ", cursor_style)),
        None => {}
    }
    spans.push(Span::styled(after, text));
    Line::from(spans)
}
