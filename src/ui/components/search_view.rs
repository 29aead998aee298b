use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::content::search::{HitKind, SearchHit};
use crate::ui::components::input_line;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct SearchView<'a> {
    pub input: &'a LineInput,
    /// `None` until the first search runs.
    pub results: Option<&'a [SearchHit]>,
    pub selected: usize,
    pub theme: &'a Theme,
}

fn kind_label(kind: HitKind) -> String {
    match kind {
        HitKind::Word => t!("search.word").to_string(),
        HitKind::Phrase => t!("search.phrase").to_string(),
        HitKind::Lesson => t!("search.lesson").to_string(),
    }
}

impl Widget for SearchView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("search.title")))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        Paragraph::new(input_line(&t!("search.title"), self.input, true, self.theme)).render(layout[0], buf);

        let Some(results) = self.results else {
            return;
        };
        if results.is_empty() {
            Paragraph::new(Span::styled(
                format!(" {}", t!("search.no_results")),
                Style::default().fg(colors.muted()).add_modifier(Modifier::ITALIC),
            ))
            .render(layout[1], buf);
            return;
        }

        let lines: Vec<Line> = results
            .iter()
            .enumerate()
            .map(|(i, hit)| {
                let selected = i == self.selected;
                let mut title = Style::default().fg(colors.accent());
                if selected {
                    title = title.bg(colors.selection_bg()).add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(format!(" {} ", if selected { ">" } else { " " }), title),
                    Span::styled(hit.title.clone(), title),
                    Span::styled(format!("  {}", hit.detail), Style::default().fg(colors.fg())),
                    Span::styled(format!("  [{}]", kind_label(hit.kind)), Style::default().fg(colors.muted())),
                ])
            })
            .collect();
        let visible = layout[1].height as usize;
        let offset = (self.selected + 1).saturating_sub(visible);
        Paragraph::new(lines)
            .scroll((offset.min(u16::MAX as usize) as u16, 0))
            .render(layout[1], buf);
    }
}
