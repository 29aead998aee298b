use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::content::course::Morpheme;
use crate::session::word_buffer::WordBuffer;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Column {
    #[default]
    Roots,
    Suffixes,
}

impl Column {
    pub fn toggle(self) -> Self {
        match self {
            Column::Roots => Column::Suffixes,
            Column::Suffixes => Column::Roots,
        }
    }
}

pub struct WordBuilderView<'a> {
    pub roots: &'a [Morpheme],
    pub suffixes: &'a [Morpheme],
    pub buffer: &'a WordBuffer,
    pub column: Column,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl WordBuilderView<'_> {
    fn morpheme_list(&self, title: &str, items: &[Morpheme], focused: bool, prefix: &str) -> Paragraph<'static> {
        let colors = &self.theme.colors;
        let lines: Vec<Line> = items
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let selected = focused && i == self.selected;
                let in_use = if prefix.is_empty() {
                    self.buffer.root() == m.text
                } else {
                    self.buffer.suffixes().iter().any(|s| *s == m.text)
                };
                let mut style = Style::default().fg(if in_use { colors.completed() } else { colors.fg() });
                if selected {
                    style = style.bg(colors.selection_bg()).add_modifier(Modifier::BOLD);
                }
                Line::from(Span::styled(format!(" {prefix}{}", m.text), style))
            })
            .collect();
        let border = if focused { colors.border_focused() } else { colors.border() };
        Paragraph::new(lines).block(
            Block::bordered()
                .title(format!(" {title} "))
                .border_style(Style::default().fg(border)),
        )
    }
}

impl Widget for WordBuilderView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("nav.word_builder")))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(2), Constraint::Length(3), Constraint::Length(1)])
            .split(inner);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.morpheme_list(&t!("word.roots"), self.roots, self.column == Column::Roots, "")
            .render(cols[0], buf);
        self.morpheme_list(&t!("word.suffixes"), self.suffixes, self.column == Column::Suffixes, "-")
            .render(cols[1], buf);

        let focused_items = match self.column {
            Column::Roots => self.roots,
            Column::Suffixes => self.suffixes,
        };
        if let Some(m) = focused_items.get(self.selected) {
            Paragraph::new(Span::styled(
                format!(" {}: {}", m.text, m.tooltip),
                Style::default().fg(colors.muted()).add_modifier(Modifier::ITALIC),
            ))
            .wrap(Wrap { trim: true })
            .render(rows[1], buf);
        }

        let result_style = if self.buffer.is_empty() {
            Style::default().fg(colors.muted()).add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
        };
        Paragraph::new(Span::styled(
            format!(" {}", self.buffer.display(&t!("word.placeholder"))),
            result_style,
        ))
        .block(
            Block::bordered()
                .title(format!(" {} ", t!("word.result")))
                .border_style(Style::default().fg(colors.border())),
        )
        .render(rows[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {}: ", t!("word.history")), Style::default().fg(colors.muted())),
            Span::styled(self.buffer.history_line(), Style::default().fg(colors.fg())),
        ]))
        .render(rows[3], buf);
    }
}
