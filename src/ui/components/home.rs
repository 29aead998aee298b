use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::content::course::Lesson;
use crate::store::progress::ProgressStore;
use crate::ui::theme::Theme;

/// Landing screen: course title and the lesson list with completion marks.
pub struct Home<'a> {
    pub lessons: &'a [Lesson],
    pub progress: &'a ProgressStore,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for Home<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let done = self
            .lessons
            .iter()
            .filter(|l| self.progress.is_complete(&l.id))
            .count();
        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("app.title").to_string(),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(t!("app.subtitle").to_string(), Style::default().fg(colors.fg()))),
            Line::from(Span::styled(
                t!("home.completed", done = done, total = self.lessons.len()).to_string(),
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let mut lines = Vec::with_capacity(self.lessons.len() * 2 + 2);
        for (i, lesson) in self.lessons.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let complete = self.progress.is_complete(&lesson.id);
            let mark = if complete { " ✅" } else { "" };

            let fg = if is_selected {
                colors.accent()
            } else if complete {
                colors.completed()
            } else {
                colors.fg()
            };
            let modifier = if is_selected { Modifier::BOLD } else { Modifier::empty() };
            lines.push(Line::from(Span::styled(
                format!(" {indicator} {}{mark}", lesson.title),
                Style::default().fg(fg).add_modifier(modifier),
            )));
            if !lesson.summary.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("     {}", lesson.summary),
                    Style::default().fg(colors.muted()),
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", t!("home.start")),
            Style::default().fg(colors.muted()).add_modifier(Modifier::ITALIC),
        )));
        Paragraph::new(lines).render(layout[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str, title: &str) -> Lesson {
        Lesson {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            exercises: Vec::new(),
        }
    }

    #[test]
    fn test_completed_lessons_are_checked() {
        let lessons = [lesson("saludos", "Saludos"), lesson("numeros", "Números")];
        let mut progress = ProgressStore::in_memory();
        progress.mark_complete("saludos").unwrap();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        Home {
            lessons: &lessons,
            progress: &progress,
            selected: 1,
            theme: &theme,
        }
        .render(area, &mut buf);

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect();
        assert!(rows.iter().any(|r| r.contains("Saludos ✅")), "rows were {rows:?}");
        assert!(rows.iter().any(|r| r.contains("Números")));
        assert!(!rows.iter().any(|r| r.contains("Números ✅")));
    }
}
