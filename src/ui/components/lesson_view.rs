use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::content::course::Lesson;
use crate::session::lesson::LessonTracker;
use crate::ui::components::input_line;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct LessonView<'a> {
    pub lesson: &'a Lesson,
    pub tracker: &'a LessonTracker,
    pub selected: usize,
    pub input: &'a LineInput,
    pub complete: bool,
    pub theme: &'a Theme,
}

impl Widget for LessonView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.complete {
            format!(" {} ✅ ", self.lesson.title)
        } else {
            format!(" {} ", self.lesson.title)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Span::styled(
            format!(" {}", self.lesson.summary),
            Style::default().fg(colors.muted()),
        ))
        .wrap(Wrap { trim: false })
        .render(layout[0], buf);

        ProgressBar::new(
            &t!("lesson.progress"),
            self.tracker.ratio(),
            self.tracker.progress_rounded(),
            self.theme,
        )
        .detail(format!(
            "{}/{}",
            self.tracker.completed_count(),
            self.tracker.total_exercises()
        ))
        .render(layout[1], buf);

        let mut lines = Vec::with_capacity(self.lesson.exercises.len());
        for (i, exercise) in self.lesson.exercises.iter().enumerate() {
            let done = self.tracker.is_done(&exercise.id);
            let is_selected = i == self.selected;
            let marker = if done { "✓" } else { "·" };
            let indicator = if is_selected { ">" } else { " " };

            let mut style = if done {
                Style::default().fg(colors.completed())
            } else {
                Style::default().fg(colors.fg())
            };
            if is_selected {
                style = style.add_modifier(Modifier::BOLD).bg(colors.selection_bg());
            }
            let mut spans = vec![Span::styled(format!(" {indicator} {marker} {}", exercise.prompt), style)];
            if done {
                spans.push(Span::styled(
                    format!("  {} ({})", exercise.answer, t!("lesson.done")),
                    Style::default().fg(colors.muted()),
                ));
            }
            lines.push(Line::from(spans));
        }
        Paragraph::new(lines).render(layout[2], buf);

        let mut footer = vec![input_line(&t!("lesson.answer"), self.input, true, self.theme)];
        if let Some(hint) = self
            .lesson
            .exercises
            .get(self.selected)
            .and_then(|e| e.hint.as_deref())
        {
            footer.push(Line::from(Span::styled(
                format!(" {}: {hint}", t!("lesson.hint")),
                Style::default().fg(colors.muted()).add_modifier(Modifier::ITALIC),
            )));
        }
        Paragraph::new(footer).render(layout[3], buf);
    }
}
