use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::content::course::QuizQuestion;
use crate::session::quiz::{OptionMark, QuizSession};
use crate::ui::theme::Theme;

/// Letter shown next to the option at `slot` in display order.
pub fn option_key(slot: usize) -> char {
    (b'a' + (slot % 26) as u8) as char
}

pub struct QuizView<'a> {
    pub questions: &'a [QuizQuestion],
    /// Display order of option indices, one entry per question.
    pub order: &'a [Vec<usize>],
    pub session: &'a QuizSession,
    pub selected_question: usize,
    pub selected_option: usize,
    pub theme: &'a Theme,
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("quiz.title")))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let mut lines = Vec::new();
        for (qi, question) in self.questions.iter().enumerate() {
            let is_current = qi == self.selected_question;
            let locked = self.session.is_locked(&question.id);
            let prompt_style = if is_current {
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(format!(" {}. {}", qi + 1, question.prompt), prompt_style)));

            let order = self.order.get(qi);
            for slot in 0..question.options.len() {
                let oi = order.and_then(|o| o.get(slot)).copied().unwrap_or(slot);
                let Some(option) = question.options.get(oi) else {
                    continue;
                };
                let mark = self.session.mark(&question.id, &option.value);
                let mut style = Style::default().fg(if locked && mark == OptionMark::Neutral {
                    colors.muted()
                } else {
                    colors.fg()
                });
                if let Some(bg) = colors.option_mark(mark) {
                    style = style.fg(colors.toast_fg()).bg(bg);
                }
                let cursor = is_current && !locked && slot == self.selected_option;
                if cursor {
                    style = style.bg(colors.selection_bg()).add_modifier(Modifier::BOLD);
                }
                let pointer = if cursor { ">" } else { " " };
                lines.push(Line::from(Span::styled(
                    format!("   {pointer} {}) {}", option_key(slot), option.label),
                    style,
                )));
            }
            lines.push(Line::from(""));
        }

        // Keep the selected question in view on short terminals.
        let per_question = lines.len() / self.questions.len().max(1);
        let visible = layout[0].height as usize;
        let offset = (self.selected_question * per_question)
            .saturating_sub(visible.saturating_sub(per_question.max(1)));
        Paragraph::new(lines)
            .scroll((offset.min(u16::MAX as usize) as u16, 0))
            .render(layout[0], buf);

        if self.session.total_answered() > 0 {
            let style = if self.session.all_correct() {
                Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let score = t!(
                "quiz.score",
                score = self.session.score(),
                total = self.session.total_answered()
            );
            Paragraph::new(Span::styled(format!(" {score}"), style)).render(layout[1], buf);
        }
    }
}
