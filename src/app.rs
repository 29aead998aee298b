use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use anyhow::{Result, anyhow};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use ratatui::layout::Rect;
use rust_i18n::t;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::content::course::{Course, parse_target};
use crate::content::search::{CourseIndex, HitKind, Lookup, SearchHit};
use crate::content::spelling::answers_match;
use crate::engine::navigation::{
    DropdownId, DropdownItem, NavEvent, NavItem, NavState, NavTree, Route, is_desktop, transition,
};
use crate::engine::notification::{Notifier, Severity, ToastId};
use crate::engine::scheduler::Scheduler;
use crate::session::lesson::{ExerciseOutcome, LessonTracker};
use crate::session::quiz::QuizSession;
use crate::session::word_buffer::WordBuffer;
use crate::store::progress::ProgressStore;
use crate::ui::components::nav_bar::{MenuRow, NavGeometry, NavHit, menu_rows};
use crate::ui::components::toast_stack;
use crate::ui::components::word_builder_view::Column;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub const LESSONS_MENU: DropdownId = DropdownId(0);
pub const PRACTICE_MENU: DropdownId = DropdownId(1);
pub const RESOURCES_MENU: DropdownId = DropdownId(2);

/// Navigation tree for a course: home, the three dropdowns, then search.
pub fn build_nav_tree(course: &Course) -> NavTree {
    let lessons = course
        .lessons
        .iter()
        .map(|l| DropdownItem {
            label: l.title.clone(),
            target: Some(Route::Lesson(l.id.clone())),
        })
        .collect();
    let practice = vec![
        DropdownItem {
            label: t!("nav.quiz").to_string(),
            target: Some(Route::Quiz),
        },
        DropdownItem {
            label: t!("nav.word_builder").to_string(),
            target: Some(Route::WordBuilder),
        },
    ];
    let resources = course
        .resources
        .iter()
        .map(|r| DropdownItem {
            label: r.label.clone(),
            target: r.target.as_deref().and_then(parse_target),
        })
        .collect();

    NavTree {
        items: vec![
            NavItem::Link {
                label: t!("nav.home").to_string(),
                route: Route::Home,
            },
            NavItem::Dropdown {
                id: LESSONS_MENU,
                label: t!("nav.lessons").to_string(),
                items: lessons,
            },
            NavItem::Dropdown {
                id: PRACTICE_MENU,
                label: t!("nav.practice").to_string(),
                items: practice,
            },
            NavItem::Dropdown {
                id: RESOURCES_MENU,
                label: t!("nav.resources").to_string(),
                items: resources,
            },
            NavItem::Link {
                label: t!("nav.search").to_string(),
                route: Route::Search,
            },
        ],
    }
}

pub struct App {
    pub route: Route,
    pub config: Config,
    pub theme: Theme,
    pub course: Course,
    pub nav_tree: NavTree,
    pub nav: NavState,
    pub nav_cursor: usize,
    pub nav_geometry: NavGeometry,
    pub area: Rect,
    pub notifier: Notifier,
    pub progress: ProgressStore,
    pub tracker: LessonTracker,
    pub home_selected: usize,
    pub exercise_selected: usize,
    pub lesson_input: LineInput,
    pub quiz: QuizSession,
    /// Display order of each question's options.
    pub quiz_order: Vec<Vec<usize>>,
    pub quiz_question: usize,
    pub quiz_option: usize,
    pub word: WordBuffer,
    pub word_column: Column,
    pub word_selected: usize,
    pub search_input: LineInput,
    pub search_results: Option<Vec<SearchHit>>,
    pub search_selected: usize,
    pub should_quit: bool,
    hover_close: Scheduler<DropdownId>,
    lookup: Box<dyn Lookup>,
}

impl App {
    pub fn new(config: Config, theme: Theme, progress: ProgressStore) -> Result<Self> {
        let course = Course::load()?;
        Ok(Self::with_parts(config, theme, course, progress))
    }

    pub fn with_parts(config: Config, theme: Theme, course: Course, progress: ProgressStore) -> Self {
        let nav_tree = build_nav_tree(&course);
        let lookup: Box<dyn Lookup> = Box::new(CourseIndex::from_course(&course));

        let mut vocabulary: Vec<String> = course.vocabulary.iter().map(|v| v.quechua.clone()).collect();
        vocabulary.extend(course.roots.iter().map(|r| r.text.clone()));

        let mut quiz_order: Vec<Vec<usize>> = course
            .quiz
            .iter()
            .map(|q| (0..q.options.len()).collect())
            .collect();
        if config.shuffle_quiz_options {
            let mut rng = SmallRng::from_entropy();
            for order in &mut quiz_order {
                order.shuffle(&mut rng);
            }
        }

        let area = Rect::new(0, 0, 120, 40);
        let nav = NavState::new(is_desktop(area.width, config.desktop_breakpoint));
        let notifier = Notifier::new(config.toast_timing());

        let mut app = Self {
            route: Route::Home,
            theme,
            course,
            nav_tree,
            nav,
            nav_cursor: 0,
            nav_geometry: NavGeometry::default(),
            area,
            notifier,
            progress,
            tracker: LessonTracker::new(),
            home_selected: 0,
            exercise_selected: 0,
            lesson_input: LineInput::default(),
            quiz: QuizSession::new(),
            quiz_order,
            quiz_question: 0,
            quiz_option: 0,
            word: WordBuffer::new(),
            word_column: Column::Roots,
            word_selected: 0,
            search_input: LineInput::default().with_vocabulary(vocabulary),
            search_results: None,
            search_selected: 0,
            should_quit: false,
            hover_close: Scheduler::new(),
            lookup,
            config,
        };
        app.refresh_geometry();
        app
    }

    /// Swap the search backend.
    pub fn set_lookup(&mut self, lookup: Box<dyn Lookup>) {
        self.lookup = lookup;
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> ToastId {
        self.notifier.notify(message, severity, now)
    }

    pub fn report_error(&mut self, err: &anyhow::Error, now: Instant) {
        error!(error = %err, "handler failed");
        self.notify(t!("notify.unexpected_error"), Severity::Error, now);
    }

    /// Run one event handler. Errors and panics both end up as the
    /// generic error toast so the loop keeps going.
    pub fn guarded(&mut self, now: Instant, handler: impl FnOnce(&mut App) -> Result<()>) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(self))).unwrap_or_else(|payload| {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            Err(anyhow!("handler panicked: {msg}"))
        });
        if let Err(err) = outcome {
            self.report_error(&err, now);
        }
    }

    /// Earliest pending toast or hover-close deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.notifier.next_due(), self.hover_close.next_due()]
            .into_iter()
            .flatten()
            .min()
    }

    pub fn timers_due(&self, now: Instant) -> bool {
        self.next_deadline().is_some_and(|due| due <= now)
    }

    /// Advance toast staging and fire pending hover closes.
    pub fn tick(&mut self, now: Instant) {
        self.notifier.tick(now);
        for id in self.hover_close.drain_due(now) {
            self.dispatch_nav(NavEvent::HoverLeave(id));
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.area = Rect::new(0, 0, width, height);
        let desktop = is_desktop(width, self.config.desktop_breakpoint);
        if desktop != self.nav.desktop {
            self.dispatch_nav(NavEvent::Viewport { desktop });
        } else {
            self.refresh_geometry();
        }
    }

    // --- navigation ---

    pub fn dispatch_nav(&mut self, event: NavEvent) {
        let before = self.nav;
        self.nav = transition(before, event);
        if self.nav != before {
            debug!(?event, ?before, after = ?self.nav, "nav transition");
        }
        if self.nav.open_dropdown.is_none() {
            self.hover_close.cancel_where(|_| true);
        }
        if !before.anything_open() {
            self.nav_cursor = 0;
        }
        let rows = menu_rows(&self.nav_tree, &self.nav).len();
        self.nav_cursor = self.nav_cursor.min(rows.saturating_sub(1));
        self.refresh_geometry();
    }

    fn refresh_geometry(&mut self) {
        let bar = Rect::new(self.area.x, self.area.y, self.area.width, 1);
        self.nav_geometry = NavGeometry::compute(
            self.area,
            bar,
            &self.nav_tree,
            &self.nav,
            &format!(" {} ", t!("app.title")),
            &t!("nav.menu"),
        );
    }

    pub fn toggle_menu(&mut self) {
        if self.nav.desktop {
            debug!("menu toggle ignored on wide terminal");
            return;
        }
        self.dispatch_nav(NavEvent::ToggleMenu);
    }

    /// Alt+N: follow a link or toggle a dropdown among the top-level items.
    pub fn nav_hotkey(&mut self, number: usize, now: Instant) {
        let Some(index) = number.checked_sub(1) else {
            return;
        };
        if index >= self.nav_tree.items.len() {
            debug!(number, "no nav item for hotkey");
            return;
        }
        if !self.nav.desktop && !self.nav.menu_open && self.nav_tree.dropdown_at(index).is_some() {
            self.dispatch_nav(NavEvent::ToggleMenu);
        }
        self.activate_item(index, now);
    }

    fn activate_item(&mut self, index: usize, now: Instant) {
        match self.nav_tree.items.get(index) {
            Some(NavItem::Link { route, .. }) => {
                let route = route.clone();
                self.dispatch_nav(NavEvent::SelectItem);
                self.navigate(route, now);
            }
            Some(NavItem::Dropdown { id, .. }) => {
                let id = *id;
                self.hover_close.cancel_where(|_| true);
                self.dispatch_nav(NavEvent::ToggleDropdown(id));
            }
            None => {}
        }
    }

    /// Choose an entry of a dropdown. Placeholders only close the menu.
    pub fn select_entry(&mut self, dropdown: DropdownId, index: usize, now: Instant) {
        let target = self
            .nav_tree
            .dropdown_items(dropdown)
            .and_then(|items| items.get(index))
            .and_then(|item| item.target.clone());
        self.dispatch_nav(NavEvent::SelectItem);
        match target {
            Some(route) => self.navigate(route, now),
            None => debug!(?dropdown, index, "placeholder entry selected"),
        }
    }

    pub fn nav_rows(&self) -> Vec<MenuRow> {
        menu_rows(&self.nav_tree, &self.nav)
    }

    pub fn nav_move(&mut self, down: bool) {
        let count = self.nav_rows().len();
        if count == 0 {
            return;
        }
        self.nav_cursor = if down {
            (self.nav_cursor + 1) % count
        } else {
            (self.nav_cursor + count - 1) % count
        };
    }

    pub fn nav_activate(&mut self, now: Instant) {
        match self.nav_rows().get(self.nav_cursor).copied() {
            Some(MenuRow::Item(i)) => self.activate_item(i, now),
            Some(MenuRow::Entry { dropdown, index }) => self.select_entry(dropdown, index, now),
            None => {}
        }
    }

    pub fn click(&mut self, x: u16, y: u16, now: Instant) {
        let closed = {
            let shown: Vec<_> = self.notifier.shown().collect();
            toast_stack::close_hit(self.area, &shown, x, y)
        };
        if let Some(id) = closed {
            self.notifier.dismiss(id);
            return;
        }

        match self.nav_geometry.hit(x, y) {
            Some(NavHit::Item(i)) => self.activate_item(i, now),
            Some(NavHit::Row(row)) => {
                if let Some(pos) = self.nav_rows().iter().position(|r| *r == row) {
                    self.nav_cursor = pos;
                }
                match row {
                    MenuRow::Item(i) => self.activate_item(i, now),
                    MenuRow::Entry { dropdown, index } => self.select_entry(dropdown, index, now),
                }
            }
            Some(NavHit::MenuToggle) => self.toggle_menu(),
            Some(NavHit::Inside) => {}
            None => {
                if self.nav.anything_open() {
                    self.dispatch_nav(NavEvent::OutsideClick);
                }
            }
        }
    }

    /// Hover handling for wide terminals: entering a dropdown toggle opens
    /// it, leaving both toggle and panel closes it after a short delay.
    pub fn pointer_moved(&mut self, x: u16, y: u16, now: Instant) {
        if !self.nav.desktop {
            return;
        }
        if let Some(NavHit::Item(i)) = self.nav_geometry.hit(x, y)
            && let Some(id) = self.nav_tree.dropdown_at(i)
        {
            self.hover_close.cancel_where(|_| true);
            if !self.nav.is_open(id) {
                self.dispatch_nav(NavEvent::HoverEnter(id));
            }
            return;
        }

        let Some(open) = self.nav.open_dropdown else {
            return;
        };
        if self.nav_geometry.over_dropdown(&self.nav_tree, open, x, y) {
            self.hover_close.cancel_where(|_| true);
        } else if self.hover_close.is_empty() {
            self.hover_close.schedule(now, self.config.hover_close_delay(), open);
        }
    }

    pub fn hover_close_pending(&self) -> bool {
        !self.hover_close.is_empty()
    }

    /// Mouse wheel over the content. Suppressed while the menu covers it.
    pub fn scroll_content(&mut self, down: bool) -> bool {
        if self.nav.scroll_locked() {
            return false;
        }
        match self.route {
            Route::Home => self.select_home(down),
            Route::Lesson(_) => self.select_exercise(down),
            Route::Quiz => self.select_question(down),
            Route::WordBuilder => self.word_select(down),
            Route::Search => self.select_result(down),
        }
        true
    }

    // --- screens ---

    pub fn navigate(&mut self, route: Route, now: Instant) {
        match route {
            Route::Lesson(id) => {
                self.start_lesson(&id, now);
            }
            other => {
                info!(route = ?other, "navigate");
                self.route = other;
            }
        }
    }

    /// Start (or restart) a lesson. Unknown ids are ignored.
    pub fn start_lesson(&mut self, lesson_id: &str, now: Instant) -> bool {
        let Some(lesson) = self.course.lesson(lesson_id) else {
            debug!(lesson_id, "unknown lesson");
            return false;
        };
        self.tracker.start_lesson(&lesson.id, lesson.exercises.len());
        info!(lesson_id, exercises = lesson.exercises.len(), "lesson started");

        self.route = Route::Lesson(lesson_id.to_string());
        self.exercise_selected = 0;
        self.lesson_input.clear();
        if let Some(pos) = self.course.lessons.iter().position(|l| l.id == lesson_id) {
            self.home_selected = pos;
        }
        self.notify(t!("notify.lesson_started", id = lesson_id), Severity::Info, now);
        true
    }

    /// Record an exercise of the running lesson, completing the lesson when
    /// it was the last one.
    pub fn complete_exercise(&mut self, exercise_id: &str, now: Instant) -> Result<ExerciseOutcome> {
        let outcome = self.tracker.complete_exercise(exercise_id);
        debug!(exercise_id, ?outcome, "exercise");
        if let ExerciseOutcome::LessonComplete { ref lesson_id } = outcome {
            let lesson_id = lesson_id.clone();
            self.complete_lesson(&lesson_id, now)?;
        }
        Ok(outcome)
    }

    pub fn complete_lesson(&mut self, lesson_id: &str, now: Instant) -> Result<()> {
        info!(lesson_id, "lesson complete");
        self.progress.mark_complete(lesson_id)?;
        self.notify(t!("notify.lesson_complete"), Severity::Success, now);
        Ok(())
    }

    /// Check the typed answer against the selected exercise.
    pub fn submit_exercise(&mut self, now: Instant) -> Result<()> {
        let given = self.lesson_input.value().to_string();
        if given.trim().is_empty() {
            return Ok(());
        }
        let Some(lesson) = self.tracker.lesson_id().and_then(|id| self.course.lesson(id)) else {
            return Ok(());
        };
        let Some(exercise) = lesson.exercises.get(self.exercise_selected) else {
            return Ok(());
        };
        if self.tracker.is_done(&exercise.id) {
            self.lesson_input.clear();
            return Ok(());
        }
        if !answers_match(&exercise.answer, &given) {
            debug!(exercise = %exercise.id, %given, "wrong answer");
            self.notify(t!("notify.wrong_answer"), Severity::Warning, now);
            return Ok(());
        }

        let exercise_id = exercise.id.clone();
        let next = lesson
            .exercises
            .iter()
            .enumerate()
            .skip(self.exercise_selected + 1)
            .chain(lesson.exercises.iter().enumerate().take(self.exercise_selected))
            .find(|(_, e)| !self.tracker.is_done(&e.id))
            .map(|(i, _)| i);

        self.lesson_input.clear();
        if let Some(next) = next {
            self.exercise_selected = next;
        }
        self.complete_exercise(&exercise_id, now)?;
        Ok(())
    }

    pub fn select_exercise(&mut self, down: bool) {
        let count = self
            .tracker
            .lesson_id()
            .and_then(|id| self.course.lesson(id))
            .map_or(0, |l| l.exercises.len());
        if count == 0 {
            return;
        }
        self.exercise_selected = if down {
            (self.exercise_selected + 1) % count
        } else {
            (self.exercise_selected + count - 1) % count
        };
        self.lesson_input.clear();
    }

    pub fn select_home(&mut self, down: bool) {
        let count = self.course.lessons.len();
        if count == 0 {
            return;
        }
        self.home_selected = if down {
            (self.home_selected + 1) % count
        } else {
            (self.home_selected + count - 1) % count
        };
    }

    pub fn start_selected_lesson(&mut self, now: Instant) {
        if let Some(id) = self.course.lessons.get(self.home_selected).map(|l| l.id.clone()) {
            self.start_lesson(&id, now);
        }
    }

    // --- quiz ---

    /// Grade `chosen` for a question. `None` when the question is unknown or
    /// was already answered.
    pub fn check_quiz_answer(&mut self, question_id: &str, chosen: &str) -> Option<bool> {
        let Some(question) = self.course.question(question_id) else {
            debug!(question_id, "unknown question");
            return None;
        };
        let result = self.quiz.check_answer(question_id, chosen, &question.correct);
        match result {
            Some(correct) => info!(
                question_id,
                chosen,
                correct,
                score = self.quiz.score(),
                total = self.quiz.total_answered(),
                "quiz answer"
            ),
            None => debug!(question_id, "question already answered"),
        }
        result
    }

    /// Answer the current question with the option shown at `slot`.
    pub fn answer_slot(&mut self, slot: usize) -> Option<bool> {
        let question = self.course.quiz.get(self.quiz_question)?;
        let index = self
            .quiz_order
            .get(self.quiz_question)
            .and_then(|o| o.get(slot))
            .copied()?;
        let value = question.options.get(index)?.value.clone();
        let question_id = question.id.clone();

        self.quiz_option = slot;
        let result = self.check_quiz_answer(&question_id, &value);
        if result.is_some() && self.quiz_question + 1 < self.course.quiz.len() {
            self.quiz_question += 1;
            self.quiz_option = 0;
        }
        result
    }

    pub fn answer_selected(&mut self) -> Option<bool> {
        self.answer_slot(self.quiz_option)
    }

    pub fn select_question(&mut self, down: bool) {
        let count = self.course.quiz.len();
        if count == 0 {
            return;
        }
        self.quiz_question = if down {
            (self.quiz_question + 1).min(count - 1)
        } else {
            self.quiz_question.saturating_sub(1)
        };
        self.quiz_option = 0;
    }

    pub fn select_option(&mut self, right: bool) {
        let count = self
            .course
            .quiz
            .get(self.quiz_question)
            .map_or(0, |q| q.options.len());
        if count == 0 {
            return;
        }
        self.quiz_option = if right {
            (self.quiz_option + 1) % count
        } else {
            (self.quiz_option + count - 1) % count
        };
    }

    pub fn reset_quiz(&mut self, now: Instant) {
        self.quiz.reset();
        self.quiz_question = 0;
        self.quiz_option = 0;
        info!("quiz reset");
        self.notify(t!("notify.quiz_reset"), Severity::Info, now);
    }

    // --- word builder ---

    pub fn select_root(&mut self, root: &str) -> bool {
        if !self.course.roots.iter().any(|r| r.text == root) {
            debug!(root, "unknown root");
            return false;
        }
        self.word.set_root(root);
        true
    }

    pub fn add_suffix(&mut self, suffix: &str) -> bool {
        if !self.course.suffixes.iter().any(|s| s.text == suffix) {
            debug!(suffix, "unknown suffix");
            return false;
        }
        self.word.add_suffix(suffix);
        true
    }

    pub fn remove_last_suffix(&mut self) -> Option<String> {
        self.word.remove_last()
    }

    pub fn clear_word(&mut self) {
        self.word.clear();
    }

    /// Apply the highlighted root or suffix.
    pub fn word_activate(&mut self) {
        match self.word_column {
            Column::Roots => {
                if let Some(text) = self.course.roots.get(self.word_selected).map(|m| m.text.clone()) {
                    self.select_root(&text);
                }
            }
            Column::Suffixes => {
                if let Some(text) = self.course.suffixes.get(self.word_selected).map(|m| m.text.clone()) {
                    self.add_suffix(&text);
                }
            }
        }
    }

    pub fn word_switch_column(&mut self) {
        self.word_column = self.word_column.toggle();
        self.word_selected = 0;
    }

    pub fn word_select(&mut self, down: bool) {
        let count = match self.word_column {
            Column::Roots => self.course.roots.len(),
            Column::Suffixes => self.course.suffixes.len(),
        };
        if count == 0 {
            return;
        }
        self.word_selected = if down {
            (self.word_selected + 1) % count
        } else {
            (self.word_selected + count - 1) % count
        };
    }

    // --- search ---

    pub fn run_search(&mut self, now: Instant) {
        let query = self.search_input.value().trim().to_string();
        if query.is_empty() {
            self.notify(t!("notify.search_empty"), Severity::Warning, now);
            return;
        }
        self.notify(t!("notify.searching", query = query.as_str()), Severity::Info, now);
        let hits = self.lookup.search(&query);
        info!(%query, hits = hits.len(), "search");
        self.search_results = Some(hits);
        self.search_selected = 0;
    }

    pub fn select_result(&mut self, down: bool) {
        let count = self.search_results.as_ref().map_or(0, Vec::len);
        if count == 0 {
            return;
        }
        self.search_selected = if down {
            (self.search_selected + 1).min(count - 1)
        } else {
            self.search_selected.saturating_sub(1)
        };
    }

    /// Open the selected hit when it points at a lesson.
    pub fn open_selected_result(&mut self, now: Instant) -> bool {
        let lesson_id = self
            .search_results
            .as_ref()
            .and_then(|hits| hits.get(self.search_selected))
            .filter(|hit| hit.kind == HitKind::Lesson)
            .and_then(|hit| hit.lesson_id.clone());
        match lesson_id {
            Some(id) => self.start_lesson(&id, now),
            None => false,
        }
    }
}
