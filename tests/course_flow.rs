use std::fs;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use runasimi::app::{App, LESSONS_MENU, PRACTICE_MENU};
use runasimi::config::Config;
use runasimi::content::course::Course;
use runasimi::content::search::{HitKind, Lookup, SearchHit};
use runasimi::engine::navigation::{NavEvent, Route};
use runasimi::engine::notification::{Severity, ToastPhase};
use runasimi::session::lesson::ExerciseOutcome;
use runasimi::session::quiz::OptionMark;
use runasimi::store::json_store::JsonStore;
use runasimi::store::progress::ProgressStore;
use runasimi::ui::line_input::LineInput;
use runasimi::ui::theme::Theme;

fn app_with_store(dir: &TempDir) -> App {
    rust_i18n::set_locale("es");
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    App::with_parts(
        Config::default(),
        Theme::default(),
        Course::bundled().unwrap(),
        ProgressStore::load(Some(store)),
    )
}

fn last_toast(app: &App) -> (String, Severity) {
    let toast = app.notifier.toasts().last().expect("a toast");
    (toast.message.clone(), toast.severity)
}

#[test]
fn test_lesson_completion_persists_and_celebrates() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);
    let now = Instant::now();

    assert!(app.start_lesson("saludos", now));
    assert_eq!(app.route, Route::Lesson("saludos".into()));
    assert_eq!(last_toast(&app), ("Iniciando lección: saludos".to_string(), Severity::Info));

    assert!(matches!(
        app.complete_exercise("e1", now).unwrap(),
        ExerciseOutcome::Progressed { .. }
    ));
    assert_eq!(app.tracker.progress_rounded(), 33);
    app.complete_exercise("e2", now).unwrap();
    assert_eq!(app.tracker.progress_rounded(), 67);

    let outcome = app.complete_exercise("e3", now).unwrap();
    assert_eq!(
        outcome,
        ExerciseOutcome::LessonComplete {
            lesson_id: "saludos".into()
        }
    );
    assert_eq!(app.tracker.progress_rounded(), 100);
    assert!(app.progress.is_complete("saludos"));
    assert_eq!(last_toast(&app), ("¡Lección completada! 🎉".to_string(), Severity::Success));

    let reloaded = ProgressStore::load(Some(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap()));
    assert!(reloaded.is_complete("saludos"));
    assert_eq!(reloaded.count(), 1);
}

#[test]
fn test_repeated_exercise_counts_once() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);
    let now = Instant::now();
    app.start_lesson("saludos", now);
    app.complete_exercise("e1", now).unwrap();
    assert_eq!(app.complete_exercise("e1", now).unwrap(), ExerciseOutcome::Duplicate);
    assert_eq!(app.tracker.completed_count(), 1);
    assert_eq!(app.tracker.progress_rounded(), 33);
}

#[test]
fn test_typed_answers_complete_the_lesson() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);
    let now = Instant::now();
    app.start_lesson("saludos", now);

    for answer in ["  ALLILLANCHU ", "allillanmi", "Sulpayki"] {
        app.lesson_input = LineInput::new(answer);
        app.submit_exercise(now).unwrap();
        assert_eq!(app.lesson_input.value(), "");
    }
    assert!(app.progress.is_complete("saludos"));
}

#[test]
fn test_save_failure_reports_generic_error() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);
    let now = Instant::now();
    fs::remove_dir_all(dir.path()).unwrap();

    app.start_lesson("saludos", now);
    app.complete_exercise("e1", now).unwrap();
    app.complete_exercise("e2", now).unwrap();
    let err = app.complete_exercise("e3", now).unwrap_err();
    app.report_error(&err, now);

    assert_eq!(last_toast(&app), ("Ocurrió un error inesperado".to_string(), Severity::Error));
    assert!(
        app.notifier
            .toasts()
            .iter()
            .all(|t| t.severity != Severity::Success),
        "no celebration when the save fails"
    );
    // In-memory state is not rolled back.
    assert!(app.progress.is_complete("saludos"));
}

#[test]
fn test_quiz_wrong_answer_locks_question() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);

    assert_eq!(app.check_quiz_answer("q1", "a"), Some(false));
    assert_eq!(app.quiz.score(), 0);
    assert_eq!(app.quiz.total_answered(), 1);
    assert_eq!(app.quiz.mark("q1", "a"), OptionMark::Incorrect);
    assert_eq!(app.quiz.mark("q1", "b"), OptionMark::CorrectAnswer);

    assert_eq!(app.check_quiz_answer("q1", "b"), None);
    assert_eq!(app.quiz.score(), 0);
    assert_eq!(app.quiz.total_answered(), 1);

    assert_eq!(app.check_quiz_answer("nope", "a"), None);

    app.reset_quiz(Instant::now());
    assert!(!app.quiz.is_locked("q1"));
    assert_eq!(app.check_quiz_answer("q1", "b"), Some(true));
    assert!(app.quiz.all_correct());
}

#[test]
fn test_word_builder_composes_and_undoes() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);

    assert!(app.select_root("muna"));
    assert!(app.add_suffix("y"));
    assert!(app.add_suffix("ku"));
    assert_eq!(app.word.result(), "munayku");
    assert_eq!(app.word.history_line(), "+y +ku");

    let before = app.word.clone();
    app.add_suffix("kuna");
    assert_eq!(app.remove_last_suffix().as_deref(), Some("kuna"));
    assert_eq!(app.word, before);

    app.clear_word();
    assert_eq!(app.word.display("Selecciona una raíz..."), "Selecciona una raíz...");
    assert_eq!(app.remove_last_suffix(), None);
}

#[test]
fn test_toast_lifecycle_through_ticks() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);
    let t0 = Instant::now();

    let id = app.notify("hola", Severity::Info, t0);
    assert_eq!(app.notifier.shown().count(), 0);
    app.tick(t0 + Duration::from_millis(100));
    assert_eq!(app.notifier.toasts()[0].phase, ToastPhase::Visible);
    app.tick(t0 + Duration::from_millis(4000));
    assert_eq!(app.notifier.toasts()[0].phase, ToastPhase::Leaving);
    app.tick(t0 + Duration::from_millis(4300));
    assert!(app.notifier.toasts().is_empty());

    let other = app.notify("chau", Severity::Warning, t0);
    assert_ne!(id, other);
    assert!(app.notifier.dismiss(other));
    assert_eq!(app.notifier.pending_timers(), 0);
    app.tick(t0 + Duration::from_secs(10));
    assert!(app.notifier.toasts().is_empty());
}

#[test]
fn test_search_flow() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);
    let now = Instant::now();

    app.search_input = LineInput::new("   ");
    app.run_search(now);
    assert_eq!(
        last_toast(&app),
        ("Ingresa un término de búsqueda".to_string(), Severity::Warning)
    );
    assert!(app.search_results.is_none());

    app.search_input = LineInput::new("casa");
    app.run_search(now);
    assert_eq!(last_toast(&app), ("Buscando: \"casa\"...".to_string(), Severity::Info));
    let hits = app.search_results.as_ref().unwrap();
    assert!(hits.iter().any(|h| h.title == "wasi"));
}

struct LessonOnly;

impl Lookup for LessonOnly {
    fn search(&self, _query: &str) -> Vec<SearchHit> {
        vec![SearchHit {
            kind: HitKind::Lesson,
            title: "Saludos".into(),
            detail: String::new(),
            lesson_id: Some("saludos".into()),
        }]
    }
}

#[test]
fn test_search_hit_opens_lesson() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);
    let now = Instant::now();
    app.set_lookup(Box::new(LessonOnly));

    app.search_input = LineInput::new("x");
    app.run_search(now);
    assert!(app.open_selected_result(now));
    assert_eq!(app.route, Route::Lesson("saludos".into()));
}

#[test]
fn test_nav_menu_selection_navigates() {
    let dir = TempDir::new().unwrap();
    let mut app = app_with_store(&dir);
    let now = Instant::now();

    app.dispatch_nav(NavEvent::ToggleDropdown(PRACTICE_MENU));
    app.dispatch_nav(NavEvent::ToggleDropdown(PRACTICE_MENU));
    assert!(!app.nav.anything_open());

    app.dispatch_nav(NavEvent::ToggleDropdown(LESSONS_MENU));
    app.nav_move(true);
    app.nav_activate(now);
    assert!(!app.nav.anything_open());
    assert_eq!(app.route, Route::Lesson(app.course.lessons[1].id.clone()));

    app.dispatch_nav(NavEvent::ToggleDropdown(PRACTICE_MENU));
    app.nav_move(true);
    app.nav_activate(now);
    assert_eq!(app.route, Route::WordBuilder);
}
