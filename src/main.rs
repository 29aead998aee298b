mod app;
mod config;
mod content;
mod engine;
mod event;
mod logging;
mod session;
mod store;
mod ui;

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;
use tracing::{error, info, warn};

use app::App;
use config::Config;
use engine::navigation::{NavEvent, Route};
use event::{AppEvent, EventHandler};
use store::json_store::JsonStore;
use store::progress::ProgressStore;
use ui::components::home::Home;
use ui::components::lesson_view::LessonView;
use ui::components::nav_bar::NavBar;
use ui::components::quiz_view::QuizView;
use ui::components::search_view::SearchView;
use ui::components::toast_stack::ToastStack;
use ui::components::word_builder_view::WordBuilderView;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::line_input::InputResult;
use ui::theme::Theme;

rust_i18n::i18n!("locales", fallback = "es");

#[derive(Parser)]
#[command(name = "runasimi", version, about = "Terminal Quechua tutor with lessons, quizzes and a word builder")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Interface language (es, en)")]
    lang: Option<String>,

    #[arg(long, help = "Directory for saved progress and logs")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Open this lesson on startup")]
    lesson: Option<String>,

    #[arg(long, help = "Write the effective settings to the config file")]
    save_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(JsonStore::default_dir);
    let log_path = data_dir.join("runasimi.log");
    if let Err(err) = logging::init(&log_path) {
        eprintln!("logging disabled: {err:#}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    if let Some(ref name) = cli.theme {
        config.theme = name.clone();
    }
    config.validate();
    rust_i18n::set_locale(&config.language);

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });

    if cli.save_config {
        config.save()?;
    }

    let store = match JsonStore::with_base_dir(data_dir) {
        Ok(store) => Some(store),
        Err(err) => {
            warn!(error = %err, "progress will not be saved");
            None
        }
    };
    let progress = ProgressStore::load(store);

    let mut app = App::new(config, theme, progress)?;
    info!(language = %app.config.language, theme = %app.theme.name, "starting");

    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    app.resize(size.width, size.height);
    if let Some(ref id) = cli.lesson
        && !app.start_lesson(id, Instant::now())
    {
        warn!(lesson = %id, "unknown lesson on command line");
    }

    let events = EventHandler::new(Duration::from_millis(50));
    let result = panic::catch_unwind(AssertUnwindSafe(|| run_app(&mut terminal, &mut app, &events)));

    restore_terminal()?;
    terminal.show_cursor()?;

    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            error!(error = %err, "exited with error");
            eprintln!("Error: {err:?}");
        }
        Err(payload) => {
            eprintln!("runasimi crashed, see {}", log_path.display());
            panic::resume_unwind(payload);
        }
    }
    info!("bye");
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Panics are logged only. The terminal stays in raw mode so a panic caught
/// by the event loop leaves the UI usable; `main` restores it otherwise.
fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        error!(%info, "panic");
    }));
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut redraw = true;
    loop {
        if redraw {
            terminal.draw(|frame| render(frame, app))?;
        }

        let event = events.next()?;
        let now = Instant::now();
        // Idle ticks only need a frame when a timer fired.
        redraw = !matches!(event, AppEvent::Tick) || app.timers_due(now);
        app.guarded(now, |app| match event {
            AppEvent::Key(key) => handle_key(app, key, now),
            AppEvent::Mouse(mouse) => {
                handle_mouse(app, mouse, now);
                Ok(())
            }
            AppEvent::Resize(w, h) => {
                app.resize(w, h);
                Ok(())
            }
            AppEvent::Tick => Ok(()),
        });
        app.tick(now);

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click(mouse.column, mouse.row, now),
        MouseEventKind::Moved => app.pointer_moved(mouse.column, mouse.row, now),
        MouseEventKind::ScrollUp => {
            app.scroll_content(false);
        }
        MouseEventKind::ScrollDown => {
            app.scroll_content(true);
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        match key.code {
            KeyCode::Char('m') => app.toggle_menu(),
            KeyCode::Char('x') => {
                app.notifier.dismiss_newest();
            }
            KeyCode::Char(d) => {
                if let Some(n) = d.to_digit(10) {
                    app.nav_hotkey(n as usize, now);
                }
            }
            _ => {}
        }
        return Ok(());
    }

    // An open menu or dropdown captures the arrows.
    if app.nav.anything_open() {
        match key.code {
            KeyCode::Esc => app.dispatch_nav(NavEvent::Escape),
            KeyCode::Up => app.nav_move(false),
            KeyCode::Down | KeyCode::Tab => app.nav_move(true),
            KeyCode::Enter => app.nav_activate(now),
            _ => {}
        }
        return Ok(());
    }

    match app.route {
        Route::Home => handle_home_key(app, key, now),
        Route::Lesson(_) => handle_lesson_key(app, key, now),
        Route::Quiz => handle_quiz_key(app, key, now),
        Route::WordBuilder => handle_word_key(app, key, now),
        Route::Search => handle_search_key(app, key, now),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_home(false),
        KeyCode::Down | KeyCode::Char('j') => app.select_home(true),
        KeyCode::Enter => app.start_selected_lesson(now),
        _ => {}
    }
    Ok(())
}

fn handle_lesson_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    match key.code {
        KeyCode::Up => app.select_exercise(false),
        KeyCode::Down => app.select_exercise(true),
        _ => match app.lesson_input.handle(key) {
            InputResult::Submit => app.submit_exercise(now)?,
            InputResult::Cancel => app.navigate(Route::Home, now),
            InputResult::Continue => {}
        },
    }
    Ok(())
}

fn handle_quiz_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Home, now),
        KeyCode::Up | KeyCode::Char('k') => app.select_question(false),
        KeyCode::Down | KeyCode::Char('j') => app.select_question(true),
        KeyCode::Left | KeyCode::Char('h') => app.select_option(false),
        KeyCode::Right | KeyCode::Char('l') => app.select_option(true),
        KeyCode::Enter => {
            app.answer_selected();
        }
        KeyCode::Char('r') => app.reset_quiz(now),
        KeyCode::Char(c @ 'a'..='g') => {
            app.answer_slot((c as u8 - b'a') as usize);
        }
        _ => {}
    }
    Ok(())
}

fn handle_word_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Home, now),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => app.word_switch_column(),
        KeyCode::Up | KeyCode::Char('k') => app.word_select(false),
        KeyCode::Down | KeyCode::Char('j') => app.word_select(true),
        KeyCode::Enter | KeyCode::Char(' ') => app.word_activate(),
        KeyCode::Backspace => {
            app.remove_last_suffix();
        }
        KeyCode::Char('c') => app.clear_word(),
        _ => {}
    }
    Ok(())
}

fn handle_search_key(app: &mut App, key: KeyEvent, now: Instant) -> Result<()> {
    match key.code {
        KeyCode::Up => app.select_result(false),
        KeyCode::Down => app.select_result(true),
        KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.open_selected_result(now);
        }
        _ => match app.search_input.handle(key) {
            InputResult::Submit => app.run_search(now),
            InputResult::Cancel => app.navigate(Route::Home, now),
            InputResult::Continue => {}
        },
    }
    Ok(())
}

fn screen_hints(route: &Route) -> String {
    match route {
        Route::Home => String::new(),
        Route::Lesson(_) => t!("footer.lesson").to_string(),
        Route::Quiz => t!("footer.quiz").to_string(),
        Route::WordBuilder => t!("footer.word").to_string(),
        Route::Search => t!("footer.search").to_string(),
    }
}

fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let screen = screen_hints(&app.route);
    let global = t!("footer.global");
    let hints: Vec<&str> = screen.split("  ").chain(global.split("  ")).collect();
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    match &app.route {
        Route::Home => frame.render_widget(
            Home {
                lessons: &app.course.lessons,
                progress: &app.progress,
                selected: app.home_selected,
                theme: &app.theme,
            },
            layout.main,
        ),
        Route::Lesson(id) => {
            if let Some(lesson) = app.course.lesson(id) {
                frame.render_widget(
                    LessonView {
                        lesson,
                        tracker: &app.tracker,
                        selected: app.exercise_selected,
                        input: &app.lesson_input,
                        complete: app.progress.is_complete(id),
                        theme: &app.theme,
                    },
                    layout.main,
                );
            }
        }
        Route::Quiz => frame.render_widget(
            QuizView {
                questions: &app.course.quiz,
                order: &app.quiz_order,
                session: &app.quiz,
                selected_question: app.quiz_question,
                selected_option: app.quiz_option,
                theme: &app.theme,
            },
            layout.main,
        ),
        Route::WordBuilder => frame.render_widget(
            WordBuilderView {
                roots: &app.course.roots,
                suffixes: &app.course.suffixes,
                buffer: &app.word,
                column: app.word_column,
                selected: app.word_selected,
                theme: &app.theme,
            },
            layout.main,
        ),
        Route::Search => frame.render_widget(
            SearchView {
                input: &app.search_input,
                results: app.search_results.as_deref(),
                selected: app.search_selected,
                theme: &app.theme,
            },
            layout.main,
        ),
    }

    let footer_lines: Vec<Line> = hint_lines.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(footer_lines).style(Style::default().fg(colors.muted()).bg(colors.bg())),
        layout.footer,
    );

    let title = format!(" {} ", t!("app.title"));
    let menu_label = t!("nav.menu");
    frame.render_widget(
        NavBar {
            tree: &app.nav_tree,
            state: &app.nav,
            geometry: &app.nav_geometry,
            progress: &app.progress,
            current: &app.route,
            cursor: app.nav_cursor,
            title: &title,
            menu_label: &menu_label,
            theme: &app.theme,
        },
        area,
    );

    frame.render_widget(
        ToastStack {
            toasts: app.notifier.shown().collect(),
            theme: &app.theme,
        },
        area,
    );
}
