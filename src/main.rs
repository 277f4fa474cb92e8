mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use examr::{
    app_dirs::AppDirs,
    bank::QuestionBank,
    config::{Config, ConfigStore, FileConfigStore},
    exam::{ExamSession, SubmitPrompt},
    runtime::{AppEvent, Runner, SessionTimer, TerminalEvents},
    session::SessionConfig,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// practice multiple-choice exams in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice timed multiple-choice exam sets in the terminal, then review every answer with the correct options highlighted."
)]
pub struct Cli {
    /// load exam sets from a JSON file instead of the built-in bank
    #[clap(short = 'b', long)]
    bank: Option<PathBuf>,

    /// start the exam set with this id right away (see --list)
    #[clap(short = 'e', long)]
    exam: Option<u32>,

    /// hide the exam clock
    #[clap(long)]
    no_timer: bool,

    /// skip the submit dialog when every question is answered
    #[clap(long)]
    no_confirm: bool,

    /// print the available exam sets and exit
    #[clap(short = 'l', long)]
    list: bool,
}

impl Cli {
    fn session_config(&self, config: &Config) -> SessionConfig {
        let mut settings = SessionConfig::from(config);
        if self.no_timer {
            settings.timed = false;
        }
        if self.no_confirm {
            settings.confirm_submit = false;
        }
        settings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Home,
    Exam,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub bank: QuestionBank,
    pub view: AppView,
    pub session: Option<ExamSession>,
    pub timer: SessionTimer,
    pub settings: SessionConfig,
    pub home_cursor: usize,
    pub palette_cursor: Option<usize>,
    pub pending_submit: Option<SubmitPrompt>,
    pub last_exam_id: Option<u32>,
    config_store: Option<FileConfigStore>,
}

impl App {
    pub fn new(
        bank: QuestionBank,
        settings: SessionConfig,
        last_exam_id: Option<u32>,
        config_store: Option<FileConfigStore>,
    ) -> Self {
        let home_cursor = last_exam_id
            .and_then(|id| bank.position(id))
            .unwrap_or(0);

        Self {
            bank,
            view: AppView::Home,
            session: None,
            timer: SessionTimer::default(),
            settings,
            home_cursor,
            palette_cursor: None,
            pending_submit: None,
            last_exam_id,
            config_store,
        }
    }

    pub fn start_exam(&mut self, exam_id: u32) -> Result<(), Box<dyn Error>> {
        let exam = self.bank.get(exam_id)?;
        let session = ExamSession::start(exam)?;

        self.session = Some(session);
        if self.settings.timed {
            self.timer.arm();
        } else {
            self.timer.disarm();
        }
        self.view = AppView::Exam;
        self.palette_cursor = None;
        self.pending_submit = None;
        self.last_exam_id = Some(exam_id);
        if let Some(pos) = self.bank.position(exam_id) {
            self.home_cursor = pos;
        }
        self.save_config();
        Ok(())
    }

    /// Tears the session down and stops its clock.
    pub fn go_home(&mut self) {
        self.timer.disarm();
        self.session = None;
        self.palette_cursor = None;
        self.pending_submit = None;
        self.view = AppView::Home;
    }

    /// Feeds the exam clock whatever whole seconds passed up to `now`.
    pub fn on_tick(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            self.timer.disarm();
            return;
        };
        if !session.is_active() {
            self.timer.disarm();
            return;
        }
        for _ in 0..self.timer.poll(now) {
            session.tick();
        }
    }

    /// Opens the submit dialog. Turning confirmation off only skips it for a
    /// fully answered exam; unanswered questions always ask first.
    pub fn request_submit(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let prompt = session.submit_prompt();
        if self.settings.confirm_submit || matches!(prompt, SubmitPrompt::Incomplete { .. }) {
            self.pending_submit = Some(prompt);
        } else {
            self.finish_submit(true);
        }
    }

    /// Resolves the confirmation dialog (or its absence) with `proceed`.
    pub fn finish_submit(&mut self, proceed: bool) {
        self.pending_submit = None;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.submit(&mut |_: &SubmitPrompt| proceed) {
            self.timer.disarm();
            self.palette_cursor = None;
            self.view = AppView::Results;
        }
    }

    pub fn review_answers(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.review_from(0, &mut |_: &SubmitPrompt| true) {
            Ok(true) => {
                self.timer.disarm();
                self.view = AppView::Exam;
            }
            Ok(false) => {}
            Err(err) => tracing::error!(%err, "cannot open review"),
        }
    }

    pub fn toggle_timer(&mut self) {
        self.settings.timed = !self.settings.timed;
        self.save_config();
    }

    pub fn toggle_confirm(&mut self) {
        self.settings.confirm_submit = !self.settings.confirm_submit;
        self.save_config();
    }

    fn save_config(&self) {
        let Some(store) = &self.config_store else {
            return;
        };
        let cfg = Config {
            timer: self.settings.timed,
            confirm_submit: self.settings.confirm_submit,
            last_exam_id: self.last_exam_id,
        };
        if let Err(err) = store.save(&cfg) {
            tracing::warn!(path = %store.path().display(), %err, "failed to save config");
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.view {
            AppView::Home => return self.on_home_key(key),
            AppView::Exam => self.on_exam_key(key),
            AppView::Results => self.on_results_key(key),
        }
        Flow::Continue
    }

    fn on_home_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.home_cursor = self.home_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.home_cursor + 1 < self.bank.len() {
                    self.home_cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(exam) = self.bank.sets().get(self.home_cursor) {
                    let exam_id = exam.id;
                    if let Err(err) = self.start_exam(exam_id) {
                        tracing::error!(exam = exam_id, %err, "cannot start exam");
                    }
                }
            }
            KeyCode::Char('t') => self.toggle_timer(),
            KeyCode::Char('c') => self.toggle_confirm(),
            _ => {}
        }
        Flow::Continue
    }

    fn on_exam_key(&mut self, key: KeyEvent) {
        if self.pending_submit.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.finish_submit(true),
                KeyCode::Char('n') | KeyCode::Esc => self.finish_submit(false),
                _ => {}
            }
            return;
        }

        if self.palette_cursor.is_some() {
            self.on_palette_key(key);
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.go_home(),
            KeyCode::Left => {
                session.previous();
            }
            KeyCode::Right => {
                session.next();
            }
            KeyCode::Char('p') => self.palette_cursor = Some(session.current_index()),
            KeyCode::Char('r') if session.is_review() => self.view = AppView::Results,
            KeyCode::Char('s') if session.is_active() => self.request_submit(),
            KeyCode::Char(c) if session.is_active() => select_by_key(session, c),
            _ => {}
        }
    }

    fn on_palette_key(&mut self, key: KeyEvent) {
        let (Some(cursor), Some(session)) = (self.palette_cursor, self.session.as_mut()) else {
            return;
        };
        match key.code {
            KeyCode::Left => self.palette_cursor = Some(cursor.saturating_sub(1)),
            KeyCode::Right => {
                if cursor + 1 < session.question_count() {
                    self.palette_cursor = Some(cursor + 1);
                }
            }
            KeyCode::Enter => {
                if let Err(err) = session.go_to(cursor) {
                    tracing::error!(%err, "palette jump failed");
                }
                self.palette_cursor = None;
            }
            KeyCode::Esc | KeyCode::Char('p') => self.palette_cursor = None,
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.review_answers(),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('h') => self.go_home(),
            _ => {}
        }
    }
}

/// Digits pick the n-th option; letters pick the option with that id.
fn select_by_key(session: &mut ExamSession, c: char) {
    let question = session.current_question();
    let question_id = question.id;
    let option_id = match c.to_digit(10) {
        Some(d) if d >= 1 => question.options.get(d as usize - 1).map(|o| o.id.clone()),
        Some(_) => None,
        None => {
            let typed = c.to_string();
            question
                .options
                .iter()
                .find(|o| o.id.eq_ignore_ascii_case(&typed))
                .map(|o| o.id.clone())
        }
    };

    if let Some(option_id) = option_id {
        if let Err(err) = session.select_option(question_id, &option_id) {
            tracing::error!(%err, "selection rejected");
        }
    }
}

fn init_tracing() {
    let Some(log_path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = log_path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    // Never log to stdout/stderr: they belong to the TUI.
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("examr=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();
    tracing::debug!(path = %log_path.display(), "logging initialized");
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let bank = match &cli.bank {
        Some(path) => QuestionBank::from_path(path),
        None => QuestionBank::embedded(),
    };
    let bank = match bank {
        Ok(bank) => bank,
        Err(err) => Cli::command().error(ErrorKind::Io, err).exit(),
    };

    if cli.list {
        for summary in bank.summaries() {
            println!("{summary}");
        }
        return Ok(());
    }

    if let Some(id) = cli.exam {
        if let Err(err) = bank.get(id) {
            Cli::command().error(ErrorKind::InvalidValue, err).exit();
        }
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing();

    let store = FileConfigStore::new();
    let config = store.load();
    let mut app = App::new(
        bank,
        cli.session_config(&config),
        config.last_exam_id,
        Some(store),
    );
    if let Some(id) = cli.exam {
        app.start_exam(id)?;
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(TerminalEvents);

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let event = runner.step()?;
        let before = app.session.as_ref().map(ExamSession::elapsed_secs);

        let mut redraw = false;
        match event {
            AppEvent::Key(key) => {
                if app.handle_key(key) == Flow::Quit {
                    break;
                }
                redraw = true;
            }
            AppEvent::Resize => redraw = true,
            AppEvent::Tick => {}
        }

        app.on_tick(Instant::now());
        if redraw || app.session.as_ref().map(ExamSession::elapsed_secs) != before {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use examr::session::Mode;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        let bank = QuestionBank::embedded().unwrap();
        App::new(bank, SessionConfig::default(), None, None)
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        for code in codes {
            app.handle_key(key(*code));
        }
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["examr"]);

        assert_eq!(cli.bank, None);
        assert_eq!(cli.exam, None);
        assert!(!cli.no_timer);
        assert!(!cli.no_confirm);
        assert!(!cli.list);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "examr",
            "--bank",
            "bank.json",
            "-e",
            "2",
            "--no-timer",
            "--no-confirm",
            "--list",
        ]);

        assert_eq!(cli.bank, Some(PathBuf::from("bank.json")));
        assert_eq!(cli.exam, Some(2));
        assert!(cli.no_timer);
        assert!(cli.no_confirm);
        assert!(cli.list);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["examr", "--no-timer"]);
        let settings = cli.session_config(&Config::default());
        assert!(!settings.timed);
        assert!(settings.confirm_submit);
    }

    #[test]
    fn test_app_starts_home_on_last_exam() {
        let bank = QuestionBank::embedded().unwrap();
        let last = bank.sets()[1].id;
        let app = App::new(bank, SessionConfig::default(), Some(last), None);

        assert_eq!(app.view, AppView::Home);
        assert_eq!(app.home_cursor, 1);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_home_navigation_and_start() {
        let mut app = test_app();

        press(&mut app, &[KeyCode::Up, KeyCode::Down, KeyCode::Enter]);

        assert_eq!(app.view, AppView::Exam);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.exam.id, app.bank.sets()[1].id);
        assert!(app.timer.is_armed());
    }

    #[test]
    fn test_home_cursor_stays_in_range() {
        let mut app = test_app();
        for _ in 0..20 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.home_cursor, app.bank.len() - 1);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        assert_eq!(app.handle_key(key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
    }

    fn answer_all(app: &mut App) {
        let count = app.session.as_ref().unwrap().question_count();
        for _ in 0..count {
            press(app, &[KeyCode::Char('1'), KeyCode::Right]);
        }
    }

    #[test]
    fn test_untimed_exam_does_not_tick() {
        let mut app = test_app();
        app.toggle_timer();
        press(&mut app, &[KeyCode::Enter]);

        app.on_tick(Instant::now() + Duration::from_secs(5));
        assert_eq!(app.session.as_ref().unwrap().elapsed_secs(), 0);
    }

    #[test]
    fn test_timed_exam_ticks_once_per_second() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Enter]);
        let t0 = Instant::now();
        app.timer.arm_at(t0);

        for i in 1..=25 {
            app.on_tick(t0 + Duration::from_millis(100 * i));
        }
        assert_eq!(app.session.as_ref().unwrap().elapsed_secs(), 2);
    }

    #[test]
    fn test_time_on_home_screen_is_not_exam_time() {
        let mut app = test_app();
        let t0 = Instant::now();

        // idle on the home screen, then start the exam much later
        app.on_tick(t0 + Duration::from_secs(30));
        press(&mut app, &[KeyCode::Enter]);
        let started = Instant::now();
        app.on_tick(started + Duration::from_millis(500));

        assert_eq!(app.session.as_ref().unwrap().elapsed_secs(), 0);
    }

    #[test]
    fn test_select_by_digit_and_letter() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('2')]);

        let session = app.session.as_ref().unwrap();
        let question = session.current_question();
        let second = question.options[1].id.clone();
        assert!(session.is_selected(question.id, &second));

        let first = question.options[0].id.to_lowercase();
        let first_char = first.chars().next().unwrap();
        press(&mut app, &[KeyCode::Char(first_char)]);
        assert_eq!(app.session.as_ref().unwrap().answered_count(), 1);
    }

    #[test]
    fn test_out_of_range_digit_is_ignored() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('9'), KeyCode::Char('0')]);
        assert_eq!(app.session.as_ref().unwrap().answered_count(), 0);
    }

    #[test]
    fn test_submit_confirmation_flow() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('1'), KeyCode::Char('s')]);

        assert_matches::assert_matches!(
            app.pending_submit,
            Some(SubmitPrompt::Incomplete { answered: 1, .. })
        );

        press(&mut app, &[KeyCode::Char('n')]);
        assert!(app.pending_submit.is_none());
        assert_eq!(app.view, AppView::Exam);
        assert!(app.session.as_ref().unwrap().is_active());

        press(&mut app, &[KeyCode::Char('s'), KeyCode::Char('y')]);
        assert_eq!(app.view, AppView::Results);
        assert_eq!(app.session.as_ref().unwrap().mode(), Mode::Review);
        assert!(!app.timer.is_armed());
    }

    #[test]
    fn test_submit_without_confirmation() {
        let mut app = test_app();
        app.toggle_confirm();
        press(&mut app, &[KeyCode::Enter]);
        answer_all(&mut app);
        press(&mut app, &[KeyCode::Char('s')]);

        assert_eq!(app.view, AppView::Results);
        assert!(app.pending_submit.is_none());
    }

    #[test]
    fn test_incomplete_submit_asks_even_without_confirmation() {
        let cli = Cli::parse_from(["examr", "--no-confirm"]);
        let bank = QuestionBank::embedded().unwrap();
        let mut app = App::new(bank, cli.session_config(&Config::default()), None, None);
        assert!(!app.settings.confirm_submit);

        press(&mut app, &[KeyCode::Enter, KeyCode::Char('s')]);

        let total = app.session.as_ref().unwrap().question_count();
        assert_eq!(
            app.pending_submit,
            Some(SubmitPrompt::Incomplete { answered: 0, total })
        );
        assert_eq!(app.view, AppView::Exam);
        assert!(app.session.as_ref().unwrap().is_active());

        press(&mut app, &[KeyCode::Char('n')]);
        assert!(app.session.as_ref().unwrap().is_active());
        press(&mut app, &[KeyCode::Char('s'), KeyCode::Char('y')]);
        assert_eq!(app.view, AppView::Results);
    }

    #[test]
    fn test_ticks_after_submit_do_nothing() {
        let mut app = test_app();
        app.toggle_confirm();
        press(&mut app, &[KeyCode::Enter]);
        let t0 = Instant::now();
        app.timer.arm_at(t0);
        app.on_tick(t0 + Duration::from_secs(3));
        press(&mut app, &[KeyCode::Char('s'), KeyCode::Char('y')]);

        app.on_tick(t0 + Duration::from_secs(13));
        assert_eq!(app.session.as_ref().unwrap().elapsed_secs(), 3);
    }

    #[test]
    fn test_review_from_results() {
        let mut app = test_app();
        app.toggle_confirm();
        press(
            &mut app,
            &[
                KeyCode::Enter,
                KeyCode::Right,
                KeyCode::Char('s'),
                KeyCode::Char('y'),
                KeyCode::Char('r'),
            ],
        );

        assert_eq!(app.view, AppView::Exam);
        let session = app.session.as_ref().unwrap();
        assert!(session.is_review());
        assert_eq!(session.current_index(), 0);

        // answers are frozen in review
        press(&mut app, &[KeyCode::Char('1')]);
        assert_eq!(app.session.as_ref().unwrap().answered_count(), 0);

        press(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.view, AppView::Results);
    }

    #[test]
    fn test_palette_jump() {
        let mut app = test_app();
        press(
            &mut app,
            &[
                KeyCode::Enter,
                KeyCode::Char('p'),
                KeyCode::Right,
                KeyCode::Right,
                KeyCode::Enter,
            ],
        );

        assert_eq!(app.palette_cursor, None);
        assert_eq!(app.session.as_ref().unwrap().current_index(), 2);
    }

    #[test]
    fn test_palette_cancel_keeps_position() {
        let mut app = test_app();
        press(
            &mut app,
            &[KeyCode::Enter, KeyCode::Char('p'), KeyCode::Right, KeyCode::Esc],
        );

        assert_eq!(app.palette_cursor, None);
        assert_eq!(app.view, AppView::Exam);
        assert_eq!(app.session.as_ref().unwrap().current_index(), 0);
    }

    #[test]
    fn test_escape_tears_down_session() {
        let mut app = test_app();
        press(&mut app, &[KeyCode::Enter, KeyCode::Esc]);

        assert_eq!(app.view, AppView::Home);
        assert!(app.session.is_none());
        assert!(!app.timer.is_armed());
    }

    #[test]
    fn test_results_home() {
        let mut app = test_app();
        app.toggle_confirm();
        press(
            &mut app,
            &[KeyCode::Enter, KeyCode::Char('s'), KeyCode::Char('y'), KeyCode::Enter],
        );

        assert_eq!(app.view, AppView::Home);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_start_unknown_exam_fails() {
        let mut app = test_app();
        assert!(app.start_exam(999).is_err());
        assert_eq!(app.view, AppView::Home);
    }

    #[test]
    fn test_config_saved_on_toggle_and_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let bank = QuestionBank::embedded().unwrap();
        let mut app = App::new(
            bank,
            SessionConfig::default(),
            None,
            Some(FileConfigStore::with_path(&path)),
        );

        app.toggle_timer();
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);

        let saved = FileConfigStore::with_path(&path).load();
        assert!(!saved.timer);
        assert!(saved.confirm_submit);
        assert_eq!(saved.last_exam_id, Some(app.bank.sets()[1].id));
    }
}
