pub mod ui;

use crate::ui::screen::current_screen;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use quizr::{
    bank::{BuiltinBank, QuestionBank},
    config::{Config, ConfigStore, FileConfigStore},
    controller::{Presenter, QuizController},
    error::QuizError,
    logging,
    review::Report,
    runtime::{terminal_input, Action, AppState, Runner, Step},
    selector::{SessionLimit, LIMIT_MENU},
    session::{Mode, QuestionView},
};
use rand::Rng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{debug, warn};

const POLL_MS: u64 = 100;

/// multiple-choice quiz tui with practice and test modes
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A multiple-choice quiz runner. Practice mode shows the answer as soon as you pick one; test mode keeps quiet until the scored review at the end."
)]
pub struct Cli {
    /// question bank file: a JSON array of {question, options, answer}
    #[clap(short = 'b', long)]
    bank: Option<PathBuf>,

    /// bundled question bank to use when no file is given
    #[clap(long, value_enum, default_value_t = BuiltinBank::General)]
    builtin: BuiltinBank,

    /// questions per session: 5, 10, 20, 30, 50 or "all"
    #[clap(short = 'n', long, value_parser = parse_menu_limit)]
    limit: Option<SessionLimit>,

    /// feedback mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,

    /// start the quiz right away instead of showing the start menu
    #[clap(long)]
    skip_menu: bool,

    /// write logs to this file (RUST_LOG alone logs to the state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// do not remember the chosen limit and mode
    #[clap(long)]
    no_save: bool,
}

fn parse_menu_limit(s: &str) -> Result<SessionLimit, String> {
    let limit: SessionLimit = s.parse()?;
    if limit.is_in_menu() {
        Ok(limit)
    } else {
        let menu: Vec<String> = LIMIT_MENU.iter().map(|l| l.to_string()).collect();
        Err(format!("choose one of: {}", menu.join(", ")))
    }
}

/// Where the bank came from and what happened loading it
#[derive(Debug, Clone, Default)]
pub struct BankStatus {
    pub source: String,
    /// file the bank was read from; `None` for a bundled bank
    pub path: Option<PathBuf>,
    pub rejected: usize,
    pub error: Option<String>,
}

/// Whatever the presenter was last told to show
#[derive(Debug, Default)]
pub struct Display {
    pub view: Option<QuestionView>,
    /// practice mode: whether the locked answer was right
    pub feedback: Option<bool>,
    pub report: Option<Report>,
    pub review_scroll: usize,
}

impl Presenter for Display {
    fn render_question(&mut self, view: &QuestionView) {
        self.view = Some(view.clone());
        self.feedback = None;
    }

    fn render_feedback(&mut self, view: &QuestionView, is_correct: bool) {
        self.view = Some(view.clone());
        self.feedback = Some(is_correct);
    }

    fn render_result(&mut self, report: &Report) {
        self.view = None;
        self.feedback = None;
        self.report = Some(report.clone());
        self.review_scroll = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub cli: Cli,
    pub controller: QuizController,
    pub state: AppState,
    pub bank_status: BankStatus,
    pub menu_cursor: usize,
    pub display: Display,
    pub notice: Option<String>,
}

impl App {
    pub fn new(cli: Cli, config: Config) -> Self {
        let (bank, bank_status) = load_bank(&cli, &config);
        let limit = cli.limit.unwrap_or(config.limit);
        let mode = cli.mode.unwrap_or(config.mode);

        Self {
            menu_cursor: limit.menu_index().unwrap_or(0),
            controller: QuizController::new(bank, limit, mode),
            cli,
            state: AppState::Start,
            bank_status,
            display: Display::default(),
            notice: None,
        }
    }

    fn handle<R: Rng + ?Sized>(
        &mut self,
        action: Action,
        rng: &mut R,
        store: &dyn ConfigStore,
    ) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::PrevLimit | Action::NextLimit => {
                let len = LIMIT_MENU.len();
                self.menu_cursor = if action == Action::NextLimit {
                    (self.menu_cursor + 1) % len
                } else {
                    (self.menu_cursor + len - 1) % len
                };
                let result = self.controller.set_limit(LIMIT_MENU[self.menu_cursor]);
                self.settle(result);
            }
            Action::ToggleMode => {
                let mode = match self.controller.mode() {
                    Mode::Practice => Mode::Test,
                    Mode::Test => Mode::Practice,
                };
                let result = self.controller.set_mode(mode);
                self.settle(result);
            }
            Action::Start | Action::Replay => self.start(rng, store),
            Action::SelectOption(idx) => {
                let result = self.controller.select_option(idx, &mut self.display);
                self.settle(result);
            }
            Action::Advance => {
                let result = self.controller.advance(&mut self.display);
                self.settle(result);
                if self.controller.session().is_some_and(|s| s.is_finished()) {
                    self.state = AppState::Results;
                }
            }
            Action::ScrollUp => {
                self.display.review_scroll = self.display.review_scroll.saturating_sub(1);
            }
            Action::ScrollDown => {
                let max = self
                    .display
                    .report
                    .as_ref()
                    .map_or(0, |r| r.review.len().saturating_sub(1));
                self.display.review_scroll = (self.display.review_scroll + 1).min(max);
            }
            Action::Restart => {
                self.controller.restart();
                self.display = Display::default();
                self.state = AppState::Start;
            }
        }
        Flow::Continue
    }

    fn start<R: Rng + ?Sized>(&mut self, rng: &mut R, store: &dyn ConfigStore) {
        self.controller.restart();
        self.display = Display::default();
        let result = self.controller.start(rng, &mut self.display);
        let started = result.is_ok();
        self.settle(result);
        if !started {
            self.state = AppState::Start;
            return;
        }
        self.state = AppState::Quiz;

        if !self.cli.no_save {
            let cfg = Config {
                limit: self.controller.limit(),
                mode: self.controller.mode(),
                bank: self.bank_status.path.clone(),
            };
            if let Err(err) = store.save(&cfg) {
                warn!(%err, "could not save preferences");
            }
        }
    }

    /// Surface user-recoverable errors; caller misuse (e.g. advancing before
    /// answering, a key with no matching option) is simply ignored.
    fn settle(&mut self, result: quizr::error::Result<()>) {
        match result {
            Ok(()) => self.notice = None,
            Err(err @ QuizError::EmptyBank) => self.notice = Some(err.to_string()),
            Err(err) => debug!(%err, "action ignored"),
        }
    }
}

fn load_bank(cli: &Cli, config: &Config) -> (QuestionBank, BankStatus) {
    let path = cli.bank.clone().or_else(|| config.bank.clone());
    let (source, loaded) = match &path {
        Some(p) => (p.display().to_string(), QuestionBank::from_path(p)),
        None => (
            format!("bundled {} bank", cli.builtin.to_string().to_lowercase()),
            QuestionBank::builtin(cli.builtin),
        ),
    };

    match loaded {
        Ok(report) => (
            report.bank,
            BankStatus {
                source,
                path,
                rejected: report.rejected.len(),
                error: None,
            },
        ),
        Err(err) => {
            warn!(%err, "question bank failed to load");
            (
                QuestionBank::default(),
                BankStatus {
                    source,
                    path,
                    rejected: 0,
                    error: Some(err.to_string()),
                },
            )
        }
    }
}

/// Install file logging when asked for. Returns a warning instead of failing
/// when the log file cannot be opened.
fn init_logging(cli: &Cli, rust_log_set: bool) -> Option<String> {
    let path = logging::log_target(cli.log_file.as_deref(), rust_log_set)?;
    logging::init_file_logging(&path).err().map(|err| {
        format!(
            "quizr: logging disabled, cannot write {}: {err}",
            path.display()
        )
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    if let Some(warning) = init_logging(&cli, rust_log_set) {
        eprintln!("{warning}");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut app = App::new(cli, store.load());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &dyn ConfigStore,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(terminal_input(), Duration::from_millis(POLL_MS));
    let mut rng = rand::thread_rng();

    if app.cli.skip_menu {
        app.handle(Action::Start, &mut rng, store);
    }
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step(app.state) {
            Step::Idle => {}
            Step::Redraw => {
                terminal.draw(|f| ui(app, f))?;
            }
            Step::Act(action) => {
                if app.handle(action, &mut rng, store) == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    current_screen(&app.state).render(app, f);
}
