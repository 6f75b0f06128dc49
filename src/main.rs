use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc::Sender,
    time::Duration,
};

use cteni::catalog::{
    select_game_words, select_remediation_words, Catalog, Category, CZECH_ALPHABET,
    REMEDIATION_TARGET,
};
use cteni::config::{Config, ConfigStore, FileConfigStore};
use cteni::game::Game;
use cteni::runtime::{CrosstermEventSource, GameEvent, Runner};
use cteni::session::{SessionSummary, Settings};
use cteni::speech::{SilentSynthesizer, TypedRecognizer};
use cteni::ui::{SetupAction, SetupScreen, SummaryScreen};
use cteni::TICK_RATE_MS;

/// playful czech reading-aloud practice for terminals
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A reading practice game for children learning Czech: pick the letters the child knows, the game shows words one at a time, grades each spoken attempt, and finishes with a quick-test loop over the words that gave trouble."
)]
pub struct Cli {
    /// number of words in a game (overrides the saved settings)
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// start with the whole alphabet enabled
    #[clap(long)]
    all_letters: bool,

    /// show every word in uppercase
    #[clap(long)]
    uppercase: bool,

    /// word kinds to practice, comma separated (overrides the saved settings)
    #[clap(short = 'k', long, value_enum, value_delimiter = ',')]
    word_kinds: Vec<WordKind>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum WordKind {
    Nouns,
    Adjectives,
    Verbs,
    Conjunctions,
}

impl WordKind {
    fn as_category(&self) -> Category {
        match self {
            WordKind::Nouns => Category::Noun,
            WordKind::Adjectives => Category::Adjective,
            WordKind::Verbs => Category::Verb,
            WordKind::Conjunctions => Category::Conjunction,
        }
    }
}

enum Screen {
    Setup(SetupScreen),
    Game(GameRound),
    Summary(SummaryScreen),
}

/// One running game plus the channel feeding the typed recognizer
struct GameRound {
    game: Game,
    typed_input: Sender<char>,
}

impl GameRound {
    fn new(words: Vec<String>, uppercase_only: bool) -> Self {
        let (recognizer, typed_input) = TypedRecognizer::new();
        let game = Game::new(
            words,
            uppercase_only,
            Some(Box::new(recognizer)),
            Box::new(SilentSynthesizer),
        );
        Self { game, typed_input }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    catalog: Catalog,
    settings: Settings,
    screen: Screen,
    config_store: FileConfigStore,
    viewport: (u16, u16),
}

impl App {
    pub fn new(cli: &Cli, config_store: FileConfigStore) -> Self {
        let catalog = Catalog::czech();
        let mut settings = config_store.load().to_settings();

        if let Some(n) = cli.number_of_words {
            settings.word_count = n.max(1);
        }
        if cli.all_letters {
            settings.allowed_letters = CZECH_ALPHABET.iter().map(|t| t.to_string()).collect();
        }
        if cli.uppercase {
            settings.uppercase_only = true;
        }
        if !cli.word_kinds.is_empty() {
            settings.allowed_categories = cli.word_kinds.iter().map(|k| k.as_category()).collect();
        }

        let screen = Screen::Setup(SetupScreen::new(catalog.clone(), &settings));
        Self {
            catalog,
            settings,
            screen,
            config_store,
            viewport: (80, 24),
        }
    }

    fn draw(&self, f: &mut Frame) {
        let area = f.area();
        match &self.screen {
            Screen::Setup(setup) => f.render_widget(setup, area),
            Screen::Game(round) => f.render_widget(&round.game, area),
            Screen::Summary(summary) => f.render_widget(summary, area),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        match &self.screen {
            Screen::Setup(_) => self.setup_key(key),
            Screen::Game(_) => self.game_key(key),
            Screen::Summary(_) => self.summary_key(key),
        }
    }

    fn setup_key(&mut self, key: KeyEvent) -> Flow {
        let action = match &mut self.screen {
            Screen::Setup(setup) => setup.on_key(key),
            _ => return Flow::Continue,
        };

        match action {
            SetupAction::Start(settings) => {
                self.settings = settings;
                let _ = self.config_store.save(&Config::from(&self.settings));
                self.start_game();
                Flow::Continue
            }
            SetupAction::Quit => Flow::Quit,
            SetupAction::None => Flow::Continue,
        }
    }

    fn game_key(&mut self, key: KeyEvent) -> Flow {
        let exited = match &mut self.screen {
            Screen::Game(round) => match key.code {
                KeyCode::Esc => {
                    round.game.exit();
                    true
                }
                KeyCode::Char(' ') => {
                    round.game.toggle_listening();
                    false
                }
                KeyCode::Right => {
                    round.game.skip();
                    false
                }
                KeyCode::Enter => {
                    // commit the typed utterance for grading
                    let _ = round.typed_input.send('\n');
                    false
                }
                KeyCode::Char(c) => {
                    // the parent echoes the child's attempt on the keyboard
                    let _ = round.typed_input.send(c);
                    false
                }
                _ => false,
            },
            _ => false,
        };

        if exited {
            self.open_setup();
        }
        Flow::Continue
    }

    fn summary_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Esc => Flow::Quit,
            KeyCode::Char('n') => {
                self.open_setup();
                Flow::Continue
            }
            KeyCode::Char('q') => {
                self.quick_test();
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn on_tick(&mut self) {
        let finished = match &mut self.screen {
            Screen::Game(round) => {
                round.game.on_tick();
                if round.game.is_complete() {
                    Some(round.game.results().to_vec())
                } else {
                    None
                }
            }
            _ => None,
        };

        if let Some(results) = finished {
            self.screen = Screen::Summary(SummaryScreen::new(SessionSummary::new(results)));
        }
    }

    fn on_resize(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        if let Screen::Game(round) = &mut self.screen {
            round.game.set_viewport(width, height);
        }
    }

    fn open_setup(&mut self) {
        self.screen = Screen::Setup(SetupScreen::new(self.catalog.clone(), &self.settings));
    }

    fn start_game(&mut self) {
        let pool = self.catalog.available_words(
            &self.settings.allowed_letters,
            &self.settings.allowed_categories,
        );
        let words = select_game_words(&pool, self.settings.word_count);
        if words.is_empty() {
            // the setup screen already refuses this, but never start empty
            self.open_setup();
            return;
        }
        self.start_round(words);
    }

    /// Replay round over the words that gave trouble, topped up from the pool
    fn quick_test(&mut self) {
        let results = match &self.screen {
            Screen::Summary(summary) => summary.summary().results().to_vec(),
            _ => return,
        };

        let pool = self.catalog.available_words(
            &self.settings.allowed_letters,
            &self.settings.allowed_categories,
        );
        let words = select_remediation_words(&results, &pool, REMEDIATION_TARGET);
        if words.is_empty() {
            self.open_setup();
            return;
        }
        self.start_round(words);
    }

    fn start_round(&mut self, words: Vec<String>) {
        let mut round = GameRound::new(words, self.settings.uppercase_only);
        let (width, height) = self.viewport;
        round.game.set_viewport(width, height);
        self.screen = Screen::Game(round);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli, FileConfigStore::new());
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    if let Ok(size) = terminal.size() {
        app.on_resize(size.width, size.height);
    }

    loop {
        terminal.draw(|f| app.draw(f))?;

        match runner.step() {
            GameEvent::Tick => app.on_tick(),
            GameEvent::Resize(width, height) => app.on_resize(width, height),
            GameEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}
