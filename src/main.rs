pub mod ui;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordfall::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    events::{Silent, SoundSink, TerminalBell},
    language::{DirWordLists, EmbeddedWordLists, ThreadedFeed, WordListProvider, WordSupply},
    runtime::{CrosstermEventSource, FixedTicker, FrameEvent, Runner},
    Difficulty, Game, GameEvent, Language, Phase,
};

/// falling-words typing game for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Words fall down the field; type each one before it reaches the bottom. Every word that lands costs a heart, and the game ends when the hearts run out."
)]
pub struct Cli {
    /// difficulty to preselect in the menu
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// language to preselect in the menu
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// directory of <language>.json word lists used instead of the built-in ones
    #[clap(long)]
    words_dir: Option<PathBuf>,

    /// milliseconds per frame
    #[clap(long)]
    frame_ms: Option<u64>,

    /// disable the terminal bell
    #[clap(short = 'm', long)]
    mute: bool,

    /// seed for word order and placement
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Settings for this run: the stored config with command-line overrides
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            cfg.difficulty = difficulty;
        }
        if let Some(language) = self.language {
            cfg.language = language;
        }
        if let Some(dir) = &self.words_dir {
            cfg.words_dir = Some(dir.clone());
        }
        if let Some(ms) = self.frame_ms {
            cfg.frame_ms = ms;
        }
        cfg.mute |= self.mute;
        cfg
    }
}

/// Choices highlighted in the menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuSelection {
    pub difficulty: Difficulty,
    pub language: Language,
}

pub struct App {
    pub game: Game,
    pub menu: MenuSelection,
    /// Instant of the frame being drawn
    pub frame_at: Instant,
    pub should_quit: bool,
    saved: Config,
    store: Box<dyn ConfigStore>,
}

impl App {
    pub fn new(game: Game, settings: Config, store: Box<dyn ConfigStore>) -> Self {
        let saved = store.load();
        Self {
            game,
            menu: MenuSelection {
                difficulty: settings.difficulty,
                language: settings.language,
            },
            frame_at: Instant::now(),
            should_quit: false,
            saved,
            store,
        }
    }

    fn start(&mut self, now: Instant) {
        let MenuSelection {
            difficulty,
            language,
        } = self.menu;
        self.game.start(difficulty, language, now);

        if self.saved.remember(difficulty, language) {
            if let Err(err) = self.store.save(&self.saved) {
                tracing::warn!(%err, "could not save config");
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) -> Vec<GameEvent> {
        self.frame_at = now;
        self.game.advance(now)
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Vec<GameEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }

        match self.game.phase() {
            Phase::Idle => {
                match key.code {
                    KeyCode::Up => self.menu.difficulty = self.menu.difficulty.previous(),
                    KeyCode::Down => self.menu.difficulty = self.menu.difficulty.next(),
                    KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                        self.menu.language = self.menu.language.next()
                    }
                    KeyCode::Enter => self.start(now),
                    KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
                Vec::new()
            }
            Phase::Playing => match key.code {
                KeyCode::Esc => {
                    self.game.pause(now);
                    Vec::new()
                }
                KeyCode::Char('u') if ctrl => self.game.clear_input(now).events(),
                KeyCode::Backspace => self.game.pop_char(now).events(),
                KeyCode::Char(c) if !ctrl => self.game.push_char(c, now).events(),
                _ => Vec::new(),
            },
            Phase::Paused => match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    self.game.resume(now);
                    Vec::new()
                }
                KeyCode::Char('q') => self.game.end(),
                _ => Vec::new(),
            },
            Phase::GameOver => {
                match key.code {
                    KeyCode::Enter => {
                        self.game.return_to_idle();
                    }
                    KeyCode::Char('r') => self.start(now),
                    KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
                Vec::new()
            }
        }
    }
}

/// Log to a timestamped file; the terminal belongs to the TUI
fn setup_logging() -> Result<Option<WorkerGuard>> {
    let Some(log_dir) = AppDirs::log_dir() else {
        return Ok(None);
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_name = format!(
        "wordfall-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("log file: {}", log_dir.join(&file_name).display());
    Ok(Some(guard))
}

fn word_supply(settings: &Config, seed: Option<u64>) -> WordSupply {
    let provider: Box<dyn WordListProvider> = match &settings.words_dir {
        Some(dir) => Box::new(DirWordLists::new(dir)),
        None => Box::new(EmbeddedWordLists),
    };
    match seed {
        Some(seed) => WordSupply::with_seed(provider, seed),
        None => WordSupply::new(provider),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _guard = setup_logging()?;

    let store = FileConfigStore::new();
    let settings = cli.apply(store.load());
    tracing::info!(?settings, "starting");

    let game = match cli.seed {
        Some(seed) => Game::with_seed(seed),
        None => Game::new(),
    };
    let mut app = App::new(game, settings.clone(), Box::new(store));
    let mut feed = ThreadedFeed::new(word_supply(&settings, cli.seed));
    let mut sound: Box<dyn SoundSink> = if settings.mute {
        Box::new(Silent)
    } else {
        Box::new(TerminalBell::new())
    };
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::from_millis(settings.frame_ms),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner, &mut feed, sound.as_mut());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<CrosstermEventSource, FixedTicker>,
    feed: &mut ThreadedFeed,
    sound: &mut dyn SoundSink,
) -> Result<()> {
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(app, f))?;

        let event = runner.step();
        let now = Instant::now();
        let mut events = match event {
            FrameEvent::Key(key) => app.on_key(key, now),
            FrameEvent::Resize | FrameEvent::Tick => Vec::new(),
        };

        // keystrokes arrive between ticks and must not starve the fall
        if now.duration_since(last_tick) >= runner.interval() {
            events.extend(app.on_tick(now));
            last_tick = now;
        }

        app.game.sync_words(feed);
        sound.play_events(&events);
    }

    Ok(())
}
