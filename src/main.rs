use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pacman_term::config::Config;
use pacman_term::input::{ChannelInput, KeyboardInput};
use pacman_term::render::{self, FrameBuffer, TerminalDisplay};
use pacman_term::session::{self, Pacing};
use pacman_term::{Game, Outcome, CLASSIC};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config)?;

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(&CLASSIC).context("built-in maze is invalid")?;
    info!(seed, tick_ms = config.tick.as_millis() as u64, "starting");

    if let Some(ticks) = config.headless_ticks {
        return run_headless(&mut game, &mut rng, ticks);
    }

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let result = enter_screen(&mut stdout).and_then(|()| play(&mut game, &mut rng, &config));

    if let Err(err) = stdout.execute(Show) {
        tracing::error!(?err, "failed to show cursor");
    }
    if let Err(err) = stdout.execute(LeaveAlternateScreen) {
        tracing::error!(?err, "failed to leave alternate screen");
    }
    if let Err(err) = terminal::disable_raw_mode() {
        tracing::error!(?err, "failed to disable raw mode");
    }
    result
}

fn enter_screen(stdout: &mut io::Stdout) -> Result<()> {
    stdout
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    stdout.execute(Hide).context("failed to hide cursor")?;
    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    if let Some(path) = &config.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;
    } else if config.headless_ticks.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .try_init()
            .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;
    }
    Ok(())
}

fn play(game: &mut Game, rng: &mut StdRng, config: &Config) -> Result<()> {
    let mut display = TerminalDisplay::new(io::stdout(), game.grid.width(), game.grid.height());
    let pacing = Pacing {
        tick: config.tick,
        max_ticks: None,
    };
    session::run(game, rng, &mut KeyboardInput, &mut display, pacing)?;

    if matches!(game.outcome, Outcome::Won | Outcome::Lost) {
        display.render_end_screen(&game.snapshot())?;
        wait_for_key()?;
    }
    Ok(())
}

fn wait_for_key() -> io::Result<()> {
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }
}

/// Runs without a terminal or input and prints the last frame.
fn run_headless(game: &mut Game, rng: &mut StdRng, ticks: u64) -> Result<()> {
    let (_tx, mut input) = ChannelInput::new();
    let mut display = FrameBuffer::default();
    let pacing = Pacing {
        tick: Duration::ZERO,
        max_ticks: Some(ticks),
    };
    session::run(game, rng, &mut input, &mut display, pacing)?;

    let mut out = io::stdout().lock();
    write!(out, "{}", display.last)?;
    for line in render::end_screen_lines(&game.snapshot()) {
        writeln!(out, "{line}")?;
    }
    writeln!(
        out,
        "ticks={} outcome={:?} score={} lives={}",
        game.tick, game.outcome, game.score, game.lives
    )?;
    Ok(())
}
