//! The fixed-tick loop: poll input, step, render, sleep out the tick budget.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use crate::game::Game;
use crate::input::{self, InputSource};
use crate::render::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub tick: Duration,
    /// Stop after this many ticks even if the game is still running.
    pub max_ticks: Option<u64>,
}

/// Drives `game` until it finishes or `pacing.max_ticks` runs out.
pub fn run<I, D, R>(
    game: &mut Game,
    rng: &mut R,
    input: &mut I,
    display: &mut D,
    pacing: Pacing,
) -> io::Result<()>
where
    I: InputSource + ?Sized,
    D: Display + ?Sized,
    R: Rng,
{
    display.render(&game.snapshot())?;
    let mut ticks = 0u64;
    loop {
        let started = Instant::now();
        let cmd = input::latest(input)?;
        game.tick(rng, cmd);
        display.render(&game.snapshot())?;
        ticks += 1;

        if game.outcome.is_over() {
            debug!(ticks, outcome = ?game.outcome, "session ended");
            return Ok(());
        }
        if pacing.max_ticks.is_some_and(|max| ticks >= max) {
            return Ok(());
        }

        let elapsed = started.elapsed();
        if elapsed < pacing.tick {
            thread::sleep(pacing.tick - elapsed);
        }
    }
}
