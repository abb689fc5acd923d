//! Session state and the per-tick transition.

use rand::Rng;
use tracing::{debug, info};

use crate::ghost::{self, Chase, Ghost, GhostKind, GHOST_COUNT};
use crate::input::Command;
use crate::maze::{Consumed, Dir, Grid, Layout, MazeError, Pos};
use crate::player::Player;

pub const INITIAL_LIVES: u32 = 3;
pub const POWER_TICKS: u32 = 30;
pub const GHOST_SCORE: u32 = 200;
/// Ghosts step on every second tick.
const GHOST_MOVE_INTERVAL: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Won,
    Lost,
    /// The player quit mid-game.
    Aborted,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub grid: Grid,
    pub player: Player,
    pub ghosts: [Ghost; GHOST_COUNT],
    pub score: u32,
    pub lives: u32,
    pub pellets_left: usize,
    pub pellets_total: usize,
    /// Remaining power-mode ticks; power mode is on while non-zero.
    pub power_timer: u32,
    pub tick: u64,
    pub outcome: Outcome,
}

impl Game {
    pub fn new(layout: &Layout) -> Result<Self, MazeError> {
        let grid = layout.build()?;
        Ok(Self::from_parts(grid, layout.player_start, layout.ghost_homes))
    }

    /// Builds a session on an already-parsed grid without layout validation.
    pub fn from_parts(grid: Grid, player_start: Pos, ghost_homes: [Pos; GHOST_COUNT]) -> Self {
        let pellets = grid.collectibles();
        let ghosts = std::array::from_fn(|i| Ghost::new(GhostKind::ALL[i], ghost_homes[i]));
        info!(pellets, width = grid.width(), height = grid.height(), "new game");
        Self {
            grid,
            player: Player::new(player_start),
            ghosts,
            score: 0,
            lives: INITIAL_LIVES,
            pellets_left: pellets,
            pellets_total: pellets,
            power_timer: 0,
            tick: 0,
            outcome: Outcome::Ongoing,
        }
    }

    pub fn powered(&self) -> bool {
        self.power_timer > 0
    }

    /// Advances one tick. Finished sessions are left untouched.
    pub fn tick(&mut self, rng: &mut impl Rng, input: Option<Command>) {
        if self.outcome.is_over() {
            return;
        }
        self.tick += 1;

        match input {
            Some(Command::Quit) => {
                self.finish(Outcome::Aborted);
                return;
            }
            Some(Command::Move(dir)) => self.player.request(dir),
            None => {}
        }

        let fresh_power = self.move_player();
        if self.outcome.is_over() {
            return;
        }

        self.update_ghosts(rng);
        self.handle_collisions();
        if self.outcome.is_over() {
            return;
        }

        // The countdown starts on the tick after the pellet was eaten.
        if !fresh_power {
            self.tick_power_timer();
        }
    }

    /// Returns true when a power pellet was eaten this tick.
    fn move_player(&mut self) -> bool {
        let consumed = self.player.advance(&mut self.grid);
        if consumed == Consumed::Nothing {
            return false;
        }
        self.score += consumed.points();
        self.pellets_left = self.pellets_left.saturating_sub(1);

        if consumed == Consumed::Power {
            self.power_timer = POWER_TICKS;
            for ghost in self.ghosts.iter_mut().filter(|g| !g.is_captured()) {
                ghost.dir = ghost.dir.reverse();
            }
            debug!(tick = self.tick, score = self.score, "power pellet eaten");
        }

        if self.pellets_left == 0 {
            self.finish(Outcome::Won);
        }
        consumed == Consumed::Power
    }

    fn update_ghosts(&mut self, rng: &mut impl Rng) {
        let chase = Chase {
            player: self.player.pos,
            heading: self.player.heading,
            powered: self.powered(),
        };
        let ghost_turn = self.tick % GHOST_MOVE_INTERVAL == 0;
        for g in self.ghosts.iter_mut() {
            if g.is_captured() {
                g.tick_respawn();
                continue;
            }
            if ghost_turn {
                let target = ghost::target(g.kind, g.pos, &chase, &self.grid, rng);
                g.advance(&self.grid, target);
            }
        }
    }

    fn handle_collisions(&mut self) {
        let powered = self.powered();
        let mut caught = false;
        for g in self.ghosts.iter_mut() {
            if g.is_captured() || g.pos != self.player.pos {
                continue;
            }
            if !powered {
                caught = true;
                break;
            }
            g.capture();
            self.score += GHOST_SCORE;
            info!(ghost = g.kind.name(), score = self.score, "ghost captured");
        }

        if caught {
            self.lose_life();
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        info!(lives = self.lives, tick = self.tick, "player caught");
        if self.lives == 0 {
            self.finish(Outcome::Lost);
            return;
        }
        self.player.reset();
        for g in self.ghosts.iter_mut() {
            g.reset();
        }
        self.power_timer = 0;
    }

    fn tick_power_timer(&mut self) {
        if self.power_timer > 0 {
            self.power_timer -= 1;
            if self.power_timer == 0 {
                debug!(tick = self.tick, "power mode over");
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = outcome;
        info!(?outcome, score = self.score, tick = self.tick, "game finished");
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            player: self.player.pos,
            heading: self.player.heading,
            ghosts: self.ghosts.map(|g| GhostView {
                kind: g.kind,
                pos: g.pos,
                captured: g.is_captured(),
            }),
            score: self.score,
            lives: self.lives,
            powered: self.powered(),
            outcome: self.outcome,
            tick: self.tick,
            pellets_left: self.pellets_left,
            pellets_total: self.pellets_total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostView {
    pub kind: GhostKind,
    pub pos: Pos,
    pub captured: bool,
}

/// Read-only view handed to displays after a tick completes.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub player: Pos,
    pub heading: Option<Dir>,
    pub ghosts: [GhostView; GHOST_COUNT],
    pub score: u32,
    pub lives: u32,
    pub powered: bool,
    pub outcome: Outcome,
    /// Only used for blinking.
    pub tick: u64,
    pub pellets_left: usize,
    pub pellets_total: usize,
}

impl Snapshot<'_> {
    pub fn pellets_eaten(&self) -> usize {
        self.pellets_total - self.pellets_left
    }
}
