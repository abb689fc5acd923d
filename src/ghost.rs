//! Ghost targeting, greedy steering and the capture/respawn cycle.

use rand::Rng;
use tracing::debug;

use crate::maze::{Dir, Grid, Pos};

pub const GHOST_COUNT: usize = 4;
/// Ticks a captured ghost stays frozen before returning home.
pub const RESPAWN_TICKS: u32 = 10;

const AMBUSH_LEAD: isize = 4;
const NOISE: isize = 2;
const SHY_RADIUS: usize = 8;

/// The four fixed pursuit personalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostKind {
    /// Heads straight for the player.
    Blinky,
    /// Aims four cells ahead of the player.
    Pinky,
    /// Chases a jittered copy of the player's cell.
    Inky,
    /// Chases from afar, retreats to its corner up close.
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; GHOST_COUNT] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GhostKind::Blinky => "Blinky",
            GhostKind::Pinky => "Pinky",
            GhostKind::Inky => "Inky",
            GhostKind::Clyde => "Clyde",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostState {
    Active,
    Captured { respawn_in: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ghost {
    pub kind: GhostKind,
    pub pos: Pos,
    pub home: Pos,
    pub dir: Dir,
    pub state: GhostState,
}

/// A target cell. Offsets may push it outside the maze, which is fine for
/// distance comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub x: isize,
    pub y: isize,
}

impl From<Pos> for Target {
    fn from(pos: Pos) -> Self {
        Self {
            x: pos.x as isize,
            y: pos.y as isize,
        }
    }
}

/// What the ghosts know about the player when choosing targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chase {
    pub player: Pos,
    pub heading: Option<Dir>,
    pub powered: bool,
}

impl Ghost {
    pub fn new(kind: GhostKind, home: Pos) -> Self {
        Self {
            kind,
            pos: home,
            home,
            dir: Dir::Up,
            state: GhostState::Active,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.kind, self.home);
    }

    pub fn is_captured(&self) -> bool {
        matches!(self.state, GhostState::Captured { .. })
    }

    pub fn capture(&mut self) {
        self.state = GhostState::Captured {
            respawn_in: RESPAWN_TICKS,
        };
    }

    /// Counts a captured ghost down; returns true on the tick it respawns.
    pub fn tick_respawn(&mut self) -> bool {
        let GhostState::Captured { respawn_in } = self.state else {
            return false;
        };
        let left = respawn_in.saturating_sub(1);
        if left > 0 {
            self.state = GhostState::Captured { respawn_in: left };
            return false;
        }
        self.pos = self.home;
        self.state = GhostState::Active;
        debug!(ghost = self.kind.name(), "ghost respawned");
        true
    }

    /// One greedy step toward `target`, or stay put when boxed in.
    pub fn advance(&mut self, grid: &Grid, target: Target) {
        if let Some(dir) = choose_dir(grid, self.pos, self.dir, target) {
            self.dir = dir;
            if let Some(next) = grid.step(self.pos, dir, true) {
                self.pos = next;
            }
        }
    }
}

pub fn target(
    kind: GhostKind,
    pos: Pos,
    chase: &Chase,
    grid: &Grid,
    rng: &mut impl Rng,
) -> Target {
    if chase.powered {
        return scatter_corner(pos, grid);
    }
    let player = Target::from(chase.player);
    match kind {
        GhostKind::Blinky => player,
        GhostKind::Pinky => match chase.heading {
            Some(dir) => {
                let (dx, dy) = dir.delta();
                Target {
                    x: player.x + dx * AMBUSH_LEAD,
                    y: player.y + dy * AMBUSH_LEAD,
                }
            }
            None => player,
        },
        GhostKind::Inky => Target {
            x: player.x + rng.gen_range(-NOISE..=NOISE),
            y: player.y + rng.gen_range(-NOISE..=NOISE),
        },
        GhostKind::Clyde => {
            let dist = pos.x.abs_diff(chase.player.x) + pos.y.abs_diff(chase.player.y);
            if dist >= SHY_RADIUS {
                player
            } else {
                Target {
                    x: 1,
                    y: grid.height() as isize - 2,
                }
            }
        }
    }
}

/// The inner corner diagonally opposite the ghost's quadrant.
pub fn scatter_corner(pos: Pos, grid: &Grid) -> Target {
    let (w, h) = (grid.width(), grid.height());
    Target {
        x: if pos.x < w / 2 { w as isize - 2 } else { 1 },
        y: if pos.y < h / 2 { h as isize - 2 } else { 1 },
    }
}

/// Picks the walkable neighbour closest to `target`, never reversing unless
/// reversing is the only move left.
pub fn choose_dir(grid: &Grid, pos: Pos, heading: Dir, target: Target) -> Option<Dir> {
    let back = heading.reverse();
    let mut best: Option<(Dir, isize)> = None;
    for dir in Dir::ALL {
        if dir == back {
            continue;
        }
        let Some(next) = grid.step(pos, dir, true) else {
            continue;
        };
        let dist = dist_sq(next, target);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((dir, dist));
        }
    }
    best.map(|(dir, _)| dir)
        .or_else(|| grid.step(pos, back, true).map(|_| back))
}

fn dist_sq(pos: Pos, target: Target) -> isize {
    let dx = pos.x as isize - target.x;
    let dy = pos.y as isize - target.y;
    dx * dx + dy * dy
}
