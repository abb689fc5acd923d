//! The static maze: tile kinds, coordinates, walkability and collectibles.

use std::collections::VecDeque;

use thiserror::Error;

use crate::ghost::GHOST_COUNT;

pub const PELLET_SCORE: u32 = 10;
pub const POWER_SCORE: u32 = 50;

/// Cell kinds. Only `Pellet` and `Power` ever change, and only into `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Empty,
    Pellet,
    Power,
    /// Passable for ghosts only; closes the ghost house to the player.
    Gate,
}

impl Tile {
    pub const ALL: [Tile; 5] = [Tile::Wall, Tile::Empty, Tile::Pellet, Tile::Power, Tile::Gate];

    fn from_char(ch: char) -> Option<Tile> {
        match ch {
            '#' => Some(Tile::Wall),
            ' ' => Some(Tile::Empty),
            '.' => Some(Tile::Pellet),
            'o' => Some(Tile::Power),
            '-' => Some(Tile::Gate),
            _ => None,
        }
    }

    pub fn is_collectible(self) -> bool {
        matches!(self, Tile::Pellet | Tile::Power)
    }

    fn passable(self, agent: bool) -> bool {
        match self {
            Tile::Wall => false,
            Tile::Gate => agent,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Fixed evaluation order; ties in ghost steering resolve to the earlier entry.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn reverse(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// What the player found on the cell it just entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumed {
    Nothing,
    Pellet,
    Power,
}

impl Consumed {
    pub fn points(self) -> u32 {
        match self {
            Consumed::Nothing => 0,
            Consumed::Pellet => PELLET_SCORE,
            Consumed::Power => POWER_SCORE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("maze has no rows")]
    Empty,
    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {ch:?} at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },
    #[error("expected exactly one tunnel row, found {0}")]
    TunnelCount(usize),
    #[error("tunnel row {0} is outside the maze")]
    TunnelOutOfRange(usize),
    #[error("tunnel row {0} is walled off at an edge")]
    TunnelBlocked(usize),
    #[error("maze contains no {0:?} tile")]
    MissingTile(Tile),
    #[error("{who} start ({x}, {y}) is outside the maze")]
    StartOutOfBounds { who: &'static str, x: usize, y: usize },
    #[error("{who} start ({x}, {y}) is not walkable")]
    BlockedStart { who: &'static str, x: usize, y: usize },
    #[error("collectible at ({x}, {y}) cannot be reached from the player start")]
    UnreachablePellet { x: usize, y: usize },
}

/// Fixed-size tile map. Rows listed in `tunnel_rows` wrap horizontally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    tunnel_rows: Vec<usize>,
}

impl Grid {
    /// Parses `#`, ` `, `.`, `o` and `-` rows. Checks shape and tunnel rows only;
    /// [`Layout::build`] performs the full startup validation.
    pub fn parse(rows: &[&str], tunnel_rows: &[usize]) -> Result<Self, MazeError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MazeError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or(MazeError::UnknownTile { ch, x, y })?;
                tiles.push(tile);
            }
        }

        let grid = Self {
            width,
            height,
            tiles,
            tunnel_rows: tunnel_rows.to_vec(),
        };
        for &row in tunnel_rows {
            if row >= height {
                return Err(MazeError::TunnelOutOfRange(row));
            }
            let left = grid.tile(Pos::new(0, row));
            let right = grid.tile(Pos::new(width - 1, row));
            if left == Tile::Wall || right == Tile::Wall {
                return Err(MazeError::TunnelBlocked(row));
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tunnel_rows(&self) -> &[usize] {
        &self.tunnel_rows
    }

    pub fn is_tunnel_row(&self, y: usize) -> bool {
        self.tunnel_rows.contains(&y)
    }

    pub fn tile(&self, pos: Pos) -> Tile {
        self.tiles[pos.y * self.width + pos.x]
    }

    pub fn wrap_x(&self, x: isize) -> isize {
        x.rem_euclid(self.width as isize)
    }

    /// Out-of-range columns are only reachable through a tunnel row; gates
    /// admit ghosts but not the player.
    pub fn is_walkable(&self, x: isize, y: isize, agent: bool) -> bool {
        if y < 0 || y >= self.height as isize {
            return false;
        }
        let y = y as usize;
        let x = if x < 0 || x >= self.width as isize {
            if !self.is_tunnel_row(y) {
                return false;
            }
            self.wrap_x(x)
        } else {
            x
        };
        self.tile(Pos::new(x as usize, y)).passable(agent)
    }

    /// The cell one step from `pos`, wrapped on tunnel rows. Ignores walls.
    pub fn neighbor(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if ny < 0 || ny >= self.height as isize {
            return None;
        }
        let ny = ny as usize;
        if nx < 0 || nx >= self.width as isize {
            if !self.is_tunnel_row(ny) {
                return None;
            }
            return Some(Pos::new(self.wrap_x(nx) as usize, ny));
        }
        Some(Pos::new(nx as usize, ny))
    }

    /// The cell one step from `pos` if the mover may enter it.
    pub fn step(&self, pos: Pos, dir: Dir, agent: bool) -> Option<Pos> {
        self.neighbor(pos, dir)
            .filter(|next| self.is_walkable(next.x as isize, next.y as isize, agent))
    }

    pub fn consume(&mut self, pos: Pos) -> Consumed {
        let idx = pos.y * self.width + pos.x;
        let consumed = match self.tiles[idx] {
            Tile::Pellet => Consumed::Pellet,
            Tile::Power => Consumed::Power,
            _ => return Consumed::Nothing,
        };
        self.tiles[idx] = Tile::Empty;
        consumed
    }

    pub fn collectibles(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_collectible()).count()
    }

    /// Cells the player can reach from `start`.
    fn flood(&self, start: Pos) -> Vec<bool> {
        let mut seen = vec![false; self.width * self.height];
        let mut q = VecDeque::new();
        seen[start.y * self.width + start.x] = true;
        q.push_back(start);
        while let Some(pos) = q.pop_front() {
            for dir in Dir::ALL {
                if let Some(next) = self.step(pos, dir, false) {
                    let idx = next.y * self.width + next.x;
                    if !seen[idx] {
                        seen[idx] = true;
                        q.push_back(next);
                    }
                }
            }
        }
        seen
    }
}

/// A compiled-in maze plus the spawn points that belong to it.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub rows: &'static [&'static str],
    pub tunnel_rows: &'static [usize],
    pub player_start: Pos,
    /// Blinky, Pinky, Inky, Clyde.
    pub ghost_homes: [Pos; GHOST_COUNT],
}

impl Layout {
    /// Parses the layout and rejects anything the simulation cannot run on.
    pub fn build(&self) -> Result<Grid, MazeError> {
        let grid = Grid::parse(self.rows, self.tunnel_rows)?;
        if grid.tunnel_rows.len() != 1 {
            return Err(MazeError::TunnelCount(grid.tunnel_rows.len()));
        }
        for kind in Tile::ALL {
            if !grid.tiles.contains(&kind) {
                return Err(MazeError::MissingTile(kind));
            }
        }

        let starts = std::iter::once(("player", self.player_start, false))
            .chain(self.ghost_homes.iter().map(|&p| ("ghost", p, true)));
        for (who, pos, agent) in starts {
            if pos.x >= grid.width || pos.y >= grid.height {
                return Err(MazeError::StartOutOfBounds {
                    who,
                    x: pos.x,
                    y: pos.y,
                });
            }
            if !grid.is_walkable(pos.x as isize, pos.y as isize, agent) {
                return Err(MazeError::BlockedStart {
                    who,
                    x: pos.x,
                    y: pos.y,
                });
            }
        }

        let reachable = grid.flood(self.player_start);
        for (idx, tile) in grid.tiles.iter().enumerate() {
            if tile.is_collectible() && !reachable[idx] {
                return Err(MazeError::UnreachablePellet {
                    x: idx % grid.width,
                    y: idx / grid.width,
                });
            }
        }
        Ok(grid)
    }
}

pub const CLASSIC: Layout = Layout {
    rows: &[
        "############################",
        "#............##............#",
        "#.####.#####.##.#####.####.#",
        "#o####.#####.##.#####.####o#",
        "#.####.#####.##.#####.####.#",
        "#..........................#",
        "#.####.##.########.##.####.#",
        "#.####.##.########.##.####.#",
        "#......##....##....##......#",
        "######.##### ## #####.######",
        "     #.##### ## #####.#     ",
        "     #.##          ##.#     ",
        "     #.## ###--### ##.#     ",
        "######.## #      # ##.######",
        "      .   #      #   .      ",
        "######.## #      # ##.######",
        "     #.## ######## ##.#     ",
        "     #.##          ##.#     ",
        "     #.## ######## ##.#     ",
        "######.## ######## ##.######",
        "#............##............#",
        "#.####.#####.##.#####.####.#",
        "#.####.#####.##.#####.####.#",
        "#o..##.......  .......##..o#",
        "###.##.##.########.##.##.###",
        "###.##.##.########.##.##.###",
        "#......##....##....##......#",
        "#.##########.##.##########.#",
        "#.##########.##.##########.#",
        "#..........................#",
        "############################",
    ],
    tunnel_rows: &[14],
    player_start: Pos::new(14, 23),
    ghost_homes: [
        Pos::new(14, 11),
        Pos::new(12, 14),
        Pos::new(14, 14),
        Pos::new(16, 14),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &[&str] = &[
        "#####",
        "#.o #",
        "  -  ",
        "#####",
    ];

    #[test]
    fn classic_layout_is_valid() {
        let grid = CLASSIC.build().expect("classic maze");
        assert_eq!(grid.width(), 28);
        assert_eq!(grid.height(), 31);
        assert_eq!(grid.tunnel_rows(), &[14]);
        assert!(grid.collectibles() > 200);
    }

    #[test]
    fn walls_and_bounds_block() {
        let grid = Grid::parse(SMALL, &[2]).unwrap();
        assert!(!grid.is_walkable(0, 0, false));
        assert!(!grid.is_walkable(1, -1, true));
        assert!(!grid.is_walkable(1, 4, true));
        assert!(grid.is_walkable(1, 1, false));
        // column overflow off the tunnel row
        assert!(!grid.is_walkable(-1, 1, true));
    }

    #[test]
    fn gate_admits_ghosts_only() {
        let grid = Grid::parse(SMALL, &[2]).unwrap();
        assert!(!grid.is_walkable(2, 2, false));
        assert!(grid.is_walkable(2, 2, true));
        assert_eq!(grid.step(Pos::new(1, 2), Dir::Right, false), None);
        assert_eq!(grid.step(Pos::new(1, 2), Dir::Right, true), Some(Pos::new(2, 2)));
    }

    #[test]
    fn tunnel_row_wraps_both_ways() {
        let grid = Grid::parse(SMALL, &[2]).unwrap();
        assert!(grid.is_walkable(-1, 2, false));
        assert!(grid.is_walkable(5, 2, false));
        assert_eq!(grid.neighbor(Pos::new(0, 2), Dir::Left), Some(Pos::new(4, 2)));
        assert_eq!(grid.neighbor(Pos::new(4, 2), Dir::Right), Some(Pos::new(0, 2)));
        assert_eq!(grid.neighbor(Pos::new(4, 1), Dir::Right), None);
    }

    #[test]
    fn consume_empties_collectibles_once() {
        let mut grid = Grid::parse(SMALL, &[2]).unwrap();
        assert_eq!(grid.collectibles(), 2);
        assert_eq!(grid.consume(Pos::new(1, 1)), Consumed::Pellet);
        assert_eq!(grid.consume(Pos::new(1, 1)), Consumed::Nothing);
        assert_eq!(grid.consume(Pos::new(2, 1)), Consumed::Power);
        assert_eq!(grid.consume(Pos::new(2, 2)), Consumed::Nothing);
        assert_eq!(grid.tile(Pos::new(2, 2)), Tile::Gate);
        assert_eq!(grid.collectibles(), 0);
        assert_eq!(Consumed::Power.points(), POWER_SCORE);
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert_eq!(Grid::parse(&[], &[]), Err(MazeError::Empty));
        assert_eq!(
            Grid::parse(&["###", "##"], &[]),
            Err(MazeError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            Grid::parse(&["#x#"], &[]),
            Err(MazeError::UnknownTile { ch: 'x', x: 1, y: 0 })
        );
        assert_eq!(Grid::parse(SMALL, &[7]), Err(MazeError::TunnelOutOfRange(7)));
        assert_eq!(Grid::parse(SMALL, &[1]), Err(MazeError::TunnelBlocked(1)));
    }

    #[test]
    fn build_rejects_unplayable_layouts() {
        let no_tunnel = Layout {
            tunnel_rows: &[],
            ..CLASSIC
        };
        assert_eq!(no_tunnel.build(), Err(MazeError::TunnelCount(0)));

        let walled_start = Layout {
            player_start: Pos::new(0, 0),
            ..CLASSIC
        };
        assert_eq!(
            walled_start.build(),
            Err(MazeError::BlockedStart {
                who: "player",
                x: 0,
                y: 0
            })
        );

        // Past the right edge of the tunnel row.
        let off_grid = Layout {
            player_start: Pos::new(30, 14),
            ..CLASSIC
        };
        assert_eq!(
            off_grid.build(),
            Err(MazeError::StartOutOfBounds {
                who: "player",
                x: 30,
                y: 14
            })
        );

        let off_last_row = Layout {
            rows: &["#######", "#o. -.#", "       "],
            tunnel_rows: &[2],
            player_start: Pos::new(9, 2),
            ghost_homes: [Pos::new(3, 1); GHOST_COUNT],
        };
        assert_eq!(
            off_last_row.build(),
            Err(MazeError::StartOutOfBounds {
                who: "player",
                x: 9,
                y: 2
            })
        );

        let ghost_off_grid = Layout {
            ghost_homes: [
                Pos::new(14, 11),
                Pos::new(12, 14),
                Pos::new(14, 40),
                Pos::new(16, 14),
            ],
            ..CLASSIC
        };
        assert_eq!(
            ghost_off_grid.build(),
            Err(MazeError::StartOutOfBounds {
                who: "ghost",
                x: 14,
                y: 40
            })
        );

        let no_gate = Layout {
            rows: &["#######", "#o... #", "       ", "#######"],
            tunnel_rows: &[2],
            player_start: Pos::new(1, 1),
            ghost_homes: [Pos::new(5, 1); GHOST_COUNT],
        };
        assert_eq!(no_gate.build(), Err(MazeError::MissingTile(Tile::Gate)));
    }

    #[test]
    fn build_rejects_sealed_pellets() {
        let sealed = Layout {
            rows: &["#######", "#o #.##", "#- ####", "       ", "#######"],
            tunnel_rows: &[3],
            player_start: Pos::new(2, 3),
            ghost_homes: [Pos::new(1, 2); GHOST_COUNT],
        };
        assert_eq!(sealed.build(), Err(MazeError::UnreachablePellet { x: 4, y: 1 }));
    }
}
