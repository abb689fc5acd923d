use crate::maze::{Consumed, Dir, Grid, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    pub start: Pos,
    /// `None` until the first accepted turn.
    pub heading: Option<Dir>,
    /// Last requested turn, held until the maze allows it.
    pub queued: Option<Dir>,
}

impl Player {
    pub fn new(start: Pos) -> Self {
        Self {
            pos: start,
            start,
            heading: None,
            queued: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.start);
    }

    pub fn request(&mut self, dir: Dir) {
        self.queued = Some(dir);
    }

    /// Turns if the queued heading is open, then steps along the heading and
    /// eats whatever lies on the resulting cell. A blocked step keeps the heading.
    pub fn advance(&mut self, grid: &mut Grid) -> Consumed {
        if let Some(want) = self.queued {
            if grid.step(self.pos, want, false).is_some() {
                self.heading = Some(want);
                self.queued = None;
            }
        }

        let Some(dir) = self.heading else {
            return Consumed::Nothing;
        };
        if let Some(next) = grid.step(self.pos, dir, false) {
            self.pos = next;
        }
        grid.consume(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALL: &[&str] = &[
        "#######",
        "#.. o #",
        "#.#####",
        "       ",
        "#######",
    ];

    #[test]
    fn idle_until_first_request() {
        let mut grid = Grid::parse(HALL, &[3]).unwrap();
        let mut player = Player::new(Pos::new(1, 1));
        assert_eq!(player.advance(&mut grid), Consumed::Nothing);
        assert_eq!(player.pos, Pos::new(1, 1));
    }

    #[test]
    fn blocked_turn_stays_queued() {
        let mut grid = Grid::parse(HALL, &[3]).unwrap();
        let mut player = Player::new(Pos::new(2, 1));
        player.heading = Some(Dir::Left);
        player.request(Dir::Down);

        // (2, 2) is a wall, so keep going left and remember the request.
        assert_eq!(player.advance(&mut grid), Consumed::Pellet);
        assert_eq!(player.pos, Pos::new(1, 1));
        assert_eq!(player.heading, Some(Dir::Left));
        assert_eq!(player.queued, Some(Dir::Down));

        // Now the turn is open.
        assert_eq!(player.advance(&mut grid), Consumed::Pellet);
        assert_eq!(player.pos, Pos::new(1, 2));
        assert_eq!(player.heading, Some(Dir::Down));
        assert_eq!(player.queued, None);
    }

    #[test]
    fn wall_stops_but_keeps_heading() {
        let mut grid = Grid::parse(HALL, &[3]).unwrap();
        let mut player = Player::new(Pos::new(5, 1));
        player.heading = Some(Dir::Right);
        assert_eq!(player.advance(&mut grid), Consumed::Nothing);
        assert_eq!(player.pos, Pos::new(5, 1));
        assert_eq!(player.heading, Some(Dir::Right));

        player.request(Dir::Left);
        assert_eq!(player.advance(&mut grid), Consumed::Power);
        assert_eq!(player.pos, Pos::new(4, 1));
    }

    #[test]
    fn tunnel_row_wraps_left_edge() {
        let mut grid = Grid::parse(HALL, &[3]).unwrap();
        let mut player = Player::new(Pos::new(0, 3));
        player.request(Dir::Left);
        player.advance(&mut grid);
        assert_eq!(player.pos, Pos::new(6, 3));
        player.advance(&mut grid);
        assert_eq!(player.pos, Pos::new(5, 3));
    }

    #[test]
    fn reset_returns_to_start() {
        let mut grid = Grid::parse(HALL, &[3]).unwrap();
        let mut player = Player::new(Pos::new(1, 1));
        player.request(Dir::Right);
        player.advance(&mut grid);
        player.request(Dir::Up);
        player.reset();
        assert_eq!(player, Player::new(Pos::new(1, 1)));
    }
}
