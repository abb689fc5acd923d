//! Display collaborators. Everything here reads a [`Snapshot`] and never
//! touches the session.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::game::{Outcome, Snapshot};
use crate::ghost::GhostKind;
use crate::maze::{Dir, Pos, Tile};

const CELL_W: usize = 2;
const FOOTER: &str = "W/A/S/D, arrows or h/j/k/l to move, q to quit. Power pellets let you eat ghosts!";

/// Columns and rows the board, HUD and footer need together.
fn required_size(width: usize, height: usize) -> (u16, u16) {
    let cols = (width * CELL_W).max(FOOTER.width());
    (cols as u16, (height + 3) as u16)
}

pub trait Display {
    fn render(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()>;
}

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player(Option<Dir>),
    Ghost,
    Frightened,
    Wall,
    Empty,
    Pellet,
    Power,
    Gate,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// Full-colour crossterm renderer that only redraws cells that changed.
pub struct TerminalDisplay<W: Write> {
    out: W,
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Clears the screen and prints the win / game-over banner.
    pub fn render_end_screen(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let color = match snapshot.outcome {
            Outcome::Won => Color::Green,
            _ => Color::Red,
        };
        let mut lines = end_screen_lines(snapshot);
        lines.push(String::new());
        lines.push("Press any key to exit...".to_string());

        self.out.queue(Clear(ClearType::All))?;
        for (i, line) in lines.iter().enumerate() {
            self.out.queue(MoveTo(2, 2 + i as u16))?;
            self.out
                .queue(SetForegroundColor(if i == 0 { color } else { Color::White }))?;
            self.out.queue(Print(line))?;
        }
        self.out.queue(ResetColor)?;
        self.out.flush()?;
        self.needs_full = true;
        Ok(())
    }

    fn draw_cell(&mut self, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let (text, color) = match cell.glyph {
            Glyph::Player(heading) => (player_text(heading), cell.color),
            Glyph::Ghost => ("👻", cell.color),
            Glyph::Frightened => ("😱", cell.color),
            Glyph::Wall => ("██", cell.color),
            Glyph::Empty => ("  ", cell.color),
            Glyph::Pellet => ("· ", cell.color),
            Glyph::Power => ("● ", cell.color),
            Glyph::Gate => ("==", cell.color),
        };
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        self.out.queue(MoveTo(x_pos, y_pos))?;
        self.out.queue(SetForegroundColor(color))?;
        self.out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                self.out.queue(Print(' '))?;
            }
        }
        self.out.queue(ResetColor)?;
        Ok(())
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn render(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let grid = snapshot.grid;
        let (needed_w, needed_h) = required_size(grid.width(), grid.height());
        let board_w = (grid.width() * CELL_W) as u16;

        self.out.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            self.out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            self.out.queue(Print(msg))?;
            self.out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - board_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            self.out.queue(Clear(ClearType::All))?;
        }

        let hud = hud_line(snapshot);
        if self.needs_full || hud != self.last_hud {
            self.out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            self.out.queue(SetForegroundColor(Color::White))?;
            self.out.queue(Clear(ClearType::CurrentLine))?;
            self.out.queue(Print(&hud))?;
            self.out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let cell = cell_for(snapshot, Pos::new(x, y));
                let idx = y * grid.width() + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(x, y, cell)?;
                }
            }
        }

        if self.needs_full {
            let footer_x = (term_w - FOOTER.width() as u16) / 2;
            self.out
                .queue(MoveTo(footer_x, self.origin_y + grid.height() as u16 + 1))?;
            self.out.queue(SetForegroundColor(Color::DarkGrey))?;
            self.out.queue(Print(FOOTER))?;
            self.out.queue(ResetColor)?;
        }
        self.needs_full = false;

        self.out.flush()?;
        Ok(())
    }
}

/// Keeps the latest plain-text frame; used headless and in tests.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    pub last: String,
    pub frames: u64,
}

impl Display for FrameBuffer {
    fn render(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        self.last = ascii_frame(snapshot);
        self.frames += 1;
        Ok(())
    }
}

pub fn hud_line(snapshot: &Snapshot<'_>) -> String {
    let mut hud = format!(
        "Score: {}  Lives: {}  Pellets: {}/{}",
        snapshot.score,
        "C ".repeat(snapshot.lives as usize).trim_end(),
        snapshot.pellets_eaten(),
        snapshot.pellets_total
    );
    if snapshot.powered {
        hud.push_str("  [POWER!]");
    }
    hud
}

/// One character per cell, HUD on top.
pub fn ascii_frame(snapshot: &Snapshot<'_>) -> String {
    let grid = snapshot.grid;
    let mut out = hud_line(snapshot);
    out.push('\n');
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let ch = match cell_for(snapshot, Pos::new(x, y)).glyph {
                Glyph::Player(heading) => player_char(heading),
                Glyph::Ghost | Glyph::Frightened => 'M',
                Glyph::Wall => '#',
                Glyph::Empty => ' ',
                Glyph::Pellet => '.',
                Glyph::Power => 'o',
                Glyph::Gate => '-',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

pub fn end_screen_lines(snapshot: &Snapshot<'_>) -> Vec<String> {
    let score = format!("Final Score: {}", snapshot.score);
    match snapshot.outcome {
        Outcome::Won => vec![
            "Y O U   W I N !".to_string(),
            score,
            format!("All {} pellets eaten!", snapshot.pellets_total),
        ],
        Outcome::Lost => vec![
            "G A M E   O V E R".to_string(),
            score,
            format!(
                "Pellets Eaten: {}/{}",
                snapshot.pellets_eaten(),
                snapshot.pellets_total
            ),
        ],
        Outcome::Ongoing | Outcome::Aborted => Vec::new(),
    }
}

fn cell_for(snapshot: &Snapshot<'_>, pos: Pos) -> Cell {
    if pos == snapshot.player {
        return Cell {
            glyph: Glyph::Player(snapshot.heading),
            color: Color::Yellow,
        };
    }
    if let Some(ghost) = snapshot
        .ghosts
        .iter()
        .find(|g| !g.captured && g.pos == pos)
    {
        if snapshot.powered {
            return Cell {
                glyph: Glyph::Frightened,
                color: Color::Blue,
            };
        }
        return Cell {
            glyph: Glyph::Ghost,
            color: ghost_color(ghost.kind),
        };
    }
    match snapshot.grid.tile(pos) {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Gate => Cell {
            glyph: Glyph::Gate,
            color: Color::White,
        },
        Tile::Empty => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
        Tile::Pellet => Cell {
            glyph: Glyph::Pellet,
            color: Color::White,
        },
        Tile::Power => Cell {
            glyph: Glyph::Power,
            color: if snapshot.tick % 4 < 2 {
                Color::White
            } else {
                Color::Yellow
            },
        },
    }
}

fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::Red,
        GhostKind::Pinky => Color::Magenta,
        GhostKind::Inky => Color::Cyan,
        GhostKind::Clyde => Color::Rgb {
            r: 255,
            g: 135,
            b: 0,
        },
    }
}

fn player_char(heading: Option<Dir>) -> char {
    match heading {
        Some(Dir::Left) => 'D',
        Some(Dir::Up) => '^',
        Some(Dir::Down) => 'v',
        Some(Dir::Right) | None => 'C',
    }
}

fn player_text(heading: Option<Dir>) -> &'static str {
    match heading {
        Some(Dir::Left) => "D ",
        Some(Dir::Up) => "^ ",
        Some(Dir::Down) => "v ",
        Some(Dir::Right) | None => "C ",
    }
}
