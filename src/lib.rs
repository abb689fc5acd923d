//! Terminal Pac-Man: a fixed maze, four pursuing ghosts and a deterministic
//! per-tick simulation behind narrow input and display seams.

pub mod config;
pub mod game;
pub mod ghost;
pub mod input;
pub mod maze;
pub mod player;
pub mod render;
pub mod session;

pub use game::{Game, Outcome, Snapshot};
pub use input::{Command, InputSource};
pub use maze::{Dir, Pos, CLASSIC};
pub use render::Display;
