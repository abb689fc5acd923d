//! Input collaborators. The simulation only sees [`Command`]s.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::maze::Dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Dir),
    Quit,
}

/// A non-blocking source of player commands.
pub trait InputSource {
    /// Returns the next buffered command, or `None` when nothing is waiting.
    fn poll(&mut self) -> io::Result<Option<Command>>;
}

/// Drains everything buffered this tick. The latest direction wins; a quit
/// returns immediately and leaves anything behind it unread.
pub fn latest<S: InputSource + ?Sized>(source: &mut S) -> io::Result<Option<Command>> {
    let mut latest = None;
    while let Some(cmd) = source.poll()? {
        if cmd == Command::Quit {
            return Ok(Some(Command::Quit));
        }
        latest = Some(cmd);
    }
    Ok(latest)
}

/// Commands pushed through an mpsc queue, for scripted play and tests.
pub struct ChannelInput {
    rx: Receiver<Command>,
}

impl ChannelInput {
    pub fn new() -> (Sender<Command>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self) -> io::Result<Option<Command>> {
        match self.rx.try_recv() {
            Ok(cmd) => Ok(Some(cmd)),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => Ok(None),
        }
    }
}

/// Keyboard input from the crossterm event queue. Expects raw mode.
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> io::Result<Option<Command>> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = command_for_key(key) {
                    return Ok(Some(cmd));
                }
            }
        }
        Ok(None)
    }
}

pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    let dir = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(Command::Quit)
        }
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Dir::Up,
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => Dir::Down,
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => Dir::Left,
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => Dir::Right,
        _ => return None,
    };
    Some(Command::Move(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_direction_wins() {
        let (tx, mut input) = ChannelInput::new();
        tx.send(Command::Move(Dir::Up)).unwrap();
        tx.send(Command::Move(Dir::Left)).unwrap();
        assert_eq!(latest(&mut input).unwrap(), Some(Command::Move(Dir::Left)));
        assert_eq!(latest(&mut input).unwrap(), None);
    }

    #[test]
    fn quit_short_circuits() {
        let (tx, mut input) = ChannelInput::new();
        tx.send(Command::Move(Dir::Up)).unwrap();
        tx.send(Command::Quit).unwrap();
        tx.send(Command::Move(Dir::Down)).unwrap();
        assert_eq!(latest(&mut input).unwrap(), Some(Command::Quit));
        assert_eq!(input.poll().unwrap(), Some(Command::Move(Dir::Down)));
    }

    #[test]
    fn dropped_sender_reads_as_idle() {
        let (tx, mut input) = ChannelInput::new();
        drop(tx);
        assert_eq!(latest(&mut input).unwrap(), None);
    }

    #[test]
    fn key_bindings() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(
            command_for_key(press(KeyCode::Char('w'))),
            Some(Command::Move(Dir::Up))
        );
        assert_eq!(
            command_for_key(press(KeyCode::Left)),
            Some(Command::Move(Dir::Left))
        );
        assert_eq!(
            command_for_key(press(KeyCode::Char('l'))),
            Some(Command::Move(Dir::Right))
        );
        assert_eq!(command_for_key(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            command_for_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(command_for_key(press(KeyCode::Char('x'))), None);
    }
}
