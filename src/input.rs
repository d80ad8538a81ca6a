//! Keyboard and script input mapped onto engine commands.

use combat::Direction;
use crossterm::event::KeyCode;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    NextFloor,
    Restart,
    Quit,
}

impl Command {
    /// Arrow keys or WASD move; N descends, R restarts, Q/Esc quits
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Command::Move(Direction::North)),
            KeyCode::Down => Some(Command::Move(Direction::South)),
            KeyCode::Left => Some(Command::Move(Direction::West)),
            KeyCode::Right => Some(Command::Move(Direction::East)),
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char(c) => Self::from_char(c),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Command::Move(Direction::North)),
            's' => Some(Command::Move(Direction::South)),
            'a' => Some(Command::Move(Direction::West)),
            'd' => Some(Command::Move(Direction::East)),
            'n' => Some(Command::NextFloor),
            'r' => Some(Command::Restart),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Parse a key script such as `"ddwwn"`. Whitespace is skipped and lines
/// starting with `#` are comments; unknown keys are logged and dropped.
pub fn parse_script(script: &str) -> Vec<Command> {
    let mut commands = Vec::new();
    for line in script.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        for c in line.chars().filter(|c| !c.is_whitespace()) {
            match Command::from_char(c) {
                Some(command) => commands.push(command),
                None => warn!(key = %c, "unknown key in script"),
            }
        }
    }
    commands
}
