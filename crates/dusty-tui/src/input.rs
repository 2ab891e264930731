/// Key decoding — turns crossterm key events into browser commands.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Everything the user can ask the browser to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Up,
    Down,
    Enter,
    Exit,
    ToggleSort,
    GoToRoot,
    Delete,
    Quit,
}

impl Command {
    /// Map a key press to a command. Key releases and unbound keys map to `None`.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Self::Quit),
                _ => None,
            };
        }

        let cmd = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Self::Up,
            KeyCode::Down | KeyCode::Char('j') => Self::Down,
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => Self::Enter,
            KeyCode::Left | KeyCode::Backspace | KeyCode::Char('h') => Self::Exit,
            KeyCode::Char('s') => Self::ToggleSort,
            KeyCode::Home => Self::GoToRoot,
            KeyCode::Char('d') => Self::Delete,
            KeyCode::Char('q') => Self::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}
