//! Key mapping from terminal events to input events.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::Action;

/// What a key press means to the game loop.
///
/// Engine actions pass straight to the environment; the rest are handled by
/// the front-end and never reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Action(Action),
    /// Leave the start screen.
    Start,
    Restart,
    Quit,
}

/// Map keyboard input to an input event. Releases are ignored.
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(InputEvent::Quit);
    }

    let action = match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') => {
            Action::MoveLeft
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') => {
            Action::MoveRight
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') => {
            Action::SoftDrop
        }

        // Rotation
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') => {
            Action::Rotate
        }

        KeyCode::Char(' ') => Action::HardDrop,

        KeyCode::Char('r') | KeyCode::Char('R') => return Some(InputEvent::Restart),
        KeyCode::Enter => return Some(InputEvent::Start),

        _ => return None,
    };
    Some(InputEvent::Action(action))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
