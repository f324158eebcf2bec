//! Key mapping from terminal events to action codes.
//!
//! Player one uses the arrows (or vim keys), player two uses WASD plus F/G/E.

use crate::types::ActionCode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to an action code.
pub fn handle_key_event(key: KeyEvent) -> Option<ActionCode> {
    map_key_code(key.code)
}

pub fn map_key_code(code: KeyCode) -> Option<ActionCode> {
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(ActionCode::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(ActionCode::MoveRight),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(ActionCode::SoftDrop),

        // Rotation
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(ActionCode::RotateCw)
        }
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(ActionCode::RotateCcw),

        // Actions
        KeyCode::Char(' ') => Some(ActionCode::HardDrop),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(ActionCode::Hold),
        KeyCode::Tab | KeyCode::Char('v') | KeyCode::Char('V') => Some(ActionCode::Flip),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(ActionCode::Pause),
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(ActionCode::Confirm),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('n') | KeyCode::Char('N') => {
            Some(ActionCode::Back)
        }

        // Second player
        KeyCode::Char('a') | KeyCode::Char('A') => Some(ActionCode::P2MoveLeft),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(ActionCode::P2MoveRight),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(ActionCode::P2SoftDrop),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(ActionCode::P2HardDrop),
        KeyCode::Char('f') | KeyCode::Char('F') => Some(ActionCode::P2RotateCw),
        KeyCode::Char('g') | KeyCode::Char('G') => Some(ActionCode::P2RotateCcw),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(ActionCode::P2Hold),

        _ => None,
    }
}

/// Codes that behave as held keys (auto-repeat is done by the simulation)
pub fn is_hold_code(code: ActionCode) -> bool {
    matches!(
        code,
        ActionCode::MoveLeft
            | ActionCode::MoveRight
            | ActionCode::SoftDrop
            | ActionCode::P2MoveLeft
            | ActionCode::P2MoveRight
            | ActionCode::P2SoftDrop
    )
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key should start a new run.
pub fn should_restart(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
}
