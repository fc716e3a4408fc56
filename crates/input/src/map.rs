//! Key mapping from terminal events to game input actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One logical key binding, before it is folded into per-frame intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    RotateCw,
    /// Held; stays active until the key is released.
    SoftDrop,
    /// Space: hard drop while running, start while ready.
    HardDrop,
    Start,
    PauseToggle,
    Restart,
}

impl InputAction {
    /// Whether a key-repeat event should fire the action again.
    pub fn repeats(self) -> bool {
        matches!(
            self,
            InputAction::MoveLeft | InputAction::MoveRight | InputAction::SoftDrop
        )
    }
}

/// Map a key code to its action.
pub fn action_for_key(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(InputAction::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(InputAction::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(InputAction::SoftDrop),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(InputAction::RotateCw),

        KeyCode::Char(' ') => Some(InputAction::HardDrop),
        KeyCode::Enter => Some(InputAction::Start),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::PauseToggle),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Restart),

        _ => None,
    }
}

/// Map a full key event, ignoring anything chorded with Ctrl or Alt.
pub fn handle_key_event(key: KeyEvent) -> Option<InputAction> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    action_for_key(key.code)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
