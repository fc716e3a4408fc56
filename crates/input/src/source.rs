//! Input source: latches terminal events into one [`Intents`] per frame.
//!
//! Momentary actions (moves, rotate, hard drop, start, pause, restart) are
//! latched on press and cleared by [`InputSource::consume`]. Soft drop is a
//! held state. Terminals without key-release events never clear it on their
//! own, so a release timeout drops it once no press or repeat has arrived for
//! a while.
//!
//! Those terminals also report auto-repeat as fresh presses. With a repeat
//! guard set, a press of a non-repeating action that arrives while the same
//! action was pressed less than the guard ago is treated as a repeat, and it
//! extends the window. The guard switches itself off the first time the
//! terminal reports a release or repeat event.

use crossterm::event::{Event, KeyEvent, KeyEventKind};

use crate::map::{handle_key_event, should_quit, InputAction};
use crate::types::Intents;

// Longer than the typical initial auto-repeat delay, so a held key is not
// dropped between the first press and the first repeat.
const DEFAULT_SOFT_DROP_RELEASE_TIMEOUT_MS: u32 = 600;

/// Repeat guard for terminals that only report presses. Auto-repeat streams
/// arrive every ~30-50ms, well inside this window.
pub const PRESS_ONLY_REPEAT_GUARD_MS: u32 = 300;

#[derive(Debug, Clone)]
pub struct InputSource {
    latched: Intents,
    soft_drop_held: bool,
    since_soft_drop_ms: u32,
    release_timeout_ms: u32,
    /// 0 disables the guard.
    repeat_guard_ms: u32,
    /// Last guarded action and the time since its latest press.
    last_guarded: Option<(InputAction, u32)>,
    focus_lost: bool,
    quit: bool,
}

impl InputSource {
    pub fn new() -> Self {
        Self {
            latched: Intents::default(),
            soft_drop_held: false,
            since_soft_drop_ms: 0,
            release_timeout_ms: DEFAULT_SOFT_DROP_RELEASE_TIMEOUT_MS,
            repeat_guard_ms: 0,
            last_guarded: None,
            focus_lost: false,
            quit: false,
        }
    }

    pub fn with_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.release_timeout_ms = timeout_ms;
        self
    }

    pub fn release_timeout_ms(&self) -> u32 {
        self.release_timeout_ms
    }

    /// Treat same-action presses closer than `guard_ms` as auto-repeat.
    pub fn with_repeat_guard_ms(mut self, guard_ms: u32) -> Self {
        self.repeat_guard_ms = guard_ms;
        self
    }

    pub fn repeat_guard_ms(&self) -> u32 {
        self.repeat_guard_ms
    }

    /// Feed one terminal event.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::FocusLost => {
                self.focus_lost = true;
                // No release will arrive for a key held while focus moves away.
                self.soft_drop_held = false;
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Release && should_quit(key) {
            self.quit = true;
            return;
        }

        let Some(action) = handle_key_event(key) else {
            return;
        };

        match key.kind {
            KeyEventKind::Press => {
                if !self.is_guarded_repeat(action) {
                    self.press(action);
                }
            }
            KeyEventKind::Repeat => {
                self.repeat_guard_ms = 0;
                if action.repeats() {
                    self.press(action);
                }
            }
            KeyEventKind::Release => {
                self.repeat_guard_ms = 0;
                if action == InputAction::SoftDrop {
                    self.soft_drop_held = false;
                }
            }
        }
    }

    fn is_guarded_repeat(&mut self, action: InputAction) -> bool {
        if self.repeat_guard_ms == 0 || action.repeats() {
            return false;
        }
        let repeat = matches!(
            self.last_guarded,
            Some((last, since_ms)) if last == action && since_ms < self.repeat_guard_ms
        );
        self.last_guarded = Some((action, 0));
        repeat
    }

    fn press(&mut self, action: InputAction) {
        match action {
            InputAction::MoveLeft => self.latched.move_left = true,
            InputAction::MoveRight => self.latched.move_right = true,
            InputAction::RotateCw => self.latched.rotate_cw = true,
            InputAction::SoftDrop => {
                self.soft_drop_held = true;
                self.since_soft_drop_ms = 0;
            }
            InputAction::HardDrop => {
                self.latched.hard_drop = true;
                self.latched.start = true;
            }
            InputAction::Start => self.latched.start = true,
            InputAction::PauseToggle => self.latched.pause_toggle = true,
            InputAction::Restart => self.latched.restart = true,
        }
    }

    /// Advance the release timer by the frame's elapsed time.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if let Some((_, since_ms)) = &mut self.last_guarded {
            *since_ms = since_ms.saturating_add(elapsed_ms);
        }
        if !self.soft_drop_held {
            return;
        }
        self.since_soft_drop_ms = self.since_soft_drop_ms.saturating_add(elapsed_ms);
        if self.since_soft_drop_ms > self.release_timeout_ms {
            self.soft_drop_held = false;
        }
    }

    /// Return this frame's intents and clear every momentary flag.
    pub fn consume(&mut self) -> Intents {
        let mut intents = std::mem::take(&mut self.latched);
        intents.soft_drop_active = self.soft_drop_held;
        intents
    }

    /// Report and clear a pending focus loss.
    pub fn take_focus_lost(&mut self) -> bool {
        std::mem::take(&mut self.focus_lost)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }
}

impl Default for InputSource {
    fn default() -> Self {
        Self::new()
    }
}
