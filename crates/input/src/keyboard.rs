//! Keyboard input source for terminal environments.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::core::{InputSource, InputState};
use crate::map::{is_hold_code, map_key_code};
use crate::types::ActionCode;

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers DAS/ARR repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Collects key events between frames and exposes them as an [`InputSource`].
#[derive(Debug, Clone)]
pub struct KeyboardInput {
    state: InputState,
    last_seen: [Option<Instant>; ActionCode::COUNT],
    key_release_timeout_ms: u32,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self {
            state: InputState::new(),
            last_seen: [None; ActionCode::COUNT],
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    /// Record a key press; returns the mapped code, if any
    ///
    /// A press of an already held movement key only refreshes it, so terminal
    /// auto-repeat never bypasses DAS.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<ActionCode> {
        self.press_at(code, Instant::now())
    }

    fn press_at(&mut self, code: KeyCode, now: Instant) -> Option<ActionCode> {
        let action = map_key_code(code)?;
        if !is_hold_code(action) {
            self.state.press(action);
            return Some(action);
        }

        let was_down = self.state.is_down(action);
        self.last_seen[action.index()] = Some(now);
        self.state.set_down(action, true);
        if !was_down {
            self.state.press(action);
        }
        Some(action)
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(action) = map_key_code(code) {
            self.release(action);
        }
    }

    fn release(&mut self, action: ActionCode) {
        self.state.set_down(action, false);
        self.last_seen[action.index()] = None;
    }

    /// Auto-release held keys whose last event is older than the timeout
    pub fn release_stale(&mut self) {
        self.release_stale_at(Instant::now());
    }

    pub fn release_stale_at(&mut self, now: Instant) {
        let timeout = Duration::from_millis(self.key_release_timeout_ms as u64);
        for code in ActionCode::ALL {
            let Some(seen) = self.last_seen[code.index()] else {
                continue;
            };
            if now.saturating_duration_since(seen) > timeout {
                self.release(code);
            }
        }
    }

    /// Drop pending presses and release every key (e.g. on restart)
    pub fn reset(&mut self) {
        self.state.clear();
        self.last_seen = [None; ActionCode::COUNT];
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for KeyboardInput {
    fn is_down(&self, code: ActionCode) -> bool {
        self.state.is_down(code)
    }

    fn consume_press(&mut self, code: ActionCode) -> bool {
        self.state.consume_press(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FrameInput;

    #[test]
    fn test_press_is_reported_once_and_held() {
        let mut kb = KeyboardInput::new();
        assert_eq!(kb.handle_key_press(KeyCode::Left), Some(ActionCode::MoveLeft));

        let frame = FrameInput::sample(&mut kb);
        assert!(frame.pressed(ActionCode::MoveLeft));
        assert!(frame.held(ActionCode::MoveLeft));

        let frame = FrameInput::sample(&mut kb);
        assert!(!frame.pressed(ActionCode::MoveLeft));
        assert!(frame.held(ActionCode::MoveLeft));
    }

    #[test]
    fn test_repeated_press_of_held_key_does_not_queue() {
        let mut kb = KeyboardInput::new();
        kb.handle_key_press(KeyCode::Left);
        kb.handle_key_press(KeyCode::Left);
        kb.handle_key_press(KeyCode::Left);
        assert!(kb.consume_press(ActionCode::MoveLeft));
        assert!(!kb.consume_press(ActionCode::MoveLeft));
    }

    #[test]
    fn test_taps_of_action_keys_all_count() {
        let mut kb = KeyboardInput::new();
        kb.handle_key_press(KeyCode::Char(' '));
        kb.handle_key_press(KeyCode::Char(' '));
        assert!(kb.consume_press(ActionCode::HardDrop));
        assert!(kb.consume_press(ActionCode::HardDrop));
        assert!(!kb.is_down(ActionCode::HardDrop));
    }

    #[test]
    fn test_auto_release_triggers_after_timeout_without_key_release_events() {
        let mut kb = KeyboardInput::new().with_key_release_timeout_ms(50);
        let start = Instant::now();
        kb.press_at(KeyCode::Down, start);
        assert!(kb.is_down(ActionCode::SoftDrop));

        kb.release_stale_at(start + Duration::from_millis(50));
        assert!(kb.is_down(ActionCode::SoftDrop));

        kb.release_stale_at(start + Duration::from_millis(51));
        assert!(!kb.is_down(ActionCode::SoftDrop));
    }

    #[test]
    fn test_non_movement_key_does_not_extend_auto_release_timeout() {
        let mut kb = KeyboardInput::new().with_key_release_timeout_ms(50);
        let start = Instant::now();
        kb.press_at(KeyCode::Left, start);
        kb.press_at(KeyCode::Up, start + Duration::from_millis(40));

        kb.release_stale_at(start + Duration::from_millis(60));
        assert!(!kb.is_down(ActionCode::MoveLeft));
    }

    #[test]
    fn test_release_event_and_reset() {
        let mut kb = KeyboardInput::new();
        kb.handle_key_press(KeyCode::Right);
        kb.handle_key_release(KeyCode::Right);
        assert!(!kb.is_down(ActionCode::MoveRight));

        kb.handle_key_press(KeyCode::Char('v'));
        kb.reset();
        assert!(!kb.consume_press(ActionCode::Flip));
    }

    #[test]
    fn test_default_key_release_timeout_is_non_zero() {
        assert!(KeyboardInput::new().key_release_timeout_ms() > 0);
    }
}
