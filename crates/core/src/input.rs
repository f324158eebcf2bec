//! Input boundary
//!
//! Devices speak [`ActionCode`]s through [`InputSource`]: a level-triggered
//! `is_down` query and an edge-triggered `consume_press` that removes the press it
//! reports. Once per frame [`FrameInput::sample`] drains every code exactly once,
//! producing the immutable input value the simulation step consumes.

use serde::{Deserialize, Serialize};

use crate::types::ActionCode;

const CODES: usize = ActionCode::COUNT;

/// A device (or recording) that reports logical actions
pub trait InputSource {
    /// Whether the action is currently held
    fn is_down(&self, code: ActionCode) -> bool;

    /// Take one pending press of `code`; each press is reported once
    fn consume_press(&mut self, code: ActionCode) -> bool;
}

/// Input for one simulation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pressed: [bool; CODES],
    held: [bool; CODES],
}

impl FrameInput {
    /// No presses, nothing held
    pub fn idle() -> Self {
        Self::default()
    }

    /// Drain one press per code and snapshot the held set
    pub fn sample<S: InputSource + ?Sized>(source: &mut S) -> Self {
        let mut frame = Self::default();
        for code in ActionCode::ALL {
            frame.pressed[code.index()] = source.consume_press(code);
            frame.held[code.index()] = source.is_down(code);
        }
        frame
    }

    pub fn pressed(&self, code: ActionCode) -> bool {
        self.pressed[code.index()]
    }

    pub fn held(&self, code: ActionCode) -> bool {
        self.held[code.index()]
    }

    pub fn with_press(mut self, code: ActionCode) -> Self {
        self.pressed[code.index()] = true;
        self
    }

    pub fn with_held(mut self, code: ActionCode) -> Self {
        self.held[code.index()] = true;
        self
    }

    pub fn is_idle(&self) -> bool {
        !self.pressed.iter().chain(self.held.iter()).any(|&b| b)
    }

    /// Codes pressed this frame, in [`ActionCode::ALL`] order
    pub fn presses(&self) -> impl Iterator<Item = ActionCode> + '_ {
        ActionCode::ALL
            .into_iter()
            .filter(move |code| self.pressed[code.index()])
    }

    /// Codes held this frame, in [`ActionCode::ALL`] order
    pub fn held_codes(&self) -> impl Iterator<Item = ActionCode> + '_ {
        ActionCode::ALL
            .into_iter()
            .filter(move |code| self.held[code.index()])
    }
}

/// In-memory input source: a press queue plus a held set
///
/// Used by scripted replays and tests, and as the backing store of device adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pending: [u8; CODES],
    down: [bool; CODES],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one press
    pub fn press(&mut self, code: ActionCode) {
        let slot = &mut self.pending[code.index()];
        *slot = slot.saturating_add(1);
    }

    pub fn set_down(&mut self, code: ActionCode, down: bool) {
        self.down[code.index()] = down;
    }

    pub fn pending_presses(&self, code: ActionCode) -> u8 {
        self.pending[code.index()]
    }

    /// Drop queued presses and release everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for InputState {
    fn is_down(&self, code: ActionCode) -> bool {
        self.down[code.index()]
    }

    fn consume_press(&mut self, code: ActionCode) -> bool {
        let slot = &mut self.pending[code.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}
