//! DAS/ARR horizontal auto-repeat
//!
//! A fresh press shifts once immediately. Holding the direction accumulates the DAS
//! delay, after which one shift is emitted every ARR interval. Releasing (or a
//! press in the other direction) restarts the cycle.

use arrayvec::ArrayVec;

use crate::types::BOARD_COLS;

/// Direction for horizontal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    Left,
    Right,
    None,
}

impl HorizontalDirection {
    pub fn dx(self) -> i8 {
        match self {
            HorizontalDirection::Left => -1,
            HorizontalDirection::Right => 1,
            HorizontalDirection::None => 0,
        }
    }
}

/// One frame of horizontal input for a seat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HorizontalInput {
    pub press_left: bool,
    pub press_right: bool,
    pub held_left: bool,
    pub held_right: bool,
}

/// Column shifts to attempt this frame, in order
pub type Shifts = ArrayVec<i8, 32>;

/// Per-seat DAS/ARR accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Das {
    horizontal: HorizontalDirection,
    das_timer: u32,
    arr_accumulator: u32,
}

impl Das {
    pub fn new() -> Self {
        Self {
            horizontal: HorizontalDirection::None,
            das_timer: 0,
            arr_accumulator: 0,
        }
    }

    pub fn direction(&self) -> HorizontalDirection {
        self.horizontal
    }

    fn start(&mut self, direction: HorizontalDirection) {
        self.horizontal = direction;
        self.das_timer = 0;
        self.arr_accumulator = 0;
    }

    pub fn reset(&mut self) {
        self.start(HorizontalDirection::None);
    }

    pub fn update(&mut self, input: HorizontalInput, elapsed_ms: u32, das_ms: u32, arr_ms: u32) -> Shifts {
        let mut shifts = Shifts::new();

        let pressed = if input.press_right {
            HorizontalDirection::Right
        } else if input.press_left {
            HorizontalDirection::Left
        } else {
            HorizontalDirection::None
        };

        if pressed != HorizontalDirection::None {
            self.start(pressed);
            shifts.push(pressed.dx());
            return shifts;
        }

        let still_held = match self.horizontal {
            HorizontalDirection::Left => input.held_left,
            HorizontalDirection::Right => input.held_right,
            HorizontalDirection::None => false,
        };
        if !still_held {
            self.reset();
            return shifts;
        }

        let prev_das = self.das_timer;
        self.das_timer = self.das_timer.saturating_add(elapsed_ms);
        if self.das_timer < das_ms {
            return shifts;
        }

        let excess = if prev_das < das_ms {
            self.das_timer - das_ms
        } else {
            elapsed_ms
        };
        let dx = self.horizontal.dx();

        if arr_ms == 0 {
            // Instant repeat: slide to the wall.
            for _ in 0..BOARD_COLS {
                shifts.push(dx);
            }
            return shifts;
        }

        self.arr_accumulator += excess;
        while self.arr_accumulator >= arr_ms {
            let _ = shifts.try_push(dx);
            self.arr_accumulator -= arr_ms;
        }
        shifts
    }
}

impl Default for Das {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held_left() -> HorizontalInput {
        HorizontalInput {
            held_left: true,
            ..HorizontalInput::default()
        }
    }

    #[test]
    fn test_horizontal_das_arr_repeats_after_delay() {
        let mut das = Das::new();
        let press = HorizontalInput {
            press_left: true,
            held_left: true,
            ..HorizontalInput::default()
        };

        assert_eq!(das.update(press, 16, 100, 25).as_slice(), &[-1]);

        // Before DAS expires: no repeats.
        assert!(das.update(held_left(), 99, 100, 25).is_empty());

        // Exactly at DAS: still no repeats.
        assert!(das.update(held_left(), 1, 100, 25).is_empty());

        assert_eq!(das.update(held_left(), 25, 100, 25).as_slice(), &[-1]);
        assert_eq!(das.update(held_left(), 50, 100, 25).as_slice(), &[-1, -1]);
    }

    #[test]
    fn test_release_stops_repeats() {
        let mut das = Das::new();
        let press = HorizontalInput {
            press_right: true,
            held_right: true,
            ..HorizontalInput::default()
        };
        das.update(press, 0, 100, 25);
        assert!(das.update(HorizontalInput::default(), 500, 100, 25).is_empty());
        assert_eq!(das.direction(), HorizontalDirection::None);
    }

    #[test]
    fn test_opposite_press_restarts_cycle() {
        let mut das = Das::new();
        das.update(
            HorizontalInput {
                press_left: true,
                held_left: true,
                ..HorizontalInput::default()
            },
            0,
            100,
            25,
        );
        das.update(held_left(), 150, 100, 25);
        let shifts = das.update(
            HorizontalInput {
                press_right: true,
                held_right: true,
                held_left: true,
                ..HorizontalInput::default()
            },
            16,
            100,
            25,
        );
        assert_eq!(shifts.as_slice(), &[1]);
        assert_eq!(das.direction(), HorizontalDirection::Right);
    }

    #[test]
    fn test_zero_arr_slides_to_wall() {
        let mut das = Das::new();
        das.update(
            HorizontalInput {
                press_left: true,
                held_left: true,
                ..HorizontalInput::default()
            },
            0,
            100,
            0,
        );
        assert_eq!(das.update(held_left(), 120, 100, 0).len(), BOARD_COLS as usize);
    }
}
