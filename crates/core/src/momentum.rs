//! Momentum meter
//!
//! The meter is kept in milli-points (0..=100 000) so per-frame decay stays exact.
//! Burst and recovery windows are countdowns in the shared [`TimerTable`].

use crate::timers::{TimerId, TimerTable};

pub const MOMENTUM_MAX: u32 = 100_000;

/// Gain per clear size, in milli-points
pub const CLEAR_GAIN: [u32; 5] = [0, 8_000, 18_000, 30_000, 45_000];

pub const HARD_DROP_GAIN: u32 = 1_000;

/// Milli-points lost per millisecond outside burst/recovery (5 points per second)
pub const DECAY_PER_MS: u32 = 5;

pub const BURST_MS: u32 = 8_000;
pub const RECOVERY_MS: u32 = 6_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Momentum {
    value: u32,
}

impl Momentum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Meter in milli-points
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Meter as a whole percentage
    pub fn percent(&self) -> u32 {
        self.value / 1_000
    }

    pub fn in_burst(timers: &TimerTable) -> bool {
        timers.is_running(TimerId::MomentumBurst)
    }

    pub fn in_recovery(timers: &TimerTable) -> bool {
        timers.is_running(TimerId::MomentumRecovery)
    }

    /// Add charge for a clear; returns true when this gain starts a burst
    pub fn gain_clear(&mut self, lines: usize, timers: &mut TimerTable) -> bool {
        let gain = CLEAR_GAIN.get(lines).copied().unwrap_or(0);
        self.gain(gain, timers)
    }

    pub fn gain_hard_drop(&mut self, timers: &mut TimerTable) -> bool {
        self.gain(HARD_DROP_GAIN, timers)
    }

    fn gain(&mut self, amount: u32, timers: &mut TimerTable) -> bool {
        if Self::in_burst(timers) {
            return false;
        }
        let amount = if Self::in_recovery(timers) {
            amount / 2
        } else {
            amount
        };
        self.value = (self.value + amount).min(MOMENTUM_MAX);
        if self.value == MOMENTUM_MAX {
            timers.cancel(TimerId::MomentumRecovery);
            timers.start(TimerId::MomentumBurst, BURST_MS);
            return true;
        }
        false
    }

    /// Continuous decay; frozen during burst and recovery
    pub fn decay(&mut self, delta_ms: u32, timers: &TimerTable) {
        if Self::in_burst(timers) || Self::in_recovery(timers) {
            return;
        }
        self.value = self.value.saturating_sub(delta_ms.saturating_mul(DECAY_PER_MS));
    }

    /// Called when the burst timer expires: empty the meter and open recovery
    pub fn end_burst(&mut self, timers: &mut TimerTable) {
        self.value = 0;
        timers.start(TimerId::MomentumRecovery, RECOVERY_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_by_clear_size() {
        let mut timers = TimerTable::new();
        let mut m = Momentum::new();
        assert!(!m.gain_clear(2, &mut timers));
        assert_eq!(m.percent(), 18);
        m.gain_hard_drop(&mut timers);
        assert_eq!(m.percent(), 19);
    }

    #[test]
    fn test_saturation_starts_burst_then_recovery_halves_gain() {
        let mut timers = TimerTable::new();
        let mut m = Momentum::new();
        m.gain_clear(4, &mut timers);
        assert!(!m.gain_clear(4, &mut timers));
        assert!(m.gain_clear(2, &mut timers));
        assert_eq!(m.value(), MOMENTUM_MAX);
        assert!(Momentum::in_burst(&timers));

        // Gains during burst are ignored and the meter does not decay.
        assert!(!m.gain_clear(4, &mut timers));
        m.decay(1_000, &timers);
        assert_eq!(m.value(), MOMENTUM_MAX);

        timers.tick(BURST_MS);
        m.end_burst(&mut timers);
        assert_eq!(m.value(), 0);
        assert!(Momentum::in_recovery(&timers));

        m.gain_clear(2, &mut timers);
        assert_eq!(m.value(), 9_000);
    }

    #[test]
    fn test_decay_outside_windows() {
        let timers = TimerTable::new();
        let mut m = Momentum::new();
        m.value = 10_000;
        m.decay(1_000, &timers);
        assert_eq!(m.value(), 5_000);
        m.decay(10_000, &timers);
        assert_eq!(m.value(), 0);
    }
}
