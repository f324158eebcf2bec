//! Named countdown timers with a uniform tick/expire contract
//!
//! Every presentation or rule timer that outlives a single frame lives in one
//! [`TimerTable`]. Pausing is a matter of not ticking the table; resetting a run
//! cancels everything at once.

use arrayvec::ArrayVec;

use crate::types::Owner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Clear animation for one owner's stack; blocks that owner's spawns
    LineClear(Owner),
    FlipJamFlash,
    MomentumBurst,
    MomentumRecovery,
    /// Pause between spending a life and respawning
    LifeLoss,
    /// Deadline for the co-op second piece to be placed
    CoopPlacement,
}

impl TimerId {
    pub const COUNT: usize = 7;

    pub const ALL: [TimerId; TimerId::COUNT] = [
        TimerId::LineClear(Owner::A),
        TimerId::LineClear(Owner::B),
        TimerId::FlipJamFlash,
        TimerId::MomentumBurst,
        TimerId::MomentumRecovery,
        TimerId::LifeLoss,
        TimerId::CoopPlacement,
    ];

    fn slot(self) -> usize {
        match self {
            TimerId::LineClear(owner) => owner.index(),
            TimerId::FlipJamFlash => 2,
            TimerId::MomentumBurst => 3,
            TimerId::MomentumRecovery => 4,
            TimerId::LifeLoss => 5,
            TimerId::CoopPlacement => 6,
        }
    }
}

/// Timers that reached zero during one tick
pub type Expired = ArrayVec<TimerId, { TimerId::COUNT }>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerTable {
    slots: [Option<u32>; TimerId::COUNT],
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a countdown
    pub fn start(&mut self, id: TimerId, ms: u32) {
        self.slots[id.slot()] = Some(ms);
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.slots[id.slot()] = None;
    }

    pub fn cancel_all(&mut self) {
        self.slots = [None; TimerId::COUNT];
    }

    pub fn remaining(&self, id: TimerId) -> Option<u32> {
        self.slots[id.slot()]
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.slots[id.slot()].is_some()
    }

    /// Count every running timer down by `delta_ms`
    ///
    /// Expired timers are removed and returned in [`TimerId::ALL`] order.
    pub fn tick(&mut self, delta_ms: u32) -> Expired {
        let mut expired = Expired::new();
        for id in TimerId::ALL {
            let slot = &mut self.slots[id.slot()];
            if let Some(left) = slot {
                let left = left.saturating_sub(delta_ms);
                if left == 0 {
                    *slot = None;
                    expired.push(id);
                } else {
                    *slot = Some(left);
                }
            }
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_distinct() {
        let mut seen = [false; TimerId::COUNT];
        for id in TimerId::ALL {
            assert!(!seen[id.slot()]);
            seen[id.slot()] = true;
        }
    }

    #[test]
    fn test_tick_counts_down_and_expires_once() {
        let mut timers = TimerTable::new();
        timers.start(TimerId::LineClear(Owner::B), 300);
        timers.start(TimerId::FlipJamFlash, 250);

        assert!(timers.tick(200).is_empty());
        assert_eq!(timers.remaining(TimerId::FlipJamFlash), Some(50));

        let expired = timers.tick(60);
        assert_eq!(expired.as_slice(), &[TimerId::FlipJamFlash]);
        assert!(!timers.is_running(TimerId::FlipJamFlash));

        let expired = timers.tick(100);
        assert_eq!(expired.as_slice(), &[TimerId::LineClear(Owner::B)]);
        assert!(timers.tick(1000).is_empty());
    }

    #[test]
    fn test_cancel_and_restart() {
        let mut timers = TimerTable::new();
        timers.start(TimerId::CoopPlacement, 10);
        timers.cancel(TimerId::CoopPlacement);
        assert!(timers.tick(20).is_empty());

        timers.start(TimerId::LifeLoss, 600);
        timers.start(TimerId::LifeLoss, 100);
        assert_eq!(timers.remaining(TimerId::LifeLoss), Some(100));

        timers.cancel_all();
        assert_eq!(timers, TimerTable::new());
    }
}
