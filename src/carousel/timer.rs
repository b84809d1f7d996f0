use std::time::{Duration, Instant};

use tracing::warn;

/// Longest delay a slot accepts; longer requests are capped.
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// An owned, cancellable deadline.
///
/// Arming a slot replaces whatever it held before, so a superseded deadline
/// can never fire. Each arm gets a fresh generation number for tracing.
#[derive(Debug, Default)]
pub struct TimerSlot {
    deadline: Option<Instant>,
    generation: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the slot to fire `after` from `now`, cancelling any pending deadline.
    ///
    /// `after` is capped at [`MAX_DELAY`]. If the deadline still cannot be
    /// represented the slot is left disarmed.
    pub fn arm(&mut self, now: Instant, after: Duration) -> u64 {
        match now.checked_add(after.min(MAX_DELAY)) {
            Some(at) => self.arm_at(at),
            None => {
                warn!(?after, "deadline out of range; timer left disarmed");
                self.deadline = None;
                self.generation = self.generation.wrapping_add(1);
                self.generation
            }
        }
    }

    pub fn arm_at(&mut self, at: Instant) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.deadline = Some(at);
        self.generation
    }

    /// Returns true if a pending deadline was dropped.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and report the slot if its deadline has passed.
    ///
    /// A slot fires at most once per arm.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<u64> {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                Some(self.generation)
            }
            _ => None,
        }
    }
}
