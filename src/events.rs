use std::time::Duration;

use crate::carousel::padding::Slot;

/// Which way a step moves through the padded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Origin of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Previous/next buttons. Gated while a transition is running.
    Button,
    /// Indicator bullets. Always honored, even mid-transition.
    Indicator,
    /// The auto-advance timer.
    Auto,
}

impl Trigger {
    pub fn is_manual(&self) -> bool {
        !matches!(self, Trigger::Auto)
    }
}

/// Why a navigation request left the position untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No pages; the carousel accepts no navigation.
    Inert,
    /// A transition is still running.
    Busy,
    /// Indicator index past the last page.
    OutOfRange,
    /// Sitting on a clone slot; the pending reanchor resolves it.
    AtCloneSlot,
    /// Target is the current page.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved { from: usize, to: usize },
    Ignored(IgnoreReason),
}

impl NavOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, NavOutcome::Moved { .. })
    }
}

/// Navigation requests from buttons and indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRequest {
    Previous,
    Next,
    /// Zero-based real page index.
    Goto(usize),
}

/// Settings changes accepted by the carousel task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    SetAuto(bool),
    SetInterval(Duration),
    SetSpeed(Duration),
}

/// Everything the state machine reports as it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEvent {
    Moved {
        from: usize,
        to: usize,
        trigger: Trigger,
    },
    Ignored {
        trigger: Trigger,
        reason: IgnoreReason,
    },
    TransitionFinished {
        position: usize,
    },
    Reanchored {
        from: usize,
        to: usize,
    },
    CooldownStarted,
    CooldownEnded,
    Relaid {
        total_pages: usize,
        from: usize,
        to: usize,
    },
}

/// Read-only copy of the carousel state handed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSnapshot {
    pub position: usize,
    pub total_pages: usize,
    pub slides_to_show: usize,
    pub animating: bool,
    pub silent_jump: bool,
    pub cooldown: bool,
    pub auto: bool,
    pub speed: Duration,
}

impl CarouselSnapshot {
    pub fn slot(&self) -> Option<Slot> {
        Slot::at(self.position, self.total_pages)
    }

    /// Zero-based index of the real page on screen; `None` on a clone slot or when inert.
    pub fn current_real_index(&self) -> Option<usize> {
        match self.slot()? {
            Slot::Real(index) => Some(index),
            Slot::CloneOfLast | Slot::CloneOfFirst => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.animating
    }

    pub fn is_inert(&self) -> bool {
        self.total_pages == 0
    }
}
