//! Search animation state machine
//!
//! The animation does not own a timer. A host calls [`SearchAnimation::tick`]
//! on its own schedule; each call advances one step along the recorded path.
//! Cancelling bumps the generation so ticks scheduled for an older animation
//! are rejected as stale.

use serde::Serialize;
use tracing::debug;

use crate::domain::Key;

/// Handle identifying one animation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnimationTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Running {
        target: Key,
        path: Vec<Key>,
        step: usize,
        found: bool,
    },
    Complete {
        target: Key,
        found: bool,
    },
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Moved on to this key of the path
    Highlight(Key),
    /// Path exhausted; final highlight is the target if it was found
    Finished(Option<Key>),
    /// No animation is running
    Idle,
    /// Ticket belongs to a cancelled or replaced animation
    Stale,
}

#[derive(Debug, Default)]
pub struct SearchAnimation {
    state: AnimationState,
    generation: u64,
}

impl SearchAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AnimationState::Running { .. })
    }

    /// Ticket of the running animation, if any.
    pub fn ticket(&self) -> Option<AnimationTicket> {
        self.is_running().then_some(AnimationTicket(self.generation))
    }

    /// Replace whatever is running with a new animation over `path`.
    ///
    /// Returns the new ticket and the key to highlight immediately.
    pub fn start(&mut self, target: Key, path: Vec<Key>, found: bool) -> (AnimationTicket, Option<Key>) {
        self.generation += 1;
        let first = path.first().copied();
        self.state = match first {
            Some(_) => AnimationState::Running {
                target,
                path,
                step: 0,
                found,
            },
            None => AnimationState::Complete { target, found },
        };
        debug!("animation started: generation={} target={}", self.generation, target);
        (AnimationTicket(self.generation), first)
    }

    pub fn cancel(&mut self) {
        if self.is_running() {
            debug!("animation cancelled: generation={}", self.generation);
        }
        self.generation += 1;
        self.state = AnimationState::Idle;
    }

    pub fn tick(&mut self, ticket: AnimationTicket) -> TickOutcome {
        if ticket.0 != self.generation {
            return TickOutcome::Stale;
        }
        let AnimationState::Running {
            target,
            path,
            step,
            found,
        } = &mut self.state
        else {
            return TickOutcome::Idle;
        };

        *step += 1;
        if let Some(&key) = path.get(*step) {
            return TickOutcome::Highlight(key);
        }
        let (target, found) = (*target, *found);
        self.state = AnimationState::Complete { target, found };
        TickOutcome::Finished(found.then_some(target))
    }
}
