// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet states, the per-state corner radius table, and the authoritative
//! state machine.
//!
//! The [`StateMachine`] only tracks *which* state is current and which one is
//! pending while a visual transition runs. It never interpolates; the visual
//! side of a transition belongs to [`crate::animation`].

use thiserror::Error;

/// The resting state of the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SheetState {
    /// Fully below the visible area; no panel is shown.
    #[default]
    Dismissed,
    /// Resting halfway down, offset from the expanded frame by half the
    /// presented height.
    Collapsed,
    /// Resting at the top inset.
    Expanded,
}

impl SheetState {
    /// All states, in ordinal order.
    pub const ALL: [Self; 3] = [Self::Dismissed, Self::Collapsed, Self::Expanded];

    /// Ordinal of this state, used to index per-state tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Dismissed => 0,
            Self::Collapsed => 1,
            Self::Expanded => 2,
        }
    }

    /// Returns `true` when the panel is on screen.
    #[must_use]
    pub const fn is_presented(self) -> bool {
        !matches!(self, Self::Dismissed)
    }
}

/// Top corner radius for each [`SheetState`].
///
/// Every state always has a value; [`CornerRadii::new`] fills the table with a
/// single default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerRadii {
    radii: [f64; 3],
}

impl CornerRadii {
    /// Radius used for every state when nothing else is configured.
    pub const DEFAULT_RADIUS: f64 = 16.0;

    /// Creates a table with `radius` for every state.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radii: [radius; 3] }
    }

    /// Returns the radius for `state`.
    #[must_use]
    pub const fn get(&self, state: SheetState) -> f64 {
        self.radii[state.index()]
    }

    /// Sets the radius for `state`.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, state: SheetState, radius: f64) -> bool {
        let slot = &mut self.radii[state.index()];
        if *slot == radius {
            return false;
        }
        *slot = radius;
        true
    }

    /// Returns `true` when moving between `from` and `to` changes the radius.
    #[must_use]
    pub fn differs(&self, from: SheetState, to: SheetState) -> bool {
        self.get(from) != self.get(to)
    }
}

impl Default for CornerRadii {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

/// What asked for a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionTrigger {
    /// The host began presenting the sheet.
    Presentation,
    /// A drag gesture was released over a resting position.
    DragRelease,
    /// The host's dismissal flow is running.
    Dismissal,
}

/// A rejected state-change request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The trigger cannot move the sheet from `from` to `to`.
    #[error("{trigger:?} cannot move the sheet from {from:?} to {to:?}")]
    NotAllowed {
        /// State the sheet was in.
        from: SheetState,
        /// Requested state.
        to: SheetState,
        /// What asked for the change.
        trigger: TransitionTrigger,
    },
    /// Another transition has begun and not yet been committed or rolled back.
    #[error("a transition to {pending:?} is already in flight")]
    Pending {
        /// The state the in-flight transition is heading to.
        pending: SheetState,
    },
    /// Commit or rollback was requested with nothing in flight.
    #[error("no transition is in flight")]
    NothingPending,
}

/// Owns the authoritative [`SheetState`].
///
/// A transition is a two-step affair: [`StateMachine::begin`] validates and
/// records the target as pending, then [`StateMachine::commit`] makes it
/// current once the visual change has fully landed, or
/// [`StateMachine::rollback`] drops it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateMachine {
    current: SheetState,
    pending: Option<SheetState>,
}

impl StateMachine {
    /// Creates a machine resting in [`SheetState::Dismissed`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: SheetState::Dismissed,
            pending: None,
        }
    }

    /// The committed state.
    #[must_use]
    pub const fn current(&self) -> SheetState {
        self.current
    }

    /// The state an in-flight transition is heading to, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<SheetState> {
        self.pending
    }

    /// Returns `true` if `trigger` may move the sheet from the current state
    /// to `to`.
    #[must_use]
    pub fn allows(&self, to: SheetState, trigger: TransitionTrigger) -> bool {
        use SheetState::{Collapsed, Dismissed, Expanded};
        match trigger {
            TransitionTrigger::Presentation => self.current == Dismissed && to == Expanded,
            TransitionTrigger::DragRelease => {
                matches!(self.current, Collapsed | Expanded) && matches!(to, Collapsed | Expanded)
            }
            TransitionTrigger::Dismissal => to == Dismissed && self.current != Dismissed,
        }
    }

    /// Validates a transition and records `to` as pending.
    ///
    /// A drag release may replace a pending drag release; every other
    /// combination requires that nothing is in flight.
    pub fn begin(
        &mut self,
        to: SheetState,
        trigger: TransitionTrigger,
    ) -> Result<(), TransitionError> {
        if let Some(pending) = self.pending {
            let replaceable = trigger == TransitionTrigger::DragRelease
                && pending != SheetState::Dismissed
                && self.current != SheetState::Dismissed;
            if !replaceable {
                return Err(TransitionError::Pending { pending });
            }
        }
        if !self.allows(to, trigger) {
            return Err(TransitionError::NotAllowed {
                from: self.current,
                to,
                trigger,
            });
        }
        self.pending = Some(to);
        Ok(())
    }

    /// Makes the pending state current and returns it.
    pub fn commit(&mut self) -> Result<SheetState, TransitionError> {
        let next = self.pending.take().ok_or(TransitionError::NothingPending)?;
        self.current = next;
        Ok(next)
    }

    /// Drops the pending state, returning what it was.
    pub fn rollback(&mut self) -> Result<SheetState, TransitionError> {
        self.pending.take().ok_or(TransitionError::NothingPending)
    }
}
