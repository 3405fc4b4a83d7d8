// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag handling: turn a stream of pointer samples into live frames and a
//! release decision.
//!
//! ## Usage
//!
//! 1) Feed every [`DragSample`] of a gesture to [`DragController::step`] along
//!    with the previous [`DragState`] and what the sheet currently shows.
//! 2) Apply the returned [`DragEffect`]s in order.
//! 3) A [`DragEffect::Release`] carries the [`ReleaseOutcome`] that the caller
//!    turns into a state change or a dismissal.
//!
//! `step` is pure: the same state and sample always produce the same result,
//! so gestures can be replayed in tests without a live pointer.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_sheet::drag::{
//!     DragController, DragEffect, DragSample, DragState, DragSurface, ReleaseOutcome,
//! };
//! use understory_sheet::{SheetConfig, SheetState};
//!
//! let drag = DragController::new(&SheetConfig::default());
//! let mut surface = DragSurface {
//!     container: Size::new(400.0, 800.0),
//!     frame: Rect::new(0.0, 50.0, 400.0, 800.0),
//!     scrim_opacity: 1.0,
//! };
//!
//! let (state, _) = drag.step(&DragState::Idle, &DragSample::began(100.0, 0.0), &surface);
//! let (state, effects) = drag.step(&state, &DragSample::changed(600.0, 700.0, 900.0), &surface);
//! if let Some(DragEffect::SetFrame(frame)) = effects.last() {
//!     surface.frame = *frame;
//! }
//! let (state, effects) = drag.step(&state, &DragSample::ended(700.0, 900.0), &surface);
//! assert_eq!(state, DragState::Idle);
//! assert!(matches!(
//!     effects[0],
//!     DragEffect::Release { outcome: ReleaseOutcome::Dismiss, .. }
//! ));
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::config::SheetConfig;
use crate::frame::FrameCalculator;
use crate::state::SheetState;

/// Phase of a pointer-drag sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// The pointer went down and the gesture was granted to the sheet.
    Began,
    /// The pointer moved.
    Changed,
    /// The pointer was released.
    Ended,
    /// The system took the gesture away.
    Cancelled,
}

/// One pointer-event tick of a drag gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSample {
    /// Gesture phase.
    pub phase: DragPhase,
    /// Vertical translation since the previous sample.
    pub translation_delta: f64,
    /// Absolute pointer y in container coordinates.
    pub absolute_y: f64,
    /// Vertical pointer velocity; positive is downward.
    pub velocity_y: f64,
}

impl DragSample {
    /// A [`DragPhase::Began`] sample.
    #[must_use]
    pub const fn began(absolute_y: f64, velocity_y: f64) -> Self {
        Self {
            phase: DragPhase::Began,
            translation_delta: 0.0,
            absolute_y,
            velocity_y,
        }
    }

    /// A [`DragPhase::Changed`] sample moving by `translation_delta`.
    #[must_use]
    pub const fn changed(translation_delta: f64, absolute_y: f64, velocity_y: f64) -> Self {
        Self {
            phase: DragPhase::Changed,
            translation_delta,
            absolute_y,
            velocity_y,
        }
    }

    /// A [`DragPhase::Ended`] sample.
    #[must_use]
    pub const fn ended(absolute_y: f64, velocity_y: f64) -> Self {
        Self {
            phase: DragPhase::Ended,
            translation_delta: 0.0,
            absolute_y,
            velocity_y,
        }
    }

    /// A [`DragPhase::Cancelled`] sample.
    #[must_use]
    pub const fn cancelled() -> Self {
        Self {
            phase: DragPhase::Cancelled,
            translation_delta: 0.0,
            absolute_y: 0.0,
            velocity_y: 0.0,
        }
    }
}

/// What the sheet shows when a sample arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSurface {
    /// Current container size.
    pub container: Size,
    /// Frame currently presented.
    pub frame: Rect,
    /// Scrim opacity currently presented.
    pub scrim_opacity: f64,
}

/// Data held for the lifetime of a single gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Frame when the gesture began.
    pub baseline_frame: Rect,
    /// Scrim opacity when the gesture began.
    pub baseline_scrim_opacity: f64,
    /// Pointer y when the gesture began.
    pub baseline_pointer_y: f64,
    /// Live frame after the latest sample.
    pub frame: Rect,
}

/// Gesture-phase state of the [`DragController`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// No gesture is active.
    #[default]
    Idle,
    /// A gesture is active.
    Dragging(DragSession),
}

impl DragState {
    /// Returns `true` while a gesture is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}

/// Where a released drag should go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Animate to a resting state (expanded or collapsed).
    Settle(SheetState),
    /// Hand over to the host's dismissal flow.
    Dismiss,
}

/// Visual or state consequence of a drag sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEffect {
    /// Present this frame immediately.
    SetFrame(Rect),
    /// Present this scrim opacity immediately.
    SetScrimOpacity(f64),
    /// The gesture ended; resolve it as `outcome`.
    Release {
        /// Resolved destination.
        outcome: ReleaseOutcome,
        /// Position percentage the decision was made from.
        position_percentage: f64,
    },
    /// The gesture was cancelled; restore the baseline without animation.
    Revert {
        /// Frame at gesture start.
        frame: Rect,
        /// Scrim opacity at gesture start.
        scrim_opacity: f64,
    },
}

/// Effects produced by one [`DragController::step`].
pub type DragEffects = SmallVec<[DragEffect; 2]>;

/// Maps a release position to an outcome.
///
/// Thresholds are checked in order and the first match wins:
/// below `expand` settles expanded, below `collapse` settles collapsed, the
/// rest dismisses.
#[must_use]
pub fn resolve_release(position_percentage: f64, expand: f64, collapse: f64) -> ReleaseOutcome {
    if position_percentage < expand {
        ReleaseOutcome::Settle(SheetState::Expanded)
    } else if position_percentage < collapse {
        ReleaseOutcome::Settle(SheetState::Collapsed)
    } else {
        ReleaseOutcome::Dismiss
    }
}

/// Square-root response to an upward pull past the expanded top.
#[must_use]
pub fn elastic_displacement(translation: f64) -> f64 {
    let root = translation.abs().sqrt();
    if translation < 0.0 { -root } else { root }
}

/// Pure transition function over drag phases.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragController {
    frames: FrameCalculator,
    expand_threshold: f64,
    collapse_threshold: f64,
}

impl DragController {
    /// Creates a controller from the geometry and thresholds in `config`.
    #[must_use]
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            frames: FrameCalculator::new(config.top_inset),
            expand_threshold: config.expand_threshold,
            collapse_threshold: config.collapse_threshold,
        }
    }

    /// Resolves a release at `position_percentage` with this controller's
    /// thresholds.
    #[must_use]
    pub fn resolve(&self, position_percentage: f64) -> ReleaseOutcome {
        resolve_release(
            position_percentage,
            self.expand_threshold,
            self.collapse_threshold,
        )
    }

    /// Advances the gesture by one sample.
    ///
    /// Samples other than [`DragPhase::Began`] are ignored while
    /// [`DragState::Idle`]. A second `Began` restarts the gesture from
    /// `surface`.
    #[must_use]
    pub fn step(
        &self,
        state: &DragState,
        sample: &DragSample,
        surface: &DragSurface,
    ) -> (DragState, DragEffects) {
        let mut effects = DragEffects::new();
        let session = match (sample.phase, state) {
            (DragPhase::Began, _) => {
                let session = DragSession {
                    baseline_frame: surface.frame,
                    baseline_scrim_opacity: surface.scrim_opacity,
                    baseline_pointer_y: sample.absolute_y,
                    frame: surface.frame,
                };
                return (DragState::Dragging(session), effects);
            }
            (_, DragState::Idle) => return (DragState::Idle, effects),
            (_, DragState::Dragging(session)) => *session,
        };

        if sample.phase == DragPhase::Cancelled {
            log::debug!("sheet drag cancelled");
            effects.push(DragEffect::Revert {
                frame: session.baseline_frame,
                scrim_opacity: session.baseline_scrim_opacity,
            });
            return (DragState::Idle, effects);
        }

        let percentage = self.frames.position_percentage(session.frame);
        if sample.phase == DragPhase::Ended {
            let outcome = self.resolve(percentage);
            log::debug!("sheet drag released at {percentage}: {outcome:?}");
            effects.push(DragEffect::Release {
                outcome,
                position_percentage: percentage,
            });
            return (DragState::Idle, effects);
        }

        let opacity = 1.0 - percentage.clamp(0.0, 1.0);
        effects.push(DragEffect::SetScrimOpacity(opacity));
        let frame = self.follow(session.frame, sample.translation_delta, surface.container);
        effects.push(DragEffect::SetFrame(frame));
        log::trace!(
            "sheet drag by {} to {frame:?} at {percentage}",
            sample.translation_delta
        );
        let session = DragSession { frame, ..session };
        (DragState::Dragging(session), effects)
    }

    /// Moves `frame` by `translation`, stretching instead of moving when the
    /// sheet is pulled up while its bottom edge is inside the container.
    fn follow(&self, frame: Rect, translation: f64, container: Size) -> Rect {
        if translation <= 0.0 && frame.y1 + translation <= container.height {
            // Grow upward with the bottom edge anchored.
            let stretch = elastic_displacement(translation);
            Rect::new(0.0, frame.y0 + stretch, container.width, frame.y1)
        } else {
            frame + Vec2::new(0.0, translation)
        }
    }
}
