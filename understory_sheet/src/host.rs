// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Seams to the host platform.
//!
//! The sheet runs entirely on the host's UI thread. It asks the host for three
//! things: run an animation, abandon one, and enter the host's own dismissal
//! flow. Everything else it reports by bumping
//! [`crate::SheetController::revision`] and calling
//! [`SheetHost::set_needs_layout`].

use crate::animation::{AnimationId, AnimationRequest, SheetVisuals};
use crate::state::SheetState;

/// Platform services a [`crate::SheetController`] drives.
pub trait SheetHost {
    /// Schedules `request`.
    ///
    /// The host must eventually call
    /// [`crate::SheetController::finish_animation`] with `request.id`, unless
    /// the controller cancels it first.
    fn animate(&mut self, request: &AnimationRequest);

    /// Abandons the animation `id`, returning the visuals rendered at that
    /// instant if the host knows them.
    ///
    /// A cancelled animation is not reported through `finish_animation`.
    fn cancel_animation(&mut self, id: AnimationId) -> Option<SheetVisuals>;

    /// Enters the host's dismissal flow.
    ///
    /// The host answers by calling [`crate::SheetController::dismiss`] once it
    /// is ready to tear the presentation down.
    fn request_dismissal(&mut self, animated: bool);

    /// Visuals changed outside of an animation; re-read
    /// [`crate::SheetController::visuals`] before the next frame.
    fn set_needs_layout(&mut self) {}
}

/// Receives state-change notifications.
///
/// `will_change_state` fires before any visual change toward `state` begins;
/// `did_change_state` fires only after the change has fully landed. Methods take
/// `&self` because the controller holds observers through a `Weak` reference.
pub trait SheetObserver {
    /// The sheet is about to move toward `state`.
    fn will_change_state(&self, state: SheetState);

    /// The sheet now rests in `state`.
    fn did_change_state(&self, state: SheetState);
}
