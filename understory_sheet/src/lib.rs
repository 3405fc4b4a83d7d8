// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sheet --heading-base-level=0

//! Understory Sheet: a headless, draggable bottom sheet.
//!
//! A sheet is a panel presented over a host container. It rests in one of
//! three states:
//!
//! - [`SheetState::Dismissed`]: off screen, below the container.
//! - [`SheetState::Collapsed`]: the expanded frame pushed down by half of the
//!   sheet's height.
//! - [`SheetState::Expanded`]: its top edge at the configured top inset.
//!
//! The user drags it vertically. On release it settles with a spring into
//! whichever state the release position selects, or asks the host to dismiss
//! it. This crate owns the bookkeeping; it draws nothing and runs no clock.
//!
//! The pieces, in the order a gesture flows through them:
//!
//! - [`GestureArbiter`](arbiter::GestureArbiter): decides, when a pointer goes
//!   down, whether the sheet or an embedded [`TrackingScroll`] gets the drag.
//! - [`DragController`](drag::DragController): turns drag samples into frame
//!   and scrim updates, with elastic stretch when pulled past the top, and
//!   resolves the release.
//! - [`StateMachine`](state::StateMachine): validates transitions and tracks
//!   the pending target while an animation runs.
//! - [`TransitionAnimator`](animation::TransitionAnimator): builds
//!   [`AnimationRequest`]s for presentation, dismissal and settling.
//! - [`FrameCalculator`](frame::FrameCalculator): the geometry of each state.
//!
//! [`SheetController`] wires them together behind the [`SheetHost`] and
//! [`SheetObserver`] seams.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_sheet::{
//!     AnimationCompletion, AnimationId, AnimationRequest, SheetConfig, SheetController,
//!     SheetHost, SheetState, SheetStyle, SheetVisuals,
//! };
//! use understory_sheet::drag::DragSample;
//!
//! #[derive(Default)]
//! struct Host {
//!     running: Option<AnimationRequest>,
//!     dismiss_requested: bool,
//! }
//!
//! impl SheetHost for Host {
//!     fn animate(&mut self, request: &AnimationRequest) {
//!         self.running = Some(*request);
//!     }
//!     fn cancel_animation(&mut self, _id: AnimationId) -> Option<SheetVisuals> {
//!         self.running.take().map(|request| request.from)
//!     }
//!     fn request_dismissal(&mut self, _animated: bool) {
//!         self.dismiss_requested = true;
//!     }
//! }
//!
//! let mut host = Host::default();
//! let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::new("Places"));
//! sheet.set_container_size(Size::new(400.0, 800.0), &mut host);
//!
//! // Slide in.
//! sheet.present(true, &mut host);
//! let id = host.running.take().unwrap().id;
//! sheet.finish_animation(id, AnimationCompletion::Finished, &mut host);
//! assert_eq!(sheet.state(), SheetState::Expanded);
//! assert_eq!(sheet.frame(), Rect::new(0.0, 50.0, 400.0, 800.0));
//!
//! // Drag down by 210 (28% of the sheet) and let go: the sheet collapses.
//! assert!(sheet.should_begin_drag(300.0));
//! sheet.handle_drag(&DragSample::began(100.0, 300.0), &mut host);
//! sheet.handle_drag(&DragSample::changed(210.0, 310.0, 300.0), &mut host);
//! sheet.handle_drag(&DragSample::ended(310.0, 0.0), &mut host);
//! let settle = host.running.take().unwrap();
//! sheet.finish_animation(settle.id, AnimationCompletion::Finished, &mut host);
//! assert_eq!(sheet.state(), SheetState::Collapsed);
//! assert_eq!(sheet.frame().y0, 50.0 + 375.0);
//! ```
//!
//! The host renders [`SheetController::visuals`] whenever
//! [`SheetController::revision`] moves, and samples
//! [`AnimationRequest::sample`] on its own clock while an animation runs.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod animation;
pub mod arbiter;
pub mod config;
pub mod controller;
pub mod drag;
pub mod frame;
pub mod host;
pub mod state;
pub mod style;

pub use animation::{
    AnimationCompletion, AnimationId, AnimationRequest, Curve, Easing, SheetVisuals, SpringCurve,
    Timing, TransitionKind,
};
pub use arbiter::TrackingScroll;
pub use config::SheetConfig;
pub use controller::SheetController;
pub use drag::{DragPhase, DragSample};
pub use host::{SheetHost, SheetObserver};
pub use state::{CornerRadii, SheetState, TransitionError, TransitionTrigger};
pub use style::SheetStyle;
