// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture ownership between the sheet's drag and an embedded scroll view.
//!
//! The decision is made once, when a pointer goes down, before any drag sample
//! is accepted. When the sheet wins against a registered scroll view, the
//! scroll view's own drag recognition is reset so it drops whatever it was
//! already tracking; this is a cooperative hand-off, not a lock.
//!
//! ```
//! use core::cell::Cell;
//! use understory_sheet::arbiter::{GestureArbiter, TrackingScroll};
//! use understory_sheet::SheetState;
//!
//! struct List {
//!     offset: f64,
//!     resets: Cell<u32>,
//! }
//!
//! impl TrackingScroll for List {
//!     fn vertical_offset(&self) -> f64 { self.offset }
//!     fn top_content_inset(&self) -> f64 { 0.0 }
//!     fn set_drag_enabled(&self, enabled: bool) {
//!         if !enabled {
//!             self.resets.set(self.resets.get() + 1);
//!         }
//!     }
//! }
//!
//! let list = List { offset: 0.0, resets: Cell::new(0) };
//!
//! // Scrolled to the top and pulling down: the sheet takes over.
//! assert!(GestureArbiter::should_sheet_gesture_begin(SheetState::Expanded, Some(&list), 120.0));
//! assert_eq!(list.resets.get(), 1);
//!
//! // Pushing up keeps the gesture in the list.
//! assert!(!GestureArbiter::should_sheet_gesture_begin(SheetState::Expanded, Some(&list), -120.0));
//! ```

use crate::state::SheetState;

/// Read access to an externally owned scrollable region.
///
/// The sheet never owns or mutates the region's content. Methods take `&self`
/// because the region is shared with the host; implementations use interior
/// mutability for [`TrackingScroll::set_drag_enabled`].
pub trait TrackingScroll {
    /// Current vertical content offset.
    fn vertical_offset(&self) -> f64;

    /// Top content inset. The content counts as scrolled to its top while
    /// `vertical_offset() <= top_content_inset()`.
    fn top_content_inset(&self) -> f64;

    /// Enables or disables the region's own drag recognition.
    fn set_drag_enabled(&self, enabled: bool);

    /// Returns `true` when the content is scrolled to its top.
    fn is_at_top(&self) -> bool {
        self.vertical_offset() <= self.top_content_inset()
    }
}

/// Begin-time arbitration for the sheet's drag gesture.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureArbiter;

impl GestureArbiter {
    /// Decides whether the sheet's drag should receive a new gesture.
    ///
    /// `velocity_y` is the pointer's vertical velocity at gesture start; positive
    /// values point down, toward dismissal.
    ///
    /// - No tracking view: the sheet owns every drag.
    /// - Expanded: the sheet wins only when the tracking view sits at its top
    ///   and the pointer moves down.
    /// - Collapsed: the sheet always wins.
    /// - Dismissed: no panel, no gesture.
    ///
    /// Whenever the sheet wins against a tracking view, that view's drag is
    /// reset with [`GestureArbiter::reset_tracking_drag`].
    pub fn should_sheet_gesture_begin(
        state: SheetState,
        tracking: Option<&dyn TrackingScroll>,
        velocity_y: f64,
    ) -> bool {
        let Some(tracking) = tracking else {
            return state.is_presented();
        };
        let begins = match state {
            SheetState::Dismissed => false,
            SheetState::Collapsed => true,
            SheetState::Expanded => tracking.is_at_top() && velocity_y > 0.0,
        };
        if begins {
            Self::reset_tracking_drag(tracking);
        }
        log::trace!("sheet gesture arbitration in {state:?} with velocity {velocity_y}: {begins}");
        begins
    }

    /// Cancels whatever the tracking view's drag recognizer is tracking by
    /// toggling it off and back on.
    pub fn reset_tracking_drag(tracking: &dyn TrackingScroll) {
        tracking.set_drag_enabled(false);
        tracking.set_drag_enabled(true);
    }

    /// Whether the sheet's drag may run alongside the tracking view's drag.
    ///
    /// Both recognizers receive the pointer so the begin-time decision can hand
    /// the gesture over; any other recognizer is exclusive.
    #[must_use]
    pub fn recognizes_simultaneously(is_tracking_scroll_drag: bool) -> bool {
        is_tracking_scroll_drag
    }
}
