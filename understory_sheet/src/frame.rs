// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet geometry.
//!
//! [`FrameCalculator`] is a pure mapping from a [`SheetState`] and the current
//! container size to the rectangle the sheet occupies. It is safe to call at
//! any time, including mid-gesture and right after the container resized.

use kurbo::{Rect, Size};

use crate::state::SheetState;

/// Computes resting frames for each [`SheetState`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameCalculator {
    top_inset: f64,
}

impl FrameCalculator {
    /// Creates a calculator with the given gap above the expanded sheet.
    #[must_use]
    pub const fn new(top_inset: f64) -> Self {
        Self { top_inset }
    }

    /// Gap between the container top and the expanded sheet.
    #[must_use]
    pub const fn top_inset(&self) -> f64 {
        self.top_inset
    }

    /// Height of the sheet in every resting state.
    #[must_use]
    pub fn sheet_height(&self, container: Size) -> f64 {
        container.height - self.top_inset
    }

    /// Returns the frame for `state`.
    ///
    /// - Expanded sits at `top_inset`.
    /// - Collapsed is the expanded frame pushed down by half of
    ///   `presented_height`, the height the sheet is currently presented at.
    /// - Dismissed starts at the container's bottom edge.
    ///
    /// All three share the same size.
    #[must_use]
    pub fn frame(&self, state: SheetState, container: Size, presented_height: f64) -> Rect {
        let size = Size::new(container.width, self.sheet_height(container));
        let y = match state {
            SheetState::Expanded => self.top_inset,
            SheetState::Collapsed => self.top_inset + presented_height / 2.0,
            SheetState::Dismissed => container.height,
        };
        Rect::from_origin_size((0.0, y), size)
    }

    /// Normalized displacement of `frame` from the expanded resting position.
    ///
    /// `0` is fully expanded and larger values are lower on screen. The value
    /// is negative while the sheet is stretched above its expanded top. A frame
    /// with no height yields `0`.
    #[must_use]
    pub fn position_percentage(&self, frame: Rect) -> f64 {
        let height = frame.height();
        if height <= 0.0 {
            return 0.0;
        }
        (frame.y0 - self.top_inset) / height
    }
}

impl Default for FrameCalculator {
    fn default() -> Self {
        Self::new(50.0)
    }
}
