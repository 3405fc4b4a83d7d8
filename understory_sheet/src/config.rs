// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable constants for geometry, drag resolution and transitions.

use core::time::Duration;

/// Geometry, threshold and timing constants used by a [`crate::SheetController`].
///
/// [`SheetConfig::default`] carries the reference values. Use the `with_*`
/// methods to override individual constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetConfig {
    /// Gap between the top of the container and the expanded sheet.
    pub top_inset: f64,
    /// Duration of presentation and dismissal.
    pub presentation_duration: Duration,
    /// Duration of a settle after a drag is released.
    pub settle_duration: Duration,
    /// Damping ratio of the settle spring. `1.0` is critically damped.
    pub settle_damping_ratio: f64,
    /// Initial velocity of the settle spring, in progress units per second.
    pub settle_initial_velocity: f64,
    /// Extra height added to the target frame while an edge transition runs,
    /// hiding the gap below the sheet when the curve overshoots.
    pub seam_padding: f64,
    /// Release positions below this percentage settle to expanded.
    pub expand_threshold: f64,
    /// Release positions below this percentage (and at or above
    /// [`Self::expand_threshold`]) settle to collapsed; the rest dismiss.
    pub collapse_threshold: f64,
    /// Scrim opacity while expanded.
    pub expanded_scrim_opacity: f64,
    /// Scrim opacity while collapsed.
    pub collapsed_scrim_opacity: f64,
    /// Corner radius every state starts with.
    pub default_corner_radius: f64,
}

impl SheetConfig {
    /// Sets the top inset of the expanded sheet.
    #[must_use]
    pub fn with_top_inset(mut self, top_inset: f64) -> Self {
        self.top_inset = top_inset;
        self
    }

    /// Sets the presentation/dismissal duration.
    #[must_use]
    pub fn with_presentation_duration(mut self, duration: Duration) -> Self {
        self.presentation_duration = duration;
        self
    }

    /// Sets the settle spring's duration and damping ratio.
    ///
    /// Ratios above `1.0` settle like a critically damped spring.
    #[must_use]
    pub fn with_settle_spring(mut self, duration: Duration, damping_ratio: f64) -> Self {
        self.settle_duration = duration;
        self.settle_damping_ratio = damping_ratio;
        self
    }

    /// Sets the seam padding used during edge transitions.
    #[must_use]
    pub fn with_seam_padding(mut self, padding: f64) -> Self {
        self.seam_padding = padding;
        self
    }

    /// Sets the expand and collapse release thresholds.
    ///
    /// # Panics
    ///
    /// Panics unless `0 <= expand < collapse`.
    #[must_use]
    pub fn with_thresholds(mut self, expand: f64, collapse: f64) -> Self {
        assert!(
            0.0 <= expand && expand < collapse,
            "release thresholds must satisfy 0 <= expand < collapse, got {expand} and {collapse}"
        );
        self.expand_threshold = expand;
        self.collapse_threshold = collapse;
        self
    }

    /// Sets the corner radius every state starts with.
    #[must_use]
    pub fn with_default_corner_radius(mut self, radius: f64) -> Self {
        self.default_corner_radius = radius;
        self
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            top_inset: 50.0,
            presentation_duration: Duration::from_millis(300),
            settle_duration: Duration::from_millis(250),
            settle_damping_ratio: 0.7,
            settle_initial_velocity: 0.0,
            seam_padding: 50.0,
            expand_threshold: 0.25,
            collapse_threshold: 0.67,
            expanded_scrim_opacity: 1.0,
            collapsed_scrim_opacity: 0.5,
            default_corner_radius: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = SheetConfig::default();
        assert_eq!(config.top_inset, 50.0);
        assert_eq!(config.presentation_duration, Duration::from_millis(300));
        assert_eq!(config.settle_duration, Duration::from_millis(250));
        assert_eq!(config.settle_damping_ratio, 0.7);
        assert_eq!(config.expand_threshold, 0.25);
        assert_eq!(config.collapse_threshold, 0.67);
    }

    #[test]
    fn builders_override_fields() {
        let config = SheetConfig::default()
            .with_top_inset(20.0)
            .with_thresholds(0.1, 0.5)
            .with_settle_spring(Duration::from_millis(400), 1.0);
        assert_eq!(config.top_inset, 20.0);
        assert_eq!(config.expand_threshold, 0.1);
        assert_eq!(config.collapse_threshold, 0.5);
        assert_eq!(config.settle_duration, Duration::from_millis(400));
        assert_eq!(config.settle_damping_ratio, 1.0);
    }

    #[test]
    #[should_panic(expected = "release thresholds")]
    fn inverted_thresholds_panic() {
        let _ = SheetConfig::default().with_thresholds(0.7, 0.3);
    }
}
