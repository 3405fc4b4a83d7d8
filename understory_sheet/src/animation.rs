// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition animation requests and the curves they run on.
//!
//! The sheet does not run a clock. [`TransitionAnimator`] builds an
//! [`AnimationRequest`] describing the start visuals, the animated target, the
//! exact visuals to snap to on completion, and the [`Timing`] curve. The host
//! hands the request to its animation primitive (or drives it itself with
//! [`AnimationRequest::sample`]) and reports back with an
//! [`AnimationCompletion`].
//!
//! Two kinds of transition exist:
//!
//! - Edge transitions (presentation and dismissal) slide the sheet between the
//!   container's bottom edge and the expanded frame on an ease-out curve while
//!   the scrim fades between `0` and `1`.
//! - Settles after a drag release animate frame, scrim and corner radius
//!   together on a damped spring.
//!
//! While a transition toward an on-screen frame runs, the target frame is made
//! taller by the configured seam padding so an overshooting curve never opens
//! a gap below the sheet. Completion snaps to the exact frame.

use core::time::Duration;

use kurbo::{Rect, Size};

use crate::config::SheetConfig;
use crate::frame::FrameCalculator;
use crate::state::{CornerRadii, SheetState};

/// Everything the sheet renders that transitions interpolate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetVisuals {
    /// Sheet frame in container coordinates.
    pub frame: Rect,
    /// Opacity of the scrim behind the sheet, in `[0, 1]`.
    pub scrim_opacity: f64,
    /// Radius of the sheet's top corners.
    pub corner_radius: f64,
}

impl SheetVisuals {
    /// Degenerate visuals used before the sheet is attached to a container.
    pub const ZERO: Self = Self {
        frame: Rect::ZERO,
        scrim_opacity: 0.0,
        corner_radius: 0.0,
    };

    /// Interpolates toward `to`.
    ///
    /// `t` may leave `[0, 1]` when a spring overshoots; the frame follows the
    /// overshoot while opacity and radius stay within their valid ranges.
    #[must_use]
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            frame: Rect::new(
                mix(self.frame.x0, to.frame.x0),
                mix(self.frame.y0, to.frame.y0),
                mix(self.frame.x1, to.frame.x1),
                mix(self.frame.y1, to.frame.y1),
            ),
            scrim_opacity: mix(self.scrim_opacity, to.scrim_opacity).clamp(0.0, 1.0),
            corner_radius: mix(self.corner_radius, to.corner_radius).max(0.0),
        }
    }
}

/// Cubic-bezier easing curves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Starts fast and decelerates.
    EaseOut,
    /// Accelerates then decelerates.
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    #[must_use]
    pub fn transform(self, fraction: f64) -> f64 {
        match self {
            Self::Linear => fraction.clamp(0.0, 1.0),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f64, b: f64, c: f64, t: f64| ((a * t + b) * t + c) * t;
    let derivative = |a: f64, b: f64, c: f64, t: f64| (3.0 * a * t + 2.0 * b) * t + c;

    // Newton-Raphson for the parameter whose x matches `fraction`, falling back
    // to bisection when the slope flattens out.
    let mut t = fraction;
    let mut solved = false;
    for _ in 0..8 {
        let x = sample(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-9 {
            solved = true;
            break;
        }
        let dx = derivative(ax, bx, cx, t);
        if dx.abs() < 1e-9 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !solved {
        let (mut lo, mut hi) = (0.0, 1.0);
        t = fraction;
        for _ in 0..32 {
            let delta = sample(ax, bx, cx, t) - fraction;
            if delta.abs() < 1e-9 {
                break;
            }
            if delta > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            t = 0.5 * (lo + hi);
        }
    }

    sample(ay, by, cy, t)
}

/// A damped spring stretched over the animation's duration.
///
/// The natural frequency is picked so the oscillation envelope has decayed to
/// a thousandth of the distance by the end of the duration. Damping ratios
/// above `1.0` are treated as critically damped so that holds for every ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringCurve {
    /// `1.0` is critically damped; lower values bounce. Higher values behave
    /// like `1.0`.
    pub damping_ratio: f64,
    /// Initial velocity in total animation distances per second.
    pub initial_velocity: f64,
}

impl SpringCurve {
    /// ln(1000): envelope decay across the whole duration.
    const DECAY: f64 = 6.907_755_278_982_137;
    const STEPS_PER_DURATION: f64 = 480.0;
    const MIN_DAMPING: f64 = 0.05;

    /// Creates a spring with the given damping ratio and initial velocity.
    #[must_use]
    pub const fn new(damping_ratio: f64, initial_velocity: f64) -> Self {
        Self {
            damping_ratio,
            initial_velocity,
        }
    }

    /// Progress at `fraction` of an animation lasting `duration_secs`.
    ///
    /// May exceed `1.0` while the spring overshoots.
    #[must_use]
    pub fn progress(&self, fraction: f64, duration_secs: f64) -> f64 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }

        let zeta = self.damping_ratio.clamp(Self::MIN_DAMPING, 1.0);
        let omega = Self::DECAY / zeta;
        let stiffness = omega * omega;
        let damping = 2.0 * zeta * omega;

        // Semi-implicit Euler over normalized time.
        let step = 1.0 / Self::STEPS_PER_DURATION;
        let mut position = 0.0;
        let mut velocity = self.initial_velocity * duration_secs;
        let mut time = 0.0;
        while time < fraction {
            let dt = step.min(fraction - time);
            let force = -stiffness * (position - 1.0) - damping * velocity;
            velocity += force * dt;
            position += velocity * dt;
            time += dt;
        }
        position
    }
}

/// The curve an animation follows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    /// A cubic-bezier easing.
    Easing(Easing),
    /// A damped spring.
    Spring(SpringCurve),
}

/// Duration and curve of an animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Total duration.
    pub duration: Duration,
    /// Progress curve.
    pub curve: Curve,
    /// Whether the host should keep delivering pointer input to the sheet
    /// while this animation runs.
    pub allows_user_interaction: bool,
}

impl Timing {
    /// An interruptible ease-out curve.
    #[must_use]
    pub const fn ease_out(duration: Duration) -> Self {
        Self {
            duration,
            curve: Curve::Easing(Easing::EaseOut),
            allows_user_interaction: true,
        }
    }

    /// A damped spring.
    #[must_use]
    pub const fn spring(duration: Duration, damping_ratio: f64, initial_velocity: f64) -> Self {
        Self {
            duration,
            curve: Curve::Spring(SpringCurve::new(damping_ratio, initial_velocity)),
            allows_user_interaction: false,
        }
    }

    /// Curve progress after `elapsed`.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let duration = self.duration.as_secs_f64();
        if duration <= 0.0 {
            return 1.0;
        }
        let fraction = (elapsed.as_secs_f64() / duration).clamp(0.0, 1.0);
        match self.curve {
            Curve::Easing(easing) => easing.transform(fraction),
            Curve::Spring(spring) => spring.progress(fraction, duration),
        }
    }
}

/// Identifies one scheduled animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

/// What an animation transitions between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// Off-screen to expanded.
    Presentation,
    /// Current visuals to off-screen.
    Dismissal,
    /// Drag release to a resting state.
    Settle(SheetState),
}

impl TransitionKind {
    /// State the sheet rests in once the transition completes.
    #[must_use]
    pub const fn target(self) -> SheetState {
        match self {
            Self::Presentation => SheetState::Expanded,
            Self::Dismissal => SheetState::Dismissed,
            Self::Settle(state) => state,
        }
    }
}

/// How an animation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationCompletion {
    /// Ran to its full duration.
    Finished,
    /// Abandoned before completion.
    Interrupted,
}

/// A fully described animation for the host to run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationRequest {
    /// Identifier the host reports completion with.
    pub id: AnimationId,
    /// What this animation transitions between.
    pub kind: TransitionKind,
    /// Visuals at the start.
    pub from: SheetVisuals,
    /// Visuals animated toward; may carry seam padding.
    pub to: SheetVisuals,
    /// Exact visuals applied on successful completion.
    pub settled: SheetVisuals,
    /// Duration and curve.
    pub timing: Timing,
    /// Whether the corner radius changes over this animation.
    pub animates_corner_radius: bool,
}

impl AnimationRequest {
    /// Visuals after `elapsed`; the settled visuals once the duration is over.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> SheetVisuals {
        if elapsed >= self.timing.duration {
            return self.settled;
        }
        self.from.lerp(&self.to, self.timing.progress(elapsed))
    }
}

/// Builds [`AnimationRequest`]s for sheet transitions.
#[derive(Clone, Debug)]
pub struct TransitionAnimator {
    frames: FrameCalculator,
    presentation_duration: Duration,
    settle: Timing,
    seam_padding: f64,
    expanded_scrim_opacity: f64,
    collapsed_scrim_opacity: f64,
    next_id: u64,
}

impl TransitionAnimator {
    /// Creates an animator using the timing and geometry in `config`.
    #[must_use]
    pub fn new(config: &SheetConfig) -> Self {
        Self {
            frames: FrameCalculator::new(config.top_inset),
            presentation_duration: config.presentation_duration,
            settle: Timing::spring(
                config.settle_duration,
                config.settle_damping_ratio,
                config.settle_initial_velocity,
            ),
            seam_padding: config.seam_padding,
            expanded_scrim_opacity: config.expanded_scrim_opacity,
            collapsed_scrim_opacity: config.collapsed_scrim_opacity,
            next_id: 0,
        }
    }

    /// Scrim opacity of a resting state.
    #[must_use]
    pub fn scrim_opacity(&self, state: SheetState) -> f64 {
        match state {
            SheetState::Dismissed => 0.0,
            SheetState::Collapsed => self.collapsed_scrim_opacity,
            SheetState::Expanded => self.expanded_scrim_opacity,
        }
    }

    /// Exact visuals of a resting state.
    #[must_use]
    pub fn resting_visuals(
        &self,
        state: SheetState,
        container: Size,
        presented_height: f64,
        radii: &CornerRadii,
    ) -> SheetVisuals {
        SheetVisuals {
            frame: self.frames.frame(state, container, presented_height),
            scrim_opacity: self.scrim_opacity(state),
            corner_radius: radii.get(state),
        }
    }

    /// Slide in from below the container to the expanded frame.
    pub fn presentation(&mut self, container: Size, radii: &CornerRadii) -> AnimationRequest {
        let height = self.frames.sheet_height(container);
        let from = self.resting_visuals(SheetState::Dismissed, container, height, radii);
        let settled = self.resting_visuals(SheetState::Expanded, container, height, radii);
        self.request(
            TransitionKind::Presentation,
            from,
            self.padded(settled),
            settled,
            Timing::ease_out(self.presentation_duration),
            radii.differs(SheetState::Dismissed, SheetState::Expanded),
        )
    }

    /// Slide from `from` to below the container.
    pub fn dismissal(
        &mut self,
        from: SheetVisuals,
        container: Size,
        radii: &CornerRadii,
    ) -> AnimationRequest {
        let height = self.frames.sheet_height(container);
        let settled = self.resting_visuals(SheetState::Dismissed, container, height, radii);
        self.request(
            TransitionKind::Dismissal,
            from,
            self.padded(settled),
            settled,
            Timing::ease_out(self.presentation_duration),
            from.corner_radius != settled.corner_radius,
        )
    }

    /// Spring from the released visuals to `target`.
    ///
    /// The corner radius animates only when the released radius differs from
    /// the radius `target` has in `radii`.
    pub fn settle(
        &mut self,
        from: SheetVisuals,
        target: SheetState,
        container: Size,
        presented_height: f64,
        radii: &CornerRadii,
    ) -> AnimationRequest {
        let settled = self.resting_visuals(target, container, presented_height, radii);
        let animates_corner_radius = from.corner_radius != settled.corner_radius;
        let to = if target == SheetState::Expanded {
            self.padded(settled)
        } else {
            settled
        };
        self.request(
            TransitionKind::Settle(target),
            from,
            to,
            settled,
            self.settle,
            animates_corner_radius,
        )
    }

    fn padded(&self, mut visuals: SheetVisuals) -> SheetVisuals {
        visuals.frame.y1 += self.seam_padding;
        visuals
    }

    fn request(
        &mut self,
        kind: TransitionKind,
        from: SheetVisuals,
        to: SheetVisuals,
        settled: SheetVisuals,
        timing: Timing,
        animates_corner_radius: bool,
    ) -> AnimationRequest {
        self.next_id += 1;
        AnimationRequest {
            id: AnimationId(self.next_id),
            kind,
            from,
            to,
            settled,
            timing,
            animates_corner_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: Size = Size::new(400.0, 800.0);

    fn animator() -> TransitionAnimator {
        TransitionAnimator::new(&SheetConfig::default())
    }

    #[test]
    fn easing_endpoints_are_exact() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.transform(0.0), 0.0);
            assert_eq!(easing.transform(1.0), 1.0);
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        for fraction in [0.1, 0.3, 0.5, 0.7, 0.9] {
            let eased = Easing::EaseOut.transform(fraction);
            assert!(eased > fraction, "{eased} should lead {fraction}");
            assert!(eased < 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let a = Easing::EaseInOut.transform(0.25);
        let b = Easing::EaseInOut.transform(0.75);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn underdamped_spring_overshoots_then_lands() {
        let spring = SpringCurve::new(0.7, 0.0);
        let peak = (1..100)
            .map(|i| spring.progress(f64::from(i) / 100.0, 0.25))
            .fold(0.0_f64, f64::max);
        assert!(peak > 1.0, "peak {peak} should overshoot");
        assert_eq!(spring.progress(0.0, 0.25), 0.0);
        assert_eq!(spring.progress(1.0, 0.25), 1.0);
        assert!((spring.progress(0.99, 0.25) - 1.0).abs() < 0.01);
    }

    #[test]
    fn critically_damped_spring_is_monotonic() {
        let spring = SpringCurve::new(1.0, 0.0);
        let mut last = 0.0;
        for i in 1..100 {
            let value = spring.progress(f64::from(i) / 100.0, 0.25);
            assert!(value >= last - 1e-9);
            assert!(value <= 1.0 + 1e-6);
            last = value;
        }
    }

    #[test]
    fn overdamped_spring_lands_without_a_final_jump() {
        let overdamped = SpringCurve::new(3.0, 0.0);
        let critical = SpringCurve::new(1.0, 0.0);
        let near_end = overdamped.progress(0.999, 0.25);
        assert!((near_end - 1.0).abs() < 0.01, "{near_end} should be near 1");
        assert_eq!(near_end, critical.progress(0.999, 0.25));
    }

    #[test]
    fn zero_duration_timing_is_complete() {
        let timing = Timing::ease_out(Duration::ZERO);
        assert_eq!(timing.progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn presentation_slides_from_bottom_with_seam_padding() {
        let mut animator = animator();
        let request = animator.presentation(CONTAINER, &CornerRadii::default());
        assert_eq!(request.kind, TransitionKind::Presentation);
        assert_eq!(request.from.frame, Rect::new(0.0, 800.0, 400.0, 1550.0));
        assert_eq!(request.from.scrim_opacity, 0.0);
        assert_eq!(request.to.frame, Rect::new(0.0, 50.0, 400.0, 850.0));
        assert_eq!(request.settled.frame, Rect::new(0.0, 50.0, 400.0, 800.0));
        assert_eq!(request.settled.scrim_opacity, 1.0);
        assert_eq!(request.timing.duration, Duration::from_millis(300));
        assert!(request.timing.allows_user_interaction);
        assert!(!request.animates_corner_radius);
    }

    #[test]
    fn dismissal_fades_scrim_out() {
        let mut animator = animator();
        let radii = CornerRadii::default();
        let expanded = animator.resting_visuals(SheetState::Expanded, CONTAINER, 750.0, &radii);
        let request = animator.dismissal(expanded, CONTAINER, &radii);
        assert_eq!(request.settled.frame.y0, 800.0);
        assert_eq!(request.settled.scrim_opacity, 0.0);
        assert_eq!(request.to.frame.height(), 800.0);
    }

    #[test]
    fn settle_to_collapsed_uses_spring() {
        let mut animator = animator();
        let radii = CornerRadii::default();
        let from = SheetVisuals {
            frame: Rect::new(0.0, 260.0, 400.0, 1010.0),
            scrim_opacity: 0.7,
            corner_radius: 16.0,
        };
        let request = animator.settle(
            from,
            SheetState::Collapsed,
            CONTAINER,
            700.0,
            &radii,
        );
        assert_eq!(request.settled.frame.y0, 400.0);
        assert_eq!(request.to, request.settled);
        assert_eq!(request.settled.scrim_opacity, 0.5);
        assert_eq!(request.timing.duration, Duration::from_millis(250));
        assert_eq!(
            request.timing.curve,
            Curve::Spring(SpringCurve::new(0.7, 0.0))
        );
        assert!(!request.animates_corner_radius);
    }

    #[test]
    fn settle_animates_corner_radius_only_when_it_differs() {
        let mut animator = animator();
        let mut radii = CornerRadii::default();
        radii.set(SheetState::Collapsed, 4.0);
        let from = animator.resting_visuals(SheetState::Expanded, CONTAINER, 750.0, &radii);

        let request = animator.settle(from, SheetState::Collapsed, CONTAINER, 750.0, &radii);
        assert!(request.animates_corner_radius);
        assert_eq!(request.settled.corner_radius, 4.0);

        let request = animator.settle(from, SheetState::Expanded, CONTAINER, 750.0, &radii);
        assert!(!request.animates_corner_radius);
        assert_eq!(request.settled.corner_radius, from.corner_radius);
    }

    #[test]
    fn settle_lands_on_table_radius_from_in_between_radius() {
        let mut animator = animator();
        let mut radii = CornerRadii::default();
        radii.set(SheetState::Collapsed, 4.0);
        let mut from = animator.resting_visuals(SheetState::Expanded, CONTAINER, 750.0, &radii);
        from.corner_radius = 9.5;

        let request = animator.settle(from, SheetState::Expanded, CONTAINER, 750.0, &radii);
        assert!(request.animates_corner_radius);
        assert_eq!(request.settled.corner_radius, 16.0);
    }

    #[test]
    fn sample_snaps_to_settled_at_the_end() {
        let mut animator = animator();
        let request = animator.presentation(CONTAINER, &CornerRadii::default());
        assert_eq!(request.sample(Duration::ZERO), request.from);
        let midway = request.sample(Duration::from_millis(150));
        assert!(midway.frame.y0 < 800.0 && midway.frame.y0 > 50.0);
        assert_eq!(request.sample(Duration::from_millis(300)), request.settled);
    }

    #[test]
    fn ids_are_unique() {
        let mut animator = animator();
        let radii = CornerRadii::default();
        let a = animator.presentation(CONTAINER, &radii);
        let b = animator.presentation(CONTAINER, &radii);
        assert_ne!(a.id, b.id);
    }
}
