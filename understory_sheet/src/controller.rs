// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sheet controller: one owner for frame, state and drag session.
//!
//! [`SheetController`] wires the pieces together:
//!
//! pointer down → [`GestureArbiter`] → [`DragController`] → [`StateMachine`]
//! → [`TransitionAnimator`] → [`FrameCalculator`].
//!
//! Rendering is a pure function of [`SheetController::visuals`]. Every change to
//! those visuals outside an animation bumps [`SheetController::revision`] and
//! asks the host for a layout pass.

use alloc::rc::{Rc, Weak};

use kurbo::{Rect, Size};

use crate::animation::{
    AnimationCompletion, AnimationId, AnimationRequest, SheetVisuals, TransitionAnimator,
    TransitionKind,
};
use crate::arbiter::{GestureArbiter, TrackingScroll};
use crate::config::SheetConfig;
use crate::drag::{
    DragController, DragEffect, DragPhase, DragSample, DragState, DragSurface, ReleaseOutcome,
};
use crate::frame::FrameCalculator;
use crate::host::{SheetHost, SheetObserver};
use crate::state::{CornerRadii, SheetState, StateMachine, TransitionTrigger};
use crate::style::SheetStyle;

/// A draggable sheet presented over a host container.
///
/// The controller starts [`SheetState::Dismissed`], moves to
/// [`SheetState::Expanded`] once presentation completes, and becomes eligible
/// for teardown when a dismissal completes.
#[derive(Debug)]
pub struct SheetController {
    config: SheetConfig,
    style: SheetStyle,
    frames: FrameCalculator,
    drag: DragController,
    animator: TransitionAnimator,
    machine: StateMachine,
    radii: CornerRadii,
    container: Option<Size>,
    visuals: SheetVisuals,
    drag_state: DragState,
    in_flight: Option<AnimationRequest>,
    observer: Option<Weak<dyn SheetObserver>>,
    tracking: Option<Weak<dyn TrackingScroll>>,
    revision: u64,
    torn_down: bool,
}

impl SheetController {
    /// Creates a dismissed, unattached controller.
    #[must_use]
    pub fn new(config: SheetConfig, style: SheetStyle) -> Self {
        Self {
            frames: FrameCalculator::new(config.top_inset),
            drag: DragController::new(&config),
            animator: TransitionAnimator::new(&config),
            machine: StateMachine::new(),
            radii: CornerRadii::new(config.default_corner_radius),
            container: None,
            visuals: SheetVisuals::ZERO,
            drag_state: DragState::Idle,
            in_flight: None,
            observer: None,
            tracking: None,
            revision: 0,
            torn_down: false,
            config,
            style,
        }
    }

    /// The committed state.
    #[must_use]
    pub fn state(&self) -> SheetState {
        self.machine.current()
    }

    /// The state an in-flight transition is heading to.
    #[must_use]
    pub fn pending_state(&self) -> Option<SheetState> {
        self.machine.pending()
    }

    /// The constants this controller was built with.
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Pass-through styling.
    #[must_use]
    pub fn style(&self) -> &SheetStyle {
        &self.style
    }

    /// Mutable pass-through styling.
    pub fn style_mut(&mut self) -> &mut SheetStyle {
        &mut self.style
    }

    /// The container size, once attached.
    #[must_use]
    pub fn container_size(&self) -> Option<Size> {
        self.container
    }

    /// What the sheet presents right now, outside of any running animation.
    ///
    /// Zeroed until the controller is attached to a container.
    #[must_use]
    pub fn visuals(&self) -> SheetVisuals {
        self.visuals
    }

    /// The presented frame.
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.visuals.frame
    }

    /// Counter bumped on every change to [`Self::visuals`].
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The animation the host is currently running for this sheet.
    #[must_use]
    pub fn in_flight(&self) -> Option<&AnimationRequest> {
        self.in_flight.as_ref()
    }

    /// Returns `true` while a drag gesture is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_state.is_dragging()
    }

    /// Returns `true` once a dismissal has completed.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Frame of `state` at the current container size, or [`Rect::ZERO`] while
    /// unattached.
    #[must_use]
    pub fn frame_for(&self, state: SheetState) -> Rect {
        let Some(container) = self.container else {
            return Rect::ZERO;
        };
        let height = self.presented_height(container);
        self.frames.frame(state, container, height)
    }

    /// Registers the observer notified about state changes.
    ///
    /// Only a weak reference is kept; the host owns the observer.
    pub fn set_observer<O: SheetObserver + 'static>(&mut self, observer: &Rc<O>) {
        let observer: Weak<O> = Rc::downgrade(observer);
        self.observer = Some(observer);
    }

    /// Drops the observer registration.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Registers a scroll view whose drag competes with the sheet's drag.
    ///
    /// Only a weak reference is kept; the host owns the scroll view.
    pub fn set_tracking_scroll<T: TrackingScroll + 'static>(&mut self, view: &Rc<T>) {
        let view: Weak<T> = Rc::downgrade(view);
        self.tracking = Some(view);
    }

    /// Drops the tracking scroll view registration.
    pub fn clear_tracking_scroll(&mut self) {
        self.tracking = None;
    }

    /// Corner radius configured for `state`.
    #[must_use]
    pub fn corner_radius(&self, state: SheetState) -> f64 {
        self.radii.get(state)
    }

    /// Sets the corner radius for `state`.
    ///
    /// When `state` is the current state and the sheet is attached, the
    /// presented radius updates immediately. Setting the value a state already
    /// has does nothing. Returns `true` if the table changed.
    pub fn set_corner_radius(&mut self, radius: f64, state: SheetState) -> bool {
        if !self.radii.set(state, radius) {
            return false;
        }
        if self.container.is_some() && self.state() == state && self.in_flight.is_none() {
            self.visuals.corner_radius = radius;
            self.bump();
        }
        true
    }

    /// Attaches the controller to a container, or reports a container resize.
    ///
    /// The frame for the current state is recomputed and applied without
    /// changing state. A transition in flight is cut short and lands
    /// immediately at the new size.
    pub fn set_container_size(&mut self, size: Size, host: &mut impl SheetHost) {
        if self.container == Some(size) {
            return;
        }
        log::debug!("sheet container resized to {size:?}");
        self.container = Some(size);

        if let Some(request) = self.in_flight.take() {
            host.cancel_animation(request.id);
            let settled = self.resting_in(request.kind.target(), size);
            self.complete(settled, host);
            return;
        }

        let resting = self.resting_in(self.state(), size);
        self.visuals.frame = resting.frame;
        if !self.drag_state.is_dragging() {
            self.visuals.scrim_opacity = resting.scrim_opacity;
        }
        if let DragState::Dragging(session) = &mut self.drag_state {
            session.baseline_frame = resting.frame;
            session.frame = resting.frame;
        }
        self.bump();
        host.set_needs_layout();
    }

    /// Starts presenting the sheet.
    ///
    /// Emits `will_change_state(Expanded)` before anything moves. With
    /// `animated`, the sheet slides in and `did_change_state(Expanded)` follows
    /// the host's completion report; otherwise both land immediately.
    pub fn present(&mut self, animated: bool, host: &mut impl SheetHost) {
        let Some(container) = self.container else {
            log::warn!("sheet presentation requested before attaching to a container");
            return;
        };
        if self.torn_down {
            log::warn!("sheet presentation requested after teardown");
            return;
        }
        if let Err(err) = self
            .machine
            .begin(SheetState::Expanded, TransitionTrigger::Presentation)
        {
            log::warn!("sheet presentation rejected: {err}");
            return;
        }
        self.notify_will(SheetState::Expanded);

        let request = self.animator.presentation(container, &self.radii);
        if animated {
            self.visuals = request.from;
            self.bump();
            self.schedule(request, host);
        } else {
            self.complete(request.settled, host);
        }
    }

    /// Runs the dismissal transition.
    ///
    /// This is the host's dismissal entry point; user-initiated dismissals
    /// reach it through [`SheetHost::request_dismissal`]. Emits
    /// `will_change_state(Dismissed)` before anything moves and
    /// `did_change_state(Dismissed)` once the sheet is off screen.
    pub fn dismiss(&mut self, animated: bool, host: &mut impl SheetHost) {
        let Some(container) = self.container else {
            log::warn!("sheet dismissal requested before attaching to a container");
            return;
        };
        if let Some(request) = self.in_flight {
            match request.kind {
                TransitionKind::Dismissal => return,
                TransitionKind::Presentation | TransitionKind::Settle(_) => {
                    let rendered = host.cancel_animation(request.id);
                    self.in_flight = None;
                    self.rollback();
                    self.visuals = rendered.unwrap_or(self.visuals);
                    self.bump();
                }
            }
        }
        self.drag_state = DragState::Idle;

        if !self.state().is_presented() {
            // Presentation never completed; nothing is resting on screen.
            log::debug!("sheet dismissed before presentation completed");
            self.visuals = self.resting(SheetState::Dismissed);
            self.torn_down = true;
            self.bump();
            host.set_needs_layout();
            return;
        }
        if let Err(err) = self
            .machine
            .begin(SheetState::Dismissed, TransitionTrigger::Dismissal)
        {
            log::warn!("sheet dismissal rejected: {err}");
            return;
        }
        self.notify_will(SheetState::Dismissed);

        let request = self
            .animator
            .dismissal(self.visuals, container, &self.radii);
        if animated {
            self.schedule(request, host);
        } else {
            self.complete(request.settled, host);
        }
    }

    /// The scrim behind the sheet was tapped.
    pub fn scrim_tapped(&mut self, host: &mut impl SheetHost) {
        self.request_dismissal(host);
    }

    /// The top bar's close button was tapped.
    pub fn close_button_tapped(&mut self, host: &mut impl SheetHost) {
        self.request_dismissal(host);
    }

    /// The accessibility escape gesture was performed. Always handled.
    pub fn accessibility_escape(&mut self, host: &mut impl SheetHost) -> bool {
        self.request_dismissal(host);
        true
    }

    /// Decides whether a pointer that just went down with `velocity_y` should
    /// drive the sheet. Call once per gesture, before the first sample.
    #[must_use]
    pub fn should_begin_drag(&self, velocity_y: f64) -> bool {
        if self.container.is_none() || self.torn_down || !self.accepts_drag() {
            return false;
        }
        let tracking = self.tracking.as_ref().and_then(Weak::upgrade);
        GestureArbiter::should_sheet_gesture_begin(self.state(), tracking.as_deref(), velocity_y)
    }

    /// Feeds one drag sample.
    ///
    /// A `Began` sample while a settle animation is in flight cancels that
    /// animation, drops its pending state without notifying, and continues
    /// from the visuals the host last rendered.
    pub fn handle_drag(&mut self, sample: &DragSample, host: &mut impl SheetHost) {
        let Some(container) = self.container else {
            return;
        };
        if sample.phase == DragPhase::Began {
            if !self.accepts_drag() {
                log::debug!("sheet ignored drag in {:?}", self.state());
                return;
            }
            self.interrupt_settle(host);
        }

        let surface = DragSurface {
            container,
            frame: self.visuals.frame,
            scrim_opacity: self.visuals.scrim_opacity,
        };
        let (drag_state, effects) = self.drag.step(&self.drag_state, sample, &surface);
        self.drag_state = drag_state;

        let before = self.visuals;
        for effect in effects {
            match effect {
                DragEffect::SetFrame(frame) => self.visuals.frame = frame,
                DragEffect::SetScrimOpacity(opacity) => self.visuals.scrim_opacity = opacity,
                DragEffect::Revert {
                    frame,
                    scrim_opacity,
                } => {
                    self.visuals.frame = frame;
                    self.visuals.scrim_opacity = scrim_opacity;
                }
                DragEffect::Release { outcome, .. } => self.release(outcome, host),
            }
        }
        if self.visuals != before {
            self.bump();
            host.set_needs_layout();
        }
    }

    /// Reports how the animation `id` ended.
    ///
    /// On [`AnimationCompletion::Finished`] the exact target visuals are applied
    /// and the pending state is committed. An interrupted animation leaves the
    /// state unchanged and restores that state's frame.
    pub fn finish_animation(
        &mut self,
        id: AnimationId,
        completion: AnimationCompletion,
        host: &mut impl SheetHost,
    ) {
        let Some(request) = self.in_flight.filter(|request| request.id == id) else {
            log::warn!("sheet ignored completion of unknown animation {id:?}");
            return;
        };
        self.in_flight = None;
        log::debug!("sheet animation {id:?} {completion:?}");
        match completion {
            AnimationCompletion::Finished => self.complete(request.settled, host),
            AnimationCompletion::Interrupted => {
                self.rollback();
                self.visuals = self.resting(self.state());
                self.bump();
                host.set_needs_layout();
            }
        }
    }

    fn accepts_drag(&self) -> bool {
        self.state().is_presented()
            && !matches!(
                self.in_flight.map(|request| request.kind),
                Some(TransitionKind::Presentation | TransitionKind::Dismissal)
            )
    }

    fn request_dismissal(&mut self, host: &mut impl SheetHost) {
        if self.state().is_presented() {
            host.request_dismissal(true);
        }
    }

    fn interrupt_settle(&mut self, host: &mut impl SheetHost) {
        let Some(request) = self.in_flight.take() else {
            return;
        };
        let rendered = host.cancel_animation(request.id);
        self.rollback();
        log::debug!(
            "sheet drag interrupted settle toward {:?}",
            request.kind.target()
        );
        self.visuals = rendered.unwrap_or(self.visuals);
        self.bump();
    }

    fn release(&mut self, outcome: ReleaseOutcome, host: &mut impl SheetHost) {
        let Some(container) = self.container else {
            return;
        };
        let target = match outcome {
            ReleaseOutcome::Dismiss => {
                host.request_dismissal(true);
                return;
            }
            ReleaseOutcome::Settle(target) => target,
        };
        if let Err(err) = self.machine.begin(target, TransitionTrigger::DragRelease) {
            log::warn!("sheet settle rejected: {err}");
            self.visuals = self.resting(self.state());
            return;
        }
        self.notify_will(target);
        let request = self.animator.settle(
            self.visuals,
            target,
            container,
            self.visuals.frame.height(),
            &self.radii,
        );
        self.schedule(request, host);
    }

    fn schedule(&mut self, request: AnimationRequest, host: &mut impl SheetHost) {
        log::debug!(
            "sheet animation {:?} scheduled: {:?} over {:?}",
            request.id,
            request.kind,
            request.timing.duration
        );
        self.in_flight = Some(request);
        host.animate(&request);
    }

    fn complete(&mut self, settled: SheetVisuals, host: &mut impl SheetHost) {
        self.visuals = settled;
        self.bump();
        host.set_needs_layout();
        match self.machine.commit() {
            Ok(state) => {
                log::debug!("sheet now {state:?}");
                // The table may have changed while the animation ran.
                self.visuals.corner_radius = self.radii.get(state);
                if state == SheetState::Dismissed {
                    self.torn_down = true;
                    self.drag_state = DragState::Idle;
                }
                self.notify_did(state);
            }
            Err(err) => log::warn!("sheet transition could not commit: {err}"),
        }
    }

    fn rollback(&mut self) {
        if let Err(err) = self.machine.rollback() {
            log::warn!("sheet transition could not roll back: {err}");
        }
    }

    fn presented_height(&self, container: Size) -> f64 {
        if self.state().is_presented() && self.visuals.frame.height() > 0.0 {
            self.visuals.frame.height()
        } else {
            self.frames.sheet_height(container)
        }
    }

    fn resting(&self, state: SheetState) -> SheetVisuals {
        let Some(container) = self.container else {
            return SheetVisuals::ZERO;
        };
        let height = if state == SheetState::Collapsed {
            self.presented_height(container)
        } else {
            self.frames.sheet_height(container)
        };
        self.animator
            .resting_visuals(state, container, height, &self.radii)
    }

    fn resting_in(&self, state: SheetState, container: Size) -> SheetVisuals {
        let height = self.frames.sheet_height(container);
        self.animator
            .resting_visuals(state, container, height, &self.radii)
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn observer(&self) -> Option<Rc<dyn SheetObserver>> {
        self.observer.as_ref().and_then(Weak::upgrade)
    }

    fn notify_will(&self, state: SheetState) {
        log::debug!("sheet will change to {state:?}");
        if let Some(observer) = self.observer() {
            observer.will_change_state(state);
        }
    }

    fn notify_did(&self, state: SheetState) {
        if let Some(observer) = self.observer() {
            observer.did_change_state(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Default)]
    struct Host {
        scheduled: Vec<AnimationRequest>,
        cancelled: Vec<AnimationId>,
        dismissals: u32,
        rendered: Option<SheetVisuals>,
    }

    impl SheetHost for Host {
        fn animate(&mut self, request: &AnimationRequest) {
            self.scheduled.push(*request);
        }

        fn cancel_animation(&mut self, id: AnimationId) -> Option<SheetVisuals> {
            self.cancelled.push(id);
            self.rendered
        }

        fn request_dismissal(&mut self, _animated: bool) {
            self.dismissals += 1;
        }
    }

    #[derive(Default)]
    struct Log(RefCell<Vec<(&'static str, SheetState)>>);

    impl SheetObserver for Log {
        fn will_change_state(&self, state: SheetState) {
            self.0.borrow_mut().push(("will", state));
        }

        fn did_change_state(&self, state: SheetState) {
            self.0.borrow_mut().push(("did", state));
        }
    }

    fn presented() -> (SheetController, Host) {
        let mut host = Host::default();
        let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::default());
        sheet.set_container_size(Size::new(400.0, 800.0), &mut host);
        sheet.present(false, &mut host);
        (sheet, host)
    }

    #[test]
    fn unattached_queries_are_degenerate() {
        let mut host = Host::default();
        let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::default());
        assert_eq!(sheet.frame(), Rect::ZERO);
        assert_eq!(sheet.frame_for(SheetState::Expanded), Rect::ZERO);
        assert!(!sheet.should_begin_drag(10.0));
        sheet.present(true, &mut host);
        assert!(host.scheduled.is_empty());
        assert_eq!(sheet.state(), SheetState::Dismissed);
    }

    #[test]
    fn attach_places_sheet_below_container() {
        let mut host = Host::default();
        let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::default());
        sheet.set_container_size(Size::new(400.0, 800.0), &mut host);
        assert_eq!(sheet.frame().y0, 800.0);
        assert_eq!(sheet.visuals().scrim_opacity, 0.0);
    }

    #[test]
    fn instant_presentation_notifies_both() {
        let log = Rc::new(Log::default());
        let mut host = Host::default();
        let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::default());
        sheet.set_observer(&log);
        sheet.set_container_size(Size::new(400.0, 800.0), &mut host);
        sheet.present(false, &mut host);
        assert_eq!(sheet.state(), SheetState::Expanded);
        assert_eq!(sheet.frame(), Rect::new(0.0, 50.0, 400.0, 800.0));
        assert_eq!(
            *log.0.borrow(),
            [
                ("will", SheetState::Expanded),
                ("did", SheetState::Expanded)
            ]
        );
    }

    #[test]
    fn dropped_observer_is_skipped() {
        let mut host = Host::default();
        let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::default());
        {
            let log = Rc::new(Log::default());
            sheet.set_observer(&log);
        }
        sheet.set_container_size(Size::new(400.0, 800.0), &mut host);
        sheet.present(false, &mut host);
        assert_eq!(sheet.state(), SheetState::Expanded);
    }

    #[test]
    fn corner_radius_setter_is_idempotent() {
        let (mut sheet, _) = presented();
        let revision = sheet.revision();
        assert!(sheet.set_corner_radius(24.0, SheetState::Expanded));
        assert_eq!(sheet.visuals().corner_radius, 24.0);
        assert_eq!(sheet.revision(), revision + 1);

        assert!(!sheet.set_corner_radius(24.0, SheetState::Expanded));
        assert_eq!(sheet.revision(), revision + 1);
    }

    #[test]
    fn corner_radius_for_other_state_does_not_touch_visuals() {
        let (mut sheet, _) = presented();
        assert!(sheet.set_corner_radius(4.0, SheetState::Collapsed));
        assert_eq!(sheet.corner_radius(SheetState::Collapsed), 4.0);
        assert_eq!(sheet.visuals().corner_radius, 16.0);
    }

    #[test]
    fn resize_recomputes_current_frame_without_state_change() {
        let (mut sheet, mut host) = presented();
        sheet.set_container_size(Size::new(800.0, 400.0), &mut host);
        assert_eq!(sheet.state(), SheetState::Expanded);
        assert_eq!(sheet.frame(), Rect::new(0.0, 50.0, 800.0, 400.0));
    }

    #[test]
    fn resize_lands_in_flight_transition() {
        let log = Rc::new(Log::default());
        let mut host = Host::default();
        let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::default());
        sheet.set_observer(&log);
        sheet.set_container_size(Size::new(400.0, 800.0), &mut host);
        sheet.present(true, &mut host);
        let id = host.scheduled[0].id;

        sheet.set_container_size(Size::new(800.0, 400.0), &mut host);
        assert_eq!(host.cancelled, [id]);
        assert_eq!(sheet.state(), SheetState::Expanded);
        assert_eq!(sheet.frame(), Rect::new(0.0, 50.0, 800.0, 400.0));
        assert!(sheet.in_flight().is_none());
        assert_eq!(log.0.borrow().last(), Some(&("did", SheetState::Expanded)));
    }

    #[test]
    fn drag_refused_while_dismissal_runs() {
        let (mut sheet, mut host) = presented();
        sheet.dismiss(true, &mut host);
        assert_eq!(sheet.pending_state(), Some(SheetState::Dismissed));
        assert!(!sheet.should_begin_drag(10.0));
        sheet.handle_drag(&DragSample::began(100.0, 10.0), &mut host);
        assert!(!sheet.is_dragging());
    }

    #[test]
    fn stray_completion_is_ignored() {
        let (mut sheet, mut host) = presented();
        sheet.finish_animation(AnimationId(99), AnimationCompletion::Finished, &mut host);
        assert_eq!(sheet.state(), SheetState::Expanded);
    }

    #[test]
    fn taps_route_through_host_dismissal() {
        let (mut sheet, mut host) = presented();
        sheet.scrim_tapped(&mut host);
        sheet.close_button_tapped(&mut host);
        assert!(sheet.accessibility_escape(&mut host));
        assert_eq!(host.dismissals, 3);
        assert_eq!(sheet.state(), SheetState::Expanded);
    }

    #[test]
    fn dismissing_before_presentation_lands_tears_down() {
        let mut host = Host::default();
        let mut sheet = SheetController::new(SheetConfig::default(), SheetStyle::default());
        sheet.set_container_size(Size::new(400.0, 800.0), &mut host);
        sheet.present(true, &mut host);
        sheet.dismiss(true, &mut host);
        assert_eq!(host.cancelled.len(), 1);
        assert_eq!(sheet.state(), SheetState::Dismissed);
        assert_eq!(sheet.pending_state(), None);
        assert!(sheet.is_torn_down());
        assert_eq!(sheet.frame().y0, 800.0);
    }
}
