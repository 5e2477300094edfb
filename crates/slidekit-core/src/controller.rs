#![forbid(unsafe_code)]

//! Carousel controller: routes every input source into one committed index.
//!
//! [`CarouselController`] composes [`IndexModel`], [`TransitionScheduler`],
//! [`GestureTracker`] and [`AutoplayTimer`] and drives an injected
//! [`RenderSink`]. It is single-threaded and event-driven: every method runs
//! to completion within one input turn and takes the current time explicitly.
//!
//! # Commit ordering
//!
//! Every navigation runs the same fixed sequence:
//!
//! 1. suspend autoplay (manual inputs only),
//! 2. mutate the [`IndexModel`],
//! 3. compute the duration and hand it to the sink (arming the reset),
//! 4. move the strip to the new resting offset,
//! 5. publish the new [`CarouselState`].
//!
//! The sink therefore never observes an index change without a fresh duration
//! already applied.
//!
//! # Concurrency
//!
//! The duration reset and the autoplay tick are independent deadlines fired
//! from [`poll`](CarouselController::poll). The most recent commit wins: an
//! in-flight transition is never protected against a new commit, and an
//! autoplay tick may land while a manual transition is still animating (the
//! duration cap keeps it from overlapping the next tick).
//!
//! # Lifecycle
//!
//! `new` → [`start`](CarouselController::start) (arms autoplay, applies the
//! initial offset) → inputs/polls → [`dispose`](CarouselController::dispose)
//! (cancels both timers). Inputs after `dispose` are ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use web_time::{Duration, Instant};

use crate::autoplay::{AutoplayTimer, Suppression};
use crate::config::CarouselConfig;
use crate::error::CarouselError;
use crate::event::{Command, Input, NavKey};
use crate::gesture::{GestureConfig, GestureTracker, Point, SwipeEvent};
use crate::index::{HorizontalSide, IndexModel, Step};
use crate::render::{RenderSink, SlideOffset};
use crate::transition::{TransitionScheduler, travel_distance};

#[cfg(feature = "tracing")]
use crate::logging::{debug, info};
#[cfg(not(feature = "tracing"))]
use crate::{debug, info};

/// Snapshot published to the rendering collaborator after every mutation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarouselState {
    pub current_index: usize,
    pub slide_count: usize,
    /// Live drag displacement; 0 except mid-drag.
    pub visual_offset_px: f32,
    /// Explicit transition duration still in effect.
    pub transition_duration: Option<Duration>,
    pub is_playing: bool,
    pub is_maximized: bool,
    pub is_dragging: bool,
    pub is_at_left_boundary: bool,
    pub is_at_right_boundary: bool,
}

/// 1-based position for index boards ("3 / 7").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidePosition {
    pub current: usize,
    pub total: usize,
}

impl fmt::Display for SlidePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.current, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Manual,
    Autoplay,
}

/// The composition root.
pub struct CarouselController<S: RenderSink> {
    index: IndexModel,
    transitions: TransitionScheduler,
    gesture: GestureTracker,
    autoplay: AutoplayTimer,
    sink: S,
    container_width_px: f32,
    visual_offset_px: f32,
    is_maximized: bool,
    lifecycle: Lifecycle,
}

impl<S: RenderSink> fmt::Debug for CarouselController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselController")
            .field("index", &self.index.current())
            .field("len", &self.index.len())
            .field("playing", &self.autoplay.is_playing())
            .field("dragging", &self.gesture.is_dragging())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl<S: RenderSink> CarouselController<S> {
    /// Validate `config` and build a controller over `slide_count` slides.
    ///
    /// Nothing is created when validation fails.
    pub fn new(
        config: CarouselConfig,
        slide_count: usize,
        container_width_px: f32,
        sink: S,
    ) -> Result<Self, CarouselError> {
        config.validate()?;
        let index = IndexModel::new(
            slide_count,
            config.initial_index,
            config.topology(),
            config.direction(),
        )?;
        Ok(Self {
            index,
            transitions: TransitionScheduler::from_config(&config),
            gesture: GestureTracker::new(GestureConfig::from(&config)),
            autoplay: AutoplayTimer::from_config(&config),
            sink,
            container_width_px: container_width_px.max(0.0),
            visual_offset_px: 0.0,
            is_maximized: false,
            lifecycle: Lifecycle::Created,
        })
    }

    /// Mount: apply the initial offset and arm autoplay.
    pub fn start(&mut self, now: Instant) {
        if self.lifecycle != Lifecycle::Created {
            return;
        }
        self.lifecycle = Lifecycle::Running;
        self.autoplay.start(now);
        self.sink
            .apply_visual_offset(SlideOffset::at_rest(self.index.current()));
        info!(
            target: "slidekit.controller",
            index = self.index.current(),
            len = self.index.len(),
            playing = self.autoplay.is_playing(),
            "carousel started"
        );
        self.notify();
    }

    /// Tear down: cancel the duration reset and the autoplay tick.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.transitions.cancel();
        self.autoplay.dispose();
        self.gesture.cancel();
        self.visual_offset_px = 0.0;
        self.lifecycle = Lifecycle::Disposed;
        info!(target: "slidekit.controller", "carousel disposed");
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    /// Dispose and hand back the sink.
    pub fn into_sink(mut self) -> S {
        self.dispose();
        self.sink
    }

    // -----------------------------------------------------------------------
    // Event routing
    // -----------------------------------------------------------------------

    /// Route a raw input.
    pub fn handle(&mut self, input: Input, now: Instant) {
        if self.is_disposed() {
            debug!(target: "slidekit.controller", input = ?input, "input after dispose ignored");
            return;
        }
        match input {
            Input::PointerDown {
                at,
                container_width_px,
            } => self.pointer_down(at, container_width_px),
            Input::PointerMove { at } => self.pointer_move(at, now),
            Input::PointerUp { at } => self.pointer_up(at, now),
            Input::PointerCancel => self.pointer_cancel(now),
            Input::Key { key } => self.key(key, now),
            Input::OrientationChange => self.orientation_changed(now),
            Input::Resize { container_width_px } => self.set_container_width(container_width_px),
            Input::ReducedMotion { enabled } => {
                self.set_autoplay_suppressed(Suppression::REDUCED_MOTION, enabled);
            }
            Input::AutoplayPaused { paused } => {
                self.set_autoplay_suppressed(Suppression::EXPLICIT_PAUSE, paused);
            }
            Input::Visibility { visible } => {
                self.set_autoplay_suppressed(Suppression::HIDDEN, !visible);
            }
            Input::Command { command } => self.dispatch(command, now),
        }
    }

    /// Execute a widget command.
    pub fn dispatch(&mut self, command: Command, now: Instant) {
        match command {
            Command::GoLeft => self.go_left(now),
            Command::GoRight => self.go_right(now),
            Command::GoToIndex { index } => self.go_to_index(index, now),
            Command::TogglePlay => {
                self.toggle_play(now);
            }
            Command::ToggleMaximized => self.toggle_maximized(now),
            Command::SetMaximized { maximized } => self.set_maximized(maximized, now),
        }
    }

    /// Fire whichever timers are due at `now`.
    ///
    /// The duration reset fires before the autoplay tick, so a tick landing
    /// on the same instant applies its own fresh duration last.
    pub fn poll(&mut self, now: Instant) {
        if self.is_disposed() {
            return;
        }
        let cleared = self.transitions.poll(now, &mut self.sink);
        if self.autoplay.poll(now) {
            let step = self.index.direction().autoplay_step();
            self.commit_step(step, 0.0, now, Origin::Autoplay);
        } else if cleared {
            self.notify();
        }
    }

    /// Earliest pending deadline across both timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.transitions.pending_reset(), self.autoplay.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Navigate toward the left side.
    pub fn go_left(&mut self, now: Instant) {
        self.go_toward(HorizontalSide::Left, now);
    }

    /// Navigate toward the right side.
    pub fn go_right(&mut self, now: Instant) {
        self.go_toward(HorizontalSide::Right, now);
    }

    fn go_toward(&mut self, side: HorizontalSide, now: Instant) {
        if self.is_disposed() {
            return;
        }
        let step = self.index.step_for(side);
        self.commit_step(step, 0.0, now, Origin::Manual);
    }

    /// Jump to `index`, clamped into range.
    pub fn go_to_index(&mut self, index: isize, now: Instant) {
        if self.is_disposed() {
            return;
        }
        self.suspend_autoplay();
        let from = self.index.current();
        let to = self.index.go_to(index);
        self.finish_commit(from, to, 0.0, now);
    }

    /// Flip autoplay. Returns the new playing state.
    pub fn toggle_play(&mut self, now: Instant) -> bool {
        if self.is_disposed() {
            return false;
        }
        let playing = self.autoplay.toggle(now);
        self.notify();
        playing
    }

    /// Flip the maximized view.
    pub fn toggle_maximized(&mut self, now: Instant) {
        let maximized = !self.is_maximized;
        self.set_maximized(maximized, now);
    }

    /// Enter or leave the maximized view.
    ///
    /// A change counts as manual interaction: autoplay stops and any
    /// in-flight drag is rolled back.
    pub fn set_maximized(&mut self, maximized: bool, now: Instant) {
        if self.is_disposed() || maximized == self.is_maximized {
            return;
        }
        self.suspend_autoplay();
        if self.gesture.cancel().is_some() {
            self.roll_back(self.visual_offset_px, now);
        }
        self.is_maximized = maximized;
        debug!(target: "slidekit.controller", maximized, "maximized view changed");
        self.notify();
    }

    /// Abandon any drag and restore the committed offset (distance 0).
    pub fn orientation_changed(&mut self, now: Instant) {
        if self.is_disposed() {
            return;
        }
        self.gesture.cancel();
        self.roll_back(0.0, now);
    }

    /// Add or lift an autoplay suppression reason.
    pub fn set_autoplay_suppressed(&mut self, reason: Suppression, suppressed: bool) {
        if self.is_disposed() {
            return;
        }
        self.autoplay.set_suppressed(reason, suppressed);
        self.notify();
    }

    /// Update the slide width used for programmatic transitions.
    pub fn set_container_width(&mut self, container_width_px: f32) {
        self.container_width_px = container_width_px.max(0.0);
    }

    /// Replace the slide count, keeping the index valid.
    pub fn set_slide_count(&mut self, slide_count: usize) -> Result<(), CarouselError> {
        let before = self.index.current();
        let after = self.index.resize(slide_count)?;
        if self.gesture.cancel().is_some() {
            self.visual_offset_px = 0.0;
        }
        if before != after || self.visual_offset_px != 0.0 {
            self.visual_offset_px = 0.0;
            self.sink.apply_visual_offset(SlideOffset::at_rest(after));
        }
        self.notify();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Start tracking a drag.
    pub fn pointer_down(&mut self, at: Point, container_width_px: f32) {
        if self.is_disposed() {
            return;
        }
        self.set_container_width(container_width_px);
        self.gesture.pointer_down(at, container_width_px);
    }

    pub fn pointer_move(&mut self, at: Point, now: Instant) {
        if let Some(event) = self.gesture.pointer_move(at) {
            self.on_swipe(event, now);
        }
    }

    pub fn pointer_up(&mut self, at: Point, now: Instant) {
        if let Some(event) = self.gesture.pointer_up(at) {
            self.on_swipe(event, now);
        }
    }

    pub fn pointer_cancel(&mut self, now: Instant) {
        if let Some(event) = self.gesture.cancel() {
            self.on_swipe(event, now);
        }
    }

    fn key(&mut self, key: NavKey, now: Instant) {
        match key {
            NavKey::ArrowLeft => self.go_left(now),
            NavKey::ArrowRight => self.go_right(now),
            NavKey::Escape => self.set_maximized(false, now),
        }
    }

    fn on_swipe(&mut self, event: SwipeEvent, now: Instant) {
        if self.is_disposed() {
            return;
        }
        match event {
            SwipeEvent::Move { dx } => self.preview(dx),
            // Dragging left pulls in the slide on the right.
            SwipeEvent::EndLeft { dx } => {
                let step = self.index.step_for(HorizontalSide::Right);
                self.commit_step(step, dx, now, Origin::Manual);
            }
            SwipeEvent::EndRight { dx } => {
                let step = self.index.step_for(HorizontalSide::Left);
                self.commit_step(step, dx, now, Origin::Manual);
            }
            SwipeEvent::EndDisqualified { .. } | SwipeEvent::Cancelled { .. } => {
                self.roll_back(self.visual_offset_px, now);
            }
            SwipeEvent::EndDown => {
                if self.is_maximized {
                    self.suspend_autoplay();
                    self.is_maximized = false;
                    debug!(target: "slidekit.controller", "maximized view dismissed by swipe");
                }
                self.roll_back(self.visual_offset_px, now);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Commit path
    // -----------------------------------------------------------------------

    fn preview(&mut self, dx: f32) {
        self.suspend_autoplay();
        self.visual_offset_px = dx;
        self.sink.apply_visual_offset(SlideOffset {
            index: self.index.current(),
            displacement_px: dx,
        });
        self.notify();
    }

    fn commit_step(&mut self, step: Step, displacement_px: f32, now: Instant, origin: Origin) {
        if origin == Origin::Manual {
            self.suspend_autoplay();
        }
        let from = self.index.current();
        let to = self.index.advance(step);
        self.finish_commit(from, to, displacement_px, now);
    }

    fn roll_back(&mut self, displacement_px: f32, now: Instant) {
        let current = self.index.current();
        self.finish_commit(current, current, displacement_px, now);
    }

    fn finish_commit(&mut self, from: usize, to: usize, displacement_px: f32, now: Instant) {
        let moved = from != to;
        let distance = travel_distance(self.container_width_px, displacement_px, moved);
        let duration = self.transitions.duration_for(
            distance,
            self.container_width_px,
            self.autoplay.duration_cap(),
        );
        self.transitions
            .schedule_duration_reset(duration, now, &mut self.sink);
        self.visual_offset_px = 0.0;
        self.sink.apply_visual_offset(SlideOffset::at_rest(to));
        debug!(
            target: "slidekit.controller",
            from,
            to,
            distance_px = distance,
            duration_ms = duration.as_millis() as u64,
            "{}",
            if moved { "index committed" } else { "rolled back" }
        );
        self.notify();
    }

    fn suspend_autoplay(&mut self) {
        if self.autoplay.stop() {
            debug!(target: "slidekit.controller", "autoplay suspended by manual interaction");
        }
    }

    fn notify(&mut self) {
        let state = self.state();
        self.sink.state_changed(&state);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Snapshot of everything a renderer needs.
    #[must_use]
    pub fn state(&self) -> CarouselState {
        CarouselState {
            current_index: self.index.current(),
            slide_count: self.index.len(),
            visual_offset_px: self.visual_offset_px,
            transition_duration: self.transitions.active_duration(),
            is_playing: self.autoplay.is_playing(),
            is_maximized: self.is_maximized,
            is_dragging: self.gesture.is_dragging(),
            is_at_left_boundary: self.is_at_left_boundary(),
            is_at_right_boundary: self.is_at_right_boundary(),
        }
    }

    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index.current()
    }

    #[inline]
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.index.len()
    }

    #[inline]
    #[must_use]
    pub fn visual_offset_px(&self) -> f32 {
        self.visual_offset_px
    }

    #[inline]
    #[must_use]
    pub fn transition_duration(&self) -> Option<Duration> {
        self.transitions.active_duration()
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.autoplay.is_playing()
    }

    #[inline]
    #[must_use]
    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Whether the left arrow should be disabled.
    #[must_use]
    pub fn is_at_left_boundary(&self) -> bool {
        self.index.is_at_boundary(HorizontalSide::Left)
    }

    /// Whether the right arrow should be disabled.
    #[must_use]
    pub fn is_at_right_boundary(&self) -> bool {
        self.index.is_at_boundary(HorizontalSide::Right)
    }

    #[must_use]
    pub fn can_advance(&self, step: Step) -> bool {
        self.index.can_advance(step)
    }

    #[must_use]
    pub fn all_valid_indices(&self) -> Range<usize> {
        self.index.all_valid_indices()
    }

    /// The command an indicator or thumbnail for `index` should dispatch.
    #[must_use]
    pub fn go_to_index_callback(&self, index: isize) -> Command {
        Command::GoToIndex {
            index: self.index.clamp(index) as isize,
        }
    }

    /// One command per valid index.
    #[must_use]
    pub fn go_to_index_callbacks(&self) -> BTreeMap<usize, Command> {
        self.all_valid_indices()
            .map(|i| (i, self.go_to_index_callback(i as isize)))
            .collect()
    }

    /// 1-based position for an index board.
    #[must_use]
    pub fn position(&self) -> SlidePosition {
        SlidePosition {
            current: self.index.current() + 1,
            total: self.index.len(),
        }
    }

    /// The index the active drag would commit to, for live labels.
    #[must_use]
    pub fn preview_index(&self) -> Option<usize> {
        let (dx, _) = self.gesture.displacement()?;
        let side = if dx < 0.0 {
            HorizontalSide::Right
        } else if dx > 0.0 {
            HorizontalSide::Left
        } else {
            return Some(self.index.current());
        };
        Some(self.index.peek(self.index.step_for(side)))
    }

    /// Slides a lazy-loading renderer should keep displayed.
    #[must_use]
    pub fn preload_window(&self, radius: usize) -> Vec<usize> {
        self.index.preload_window(radius)
    }

    #[must_use]
    pub fn index_model(&self) -> &IndexModel {
        &self.index
    }

    #[must_use]
    pub fn autoplay(&self) -> &AutoplayTimer {
        &self.autoplay
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
