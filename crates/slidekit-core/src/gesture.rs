#![forbid(unsafe_code)]

//! Swipe interpretation: pointer drag stream → preview / commit / rollback.
//!
//! [`GestureTracker`] turns pointer-down → move* → up sequences into
//! [`SwipeEvent`]s. It keeps one ephemeral sample while a drag is active and
//! nothing in between gestures.
//!
//! # State Machine
//!
//! ```text
//!            pointer_down
//!   Idle ─────────────────► Dragging ──┐ pointer_move → Move { dx }
//!    ▲                         │  ▲────┘
//!    └──── pointer_up/cancel ──┘
//! ```
//!
//! At pointer-up the dominant axis of the total displacement decides:
//!
//! | axis | condition | event |
//! |---|---|---|
//! | horizontal | `|dx| >= threshold * width`, `dx < 0` | `EndLeft` |
//! | horizontal | `|dx| >= threshold * width`, `dx > 0` | `EndRight` |
//! | horizontal | below threshold (or `dx == 0`) | `EndDisqualified` |
//! | vertical | `dy > dismiss_deadzone_px` | `EndDown` |
//! | vertical | otherwise | `EndDisqualified` |
//!
//! # Invariants
//!
//! 1. Exactly one `End*` or `Cancelled` event closes every started drag.
//! 2. `Move` is only emitted while the dominant axis is horizontal, except for
//!    a single `Move { dx: 0 }` when the axis flips to vertical so the live
//!    preview collapses back to rest.
//! 3. After `pointer_up` or `cancel`, the tracker is idle again.

use crate::config::{CarouselConfig, DEFAULT_DISMISS_DEADZONE_PX, DEFAULT_SWIPE_THRESHOLD};

#[cfg(feature = "tracing")]
use crate::logging::debug;
#[cfg(not(feature = "tracing"))]
use crate::debug;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for swipe interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Fraction of the container width a drag must cover to commit (default: 0.05).
    pub threshold: f32,
    /// Downward travel (px) before a vertical drag dismisses (default: 16).
    pub dismiss_deadzone_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SWIPE_THRESHOLD,
            dismiss_deadzone_px: DEFAULT_DISMISS_DEADZONE_PX,
        }
    }
}

impl From<&CarouselConfig> for GestureConfig {
    fn from(config: &CarouselConfig) -> Self {
        Self {
            threshold: config.swipe_threshold,
            dismiss_deadzone_px: config.dismiss_deadzone_px,
        }
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A pointer position in px.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Decisions produced by [`GestureTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEvent {
    /// Live horizontal displacement for previewing.
    Move { dx: f32 },
    /// Committed drag toward the left.
    EndLeft { dx: f32 },
    /// Committed drag toward the right.
    EndRight { dx: f32 },
    /// Drag too short (or not horizontal); roll back.
    EndDisqualified { dx: f32 },
    /// Downward dismiss gesture.
    EndDown,
    /// Drag abandoned by an external event before pointer-up.
    Cancelled { dx: f32 },
}

/// Whether a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn dominant(dx: f32, dy: f32) -> Self {
        if dx.abs() >= dy.abs() {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }
}

/// Ephemeral state of one drag.
#[derive(Debug, Clone, Copy)]
struct GestureSample {
    start: Point,
    dx: f32,
    dy: f32,
    container_width_px: f32,
    /// Dominant axis as of the last move; `None` until the pointer moves.
    axis: Option<Axis>,
}

// ---------------------------------------------------------------------------
// GestureTracker
// ---------------------------------------------------------------------------

/// Stateful swipe interpreter.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    config: GestureConfig,
    sample: Option<GestureSample>,
}

impl GestureTracker {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            sample: None,
        }
    }

    /// Begin a drag at `at` over a container `container_width_px` wide.
    ///
    /// A stale sample from an unterminated drag is discarded.
    pub fn pointer_down(&mut self, at: Point, container_width_px: f32) {
        self.sample = Some(GestureSample {
            start: at,
            dx: 0.0,
            dy: 0.0,
            container_width_px: container_width_px.max(0.0),
            axis: None,
        });
    }

    /// Update the drag; returns a preview event when one should be rendered.
    pub fn pointer_move(&mut self, at: Point) -> Option<SwipeEvent> {
        let sample = self.sample.as_mut()?;
        sample.dx = at.x - sample.start.x;
        sample.dy = at.y - sample.start.y;

        let axis = Axis::dominant(sample.dx, sample.dy);
        let previous = sample.axis.replace(axis);
        match (previous, axis) {
            (_, Axis::Horizontal) => Some(SwipeEvent::Move { dx: sample.dx }),
            (Some(Axis::Horizontal), Axis::Vertical) => Some(SwipeEvent::Move { dx: 0.0 }),
            (_, Axis::Vertical) => None,
        }
    }

    /// Finish the drag at `at` and decide its outcome.
    ///
    /// Returns `None` when no drag was active.
    pub fn pointer_up(&mut self, at: Point) -> Option<SwipeEvent> {
        let mut sample = self.sample.take()?;
        sample.dx = at.x - sample.start.x;
        sample.dy = at.y - sample.start.y;
        let event = self.resolve(&sample);
        debug!(
            target: "slidekit.gesture",
            dx = sample.dx,
            dy = sample.dy,
            outcome = ?event,
            "swipe resolved"
        );
        Some(event)
    }

    /// Abandon the active drag, if any.
    pub fn cancel(&mut self) -> Option<SwipeEvent> {
        let sample = self.sample.take()?;
        debug!(target: "slidekit.gesture", dx = sample.dx, "swipe cancelled");
        Some(SwipeEvent::Cancelled { dx: sample.dx })
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        if self.sample.is_some() {
            GesturePhase::Dragging
        } else {
            GesturePhase::Idle
        }
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.sample.is_some()
    }

    /// Displacement `(dx, dy)` of the active drag.
    #[must_use]
    pub fn displacement(&self) -> Option<(f32, f32)> {
        self.sample.map(|s| (s.dx, s.dy))
    }

    /// Minimum `|dx|` (px) for the active drag to commit.
    #[must_use]
    pub fn threshold_px(&self) -> Option<f32> {
        self.sample
            .map(|s| self.config.threshold * s.container_width_px)
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replace the configuration; an active drag keeps its sample.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    fn resolve(&self, sample: &GestureSample) -> SwipeEvent {
        let GestureSample { dx, dy, .. } = *sample;
        match Axis::dominant(dx, dy) {
            Axis::Horizontal => {
                let threshold_px = self.config.threshold * sample.container_width_px;
                if dx == 0.0 || dx.abs() < threshold_px {
                    SwipeEvent::EndDisqualified { dx }
                } else if dx < 0.0 {
                    SwipeEvent::EndLeft { dx }
                } else {
                    SwipeEvent::EndRight { dx }
                }
            }
            Axis::Vertical if dy > self.config.dismiss_deadzone_px => SwipeEvent::EndDown,
            Axis::Vertical => SwipeEvent::EndDisqualified { dx },
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
