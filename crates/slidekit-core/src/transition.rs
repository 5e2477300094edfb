#![forbid(unsafe_code)]

//! Transition timing: distance-to-duration mapping and the one-shot reset.
//!
//! Every commit animates the slide strip over a duration derived from the
//! distance still to travel:
//!
//! ```text
//! base = distance_px / speed_px_per_ms
//! d    = max(base, min)            if min configured
//! d    = min(d, max)               if max configured   (max wins over min)
//! d    = min(d, autoplay_interval) if autoplay is playing
//! ```
//!
//! The duration is applied to the render sink, then cleared once it has
//! elapsed so that later, non-animated offset changes (drag preview frames)
//! land instantly. Only one reset is ever pending; a new commit replaces it.
//!
//! # Invariants
//!
//! 1. `compute_duration` never exceeds `max` when one is given.
//! 2. At most one reset deadline is pending (last write wins).
//! 3. `cancel()` drops the pending reset without calling the sink.

use web_time::{Duration, Instant};

use crate::config::CarouselConfig;
use crate::render::RenderSink;

#[cfg(feature = "tracing")]
use crate::logging::trace;
#[cfg(not(feature = "tracing"))]
use crate::trace;

/// Inputs to [`compute_duration`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    /// Distance to animate over. `None` means a full slide (`container_width_px`).
    pub distance_px: Option<f32>,
    /// Width of one slide.
    pub container_width_px: f32,
    /// Animation speed; must be > 0.
    pub speed_px_per_ms: f32,
    /// Floor on the duration.
    pub min: Option<Duration>,
    /// Ceiling on the duration; applied after the floor.
    pub max: Option<Duration>,
    /// Autoplay interval while autoplay is playing.
    pub autoplay_cap: Option<Duration>,
}

/// Map a travel distance to an animation duration.
#[must_use]
pub fn compute_duration(request: &TransitionRequest) -> Duration {
    let distance = request
        .distance_px
        .unwrap_or(request.container_width_px)
        .abs();
    let base_ms = if request.speed_px_per_ms > 0.0 && distance.is_finite() {
        f64::from(distance) / f64::from(request.speed_px_per_ms)
    } else {
        0.0
    };
    let mut duration = millis_f64(base_ms);

    if let Some(min) = request.min
        && duration < min
    {
        duration = min;
    }
    if let Some(max) = request.max
        && duration > max
    {
        duration = max;
    }
    if let Some(cap) = request.autoplay_cap
        && duration > cap
    {
        duration = cap;
    }
    duration
}

/// Distance left to animate after a gesture resolves.
///
/// A committed move finishes the slide the drag started (`|width - |dx||`);
/// a rollback returns the displacement to rest (`|dx|`). Buttons, keys and
/// autoplay have `dx = 0`, so a commit travels exactly one width.
#[must_use]
pub fn travel_distance(container_width_px: f32, displacement_px: f32, committed: bool) -> f32 {
    let swiped = displacement_px.abs();
    if committed {
        (container_width_px - swiped).abs()
    } else {
        swiped
    }
}

fn millis_f64(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_nanos((ms * 1_000_000.0).round().min(u64::MAX as f64) as u64)
    } else {
        Duration::ZERO
    }
}

/// Owns the configured speed and bounds plus the single pending reset.
#[derive(Debug, Clone)]
pub struct TransitionScheduler {
    speed_px_per_ms: f32,
    min: Option<Duration>,
    max: Option<Duration>,
    active: Option<Duration>,
    reset_at: Option<Instant>,
}

impl TransitionScheduler {
    /// Create a scheduler. `speed_px_per_ms` is expected to be validated.
    #[must_use]
    pub fn new(speed_px_per_ms: f32, min: Option<Duration>, max: Option<Duration>) -> Self {
        Self {
            speed_px_per_ms,
            min,
            max,
            active: None,
            reset_at: None,
        }
    }

    /// Create a scheduler from a validated configuration.
    #[must_use]
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(
            config.transition_speed,
            config.transition_duration_min(),
            config.transition_duration_max(),
        )
    }

    /// Duration for travelling `distance_px` with this scheduler's settings.
    #[must_use]
    pub fn duration_for(
        &self,
        distance_px: f32,
        container_width_px: f32,
        autoplay_cap: Option<Duration>,
    ) -> Duration {
        compute_duration(&TransitionRequest {
            distance_px: Some(distance_px),
            container_width_px,
            speed_px_per_ms: self.speed_px_per_ms,
            min: self.min,
            max: self.max,
            autoplay_cap,
        })
    }

    /// Apply `duration` to the sink and arm the reset for `now + duration`.
    ///
    /// A zero duration is cleared immediately. Any previously pending reset
    /// is replaced.
    pub fn schedule_duration_reset<S: RenderSink + ?Sized>(
        &mut self,
        duration: Duration,
        now: Instant,
        sink: &mut S,
    ) {
        sink.apply_transition_duration(duration);
        trace!(
            target: "slidekit.transition",
            duration_ms = duration.as_millis() as u64,
            replaced = self.reset_at.is_some(),
            "transition duration applied"
        );
        if duration.is_zero() {
            self.active = None;
            self.reset_at = None;
            sink.clear_transition_duration();
        } else {
            self.active = Some(duration);
            self.reset_at = Some(now + duration);
        }
    }

    /// Fire the reset if it is due. Returns `true` when the sink was cleared.
    pub fn poll<S: RenderSink + ?Sized>(&mut self, now: Instant, sink: &mut S) -> bool {
        match self.reset_at {
            Some(at) if now >= at => {
                self.reset_at = None;
                self.active = None;
                sink.clear_transition_duration();
                trace!(target: "slidekit.transition", "transition duration cleared");
                true
            }
            _ => false,
        }
    }

    /// Drop any pending reset without touching the sink.
    pub fn cancel(&mut self) {
        self.reset_at = None;
        self.active = None;
    }

    /// The explicit duration currently applied, if not yet cleared.
    #[inline]
    #[must_use]
    pub fn active_duration(&self) -> Option<Duration> {
        self.active
    }

    /// When the pending reset fires.
    #[inline]
    #[must_use]
    pub fn pending_reset(&self) -> Option<Instant> {
        self.reset_at
    }

    #[inline]
    #[must_use]
    pub fn speed_px_per_ms(&self) -> f32 {
        self.speed_px_per_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderLog, RenderOp};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn request(distance: f32) -> TransitionRequest {
        TransitionRequest {
            distance_px: Some(distance),
            container_width_px: 300.0,
            speed_px_per_ms: 1.0,
            min: None,
            max: None,
            autoplay_cap: None,
        }
    }

    #[test]
    fn base_duration_is_distance_over_speed() {
        let mut req = request(450.0);
        req.speed_px_per_ms = 1.5;
        assert_eq!(compute_duration(&req), ms(300));
    }

    #[test]
    fn missing_distance_defaults_to_container_width() {
        let mut req = request(0.0);
        req.distance_px = None;
        assert_eq!(compute_duration(&req), ms(300));
    }

    #[test]
    fn max_wins_over_min() {
        for distance in [0.0, 100.0, 350.0, 10_000.0] {
            let req = TransitionRequest {
                min: Some(ms(500)),
                max: Some(ms(200)),
                ..request(distance)
            };
            assert_eq!(compute_duration(&req), ms(200), "distance {distance}");
        }
    }

    #[test]
    fn zero_distance_is_zero_without_min() {
        assert_eq!(compute_duration(&request(0.0)), Duration::ZERO);
        let req = TransitionRequest {
            min: Some(ms(120)),
            ..request(0.0)
        };
        assert_eq!(compute_duration(&req), ms(120));
    }

    #[test]
    fn autoplay_caps_duration() {
        let req = TransitionRequest {
            autoplay_cap: Some(ms(800)),
            ..request(2000.0)
        };
        assert_eq!(compute_duration(&req), ms(800));

        let short = TransitionRequest {
            autoplay_cap: Some(ms(800)),
            ..request(100.0)
        };
        assert_eq!(compute_duration(&short), ms(100));
    }

    #[test]
    fn negative_distance_uses_magnitude() {
        assert_eq!(compute_duration(&request(-150.0)), ms(150));
    }

    #[test]
    fn travel_distance_commit_and_rollback() {
        assert_eq!(travel_distance(300.0, -40.0, true), 260.0);
        assert_eq!(travel_distance(300.0, -40.0, false), 40.0);
        assert_eq!(travel_distance(300.0, 0.0, true), 300.0);
        assert_eq!(travel_distance(300.0, 0.0, false), 0.0);
        // Overshooting drags still travel a positive distance back.
        assert_eq!(travel_distance(300.0, 360.0, true), 60.0);
    }

    #[test]
    fn reset_fires_after_duration() {
        let t = Instant::now();
        let mut sched = TransitionScheduler::new(1.0, None, None);
        let mut log = RenderLog::new();

        sched.schedule_duration_reset(ms(250), t, &mut log);
        assert_eq!(sched.active_duration(), Some(ms(250)));
        assert_eq!(sched.pending_reset(), Some(t + ms(250)));

        assert!(!sched.poll(t + ms(249), &mut log));
        assert!(sched.poll(t + ms(250), &mut log));
        assert!(!sched.poll(t + ms(400), &mut log));
        assert_eq!(
            log.ops(),
            &[RenderOp::Duration(ms(250)), RenderOp::ClearDuration]
        );
        assert_eq!(sched.active_duration(), None);
    }

    #[test]
    fn new_commit_replaces_pending_reset() {
        let t = Instant::now();
        let mut sched = TransitionScheduler::new(1.0, None, None);
        let mut log = RenderLog::new();

        sched.schedule_duration_reset(ms(300), t, &mut log);
        sched.schedule_duration_reset(ms(300), t + ms(200), &mut log);

        // The first deadline passes without a clear.
        assert!(!sched.poll(t + ms(300), &mut log));
        assert!(sched.poll(t + ms(500), &mut log));
        let clears = log
            .ops()
            .iter()
            .filter(|op| matches!(op, RenderOp::ClearDuration))
            .count();
        assert_eq!(clears, 1);
    }

    #[test]
    fn zero_duration_clears_immediately() {
        let t = Instant::now();
        let mut sched = TransitionScheduler::new(1.0, None, None);
        let mut log = RenderLog::new();
        sched.schedule_duration_reset(Duration::ZERO, t, &mut log);
        assert_eq!(sched.pending_reset(), None);
        assert_eq!(
            log.ops(),
            &[RenderOp::Duration(Duration::ZERO), RenderOp::ClearDuration]
        );
    }

    #[test]
    fn cancel_does_not_touch_sink() {
        let t = Instant::now();
        let mut sched = TransitionScheduler::new(1.0, None, None);
        let mut log = RenderLog::new();
        sched.schedule_duration_reset(ms(100), t, &mut log);
        sched.cancel();
        assert!(!sched.poll(t + ms(200), &mut log));
        assert_eq!(log.ops(), &[RenderOp::Duration(ms(100))]);
    }

    #[test]
    fn from_config_uses_bounds() {
        let config = CarouselConfig {
            transition_speed: 2.0,
            transition_duration_min_ms: Some(100),
            transition_duration_max_ms: Some(400),
            ..Default::default()
        };
        let sched = TransitionScheduler::from_config(&config);
        assert_eq!(sched.duration_for(20.0, 300.0, None), ms(100));
        assert_eq!(sched.duration_for(600.0, 300.0, None), ms(300));
        assert_eq!(sched.duration_for(6000.0, 300.0, None), ms(400));
    }
}
