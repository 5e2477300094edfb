#![forbid(unsafe_code)]

//! Autoplay timer: periodic advance with explicit lifecycle.
//!
//! [`AutoplayTimer`] is a pending deadline, not a thread. The owner polls it
//! with the current time; a due tick is reported once and the next deadline
//! is rescheduled one interval later.
//!
//! # Lifecycle
//!
//! ```text
//! new ──start(now)──► armed ──poll(now) = true──► armed (next interval)
//!                       │
//!      stop / toggle / set_suppressed(.., true)
//!                       ▼
//!                    stopped ──toggle(now)──► armed
//!
//! dispose() from any state: no further ticks, start/toggle become no-ops.
//! ```
//!
//! # Invariants
//!
//! 1. `is_playing()` implies no suppression reason is active.
//! 2. Suppressing stops playback; lifting a suppression never resumes it.
//! 3. Stopping (manual interaction) cancels the pending tick immediately.
//! 4. A late poll fires at most one tick; missed ticks are not replayed.

use bitflags::bitflags;
use web_time::{Duration, Instant};

use crate::config::CarouselConfig;

#[cfg(feature = "tracing")]
use crate::logging::{debug, trace, warn};
#[cfg(not(feature = "tracing"))]
use crate::{debug, trace, warn};

bitflags! {
    /// External reasons autoplay is not allowed to run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Suppression: u8 {
        /// The host asked for autoplay to be paused.
        const EXPLICIT_PAUSE = 1 << 0;
        /// The user prefers reduced motion.
        const REDUCED_MOTION = 1 << 1;
        /// The viewer is not visible.
        const HIDDEN = 1 << 2;
    }
}

impl Suppression {
    /// Initial suppression implied by a configuration.
    #[must_use]
    pub fn from_config(config: &CarouselConfig) -> Self {
        let mut reasons = Self::empty();
        reasons.set(Self::EXPLICIT_PAUSE, config.autoplay_paused);
        reasons.set(Self::REDUCED_MOTION, config.prefers_reduced_motion);
        reasons
    }
}

/// Periodic advance source.
#[derive(Debug, Clone)]
pub struct AutoplayTimer {
    interval: Option<Duration>,
    playing: bool,
    suppressed: Suppression,
    next_tick: Option<Instant>,
    disposed: bool,
}

impl AutoplayTimer {
    /// Create a timer. `interval == None` disables autoplay entirely.
    ///
    /// The timer starts in the playing state when autoplay is enabled and no
    /// suppression applies, but is not armed until [`start`](Self::start).
    #[must_use]
    pub fn new(interval: Option<Duration>, suppressed: Suppression) -> Self {
        Self {
            interval,
            playing: interval.is_some() && suppressed.is_empty(),
            suppressed,
            next_tick: None,
            disposed: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self::new(config.autoplay_interval(), Suppression::from_config(config))
    }

    /// Arm the first tick one interval from `now` if playing.
    ///
    /// Returns whether a tick is now pending.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.disposed || !self.playing {
            return false;
        }
        let Some(interval) = self.interval else {
            return false;
        };
        self.next_tick = Some(now + interval);
        debug!(
            target: "slidekit.autoplay",
            interval_ms = interval.as_millis() as u64,
            "autoplay started"
        );
        true
    }

    /// Stop playback and cancel the pending tick.
    ///
    /// Returns whether playback was active.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.playing;
        self.playing = false;
        self.next_tick = None;
        if was_playing {
            debug!(target: "slidekit.autoplay", "autoplay stopped");
        }
        was_playing
    }

    /// Flip playback. Returns the new playing state.
    ///
    /// Refuses to start while disposed, unconfigured, or suppressed.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.playing {
            self.stop();
            return false;
        }
        if !self.can_play() {
            warn!(
                target: "slidekit.autoplay",
                suppressed = self.suppressed.bits(),
                configured = self.interval.is_some(),
                disposed = self.disposed,
                "autoplay toggle refused"
            );
            return false;
        }
        self.playing = true;
        self.start(now)
    }

    /// Add or lift a suppression reason.
    ///
    /// Adding any reason stops playback. Lifting one leaves playback stopped.
    pub fn set_suppressed(&mut self, reason: Suppression, suppressed: bool) {
        if suppressed {
            self.suppressed.insert(reason);
            self.stop();
        } else {
            self.suppressed.remove(reason);
        }
        debug!(
            target: "slidekit.autoplay",
            reason = reason.bits(),
            suppressed = suppressed,
            "autoplay suppression changed"
        );
    }

    /// Report whether a tick is due at `now`, rescheduling the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (Some(due), Some(interval)) = (self.next_tick, self.interval) else {
            return false;
        };
        if now < due {
            return false;
        }
        let interval_ns = interval.as_nanos().max(1);
        let late_ns = now.duration_since(due).as_nanos() % interval_ns;
        let until_next = u64::try_from(interval_ns - late_ns).unwrap_or(u64::MAX);
        self.next_tick = Some(now + Duration::from_nanos(until_next));
        trace!(target: "slidekit.autoplay", "autoplay tick");
        true
    }

    /// Tear down: cancel the pending tick and refuse to run again.
    pub fn dispose(&mut self) {
        self.stop();
        self.disposed = true;
    }

    /// Whether playback is active.
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether [`toggle`](Self::toggle) could start playback.
    #[must_use]
    pub fn can_play(&self) -> bool {
        !self.disposed && self.interval.is_some() && self.suppressed.is_empty()
    }

    /// Active suppression reasons.
    #[inline]
    #[must_use]
    pub fn suppression(&self) -> Suppression {
        self.suppressed
    }

    /// The configured period, if autoplay is enabled.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// The interval while playing; used to cap transition durations.
    #[must_use]
    pub fn duration_cap(&self) -> Option<Duration> {
        self.interval.filter(|_| self.playing)
    }

    /// When the next tick is due.
    #[inline]
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_250: Duration = Duration::from_millis(250);
    const SEC_1: Duration = Duration::from_secs(1);

    fn playing_timer(now: Instant) -> AutoplayTimer {
        let mut timer = AutoplayTimer::new(Some(SEC_1), Suppression::empty());
        assert!(timer.start(now));
        timer
    }

    #[test]
    fn ticks_every_interval() {
        let t = Instant::now();
        let mut timer = playing_timer(t);
        assert!(!timer.poll(t + MS_100));
        assert!(timer.poll(t + SEC_1));
        assert_eq!(timer.next_deadline(), Some(t + SEC_1 * 2));
        assert!(!timer.poll(t + SEC_1 + MS_100));
        assert!(timer.poll(t + SEC_1 * 2));
    }

    #[test]
    fn late_poll_fires_once_and_realigns() {
        let t = Instant::now();
        let mut timer = playing_timer(t);
        assert!(timer.poll(t + SEC_1 * 3 + MS_250));
        assert_eq!(timer.next_deadline(), Some(t + SEC_1 * 4));
        assert!(!timer.poll(t + SEC_1 * 3 + MS_250));
    }

    #[test]
    fn stop_cancels_pending_tick() {
        let t = Instant::now();
        let mut timer = playing_timer(t);
        assert!(timer.stop());
        assert!(!timer.is_playing());
        assert_eq!(timer.next_deadline(), None);
        assert!(!timer.poll(t + SEC_1 * 5));
        assert!(!timer.stop());
    }

    #[test]
    fn toggle_restarts_from_now() {
        let t = Instant::now();
        let mut timer = playing_timer(t);
        assert!(!timer.toggle(t + MS_100));
        assert!(timer.toggle(t + MS_250));
        assert_eq!(timer.next_deadline(), Some(t + MS_250 + SEC_1));
    }

    #[test]
    fn disabled_autoplay_never_plays() {
        let t = Instant::now();
        let mut timer = AutoplayTimer::new(None, Suppression::empty());
        assert!(!timer.is_playing());
        assert!(!timer.start(t));
        assert!(!timer.toggle(t));
        assert_eq!(timer.duration_cap(), None);
    }

    #[test]
    fn suppression_stops_and_does_not_resume() {
        let t = Instant::now();
        let mut timer = playing_timer(t);
        timer.set_suppressed(Suppression::REDUCED_MOTION, true);
        assert!(!timer.is_playing());
        assert_eq!(timer.next_deadline(), None);

        // Refused while suppressed.
        assert!(!timer.toggle(t + MS_100));

        timer.set_suppressed(Suppression::REDUCED_MOTION, false);
        assert!(!timer.is_playing());
        assert!(timer.toggle(t + MS_250));
    }

    #[test]
    fn reasons_are_independent() {
        let t = Instant::now();
        let mut timer = playing_timer(t);
        timer.set_suppressed(Suppression::EXPLICIT_PAUSE, true);
        timer.set_suppressed(Suppression::HIDDEN, true);
        timer.set_suppressed(Suppression::EXPLICIT_PAUSE, false);
        assert_eq!(timer.suppression(), Suppression::HIDDEN);
        assert!(!timer.can_play());
    }

    #[test]
    fn initially_paused_config_does_not_play() {
        let config = CarouselConfig {
            autoplay: true,
            autoplay_paused: true,
            ..Default::default()
        };
        let mut timer = AutoplayTimer::from_config(&config);
        assert!(!timer.is_playing());
        assert!(!timer.start(Instant::now()));
        assert_eq!(timer.suppression(), Suppression::EXPLICIT_PAUSE);
    }

    #[test]
    fn dispose_is_final() {
        let t = Instant::now();
        let mut timer = playing_timer(t);
        timer.dispose();
        assert!(timer.is_disposed());
        assert!(!timer.poll(t + SEC_1));
        assert!(!timer.toggle(t + SEC_1));
        assert!(!timer.start(t + SEC_1));
    }

    #[test]
    fn duration_cap_only_while_playing() {
        let t = Instant::now();
        let mut timer = playing_timer(t);
        assert_eq!(timer.duration_cap(), Some(SEC_1));
        timer.stop();
        assert_eq!(timer.duration_cap(), None);
    }
}
