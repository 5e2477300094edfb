#![forbid(unsafe_code)]

//! Rendering capability consumed by the controller.
//!
//! The core never touches pixels. It drives an injected [`RenderSink`] with
//! three primitives (offset, duration, clear) and an optional state
//! notification. [`RenderLog`] is a sink that records every call, for hosts
//! that batch updates and for tests asserting call order.

use web_time::Duration;

use crate::controller::CarouselState;
use crate::index::Direction;

/// Visual position of the slide strip.
///
/// `displacement_px` is the raw horizontal pointer delta in screen space.
/// The sink lays slides out in reading order, so under
/// [`Direction::Rtl`] the strip is mirrored: slide `index + 1` sits to the
/// left of slide `index`. [`SlideOffset::translate_px`] gives the resulting
/// screen translation for either direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlideOffset {
    /// Committed slide index.
    pub index: usize,
    /// Live drag displacement in px (0 at rest).
    pub displacement_px: f32,
}

impl SlideOffset {
    /// Horizontal translation of the strip in screen px.
    ///
    /// `-index * width + displacement` under LTR and
    /// `index * width + displacement` under RTL.
    #[must_use]
    pub fn translate_px(self, container_width_px: f32, direction: Direction) -> f32 {
        let slides_px = self.index as f32 * container_width_px;
        match direction {
            Direction::Ltr => self.displacement_px - slides_px,
            Direction::Rtl => self.displacement_px + slides_px,
        }
    }

    /// Resting offset for `index`.
    #[inline]
    #[must_use]
    pub const fn at_rest(index: usize) -> Self {
        Self {
            index,
            displacement_px: 0.0,
        }
    }
}

/// The rendering collaborator.
pub trait RenderSink {
    /// Move the slide strip to `offset`.
    fn apply_visual_offset(&mut self, offset: SlideOffset);

    /// Animate subsequent offset changes over `duration`.
    fn apply_transition_duration(&mut self, duration: Duration);

    /// Drop the explicit duration so later offset changes are instantaneous.
    fn clear_transition_duration(&mut self);

    /// Called after every controller mutation with the fresh snapshot.
    fn state_changed(&mut self, _state: &CarouselState) {}
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn apply_visual_offset(&mut self, offset: SlideOffset) {
        (**self).apply_visual_offset(offset);
    }

    fn apply_transition_duration(&mut self, duration: Duration) {
        (**self).apply_transition_duration(duration);
    }

    fn clear_transition_duration(&mut self) {
        (**self).clear_transition_duration();
    }

    fn state_changed(&mut self, state: &CarouselState) {
        (**self).state_changed(state);
    }
}

/// One recorded [`RenderSink`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Offset(SlideOffset),
    Duration(Duration),
    ClearDuration,
    State(CarouselState),
}

/// A [`RenderSink`] that records calls in order.
#[derive(Debug, Clone, Default)]
pub struct RenderLog {
    ops: Vec<RenderOp>,
}

impl RenderLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }

    /// The most recent offset applied, if any.
    #[must_use]
    pub fn last_offset(&self) -> Option<SlideOffset> {
        self.ops.iter().rev().find_map(|op| match op {
            RenderOp::Offset(o) => Some(*o),
            _ => None,
        })
    }

    /// The explicit duration currently in effect, per the recorded calls.
    #[must_use]
    pub fn active_duration(&self) -> Option<Duration> {
        self.ops.iter().rev().find_map(|op| match op {
            RenderOp::Duration(d) => Some(Some(*d)),
            RenderOp::ClearDuration => Some(None),
            _ => None,
        })?
    }

    /// The most recent state notification, if any.
    #[must_use]
    pub fn last_state(&self) -> Option<&CarouselState> {
        self.ops.iter().rev().find_map(|op| match op {
            RenderOp::State(s) => Some(s),
            _ => None,
        })
    }
}

impl RenderSink for RenderLog {
    fn apply_visual_offset(&mut self, offset: SlideOffset) {
        self.ops.push(RenderOp::Offset(offset));
    }

    fn apply_transition_duration(&mut self, duration: Duration) {
        self.ops.push(RenderOp::Duration(duration));
    }

    fn clear_transition_duration(&mut self) {
        self.ops.push(RenderOp::ClearDuration);
    }

    fn state_changed(&mut self, state: &CarouselState) {
        self.ops.push(RenderOp::State(state.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_duration_tracks_clear() {
        let mut log = RenderLog::new();
        assert_eq!(log.active_duration(), None);
        log.apply_transition_duration(Duration::from_millis(200));
        assert_eq!(log.active_duration(), Some(Duration::from_millis(200)));
        log.apply_visual_offset(SlideOffset::at_rest(1));
        assert_eq!(log.active_duration(), Some(Duration::from_millis(200)));
        log.clear_transition_duration();
        assert_eq!(log.active_duration(), None);
    }

    #[test]
    fn rtl_strip_translates_mirrored() {
        let rest = SlideOffset::at_rest(2);
        assert_eq!(rest.translate_px(300.0, Direction::Ltr), -600.0);
        assert_eq!(rest.translate_px(300.0, Direction::Rtl), 600.0);

        // A leftward drag pulls the strip left in screen space either way.
        let dragging = SlideOffset {
            index: 1,
            displacement_px: -40.0,
        };
        assert_eq!(dragging.translate_px(300.0, Direction::Ltr), -340.0);
        assert_eq!(dragging.translate_px(300.0, Direction::Rtl), 260.0);
    }

    #[test]
    fn drain_empties_log() {
        let mut log = RenderLog::new();
        log.apply_visual_offset(SlideOffset::at_rest(3));
        assert_eq!(log.last_offset(), Some(SlideOffset::at_rest(3)));
        assert_eq!(log.drain().len(), 1);
        assert!(log.ops().is_empty());
    }

    #[test]
    fn sink_works_through_mut_reference() {
        fn drive(mut sink: impl RenderSink) {
            sink.clear_transition_duration();
        }
        let mut log = RenderLog::new();
        drive(&mut log);
        assert_eq!(log.ops(), &[RenderOp::ClearDuration]);
    }
}
