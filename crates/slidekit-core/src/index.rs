#![forbid(unsafe_code)]

//! Index model: the single committed position among `N` slides.
//!
//! [`IndexModel`] owns `current`, the topology (ring or bounded interval) and
//! the direction convention that maps visual sides to logical steps.
//!
//! # Invariants
//!
//! 1. `0 <= current < len` at all times, for both topologies.
//! 2. `len >= 1`; an empty collection is rejected at construction.
//! 3. With `len == 1`, [`can_advance`](IndexModel::can_advance) is always false.
//! 4. [`advance`](IndexModel::advance) never fails: an illegal bounded move is
//!    a no-op returning the unchanged index.
//! 5. [`go_to`](IndexModel::go_to) clamps any integer into range.
//!
//! There is no provisional/mid-drag value here. Drag previews live in the
//! controller as a pixel displacement and reach this model only once resolved.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::error::CarouselError;

/// A visual side of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalSide {
    Left,
    Right,
}

/// A logical index delta of ±1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `index - 1`.
    Backward,
    /// `index + 1`.
    Forward,
}

impl Step {
    /// Signed delta (`-1` or `+1`).
    #[inline]
    #[must_use]
    pub const fn delta(self) -> isize {
        match self {
            Self::Backward => -1,
            Self::Forward => 1,
        }
    }

    /// The opposite step.
    #[inline]
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Backward => Self::Forward,
            Self::Forward => Self::Backward,
        }
    }
}

/// Direction convention: which visual side a logical step moves toward.
///
/// Under [`Ltr`](Direction::Ltr) the next slide sits to the right, so moving
/// right is [`Step::Forward`]. [`Rtl`](Direction::Rtl) flips the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// The logical step that navigates toward `side`.
    #[inline]
    #[must_use]
    pub const fn step_toward(self, side: HorizontalSide) -> Step {
        match (self, side) {
            (Self::Ltr, HorizontalSide::Right) | (Self::Rtl, HorizontalSide::Left) => {
                Step::Forward
            }
            (Self::Ltr, HorizontalSide::Left) | (Self::Rtl, HorizontalSide::Right) => {
                Step::Backward
            }
        }
    }

    /// The visual side `step` navigates toward.
    #[inline]
    #[must_use]
    pub const fn side_of(self, step: Step) -> HorizontalSide {
        match (self, step) {
            (Self::Ltr, Step::Forward) | (Self::Rtl, Step::Backward) => HorizontalSide::Right,
            (Self::Ltr, Step::Backward) | (Self::Rtl, Step::Forward) => HorizontalSide::Left,
        }
    }

    /// The step autoplay advances by: the next slide in reading order.
    ///
    /// Always [`Step::Forward`]; visually rightward under LTR and leftward
    /// under RTL.
    #[inline]
    #[must_use]
    pub const fn autoplay_step(self) -> Step {
        Step::Forward
    }
}

/// Shape of the index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    /// Ring `Z/N`: stepping off either end wraps.
    #[default]
    Loop,
    /// Closed interval `[0, N-1]`: stepping off an end is rejected.
    Bounded,
}

/// Committed position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexModel {
    len: usize,
    current: usize,
    topology: Topology,
    direction: Direction,
}

impl IndexModel {
    /// Create a model over `len` slides starting at `initial` (clamped).
    pub fn new(
        len: usize,
        initial: usize,
        topology: Topology,
        direction: Direction,
    ) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::NoSlides);
        }
        Ok(Self {
            len,
            current: initial.min(len - 1),
            topology,
            direction,
        })
    }

    /// Number of slides.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: the model holds at least one slide.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The committed index.
    #[inline]
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether `step` from the current index stays inside the index space.
    #[must_use]
    pub fn can_advance(&self, step: Step) -> bool {
        if self.len == 1 {
            return false;
        }
        match (self.topology, step) {
            (Topology::Loop, _) => true,
            (Topology::Bounded, Step::Forward) => self.current + 1 < self.len,
            (Topology::Bounded, Step::Backward) => self.current > 0,
        }
    }

    /// The index `step` would produce, without committing it.
    ///
    /// Returns the current index when the move is illegal.
    #[must_use]
    pub fn peek(&self, step: Step) -> usize {
        if !self.can_advance(step) {
            return self.current;
        }
        let len = self.len as isize;
        (self.current as isize + step.delta()).rem_euclid(len) as usize
    }

    /// Commit `step` and return the new index (unchanged if illegal).
    pub fn advance(&mut self, step: Step) -> usize {
        self.current = self.peek(step);
        self.current
    }

    /// Commit an explicit index, clamped into `[0, len)`.
    pub fn go_to(&mut self, index: isize) -> usize {
        self.current = self.clamp(index);
        self.current
    }

    /// Clamp an arbitrary integer into `[0, len)`.
    #[must_use]
    pub fn clamp(&self, index: isize) -> usize {
        usize::try_from(index).map_or(0, |i| i.min(self.len - 1))
    }

    /// Every selectable index, ascending.
    #[must_use]
    pub fn all_valid_indices(&self) -> Range<usize> {
        0..self.len
    }

    /// The logical step that moves toward `side` under this model's direction.
    #[inline]
    #[must_use]
    pub fn step_for(&self, side: HorizontalSide) -> Step {
        self.direction.step_toward(side)
    }

    /// Whether navigating toward `side` is impossible from here.
    #[must_use]
    pub fn is_at_boundary(&self, side: HorizontalSide) -> bool {
        !self.can_advance(self.step_for(side))
    }

    /// Replace the slide count, keeping `current` valid.
    pub fn resize(&mut self, len: usize) -> Result<usize, CarouselError> {
        if len == 0 {
            return Err(CarouselError::NoSlides);
        }
        self.len = len;
        self.current = self.current.min(len - 1);
        Ok(self.current)
    }

    /// Indices within `radius` steps of the current one, ascending.
    ///
    /// Wraps around under [`Topology::Loop`]; truncates at the ends under
    /// [`Topology::Bounded`]. Always includes the current index.
    #[must_use]
    pub fn preload_window(&self, radius: usize) -> Vec<usize> {
        let radius = match self.topology {
            Topology::Loop => radius.min(self.len / 2 + 1),
            Topology::Bounded => radius.min(self.len - 1),
        };
        let mut window = BTreeSet::new();
        window.insert(self.current);
        for d in 1..=radius {
            match self.topology {
                Topology::Loop => {
                    window.insert((self.current + d) % self.len);
                    window.insert((self.current + self.len - d % self.len) % self.len);
                }
                Topology::Bounded => {
                    if self.current + d < self.len {
                        window.insert(self.current + d);
                    }
                    if let Some(i) = self.current.checked_sub(d) {
                        window.insert(i);
                    }
                }
            }
        }
        window.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(len: usize, initial: usize, topology: Topology) -> IndexModel {
        IndexModel::new(len, initial, topology, Direction::Ltr).unwrap()
    }

    #[test]
    fn empty_collection_is_rejected() {
        assert_eq!(
            IndexModel::new(0, 0, Topology::Loop, Direction::Ltr),
            Err(CarouselError::NoSlides)
        );
    }

    #[test]
    fn initial_index_is_clamped() {
        assert_eq!(model(3, 10, Topology::Bounded).current(), 2);
    }

    #[test]
    fn loop_forward_cycle_closes() {
        let mut m = model(4, 1, Topology::Loop);
        for _ in 0..4 {
            m.advance(Step::Forward);
        }
        assert_eq!(m.current(), 1);
    }

    #[test]
    fn loop_backward_wraps_from_zero() {
        let mut m = model(3, 0, Topology::Loop);
        assert_eq!(m.advance(Step::Backward), 2);
    }

    #[test]
    fn bounded_edges_are_no_ops() {
        let mut m = model(3, 0, Topology::Bounded);
        assert!(!m.can_advance(Step::Backward));
        assert_eq!(m.advance(Step::Backward), 0);

        m.go_to(2);
        assert!(!m.can_advance(Step::Forward));
        assert_eq!(m.advance(Step::Forward), 2);
        assert!(m.can_advance(Step::Backward));
    }

    #[test]
    fn single_slide_never_advances() {
        for topology in [Topology::Loop, Topology::Bounded] {
            let mut m = model(1, 0, topology);
            assert!(!m.can_advance(Step::Forward));
            assert!(!m.can_advance(Step::Backward));
            assert_eq!(m.advance(Step::Forward), 0);
            assert_eq!(m.all_valid_indices().collect::<Vec<_>>(), vec![0]);
        }
    }

    #[test]
    fn steps_are_unit_deltas() {
        assert_eq!(Step::Forward.delta(), 1);
        assert_eq!(Step::Backward.delta(), -1);
        assert_eq!(Step::Forward.reverse(), Step::Backward);
    }

    #[test]
    fn peek_does_not_commit() {
        let m = model(5, 4, Topology::Loop);
        assert_eq!(m.peek(Step::Forward), 0);
        assert_eq!(m.peek(Step::Backward), 3);
        assert_eq!(m.current(), 4);
    }

    #[test]
    fn go_to_clamps_both_ends() {
        let mut m = model(5, 2, Topology::Loop);
        assert_eq!(m.go_to(-3), 0);
        assert_eq!(m.go_to(99), 4);
        assert_eq!(m.go_to(3), 3);
    }

    #[test]
    fn rtl_flips_sides() {
        assert_eq!(Direction::Ltr.step_toward(HorizontalSide::Right), Step::Forward);
        assert_eq!(Direction::Rtl.step_toward(HorizontalSide::Right), Step::Backward);
        assert_eq!(Direction::Rtl.side_of(Step::Forward), HorizontalSide::Left);
        assert_eq!(Direction::Rtl.autoplay_step(), Step::Forward);
        assert_eq!(
            Direction::Rtl.side_of(Direction::Rtl.autoplay_step()),
            HorizontalSide::Left
        );
        for dir in [Direction::Ltr, Direction::Rtl] {
            for side in [HorizontalSide::Left, HorizontalSide::Right] {
                assert_eq!(dir.side_of(dir.step_toward(side)), side);
            }
        }
    }

    #[test]
    fn boundary_follows_direction() {
        let ltr = IndexModel::new(3, 0, Topology::Bounded, Direction::Ltr).unwrap();
        assert!(ltr.is_at_boundary(HorizontalSide::Left));
        assert!(!ltr.is_at_boundary(HorizontalSide::Right));

        let rtl = IndexModel::new(3, 0, Topology::Bounded, Direction::Rtl).unwrap();
        assert!(rtl.is_at_boundary(HorizontalSide::Right));
        assert!(!rtl.is_at_boundary(HorizontalSide::Left));
    }

    #[test]
    fn resize_keeps_index_valid() {
        let mut m = model(6, 5, Topology::Loop);
        assert_eq!(m.resize(3), Ok(2));
        assert_eq!(m.len(), 3);
        assert_eq!(m.resize(0), Err(CarouselError::NoSlides));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn preload_window_wraps_when_looping() {
        let m = model(6, 0, Topology::Loop);
        assert_eq!(m.preload_window(1), vec![0, 1, 5]);
        assert_eq!(m.preload_window(0), vec![0]);
    }

    #[test]
    fn preload_window_truncates_when_bounded() {
        let m = model(6, 0, Topology::Bounded);
        assert_eq!(m.preload_window(2), vec![0, 1, 2]);
        let m = model(6, 5, Topology::Bounded);
        assert_eq!(m.preload_window(1), vec![4, 5]);
        let m = model(6, 0, Topology::Bounded);
        assert_eq!(m.preload_window(5), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(m.preload_window(usize::MAX), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn preload_window_covers_small_rings_once() {
        let m = model(3, 1, Topology::Loop);
        assert_eq!(m.preload_window(10), vec![0, 1, 2]);
    }
}
