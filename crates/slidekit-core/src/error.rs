#![forbid(unsafe_code)]

//! Error types.
//!
//! Only construction can fail. Navigation never does: out-of-range jumps are
//! clamped and moves past a bounded edge are no-ops reported through
//! [`IndexModel::can_advance`](crate::index::IndexModel::can_advance).

use std::fmt;

/// Which transition-duration bound a [`ConfigError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBound {
    Min,
    Max,
}

impl fmt::Display for DurationBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => f.write_str("transition_duration_min_ms"),
            Self::Max => f.write_str("transition_duration_max_ms"),
        }
    }
}

/// An option rejected by [`CarouselConfig::validate`](crate::config::CarouselConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `autoplay_interval_ms` was zero.
    NonPositiveAutoplayInterval,
    /// `swipe_threshold` fell outside `[0, 1]` (or was NaN).
    SwipeThresholdOutOfRange(f32),
    /// `transition_speed` was zero, negative, or not finite.
    NonPositiveTransitionSpeed(f32),
    /// A duration bound was configured as zero.
    NonPositiveDurationBound { bound: DurationBound, value: u64 },
    /// `transition_duration_max_ms < transition_duration_min_ms`.
    DurationBoundsInverted { min_ms: u64, max_ms: u64 },
    /// `dismiss_deadzone_px` was negative or not finite.
    InvalidDismissDeadzone(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAutoplayInterval => {
                f.write_str("autoplay_interval_ms must be > 0")
            }
            Self::SwipeThresholdOutOfRange(value) => {
                write!(f, "swipe_threshold must be in [0, 1], got {value}")
            }
            Self::NonPositiveTransitionSpeed(value) => {
                write!(f, "transition_speed must be a finite value > 0, got {value}")
            }
            Self::NonPositiveDurationBound { bound, value } => {
                write!(f, "{bound} must be > 0, got {value}")
            }
            Self::DurationBoundsInverted { min_ms, max_ms } => write!(
                f,
                "transition_duration_max_ms ({max_ms}) must be >= transition_duration_min_ms ({min_ms})"
            ),
            Self::InvalidDismissDeadzone(value) => {
                write!(f, "dismiss_deadzone_px must be a finite value >= 0, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while constructing a carousel.
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// The slide collection was empty; no position can ever be valid.
    NoSlides,
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid carousel configuration: {e}"),
            Self::NoSlides => f.write_str("carousel requires at least one slide"),
        }
    }
}

impl std::error::Error for CarouselError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::NoSlides => None,
        }
    }
}

impl From<ConfigError> for CarouselError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_names_the_option() {
        let e = ConfigError::DurationBoundsInverted {
            min_ms: 500,
            max_ms: 200,
        };
        let msg = e.to_string();
        assert!(msg.contains("transition_duration_max_ms (200)"));
        assert!(msg.contains("transition_duration_min_ms (500)"));

        let e = ConfigError::NonPositiveDurationBound {
            bound: DurationBound::Min,
            value: 0,
        };
        assert_eq!(e.to_string(), "transition_duration_min_ms must be > 0, got 0");
    }

    #[test]
    fn carousel_error_chains_config_source() {
        let err = CarouselError::from(ConfigError::NonPositiveAutoplayInterval);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("autoplay_interval_ms"));
        assert!(CarouselError::NoSlides.source().is_none());
    }
}
