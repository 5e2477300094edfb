#![forbid(unsafe_code)]

//! Carousel configuration.
//!
//! [`CarouselConfig`] groups every recognized option with defaults matching
//! the classic image-carousel behavior (looping, 5 s autoplay interval when
//! enabled, 5% swipe threshold, 1.5 px/ms transitions). Validation runs once,
//! at construction, via [`CarouselConfig::validate`].
//!
//! # Loading
//!
//! With the `config-file` feature:
//!
//! ```toml
//! is_loop = false
//! autoplay = true
//! autoplay_interval_ms = 3000
//! transition_duration_max_ms = 600
//! ```
//!
//! ```rust,ignore
//! let config = CarouselConfig::from_toml_file("carousel.toml")?;
//! ```

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{ConfigError, DurationBound};
use crate::index::{Direction, Topology};

/// Default autoplay period.
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 5000;
/// Default fraction of the container width a drag must cover to commit.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 0.05;
/// Default transition speed in px/ms.
pub const DEFAULT_TRANSITION_SPEED: f32 = 1.5;
/// Default vertical travel before a downward drag counts as a dismiss.
pub const DEFAULT_DISMISS_DEADZONE_PX: f32 = 16.0;

/// Options recognized by [`CarouselController`](crate::controller::CarouselController).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarouselConfig {
    /// Flip the mapping between logical steps and visual sides.
    pub is_rtl: bool,
    /// Ring topology when true, bounded `[0, N-1]` otherwise.
    pub is_loop: bool,
    /// Enable the autoplay timer.
    pub autoplay: bool,
    /// Start with autoplay suppressed by an explicit pause.
    pub autoplay_paused: bool,
    /// Start with autoplay suppressed by a reduced-motion preference.
    pub prefers_reduced_motion: bool,
    /// Autoplay tick period in milliseconds.
    pub autoplay_interval_ms: u64,
    /// Fraction of the container width a drag must cover to commit.
    pub swipe_threshold: f32,
    /// Transition speed in px/ms.
    pub transition_speed: f32,
    /// Lower bound on transition durations.
    pub transition_duration_min_ms: Option<u64>,
    /// Upper bound on transition durations; wins over the lower bound.
    pub transition_duration_max_ms: Option<u64>,
    /// Starting position, clamped into `[0, N)`.
    pub initial_index: usize,
    /// Vertical travel (px) a downward drag needs before it dismisses.
    pub dismiss_deadzone_px: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            is_rtl: false,
            is_loop: true,
            autoplay: false,
            autoplay_paused: false,
            prefers_reduced_motion: false,
            autoplay_interval_ms: DEFAULT_AUTOPLAY_INTERVAL_MS,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            transition_speed: DEFAULT_TRANSITION_SPEED,
            transition_duration_min_ms: None,
            transition_duration_max_ms: None,
            initial_index: 0,
            dismiss_deadzone_px: DEFAULT_DISMISS_DEADZONE_PX,
        }
    }
}

impl CarouselConfig {
    /// Check every option, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autoplay_interval_ms == 0 {
            return Err(ConfigError::NonPositiveAutoplayInterval);
        }
        // Written as a negated range check so NaN is rejected too.
        if !(0.0..=1.0).contains(&self.swipe_threshold) {
            return Err(ConfigError::SwipeThresholdOutOfRange(self.swipe_threshold));
        }
        if !(self.transition_speed.is_finite() && self.transition_speed > 0.0) {
            return Err(ConfigError::NonPositiveTransitionSpeed(
                self.transition_speed,
            ));
        }
        if let Some(0) = self.transition_duration_min_ms {
            return Err(ConfigError::NonPositiveDurationBound {
                bound: DurationBound::Min,
                value: 0,
            });
        }
        if let Some(0) = self.transition_duration_max_ms {
            return Err(ConfigError::NonPositiveDurationBound {
                bound: DurationBound::Max,
                value: 0,
            });
        }
        if let (Some(min_ms), Some(max_ms)) = (
            self.transition_duration_min_ms,
            self.transition_duration_max_ms,
        ) && max_ms < min_ms
        {
            return Err(ConfigError::DurationBoundsInverted { min_ms, max_ms });
        }
        if !(self.dismiss_deadzone_px.is_finite() && self.dismiss_deadzone_px >= 0.0) {
            return Err(ConfigError::InvalidDismissDeadzone(self.dismiss_deadzone_px));
        }
        Ok(())
    }

    /// Direction convention implied by `is_rtl`.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        if self.is_rtl {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    /// Topology implied by `is_loop`.
    #[inline]
    #[must_use]
    pub fn topology(&self) -> Topology {
        if self.is_loop {
            Topology::Loop
        } else {
            Topology::Bounded
        }
    }

    /// The autoplay period, or `None` when autoplay is disabled.
    #[must_use]
    pub fn autoplay_interval(&self) -> Option<Duration> {
        self.autoplay
            .then(|| Duration::from_millis(self.autoplay_interval_ms))
    }

    /// Configured lower duration bound.
    #[must_use]
    pub fn transition_duration_min(&self) -> Option<Duration> {
        self.transition_duration_min_ms.map(Duration::from_millis)
    }

    /// Configured upper duration bound.
    #[must_use]
    pub fn transition_duration_max(&self) -> Option<Duration> {
        self.transition_duration_max_ms.map(Duration::from_millis)
    }
}

#[cfg(feature = "config-file")]
impl CarouselConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(s).map_err(ConfigLoadError::Toml)?;
        config.validate().map_err(ConfigLoadError::Invalid)?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigLoadError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigLoadError::Json)?;
        config.validate().map_err(ConfigLoadError::Invalid)?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigLoadError::Io)?;
        Self::from_json_str(&content)
    }
}

/// Errors from loading a [`CarouselConfig`] file.
#[cfg(feature = "config-file")]
#[derive(Debug)]
pub enum ConfigLoadError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// The document parsed but failed validation.
    Invalid(ConfigError),
}

#[cfg(feature = "config-file")]
impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Invalid(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

#[cfg(feature = "config-file")]
impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}
