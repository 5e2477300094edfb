#![forbid(unsafe_code)]

//! Core: coordination engine for sliding content viewers.
//!
//! # Role in slidekit
//! `slidekit-core` decides *which* slide is current and *how* the strip should
//! move. It never draws anything: every visual effect goes through an injected
//! [`RenderSink`], and every timer is a deadline the host fires with
//! [`CarouselController::poll`].
//!
//! # Primary responsibilities
//! - **IndexModel**: the committed index under loop or bounded topology.
//! - **TransitionScheduler**: distance-to-duration mapping and the one-shot
//!   duration reset.
//! - **GestureTracker**: pointer drags into preview / commit / rollback.
//! - **AutoplayTimer**: periodic advance with suppression and disposal.
//! - **CarouselController**: routes buttons, keys, gestures, autoplay and
//!   environment changes through one commit path.
//!
//! # Example
//!
//! ```
//! use slidekit_core::{CarouselConfig, CarouselController, Command, RenderLog};
//! use web_time::Instant;
//!
//! let now = Instant::now();
//! let mut carousel =
//!     CarouselController::new(CarouselConfig::default(), 3, 300.0, RenderLog::new()).unwrap();
//! carousel.start(now);
//! carousel.handle(Command::GoLeft.into(), now);
//! assert_eq!(carousel.current_index(), 2);
//! assert_eq!(carousel.position().to_string(), "3 / 3");
//! ```

pub mod autoplay;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod gesture;
pub mod index;
pub mod logging;
pub mod render;
pub mod transition;

pub use autoplay::{AutoplayTimer, Suppression};
#[cfg(feature = "config-file")]
pub use config::ConfigLoadError;
pub use config::CarouselConfig;
pub use controller::{CarouselController, CarouselState, SlidePosition};
pub use error::{CarouselError, ConfigError, DurationBound};
pub use event::{Command, Input, NavKey};
pub use gesture::{GestureConfig, GesturePhase, GestureTracker, Point, SwipeEvent};
pub use index::{Direction, HorizontalSide, IndexModel, Step, Topology};
pub use render::{RenderLog, RenderOp, RenderSink, SlideOffset};
pub use transition::{TransitionRequest, TransitionScheduler, compute_duration, travel_distance};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
