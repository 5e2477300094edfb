#![forbid(unsafe_code)]

//! Logging shim.
//!
//! With the `tracing` feature enabled, this module re-exports the `tracing`
//! macros. Without it, the crate root carries no-op macros of the same names
//! so call sites compile identically either way:
//!
//! ```ignore
//! #[cfg(feature = "tracing")]
//! use crate::logging::{debug, warn};
//! #[cfg(not(feature = "tracing"))]
//! use crate::{debug, warn};
//! ```
//!
//! Targets used across the crate:
//!
//! | target | emitted by |
//! |---|---|
//! | `slidekit.controller` | commits, rollbacks, maximize toggles |
//! | `slidekit.autoplay` | start/stop, suppression, ticks |
//! | `slidekit.gesture` | drag start/end decisions |
//! | `slidekit.transition` | duration apply/clear |

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}
