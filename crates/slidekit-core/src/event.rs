#![forbid(unsafe_code)]

//! Input and command types routed through
//! [`CarouselController::handle`](crate::controller::CarouselController::handle).
//!
//! [`Input`] covers raw events from the host (pointer, keys, environment).
//! [`Command`] is the higher-level message widgets dispatch: arrow buttons,
//! indicator dots, thumbnails, the play/pause and size buttons.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gesture::Point;

/// Navigation keys the carousel responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NavKey {
    /// Navigate toward the left side.
    ArrowLeft,
    /// Navigate toward the right side.
    ArrowRight,
    /// Leave the maximized view.
    Escape,
}

/// A widget-level request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "command", rename_all = "snake_case"))]
pub enum Command {
    GoLeft,
    GoRight,
    /// Jump to an index; out-of-range values are clamped.
    GoToIndex { index: isize },
    TogglePlay,
    ToggleMaximized,
    SetMaximized { maximized: bool },
}

/// A raw host event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Input {
    /// Pointer pressed inside the slide area.
    PointerDown { at: Point, container_width_px: f32 },
    /// Pointer moved while pressed.
    PointerMove { at: Point },
    /// Pointer released.
    PointerUp { at: Point },
    /// The platform cancelled the pointer stream.
    PointerCancel,
    /// A key press while the carousel has focus.
    Key { key: NavKey },
    /// Device orientation changed; any drag is rolled back.
    OrientationChange,
    /// The slide area changed width.
    Resize { container_width_px: f32 },
    /// Reduced-motion preference changed.
    ReducedMotion { enabled: bool },
    /// Host-controlled autoplay pause flag changed.
    AutoplayPaused { paused: bool },
    /// Viewer visibility changed.
    Visibility { visible: bool },
    /// A widget command.
    Command { command: Command },
}

impl From<Command> for Input {
    fn from(command: Command) -> Self {
        Self::Command { command }
    }
}

impl From<NavKey> for Input {
    fn from(key: NavKey) -> Self {
        Self::Key { key }
    }
}
