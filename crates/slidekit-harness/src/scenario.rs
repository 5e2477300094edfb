#![forbid(unsafe_code)]

//! Scenario documents and deterministic replay.
//!
//! ```json
//! {
//!   "name": "loop_buttons",
//!   "config": { "is_loop": true },
//!   "slide_count": 3,
//!   "container_width_px": 300.0,
//!   "steps": [
//!     { "at_ms": 0, "input": { "type": "command", "command": { "command": "go_left" } } },
//!     { "at_ms": 250 }
//!   ]
//! }
//! ```
//!
//! Each step first fires whatever timers are due at `at_ms` and then routes
//! its input, if any. A step without an input is a pure timer poll. The
//! replay clock starts at an arbitrary instant; only offsets matter, so the
//! same document always yields the same trace.

use std::path::Path;

use serde::{Deserialize, Serialize};
use slidekit_core::{CarouselConfig, CarouselController, Input};
use tracing::{debug, info_span, warn};
use web_time::{Duration, Instant};

use crate::error::{HarnessError, Result};
use crate::golden::{Trace, TraceSink};

fn default_container_width() -> f32 {
    300.0
}

/// A replayable input timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub config: CarouselConfig,
    pub slide_count: usize,
    #[serde(default = "default_container_width")]
    pub container_width_px: f32,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

/// One point on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// Offset from mount, in milliseconds. Must not decrease.
    pub at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Input>,
}

impl Scenario {
    /// Parse a scenario document. `origin` is only used in error messages.
    ///
    /// The name becomes a file stem for traces and goldens, so it must be
    /// non-empty and free of path separators and `..`.
    pub fn from_json_str(s: &str, origin: &Path) -> Result<Self> {
        let scenario: Self = serde_json::from_str(s).map_err(|source| HarnessError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        if !is_plain_name(&scenario.name) {
            return Err(HarnessError::InvalidName {
                path: origin.to_path_buf(),
                name: scenario.name,
            });
        }
        Ok(scenario)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content, path)
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains(['/', '\\', ':', '\0'])
}

/// Replay `scenario` against a fresh controller and collect its trace.
pub fn replay(scenario: &Scenario) -> Result<Trace> {
    let _span = info_span!("replay", scenario = %scenario.name).entered();
    let origin = Instant::now();
    let mut carousel = CarouselController::new(
        scenario.config.clone(),
        scenario.slide_count,
        scenario.container_width_px,
        TraceSink::default(),
    )?;
    let mut trace = Trace::new(&scenario.name);

    carousel.start(origin);
    trace.push_step(0, 0, carousel.sink_mut().drain());

    let mut clock_ms = 0;
    for (i, step) in scenario.steps.iter().enumerate() {
        if step.at_ms < clock_ms {
            warn!(
                step = i + 1,
                at_ms = step.at_ms,
                clock_ms,
                "step goes back in time; holding the clock"
            );
        }
        clock_ms = clock_ms.max(step.at_ms);
        let now = origin + Duration::from_millis(clock_ms);

        carousel.poll(now);
        if let Some(input) = step.input {
            carousel.handle(input, now);
        }
        let events = carousel.sink_mut().drain();
        debug!(step = i + 1, at_ms = clock_ms, records = events.len(), "step replayed");
        trace.push_step(i + 1, clock_ms, events);
    }

    carousel.dispose();
    Ok(trace)
}
