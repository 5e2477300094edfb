#![forbid(unsafe_code)]

//! Golden traces: JSONL records, per-step checksums, golden file management.
//!
//! # JSONL Schema
//!
//! One record per render call, in call order:
//!
//! ```json
//! {"step":0,"at_ms":0,"event":"offset","index":0,"displacement_px":0.0}
//! {"step":1,"at_ms":40,"event":"duration","duration_us":200000}
//! {"step":1,"at_ms":40,"event":"offset","index":1,"displacement_px":0.0}
//! {"step":1,"at_ms":40,"event":"state","current_index":1,"slide_count":3,...}
//! {"step":2,"at_ms":240,"event":"clear_duration"}
//! ```
//!
//! Step 0 is the mount. Step `i > 0` is everything caused by the `i`-th
//! scenario step (its poll plus its input).
//!
//! # Checksums
//!
//! Each step hashes its JSONL lines with BLAKE3 (`blake3:<hex>`). A step with
//! no render calls still gets a checksum, so step indices line up between
//! the trace and its golden file.
//!
//! # Updating goldens
//!
//! ```sh
//! BLESS=1 cargo test -p slidekit-harness
//! cargo run -p slidekit-harness -- --bless crates/slidekit-harness/scenarios/*.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slidekit_core::{CarouselState, RenderSink, SlideOffset};
use web_time::Duration;

/// Checksum prefix for clarity in logs.
const CHECKSUM_PREFIX: &str = "blake3:";

// ============================================================================
// Trace records
// ============================================================================

/// One render call, flattened for JSONL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    Offset {
        index: usize,
        displacement_px: f32,
    },
    Duration {
        duration_us: u64,
    },
    ClearDuration,
    State {
        current_index: usize,
        slide_count: usize,
        visual_offset_px: f32,
        transition_duration_us: Option<u64>,
        is_playing: bool,
        is_maximized: bool,
        is_dragging: bool,
        is_at_left_boundary: bool,
        is_at_right_boundary: bool,
    },
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

impl From<&CarouselState> for TraceEvent {
    fn from(state: &CarouselState) -> Self {
        Self::State {
            current_index: state.current_index,
            slide_count: state.slide_count,
            visual_offset_px: state.visual_offset_px,
            transition_duration_us: state.transition_duration.map(micros),
            is_playing: state.is_playing,
            is_maximized: state.is_maximized,
            is_dragging: state.is_dragging,
            is_at_left_boundary: state.is_at_left_boundary,
            is_at_right_boundary: state.is_at_right_boundary,
        }
    }
}

/// A [`TraceEvent`] stamped with the step that caused it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub step: usize,
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: TraceEvent,
}

/// Render sink that buffers [`TraceEvent`]s until the replay loop stamps them.
#[derive(Debug, Default)]
pub struct TraceSink {
    pending: Vec<TraceEvent>,
}

impl TraceSink {
    /// Take everything recorded since the last drain.
    pub fn drain(&mut self) -> Vec<TraceEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl RenderSink for TraceSink {
    fn apply_visual_offset(&mut self, offset: SlideOffset) {
        self.pending.push(TraceEvent::Offset {
            index: offset.index,
            displacement_px: offset.displacement_px,
        });
    }

    fn apply_transition_duration(&mut self, duration: Duration) {
        self.pending.push(TraceEvent::Duration {
            duration_us: micros(duration),
        });
    }

    fn clear_transition_duration(&mut self) {
        self.pending.push(TraceEvent::ClearDuration);
    }

    fn state_changed(&mut self, state: &CarouselState) {
        self.pending.push(state.into());
    }
}

// ============================================================================
// Trace
// ============================================================================

/// The full output of one scenario replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub scenario: String,
    /// Number of steps including the mount (step 0).
    pub steps: usize,
    pub records: Vec<TraceRecord>,
}

impl Trace {
    #[must_use]
    pub fn new(scenario: &str) -> Self {
        Self {
            scenario: scenario.to_string(),
            steps: 0,
            records: Vec::new(),
        }
    }

    /// Append the events caused by `step`.
    pub fn push_step(&mut self, step: usize, at_ms: u64, events: Vec<TraceEvent>) {
        self.steps = self.steps.max(step + 1);
        self.records.extend(
            events
                .into_iter()
                .map(|event| TraceRecord { step, at_ms, event }),
        );
    }

    /// Records belonging to `step`.
    pub fn step_records(&self, step: usize) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter().filter(move |r| r.step == step)
    }

    /// The final state notification, if any.
    #[must_use]
    pub fn last_state(&self) -> Option<&TraceEvent> {
        self.records
            .iter()
            .rev()
            .map(|r| &r.event)
            .find(|e| matches!(e, TraceEvent::State { .. }))
    }

    /// Encode every record as one JSON object per line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// One checksum per step, in step order.
    pub fn step_checksums(&self) -> Result<Vec<String>, serde_json::Error> {
        (0..self.steps)
            .map(|step| {
                let mut hasher = blake3::Hasher::new();
                for record in self.step_records(step) {
                    hasher.update(serde_json::to_string(record)?.as_bytes());
                    hasher.update(b"\n");
                }
                Ok(format!("{CHECKSUM_PREFIX}{}", hasher.finalize().to_hex()))
            })
            .collect()
    }
}

// ============================================================================
// Golden file management
// ============================================================================

/// Golden comparison outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldenOutcome {
    Pass,
    Fail,
    Skip,
}

impl GoldenOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
        }
    }
}

/// Path to the golden checksums file for a scenario.
#[must_use]
pub fn golden_checksum_path(golden_dir: &Path, scenario_name: &str) -> PathBuf {
    golden_dir.join(format!("{scenario_name}.checksums"))
}

/// Load expected checksums; a missing file yields an empty list.
pub fn load_golden_checksums(path: &Path) -> std::io::Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Write checksums to a golden file, creating parent directories.
pub fn save_golden_checksums(path: &Path, checksums: &[String]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = format!(
        "# Golden checksums - one per replay step, do not edit manually\n{}\n",
        checksums.join("\n")
    );
    fs::write(path, content)
}

/// Whether goldens should be rewritten (`BLESS=1`).
#[must_use]
pub fn is_bless_mode() -> bool {
    env_flag("BLESS")
}

/// Whether a missing golden counts as a failure (`SLIDEKIT_GOLDEN_ENFORCE=1`).
#[must_use]
pub fn is_golden_enforced() -> bool {
    env_flag("SLIDEKIT_GOLDEN_ENFORCE")
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Compare checksums. Returns the outcome and the first mismatching step.
#[must_use]
pub fn verify_checksums(
    actual: &[String],
    expected: &[String],
    enforce_missing: bool,
) -> (GoldenOutcome, Option<usize>) {
    if expected.is_empty() {
        return if enforce_missing {
            (GoldenOutcome::Fail, None)
        } else {
            (GoldenOutcome::Skip, None)
        };
    }
    if let Some(step) = actual
        .iter()
        .zip(expected)
        .position(|(a, e)| a != e)
    {
        return (GoldenOutcome::Fail, Some(step));
    }
    if actual.len() != expected.len() {
        return (GoldenOutcome::Fail, Some(actual.len().min(expected.len())));
    }
    (GoldenOutcome::Pass, None)
}
