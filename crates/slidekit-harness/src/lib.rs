#![forbid(unsafe_code)]

//! Scenario replay harness for slidekit.
//!
//! A scenario is a JSON document holding a [`CarouselConfig`], a slide count
//! and a timeline of [`Input`]s stamped with millisecond offsets. Replaying it
//! drives a real [`CarouselController`] against a recording sink and produces
//! a JSONL trace of every render call, grouped by step. Each step's records
//! hash to a `blake3:` checksum so behavior drift shows up as a golden
//! mismatch pointing at the first diverging step.
//!
//! [`CarouselConfig`]: slidekit_core::CarouselConfig
//! [`Input`]: slidekit_core::Input
//! [`CarouselController`]: slidekit_core::CarouselController

pub mod cli;
pub mod error;
pub mod golden;
pub mod scenario;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
pub use golden::{GoldenOutcome, Trace, TraceEvent, TraceRecord};
pub use scenario::{Scenario, ScenarioStep, replay};
