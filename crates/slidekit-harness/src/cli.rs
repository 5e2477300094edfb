#![forbid(unsafe_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{HarnessError, Result};
use crate::golden::{
    GoldenOutcome, golden_checksum_path, is_bless_mode, load_golden_checksums, save_golden_checksums,
    verify_checksums,
};
use crate::scenario::{Scenario, replay};

/// Environment variable holding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "SLIDEKIT_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "slidekit-harness",
    about = "Replay carousel scenarios and check their traces against golden checksums",
    version
)]
pub struct Cli {
    /// Scenario JSON files to replay.
    #[arg(required = true)]
    pub scenarios: Vec<PathBuf>,

    /// Directory holding `<scenario>.checksums` golden files.
    #[arg(long, default_value = "crates/slidekit-harness/tests/golden")]
    pub golden_dir: PathBuf,

    /// Write each JSONL trace to `<out>/<scenario>.jsonl` instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Compare per-step checksums with the golden files.
    #[arg(long)]
    pub check: bool,

    /// Rewrite the golden files from this run (also enabled by `BLESS=1`).
    #[arg(long)]
    pub bless: bool,
}

pub fn run_from_env() -> Result<()> {
    init_logging();
    run(Cli::parse())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> Result<()> {
    let bless = cli.bless || is_bless_mode();
    let mut failures = Vec::new();

    for path in &cli.scenarios {
        let scenario = Scenario::from_file(path)?;
        let trace = replay(&scenario)?;
        let jsonl = trace.to_jsonl()?;
        match &cli.out {
            Some(dir) => write_file(&dir.join(format!("{}.jsonl", scenario.name)), &jsonl)?,
            None => print!("{jsonl}"),
        }

        if !(cli.check || bless) {
            continue;
        }
        let checksums = trace.step_checksums()?;
        let golden = golden_checksum_path(&cli.golden_dir, &scenario.name);
        if bless {
            save_golden_checksums(&golden, &checksums).map_err(|source| HarnessError::Io {
                path: golden.clone(),
                source,
            })?;
            info!(scenario = %scenario.name, steps = checksums.len(), "golden blessed");
            continue;
        }

        let expected = load_golden_checksums(&golden).map_err(|source| HarnessError::Io {
            path: golden.clone(),
            source,
        })?;
        // An explicit --check always treats a missing golden as a failure.
        let (outcome, step) = verify_checksums(&checksums, &expected, true);
        eprintln!("{}: {}", outcome.as_str().to_uppercase(), scenario.name);
        if outcome == GoldenOutcome::Fail {
            failures.push(failure(&scenario.name, &checksums, &expected, step));
        }
    }

    let _ = std::io::stdout().flush();
    match failures.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn failure(
    scenario: &str,
    actual: &[String],
    expected: &[String],
    step: Option<usize>,
) -> HarnessError {
    if expected.is_empty() {
        return HarnessError::MissingGolden {
            scenario: scenario.to_string(),
        };
    }
    let detail = match step {
        Some(i) => format!(
            "step {i}: expected {} got {}",
            expected.get(i).map_or("<none>", String::as_str),
            actual.get(i).map_or("<none>", String::as_str),
        ),
        None => "checksum count mismatch".to_string(),
    };
    HarnessError::GoldenMismatch {
        scenario: scenario.to_string(),
        detail,
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let io_err = |source: std::io::Error| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "name": "cli_unit",
        "slide_count": 3,
        "steps": [
            { "at_ms": 0, "input": { "type": "command", "command": { "command": "go_right" } } },
            { "at_ms": 400 }
        ]
    }"#;

    fn cli(dir: &Path, check: bool, bless: bool) -> Cli {
        let scenario = dir.join("cli_unit.json");
        fs::write(&scenario, SCENARIO).unwrap();
        Cli {
            scenarios: vec![scenario],
            golden_dir: dir.join("golden"),
            out: Some(dir.join("out")),
            check,
            bless,
        }
    }

    #[test]
    fn bless_then_check_passes() {
        let dir = tempfile::tempdir().unwrap();
        run(cli(dir.path(), false, true)).unwrap();
        assert!(dir.path().join("golden/cli_unit.checksums").exists());
        assert!(dir.path().join("out/cli_unit.jsonl").exists());
        run(cli(dir.path(), true, false)).unwrap();
    }

    #[test]
    fn check_without_golden_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(cli(dir.path(), true, false)).unwrap_err();
        assert!(matches!(err, HarnessError::MissingGolden { .. }));
    }

    #[test]
    fn tampered_golden_reports_the_step() {
        let dir = tempfile::tempdir().unwrap();
        run(cli(dir.path(), false, true)).unwrap();
        let golden = dir.path().join("golden/cli_unit.checksums");
        let mut sums = load_golden_checksums(&golden).unwrap();
        sums[1] = "blake3:0000".into();
        save_golden_checksums(&golden, &sums).unwrap();

        match run(cli(dir.path(), true, false)).unwrap_err() {
            HarnessError::GoldenMismatch { detail, .. } => assert!(detail.starts_with("step 1")),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn missing_scenario_file_is_io_error() {
        let err = run(Cli {
            scenarios: vec![PathBuf::from("/nonexistent/scenario.json")],
            golden_dir: PathBuf::from("golden"),
            out: None,
            check: false,
            bless: false,
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
