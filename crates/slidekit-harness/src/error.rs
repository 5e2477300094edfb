#![forbid(unsafe_code)]

use std::path::PathBuf;

use slidekit_core::CarouselError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode trace: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid scenario name {name:?} in {path}: must be a plain file stem")]
    InvalidName { path: PathBuf, name: String },
    #[error("scenario rejected: {0}")]
    Carousel(#[from] CarouselError),
    #[error("missing golden checksums for {scenario} (run with --bless to create them)")]
    MissingGolden { scenario: String },
    #[error("golden mismatch for {scenario}: {detail}")]
    GoldenMismatch { scenario: String, detail: String },
}

impl HarnessError {
    /// Process exit code for the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { .. } | Self::Encode(_) => 2,
            Self::Parse { .. } | Self::InvalidName { .. } | Self::Carousel(_) => 3,
            Self::MissingGolden { .. } | Self::GoldenMismatch { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_failures_exit_with_one() {
        let err = HarnessError::MissingGolden {
            scenario: "loop".into(),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("--bless"));
    }

    #[test]
    fn carousel_errors_convert() {
        let err: HarnessError = CarouselError::NoSlides.into();
        assert_eq!(err.exit_code(), 3);
    }
}
