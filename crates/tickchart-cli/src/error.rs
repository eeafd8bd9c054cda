use std::path::PathBuf;

use thiserror::Error;
use tickchart_core::{ChartErrorKind, CoreError, PipelineFailure, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{msg}\n  caused by: {0}", msg = .0.user_message())]
    Pipeline(#[from] PipelineFailure),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Pipeline(failure) => match failure.error.kind() {
                ChartErrorKind::Transport => 3,
                ChartErrorKind::Provider => 4,
                ChartErrorKind::NoData => 5,
                ChartErrorKind::Parse => 6,
                ChartErrorKind::Render => 7,
            },
            Self::Core(CoreError::Validation(_)) => 2,
            Self::Core(CoreError::Serialization(_)) => 6,
            Self::Write { .. } => 10,
        }
    }
}
