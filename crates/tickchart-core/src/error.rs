use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation errors raised while building requests, before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or digit: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid interval '{value}', expected one of 1min, 5min, 15min, 30min, 60min")]
    InvalidInterval { value: String },
    #[error("invalid window '{value}', expected one of day, week, month, year")]
    InvalidWindow { value: String },
    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("window start {start} is after end {end}")]
    WindowStartAfterEnd { start: String, end: String },
    #[error("window of {days} days reaches before the supported calendar range")]
    WindowOutOfRange { days: i64 },

    #[error("api key is missing; set TICKCHART_ALPHAVANTAGE_API_KEY or pass --api-key")]
    MissingApiKey,
    #[error("timeout must be a positive number of milliseconds: '{value}'")]
    InvalidTimeout { value: String },
}

/// Top-level error type for core operations outside the pipeline.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure category of a pipeline request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartErrorKind {
    /// Network failure, non-2xx status, or an expired caller deadline.
    Transport,
    /// The provider flagged the request itself as invalid or throttled.
    Provider,
    /// A date or numeric field could not be read.
    Parse,
    /// The window held no points, or a scalar field was absent.
    NoData,
    /// Candlestick geometry could not be produced or encoded.
    Render,
}

/// Structured, terminal error for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartError {
    kind: ChartErrorKind,
    message: String,
}

impl ChartError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ChartErrorKind::Transport, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChartErrorKind::Provider, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ChartErrorKind::Parse, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(ChartErrorKind::NoData, message)
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::new(ChartErrorKind::Render, message)
    }

    fn new(kind: ChartErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ChartErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ChartErrorKind::Transport => "chart.transport",
            ChartErrorKind::Provider => "chart.provider",
            ChartErrorKind::Parse => "chart.parse",
            ChartErrorKind::NoData => "chart.no_data",
            ChartErrorKind::Render => "chart.render",
        }
    }

    /// Reason suitable for showing to the person who asked for the chart.
    pub const fn user_message(&self) -> &'static str {
        match self.kind {
            ChartErrorKind::Transport => "Error fetching data. Please try again.",
            ChartErrorKind::Provider => "Invalid inputs. Please enter a valid symbol.",
            ChartErrorKind::Parse => {
                "The data provider returned data that could not be read. Please try again later."
            }
            ChartErrorKind::NoData => {
                "No data available for the given symbol in the requested window. \
                 Please check the symbol or try a wider window."
            }
            ChartErrorKind::Render => "The chart could not be rendered.",
        }
    }
}

impl Display for ChartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ChartError {}
