//! # Domain Models
//!
//! Request-scoped value types shared by every pipeline stage.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, upper-cased ticker |
//! | [`IntradayInterval`] | Bar spacing for intraday series |
//! | [`SeriesKind`] | Intraday or daily provider series |
//! | [`QuotePoint`] | One OHLCV interval |
//! | [`OhlcvSeries`] | Ordered, non-empty points ready for rendering |
//! | [`DateWindow`] | Inclusive `[start, end]` calendar range |
//! | [`ChartWindow`] | Day/week/month/year/custom selector |
//! | [`ChartArtifact`] | Encoded PNG plus naming metadata |
//! | [`SpotPrice`] | Current stock or crypto price |
//! | [`CompanyOverview`] | Company fundamentals snapshot |
//!
//! Nothing here outlives a request and nothing is shared mutably.

mod interval;
mod models;
mod symbol;
mod window;

pub use interval::IntradayInterval;
pub use models::{
    ChartArtifact, CompanyOverview, OhlcvSeries, OutputSize, QuotePoint, SeriesKind, SpotKind,
    SpotPrice,
};
pub use symbol::Symbol;
pub use window::{ChartWindow, Clock, DateWindow, FixedClock, SystemClock};

pub(crate) use window::DATE_FORMAT;
