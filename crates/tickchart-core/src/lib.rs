//! # Tickchart Core
//!
//! Fetches stock and crypto market data from Alpha Vantage and turns daily or
//! intraday series into candlestick charts.
//!
//! ## Overview
//!
//! - **Quote client** for time series, spot prices and company overviews
//! - **Normalizer** from provider records to typed OHLCV points
//! - **Window filter** producing ordered, deduplicated series
//! - **Chart renderer** encoding titled, labelled candlesticks as PNG with an
//!   embedded font
//! - **Pipeline** composing the stages with one structured failure per request
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Alpha Vantage quote client |
//! | [`config`] | API key, base URL and timeout settings |
//! | [`domain`] | Domain models (Symbol, QuotePoint, OhlcvSeries, windows) |
//! | [`error`] | Validation and chart error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Raw payload to quote points |
//! | [`pipeline`] | Request orchestration |
//! | [`render`] | Candlestick rendering |
//! | [`window`] | Date window filtering |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickchart_core::{
//!     ChartPipeline, ChartWindow, ClientConfig, PipelineRequest, ReqwestHttpClient, Symbol,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let pipeline = ChartPipeline::from_config(Arc::new(ReqwestHttpClient::new()), &config);
//!
//!     let request = PipelineRequest::chart(Symbol::parse("ibm")?, ChartWindow::Month);
//!     if let Some(chart) = pipeline.run(&request).await?.into_chart() {
//!         std::fs::write(&chart.filename, &chart.bytes)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every request ends in an output or a single [`PipelineFailure`] naming the
//! stage that failed:
//!
//! ```rust
//! use tickchart_core::{ChartErrorKind, PipelineFailure};
//!
//! fn explain(failure: &PipelineFailure) -> &'static str {
//!     match failure.error.kind() {
//!         ChartErrorKind::Transport => "network problem",
//!         ChartErrorKind::Provider => "rejected by provider",
//!         ChartErrorKind::NoData => "nothing to draw",
//!         _ => failure.user_message(),
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The API key is redacted from logs and `Debug` output
//! - Transport errors are stripped of the request URL

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod window;

pub use client::QuoteClient;

pub use config::{ApiKey, ClientConfig};

pub use domain::{
    ChartArtifact, ChartWindow, Clock, CompanyOverview, DateWindow, FixedClock, IntradayInterval,
    OhlcvSeries, OutputSize, QuotePoint, SeriesKind, SpotKind, SpotPrice, Symbol, SystemClock,
};

pub use error::{ChartError, ChartErrorKind, CoreError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};

pub use normalize::{normalize, RawField, RawRecord, RawSeriesPayload};

pub use pipeline::{
    ChartPipeline, Operation, PipelineFailure, PipelineOutput, PipelineRequest, PipelineStage,
};

pub use render::{ChartRenderer, ChartStyle, PlottersRenderer, PNG_CONTENT_TYPE};

pub use window::filter;
