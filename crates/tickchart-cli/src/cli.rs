//! CLI argument definitions for tickchart.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `price` | Current stock price |
//! | `crypto` | Current crypto price in USD |
//! | `overview` | Company fundamentals |
//! | `chart` | Candlestick chart saved as PNG |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `text` | Output format (text, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--api-key` | env | Alpha Vantage API key |
//! | `--base-url` | env or provider default | Provider root URL |
//! | `--timeout-ms` | env or none | Bound on each provider request |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! tickchart price IBM
//! tickchart chart AAPL --window year --out charts/
//! tickchart chart MSFT --start 2024-01-01 --end 2024-03-31
//! tickchart --format json overview IBM
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickchart_core::IntradayInterval;

/// Stock and crypto prices, company overviews and candlestick charts
/// from Alpha Vantage.
#[derive(Debug, Parser)]
#[command(name = "tickchart", author, version, about)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Alpha Vantage API key; overrides TICKCHART_ALPHAVANTAGE_API_KEY.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Provider root URL; overrides TICKCHART_ALPHAVANTAGE_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds; overrides TICKCHART_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log pipeline stages and provider requests to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sentences.
    Text,
    /// Single JSON object.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current stock price.
    Price(SymbolArgs),
    /// Current crypto price in USD.
    Crypto(SymbolArgs),
    /// Company fundamentals.
    Overview(SymbolArgs),
    /// Render a candlestick chart to a PNG file.
    Chart(ChartArgs),
}

#[derive(Debug, Args)]
pub struct SymbolArgs {
    /// Ticker or currency code, case-insensitive.
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Ticker symbol, case-insensitive.
    pub symbol: String,

    /// Trailing window ending today in New York, the exchange's time zone.
    #[arg(long, value_enum, default_value_t = WindowArg::Month)]
    pub window: WindowArg,

    /// First day of a custom window (YYYY-MM-DD); overrides --window.
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Last day of a custom window (YYYY-MM-DD).
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Bar spacing for the day window (1min, 5min, 15min, 30min, 60min).
    #[arg(long, default_value_t = IntradayInterval::FiveMinutes)]
    pub interval: IntradayInterval,

    /// Output file or directory; defaults to `{SYMBOL}_chart.png` here.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WindowArg {
    Day,
    Week,
    Month,
    Year,
}
