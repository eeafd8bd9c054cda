use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::{ChartWindow, DateWindow, IntradayInterval, Symbol};

/// Calendar days a compact daily payload (latest 100 sessions) reliably covers.
const COMPACT_REACH_DAYS: i64 = 140;

/// How much history a daily series request asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSize {
    #[default]
    Compact,
    Full,
}

impl OutputSize {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

/// Provider series flavour; selects query parameters and timestamp format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Intraday(IntradayInterval),
    Daily(OutputSize),
}

impl SeriesKind {
    /// Series needed to draw `window`, resolved as `range` on `today`.
    pub fn for_window(
        window: ChartWindow,
        range: DateWindow,
        today: Date,
        interval: IntradayInterval,
    ) -> Self {
        match window {
            ChartWindow::Day => Self::Intraday(interval),
            _ => {
                let reach = (today - range.start()).whole_days();
                if reach > COMPACT_REACH_DAYS {
                    Self::Daily(OutputSize::Full)
                } else {
                    Self::Daily(OutputSize::Compact)
                }
            }
        }
    }

    pub const fn function(self) -> &'static str {
        match self {
            Self::Intraday(_) => "TIME_SERIES_INTRADAY",
            Self::Daily(_) => "TIME_SERIES_DAILY",
        }
    }

    /// Top-level key holding the date-keyed records in the provider payload.
    pub fn payload_key(self) -> String {
        match self {
            Self::Intraday(interval) => format!("Time Series ({interval})"),
            Self::Daily(_) => String::from("Time Series (Daily)"),
        }
    }
}

/// One trading interval. Daily points sit at midnight.
///
/// `low <= open, close <= high` is expected of provider data but not checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotePoint {
    pub timestamp: PrimitiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl QuotePoint {
    pub const fn date(&self) -> Date {
        self.timestamp.date()
    }

    /// Up candle when the interval closed at or above its open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }

    pub fn is_finite(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|value| value.is_finite())
    }
}

/// Non-empty, timestamp-unique, chronologically ascending points.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvSeries {
    points: Vec<QuotePoint>,
}

impl OhlcvSeries {
    /// Callers guarantee `points` is non-empty, sorted and deduplicated.
    pub(crate) fn from_ordered(points: Vec<QuotePoint>) -> Self {
        debug_assert!(!points.is_empty());
        debug_assert!(points.windows(2).all(|pair| pair[0].timestamp < pair[1].timestamp));
        Self { points }
    }

    pub fn points(&self) -> &[QuotePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest low and highest high across the series.
    pub fn price_range(&self) -> (f64, f64) {
        self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(low, high), point| (low.min(point.low), high.max(point.high)),
        )
    }

    pub fn into_points(self) -> Vec<QuotePoint> {
        self.points
    }
}

/// Rendered chart, owned by the caller once returned.
#[derive(Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
    pub width: u32,
    pub height: u32,
}

impl ChartArtifact {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

impl std::fmt::Debug for ChartArtifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartArtifact")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotKind {
    Stock,
    Crypto,
}

/// Single current price, not a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotPrice {
    pub symbol: Symbol,
    pub kind: SpotKind,
    pub price: f64,
    pub currency: String,
}

impl Display for SpotPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The current price of {} is ${:.2}.",
            self.symbol, self.price
        )
    }
}

/// Company fundamentals snapshot; absent provider values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: Option<Symbol>,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub market_cap: Option<u64>,
    pub pe_ratio: Option<f64>,
    pub eps: Option<f64>,
    pub dividend_per_share: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
    pub official_site: Option<String>,
}

impl Display for CompanyOverview {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name.as_deref().unwrap_or("N/A"))?;
        writeln!(
            f,
            "Sector: {}",
            self.sector.as_deref().map(capitalize).unwrap_or_else(na)
        )?;
        writeln!(
            f,
            "Market Cap: {}",
            self.market_cap
                .map(|cap| format!("${}", group_thousands(cap)))
                .unwrap_or_else(na)
        )?;
        writeln!(f, "P/E Ratio: {}", plain(self.pe_ratio))?;
        writeln!(f, "EPS: {}", plain(self.eps))?;
        writeln!(f, "Dividend Per Share: {}", dollars(self.dividend_per_share))?;
        writeln!(
            f,
            "Dividend Yield: {}",
            self.dividend_yield
                .map(|ratio| format!("{:.2}%", ratio * 100.0))
                .unwrap_or_else(na)
        )?;
        writeln!(f, "52 Week High: {}", dollars(self.week_52_high))?;
        writeln!(f, "52 Week Low: {}", dollars(self.week_52_low))?;
        write!(
            f,
            "Website: {}",
            self.official_site.as_deref().unwrap_or("N/A")
        )
    }
}

fn na() -> String {
    String::from("N/A")
}

fn plain(value: Option<f64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_else(na)
}

fn dollars(value: Option<f64>) -> String {
    value.map(|value| format!("${value}")).unwrap_or_else(na)
}

fn capitalize(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
