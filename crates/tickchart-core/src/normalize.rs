//! Raw provider records → typed [`QuotePoint`]s.
//!
//! All-or-nothing: a single unreadable date or number fails the whole
//! payload. An empty payload is not an error here; it only becomes one
//! once the window filter finds nothing to keep.

use std::collections::HashMap;

use serde::Deserialize;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

use crate::domain::DATE_FORMAT;
use crate::{ChartError, QuotePoint, SeriesKind};

const INTRADAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Scalar as the provider sent it; normally a decimal string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Number(serde_json::Number),
}

impl RawField {
    fn as_text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Text(text) => std::borrow::Cow::Borrowed(text.trim()),
            Self::Number(number) => std::borrow::Cow::Owned(number.to_string()),
        }
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// One provider record, keyed by the provider's numbered field names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "1. open")]
    pub open: RawField,
    #[serde(rename = "2. high")]
    pub high: RawField,
    #[serde(rename = "3. low")]
    pub low: RawField,
    #[serde(rename = "4. close")]
    pub close: RawField,
    #[serde(rename = "5. volume")]
    pub volume: RawField,
}

impl RawRecord {
    pub fn new(open: &str, high: &str, low: &str, close: &str, volume: &str) -> Self {
        Self {
            open: open.into(),
            high: high.into(),
            low: low.into(),
            close: close.into(),
            volume: volume.into(),
        }
    }
}

/// Unordered date-string → record mapping, straight from the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeriesPayload {
    records: HashMap<String, RawRecord>,
}

impl RawSeriesPayload {
    pub fn insert(&mut self, date: impl Into<String>, record: RawRecord) {
        self.records.insert(date.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<HashMap<String, RawRecord>> for RawSeriesPayload {
    fn from(records: HashMap<String, RawRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<(String, RawRecord)> for RawSeriesPayload {
    fn from_iter<I: IntoIterator<Item = (String, RawRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Convert every record into a point, in no particular order.
pub fn normalize(payload: RawSeriesPayload, kind: SeriesKind) -> Result<Vec<QuotePoint>, ChartError> {
    payload
        .records
        .into_iter()
        .map(|(stamp, record)| normalize_record(&stamp, &record, kind))
        .collect()
}

fn normalize_record(
    stamp: &str,
    record: &RawRecord,
    kind: SeriesKind,
) -> Result<QuotePoint, ChartError> {
    Ok(QuotePoint {
        timestamp: parse_timestamp(stamp, kind)?,
        open: parse_price(stamp, "open", &record.open)?,
        high: parse_price(stamp, "high", &record.high)?,
        low: parse_price(stamp, "low", &record.low)?,
        close: parse_price(stamp, "close", &record.close)?,
        volume: parse_volume(stamp, &record.volume)?,
    })
}

fn parse_timestamp(stamp: &str, kind: SeriesKind) -> Result<PrimitiveDateTime, ChartError> {
    let parsed = match kind {
        SeriesKind::Daily(_) => Date::parse(stamp, DATE_FORMAT).map(Date::midnight),
        SeriesKind::Intraday(_) => PrimitiveDateTime::parse(stamp, INTRADAY_FORMAT),
    };
    parsed.map_err(|e| ChartError::parse(format!("invalid date '{stamp}': {e}")))
}

fn parse_price(stamp: &str, field: &str, raw: &RawField) -> Result<f64, ChartError> {
    let text = raw.as_text();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ChartError::parse(format!(
            "invalid {field} '{text}' at {stamp}"
        ))),
    }
}

fn parse_volume(stamp: &str, raw: &RawField) -> Result<u64, ChartError> {
    let text = raw.as_text();
    if let Ok(volume) = text.parse::<u64>() {
        return Ok(volume);
    }

    // Some feeds send integral volumes as "1200.0". `u64::MAX as f64` rounds
    // up to 2^64, so the bound is exclusive.
    match text.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value >= 0.0
                && value < u64::MAX as f64
                && value.fract() == 0.0 =>
        {
            Ok(value as u64)
        }
        _ => Err(ChartError::parse(format!(
            "invalid volume '{text}' at {stamp}"
        ))),
    }
}
