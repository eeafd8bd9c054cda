//! Alpha Vantage quote client.
//!
//! Each call issues exactly one GET against `{base_url}/query` and returns
//! either the extracted provider data or a terminal [`ChartError`]:
//!
//! - transport failure or non-2xx status → `Transport`
//! - `"Error Message"`, `"Note"` or `"Information"` in the body → `Provider`
//! - body that is not a JSON object → `Parse`
//!
//! There are no retries and no caching. The credential is passed on every
//! call rather than held by the client.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{ApiKey, ClientConfig, DEFAULT_BASE_URL};
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize::{RawRecord, RawSeriesPayload};
use crate::{ChartError, CompanyOverview, SeriesKind, SpotKind, SpotPrice, Symbol};

/// Keys the provider uses to reject or throttle a request.
const PROVIDER_ERROR_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];
const QUOTE_CURRENCY: &str = "USD";

#[derive(Clone)]
pub struct QuoteClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: Option<u64>,
}

impl QuoteClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: None,
        }
    }

    pub fn from_config(http_client: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            http_client,
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Date-keyed OHLCV records for `symbol`. A payload without the
    /// expected series key yields an empty mapping.
    pub async fn fetch_series(
        &self,
        kind: SeriesKind,
        symbol: &Symbol,
        api_key: &ApiKey,
    ) -> Result<RawSeriesPayload, ChartError> {
        let mut request = self
            .request(kind.function(), api_key)
            .with_query("symbol", symbol.as_str());
        request = match kind {
            SeriesKind::Intraday(interval) => request.with_query("interval", interval.as_str()),
            SeriesKind::Daily(size) => request.with_query("outputsize", size.as_str()),
        };

        let mut body = self.query(request).await?;
        let Some(series) = body.remove(&kind.payload_key()) else {
            debug!(symbol = %symbol, key = %kind.payload_key(), "series key absent from payload");
            return Ok(RawSeriesPayload::default());
        };

        let records = serde_json::from_value::<HashMap<String, RawRecord>>(series)
            .map_err(|e| ChartError::parse(format!("malformed series record: {e}")))?;
        Ok(RawSeriesPayload::from(records))
    }

    pub async fn fetch_stock_price(
        &self,
        symbol: &Symbol,
        api_key: &ApiKey,
    ) -> Result<SpotPrice, ChartError> {
        let request = self
            .request("GLOBAL_QUOTE", api_key)
            .with_query("symbol", symbol.as_str());
        let response: GlobalQuoteResponse = decode(self.query(request).await?)?;

        let raw = response
            .quote
            .and_then(|quote| quote.price)
            .ok_or_else(|| ChartError::no_data(format!("no quote returned for {symbol}")))?;

        Ok(SpotPrice {
            symbol: symbol.clone(),
            kind: SpotKind::Stock,
            price: parse_price("05. price", &raw)?,
            currency: String::from(QUOTE_CURRENCY),
        })
    }

    pub async fn fetch_crypto_price(
        &self,
        symbol: &Symbol,
        api_key: &ApiKey,
    ) -> Result<SpotPrice, ChartError> {
        let request = self
            .request("CURRENCY_EXCHANGE_RATE", api_key)
            .with_query("from_currency", symbol.as_str())
            .with_query("to_currency", QUOTE_CURRENCY);
        let response: ExchangeRateResponse = decode(self.query(request).await?)?;

        let rate = response
            .rate
            .ok_or_else(|| ChartError::no_data(format!("no exchange rate returned for {symbol}")))?;
        let raw = rate
            .exchange_rate
            .ok_or_else(|| ChartError::no_data(format!("no exchange rate returned for {symbol}")))?;

        Ok(SpotPrice {
            symbol: symbol.clone(),
            kind: SpotKind::Crypto,
            price: parse_price("5. Exchange Rate", &raw)?,
            currency: rate
                .to_currency
                .filter(|code| !code.trim().is_empty())
                .unwrap_or_else(|| String::from(QUOTE_CURRENCY)),
        })
    }

    pub async fn fetch_overview(
        &self,
        symbol: &Symbol,
        api_key: &ApiKey,
    ) -> Result<CompanyOverview, ChartError> {
        let request = self
            .request("OVERVIEW", api_key)
            .with_query("symbol", symbol.as_str());
        let body = self.query(request).await?;
        if body.is_empty() {
            return Err(ChartError::no_data(format!("no overview returned for {symbol}")));
        }

        let raw: OverviewResponse = decode(body)?;
        raw.into_overview()
    }

    fn request(&self, function: &str, api_key: &ApiKey) -> HttpRequest {
        HttpRequest::get(format!("{}/query", self.base_url))
            .with_query("function", function)
            .with_query("apikey", api_key.expose())
            .with_timeout_ms(self.timeout_ms)
    }

    async fn query(&self, request: HttpRequest) -> Result<Map<String, Value>, ChartError> {
        debug!(url = %request.redacted_url(), "sending provider request");

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, timed_out = e.timed_out(), "provider transport failed");
            ChartError::transport(format!("alphavantage transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            warn!(status = response.status, "provider returned non-success status");
            return Err(ChartError::transport(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        let body = match serde_json::from_str::<Value>(&response.body) {
            Ok(Value::Object(body)) => body,
            Ok(_) => return Err(ChartError::parse("alphavantage response is not a JSON object")),
            Err(e) => {
                return Err(ChartError::parse(format!(
                    "failed to parse alphavantage response: {e}"
                )))
            }
        };

        if let Some((key, message)) = PROVIDER_ERROR_KEYS
            .iter()
            .find_map(|key| body.get(*key).map(|value| (*key, value)))
        {
            let message = message
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| message.to_string());
            warn!(key, "provider rejected request");
            return Err(ChartError::provider(message));
        }

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: Map<String, Value>) -> Result<T, ChartError> {
    serde_json::from_value(Value::Object(body))
        .map_err(|e| ChartError::parse(format!("unexpected alphavantage payload: {e}")))
}

fn parse_price(field: &str, raw: &str) -> Result<f64, ChartError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ChartError::parse(format!("field '{field}' is not a price: '{raw}'"))),
    }
}

/// Provider placeholders meaning "no value".
fn present(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !(value.is_empty() || value == "None" || value == "-"))
}

fn optional_number<T: std::str::FromStr>(
    field: &str,
    raw: Option<String>,
) -> Result<Option<T>, ChartError> {
    present(raw)
        .map(|value| {
            value.parse::<T>().map_err(|_| {
                ChartError::parse(format!("field '{field}' is not numeric: '{value}'"))
            })
        })
        .transpose()
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    quote: Option<GlobalQuoteData>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteData {
    #[serde(rename = "05. price", default)]
    price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate", default)]
    rate: Option<ExchangeRateData>,
}

#[derive(Debug, Deserialize)]
struct ExchangeRateData {
    #[serde(rename = "3. To_Currency Code", default)]
    to_currency: Option<String>,
    #[serde(rename = "5. Exchange Rate", default)]
    exchange_rate: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OverviewResponse {
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "EPS")]
    eps: Option<String>,
    #[serde(rename = "DividendPerShare")]
    dividend_per_share: Option<String>,
    #[serde(rename = "DividendYield")]
    dividend_yield: Option<String>,
    #[serde(rename = "52WeekHigh")]
    week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    week_52_low: Option<String>,
    #[serde(rename = "OfficialSite")]
    official_site: Option<String>,
}

impl OverviewResponse {
    fn into_overview(self) -> Result<CompanyOverview, ChartError> {
        Ok(CompanyOverview {
            symbol: present(self.symbol).and_then(|raw| Symbol::parse(&raw).ok()),
            name: present(self.name),
            sector: present(self.sector),
            market_cap: optional_number("MarketCapitalization", self.market_cap)?,
            pe_ratio: optional_number("PERatio", self.pe_ratio)?,
            eps: optional_number("EPS", self.eps)?,
            dividend_per_share: optional_number("DividendPerShare", self.dividend_per_share)?,
            dividend_yield: optional_number("DividendYield", self.dividend_yield)?,
            week_52_high: optional_number("52WeekHigh", self.week_52_high)?,
            week_52_low: optional_number("52WeekLow", self.week_52_low)?,
            official_site: present(self.official_site),
        })
    }
}
