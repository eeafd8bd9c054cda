//! Wire contract with the Alpha Vantage query endpoint.
//!
//! Each operation must issue exactly one GET against `{base}/query` with the
//! provider's parameter names, and read the provider's field names verbatim.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use serde_json::json;
use tickchart_core::{
    ChartWindow, ClientConfig, IntradayInterval, OutputSize, PipelineRequest, QuoteClient,
    SeriesKind, SpotKind, Symbol,
};
use time::macros::date;

use support::{api_key, daily_body, pipeline, ScriptedHttpClient};

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

fn client(transport: &ScriptedHttpClient) -> QuoteClient {
    QuoteClient::new(Arc::new(transport.clone())).with_base_url("https://av.test/")
}

#[tokio::test]
async fn daily_series_request_carries_function_symbol_and_size() {
    let transport = ScriptedHttpClient::json(daily_body(&["2024-01-02"]));

    client(&transport)
        .fetch_series(SeriesKind::Daily(OutputSize::Full), &symbol("ibm"), &api_key())
        .await
        .expect("series");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "https://av.test/query");
    assert_eq!(request.query_value("function"), Some("TIME_SERIES_DAILY"));
    assert_eq!(request.query_value("symbol"), Some("IBM"));
    assert_eq!(request.query_value("outputsize"), Some("full"));
    assert_eq!(request.query_value("apikey"), Some("test-key"));
    assert_eq!(request.query_value("interval"), None);
}

#[tokio::test]
async fn intraday_series_request_carries_interval() {
    let transport = ScriptedHttpClient::json(json!({ "Time Series (15min)": {} }));

    let payload = client(&transport)
        .fetch_series(
            SeriesKind::Intraday(IntradayInterval::FifteenMinutes),
            &symbol("msft"),
            &api_key(),
        )
        .await
        .expect("series");

    assert!(payload.is_empty());
    let request = &transport.requests()[0];
    assert_eq!(request.query_value("function"), Some("TIME_SERIES_INTRADAY"));
    assert_eq!(request.query_value("interval"), Some("15min"));
    assert_eq!(request.query_value("outputsize"), None);
}

#[tokio::test]
async fn series_records_are_read_by_numbered_field_names() {
    let transport = ScriptedHttpClient::json(json!({
        "Time Series (Daily)": {
            "2024-01-02": {
                "1. open": "187.1500",
                "2. high": "188.4400",
                "3. low": "183.8850",
                "4. close": "185.6400",
                "5. volume": "82488674"
            }
        }
    }));

    let payload = client(&transport)
        .fetch_series(SeriesKind::Daily(OutputSize::Compact), &symbol("aapl"), &api_key())
        .await
        .expect("series");

    assert_eq!(payload.len(), 1);
}

#[tokio::test]
async fn stock_price_uses_global_quote() {
    let transport = ScriptedHttpClient::json(json!({
        "Global Quote": { "01. symbol": "IBM", "05. price": "185.9200" }
    }));

    let spot = client(&transport)
        .fetch_stock_price(&symbol("ibm"), &api_key())
        .await
        .expect("price");

    assert_eq!(spot.kind, SpotKind::Stock);
    assert_eq!(spot.price, 185.92);
    let request = &transport.requests()[0];
    assert_eq!(request.query_value("function"), Some("GLOBAL_QUOTE"));
    assert_eq!(request.query_value("symbol"), Some("IBM"));
}

#[tokio::test]
async fn crypto_price_uses_exchange_rate_against_usd() {
    let transport = ScriptedHttpClient::json(json!({
        "Realtime Currency Exchange Rate": {
            "1. From_Currency Code": "ETH",
            "3. To_Currency Code": "USD",
            "5. Exchange Rate": "2301.55000000"
        }
    }));

    let spot = client(&transport)
        .fetch_crypto_price(&symbol("eth"), &api_key())
        .await
        .expect("price");

    assert_eq!(spot.kind, SpotKind::Crypto);
    assert_eq!(spot.currency, "USD");
    let request = &transport.requests()[0];
    assert_eq!(request.query_value("function"), Some("CURRENCY_EXCHANGE_RATE"));
    assert_eq!(request.query_value("from_currency"), Some("ETH"));
    assert_eq!(request.query_value("to_currency"), Some("USD"));
    assert_eq!(request.query_value("symbol"), None);
}

#[tokio::test]
async fn overview_reads_fundamental_fields() {
    let transport = ScriptedHttpClient::json(json!({
        "Symbol": "IBM",
        "Name": "International Business Machines",
        "Sector": "TECHNOLOGY",
        "MarketCapitalization": "169734586000",
        "PERatio": "22.75",
        "EPS": "8.15",
        "DividendPerShare": "6.63",
        "DividendYield": "0.0359",
        "52WeekHigh": "199.18",
        "52WeekLow": "135.87",
        "OfficialSite": "https://www.ibm.com"
    }));

    let overview = client(&transport)
        .fetch_overview(&symbol("ibm"), &api_key())
        .await
        .expect("overview");

    assert_eq!(overview.market_cap, Some(169_734_586_000));
    assert_eq!(overview.pe_ratio, Some(22.75));
    assert_eq!(overview.week_52_low, Some(135.87));
    assert_eq!(overview.official_site.as_deref(), Some("https://www.ibm.com"));
    assert_eq!(
        transport.requests()[0].query_value("function"),
        Some("OVERVIEW")
    );
}

#[tokio::test]
async fn year_chart_asks_for_full_history_once() {
    let transport = ScriptedHttpClient::json(daily_body(&["2024-06-03"]));
    let pipeline = pipeline(&transport, date!(2024 - 06 - 30));

    pipeline
        .run(&PipelineRequest::chart(symbol("ibm"), ChartWindow::Year))
        .await
        .expect("chart");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_value("outputsize"), Some("full"));
}

#[tokio::test]
async fn configured_timeout_reaches_transport() {
    let transport = ScriptedHttpClient::json(daily_body(&["2024-01-02"]));
    let config = ClientConfig::new(api_key())
        .with_base_url("https://av.test")
        .with_timeout_ms(Some(2_500));

    QuoteClient::from_config(Arc::new(transport.clone()), &config)
        .fetch_series(SeriesKind::Daily(OutputSize::Compact), &symbol("ibm"), &api_key())
        .await
        .expect("series");

    let request = &transport.requests()[0];
    assert_eq!(request.timeout_ms, Some(2_500));
    assert!(!request.redacted_url().contains("test-key"));
}
