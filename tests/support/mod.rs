//! Shared fixtures for the behaviour tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Map, Value};
use tickchart_core::{
    ApiKey, ChartArtifact, ChartError, ChartPipeline, ChartRenderer, FixedClock, HttpClient,
    HttpError, HttpRequest, HttpResponse, OhlcvSeries, PlottersRenderer, QuoteClient,
};
use time::Date;

/// Transport that replays scripted responses in order and records every request.
///
/// Once the script runs out the last response is repeated.
#[derive(Clone, Default)]
pub struct ScriptedHttpClient {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, HttpError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    delay: Option<Duration>,
}

impl ScriptedHttpClient {
    pub fn json(body: Value) -> Self {
        Self::default().then(Ok(HttpResponse::ok_json(body.to_string())))
    }

    pub fn failing(error: HttpError) -> Self {
        Self::default().then(Err(error))
    }

    pub fn then(self, response: Result<HttpResponse, HttpError>) -> Self {
        self.responses
            .lock()
            .expect("script lock")
            .push_back(response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request log lock")
            .push(request);
        let response = {
            let mut script = self.responses.lock().expect("script lock");
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };
        let delay = self.delay;

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            response.unwrap_or_else(|| Err(HttpError::new("no scripted response")))
        })
    }
}

/// Renderer that keeps a copy of every series and title it is handed, then
/// draws with the default plotters renderer.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<(OhlcvSeries, String)>>>,
    inner: PlottersRenderer,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<(OhlcvSeries, String)> {
        self.calls.lock().expect("render log lock").clone()
    }

    /// The one series rendered so far; panics on zero or several renders.
    pub fn only_series(&self) -> OhlcvSeries {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one render");
        calls[0].0.clone()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, series: &OhlcvSeries, title: &str) -> Result<ChartArtifact, ChartError> {
        self.calls
            .lock()
            .expect("render log lock")
            .push((series.clone(), title.to_owned()));
        self.inner.render(series, title)
    }
}

/// Asserts timestamps strictly increase from one point to the next.
pub fn assert_strictly_ascending(series: &OhlcvSeries) {
    assert!(
        series
            .points()
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp),
        "timestamps must strictly increase"
    );
}

pub fn api_key() -> ApiKey {
    ApiKey::new("test-key").expect("valid key")
}

/// Pipeline over `transport` whose clock reads `today`.
pub fn pipeline(transport: &ScriptedHttpClient, today: Date) -> ChartPipeline {
    let client = QuoteClient::new(Arc::new(transport.clone()));
    ChartPipeline::new(client, api_key()).with_clock(Arc::new(FixedClock(today)))
}

/// One OHLCV record in the provider's wire shape.
pub fn record(open: f64, high: f64, low: f64, close: f64, volume: u64) -> Value {
    json!({
        "1. open": format!("{open:.4}"),
        "2. high": format!("{high:.4}"),
        "3. low": format!("{low:.4}"),
        "4. close": format!("{close:.4}"),
        "5. volume": volume.to_string(),
    })
}

/// Daily series body with one rising candle per date.
pub fn daily_body(dates: &[&str]) -> Value {
    let series = dates
        .iter()
        .enumerate()
        .map(|(index, date)| {
            let base = 100.0 + index as f64;
            (
                date.to_string(),
                record(base, base + 2.0, base - 1.0, base + 1.0, 1_000 + index as u64),
            )
        })
        .collect::<Map<_, _>>();
    json!({
        "Meta Data": { "2. Symbol": "IBM" },
        "Time Series (Daily)": series,
    })
}
