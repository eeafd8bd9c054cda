//! Request orchestration.
//!
//! A chart request walks a linear state machine:
//!
//! ```text
//! Fetching → Normalizing → Filtering → Rendering → Done
//! ```
//!
//! Any stage may fail; the failure carries the stage it happened in and is
//! terminal. Spot prices and company overviews only pass through
//! `Fetching`. Requests share nothing mutable, so one [`ChartPipeline`]
//! can serve concurrent callers.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::client::QuoteClient;
use crate::config::{ApiKey, ClientConfig};
use crate::http_client::HttpClient;
use crate::normalize::normalize;
use crate::render::{ChartRenderer, PlottersRenderer};
use crate::window::filter;
use crate::{
    ChartArtifact, ChartError, ChartWindow, Clock, CompanyOverview, IntradayInterval, SeriesKind,
    SpotPrice, Symbol, SystemClock,
};

/// What the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SpotStockPrice,
    SpotCryptoPrice,
    CompanyOverview,
    Chart(ChartWindow),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    pub operation: Operation,
    pub symbol: Symbol,
    /// Bar spacing for `ChartWindow::Day`; ignored otherwise.
    pub interval: IntradayInterval,
    /// Upper bound on the fetch stage.
    pub deadline: Option<Duration>,
}

impl PipelineRequest {
    pub fn new(operation: Operation, symbol: Symbol) -> Self {
        Self {
            operation,
            symbol,
            interval: IntradayInterval::default(),
            deadline: None,
        }
    }

    pub fn chart(symbol: Symbol, window: ChartWindow) -> Self {
        Self::new(Operation::Chart(window), symbol)
    }

    pub fn with_interval(mut self, interval: IntradayInterval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    Spot(SpotPrice),
    Overview(CompanyOverview),
    Chart(ChartArtifact),
}

impl PipelineOutput {
    /// Human-readable rendering for text outputs; `None` for charts.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Spot(spot) => Some(spot.to_string()),
            Self::Overview(overview) => Some(overview.to_string()),
            Self::Chart(_) => None,
        }
    }

    pub fn into_chart(self) -> Option<ChartArtifact> {
        match self {
            Self::Chart(artifact) => Some(artifact),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Fetching,
    Normalizing,
    Filtering,
    Rendering,
    Done,
}

impl PipelineStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Normalizing => "normalizing",
            Self::Filtering => "filtering",
            Self::Rendering => "rendering",
            Self::Done => "done",
        }
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one request, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    #[source]
    pub error: ChartError,
}

impl PipelineFailure {
    pub fn new(stage: PipelineStage, error: ChartError) -> Self {
        Self { stage, error }
    }

    pub const fn user_message(&self) -> &'static str {
        self.error.user_message()
    }
}

/// Runs requests end to end against one provider account.
#[derive(Clone)]
pub struct ChartPipeline {
    client: QuoteClient,
    api_key: ApiKey,
    renderer: Arc<dyn ChartRenderer>,
    clock: Arc<dyn Clock>,
}

impl ChartPipeline {
    pub fn new(client: QuoteClient, api_key: ApiKey) -> Self {
        Self {
            client,
            api_key,
            renderer: Arc::new(PlottersRenderer::default()),
            clock: Arc::new(SystemClock::new()),
        }
    }

    pub fn from_config(http_client: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self::new(
            QuoteClient::from_config(http_client, config),
            config.api_key.clone(),
        )
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineOutput, PipelineFailure> {
        let started = Instant::now();
        let symbol = &request.symbol;
        let result = match request.operation {
            Operation::SpotStockPrice => self
                .fetch(
                    request.deadline,
                    self.client.fetch_stock_price(symbol, &self.api_key),
                )
                .await
                .map(PipelineOutput::Spot),
            Operation::SpotCryptoPrice => self
                .fetch(
                    request.deadline,
                    self.client.fetch_crypto_price(symbol, &self.api_key),
                )
                .await
                .map(PipelineOutput::Spot),
            Operation::CompanyOverview => self
                .fetch(
                    request.deadline,
                    self.client.fetch_overview(symbol, &self.api_key),
                )
                .await
                .map(PipelineOutput::Overview),
            Operation::Chart(window) => self.chart(request, window).await.map(PipelineOutput::Chart),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(
                symbol = %symbol,
                stage = %PipelineStage::Done,
                elapsed_ms,
                "request complete"
            ),
            Err(failure) => warn!(
                symbol = %symbol,
                stage = %failure.stage,
                code = failure.error.code(),
                elapsed_ms,
                "request failed: {}",
                failure.error.message()
            ),
        }
        result
    }

    async fn chart(
        &self,
        request: &PipelineRequest,
        window: ChartWindow,
    ) -> Result<ChartArtifact, PipelineFailure> {
        // One reading per request so the series choice and the filter agree.
        let today = self.clock.today();
        let range = window.resolve(today).map_err(|e| {
            PipelineFailure::new(PipelineStage::Filtering, ChartError::no_data(e.to_string()))
        })?;
        let kind = SeriesKind::for_window(window, range, today, request.interval);

        enter(PipelineStage::Fetching, &request.symbol);
        let payload = self
            .fetch(
                request.deadline,
                self.client.fetch_series(kind, &request.symbol, &self.api_key),
            )
            .await?;

        enter(PipelineStage::Normalizing, &request.symbol);
        let points = normalize(payload, kind)
            .map_err(|e| PipelineFailure::new(PipelineStage::Normalizing, e))?;

        enter(PipelineStage::Filtering, &request.symbol);
        let series =
            filter(points, range).map_err(|e| PipelineFailure::new(PipelineStage::Filtering, e))?;

        enter(PipelineStage::Rendering, &request.symbol);
        let renderer = Arc::clone(&self.renderer);
        let title = format!("{} Stock Price", request.symbol);
        let artifact = tokio::task::spawn_blocking(move || renderer.render(&series, &title))
            .await
            .map_err(|e| ChartError::render(format!("render task aborted: {e}")))
            .and_then(|rendered| rendered)
            .map_err(|e| PipelineFailure::new(PipelineStage::Rendering, e))?;

        Ok(artifact.with_filename(request.symbol.chart_filename()))
    }

    async fn fetch<T, F>(&self, deadline: Option<Duration>, call: F) -> Result<T, PipelineFailure>
    where
        F: Future<Output = Result<T, ChartError>>,
    {
        let result = match deadline {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(ChartError::transport(format!(
                    "request exceeded its {}ms deadline",
                    limit.as_millis()
                )))
            }),
            None => call.await,
        };
        result.map_err(|e| PipelineFailure::new(PipelineStage::Fetching, e))
    }
}

fn enter(stage: PipelineStage, symbol: &Symbol) {
    debug!(symbol = %symbol, stage = %stage, "entering stage");
}
