//! Candlestick rendering.
//!
//! [`ChartRenderer`] is the seam; [`PlottersRenderer`] draws into an RGB
//! buffer with `plotters` and encodes it as PNG with `image`. Candles are
//! laid out by series index, so weekends and holidays leave no gaps.
//!
//! Text goes through plotters' `ab_glyph` backend with the Hack typeface
//! compiled into the binary, so titles and axis labels render the same on
//! hosts without system fonts.

use std::io::Cursor;
use std::sync::OnceLock;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use tracing::debug;

use crate::{ChartArtifact, ChartError, OhlcvSeries};

pub const PNG_CONTENT_TYPE: &str = "image/png";
const DEFAULT_FILENAME: &str = "chart.png";
const MAX_WIDTH: u32 = 16_384;
const FONT_FAMILY: &str = "sans-serif";

/// Turns an ordered series into a static image.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, series: &OhlcvSeries, title: &str) -> Result<ChartArtifact, ChartError>;
}

/// Geometry and palette for [`PlottersRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    /// Narrowest image produced, whatever the candle count.
    pub min_width: u32,
    pub height: u32,
    /// Horizontal pixels reserved per candle.
    pub candle_slot: u32,
    pub margin: u32,
    pub background: (u8, u8, u8),
    pub up: (u8, u8, u8),
    pub down: (u8, u8, u8),
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            min_width: 800,
            height: 600,
            candle_slot: 8,
            margin: 20,
            background: (255, 255, 255),
            up: (38, 166, 154),
            down: (239, 83, 80),
        }
    }
}

impl ChartStyle {
    /// Image size for `candles` points; width grows linearly past the floor.
    pub fn dimensions(&self, candles: usize) -> (u32, u32) {
        let candles = u32::try_from(candles).unwrap_or(u32::MAX);
        let width = candles
            .saturating_mul(self.candle_slot.max(1))
            .saturating_add(self.margin.saturating_mul(2))
            .clamp(self.min_width.max(1), MAX_WIDTH);
        (width, self.height.max(1))
    }

    fn candle_width(&self) -> u32 {
        (self.candle_slot * 7 / 10).max(1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlottersRenderer {
    style: ChartStyle,
}

impl PlottersRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    fn draw(
        &self,
        series: &OhlcvSeries,
        title: &str,
        pixels: &mut [u8],
        (width, height): (u32, u32),
        (y_low, y_high): (f64, f64),
    ) -> Result<(), ChartError> {
        let (r, g, b) = self.style.background;
        let up = RGBColor(self.style.up.0, self.style.up.1, self.style.up.2);
        let down = RGBColor(self.style.down.0, self.style.down.1, self.style.down.2);

        register_chart_font()?;
        let root = BitMapBackend::with_buffer(pixels, (width, height)).into_drawing_area();
        root.fill(&RGBColor(r, g, b)).map_err(render_error)?;

        let points = series.points();
        let last = series.len() as f64 - 0.5;
        let mut chart = ChartBuilder::on(&root)
            .margin(self.style.margin)
            .caption(title, (FONT_FAMILY, 24))
            .x_label_area_size(32)
            .y_label_area_size(64)
            .build_cartesian_2d(-0.5..last, y_low..y_high)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .label_style((FONT_FAMILY, 12))
            .y_desc("Price ($)")
            .y_label_formatter(&|price: &f64| format!("{price:.2}"))
            .x_labels(6)
            .x_label_formatter(&|x: &f64| {
                points
                    .get(x.round().max(0.0) as usize)
                    .map(|point| point.date().to_string())
                    .unwrap_or_default()
            })
            .draw()
            .map_err(render_error)?;

        let candle_width = self.style.candle_width();
        chart
            .draw_series(series.points().iter().enumerate().map(|(index, point)| {
                CandleStick::new(
                    index as f64,
                    point.open,
                    point.high,
                    point.low,
                    point.close,
                    up.filled(),
                    down.filled(),
                    candle_width,
                )
            }))
            .map_err(render_error)?;

        root.present().map_err(render_error)
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, series: &OhlcvSeries, title: &str) -> Result<ChartArtifact, ChartError> {
        if series.is_empty() {
            return Err(ChartError::render("cannot render an empty series"));
        }
        if let Some(point) = series.points().iter().find(|point| !point.is_finite()) {
            return Err(ChartError::render(format!(
                "non-finite price at {}",
                point.timestamp
            )));
        }

        let (width, height) = self.style.dimensions(series.len());
        debug!(title, candles = series.len(), width, height, "rendering chart");

        let mut pixels = vec![0_u8; width as usize * height as usize * 3];
        self.draw(series, title, &mut pixels, (width, height), y_range(series))?;

        let image = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| ChartError::render("pixel buffer does not match image size"))?;
        let mut encoded = Cursor::new(Vec::new());
        image
            .write_to(&mut encoded, ImageFormat::Png)
            .map_err(|e| ChartError::render(format!("png encoding failed: {e}")))?;

        Ok(ChartArtifact {
            bytes: encoded.into_inner(),
            content_type: PNG_CONTENT_TYPE,
            filename: String::from(DEFAULT_FILENAME),
            width,
            height,
        })
    }
}

/// Price axis bounds with 5% headroom; flat series get a small band.
fn y_range(series: &OhlcvSeries) -> (f64, f64) {
    let (low, high) = series.price_range();
    let span = high - low;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (high.abs() * 0.01).max(0.01)
    };
    (low - pad, high + pad)
}

/// Registers the embedded typeface under [`FONT_FAMILY`] once per process.
fn register_chart_font() -> Result<(), ChartError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED.get_or_init(|| {
        register_font(FONT_FAMILY, FontStyle::Normal, epaint_default_fonts::HACK_REGULAR).is_ok()
    });
    if registered {
        Ok(())
    } else {
        Err(ChartError::render("embedded chart font could not be loaded"))
    }
}

fn render_error(error: impl std::fmt::Display) -> ChartError {
    ChartError::render(format!("drawing failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::filter;
    use crate::{ChartErrorKind, DateWindow, QuotePoint};
    use time::macros::date;
    use time::Duration;

    fn series(len: usize) -> OhlcvSeries {
        let start = date!(2024 - 01 - 01);
        let points = (0..len)
            .map(|index| {
                let base = 100.0 + (index % 7) as f64;
                QuotePoint {
                    timestamp: (start + Duration::days(index as i64)).midnight(),
                    open: base,
                    high: base + 2.0,
                    low: base - 2.0,
                    close: if index % 2 == 0 { base + 1.0 } else { base - 1.0 },
                    volume: 1_000,
                }
            })
            .collect::<Vec<_>>();
        let window = DateWindow::new(start, start + Duration::days(len as i64)).expect("window");
        filter(points, window).expect("series")
    }

    #[test]
    fn width_is_floored_then_linear() {
        let style = ChartStyle::default();
        assert_eq!(style.dimensions(1), (800, 600));
        assert_eq!(style.dimensions(200), (200 * 8 + 40, 600));
        assert_eq!(style.dimensions(usize::MAX).0, MAX_WIDTH);
    }

    #[test]
    fn renders_png_with_declared_size() {
        let artifact = PlottersRenderer::default()
            .render(&series(5), "TEST Stock Price")
            .expect("render");

        assert_eq!(artifact.content_type, "image/png");
        assert_eq!(&artifact.bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&artifact.bytes).expect("decodable png");
        assert_eq!((decoded.width(), decoded.height()), (artifact.width, artifact.height));
    }

    #[test]
    fn title_is_drawn_into_the_image() {
        let input = series(5);
        let renderer = PlottersRenderer::default();

        let ibm = renderer.render(&input, "IBM Stock Price").expect("render");
        let other = renderer
            .render(&input, "completely different title")
            .expect("render");

        assert_eq!((ibm.width, ibm.height), (other.width, other.height));
        assert_ne!(ibm.bytes, other.bytes);
    }

    #[test]
    fn caption_band_holds_ink_only_when_titled() {
        let input = series(5);
        let renderer = PlottersRenderer::default();
        let band_ink = |title: &str| {
            let artifact = renderer.render(&input, title).expect("render");
            let decoded = image::load_from_memory(&artifact.bytes)
                .expect("decodable png")
                .to_rgb8();
            let margin = renderer.style().margin;
            (0..decoded.width())
                .flat_map(|x| (margin..margin + 24).map(move |y| (x, y)))
                .filter(|&(x, y)| decoded.get_pixel(x, y).0 != [255, 255, 255])
                .count()
        };

        assert_eq!(band_ink(""), 0);
        assert!(band_ink("AAPL Stock Price") > 0);
    }

    #[test]
    fn flat_single_candle_still_renders() {
        let mut points = series(1).into_points();
        points[0].open = 50.0;
        points[0].high = 50.0;
        points[0].low = 50.0;
        points[0].close = 50.0;
        let window = DateWindow::new(date!(2024 - 01 - 01), date!(2024 - 01 - 01)).expect("window");
        let flat = filter(points, window).expect("series");

        assert!(PlottersRenderer::default().render(&flat, "FLAT").is_ok());
    }

    #[test]
    fn non_finite_values_are_render_errors() {
        let mut points = series(3).into_points();
        points[1].high = f64::INFINITY;
        let window = DateWindow::new(date!(2024 - 01 - 01), date!(2024 - 01 - 10)).expect("window");
        let broken = filter(points, window).expect("series");

        let err = PlottersRenderer::default()
            .render(&broken, "BROKEN")
            .expect_err("must fail");
        assert_eq!(err.kind(), ChartErrorKind::Render);
    }

    #[test]
    fn does_not_touch_input_series() {
        let input = series(4);
        let before = input.clone();
        PlottersRenderer::default()
            .render(&input, "SAME")
            .expect("render");
        assert_eq!(input, before);
    }
}
