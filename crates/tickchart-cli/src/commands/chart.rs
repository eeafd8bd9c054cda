use tickchart_core::{ChartWindow, DateWindow, PipelineRequest, Symbol, ValidationError};

use crate::cli::{ChartArgs, WindowArg};

pub fn request(args: &ChartArgs) -> Result<PipelineRequest, ValidationError> {
    let symbol = Symbol::parse(&args.symbol)?;

    let window = match (&args.start, &args.end) {
        (Some(start), Some(end)) => ChartWindow::Custom(DateWindow::parse(start, end)?),
        _ => match args.window {
            WindowArg::Day => ChartWindow::Day,
            WindowArg::Week => ChartWindow::Week,
            WindowArg::Month => ChartWindow::Month,
            WindowArg::Year => ChartWindow::Year,
        },
    };

    Ok(PipelineRequest::chart(symbol, window).with_interval(args.interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickchart_core::{IntradayInterval, Operation};
    use time::macros::date;

    fn args(window: WindowArg, start: Option<&str>, end: Option<&str>) -> ChartArgs {
        ChartArgs {
            symbol: String::from("aapl"),
            window,
            start: start.map(str::to_owned),
            end: end.map(str::to_owned),
            interval: IntradayInterval::FifteenMinutes,
            out: None,
        }
    }

    #[test]
    fn custom_dates_take_precedence() {
        let request = request(&args(WindowArg::Year, Some("2024-01-01"), Some("2024-01-31")))
            .expect("request");
        let Operation::Chart(ChartWindow::Custom(window)) = request.operation else {
            panic!("expected custom window");
        };
        assert_eq!(window.start(), date!(2024 - 01 - 01));
        assert_eq!(window.end(), date!(2024 - 01 - 31));
    }

    #[test]
    fn named_window_and_interval_are_carried() {
        let request = request(&args(WindowArg::Day, None, None)).expect("request");
        assert_eq!(request.operation, Operation::Chart(ChartWindow::Day));
        assert_eq!(request.interval, IntradayInterval::FifteenMinutes);
    }

    #[test]
    fn bad_dates_are_validation_errors() {
        assert!(matches!(
            request(&args(WindowArg::Week, Some("2024-02-30"), Some("2024-03-01"))),
            Err(ValidationError::InvalidDate { .. })
        ));
        assert!(matches!(
            request(&args(WindowArg::Week, Some("2024-03-05"), Some("2024-03-01"))),
            Err(ValidationError::WindowStartAfterEnd { .. })
        ));
    }
}
