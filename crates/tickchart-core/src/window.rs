use crate::{ChartError, DateWindow, OhlcvSeries, QuotePoint};

/// Keep points dated inside `window` (inclusive, day granularity), oldest first.
///
/// Points sharing a timestamp collapse to the first one seen. An empty
/// result is `NoData`: the provider may have had nothing for the symbol, or
/// nothing inside the window; the two are not told apart.
pub fn filter(points: Vec<QuotePoint>, window: DateWindow) -> Result<OhlcvSeries, ChartError> {
    let mut kept = points
        .into_iter()
        .filter(|point| window.contains(point.date()))
        .collect::<Vec<_>>();

    if kept.is_empty() {
        return Err(ChartError::no_data(format!(
            "no points dated within {window}"
        )));
    }

    kept.sort_by_key(|point| point.timestamp);
    kept.dedup_by_key(|point| point.timestamp);
    Ok(OhlcvSeries::from_ordered(kept))
}
