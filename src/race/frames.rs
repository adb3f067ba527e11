use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
};

use chrono::NaiveDate;

use crate::{
    data::{DateRange, StockData},
    race::{
        RaceEntry, RaceFrame,
        filter::{RaceFilters, filter_stocks},
    },
};

/// A frame carries at most this many ranked stocks.
pub const MAX_STOCKS_PER_FRAME: usize = 20;

struct IndexedStock<'a> {
    stock: &'a StockData,
    adj_close_by_date: HashMap<NaiveDate, f64>,
}

/// Build the ordered frame sequence for one filter/date configuration.
///
/// The earliest trading date in range is the baseline for every
/// cumulative return of the run. Per-stock percent changes thread
/// through the date loop relative to the previously emitted frame.
/// Empty filter results and empty date sets yield an empty sequence.
pub fn prepare_frames(
    stocks: &[StockData],
    date_range: &DateRange,
    filters: &RaceFilters,
) -> Vec<RaceFrame> {
    let filtered = filter_stocks(stocks, filters);
    if filtered.is_empty() {
        return vec![];
    }

    let dates = extract_unique_dates(&filtered, date_range);
    let Some(baseline_date) = dates.first().copied() else {
        return vec![];
    };

    let indexed: Vec<IndexedStock> = filtered
        .iter()
        .map(|stock| IndexedStock {
            stock,
            adj_close_by_date: stock
                .history
                .iter()
                .map(|point| (point.date, point.adj_close))
                .collect(),
        })
        .collect();

    let mut frames: Vec<RaceFrame> = Vec::with_capacity(dates.len());
    let mut previous_returns: HashMap<String, f64> = HashMap::new();

    for date in dates {
        let frame_stocks = build_frame_stocks(&indexed, &date, &baseline_date, &previous_returns);

        if !frame_stocks.is_empty() {
            previous_returns = frame_stocks
                .iter()
                .map(|entry| (entry.ticker.clone(), entry.cumulative_return))
                .collect();

            frames.push(RaceFrame {
                date,
                stocks: frame_stocks,
            });
        }
    }

    frames
}

/// Earliest and latest history dates across all stocks, None when no
/// stock carries any history.
pub fn full_date_span(stocks: &[StockData]) -> Option<DateRange> {
    let mut span: Option<DateRange> = None;

    for stock in stocks {
        if let Some((first, last)) = stock.date_span() {
            span = Some(match span {
                Some(range) => DateRange::new(range.start.min(first), range.end.max(last)),
                None => DateRange::new(first, last),
            });
        }
    }

    span
}

/// Union of history dates across all stocks, restricted to the range,
/// ascending and deduplicated.
fn extract_unique_dates(stocks: &[&StockData], date_range: &DateRange) -> Vec<NaiveDate> {
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for stock in stocks {
        for point in &stock.history {
            if date_range.contains(&point.date) {
                dates.insert(point.date);
            }
        }
    }

    dates.into_iter().collect()
}

fn build_frame_stocks(
    stocks: &[IndexedStock],
    date: &NaiveDate,
    baseline_date: &NaiveDate,
    previous_returns: &HashMap<String, f64>,
) -> Vec<RaceEntry> {
    let mut entries: Vec<RaceEntry> = vec![];

    for indexed in stocks {
        // A stock without a point on this date sits the frame out.
        let Some(adj_close) = indexed.adj_close_by_date.get(date) else {
            continue;
        };

        // Missing or non-positive baseline pins the stock at neutral 1.0.
        let cumulative_return = match indexed.adj_close_by_date.get(baseline_date) {
            Some(baseline_adj_close) if *baseline_adj_close > 0.0 => {
                *adj_close / *baseline_adj_close
            }
            _ => 1.0,
        };

        let percent_change = match previous_returns.get(&indexed.stock.ticker) {
            Some(previous) if *previous > 0.0 => {
                (cumulative_return - *previous) / *previous * 100.0
            }
            _ => 0.0,
        };

        entries.push(RaceEntry {
            ticker: indexed.stock.ticker.clone(),
            name: indexed.stock.name.clone(),
            cumulative_return,
            rank: 0,
            team: indexed.stock.team,
            sector: indexed.stock.sector.clone(),
            percent_change,
        });
    }

    // Stable sort keeps input order across equal returns.
    entries.sort_by(|a, b| {
        b.cumulative_return
            .partial_cmp(&a.cumulative_return)
            .unwrap_or(Ordering::Equal)
    });

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    entries.truncate(MAX_STOCKS_PER_FRAME);

    entries
}
