use std::{path::PathBuf, time::Duration};

use chrono::{Months, NaiveDate, Utc};
use log::debug;
use rand::Rng;
use tokio::sync::{mpsc, mpsc::Receiver};

use crate::{
    CHANNEL_BUFFER_DEFAULT,
    catalog::{CATALOG, StockInfo, Team},
    data::{DateRange, FinancialMetrics, SnapshotMetadata, StockData},
    ds,
    error::*,
    store,
};

pub const BATCH_SIZE_DEFAULT: usize = 5;
pub const BATCH_DELAY_MILLIS_DEFAULT: u64 = 1000;
pub const HISTORY_YEARS_DEFAULT: u32 = 5;

pub enum FetchEvent {
    Fetched(String),
    Failed(String),
    Info(String),
    Result(FetchResult),
    Error(TrError),
}

#[derive(Clone)]
pub struct FetchOptions {
    pub date_range: DateRange,
    pub batch_size: usize,
    pub batch_delay_millis: u64,
}

pub struct FetchStream {
    receiver: Receiver<FetchEvent>,
}

pub struct FetchResult {
    pub snapshot_path: PathBuf,
    pub latest_path: PathBuf,
    pub metadata: SnapshotMetadata,
    pub failed_tickers: Vec<String>,
}

/// History range used when none is given, today back through five years
pub fn default_date_range() -> DateRange {
    date_range_back(HISTORY_YEARS_DEFAULT)
}

pub fn date_range_back(years: u32) -> DateRange {
    let end = Utc::now().date_naive();
    let start = end
        .checked_sub_months(Months::new(12 * years))
        .unwrap_or(end);

    DateRange::new(start, end)
}

/// Fetch every catalog ticker in batches, then write the snapshot files
pub async fn fetch_catalog(options: &FetchOptions) -> TrResult<FetchStream> {
    let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_DEFAULT);

    let options = options.clone();

    tokio::spawn(async move {
        let process = async || {
            let today = Utc::now().date_naive();
            let batch_size = options.batch_size.max(1);
            let total_batches = CATALOG.len().div_ceil(batch_size);

            let mut stocks: Vec<StockData> = vec![];
            for (batch_index, batch) in CATALOG.chunks(batch_size).enumerate() {
                let _ = sender
                    .send(FetchEvent::Info(format!(
                        "Batch {}/{total_batches}",
                        batch_index + 1
                    )))
                    .await;

                let mut handles = vec![];
                for info in batch {
                    let date_range = options.date_range;
                    handles.push(tokio::spawn(async move {
                        fetch_stock(info, &date_range, &today).await
                    }));
                }

                for handle in handles {
                    let stock = handle.await?;

                    let event = match &stock.error {
                        Some(message) => {
                            FetchEvent::Failed(format!("[{}] {message}", stock.ticker))
                        }
                        None => FetchEvent::Fetched(format!(
                            "[{}] {} trading days",
                            stock.ticker,
                            stock.history.len()
                        )),
                    };
                    let _ = sender.send(event).await;

                    stocks.push(stock);
                }

                if (batch_index + 1) * batch_size < CATALOG.len() {
                    let millis = (options.batch_delay_millis as f64
                        * rand::rng().random_range(0.67..=1.33))
                        as u64;
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                }
            }

            let failed_tickers: Vec<String> = stocks
                .iter()
                .filter(|stock| stock.has_error())
                .map(|stock| stock.ticker.clone())
                .collect();

            let metadata = snapshot_metadata(&stocks, &options.date_range);

            let (snapshot_path, latest_path) = store::save_snapshot(&stocks, &today)?;
            store::save_metadata(&metadata)?;

            Ok(FetchResult {
                snapshot_path,
                latest_path,
                metadata,
                failed_tickers,
            })
        };

        match process().await {
            Ok(result) => {
                let _ = sender.send(FetchEvent::Result(result)).await;
            }
            Err(err) => {
                let _ = sender.send(FetchEvent::Error(err)).await;
            }
        }
    });

    Ok(FetchStream { receiver })
}

/// Team tallies count successfully fetched stocks only.
fn snapshot_metadata(stocks: &[StockData], date_range: &DateRange) -> SnapshotMetadata {
    let failed = stocks.iter().filter(|stock| stock.has_error()).count();

    SnapshotMetadata {
        last_updated: Utc::now(),
        date_range: *date_range,
        total_stocks: stocks.len(),
        successful_stocks: stocks.len() - failed,
        failed_stocks: failed,
        blue_team_count: stocks
            .iter()
            .filter(|stock| !stock.has_error() && stock.team == Team::Blue)
            .count(),
        white_team_count: stocks
            .iter()
            .filter(|stock| !stock.has_error() && stock.team == Team::White)
            .count(),
    }
}

async fn fetch_stock(info: &StockInfo, date_range: &DateRange, today: &NaiveDate) -> StockData {
    match ds::yahoo::fetch_daily_history(info.ticker, date_range).await {
        Ok(history) => {
            let financials = match ds::yahoo::fetch_financial_metrics(info.ticker, today).await {
                Ok(financials) => financials,
                Err(err) => {
                    debug!("[{}] Financial metrics unavailable: {err}", info.ticker);
                    FinancialMetrics::empty(*today)
                }
            };

            StockData::new(info, history, financials)
        }
        Err(err) => StockData::failed(info, err.to_string(), *today),
    }
}

impl FetchOptions {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            batch_size: BATCH_SIZE_DEFAULT,
            batch_delay_millis: BATCH_DELAY_MILLIS_DEFAULT,
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new(default_date_range())
    }
}

impl FetchStream {
    pub fn new(receiver: Receiver<FetchEvent>) -> Self {
        Self { receiver }
    }

    pub fn close(&mut self) {
        self.receiver.close()
    }

    pub async fn next(&mut self) -> Option<FetchEvent> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_metadata_team_counts_skip_failed() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let stocks = vec![
            StockData::new(
                catalog::get("NVDA").unwrap(),
                vec![],
                FinancialMetrics::empty(date),
            ),
            StockData::new(
                catalog::get("XOM").unwrap(),
                vec![],
                FinancialMetrics::empty(date),
            ),
            StockData::failed(catalog::get("IONQ").unwrap(), "timeout".to_string(), date),
            StockData::failed(catalog::get("CVX").unwrap(), "timeout".to_string(), date),
        ];

        let metadata = snapshot_metadata(&stocks, &DateRange::new(date, date));

        assert_eq!(metadata.total_stocks, 4);
        assert_eq!(metadata.successful_stocks, 2);
        assert_eq!(metadata.failed_stocks, 2);
        assert_eq!(metadata.blue_team_count, 1);
        assert_eq!(metadata.white_team_count, 1);
    }

    #[test]
    fn test_default_date_range() {
        let range = default_date_range();

        assert!(range.is_valid());

        let days = (range.end - range.start).num_days();
        assert!((1820..=1830).contains(&days));
    }

    #[test]
    fn test_fetch_options_defaults() {
        let options = FetchOptions::default();

        assert_eq!(options.batch_size, 5);
        assert_eq!(options.batch_delay_millis, 1000);
    }
}
