use std::{path::PathBuf, sync::LazyLock};

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::{
    CONFIG, WORKSPACE, config,
    data::{DateRange, SnapshotMetadata, StockData},
    ds,
    error::*,
    fetch, prefs,
    race::{
        RaceFrame,
        filter::RaceFilters,
        frames::{full_date_span, prepare_frames},
        metrics::{TickerMetrics, calc_race_metrics},
    },
    store,
    utils::datetime::date_to_str,
};

pub use crate::{
    config::Config,
    fetch::{FetchEvent, FetchOptions, FetchResult, FetchStream},
    prefs::Prefs,
};

/// Fetch the whole catalog and write a fresh snapshot.
///
/// Batch tuning comes from the active configuration, the date range
/// falls back to the configured history window ending today.
pub async fn fetch(date_range: Option<DateRange>) -> TrResult<FetchStream> {
    let config = { CONFIG.read().await.clone() };

    let date_range = date_range.unwrap_or_else(|| fetch::date_range_back(config.history_years));

    let options = FetchOptions {
        date_range,
        batch_size: config.batch_size,
        batch_delay_millis: config.batch_delay_millis,
    };

    SNAPSHOT_CACHE.clear();

    fetch::fetch_catalog(&options).await
}

/// Probe the market data source, one status row per endpoint.
pub async fn check() -> TrResult<Vec<(String, Option<TrError>)>> {
    Ok(vec![(
        "Yahoo Finance".to_string(),
        ds::yahoo::check_api().await.err(),
    )])
}

/// Load a snapshot, the latest when no date is given.
pub async fn stocks(date: Option<&NaiveDate>) -> TrResult<Vec<StockData>> {
    let cache_key = date
        .map(date_to_str)
        .unwrap_or_else(|| "latest".to_string());
    if let Some(stocks) = SNAPSHOT_CACHE.get(&cache_key) {
        return Ok(stocks.clone());
    }

    let stocks = store::load_snapshot(date)?;
    SNAPSHOT_CACHE.insert(cache_key, stocks.clone());

    Ok(stocks)
}

/// Load a snapshot bypassing the cache, picking up files written by
/// another process.
pub async fn reload_stocks(date: Option<&NaiveDate>) -> TrResult<Vec<StockData>> {
    let cache_key = date
        .map(date_to_str)
        .unwrap_or_else(|| "latest".to_string());
    SNAPSHOT_CACHE.remove(&cache_key);

    stocks(date).await
}

pub async fn workspace() -> TrResult<PathBuf> {
    let workspace = WORKSPACE.read()?;

    Ok(workspace.clone())
}

pub async fn metadata() -> TrResult<SnapshotMetadata> {
    store::load_metadata()
}

pub async fn snapshot_dates() -> TrResult<Vec<NaiveDate>> {
    store::list_snapshot_dates()
}

/// Build the race frame sequence from a snapshot.
///
/// Without an explicit range the race spans all dates the snapshot
/// covers.
pub async fn race(
    date: Option<&NaiveDate>,
    date_range: Option<DateRange>,
    filters: &RaceFilters,
) -> TrResult<Vec<RaceFrame>> {
    let stocks = stocks(date).await?;

    let date_range = match date_range {
        Some(range) => range,
        None => full_date_span(&stocks).ok_or(TrError::NoData {
            code: "NO_HISTORY",
            message: "Snapshot contains no price history".to_string(),
        })?,
    };

    Ok(prepare_frames(&stocks, &date_range, filters))
}

/// Per-ticker summary statistics over a finished race.
pub async fn race_metrics(
    date: Option<&NaiveDate>,
    date_range: Option<DateRange>,
    filters: &RaceFilters,
) -> TrResult<Vec<TickerMetrics>> {
    let frames = race(date, date_range, filters).await?;

    Ok(calc_race_metrics(&frames))
}

pub async fn get_config() -> TrResult<Config> {
    Ok(CONFIG.read().await.clone())
}

pub async fn set_config(key: &str, value: &str) -> TrResult<()> {
    let mut config = CONFIG.write().await;
    config.set(key, value)?;

    config::store(&config)
}

pub async fn get_prefs() -> TrResult<Prefs> {
    prefs::load()
}

pub async fn set_prefs(prefs: &Prefs) -> TrResult<()> {
    prefs::store(prefs)
}

static SNAPSHOT_CACHE: LazyLock<DashMap<String, Vec<StockData>>> = LazyLock::new(DashMap::new);
