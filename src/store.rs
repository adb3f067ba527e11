use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use log::debug;

use crate::{
    WORKSPACE,
    data::{SnapshotMetadata, StockData},
    error::{TrError, TrResult},
    utils::datetime::{date_from_str, date_to_str},
};

pub const LATEST_SNAPSHOT_FILE: &str = "stocks-latest.json";
pub const METADATA_FILE: &str = "metadata.json";

fn workspace_dir() -> TrResult<PathBuf> {
    Ok(WORKSPACE.read()?.clone())
}

/// Load the latest snapshot, or the dated one when a date is given.
pub fn load_snapshot(date: Option<&NaiveDate>) -> TrResult<Vec<StockData>> {
    load_snapshot_in(&workspace_dir()?, date)
}

pub fn load_snapshot_in(dir: &Path, date: Option<&NaiveDate>) -> TrResult<Vec<StockData>> {
    let path = match date {
        Some(date) => dir.join(format!("stocks-{}.json", date_to_str(date))),
        None => dir.join(LATEST_SNAPSHOT_FILE),
    };

    if !path.is_file() {
        return Err(TrError::NotExists {
            code: "SNAPSHOT_NOT_EXISTS",
            message: format!("No snapshot at '{}', fetch data first", path.display()),
        });
    }

    debug!("Loading snapshot from '{}'", path.display());

    let bytes = fs::read(&path)?;
    let stocks: Vec<StockData> = serde_json::from_slice(&bytes)?;

    Ok(stocks)
}

pub fn load_metadata() -> TrResult<SnapshotMetadata> {
    load_metadata_in(&workspace_dir()?)
}

pub fn load_metadata_in(dir: &Path) -> TrResult<SnapshotMetadata> {
    let path = dir.join(METADATA_FILE);

    if !path.is_file() {
        return Err(TrError::NotExists {
            code: "METADATA_NOT_EXISTS",
            message: format!("No metadata at '{}', fetch data first", path.display()),
        });
    }

    let bytes = fs::read(&path)?;
    let metadata: SnapshotMetadata = serde_json::from_slice(&bytes)?;

    Ok(metadata)
}

/// Write the snapshot both as a dated file and as the latest file,
/// returning the two paths.
pub fn save_snapshot(stocks: &[StockData], date: &NaiveDate) -> TrResult<(PathBuf, PathBuf)> {
    save_snapshot_in(&workspace_dir()?, stocks, date)
}

pub fn save_snapshot_in(
    dir: &Path,
    stocks: &[StockData],
    date: &NaiveDate,
) -> TrResult<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(stocks)?;

    let dated_path = dir.join(format!("stocks-{}.json", date_to_str(date)));
    fs::write(&dated_path, &json)?;

    let latest_path = dir.join(LATEST_SNAPSHOT_FILE);
    fs::write(&latest_path, &json)?;

    Ok((dated_path, latest_path))
}

pub fn save_metadata(metadata: &SnapshotMetadata) -> TrResult<PathBuf> {
    save_metadata_in(&workspace_dir()?, metadata)
}

pub fn save_metadata_in(dir: &Path, metadata: &SnapshotMetadata) -> TrResult<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(METADATA_FILE);
    fs::write(&path, serde_json::to_string_pretty(metadata)?)?;

    Ok(path)
}

/// Dates of all stored dated snapshots, ascending.
pub fn list_snapshot_dates() -> TrResult<Vec<NaiveDate>> {
    list_snapshot_dates_in(&workspace_dir()?)
}

pub fn list_snapshot_dates_in(dir: &Path) -> TrResult<Vec<NaiveDate>> {
    let mut dates: Vec<NaiveDate> = vec![];

    if dir.is_dir() {
        for dir_entry in fs::read_dir(dir)? {
            let file_name = dir_entry?.file_name();

            if let Some(name) = file_name.to_str() {
                if let Some(stem) = name
                    .strip_prefix("stocks-")
                    .and_then(|s| s.strip_suffix(".json"))
                {
                    if let Ok(date) = date_from_str(stem) {
                        dates.push(date);
                    }
                }
            }
        }
    }

    dates.sort();

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        catalog,
        data::{DateRange, FinancialMetrics},
    };

    fn sample_stocks() -> Vec<StockData> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        vec![
            StockData::new(
                catalog::get("NVDA").unwrap(),
                vec![],
                FinancialMetrics::empty(date),
            ),
            StockData::failed(catalog::get("IONQ").unwrap(), "timeout".to_string(), date),
        ]
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let (dated, latest) = save_snapshot_in(dir.path(), &sample_stocks(), &date).unwrap();
        assert!(dated.ends_with("stocks-2024-01-02.json"));
        assert!(latest.ends_with(LATEST_SNAPSHOT_FILE));

        let loaded = load_snapshot_in(dir.path(), None).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].ticker, "NVDA");
        assert!(!loaded[0].has_error());
        assert_eq!(loaded[1].error.as_deref(), Some("timeout"));

        let dated_loaded = load_snapshot_in(dir.path(), Some(&date)).unwrap();
        assert_eq!(dated_loaded.len(), 2);
    }

    #[test]
    fn test_load_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_snapshot_in(dir.path(), None).unwrap_err();
        assert!(matches!(err, TrError::NotExists { .. }));
    }

    #[test]
    fn test_metadata_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        let metadata = SnapshotMetadata {
            last_updated: Utc::now(),
            date_range: DateRange::new(
                NaiveDate::from_ymd_opt(2019, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            ),
            total_stocks: 32,
            successful_stocks: 31,
            failed_stocks: 1,
            blue_team_count: 17,
            white_team_count: 14,
        };

        save_metadata_in(dir.path(), &metadata).unwrap();
        let loaded = load_metadata_in(dir.path()).unwrap();

        assert_eq!(loaded.total_stocks, 32);
        assert_eq!(loaded.failed_stocks, 1);
        assert_eq!(loaded.date_range, metadata.date_range);
    }

    #[test]
    fn test_list_snapshot_dates() {
        let dir = tempfile::tempdir().unwrap();
        let stocks = sample_stocks();

        save_snapshot_in(
            dir.path(),
            &stocks,
            &NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .unwrap();
        save_snapshot_in(
            dir.path(),
            &stocks,
            &NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let dates = list_snapshot_dates_in(dir.path()).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
    }
}
