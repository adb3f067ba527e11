use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{StockInfo, Team};

/// One trading day of a stock's price history.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalDataPoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

/// Point-in-time fundamentals, all optional on upstream failure.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub market_cap: Option<f64>,
    pub last_updated: NaiveDate,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockData {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    pub team: Team,
    pub category: String,
    pub history: Vec<HistoricalDataPoint>,
    pub financials: FinancialMetrics,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Sidecar document describing a snapshot run.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub last_updated: DateTime<Utc>,
    pub date_range: DateRange,
    pub total_stocks: usize,
    pub successful_stocks: usize,
    pub failed_stocks: usize,
    pub blue_team_count: usize,
    pub white_team_count: usize,
}

impl FinancialMetrics {
    pub fn empty(last_updated: NaiveDate) -> Self {
        Self {
            debt_to_equity: None,
            current_ratio: None,
            market_cap: None,
            last_updated,
        }
    }
}

impl StockData {
    pub fn new(
        info: &StockInfo,
        history: Vec<HistoricalDataPoint>,
        financials: FinancialMetrics,
    ) -> Self {
        Self {
            ticker: info.ticker.to_string(),
            name: info.name.to_string(),
            sector: info.sector.to_string(),
            team: info.team,
            category: info.category.to_string(),
            history,
            financials,
            error: None,
        }
    }

    /// Placeholder entry for a ticker whose history could not be fetched.
    pub fn failed(info: &StockInfo, message: String, last_updated: NaiveDate) -> Self {
        Self {
            ticker: info.ticker.to_string(),
            name: info.name.to_string(),
            sector: info.sector.to_string(),
            team: info.team,
            category: info.category.to_string(),
            history: vec![],
            financials: FinancialMetrics::empty(last_updated),
            error: Some(message),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Earliest and latest history dates, tolerating unsorted input.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut span: Option<(NaiveDate, NaiveDate)> = None;

        for point in &self.history {
            span = Some(match span {
                Some((first, last)) => (first.min(point.date), last.max(point.date)),
                None => (point.date, point.date),
            });
        }

        span
    }

    pub fn latest_adj_close(&self) -> Option<f64> {
        self.history.last().map(|point| point.adj_close)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        *date >= self.start && *date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_stock_data_json_field_names() {
        let info = catalog::get("NVDA").unwrap();
        let stock = StockData::new(
            info,
            vec![HistoricalDataPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: 49.0,
                high: 50.0,
                low: 48.5,
                close: 49.5,
                volume: 1000,
                adj_close: 49.5,
            }],
            FinancialMetrics {
                debt_to_equity: Some(17.2),
                current_ratio: None,
                market_cap: Some(1.2e12),
                last_updated: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            },
        );

        let json = serde_json::to_value(&stock).unwrap();
        assert_eq!(json["ticker"], "NVDA");
        assert_eq!(json["team"], "blue");
        assert_eq!(json["history"][0]["adjClose"], 49.5);
        assert_eq!(json["history"][0]["date"], "2024-01-02");
        assert_eq!(json["financials"]["debtToEquity"], 17.2);
        assert!(json["financials"]["currentRatio"].is_null());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_stock_data_error_marker() {
        let info = catalog::get("IONQ").unwrap();
        let failed = StockData::failed(
            info,
            "Failed to fetch historical data".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );

        assert!(failed.has_error());
        assert!(failed.history.is_empty());

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], "Failed to fetch historical data");
        assert!(json["financials"]["marketCap"].is_null());
    }

    #[test]
    fn test_stock_data_parse() {
        let raw = r#"{
            "ticker": "XOM",
            "name": "Exxon Mobil",
            "sector": "Traditional Energy",
            "team": "white",
            "category": "traditional-energy",
            "history": [
                {"date": "2024-01-02", "open": 100.0, "high": 101.0, "low": 99.0,
                 "close": 100.5, "volume": 500, "adjClose": 98.7}
            ],
            "financials": {
                "debtToEquity": null, "currentRatio": 1.4,
                "marketCap": 4.0e11, "lastUpdated": "2024-01-02"
            }
        }"#;

        let stock: StockData = serde_json::from_str(raw).unwrap();
        assert_eq!(stock.team, Team::White);
        assert_eq!(stock.history[0].adj_close, 98.7);
        assert!(!stock.has_error());
        assert_eq!(stock.latest_adj_close(), Some(98.7));
    }

    #[test]
    fn test_date_range() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        assert!(DateRange::new(d1, d2).is_valid());
        assert!(DateRange::new(d1, d1).is_valid());
        assert!(!DateRange::new(d2, d1).is_valid());

        let range = DateRange::new(d1, d2);
        assert!(range.contains(&NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
        assert!(!range.contains(&NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
    }
}
