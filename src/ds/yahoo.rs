use std::collections::HashMap;

use chrono::{DateTime, Days, Local, NaiveDate};
use fake_user_agent::get_rua;
use rand::Rng;
use serde::Deserialize;
use tokio::time::sleep;

use crate::{
    CONFIG,
    data::{DateRange, FinancialMetrics, HistoricalDataPoint},
    error::{TrError, TrResult},
    utils::{datetime::date_to_unix_secs, net::http_get},
};

const YAHOO_TIMEOUT_SECS: u64 = 30;

// Two retries after the initial attempt, three tries in all
const YAHOO_MAX_RETRIES: u32 = 2;

/// Fetch daily bars for a ticker, both ends of the range inclusive
pub async fn fetch_daily_history(
    ticker: &str,
    date_range: &DateRange,
) -> TrResult<Vec<HistoricalDataPoint>> {
    let period1 = date_to_unix_secs(&date_range.start);
    let period2 = date_range
        .end
        .and_hms_opt(23, 59, 59)
        .map(|t| t.and_utc().timestamp())
        .unwrap_or_default();

    let mut query: HashMap<String, String> = HashMap::new();
    query.insert("period1".to_string(), period1.to_string());
    query.insert("period2".to_string(), period2.to_string());
    query.insert("interval".to_string(), "1d".to_string());
    query.insert("includeAdjustedClose".to_string(), "true".to_string());

    let bytes = call_api(&format!("/v8/finance/chart/{ticker}"), &query).await?;

    let response: ChartResponse = serde_json::from_slice(&bytes)?;
    extract_daily_history(ticker, response)
}

/// Fetch balance-sheet style metrics for a ticker, tolerant of absent modules
pub async fn fetch_financial_metrics(
    ticker: &str,
    as_of: &NaiveDate,
) -> TrResult<FinancialMetrics> {
    let mut query: HashMap<String, String> = HashMap::new();
    query.insert("modules".to_string(), "financialData,price".to_string());

    let bytes = call_api(&format!("/v10/finance/quoteSummary/{ticker}"), &query).await?;

    let response: QuoteSummaryResponse = serde_json::from_slice(&bytes)?;
    Ok(extract_financial_metrics(response, as_of))
}

async fn call_api(path: &str, query: &HashMap<String, String>) -> TrResult<Vec<u8>> {
    let api_url = { CONFIG.read().await.yahoo_api.clone() };

    let request_delay_secs: f64 = std::env::var("YAHOO_DELAY")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    if request_delay_secs > 0.0 {
        let secs = (request_delay_secs * rand::rng().random_range(0.67..=1.33)) as u64;
        sleep(tokio::time::Duration::from_secs(secs)).await;
    }

    let mut headers: HashMap<String, String> = HashMap::new();
    headers.insert(
        reqwest::header::USER_AGENT.to_string(),
        get_rua().to_string(),
    );

    http_get(
        &api_url,
        Some(path),
        query,
        &headers,
        YAHOO_TIMEOUT_SECS,
        YAHOO_MAX_RETRIES,
    )
    .await
}

pub async fn check_api() -> TrResult<()> {
    let end = Local::now().date_naive();
    let start = end - Days::new(30);

    let points = fetch_daily_history("NVDA", &DateRange::new(start, end)).await?;
    if !points.is_empty() {
        return Ok(());
    }

    Err(TrError::Invalid {
        code: "INVALID_RESPONSE",
        message: "Invalid response".to_string(),
    })
}

fn extract_daily_history(
    ticker: &str,
    response: ChartResponse,
) -> TrResult<Vec<HistoricalDataPoint>> {
    if let Some(error) = response.chart.error {
        return Err(TrError::NoData {
            code: "YAHOO_CHART_ERROR",
            message: format!("[{ticker}] {}: {}", error.code, error.description),
        });
    }

    let Some(data) = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Err(TrError::NoData {
            code: "YAHOO_CHART_EMPTY",
            message: format!("[{ticker}] Chart response contains no result"),
        });
    };

    let timestamps = data.timestamp.unwrap_or_default();
    let Some(quote) = data.indicators.quote.into_iter().next() else {
        return Ok(vec![]);
    };
    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|adj| adj.into_iter().next())
        .map(|adj| adj.adjclose)
        .unwrap_or_default();

    let mut points: Vec<HistoricalDataPoint> = vec![];
    for (i, ts) in timestamps.iter().enumerate() {
        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // Rows where every field is null are placeholders for halted days
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        let Some(date) = DateTime::from_timestamp(*ts, 0).map(|t| t.date_naive()) else {
            continue;
        };

        let close = close.unwrap_or_default();
        let adj_close = match adj_closes.get(i).copied().flatten() {
            Some(v) if v != 0.0 => v,
            _ => close,
        };

        points.push(HistoricalDataPoint {
            date,
            open: open.unwrap_or_default(),
            high: high.unwrap_or_default(),
            low: low.unwrap_or_default(),
            close,
            volume: volume.unwrap_or_default(),
            adj_close,
        });
    }

    Ok(points)
}

fn extract_financial_metrics(response: QuoteSummaryResponse, as_of: &NaiveDate) -> FinancialMetrics {
    let result = response
        .quote_summary
        .and_then(|summary| summary.result)
        .and_then(|results| results.into_iter().next());

    let Some(result) = result else {
        return FinancialMetrics::empty(*as_of);
    };

    let (debt_to_equity, current_ratio) = match result.financial_data {
        Some(financial) => (
            financial.debt_to_equity.and_then(|v| v.raw),
            financial.current_ratio.and_then(|v| v.raw),
        ),
        None => (None, None),
    };
    let market_cap = result
        .price
        .and_then(|price| price.market_cap)
        .and_then(|v| v.raw);

    FinancialMetrics {
        debt_to_equity,
        current_ratio,
        market_cap,
        last_updated: *as_of,
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize, Default)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,

    #[serde(default)]
    high: Vec<Option<f64>>,

    #[serde(default)]
    low: Vec<Option<f64>>,

    #[serde(default)]
    close: Vec<Option<f64>>,

    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: Option<QuoteSummary>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialData>,

    price: Option<PriceData>,
}

#[derive(Debug, Deserialize)]
struct FinancialData {
    #[serde(rename = "debtToEquity")]
    debt_to_equity: Option<RawValue>,

    #[serde(rename = "currentRatio")]
    current_ratio: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct PriceData {
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}
