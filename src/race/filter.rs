use chrono::Months;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Team,
    data::{DateRange, StockData},
};

/// Team predicate, `All` passes both teams.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum TeamFilter {
    #[default]
    All,
    Blue,
    White,
}

/// Date window anchored at the newest snapshot date, `All` keeps the full span.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumIter,
)]
pub enum RangePreset {
    #[serde(rename = "1m")]
    #[strum(to_string = "1M")]
    M1,
    #[serde(rename = "3m")]
    #[strum(to_string = "3M")]
    M3,
    #[serde(rename = "6m")]
    #[strum(to_string = "6M")]
    M6,
    #[serde(rename = "1y")]
    #[strum(to_string = "1Y")]
    Y1,
    #[serde(rename = "3y")]
    #[strum(to_string = "3Y")]
    Y3,
    #[serde(rename = "5y")]
    #[strum(to_string = "5Y")]
    Y5,
    #[default]
    #[serde(rename = "all")]
    #[strum(to_string = "All")]
    All,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RaceFilters {
    pub team: TeamFilter,
    pub selected_sectors: Vec<String>,
}

impl TeamFilter {
    pub fn matches(&self, team: Team) -> bool {
        match self {
            TeamFilter::All => true,
            TeamFilter::Blue => team == Team::Blue,
            TeamFilter::White => team == Team::White,
        }
    }
}

impl From<Team> for TeamFilter {
    fn from(team: Team) -> Self {
        match team {
            Team::Blue => TeamFilter::Blue,
            Team::White => TeamFilter::White,
        }
    }
}

impl RangePreset {
    /// Months looking back from the span end, `None` for the full span.
    pub fn months_back(&self) -> Option<u32> {
        match self {
            RangePreset::M1 => Some(1),
            RangePreset::M3 => Some(3),
            RangePreset::M6 => Some(6),
            RangePreset::Y1 => Some(12),
            RangePreset::Y3 => Some(36),
            RangePreset::Y5 => Some(60),
            RangePreset::All => None,
        }
    }

    /// Cut the window out of `full_span`, clamping to its start when the
    /// span is shorter than the preset.
    pub fn resolve(&self, full_span: &DateRange) -> DateRange {
        match self.months_back() {
            Some(months) => {
                let start = full_span
                    .end
                    .checked_sub_months(Months::new(months))
                    .unwrap_or(full_span.start)
                    .max(full_span.start);
                DateRange::new(start, full_span.end)
            }
            None => *full_span,
        }
    }
}

/// Keep stocks passing the team and sector predicates, dropping any
/// stock carrying an error marker regardless of other filters.
pub fn filter_stocks<'a>(stocks: &'a [StockData], filters: &RaceFilters) -> Vec<&'a StockData> {
    stocks
        .iter()
        .filter(|stock| {
            if !filters.team.matches(stock.team) {
                return false;
            }

            if !filters.selected_sectors.is_empty()
                && !filters.selected_sectors.contains(&stock.sector)
            {
                return false;
            }

            !stock.has_error()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{catalog, data::FinancialMetrics};

    fn stock(ticker: &str) -> StockData {
        let info = catalog::get(ticker).unwrap();
        StockData::new(
            info,
            vec![],
            FinancialMetrics::empty(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
        )
    }

    fn failed_stock(ticker: &str) -> StockData {
        let info = catalog::get(ticker).unwrap();
        StockData::failed(
            info,
            "Failed to fetch historical data".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        )
    }

    #[test]
    fn test_filter_all_passes_both_teams() {
        let stocks = vec![stock("NVDA"), stock("XOM")];
        let kept = filter_stocks(&stocks, &RaceFilters::default());

        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_filter_by_team() {
        let stocks = vec![stock("NVDA"), stock("XOM"), stock("JPM")];

        let filters = RaceFilters {
            team: TeamFilter::White,
            selected_sectors: vec![],
        };
        let kept = filter_stocks(&stocks, &filters);

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|s| s.team == Team::White));
    }

    #[test]
    fn test_filter_by_sector() {
        let stocks = vec![stock("NVDA"), stock("MSFT"), stock("XOM")];

        let filters = RaceFilters {
            team: TeamFilter::All,
            selected_sectors: vec!["AI & Cloud".to_string()],
        };
        let kept = filter_stocks(&stocks, &filters);

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|s| s.sector == "AI & Cloud"));
    }

    #[test]
    fn test_filter_empty_sectors_means_all() {
        let stocks = vec![stock("NVDA"), stock("XOM")];

        let filters = RaceFilters {
            team: TeamFilter::All,
            selected_sectors: vec![],
        };

        assert_eq!(filter_stocks(&stocks, &filters).len(), 2);
    }

    #[test]
    fn test_filter_drops_errored_stocks() {
        let stocks = vec![stock("NVDA"), failed_stock("IONQ")];

        let kept = filter_stocks(&stocks, &RaceFilters::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ticker, "NVDA");

        // still dropped when the team filter would match
        let filters = RaceFilters {
            team: TeamFilter::Blue,
            selected_sectors: vec![],
        };
        let kept = filter_stocks(&stocks, &filters);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_team_filter_parse() {
        use std::str::FromStr;

        assert_eq!(TeamFilter::from_str("all").unwrap(), TeamFilter::All);
        assert_eq!(TeamFilter::from_str("Blue").unwrap(), TeamFilter::Blue);
        assert_eq!(TeamFilter::from(Team::White), TeamFilter::White);
        assert_eq!(TeamFilter::All.to_string(), "all");
    }

    #[test]
    fn test_range_preset_resolve() {
        let span = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
        );

        let resolved = RangePreset::M3.resolve(&span);
        assert_eq!(resolved.start, NaiveDate::from_ymd_opt(2024, 3, 28).unwrap());
        assert_eq!(resolved.end, span.end);

        assert_eq!(RangePreset::All.resolve(&span), span);
    }

    #[test]
    fn test_range_preset_clamps_to_span_start() {
        let span = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
        );

        assert_eq!(RangePreset::Y5.resolve(&span), span);
    }

    #[test]
    fn test_range_preset_labels() {
        assert_eq!(RangePreset::M1.to_string(), "1M");
        assert_eq!(RangePreset::Y1.to_string(), "1Y");
        assert_eq!(RangePreset::default(), RangePreset::All);
    }
}
