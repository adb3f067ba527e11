use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Competing team a stock belongs to.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Team {
    Blue,
    White,
}

#[derive(Clone, Debug)]
pub struct StockInfo {
    pub ticker: &'static str,
    pub name: &'static str,
    pub sector: &'static str,
    pub team: Team,
    pub category: &'static str,
}

/// All stocks in the race, blue team first.
pub static CATALOG: &[StockInfo] = &[
    entry("IONQ", "IonQ Inc", "Quantum Computing", Team::Blue, "quantum"),
    entry("RGTI", "Rigetti Computing", "Quantum Computing", Team::Blue, "quantum"),
    entry("LMT", "Lockheed Martin", "Aerospace & Defense", Team::Blue, "aerospace"),
    entry("NOC", "Northrop Grumman", "Aerospace & Defense", Team::Blue, "aerospace"),
    entry("RTX", "RTX Corporation", "Aerospace & Defense", Team::Blue, "aerospace"),
    entry("LHX", "L3Harris Technologies", "Aerospace & Defense", Team::Blue, "aerospace"),
    entry("NTLA", "Intellia Therapeutics", "Longevity Biotech", Team::Blue, "longevity"),
    entry("CRSP", "CRISPR Therapeutics", "Longevity Biotech", Team::Blue, "longevity"),
    entry("GOOGL", "Alphabet Inc", "AI & Cloud", Team::Blue, "ai"),
    entry("MSFT", "Microsoft Corporation", "AI & Cloud", Team::Blue, "ai"),
    entry("NVDA", "NVIDIA Corporation", "AI & Cloud", Team::Blue, "ai"),
    entry("META", "Meta Platforms", "AI & Cloud", Team::Blue, "ai"),
    entry("AMZN", "Amazon.com", "AI & Cloud", Team::Blue, "ai"),
    entry("TSM", "Taiwan Semiconductor", "Semiconductors", Team::Blue, "semiconductors"),
    entry("ASML", "ASML Holding", "Semiconductors", Team::Blue, "semiconductors"),
    entry("AMD", "Advanced Micro Devices", "Semiconductors", Team::Blue, "semiconductors"),
    entry("TSLA", "Tesla Inc", "Robotics & EV", Team::Blue, "robotics"),
    entry("XOM", "Exxon Mobil", "Traditional Energy", Team::White, "traditional-energy"),
    entry("CVX", "Chevron Corporation", "Traditional Energy", Team::White, "traditional-energy"),
    entry("COP", "ConocoPhillips", "Traditional Energy", Team::White, "traditional-energy"),
    entry("NEE", "NextEra Energy", "Future Energy", Team::White, "future-energy"),
    entry("ENPH", "Enphase Energy", "Future Energy", Team::White, "future-energy"),
    entry("FSLR", "First Solar", "Future Energy", Team::White, "future-energy"),
    entry("CAT", "Caterpillar Inc", "Industrials", Team::White, "industrials"),
    entry("DE", "Deere & Company", "Industrials", Team::White, "industrials"),
    entry("GE", "General Electric", "Industrials", Team::White, "industrials"),
    entry("JPM", "JPMorgan Chase", "Banking", Team::White, "banks"),
    entry("BAC", "Bank of America", "Banking", Team::White, "banks"),
    entry("WFC", "Wells Fargo", "Banking", Team::White, "banks"),
    entry("PG", "Procter & Gamble", "Consumer Goods", Team::White, "consumer-goods"),
    entry("KO", "Coca-Cola Company", "Consumer Goods", Team::White, "consumer-goods"),
    entry("PEP", "PepsiCo Inc", "Consumer Goods", Team::White, "consumer-goods"),
];

const fn entry(
    ticker: &'static str,
    name: &'static str,
    sector: &'static str,
    team: Team,
    category: &'static str,
) -> StockInfo {
    StockInfo {
        ticker,
        name,
        sector,
        team,
        category,
    }
}

pub fn all_symbols() -> Vec<&'static str> {
    CATALOG.iter().map(|s| s.ticker).collect()
}

pub fn team_symbols(team: Team) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|s| s.team == team)
        .map(|s| s.ticker)
        .collect()
}

pub fn category_symbols(category: &str) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|s| s.category == category)
        .map(|s| s.ticker)
        .collect()
}

pub fn get(ticker: &str) -> Option<&'static StockInfo> {
    CATALOG.iter().find(|s| s.ticker == ticker)
}

pub fn team_of(ticker: &str) -> Option<Team> {
    get(ticker).map(|s| s.team)
}

/// Unique sectors in registry order.
pub fn all_sectors() -> Vec<&'static str> {
    CATALOG.iter().map(|s| s.sector).unique().collect()
}

/// Unique categories in registry order.
pub fn all_categories() -> Vec<&'static str> {
    CATALOG.iter().map(|s| s.category).unique().collect()
}

pub fn stocks_by_sector(sector: &str) -> Vec<&'static StockInfo> {
    CATALOG.iter().filter(|s| s.sector == sector).collect()
}

pub fn is_valid(ticker: &str) -> bool {
    CATALOG.iter().any(|s| s.ticker == ticker)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalog_integrity() {
        assert_eq!(CATALOG.len(), 32);
        assert_eq!(team_symbols(Team::Blue).len(), 17);
        assert_eq!(team_symbols(Team::White).len(), 15);

        let unique: HashSet<_> = all_symbols().into_iter().collect();
        assert_eq!(unique.len(), CATALOG.len());
    }

    #[test]
    fn test_get() {
        let stock = get("MSFT").unwrap();
        assert_eq!(stock.name, "Microsoft Corporation");
        assert_eq!(stock.sector, "AI & Cloud");
        assert_eq!(stock.team, Team::Blue);

        assert!(get("ZZZZ").is_none());
    }

    #[test]
    fn test_team_of() {
        assert_eq!(team_of("IONQ"), Some(Team::Blue));
        assert_eq!(team_of("XOM"), Some(Team::White));
        assert_eq!(team_of("ZZZZ"), None);
    }

    #[test]
    fn test_all_sectors() {
        let sectors = all_sectors();
        assert_eq!(sectors.len(), 11);
        assert_eq!(sectors[0], "Quantum Computing");
        assert!(sectors.contains(&"Banking"));
    }

    #[test]
    fn test_all_categories() {
        let categories = all_categories();
        assert_eq!(categories.len(), 11);
        assert!(categories.contains(&"ai"));
        assert!(categories.contains(&"consumer-goods"));
    }

    #[test]
    fn test_category_symbols() {
        assert_eq!(
            category_symbols("ai"),
            ["GOOGL", "MSFT", "NVDA", "META", "AMZN"]
        );
    }

    #[test]
    fn test_team_parse() {
        use std::str::FromStr;

        assert_eq!(Team::from_str("blue").unwrap(), Team::Blue);
        assert_eq!(Team::from_str("WHITE").unwrap(), Team::White);
        assert!(Team::from_str("red").is_err());
        assert_eq!(Team::Blue.to_string(), "blue");
    }
}
