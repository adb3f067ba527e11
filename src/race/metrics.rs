use std::{cmp::Ordering, collections::HashMap};

use crate::{
    catalog::Team,
    race::RaceFrame,
    utils::{
        financial::{
            calc_annualized_return_rate_by_start_end, calc_annualized_volatility,
            calc_max_drawdown, calc_win_rate,
        },
        stats,
    },
};

/// Per-stock summary across an entire frame sequence.
#[derive(Clone, Debug)]
pub struct TickerMetrics {
    pub ticker: String,
    pub name: String,
    pub team: Team,
    pub final_return: f64,
    pub annualized_return_rate: Option<f64>,
    pub annualized_volatility: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub win_rate: Option<f64>,
    pub best_rank: usize,
    pub frames_present: usize,
}

struct Trajectory {
    name: String,
    team: Team,
    returns: Vec<f64>,
    best_rank: usize,
}

/// Summarize every stock that appeared in at least one frame, ordered
/// by final cumulative return descending.
pub fn calc_race_metrics(frames: &[RaceFrame]) -> Vec<TickerMetrics> {
    let days = match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => (last.date - first.date).num_days() as u64 + 1,
        _ => return vec![],
    };

    let mut trajectories: HashMap<String, Trajectory> = HashMap::new();

    for frame in frames {
        for entry in &frame.stocks {
            let trajectory = trajectories
                .entry(entry.ticker.clone())
                .or_insert_with(|| Trajectory {
                    name: entry.name.clone(),
                    team: entry.team,
                    returns: vec![],
                    best_rank: entry.rank,
                });

            trajectory.returns.push(entry.cumulative_return);
            trajectory.best_rank = trajectory.best_rank.min(entry.rank);
        }
    }

    let mut metrics: Vec<TickerMetrics> = trajectories
        .into_iter()
        .map(|(ticker, trajectory)| {
            let first = trajectory.returns.first().copied().unwrap_or(1.0);
            let last = trajectory.returns.last().copied().unwrap_or(1.0);

            TickerMetrics {
                ticker,
                name: trajectory.name,
                team: trajectory.team,
                final_return: last,
                annualized_return_rate: calc_annualized_return_rate_by_start_end(
                    first, last, days,
                ),
                annualized_volatility: calc_annualized_volatility(&trajectory.returns),
                max_drawdown: calc_max_drawdown(&trajectory.returns),
                win_rate: calc_win_rate(&trajectory.returns),
                best_rank: trajectory.best_rank,
                frames_present: trajectory.returns.len(),
            }
        })
        .collect();

    metrics.sort_by(|a, b| {
        b.final_return
            .partial_cmp(&a.final_return)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });

    metrics
}

pub fn team_average_return(metrics: &[TickerMetrics], team: Team) -> Option<f64> {
    let returns: Vec<f64> = metrics
        .iter()
        .filter(|m| m.team == team)
        .map(|m| m.final_return)
        .collect();

    stats::mean(&returns)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::race::RaceEntry;

    fn entry(ticker: &str, team: Team, cumulative_return: f64, rank: usize) -> RaceEntry {
        RaceEntry {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            cumulative_return,
            rank,
            team,
            sector: "Test".to_string(),
            percent_change: 0.0,
        }
    }

    fn frame(day: u32, stocks: Vec<RaceEntry>) -> RaceFrame {
        RaceFrame {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            stocks,
        }
    }

    #[test]
    fn test_calc_race_metrics() {
        let frames = vec![
            frame(
                1,
                vec![
                    entry("AAA", Team::Blue, 1.0, 1),
                    entry("BBB", Team::White, 1.0, 2),
                ],
            ),
            frame(
                2,
                vec![
                    entry("AAA", Team::Blue, 1.1, 1),
                    entry("BBB", Team::White, 0.9, 2),
                ],
            ),
            frame(
                3,
                vec![
                    entry("AAA", Team::Blue, 1.21, 1),
                    entry("BBB", Team::White, 0.95, 2),
                ],
            ),
        ];

        let metrics = calc_race_metrics(&frames);

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].ticker, "AAA");
        assert_eq!(metrics[0].final_return, 1.21);
        assert_eq!(metrics[0].best_rank, 1);
        assert_eq!(metrics[0].frames_present, 3);
        assert_eq!(metrics[0].win_rate, Some(1.0));
        assert!(metrics[0].annualized_return_rate.unwrap() > 0.0);

        assert_eq!(metrics[1].ticker, "BBB");
        assert_eq!(metrics[1].final_return, 0.95);
        assert_eq!(metrics[1].win_rate, Some(0.5));
        assert!((metrics[1].max_drawdown.unwrap() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_calc_race_metrics_empty() {
        assert!(calc_race_metrics(&[]).is_empty());
    }

    #[test]
    fn test_team_average_return() {
        let frames = vec![frame(
            1,
            vec![
                entry("AAA", Team::Blue, 1.2, 1),
                entry("BBB", Team::Blue, 1.0, 2),
                entry("CCC", Team::White, 0.8, 3),
            ],
        )];

        let metrics = calc_race_metrics(&frames);

        assert!((team_average_return(&metrics, Team::Blue).unwrap() - 1.1).abs() < 1e-9);
        assert!((team_average_return(&metrics, Team::White).unwrap() - 0.8).abs() < 1e-9);
        assert_eq!(
            team_average_return(&[], Team::Blue),
            None
        );
    }
}
