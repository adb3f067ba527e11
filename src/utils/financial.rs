use crate::utils::stats;

pub const DAYS_PER_YEAR: f64 = 365.2425;
pub const TRADE_DAYS_PER_YEAR: f64 = 252.0;

pub fn calc_annualized_return_rate(daily_values: &[f64]) -> Option<f64> {
    if daily_values.len() > 1 {
        let start_value = daily_values[0];
        let end_value = daily_values[daily_values.len() - 1];
        let days = daily_values.len() as u64;

        return calc_annualized_return_rate_by_start_end(start_value, end_value, days);
    }

    None
}

pub fn calc_annualized_return_rate_by_start_end(
    start_value: f64,
    end_value: f64,
    days: u64,
) -> Option<f64> {
    if start_value > 0.0 && end_value > 0.0 && days > 0 {
        return Some((end_value / start_value).powf(DAYS_PER_YEAR / days as f64) - 1.0);
    }

    None
}

pub fn calc_annualized_volatility(daily_values: &[f64]) -> Option<f64> {
    if daily_values.len() > 1 {
        let daily_changes = stats::pct_change(daily_values);

        if let Some(return_std) = stats::std(&daily_changes) {
            if return_std.is_finite() {
                return Some(return_std * (TRADE_DAYS_PER_YEAR).sqrt());
            }
        }
    }

    None
}

pub fn calc_max_drawdown(values: &[f64]) -> Option<f64> {
    if values.len() > 1 {
        let mut peak = 0.0;
        let mut max_dd = 0.0;

        for &p in values.iter() {
            if p > peak {
                peak = p;
            }

            let dd = (peak - p) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }

        return Some(max_dd);
    }

    None
}

pub fn calc_win_rate(daily_values: &[f64]) -> Option<f64> {
    if daily_values.len() > 1 {
        let daily_return = stats::pct_change(daily_values);

        let win_count = daily_return.iter().filter(|&v| *v > 0.0).count();
        let loss_count = daily_return.iter().filter(|&v| *v < 0.0).count();

        let win_rate = win_count as f64 / (win_count + loss_count) as f64;
        if win_rate.is_finite() {
            return Some(win_rate);
        }
    }

    None
}
