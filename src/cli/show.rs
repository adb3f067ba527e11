use chrono::NaiveDate;
use colored::Colorize;
use tabled::settings::{
    Alignment, Color, Width,
    measurement::Percent,
    object::{Columns, Object, Rows},
    peaker::Priority,
};
use teamrace::{api, utils, utils::datetime::date_to_str};

#[derive(clap::Args)]
pub struct ShowCommand {
    #[arg(
        short = 'd',
        long = "date",
        value_parser = utils::datetime::date_from_str,
        help = "Snapshot date to show, the default value is the latest snapshot, e.g. -d 2025-08-08"
    )]
    date: Option<NaiveDate>,
}

impl ShowCommand {
    pub async fn exec(&self) {
        match api::stocks(self.date.as_ref()).await {
            Ok(stocks) => {
                let mut table_data: Vec<Vec<String>> = vec![vec![
                    "".to_string(),
                    "Name".to_string(),
                    "Team".to_string(),
                    "Sector".to_string(),
                    "Days".to_string(),
                    "From".to_string(),
                    "To".to_string(),
                    "Last Price".to_string(),
                    "Market Cap".to_string(),
                    "Status".to_string(),
                ]];

                for stock in &stocks {
                    let (from, to) = match stock.date_span() {
                        Some((first, last)) => (date_to_str(&first), date_to_str(&last)),
                        None => ("-".to_string(), "-".to_string()),
                    };

                    table_data.push(vec![
                        stock.ticker.to_string(),
                        stock.name.to_string(),
                        stock.team.to_string(),
                        stock.sector.to_string(),
                        format!("{}", stock.history.len()),
                        from,
                        to,
                        stock
                            .latest_adj_close()
                            .map(|v| format!("{v:.2}"))
                            .unwrap_or("-".to_string()),
                        stock
                            .financials
                            .market_cap
                            .map(market_cap_to_str)
                            .unwrap_or("-".to_string()),
                        stock.error.clone().unwrap_or("✔".to_string()),
                    ]);
                }

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
                table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
                table.modify(Columns::new(4..9), Alignment::right());
                table.with(Width::wrap(Percent(100)).priority(Priority::max(true)));
                println!("\n{table}");
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}

fn market_cap_to_str(value: f64) -> String {
    if value >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        format!("{value:.0}")
    }
}
