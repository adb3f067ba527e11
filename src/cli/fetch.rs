use chrono::{Local, NaiveDate};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::settings::{
    Alignment, Color, Width,
    measurement::Percent,
    object::{Columns, Object, Rows},
    peaker::Priority,
};
use teamrace::{
    api,
    api::{FetchEvent, FetchResult},
    catalog,
    data::DateRange,
    error::TrError,
    utils,
};
use tokio::time::Duration;

#[derive(clap::Args)]
pub struct FetchCommand {
    #[arg(
        short = 's',
        long = "start",
        value_parser = utils::datetime::date_from_str,
        help = "Start date of the history window, the default reaches back the configured number of years, e.g. -s 2020-08-08"
    )]
    start_date: Option<NaiveDate>,

    #[arg(
        short = 'e',
        long = "end",
        value_parser = utils::datetime::date_from_str,
        help = "End date of the history window, the default value is today, e.g. -e 2025-08-08"
    )]
    end_date: Option<NaiveDate>,
}

impl FetchCommand {
    pub async fn exec(&self) {
        let date_range = match (self.start_date, self.end_date) {
            (Some(start_date), end_date) => {
                let end_date = end_date.unwrap_or(Local::now().date_naive());
                if end_date <= start_date {
                    panic!(
                        "The end date {} cannot be earlier than the start date {}",
                        utils::datetime::date_to_str(&end_date),
                        utils::datetime::date_to_str(&start_date)
                    );
                }

                Some(DateRange::new(start_date, end_date))
            }
            (None, Some(_)) => {
                panic!("The end date requires a start date, e.g. -s 2020-08-08");
            }
            (None, None) => None,
        };

        println!("[Stocks] {}", catalog::CATALOG.len());

        let spinner = ProgressBar::new_spinner();
        spinner
            .set_style(ProgressStyle::with_template("[{elapsed}] {msg} {spinner:.cyan}").unwrap());
        spinner.enable_steady_tick(Duration::from_millis(100));

        match api::fetch(date_range).await {
            Ok(mut stream) => {
                let mut fetch_result: Option<FetchResult> = None;
                let mut stream_error: Option<TrError> = None;

                while let Some(event) = stream.next().await {
                    match event {
                        FetchEvent::Fetched(s) => {
                            spinner.println(format!("[+] {s}"));
                        }
                        FetchEvent::Failed(s) => {
                            spinner.println(format!("[!] {}", s.red()));
                        }
                        FetchEvent::Info(s) => {
                            spinner.println(format!("[i] {}", s.bright_black()));
                        }
                        FetchEvent::Result(result) => {
                            fetch_result = Some(result);
                        }
                        FetchEvent::Error(err) => {
                            stream_error = Some(err);
                        }
                    }
                }

                if let Some(err) = stream_error {
                    spinner.finish_with_message(format!("{}", err.to_string().red()));
                    std::process::exit(1);
                }

                if let Some(result) = fetch_result {
                    if result.failed_tickers.is_empty() {
                        spinner.finish_with_message(format!("{}", "✔".to_string().green()));
                    } else {
                        spinner.finish_with_message(format!("{}", "!".to_string().yellow()));
                    }

                    let metadata = &result.metadata;
                    let table_data: Vec<Vec<String>> = vec![
                        vec![
                            "".to_string(),
                            "From".to_string(),
                            "To".to_string(),
                            "Stocks".to_string(),
                            "Fetched".to_string(),
                            "Failed".to_string(),
                            "Blue Team".to_string(),
                            "White Team".to_string(),
                        ],
                        vec![
                            result
                                .snapshot_path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_default(),
                            utils::datetime::date_to_str(&metadata.date_range.start),
                            utils::datetime::date_to_str(&metadata.date_range.end),
                            format!("{}", metadata.total_stocks),
                            format!("{}", metadata.successful_stocks),
                            format!("{}", metadata.failed_stocks),
                            format!("{}", metadata.blue_team_count),
                            format!("{}", metadata.white_team_count),
                        ],
                    ];

                    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
                    table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
                    table.modify(Columns::new(1..), Alignment::right());
                    table.with(Width::wrap(Percent(100)).priority(Priority::max(true)));
                    println!("{table}");

                    if !result.failed_tickers.is_empty() {
                        std::process::exit(1);
                    }
                }
            }
            Err(err) => {
                spinner.finish_with_message(format!("{}", err.to_string().red()));
                std::process::exit(1);
            }
        }
    }
}
