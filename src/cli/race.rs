use chrono::{Local, NaiveDate};
use colored::Colorize;
use eframe::egui;
use tabled::{
    Table,
    settings::{
        Alignment, Color, Width,
        measurement::Percent,
        object::{Columns, Object, Rows},
        peaker::Priority,
    },
};
use teamrace::{
    CHANNEL_BUFFER_DEFAULT, VERSION, api,
    catalog::Team,
    data::DateRange,
    error::TrResult,
    gui::{GuiEvent, race_viewer::RaceViewer},
    race::{
        filter::{RaceFilters, TeamFilter},
        metrics::team_average_return,
    },
    utils,
};
use tokio::sync::mpsc;

#[derive(clap::Args)]
pub struct RaceCommand {
    #[arg(
        short = 'd',
        long = "date",
        value_parser = utils::datetime::date_from_str,
        help = "Snapshot date to race on, the default value is the latest snapshot, e.g. -d 2025-08-08"
    )]
    date: Option<NaiveDate>,

    #[arg(
        short = 's',
        long = "start",
        value_parser = utils::datetime::date_from_str,
        help = "Start date of the race, the default value is the first trading day of the snapshot, e.g. -s 2022-08-08"
    )]
    start_date: Option<NaiveDate>,

    #[arg(
        short = 'e',
        long = "end",
        value_parser = utils::datetime::date_from_str,
        help = "End date of the race, the default value is the last trading day of the snapshot, e.g. -e 2025-08-08"
    )]
    end_date: Option<NaiveDate>,

    #[arg(
        short = 't',
        long = "team",
        default_value_t = TeamFilter::All,
        help = "Keep only one team in the race, e.g. -t blue"
    )]
    team: TeamFilter,

    #[arg(
        long = "sector",
        help = "Keep only the given sectors, e.g. --sector \"AI & Cloud\" --sector Banking"
    )]
    sectors: Vec<String>,

    #[arg(
        short = 'g',
        help = "Open GUI window to play the race frame by frame"
    )]
    gui: bool,
}

impl RaceCommand {
    pub async fn exec(&self) {
        let filters = RaceFilters {
            team: self.team,
            selected_sectors: self.sectors.clone(),
        };

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
                panic!("The end date requires a start date, e.g. -s 2022-08-08");
            }
            (None, None) => None,
        };

        match race_metrics_as_table(self.date.as_ref(), date_range, &filters).await {
            Ok((table, summary)) => {
                println!("\n{table}");
                println!("{summary}");

                if self.gui {
                    match api::workspace().await {
                        Ok(workspace) => {
                            let (sender, mut receiver) =
                                mpsc::channel::<GuiEvent>(CHANNEL_BUFFER_DEFAULT);

                            let date = self.date;
                            let gui_date_range = date_range;
                            let gui_filters = filters.clone();
                            tokio::spawn(async move {
                                while let Some(event) = receiver.recv().await {
                                    match event {
                                        GuiEvent::Refresh => {
                                            match race_metrics_as_table(
                                                date.as_ref(),
                                                gui_date_range,
                                                &gui_filters,
                                            )
                                            .await
                                            {
                                                Ok((table, summary)) => {
                                                    println!("\n{table}");
                                                    println!("{summary}");
                                                }
                                                Err(err) => {
                                                    println!("[!] {}", err.to_string().red());
                                                }
                                            }
                                        }
                                    }
                                }
                            });

                            let options = eframe::NativeOptions {
                                viewport: egui::ViewportBuilder::default().with_maximized(true),
                                persistence_path: Some(workspace.join(".race_viewer")),
                                ..Default::default()
                            };

                            let _ = eframe::run_native(
                                &format!("TeamRace Viewer {VERSION}"),
                                options,
                                Box::new(|cc| {
                                    Ok(Box::new(RaceViewer::new(
                                        cc,
                                        sender,
                                        &workspace,
                                        date,
                                        gui_date_range,
                                    )))
                                }),
                            );
                        }
                        Err(err) => {
                            println!("[!] {}", err.to_string().red());
                        }
                    }
                }
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}

async fn race_metrics_as_table(
    date: Option<&NaiveDate>,
    date_range: Option<DateRange>,
    filters: &RaceFilters,
) -> TrResult<(Table, String)> {
    let metrics = api::race_metrics(date, date_range, filters).await?;

    let mut table_data: Vec<Vec<String>> = vec![vec![
        "".to_string(),
        "Team".to_string(),
        "Return".to_string(),
        "Ann Return".to_string(),
        "Ann Volatility".to_string(),
        "Max Drawdown".to_string(),
        "Win Rate".to_string(),
        "Best Rank".to_string(),
        "Days".to_string(),
    ]];

    for ticker_metrics in &metrics {
        table_data.push(vec![
            ticker_metrics.ticker.to_string(),
            ticker_metrics.team.to_string(),
            format!("{:.2}%", (ticker_metrics.final_return - 1.0) * 100.0),
            ticker_metrics
                .annualized_return_rate
                .map(|v| format!("{:.2}%", v * 100.0))
                .unwrap_or("-".to_string()),
            ticker_metrics
                .annualized_volatility
                .map(|v| format!("{:.2}%", v * 100.0))
                .unwrap_or("-".to_string()),
            ticker_metrics
                .max_drawdown
                .map(|v| format!("{:.2}%", v * 100.0))
                .unwrap_or("-".to_string()),
            ticker_metrics
                .win_rate
                .map(|v| format!("{:.2}%", v * 100.0))
                .unwrap_or("-".to_string()),
            format!("{}", ticker_metrics.best_rank),
            format!("{}", ticker_metrics.frames_present),
        ]);
    }

    let summary = format!(
        "[Blue Team] {} \t [White Team] {}",
        team_average_return(&metrics, Team::Blue)
            .map(|v| format!("{:.2}%", (v - 1.0) * 100.0))
            .unwrap_or("-".to_string()),
        team_average_return(&metrics, Team::White)
            .map(|v| format!("{:.2}%", (v - 1.0) * 100.0))
            .unwrap_or("-".to_string())
    );

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
    table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
    table.modify(Columns::new(1..), Alignment::right());
    table.with(Width::wrap(Percent(100)).priority(Priority::max(true)));

    Ok((table, summary))
}
