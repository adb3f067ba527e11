use colored::Colorize;
use tabled::settings::{Color, object::Columns};
use teamrace::api;

#[derive(clap::Args)]
pub struct ConfigShowCommand;

impl ConfigShowCommand {
    pub async fn exec(&self) {
        match api::get_config().await {
            Ok(config) => {
                let table_data: Vec<Vec<String>> = vec![
                    vec!["yahoo_api".to_string(), config.yahoo_api.to_string()],
                    vec!["batch_size".to_string(), config.batch_size.to_string()],
                    vec![
                        "batch_delay_millis".to_string(),
                        config.batch_delay_millis.to_string(),
                    ],
                    vec!["history_years".to_string(), config.history_years.to_string()],
                ];

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Columns::first(), Color::FG_CYAN);
                println!("{table}");
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
