use colored::Colorize;
use tabled::settings::{Color, object::Columns};
use teamrace::{api, utils::datetime::date_to_str};

#[derive(clap::Args)]
pub struct ListCommand;

impl ListCommand {
    pub async fn exec(&self) {
        match api::snapshot_dates().await {
            Ok(dates) => {
                if dates.is_empty() {
                    match api::workspace().await {
                        Ok(workspace) => {
                            println!(
                                "[!] No snapshot in '{}', fetch data first",
                                workspace.to_string_lossy().yellow()
                            );
                        }
                        Err(err) => {
                            println!("[!] {}", err.to_string().red());
                        }
                    }
                } else {
                    let mut table_data: Vec<Vec<String>> = vec![];
                    for date in dates {
                        table_data.push(vec![
                            date_to_str(&date),
                            format!("stocks-{}.json", date_to_str(&date)),
                        ]);
                    }

                    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                    table.modify(Columns::first(), Color::FG_CYAN);
                    println!("{table}");
                }
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
