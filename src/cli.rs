use clap::Subcommand;

mod check;
mod config;
mod fetch;
mod list;
mod race;
mod show;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check the market data source")]
    Check(Box<check::CheckCommand>),

    #[command(subcommand, about = "Show or modify configurations")]
    Config(config::ConfigCommand),

    #[command(about = "Fetch fresh market data for the whole catalog")]
    Fetch(Box<fetch::FetchCommand>),

    #[command(about = "List stored snapshots")]
    #[clap(visible_aliases = &["ls"])]
    List(Box<list::ListCommand>),

    #[command(about = "Race the catalog and summarize every runner")]
    Race(Box<race::RaceCommand>),

    #[command(about = "Show the stocks of a snapshot")]
    Show(Box<show::ShowCommand>),
}
