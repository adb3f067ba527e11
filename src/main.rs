//! # teamrace CLI

use std::path::PathBuf;

use clap::Parser;

use crate::cli::Commands;

mod cli;

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        global = true,
        short = 'w',
        long = "workspace",
        help = "The directory containing the snapshot files"
    )]
    workspace: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    teamrace::init(cli.workspace);

    match &cli.command {
        Commands::Check(cmd) => {
            cmd.exec().await;
        }
        Commands::Config(cmd) => {
            cmd.exec().await;
        }
        Commands::Fetch(cmd) => {
            cmd.exec().await;
        }
        Commands::List(cmd) => {
            cmd.exec().await;
        }
        Commands::Race(cmd) => {
            cmd.exec().await;
        }
        Commands::Show(cmd) => {
            cmd.exec().await;
        }
    }
}
