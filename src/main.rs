use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inflammation::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Standard deviation across datasets of the daily mean inflammation.
    Analyze,

    /// Daily mean, max and min inflammation of every dataset.
    Stats,

    /// Normalise every patient of one table and write it as CSV.
    Normalise {
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.data_dir).context("failed to construct mgr")?;

    match args.command {
        Command::Analyze => mgr.run_analysis()?,
        Command::Stats => mgr.run_statistics()?,
        Command::Normalise { file, output } => mgr.normalise_file(&file, &output)?,
    }

    Ok(())
}
