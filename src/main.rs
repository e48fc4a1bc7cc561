mod chart;
mod cli;
mod error;
mod model;
mod reader;
mod report;
mod stats;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = cli::Cli::parse();
    cli::run(args)
}
