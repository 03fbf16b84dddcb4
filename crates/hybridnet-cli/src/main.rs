//! # hnet: hybridnet CLI
//!
//! Assembles a hybrid network topology from flat parameters and prints the
//! resulting deployment manifest.

mod commands;
mod output;
mod params;

use clap::Parser;
use hybridnet_common::constants::LOG_ENV;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    commands::execute(cli)
}
