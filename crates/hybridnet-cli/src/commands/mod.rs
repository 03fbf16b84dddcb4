//! CLI command definitions and dispatch.

pub mod outputs;
pub mod plan;
pub mod schema;

use clap::{Parser, Subcommand};

/// hybridnet: assemble hybrid network topologies from flat parameters.
#[derive(Parser, Debug)]
#[command(name = "hnet", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the deployment manifest: ordered resources and outputs.
    Plan(plan::PlanArgs),
    /// Print only the output bindings.
    Outputs(outputs::OutputsArgs),
    /// List the recognised parameters.
    Schema(schema::SchemaArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Plan(args) => plan::execute(&args),
        Command::Outputs(args) => outputs::execute(&args),
        Command::Schema(args) => schema::execute(&args),
    }
}
