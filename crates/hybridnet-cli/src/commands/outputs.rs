//! `hnet outputs`: Print the output bindings only.

use clap::Args;

use crate::output;
use crate::params::AssemblyArgs;

/// Arguments for the `outputs` command.
#[derive(Args, Debug)]
pub struct OutputsArgs {
    /// Parameter sources and rendering options.
    #[command(flatten)]
    pub assembly: AssemblyArgs,
}

/// Executes the `outputs` command.
///
/// # Errors
///
/// Returns an error if the assembly fails.
pub fn execute(args: &OutputsArgs) -> anyhow::Result<()> {
    let assembly = args.assembly.assemble()?;
    print!("{}", output::render(&assembly.outputs, args.assembly.format)?);
    Ok(())
}
