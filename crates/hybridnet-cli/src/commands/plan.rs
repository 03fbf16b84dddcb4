//! `hnet plan`: Print the deployment manifest.

use clap::Args;

use crate::output;
use crate::params::AssemblyArgs;

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Parameter sources and rendering options.
    #[command(flatten)]
    pub assembly: AssemblyArgs,
}

/// Executes the `plan` command.
///
/// Resolves and validates the parameters, builds the resource graph, and
/// prints its nodes in deployment order together with the outputs.
///
/// # Errors
///
/// Returns an error if parameters are unusable or the graph cannot be
/// ordered.
pub fn execute(args: &PlanArgs) -> anyhow::Result<()> {
    let assembly = args.assembly.assemble()?;
    let manifest = assembly.manifest()?;
    tracing::info!(
        fingerprint = %manifest.fingerprint,
        resources = manifest.resources.len(),
        outputs = manifest.outputs.len(),
        "planned"
    );
    print!("{}", output::render(&manifest, args.assembly.format)?);
    Ok(())
}
