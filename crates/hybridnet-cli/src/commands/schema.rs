//! `hnet schema`: List the recognised parameters.

use clap::Args;
use hybridnet_topology::params::schema::SCHEMA;

use crate::output;

/// Arguments for the `schema` command.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Also print each parameter's description.
    #[arg(short, long)]
    pub long: bool,
}

/// Executes the `schema` command.
///
/// # Errors
///
/// Infallible today; returns `Result` for dispatch uniformity.
pub fn execute(args: &SchemaArgs) -> anyhow::Result<()> {
    print!("{}", schema_table(args.long));
    Ok(())
}

fn schema_table(long: bool) -> String {
    let mut header = vec!["NAME".to_owned(), "KIND".to_owned(), "REQUIREMENT".to_owned()];
    if long {
        header.push("DESCRIPTION".to_owned());
    }
    let mut rows = vec![header];
    for spec in &SCHEMA {
        let mut row = vec![
            spec.name().to_owned(),
            spec.kind().to_owned(),
            spec.requirement_label(),
        ];
        if long {
            row.push(spec.summary().to_owned());
        }
        rows.push(row);
    }
    output::table(&rows)
}
