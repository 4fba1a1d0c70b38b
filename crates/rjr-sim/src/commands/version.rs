use std::error::Error;

use clap::Args;
use rjr_core::SchemaVersion;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata including the observable schema version.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    schema_version: SchemaVersion,
    topology_hash: String,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let topology = super::load_topology()?;
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        schema_version: SchemaVersion::default(),
        topology_hash: rjr_tree::topology_hash(&topology.analysis),
    };
    println!("{}", serde_json::to_string(&info)?);
    Ok(())
}
