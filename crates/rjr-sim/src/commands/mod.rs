pub mod demo;
pub mod event;
pub mod topology;
pub mod version;

use std::error::Error;
use std::fs;
use std::path::Path;

use rjr_tree::{build_topology, SolverConfig, Stop2lTopology};

/// Reads a YAML solver configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SolverConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            Ok(SolverConfig::from_yaml_str(&contents)?)
        }
        None => Ok(SolverConfig::default()),
    }
}

/// Builds the dilepton topology; failures are fatal for every command.
pub fn load_topology() -> Result<Stop2lTopology, Box<dyn Error>> {
    build_topology().map_err(|err| {
        tracing::error!(error = %err, "topology setup failed");
        Box::new(err) as Box<dyn Error>
    })
}
