#![deny(missing_docs)]
#![doc = "Observable catalogue and super-razor variant for the dilepton RJR topology."]

mod observables;
mod razor;

use std::collections::BTreeMap;

use rjr_core::errors::{ErrorInfo, RjrError};
use rjr_core::EventInput;
use rjr_tree::{SolverConfig, Stop2lTopology};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use observables::EventObservables;
pub use razor::SuperRazor;

/// Every observable produced for one event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EventRecord {
    /// Frame-tree observables.
    pub observables: EventObservables,
    /// Super-razor observables.
    pub razor: SuperRazor,
}

impl EventRecord {
    /// Flattens the record into the name to value mapping handed to collaborators.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.observables
            .entries()
            .into_iter()
            .chain(self.razor.entries())
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

/// Solves one event on the dilepton topology and extracts all observables.
///
/// The super-razor variant is computed from the first two visible objects in
/// input order, independently of the jigsaw solution.
pub fn evaluate_event(
    topology: &Stop2lTopology,
    input: &EventInput,
    config: &SolverConfig,
) -> Result<EventRecord, RjrError> {
    let solved = topology.analysis.solve(input, config)?;
    let observables = EventObservables::extract(&solved, &topology.frames);
    let razor = match input.visible.as_slice() {
        [l1, l2, ..] => SuperRazor::compute(l1, l2, input.met),
        _ => {
            let info = ErrorInfo::new("insufficient-objects", "super-razor needs two visible objects")
                .with_context("objects", input.visible.len().to_string());
            return Err(RjrError::Input(info));
        }
    };
    debug!(shat = observables.shat, mdr = observables.mdr, "observables extracted");
    Ok(EventRecord { observables, razor })
}
