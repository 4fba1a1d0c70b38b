//! Provenance and schema descriptors attached to emitted observable records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the layout of an observable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version, bumped when an observable changes meaning or is removed.
    pub major: u32,
    /// Minor version, bumped when observables are added.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Identifies the topology and settings that produced a batch of observables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema of the observable records.
    pub schema_version: SchemaVersion,
    /// Canonical hash of the frame/group/jigsaw topology.
    pub topology_hash: String,
    /// Seed used when events were generated rather than read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Version map for the tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Creates provenance for a topology hash, recording this crate's version.
    pub fn for_topology(topology_hash: impl Into<String>) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert("rjr-core".to_string(), env!("CARGO_PKG_VERSION").to_string());
        Self {
            schema_version: SchemaVersion::default(),
            topology_hash: topology_hash.into(),
            seed: None,
            tool_versions,
        }
    }

    /// Records the generation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
