#![deny(missing_docs)]
#![doc = "Frame tree, constraint groups, jigsaws and the per-event RJR solver."]

//! A topology is declared once with [`FrameTree`], frozen by
//! [`FrameTree::initialize_tree`], decorated with groups and jigsaws through
//! [`AnalysisBuilder`] and frozen again by [`AnalysisBuilder::initialize`].
//! Each event is then resolved by a [`Solver`] into a [`SolvedEvent`].

mod analysis;
mod combinatorics;
mod config;
pub mod contraboost;
mod frame;
mod group;
mod hash;
mod ids;
pub mod invisible;
mod jigsaw;
mod solver;
pub mod stop2l;
mod tree;

pub use analysis::{Analysis, AnalysisBuilder, JigsawRecord};
pub use combinatorics::{min_mass_partition, partition_metric, Partition};
pub use config::SolverConfig;
pub use frame::{FrameRecord, FrameRole};
pub use group::{Cardinality, Group, GroupKind};
pub use hash::topology_hash;
pub use ids::{FrameId, GroupId, JigsawId};
pub use jigsaw::{ContraBoostSide, Jigsaw};
pub use solver::{SolvedEvent, Solver};
pub use stop2l::{build_topology, Stop2lFrames, Stop2lTopology};
pub use tree::{FrameTree, InitializedTree};
