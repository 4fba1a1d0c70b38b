//! The fixed dilepton topology: two symmetric hemispheres, each decaying to
//! one visible lepton and one invisible system.
//!
//! ```text
//! lab -> ss -> s1 -> (v1, i1)
//!           -> s2 -> (v2, i2)
//! ```

use rjr_core::errors::RjrError;

use crate::analysis::{Analysis, AnalysisBuilder};
use crate::group::Cardinality;
use crate::ids::FrameId;
use crate::jigsaw::{ContraBoostSide, Jigsaw};
use crate::tree::FrameTree;

/// Identifiers of the eight frames of the dilepton topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop2lFrames {
    /// Lab frame.
    pub lab: FrameId,
    /// Pair-production frame.
    pub ss: FrameId,
    /// First hemisphere.
    pub s1: FrameId,
    /// Second hemisphere.
    pub s2: FrameId,
    /// Visible leaf of the first hemisphere.
    pub v1: FrameId,
    /// Visible leaf of the second hemisphere.
    pub v2: FrameId,
    /// Invisible leaf of the first hemisphere.
    pub i1: FrameId,
    /// Invisible leaf of the second hemisphere.
    pub i2: FrameId,
}

/// The initialized dilepton analysis together with its frame handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop2lTopology {
    /// Validated analysis.
    pub analysis: Analysis,
    /// Frame handles.
    pub frames: Stop2lFrames,
}

/// Builds and validates the dilepton topology.
pub fn build_topology() -> Result<Stop2lTopology, RjrError> {
    let mut tree = FrameTree::new();
    let lab = tree.add_lab_frame("lab")?;
    let ss = tree.add_decay_frame("ss")?;
    let s1 = tree.add_decay_frame("s1")?;
    let s2 = tree.add_decay_frame("s2")?;
    let v1 = tree.add_visible_frame("v1")?;
    let v2 = tree.add_visible_frame("v2")?;
    let i1 = tree.add_invisible_frame("i1")?;
    let i2 = tree.add_invisible_frame("i2")?;

    tree.set_child_frame(lab, ss)?;
    tree.add_child_frame(ss, s1)?;
    tree.add_child_frame(ss, s2)?;
    tree.add_child_frame(s1, v1)?;
    tree.add_child_frame(s1, i1)?;
    tree.add_child_frame(s2, v2)?;
    tree.add_child_frame(s2, i2)?;
    let tree = tree.initialize_tree()?;

    let mut builder = AnalysisBuilder::new(tree);
    let invisible = builder.add_invisible_group("inv", &[i1, i2])?;
    let visible = builder.add_combinatoric_group(
        "vis",
        &[(v1, Cardinality::AtLeast(1)), (v2, Cardinality::AtLeast(1))],
    )?;

    builder.add_jigsaw(invisible, Jigsaw::SetMass)?;
    builder.add_jigsaw(invisible, Jigsaw::SetRapidity { visible: vec![v1, v2] })?;
    builder.add_jigsaw(
        invisible,
        Jigsaw::ContraBoost {
            sides: [
                ContraBoostSide::new(vec![v1], i1),
                ContraBoostSide::new(vec![v2], i2),
            ],
        },
    )?;
    builder.add_jigsaw(visible, Jigsaw::MinMasses { frames: vec![v1, v2] })?;

    Ok(Stop2lTopology {
        analysis: builder.initialize()?,
        frames: Stop2lFrames {
            lab,
            ss,
            s1,
            s2,
            v1,
            v2,
            i1,
            i2,
        },
    })
}
