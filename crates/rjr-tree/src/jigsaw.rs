use serde::{Deserialize, Serialize};

use crate::group::GroupKind;
use crate::ids::FrameId;

/// One hemisphere of a contraboost jigsaw: the visible frames it contains and
/// the invisible frame that balances them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContraBoostSide {
    /// Visible frames of the hemisphere.
    pub visible: Vec<FrameId>,
    /// Invisible frame of the hemisphere.
    pub invisible: FrameId,
}

impl ContraBoostSide {
    /// Creates a side from its frames.
    pub fn new(visible: Vec<FrameId>, invisible: FrameId) -> Self {
        Self { visible, invisible }
    }
}

/// Rule resolving the unknowns of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Jigsaw {
    /// Sets the invisible system mass to the smallest value the contraboost split allows.
    SetMass,
    /// Gives the invisible system the rapidity of the listed visible frames.
    SetRapidity {
        /// Visible frames whose summed rapidity is copied.
        visible: Vec<FrameId>,
    },
    /// Splits the invisible system between two hemispheres with equal masses.
    ContraBoost {
        /// The two hemispheres.
        sides: [ContraBoostSide; 2],
    },
    /// Partitions visible objects among frames minimizing the sum of their masses.
    MinMasses {
        /// Frames receiving objects; digit order of the assignment search.
        frames: Vec<FrameId>,
    },
}

impl Jigsaw {
    /// The group kind the jigsaw resolves.
    pub fn group_kind(&self) -> GroupKind {
        match self {
            Jigsaw::SetMass | Jigsaw::SetRapidity { .. } | Jigsaw::ContraBoost { .. } => {
                GroupKind::Invisible
            }
            Jigsaw::MinMasses { .. } => GroupKind::Combinatoric,
        }
    }

    /// Stable label used in diagnostics and hashing.
    pub fn label(&self) -> &'static str {
        match self {
            Jigsaw::SetMass => "set-mass",
            Jigsaw::SetRapidity { .. } => "set-rapidity",
            Jigsaw::ContraBoost { .. } => "contra-boost",
            Jigsaw::MinMasses { .. } => "min-masses",
        }
    }

    /// Every frame the jigsaw refers to.
    pub fn referenced_frames(&self) -> Vec<FrameId> {
        match self {
            Jigsaw::SetMass => Vec::new(),
            Jigsaw::SetRapidity { visible } => visible.clone(),
            Jigsaw::ContraBoost { sides } => sides
                .iter()
                .flat_map(|side| side.visible.iter().copied().chain(Some(side.invisible)))
                .collect(),
            Jigsaw::MinMasses { frames } => frames.clone(),
        }
    }
}
