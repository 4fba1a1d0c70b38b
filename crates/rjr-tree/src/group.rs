use serde::{Deserialize, Serialize};

use crate::ids::FrameId;

/// Class of unknowns shared by the frames of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    /// Unknown invisible four-momenta.
    Invisible,
    /// Unknown partition of the visible objects.
    Combinatoric,
}

impl GroupKind {
    /// Stable lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            GroupKind::Invisible => "invisible",
            GroupKind::Combinatoric => "combinatoric",
        }
    }
}

/// Number of visible objects a frame of a combinatoric group must receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    /// At least `n` objects.
    AtLeast(usize),
    /// Exactly `n` objects.
    Exactly(usize),
}

impl Cardinality {
    /// Smallest acceptable count.
    pub fn minimum(&self) -> usize {
        match *self {
            Cardinality::AtLeast(n) | Cardinality::Exactly(n) => n,
        }
    }

    /// True when `count` objects satisfy the requirement.
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Cardinality::AtLeast(n) => count >= n,
            Cardinality::Exactly(n) => count == n,
        }
    }
}

/// A named set of frames sharing one class of unknowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) kind: GroupKind,
    pub(crate) frames: Vec<FrameId>,
    /// One entry per frame for combinatoric groups, empty otherwise.
    pub(crate) cardinalities: Vec<Cardinality>,
}

impl Group {
    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Group kind.
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Member frames in registration order.
    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    /// Per-frame cardinality requirements of a combinatoric group.
    pub fn cardinalities(&self) -> &[Cardinality] {
        &self.cardinalities
    }
}
