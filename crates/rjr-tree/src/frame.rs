use serde::{Deserialize, Serialize};

use crate::ids::FrameId;

/// Role played by a frame in the decay tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FrameRole {
    /// The laboratory frame; root of the tree.
    Lab,
    /// An intermediate frame decaying to two or more children.
    Decay,
    /// A leaf receiving measured visible objects.
    Visible,
    /// A leaf whose four-momentum is inferred from missing momentum.
    Invisible,
}

impl FrameRole {
    /// Returns true for the two leaf roles.
    pub fn is_leaf(&self) -> bool {
        matches!(self, FrameRole::Visible | FrameRole::Invisible)
    }

    /// Stable lowercase label used in diagnostics and hashing.
    pub fn label(&self) -> &'static str {
        match self {
            FrameRole::Lab => "lab",
            FrameRole::Decay => "decay",
            FrameRole::Visible => "visible",
            FrameRole::Invisible => "invisible",
        }
    }
}

/// Arena entry for a single frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub(crate) name: String,
    pub(crate) role: FrameRole,
    pub(crate) parent: Option<FrameId>,
    pub(crate) children: Vec<FrameId>,
}

impl FrameRecord {
    pub(crate) fn new(name: String, role: FrameRole) -> Self {
        Self {
            name,
            role,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Frame name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frame role.
    pub fn role(&self) -> FrameRole {
        self.role
    }

    /// Parent frame, `None` for the root.
    pub fn parent(&self) -> Option<FrameId> {
        self.parent
    }

    /// Children in attachment order.
    pub fn children(&self) -> &[FrameId] {
        &self.children
    }
}
