use std::collections::BTreeMap;

use rjr_core::errors::{ErrorInfo, RjrError};
use tracing::debug;

use crate::frame::{FrameRecord, FrameRole};
use crate::ids::FrameId;

/// Mutable builder for the frame hierarchy.
///
/// Link-level mistakes (unknown frames, self links, second parents, cycles)
/// are rejected as they are made; whole-tree properties are checked by
/// [`FrameTree::initialize_tree`].
#[derive(Debug, Clone, Default)]
pub struct FrameTree {
    frames: Vec<FrameRecord>,
    names: BTreeMap<String, FrameId>,
}

impl FrameTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a frame with the given role.
    pub fn add_frame(&mut self, name: &str, role: FrameRole) -> Result<FrameId, RjrError> {
        if name.is_empty() {
            return Err(RjrError::topology("empty-frame-name", "frame names must be non-empty"));
        }
        if self.names.contains_key(name) {
            let info = ErrorInfo::new("duplicate-frame-name", "frame name already in use")
                .with_context("frame", name);
            return Err(RjrError::Topology(info));
        }
        let id = FrameId::from_index(self.frames.len());
        self.frames.push(FrameRecord::new(name.to_string(), role));
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Adds the lab frame.
    pub fn add_lab_frame(&mut self, name: &str) -> Result<FrameId, RjrError> {
        self.add_frame(name, FrameRole::Lab)
    }

    /// Adds a decay frame.
    pub fn add_decay_frame(&mut self, name: &str) -> Result<FrameId, RjrError> {
        self.add_frame(name, FrameRole::Decay)
    }

    /// Adds a visible leaf frame.
    pub fn add_visible_frame(&mut self, name: &str) -> Result<FrameId, RjrError> {
        self.add_frame(name, FrameRole::Visible)
    }

    /// Adds an invisible leaf frame.
    pub fn add_invisible_frame(&mut self, name: &str) -> Result<FrameId, RjrError> {
        self.add_frame(name, FrameRole::Invisible)
    }

    /// Attaches the single child of a frame (used for the lab frame).
    pub fn set_child_frame(&mut self, parent: FrameId, child: FrameId) -> Result<(), RjrError> {
        if !self.record(parent)?.children.is_empty() {
            let info = ErrorInfo::new("child-already-set", "frame already has a child")
                .with_context("parent", self.record(parent)?.name.clone());
            return Err(RjrError::Topology(info));
        }
        self.add_child_frame(parent, child)
    }

    /// Appends `child` to the ordered children of `parent`.
    pub fn add_child_frame(&mut self, parent: FrameId, child: FrameId) -> Result<(), RjrError> {
        let parent_record = self.record(parent)?;
        let child_record = self.record(child)?;
        let context = |info: ErrorInfo| {
            info.with_context("parent", parent_record.name.clone())
                .with_context("child", child_record.name.clone())
        };
        if parent == child {
            let info = context(ErrorInfo::new("self-link", "a frame cannot be its own child"));
            return Err(RjrError::Topology(info));
        }
        if parent_record.role.is_leaf() {
            let info = context(ErrorInfo::new(
                "leaf-with-children",
                "visible and invisible frames cannot have children",
            ));
            return Err(RjrError::Topology(info));
        }
        if child_record.role == FrameRole::Lab {
            let info = context(ErrorInfo::new("lab-as-child", "the lab frame must be the root"));
            return Err(RjrError::Topology(info));
        }
        if child_record.parent.is_some() {
            let info = context(ErrorInfo::new("frame-has-parent", "frame already has a parent"))
                .with_hint("a frame may be attached to at most one parent");
            return Err(RjrError::Topology(info));
        }
        if self.is_ancestor(child, parent) {
            let info = context(ErrorInfo::new("would-create-cycle", "link would create a cycle"));
            return Err(RjrError::Topology(info));
        }
        self.frames[parent.index()].children.push(child);
        self.frames[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Looks up a frame by name.
    pub fn find(&self, name: &str) -> Option<FrameId> {
        self.names.get(name).copied()
    }

    /// Number of frames in the arena.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame has been added.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the record of a frame.
    pub fn record(&self, id: FrameId) -> Result<&FrameRecord, RjrError> {
        self.frames.get(id.index()).ok_or_else(|| {
            let info = ErrorInfo::new("unknown-frame", "frame identifier not present in tree")
                .with_context("frame_id", id.as_raw().to_string());
            RjrError::Topology(info)
        })
    }

    fn is_ancestor(&self, candidate: FrameId, of: FrameId) -> bool {
        let mut cursor = Some(of);
        let mut steps = 0;
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            steps += 1;
            if steps > self.frames.len() {
                return true;
            }
            cursor = self.frames[id.index()].parent;
        }
        false
    }

    /// Tree initialization: validates the whole hierarchy and freezes it.
    ///
    /// Checks that there is exactly one lab frame, that it is the root with a
    /// single child, that every frame is reachable from it, that decay frames
    /// have at least two children and that every leaf is visible or invisible.
    pub fn initialize_tree(self) -> Result<InitializedTree, RjrError> {
        let labs: Vec<FrameId> = (0..self.frames.len())
            .map(FrameId::from_index)
            .filter(|id| self.frames[id.index()].role == FrameRole::Lab)
            .collect();
        let lab = match labs.as_slice() {
            [lab] => *lab,
            [] => return Err(RjrError::topology("missing-lab", "tree has no lab frame")),
            _ => {
                let info = ErrorInfo::new("multiple-labs", "tree has more than one lab frame")
                    .with_context("count", labs.len().to_string());
                return Err(RjrError::Topology(info));
            }
        };
        let lab_record = &self.frames[lab.index()];
        if lab_record.children.len() != 1 {
            let info = ErrorInfo::new("lab-arity", "the lab frame must have exactly one child")
                .with_context("frame", lab_record.name.clone())
                .with_context("children", lab_record.children.len().to_string());
            return Err(RjrError::Topology(info));
        }

        let mut paths: Vec<Option<Vec<FrameId>>> = vec![None; self.frames.len()];
        paths[lab.index()] = Some(Vec::new());
        let mut stack = vec![lab];
        let mut order = Vec::with_capacity(self.frames.len());
        while let Some(id) = stack.pop() {
            order.push(id);
            let base = paths[id.index()].clone().unwrap_or_default();
            for &child in self.frames[id.index()].children.iter().rev() {
                if paths[child.index()].is_some() {
                    let info = ErrorInfo::new("not-a-tree", "frame reached twice from the lab")
                        .with_context("frame", self.frames[child.index()].name.clone());
                    return Err(RjrError::Topology(info));
                }
                let mut path = base.clone();
                path.push(child);
                paths[child.index()] = Some(path);
                stack.push(child);
            }
        }

        let mut resolved = Vec::with_capacity(self.frames.len());
        for (index, path) in paths.into_iter().enumerate() {
            match path {
                Some(path) => resolved.push(path),
                None => {
                    let info = ErrorInfo::new("disconnected-frame", "frame is not reachable from the lab")
                        .with_context("frame", self.frames[index].name.clone());
                    return Err(RjrError::Topology(info));
                }
            }
        }

        for record in &self.frames {
            let arity_ok = match record.role {
                FrameRole::Lab => true,
                FrameRole::Decay => record.children.len() >= 2,
                FrameRole::Visible | FrameRole::Invisible => record.children.is_empty(),
            };
            if !arity_ok {
                let info = ErrorInfo::new("frame-arity", "frame has the wrong number of children")
                    .with_context("frame", record.name.clone())
                    .with_context("role", record.role.label())
                    .with_context("children", record.children.len().to_string())
                    .with_hint("decay frames need at least two children; leaves need none");
                return Err(RjrError::Topology(info));
            }
        }

        debug!(frames = self.frames.len(), lab = %lab_record.name, "frame tree initialized");
        Ok(InitializedTree {
            frames: self.frames,
            names: self.names,
            lab,
            paths: resolved,
            order,
        })
    }
}

/// A validated, immutable frame hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializedTree {
    frames: Vec<FrameRecord>,
    names: BTreeMap<String, FrameId>,
    lab: FrameId,
    paths: Vec<Vec<FrameId>>,
    order: Vec<FrameId>,
}

impl InitializedTree {
    /// The lab frame.
    pub fn lab(&self) -> FrameId {
        self.lab
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; a valid tree contains at least the lab and its child.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the record of a frame.
    pub fn record(&self, id: FrameId) -> Result<&FrameRecord, RjrError> {
        self.frames.get(id.index()).ok_or_else(|| {
            let info = ErrorInfo::new("unknown-frame", "frame identifier not present in tree")
                .with_context("frame_id", id.as_raw().to_string());
            RjrError::Topology(info)
        })
    }

    /// Frame name, or `"?"` for an identifier outside the arena.
    pub fn name(&self, id: FrameId) -> &str {
        self.frames
            .get(id.index())
            .map(|record| record.name.as_str())
            .unwrap_or("?")
    }

    /// Looks up a frame by name.
    pub fn find(&self, name: &str) -> Option<FrameId> {
        self.names.get(name).copied()
    }

    /// Role of a frame.
    pub fn role(&self, id: FrameId) -> Option<FrameRole> {
        self.frames.get(id.index()).map(|record| record.role)
    }

    /// Parent of a frame.
    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.frames.get(id.index()).and_then(|record| record.parent)
    }

    /// Children of a frame in attachment order.
    pub fn children(&self, id: FrameId) -> &[FrameId] {
        self.frames
            .get(id.index())
            .map(|record| record.children.as_slice())
            .unwrap_or(&[])
    }

    /// Frames below the lab on the way to `id`, ending with `id` itself.
    /// Empty for the lab frame.
    pub fn path_from_lab(&self, id: FrameId) -> &[FrameId] {
        self.paths
            .get(id.index())
            .map(|path| path.as_slice())
            .unwrap_or(&[])
    }

    /// Frames in depth-first order starting at the lab.
    pub fn depth_first(&self) -> &[FrameId] {
        &self.order
    }

    /// All frame identifiers in arena order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = FrameId> + '_ {
        (0..self.frames.len()).map(FrameId::from_index)
    }

    /// True when `ancestor` lies on the lab path of `id` (a frame is its own ancestor).
    pub fn is_ancestor(&self, ancestor: FrameId, id: FrameId) -> bool {
        ancestor == self.lab || self.path_from_lab(id).contains(&ancestor)
    }

    /// Leaves with the given role below `id`, in depth-first order.
    pub fn leaves_below(&self, id: FrameId, role: FrameRole) -> Vec<FrameId> {
        self.order
            .iter()
            .copied()
            .filter(|&leaf| self.role(leaf) == Some(role) && self.is_ancestor(id, leaf))
            .collect()
    }

    /// All frames with the given role, in depth-first order.
    pub fn frames_with_role(&self, role: FrameRole) -> Vec<FrameId> {
        self.order
            .iter()
            .copied()
            .filter(|&frame| self.role(frame) == Some(role))
            .collect()
    }
}
