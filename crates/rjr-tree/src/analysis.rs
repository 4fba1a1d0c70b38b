use std::collections::BTreeSet;

use rjr_core::errors::{ErrorInfo, RjrError};
use rjr_core::EventInput;
use tracing::debug;

use crate::config::SolverConfig;
use crate::frame::FrameRole;
use crate::group::{Cardinality, Group, GroupKind};
use crate::ids::{FrameId, GroupId, JigsawId};
use crate::jigsaw::{ContraBoostSide, Jigsaw};
use crate::solver::{SolvedEvent, Solver};
use crate::tree::InitializedTree;

/// A jigsaw together with the group it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JigsawRecord {
    group: GroupId,
    jigsaw: Jigsaw,
}

impl JigsawRecord {
    /// Owning group.
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// The jigsaw rule.
    pub fn jigsaw(&self) -> &Jigsaw {
        &self.jigsaw
    }
}

/// Collects groups and jigsaws on top of an initialized tree.
#[derive(Debug, Clone)]
pub struct AnalysisBuilder {
    tree: InitializedTree,
    groups: Vec<Group>,
    jigsaws: Vec<JigsawRecord>,
}

impl AnalysisBuilder {
    /// Starts an analysis on a validated tree.
    pub fn new(tree: InitializedTree) -> Self {
        Self {
            tree,
            groups: Vec::new(),
            jigsaws: Vec::new(),
        }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &InitializedTree {
        &self.tree
    }

    /// Registers an invisible group over the given frames.
    pub fn add_invisible_group(&mut self, name: &str, frames: &[FrameId]) -> Result<GroupId, RjrError> {
        self.push_group(Group {
            name: name.to_string(),
            kind: GroupKind::Invisible,
            frames: frames.to_vec(),
            cardinalities: Vec::new(),
        })
    }

    /// Registers a combinatoric group; each member carries its object-count requirement.
    pub fn add_combinatoric_group(
        &mut self,
        name: &str,
        members: &[(FrameId, Cardinality)],
    ) -> Result<GroupId, RjrError> {
        self.push_group(Group {
            name: name.to_string(),
            kind: GroupKind::Combinatoric,
            frames: members.iter().map(|(frame, _)| *frame).collect(),
            cardinalities: members.iter().map(|(_, cardinality)| *cardinality).collect(),
        })
    }

    fn push_group(&mut self, group: Group) -> Result<GroupId, RjrError> {
        if self.groups.iter().any(|existing| existing.name == group.name) {
            let info = ErrorInfo::new("duplicate-group-name", "group name already in use")
                .with_context("group", group.name);
            return Err(RjrError::Analysis(info));
        }
        let id = GroupId::from_index(self.groups.len());
        self.groups.push(group);
        Ok(id)
    }

    /// Attaches a jigsaw to a group. Jigsaws of one group run in attachment order.
    pub fn add_jigsaw(&mut self, group: GroupId, jigsaw: Jigsaw) -> Result<JigsawId, RjrError> {
        let record = self.groups.get(group.index()).ok_or_else(|| {
            let info = ErrorInfo::new("unknown-group", "group identifier not registered")
                .with_context("group_id", group.as_raw().to_string());
            RjrError::Analysis(info)
        })?;
        if record.kind != jigsaw.group_kind() {
            let info = ErrorInfo::new("jigsaw-group-mismatch", "jigsaw attached to the wrong kind of group")
                .with_context("group", record.name.clone())
                .with_context("group_kind", record.kind.label())
                .with_context("jigsaw", jigsaw.label());
            return Err(RjrError::Analysis(info));
        }
        let id = JigsawId::from_index(self.jigsaws.len());
        self.jigsaws.push(JigsawRecord { group, jigsaw });
        Ok(id)
    }

    /// Analysis initialization: checks group coverage and jigsaw completeness
    /// and fixes the execution order.
    pub fn initialize(self) -> Result<Analysis, RjrError> {
        for group in &self.groups {
            self.check_group(group)?;
        }
        self.check_coverage(FrameRole::Visible, GroupKind::Combinatoric)?;
        self.check_coverage(FrameRole::Invisible, GroupKind::Invisible)?;

        let combinatoric = self.single_group(GroupKind::Combinatoric)?;
        let invisible = self.single_group(GroupKind::Invisible)?;

        let mut order = Vec::with_capacity(self.jigsaws.len());
        let combinatoric_plan = match combinatoric {
            Some(group) => Some(self.plan_combinatoric(group, &mut order)?),
            None => None,
        };
        let invisible_plan = match invisible {
            Some(group) => Some(self.plan_invisible(group, &mut order)?),
            None => None,
        };
        if invisible_plan.is_some() && combinatoric_plan.is_none() {
            return Err(RjrError::analysis(
                "missing-combinatoric-group",
                "invisible jigsaws need a combinatoric group to supply visible momenta",
            ));
        }

        debug!(
            groups = self.groups.len(),
            jigsaws = order.len(),
            "analysis initialized"
        );
        Ok(Analysis {
            tree: self.tree,
            groups: self.groups,
            jigsaws: self.jigsaws,
            order,
            combinatoric: combinatoric_plan,
            invisible: invisible_plan,
        })
    }

    fn frame_error(&self, code: &str, message: &str, frame: FrameId) -> RjrError {
        let info = ErrorInfo::new(code, message).with_context("frame", self.tree.name(frame));
        RjrError::Analysis(info)
    }

    fn check_group(&self, group: &Group) -> Result<(), RjrError> {
        if group.frames.is_empty() {
            let info = ErrorInfo::new("empty-group", "group has no frames")
                .with_context("group", group.name.clone());
            return Err(RjrError::Analysis(info));
        }
        let expected = match group.kind {
            GroupKind::Invisible => FrameRole::Invisible,
            GroupKind::Combinatoric => FrameRole::Visible,
        };
        let mut seen = BTreeSet::new();
        for &frame in &group.frames {
            match self.tree.role(frame) {
                None => {
                    let info = ErrorInfo::new("unknown-frame", "group refers to a frame outside the tree")
                        .with_context("group", group.name.clone())
                        .with_context("frame_id", frame.as_raw().to_string());
                    return Err(RjrError::Analysis(info));
                }
                Some(role) if role != expected => {
                    let info = ErrorInfo::new("group-role-mismatch", "frame role does not match group kind")
                        .with_context("group", group.name.clone())
                        .with_context("frame", self.tree.name(frame))
                        .with_context("role", role.label());
                    return Err(RjrError::Analysis(info));
                }
                Some(_) => {}
            }
            if !seen.insert(frame) {
                return Err(self.frame_error("duplicate-group-member", "frame listed twice in a group", frame));
            }
        }
        Ok(())
    }

    fn check_coverage(&self, role: FrameRole, kind: GroupKind) -> Result<(), RjrError> {
        for frame in self.tree.frames_with_role(role) {
            let owners = self
                .groups
                .iter()
                .filter(|group| group.kind == kind && group.frames.contains(&frame))
                .count();
            if owners == 0 {
                let info = ErrorInfo::new("frame-not-in-group", "leaf frame is not owned by any group")
                    .with_context("frame", self.tree.name(frame))
                    .with_context("expected_group", kind.label())
                    .with_hint("every visible frame needs a combinatoric group and every invisible frame an invisible group");
                return Err(RjrError::Analysis(info));
            }
            if owners > 1 {
                return Err(self.frame_error(
                    "frame-in-multiple-groups",
                    "leaf frame is owned by more than one group",
                    frame,
                ));
            }
        }
        Ok(())
    }

    fn single_group(&self, kind: GroupKind) -> Result<Option<GroupId>, RjrError> {
        let ids: Vec<GroupId> = (0..self.groups.len())
            .map(GroupId::from_index)
            .filter(|id| self.groups[id.index()].kind == kind)
            .collect();
        if ids.len() > 1 {
            let info = ErrorInfo::new("multiple-groups", "at most one group of each kind is supported")
                .with_context("kind", kind.label())
                .with_context("count", ids.len().to_string());
            return Err(RjrError::Analysis(info));
        }
        Ok(ids.first().copied())
    }

    fn jigsaws_of(&self, group: GroupId) -> Vec<(JigsawId, &Jigsaw)> {
        self.jigsaws
            .iter()
            .enumerate()
            .filter(|(_, record)| record.group == group)
            .map(|(index, record)| (JigsawId::from_index(index), &record.jigsaw))
            .collect()
    }

    fn plan_combinatoric(
        &self,
        group_id: GroupId,
        order: &mut Vec<JigsawId>,
    ) -> Result<CombinatoricPlan, RjrError> {
        let group = &self.groups[group_id.index()];
        let jigsaws = self.jigsaws_of(group_id);
        let (id, frames) = match jigsaws.as_slice() {
            [(id, Jigsaw::MinMasses { frames })] => (*id, frames),
            [] => {
                let info = ErrorInfo::new("missing-jigsaw", "combinatoric group has no jigsaw")
                    .with_context("group", group.name.clone())
                    .with_hint("attach a hemisphere mass-minimization jigsaw");
                return Err(RjrError::Analysis(info));
            }
            _ => {
                let info = ErrorInfo::new("jigsaw-sequence", "combinatoric group needs exactly one hemisphere jigsaw")
                    .with_context("group", group.name.clone())
                    .with_context("count", jigsaws.len().to_string());
                return Err(RjrError::Analysis(info));
            }
        };
        let declared: BTreeSet<FrameId> = group.frames.iter().copied().collect();
        let covered: BTreeSet<FrameId> = frames.iter().copied().collect();
        if declared != covered || frames.len() != covered.len() {
            let info = ErrorInfo::new("jigsaw-frames-mismatch", "hemisphere jigsaw must cover each group frame once")
                .with_context("group", group.name.clone());
            return Err(RjrError::Analysis(info));
        }
        let mut cardinalities = Vec::with_capacity(frames.len());
        for frame in frames {
            let position = group
                .frames
                .iter()
                .position(|member| member == frame)
                .ok_or_else(|| self.frame_error("jigsaw-frames-mismatch", "frame not in group", *frame))?;
            cardinalities.push(group.cardinalities[position]);
        }
        order.push(id);
        Ok(CombinatoricPlan { cardinalities })
    }

    fn plan_invisible(&self, group_id: GroupId, order: &mut Vec<JigsawId>) -> Result<InvisiblePlan, RjrError> {
        let group = &self.groups[group_id.index()];
        let jigsaws = self.jigsaws_of(group_id);
        let (ids, rapidity_visible, sides) = match jigsaws.as_slice() {
            [(mass, Jigsaw::SetMass), (rapidity, Jigsaw::SetRapidity { visible }), (contra, Jigsaw::ContraBoost { sides })] => {
                ([*mass, *rapidity, *contra], visible, sides)
            }
            _ => {
                let labels: Vec<&str> = jigsaws.iter().map(|(_, jigsaw)| jigsaw.label()).collect();
                let info = ErrorInfo::new("jigsaw-sequence", "invisible group needs mass, rapidity and contraboost jigsaws in that order")
                    .with_context("group", group.name.clone())
                    .with_context("found", labels.join(","));
                return Err(RjrError::Analysis(info));
            }
        };

        if rapidity_visible.is_empty() {
            let info = ErrorInfo::new("empty-jigsaw-frames", "rapidity jigsaw lists no visible frames")
                .with_context("group", group.name.clone());
            return Err(RjrError::Analysis(info));
        }
        for &frame in rapidity_visible {
            self.expect_role(frame, FrameRole::Visible)?;
        }

        if group.frames.len() != 2 {
            let info = ErrorInfo::new("contraboost-arity", "contraboost splits exactly two invisible frames")
                .with_context("group", group.name.clone())
                .with_context("frames", group.frames.len().to_string());
            return Err(RjrError::Analysis(info));
        }
        let [first, second] = sides;
        if first.invisible == second.invisible
            || !group.frames.contains(&first.invisible)
            || !group.frames.contains(&second.invisible)
        {
            let info = ErrorInfo::new("contraboost-invisible", "contraboost sides must name the two group frames")
                .with_context("group", group.name.clone());
            return Err(RjrError::Analysis(info));
        }
        for side in sides {
            self.check_side(side)?;
        }
        if let Some(shared) = first.visible.iter().find(|frame| second.visible.contains(*frame)) {
            return Err(self.frame_error("contraboost-overlap", "visible frame on both contraboost sides", *shared));
        }

        order.extend(ids);
        Ok(InvisiblePlan {
            sides: sides.clone(),
        })
    }

    fn expect_role(&self, frame: FrameId, role: FrameRole) -> Result<(), RjrError> {
        match self.tree.role(frame) {
            Some(found) if found == role => Ok(()),
            Some(found) => {
                let info = ErrorInfo::new("jigsaw-frame-role", "jigsaw refers to a frame with the wrong role")
                    .with_context("frame", self.tree.name(frame))
                    .with_context("expected", role.label())
                    .with_context("found", found.label());
                Err(RjrError::Analysis(info))
            }
            None => {
                let info = ErrorInfo::new("unknown-frame", "jigsaw refers to a frame outside the tree")
                    .with_context("frame_id", frame.as_raw().to_string());
                Err(RjrError::Analysis(info))
            }
        }
    }

    fn check_side(&self, side: &ContraBoostSide) -> Result<(), RjrError> {
        if side.visible.is_empty() {
            return Err(self.frame_error(
                "empty-jigsaw-frames",
                "contraboost side has no visible frames",
                side.invisible,
            ));
        }
        let hemisphere = self.tree.parent(side.invisible);
        for &frame in &side.visible {
            self.expect_role(frame, FrameRole::Visible)?;
            if self.tree.parent(frame) != hemisphere {
                let info = ErrorInfo::new("contraboost-not-sibling", "visible frame is not a sibling of its invisible frame")
                    .with_context("visible", self.tree.name(frame))
                    .with_context("invisible", self.tree.name(side.invisible));
                return Err(RjrError::Analysis(info));
            }
        }
        Ok(())
    }
}

/// Cardinalities aligned with the hemisphere jigsaw's frame order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CombinatoricPlan {
    pub(crate) cardinalities: Vec<Cardinality>,
}

/// Hemisphere sides shared by the mass and contraboost jigsaws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InvisiblePlan {
    pub(crate) sides: [ContraBoostSide; 2],
}

/// A validated tree with its groups and jigsaws in execution order.
///
/// Immutable after initialization; per-event state lives in [`Solver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    tree: InitializedTree,
    groups: Vec<Group>,
    jigsaws: Vec<JigsawRecord>,
    order: Vec<JigsawId>,
    pub(crate) combinatoric: Option<CombinatoricPlan>,
    pub(crate) invisible: Option<InvisiblePlan>,
}

impl Analysis {
    /// The frame tree.
    pub fn tree(&self) -> &InitializedTree {
        &self.tree
    }

    /// Registered groups.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Registered jigsaws in attachment order.
    pub fn jigsaws(&self) -> &[JigsawRecord] {
        &self.jigsaws
    }

    /// Returns the jigsaw with the given identifier.
    pub fn jigsaw(&self, id: JigsawId) -> Option<&JigsawRecord> {
        self.jigsaws.get(id.index())
    }

    /// Jigsaws in the order the solver applies them.
    pub fn execution_order(&self) -> &[JigsawId] {
        &self.order
    }

    /// Creates a reusable per-event solver.
    pub fn solver(&self, config: &SolverConfig) -> Solver<'_> {
        Solver::new(self, config)
    }

    /// Solves one event with a fresh solver.
    pub fn solve(&self, input: &EventInput, config: &SolverConfig) -> Result<SolvedEvent<'_>, RjrError> {
        let mut solver = self.solver(config);
        solver.load_event(input);
        solver.analyze_event()
    }
}
