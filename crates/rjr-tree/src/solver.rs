use rjr_core::errors::RjrError;
use rjr_core::{EventInput, FourVector, ThreeVector};
use tracing::{debug, trace};

use crate::analysis::Analysis;
use crate::combinatorics::min_mass_partition;
use crate::config::SolverConfig;
use crate::contraboost::contraboost_split;
use crate::frame::FrameRole;
use crate::ids::FrameId;
use crate::invisible::{invisible_with_rapidity, minimum_invisible_mass};
use crate::jigsaw::Jigsaw;
use crate::tree::InitializedTree;

/// Per-event state buffer bound to an immutable [`Analysis`].
///
/// Typical use is `clear_event`, `set_met`, `add_visible` for each object and
/// then `analyze_event`. Nothing carries over between events except the
/// analysis itself.
#[derive(Debug, Clone)]
pub struct Solver<'a> {
    analysis: &'a Analysis,
    config: SolverConfig,
    visible: Vec<FourVector>,
    met: [f64; 2],
}

impl<'a> Solver<'a> {
    /// Creates a solver with a sanitised copy of `config`.
    pub fn new(analysis: &'a Analysis, config: &SolverConfig) -> Self {
        Self {
            analysis,
            config: config.sanitised(),
            visible: Vec::new(),
            met: [0.0, 0.0],
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Drops all per-event inputs.
    pub fn clear_event(&mut self) {
        self.visible.clear();
        self.met = [0.0, 0.0];
    }

    /// Sets the missing transverse momentum.
    pub fn set_met(&mut self, met: [f64; 2]) {
        self.met = met;
    }

    /// Appends a visible object and returns its input index.
    pub fn add_visible(&mut self, object: FourVector) -> usize {
        self.visible.push(object);
        self.visible.len() - 1
    }

    /// Clears the buffer and loads a whole event.
    pub fn load_event(&mut self, input: &EventInput) {
        self.clear_event();
        self.visible.extend_from_slice(&input.visible);
        self.met = input.met;
    }

    /// Applies every jigsaw in execution order and returns the solved frames.
    pub fn analyze_event(&self) -> Result<SolvedEvent<'a>, RjrError> {
        let input = EventInput::new(self.visible.clone(), self.met);
        input.validate()?;

        let analysis = self.analysis;
        let tree = analysis.tree();
        let eps = self.config.timelike_epsilon;
        let mut lab = vec![FourVector::zero(); tree.len()];
        let mut assignment = Vec::new();
        let mut invisible_mass = 0.0;
        let mut invisible_system = input.met_four_vector();

        for &id in analysis.execution_order() {
            let Some(record) = analysis.jigsaw(id) else {
                continue;
            };
            trace!(jigsaw = record.jigsaw().label(), "applying jigsaw");
            match record.jigsaw() {
                Jigsaw::MinMasses { frames } => {
                    let cardinalities = analysis
                        .combinatoric
                        .as_ref()
                        .map(|plan| plan.cardinalities.as_slice())
                        .unwrap_or(&[]);
                    let partition =
                        min_mass_partition(&input.visible, cardinalities, self.config.max_objects)?;
                    assignment = partition
                        .assignment
                        .iter()
                        .map(|&slot| frames[slot])
                        .collect();
                    for (object, frame) in input.visible.iter().zip(&assignment) {
                        lab[frame.index()] += *object;
                    }
                }
                Jigsaw::SetMass => {
                    if let Some(plan) = analysis.invisible.as_ref() {
                        let [first, second] = &plan.sides;
                        let v1 = sum_frames(&lab, &first.visible);
                        let v2 = sum_frames(&lab, &second.visible);
                        invisible_mass = minimum_invisible_mass(&v1, &v2);
                    }
                }
                Jigsaw::SetRapidity { visible } => {
                    let reference = sum_frames(&lab, visible);
                    invisible_system =
                        invisible_with_rapidity(input.met_vector(), invisible_mass, &reference);
                }
                Jigsaw::ContraBoost { sides } => {
                    let [first, second] = sides;
                    let v1 = sum_frames(&lab, &first.visible);
                    let v2 = sum_frames(&lab, &second.visible);
                    let (i1, i2) = contraboost_split(&v1, &v2, &invisible_system, &self.config);
                    lab[first.invisible.index()] = i1;
                    lab[second.invisible.index()] = i2;
                }
            }
        }

        if analysis.invisible.is_none() && input.met_vector().perp() > 0.0 {
            trace!("topology has no invisible frames; missing momentum ignored");
        }

        for &frame in tree.depth_first().iter().rev() {
            if matches!(tree.role(frame), Some(FrameRole::Decay | FrameRole::Lab)) {
                lab[frame.index()] = sum_frames(&lab, tree.children(frame));
            }
        }

        let solved = SolvedEvent {
            tree,
            lab,
            assignment,
            timelike_epsilon: eps,
        };
        debug!(
            objects = input.visible.len(),
            total_mass = solved.lab_four_vector(tree.lab()).mass(),
            "event solved"
        );
        Ok(solved)
    }
}

fn sum_frames(lab: &[FourVector], frames: &[FrameId]) -> FourVector {
    frames
        .iter()
        .filter_map(|frame| lab.get(frame.index()))
        .sum()
}

/// Lab-frame four-vectors of every frame for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedEvent<'a> {
    tree: &'a InitializedTree,
    lab: Vec<FourVector>,
    assignment: Vec<FrameId>,
    timelike_epsilon: f64,
}

impl<'a> SolvedEvent<'a> {
    /// The frame tree the event was solved on.
    pub fn tree(&self) -> &'a InitializedTree {
        self.tree
    }

    /// Visible frame chosen for each input object, in input order.
    pub fn assignment(&self) -> &[FrameId] {
        &self.assignment
    }

    /// Four-vector of `frame` in the lab frame.
    pub fn lab_four_vector(&self, frame: FrameId) -> FourVector {
        self.lab.get(frame.index()).copied().unwrap_or_default()
    }

    /// Four-vector of `frame` as seen in the rest frame of `observer`.
    ///
    /// Boosts are composed along the lab to `observer` path; each step uses the
    /// next frame's four-vector as seen from the previous one. Boosting into a
    /// frame that is not timelike is the identity.
    pub fn four_vector_in(&self, frame: FrameId, observer: FrameId) -> FourVector {
        let mut vector = self.lab_four_vector(frame);
        let mut steps: Vec<FourVector> = Vec::new();
        for &step in self.tree.path_from_lab(observer) {
            let mut axis = self.lab_four_vector(step);
            for previous in &steps {
                axis = axis.in_rest_frame_of(previous, self.timelike_epsilon);
            }
            vector = vector.in_rest_frame_of(&axis, self.timelike_epsilon);
            steps.push(axis);
        }
        vector
    }

    /// Momentum of `frame` in the rest frame of `observer`.
    pub fn momentum_in(&self, frame: FrameId, observer: FrameId) -> ThreeVector {
        self.four_vector_in(frame, observer).vect()
    }

    /// Energy of `frame` in the rest frame of `observer`.
    pub fn energy_in(&self, frame: FrameId, observer: FrameId) -> f64 {
        self.four_vector_in(frame, observer).e
    }

    /// Invariant mass of `frame`.
    pub fn mass(&self, frame: FrameId) -> f64 {
        self.lab_four_vector(frame).mass()
    }

    /// Sum of the visible leaves below `frame`, seen from `observer`.
    pub fn visible_in(&self, frame: FrameId, observer: FrameId) -> FourVector {
        self.leaves_in(frame, observer, FrameRole::Visible)
    }

    /// Sum of the invisible leaves below `frame`, seen from `observer`.
    pub fn invisible_in(&self, frame: FrameId, observer: FrameId) -> FourVector {
        self.leaves_in(frame, observer, FrameRole::Invisible)
    }

    fn leaves_in(&self, frame: FrameId, observer: FrameId, role: FrameRole) -> FourVector {
        self.tree
            .leaves_below(frame, role)
            .into_iter()
            .map(|leaf| self.four_vector_in(leaf, observer))
            .sum()
    }

    /// Velocity of `frame` relative to its parent, measured in the parent's rest frame.
    pub fn boost_from_parent(&self, frame: FrameId) -> ThreeVector {
        match self.tree.parent(frame) {
            Some(parent) => self.four_vector_in(frame, parent).boost_vector(),
            None => ThreeVector::zero(),
        }
    }

    /// Cosine, in the rest frame of `frame`, between its first child and the
    /// boost from its parent.
    ///
    /// `None` for a leaf, which has no decay product, and for a frame that has
    /// no rest frame (a massless visible object, for instance).
    pub fn cos_decay_angle(&self, frame: FrameId) -> Option<f64> {
        let child = *self.tree.children(frame).first()?;
        let own = self.lab_four_vector(frame);
        if !(own.e > 0.0 && own.m2() > self.timelike_epsilon) {
            return None;
        }
        let axis = self.boost_from_parent(frame);
        Some(self.momentum_in(child, frame).cos_angle(&axis))
    }
}
