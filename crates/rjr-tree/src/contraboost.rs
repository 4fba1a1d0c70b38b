//! Contraboost-invariant split of the invisible system between two hemispheres.
//!
//! In the rest frame of `V1 + V2 + I` the invisible momenta are written as
//!
//! ```text
//! I1 = (c1 - 1) V1 + c2 ~V2
//! I2 = c1 ~V1 + (c2 - 1) V2
//! ```
//!
//! where `~V = (E, -p)`. The hemispheres `H1 = c1 V1 + c2 ~V2` and `H2 = ~H1`
//! are back to back with equal mass for every `(c1, c2)`. Energy conservation
//!
//! ```text
//! 2 E1 c1 + 2 E2 c2 = E_I + E1 + E2
//! ```
//!
//! leaves a single free parameter. With `c0 = (E_I + E_V) / (2 E_V)` and
//! `c1 = c0 + t E2`, `c2 = c0 - t E1` the invisible energies are pinned to
//! `E_H - E1` and `E_H - E2`, where `E_H = (E_I + E_V) / 2` is the hemisphere
//! energy, and only the first invisible momentum moves, along the line
//!
//! ```text
//! p_I1(t) = (c0 - 1) p1 - c0 p2 + t (E2 p1 + E1 p2)
//! ```
//!
//! The preferred `t` gives the two invisibles equal mass. It is clamped into
//! the interval on which both invisible four-vectors stay timelike, so each
//! hemisphere is at least as heavy as the visible system it contains. When no
//! such interval exists the smaller invisible mass squared is maximized.
//! Without a free direction (`E2 p1 + E1 p2 = 0`) the split is the symmetric
//! `t = 0`.

use rjr_core::{FourVector, ThreeVector};
use tracing::trace;

use crate::config::SolverConfig;

/// Which condition fixed the free parameter of the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// Equal invisible masses.
    EqualMass,
    /// Equal-mass solution moved to the nearest edge of the timelike interval.
    Clamped,
    /// Symmetric `c1 = c2`; the line is degenerate or has no equal-mass point.
    Symmetric,
    /// No timelike solution on the line; the smaller invisible mass squared is maximized.
    BestEffort,
}

/// Split of the invisible system, expressed in the rest frame of the full system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContraBoostSplit {
    /// Weight of the first hemisphere.
    pub c1: f64,
    /// Weight of the second hemisphere.
    pub c2: f64,
    /// First invisible four-vector.
    pub i1: FourVector,
    /// Second invisible four-vector; `i1 + i2` is the full invisible system.
    pub i2: FourVector,
    /// Condition that fixed `c1` and `c2`.
    pub rule: SplitRule,
}

struct SplitLine {
    start: ThreeVector,
    rest: ThreeVector,
    direction: ThreeVector,
    e1: f64,
    e2: f64,
    slack: f64,
}

impl SplitLine {
    fn margins(&self, t: f64) -> (f64, f64) {
        let first = self.start + self.direction * t;
        let second = self.rest - self.direction * t;
        (self.e1 * self.e1 - first.mag2(), self.e2 * self.e2 - second.mag2())
    }

    fn worst_margin(&self, t: f64) -> f64 {
        let (first, second) = self.margins(t);
        first.min(second)
    }

    /// Range of `t` with `|offset + t step|^2 <= radius^2 + slack`.
    fn ball(&self, offset: ThreeVector, step: ThreeVector, radius: f64) -> Option<(f64, f64)> {
        if radius < 0.0 {
            return None;
        }
        let step2 = step.mag2();
        let half_b = offset.dot(&step);
        let disc = half_b * half_b - step2 * (offset.mag2() - radius * radius - self.slack);
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        Some(((-half_b - root) / step2, (-half_b + root) / step2))
    }

    fn timelike_interval(&self) -> Option<(f64, f64)> {
        let (lo1, hi1) = self.ball(self.start, self.direction, self.e1)?;
        let (lo2, hi2) = self.ball(self.rest, -self.direction, self.e2)?;
        let (lo, hi) = (lo1.max(lo2), hi1.min(hi2));
        (lo <= hi).then_some((lo, hi))
    }
}

/// Splits `invisible` between the hemisphere visibles `a` and `b`, all given
/// in the rest frame of `a + b + invisible`.
///
/// `tolerance` is relative to the largest energy in the problem and decides
/// when the split line or the equal-mass condition is degenerate.
pub fn split_in_rest_frame(
    a: &FourVector,
    b: &FourVector,
    invisible: &FourVector,
    tolerance: f64,
) -> ContraBoostSplit {
    let (e1, e2) = (a.e, b.e);
    let e_visible = e1 + e2;
    if !(e_visible > 0.0) {
        let i1 = *invisible * 0.5;
        return ContraBoostSplit {
            c1: 0.5,
            c2: 0.5,
            i1,
            i2: *invisible - i1,
            rule: SplitRule::Symmetric,
        };
    }

    let hemisphere = 0.5 * (invisible.e + e_visible);
    let c0 = hemisphere / e_visible;
    let (p1, p2) = (a.vect(), b.vect());
    let start = p1 * (c0 - 1.0) - p2 * c0;
    let scale = e_visible.max(invisible.e.abs());
    let line = SplitLine {
        start,
        rest: invisible.vect() - start,
        direction: p1 * e2 + p2 * e1,
        e1: hemisphere - e1,
        e2: hemisphere - e2,
        slack: tolerance * scale * scale,
    };

    let (t, rule) = if line.direction.mag2() <= tolerance * scale.powi(4) {
        (0.0, SplitRule::Symmetric)
    } else {
        choose_parameter(&line, invisible.vect(), tolerance * scale.powi(3))
    };

    let i1 = FourVector::from_vect_e(line.start + line.direction * t, line.e1);
    ContraBoostSplit {
        c1: c0 + t * e2,
        c2: c0 - t * e1,
        i1,
        i2: *invisible - i1,
        rule,
    }
}

fn choose_parameter(line: &SplitLine, total: ThreeVector, threshold: f64) -> (f64, SplitRule) {
    // The two margins share their quadratic term, so their difference is linear in t.
    let (m1, m2) = line.margins(0.0);
    let slope = 2.0 * total.dot(&line.direction);
    let equal_mass = (slope.abs() > threshold).then(|| (m1 - m2) / slope);
    let (target, preferred) = match equal_mass {
        Some(t) if t.is_finite() => (t, SplitRule::EqualMass),
        _ => (0.0, SplitRule::Symmetric),
    };

    if let Some((lo, hi)) = line.timelike_interval() {
        let t = target.clamp(lo, hi);
        return if t == target { (t, preferred) } else { (t, SplitRule::Clamped) };
    }

    let step2 = line.direction.mag2();
    let candidates = [
        Some(-line.start.dot(&line.direction) / step2),
        Some(line.rest.dot(&line.direction) / step2),
        equal_mass,
    ];
    let best = candidates
        .into_iter()
        .flatten()
        .filter(|t| t.is_finite())
        .fold((0.0, line.worst_margin(0.0)), |best, t| {
            let margin = line.worst_margin(t);
            if margin > best.1 {
                (t, margin)
            } else {
                best
            }
        });
    (best.0, SplitRule::BestEffort)
}

/// Splits the lab-frame invisible system between the hemispheres whose
/// lab-frame visible momenta are `v1` and `v2`.
///
/// The returned pair always sums to `invisible`. With no visible energy in the
/// rest frame the invisible system is shared equally.
pub fn contraboost_split(
    v1: &FourVector,
    v2: &FourVector,
    invisible: &FourVector,
    config: &SolverConfig,
) -> (FourVector, FourVector) {
    let eps = config.timelike_epsilon;
    let system = *v1 + *v2 + *invisible;
    let a = v1.in_rest_frame_of(&system, eps);
    let b = v2.in_rest_frame_of(&system, eps);
    let inv = invisible.in_rest_frame_of(&system, eps);

    if !(a.e + b.e > 0.0) {
        let half = *invisible * 0.5;
        return (half, *invisible - half);
    }

    let split = split_in_rest_frame(&a, &b, &inv, config.degenerate_tolerance);
    trace!(c1 = split.c1, c2 = split.c2, rule = ?split.rule, "contraboost split");
    let i1 = split.i1.from_rest_frame_of(&system, eps);
    (i1, *invisible - i1)
}
