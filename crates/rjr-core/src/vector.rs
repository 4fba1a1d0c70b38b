//! Three- and four-vector algebra in double precision.
//!
//! Conventions follow the usual collider ones: `z` is the beam axis, the metric
//! is `(+, -, -, -)` and four-vectors are stored as `(px, py, pz, E)`.
//! Every operation that normalizes or boosts has an explicit branch for the
//! degenerate input so that no `NaN` leaks out of a well-formed event.

use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Spatial vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThreeVector {
    /// x component.
    pub x: f64,
    /// y component.
    pub y: f64,
    /// z (beam) component.
    pub z: f64,
}

impl ThreeVector {
    /// Creates a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean dot product.
    pub fn dot(&self, other: &ThreeVector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared magnitude.
    pub fn mag2(&self) -> f64 {
        self.dot(self)
    }

    /// Magnitude.
    pub fn mag(&self) -> f64 {
        self.mag2().sqrt()
    }

    /// Magnitude of the transverse (x, y) projection.
    pub fn perp(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Copy with the longitudinal component removed.
    pub fn transverse(&self) -> ThreeVector {
        ThreeVector::new(self.x, self.y, 0.0)
    }

    /// Unit vector along `self`; the zero vector has no direction and maps to zero.
    pub fn unit(&self) -> ThreeVector {
        let mag = self.mag();
        if mag > 0.0 && mag.is_finite() {
            *self * (1.0 / mag)
        } else {
            ThreeVector::zero()
        }
    }

    /// Azimuthal angle in `(-pi, pi]`, zero for a vector on the beam axis.
    pub fn phi(&self) -> f64 {
        if self.x == 0.0 && self.y == 0.0 {
            0.0
        } else {
            self.y.atan2(self.x)
        }
    }

    /// Signed azimuthal difference `phi(self) - phi(other)` wrapped into `[-pi, pi)`.
    pub fn delta_phi(&self, other: &ThreeVector) -> f64 {
        wrap_phi(self.phi() - other.phi())
    }

    /// Cosine of the opening angle; zero when either vector vanishes.
    pub fn cos_angle(&self, other: &ThreeVector) -> f64 {
        let denom = self.mag() * other.mag();
        if denom > 0.0 && denom.is_finite() {
            (self.dot(other) / denom).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Wraps an angle into `[-pi, pi)`.
pub fn wrap_phi(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped >= PI {
        wrapped -= 2.0 * PI;
    }
    wrapped
}

impl Add for ThreeVector {
    type Output = ThreeVector;

    fn add(self, rhs: ThreeVector) -> ThreeVector {
        ThreeVector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for ThreeVector {
    type Output = ThreeVector;

    fn sub(self, rhs: ThreeVector) -> ThreeVector {
        ThreeVector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for ThreeVector {
    type Output = ThreeVector;

    fn neg(self) -> ThreeVector {
        ThreeVector::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for ThreeVector {
    type Output = ThreeVector;

    fn mul(self, rhs: f64) -> ThreeVector {
        ThreeVector::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl AddAssign for ThreeVector {
    fn add_assign(&mut self, rhs: ThreeVector) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

/// Lorentz four-vector `(px, py, pz, E)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourVector {
    /// x momentum.
    pub px: f64,
    /// y momentum.
    pub py: f64,
    /// z (beam) momentum.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourVector {
    /// Creates a four-vector from its components.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// The zero four-vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Builds a four-vector from a momentum and an energy.
    pub fn from_vect_e(p: ThreeVector, e: f64) -> Self {
        Self::new(p.x, p.y, p.z, e)
    }

    /// Builds a four-vector from a momentum and a mass.
    pub fn from_vect_m(p: ThreeVector, mass: f64) -> Self {
        let e = (p.mag2() + mass * mass).sqrt();
        Self::from_vect_e(p, e)
    }

    /// Builds a four-vector from collider coordinates.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let p = ThreeVector::new(pt * phi.cos(), pt * phi.sin(), pt * eta.sinh());
        Self::from_vect_m(p, mass)
    }

    /// Spatial part.
    pub fn vect(&self) -> ThreeVector {
        ThreeVector::new(self.px, self.py, self.pz)
    }

    /// Minkowski product `E1 E2 - p1.p2`.
    pub fn dot(&self, other: &FourVector) -> f64 {
        self.e * other.e - self.vect().dot(&other.vect())
    }

    /// Invariant mass squared; may be negative for space-like vectors.
    pub fn m2(&self) -> f64 {
        self.dot(self)
    }

    /// Invariant mass, clamped to zero for space-like vectors.
    pub fn mass(&self) -> f64 {
        self.m2().max(0.0).sqrt()
    }

    /// Momentum magnitude.
    pub fn p(&self) -> f64 {
        self.vect().mag()
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Longitudinal transverse mass `sqrt(E^2 - pz^2)`.
    pub fn mt_longitudinal(&self) -> f64 {
        (self.e * self.e - self.pz * self.pz).max(0.0).sqrt()
    }

    /// Rapidity; zero when `E <= |pz|`.
    pub fn rapidity(&self) -> f64 {
        let plus = self.e + self.pz;
        let minus = self.e - self.pz;
        if plus > 0.0 && minus > 0.0 {
            0.5 * (plus / minus).ln()
        } else {
            0.0
        }
    }

    /// Parity image `(-p, E)`.
    pub fn parity(&self) -> FourVector {
        FourVector::new(-self.px, -self.py, -self.pz, self.e)
    }

    /// Velocity `p / E` of the rest frame; zero when `E <= 0`.
    pub fn boost_vector(&self) -> ThreeVector {
        if self.e > 0.0 {
            self.vect() * (1.0 / self.e)
        } else {
            ThreeVector::zero()
        }
    }

    /// Applies the active boost with velocity `beta`.
    ///
    /// `v.boost(-p.boost_vector())` brings `p` to rest. A velocity with
    /// `|beta| >= 1` is not a boost and leaves the vector unchanged.
    pub fn boost(&self, beta: ThreeVector) -> FourVector {
        let b2 = beta.mag2();
        if b2 == 0.0 || !(b2 < 1.0) {
            return *self;
        }
        let gamma = 1.0 / (1.0 - b2).sqrt();
        let bp = beta.dot(&self.vect());
        let gamma2 = (gamma - 1.0) / b2;
        let p = self.vect() + beta * (gamma2 * bp + gamma * self.e);
        FourVector::from_vect_e(p, gamma * (self.e + bp))
    }

    /// Expresses `self` in the rest frame of `frame`.
    ///
    /// Written in terms of `frame`'s mass rather than its velocity so that
    /// highly boosted frames do not lose precision through `1 - beta^2`.
    /// A frame with `m^2 <= timelike_epsilon` or `E <= 0` has no rest frame and
    /// the vector is returned unchanged.
    pub fn in_rest_frame_of(&self, frame: &FourVector, timelike_epsilon: f64) -> FourVector {
        let Some(mass) = rest_mass(frame, timelike_epsilon) else {
            return *self;
        };
        let frame_p = frame.vect();
        let pp = frame_p.dot(&self.vect());
        let e = (frame.e * self.e - pp) / mass;
        let scale = pp / (mass * (frame.e + mass)) - self.e / mass;
        FourVector::from_vect_e(self.vect() + frame_p * scale, e)
    }

    /// Inverse of [`FourVector::in_rest_frame_of`]: takes a vector measured in the
    /// rest frame of `frame` back to the frame in which `frame` is given.
    pub fn from_rest_frame_of(&self, frame: &FourVector, timelike_epsilon: f64) -> FourVector {
        let Some(mass) = rest_mass(frame, timelike_epsilon) else {
            return *self;
        };
        let frame_p = frame.vect();
        let pp = frame_p.dot(&self.vect());
        let e = (frame.e * self.e + pp) / mass;
        let scale = pp / (mass * (frame.e + mass)) + self.e / mass;
        FourVector::from_vect_e(self.vect() + frame_p * scale, e)
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.px.is_finite() && self.py.is_finite() && self.pz.is_finite() && self.e.is_finite()
    }
}

fn rest_mass(frame: &FourVector, timelike_epsilon: f64) -> Option<f64> {
    let m2 = frame.m2();
    if frame.e > 0.0 && m2 > timelike_epsilon && m2.is_finite() {
        Some(m2.sqrt())
    } else {
        None
    }
}

impl Add for FourVector {
    type Output = FourVector;

    fn add(self, rhs: FourVector) -> FourVector {
        FourVector::new(
            self.px + rhs.px,
            self.py + rhs.py,
            self.pz + rhs.pz,
            self.e + rhs.e,
        )
    }
}

impl Sub for FourVector {
    type Output = FourVector;

    fn sub(self, rhs: FourVector) -> FourVector {
        FourVector::new(
            self.px - rhs.px,
            self.py - rhs.py,
            self.pz - rhs.pz,
            self.e - rhs.e,
        )
    }
}

impl Neg for FourVector {
    type Output = FourVector;

    fn neg(self) -> FourVector {
        FourVector::new(-self.px, -self.py, -self.pz, -self.e)
    }
}

impl Mul<f64> for FourVector {
    type Output = FourVector;

    fn mul(self, rhs: f64) -> FourVector {
        FourVector::new(self.px * rhs, self.py * rhs, self.pz * rhs, self.e * rhs)
    }
}

impl AddAssign for FourVector {
    fn add_assign(&mut self, rhs: FourVector) {
        *self = *self + rhs;
    }
}

impl Sum for FourVector {
    fn sum<I: Iterator<Item = FourVector>>(iter: I) -> FourVector {
        iter.fold(FourVector::zero(), |acc, v| acc + v)
    }
}

impl<'a> Sum<&'a FourVector> for FourVector {
    fn sum<I: Iterator<Item = &'a FourVector>>(iter: I) -> FourVector {
        iter.fold(FourVector::zero(), |acc, v| acc + *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn wrap_phi_stays_in_range() {
        assert!(close(wrap_phi(PI + 0.5), -PI + 0.5));
        assert!(close(wrap_phi(-0.5), -0.5));
        assert!(close(wrap_phi(2.0 * PI + 0.25), 0.25));
        assert_eq!(wrap_phi(f64::NAN), 0.0);
    }

    #[test]
    fn rest_frame_round_trip() {
        let frame = FourVector::new(10.0, -4.0, 30.0, 60.0);
        let v = FourVector::new(3.0, 1.0, -2.0, 9.0);
        let there = v.in_rest_frame_of(&frame, 1e-12);
        let back = there.from_rest_frame_of(&frame, 1e-12);
        assert!(close(back.px, v.px));
        assert!(close(back.py, v.py));
        assert!(close(back.pz, v.pz));
        assert!(close(back.e, v.e));
        assert!(close(there.m2(), v.m2()));
    }

    #[test]
    fn frame_is_at_rest_in_itself() {
        let frame = FourVector::new(10.0, -4.0, 30.0, 60.0);
        let rest = frame.in_rest_frame_of(&frame, 1e-12);
        assert!(rest.p() < 1e-9);
        assert!(close(rest.e, frame.mass()));
    }

    #[test]
    fn velocity_boost_agrees_with_rest_frame_transform() {
        let frame = FourVector::new(1.0, 2.0, -3.0, 12.0);
        let v = FourVector::new(-5.0, 0.5, 4.0, 8.0);
        let a = v.boost(-frame.boost_vector());
        let b = v.in_rest_frame_of(&frame, 1e-12);
        assert!(close(a.e, b.e));
        assert!(close(a.px, b.px));
        assert!(close(a.pz, b.pz));
    }

    #[test]
    fn lightlike_frame_has_no_rest_frame() {
        let photon = FourVector::new(0.0, 0.0, 5.0, 5.0);
        let v = FourVector::new(1.0, 0.0, 0.0, 2.0);
        assert_eq!(v.in_rest_frame_of(&photon, 1e-12), v);
        assert_eq!(v.boost(photon.boost_vector()), v);
    }

    #[test]
    fn unit_of_zero_is_zero() {
        assert_eq!(ThreeVector::zero().unit(), ThreeVector::zero());
        assert_eq!(ThreeVector::zero().cos_angle(&ThreeVector::new(1.0, 0.0, 0.0)), 0.0);
    }
}
