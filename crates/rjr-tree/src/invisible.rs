//! Mass and rapidity jigsaws for the invisible system.

use rjr_core::{FourVector, ThreeVector};

/// Smallest invisible-system mass compatible with an equal-mass contraboost
/// split of the hemispheres `v1` and `v2`: `sqrt(max(0, M_V^2 - 4 m1 m2))`.
///
/// Lorentz invariant; never negative and never above `M_V`.
pub fn minimum_invisible_mass(v1: &FourVector, v2: &FourVector) -> f64 {
    let visible_m2 = (*v1 + *v2).m2();
    (visible_m2 - 4.0 * v1.mass() * v2.mass()).max(0.0).sqrt()
}

/// Invisible system with transverse momentum `met`, mass `mass` and the
/// rapidity of `visible`.
///
/// A visible system with no longitudinal transverse mass has no defined
/// rapidity; the invisible system is then placed at zero rapidity.
pub fn invisible_with_rapidity(met: ThreeVector, mass: f64, visible: &FourVector) -> FourVector {
    let transverse = met.transverse();
    let mt_invisible = (mass * mass + transverse.mag2()).sqrt();
    let mt_visible = visible.mt_longitudinal();
    let (pz, e) = if mt_visible > 0.0 && mt_visible.is_finite() {
        let scale = mt_invisible / mt_visible;
        (scale * visible.pz, scale * visible.e)
    } else {
        (0.0, mt_invisible)
    };
    FourVector::new(transverse.x, transverse.y, pz, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn massless_visibles_give_visible_mass() {
        let v1 = FourVector::new(30.0, 0.0, 40.0, 50.0);
        let v2 = FourVector::new(-20.0, 5.0, 0.0, 20.0_f64.hypot(5.0));
        let m = minimum_invisible_mass(&v1, &v2);
        assert!((m - (v1 + v2).mass()).abs() < 1e-9);
    }

    #[test]
    fn rapidity_is_copied() {
        let visible = FourVector::new(10.0, 3.0, 80.0, 100.0);
        let inv = invisible_with_rapidity(ThreeVector::new(15.0, -4.0, 0.0), 25.0, &visible);
        assert!((inv.rapidity() - visible.rapidity()).abs() < 1e-12);
        assert!((inv.mass() - 25.0).abs() < 1e-9);
        assert_eq!((inv.px, inv.py), (15.0, -4.0));
    }
}
