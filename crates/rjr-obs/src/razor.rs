//! Super-razor decomposition of a dilepton event.
//!
//! Uses only the two lepton four-vectors and the missing transverse momentum;
//! nothing here touches the jigsaw tree.

use rjr_core::{FourVector, ThreeVector};
use serde::{Deserialize, Serialize};

/// Super-razor observables of one event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SuperRazor {
    /// Estimated centre-of-mass energy.
    pub shat: f64,
    /// Ratio `|pT_CM| / (|pT_CM| + shat/4)`.
    pub rpt: f64,
    /// Azimuthal angle between the dilepton system and the transverse boost.
    pub dpb: f64,
    /// Inverse Lorentz factor of the boost relating the two hemispheres.
    pub gam_inv_rp1: f64,
    /// Twice the lepton energy in the hemisphere frames.
    pub mdr: f64,
}

impl SuperRazor {
    /// Runs the decomposition.
    pub fn compute(l1: &FourVector, l2: &FourVector, met: [f64; 2]) -> Self {
        let ll = *l1 + *l2;
        let beta_z = if ll.e > 0.0 {
            ThreeVector::new(0.0, 0.0, ll.pz / ll.e)
        } else {
            ThreeVector::zero()
        };
        let l1 = l1.boost(-beta_z);
        let l2 = l2.boost(-beta_z);
        let ll = l1 + l2;

        let p_ll = ll.vect();
        let pt_cm = ThreeVector::new(ll.px + met[0], ll.py + met[1], 0.0);
        let e_ll = ll.e;
        let p_dot = p_ll.dot(&pt_cm);
        let inner = (e_ll * e_ll + pt_cm.mag2() - 2.0 * p_dot).max(0.0).sqrt();
        let shat = (2.0 * (e_ll * e_ll - p_dot + e_ll * inner)).max(0.0).sqrt();

        let denom = (pt_cm.mag2() + shat * shat).sqrt();
        let beta_t = if denom > 0.0 {
            pt_cm * (1.0 / denom)
        } else {
            ThreeVector::zero()
        };
        let l1 = l1.boost(-beta_t);
        let l2 = l2.boost(-beta_t);
        let dpb = (l1 + l2).vect().delta_phi(&beta_t).abs();

        let e_sum = l1.e + l2.e;
        let beta_r = if e_sum > 0.0 {
            (l1.vect() - l2.vect()) * (1.0 / e_sum)
        } else {
            ThreeVector::zero()
        };
        let gam_inv_rp1 = (1.0 - beta_r.mag2()).max(0.0).sqrt();
        let mdr = 2.0 * l1.boost(-beta_r).e;

        let pt = pt_cm.mag();
        let rpt = if pt + shat / 4.0 > 0.0 {
            pt / (pt + shat / 4.0)
        } else {
            0.0
        };

        Self {
            shat,
            rpt,
            dpb,
            gam_inv_rp1,
            mdr,
        }
    }

    /// Name and value of every razor observable.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("SHAT_KIN", self.shat),
            ("RPT_KIN", self.rpt),
            ("DPB_KIN", self.dpb),
            ("gamInvRp1_KIN", self.gam_inv_rp1),
            ("MDR_KIN", self.mdr),
        ]
    }
}
