use rjr_core::ThreeVector;
use rjr_tree::{SolvedEvent, Stop2lFrames};
use serde::{Deserialize, Serialize};
use tracing::warn;

macro_rules! observable_set {
    ($(#[$meta:meta])* $name:ident { $($(#[$field_meta:meta])* $field:ident => $key:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: f64,)+
        }

        impl $name {
            /// Output names in declaration order.
            pub const NAMES: &'static [&'static str] = &[$($key),+];

            /// Name and value of every observable in declaration order.
            pub fn entries(&self) -> Vec<(&'static str, f64)> {
                vec![$(($key, self.$field)),+]
            }

            fn entries_mut(&mut self) -> Vec<(&'static str, &mut f64)> {
                vec![$(($key, &mut self.$field)),+]
            }
        }
    };
}

observable_set! {
    /// Observables derived from the solved dilepton frame tree.
    EventObservables {
        /// `|p_v| + |p_i|` in `ss`.
        h_11_ss => "H_11_SS",
        /// `|p_v1| + |p_v2| + |p_i|` in `ss`.
        h_21_ss => "H_21_SS",
        /// `|p_v| + |p_i1| + |p_i2|` in `ss`.
        h_12_ss => "H_12_SS",
        /// `|p_v1| + |p_v2| + |p_i1| + |p_i2|` in `ss`.
        h_22_ss => "H_22_SS",
        /// `|p_v1| + |p_i1|` in `s1`.
        h_11_s1 => "H_11_S1",
        /// Transverse `H_11_SS`.
        h_11_ss_t => "H_11_SS_T",
        /// Transverse `H_21_SS`.
        h_21_ss_t => "H_21_SS_T",
        /// Transverse `H_22_SS`.
        h_22_ss_t => "H_22_SS_T",
        /// Transverse `H_11_S1`.
        h_11_s1_t => "H_11_S1_T",
        /// Invariant mass of `ss`.
        shat => "shat",
        /// Lab transverse momentum of `ss`.
        ptt_t => "pTT_T",
        /// Lab longitudinal momentum of `ss`.
        ptt_z => "pTT_Z",
        /// `pT / (pT + shat/4)`.
        rpt => "RPT",
        /// `|pz| / (|pz| + shat/4)`.
        rpz => "RPZ",
        /// `RPT` normalized by `H_11_SS`.
        rpt_h_11_ss => "RPT_H_11_SS",
        /// `RPT` normalized by `H_21_SS`.
        rpt_h_21_ss => "RPT_H_21_SS",
        /// `RPT` normalized by `H_22_SS`.
        rpt_h_22_ss => "RPT_H_22_SS",
        /// `RPZ` normalized by `H_11_SS`.
        rpz_h_11_ss => "RPZ_H_11_SS",
        /// `RPZ` normalized by `H_21_SS`.
        rpz_h_21_ss => "RPZ_H_21_SS",
        /// `RPZ` normalized by `H_22_SS`.
        rpz_h_22_ss => "RPZ_H_22_SS",
        /// `RPT` normalized by `H_11_SS_T`.
        rpt_h_11_ss_t => "RPT_H_11_SS_T",
        /// `RPT` normalized by `H_21_SS_T`.
        rpt_h_21_ss_t => "RPT_H_21_SS_T",
        /// `RPT` normalized by `H_22_SS_T`.
        rpt_h_22_ss_t => "RPT_H_22_SS_T",
        /// `RPZ` normalized by `H_11_SS_T`.
        rpz_h_11_ss_t => "RPZ_H_11_SS_T",
        /// `RPZ` normalized by `H_21_SS_T`.
        rpz_h_21_ss_t => "RPZ_H_21_SS_T",
        /// `RPZ` normalized by `H_22_SS_T`.
        rpz_h_22_ss_t => "RPZ_H_22_SS_T",
        /// Visible shape of `ss`.
        gam_inv_rp1 => "gamInvRp1",
        /// Twice the energy of `v1` in `s1`.
        mdr => "MDR",
        /// Decay angle of `ss` relative to its boost from the lab.
        costheta_ss => "costheta_SS",
        /// Azimuthal opening between the two visible momenta in `ss`.
        dphi_v_ss => "dphi_v_SS",
        /// Azimuthal angle between the `ss` boost and the visible system in `ss`.
        dpb_v_ss => "DPB_vSS",
        /// Cosine between `s1` in `ss` and `v1` in `s1`.
        cos_b_1 => "cosB_1",
        /// Cosine between `s1` in `ss` and `v1` in `ss`.
        cos_b_4 => "cosB_4",
    }
}

/// `numerator / (numerator + scale/4)`, zero when the denominator vanishes.
fn scale_ratio(numerator: f64, scale: f64) -> f64 {
    let denom = numerator + scale / 4.0;
    if denom > 0.0 {
        numerator / denom
    } else {
        0.0
    }
}

fn visible_shape(p1: ThreeVector, p2: ThreeVector) -> f64 {
    let sum = p1.mag() + p2.mag();
    if sum > 0.0 {
        (sum * sum - (p1 - p2).mag2()).max(0.0).sqrt() / sum
    } else {
        0.0
    }
}

impl EventObservables {
    /// Computes every observable from a solved event.
    pub fn extract(solved: &SolvedEvent<'_>, frames: &Stop2lFrames) -> Self {
        let ss = frames.ss;
        let p_v1_ss = solved.momentum_in(frames.v1, ss);
        let p_v2_ss = solved.momentum_in(frames.v2, ss);
        let p_i1_ss = solved.momentum_in(frames.i1, ss);
        let p_i2_ss = solved.momentum_in(frames.i2, ss);
        let p_v_ss = p_v1_ss + p_v2_ss;
        let p_i_ss = p_i1_ss + p_i2_ss;
        let p_v1_s1 = solved.momentum_in(frames.v1, frames.s1);
        let p_i1_s1 = solved.momentum_in(frames.i1, frames.s1);

        let h_11_ss = p_v_ss.mag() + p_i_ss.mag();
        let h_21_ss = p_v1_ss.mag() + p_v2_ss.mag() + p_i_ss.mag();
        let h_12_ss = p_v_ss.mag() + p_i1_ss.mag() + p_i2_ss.mag();
        let h_22_ss = p_v1_ss.mag() + p_v2_ss.mag() + p_i1_ss.mag() + p_i2_ss.mag();
        let h_11_s1 = p_v1_s1.mag() + p_i1_s1.mag();

        let h_11_ss_t = p_v_ss.perp() + p_i_ss.perp();
        let h_21_ss_t = p_v1_ss.perp() + p_v2_ss.perp() + p_i_ss.perp();
        let h_22_ss_t = p_v1_ss.perp() + p_v2_ss.perp() + p_i1_ss.perp() + p_i2_ss.perp();
        let h_11_s1_t = p_v1_s1.perp() + p_i1_s1.perp();

        let ss_lab = solved.lab_four_vector(ss);
        let shat = ss_lab.mass();
        let pt = ss_lab.pt();
        let pz = ss_lab.pz.abs();

        let ss_boost = ss_lab.boost_vector();
        let p_s1_ss = solved.momentum_in(frames.s1, ss);
        let s1_axis = p_s1_ss.unit();

        let mut observables = Self {
            h_11_ss,
            h_21_ss,
            h_12_ss,
            h_22_ss,
            h_11_s1,
            h_11_ss_t,
            h_21_ss_t,
            h_22_ss_t,
            h_11_s1_t,
            shat,
            ptt_t: pt,
            ptt_z: ss_lab.pz,
            rpt: scale_ratio(pt, shat),
            rpz: scale_ratio(pz, shat),
            rpt_h_11_ss: scale_ratio(pt, h_11_ss),
            rpt_h_21_ss: scale_ratio(pt, h_21_ss),
            rpt_h_22_ss: scale_ratio(pt, h_22_ss),
            rpz_h_11_ss: scale_ratio(pz, h_11_ss),
            rpz_h_21_ss: scale_ratio(pz, h_21_ss),
            rpz_h_22_ss: scale_ratio(pz, h_22_ss),
            rpt_h_11_ss_t: scale_ratio(pt, h_11_ss_t),
            rpt_h_21_ss_t: scale_ratio(pt, h_21_ss_t),
            rpt_h_22_ss_t: scale_ratio(pt, h_22_ss_t),
            rpz_h_11_ss_t: scale_ratio(pz, h_11_ss_t),
            rpz_h_21_ss_t: scale_ratio(pz, h_21_ss_t),
            rpz_h_22_ss_t: scale_ratio(pz, h_22_ss_t),
            gam_inv_rp1: visible_shape(
                solved.visible_in(frames.s1, ss).vect(),
                solved.visible_in(frames.s2, ss).vect(),
            ),
            mdr: 2.0 * solved.energy_in(frames.v1, frames.s1),
            costheta_ss: solved.cos_decay_angle(ss).unwrap_or(0.0),
            dphi_v_ss: p_v1_ss.delta_phi(&p_v2_ss).abs(),
            dpb_v_ss: ss_boost.delta_phi(&p_v_ss).abs(),
            cos_b_1: s1_axis.dot(&p_v1_s1.unit()),
            cos_b_4: s1_axis.dot(&p_v1_ss.unit()),
        };
        observables.replace_non_finite();
        observables
    }

    /// Replaces non-finite values with zero, logging each replacement.
    /// Returns the number of values replaced.
    pub fn replace_non_finite(&mut self) -> usize {
        let mut replaced = 0;
        for (name, value) in self.entries_mut() {
            if !value.is_finite() {
                let found = *value;
                warn!(observable = name, value = %found, "non-finite observable replaced with 0");
                *value = 0.0;
                replaced += 1;
            }
        }
        replaced
    }
}
