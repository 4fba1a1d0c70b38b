use rjr_core::{EventInput, FourVector};
use rjr_obs::{evaluate_event, EventObservables, SuperRazor};
use rjr_tree::{build_topology, SolverConfig};

const REQUIRED: &[&str] = &[
    "H_11_SS", "H_21_SS", "H_12_SS", "H_22_SS", "H_11_S1", "H_11_SS_T", "H_21_SS_T",
    "H_22_SS_T", "H_11_S1_T", "shat", "pTT_T", "pTT_Z", "RPT", "RPZ", "RPT_H_11_SS",
    "RPT_H_21_SS", "RPT_H_22_SS", "RPZ_H_11_SS", "RPZ_H_21_SS", "RPZ_H_22_SS",
    "RPT_H_11_SS_T", "RPT_H_21_SS_T", "RPT_H_22_SS_T", "RPZ_H_11_SS_T", "RPZ_H_21_SS_T",
    "RPZ_H_22_SS_T", "gamInvRp1", "MDR", "costheta_SS", "dphi_v_SS", "DPB_vSS",
    "gamInvRp1_KIN", "MDR_KIN", "DPB_KIN", "SHAT_KIN",
];

fn back_to_back() -> EventInput {
    EventInput::new(
        vec![
            FourVector::new(50.0, 0.0, 0.0, 50.0),
            FourVector::new(-50.0, 0.0, 0.0, 50.0),
        ],
        [0.0, 0.0],
    )
}

#[test]
fn map_covers_every_published_name() {
    let topology = build_topology().unwrap();
    let record = evaluate_event(&topology, &back_to_back(), &SolverConfig::default()).unwrap();
    let map = record.to_map();
    for name in REQUIRED {
        assert!(map.contains_key(*name), "missing observable {name}");
    }
    assert_eq!(map.len(), EventObservables::NAMES.len() + 5);
}

#[test]
fn back_to_back_scenario_values() {
    let topology = build_topology().unwrap();
    let record = evaluate_event(&topology, &back_to_back(), &SolverConfig::default()).unwrap();
    let obs = record.observables;
    assert!((obs.shat - 200.0).abs() < 1e-9);
    assert!((obs.mdr - 100.0).abs() < 1e-9);
    assert!(obs.costheta_ss.is_finite());
    assert_eq!(obs.ptt_t, 0.0);
    assert_eq!(obs.rpt, 0.0);
    assert!((obs.dphi_v_ss - std::f64::consts::PI).abs() < 1e-9);
    assert!(obs.gam_inv_rp1.abs() < 1e-6);
    assert!((record.razor.shat - 200.0).abs() < 1e-9);
}

#[test]
fn vanishing_lepton_keeps_everything_finite() {
    let topology = build_topology().unwrap();
    let config = SolverConfig::default();
    for soft in [
        FourVector::zero(),
        FourVector::from_pt_eta_phi_m(1e-9, 0.4, 1.0, 0.0),
        FourVector::from_pt_eta_phi_m(1e-3, -2.0, -0.3, 0.0),
    ] {
        let input = EventInput::new(
            vec![FourVector::from_pt_eta_phi_m(60.0, 0.7, 0.2, 0.0), soft],
            [25.0, -40.0],
        );
        let record = evaluate_event(&topology, &input, &config).unwrap();
        for (name, value) in record.to_map() {
            assert!(value.is_finite(), "{name} = {value}");
        }
    }
}

#[test]
fn razor_does_not_depend_on_the_tree_solution() {
    let topology = build_topology().unwrap();
    let l1 = FourVector::from_pt_eta_phi_m(70.0, 1.1, 0.5, 0.105);
    let l2 = FourVector::from_pt_eta_phi_m(33.0, -0.4, 2.9, 0.105);
    let met = [-45.0, 12.0];
    let input = EventInput::new(vec![l1, l2], met);

    let tight = SolverConfig {
        degenerate_tolerance: 0.5,
        ..SolverConfig::default()
    };
    let a = evaluate_event(&topology, &input, &SolverConfig::default()).unwrap();
    let b = evaluate_event(&topology, &input, &tight).unwrap();
    let direct = SuperRazor::compute(&l1, &l2, met);
    assert_eq!(a.razor, direct);
    assert_eq!(b.razor, direct);
}

#[test]
fn record_serializes_to_json() {
    let topology = build_topology().unwrap();
    let record = evaluate_event(&topology, &back_to_back(), &SolverConfig::default()).unwrap();
    let json = serde_json::to_string(&record.to_map()).unwrap();
    assert!(json.contains("\"MDR\""));
    assert!(json.contains("\"SHAT_KIN\""));
}
