use rjr_core::{EventInput, FourVector};
use rjr_tree::{build_topology, SolverConfig};

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

#[test]
fn back_to_back_leptons_split_symmetrically() {
    let topology = build_topology().unwrap();
    let f = topology.frames;
    let input = EventInput::new(
        vec![
            FourVector::new(50.0, 0.0, 0.0, 50.0),
            FourVector::new(-50.0, 0.0, 0.0, 50.0),
        ],
        [0.0, 0.0],
    );
    let solved = topology.analysis.solve(&input, &SolverConfig::default()).unwrap();
    assert_eq!(solved.assignment(), &[f.v1, f.v2]);

    let i1 = solved.lab_four_vector(f.i1);
    let i2 = solved.lab_four_vector(f.i2);
    assert!(close(i1.e, i2.e, 1e-12));
    assert!((i1.vect() + i2.vect()).mag() < 1e-9);
    assert!((i1 + i2).pt() < 1e-9);

    assert!(close(solved.mass(f.ss), 200.0, 1e-12));
    assert!(close(2.0 * solved.energy_in(f.v1, f.s1), 100.0, 1e-12));
    assert!(solved.boost_from_parent(f.ss).mag() < 1e-12);
}

#[test]
fn no_visible_energy_shares_invisible_equally() {
    let v = FourVector::zero();
    let invisible = FourVector::new(10.0, -4.0, 0.0, 20.0);
    let (i1, i2) = rjr_tree::contraboost::contraboost_split(&v, &v, &invisible, &SolverConfig::default());
    assert_eq!(i1, invisible * 0.5);
    assert_eq!(i1 + i2, invisible);
}

#[test]
fn composed_boosts_put_each_frame_at_rest() {
    let topology = build_topology().unwrap();
    let f = topology.frames;
    let input = EventInput::new(
        vec![
            FourVector::from_pt_eta_phi_m(120.0, 1.2, 0.4, 0.105),
            FourVector::from_pt_eta_phi_m(35.0, -0.7, -2.2, 0.000511),
        ],
        [60.0, 25.0],
    );
    let solved = topology.analysis.solve(&input, &SolverConfig::default()).unwrap();
    let scale = solved.lab_four_vector(f.lab).e;

    for frame in [f.ss, f.s1, f.s2] {
        let at_rest = solved.four_vector_in(frame, frame);
        assert!(at_rest.p() <= 1e-9 * scale, "frame not at rest: {at_rest:?}");
        assert!(close(at_rest.e, solved.mass(frame), 1e-9));
    }

    let s1 = solved.four_vector_in(f.s1, f.ss);
    let s2 = solved.four_vector_in(f.s2, f.ss);
    assert!((s1.vect() + s2.vect()).mag() <= 1e-9 * scale);
    assert!(close(s1.mass(), s2.mass(), 1e-9));

    let children = solved.four_vector_in(f.v1, f.s1) + solved.four_vector_in(f.i1, f.s1);
    assert!(children.p() <= 1e-9 * scale);

    let v1_lab = solved.lab_four_vector(f.v1);
    let v1_s1 = solved.four_vector_in(f.v1, f.s1);
    assert!((v1_s1.m2() - v1_lab.m2()).abs() <= 1e-9 * scale * scale);
    assert_eq!(solved.four_vector_in(f.v1, f.lab), v1_lab);
    assert_eq!(solved.visible_in(f.ss, f.lab), v1_lab + solved.lab_four_vector(f.v2));
}

#[test]
fn decay_angles_exist_only_for_frames_with_children() {
    let topology = build_topology().unwrap();
    let f = topology.frames;
    let input = EventInput::new(
        vec![
            FourVector::from_pt_eta_phi_m(80.0, 0.3, 1.1, 0.105),
            FourVector::from_pt_eta_phi_m(45.0, -1.4, -0.6, 0.0),
        ],
        [-30.0, 55.0],
    );
    let solved = topology.analysis.solve(&input, &SolverConfig::default()).unwrap();

    for leaf in [f.v1, f.v2, f.i1, f.i2] {
        assert_eq!(solved.cos_decay_angle(leaf), None);
    }

    let ss_axis = solved.lab_four_vector(f.ss).boost_vector();
    let expected = solved.momentum_in(f.s1, f.ss).cos_angle(&ss_axis);
    let found = solved.cos_decay_angle(f.ss).unwrap();
    assert!(close(found, expected, 1e-12));
    assert!(ss_axis.mag() > 0.0);

    let s1 = solved.cos_decay_angle(f.s1).unwrap();
    assert!((-1.0..=1.0).contains(&s1));
}
