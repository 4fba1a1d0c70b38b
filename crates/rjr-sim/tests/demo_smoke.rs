use std::process::Command;

use serde_json::Value;

#[test]
fn demo_emits_provenance_and_events() {
    let output = Command::new(env!("CARGO_BIN_EXE_rjr-sim"))
        .args(["demo", "--events", "3", "--seed", "7"])
        .output()
        .expect("run rjr-sim demo");
    assert!(output.status.success());
    let body = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<Value> = body
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 4);
    let provenance = &lines[0]["provenance"];
    assert_eq!(provenance["seed"].as_u64(), Some(7));
    assert_eq!(provenance["topology_hash"].as_str().map(str::len), Some(64));
    for line in &lines[1..] {
        assert!(line["observables"]["MDR"].as_f64().is_some());
        assert!(line["observables"]["SHAT_KIN"].as_f64().is_some());
    }
}

#[test]
fn event_command_reports_scenario_values() {
    let output = Command::new(env!("CARGO_BIN_EXE_rjr-sim"))
        .args([
            "event",
            "--lepton",
            "50,0,0,50",
            "--lepton",
            "-50,0,0,50",
            "--met",
            "0,0",
        ])
        .output()
        .expect("run rjr-sim event");
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).expect("json");
    let shat = value["shat"].as_f64().expect("shat");
    assert!((shat - 200.0).abs() < 1e-9);
}

#[test]
fn single_lepton_event_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_rjr-sim"))
        .args(["event", "--lepton", "50,0,0,50"])
        .output()
        .expect("run rjr-sim event");
    assert!(!output.status.success());
}
