use rjr_core::errors::{ErrorInfo, RjrError};
use rjr_core::{EventInput, FourVector};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("frame", "s1")
        .with_context("reason", "example")
}

#[test]
fn topology_error_surface() {
    let err = RjrError::Topology(sample_info("frame-has-parent", "frame already attached"));
    assert_eq!(err.info().code, "frame-has-parent");
    assert!(err.info().context.contains_key("frame"));
    assert!(err.is_fatal_setup());
}

#[test]
fn analysis_error_surface() {
    let err = RjrError::Analysis(sample_info("missing-jigsaw", "no contraboost jigsaw"));
    assert_eq!(err.info().code, "missing-jigsaw");
    assert!(err.is_fatal_setup());
}

#[test]
fn input_error_is_not_fatal_setup() {
    let err = RjrError::input("too-few-objects", "need two leptons");
    assert!(!err.is_fatal_setup());
    assert_eq!(err.info().message, "need two leptons");
}

#[test]
fn display_includes_context_and_hint() {
    let err = RjrError::Topology(
        ErrorInfo::new("cycle", "link would create a cycle")
            .with_context("child", "ss")
            .with_hint("attach frames top-down"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("topology error: link would create a cycle (code: cycle)"));
    assert!(rendered.contains("child=ss"));
    assert!(rendered.contains("hint: attach frames top-down"));
}

#[test]
fn error_serializes_with_family_tag() {
    let err = RjrError::Analysis(ErrorInfo::new("ungrouped-frame", "frame not in a group"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "Analysis");
    assert_eq!(json["detail"]["code"], "ungrouped-frame");
    let back: RjrError = serde_json::from_value(json).unwrap();
    assert_eq!(back, err);
}

#[test]
fn event_input_rejects_non_finite_values() {
    let good = EventInput::new(vec![FourVector::new(1.0, 0.0, 0.0, 1.0)], [3.0, 4.0]);
    assert!(good.validate().is_ok());
    assert_eq!(good.met_four_vector().e, 5.0);

    let bad_met = EventInput::new(vec![], [f64::NAN, 0.0]);
    let err = bad_met.validate().unwrap_err();
    assert_eq!(err.info().code, "non-finite-met");

    let bad_vis = EventInput::new(
        vec![
            FourVector::new(1.0, 0.0, 0.0, 1.0),
            FourVector::new(0.0, f64::INFINITY, 0.0, 1.0),
        ],
        [0.0, 0.0],
    );
    let err = bad_vis.validate().unwrap_err();
    assert_eq!(err.info().context.get("index").map(String::as_str), Some("1"));
}
