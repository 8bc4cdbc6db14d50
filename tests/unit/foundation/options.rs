use super::*;

#[test]
fn defaults_match_documented_limits() {
    let opts = InspectOptions::default();
    assert_eq!(opts.probe.max_probes, 200);
    assert_eq!(opts.probe.max_consecutive_misses, 3);
    assert_eq!(opts.max_depth, 32);
    assert_eq!(opts.max_nodes, 10_000);
    opts.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let opts =
        InspectOptions::from_json_str(r#"{ "probe": { "maxProbes": 10 }, "maxNodes": 50 }"#)
            .unwrap();
    assert_eq!(opts.probe.max_probes, 10);
    assert_eq!(opts.probe.max_consecutive_misses, 3);
    assert_eq!(opts.max_depth, 32);
    assert_eq!(opts.max_nodes, 50);
}

#[test]
fn validate_rejects_zero_limits() {
    let mut opts = InspectOptions::default();
    opts.probe.max_probes = 0;
    assert!(matches!(opts.validate(), Err(InspectError::Validation(_))));

    let mut opts = InspectOptions::default();
    opts.probe.max_consecutive_misses = 0;
    assert!(opts.validate().is_err());

    let opts = InspectOptions {
        max_depth: 0,
        ..InspectOptions::default()
    };
    assert!(opts.validate().is_err());

    let opts = InspectOptions {
        max_nodes: 0,
        ..InspectOptions::default()
    };
    assert!(matches!(opts.validate(), Err(InspectError::Validation(_))));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = InspectOptions::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, InspectError::Serde(_)));
}
