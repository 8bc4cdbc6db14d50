use super::*;
use crate::runtime::memory::{MemoryFile, MemoryViewModel, PropertyListing};

fn vm(name: &str, props: &[(&str, &str)]) -> MemoryViewModel {
    MemoryViewModel {
        name: name.to_string(),
        properties: props
            .iter()
            .map(|(n, t)| PropertyDecl::new(*n, *t))
            .collect(),
        ..MemoryViewModel::default()
    }
}

fn limits(max_probes: usize, max_consecutive_misses: usize) -> ProbeLimits {
    ProbeLimits {
        max_probes,
        max_consecutive_misses,
    }
}

#[test]
fn runtime_failing_from_index_zero_yields_empty_catalog() {
    let file = MemoryFile::default();
    let catalog = build_catalog(&file, ProbeLimits::default());
    assert!(catalog.is_empty());
    assert_eq!(catalog.stats().probes, 3);
    assert_eq!(catalog.stats().misses, 3);
    assert_eq!(catalog.stats().stopped_by, ProbeStop::ConsecutiveMisses);
}

#[test]
fn discovers_blueprints_in_probe_order_with_fingerprints() {
    let file = MemoryFile {
        view_models: vec![
            vm("A", &[("Label", "string"), ("Active", "boolean")]),
            vm("B", &[("Size", "number")]),
        ],
        ..MemoryFile::default()
    };
    let catalog = build_catalog(&file, ProbeLimits::default());

    let names: Vec<_> = catalog.blueprints().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
    assert_eq!(catalog.blueprints()[0].fingerprint, "Active:boolean|Label:string");
    assert_eq!(catalog.blueprints()[1].index, 1);
    // Two hits, then three misses.
    assert_eq!(catalog.stats().probes, 5);
}

#[test]
fn short_gaps_do_not_stop_discovery() {
    let file = MemoryFile {
        view_models: vec![
            vm("A", &[]),
            vm("B", &[]),
            vm("C", &[]),
            vm("D", &[]),
        ],
        faulty_view_model_indices: [1, 2].into_iter().collect(),
        ..MemoryFile::default()
    };
    let catalog = build_catalog(&file, ProbeLimits::default());
    let names: Vec<_> = catalog.blueprints().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["A", "D"]);
    assert_eq!(catalog.blueprints()[1].index, 3);
}

#[test]
fn ceiling_bounds_runaway_probing() {
    let file = MemoryFile {
        view_models: (0..10).map(|i| vm(&format!("VM{i}"), &[])).collect(),
        ..MemoryFile::default()
    };
    let catalog = build_catalog(&file, limits(4, 3));
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.stats().probes, 4);
    assert_eq!(catalog.stats().stopped_by, ProbeStop::Ceiling);
}

#[test]
fn reported_count_is_used_when_available() {
    let file = MemoryFile {
        view_models: vec![vm("A", &[]), vm("B", &[]), vm("C", &[])],
        expose_view_model_count: true,
        faulty_view_model_indices: [0, 1].into_iter().collect(),
        ..MemoryFile::default()
    };
    // A miss threshold of one would stop blind probing at index 0.
    let catalog = build_catalog(&file, limits(200, 1));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.blueprints()[0].name, "C");
    assert_eq!(catalog.stats().probes, 3);
    assert_eq!(catalog.stats().stopped_by, ProbeStop::CountExhausted);
}

#[test]
fn indexed_property_listing_is_read_as_fallback() {
    let mut indexed = vm("A", &[("Label", "string"), ("Active", "boolean")]);
    indexed.listing = PropertyListing::Indexed;
    indexed.instance_names = Some(vec!["Default".to_string(), "Alt".to_string()]);
    indexed.instance_count = Some(2);
    let file = MemoryFile {
        view_models: vec![indexed],
        ..MemoryFile::default()
    };

    let catalog = build_catalog(&file, ProbeLimits::default());
    let bp = &catalog.blueprints()[0];
    assert_eq!(bp.properties.len(), 2);
    assert_eq!(bp.properties[0].name, "Label");
    assert_eq!(bp.fingerprint, "Active:boolean|Label:string");
    assert_eq!(bp.instance_count, Some(2));
    assert_eq!(bp.instance_names.as_ref().map(Vec::len), Some(2));
}

#[test]
fn lookups_return_the_first_match() {
    let catalog = Catalog::from_blueprints(vec![
        Blueprint::new(0, "Point", vec![PropertyDecl::new("x", "number")]),
        Blueprint::new(1, "Scalar", vec![PropertyDecl::new("x", "number")]),
        Blueprint::new(2, "Point", vec![PropertyDecl::new("y", "number")]),
    ]);

    assert_eq!(catalog.find_by_name("Point").unwrap().index, 0);
    assert_eq!(catalog.find_by_fingerprint("x:number").unwrap().name, "Point");
    assert_eq!(catalog.find_by_fingerprint("y:number").unwrap().index, 2);
    assert!(catalog.find_by_name("Missing").is_none());
}

#[test]
fn faulting_property_array_is_read_through_indices() {
    let mut faulting = vm("A", &[("Label", "string"), ("Active", "boolean")]);
    faulting.listing = PropertyListing::FaultingArray;
    let file = MemoryFile {
        view_models: vec![faulting],
        ..MemoryFile::default()
    };

    let catalog = build_catalog(&file, ProbeLimits::default());
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.blueprints()[0].fingerprint, "Active:boolean|Label:string");
}
