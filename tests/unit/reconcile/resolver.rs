use super::*;
use crate::runtime::{
    PropertyDecl,
    memory::{MemoryInstance, PropertyListing},
};

fn catalog() -> Catalog {
    Catalog::from_blueprints(vec![
        Blueprint::new(
            0,
            "A",
            vec![
                PropertyDecl::new("Label", "string"),
                PropertyDecl::new("Active", "boolean"),
            ],
        ),
        Blueprint::new(1, "Vec2", vec![
            PropertyDecl::new("x", "number"),
            PropertyDecl::new("y", "number"),
        ]),
        Blueprint::new(2, "Size", vec![
            PropertyDecl::new("y", "number"),
            PropertyDecl::new("x", "number"),
        ]),
        Blueprint::new(3, "Empty", vec![]),
    ])
}

fn instance(name: Option<&str>, props: &[(&str, &str)]) -> MemoryInstance {
    MemoryInstance {
        name: name.map(str::to_string),
        properties: props.iter().map(|(n, t)| PropertyDecl::new(*n, *t)).collect(),
        ..MemoryInstance::default()
    }
}

#[test]
fn name_match_wins_over_partial_visibility() {
    let catalog = catalog();
    // Only one of A's properties is visible; the name still resolves it.
    let inst = instance(Some("A"), &[("Label", "string")]);
    let res = resolve(&inst, &catalog);
    assert_eq!(res.strategy(), MatchStrategy::Name);
    assert_eq!(res.blueprint().unwrap().index, 0);
}

#[test]
fn falls_back_to_fingerprint_when_name_is_unknown() {
    let catalog = catalog();
    let inst = instance(Some("A_copy"), &[("Active", "boolean"), ("Label", "string")]);
    let res = resolve(&inst, &catalog);
    assert_eq!(res.strategy(), MatchStrategy::Fingerprint);
    assert_eq!(res.blueprint().unwrap().name, "A");
}

#[test]
fn indexed_listing_is_used_for_fingerprinting() {
    let catalog = catalog();
    let mut inst = instance(None, &[("Label", "string"), ("Active", "boolean")]);
    inst.listing = PropertyListing::Indexed;
    assert_eq!(resolve(&inst, &catalog).strategy(), MatchStrategy::Fingerprint);
}

#[test]
fn shared_fingerprint_binds_to_first_catalog_entry() {
    let catalog = catalog();
    let inst = instance(None, &[("x", "number"), ("y", "number")]);
    let res = resolve(&inst, &catalog);
    assert_eq!(res, Resolution::ByFingerprint(&catalog.blueprints()[1]));
    assert_eq!(res.blueprint().unwrap().name, "Vec2");
}

#[test]
fn unmatched_instance_is_unresolved() {
    let catalog = catalog();
    let inst = instance(Some("Ghost"), &[("z", "number")]);
    assert_eq!(
        resolve(&inst, &catalog),
        Resolution::Unresolved {
            runtime_name: Some("Ghost".to_string()),
            fingerprint: "z:number".to_string(),
        }
    );
}

#[test]
fn opaque_instance_does_not_match_empty_blueprint() {
    let catalog = catalog();
    let mut inst = instance(None, &[("x", "number")]);
    inst.listing = PropertyListing::Hidden;
    let res = resolve(&inst, &catalog);
    assert!(res.blueprint().is_none());
    assert_eq!(res.strategy(), MatchStrategy::Unresolved);
}

#[test]
fn faulting_array_listing_still_fingerprints() {
    let catalog = catalog();
    let mut inst = instance(None, &[("Active", "boolean"), ("Label", "string")]);
    inst.listing = PropertyListing::FaultingArray;
    let res = resolve(&inst, &catalog);
    assert_eq!(res.strategy(), MatchStrategy::Fingerprint);
    assert_eq!(res.blueprint().unwrap().name, "A");
}
