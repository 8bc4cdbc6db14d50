use super::*;
use crate::runtime::memory::MemoryFile;
use serde_json::json;

fn file() -> MemoryFile {
    MemoryFile::from_json_str(
        &json!({
            "viewModels": [
                { "name": "Player", "properties": [
                    { "name": "Name", "type": "string" },
                    { "name": "Stats", "type": "viewModel" },
                    { "name": "Pet", "type": "viewModel" }
                ], "instanceNames": ["Default"] },
                { "name": "Stats", "properties": [
                    { "name": "Health", "type": "number" }
                ] },
                { "name": "Unused", "properties": [
                    { "name": "Flag", "type": "boolean" }
                ] }
            ],
            "artboards": [
                {
                    "name": "Main",
                    "animations": [{ "name": "idle", "fps": 60, "duration": 120, "loop": "loop" }],
                    "defaultViewModel": "Player",
                    "instance": {
                        "name": "Default",
                        "values": { "Name": { "kind": "string", "value": "Ada" } },
                        "nested": {
                            "Stats": {
                                "properties": [{ "name": "Health", "type": "number" }],
                                "values": { "Health": { "kind": "number", "value": 90 } }
                            },
                            "Pet": { "name": "Cat", "listing": "hidden" }
                        }
                    }
                },
                { "name": "Empty" }
            ]
        })
        .to_string(),
    )
    .unwrap()
}

#[test]
fn exported_json_has_only_fixed_top_level_keys() {
    let doc = produce_document(&file(), &InspectOptions::default()).unwrap();
    let json = doc.to_json().unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["artboards", "summary", "viewModelBlueprints"]);

    // Diagnostics stay on the typed document.
    assert_eq!(doc.diagnostics.probe.probes, 6);
}

#[test]
fn filter_drops_unknown_keys_and_passes_non_objects() {
    let filtered = filter_export_keys(json!({ "artboards": [], "probeLog": [1, 2] }));
    assert_eq!(filtered, json!({ "artboards": [] }));
    assert_eq!(filter_export_keys(json!([1])), json!([1]));
}

#[test]
fn artboards_merge_scan_with_reconciled_root() {
    let doc = produce_document(&file(), &InspectOptions::default()).unwrap();
    let json = doc.to_json().unwrap();

    let main = &json["artboards"][0];
    assert_eq!(main["name"], "Main");
    assert_eq!(main["animations"][0]["fps"], 60);
    assert_eq!(main["stateMachines"], json!([]));
    assert_eq!(main["viewModels"][0]["instanceName"], "Default");
    assert_eq!(main["viewModels"][0]["sourceBlueprintName"], "Player");
    assert_eq!(
        main["viewModels"][0]["nestedViewModels"][0]["inputs"][0]["value"],
        90
    );

    let empty = &json["artboards"][1];
    assert_eq!(empty["viewModels"], json!([]));
}

#[test]
fn blueprints_are_annotated_with_reconciled_instances() {
    let doc = produce_document(&file(), &InspectOptions::default()).unwrap();
    let by_name = |name: &str| {
        doc.view_model_blueprints
            .iter()
            .find(|b| b.name == name)
            .unwrap()
            .clone()
    };

    assert_eq!(by_name("Player").reconciled_instances, ["Main/Default"]);
    assert_eq!(by_name("Stats").reconciled_instances, ["Main/Default/Stats"]);
    // Present in the catalog with no live instance.
    assert!(by_name("Unused").reconciled_instances.is_empty());
    assert_eq!(
        by_name("Player").instance_names,
        Some(vec!["Default".to_string()])
    );
}

#[test]
fn summary_counts_unresolved_nodes() {
    let doc = produce_document(&file(), &InspectOptions::default()).unwrap();
    assert_eq!(
        doc.summary,
        DocumentSummary {
            artboard_count: 2,
            blueprint_count: 3,
            instance_count: 3,
            unresolved_count: 1,
        }
    );
}

#[test]
fn unusable_file_is_fatal_with_details() {
    let mut broken = file();
    broken.unusable = Some("runtime not initialized".to_string());
    let err = produce_document(&broken, &InspectOptions::default()).unwrap_err();
    let report = err.report();
    assert_eq!(report.error, "file handle is unusable");
    assert_eq!(report.details, "runtime not initialized");
}

#[test]
fn invalid_options_are_rejected_before_probing() {
    let opts = InspectOptions {
        max_depth: 0,
        ..InspectOptions::default()
    };
    let err = produce_document(&file(), &opts).unwrap_err();
    assert!(matches!(err, InspectError::Validation(_)));
}

#[test]
fn document_without_blueprints_is_still_valid() {
    let file = MemoryFile::from_json_str(r#"{ "artboards": [{ "name": "Only" }] }"#).unwrap();
    let doc = produce_document(&file, &InspectOptions::default()).unwrap();
    assert!(doc.view_model_blueprints.is_empty());
    assert_eq!(doc.summary.artboard_count, 1);
    assert_eq!(doc.diagnostics.probe.probes, 3);
}
