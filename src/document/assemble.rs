use std::collections::BTreeMap;

use crate::{
    catalog::builder::{Catalog, ProbeStats, build_catalog},
    document::scan::{ArtboardScan, scan_artboard},
    foundation::{
        error::{InspectError, InspectResult},
        options::InspectOptions,
    },
    reconcile::engine::{ViewModelInstanceNode, reconcile_root},
    runtime::{ArtboardSource, PropertyDecl, RiveFile},
};

/// Top-level keys every exported document carries, and nothing else.
pub const EXPORT_KEYS: [&str; 3] = ["artboards", "viewModelBlueprints", "summary"];

/// One artboard: its structural scan plus its reconciled bound instance.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardReport {
    #[serde(flatten)]
    pub scan: ArtboardScan,
    pub view_models: Vec<ViewModelInstanceNode>,
}

/// A catalog blueprint annotated with the instances reconciled against it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintReport {
    pub name: String,
    pub fingerprint: String,
    pub properties: Vec<PropertyDecl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<usize>,
    /// `artboard/root/property/...` paths of matched instances.
    pub reconciled_instances: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub artboard_count: usize,
    pub blueprint_count: usize,
    pub instance_count: usize,
    pub unresolved_count: usize,
}

/// Probing artifacts. Kept on the document, dropped from its exported form.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub probe: ProbeStats,
    pub skipped_artboards: Vec<usize>,
}

/// Everything known about one loaded file.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub artboards: Vec<ArtboardReport>,
    pub view_model_blueprints: Vec<BlueprintReport>,
    pub summary: DocumentSummary,
    pub diagnostics: Diagnostics,
}

impl ExportDocument {
    /// The exported shape: only [`EXPORT_KEYS`] at the top level.
    pub fn to_json(&self) -> InspectResult<serde_json::Value> {
        let value = serde_json::to_value(self).map_err(|e| InspectError::serde(e.to_string()))?;
        Ok(filter_export_keys(value))
    }

    pub fn to_json_pretty(&self) -> InspectResult<String> {
        serde_json::to_string_pretty(&self.to_json()?)
            .map_err(|e| InspectError::serde(e.to_string()))
    }
}

/// Drop every top-level key not in [`EXPORT_KEYS`]. Non-objects pass through.
pub fn filter_export_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .filter(|(k, _)| EXPORT_KEYS.contains(&k.as_str()))
                .collect(),
        ),
        other => other,
    }
}

/// Build the export document for an already-loaded file.
///
/// The only failure is an unusable file handle (or invalid options); everything the
/// runtime cannot supply below that is recorded in the document instead.
#[tracing::instrument(skip(file))]
pub fn produce_document(
    file: &dyn RiveFile,
    opts: &InspectOptions,
) -> InspectResult<ExportDocument> {
    opts.validate()?;
    let artboard_count = file
        .artboard_count()
        .map_err(|fault| InspectError::load("file handle is unusable", fault.to_string()))?;

    let catalog = build_catalog(file, opts.probe);

    let mut artboards = Vec::with_capacity(artboard_count);
    let mut skipped_artboards = Vec::new();
    for index in 0..artboard_count {
        match file.artboard_at(index) {
            Ok(Some(artboard)) => {
                artboards.push(assemble_artboard(artboard.as_ref(), &catalog, opts));
            }
            Ok(None) => {
                tracing::warn!(index, "artboard missing");
                skipped_artboards.push(index);
            }
            Err(fault) => {
                tracing::warn!(index, %fault, "artboard unreadable");
                skipped_artboards.push(index);
            }
        }
    }

    let view_model_blueprints = annotate_blueprints(&catalog, &artboards);
    let summary = summarize(&artboards, &catalog);
    tracing::info!(
        artboards = summary.artboard_count,
        blueprints = summary.blueprint_count,
        instances = summary.instance_count,
        unresolved = summary.unresolved_count,
        "document assembled"
    );

    Ok(ExportDocument {
        artboards,
        view_model_blueprints,
        summary,
        diagnostics: Diagnostics {
            probe: catalog.stats(),
            skipped_artboards,
        },
    })
}

fn assemble_artboard(
    artboard: &dyn ArtboardSource,
    catalog: &Catalog,
    opts: &InspectOptions,
) -> ArtboardReport {
    let scan = scan_artboard(artboard);

    let declared = artboard.default_view_model().unwrap_or_else(|fault| {
        tracing::debug!(artboard = %scan.name, %fault, "default view model unreadable");
        None
    });

    let view_models = match artboard.default_instance() {
        Ok(Some(instance)) => vec![reconcile_root(
            instance.as_ref(),
            declared.as_deref(),
            catalog,
            opts,
        )],
        Ok(None) => Vec::new(),
        Err(fault) => {
            tracing::debug!(artboard = %scan.name, %fault, "bound instance unreadable");
            Vec::new()
        }
    };

    ArtboardReport { scan, view_models }
}

fn annotate_blueprints(catalog: &Catalog, artboards: &[ArtboardReport]) -> Vec<BlueprintReport> {
    let mut paths: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for artboard in artboards {
        for root in &artboard.view_models {
            collect_paths(root, &artboard.scan.name, &mut paths);
        }
    }

    catalog
        .blueprints()
        .iter()
        .map(|bp| BlueprintReport {
            name: bp.name.clone(),
            fingerprint: bp.fingerprint.clone(),
            properties: bp.properties.clone(),
            instance_names: bp.instance_names.clone(),
            instance_count: bp.instance_count,
            reconciled_instances: paths.remove(&bp.index).unwrap_or_default(),
        })
        .collect()
}

fn collect_paths(
    node: &ViewModelInstanceNode,
    prefix: &str,
    out: &mut BTreeMap<usize, Vec<String>>,
) {
    let path = format!("{prefix}/{}", node.instance_name);
    if let Some(index) = node.blueprint_index {
        out.entry(index).or_default().push(path.clone());
    }
    for child in &node.nested_view_models {
        collect_paths(child, &path, out);
    }
}

fn summarize(artboards: &[ArtboardReport], catalog: &Catalog) -> DocumentSummary {
    let mut summary = DocumentSummary {
        artboard_count: artboards.len(),
        blueprint_count: catalog.len(),
        ..DocumentSummary::default()
    };
    for root in artboards.iter().flat_map(|a| &a.view_models) {
        root.walk(&mut |node| {
            summary.instance_count += 1;
            if node.is_unresolved() {
                summary.unresolved_count += 1;
            }
        });
    }
    summary
}

#[cfg(test)]
#[path = "../../tests/unit/document/assemble.rs"]
mod tests;
