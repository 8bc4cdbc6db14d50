use crate::{
    catalog::builder::{Blueprint, Catalog},
    foundation::options::InspectOptions,
    reconcile::{
        extract::{PropertyValue, extract},
        resolver::{MatchStrategy, Resolution, resolve},
    },
    runtime::{LiveInstance, PropertyType},
};

/// Prefix of `sourceBlueprintName` for instances no blueprint could be matched to.
pub const UNRESOLVED_MARKER: &str = "Unresolved";

/// Output name used for a root instance the runtime does not name.
pub const DEFAULT_INSTANCE_NAME: &str = "default";

/// Reconciled view of one live instance.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModelInstanceNode {
    pub instance_name: String,
    /// Matched blueprint name, or an [`UNRESOLVED_MARKER`] string.
    pub source_blueprint_name: String,
    /// Leaf properties in declaration order.
    pub inputs: Vec<PropertyValue>,
    /// Resolved nested instances in declaration order.
    pub nested_view_models: Vec<ViewModelInstanceNode>,
    /// Set when the depth guard or the node budget stopped expansion at this node.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    /// Probe index of the matched blueprint.
    #[serde(skip)]
    pub blueprint_index: Option<usize>,
    #[serde(skip)]
    pub matched_by: MatchStrategy,
}

impl ViewModelInstanceNode {
    pub fn is_unresolved(&self) -> bool {
        self.matched_by == MatchStrategy::Unresolved
    }

    /// Visit this node and every descendant, depth first, in output order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a ViewModelInstanceNode)) {
        f(self);
        for child in &self.nested_view_models {
            child.walk(f);
        }
    }

    fn unresolved(property: &str, runtime_name: Option<&str>) -> Self {
        Self {
            instance_name: property.to_string(),
            source_blueprint_name: format!(
                "{UNRESOLVED_MARKER} (property: {property}, instance: {})",
                runtime_name.unwrap_or("<unnamed>")
            ),
            inputs: Vec::new(),
            nested_view_models: Vec::new(),
            truncated: false,
            blueprint_index: None,
            matched_by: MatchStrategy::Unresolved,
        }
    }
}

struct Walk<'c> {
    catalog: &'c Catalog,
    max_depth: usize,
    max_nodes: usize,
    /// Instances expanded so far under the current root.
    expanded: usize,
    /// Budget exhaustion is logged once per root.
    budget_spent: bool,
}

/// Reconcile `instance` against a known blueprint.
///
/// Pure projection: reads only, never fails. Nested `viewModel` properties are
/// resolved through [`resolve`] and expanded only when a blueprint matched. At most
/// `opts.max_depth` levels below `instance` and `opts.max_nodes` instances in total
/// are expanded; anything past either limit becomes a truncated leaf.
pub fn reconcile(
    instance: &dyn LiveInstance,
    instance_name: &str,
    schema: &Blueprint,
    catalog: &Catalog,
    opts: &InspectOptions,
) -> ViewModelInstanceNode {
    let mut walk = Walk::new(catalog, opts);
    walk.node(instance, instance_name, schema, MatchStrategy::Declared, 0)
}

/// Reconcile an artboard's bound instance, whose blueprint may only be known by name.
///
/// `declared` is the artboard's default view-model name; when it is absent from the
/// catalog the instance goes through the regular resolver.
#[tracing::instrument(skip(instance, catalog, opts))]
pub fn reconcile_root(
    instance: &dyn LiveInstance,
    declared: Option<&str>,
    catalog: &Catalog,
    opts: &InspectOptions,
) -> ViewModelInstanceNode {
    let runtime_name = instance.name().ok().flatten();
    let output_name = runtime_name.as_deref().unwrap_or(DEFAULT_INSTANCE_NAME);
    let mut walk = Walk::new(catalog, opts);

    if let Some(bp) = declared.and_then(|name| catalog.find_by_name(name)) {
        return walk.node(instance, output_name, bp, MatchStrategy::Declared, 0);
    }

    let resolution = resolve(instance, catalog);
    let strategy = resolution.strategy();
    match resolution.blueprint() {
        Some(bp) => walk.node(instance, output_name, bp, strategy, 0),
        None => {
            tracing::debug!(?runtime_name, "root instance has no matching blueprint");
            let mut node = ViewModelInstanceNode::unresolved("<root>", runtime_name.as_deref());
            node.instance_name = output_name.to_string();
            node
        }
    }
}

impl<'c> Walk<'c> {
    fn new(catalog: &'c Catalog, opts: &InspectOptions) -> Self {
        Self {
            catalog,
            max_depth: opts.max_depth,
            max_nodes: opts.max_nodes,
            expanded: 0,
            budget_spent: false,
        }
    }

    fn node(
        &mut self,
        instance: &dyn LiveInstance,
        instance_name: &str,
        bp: &Blueprint,
        matched_by: MatchStrategy,
        depth: usize,
    ) -> ViewModelInstanceNode {
        self.expanded += 1;
        let mut inputs = Vec::new();
        let mut nested_view_models = Vec::new();

        for decl in &bp.properties {
            if decl.kind != PropertyType::ViewModel {
                inputs.push(extract(instance, decl));
                continue;
            }

            let child = match instance.nested_instance(&decl.name) {
                Ok(Some(child)) => child,
                Ok(None) => {
                    tracing::debug!(property = %decl.name, "nested binding is empty");
                    continue;
                }
                Err(fault) => {
                    tracing::debug!(property = %decl.name, %fault, "nested binding unreadable");
                    continue;
                }
            };
            nested_view_models.push(self.nested(child.as_ref(), &decl.name, depth + 1));
        }

        ViewModelInstanceNode {
            instance_name: instance_name.to_string(),
            source_blueprint_name: bp.name.clone(),
            inputs,
            nested_view_models,
            truncated: false,
            blueprint_index: Some(bp.index),
            matched_by,
        }
    }

    fn nested(
        &mut self,
        child: &dyn LiveInstance,
        property: &str,
        depth: usize,
    ) -> ViewModelInstanceNode {
        let resolution = resolve(child, self.catalog);
        let strategy = resolution.strategy();

        let bp = match resolution {
            Resolution::ByName(bp) | Resolution::ByFingerprint(bp) => bp,
            Resolution::Unresolved {
                runtime_name,
                fingerprint,
            } => {
                tracing::debug!(
                    property,
                    ?runtime_name,
                    %fingerprint,
                    "nested instance unresolved"
                );
                return ViewModelInstanceNode::unresolved(property, runtime_name.as_deref());
            }
        };

        if depth > self.max_depth {
            tracing::warn!(
                property,
                blueprint = %bp.name,
                max_depth = self.max_depth,
                "depth limit reached; nested instance not expanded"
            );
            return truncated(property, bp, strategy);
        }

        if self.expanded >= self.max_nodes {
            if !self.budget_spent {
                tracing::warn!(
                    property,
                    blueprint = %bp.name,
                    max_nodes = self.max_nodes,
                    "node budget exhausted; remaining nested instances not expanded"
                );
                self.budget_spent = true;
            }
            return truncated(property, bp, strategy);
        }

        self.node(child, property, bp, strategy, depth)
    }
}

fn truncated(property: &str, bp: &Blueprint, matched_by: MatchStrategy) -> ViewModelInstanceNode {
    ViewModelInstanceNode {
        instance_name: property.to_string(),
        source_blueprint_name: bp.name.clone(),
        inputs: Vec::new(),
        nested_view_models: Vec::new(),
        truncated: true,
        blueprint_index: Some(bp.index),
        matched_by,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reconcile/engine.rs"]
mod tests;
