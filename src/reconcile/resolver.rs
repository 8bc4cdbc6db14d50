use crate::{
    catalog::{
        builder::{Blueprint, Catalog},
        fingerprint::fingerprint,
    },
    runtime::{LiveInstance, read_property_list},
};

/// Which strategy tied a live instance to a blueprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStrategy {
    /// The artboard declared the blueprint by name.
    Declared,
    Name,
    Fingerprint,
    Unresolved,
}

/// Outcome of matching a live instance against the catalog.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution<'c> {
    ByName(&'c Blueprint),
    ByFingerprint(&'c Blueprint),
    Unresolved {
        /// Name the runtime reported for the instance, if any.
        runtime_name: Option<String>,
        /// Fingerprint of whatever properties were visible.
        fingerprint: String,
    },
}

impl<'c> Resolution<'c> {
    pub fn blueprint(&self) -> Option<&'c Blueprint> {
        match self {
            Self::ByName(bp) | Self::ByFingerprint(bp) => Some(bp),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        match self {
            Self::ByName(_) => MatchStrategy::Name,
            Self::ByFingerprint(_) => MatchStrategy::Fingerprint,
            Self::Unresolved { .. } => MatchStrategy::Unresolved,
        }
    }
}

/// Resolve an instance's blueprint: exact runtime name first, then structural fingerprint.
///
/// An instance whose properties cannot be introspected never matches by fingerprint,
/// even against a blueprint that declares no properties.
pub fn resolve<'c>(instance: &dyn LiveInstance, catalog: &'c Catalog) -> Resolution<'c> {
    let runtime_name = instance.name().ok().flatten();

    if let Some(bp) = runtime_name
        .as_deref()
        .and_then(|name| catalog.find_by_name(name))
    {
        return Resolution::ByName(bp);
    }

    let visible = read_property_list(instance);
    let fingerprint = fingerprint(&visible);
    if !visible.is_empty()
        && let Some(bp) = catalog.find_by_fingerprint(&fingerprint)
    {
        return Resolution::ByFingerprint(bp);
    }

    Resolution::Unresolved {
        runtime_name,
        fingerprint,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reconcile/resolver.rs"]
mod tests;
