use std::collections::BTreeMap;

use crate::{
    catalog::fingerprint::fingerprint,
    foundation::options::ProbeLimits,
    runtime::{PropertyDecl, RiveFile, ViewModelSource, read_property_list},
};

/// One discovered data-binding schema.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    /// Probe index the runtime returned this blueprint at.
    pub index: usize,
    /// Declared name. Not unique across a file.
    pub name: String,
    /// Property declarations in declaration order.
    pub properties: Vec<PropertyDecl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<usize>,
    /// Cached [`fingerprint`] of `properties`.
    pub fingerprint: String,
}

impl Blueprint {
    pub fn new(index: usize, name: impl Into<String>, properties: Vec<PropertyDecl>) -> Self {
        let fingerprint = fingerprint(&properties);
        Self {
            index,
            name: name.into(),
            properties,
            instance_names: None,
            instance_count: None,
            fingerprint,
        }
    }
}

/// Why discovery stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeStop {
    /// The configured run of consecutive misses was hit.
    #[default]
    ConsecutiveMisses,
    /// The hard probe ceiling was hit.
    Ceiling,
    /// The runtime-reported count was exhausted.
    CountExhausted,
}

/// Counters from one discovery pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeStats {
    pub probes: usize,
    pub misses: usize,
    pub stopped_by: ProbeStop,
}

/// Immutable set of blueprints discovered for one file load.
///
/// Lookups by name and by fingerprint both return the lowest-index match, so two
/// blueprints with the same property shape always resolve to the first one.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    blueprints: Vec<Blueprint>,
    by_name: BTreeMap<String, usize>,
    by_fingerprint: BTreeMap<String, usize>,
    stats: ProbeStats,
}

impl Catalog {
    pub fn from_blueprints(blueprints: Vec<Blueprint>) -> Self {
        Self::with_stats(blueprints, ProbeStats::default())
    }

    fn with_stats(blueprints: Vec<Blueprint>, stats: ProbeStats) -> Self {
        let mut by_name = BTreeMap::new();
        let mut by_fingerprint = BTreeMap::new();
        for (pos, bp) in blueprints.iter().enumerate() {
            by_name.entry(bp.name.clone()).or_insert(pos);
            by_fingerprint.entry(bp.fingerprint.clone()).or_insert(pos);
        }
        Self {
            blueprints,
            by_name,
            by_fingerprint,
            stats,
        }
    }

    pub fn blueprints(&self) -> &[Blueprint] {
        &self.blueprints
    }

    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    pub fn stats(&self) -> ProbeStats {
        self.stats
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Blueprint> {
        self.by_name.get(name).map(|&pos| &self.blueprints[pos])
    }

    pub fn find_by_fingerprint(&self, fingerprint: &str) -> Option<&Blueprint> {
        self.by_fingerprint
            .get(fingerprint)
            .map(|&pos| &self.blueprints[pos])
    }
}

/// Discover every blueprint in `file`.
///
/// Without a runtime-reported count, indices are probed upward until
/// `limits.max_consecutive_misses` probes in a row fault or come back empty, or
/// `limits.max_probes` indices have been tried. Both are normal terminations.
#[tracing::instrument(skip(file))]
pub fn build_catalog(file: &dyn RiveFile, limits: ProbeLimits) -> Catalog {
    let mut blueprints = Vec::new();
    let mut stats = ProbeStats::default();

    if let Some(count) = file.view_model_count() {
        let end = count.min(limits.max_probes);
        for index in 0..end {
            stats.probes += 1;
            match probe(file, index) {
                Some(bp) => blueprints.push(bp),
                None => stats.misses += 1,
            }
        }
        stats.stopped_by = if end < count {
            ProbeStop::Ceiling
        } else {
            ProbeStop::CountExhausted
        };
    } else {
        let mut consecutive = 0usize;
        stats.stopped_by = ProbeStop::Ceiling;
        for index in 0..limits.max_probes {
            stats.probes += 1;
            match probe(file, index) {
                Some(bp) => {
                    consecutive = 0;
                    blueprints.push(bp);
                }
                None => {
                    stats.misses += 1;
                    consecutive += 1;
                    if consecutive >= limits.max_consecutive_misses {
                        stats.stopped_by = ProbeStop::ConsecutiveMisses;
                        break;
                    }
                }
            }
        }
    }

    tracing::debug!(
        found = blueprints.len(),
        probes = stats.probes,
        misses = stats.misses,
        stopped_by = ?stats.stopped_by,
        "blueprint discovery finished"
    );
    Catalog::with_stats(blueprints, stats)
}

fn probe(file: &dyn RiveFile, index: usize) -> Option<Blueprint> {
    let source = match file.view_model_at(index) {
        Ok(Some(source)) => source,
        Ok(None) => {
            tracing::trace!(index, "empty probe");
            return None;
        }
        Err(fault) => {
            tracing::trace!(index, %fault, "probe faulted");
            return None;
        }
    };
    Some(read_blueprint(index, source.as_ref()))
}

fn read_blueprint(index: usize, source: &dyn ViewModelSource) -> Blueprint {
    let name = source.name().ok().flatten().unwrap_or_default();
    let mut bp = Blueprint::new(index, name, read_property_list(source));
    bp.instance_names = source.instance_names().ok().flatten();
    bp.instance_count = source.instance_count().ok().flatten();
    bp
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/builder.rs"]
mod tests;
