use crate::foundation::error::{InspectError, InspectResult};

/// Bounds for blueprint discovery when the runtime exposes no view-model count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeLimits {
    /// Hard ceiling on probed indices.
    pub max_probes: usize,
    /// Consecutive failed or empty probes that end discovery.
    pub max_consecutive_misses: usize,
}

impl Default for ProbeLimits {
    fn default() -> Self {
        Self {
            max_probes: 200,
            max_consecutive_misses: 3,
        }
    }
}

/// Options for one inspection pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectOptions {
    /// Blueprint probing limits.
    pub probe: ProbeLimits,
    /// Maximum nesting depth expanded below a root instance.
    pub max_depth: usize,
    /// Maximum instances expanded per root. Bounds fan-out of self-referential bindings.
    pub max_nodes: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            probe: ProbeLimits::default(),
            max_depth: 32,
            max_nodes: 10_000,
        }
    }
}

impl InspectOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> InspectResult<Self> {
        let opts: Self =
            serde_json::from_str(s).map_err(|e| InspectError::serde(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> InspectResult<()> {
        if self.probe.max_probes == 0 {
            return Err(InspectError::validation("probe.maxProbes must be > 0"));
        }
        if self.probe.max_consecutive_misses == 0 {
            return Err(InspectError::validation(
                "probe.maxConsecutiveMisses must be > 0",
            ));
        }
        if self.max_depth == 0 {
            return Err(InspectError::validation("maxDepth must be > 0"));
        }
        if self.max_nodes == 0 {
            return Err(InspectError::validation("maxNodes must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/options.rs"]
mod tests;
