/// Convenience result type used across rivelens.
pub type InspectResult<T> = Result<T, InspectError>;

/// Top-level error taxonomy for the inspection APIs.
///
/// Only fatal conditions surface here. Probe exhaustion, missing bindings, and
/// unresolvable schemas are recovered inside the engine and encoded into the document.
#[derive(thiserror::Error, Debug)]
pub enum InspectError {
    /// The runtime could not produce a usable file handle.
    #[error("load error: {error}")]
    Load {
        /// Short operator-facing description.
        error: String,
        /// Underlying cause as reported by the runtime or parser.
        details: String,
    },

    /// Invalid options or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Serializable failure state shown by callers in place of a document.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FailureReport {
    /// What failed.
    pub error: String,
    /// Why it failed, when known.
    pub details: String,
}

impl InspectError {
    /// Build a [`InspectError::Load`] value.
    pub fn load(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Load {
            error: error.into(),
            details: details.into(),
        }
    }

    /// Build a [`InspectError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`InspectError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Split this error into the `error` / `details` pair shown to operators.
    pub fn report(&self) -> FailureReport {
        match self {
            Self::Load { error, details } => FailureReport {
                error: error.clone(),
                details: details.clone(),
            },
            Self::Validation(msg) => FailureReport {
                error: "invalid options".to_string(),
                details: msg.clone(),
            },
            Self::Serde(msg) => FailureReport {
                error: "serialization failed".to_string(),
                details: msg.clone(),
            },
            Self::Other(err) => FailureReport {
                error: err.to_string(),
                details: format!("{err:#}"),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
