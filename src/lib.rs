//! rivelens inspects compiled Rive files and projects their data-binding layer into a
//! browsable document.
//!
//! # Pipeline overview
//!
//! 1. **Discover**: probe the file for every ViewModel blueprint ([`build_catalog`])
//! 2. **Reconcile**: walk each artboard's bound instance, matching nested instances to
//!    blueprints by name, then by structural [`fingerprint`] ([`reconcile_root`])
//! 3. **Assemble**: merge artboard metadata, reconciled trees, and the catalog into an
//!    [`ExportDocument`] ([`produce_document`])
//!
//! The runtime is consumed through the capability traits in [`runtime`]; nothing is
//! written back to it. Everything short of an unusable file handle is recovered and
//! recorded in the document.
#![forbid(unsafe_code)]

mod catalog;
mod document;
mod foundation;
mod reconcile;

/// Capability traits over the external runtime, plus an in-memory implementation.
pub mod runtime;

pub use catalog::builder::{Blueprint, Catalog, ProbeStats, ProbeStop, build_catalog};
pub use catalog::fingerprint::{FINGERPRINT_SEPARATOR, fingerprint};
pub use document::assemble::{
    ArtboardReport, BlueprintReport, Diagnostics, DocumentSummary, EXPORT_KEYS, ExportDocument,
    filter_export_keys, produce_document,
};
pub use document::scan::{ArtboardScan, scan_artboard};
pub use foundation::error::{FailureReport, InspectError, InspectResult};
pub use foundation::options::{InspectOptions, ProbeLimits};
pub use reconcile::engine::{
    DEFAULT_INSTANCE_NAME, UNRESOLVED_MARKER, ViewModelInstanceNode, reconcile, reconcile_root,
};
pub use reconcile::extract::{ExtractedValue, PropertyValue, TRIGGER_MARKER, color_hex, extract};
pub use reconcile::resolver::{MatchStrategy, Resolution, resolve};
