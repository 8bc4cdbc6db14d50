//! In-memory runtime loaded from a JSON dump.
//!
//! Implements every capability trait in [`crate::runtime`] and can reproduce the
//! awkward shapes real runtimes exhibit: faulting out-of-range probes, hidden or
//! indexed-only property lists, unbound accessors, and per-property faults.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use anyhow::Context as _;

use crate::{
    foundation::error::{InspectError, InspectResult},
    runtime::{
        Accessor, AccessorKind, AnimationInfo, ArtboardSource, LiveInstance, PropertyDecl,
        PropertySource, RiveFile, RuntimeFault, StateMachineInfo, ViewModelSource,
    },
};

/// How a property list is exposed to callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyListing {
    /// Materialized list.
    #[default]
    Array,
    /// Only `property_count` + `property_at`.
    Indexed,
    /// `property_array` faults; the indexed accessors work.
    FaultingArray,
    /// Not introspectable at all.
    Hidden,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryFile {
    #[serde(default)]
    pub artboards: Vec<MemoryArtboard>,
    #[serde(default)]
    pub view_models: Vec<MemoryViewModel>,
    /// Report `view_models.len()` through [`RiveFile::view_model_count`].
    #[serde(default)]
    pub expose_view_model_count: bool,
    /// Probe indices that fault even though they are in range.
    #[serde(default)]
    pub faulty_view_model_indices: BTreeSet<usize>,
    /// When set, the handle is unusable and every artboard query faults with this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unusable: Option<String>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryArtboard {
    pub name: String,
    #[serde(default)]
    pub animations: Vec<AnimationInfo>,
    #[serde(default)]
    pub state_machines: Vec<StateMachineInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_view_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<MemoryInstance>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryViewModel {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub listing: PropertyListing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_count: Option<usize>,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub listing: PropertyListing,
    #[serde(default)]
    pub values: BTreeMap<String, MemoryAccessor>,
    #[serde(default)]
    pub nested: BTreeMap<String, MemoryInstance>,
    /// Properties whose accessor or nested lookup faults.
    #[serde(default)]
    pub faults: BTreeSet<String>,
}

/// A stored accessor. `value: None` models an accessor for an unbound slot.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MemoryAccessor {
    pub kind: AccessorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl MemoryFile {
    /// Parse a runtime dump. Parse failures are fatal load errors.
    pub fn from_json_str(s: &str) -> InspectResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| InspectError::load("failed to load runtime dump", e.to_string()))
    }

    pub fn from_json_slice(bytes: &[u8]) -> InspectResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| InspectError::load("failed to load runtime dump", e.to_string()))
    }

    /// Read and parse a dump file. I/O failures keep their cause chain.
    pub fn from_path(path: &Path) -> InspectResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read runtime dump '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    fn check_usable(&self) -> Result<(), RuntimeFault> {
        match &self.unusable {
            Some(msg) => Err(RuntimeFault::new(msg.clone())),
            None => Ok(()),
        }
    }
}

impl RiveFile for MemoryFile {
    fn artboard_count(&self) -> Result<usize, RuntimeFault> {
        self.check_usable()?;
        Ok(self.artboards.len())
    }

    fn artboard_at(
        &self,
        index: usize,
    ) -> Result<Option<Box<dyn ArtboardSource + '_>>, RuntimeFault> {
        self.check_usable()?;
        match self.artboards.get(index) {
            Some(ab) => Ok(Some(Box::new(ab) as Box<dyn ArtboardSource + '_>)),
            None => Err(RuntimeFault::out_of_range(index)),
        }
    }

    fn view_model_count(&self) -> Option<usize> {
        self.expose_view_model_count.then_some(self.view_models.len())
    }

    fn view_model_at(
        &self,
        index: usize,
    ) -> Result<Option<Box<dyn ViewModelSource + '_>>, RuntimeFault> {
        if self.faulty_view_model_indices.contains(&index) {
            return Err(RuntimeFault::new(format!(
                "view model {index} could not be read"
            )));
        }
        match self.view_models.get(index) {
            Some(vm) => Ok(Some(Box::new(vm) as Box<dyn ViewModelSource + '_>)),
            None => Err(RuntimeFault::out_of_range(index)),
        }
    }
}

impl ArtboardSource for MemoryArtboard {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn animation_count(&self) -> Result<usize, RuntimeFault> {
        Ok(self.animations.len())
    }

    fn animation_at(&self, index: usize) -> Result<Option<AnimationInfo>, RuntimeFault> {
        Ok(self.animations.get(index).cloned())
    }

    fn state_machine_count(&self) -> Result<usize, RuntimeFault> {
        Ok(self.state_machines.len())
    }

    fn state_machine_at(&self, index: usize) -> Result<Option<StateMachineInfo>, RuntimeFault> {
        Ok(self.state_machines.get(index).cloned())
    }

    fn default_view_model(&self) -> Result<Option<String>, RuntimeFault> {
        Ok(self.default_view_model.clone())
    }

    fn default_instance(&self) -> Result<Option<Box<dyn LiveInstance + '_>>, RuntimeFault> {
        Ok(self
            .instance
            .as_ref()
            .map(|inst| Box::new(inst) as Box<dyn LiveInstance + '_>))
    }
}

fn list_properties(
    properties: &[PropertyDecl],
    listing: PropertyListing,
) -> Result<Option<Vec<PropertyDecl>>, RuntimeFault> {
    match listing {
        PropertyListing::Array => Ok(Some(properties.to_vec())),
        PropertyListing::FaultingArray => Err(RuntimeFault::new("property array is detached")),
        PropertyListing::Indexed | PropertyListing::Hidden => Ok(None),
    }
}

fn indexed(listing: PropertyListing) -> bool {
    matches!(
        listing,
        PropertyListing::Indexed | PropertyListing::FaultingArray
    )
}

fn count_properties(properties: &[PropertyDecl], listing: PropertyListing) -> Option<usize> {
    indexed(listing).then_some(properties.len())
}

fn property_at(
    properties: &[PropertyDecl],
    listing: PropertyListing,
    index: usize,
) -> Option<PropertyDecl> {
    if indexed(listing) {
        properties.get(index).cloned()
    } else {
        None
    }
}

impl PropertySource for MemoryViewModel {
    fn property_array(&self) -> Result<Option<Vec<PropertyDecl>>, RuntimeFault> {
        list_properties(&self.properties, self.listing)
    }

    fn property_count(&self) -> Result<Option<usize>, RuntimeFault> {
        Ok(count_properties(&self.properties, self.listing))
    }

    fn property_at(&self, index: usize) -> Result<Option<PropertyDecl>, RuntimeFault> {
        Ok(property_at(&self.properties, self.listing, index))
    }
}

impl ViewModelSource for MemoryViewModel {
    fn name(&self) -> Result<Option<String>, RuntimeFault> {
        Ok(Some(self.name.clone()))
    }

    fn instance_names(&self) -> Result<Option<Vec<String>>, RuntimeFault> {
        Ok(self.instance_names.clone())
    }

    fn instance_count(&self) -> Result<Option<usize>, RuntimeFault> {
        Ok(self.instance_count)
    }
}

impl PropertySource for MemoryInstance {
    fn property_array(&self) -> Result<Option<Vec<PropertyDecl>>, RuntimeFault> {
        list_properties(&self.properties, self.listing)
    }

    fn property_count(&self) -> Result<Option<usize>, RuntimeFault> {
        Ok(count_properties(&self.properties, self.listing))
    }

    fn property_at(&self, index: usize) -> Result<Option<PropertyDecl>, RuntimeFault> {
        Ok(property_at(&self.properties, self.listing, index))
    }
}

impl MemoryInstance {
    fn check_fault(&self, property: &str) -> Result<(), RuntimeFault> {
        if self.faults.contains(property) {
            return Err(RuntimeFault::new(format!(
                "runtime fault reading '{property}'"
            )));
        }
        Ok(())
    }
}

impl LiveInstance for MemoryInstance {
    fn name(&self) -> Result<Option<String>, RuntimeFault> {
        Ok(self.name.clone())
    }

    fn accessor(
        &self,
        kind: AccessorKind,
        property: &str,
    ) -> Result<Option<Accessor>, RuntimeFault> {
        self.check_fault(property)?;
        Ok(self
            .values
            .get(property)
            .filter(|stored| stored.kind == kind)
            .map(|stored| Accessor {
                value: stored.value.clone(),
            }))
    }

    fn nested_instance(
        &self,
        property: &str,
    ) -> Result<Option<Box<dyn LiveInstance + '_>>, RuntimeFault> {
        self.check_fault(property)?;
        Ok(self
            .nested
            .get(property)
            .map(|child| Box::new(child) as Box<dyn LiveInstance + '_>))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/memory.rs"]
mod tests;
