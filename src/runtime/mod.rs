//! Capability traits over an already-loaded animation runtime.
//!
//! The engine only ever reads through these traits. Every call may fault; faults are
//! values ([`RuntimeFault`]) so the engine can recover locally instead of unwinding.

pub mod memory;

use std::fmt;

/// A fault raised by the external runtime (an out-of-range probe, a detached handle, ...).
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub struct RuntimeFault {
    message: String,
}

impl RuntimeFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn out_of_range(index: usize) -> Self {
        Self::new(format!("index {index} is out of range"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Declared type of a ViewModel property.
///
/// Unknown runtime type names are kept verbatim so fingerprints stay faithful to
/// what the runtime reported.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyType {
    Number,
    String,
    Boolean,
    Color,
    Trigger,
    EnumType,
    ViewModel,
    Other(String),
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Color => "color",
            Self::Trigger => "trigger",
            Self::EnumType => "enumType",
            Self::ViewModel => "viewModel",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for PropertyType {
    fn from(s: &str) -> Self {
        match s {
            "number" => Self::Number,
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "color" => Self::Color,
            "trigger" => Self::Trigger,
            "enumType" => Self::EnumType,
            "viewModel" => Self::ViewModel,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PropertyType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<PropertyType> for String {
    fn from(t: PropertyType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for PropertyType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for PropertyType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

/// One `{name, type}` pair as declared by a blueprint or reported by an instance.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, kind: impl Into<PropertyType>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Typed accessor families a live instance can hand out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessorKind {
    Number,
    String,
    Boolean,
    Enum,
    Color,
}

impl AccessorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Color => "color",
        }
    }
}

/// Accessor handle. Its `value` is optional: runtimes may hand out an accessor
/// for an unbound slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Accessor {
    pub value: Option<serde_json::Value>,
}

/// Anything whose property declarations can be listed.
///
/// Runtimes expose either a materialized list or an indexed accessor with a count;
/// implementors provide whichever they support. See [`read_property_list`].
pub trait PropertySource {
    fn property_array(&self) -> Result<Option<Vec<PropertyDecl>>, RuntimeFault> {
        Ok(None)
    }

    fn property_count(&self) -> Result<Option<usize>, RuntimeFault> {
        Ok(None)
    }

    fn property_at(&self, index: usize) -> Result<Option<PropertyDecl>, RuntimeFault> {
        let _ = index;
        Ok(None)
    }
}

/// A blueprint handle returned by [`RiveFile::view_model_at`].
pub trait ViewModelSource: PropertySource {
    fn name(&self) -> Result<Option<String>, RuntimeFault>;

    fn instance_names(&self) -> Result<Option<Vec<String>>, RuntimeFault> {
        Ok(None)
    }

    fn instance_count(&self) -> Result<Option<usize>, RuntimeFault> {
        Ok(None)
    }
}

/// A live, bound ViewModel instance.
pub trait LiveInstance: PropertySource {
    /// Runtime-reported name, when the runtime exposes one.
    fn name(&self) -> Result<Option<String>, RuntimeFault> {
        Ok(None)
    }

    fn accessor(&self, kind: AccessorKind, property: &str)
    -> Result<Option<Accessor>, RuntimeFault>;

    fn nested_instance(
        &self,
        property: &str,
    ) -> Result<Option<Box<dyn LiveInstance + '_>>, RuntimeFault>;
}

/// Animation metadata reported by an artboard.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    /// Duration in frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_mode: Option<String>,
}

/// Declared state-machine input type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    Number,
    Boolean,
    Trigger,
    Other(String),
}

impl InputKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Trigger => "trigger",
            Self::Other(name) => name,
        }
    }
}

impl serde::Serialize for InputKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for InputKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "trigger" => Self::Trigger,
            _ => Self::Other(s),
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InputDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateMachineInfo {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<InputDecl>,
}

/// Structural view of one artboard.
pub trait ArtboardSource {
    fn name(&self) -> String;

    fn animation_count(&self) -> Result<usize, RuntimeFault>;

    fn animation_at(&self, index: usize) -> Result<Option<AnimationInfo>, RuntimeFault>;

    fn state_machine_count(&self) -> Result<usize, RuntimeFault>;

    fn state_machine_at(&self, index: usize) -> Result<Option<StateMachineInfo>, RuntimeFault>;

    /// Name of the blueprint the artboard declares as its default, if any.
    fn default_view_model(&self) -> Result<Option<String>, RuntimeFault> {
        Ok(None)
    }

    /// The instance currently bound to the artboard, if any.
    fn default_instance(&self) -> Result<Option<Box<dyn LiveInstance + '_>>, RuntimeFault> {
        Ok(None)
    }
}

/// An already-loaded file handle.
pub trait RiveFile {
    /// Faults here mean the handle is unusable.
    fn artboard_count(&self) -> Result<usize, RuntimeFault>;

    fn artboard_at(&self, index: usize)
    -> Result<Option<Box<dyn ArtboardSource + '_>>, RuntimeFault>;

    /// Number of blueprints, for runtimes that expose it. Most do not.
    fn view_model_count(&self) -> Option<usize> {
        None
    }

    /// Blueprint at `index`. Out-of-range indices fault or return `None`.
    fn view_model_at(
        &self,
        index: usize,
    ) -> Result<Option<Box<dyn ViewModelSource + '_>>, RuntimeFault>;
}

/// Read a property list, trying the materialized form first and the indexed form second.
///
/// Faults in either strategy degrade to whatever could be read; an unreadable
/// source yields an empty list.
pub fn read_property_list(source: &dyn PropertySource) -> Vec<PropertyDecl> {
    match source.property_array() {
        Ok(Some(list)) => return list,
        Ok(None) => {}
        Err(fault) => tracing::trace!(%fault, "property array unavailable"),
    }

    let count = match source.property_count() {
        Ok(Some(n)) => n,
        Ok(None) => return Vec::new(),
        Err(fault) => {
            tracing::trace!(%fault, "property count unavailable");
            return Vec::new();
        }
    };

    (0..count)
        .filter_map(|i| match source.property_at(i) {
            Ok(decl) => decl,
            Err(fault) => {
                tracing::trace!(index = i, %fault, "property read failed");
                None
            }
        })
        .collect()
}

impl<T: PropertySource + ?Sized> PropertySource for &T {
    fn property_array(&self) -> Result<Option<Vec<PropertyDecl>>, RuntimeFault> {
        (**self).property_array()
    }

    fn property_count(&self) -> Result<Option<usize>, RuntimeFault> {
        (**self).property_count()
    }

    fn property_at(&self, index: usize) -> Result<Option<PropertyDecl>, RuntimeFault> {
        (**self).property_at(index)
    }
}

impl<T: ViewModelSource + ?Sized> ViewModelSource for &T {
    fn name(&self) -> Result<Option<String>, RuntimeFault> {
        (**self).name()
    }

    fn instance_names(&self) -> Result<Option<Vec<String>>, RuntimeFault> {
        (**self).instance_names()
    }

    fn instance_count(&self) -> Result<Option<usize>, RuntimeFault> {
        (**self).instance_count()
    }
}

impl<T: LiveInstance + ?Sized> LiveInstance for &T {
    fn name(&self) -> Result<Option<String>, RuntimeFault> {
        (**self).name()
    }

    fn accessor(
        &self,
        kind: AccessorKind,
        property: &str,
    ) -> Result<Option<Accessor>, RuntimeFault> {
        (**self).accessor(kind, property)
    }

    fn nested_instance(
        &self,
        property: &str,
    ) -> Result<Option<Box<dyn LiveInstance + '_>>, RuntimeFault> {
        (**self).nested_instance(property)
    }
}

impl<T: ArtboardSource + ?Sized> ArtboardSource for &T {
    fn name(&self) -> String {
        (**self).name()
    }

    fn animation_count(&self) -> Result<usize, RuntimeFault> {
        (**self).animation_count()
    }

    fn animation_at(&self, index: usize) -> Result<Option<AnimationInfo>, RuntimeFault> {
        (**self).animation_at(index)
    }

    fn state_machine_count(&self) -> Result<usize, RuntimeFault> {
        (**self).state_machine_count()
    }

    fn state_machine_at(&self, index: usize) -> Result<Option<StateMachineInfo>, RuntimeFault> {
        (**self).state_machine_at(index)
    }

    fn default_view_model(&self) -> Result<Option<String>, RuntimeFault> {
        (**self).default_view_model()
    }

    fn default_instance(&self) -> Result<Option<Box<dyn LiveInstance + '_>>, RuntimeFault> {
        (**self).default_instance()
    }
}
