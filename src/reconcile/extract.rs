use crate::runtime::{
    Accessor, AccessorKind, LiveInstance, PropertyDecl, PropertyType, RuntimeFault,
};

/// Value reported for every trigger property.
pub const TRIGGER_MARKER: &str = "N/A (Trigger)";

/// A normalized property value, or the reason none could be read.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtractedValue {
    Number(f64),
    Text(String),
    Bool(bool),
    /// `#RRGGBB`, alpha discarded.
    Color(String),
    /// Triggers carry no state.
    Trigger,
    /// A value of an unexpected shape, passed through untouched.
    Raw {
        raw: serde_json::Value,
        note: String,
    },
    /// Why extraction produced no value.
    Sentinel(String),
}

impl ExtractedValue {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel(_))
    }
}

impl serde::Serialize for ExtractedValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap as _;

        match self {
            Self::Number(n) => match whole_number(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Self::Text(s) | Self::Color(s) | Self::Sentinel(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Trigger => serializer.serialize_str(TRIGGER_MARKER),
            Self::Raw { raw, note } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("raw", raw)?;
                map.serialize_entry("note", note)?;
                map.end()
            }
        }
    }
}

/// `n` as an integer when it has no fractional part and fits in `i64`.
fn whole_number(n: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    let in_range = n >= i64::MIN as f64 && n < i64::MAX as f64;
    (n.is_finite() && n.fract() == 0.0 && in_range).then_some(n as i64)
}

/// One extracted leaf property.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PropertyValue {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub value: ExtractedValue,
}

/// Read the current value of one declared property.
///
/// Never fails: a missing accessor, an unbound slot, or a runtime fault is turned
/// into an [`ExtractedValue::Sentinel`] so sibling properties are unaffected.
pub fn extract(instance: &dyn LiveInstance, decl: &PropertyDecl) -> PropertyValue {
    let value = extract_value(instance, decl).unwrap_or_else(|fault| {
        ExtractedValue::Sentinel(format!(
            "error reading {} property '{}': {fault}",
            decl.kind, decl.name
        ))
    });
    PropertyValue {
        name: decl.name.clone(),
        kind: decl.kind.clone(),
        value,
    }
}

enum Slot {
    /// No accessor of the requested kind.
    Missing,
    /// Accessor present, value absent.
    Unbound,
    Value(serde_json::Value),
}

fn read_slot(
    instance: &dyn LiveInstance,
    kind: AccessorKind,
    property: &str,
) -> Result<Slot, RuntimeFault> {
    Ok(match instance.accessor(kind, property)? {
        None => Slot::Missing,
        Some(Accessor { value: None }) | Some(Accessor {
            value: Some(serde_json::Value::Null),
        }) => Slot::Unbound,
        Some(Accessor { value: Some(v) }) => Slot::Value(v),
    })
}

fn not_found(label: &str) -> ExtractedValue {
    ExtractedValue::Sentinel(format!("{label} accessor not found"))
}

fn value_not_found(label: &str) -> ExtractedValue {
    ExtractedValue::Sentinel(format!("{label} accessor value not found"))
}

fn unexpected(raw: serde_json::Value, expected: &str) -> ExtractedValue {
    ExtractedValue::Raw {
        raw,
        note: format!("expected a {expected} value"),
    }
}

fn extract_value(
    instance: &dyn LiveInstance,
    decl: &PropertyDecl,
) -> Result<ExtractedValue, RuntimeFault> {
    let name = decl.name.as_str();
    let value = match &decl.kind {
        PropertyType::Number => match read_slot(instance, AccessorKind::Number, name)? {
            Slot::Value(v) => match v.as_f64() {
                Some(n) => ExtractedValue::Number(n),
                None => unexpected(v, "number"),
            },
            Slot::Unbound => value_not_found("number"),
            Slot::Missing => not_found("number"),
        },
        PropertyType::String => match read_slot(instance, AccessorKind::String, name)? {
            Slot::Value(serde_json::Value::String(s)) => ExtractedValue::Text(s),
            Slot::Value(v) => unexpected(v, "string"),
            Slot::Unbound => value_not_found("string"),
            Slot::Missing => not_found("string"),
        },
        PropertyType::Boolean => match read_slot(instance, AccessorKind::Boolean, name)? {
            Slot::Value(serde_json::Value::Bool(b)) => ExtractedValue::Bool(b),
            Slot::Value(v) => unexpected(v, "boolean"),
            Slot::Unbound => value_not_found("boolean"),
            Slot::Missing => not_found("boolean"),
        },
        PropertyType::EnumType => extract_enum(instance, name)?,
        PropertyType::Color => match read_slot(instance, AccessorKind::Color, name)? {
            Slot::Value(v) => match packed_color(&v) {
                Some(packed) => ExtractedValue::Color(color_hex(packed)),
                None => ExtractedValue::Raw {
                    raw: v,
                    note: "color value is not a packed integer".to_string(),
                },
            },
            Slot::Unbound => value_not_found("color"),
            Slot::Missing => not_found("color"),
        },
        PropertyType::Trigger => ExtractedValue::Trigger,
        PropertyType::ViewModel => ExtractedValue::Sentinel(
            "viewModel properties are reconciled, not extracted".to_string(),
        ),
        PropertyType::Other(kind) => {
            ExtractedValue::Sentinel(format!("unsupported property type '{kind}'"))
        }
    };
    Ok(value)
}

/// Enums prefer their own accessor and fall back to reading the label as a string.
fn extract_enum(instance: &dyn LiveInstance, name: &str) -> Result<ExtractedValue, RuntimeFault> {
    let (slot, via_string) = match read_slot(instance, AccessorKind::Enum, name)? {
        Slot::Missing => (read_slot(instance, AccessorKind::String, name)?, true),
        slot => (slot, false),
    };

    Ok(match slot {
        Slot::Value(serde_json::Value::String(s)) => ExtractedValue::Text(s),
        Slot::Value(v) if v.is_number() => match v.as_f64() {
            Some(n) => ExtractedValue::Number(n),
            None => unexpected(v, "enum"),
        },
        Slot::Value(v) => unexpected(v, "enum"),
        Slot::Unbound if via_string => {
            ExtractedValue::Sentinel("enum accessor value not found (read as string)".to_string())
        }
        Slot::Unbound => value_not_found("enum"),
        Slot::Missing => ExtractedValue::Sentinel(
            "enum accessor not found (string fallback also missing)".to_string(),
        ),
    })
}

fn packed_color(v: &serde_json::Value) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_u64().map(|u| u as i64))
        .or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// Format a packed ARGB integer as `#RRGGBB`.
pub fn color_hex(packed: i64) -> String {
    format!("#{:06X}", packed & 0x00FF_FFFF)
}

#[cfg(test)]
#[path = "../../tests/unit/reconcile/extract.rs"]
mod tests;
