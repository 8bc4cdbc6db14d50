use crate::runtime::PropertyDecl;

/// Separator between `name:type` pairs.
pub const FINGERPRINT_SEPARATOR: &str = "|";

/// Structural identity of a property set.
///
/// Properties are ordered by name with byte-wise comparison (ties broken by type
/// name), then joined as `name:type` pairs. The result does not depend on the order
/// the runtime enumerated them in. Blueprints and introspected instances must both go
/// through this function or matching silently fails.
pub fn fingerprint(properties: &[PropertyDecl]) -> String {
    let mut sorted: Vec<&PropertyDecl> = properties.iter().collect();
    sorted.sort_by(|a, b| {
        a.name
            .as_bytes()
            .cmp(b.name.as_bytes())
            .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
    });

    sorted
        .iter()
        .map(|p| format!("{}:{}", p.name, p.kind))
        .collect::<Vec<_>>()
        .join(FINGERPRINT_SEPARATOR)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/fingerprint.rs"]
mod tests;
