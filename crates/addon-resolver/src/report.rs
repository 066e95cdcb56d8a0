//! Serializable summary of a resolution pass.

use serde::Serialize;

use crate::registry::{ExtensionRegistry, FailureKind};

/// One resolved addon in load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntry {
    pub name: String,
    pub version: String,
}

/// One failed addon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub name: String,
    pub kind: FailureKind,
    pub dependency: String,
    pub reason: String,
}

/// Owned snapshot of an [`ExtensionRegistry`], suitable for JSON output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub load_order: Vec<ResolvedEntry>,
    pub failures: Vec<FailureEntry>,
}

impl From<&ExtensionRegistry> for ResolutionReport {
    fn from(registry: &ExtensionRegistry) -> Self {
        Self {
            load_order: registry
                .resolved()
                .map(|d| ResolvedEntry {
                    name: d.name().to_string(),
                    version: d.version().to_string(),
                })
                .collect(),
            failures: registry
                .failures()
                .map(|(name, reason)| FailureEntry {
                    name: name.to_string(),
                    kind: reason.kind(),
                    dependency: reason.dependency().to_string(),
                    reason: reason.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ExtensionDescriptor;
    use crate::resolver::resolve;

    #[test]
    fn test_report_json_shape() {
        let registry = resolve(vec![
            ExtensionDescriptor::new("core", "1.0", [] as [(&str, &str); 0]).unwrap(),
            ExtensionDescriptor::new("ui", "2.0", [("ghost", "*")]).unwrap(),
        ])
        .unwrap();

        let json = serde_json::to_value(ResolutionReport::from(&registry)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "load_order": [{ "name": "core", "version": "1.0" }],
                "failures": [{
                    "name": "ui",
                    "kind": "missing",
                    "dependency": "ghost",
                    "reason": "missing dependency ghost",
                }],
            })
        );
    }
}
