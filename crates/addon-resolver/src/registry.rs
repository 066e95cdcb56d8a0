//! Outcome of one resolution pass.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::version::VersionConstraint;

/// Broad category of a resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// A dependency was never declared by any candidate.
    Missing,
    /// A dependency itself failed.
    DependencyFailed,
    /// A dependency resolved with a version outside the constraint.
    VersionIncompatible,
    /// No progress was possible (cycle or an unmet constraint inside one).
    Unresolvable,
}

/// Why an addon could not be resolved.
///
/// Each variant names the offending dependency; `Display` renders the
/// operator-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Missing {
        dependency: String,
    },
    DependencyFailed {
        dependency: String,
    },
    IncompatibleVersion {
        dependency: String,
        required: String,
        found: String,
    },
    Unresolvable {
        dependency: String,
    },
}

impl FailureReason {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Missing { .. } => FailureKind::Missing,
            Self::DependencyFailed { .. } => FailureKind::DependencyFailed,
            Self::IncompatibleVersion { .. } => FailureKind::VersionIncompatible,
            Self::Unresolvable { .. } => FailureKind::Unresolvable,
        }
    }

    /// Name of the dependency that caused the failure.
    pub fn dependency(&self) -> &str {
        match self {
            Self::Missing { dependency }
            | Self::DependencyFailed { dependency }
            | Self::IncompatibleVersion { dependency, .. }
            | Self::Unresolvable { dependency } => dependency,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { dependency } => write!(f, "missing dependency {dependency}"),
            Self::DependencyFailed { dependency } => {
                write!(f, "depends on failed extension {dependency}")
            }
            Self::IncompatibleVersion {
                dependency,
                required,
                found,
            } => write!(
                f,
                "incompatible version of {dependency}: required {required}, found {found}"
            ),
            Self::Unresolvable { dependency } => write!(
                f,
                "unresolvable dependency cycle or unmet constraint involving {dependency}"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Resolved(usize),
    Failed(usize),
}

/// Authoritative record of one resolution pass.
///
/// Every name lives in exactly one of the resolved list or the failed list.
/// Resolved addons are kept in insertion order, which is the load order.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    resolved: Vec<ExtensionDescriptor>,
    failed: Vec<(String, FailureReason)>,
    index: HashMap<String, Slot>,
}

impl ExtensionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor to the load order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyResolved`] if the name was already recorded as
    /// resolved or failed.
    pub fn mark_resolved(&mut self, descriptor: ExtensionDescriptor) -> Result<()> {
        self.guard(descriptor.name())?;
        self.index.insert(
            descriptor.name().to_string(),
            Slot::Resolved(self.resolved.len()),
        );
        self.resolved.push(descriptor);
        Ok(())
    }

    /// Record a failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyResolved`] if the name was already recorded.
    pub fn mark_failed(&mut self, name: impl Into<String>, reason: FailureReason) -> Result<()> {
        let name = name.into();
        self.guard(&name)?;
        self.index
            .insert(name.clone(), Slot::Failed(self.failed.len()));
        self.failed.push((name, reason));
        Ok(())
    }

    fn guard(&self, name: &str) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(Error::AlreadyResolved(name.to_string()));
        }
        Ok(())
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        matches!(self.index.get(name), Some(Slot::Resolved(_)))
    }

    pub fn is_failed(&self, name: &str) -> bool {
        matches!(self.index.get(name), Some(Slot::Failed(_)))
    }

    /// Look up a resolved addon by name.
    pub fn get(&self, name: &str) -> Option<&ExtensionDescriptor> {
        match self.index.get(name) {
            Some(Slot::Resolved(i)) => self.resolved.get(*i),
            _ => None,
        }
    }

    /// Look up a resolved addon whose version satisfies `constraint`.
    pub fn get_compatible(
        &self,
        name: &str,
        constraint: &VersionConstraint,
    ) -> Option<&ExtensionDescriptor> {
        self.get(name)
            .filter(|d| constraint.satisfied_by_version(d.version()))
    }

    /// Version of a resolved addon.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|d| d.version().as_str())
    }

    /// Resolved addon names in load order.
    pub fn load_order(&self) -> Vec<&str> {
        self.resolved.iter().map(|d| d.name()).collect()
    }

    /// Resolved descriptors in load order.
    pub fn resolved(&self) -> impl Iterator<Item = &ExtensionDescriptor> {
        self.resolved.iter()
    }

    /// Failure reason for a single addon.
    pub fn failure(&self, name: &str) -> Option<&FailureReason> {
        match self.index.get(name) {
            Some(Slot::Failed(i)) => self.failed.get(*i).map(|(_, reason)| reason),
            _ => None,
        }
    }

    /// All failures, in the order they were recorded.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FailureReason)> {
        self.failed.iter().map(|(name, reason)| (name.as_str(), reason))
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Number of names recorded, resolved or failed.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addon(name: &str, version: &str) -> ExtensionDescriptor {
        ExtensionDescriptor::new(name, version, [] as [(&str, &str); 0]).unwrap()
    }

    fn missing(dep: &str) -> FailureReason {
        FailureReason::Missing {
            dependency: dep.to_string(),
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ExtensionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.load_order().is_empty());
        assert_eq!(registry.failures().count(), 0);
    }

    #[test]
    fn test_load_order_follows_insertion() {
        let mut registry = ExtensionRegistry::new();
        registry.mark_resolved(addon("zeta", "1.0")).unwrap();
        registry.mark_resolved(addon("alpha", "2.0")).unwrap();

        assert_eq!(registry.load_order(), vec!["zeta", "alpha"]);
        assert!(registry.is_resolved("alpha"));
        assert_eq!(registry.version_of("alpha"), Some("2.0"));
        assert_eq!(registry.version_of("missing"), None);
    }

    #[test]
    fn test_mark_resolved_twice_rejected() {
        let mut registry = ExtensionRegistry::new();
        registry.mark_resolved(addon("core", "1.0")).unwrap();
        let err = registry.mark_resolved(addon("core", "1.1")).unwrap_err();
        assert!(matches!(err, Error::AlreadyResolved(name) if name == "core"));
        assert_eq!(registry.version_of("core"), Some("1.0"));
    }

    #[test]
    fn test_mark_failed_after_resolved_rejected() {
        let mut registry = ExtensionRegistry::new();
        registry.mark_resolved(addon("core", "1.0")).unwrap();
        assert!(registry.mark_failed("core", missing("x")).is_err());
        assert!(!registry.is_failed("core"));
    }

    #[test]
    fn test_mark_resolved_after_failed_rejected() {
        let mut registry = ExtensionRegistry::new();
        registry.mark_failed("core", missing("x")).unwrap();
        assert!(registry.mark_resolved(addon("core", "1.0")).is_err());
        assert!(!registry.is_resolved("core"));
        assert_eq!(registry.failure("core"), Some(&missing("x")));
    }

    #[test]
    fn test_get_compatible() {
        let mut registry = ExtensionRegistry::new();
        registry.mark_resolved(addon("swing", "1.5.0")).unwrap();

        let old_enough = VersionConstraint::parse(">=1.0").unwrap();
        let too_new = VersionConstraint::parse(">=2.0").unwrap();
        assert!(registry.get_compatible("swing", &old_enough).is_some());
        assert!(registry.get_compatible("swing", &too_new).is_none());
        assert!(registry.get_compatible("fx", &old_enough).is_none());
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(missing("Y").to_string(), "missing dependency Y");
        assert_eq!(
            FailureReason::DependencyFailed {
                dependency: "Y".into()
            }
            .to_string(),
            "depends on failed extension Y"
        );
        let incompatible = FailureReason::IncompatibleVersion {
            dependency: "swing".into(),
            required: ">=2.0.0".into(),
            found: "1.5.0".into(),
        };
        assert_eq!(
            incompatible.to_string(),
            "incompatible version of swing: required >=2.0.0, found 1.5.0"
        );
        assert_eq!(incompatible.kind(), FailureKind::VersionIncompatible);
        assert_eq!(incompatible.dependency(), "swing");
    }
}
