//! Activation of resolved addons in load order.
//!
//! The resolver guarantees that dependencies precede dependants in the load
//! order. The loader walks that order and hands each addon to an
//! [`Activator`]. When an activation fails, everything that depends on the
//! failed addon (directly or transitively) is skipped instead of activated.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::descriptor::ExtensionDescriptor;
use crate::registry::ExtensionRegistry;

/// Brings one resolved addon to life.
pub trait Activator {
    /// Activate `addon`. An `Err` carries a human-readable reason.
    fn activate(&mut self, addon: &ExtensionDescriptor) -> Result<(), String>;
}

impl<F> Activator for F
where
    F: FnMut(&ExtensionDescriptor) -> Result<(), String>,
{
    fn activate(&mut self, addon: &ExtensionDescriptor) -> Result<(), String> {
        self(addon)
    }
}

/// An addon that was not activated, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotLoaded {
    pub name: String,
    pub reason: String,
}

/// Outcome of activating a registry's load order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Activated addons, in activation order.
    pub activated: Vec<String>,
    /// Addons whose activator returned an error.
    pub failed: Vec<NotLoaded>,
    /// Addons skipped because a dependency was not activated.
    pub skipped: Vec<NotLoaded>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Walks a registry's load order and activates each addon in turn.
#[derive(Debug, Clone, Copy)]
pub struct StagedLoader<'a> {
    registry: &'a ExtensionRegistry,
}

impl<'a> StagedLoader<'a> {
    pub fn new(registry: &'a ExtensionRegistry) -> Self {
        Self { registry }
    }

    pub fn load(&self, activator: &mut dyn Activator) -> LoadReport {
        let mut report = LoadReport::default();
        let mut broken: HashSet<&str> = HashSet::new();

        for addon in self.registry.resolved() {
            let blocked = addon
                .dependencies()
                .iter()
                .find(|dep| broken.contains(dep.name()));
            if let Some(dep) = blocked {
                debug!(addon = addon.name(), dependency = dep.name(), "skipping addon");
                broken.insert(addon.name());
                report.skipped.push(NotLoaded {
                    name: addon.name().to_string(),
                    reason: format!("dependency {} was not activated", dep.name()),
                });
                continue;
            }

            match activator.activate(addon) {
                Ok(()) => report.activated.push(addon.name().to_string()),
                Err(reason) => {
                    debug!(addon = addon.name(), %reason, "activation failed");
                    broken.insert(addon.name());
                    report.failed.push(NotLoaded {
                        name: addon.name().to_string(),
                        reason,
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use pretty_assertions::assert_eq;

    fn registry() -> ExtensionRegistry {
        let addon = |name: &str, deps: &[&str]| {
            ExtensionDescriptor::new(name, "1.0", deps.iter().map(|d| (*d, "*"))).unwrap()
        };
        resolve(vec![
            addon("core", &[]),
            addon("swing", &["core"]),
            addon("charts", &["swing"]),
            addon("i18n", &["core"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_activates_in_load_order() {
        let registry = registry();
        let mut seen = Vec::new();
        let mut record = |addon: &ExtensionDescriptor| -> Result<(), String> {
            seen.push(addon.name().to_string());
            Ok(())
        };
        let report = StagedLoader::new(&registry).load(&mut record);
        assert!(report.is_clean());
        assert_eq!(report.activated, vec!["core", "swing", "charts", "i18n"]);
        assert_eq!(seen, report.activated);
    }

    #[test]
    fn test_failed_activation_skips_dependants() {
        let registry = registry();
        let mut headless = |addon: &ExtensionDescriptor| -> Result<(), String> {
            if addon.name() == "swing" {
                Err("no display".to_string())
            } else {
                Ok(())
            }
        };
        let report = StagedLoader::new(&registry).load(&mut headless);
        assert_eq!(report.activated, vec!["core", "i18n"]);
        assert_eq!(
            report.failed,
            vec![NotLoaded {
                name: "swing".to_string(),
                reason: "no display".to_string()
            }]
        );
        assert_eq!(
            report.skipped,
            vec![NotLoaded {
                name: "charts".to_string(),
                reason: "dependency swing was not activated".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ExtensionRegistry::new();
        let mut noop = |_: &ExtensionDescriptor| -> Result<(), String> { Ok(()) };
        let report = StagedLoader::new(&registry).load(&mut noop);
        assert_eq!(report, LoadReport::default());
    }
}
