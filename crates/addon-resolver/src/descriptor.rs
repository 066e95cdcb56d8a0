//! Immutable addon descriptors.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::version::{Version, VersionConstraint};

/// A single declared dependency: the addon it names and the version
/// constraint it places on that addon.
#[derive(Debug, Clone)]
pub struct Dependency {
    name: String,
    expression: String,
    constraint: VersionConstraint,
}

impl Dependency {
    /// Name of the addon depended upon.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constraint expression as declared.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The parsed constraint.
    pub fn constraint(&self) -> &VersionConstraint {
        &self.constraint
    }
}

/// Identity, version and declared dependencies of one addon.
///
/// Descriptors are validated on construction and never change afterwards.
/// Dependency declaration order is kept so failure reports are stable.
#[derive(Debug, Clone)]
pub struct ExtensionDescriptor {
    name: String,
    version: Version,
    description: Option<String>,
    dependencies: Vec<Dependency>,
}

impl ExtensionDescriptor {
    /// Build a descriptor from a name, a version and `(name, constraint)`
    /// dependency pairs.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the name or version is blank, the version
    ///   does not parse, or a dependency name is blank or repeated.
    /// - [`Error::InvalidConstraint`] if a constraint expression is malformed.
    pub fn new<I, K, V>(name: impl Into<String>, version: &str, dependencies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::validation(name, "addon name must not be blank"));
        }
        if name.trim() != name {
            return Err(Error::validation(
                name,
                "addon name must not have surrounding whitespace",
            ));
        }
        if version.trim().is_empty() {
            return Err(Error::validation(name, "version must not be blank"));
        }
        let version = Version::parse(version).ok_or_else(|| {
            Error::validation(
                name.clone(),
                format!("version '{version}' is not a dot-separated version"),
            )
        })?;

        let mut seen = HashSet::new();
        let mut deps = Vec::new();
        for (dep_name, expression) in dependencies {
            let dep_name = dep_name.into();
            if dep_name.trim().is_empty() {
                return Err(Error::validation(name, "dependency name must not be blank"));
            }
            if dep_name.trim() != dep_name {
                return Err(Error::validation(
                    name,
                    format!("dependency name '{dep_name}' has surrounding whitespace"),
                ));
            }
            if !seen.insert(dep_name.clone()) {
                return Err(Error::validation(
                    name,
                    format!("dependency '{dep_name}' is declared more than once"),
                ));
            }
            let expression = expression.as_ref().trim().to_string();
            let constraint = VersionConstraint::parse(&expression)?;
            deps.push(Dependency {
                name: dep_name,
                expression,
                constraint,
            });
        }

        Ok(Self {
            name,
            version,
            description: None,
            dependencies: deps,
        })
    }

    /// Attach a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Declared dependencies in declaration order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Whether this addon declares a dependency on `name`.
    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d.name == name)
    }
}
