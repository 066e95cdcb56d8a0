//! Staged dependency resolution for addon descriptors.
//!
//! Candidates are attempted in discovery order rather than pre-sorted. A
//! candidate whose dependencies are all resolved (with compatible versions)
//! is accepted immediately; anything else is parked on a deferred worklist.
//! The worklist is retried, round by round in input order, for as long as
//! the previous round accepted something. Whatever is left when a round
//! makes no progress is classified and recorded as failed.
//!
//! # Example
//!
//! ```
//! use addon_resolver::{ExtensionDescriptor, resolve};
//!
//! let addons = vec![
//!     ExtensionDescriptor::new("charts", "1.0", [("core", ">=1.0")]).unwrap(),
//!     ExtensionDescriptor::new("core", "1.2", [] as [(&str, &str); 0]).unwrap(),
//! ];
//!
//! let registry = resolve(addons).unwrap();
//! assert_eq!(registry.load_order(), vec!["core", "charts"]);
//! ```

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::registry::{ExtensionRegistry, FailureReason};

/// Per-candidate state during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolutionState {
    /// Not yet attempted.
    Pending,
    /// Attempted, waiting on at least one dependency that may still resolve.
    Deferred,
    /// Accepted into the load order.
    Resolved,
    /// Can never resolve.
    Failed,
}

/// Orders one set of descriptors and fails the ones that can never load.
///
/// A resolver owns its candidates and is consumed by [`resolve`], so each
/// pass starts from a fresh [`ExtensionRegistry`].
///
/// [`resolve`]: DependencyResolver::resolve
#[derive(Debug)]
pub struct DependencyResolver {
    candidates: Vec<ExtensionDescriptor>,
    index: HashMap<String, usize>,
}

impl DependencyResolver {
    /// Take ownership of the candidates for one pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateExtension`] for the first name that appears
    /// twice. Nothing is resolved in that case.
    pub fn new(candidates: Vec<ExtensionDescriptor>) -> Result<Self> {
        let mut index = HashMap::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            if index.insert(candidate.name().to_string(), i).is_some() {
                return Err(Error::DuplicateExtension(candidate.name().to_string()));
            }
        }
        Ok(Self { candidates, index })
    }

    /// Number of candidates in this pass.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Run the pass to its fixed point.
    ///
    /// Every candidate ends up either in the registry's load order or in its
    /// failure set. The only error is an invariant violation reported by
    /// the registry, which a correct pass never triggers.
    pub fn resolve(self) -> Result<ExtensionRegistry> {
        let Self { candidates, index } = self;
        let mut states = vec![ResolutionState::Pending; candidates.len()];
        let mut slots: Vec<Option<ExtensionDescriptor>> =
            candidates.into_iter().map(Some).collect();
        let mut registry = ExtensionRegistry::new();

        let mut deferred = Vec::new();
        let mut progress = false;
        for (i, (slot, state)) in slots.iter_mut().zip(states.iter_mut()).enumerate() {
            if try_accept(slot, &mut registry)? {
                *state = ResolutionState::Resolved;
                progress = true;
            } else {
                *state = ResolutionState::Deferred;
                deferred.push(i);
            }
        }
        debug!(
            resolved = registry.len(),
            deferred = deferred.len(),
            "initial pass finished"
        );

        let mut round = 0usize;
        while progress && !deferred.is_empty() {
            round += 1;
            progress = false;
            let mut remaining = Vec::with_capacity(deferred.len());
            for i in deferred {
                if try_accept(&mut slots[i], &mut registry)? {
                    states[i] = ResolutionState::Resolved;
                    progress = true;
                } else {
                    remaining.push(i);
                }
            }
            deferred = remaining;
            debug!(round, deferred = deferred.len(), "retry round finished");
        }

        let reasons = classify(&slots, &deferred, &index, &mut states, &registry);
        for (i, reason) in deferred.iter().zip(reasons) {
            if let Some(candidate) = slots[*i].take() {
                debug!(addon = candidate.name(), %reason, "addon failed");
                registry.mark_failed(candidate.name(), reason)?;
            }
        }

        Ok(registry)
    }
}

/// Resolve `candidates` in one pass.
///
/// Shorthand for [`DependencyResolver::new`] followed by
/// [`DependencyResolver::resolve`].
pub fn resolve(candidates: Vec<ExtensionDescriptor>) -> Result<ExtensionRegistry> {
    DependencyResolver::new(candidates)?.resolve()
}

/// Move the candidate into the registry if every dependency is resolved
/// with a compatible version.
fn try_accept(
    slot: &mut Option<ExtensionDescriptor>,
    registry: &mut ExtensionRegistry,
) -> Result<bool> {
    let ready = slot.as_ref().is_some_and(|candidate| {
        candidate
            .dependencies()
            .iter()
            .all(|dep| registry.get_compatible(dep.name(), dep.constraint()).is_some())
    });
    if !ready {
        return Ok(false);
    }
    match slot.take() {
        Some(candidate) => {
            trace!(addon = candidate.name(), "addon resolved");
            registry.mark_resolved(candidate)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Explain why each deferred candidate is stuck. Returns one reason per
/// entry of `deferred`, in the same order.
///
/// Candidates with a direct problem (missing or incompatible dependency)
/// are classified first, then failure propagates to their dependants, and
/// whatever is still undecided is part of a cycle or waits on one.
fn classify(
    slots: &[Option<ExtensionDescriptor>],
    deferred: &[usize],
    index: &HashMap<String, usize>,
    states: &mut [ResolutionState],
    registry: &ExtensionRegistry,
) -> Vec<FailureReason> {
    let mut reasons: Vec<Option<FailureReason>> = vec![None; deferred.len()];

    for (pos, &i) in deferred.iter().enumerate() {
        let Some(candidate) = slots[i].as_ref() else {
            continue;
        };
        reasons[pos] = direct_failure(candidate, index, registry);
        if reasons[pos].is_some() {
            states[i] = ResolutionState::Failed;
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for (pos, &i) in deferred.iter().enumerate() {
            if states[i] != ResolutionState::Deferred {
                continue;
            }
            let Some(candidate) = slots[i].as_ref() else {
                continue;
            };
            let failed_dep = candidate.dependencies().iter().find(|dep| {
                index
                    .get(dep.name())
                    .is_some_and(|&j| states[j] == ResolutionState::Failed)
            });
            if let Some(dep) = failed_dep {
                reasons[pos] = Some(FailureReason::DependencyFailed {
                    dependency: dep.name().to_string(),
                });
                states[i] = ResolutionState::Failed;
                changed = true;
            }
        }
    }

    deferred
        .iter()
        .zip(reasons)
        .map(|(&i, reason)| {
            states[i] = ResolutionState::Failed;
            reason.unwrap_or_else(|| FailureReason::Unresolvable {
                dependency: slots[i]
                    .as_ref()
                    .and_then(|candidate| first_unmet(candidate, registry))
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// A failure that follows from the candidate's own dependencies alone.
fn direct_failure(
    candidate: &ExtensionDescriptor,
    index: &HashMap<String, usize>,
    registry: &ExtensionRegistry,
) -> Option<FailureReason> {
    candidate.dependencies().iter().find_map(|dep| {
        if !index.contains_key(dep.name()) {
            return Some(FailureReason::Missing {
                dependency: dep.name().to_string(),
            });
        }
        let found = registry.get(dep.name())?;
        if dep.constraint().satisfied_by_version(found.version()) {
            None
        } else {
            Some(FailureReason::IncompatibleVersion {
                dependency: dep.name().to_string(),
                required: dep.expression().to_string(),
                found: found.version().to_string(),
            })
        }
    })
}

fn first_unmet(candidate: &ExtensionDescriptor, registry: &ExtensionRegistry) -> Option<String> {
    candidate
        .dependencies()
        .iter()
        .find(|dep| registry.get_compatible(dep.name(), dep.constraint()).is_none())
        .or_else(|| candidate.dependencies().first())
        .map(|dep| dep.name().to_string())
}
