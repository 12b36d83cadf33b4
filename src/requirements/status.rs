//! Requirement status tracking.
//!
//! A [`RequirementSet`] records, for each dependency kind under check,
//! whether some inventory entry satisfied its minimum version. Recording is
//! an OR: once a kind is met within a run it stays met, so a match in
//! either inventory root is enough.

use std::collections::BTreeMap;

use super::catalog::DependencyKind;

/// Met/unmet status per dependency kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    statuses: BTreeMap<DependencyKind, bool>,
}

impl RequirementSet {
    /// Track `kinds`, all starting unmet.
    pub fn new(kinds: &[DependencyKind]) -> Self {
        Self {
            statuses: kinds.iter().map(|k| (*k, false)).collect(),
        }
    }

    /// Fold one observation into the status of `kind`.
    ///
    /// Never downgrades a kind that is already met.
    pub fn record(&mut self, kind: DependencyKind, met: bool) {
        let status = self.statuses.entry(kind).or_insert(false);
        *status = *status || met;
    }

    /// Treat `kind` as satisfied without looking at the inventory.
    pub fn mark_met(&mut self, kind: DependencyKind) {
        self.statuses.insert(kind, true);
    }

    /// Status of `kind`, or `None` if it was not part of this check.
    pub fn status(&self, kind: DependencyKind) -> Option<bool> {
        self.statuses.get(&kind).copied()
    }

    /// Whether `kind` is tracked and met.
    pub fn is_met(&self, kind: DependencyKind) -> bool {
        self.status(kind).unwrap_or(false)
    }

    /// Tracked kinds that are not met, in install order.
    pub fn unmet_kinds(&self) -> Vec<DependencyKind> {
        self.statuses
            .iter()
            .filter(|(_, met)| !**met)
            .map(|(kind, _)| *kind)
            .collect()
    }

    /// Whether every tracked kind is met.
    pub fn all_met(&self) -> bool {
        self.statuses.values().all(|met| *met)
    }

    /// All tracked kinds, in install order.
    pub fn kinds(&self) -> Vec<DependencyKind> {
        self.statuses.keys().copied().collect()
    }

    /// OR another set into this one.
    pub fn merge(&mut self, other: &RequirementSet) {
        for (kind, met) in &other.statuses {
            self.record(*kind, *met);
        }
    }
}
