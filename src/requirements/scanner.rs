//! Installed component scanning.
//!
//! The `ComponentScanner` reads the inventory once per run and evaluates
//! every requested catalog entry against it. It returns a [`ScanReport`]
//! rather than mutating shared state; callers thread the report into the
//! install orchestrator.
//!
//! An unreadable inventory root is skipped, not fatal. If every root is
//! unreadable all kinds stay unmet, which makes the orchestrator install
//! everything: redundant at worst, never blocking.

use crate::inventory::{read_entries, Inventory};
use crate::version::is_at_least;

use super::catalog::{Catalog, DependencyKind, DependencySpec, Probe, DEFAULT_INVENTORY_ROOTS};
use super::status::RequirementSet;

/// An inventory entry that matched a catalog rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    /// Dependency the entry was matched to.
    pub kind: DependencyKind,
    /// Display name from the inventory (or the catalog name for
    /// canonical-key lookups).
    pub display_name: String,
    /// Version reported by the inventory.
    pub version: String,
    /// Whether this entry alone satisfies the minimum.
    pub meets_minimum: bool,
}

/// Outcome of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Met/unmet per requested kind.
    pub requirements: RequirementSet,
    /// Every matched entry, in the order it was found.
    pub matches: Vec<MatchedEntry>,
}

/// Evaluates catalog entries against an inventory.
pub struct ComponentScanner<'a> {
    inventory: &'a dyn Inventory,
    catalog: &'a Catalog,
    roots: Vec<String>,
}

impl<'a> ComponentScanner<'a> {
    /// Create a scanner over the default uninstall roots.
    pub fn new(inventory: &'a dyn Inventory, catalog: &'a Catalog) -> Self {
        Self {
            inventory,
            catalog,
            roots: DEFAULT_INVENTORY_ROOTS.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Replace the enumerated inventory roots.
    pub fn with_roots(mut self, roots: Vec<String>) -> Self {
        self.roots = roots;
        self
    }

    /// The roots this scanner enumerates.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Check `kinds` against the inventory.
    ///
    /// Kinds missing from the catalog are reported unmet.
    pub fn scan(&self, kinds: &[DependencyKind]) -> ScanReport {
        let mut report = ScanReport {
            requirements: RequirementSet::new(kinds),
            matches: Vec::new(),
        };

        let specs: Vec<&DependencySpec> = kinds
            .iter()
            .filter_map(|kind| {
                let spec = self.catalog.get(*kind);
                if spec.is_none() {
                    tracing::warn!("No catalog entry for '{}'; leaving it unmet", kind);
                }
                spec
            })
            .collect();

        let enumerated: Vec<&DependencySpec> = specs
            .iter()
            .copied()
            .filter(|s| matches!(s.probe, Probe::DisplayName(_)))
            .collect();
        if !enumerated.is_empty() {
            self.scan_roots(&enumerated, &mut report);
        }

        for spec in specs {
            if let Probe::CanonicalValue { key, value } = &spec.probe {
                self.scan_canonical(spec, key, value, &mut report);
            }
        }

        tracing::debug!(
            "Scan complete: unmet = {:?}",
            report.requirements.unmet_kinds()
        );
        report
    }

    fn scan_roots(&self, specs: &[&DependencySpec], report: &mut ScanReport) {
        for root in &self.roots {
            let entries = match read_entries(self.inventory, root) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::debug!("Skipping inventory root: {}", e);
                    continue;
                }
            };

            for entry in &entries {
                for spec in specs {
                    let Probe::DisplayName(matcher) = &spec.probe else {
                        continue;
                    };
                    if !matcher.matches(&entry.display_name) {
                        continue;
                    }

                    let met = is_at_least(&spec.min_version, &entry.display_version, &spec.delimiter);
                    tracing::debug!(
                        "{} matched '{}' [{}] (meets {}: {})",
                        spec.kind,
                        entry.display_name,
                        entry.display_version,
                        spec.min_version,
                        met
                    );
                    report.requirements.record(spec.kind, met);
                    report.matches.push(MatchedEntry {
                        kind: spec.kind,
                        display_name: entry.display_name.clone(),
                        version: entry.display_version.clone(),
                        meets_minimum: met,
                    });
                }
            }
        }
    }

    fn scan_canonical(&self, spec: &DependencySpec, key: &str, value: &str, report: &mut ScanReport) {
        match self.inventory.value(key, value) {
            Ok(Some(version)) => {
                let version = version.trim_end_matches('\0').to_string();
                let met = is_at_least(&spec.min_version, &version, &spec.delimiter);
                tracing::debug!(
                    "{} found at {} [{}] (meets {}: {})",
                    spec.kind,
                    key,
                    version,
                    spec.min_version,
                    met
                );
                report.requirements.record(spec.kind, met);
                report.matches.push(MatchedEntry {
                    kind: spec.kind,
                    display_name: spec.display_name.clone(),
                    version,
                    meets_minimum: met,
                });
            }
            Ok(None) => {
                tracing::debug!("{} key {} has no '{}' value", spec.kind, key, value);
            }
            Err(e) => {
                tracing::debug!("{} not found: {}", spec.kind, e);
            }
        }
    }
}
