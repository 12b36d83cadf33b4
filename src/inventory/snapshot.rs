//! In-memory and YAML-backed inventory.
//!
//! A snapshot lists keys by full path with their string values. Intermediate
//! keys are implied by their descendants, so listing
//! `SOFTWARE\Vendor\Product` makes `SOFTWARE\Vendor` enumerable too.
//!
//! ```yaml
//! keys:
//!   'SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall\{8F3A}':
//!     DisplayName: Microsoft Edge WebView2 Runtime
//!     DisplayVersion: 120.0.2210.91
//!   'SOFTWARE\Microsoft\DevDiv\VC\Servicing\14.0\RuntimeMinimum':
//!     Version: 14.38.33135
//! denied:
//!   - 'SOFTWARE\Wow6432Node\Microsoft\Windows\CurrentVersion\Uninstall'
//! ```
//!
//! Keys under a `denied` path fail to open, which stands in for a
//! permission error on the real registry.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PreflightError, Result};

use super::Inventory;

/// Inventory served from a fixed set of keys.
#[derive(Debug, Clone, Default)]
pub struct SnapshotInventory {
    /// Normalized path -> (path as written, values).
    keys: BTreeMap<String, (String, BTreeMap<String, String>)>,
    /// Normalized paths that refuse to open.
    denied: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    keys: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    denied: Vec<String>,
}

fn normalize(path: &str) -> String {
    path.replace('/', "\\")
        .trim_matches('\\')
        .to_lowercase()
}

impl SnapshotInventory {
    /// Create an empty snapshot in which every key is missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key with the given values.
    pub fn with_key(mut self, path: &str, values: &[(&str, &str)]) -> Self {
        let written = path.replace('/', "\\").trim_matches('\\').to_string();
        let entry = self
            .keys
            .entry(normalize(path))
            .or_insert_with(|| (written, BTreeMap::new()));
        for (name, value) in values {
            entry.1.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Make a key, and everything below it, fail to open.
    pub fn with_denied(mut self, path: &str) -> Self {
        self.denied.push(normalize(path));
        self
    }

    /// Parse a snapshot from YAML text.
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let file: SnapshotFile = serde_yaml::from_str(content)?;
        let mut snapshot = Self::new();
        for (path, values) in &file.keys {
            let pairs: Vec<(&str, &str)> = values
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            snapshot = snapshot.with_key(path, &pairs);
        }
        for path in &file.denied {
            snapshot = snapshot.with_denied(path);
        }
        Ok(snapshot)
    }

    /// Load a snapshot from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| PreflightError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn check_access(&self, normalized: &str, path: &str) -> Result<()> {
        let blocked = self.denied.iter().any(|d| {
            normalized == d || normalized.starts_with(&format!("{}\\", d))
        });
        if blocked {
            return Err(PreflightError::InventoryUnreadable {
                path: path.to_string(),
                message: "access denied".to_string(),
            });
        }
        Ok(())
    }

    fn exists(&self, normalized: &str) -> bool {
        let prefix = format!("{}\\", normalized);
        self.keys.contains_key(normalized) || self.keys.keys().any(|k| k.starts_with(&prefix))
    }

    fn not_found(path: &str) -> PreflightError {
        PreflightError::InventoryUnreadable {
            path: path.to_string(),
            message: "key not found".to_string(),
        }
    }
}

impl Inventory for SnapshotInventory {
    fn subkeys(&self, path: &str) -> Result<Vec<String>> {
        let normalized = normalize(path);
        self.check_access(&normalized, path)?;
        if !self.exists(&normalized) {
            return Err(Self::not_found(path));
        }

        let depth = if normalized.is_empty() {
            0
        } else {
            normalized.split('\\').count()
        };
        let prefix = format!("{}\\", normalized);

        let mut seen = Vec::new();
        let mut children = Vec::new();
        for (key, (original, _)) in &self.keys {
            if !normalized.is_empty() && !key.starts_with(&prefix) {
                continue;
            }
            let Some(child) = original.split('\\').nth(depth) else {
                continue;
            };
            let lowered = child.to_lowercase();
            if !seen.contains(&lowered) {
                seen.push(lowered);
                children.push(child.to_string());
            }
        }
        Ok(children)
    }

    fn value(&self, path: &str, name: &str) -> Result<Option<String>> {
        let normalized = normalize(path);
        self.check_access(&normalized, path)?;

        match self.keys.get(&normalized) {
            Some((_, values)) => Ok(values
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())),
            None if self.exists(&normalized) => Ok(None),
            None => Err(Self::not_found(path)),
        }
    }
}
