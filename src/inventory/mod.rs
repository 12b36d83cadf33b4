//! Installed-software inventory access.
//!
//! The scanner never talks to the operating system directly. It reads a
//! hierarchical key/value store through the [`Inventory`] trait:
//!
//! - [`RegistryInventory`] reads `HKEY_LOCAL_MACHINE` on Windows
//! - [`SnapshotInventory`] serves keys from memory or a YAML snapshot, used
//!   on other platforms and in tests
//!
//! Key paths use backslash separators, as in the Windows registry, and are
//! matched case-insensitively.

#[cfg(windows)]
pub mod registry;
pub mod snapshot;

#[cfg(windows)]
pub use registry::RegistryInventory;
pub use snapshot::SnapshotInventory;

use crate::error::Result;

/// Value holding an entry's human-readable product name.
pub const DISPLAY_NAME: &str = "DisplayName";

/// Value holding an entry's reported version.
pub const DISPLAY_VERSION: &str = "DisplayVersion";

/// Read-only access to a hierarchical key/value inventory.
pub trait Inventory {
    /// Names of the direct child keys of `path`.
    ///
    /// Fails with `InventoryUnreadable` when the key is absent or denied.
    fn subkeys(&self, path: &str) -> Result<Vec<String>>;

    /// A string value stored on the key at `path`.
    ///
    /// Returns `Ok(None)` when the key exists but has no such value.
    fn value(&self, path: &str, name: &str) -> Result<Option<String>>;
}

/// One installed-software record read during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledEntry {
    /// Product name as shown in the OS "installed programs" list.
    pub display_name: String,
    /// Version string as reported by the installer.
    pub display_version: String,
}

/// Join a child key name onto a parent path.
pub fn join_key(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('\\');
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}\\{}", parent, child)
    }
}

/// Enumerate every child of `root` that carries both a display name and a
/// display version.
///
/// Children that cannot be opened or lack either value are skipped. Only
/// failure to open `root` itself is an error.
pub fn read_entries(inventory: &dyn Inventory, root: &str) -> Result<Vec<InstalledEntry>> {
    let children = inventory.subkeys(root)?;
    let mut entries = Vec::new();

    for child in children {
        let path = join_key(root, &child);
        let name = inventory.value(&path, DISPLAY_NAME);
        let version = inventory.value(&path, DISPLAY_VERSION);
        match (name, version) {
            (Ok(Some(display_name)), Ok(Some(display_version))) => {
                entries.push(InstalledEntry {
                    display_name,
                    display_version,
                });
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::debug!("Skipping inventory key {}: {}", path, e);
            }
            _ => {}
        }
    }

    Ok(entries)
}

/// The inventory backing this platform.
///
/// Windows reads the registry. Elsewhere there is no installed-software
/// registry, so an empty snapshot is returned and every key is unreadable.
pub fn system_inventory() -> Box<dyn Inventory> {
    #[cfg(windows)]
    {
        Box::new(RegistryInventory::new())
    }

    #[cfg(not(windows))]
    {
        tracing::debug!("No system inventory on this platform; using an empty snapshot");
        Box::new(SnapshotInventory::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";

    #[test]
    fn join_key_inserts_separator() {
        assert_eq!(join_key("A\\B", "C"), "A\\B\\C");
        assert_eq!(join_key("A\\B\\", "C"), "A\\B\\C");
        assert_eq!(join_key("", "C"), "C");
    }

    #[test]
    fn read_entries_collects_named_versioned_children() {
        let inv = SnapshotInventory::new()
            .with_key(
                &join_key(ROOT, "{A}"),
                &[
                    (DISPLAY_NAME, "Microsoft Edge WebView2 Runtime"),
                    (DISPLAY_VERSION, "120.0.2210.91"),
                ],
            )
            .with_key(
                &join_key(ROOT, "{B}"),
                &[(DISPLAY_NAME, "Some Tool Without Version")],
            );

        let entries = read_entries(&inv, ROOT).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "Microsoft Edge WebView2 Runtime");
        assert_eq!(entries[0].display_version, "120.0.2210.91");
    }

    #[test]
    fn read_entries_skips_denied_children() {
        let inv = SnapshotInventory::new()
            .with_key(
                &join_key(ROOT, "{A}"),
                &[(DISPLAY_NAME, "Visible"), (DISPLAY_VERSION, "1.0")],
            )
            .with_key(
                &join_key(ROOT, "{B}"),
                &[(DISPLAY_NAME, "Hidden"), (DISPLAY_VERSION, "1.0")],
            )
            .with_denied(&join_key(ROOT, "{B}"));

        let entries = read_entries(&inv, ROOT).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "Visible");
    }

    #[test]
    fn read_entries_fails_on_missing_root() {
        let inv = SnapshotInventory::new();
        assert!(read_entries(&inv, ROOT).is_err());
    }
}
