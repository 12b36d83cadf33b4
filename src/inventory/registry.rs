//! Windows registry inventory.
//!
//! Reads `HKEY_LOCAL_MACHINE` through the 64-bit registry view so that a
//! 32-bit build of the installer still sees native registrations. The
//! `Wow6432Node` mirror is enumerated as its own root by the scanner.

use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_64KEY};
use winreg::RegKey;

use crate::error::{PreflightError, Result};

use super::Inventory;

/// Inventory backed by `HKEY_LOCAL_MACHINE`.
pub struct RegistryInventory {
    hive: RegKey,
}

impl RegistryInventory {
    /// Open the local machine hive.
    pub fn new() -> Self {
        Self {
            hive: RegKey::predef(HKEY_LOCAL_MACHINE),
        }
    }

    fn open(&self, path: &str) -> Result<RegKey> {
        self.hive
            .open_subkey_with_flags(path, KEY_READ | KEY_WOW64_64KEY)
            .map_err(|e| PreflightError::InventoryUnreadable {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}

impl Default for RegistryInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl Inventory for RegistryInventory {
    fn subkeys(&self, path: &str) -> Result<Vec<String>> {
        let key = self.open(path)?;
        Ok(key.enum_keys().filter_map(|k| k.ok()).collect())
    }

    fn value(&self, path: &str, name: &str) -> Result<Option<String>> {
        let key = self.open(path)?;
        match key.get_value::<String, _>(name) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                tracing::debug!("Unreadable value {}\\{}: {}", path, name, e);
                Ok(None)
            }
        }
    }
}
