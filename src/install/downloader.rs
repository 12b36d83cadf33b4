//! Installer artifact downloads.
//!
//! The orchestrator only sees the [`Downloader`] trait. [`HttpDownloader`]
//! fetches over HTTPS with a blocking client and, when the catalog carries
//! a digest, verifies the artifact before handing back its path.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};

use crate::error::{PreflightError, Result};
use crate::platform::Arch;
use crate::requirements::DependencySpec;

/// Fetches installer artifacts to local disk.
pub trait Downloader {
    /// Download the installer for `spec` built for `arch`.
    ///
    /// Returns the path of the downloaded file.
    fn fetch(&self, spec: &DependencySpec, arch: Arch) -> Result<PathBuf>;
}

/// Default download directory: `<temp>/preflight`.
pub fn default_download_dir() -> PathBuf {
    std::env::temp_dir().join("preflight")
}

/// Downloads installers over HTTP/HTTPS.
///
/// A client that fails to build does not stop the process; every fetch
/// through it then fails with [`PreflightError::DownloadFailed`].
pub struct HttpDownloader {
    client: std::result::Result<Client, String>,
    dir: PathBuf,
    timeout: Duration,
}

impl HttpDownloader {
    /// Create a downloader writing into `dir` with a 10-minute timeout.
    pub fn new(dir: &Path) -> Self {
        Self::with_timeout(dir, Duration::from_secs(600))
    }

    /// Create a downloader with a custom timeout.
    pub fn with_timeout(dir: &Path, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(concat!("preflight/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::warn!("Failed to build HTTP client: {}", e);
                e.to_string()
            });
        Self {
            client,
            dir: dir.to_path_buf(),
            timeout,
        }
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Directory artifacts are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[cfg(test)]
    pub(crate) fn without_client(dir: &Path, reason: &str) -> Self {
        Self {
            client: Err(reason.to_string()),
            dir: dir.to_path_buf(),
            timeout: Duration::from_secs(600),
        }
    }

    fn get(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let client = match &self.client {
            Ok(client) => client,
            Err(reason) => bail!("HTTP client unavailable: {}", reason),
        };
        let response = client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), url);
        }

        Ok(response.bytes()?.to_vec())
    }
}

/// File name an installer is saved under.
pub fn artifact_file_name(spec: &DependencySpec, arch: Arch) -> String {
    format!("{}-{}.exe", spec.kind.key(), arch)
}

/// Check `bytes` against an expected hex SHA-256 digest.
pub fn verify_sha256(spec: &DependencySpec, bytes: &[u8], expected: &str) -> Result<()> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let actual = hex::encode(hasher.finalize());

    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(PreflightError::ChecksumMismatch {
            dependency: spec.display_name.clone(),
            expected: expected.to_lowercase(),
            actual,
        })
    }
}

impl Downloader for HttpDownloader {
    fn fetch(&self, spec: &DependencySpec, arch: Arch) -> Result<PathBuf> {
        let url = spec
            .installer
            .url_for(arch)
            .ok_or_else(|| PreflightError::DownloadFailed {
                dependency: spec.display_name.clone(),
                message: format!("no installer URL for {}", arch),
            })?;

        tracing::info!("Downloading {} from {}", spec.display_name, url);
        let bytes = self.get(url).map_err(|e| PreflightError::DownloadFailed {
            dependency: spec.display_name.clone(),
            message: format!("{:#}", e),
        })?;

        if let Some(expected) = &spec.installer.sha256 {
            verify_sha256(spec, &bytes, expected)?;
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(artifact_file_name(spec, arch));
        fs::write(&path, &bytes)?;
        tracing::debug!("Saved {} bytes to {}", bytes.len(), path.display());

        Ok(path)
    }
}
