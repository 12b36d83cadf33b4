//! The catalog of required runtime dependencies.
//!
//! Each entry is declarative: what the dependency is called, the minimum
//! version, how to find it in the inventory, and how to install it. The
//! scanner and orchestrator iterate entries uniformly; nothing outside this
//! file knows which kind is matched by which substring.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::DependencyOverride;
use crate::error::{PreflightError, Result};
use crate::platform::Arch;
use crate::version::DEFAULT_DELIMITER;

/// Uninstall keys enumerated for installed software, native view first.
pub const DEFAULT_INVENTORY_ROOTS: &[&str] = &[
    r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
    r"SOFTWARE\Wow6432Node\Microsoft\Windows\CurrentVersion\Uninstall",
];

/// The fixed set of runtime components the application depends on.
///
/// Declaration order is install order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyKind {
    /// Visual C++ 2015-2022 redistributable.
    NativeRuntime,
    /// Microsoft Edge WebView2 runtime.
    WebViewRuntime,
    /// .NET Windows Desktop runtime (x64).
    DesktopRuntime,
    /// ASP.NET Core runtime.
    AspCoreRuntime,
}

impl DependencyKind {
    /// Every kind, in install order.
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::NativeRuntime,
        DependencyKind::WebViewRuntime,
        DependencyKind::DesktopRuntime,
        DependencyKind::AspCoreRuntime,
    ];

    /// Stable key used in config files and log lines.
    pub fn key(&self) -> &'static str {
        match self {
            DependencyKind::NativeRuntime => "vc",
            DependencyKind::WebViewRuntime => "webview",
            DependencyKind::DesktopRuntime => "desktop-runtime",
            DependencyKind::AspCoreRuntime => "aspcore",
        }
    }

    /// Look up a kind by its config key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(key))
    }

    /// The check-only category this kind belongs to.
    pub fn category(&self) -> Category {
        match self {
            DependencyKind::NativeRuntime => Category::NativeRuntime,
            _ => Category::DotNet,
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Groups of kinds that can be verified on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// The C++ redistributable only.
    NativeRuntime,
    /// All .NET components.
    DotNet,
}

impl Category {
    /// The kinds in this category, in install order.
    pub fn kinds(&self) -> Vec<DependencyKind> {
        DependencyKind::ALL
            .into_iter()
            .filter(|k| k.category() == *self)
            .collect()
    }

    /// Human-readable category name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::NativeRuntime => "C++ runtime",
            Category::DotNet => ".NET runtimes",
        }
    }
}

/// Substring rule applied to an inventory display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatcher {
    all_of: Vec<String>,
}

impl NameMatcher {
    /// Match names containing every one of `needles` (case-sensitive).
    pub fn all_of<S: Into<String>>(needles: impl IntoIterator<Item = S>) -> Self {
        Self {
            all_of: needles.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `display_name` satisfies the rule.
    ///
    /// A matcher with no needles matches nothing.
    pub fn matches(&self, display_name: &str) -> bool {
        !self.all_of.is_empty() && self.all_of.iter().all(|n| display_name.contains(n.as_str()))
    }

    /// The substrings that must all be present.
    pub fn needles(&self) -> &[String] {
        &self.all_of
    }
}

/// How a dependency is located in the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// A single well-known key whose value holds the installed version.
    CanonicalValue { key: String, value: String },
    /// Enumerated uninstall entries whose display name matches.
    DisplayName(NameMatcher),
}

/// Where to fetch an installer and how to run it silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerSource {
    urls: BTreeMap<Arch, String>,
    /// Arguments that run the installer without UI.
    pub args: Vec<String>,
    /// Expected SHA-256 of the artifact, hex encoded.
    pub sha256: Option<String>,
}

impl InstallerSource {
    /// Create a source from per-architecture URLs.
    pub fn new(urls: &[(Arch, &str)], args: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|(a, u)| (*a, u.to_string())).collect(),
            args: args.iter().map(|a| a.to_string()).collect(),
            sha256: None,
        }
    }

    /// URL for `arch`, falling back to the x64 artifact.
    pub fn url_for(&self, arch: Arch) -> Option<&str> {
        self.urls
            .get(&arch)
            .or_else(|| self.urls.get(&Arch::X64))
            .map(String::as_str)
    }

    /// Replace every architecture's URL with one.
    pub fn set_url(&mut self, url: &str) {
        self.urls.clear();
        self.urls.insert(Arch::X64, url.to_string());
    }
}

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Which dependency this is.
    pub kind: DependencyKind,
    /// Name shown to the operator.
    pub display_name: String,
    /// Minimum acceptable version.
    pub min_version: String,
    /// Separator used when comparing versions.
    pub delimiter: String,
    /// How to find the installed version.
    pub probe: Probe,
    /// How to remediate.
    pub installer: InstallerSource,
}

/// The ordered table of required dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<DependencySpec>,
}

impl Catalog {
    /// Built-in requirements of the guarded application.
    pub fn builtin() -> Self {
        let silent = ["/install", "/quiet", "/norestart"];

        let entries = vec![
            DependencySpec {
                kind: DependencyKind::NativeRuntime,
                display_name: "C++ Redistributable 2015-2022".to_string(),
                min_version: "14.29.30133".to_string(),
                delimiter: DEFAULT_DELIMITER.to_string(),
                probe: Probe::CanonicalValue {
                    key: r"SOFTWARE\Microsoft\DevDiv\VC\Servicing\14.0\RuntimeMinimum".to_string(),
                    value: "Version".to_string(),
                },
                installer: InstallerSource::new(
                    &[
                        (Arch::X64, "https://aka.ms/vs/17/release/vc_redist.x64.exe"),
                        (Arch::X86, "https://aka.ms/vs/17/release/vc_redist.x86.exe"),
                        (Arch::Arm64, "https://aka.ms/vs/17/release/vc_redist.arm64.exe"),
                    ],
                    &silent,
                ),
            },
            DependencySpec {
                kind: DependencyKind::WebViewRuntime,
                display_name: "WebView2 Runtime".to_string(),
                min_version: "92.0.902.67".to_string(),
                delimiter: DEFAULT_DELIMITER.to_string(),
                probe: Probe::DisplayName(NameMatcher::all_of(["WebView2"])),
                installer: InstallerSource::new(
                    &[(Arch::X64, "https://go.microsoft.com/fwlink/p/?LinkId=2124703")],
                    &["/silent", "/install"],
                ),
            },
            DependencySpec {
                kind: DependencyKind::DesktopRuntime,
                display_name: ".NET Desktop Runtime".to_string(),
                min_version: "6.0.0".to_string(),
                delimiter: DEFAULT_DELIMITER.to_string(),
                probe: Probe::DisplayName(NameMatcher::all_of(["Desktop Runtime", "x64"])),
                installer: InstallerSource::new(
                    &[
                        (Arch::X64, "https://aka.ms/dotnet/6.0/windowsdesktop-runtime-win-x64.exe"),
                        (Arch::X86, "https://aka.ms/dotnet/6.0/windowsdesktop-runtime-win-x86.exe"),
                        (Arch::Arm64, "https://aka.ms/dotnet/6.0/windowsdesktop-runtime-win-arm64.exe"),
                    ],
                    &silent,
                ),
            },
            DependencySpec {
                kind: DependencyKind::AspCoreRuntime,
                display_name: "ASP.NET Core Runtime".to_string(),
                min_version: "6.0.0".to_string(),
                delimiter: DEFAULT_DELIMITER.to_string(),
                probe: Probe::DisplayName(NameMatcher::all_of(["ASP.NET Core 6"])),
                installer: InstallerSource::new(
                    &[
                        (Arch::X64, "https://aka.ms/dotnet/6.0/aspnetcore-runtime-win-x64.exe"),
                        (Arch::X86, "https://aka.ms/dotnet/6.0/aspnetcore-runtime-win-x86.exe"),
                        (Arch::Arm64, "https://aka.ms/dotnet/6.0/aspnetcore-runtime-win-arm64.exe"),
                    ],
                    &silent,
                ),
            },
        ];

        Self { entries }
    }

    /// Build a catalog from explicit entries (sorted into install order).
    pub fn from_entries(mut entries: Vec<DependencySpec>) -> Self {
        entries.sort_by_key(|e| e.kind);
        Self { entries }
    }

    /// Entry for `kind`, if the catalog carries it.
    pub fn get(&self, kind: DependencyKind) -> Option<&DependencySpec> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// All entries in install order.
    pub fn iter(&self) -> impl Iterator<Item = &DependencySpec> {
        self.entries.iter()
    }

    /// Apply config overrides keyed by dependency key.
    ///
    /// Unknown keys are rejected so typos do not silently fall back to
    /// built-in values.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, DependencyOverride>) -> Result<()> {
        for (key, ov) in overrides {
            let kind = DependencyKind::from_key(key).ok_or_else(|| {
                PreflightError::Other(anyhow::anyhow!(
                    "Unknown dependency '{}' in config (expected one of: {})",
                    key,
                    DependencyKind::ALL.map(|k| k.key()).join(", ")
                ))
            })?;
            let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) else {
                continue;
            };

            if let Some(min) = &ov.min_version {
                entry.min_version = min.clone();
            }
            if let Some(url) = &ov.url {
                entry.installer.set_url(url);
            }
            if let Some(sha) = &ov.sha256 {
                entry.installer.sha256 = Some(sha.to_lowercase());
            }
            if let Some(args) = &ov.args {
                entry.installer.args = args.clone();
            }
            if let Some(needles) = &ov.match_all {
                if let Probe::DisplayName(_) = entry.probe {
                    entry.probe = Probe::DisplayName(NameMatcher::all_of(needles.iter().cloned()));
                } else {
                    tracing::warn!(
                        "Ignoring match_all for '{}': it is located by a fixed inventory key",
                        key
                    );
                }
            }
            tracing::debug!("Applied config overrides to '{}'", key);
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
