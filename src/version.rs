//! Dotted version parsing and the lenient minimum-version comparator.
//!
//! Installed software reports versions in many shapes: `14.38.33135.0`,
//! `6.0.25`, `120.0.2210.91`, `6.0-preview.1`, sometimes with trailing NULs
//! when read out of fixed-size registry buffers. [`is_at_least`] compares
//! two such strings segment by segment without requiring them to have the
//! same number of segments.
//!
//! # Comparison policy
//!
//! - Equal strings are always satisfied.
//! - Segments are compared left to right up to the shorter length. The first
//!   differing segment decides.
//! - When every compared segment is equal the requirement is met, even if
//!   one side has extra segments (`1.2.0` vs `1.2` is met in both directions).
//! - A string that cannot be parsed is treated as met and logged. Blocking
//!   startup over a malformed version string is worse than a missed install.
//!
//! # Example
//!
//! ```
//! use preflight::version::is_at_least;
//!
//! assert!(is_at_least("6.0.0", "6.0.25", "."));
//! assert!(!is_at_least("14.30", "14.29.30133", "."));
//! assert!(is_at_least("1.2", "1.2.9", "."));
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PreflightError, Result};

/// Segment separator used by every catalog entry.
pub const DEFAULT_DELIMITER: &str = ".";

static LEADING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)").expect("static pattern"));

/// An ordered list of numeric version segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionNumber {
    segments: Vec<u64>,
}

impl VersionNumber {
    /// Parse `input` into numeric segments split on `delimiter`.
    ///
    /// Each segment contributes its leading run of digits (`"6-preview"`
    /// becomes `6`). A final segment with no digits is dropped, so `"abc"`
    /// yields an empty version. A non-final segment with no digits, or a
    /// segment too large for `u64`, is an error.
    pub fn parse(input: &str, delimiter: &str) -> Result<Self> {
        let trimmed = input.trim_matches(|c: char| c == '\0' || c.is_whitespace());

        let parts: Vec<&str> = if delimiter.is_empty() {
            vec![trimmed]
        } else {
            trimmed.split(delimiter).collect()
        };
        let last = parts.len().saturating_sub(1);

        let mut segments = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            let Some(digits) = LEADING_DIGITS.captures(part).and_then(|c| c.get(1)) else {
                if index == last {
                    break;
                }
                return Err(PreflightError::VersionParse {
                    input: input.to_string(),
                    message: format!("segment '{}' has no leading digits", part),
                });
            };

            let value = digits
                .as_str()
                .parse::<u64>()
                .map_err(|e| PreflightError::VersionParse {
                    input: input.to_string(),
                    message: format!("segment '{}': {}", part, e),
                })?;
            segments.push(value);
        }

        Ok(Self { segments })
    }

    /// The parsed segments, most significant first.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Whether no segment could be parsed.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `candidate` meets `self` as a minimum.
    ///
    /// Only the common prefix is compared; an equal prefix counts as met.
    pub fn is_satisfied_by(&self, candidate: &VersionNumber) -> bool {
        for (required, found) in self.segments.iter().zip(candidate.segments.iter()) {
            if found < required {
                return false;
            }
            if found > required {
                return true;
            }
        }
        true
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Returns whether `candidate` is newer than, or equal to, `required`.
///
/// Parse failures on either side are logged and reported as met.
pub fn is_at_least(required: &str, candidate: &str, delimiter: &str) -> bool {
    if required == candidate {
        return true;
    }

    let parsed = VersionNumber::parse(required, delimiter)
        .and_then(|req| VersionNumber::parse(candidate, delimiter).map(|cand| (req, cand)));

    match parsed {
        Ok((req, cand)) => req.is_satisfied_by(&cand),
        Err(e) => {
            tracing::warn!("Version conversion failed, assuming requirement met: {}", e);
            true
        }
    }
}
