//! Version normalization and version specifications.
//!
//! Upstream tags do not reliably follow semantic versioning (`v1.0.0`, `1.13`,
//! `1.10beta1`). [`normalize`] coerces them into strict semver strings so a
//! standard range matcher can be used on them unmodified.

mod spec;

pub use spec::VersionSpec;

use crate::error::InvalidVersionError;

/// Rule set applied by [`normalize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizePolicy {
    /// Strip the `v` prefix and pad `MAJOR.MINOR` to `MAJOR.MINOR.0`.
    #[default]
    Strict,
    /// Like `Strict`, but also rewrite informal pre-release markers:
    /// `1.10beta1` becomes `1.10.0-beta1` and `1.8.5rc1` becomes `1.8.5-rc1`.
    PrereleaseMarkers,
}

/// Normalize a raw tag with the default policy.
pub fn normalize(raw: &str) -> Result<String, InvalidVersionError> {
    normalize_with(raw, NormalizePolicy::default())
}

/// Normalize a raw tag into a strict semantic version string.
pub fn normalize_with(raw: &str, policy: NormalizePolicy) -> Result<String, InvalidVersionError> {
    parse_with(raw, policy).map(|v| v.to_string())
}

/// Normalize a raw tag and return the parsed version.
pub fn parse_with(raw: &str, policy: NormalizePolicy) -> Result<semver::Version, InvalidVersionError> {
    let cleaned = coerce(raw, policy);
    semver::Version::parse(&cleaned).map_err(|source| InvalidVersionError {
        raw: raw.to_string(),
        source,
    })
}

/// Apply the textual rewrites without validating the result.
pub(crate) fn coerce(raw: &str, policy: NormalizePolicy) -> String {
    let trimmed = raw.trim().trim_start_matches('=');
    let mut version = trimmed.strip_prefix('v').unwrap_or(trimmed).to_string();

    if policy == NormalizePolicy::PrereleaseMarkers && !version.contains('-') {
        version = version.replacen("beta", "-beta", 1).replacen("rc", "-rc", 1);
    }

    let split = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(split);

    if core.split('.').count() == 2 {
        format!("{}.0{}", core, suffix)
    } else {
        version
    }
}
