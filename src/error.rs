//! Error taxonomy surfaced by the version, index, matcher and installer layers.
//!
//! Plumbing (runtime, HTTP, cache) reports `anyhow::Error` with context, and
//! those errors are folded into [`InstallError`] at the installer boundary.

use thiserror::Error;

/// A release tag that cannot be coerced into a semantic version.
///
/// Recoverable: the matcher skips the offending candidate.
#[derive(Debug, Error)]
#[error("invalid version '{raw}'")]
pub struct InvalidVersionError {
    /// The tag exactly as published upstream.
    pub raw: String,
    #[source]
    pub source: semver::Error,
}

/// A user-supplied version specification that is neither a version nor a range.
#[derive(Debug, Error)]
#[error("invalid version specification '{spec}'")]
pub struct InvalidSpecError {
    pub spec: String,
    #[source]
    pub source: semver::Error,
}

/// The release index could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch release index from {url}")]
    Request {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Failures raised while matching releases.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The index answered but listed no releases at all.
    #[error("release index did not return any releases")]
    EmptyIndex,
}

/// The single error type returned by the installer.
#[derive(Debug, Error)]
#[error("failed to install version {spec}")]
pub struct InstallError {
    /// The version specification the caller asked for.
    pub spec: String,
    #[source]
    pub source: anyhow::Error,
}

impl InstallError {
    pub fn new(spec: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            spec: spec.into(),
            source: source.into(),
        }
    }
}
