//! Release index abstraction.
//!
//! A release index lists every published release of the tool together with
//! its downloadable assets. Releases are returned newest-first, the order in
//! which the upstream API publishes them; consumers rely on that order.

mod github;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

pub use github::GitHubReleaseIndex;

/// Repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            anyhow::bail!("Invalid repository format. Expected 'owner/repo'.")
        } else {
            Ok(RepoId {
                owner: parts[0].to_string(),
                repo: parts[1].to_string(),
            })
        }
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
}

/// One published version of the tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Release {
    /// Version tag exactly as published (e.g. "v1.0.0", "1.13").
    pub tag: String,
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Build a new release with the same tag and only the assets accepted by `keep`.
    pub fn with_assets_filtered<F>(&self, keep: F) -> Release
    where
        F: Fn(&ReleaseAsset) -> bool,
    {
        Release {
            tag: self.tag.clone(),
            assets: self.assets.iter().filter(|a| keep(a)).cloned().collect(),
        }
    }
}

/// Source of the full release list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReleaseIndex: Send + Sync {
    /// Location of the index, used in diagnostics.
    fn url(&self) -> String;

    /// Fetch every release, newest-first.
    ///
    /// A reachable index with no releases yields an empty vector.
    async fn fetch(&self) -> Result<Vec<Release>, FetchError>;
}
