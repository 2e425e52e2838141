//! Versioned on-disk tool cache.
//!
//! Entries live at `{root}/{tool}/{version}/{platform}/`, where `platform` is
//! the host key `{os}-{arch}`, and are only visible once the sibling marker
//! `{root}/{tool}/{version}/{platform}.complete` exists. The cache is
//! append-only: existing entries are never rewritten or removed.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

const COMPLETE_MARKER_EXTENSION: &str = "complete";

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding `tool` at `version` for `platform`.
    pub fn entry_dir(&self, tool: &str, version: &str, platform: &str) -> PathBuf {
        self.root.join(tool).join(version).join(platform)
    }

    fn marker_path(&self, tool: &str, version: &str, platform: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version)
            .join(format!("{}.{}", platform, COMPLETE_MARKER_EXTENSION))
    }

    /// Look up a completed entry.
    #[tracing::instrument(skip(self, runtime))]
    pub fn find<R: Runtime>(
        &self,
        runtime: &R,
        tool: &str,
        version: &str,
        platform: &str,
    ) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version, platform);
        if runtime.exists(&self.marker_path(tool, version, platform)) && runtime.exists(&dir) {
            debug!("Found {} {} in tool cache at {:?}", tool, version, dir);
            Some(dir)
        } else {
            debug!("{} {} ({}) not found in tool cache", tool, version, platform);
            None
        }
    }

    /// Copy `source` into the cache as `target_file` and mark the entry complete.
    ///
    /// Returns the entry directory.
    #[tracing::instrument(skip(self, runtime))]
    pub fn cache_file<R: Runtime>(
        &self,
        runtime: &R,
        source: &Path,
        target_file: &str,
        tool: &str,
        version: &str,
        platform: &str,
    ) -> Result<PathBuf> {
        let dir = self.entry_dir(tool, version, platform);
        debug!("Caching {:?} into {:?}", source, dir);

        runtime
            .create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {:?}", dir))?;

        let dest = dir.join(target_file);
        runtime
            .copy(source, &dest)
            .with_context(|| format!("Failed to copy {:?} into the tool cache", source))?;

        runtime
            .write(&self.marker_path(tool, version, platform), b"")
            .context("Failed to mark tool cache entry complete")?;

        Ok(dir)
    }
}
