//! Installation orchestration.
//!
//! `fetch -> match -> select asset -> download -> chmod -> cache`, with every
//! failure folded into a single [`InstallError`] naming the requested spec.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::asset::{HostDescriptor, select_assets};
use crate::cache::ToolCache;
use crate::config::Config;
use crate::download::download_file;
use crate::error::InstallError;
use crate::http::HttpClient;
use crate::matcher::{ReleaseMatch, ReleaseMatcher};
use crate::provider::{GitHubReleaseIndex, ReleaseIndex};
use crate::runtime::Runtime;
use crate::version::VersionSpec;

/// Permission bits applied to the downloaded binary.
const EXECUTABLE_MODE: u32 = 0o755;

pub struct Installer<R: Runtime, I: ReleaseIndex> {
    pub runtime: R,
    pub index: I,
    pub http_client: HttpClient,
    pub matcher: ReleaseMatcher,
    pub cache: ToolCache,
    pub tool: String,
    pub arch: Option<String>,
    pub os: Option<String>,
}

impl<R: Runtime> Installer<R, GitHubReleaseIndex> {
    /// Wire an installer against the GitHub release index described by `config`.
    pub fn from_config(runtime: R, config: Config) -> Self {
        let http_client = HttpClient::new(config.client);
        let index = GitHubReleaseIndex::new(http_client.clone(), &config.api_url, config.repo);

        Self {
            runtime,
            index,
            http_client,
            matcher: ReleaseMatcher::new(config.matcher),
            cache: ToolCache::new(config.cache_root),
            tool: config.tool,
            arch: config.arch,
            os: config.os,
        }
    }
}

impl<R: Runtime, I: ReleaseIndex> Installer<R, I> {
    pub fn host(&self) -> HostDescriptor {
        HostDescriptor::resolve(&self.runtime, self.arch.as_deref(), self.os.as_deref())
    }

    /// Resolve `spec` to a release without downloading anything.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, spec: &str) -> Result<Option<ReleaseMatch>, InstallError> {
        self.find(spec)
            .await
            .map_err(|e| InstallError::new(spec, e))
    }

    /// Install the newest release satisfying `spec` and return the path of the
    /// cached executable, or `None` when no release or binary asset matches.
    #[tracing::instrument(skip(self))]
    pub async fn install(&self, spec: &str) -> Result<Option<PathBuf>, InstallError> {
        self.try_install(spec)
            .await
            .map_err(|e| InstallError::new(spec, e))
    }

    async fn find(&self, spec: &str) -> Result<Option<ReleaseMatch>> {
        let host = self.host();
        debug!(
            "Resolving {} for {}/{}",
            spec, host.platform_os, host.architecture
        );

        let version_spec = VersionSpec::parse(spec)?;
        debug!("Fetching releases from {}", self.index.url());
        let releases = self.index.fetch().await?;
        let found = self.matcher.find_match(&version_spec, &host, &releases)?;

        Ok(found)
    }

    async fn try_install(&self, spec: &str) -> Result<Option<PathBuf>> {
        let Some(found) = self.find(spec).await? else {
            info!("No release of {} matches {}", self.tool, spec);
            return Ok(None);
        };

        let selection = select_assets(&found.release.assets);
        if let Some(signature) = selection.signature {
            debug!("Signature asset available: {}", signature.name);
        }
        let Some(binary) = selection.binary else {
            info!(
                "Release {} has no binary asset for this host",
                found.release.tag
            );
            return Ok(None);
        };

        let version = found.version.to_string();
        let platform = self.host().cache_key();

        if let Some(dir) = self.cache.find(&self.runtime, &self.tool, &version, &platform) {
            info!("{} {} is already cached", self.tool, version);
            return Ok(Some(dir.join(&self.tool)));
        }

        let temp_path = self
            .runtime
            .temp_dir()
            .join(format!("{}-{}-{}", self.tool, version, binary.name));

        let cached = match download_file(
            &self.runtime,
            &binary.download_url,
            &temp_path,
            &self.http_client,
        )
        .await
        {
            Ok(_) => self.cache_download(&temp_path, &version, &platform),
            Err(e) => Err(e),
        };

        // A partial download or an uncached copy must not outlive this call.
        if self.runtime.exists(&temp_path)
            && let Err(e) = self.runtime.remove_file(&temp_path)
        {
            debug!("Failed to remove temporary file {:?}: {}", temp_path, e);
        }

        let dir = cached?;
        let path = dir.join(&self.tool);
        info!("Installed {} {} to {}", self.tool, version, path.display());
        Ok(Some(path))
    }

    fn cache_download(&self, temp_path: &Path, version: &str, platform: &str) -> Result<PathBuf> {
        self.runtime
            .set_permissions(temp_path, EXECUTABLE_MODE)
            .with_context(|| format!("Failed to mark {:?} executable", temp_path))?;

        self.cache
            .cache_file(&self.runtime, temp_path, &self.tool, &self.tool, version, platform)
    }
}
