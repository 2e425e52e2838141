//! Installer configuration assembled from CLI flags, environment and defaults.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::PathBuf;

use crate::asset::AssetTemplate;
use crate::matcher::MatcherOptions;
use crate::provider::RepoId;
use crate::runtime::Runtime;
use crate::version::NormalizePolicy;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REPO: &str = "operator-framework/operator-sdk";
pub const DEFAULT_TOOL: &str = "operator-sdk";

/// Environment variable naming the tool cache root (shared with CI runners).
pub const TOOL_CACHE_ENV: &str = "RUNNER_TOOL_CACHE";

/// Values supplied explicitly by the caller; anything unset falls back to defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub repo: Option<String>,
    pub tool: Option<String>,
    pub cache_dir: Option<PathBuf>,
    pub asset_template: Option<String>,
    pub legacy_prerelease: bool,
    pub skip_empty_assets: bool,
    pub arch: Option<String>,
    pub os: Option<String>,
}

pub struct Config {
    /// Logical tool name; also the cached file name and cache namespace.
    pub tool: String,
    pub repo: RepoId,
    pub api_url: String,
    pub cache_root: PathBuf,
    pub matcher: MatcherOptions,
    pub arch: Option<String>,
    pub os: Option<String>,
    pub client: Client,
}

impl Config {
    pub fn new<R: Runtime>(runtime: &R, overrides: Overrides) -> Result<Self> {
        let repo = overrides
            .repo
            .as_deref()
            .unwrap_or(DEFAULT_REPO)
            .parse::<RepoId>()?;

        let template = match overrides.asset_template.as_deref() {
            Some(t) => t.parse::<AssetTemplate>()?,
            None => AssetTemplate::default(),
        };

        let policy = if overrides.legacy_prerelease {
            NormalizePolicy::PrereleaseMarkers
        } else {
            NormalizePolicy::Strict
        };

        Ok(Self {
            tool: overrides.tool.unwrap_or_else(|| DEFAULT_TOOL.to_string()),
            repo,
            api_url: overrides
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            cache_root: resolve_cache_root(runtime, overrides.cache_dir)?,
            matcher: MatcherOptions {
                template,
                policy,
                skip_empty_assets: overrides.skip_empty_assets,
            },
            arch: overrides.arch,
            os: overrides.os,
            client: build_client(runtime)?,
        })
    }
}

/// Explicit directory, then `RUNNER_TOOL_CACHE`, then the user cache directory.
fn resolve_cache_root<R: Runtime>(runtime: &R, explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Ok(dir) = runtime.env_var(TOOL_CACHE_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    runtime
        .cache_dir()
        .map(|dir| dir.join("sdkup"))
        .context("Could not determine a tool cache directory; pass --cache-dir")
}

fn build_client<R: Runtime>(runtime: &R) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Ok(token) = runtime.env_var("GITHUB_TOKEN")
        && !token.is_empty()
    {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("GITHUB_TOKEN contains invalid header characters")?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("Using GITHUB_TOKEN for authentication: {}", mask(&token));
    }

    Client::builder()
        .user_agent(concat!("sdkup/", env!("SDKUP_VERSION")))
        .default_headers(headers)
        .build()
        .context("Failed to build HTTP client")
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
