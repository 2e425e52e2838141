//! GitHub Releases implementation of the release index.

use async_trait::async_trait;
use log::debug;

use crate::error::FetchError;
use crate::http::HttpClient;

use super::{Release, ReleaseAsset, ReleaseIndex, RepoId};

/// Releases per page requested from the API (its maximum).
const PER_PAGE: usize = 100;

/// Upper bound on pages fetched, to prevent an infinite loop.
const MAX_PAGES: usize = 10;

/// GitHub API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub tag_name: String,
        #[serde(default)]
        pub assets: Vec<Asset>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Asset {
        pub name: String,
        pub browser_download_url: String,
    }
}

/// Release index backed by `GET {api_url}/repos/{owner}/{repo}/releases`.
pub struct GitHubReleaseIndex {
    http_client: HttpClient,
    api_url: String,
    repo: RepoId,
}

impl GitHubReleaseIndex {
    pub fn new(http_client: HttpClient, api_url: &str, repo: RepoId) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
        }
    }

    fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url, self.repo.owner, self.repo.repo
        )
    }

    async fn fetch_pages(&self, url: &str) -> anyhow::Result<Vec<api::Release>> {
        let mut releases = Vec::new();
        let per_page = PER_PAGE.to_string();

        for page in 1..=MAX_PAGES {
            debug!("Fetching releases page {} from {}...", page, url);

            let parsed: Vec<api::Release> = self
                .http_client
                .get_json_with_query(
                    url,
                    &[("per_page", per_page.as_str()), ("page", page.to_string().as_str())],
                )
                .await?;

            let len = parsed.len();
            releases.extend(parsed);

            if len < PER_PAGE {
                break;
            }
        }

        Ok(releases)
    }
}

#[async_trait]
impl ReleaseIndex for GitHubReleaseIndex {
    fn url(&self) -> String {
        self.releases_url()
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self) -> Result<Vec<Release>, FetchError> {
        let url = self.releases_url();
        let releases = self
            .fetch_pages(&url)
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        debug!("Fetched {} release(s) from {}", releases.len(), url);
        Ok(releases.into_iter().map(Release::from).collect())
    }
}

impl From<api::Release> for Release {
    fn from(r: api::Release) -> Self {
        Release {
            tag: r.tag_name,
            assets: r.assets.into_iter().map(ReleaseAsset::from).collect(),
        }
    }
}

impl From<api::Asset> for ReleaseAsset {
    fn from(a: api::Asset) -> Self {
        ReleaseAsset {
            name: a.name,
            download_url: a.browser_download_url,
        }
    }
}
