//! Release matching.
//!
//! Picks the newest release whose normalized tag satisfies a version
//! specification and narrows its assets to those built for the host.

use log::{debug, warn};
use semver::Version;

use crate::asset::{AssetTemplate, HostDescriptor};
use crate::error::MatchError;
use crate::provider::Release;
use crate::version::{self, NormalizePolicy, VersionSpec};

/// Knobs controlling how candidates are evaluated.
#[derive(Debug, Clone, Default)]
pub struct MatcherOptions {
    pub template: AssetTemplate,
    pub policy: NormalizePolicy,
    /// Keep searching when the newest satisfying release has no asset for
    /// the host, instead of accepting it with an empty asset list.
    pub skip_empty_assets: bool,
}

/// A release selected for installation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseMatch {
    /// The normalized version of the release tag.
    pub version: Version,
    /// The release, with assets already filtered to the host.
    pub release: Release,
}

pub struct ReleaseMatcher {
    options: MatcherOptions,
}

impl ReleaseMatcher {
    pub fn new(options: MatcherOptions) -> Self {
        Self { options }
    }

    /// Substring an asset name must contain to be considered for `host`.
    pub fn asset_filter(&self, host: &HostDescriptor) -> String {
        self.options.template.render(host)
    }

    /// Find the first release, in the order given, that satisfies `spec`.
    ///
    /// `releases` must be ordered newest-first; it is not re-sorted. Tags that
    /// cannot be normalized are skipped with a warning.
    pub fn find_match(
        &self,
        spec: &VersionSpec,
        host: &HostDescriptor,
        releases: &[Release],
    ) -> Result<Option<ReleaseMatch>, MatchError> {
        if releases.is_empty() {
            return Err(MatchError::EmptyIndex);
        }

        let asset_filter = self.asset_filter(host);
        debug!("assetFilter used - \"{}\"", asset_filter);

        for candidate in releases {
            let version = match version::parse_with(&candidate.tag, self.options.policy) {
                Ok(version) => version,
                Err(e) => {
                    warn!("Skipping release {}: {}", candidate.tag, e);
                    continue;
                }
            };

            debug!("check {} satisfies {}", version, spec);
            if !spec.matches(&version) {
                continue;
            }

            let release = candidate.with_assets_filtered(|a| a.name.contains(&asset_filter));

            if release.assets.is_empty() {
                if self.options.skip_empty_assets {
                    debug!("{} has no asset matching \"{}\", skipping", version, asset_filter);
                    continue;
                }
                warn!(
                    "Release {} satisfies {} but has no asset matching \"{}\"",
                    candidate.tag, spec, asset_filter
                );
            }

            debug!("matched {}", version);
            return Ok(Some(ReleaseMatch { version, release }));
        }

        Ok(None)
    }
}

impl Default for ReleaseMatcher {
    fn default() -> Self {
        Self::new(MatcherOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ReleaseAsset;

    fn linux_amd64() -> HostDescriptor {
        HostDescriptor {
            architecture: "amd64".into(),
            platform_os: "linux".into(),
        }
    }

    fn release(tag: &str, assets: &[&str]) -> Release {
        Release {
            tag: tag.into(),
            assets: assets
                .iter()
                .map(|name| ReleaseAsset {
                    name: name.to_string(),
                    download_url: format!("https://example.com/{}/{}", tag, name),
                })
                .collect(),
        }
    }

    fn spec(s: &str) -> VersionSpec {
        VersionSpec::parse(s).unwrap()
    }

    #[test]
    fn test_newest_satisfying_release_wins() {
        let releases = vec![
            release("v2.0.0", &["tool_linux_amd64"]),
            release("v1.9.0", &["tool_linux_amd64"]),
            release("v1.8.0", &["tool_linux_amd64"]),
        ];

        let found = ReleaseMatcher::default()
            .find_match(&spec("^1.8.0"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        assert_eq!(found.release.tag, "v1.9.0");
        assert_eq!(found.version, Version::new(1, 9, 0));
    }

    #[test]
    fn test_iteration_order_is_trusted() {
        // Out-of-order input: the first satisfying candidate wins, not the highest.
        let releases = vec![
            release("v1.8.0", &["tool_linux_amd64"]),
            release("v1.9.0", &["tool_linux_amd64"]),
        ];

        let found = ReleaseMatcher::default()
            .find_match(&spec("^1.8.0"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        assert_eq!(found.release.tag, "v1.8.0");
    }

    #[test]
    fn test_exact_spec() {
        let releases = vec![
            release("v1.9.0", &["tool_linux_amd64"]),
            release("1.8", &["tool_linux_amd64"]),
        ];

        let found = ReleaseMatcher::default()
            .find_match(&spec("1.8.0"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        assert_eq!(found.release.tag, "1.8");
        assert_eq!(found.version.to_string(), "1.8.0");
    }

    #[test]
    fn test_malformed_tag_is_skipped() {
        let releases = vec![
            release("nightly", &["tool_linux_amd64"]),
            release("v1.10beta1", &["tool_linux_amd64"]),
            release("v1.9.0", &["tool_linux_amd64"]),
        ];

        let found = ReleaseMatcher::default()
            .find_match(&spec(">=1.0.0"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        assert_eq!(found.release.tag, "v1.9.0");
    }

    #[test]
    fn test_prerelease_markers_policy_reads_informal_tags() {
        let matcher = ReleaseMatcher::new(MatcherOptions {
            policy: NormalizePolicy::PrereleaseMarkers,
            ..Default::default()
        });
        let releases = vec![release("1.10beta1", &["tool_linux_amd64"])];

        let found = matcher
            .find_match(&spec("1.10.0-beta1"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        assert_eq!(found.version.to_string(), "1.10.0-beta1");
    }

    #[test]
    fn test_assets_are_filtered_to_host() {
        let releases = vec![release("v1.0.0", &["tool_linux_amd64", "tool_darwin_amd64"])];

        let found = ReleaseMatcher::default()
            .find_match(&spec("1.0.0"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        let names: Vec<_> = found.release.assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["tool_linux_amd64"]);
    }

    #[test]
    fn test_legacy_template_puts_arch_first() {
        let matcher = ReleaseMatcher::new(MatcherOptions {
            template: AssetTemplate::legacy(),
            ..Default::default()
        });
        assert_eq!(matcher.asset_filter(&linux_amd64()), "amd64-linux");

        // Raw target triples never contain the normalized tokens.
        let releases = vec![release(
            "v0.19.0",
            &["operator-sdk-v0.19.0-x86_64-linux-gnu"],
        )];
        let found = matcher
            .find_match(&spec("0.19.x"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();
        assert!(found.release.assets.is_empty());
    }

    #[test]
    fn test_literal_template_matches_target_triples() {
        let matcher = ReleaseMatcher::new(MatcherOptions {
            template: "x86_64-{platform}".parse().unwrap(),
            ..Default::default()
        });
        let releases = vec![release(
            "v0.19.0",
            &[
                "operator-sdk-v0.19.0-x86_64-linux-gnu",
                "operator-sdk-v0.19.0-x86_64-linux-gnu.asc",
                "operator-sdk-v0.19.0-x86_64-apple-darwin",
            ],
        )];

        let found = matcher
            .find_match(&spec("0.19.x"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        let names: Vec<_> = found.release.assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "operator-sdk-v0.19.0-x86_64-linux-gnu",
                "operator-sdk-v0.19.0-x86_64-linux-gnu.asc",
            ]
        );
    }

    #[test]
    fn test_zero_matching_assets_is_still_a_match_by_default() {
        let releases = vec![
            release("v1.9.0", &["tool_windows_amd64.exe"]),
            release("v1.8.0", &["tool_linux_amd64"]),
        ];

        let found = ReleaseMatcher::default()
            .find_match(&spec("^1.8.0"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        assert_eq!(found.release.tag, "v1.9.0");
        assert!(found.release.assets.is_empty());
    }

    #[test]
    fn test_skip_empty_assets_keeps_searching() {
        let matcher = ReleaseMatcher::new(MatcherOptions {
            skip_empty_assets: true,
            ..Default::default()
        });
        let releases = vec![
            release("v1.9.0", &["tool_windows_amd64.exe"]),
            release("v1.8.0", &["tool_linux_amd64"]),
        ];

        let found = matcher
            .find_match(&spec("^1.8.0"), &linux_amd64(), &releases)
            .unwrap()
            .unwrap();

        assert_eq!(found.release.tag, "v1.8.0");
    }

    #[test]
    fn test_no_satisfying_release() {
        let releases = vec![release("v2.0.0", &[]), release("v1.0.0", &[])];

        let found = ReleaseMatcher::default()
            .find_match(&spec("^3"), &linux_amd64(), &releases)
            .unwrap();

        assert!(found.is_none());
    }

    #[test]
    fn test_empty_release_list_is_an_error() {
        let result = ReleaseMatcher::default().find_match(&spec("*"), &linux_amd64(), &[]);
        assert!(matches!(result, Err(MatchError::EmptyIndex)));
    }
}
