use std::fmt;
use std::str::FromStr;

use super::HostDescriptor;

const ARCH: &str = "{arch}";
const PLATFORM: &str = "{platform}";

/// Pattern rendered into the substring a host-specific asset name contains.
///
/// Upstream changed its naming convention between releases, so the pattern is
/// configuration: `{platform}_{arch}` matches `operator-sdk_linux_amd64`.
/// The placeholders always expand to normalized tokens, so the legacy
/// `{arch}-{platform}` renders `amd64-linux`. Assets named after raw target
/// triples (`operator-sdk-v0.19.0-x86_64-linux-gnu`) need a template with the
/// raw part spelled out literally, e.g. `x86_64-{platform}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTemplate(String);

impl AssetTemplate {
    pub const CURRENT: &'static str = "{platform}_{arch}";
    pub const LEGACY: &'static str = "{arch}-{platform}";

    pub fn legacy() -> Self {
        Self(Self::LEGACY.to_string())
    }

    /// Substitute the host tokens into the template.
    pub fn render(&self, host: &HostDescriptor) -> String {
        self.0
            .replace(ARCH, &host.architecture)
            .replace(PLATFORM, &host.platform_os)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AssetTemplate {
    fn default() -> Self {
        Self(Self::CURRENT.to_string())
    }
}

impl FromStr for AssetTemplate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains(ARCH) && !s.contains(PLATFORM) {
            anyhow::bail!(
                "Invalid asset template '{}'. Expected at least one of {} or {}.",
                s,
                ARCH,
                PLATFORM
            );
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for AssetTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
