use crate::runtime::Runtime;

/// Canonical description of the machine the tool is installed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDescriptor {
    /// CPU architecture token as used in asset names (e.g. "amd64").
    pub architecture: String,
    /// Operating system token as used in asset names (e.g. "linux").
    pub platform_os: String,
}

impl HostDescriptor {
    /// Build a descriptor from raw identifiers, normalizing both.
    pub fn from_raw(arch: &str, os: &str) -> Self {
        Self {
            architecture: normalize_arch(arch),
            platform_os: normalize_os(os),
        }
    }

    /// Detect the running host, letting explicit values win over detection.
    pub fn resolve<R: Runtime>(runtime: &R, arch: Option<&str>, os: Option<&str>) -> Self {
        let raw_arch = arch.map(str::to_string).unwrap_or_else(|| runtime.host_arch());
        let raw_os = os.map(str::to_string).unwrap_or_else(|| runtime.host_os());
        Self::from_raw(&raw_arch, &raw_os)
    }

    /// `{os}-{arch}`, the key under which builds for this host are cached.
    pub fn cache_key(&self) -> String {
        format!("{}-{}", self.platform_os, self.architecture)
    }
}

/// Map a raw architecture identifier to the token used in release asset names.
pub fn normalize_arch(raw: &str) -> String {
    let raw = raw.trim().to_lowercase();
    let canonical = match raw.as_str() {
        "x86_64" | "x64" | "amd64" => Some("amd64"),
        "aarch64" | "arm64" => Some("arm64"),
        "x86" | "i386" | "i686" | "ia32" | "386" => Some("386"),
        "powerpc64le" | "ppc64le" | "powerpc64" | "ppc64" => Some("ppc64le"),
        "s390x" => Some("s390x"),
        "arm" | "armv7" | "armv7l" => Some("arm"),
        _ => None,
    };
    canonical.map(str::to_string).unwrap_or(raw)
}

/// Map a raw operating system identifier to the token used in release asset names.
pub fn normalize_os(raw: &str) -> String {
    let raw = raw.trim().to_lowercase();
    let canonical = match raw.as_str() {
        "linux" | "linux-gnu" | "linux-musl" | "linux-gnueabihf" => Some("linux"),
        "macos" | "darwin" | "osx" => Some("darwin"),
        "windows" | "win32" | "msys" | "cygwin" => Some("windows"),
        // `OSTYPE` on macOS carries the kernel version, e.g. "darwin23".
        s if s.starts_with("darwin") => Some("darwin"),
        _ => None,
    };
    canonical.map(str::to_string).unwrap_or(raw)
}
