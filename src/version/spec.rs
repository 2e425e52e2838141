//! User-facing version specifications.
//!
//! A specification is either a literal version (`1.9.0`, `v1.9.0`), matched by
//! equality, or a range. Ranges accept the npm-style dialect used by setup
//! actions (`^1.8.0`, `1.x`, `>=1.2 <2`, `1.2.3 - 1.4`, `~1.3 || ^2`) and are
//! translated into `semver::VersionReq` alternatives.

use semver::{Version, VersionReq};
use std::fmt;
use std::str::FromStr;

use crate::error::InvalidSpecError;

#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpec {
    Exact { raw: String, version: Version },
    Range { raw: String, alternatives: Vec<VersionReq> },
}

impl VersionSpec {
    pub fn parse(raw: &str) -> Result<Self, InvalidSpecError> {
        let trimmed = raw.trim();
        let literal = trimmed.trim_start_matches('=');
        let literal = literal.strip_prefix('v').unwrap_or(literal);

        if let Ok(version) = Version::parse(literal) {
            return Ok(VersionSpec::Exact {
                raw: raw.to_string(),
                version,
            });
        }

        let alternatives = trimmed
            .split("||")
            .map(|alt| {
                VersionReq::parse(&translate(alt)).map_err(|source| InvalidSpecError {
                    spec: raw.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VersionSpec::Range {
            raw: raw.to_string(),
            alternatives,
        })
    }

    /// Whether `version` satisfies this specification.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionSpec::Exact { version: wanted, .. } => {
                // Build metadata does not participate in precedence.
                wanted.major == version.major
                    && wanted.minor == version.minor
                    && wanted.patch == version.patch
                    && wanted.pre == version.pre
            }
            VersionSpec::Range { alternatives, .. } => {
                alternatives.iter().any(|req| req.matches(version))
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            VersionSpec::Exact { raw, .. } | VersionSpec::Range { raw, .. } => raw,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, VersionSpec::Exact { .. })
    }
}

impl FromStr for VersionSpec {
    type Err = InvalidSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionSpec::parse(s)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const OPERATOR_CHARS: &[char] = &['<', '>', '=', '~', '^'];

/// Translate one `||` alternative into `semver::VersionReq` syntax.
fn translate(alternative: &str) -> String {
    let alternative = alternative.trim();
    if alternative.is_empty() {
        return "*".to_string();
    }
    if alternative.contains(',') {
        return alternative.to_string();
    }

    let tokens: Vec<&str> = alternative.split_whitespace().collect();

    if let [low, "-", high] = tokens.as_slice() {
        return format!(
            ">={}, <={}",
            partial_version(low.trim_start_matches('v')),
            partial_version(high.trim_start_matches('v'))
        );
    }

    // `>= 1.2.3` is a single comparator with a stray space.
    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for token in tokens {
        if token.chars().all(|c| OPERATOR_CHARS.contains(&c)) {
            pending_op.push_str(token);
            continue;
        }
        comparators.push(comparator(&format!("{}{}", pending_op, token)));
        pending_op.clear();
    }

    if comparators.iter().any(|c| c == "*") && comparators.len() > 1 {
        comparators.retain(|c| c != "*");
    }

    comparators.join(", ")
}

fn comparator(token: &str) -> String {
    let version_start = token.find(|c| !OPERATOR_CHARS.contains(&c)).unwrap_or(token.len());
    let (op, version) = token.split_at(version_start);
    let version = partial_version(version.strip_prefix('v').unwrap_or(version));

    if version == "*" {
        return version;
    }

    let op = if op.is_empty() { "=" } else { op };
    format!("{}{}", op, version)
}

/// Drop wildcard components: `1.x` -> `1`, `1.2.*` -> `1.2`, `x` -> `*`.
fn partial_version(version: &str) -> String {
    let kept: Vec<&str> = version
        .split('.')
        .take_while(|part| !matches!(*part, "x" | "X" | "*" | ""))
        .collect();

    if kept.is_empty() {
        "*".to_string()
    } else {
        kept.join(".")
    }
}
