use crate::domain::commit::short_hash;
use crate::error::{ChangesRefreshError, Result};
use regex::Regex;

/// Default pattern pulling the upstream version out of a tarball's
/// top-level directory name (e.g. `myproj-2.3.1` -> `2.3.1`).
pub const DEFAULT_VERSION_REGEX: &str = r".*-([^-]+)";

/// Version string written into the spec file's `Version:` field.
///
/// Renders as `<upstream>+git.<epoch>.<short hash>`, or just `<upstream>`
/// when no upstream commit is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub upstream: String,
    pub epoch: i64,
    pub commit_prefix: Option<String>,
}

impl PackageVersion {
    /// Build a version for the given upstream release and newest commit.
    ///
    /// The commit is abbreviated to seven characters.
    pub fn new(upstream: impl Into<String>, epoch: i64, commit: Option<&str>) -> Self {
        PackageVersion {
            upstream: upstream.into(),
            epoch,
            commit_prefix: commit.map(|c| short_hash(c).to_string()),
        }
    }

    /// Parse a `<upstream>+git.<epoch>.<prefix>` version string.
    ///
    /// Returns `None` for version strings that do not follow the convention.
    pub fn parse(value: &str) -> Option<Self> {
        let re = Regex::new(r"^(.+)\+git\.(\d+)\.([0-9a-fA-F]+)$").ok()?;
        let captures = re.captures(value.trim())?;

        let upstream = captures.get(1)?.as_str().to_string();
        let epoch = captures.get(2)?.as_str().parse::<i64>().ok()?;
        let commit_prefix = captures.get(3)?.as_str().to_string();

        Some(PackageVersion {
            upstream,
            epoch,
            commit_prefix: Some(commit_prefix),
        })
    }
}

impl std::fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.commit_prefix {
            Some(prefix) => write!(f, "{}+git.{}.{}", self.upstream, self.epoch, prefix),
            None => write!(f, "{}", self.upstream),
        }
    }
}

/// Extract the upstream version from a tarball's top-level directory name.
///
/// The pattern must compile, declare exactly one capture group and match the
/// directory name exactly once.
///
/// # Example
/// ```ignore
/// assert_eq!(extract_upstream_version(r".*-([^-]+)", "myproj-2.3.1")?, "2.3.1");
/// assert!(extract_upstream_version(r".*-([^-]+)", "myproj").is_err());
/// ```
pub fn extract_upstream_version(pattern: &str, dir_name: &str) -> Result<String> {
    let re = Regex::new(pattern).map_err(|e| {
        ChangesRefreshError::version_pattern(format!("invalid pattern '{}': {}", pattern, e))
    })?;

    // captures_len() counts the implicit whole-match group.
    let groups = re.captures_len() - 1;
    if groups != 1 {
        return Err(ChangesRefreshError::version_pattern(format!(
            "pattern '{}' must have exactly one capture group, found {}",
            pattern, groups
        )));
    }

    let matches: Vec<_> = re.captures_iter(dir_name).collect();
    let captures = match matches.as_slice() {
        [] => {
            return Err(ChangesRefreshError::version_pattern(format!(
                "pattern '{}' does not match '{}'",
                pattern, dir_name
            )))
        }
        [single] => single,
        _ => {
            return Err(ChangesRefreshError::version_pattern(format!(
                "pattern '{}' matches '{}' {} times, expected once",
                pattern,
                dir_name,
                matches.len()
            )))
        }
    };

    match captures.get(1).map(|m| m.as_str()) {
        Some(version) if !version.is_empty() => Ok(version.to_string()),
        _ => Err(ChangesRefreshError::version_pattern(format!(
            "pattern '{}' captured no version from '{}'",
            pattern, dir_name
        ))),
    }
}
