use crate::domain::DEFAULT_VERSION_REGEX;
use crate::error::{ChangesRefreshError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working and config directories.
pub const CONFIG_FILE_NAME: &str = "changes-refresh.toml";

/// Represents the complete configuration for changes-refresh.
///
/// Contains packager identity, tarball location, version extraction and file naming options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Email written into every changes entry
    #[serde(default)]
    pub author_email: Option<String>,

    /// Regular expression with one capture group applied to the tarball's top-level directory
    #[serde(default = "default_version_regex")]
    pub version_regex: String,

    /// Download URL template; `{package}` is replaced with the package name
    #[serde(default)]
    pub tarball_url: Option<String>,

    #[serde(default)]
    pub files: FilesConfig,
}

/// Returns the default upstream version pattern.
fn default_version_regex() -> String {
    DEFAULT_VERSION_REGEX.to_string()
}

fn default_spec_suffix() -> String {
    ".spec".to_string()
}

fn default_changes_suffix() -> String {
    ".changes".to_string()
}

/// How spec and changes files are named relative to the package.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_spec_suffix")]
    pub spec_suffix: String,

    #[serde(default = "default_changes_suffix")]
    pub changes_suffix: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            spec_suffix: default_spec_suffix(),
            changes_suffix: default_changes_suffix(),
        }
    }
}

impl FilesConfig {
    pub fn spec_path(&self, dir: &Path, package: &str) -> PathBuf {
        dir.join(format!("{}{}", package, self.spec_suffix))
    }

    pub fn changes_path(&self, dir: &Path, package: &str) -> PathBuf {
        dir.join(format!("{}{}", package, self.changes_suffix))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            author_email: None,
            version_regex: default_version_regex(),
            tarball_url: None,
            files: FilesConfig::default(),
        }
    }
}

impl Config {
    /// Expand the tarball URL template for `package`, if one is configured.
    pub fn tarball_url_for(&self, package: &str) -> Option<String> {
        self.tarball_url
            .as_ref()
            .map(|template| template.replace("{package}", package))
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `changes-refresh.toml` in current directory
/// 3. `changes-refresh.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            path
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ChangesRefreshError::config(format!("reading {}: {}", path.display(), e))
    })?;
    toml::from_str(&config_str)
        .map_err(|e| ChangesRefreshError::config(format!("parsing {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version_regex, r".*-([^-]+)");
        assert_eq!(config.author_email, None);
        assert_eq!(config.files.spec_suffix, ".spec");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("author_email = \"me@example.com\"\n").unwrap();
        assert_eq!(config.author_email.as_deref(), Some("me@example.com"));
        assert_eq!(config.version_regex, DEFAULT_VERSION_REGEX);
        assert_eq!(config.files, FilesConfig::default());
    }

    #[test]
    fn test_tarball_url_template() {
        let config = Config {
            tarball_url: Some("https://tarballs.example.org/{package}/{package}-master.tar.gz".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.tarball_url_for("myproj").as_deref(),
            Some("https://tarballs.example.org/myproj/myproj-master.tar.gz")
        );
        assert_eq!(Config::default().tarball_url_for("myproj"), None);
    }

    #[test]
    fn test_file_paths() {
        let files = FilesConfig::default();
        assert_eq!(
            files.spec_path(Path::new("/pkg"), "python-myproj"),
            PathBuf::from("/pkg/python-myproj.spec")
        );
        assert_eq!(
            files.changes_path(Path::new("/pkg"), "python-myproj"),
            PathBuf::from("/pkg/python-myproj.changes")
        );
    }
}
