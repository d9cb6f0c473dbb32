//! Worker configuration for netconn
//!
//! Values are resolved in layers, later layers winning:
//! built-in defaults, then the YAML config file (if one is found), then
//! environment variables. The binary applies its command line flags last.

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default bus endpoint
pub const DEFAULT_NATS_URI: &str = "nats://127.0.0.1:4222";

/// Subjects the worker handles out of the box
pub const DEFAULT_SUBJECTS: [&str; 2] = ["network.create.aws", "network.delete.aws"];

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

pub const ENV_CONFIG_PATH: &str = "NETCONN_CONFIG_PATH";
pub const ENV_NATS_URI: &str = "NATS_URI";
pub const ENV_POLL_INTERVAL_MS: &str = "NETCONN_POLL_INTERVAL_MS";
pub const ENV_MAX_POLL_ATTEMPTS: &str = "NETCONN_MAX_POLL_ATTEMPTS";

const CONFIG_CANDIDATES: [&str; 2] = ["netconn.yaml", ".netconn.yaml"];

/// Resolved worker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// NATS server URL
    pub nats_uri: String,
    /// Subjects to subscribe to
    pub subjects: Vec<String>,
    /// Delay between network interface polls before a subnet delete
    pub poll_interval_ms: u64,
    /// Give up waiting for interfaces after this many polls (`None` waits forever)
    pub max_poll_attempts: Option<u32>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            nats_uri: DEFAULT_NATS_URI.to_string(),
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: None,
        }
    }
}

impl ConnectorConfig {
    /// Defaults, overlaid with the config file if present, then the environment
    pub fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Ok(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            Err(ConfigError::ConfigFileNotFound) => Self::default(),
            Err(e) => return Err(e),
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML config file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `NATS_URI`, `NETCONN_POLL_INTERVAL_MS` and `NETCONN_MAX_POLL_ATTEMPTS`
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(uri) = env_value(ENV_NATS_URI) {
            self.nats_uri = uri;
        }

        if let Some(value) = env_value(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = parse_value(ENV_POLL_INTERVAL_MS, &value)?;
        }

        if let Some(value) = env_value(ENV_MAX_POLL_ATTEMPTS) {
            self.max_poll_attempts = Some(parse_value(ENV_MAX_POLL_ATTEMPTS, &value)?);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.nats_uri.trim().is_empty() {
            return Err(invalid("nats_uri", &self.nats_uri));
        }
        if self.subjects.is_empty() || self.subjects.iter().any(|s| s.trim().is_empty()) {
            return Err(invalid("subjects", &format!("{:?}", self.subjects)));
        }
        if self.poll_interval_ms == 0 {
            return Err(invalid("poll_interval_ms", "0"));
        }
        if self.max_poll_attempts == Some(0) {
            return Err(invalid("max_poll_attempts", "0"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Per-user config directory (~/.config/netconn on Linux)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("netconn"))
}

/// Locate the YAML config file
///
/// Search order:
/// 1. `NETCONN_CONFIG_PATH` (must exist when set)
/// 2. Current directory: netconn.yaml, .netconn.yaml
/// 3. ~/.config/netconn/netconn.yaml
pub fn find_config_file() -> Result<PathBuf> {
    // 1. Explicit path
    if let Some(config_path) = env_value(ENV_CONFIG_PATH) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::ConfigFileMissing(path));
    }

    // 2. Current directory
    let current_dir = std::env::current_dir()?;
    for filename in &CONFIG_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. Global config
    if let Some(config_dir) = get_config_dir() {
        let global_config = config_dir.join("netconn.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const NO_ENV: [(&str, Option<&str>); 4] = [
        (ENV_CONFIG_PATH, None),
        (ENV_NATS_URI, None),
        (ENV_POLL_INTERVAL_MS, None),
        (ENV_MAX_POLL_ATTEMPTS, None),
    ];

    #[test]
    fn test_defaults() {
        let config = ConnectorConfig::default();
        assert_eq!(config.nats_uri, DEFAULT_NATS_URI);
        assert_eq!(
            config.subjects,
            vec!["network.create.aws", "network.delete.aws"]
        );
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.max_poll_attempts, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("netconn.yaml");
        fs::write(&path, "poll_interval_ms: 250\nmax_poll_attempts: 30\n").unwrap();

        let config = ConnectorConfig::from_file(&path).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.max_poll_attempts, Some(30));
        assert_eq!(config.nats_uri, DEFAULT_NATS_URI);
        assert_eq!(config.subjects.len(), 2);
    }

    #[test]
    fn test_bad_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("netconn.yaml");
        fs::write(&path, "subjects: {not: [a list").unwrap();

        match ConnectorConfig::from_file(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.yaml");
        fs::write(
            &path,
            "nats_uri: nats://file:4222\nsubjects: [network.create.aws]\npoll_interval_ms: 500\n",
        )
        .unwrap();

        temp_env::with_vars(
            [
                (ENV_CONFIG_PATH, Some(path.to_str().unwrap())),
                (ENV_NATS_URI, Some("nats://env:4222")),
                (ENV_POLL_INTERVAL_MS, None),
                (ENV_MAX_POLL_ATTEMPTS, Some("5")),
            ],
            || {
                let config = ConnectorConfig::load().unwrap();
                assert_eq!(config.nats_uri, "nats://env:4222");
                assert_eq!(config.subjects, vec!["network.create.aws"]);
                assert_eq!(config.poll_interval_ms, 500);
                assert_eq!(config.max_poll_attempts, Some(5));
            },
        );
    }

    #[test]
    #[serial]
    fn test_invalid_env_value() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        temp_env::with_vars(
            [
                (ENV_CONFIG_PATH, None),
                (ENV_NATS_URI, None),
                (ENV_POLL_INTERVAL_MS, Some("soon")),
                (ENV_MAX_POLL_ATTEMPTS, None),
            ],
            || match ConnectorConfig::load() {
                Err(ConfigError::InvalidValue { key, value }) => {
                    assert_eq!(key, ENV_POLL_INTERVAL_MS);
                    assert_eq!(value, "soon");
                }
                other => panic!("Expected InvalidValue, got {:?}", other),
            },
        );

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join(".netconn.yaml"), "# hidden").unwrap();
        fs::write(temp_dir.path().join("netconn.yaml"), "# visible").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        // netconn.yaml wins over the hidden file
        let result = temp_env::with_vars(NO_ENV, find_config_file).unwrap();
        assert!(result.ends_with("netconn.yaml"));
        assert!(!result.ends_with(".netconn.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_missing_explicit_path() {
        temp_env::with_vars(
            [(ENV_CONFIG_PATH, Some("/nonexistent/netconn.yaml"))],
            || match find_config_file() {
                Err(ConfigError::ConfigFileMissing(path)) => {
                    assert_eq!(path, PathBuf::from("/nonexistent/netconn.yaml"));
                }
                other => panic!("Expected ConfigFileMissing, got {:?}", other),
            },
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ConnectorConfig {
            subjects: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConnectorConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConnectorConfig {
            max_poll_attempts: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
