use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Remote users resource settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Session log settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

/// Partial config as read from one file; unset keys leave lower layers alone.
#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigLayer {
    #[serde(default)]
    api: ApiLayer,
    #[serde(default)]
    session: SessionLayer,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ApiLayer {
    base_url: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct SessionLayer {
    enabled: Option<bool>,
    dir: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: local (.userdeck/config.local.toml) > project (.userdeck/config.toml) > user (~/.userdeck/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".userdeck").join("config.toml");
            if user_config.exists() {
                config.merge_file(&user_config)?;
            }
        }

        let project_config = Path::new(".userdeck").join("config.toml");
        if project_config.exists() {
            config.merge_file(&project_config)?;
        }

        // Should be gitignored
        let local_config = Path::new(".userdeck").join("config.local.toml");
        if local_config.exists() {
            config.merge_file(&local_config)?;
        }

        Ok(config)
    }

    /// Load configuration from a specific path on top of the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        self.merge_str(&content)
    }

    fn merge_str(&mut self, content: &str) -> Result<()> {
        let layer: ConfigLayer = toml::from_str(content)?;
        self.merge(layer);
        Ok(())
    }

    /// Merge another layer into this one (the layer takes priority where set)
    fn merge(&mut self, other: ConfigLayer) {
        if let Some(base_url) = other.api.base_url {
            self.api.base_url = base_url;
        }
        if let Some(timeout_ms) = other.api.timeout_ms {
            self.api.timeout_ms = timeout_ms;
        }
        if let Some(enabled) = other.session.enabled {
            self.session.enabled = enabled;
        }
        if other.session.dir.is_some() {
            self.session.dir = other.session.dir;
        }
    }

    /// Directory for session logs, relative to `root` unless absolute
    pub fn sessions_dir(&self, root: &Path) -> PathBuf {
        match &self.session.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => root.join(".userdeck").join("sessions"),
        }
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError {
                field: "api.base_url".to_string(),
                message: format!("Unsupported scheme '{}', expected http or https", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError {
                field: "api.base_url".to_string(),
                message: format!("Invalid URL '{}': {}", self.api.base_url, e),
            }),
        }

        if self.api.timeout_ms == 0 {
            errors.push(ValidationError {
                field: "api.timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert!(config.session.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_layers_override_only_what_they_set() {
        let mut config = Config::default();
        config
            .merge_str("[api]\nbase_url = \"http://localhost:3000\"\n")
            .unwrap();
        config.merge_str("[api]\ntimeout_ms = 250\n").unwrap();
        config.merge_str("[session]\nenabled = false\n").unwrap();

        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_ms, 250);
        assert!(!config.session.enabled);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://users.example\"\n\n[session]\ndir = \"logs\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "https://users.example");
        assert_eq!(config.api.timeout_ms, 10_000);
        assert_eq!(
            config.sessions_dir(Path::new("/work")),
            PathBuf::from("/work/logs")
        );
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let mut config = Config::default();
        assert!(config.merge_str("[api\nbase_url=").is_err());
    }

    #[test]
    fn test_sessions_dir_default() {
        let config = Config::default();
        assert_eq!(
            config.sessions_dir(Path::new("/work")),
            PathBuf::from("/work/.userdeck/sessions")
        );
    }

    #[test]
    fn test_validate_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "api.base_url");

        config.api.base_url = "ftp://users.example".to_string();
        let errors = config.validate().unwrap_err();
        assert!(errors[0].message.contains("Unsupported scheme"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_ms = 0;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.contains("timeout_ms"));
    }
}
