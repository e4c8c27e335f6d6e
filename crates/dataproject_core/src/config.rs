//! Runtime configuration for the lifecycle stack.
//!
//! # Responsibility
//! - Hold settings for storage, the GitLab client and logging.
//! - Validate and normalize settings once at process start.
//!
//! # Invariants
//! - A validated config never changes afterwards; components receive
//!   immutable copies.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_GITLAB_TIMEOUT_SECS: u64 = 30;
pub const MAX_GITLAB_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_CI_CONFIG_PATH: &str = ".mlreef.yml";
pub const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 3600;

/// GitLab API client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitlabConfig {
    /// Instance root, e.g. `https://gitlab.example.com`. No trailing `/`
    /// after `validate`.
    pub base_url: String,
    pub timeout_secs: u64,
    /// CI definition path applied to every created repository.
    pub ci_config_path: String,
    /// CI job timeout applied to every created repository.
    pub build_timeout_secs: u64,
}

impl GitlabConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_GITLAB_TIMEOUT_SECS,
            ci_config_path: DEFAULT_CI_CONFIG_PATH.to_string(),
            build_timeout_secs: DEFAULT_BUILD_TIMEOUT_SECS,
        }
    }

    /// Validates and normalizes settings in place.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));
        match host {
            Some(host) if !host.is_empty() => {}
            _ => return Err(ConfigError::InvalidGitlabUrl(self.base_url.clone())),
        }
        self.base_url = trimmed.to_string();

        if self.timeout_secs == 0 || self.timeout_secs > MAX_GITLAB_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs));
        }
        if self.ci_config_path.trim().is_empty() {
            return Err(ConfigError::EmptyCiConfigPath);
        }
        Ok(())
    }
}

/// Complete process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub gitlab: GitlabConfig,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Validates every section and normalizes values in place.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        self.gitlab.validate()?;
        self.log_level = crate::logging::normalize_level(&self.log_level)
            .map_err(ConfigError::InvalidLogLevel)?
            .to_string();
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        Ok(())
    }
}

/// Configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    InvalidGitlabUrl(String),
    InvalidTimeout(u64),
    EmptyCiConfigPath,
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "database path must not be empty"),
            Self::InvalidGitlabUrl(value) => write!(
                f,
                "gitlab url must be an http(s) address with a host, got `{value}`"
            ),
            Self::InvalidTimeout(value) => write!(
                f,
                "gitlab timeout must be within 1..={MAX_GITLAB_TIMEOUT_SECS} seconds, got {value}"
            ),
            Self::EmptyCiConfigPath => write!(f, "ci config path must not be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, GitlabConfig, DEFAULT_CI_CONFIG_PATH};
    use std::path::PathBuf;

    fn config() -> AppConfig {
        AppConfig {
            db_path: PathBuf::from("projects.sqlite3"),
            gitlab: GitlabConfig::new("https://gitlab.example.com/"),
            log_level: "INFO".to_string(),
            log_dir: None,
        }
    }

    #[test]
    fn validate_normalizes_url_and_level() {
        let mut config = config();
        config.validate().expect("config should validate");
        assert_eq!(config.gitlab.base_url, "https://gitlab.example.com");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.gitlab.ci_config_path, DEFAULT_CI_CONFIG_PATH);
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let mut gitlab = GitlabConfig::new("gitlab.example.com");
        assert!(matches!(
            gitlab.validate(),
            Err(ConfigError::InvalidGitlabUrl(_))
        ));

        let mut bare = GitlabConfig::new("https://");
        assert!(matches!(bare.validate(), Err(ConfigError::InvalidGitlabUrl(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_timeout() {
        let mut gitlab = GitlabConfig::new("http://localhost:10080");
        gitlab.timeout_secs = 0;
        assert_eq!(gitlab.validate(), Err(ConfigError::InvalidTimeout(0)));
    }

    #[test]
    fn validate_rejects_relative_log_dir_and_unknown_level() {
        let mut relative = config();
        relative.log_dir = Some(PathBuf::from("logs/dev"));
        assert!(matches!(
            relative.validate(),
            Err(ConfigError::RelativeLogDir(_))
        ));

        let mut bad_level = config();
        bad_level.log_level = "verbose".to_string();
        assert!(matches!(
            bad_level.validate(),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }
}
