//! Configuration resolution.
//!
//! Base URL: command line, then the first non-empty of the base-URL
//! environment variables, then `base_url` in the config file. Credentials
//! come only from the environment. Lookups take an injected function so
//! tests never touch the process environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use deployscout_fetch::{BASE_URL_ENV_VARS, ClientSettings, FetchError};
use deployscout_scrape::DEFAULT_CONCURRENCY;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Primary and legacy variables for the login email.
pub const EMAIL_ENV_VARS: &[&str] = &["DEPLOYSCOUT_EMAIL", "PANEL_EMAIL"];

/// Primary and legacy variables for the login password.
pub const PASSWORD_ENV_VARS: &[&str] = &["DEPLOYSCOUT_PASSWORD", "PANEL_PASSWORD"];

// ============================================================================
// Errors
// ============================================================================

/// Configuration problems. All of them end the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No base URL anywhere.
    #[error(
        "No panel URL configured. Pass it first on the command line \
         (deployscout https://panel.example.com <command>) or set one of {}",
        BASE_URL_ENV_VARS.join(", ")
    )]
    MissingBaseUrl,

    /// Email or password not set.
    #[error("Missing credentials: set {}", .missing.join(" and "))]
    MissingCredentials {
        /// Variables (primary names) that are unset.
        missing: Vec<&'static str>,
    },

    /// Base URL rejected.
    #[error(transparent)]
    InvalidBaseUrl(#[from] FetchError),

    /// Config file exists but cannot be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`FileConfig`].
    #[error("Invalid config file {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Config File
// ============================================================================

/// Optional JSON config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Panel base URL.
    pub base_url: Option<String>,
    /// Skip certificate validation.
    pub insecure: Option<bool>,
    /// Request timeout in seconds; 0 disables it.
    pub timeout_secs: Option<u64>,
    /// Redirect hop limit.
    pub max_redirects: Option<usize>,
    /// Deployment pages fetched at once.
    pub concurrency: Option<usize>,
}

impl FileConfig {
    /// `<config_dir>/deployscout/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deployscout").join("config.json"))
    }

    /// Loads the file at the default path, or defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads a specific file; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Values taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// URL given as the first positional token.
    pub base_url: Option<String>,
    /// `--insecure`.
    pub insecure: bool,
    /// `--timeout`.
    pub timeout_secs: Option<u64>,
    /// `--concurrency`.
    pub concurrency: Option<usize>,
}

// ============================================================================
// Resolution
// ============================================================================

/// Reads a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn first_set(names: &[&str], lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Picks the base URL by precedence.
pub fn resolve_base_url(
    explicit: Option<&str>,
    lookup: &impl Fn(&str) -> Option<String>,
    file: &FileConfig,
) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| first_set(BASE_URL_ENV_VARS, lookup))
        .or_else(|| file.base_url.clone().filter(|url| !url.trim().is_empty()))
}

/// Login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Login password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reads credentials, each from its primary variable or the legacy alias.
pub fn resolve_credentials(
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Credentials, ConfigError> {
    let email = first_set(EMAIL_ENV_VARS, lookup);
    // Passwords are taken verbatim; only emptiness is checked.
    let password = PASSWORD_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty());

    match (email, password) {
        (Some(email), Some(password)) => Ok(Credentials { email, password }),
        (email, password) => {
            let mut missing = Vec::new();
            if email.is_none() {
                missing.push(EMAIL_ENV_VARS[0]);
            }
            if password.is_none() {
                missing.push(PASSWORD_ENV_VARS[0]);
            }
            Err(ConfigError::MissingCredentials { missing })
        }
    }
}

/// Everything a command needs before its first request.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Client settings.
    pub settings: ClientSettings,
    /// Deployment pages fetched at once.
    pub concurrency: usize,
}

impl RunConfig {
    /// Merges flags, environment and the config file.
    pub fn resolve(
        overrides: &Overrides,
        lookup: &impl Fn(&str) -> Option<String>,
        file: &FileConfig,
    ) -> Result<Self, ConfigError> {
        let base_url = resolve_base_url(overrides.base_url.as_deref(), lookup, file)
            .ok_or(ConfigError::MissingBaseUrl)?;

        let mut settings = ClientSettings::new(&base_url)?
            .with_invalid_certs_accepted(overrides.insecure || file.insecure.unwrap_or(false));
        if let Some(secs) = overrides.timeout_secs.or(file.timeout_secs) {
            settings = settings.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }
        if let Some(max) = file.max_redirects {
            settings = settings.with_max_redirects(max);
        }

        let concurrency = overrides
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY)
            .max(1);

        Ok(Self {
            settings,
            concurrency,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_base_url_precedence() {
        let file = FileConfig {
            base_url: Some("file.test".into()),
            ..FileConfig::default()
        };
        let lookup = env(&[("PANEL_URL", "panel.test"), ("APP_URL", "app.test")]);

        assert_eq!(
            resolve_base_url(Some("cli.test"), &lookup, &file).as_deref(),
            Some("cli.test")
        );
        assert_eq!(resolve_base_url(None, &lookup, &file).as_deref(), Some("panel.test"));
        assert_eq!(
            resolve_base_url(None, &env(&[]), &file).as_deref(),
            Some("file.test")
        );
        assert_eq!(resolve_base_url(None, &env(&[]), &FileConfig::default()), None);
    }

    #[test]
    fn test_empty_env_values_are_skipped() {
        let lookup = env(&[("DEPLOYSCOUT_URL", "  "), ("APP_URL", "app.test")]);
        assert_eq!(
            resolve_base_url(None, &lookup, &FileConfig::default()).as_deref(),
            Some("app.test")
        );
    }

    #[test]
    fn test_credentials_fall_back_to_legacy_names() {
        let lookup = env(&[("PANEL_EMAIL", "ops@example.com"), ("DEPLOYSCOUT_PASSWORD", "pw")]);
        let creds = resolve_credentials(&lookup).unwrap();
        assert_eq!(creds.email, "ops@example.com");
        assert_eq!(creds.password, "pw");
        assert!(!format!("{creds:?}").contains("pw\""));
    }

    #[test]
    fn test_missing_credentials_named() {
        let err = resolve_credentials(&env(&[("DEPLOYSCOUT_EMAIL", "a@b.c")])).unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::MissingCredentials { missing } if missing == &vec!["DEPLOYSCOUT_PASSWORD"]
        ));
        assert!(err.to_string().contains("DEPLOYSCOUT_PASSWORD"));
    }

    #[test]
    fn test_run_config_merges_sources() {
        let file = FileConfig {
            base_url: Some("https://file.test/".into()),
            insecure: Some(true),
            timeout_secs: Some(5),
            max_redirects: Some(3),
            concurrency: Some(8),
        };
        let overrides = Overrides {
            timeout_secs: Some(0),
            concurrency: Some(2),
            ..Overrides::default()
        };

        let config = RunConfig::resolve(&overrides, &env(&[]), &file).unwrap();
        assert_eq!(config.settings.base_url, "https://file.test");
        assert!(config.settings.accept_invalid_certs);
        assert_eq!(config.settings.timeout, None);
        assert_eq!(config.settings.max_redirects, 3);
        assert_eq!(config.concurrency, 2);
    }

    #[test]
    fn test_timeout_defaults_to_thirty_seconds() {
        let config = RunConfig::resolve(
            &Overrides::default(),
            &env(&[("DEPLOYSCOUT_URL", "https://panel.test")]),
            &FileConfig::default(),
        )
        .unwrap();
        assert_eq!(
            config.settings.timeout,
            Some(Duration::from_secs(deployscout_fetch::DEFAULT_TIMEOUT_SECS))
        );

        let overrides = Overrides {
            timeout_secs: Some(0),
            ..Overrides::default()
        };
        let config = RunConfig::resolve(
            &overrides,
            &env(&[("DEPLOYSCOUT_URL", "https://panel.test")]),
            &FileConfig::default(),
        )
        .unwrap();
        assert_eq!(config.settings.timeout, None);
    }

    #[test]
    fn test_run_config_requires_url() {
        let err = RunConfig::resolve(&Overrides::default(), &env(&[]), &FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl));
        assert!(err.to_string().contains("DEPLOYSCOUT_URL"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"base_url":"panel.test","concurrency":3}"#).unwrap();

        let config = FileConfig::load_from(&path).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("panel.test"));
        assert_eq!(config.concurrency, Some(3));
        assert_eq!(config.insecure, None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            FileConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
