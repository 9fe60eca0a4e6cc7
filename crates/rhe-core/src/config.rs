use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::request::Method;
use crate::retry::{RetryPolicy, DEFAULT_METHODS_TO_RETRY, DEFAULT_STATUS_CODES_TO_RETRY};
use crate::transport::TransportOptions;

/// `[retry]` section of config.toml. Field names and defaults mirror [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Per-attempt timeout in seconds (0 = no timeout).
    pub timeout_secs: f64,
    pub enable_retries: bool,
    /// Retries after the first attempt. Signed so a negative value is reported, not a parse error.
    pub max_number_of_retries: i64,
    pub retry_on_timeout: bool,
    pub retry_interval_secs: f64,
    /// Budget for the sum of all sleeps of one request.
    pub maximum_retry_wait_time_secs: i64,
    pub backoff_factor: f64,
    pub status_codes_to_retry: Vec<u16>,
    pub methods_to_retry: Vec<String>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 0.0,
            enable_retries: false,
            max_number_of_retries: 3,
            retry_on_timeout: false,
            retry_interval_secs: 1.0,
            maximum_retry_wait_time_secs: 120,
            backoff_factor: 2.0,
            status_codes_to_retry: DEFAULT_STATUS_CODES_TO_RETRY.to_vec(),
            methods_to_retry: DEFAULT_METHODS_TO_RETRY
                .iter()
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }
}

impl RetryConfig {
    /// Validates the values and builds a policy carrying `transport`.
    pub fn to_policy(
        &self,
        transport: TransportOptions,
    ) -> Result<RetryPolicy, ConfigurationError> {
        let retries = u32::try_from(self.max_number_of_retries)
            .map_err(|_| ConfigurationError::NegativeRetryCount(self.max_number_of_retries))?;
        let timeout = Duration::try_from_secs_f64(self.timeout_secs)
            .map_err(|_| ConfigurationError::InvalidTimeout(self.timeout_secs))?;
        let interval = Duration::try_from_secs_f64(self.retry_interval_secs)
            .map_err(|_| ConfigurationError::InvalidRetryInterval(self.retry_interval_secs))?;
        let budget = u64::try_from(self.maximum_retry_wait_time_secs).map_err(|_| {
            ConfigurationError::InvalidWaitBudget(self.maximum_retry_wait_time_secs as f64)
        })?;
        let methods = self
            .methods_to_retry
            .iter()
            .map(|m| m.parse::<Method>())
            .collect::<Result<Vec<_>, _>>()?;

        RetryPolicy::builder()
            .timeout(timeout)
            .enable_retries(self.enable_retries)
            .max_number_of_retries(retries)
            .retry_on_timeout(self.retry_on_timeout)
            .retry_interval(interval)
            .maximum_retry_wait_time(Duration::from_secs(budget))
            .backoff_factor(self.backoff_factor)
            .status_codes_to_retry(self.status_codes_to_retry.iter().copied())
            .methods_to_retry(methods)
            .transport(transport)
            .build()
    }
}

/// Global configuration loaded from `~/.config/rhe/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RheConfig {
    #[serde(default)]
    pub retry: RetryConfig,
    /// TLS flags, default headers, proxy and auth handed to the transport.
    #[serde(default)]
    pub transport: TransportOptions,
}

impl RheConfig {
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigurationError> {
        self.retry.to_policy(self.transport.clone())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rhe")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RheConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RheConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<RheConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: RheConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_default_policy() {
        let cfg = RheConfig::default();
        assert_eq!(cfg.retry_policy().unwrap(), RetryPolicy::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = RheConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: RheConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: RheConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, RheConfig::default());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            [retry]
            timeout_secs = 2.5
            enable_retries = true
            max_number_of_retries = 2
            retry_interval_secs = 0.5
            backoff_factor = 3.0
            status_codes_to_retry = [503]
            methods_to_retry = ["get", "DELETE"]

            [transport]
            verify_host = false

            [transport.default_headers]
            User-Agent = "rhe-test"

            [transport.auth]
            username = "svc"
            password = "pw"
        "#;
        let cfg: RheConfig = toml::from_str(toml).unwrap();
        let policy = cfg.retry_policy().unwrap();
        assert_eq!(policy.timeout(), Some(Duration::from_millis(2500)));
        assert!(policy.enable_retries());
        assert_eq!(policy.max_number_of_retries(), 2);
        assert_eq!(policy.retry_interval(), Duration::from_millis(500));
        assert_eq!(policy.maximum_retry_wait_time(), Duration::from_secs(120));
        assert_eq!(policy.backoff_factor(), 3.0);
        assert!(policy.retries_status(503));
        assert!(!policy.retries_status(500));
        assert!(policy.retries_method(Method::Delete));
        assert!(!policy.retries_method(Method::Put));
        assert!(policy.transport().verify_peer);
        assert!(!policy.transport().verify_host);
        assert_eq!(
            policy.transport().default_headers.get("User-Agent").map(String::as_str),
            Some("rhe-test")
        );
        assert_eq!(policy.transport().auth.as_ref().unwrap().username, "svc");
    }

    #[test]
    fn negative_retry_count_is_configuration_error() {
        let cfg: RheConfig = toml::from_str("[retry]\nmax_number_of_retries = -1\n").unwrap();
        assert_eq!(
            cfg.retry_policy().unwrap_err(),
            ConfigurationError::NegativeRetryCount(-1)
        );
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        let cases = [
            ("[retry]\nbackoff_factor = 0.0\n", "backoff"),
            ("[retry]\nretry_interval_secs = -1.0\n", "interval"),
            ("[retry]\nretry_interval_secs = 0.0\n", "interval"),
            ("[retry]\ntimeout_secs = -3.0\n", "timeout"),
            ("[retry]\nmaximum_retry_wait_time_secs = -1\n", "budget"),
            ("[retry]\nmethods_to_retry = [\"FETCH\"]\n", "method"),
        ];
        for (toml, what) in cases {
            let cfg: RheConfig = toml::from_str(toml).unwrap();
            let err = cfg.retry_policy().unwrap_err();
            let ok = match what {
                "backoff" => matches!(err, ConfigurationError::InvalidBackoffFactor(_)),
                "interval" => matches!(err, ConfigurationError::InvalidRetryInterval(_)),
                "timeout" => matches!(err, ConfigurationError::InvalidTimeout(_)),
                "budget" => matches!(err, ConfigurationError::InvalidWaitBudget(_)),
                _ => matches!(err, ConfigurationError::UnknownMethod(_)),
            };
            assert!(ok, "{toml}: unexpected {err:?}");
        }
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[retry]\nenable_retries = true\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert!(cfg.retry.enable_retries);
        assert_eq!(cfg.retry.max_number_of_retries, 3);
    }

    #[test]
    fn load_from_path_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[retry\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn debug_output_hides_authorization_default_header() {
        let toml = "[transport.default_headers]\nAuthorization = \"Bearer tok-123\"\n";
        let cfg: RheConfig = toml::from_str(toml).unwrap();
        let logged = format!("{:?}", cfg);
        assert!(logged.contains("Authorization"));
        assert!(!logged.contains("tok-123"));
    }
}
