//! Gateway configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{ConfigError, Credentials};

/// Largest batch the bulk endpoint accepts.
pub const MAX_BATCH_SIZE: usize = 1000;

/// Largest number of task IDs per statistics query.
pub const MAX_STATISTICS_PAGE: usize = 100;

/// Endpoints, limits and credentials for one vivo application.
///
/// Keys follow the gateway's option names (`getTokenUrl`, `maxLength`, ...).
/// `timeout` is in milliseconds and `tokenTtl` in seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default = "default_get_token_url")]
    pub get_token_url: String,
    #[serde(default = "default_save_message_url")]
    pub save_message_url: String,
    /// Used when pushing to a single device.
    #[serde(default = "default_push_single_url")]
    pub push_single_url: String,
    /// Used when pushing to two or more devices.
    #[serde(default = "default_push_url")]
    pub push_url: String,
    #[serde(default = "default_push_all_url")]
    pub push_all_url: String,
    #[serde(default = "default_statistic_url")]
    pub statistic_url: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_statistic_max_num")]
    pub statistic_max_num: usize,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_token_ttl")]
    pub token_ttl: u64,
}

fn default_get_token_url() -> String {
    "https://api-push.vivo.com.cn/message/auth".to_string()
}

fn default_save_message_url() -> String {
    "https://api-push.vivo.com.cn/message/saveListPayload".to_string()
}

fn default_push_single_url() -> String {
    "https://api-push.vivo.com.cn/message/send".to_string()
}

fn default_push_url() -> String {
    "https://api-push.vivo.com.cn/message/pushToList".to_string()
}

fn default_push_all_url() -> String {
    "https://api-push.vivo.com.cn/message/all".to_string()
}

fn default_statistic_url() -> String {
    "https://api-push.vivo.com.cn/report/getStatistics".to_string()
}

fn default_max_length() -> usize {
    MAX_BATCH_SIZE
}

fn default_statistic_max_num() -> usize {
    MAX_STATISTICS_PAGE
}

fn default_timeout() -> u64 {
    300_000 // 5 minutes
}

fn default_token_ttl() -> u64 {
    2 * 60 * 60
}

impl GatewayConfig {
    /// Start building a config with default endpoints and limits.
    pub fn builder(credentials: Credentials) -> GatewayConfigBuilder {
        GatewayConfigBuilder {
            config: Self {
                credentials,
                get_token_url: default_get_token_url(),
                save_message_url: default_save_message_url(),
                push_single_url: default_push_single_url(),
                push_url: default_push_url(),
                push_all_url: default_push_all_url(),
                statistic_url: default_statistic_url(),
                max_length: default_max_length(),
                statistic_max_num: default_statistic_max_num(),
                timeout: default_timeout(),
                token_ttl: default_token_ttl(),
            },
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, apply `VIVO_APP_*` environment overrides, then validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Override credentials from `VIVO_APP_ID`, `VIVO_APP_KEY` and `VIVO_APP_SECRET`.
    pub fn apply_env(&mut self) {
        if let Ok(id) = std::env::var("VIVO_APP_ID") {
            self.credentials.app_id = id;
        }
        if let Ok(key) = std::env::var("VIVO_APP_KEY") {
            self.credentials.app_key = key;
        }
        if let Ok(secret) = std::env::var("VIVO_APP_SECRET") {
            self.credentials.set_secret(secret);
        }
    }

    /// Check credentials, URLs and limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let creds = &self.credentials;
        if creds.app_id.trim().is_empty() {
            return Err(ConfigError::MissingCredential("appId"));
        }
        if creds.app_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("appKey"));
        }
        if creds.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingCredential("appSecret"));
        }

        let urls = [
            ("getTokenUrl", &self.get_token_url),
            ("saveMessageUrl", &self.save_message_url),
            ("pushSingleUrl", &self.push_single_url),
            ("pushUrl", &self.push_url),
            ("pushAllUrl", &self.push_all_url),
            ("statisticUrl", &self.statistic_url),
        ];
        for (name, url) in urls {
            if url.trim().is_empty() {
                return Err(ConfigError::MissingUrl(name));
            }
        }

        check_limit("maxLength", self.max_length, MAX_BATCH_SIZE)?;
        check_limit(
            "statisticMaxNum",
            self.statistic_max_num,
            MAX_STATISTICS_PAGE,
        )?;

        if self.timeout == 0 {
            return Err(ConfigError::ZeroDuration("timeout"));
        }
        if self.token_ttl == 0 {
            return Err(ConfigError::ZeroDuration("tokenTtl"));
        }

        Ok(())
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Lifetime of a cached auth token.
    pub fn token_lifetime(&self) -> Duration {
        Duration::from_secs(self.token_ttl)
    }
}

fn check_limit(name: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::LimitOutOfRange { name, value, max });
    }
    Ok(())
}

/// Builder for [`GatewayConfig`]; `build` validates.
#[derive(Debug, Clone)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    pub fn get_token_url(mut self, url: impl Into<String>) -> Self {
        self.config.get_token_url = url.into();
        self
    }

    pub fn save_message_url(mut self, url: impl Into<String>) -> Self {
        self.config.save_message_url = url.into();
        self
    }

    pub fn push_single_url(mut self, url: impl Into<String>) -> Self {
        self.config.push_single_url = url.into();
        self
    }

    pub fn push_url(mut self, url: impl Into<String>) -> Self {
        self.config.push_url = url.into();
        self
    }

    pub fn push_all_url(mut self, url: impl Into<String>) -> Self {
        self.config.push_all_url = url.into();
        self
    }

    pub fn statistic_url(mut self, url: impl Into<String>) -> Self {
        self.config.statistic_url = url.into();
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.config.max_length = max_length;
        self
    }

    pub fn statistic_max_num(mut self, statistic_max_num: usize) -> Self {
        self.config.statistic_max_num = statistic_max_num;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout.as_millis() as u64;
        self
    }

    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.config.token_ttl = ttl.as_secs();
        self
    }

    /// Validate and return the config.
    pub fn build(self) -> Result<GatewayConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("1001", "app-key", "app-secret")
    }

    #[test]
    fn test_builder_defaults() {
        let config = GatewayConfig::builder(creds()).build().unwrap();
        assert_eq!(config.max_length, 1000);
        assert_eq!(config.statistic_max_num, 100);
        assert_eq!(config.request_timeout(), Duration::from_secs(300));
        assert_eq!(config.token_lifetime(), Duration::from_secs(7200));
        assert!(config.push_url.ends_with("/message/pushToList"));
    }

    #[test]
    fn test_missing_credentials() {
        let err = GatewayConfig::builder(Credentials::new("", "k", "s"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingCredential("appId"));

        let err = GatewayConfig::builder(Credentials::new("1", "k", " "))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingCredential("appSecret"));
    }

    #[test]
    fn test_limits_out_of_range() {
        let err = GatewayConfig::builder(creds())
            .max_length(1001)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::LimitOutOfRange {
                name: "maxLength",
                ..
            }
        ));

        let err = GatewayConfig::builder(creds())
            .statistic_max_num(0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::LimitOutOfRange {
                name: "statisticMaxNum",
                ..
            }
        ));
    }

    #[test]
    fn test_from_toml() {
        let config = GatewayConfig::from_toml_str(
            r#"
            appId = "1001"
            appKey = "app-key"
            appSecret = "app-secret"
            maxLength = 500
            timeout = 10000
            pushUrl = "http://localhost:8080/pushToList"
            "#,
        )
        .unwrap();

        assert_eq!(config.credentials.app_id, "1001");
        assert_eq!(config.credentials.expose_secret(), "app-secret");
        assert_eq!(config.max_length, 500);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.push_url, "http://localhost:8080/pushToList");
        assert_eq!(config.statistic_max_num, 100);
    }

    #[test]
    fn test_from_toml_rejects_missing_secret() {
        let err = GatewayConfig::from_toml_str(
            r#"
            appId = "1001"
            appKey = "app-key"
            "#,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingCredential("appSecret"));
    }
}
