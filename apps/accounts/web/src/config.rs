use core_config::{AppInfo, app_info, env_or_default, env_parse_or, server::ServerConfig};
use std::time::Duration;

pub use core_config::Environment;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Accounts web front-end configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Base URL of the accounts API (`ACCOUNTS_API_URL`)
    pub api_base_url: String,
    /// Per-request timeout for API calls (`API_TIMEOUT_SECS`)
    pub api_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env_with_port(DEFAULT_PORT)?;
        let api_base_url = env_or_default("ACCOUNTS_API_URL", DEFAULT_API_URL);
        let api_timeout = Duration::from_secs(env_parse_or("API_TIMEOUT_SECS", 10u64)?);

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            api_base_url,
            api_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars(
            [
                ("ACCOUNTS_API_URL", None::<&str>),
                ("API_TIMEOUT_SECS", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.server.port, 8081);
                assert_eq!(config.api_base_url, DEFAULT_API_URL);
                assert_eq!(config.api_timeout, Duration::from_secs(10));
                assert_eq!(config.app.name, "accounts_web");
            },
        );
    }

    #[test]
    fn test_config_overrides() {
        temp_env::with_vars(
            [
                ("ACCOUNTS_API_URL", Some("http://accounts-api:9000")),
                ("API_TIMEOUT_SECS", Some("3")),
                ("PORT", Some("9100")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.server.port, 9100);
                assert_eq!(config.api_base_url, "http://accounts-api:9000");
                assert_eq!(config.api_timeout, Duration::from_secs(3));
            },
        );
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        temp_env::with_var("API_TIMEOUT_SECS", Some("soon"), || {
            assert!(Config::from_env().is_err());
        });
    }
}
