use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::express_entry::RulesConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub rules: RulesConfig,
    /// CSV export replacing the built-in provincial catalogue.
    pub pnp_catalogue_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let pnp_catalogue_path = env::var("PNP_CATALOGUE_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            rules: load_rules()?,
            pnp_catalogue_path,
        })
    }
}

/// Policy dials that change with program instructions; point tables stay compiled in.
fn load_rules() -> Result<RulesConfig, ConfigError> {
    let mut rules = RulesConfig::default();

    if let Some(months) = rule_override::<u32>("CRS_LANGUAGE_TEST_VALIDITY_MONTHS")? {
        rules.normalization.language_test_validity_months = months;
    }
    if let Some(clb) = rule_override::<u8>("CRS_FRENCH_BONUS_ENGLISH_CLB")? {
        rules.scoring.french_bonus.english_clb_threshold = clb;
    }
    if let Some(clb) = rule_override::<u8>("CRS_CEC_MANAGERIAL_CLB")? {
        rules.eligibility.cec_managerial_clb = clb;
    }
    if let Some(clb) = rule_override::<u8>("CRS_CEC_TECHNICAL_CLB")? {
        rules.eligibility.cec_technical_clb = clb;
    }

    Ok(rules)
}

fn rule_override<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidRuleValue { key, value }),
        Err(_) => Ok(None),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRuleValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRuleValue { key, value } => {
                write!(f, "{key} must be a non-negative integer (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidRuleValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "PNP_CATALOGUE_PATH",
            "CRS_LANGUAGE_TEST_VALIDITY_MONTHS",
            "CRS_FRENCH_BONUS_ENGLISH_CLB",
            "CRS_CEC_MANAGERIAL_CLB",
            "CRS_CEC_TECHNICAL_CLB",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.rules, RulesConfig::default());
        assert!(config.pnp_catalogue_path.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rule_dials_override_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CRS_LANGUAGE_TEST_VALIDITY_MONTHS", "18");
        env::set_var("CRS_CEC_TECHNICAL_CLB", "6");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.rules.normalization.language_test_validity_months, 18);
        assert_eq!(config.rules.eligibility.cec_technical_clb, 6);
        assert_eq!(config.rules.eligibility.cec_managerial_clb, 7);
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_rule_dial() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CRS_FRENCH_BONUS_ENGLISH_CLB", "five");
        let err = AppConfig::load().expect_err("dial must be numeric");
        assert!(matches!(
            err,
            ConfigError::InvalidRuleValue {
                key: "CRS_FRENCH_BONUS_ENGLISH_CLB",
                ..
            }
        ));
        reset_env();
    }
}
