//! API configuration

use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Email of the bootstrap administrator account
    pub seed_admin_email: String,
    /// Password of the bootstrap administrator account
    pub seed_admin_password: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 24 * 3600,
            database_url: "postgres://localhost/hospital_billing".to_string(),
            log_level: "info".to_string(),
            seed_admin_email: "admin@example.com".to_string(),
            seed_admin_password: "admin123".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables,
    /// falling back to the defaults for anything unset
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as i64)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expiration_secs", defaults.jwt_expiration_secs as i64)?
            .set_default("database_url", defaults.database_url)?
            .set_default("log_level", defaults.log_level)?
            .set_default("seed_admin_email", defaults.seed_admin_email)?
            .set_default("seed_admin_password", defaults.seed_admin_password)?
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
