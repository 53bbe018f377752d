use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Absent means the in-memory credential store is used
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl_minutes")]
    pub refresh_ttl_minutes: i64,
}

fn default_access_ttl_minutes() -> i64 {
    auth::authenticator::DEFAULT_ACCESS_TTL_MINUTES
}

fn default_refresh_ttl_minutes() -> i64 {
    auth::authenticator::DEFAULT_REFRESH_TTL_MINUTES
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__ACCESS_SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.jwt.validate()?;

        Ok(config)
    }
}

impl JwtConfig {
    /// Reject settings that would let one token kind pass for the other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.access_secret and jwt.refresh_secret must be set".to_string(),
            ));
        }

        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::Message(
                "jwt.access_secret and jwt.refresh_secret must differ".to_string(),
            ));
        }

        if self.access_ttl_minutes <= 0 || self.refresh_ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt token lifetimes must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config(access: &str, refresh: &str) -> JwtConfig {
        JwtConfig {
            access_secret: access.to_string(),
            refresh_secret: refresh.to_string(),
            access_ttl_minutes: default_access_ttl_minutes(),
            refresh_ttl_minutes: default_refresh_ttl_minutes(),
        }
    }

    #[test]
    fn test_default_lifetimes() {
        let jwt = jwt_config("a", "b");
        assert_eq!(jwt.access_ttl_minutes, 15);
        assert_eq!(jwt.refresh_ttl_minutes, 135);
        assert!(jwt.validate().is_ok());
    }

    #[test]
    fn test_rejects_shared_secret() {
        assert!(jwt_config("same", "same").validate().is_err());
    }

    #[test]
    fn test_rejects_missing_secret() {
        assert!(jwt_config("", "refresh").validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_ttl() {
        let mut jwt = jwt_config("a", "b");
        jwt.refresh_ttl_minutes = 0;
        assert!(jwt.validate().is_err());
    }
}
