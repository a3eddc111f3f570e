use config::Config;
use serde::Deserialize;
use std::time::Duration;

use crate::core::error::ConfigError;

const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Args {
    pub(crate) database_host: String,
    pub(crate) database_port: u16,
    pub(crate) database_name: String,
    pub(crate) database_user: String,
    pub(crate) database_password: String,
    pub(crate) log_level: String,
    pub(crate) port: u16,
    pub(crate) token_ttl_secs: i64,
    pub(crate) purge_interval_secs: u64,
    pub(crate) max_body_bytes: usize,
    pub(crate) body_timeout_secs: u64,
}

impl Args {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("database_port", 5432)?
            .set_default("log_level", "info")?
            .set_default("port", 3000)?
            .set_default("token_ttl_secs", 3600)?
            .set_default("purge_interval_secs", 300)?
            .set_default("max_body_bytes", 16 * 1024)?
            .set_default("body_timeout_secs", 10)?
            .add_source(config::Environment::with_prefix("TOKENGATE"))
            .build()?;

        let args = config.try_deserialize::<Args>()?;
        args.validate()?;

        Ok(args)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(ConfigError::InvalidSetting(
                "token_ttl_secs",
                format!("must be between 1 and {}", MAX_TOKEN_TTL_SECS),
            ));
        }

        if self.purge_interval_secs == 0 {
            return Err(ConfigError::InvalidSetting(
                "purge_interval_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.body_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting(
                "body_timeout_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidSetting(
                "max_body_bytes",
                "must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    pub(crate) fn database_url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.database_user,
            self.database_password,
            self.database_host,
            self.database_port,
            self.database_name
        )
    }

    pub(crate) fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }

    pub(crate) fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs)
    }

    pub(crate) fn body_limits(&self) -> BodyLimits {
        BodyLimits {
            max_bytes: self.max_body_bytes,
            timeout: Duration::from_secs(self.body_timeout_secs),
        }
    }
}

/// Bounds applied while reading a request body.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimits {
    pub max_bytes: usize,
    pub timeout: Duration,
}

impl Default for BodyLimits {
    fn default() -> Self {
        Self {
            max_bytes: 16 * 1024,
            timeout: Duration::from_secs(10),
        }
    }
}
