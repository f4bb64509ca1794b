use crate::error::config::ConfigError;

pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    /// Seconds a migration job may stay `running` before the status
    /// endpoint unilaterally marks it stalled.
    pub job_stale_after_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let listen_addr =
            std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let job_stale_after_secs = match std::env::var("JOB_STALE_AFTER_SECS") {
            Ok(value) => value
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidVar("JOB_STALE_AFTER_SECS"))?,
            Err(_) => 600,
        };

        Ok(Self {
            database_url,
            listen_addr,
            job_stale_after_secs,
        })
    }
}
