use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("Environment variable {0} has an invalid value")]
    InvalidVar(&'static str),
}
