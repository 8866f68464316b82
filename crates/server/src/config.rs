use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AUTH_JWT_SECRET environment variable not set")]
    MissingJwtSecret,
}

/// Server configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3731),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:taskstride.db".to_string()),
            jwt_secret: std::env::var("AUTH_JWT_SECRET")
                .map_err(|_| ConfigError::MissingJwtSecret)?,
        })
    }
}
