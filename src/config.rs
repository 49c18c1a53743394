use std::{env, net::SocketAddr};

use crate::{auth::jwt::JwtConfig, error::AppError};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://copass.db".to_string());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:4000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let default_page_size = page_size_from_env("DEFAULT_PAGE_SIZE", 20)?;
        let max_page_size = page_size_from_env("MAX_PAGE_SIZE", 100)?;
        let jwt = JwtConfig::from_env()?;

        let config = Self {
            database_url,
            listen_addr,
            default_page_size,
            max_page_size,
            jwt,
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(AppError::Config(format!(
                "DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE ({})",
                self.max_page_size
            )));
        }
        Ok(())
    }

    /// Resolve a requested page size against the configured default and cap.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}

fn page_size_from_env(key: &str, default: usize) -> Result<usize, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|err| AppError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
