// src/config/settings.rs

use std::path::PathBuf;

use super::env::{self, EnvKey};
use crate::error::{AppError, AppResult};

/// Default number of pooled SQLite connections (desktop-sized)
pub const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Maximum pooled connections
    pub pool_size: u32,
}

impl AppConfig {
    /// Build the configuration from `CINEHUB_*` environment variables.
    ///
    /// Missing variables fall back to platform defaults. An unparsable pool
    /// size falls back to the default; an explicit zero is rejected.
    pub fn from_env() -> AppResult<Self> {
        let database_path = match env::get(EnvKey::DatabasePath) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => Self::default_database_path()?,
        };

        let pool_size = env::get_parsed(EnvKey::PoolSize, DEFAULT_POOL_SIZE);

        Self::new(database_path, pool_size)
    }

    pub fn new(database_path: PathBuf, pool_size: u32) -> AppResult<Self> {
        if pool_size == 0 {
            return Err(AppError::Config("pool size must be at least 1".to_string()));
        }

        Ok(Self {
            database_path,
            pool_size,
        })
    }

    /// `{APP_DATA}/cinehub/cinehub.db`, creating the directory if needed.
    pub fn default_database_path() -> AppResult<PathBuf> {
        let app_data_dir = dirs::data_dir()
            .ok_or_else(|| AppError::Config("Could not determine app data directory".to_string()))?;

        let cinehub_dir = app_data_dir.join("cinehub");
        std::fs::create_dir_all(&cinehub_dir)?;

        Ok(cinehub_dir.join("cinehub.db"))
    }

    /// Configuration for an explicit database file, or `from_env` when none
    /// is given. The default data directory is only touched in the latter case.
    pub fn resolve(database_path: Option<PathBuf>) -> AppResult<Self> {
        match database_path {
            Some(path) => Self::new(path, env::get_parsed(EnvKey::PoolSize, DEFAULT_POOL_SIZE)),
            None => Self::from_env(),
        }
    }
}
