use std::env;
use std::str::FromStr;

pub enum EnvKey {
    DatabasePath,
    PoolSize,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::DatabasePath => "CINEHUB_DATABASE",
            EnvKey::PoolSize => "CINEHUB_POOL_SIZE",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
