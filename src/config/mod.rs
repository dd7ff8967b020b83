// src/config/mod.rs
//
// Runtime configuration
//
// Sources, in order of precedence:
// - explicit overrides (CLI flags)
// - environment variables
// - platform defaults (app data directory)

pub mod env;
pub mod settings;

pub use env::EnvKey;
pub use settings::AppConfig;
