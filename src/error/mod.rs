// src/error/mod.rs
//
// Application error types

pub mod types;

pub use types::{unique_violation, AppError, AppResult};
