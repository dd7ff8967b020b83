pub mod entity;
pub mod invariants;

pub use entity::{Account, Role};
pub use invariants::{validate_account, validate_password_strength, validate_username};
