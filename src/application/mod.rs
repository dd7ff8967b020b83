// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - This layer sits ABOVE services and repositories
// - It provides the boundary between front ends (the CLI) and the services
// - Sessions decide which operations a role may reach
// - It translates between DTOs and domain entities

pub mod dto;
pub mod error_handling;
pub mod session;
pub mod state;

pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use session::{
    parse_promo_scope, AdminSession, Browse, RegistrarSession, Session, SessionController,
    UserSession,
};
pub use state::AppState;
