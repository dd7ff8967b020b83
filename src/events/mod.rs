// src/events/mod.rs
//
// Internal Event System - Public API
//
// EventHandler is internal to the bus and is not exported.

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventLogEntry};

pub use types::DomainEvent;

pub use types::{
    // Accounts
    AccountCreated,
    LoginFailed,
    // Catalog
    TitleAdded,
    // Reviews
    ReviewDeleted,
    ReviewPosted,
    // Promos
    PromoCreated,
    // Cards
    CardRegistered,
    CardRenewed,
    // Requests
    RequestClosed,
    RequestSubmitted,
};

/// Initialize a new event bus with the audit logger attached
pub fn create_event_bus() -> EventBus {
    let bus = EventBus::new();
    register_audit_log(&bus);
    bus
}

/// Mirror security- and data-relevant events into the application log
pub fn register_audit_log(bus: &EventBus) {
    bus.subscribe::<AccountCreated, _>(|e| {
        log::info!("account '{}' created with role {}", e.username, e.role);
    });
    bus.subscribe::<LoginFailed, _>(|e| {
        log::warn!("failed login for '{}'", e.username);
    });
    bus.subscribe::<CardRegistered, _>(|e| {
        log::info!("card {} registered at cinema {}", e.card_id, e.cinema_id);
    });
    bus.subscribe::<RequestClosed, _>(|e| {
        log::info!("request {} closed by {}", e.request_id, e.closed_by);
    });
}
