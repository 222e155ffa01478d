//! geodoh HTTP API
//!
//! RFC 8484 DoH endpoints, one route per region, plus health and cache
//! statistics.
pub mod dto;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
