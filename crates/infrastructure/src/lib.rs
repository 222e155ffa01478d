//! geodoh Infrastructure Layer
//!
//! Adapters behind the application ports: the hickory-proto based
//! client-subnet rewriter, the reqwest upstream racer, and the in-memory
//! response cache.
pub mod cache;
pub mod dns;
