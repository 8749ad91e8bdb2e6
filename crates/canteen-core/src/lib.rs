//! Shared service plumbing: configuration, tracing, health checks, request ids
//! and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
