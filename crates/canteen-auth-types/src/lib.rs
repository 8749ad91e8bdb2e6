//! Identity types shared across Canteen services.
//!
//! Authentication happens at the gateway; services only read the identity it
//! injects.

pub mod identity;

pub const USER_ID_HEADER: &str = "x-canteen-user-id";
pub const USER_ROLE_HEADER: &str = "x-canteen-user-role";
