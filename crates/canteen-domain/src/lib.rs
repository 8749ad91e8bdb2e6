//! Domain types shared across all Canteen services.
//!
//! Pure types with no framework dependencies.

pub mod pagination;
pub mod time_of_day;
pub mod user;
