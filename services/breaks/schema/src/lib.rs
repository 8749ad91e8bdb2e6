//! sea-orm entities owned by the breaks service.

pub mod break_events;
pub mod breaks;
