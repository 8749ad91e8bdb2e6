//! sea-orm entities owned by the notifications service.

pub mod notification_delivery_logs;
pub mod notifications;
pub mod push_tokens;
pub mod users;
