pub mod fanout;
pub mod notification;
