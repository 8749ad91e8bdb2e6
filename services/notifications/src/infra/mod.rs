pub mod db;
pub mod fcm;
