pub mod break_def;
pub mod health;
pub mod status;
