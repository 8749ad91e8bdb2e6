pub mod break_def;
