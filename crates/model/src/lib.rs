pub mod pass;
pub mod time;
