pub mod error;
pub mod guard;
pub mod pass;
pub mod registry;
pub mod source;
pub mod window;
