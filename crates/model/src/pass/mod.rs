pub mod args;
pub mod key;
pub mod limit;

pub use args::PassArgs;
pub use key::tracking_key;
pub use limit::BatchLimit;
