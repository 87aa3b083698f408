pub mod buffer;
pub mod lookback;

pub use buffer::VisibilityBuffer;
pub use lookback::Lookback;
