pub mod error;
pub mod source;
pub mod window;

pub use error::SettingsError;
pub use source::SourceSettings;
pub use window::WindowSettings;
