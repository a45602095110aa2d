pub mod error;
pub mod gemini;
pub mod media;
pub mod studio_api;

pub use error::StudioError;
