pub mod asset;
pub mod content;
pub mod gemini;
pub mod request;

pub use asset::*;
pub use content::*;
pub use gemini::*;
pub use request::*;
