//! nice-embed core library
//!
//! Configuration, error types and the small pure helpers (filename sanitizing,
//! URL joining) shared by every nice-embed crate.

pub mod config;
pub mod error;
pub mod filename;
pub mod url;

// Re-export commonly used types
pub use config::{is_production_environment, AppConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use filename::sanitize_filename;
pub use url::join_url;
