//! nice-embed infrastructure library
//!
//! Shared plumbing for the HTTP service:
//! - Telemetry initialization
//! - Middleware (request ID)
//! - Webhook notifications

pub mod middleware;
pub mod telemetry;
pub mod webhook;

// Re-export commonly used types
pub use middleware::{request_id_middleware, RequestId};
pub use telemetry::init_telemetry;
pub use webhook::{DiscordWebhook, DiscordWebhookConfig, Notifier};
