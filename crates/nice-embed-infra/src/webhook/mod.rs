//! Upload notifications

mod discord;

use async_trait::async_trait;
use nice_embed_core::AppError;

pub use discord::{DiscordWebhook, DiscordWebhookConfig};

/// Destination for plain-text upload notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), AppError>;
}
