use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use nice_embed_core::{AppConfig, AppError};
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::Notifier;

const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Configuration for Discord webhook delivery
#[derive(Clone, Debug)]
pub struct DiscordWebhookConfig {
    pub url: String,
    pub timeout: Duration,
    /// Retries allowed after HTTP 429 responses
    pub rate_limit_retries: u32,
}

impl From<&AppConfig> for DiscordWebhookConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            url: config.webhook_url.clone(),
            timeout: config.webhook_timeout,
            rate_limit_retries: config.webhook_rate_limit_retries,
        }
    }
}

#[derive(Serialize)]
struct ExecuteWebhook<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct RateLimited {
    retry_after: Option<f64>,
}

/// Posts messages to a Discord execute-webhook URL.
#[derive(Clone)]
pub struct DiscordWebhook {
    client: Client,
    config: DiscordWebhookConfig,
}

impl DiscordWebhook {
    pub fn new(config: DiscordWebhookConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .context("Failed to create HTTP client for webhooks")?;

        Ok(Self { client, config })
    }

    async fn send(&self, message: &str) -> Result<Response, AppError> {
        self.client
            .post(&self.config.url)
            .json(&ExecuteWebhook { content: message })
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("webhook request failed: {}", e)))
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    #[tracing::instrument(skip(self))]
    async fn notify(&self, message: &str) -> Result<(), AppError> {
        let mut retries = 0;

        loop {
            let response = self.send(message).await?;
            let status = response.status();

            if status.is_success() {
                tracing::debug!(status = status.as_u16(), "Webhook delivered");
                return Ok(());
            }

            if status == StatusCode::TOO_MANY_REQUESTS && retries < self.config.rate_limit_retries {
                retries += 1;
                let wait = retry_delay(response).await;
                tracing::warn!(
                    attempt = retries,
                    wait_ms = wait.as_millis() as u64,
                    "Webhook rate limited, retrying"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "webhook returned HTTP {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }
    }
}

/// How long a 429 response asks us to wait, clamped to [`MAX_RETRY_AFTER`].
async fn retry_delay(response: Response) -> Duration {
    let header = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok());

    let body = response
        .json::<RateLimited>()
        .await
        .ok()
        .and_then(|b| b.retry_after);

    body.or(header)
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| Duration::from_secs_f64(secs.min(MAX_RETRY_AFTER.as_secs_f64())))
        .unwrap_or(DEFAULT_RETRY_AFTER)
}
