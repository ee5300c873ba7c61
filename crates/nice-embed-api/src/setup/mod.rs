//! Application setup and initialization

pub mod routes;
pub mod server;

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use nice_embed_core::AppConfig;
use nice_embed_infra::{DiscordWebhook, DiscordWebhookConfig};
use tokio::process::Command;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: AppConfig) -> Result<(Arc<AppState>, Router)> {
    nice_embed_infra::init_telemetry(&config.environment)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded successfully");

    prepare_upload_dirs(&config).await?;
    check_media_tool(&config.ffprobe_path).await;
    check_media_tool(&config.ffmpeg_path).await;

    let webhook = DiscordWebhook::new(DiscordWebhookConfig::from(&config))?;
    let state = Arc::new(AppState::new(config, Arc::new(webhook)));

    let router = routes::setup_routes(&state.config, state.clone());

    Ok((state, router))
}

/// Create the upload root and its `video/` subdirectory.
pub async fn prepare_upload_dirs(config: &AppConfig) -> Result<()> {
    let video_dir = config.video_dir();
    tokio::fs::create_dir_all(&video_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", video_dir.display()))?;
    Ok(())
}

// Missing tools only break video uploads, so this warns instead of failing startup.
async fn check_media_tool(program: &str) {
    let status = Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await;

    match status {
        Ok(status) if status.success() => {
            tracing::debug!(program = %program, "Media tool available");
        }
        Ok(status) => {
            tracing::warn!(program = %program, status = %status, "Media tool returned an error, video uploads will fail");
        }
        Err(e) => {
            tracing::warn!(program = %program, error = %e, "Media tool not runnable, video uploads will fail");
        }
    }
}
