use crate::domain::RoastInput;
use crate::infrastructure::anthropic::AnthropicClient;
use crate::infrastructure::db::RoastRepository;
use crate::infrastructure::screenshot::ScreenshotClient;
use crate::infrastructure::storage::{StorageClient, SCREENSHOTS_BUCKET};
use pasquda_errors::AppError;
use std::sync::Arc;
use uuid::Uuid;

/// A validated website URL plus its display domain, as created for battles.
#[derive(Debug, Clone)]
pub struct WebsiteSubmission {
    pub id: Uuid,
    pub url: String,
    pub domain: String,
}

/// Drives one roast from pending to terminal: acquire content, generate,
/// persist. Runs in the background after the request has returned.
pub struct RoastPipeline {
    roasts: RoastRepository,
    screenshots: ScreenshotClient,
    storage: Arc<StorageClient>,
    anthropic: Arc<AnthropicClient>,
}

impl RoastPipeline {
    pub fn new(
        roasts: RoastRepository,
        screenshots: ScreenshotClient,
        storage: Arc<StorageClient>,
        anthropic: Arc<AnthropicClient>,
    ) -> Self {
        Self {
            roasts,
            screenshots,
            storage,
            anthropic,
        }
    }

    /// Never leaves the record in `processing`: any error is absorbed into
    /// a terminal `failed` row with a themed message.
    pub async fn run(&self, id: Uuid, input: RoastInput) {
        if let Err(err) = self.process(id, &input).await {
            tracing::error!(%id, error = %err, "roast pipeline failed");
            if let Err(mark_err) = self.roasts.fail(id, input.failure_message()).await {
                tracing::error!(%id, error = %mark_err, "could not mark roast as failed");
            }
        }
    }

    async fn process(&self, id: Uuid, input: &RoastInput) -> Result<(), AppError> {
        match input {
            RoastInput::Website { url, domain } => {
                let (pixels, screenshot_url) = self.resolve_screenshot(url, domain).await?;
                let payload = self.anthropic.roast_website(url, &pixels).await?;
                self.roasts
                    .complete(id, &payload, Some(screenshot_url))
                    .await
                    .map_err(db_err)?;
            }
            RoastInput::LinkedIn {
                text,
                image_base64,
                file_url,
            } => {
                let payload = self
                    .anthropic
                    .roast_linkedin(text.as_deref(), image_base64.as_deref())
                    .await?;
                self.roasts
                    .complete(id, &payload, file_url.clone())
                    .await
                    .map_err(db_err)?;
            }
            RoastInput::Resume { text, .. } => {
                let payload = self.anthropic.roast_resume(text).await?;
                self.roasts.complete(id, &payload, None).await.map_err(db_err)?;
            }
        }
        Ok(())
    }

    /// Reuses a screenshot captured for the same domain within the last
    /// hour, re-downloading its pixels for the model; otherwise captures
    /// fresh and uploads.
    async fn resolve_screenshot(
        &self,
        url: &str,
        domain: &str,
    ) -> Result<(Vec<u8>, String), AppError> {
        if let Some(cached_url) = self
            .roasts
            .find_recent_screenshot(domain)
            .await
            .map_err(db_err)?
        {
            tracing::info!(domain, "reusing cached screenshot");
            let pixels = self.storage.download(&cached_url).await?;
            return Ok((pixels, cached_url));
        }

        let pixels = self.screenshots.capture(url).await?;
        let filename = format!("{domain}-{}.png", chrono::Utc::now().timestamp_millis());
        let screenshot_url = self
            .storage
            .upload(SCREENSHOTS_BUCKET, &filename, pixels.clone(), "image/png")
            .await?;
        Ok((pixels, screenshot_url))
    }
}

pub fn db_err(err: sea_orm::DbErr) -> AppError {
    AppError::Database(err.to_string())
}
