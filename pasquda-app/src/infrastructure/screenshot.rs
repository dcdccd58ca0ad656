use pasquda_errors::AppError;
use std::time::Duration;

const SCREENSHOTONE_API_URL: &str = "https://api.screenshotone.com/take";

const VIEWPORT_WIDTH: u32 = 1280;
const VIEWPORT_HEIGHT: u32 = 800;
/// Seconds the capture service waits for the page to settle.
const SETTLE_DELAY_SECS: u32 = 3;
/// Capture timeout enforced by the service.
const CAPTURE_TIMEOUT_SECS: u32 = 15;
/// Outer bound on the whole HTTP round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wrapper around the screenshot-capture SaaS. Single attempt; failures
/// propagate to the pipeline.
pub struct ScreenshotClient {
    http_client: reqwest::Client,
    access_key: String,
}

impl ScreenshotClient {
    pub fn new(access_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            access_key,
        }
    }

    /// Captures a PNG of the page at `url` with a fixed viewport and
    /// ad/cookie-banner/chat-widget blocking enabled.
    pub async fn capture(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .http_client
            .get(SCREENSHOTONE_API_URL)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("access_key", self.access_key.clone()),
                ("url", url.to_string()),
                ("viewport_width", VIEWPORT_WIDTH.to_string()),
                ("viewport_height", VIEWPORT_HEIGHT.to_string()),
                ("format", "png".to_string()),
                ("block_ads", "true".to_string()),
                ("block_cookie_banners", "true".to_string()),
                ("block_chats", "true".to_string()),
                ("delay", SETTLE_DELAY_SECS.to_string()),
                ("timeout", CAPTURE_TIMEOUT_SECS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ScreenshotFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("screenshot capture failed: {} - {}", status, body);
            return Err(AppError::ScreenshotFailed(format!("API error: {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::ScreenshotFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
