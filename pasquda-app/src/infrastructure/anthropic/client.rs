use super::parse::{parse_battle_verdict, parse_roast_payload};
use super::prompt::{
    build_battle_prompt, BATTLE_SYSTEM_PROMPT, LINKEDIN_SYSTEM_PROMPT, RESUME_SYSTEM_PROMPT,
    WEBSITE_SYSTEM_PROMPT,
};
use super::types::{ContentBlock, MessagesRequest, MessagesResponse};
use crate::domain::{BattleVerdict, RoastPayload, RoastSnapshot};
use base64::Engine;
use pasquda_errors::AppError;
use std::time::Duration;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 1024;

/// Anthropic returns 529 when the service is overloaded.
const OVERLOADED_STATUS: u16 = 529;
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_secs(2);

enum SendError {
    Overloaded,
    Failed(AppError),
}

impl SendError {
    fn into_app_error(self) -> AppError {
        match self {
            SendError::Overloaded => {
                AppError::GenerationFailed("service overloaded".to_string())
            }
            SendError::Failed(err) => err,
        }
    }
}

pub struct AnthropicClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Website roast: screenshot pixels plus the URL. Retries the call once
    /// on parse failure; API errors propagate to the pipeline.
    pub async fn roast_website(
        &self,
        url: &str,
        screenshot_png: &[u8],
    ) -> Result<RoastPayload, AppError> {
        let data = base64::engine::general_purpose::STANDARD.encode(screenshot_png);
        let request = MessagesRequest::new(
            MODEL,
            MAX_TOKENS,
            WEBSITE_SYSTEM_PROMPT,
            vec![
                ContentBlock::base64_image("image/png", data),
                ContentBlock::text(format!("Roast this website: {url}")),
            ],
        );

        for attempt in 1..=2u32 {
            let text = self.send(&request).await.map_err(SendError::into_app_error)?;
            if let Some(payload) = parse_roast_payload(&text) {
                return Ok(payload);
            }
            tracing::warn!(attempt, "website roast response failed shape validation");
        }

        Ok(RoastPayload::emergency())
    }

    /// LinkedIn roast: pasted text and/or a profile screenshot.
    pub async fn roast_linkedin(
        &self,
        text: Option<&str>,
        image_base64: Option<&str>,
    ) -> Result<RoastPayload, AppError> {
        let mut content = Vec::new();
        if let Some(image) = image_base64 {
            content.push(ContentBlock::base64_image(
                sniff_media_type(image),
                image.to_string(),
            ));
        }
        if let Some(text) = text {
            content.push(ContentBlock::text(format!(
                "Roast this LinkedIn profile:\n\n{text}"
            )));
        } else {
            content.push(ContentBlock::text("Roast this LinkedIn profile."));
        }

        let request = MessagesRequest::new(MODEL, MAX_TOKENS, LINKEDIN_SYSTEM_PROMPT, content);
        self.roast_with_backoff(&request).await
    }

    /// Resume roast over text already extracted from the uploaded PDF.
    pub async fn roast_resume(&self, resume_text: &str) -> Result<RoastPayload, AppError> {
        let request = MessagesRequest::new(
            MODEL,
            MAX_TOKENS,
            RESUME_SYSTEM_PROMPT,
            vec![ContentBlock::text(format!(
                "Roast this resume:\n\n{resume_text}"
            ))],
        );
        self.roast_with_backoff(&request).await
    }

    /// Single-shot verdict over two completed roasts. Infallible: any call
    /// or parse failure falls back to the deterministic lower-score rule.
    pub async fn battle_verdict(&self, a: &RoastSnapshot, b: &RoastSnapshot) -> BattleVerdict {
        let request = MessagesRequest::new(
            MODEL,
            MAX_TOKENS,
            BATTLE_SYSTEM_PROMPT,
            vec![ContentBlock::text(build_battle_prompt(a, b))],
        );

        match self.send(&request).await {
            Ok(text) => parse_battle_verdict(&text).unwrap_or_else(|| {
                tracing::warn!("verdict response unparseable, using score fallback");
                BattleVerdict::fallback(a, b)
            }),
            Err(err) => {
                tracing::warn!(
                    "verdict call failed ({}), using score fallback",
                    err.into_app_error()
                );
                BattleVerdict::fallback(a, b)
            }
        }
    }

    /// Up to three attempts with linearly increasing backoff, retrying on
    /// overload and on parse failure. Overload past the last attempt
    /// propagates; a run of parse failures degrades to the emergency roast.
    async fn roast_with_backoff(
        &self,
        request: &MessagesRequest,
    ) -> Result<RoastPayload, AppError> {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.send(request).await {
                Ok(text) => {
                    if let Some(payload) = parse_roast_payload(&text) {
                        return Ok(payload);
                    }
                    tracing::warn!(attempt, "roast response failed shape validation");
                }
                Err(SendError::Overloaded) => {
                    if attempt == MAX_ATTEMPTS {
                        return Err(SendError::Overloaded.into_app_error());
                    }
                    tracing::warn!(attempt, "model service overloaded, backing off");
                }
                Err(SendError::Failed(err)) => return Err(err),
            }
            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(BACKOFF_STEP * attempt).await;
            }
        }

        Ok(RoastPayload::emergency())
    }

    async fn send(&self, request: &MessagesRequest) -> Result<String, SendError> {
        let response = self
            .http_client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| SendError::Failed(AppError::GenerationFailed(e.to_string())))?;

        let status = response.status();
        if status.as_u16() == OVERLOADED_STATUS {
            return Err(SendError::Overloaded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("model API error: {} - {}", status, body);
            return Err(SendError::Failed(AppError::GenerationFailed(format!(
                "API error: {status}"
            ))));
        }

        let completion: MessagesResponse = response
            .json()
            .await
            .map_err(|e| SendError::Failed(AppError::GenerationFailed(e.to_string())))?;

        completion
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| {
                SendError::Failed(AppError::GenerationFailed(
                    "no text in model response".to_string(),
                ))
            })
    }
}

/// JPEG base64 payloads start with `/9j/`; everything else is treated as PNG.
fn sniff_media_type(base64_data: &str) -> &'static str {
    if base64_data.starts_with("/9j/") {
        "image/jpeg"
    } else {
        "image/png"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_sniffing() {
        assert_eq!(sniff_media_type("/9j/4AAQSkZJRg=="), "image/jpeg");
        assert_eq!(sniff_media_type("iVBORw0KGgo="), "image/png");
    }
}
