use pasquda_errors::AppError;

pub const SCREENSHOTS_BUCKET: &str = "screenshots";
pub const UPLOADS_BUCKET: &str = "uploads";

/// Client for the managed object-storage service. Uploads are upserts and
/// the returned URLs are publicly readable.
pub struct StorageClient {
    http_client: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    /// Uploads `bytes` into `bucket/filename` and returns the public URL.
    pub async fn upload(
        &self,
        bucket: &str,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let endpoint = format!("{}/storage/v1/object/{bucket}/{filename}", self.base_url);

        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.service_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::StorageFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("storage upload failed: {} - {}", status, body);
            return Err(AppError::StorageFailed(format!("upload error: {status}")));
        }

        Ok(self.public_url(bucket, filename))
    }

    /// Fetches raw bytes from a previously-returned public URL (used to
    /// re-feed cached screenshots to the model).
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::StorageFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::StorageFailed(format!(
                "download error: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::StorageFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    fn public_url(&self, bucket: &str, filename: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{filename}",
            self.base_url
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_layout() {
        let client = StorageClient::new("https://proj.supabase.co/".to_string(), "key".into());
        assert_eq!(
            client.public_url("screenshots", "example.com-1.png"),
            "https://proj.supabase.co/storage/v1/object/public/screenshots/example.com-1.png"
        );
    }
}
