use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::Deserialize;

use crate::clients::retry::{send_with_retry, RetryPolicy};
use crate::clients::{TagSet, VisionClient};
use crate::error::AppError;

const ANALYZE_PATH: &str = "/vision/v3.2/analyze";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Shape of the analyze response we care about: the `name` of each tag, in
/// the order the service returned them. Everything else is ignored.
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    tags: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

pub struct AzureVisionClient {
    http: Client,
    endpoint: String,
    key: String,
    retry: RetryPolicy,
}

impl AzureVisionClient {
    pub fn new(http: Client, endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            key: key.into(),
            retry: RetryPolicy::default(),
        }
    }

    // The URL is built from the configured endpoint, never from the key.
    fn analyze_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), ANALYZE_PATH)
    }
}

#[async_trait]
impl VisionClient for AzureVisionClient {
    async fn tag_image(&self, image: &[u8]) -> Result<TagSet, AppError> {
        let image = image.to_vec();
        let url = self.analyze_url();

        let response = send_with_retry(&self.retry, "vision", || {
            self.http
                .post(&url)
                .query(&[("visualFeatures", "Tags"), ("language", "en")])
                .header(SUBSCRIPTION_KEY_HEADER, &self.key)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(image.clone())
        })
        .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                service: "vision",
                status: Some(status.as_u16()),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let analysis: AnalyzeResponse = response.json().await.map_err(|e| AppError::Upstream {
            service: "vision",
            status: None,
            message: format!("malformed analyze response: {e}"),
        })?;

        Ok(analysis.tags.into_iter().map(|t| t.name).collect())
    }
}
