use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::clients::retry::{send_with_retry, RetryPolicy};
use crate::clients::LanguageClient;
use crate::error::AppError;

const API_VERSION: &str = "2024-02-01";

/// Hard cap on generated tokens; the summary is requested to stay under
/// 1000 characters anyway.
const MAX_COMPLETION_TOKENS: u32 = 200;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

pub struct AzureLanguageClient {
    http: Client,
    endpoint: String,
    key: String,
    deployment: String,
    retry: RetryPolicy,
}

impl AzureLanguageClient {
    pub fn new(
        http: Client,
        endpoint: impl Into<String>,
        key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            key: key.into(),
            deployment: deployment.into(),
            retry: RetryPolicy::default(),
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={API_VERSION}",
            self.endpoint.trim_end_matches('/'),
            self.deployment
        )
    }
}

#[async_trait]
impl LanguageClient for AzureLanguageClient {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let url = self.completions_url();
        let request = ChatRequest {
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = send_with_retry(&self.retry, "language", || {
            self.http.post(&url).header("api-key", &self.key).json(&request)
        })
        .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                service: "language",
                status: None,
                message: format!("HTTP {status}: {body}"),
            });
        }

        let completion: ChatResponse = response.json().await.map_err(|e| AppError::Upstream {
            service: "language",
            status: None,
            message: format!("malformed completion response: {e}"),
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::Upstream {
                service: "language",
                status: None,
                message: "completion response contained no choices".into(),
            })
    }
}
