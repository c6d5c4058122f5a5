use async_trait::async_trait;
use reqwest::{
    header::{CONTENT_TYPE, USER_AGENT},
    Client,
};

use crate::clients::retry::{send_with_retry, RetryPolicy};
use crate::clients::SpeechClient;
use crate::error::AppError;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// MP3 keeps the base64 payload small enough for a JSON envelope.
const OUTPUT_FORMAT: &str = "audio-16khz-128kbitrate-mono-mp3";
const VOICE_NAME: &str = "en-US-JennyNeural";

pub struct AzureSpeechClient {
    http: Client,
    key: String,
    region: String,
    retry: RetryPolicy,
}

impl AzureSpeechClient {
    pub fn new(http: Client, key: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            http,
            key: key.into(),
            region: region.into(),
            retry: RetryPolicy::default(),
        }
    }

    fn synthesize_url(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.region
        )
    }
}

/// Wrap text in the minimal SSML document the synthesis endpoint requires.
fn ssml_document(text: &str) -> String {
    format!(
        "<speak version='1.0' xml:lang='en-US'>\
         <voice xml:lang='en-US' name='{VOICE_NAME}'>{}</voice>\
         </speak>",
        xml_escape(text)
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl SpeechClient for AzureSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AppError> {
        let url = self.synthesize_url();
        let body = ssml_document(text);

        let response = send_with_retry(&self.retry, "speech", || {
            self.http
                .post(&url)
                .header(SUBSCRIPTION_KEY_HEADER, &self.key)
                .header(CONTENT_TYPE, "application/ssml+xml")
                .header(OUTPUT_FORMAT_HEADER, OUTPUT_FORMAT)
                .header(USER_AGENT, concat!("flora-bridge/", env!("CARGO_PKG_VERSION")))
                .body(body.clone())
        })
        .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                service: "speech",
                status: None,
                message: format!("HTTP {status}: {body}"),
            });
        }

        let audio = response.bytes().await.map_err(|e| AppError::Upstream {
            service: "speech",
            status: None,
            message: format!("failed to read audio body: {e}"),
        })?;

        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssml_wraps_and_escapes_text() {
        let doc = ssml_document("Oaks & maples are <tall>");
        assert!(doc.starts_with("<speak"));
        assert!(doc.contains("Oaks &amp; maples are &lt;tall&gt;"));
        assert!(doc.contains(VOICE_NAME));
    }
}
