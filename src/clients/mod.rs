//! Narrow, mockable interfaces over the three cloud services the bridge
//! depends on, plus their Azure implementations. Handlers only ever see the
//! traits; tests inject stubs, `main` wires up the real clients.

pub mod language;
pub mod retry;
pub mod speech;
pub mod vision;

pub use language::AzureLanguageClient;
pub use speech::AzureSpeechClient;
pub use vision::AzureVisionClient;

use async_trait::async_trait;

use crate::error::AppError;

/// Ordered tag names from the vision service. Order is meaningful (the
/// first specific name in the list wins downstream) and duplicates are kept.
pub type TagSet = Vec<String>;

#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Tag a raw image. Non-success upstream responses surface as
    /// `AppError::Upstream` carrying the upstream status code.
    async fn tag_image(&self, image: &[u8]) -> Result<TagSet, AppError>;
}

#[async_trait]
pub trait LanguageClient: Send + Sync {
    /// Submit one prompt, return the first completion's text verbatim.
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;
}

#[async_trait]
pub trait SpeechClient: Send + Sync {
    /// Synthesize speech audio for the given text.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AppError>;
}
