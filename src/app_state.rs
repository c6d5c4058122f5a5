use std::sync::Arc;

use crate::clients::{LanguageClient, SpeechClient, VisionClient};
use crate::config::Config;

/// Shared application state injected into every request handler via Axum's
/// `State` extractor. The three upstream clients sit behind trait objects so
/// tests can swap in deterministic stubs without any network access.
pub struct AppState {
    pub config: Config,
    pub vision: Arc<dyn VisionClient>,
    pub language: Arc<dyn LanguageClient>,
    pub speech: Arc<dyn SpeechClient>,
}
