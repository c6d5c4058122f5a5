use std::sync::Arc;

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{app_state::AppState, error::AppError};

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub plant_info: String,
}

/// `POST /synthesize_audio`: `{plant_info}` in → `{audio_data}` (base64) out.
///
/// Decoupled from `/upload`; the caller re-submits the summary text it was
/// given. Identical text is re-synthesized on every call.
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Json<Value>, AppError> {
    tracing::debug!(chars = request.plant_info.len(), "Synthesizing speech");

    let audio = state.speech.synthesize(&request.plant_info).await?;

    tracing::info!(bytes = audio.len(), "Speech synthesis complete");

    Ok(Json(json!({ "audio_data": BASE64.encode(&audio) })))
}
