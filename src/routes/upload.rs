use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};

use crate::{app_state::AppState, error::AppError, prompt};

/// `POST /upload`: multipart image in → `{plant_info}` out.
///
/// The two outbound calls are strictly sequential: the vision call fully
/// completes (producing the tag list) before the language call begins. A
/// language failure after a successful vision call discards the tags.
pub async fn handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut image_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                filename = Some(field.file_name().unwrap_or_default().to_string());

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Multipart(e.to_string()))?;

                image_bytes = Some(bytes.to_vec());
            }

            _ => { /* ignore unexpected fields */ }
        }
    }

    let bytes = image_bytes.ok_or(AppError::MissingFile)?;
    if filename.as_deref().unwrap_or_default().is_empty() {
        return Err(AppError::EmptyFilename);
    }

    // Checked per request (not just at startup) so the failure is reported
    // before any outbound call is attempted.
    if state.config.vision_endpoint.trim().is_empty() || state.config.vision_key.trim().is_empty() {
        return Err(AppError::Config(
            "Vision service credentials are not configured".into(),
        ));
    }

    tracing::debug!(
        bytes = bytes.len(),
        filename = %filename.as_deref().unwrap_or_default(),
        "Sending image to vision service"
    );

    let tags = state.vision.tag_image(&bytes).await?;
    // Local, deterministic version of the selection rule the prompt asks the
    // model to apply: first non-generic tag in list order.
    let candidate = prompt::first_specific_tag(&tags);
    tracing::debug!(?tags, ?candidate, "Vision tags received");

    let raw = state.language.complete(&prompt::build_prompt(&tags)).await?;
    let plant_info = prompt::conform_summary(&raw);

    tracing::info!(chars = plant_info.len(), "Plant summary ready");

    Ok(Json(json!({ "plant_info": plant_info })))
}
