//! Garment image analysis handler.

use std::time::Instant;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use colorpair_gemini::{ColorAdvisor, InlineImage};
use colorpair_models::{normalize_reply, ColorSuggestion, GarmentType};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Detail returned when the upload is not an image.
pub const INVALID_UPLOAD_MESSAGE: &str = "Uploaded file must be an image";

/// How much of a bad model reply to keep in logs.
const RAW_RESPONSE_LOG_LIMIT: usize = 500;

/// Body of every `/analyze-image` reply that got past upload validation.
///
/// Failures after validation are still HTTP 200; callers must look at
/// `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalyzeResponse {
    Success { data: Vec<ColorSuggestion> },
    Error { message: String },
}

impl AnalyzeResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Fields collected from the multipart form.
#[derive(Debug, Default)]
struct UploadForm {
    image: Option<Vec<u8>>,
    content_type: Option<String>,
    image_type: Option<String>,
}

/// Analyze an uploaded garment image and suggest five pairing colors.
///
/// # Multipart Fields
/// - `image`: Image file (required, content type must start with `image/`)
/// - `image_type`: `top` or `bottom` (required, other values are passed through)
///
/// # Returns
/// - 200 with `{"status": "success", "data": [...]}` (exactly five entries)
/// - 200 with `{"status": "error", "message": ...}` if the model call or
///   response parsing fails
/// - 400 if the upload is not an image or the form is malformed
/// - 413 if the body exceeds the configured size limit
/// - 422 if a required field is missing
///
/// A non-image upload is rejected before `image_type` is looked at.
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalyzeResponse>> {
    let form = read_upload_form(&mut multipart).await?;

    let image_bytes = form
        .image
        .ok_or_else(|| ApiError::validation("Missing 'image' field"))?;

    let mime_type = match form.content_type {
        Some(ct) if is_image_content_type(&ct) => ct,
        other => {
            warn!(content_type = ?other, "Rejected non-image upload");
            metrics::record_analysis("invalid_upload");
            return Err(ApiError::invalid_upload(INVALID_UPLOAD_MESSAGE));
        }
    };

    let image_type = form
        .image_type
        .ok_or_else(|| ApiError::validation("Missing 'image_type' field"))?;

    let garment = GarmentType::from(image_type.as_str());
    if !garment.is_known() {
        warn!(image_type = %garment, "Unexpected image_type, forwarding as-is");
    }

    let image = InlineImage::new(mime_type, image_bytes);
    info!(
        garment = %garment,
        mime_type = %image.mime_type,
        image_bytes = image.len(),
        "Analyzing garment image"
    );

    Ok(Json(run_analysis(state.advisor.as_ref(), &image, &garment).await))
}

/// Ask the advisor for colors and normalize its reply.
///
/// Never fails: every error is folded into [`AnalyzeResponse::Error`].
pub async fn run_analysis(
    advisor: &dyn ColorAdvisor,
    image: &InlineImage,
    garment: &GarmentType,
) -> AnalyzeResponse {
    let start = Instant::now();
    let reply = advisor.suggest_colors(image, garment).await;
    metrics::record_ai_request_duration(reply.is_ok(), start.elapsed().as_secs_f64());

    let text = match reply {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "Color advisor call failed");
            metrics::record_analysis(e.kind());
            return AnalyzeResponse::error(e.to_string());
        }
    };

    match normalize_reply(&text) {
        Ok(reply) => {
            if reply.fillers_appended > 0 {
                metrics::record_fillers_appended(reply.fillers_appended);
            }
            let data = reply.suggestions;
            for suggestion in data.iter().filter(|s| !s.has_valid_hex()) {
                warn!(
                    color = %suggestion.color_name,
                    hex = %suggestion.hex_code,
                    "Suggestion has a non #RRGGBB hex code"
                );
            }
            metrics::record_analysis("success");
            AnalyzeResponse::Success { data }
        }
        Err(e) => {
            warn!(
                error = %e,
                raw_response = %truncate_for_log(&text, RAW_RESPONSE_LOG_LIMIT),
                "Could not normalize model response"
            );
            metrics::record_analysis(e.kind());
            AnalyzeResponse::error(e.to_string())
        }
    }
}

async fn read_upload_form(multipart: &mut Multipart) -> ApiResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("image") => {
                form.content_type = field.content_type().map(|c| c.to_string());
                form.image = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            Some("image_type") => {
                form.image_type = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::bad_request(format!("Multipart error: {}", e.body_text()))
    }
}

fn is_image_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}
