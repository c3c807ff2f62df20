use crate::models::AnalysisRequest;
use crate::services::input::barcode_from_body;
use crate::services::AnalyzeInput;
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde_json::Value;
use service_core::error::AppError;

/// `POST /api/analyze`: identify and score the product in an uploaded photo.
pub async fn analyze_image(
    State(state): State<AppState>,
    AnalyzeInput(image): AnalyzeInput,
) -> Result<Json<Value>, AppError> {
    tracing::info!(
        mime_type = %image.mime_type,
        base64_len = image.data.len(),
        "Analyzing image"
    );

    state
        .analyzer
        .analyze(AnalysisRequest::Image(image))
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "Image analysis failed");
            AppError::failure("AI analysis failed", e)
        })
}

/// `POST /api/analyze-barcode`: identify and score a product from its barcode.
pub async fn analyze_barcode(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let barcode = barcode_from_body(&headers, &body)?;

    tracing::info!(barcode = %barcode, "Looking up barcode");

    state
        .analyzer
        .analyze(AnalysisRequest::Barcode(barcode))
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "Barcode lookup failed");
            AppError::failure("Barcode lookup failed", e)
        })
}
