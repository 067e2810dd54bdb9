//! HTTP handlers for the advisory operations.
//!
//! Handlers never fail on bad parameters: a missing or unreadable body just
//! means every parameter takes its default. The one exception is the disease
//! upload, which cannot do anything without an image.

use crate::advisory::{AdvisoryOutcome, AdvisoryParams, Advisor, Operation};
use crate::ai::InlineImage;
use crate::error::{FarmError, FarmResult};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Multipart, Query, State as AxumState},
    Json,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

fn body_params(payload: Result<Json<AdvisoryParams>, JsonRejection>) -> AdvisoryParams {
    match payload {
        Ok(Json(params)) => params,
        Err(e) => {
            tracing::debug!("Advisory body ignored, using defaults: {}", e.body_text());
            AdvisoryParams::new()
        }
    }
}

async fn advise_body(
    advisor: &Advisor,
    operation: Operation,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advisor.advise(operation, &body_params(payload), None).await
}

async fn advise_query(
    advisor: &Advisor,
    operation: Operation,
    query: HashMap<String, String>,
) -> AdvisoryOutcome {
    advisor
        .advise(operation, &AdvisoryParams::from_query(query), None)
        .await
}

pub async fn crop_recommendation_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advise_body(&advisor, Operation::CropRecommendation, payload).await
}

pub async fn market_prices_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    Query(query): Query<HashMap<String, String>>,
) -> AdvisoryOutcome {
    advise_query(&advisor, Operation::MarketPrices, query).await
}

pub async fn irrigation_plan_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advise_body(&advisor, Operation::IrrigationPlan, payload).await
}

pub async fn fertilizer_plan_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advise_body(&advisor, Operation::FertilizerPlan, payload).await
}

pub async fn weather_summary_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    Query(query): Query<HashMap<String, String>>,
) -> AdvisoryOutcome {
    advise_query(&advisor, Operation::WeatherSummary, query).await
}

pub async fn soil_analysis_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advise_body(&advisor, Operation::SoilAnalysis, payload).await
}

pub async fn news_digest_axum(AxumState(advisor): AxumState<Arc<Advisor>>) -> AdvisoryOutcome {
    advisor
        .advise(Operation::NewsDigest, &AdvisoryParams::new(), None)
        .await
}

pub async fn government_schemes_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
) -> AdvisoryOutcome {
    advisor
        .advise(Operation::GovernmentSchemes, &AdvisoryParams::new(), None)
        .await
}

pub async fn yield_prediction_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advise_body(&advisor, Operation::YieldPrediction, payload).await
}

pub async fn farming_calculator_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advise_body(&advisor, Operation::FarmingCalculator, payload).await
}

pub async fn farm_analytics_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advise_body(&advisor, Operation::FarmAnalytics, payload).await
}

pub async fn task_optimization_axum(
    AxumState(advisor): AxumState<Arc<Advisor>>,
    payload: Result<Json<AdvisoryParams>, JsonRejection>,
) -> AdvisoryOutcome {
    advise_body(&advisor, Operation::TaskOptimization, payload).await
}

/// Reduces a client-supplied file name to `[A-Za-z0-9._-]`, without leading
/// dots or any directory part.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// MIME type for an accepted image file name, `None` for anything else.
pub fn image_mime_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        _ => "image/jpeg",
    })
}

/// Multipart upload with an `image` part. The file passes through the upload
/// directory and is removed again before the response is sent.
pub async fn disease_diagnosis_axum(
    AxumState(state): AxumState<AppState>,
    mut multipart: Multipart,
) -> FarmResult<AdvisoryOutcome> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FarmError::Validation(e.body_text()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = sanitize_filename(field.file_name().unwrap_or_default());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| FarmError::Validation(e.body_text()))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = upload
        .filter(|(name, bytes)| !name.is_empty() && !bytes.is_empty())
        .ok_or_else(|| FarmError::Validation("No image file selected".to_string()))?;

    let mime_type = image_mime_type(&file_name).ok_or_else(|| {
        FarmError::Validation("Only PNG, JPG, JPEG and GIF images are accepted".to_string())
    })?;

    let stored_name = format!("{}_{}", chrono::Utc::now().timestamp_micros(), file_name);
    let path = state.upload_dir.join(&stored_name);
    tokio::fs::write(&path, &bytes).await?;
    let read_back = tokio::fs::read(&path).await;
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!("Failed to remove upload {:?}: {}", path, e);
    }
    let image = InlineImage::from_bytes(mime_type, &read_back?);

    tracing::info!("Diagnosing uploaded image {} ({} bytes)", file_name, bytes.len());
    Ok(state
        .advisor
        .advise(Operation::DiseaseDiagnosis, &AdvisoryParams::new(), Some(image))
        .await)
}
