use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use tracing::info;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::predict::{eligible_colleges, features, predict_rank, shape};
use crate::schema::{PredictKcetRequest, PredictionResponse, ScoreInput};

/// `POST /predict_kcet`: predict a rank from PCM and KCET marks, then list
/// the colleges that rank can get into.
pub async fn predict_kcet(
    State(state): State<AppState>,
    payload: Result<Json<PredictKcetRequest>, JsonRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let Json(payload) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let input = ScoreInput::try_from(payload)?;

    let features = features(&input)?;
    let predicted_rank = predict_rank(state.predictor.as_ref(), &features)?;

    let source = Arc::clone(&state.colleges);
    let table = tokio::task::spawn_blocking(move || source.load())
        .await
        .map_err(|e| ApiError::Internal(format!("college table load aborted: {e}")))??;

    let colleges = eligible_colleges(&table, &input.category, predicted_rank, &input.branches)?;

    info!(
        pcm_total = features.pcm_total,
        kcet = input.kcet,
        category = %input.category,
        predicted_rank,
        eligible = colleges.len(),
        "prediction served"
    );

    Ok(Json(shape(&input, predicted_rank, colleges)))
}
