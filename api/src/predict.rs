//! Prediction pipeline stages. Each one returns early on error so a failed
//! request never produces a partial result.

use crate::error::{ApiError, ApiResult};
use crate::model::CollegeTable;
use crate::predictor::{to_rank, Features, Predictor};
use crate::schema::{EligibleCollege, PredictionResponse, ScoreInput, NO_COLLEGES_MESSAGE};

pub fn features(input: &ScoreInput) -> ApiResult<Features> {
    Ok(Features {
        pcm_total: input.pcm_total()? as f64,
        kcet: input.kcet as f64,
    })
}

pub fn predict_rank(predictor: &dyn Predictor, features: &Features) -> ApiResult<i64> {
    predictor
        .predict(features)
        .and_then(to_rank)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Colleges whose `category` cutoff is strictly above `predicted_rank`,
/// narrowed to `branches` when non-empty, sorted ascending by cutoff.
/// Equal cutoffs keep table order.
pub fn eligible_colleges(
    table: &CollegeTable,
    category: &str,
    predicted_rank: i64,
    branches: &[String],
) -> ApiResult<Vec<EligibleCollege>> {
    let idx = table
        .category_index(category)
        .ok_or(ApiError::InvalidCategory)?;

    let mut eligible: Vec<EligibleCollege> = table
        .records()
        .iter()
        .filter(|r| branches.is_empty() || branches.iter().any(|b| *b == r.branch))
        .filter_map(|r| {
            let cutoff = r.cutoff(idx);
            (cutoff > predicted_rank).then(|| EligibleCollege {
                code: r.code.clone(),
                college: r.college.clone(),
                branch: r.branch.clone(),
                cutoff,
            })
        })
        .collect();

    eligible.sort_by_key(|c| c.cutoff);
    Ok(eligible)
}

pub fn shape(
    input: &ScoreInput,
    predicted_rank: i64,
    eligible: Vec<EligibleCollege>,
) -> PredictionResponse {
    if eligible.is_empty() {
        return PredictionResponse::NoColleges {
            predicted_rank,
            message: NO_COLLEGES_MESSAGE,
        };
    }
    PredictionResponse::Eligible {
        phy: input.phy,
        chem: input.chem,
        math: input.math,
        kcet: input.kcet,
        predicted_rank,
        eligible_colleges: eligible,
    }
}
