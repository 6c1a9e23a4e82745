use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::ModelError;

/// Model input: PCM total and KCET exam score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Features {
    pub pcm_total: f64,
    pub kcet: f64,
}

impl Features {
    pub const NAMES: [&'static str; 2] = ["pcm_total", "kcet"];

    pub fn as_array(&self) -> [f64; 2] {
        [self.pcm_total, self.kcet]
    }
}

#[derive(Debug, Error)]
#[error("prediction failed: {0}")]
pub struct PredictorError(pub String);

/// Maps features to a predicted rank.
///
/// Implementations must be read-only after construction; one instance is
/// shared by every request.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &Features) -> Result<f64, PredictorError>;
}

/// Linear regression exported as JSON:
/// `{"feature_names": [...], "coefficients": [...], "intercept": f}`.
#[derive(Clone, Debug, Deserialize)]
pub struct LinearModel {
    #[serde(default = "default_feature_names")]
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

fn default_feature_names() -> Vec<String> {
    Features::NAMES.iter().map(|s| s.to_string()).collect()
}

impl LinearModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        let model: LinearModel = serde_json::from_str(content)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names != Features::NAMES {
            return Err(ModelError::Invalid(format!(
                "expected features {:?}, got {:?}",
                Features::NAMES,
                self.feature_names
            )));
        }
        if self.coefficients.len() != self.feature_names.len() {
            return Err(ModelError::Invalid(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid("non-finite parameter".into()));
        }
        Ok(())
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &Features) -> Result<f64, PredictorError> {
        let value = self
            .coefficients
            .iter()
            .zip(features.as_array())
            .fold(self.intercept, |acc, (c, x)| acc + c * x);

        if value.is_finite() {
            Ok(value)
        } else {
            Err(PredictorError(format!("non-finite output {value}")))
        }
    }
}

/// Converts a raw model output to a rank, truncating toward zero.
pub fn to_rank(raw: f64) -> Result<i64, PredictorError> {
    if !raw.is_finite() {
        return Err(PredictorError(format!("cannot convert {raw} to a rank")));
    }
    Ok(raw.trunc() as i64)
}
