use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

pub const NO_COLLEGES_MESSAGE: &str = "Sorry, no colleges available.";

/// Raw `POST /predict_kcet` body. Scores stay untyped until `ScoreInput`
/// coerces them, so absence and bad types can be told apart.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PredictKcetRequest {
    pub phy: Option<Value>,
    pub chem: Option<Value>,
    pub math: Option<Value>,
    pub kcet: Option<Value>,
    pub category: Option<Value>,
    pub branches: Option<Vec<String>>,
}

/// Validated request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreInput {
    pub phy: i64,
    pub chem: i64,
    pub math: i64,
    pub kcet: i64,
    pub category: String,
    pub branches: Vec<String>,
}

impl ScoreInput {
    pub fn pcm_total(&self) -> ApiResult<i64> {
        self.phy
            .checked_add(self.chem)
            .and_then(|sum| sum.checked_add(self.math))
            .ok_or(ApiError::InvalidType)
    }
}

impl TryFrom<PredictKcetRequest> for ScoreInput {
    type Error = ApiError;

    fn try_from(req: PredictKcetRequest) -> ApiResult<Self> {
        let (Some(phy), Some(chem), Some(math), Some(kcet), Some(category)) =
            (req.phy, req.chem, req.math, req.kcet, req.category)
        else {
            return Err(ApiError::MissingField);
        };

        let phy = coerce_score(&phy)?;
        let chem = coerce_score(&chem)?;
        let math = coerce_score(&math)?;
        let kcet = coerce_score(&kcet)?;

        let Value::String(category) = category else {
            return Err(ApiError::InvalidCategory);
        };

        Ok(Self {
            phy,
            chem,
            math,
            kcet,
            category,
            branches: req.branches.unwrap_or_default(),
        })
    }
}

/// Accepts integers, finite numbers (truncated) and integer strings.
pub fn coerce_score(value: &Value) -> ApiResult<i64> {
    let score = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => match n.as_f64() {
                Some(f) if f.is_finite() && f.abs() < i64::MAX as f64 => f.trunc() as i64,
                _ => return Err(ApiError::InvalidType),
            },
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| ApiError::InvalidType)?,
        _ => return Err(ApiError::InvalidType),
    };

    if score < 0 {
        return Err(ApiError::InvalidType);
    }
    Ok(score)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleCollege {
    #[serde(rename = "CETCode")]
    pub code: String,
    #[serde(rename = "College")]
    pub college: String,
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "Cutoff")]
    pub cutoff: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Eligible {
        phy: i64,
        chem: i64,
        math: i64,
        kcet: i64,
        predicted_rank: i64,
        eligible_colleges: Vec<EligibleCollege>,
    },
    NoColleges {
        predicted_rank: i64,
        message: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> PredictKcetRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn coerces_numbers_and_strings() {
        let input = ScoreInput::try_from(request(json!({
            "phy": 80, "chem": "75", "math": " 50 ", "kcet": 85.9, "category": "GM"
        })))
        .unwrap();
        assert_eq!((input.phy, input.chem, input.math, input.kcet), (80, 75, 50, 85));
        assert_eq!(input.pcm_total().unwrap(), 205);
        assert!(input.branches.is_empty());
    }

    #[test]
    fn null_counts_as_missing() {
        let err = ScoreInput::try_from(request(json!({
            "phy": 80, "chem": 75, "math": null, "kcet": 85, "category": "GM"
        })))
        .unwrap_err();
        assert!(matches!(err, ApiError::MissingField));
    }

    #[test]
    fn every_required_field_is_checked() {
        let full = json!({"phy": 1, "chem": 2, "math": 3, "kcet": 4, "category": "GM"});
        for key in ["phy", "chem", "math", "kcet", "category"] {
            let mut body = full.clone();
            body.as_object_mut().unwrap().remove(key);
            let err = ScoreInput::try_from(request(body)).unwrap_err();
            assert!(matches!(err, ApiError::MissingField), "{key}");
        }
    }

    #[test]
    fn rejects_non_integers() {
        for bad in [json!("abc"), json!("8.5"), json!(true), json!([1]), json!({}), json!(-1)] {
            assert!(matches!(coerce_score(&bad), Err(ApiError::InvalidType)), "{bad}");
        }
    }

    #[test]
    fn non_string_category_is_invalid() {
        let err = ScoreInput::try_from(request(json!({
            "phy": 1, "chem": 2, "math": 3, "kcet": 4, "category": 7
        })))
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidCategory));
    }

    #[test]
    fn pcm_overflow_is_invalid() {
        let input = ScoreInput {
            phy: i64::MAX,
            chem: 1,
            math: 0,
            kcet: 0,
            category: "GM".into(),
            branches: vec![],
        };
        assert!(matches!(input.pcm_total(), Err(ApiError::InvalidType)));
    }

    #[test]
    fn no_colleges_shape() {
        let body = serde_json::to_value(PredictionResponse::NoColleges {
            predicted_rank: 120000,
            message: NO_COLLEGES_MESSAGE,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"predicted_rank": 120000, "message": "Sorry, no colleges available."})
        );
    }

    #[test]
    fn college_fields_are_renamed() {
        let body = serde_json::to_value(EligibleCollege {
            code: "E001".into(),
            college: "RVCE".into(),
            branch: "CS".into(),
            cutoff: 1200,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"CETCode": "E001", "College": "RVCE", "Branch": "CS", "Cutoff": 1200})
        );
    }
}
