use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::colleges::CollegeSource;
use crate::handler::predict_kcet;
use crate::predictor::Predictor;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub colleges: Arc<dyn CollegeSource>,
}

impl AppState {
    pub fn new(
        predictor: impl Predictor + 'static,
        colleges: impl CollegeSource + 'static,
    ) -> Self {
        Self {
            predictor: Arc::new(predictor),
            colleges: Arc::new(colleges),
        }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/predict_kcet", post(predict_kcet))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
