use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kcet_api::app::{self, AppState};
use kcet_api::colleges::{CollegeSource, CsvCollegeSource, SnapshotCollegeSource};
use kcet_api::config::{Config, TableMode};
use kcet_api::model::CollegeTable;
use kcet_api::predictor::LinearModel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cfg = Config::from_env().context("invalid configuration")?;

    let model = LinearModel::load(&cfg.model_path)
        .with_context(|| format!("loading model from {}", cfg.model_path.display()))?;
    info!(path = %cfg.model_path.display(), "model loaded");

    let colleges: Arc<dyn CollegeSource> = match cfg.table_mode {
        TableMode::Reload => Arc::new(CsvCollegeSource::new(&cfg.colleges_path)),
        TableMode::Snapshot => {
            let table = CollegeTable::from_csv(&cfg.colleges_path).with_context(|| {
                format!("loading college table from {}", cfg.colleges_path.display())
            })?;
            info!(records = table.records().len(), "college table snapshot loaded");
            Arc::new(SnapshotCollegeSource::new(table))
        }
    };

    let state = AppState {
        predictor: Arc::new(model),
        colleges,
    };

    let app = app::create_router(state);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.bind_addr))?;
    info!(addr = %cfg.bind_addr, mode = ?cfg.table_mode, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
