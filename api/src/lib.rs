pub mod app;
pub mod colleges;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod predict;
pub mod predictor;
pub mod schema;
