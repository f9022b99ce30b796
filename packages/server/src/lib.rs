//! HTTP API for the lead-generation pipeline.
//!
//! Exposes scrape-job submission and polling plus the AI enrichment
//! endpoints, all behind a shared bearer session token.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

pub use app::{build_app, AppState};
pub use config::Config;
