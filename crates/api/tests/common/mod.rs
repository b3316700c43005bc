#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use marquee_core::catalog::{CatalogStore, ReplaceOutcome, SharedCatalog, YearStatsFilter};
use marquee_core::error::CoreError;
use marquee_core::memory::InMemoryCatalog;
use marquee_core::movie::{Movie, NewMovie, YearStats};
use tower::ServiceExt;

use marquee_api::config::ServerConfig;
use marquee_api::router::build_app_router;
use marquee_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// over the given catalog store.
pub fn build_test_app(catalog: SharedCatalog) -> Router {
    let config = test_config();
    let state = AppState::new(catalog, config.clone());
    build_app_router(state, &config)
}

/// Build an app over an in-memory catalog holding `movies`.
pub async fn seeded_app(movies: &[NewMovie]) -> Router {
    let store = Arc::new(InMemoryCatalog::new());
    store.replace_all(movies, 1000).await.unwrap();
    build_test_app(store)
}

pub fn new_movie(
    title: &str,
    year: Option<i32>,
    rating: f64,
    votes: i64,
    gross: Option<rust_decimal::Decimal>,
) -> NewMovie {
    NewMovie {
        title: title.to_string(),
        year,
        genre: "Drama".to_string(),
        rating,
        one_line: "One line".to_string(),
        stars: "Someone".to_string(),
        votes,
        runtime: 100,
        gross,
    }
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A store whose every operation fails with a storage error.
pub struct FailingCatalog;

fn backend_down() -> CoreError {
    CoreError::storage(std::io::Error::other("connection refused to 10.0.0.7:5432"))
}

#[async_trait]
impl CatalogStore for FailingCatalog {
    async fn replace_all(&self, _: &[NewMovie], _: usize) -> Result<ReplaceOutcome, CoreError> {
        Err(backend_down())
    }

    async fn top_by_gross(&self, _: Option<i32>, _: i64) -> Result<Vec<Movie>, CoreError> {
        Err(backend_down())
    }

    async fn top_by_votes(&self, _: i64) -> Result<Vec<Movie>, CoreError> {
        Err(backend_down())
    }

    async fn top_by_rating(&self, _: Option<i32>, _: i64, _: i64) -> Result<Vec<Movie>, CoreError> {
        Err(backend_down())
    }

    async fn year_stats(&self, _: &YearStatsFilter) -> Result<Vec<YearStats>, CoreError> {
        Err(backend_down())
    }

    async fn count(&self) -> Result<i64, CoreError> {
        Err(backend_down())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Err(backend_down())
    }
}
