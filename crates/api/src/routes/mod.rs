pub mod health;
pub mod movies;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /movies/top-by-gross        GET  ?year=
/// /movies/top-by-votes        GET
/// /movies/top-by-rating       GET  ?year=&min_votes=
/// /movies/year-stats          GET  ?start_year=&end_year=&min_movies=
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/movies", movies::router())
}
