//! Route definitions for movie catalog analytics.

use axum::routing::get;
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Movie routes mounted at `/movies`.
///
/// ```text
/// GET /top-by-gross     -> top_by_gross
/// GET /top-by-votes     -> top_by_votes
/// GET /top-by-rating    -> top_by_rating
/// GET /year-stats       -> year_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/top-by-gross", get(movies::top_by_gross))
        .route("/top-by-votes", get(movies::top_by_votes))
        .route("/top-by-rating", get(movies::top_by_rating))
        .route("/year-stats", get(movies::year_stats))
}
