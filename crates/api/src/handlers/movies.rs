//! Handlers for the movie analytics endpoints.
//!
//! Query parameters arrive as raw strings so that an empty value can mean
//! "not given" and a non-integer can be reported with the parameter name.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use marquee_core::queries::parse_int_param;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RatingQuery {
    pub year: Option<String>,
    /// Defaults to 1000.
    pub min_votes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YearStatsQuery {
    /// Inclusive.
    pub start_year: Option<String>,
    /// Inclusive.
    pub end_year: Option<String>,
    /// Defaults to 1.
    pub min_movies: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /movies/top-by-gross
///
/// The five highest-grossing movies, optionally for one year.
pub async fn top_by_gross(
    State(state): State<AppState>,
    Query(params): Query<YearQuery>,
) -> AppResult<impl IntoResponse> {
    let year = parse_int_param("year", params.year.as_deref())?;
    let movies = state.queries.top_by_gross(year).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// GET /movies/top-by-votes
pub async fn top_by_votes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let movies = state.queries.top_by_votes().await?;
    Ok(Json(DataResponse { data: movies }))
}

/// GET /movies/top-by-rating
///
/// The ten highest-rated movies with at least `min_votes` votes.
pub async fn top_by_rating(
    State(state): State<AppState>,
    Query(params): Query<RatingQuery>,
) -> AppResult<impl IntoResponse> {
    let year = parse_int_param("year", params.year.as_deref())?;
    let min_votes = parse_int_param("min_votes", params.min_votes.as_deref())?;
    let movies = state.queries.top_by_rating(year, min_votes).await?;
    Ok(Json(DataResponse { data: movies }))
}

/// GET /movies/year-stats
///
/// Per-year count, average rating and average gross, ascending by year.
pub async fn year_stats(
    State(state): State<AppState>,
    Query(params): Query<YearStatsQuery>,
) -> AppResult<impl IntoResponse> {
    let start_year = parse_int_param("start_year", params.start_year.as_deref())?;
    let end_year = parse_int_param("end_year", params.end_year.as_deref())?;
    let min_movies = parse_int_param("min_movies", params.min_movies.as_deref())?;
    let stats = state
        .queries
        .year_stats(start_year, end_year, min_movies)
        .await?;
    Ok(Json(DataResponse { data: stats }))
}
