//! Read-only query facade over the movie catalog.
//!
//! [`MovieQueries`] fixes the limits and defaults of the four analytical
//! queries and rounds aggregate output. It holds no state besides the
//! injected store handle.

use std::str::FromStr;

use crate::catalog::{SharedCatalog, YearStatsFilter};
use crate::error::CoreError;
use crate::movie::{Movie, YearStats};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of movies returned by top-by-gross.
pub const TOP_BY_GROSS_LIMIT: i64 = 5;

/// Number of movies returned by top-by-votes.
pub const TOP_BY_VOTES_LIMIT: i64 = 5;

/// Number of movies returned by top-by-rating.
pub const TOP_BY_RATING_LIMIT: i64 = 10;

/// Vote threshold applied by top-by-rating when none is given.
pub const DEFAULT_MIN_VOTES: i64 = 1000;

/// Minimum movies per year applied by year-stats when none is given.
pub const DEFAULT_MIN_MOVIES: i64 = 1;

/// Decimal places kept in aggregate averages.
pub const AVERAGE_DECIMALS: u32 = 2;

// ---------------------------------------------------------------------------
// Parameter parsing
// ---------------------------------------------------------------------------

/// Parse an optional integer query parameter.
///
/// Absent and empty values both mean "not given". Anything else must parse
/// as `T` (surrounding whitespace is ignored).
pub fn parse_int_param<T: FromStr>(
    name: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| CoreError::InvalidParameter {
                name,
                value: value.to_string(),
            }),
    }
}

// ---------------------------------------------------------------------------
// Facade
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct MovieQueries {
    store: SharedCatalog,
}

impl MovieQueries {
    pub fn new(store: SharedCatalog) -> Self {
        Self { store }
    }

    /// Highest-grossing movies, optionally for one year.
    pub async fn top_by_gross(&self, year: Option<i32>) -> Result<Vec<Movie>, CoreError> {
        self.store.top_by_gross(year, TOP_BY_GROSS_LIMIT).await
    }

    /// Most-voted movies.
    pub async fn top_by_votes(&self) -> Result<Vec<Movie>, CoreError> {
        self.store.top_by_votes(TOP_BY_VOTES_LIMIT).await
    }

    /// Highest-rated movies with at least `min_votes` votes (default 1000),
    /// optionally for one year.
    pub async fn top_by_rating(
        &self,
        year: Option<i32>,
        min_votes: Option<i64>,
    ) -> Result<Vec<Movie>, CoreError> {
        let min_votes = min_votes.unwrap_or(DEFAULT_MIN_VOTES);
        self.store
            .top_by_rating(year, min_votes, TOP_BY_RATING_LIMIT)
            .await
    }

    /// Per-year movie count and average rating/gross, ascending by year,
    /// with averages rounded to two decimal places.
    pub async fn year_stats(
        &self,
        start_year: Option<i32>,
        end_year: Option<i32>,
        min_movies: Option<i64>,
    ) -> Result<Vec<YearStats>, CoreError> {
        let filter = YearStatsFilter {
            start_year,
            end_year,
            min_movies: min_movies.unwrap_or(DEFAULT_MIN_MOVIES),
        };
        let stats = self.store.year_stats(&filter).await?;
        Ok(stats.into_iter().map(round_averages).collect())
    }
}

fn round_averages(stats: YearStats) -> YearStats {
    let factor = 10f64.powi(AVERAGE_DECIMALS as i32);
    YearStats {
        average_rating: (stats.average_rating * factor).round() / factor,
        average_gross: stats.average_gross.map(|g| {
            // Fixed scale so "1000000" renders as "1000000.00".
            let mut rounded = g.round_dp(AVERAGE_DECIMALS);
            rounded.rescale(AVERAGE_DECIMALS);
            rounded
        }),
        ..stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
