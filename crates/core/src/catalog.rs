//! Storage seam for the movie catalog.
//!
//! [`CatalogStore`] is the capability both the batch loader (write path) and
//! the query facade (read path) receive at construction. Implementations:
//!
//! - `marquee_db::PgCatalog` (PostgreSQL, production)
//! - [`crate::memory::InMemoryCatalog`] (tests, local experiments)
//!
//! Ordering contract shared by every implementation: descending on the sort
//! key, ties broken by ascending `id` (insertion order).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::movie::{Movie, NewMovie, YearStats};

/// Shared handle to a catalog store.
pub type SharedCatalog = Arc<dyn CatalogStore>;

/// Filters for the per-year aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearStatsFilter {
    /// Inclusive lower bound on `year`.
    pub start_year: Option<i32>,
    /// Inclusive upper bound on `year`.
    pub end_year: Option<i32>,
    /// Years with fewer movies than this are dropped.
    pub min_movies: i64,
}

impl Default for YearStatsFilter {
    fn default() -> Self {
        Self {
            start_year: None,
            end_year: None,
            min_movies: 1,
        }
    }
}

/// Result of a wholesale catalog replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaceOutcome {
    pub deleted: u64,
    pub inserted: u64,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Delete every persisted movie, then insert `movies` in chunks of at
    /// most `chunk_size` rows.
    async fn replace_all(
        &self,
        movies: &[NewMovie],
        chunk_size: usize,
    ) -> Result<ReplaceOutcome, CoreError>;

    /// Movies with a gross value, optionally restricted to `year`, highest
    /// gross first.
    async fn top_by_gross(&self, year: Option<i32>, limit: i64) -> Result<Vec<Movie>, CoreError>;

    /// Movies with the most votes first.
    async fn top_by_votes(&self, limit: i64) -> Result<Vec<Movie>, CoreError>;

    /// Movies with at least `min_votes` votes, optionally restricted to
    /// `year`, highest rating first.
    async fn top_by_rating(
        &self,
        year: Option<i32>,
        min_votes: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, CoreError>;

    /// Per-year count and averages, ascending by year. Movies without a
    /// year are not grouped. Averages are returned unrounded.
    async fn year_stats(&self, filter: &YearStatsFilter) -> Result<Vec<YearStats>, CoreError>;

    /// Number of persisted movies.
    async fn count(&self) -> Result<i64, CoreError>;

    /// Liveness check of the backing store.
    async fn health_check(&self) -> Result<(), CoreError>;
}
