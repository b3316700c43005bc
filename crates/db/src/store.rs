//! PostgreSQL implementation of [`CatalogStore`].

use async_trait::async_trait;
use marquee_core::catalog::{CatalogStore, ReplaceOutcome, YearStatsFilter};
use marquee_core::error::CoreError;
use marquee_core::movie::{Movie, NewMovie, YearStats};

use crate::repositories::MovieRepo;
use crate::DbPool;

/// Catalog backed by the `movies` table.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn replace_all(
        &self,
        movies: &[NewMovie],
        chunk_size: usize,
    ) -> Result<ReplaceOutcome, CoreError> {
        let (deleted, inserted) = MovieRepo::replace_all(&self.pool, movies, chunk_size)
            .await
            .map_err(CoreError::storage)?;
        tracing::debug!(deleted, inserted, "Replaced movie catalog");
        Ok(ReplaceOutcome { deleted, inserted })
    }

    async fn top_by_gross(&self, year: Option<i32>, limit: i64) -> Result<Vec<Movie>, CoreError> {
        let rows = MovieRepo::top_by_gross(&self.pool, year, limit)
            .await
            .map_err(CoreError::storage)?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn top_by_votes(&self, limit: i64) -> Result<Vec<Movie>, CoreError> {
        let rows = MovieRepo::top_by_votes(&self.pool, limit)
            .await
            .map_err(CoreError::storage)?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn top_by_rating(
        &self,
        year: Option<i32>,
        min_votes: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, CoreError> {
        let rows = MovieRepo::top_by_rating(&self.pool, year, min_votes, limit)
            .await
            .map_err(CoreError::storage)?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn year_stats(&self, filter: &YearStatsFilter) -> Result<Vec<YearStats>, CoreError> {
        let rows = MovieRepo::year_stats(
            &self.pool,
            filter.start_year,
            filter.end_year,
            filter.min_movies,
        )
        .await
        .map_err(CoreError::storage)?;
        Ok(rows.into_iter().map(YearStats::from).collect())
    }

    async fn count(&self) -> Result<i64, CoreError> {
        MovieRepo::count(&self.pool)
            .await
            .map_err(CoreError::storage)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(CoreError::storage)
    }
}
