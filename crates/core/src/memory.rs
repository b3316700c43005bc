//! In-memory [`CatalogStore`] implementation.
//!
//! Mirrors the SQL semantics of the PostgreSQL store closely enough for
//! tests: `NULL` years never group, `AVG(gross)` ignores absent values, and
//! ties sort by id.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::catalog::{CatalogStore, ReplaceOutcome, YearStatsFilter};
use crate::error::CoreError;
use crate::movie::{Movie, NewMovie, YearStats};
use crate::types::DbId;

#[derive(Debug, Default)]
struct Inner {
    movies: Vec<Movie>,
    next_id: DbId,
}

/// A catalog held in process memory behind a single lock.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Inner>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all movies in insertion order.
    pub fn all(&self) -> Result<Vec<Movie>, CoreError> {
        Ok(self.read()?.movies.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, CoreError> {
        self.inner
            .read()
            .map_err(|_| CoreError::Internal("catalog lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, CoreError> {
        self.inner
            .write()
            .map_err(|_| CoreError::Internal("catalog lock poisoned".into()))
    }

    /// Filter, sort and truncate in one pass over a read snapshot.
    fn select<F, C>(&self, keep: F, order: C, limit: i64) -> Result<Vec<Movie>, CoreError>
    where
        F: Fn(&Movie) -> bool,
        C: Fn(&Movie, &Movie) -> Ordering,
    {
        let guard = self.read()?;
        let mut selected: Vec<Movie> = guard.movies.iter().filter(|m| keep(m)).cloned().collect();
        selected.sort_by(|a, b| order(a, b).then_with(|| a.id.cmp(&b.id)));
        selected.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(selected)
    }
}

fn year_matches(movie: &Movie, year: Option<i32>) -> bool {
    year.map_or(true, |y| movie.year == Some(y))
}

#[derive(Default)]
struct YearBucket {
    count: i64,
    rating_sum: f64,
    gross_sum: Decimal,
    gross_count: i64,
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn replace_all(
        &self,
        movies: &[NewMovie],
        chunk_size: usize,
    ) -> Result<ReplaceOutcome, CoreError> {
        let mut guard = self.write()?;
        let deleted = guard.movies.len() as u64;
        guard.movies.clear();

        for chunk in movies.chunks(chunk_size.max(1)) {
            for movie in chunk {
                guard.next_id += 1;
                let id = guard.next_id;
                guard.movies.push(Movie::from_new(id, movie.clone()));
            }
        }

        Ok(ReplaceOutcome {
            deleted,
            inserted: movies.len() as u64,
        })
    }

    async fn top_by_gross(&self, year: Option<i32>, limit: i64) -> Result<Vec<Movie>, CoreError> {
        self.select(
            |m| m.gross.is_some() && year_matches(m, year),
            |a, b| b.gross.cmp(&a.gross),
            limit,
        )
    }

    async fn top_by_votes(&self, limit: i64) -> Result<Vec<Movie>, CoreError> {
        self.select(|_| true, |a, b| b.votes.cmp(&a.votes), limit)
    }

    async fn top_by_rating(
        &self,
        year: Option<i32>,
        min_votes: i64,
        limit: i64,
    ) -> Result<Vec<Movie>, CoreError> {
        self.select(
            |m| m.votes >= min_votes && year_matches(m, year),
            |a, b| b.rating.total_cmp(&a.rating),
            limit,
        )
    }

    async fn year_stats(&self, filter: &YearStatsFilter) -> Result<Vec<YearStats>, CoreError> {
        let guard = self.read()?;
        let mut buckets: BTreeMap<i32, YearBucket> = BTreeMap::new();

        for movie in &guard.movies {
            let Some(year) = movie.year else { continue };
            if filter.start_year.is_some_and(|start| year < start)
                || filter.end_year.is_some_and(|end| year > end)
            {
                continue;
            }
            let bucket = buckets.entry(year).or_default();
            bucket.count += 1;
            bucket.rating_sum += movie.rating;
            if let Some(gross) = movie.gross {
                bucket.gross_sum += gross;
                bucket.gross_count += 1;
            }
        }

        Ok(buckets
            .into_iter()
            .filter(|(_, b)| b.count >= filter.min_movies)
            .map(|(year, b)| YearStats {
                year,
                total_movies: b.count,
                average_rating: b.rating_sum / b.count as f64,
                average_gross: (b.gross_count > 0)
                    .then(|| b.gross_sum / Decimal::from(b.gross_count)),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, CoreError> {
        Ok(self.read()?.movies.len() as i64)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        self.read().map(|_| ())
    }
}
