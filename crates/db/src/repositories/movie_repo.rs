//! Repository for the `movies` table.

use marquee_core::movie::NewMovie;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::models::movie::{MovieRow, YearStatsRow};

/// Column list for `movies` SELECT queries.
const COLUMNS: &str = "\
    id, title, year, genre, rating, one_line, stars, votes, runtime, gross";

/// Column list for INSERT (excludes auto-generated `id`).
const INSERT_COLUMNS: &str = "\
    title, year, genre, rating, one_line, stars, votes, runtime, gross";

/// Bind parameters per inserted row.
const BINDS_PER_ROW: usize = 9;

/// Postgres caps a single statement at 65535 bind parameters.
pub const MAX_CHUNK_SIZE: usize = u16::MAX as usize / BINDS_PER_ROW;

/// Provides query operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Delete every movie and insert `movies` in chunks, all in one
    /// transaction. Returns `(deleted, inserted)`.
    pub async fn replace_all(
        pool: &PgPool,
        movies: &[NewMovie],
        chunk_size: usize,
    ) -> Result<(u64, u64), sqlx::Error> {
        let chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        let mut tx = pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM movies")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut inserted = 0;
        for chunk in movies.chunks(chunk_size) {
            inserted += Self::insert_chunk(&mut tx, chunk).await?;
        }

        tx.commit().await?;
        Ok((deleted, inserted))
    }

    async fn insert_chunk(
        tx: &mut Transaction<'_, Postgres>,
        chunk: &[NewMovie],
    ) -> Result<u64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO movies ({INSERT_COLUMNS}) "));
        builder.push_values(chunk, |mut row, movie| {
            row.push_bind(&movie.title)
                .push_bind(movie.year)
                .push_bind(&movie.genre)
                .push_bind(movie.rating)
                .push_bind(&movie.one_line)
                .push_bind(&movie.stars)
                .push_bind(movie.votes)
                .push_bind(movie.runtime)
                .push_bind(movie.gross);
        });
        let result = builder.build().execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }

    /// Movies with a gross value, highest first, optionally for one year.
    pub async fn top_by_gross(
        pool: &PgPool,
        year: Option<i32>,
        limit: i64,
    ) -> Result<Vec<MovieRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies \
             WHERE gross IS NOT NULL AND ($1::INTEGER IS NULL OR year = $1) \
             ORDER BY gross DESC, id ASC \
             LIMIT $2"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(year)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Most-voted movies first.
    pub async fn top_by_votes(pool: &PgPool, limit: i64) -> Result<Vec<MovieRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies \
             ORDER BY votes DESC, id ASC \
             LIMIT $1"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Highest-rated movies with at least `min_votes` votes.
    pub async fn top_by_rating(
        pool: &PgPool,
        year: Option<i32>,
        min_votes: i64,
        limit: i64,
    ) -> Result<Vec<MovieRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies \
             WHERE votes >= $2 AND ($1::INTEGER IS NULL OR year = $1) \
             ORDER BY rating DESC, id ASC \
             LIMIT $3"
        );
        sqlx::query_as::<_, MovieRow>(&query)
            .bind(year)
            .bind(min_votes)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count and averages per year, ascending. Rows without a year are
    /// excluded before grouping.
    pub async fn year_stats(
        pool: &PgPool,
        start_year: Option<i32>,
        end_year: Option<i32>,
        min_movies: i64,
    ) -> Result<Vec<YearStatsRow>, sqlx::Error> {
        sqlx::query_as::<_, YearStatsRow>(
            "SELECT year, \
                    COUNT(*) AS total_movies, \
                    AVG(rating) AS average_rating, \
                    AVG(gross) AS average_gross \
             FROM movies \
             WHERE year IS NOT NULL \
               AND ($1::INTEGER IS NULL OR year >= $1) \
               AND ($2::INTEGER IS NULL OR year <= $2) \
             GROUP BY year \
             HAVING COUNT(*) >= $3 \
             ORDER BY year ASC",
        )
        .bind(start_year)
        .bind(end_year)
        .bind(min_movies)
        .fetch_all(pool)
        .await
    }

    /// Number of movies in the catalog.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(pool)
            .await
    }
}
