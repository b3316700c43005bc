//! Movie catalog import CLI.
//!
//! Replaces the whole catalog with the contents of one CSV file. Rows that
//! cannot be normalized are skipped and listed in the printed summary; a
//! missing or malformed input file aborts before anything is deleted.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_core::loader::{BatchLoader, ImportSummary, DEFAULT_CHUNK_SIZE};
use marquee_db::PgCatalog;

#[derive(Parser, Debug)]
#[command(name = "marquee-import")]
#[command(about = "Load a movie CSV into the catalog, replacing its contents")]
#[command(version)]
struct Args {
    /// CSV file to import
    #[arg(short, long, default_value = "movies.csv", env = "MOVIES_CSV")]
    file: PathBuf,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Rows per INSERT statement
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "IMPORT_CHUNK_SIZE")]
    chunk_size: usize,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_import=info,marquee_core=info,marquee_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let pool = marquee_db::create_pool(&args.database_url)
        .await
        .context("Failed to connect to database")?;
    marquee_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let loader = BatchLoader::new(Arc::new(PgCatalog::new(pool))).with_chunk_size(args.chunk_size);
    let summary = loader
        .import_file(&args.file)
        .await
        .with_context(|| format!("Import of {} failed", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &ImportSummary) {
    println!("Rows read:      {}", summary.total_rows);
    println!("Imported:       {}", summary.imported);
    println!("Skipped:        {}", summary.skipped);
    println!("Deleted:        {}", summary.deleted);
    println!("Finished at:    {}", summary.finished_at.to_rfc3339());

    for skipped in &summary.skipped_rows {
        println!("  row {}: {}", skipped.row, skipped.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_database_url_given() {
        let args =
            Args::try_parse_from(["marquee-import", "--database-url", "postgres://x"]).unwrap();
        assert_eq!(args.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(!args.json);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "marquee-import",
            "--file",
            "data/other.csv",
            "--database-url",
            "postgres://x",
            "--chunk-size",
            "250",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("data/other.csv"));
        assert_eq!(args.chunk_size, 250);
    }
}
