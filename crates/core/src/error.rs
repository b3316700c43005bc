/// Boxed error used to carry backend failures (e.g. `sqlx::Error`) through
/// the storage trait without the core crate depending on the backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid parameter '{name}': expected an integer, got '{value}'")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[source] BoxError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap any backend error as a [`CoreError::Storage`].
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}

/// Failures that abort an entire import run.
///
/// Row-level problems never surface here; they are collected in the
/// import summary instead.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Cannot open input '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read header row: {0}")]
    Header(#[source] csv::Error),

    #[error("Cannot read input: {0}")]
    Read(#[source] csv::Error),

    #[error("Input is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Catalog replacement failed: {0}")]
    Store(#[from] CoreError),
}
