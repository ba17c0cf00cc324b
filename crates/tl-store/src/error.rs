use std::fmt;
use std::path::PathBuf;

use tl_core::AggregateError;

#[derive(Debug)]
pub enum StoreError {
    Io(PathBuf, std::io::Error),
    Json(PathBuf, serde_json::Error),
    Toml(PathBuf, toml::de::Error),
    /// A declared source list has no backing file.
    MissingList { name: String, path: PathBuf },
    Aggregate(AggregateError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(path, e) => write!(f, "I/O error on {}: {e}", path.display()),
            StoreError::Json(path, e) => write!(f, "invalid JSON in {}: {e}", path.display()),
            StoreError::Toml(path, e) => write!(f, "invalid TOML in {}: {e}", path.display()),
            StoreError::MissingList { name, path } => {
                write!(f, "token list '{name}' not found at {}", path.display())
            }
            StoreError::Aggregate(e) => write!(f, "aggregation failed: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(_, e) => Some(e),
            StoreError::Json(_, e) => Some(e),
            StoreError::Toml(_, e) => Some(e),
            StoreError::Aggregate(e) => Some(e),
            StoreError::MissingList { .. } => None,
        }
    }
}

impl From<AggregateError> for StoreError {
    fn from(e: AggregateError) -> Self {
        StoreError::Aggregate(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
