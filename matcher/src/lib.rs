pub mod distance;
pub mod knn;
pub mod matcher;
pub mod ratio;

pub use distance::*;
pub use knn::*;
pub use matcher::*;
pub use ratio::*;

use bfmatch_core::CoreError;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Dimension mismatch: query descriptors have {query} columns, train descriptors have {train}")]
    DimensionMismatch { query: usize, train: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
