pub mod descriptor;
pub mod matches;
pub mod runtime;

pub use descriptor::*;
pub use matches::*;
pub use runtime::*;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}
