use thiserror::Error;

/// Failure of an array operation. Every variant aborts the whole operation, no buffer is left
/// partially updated.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("Shape Mismatch: {0}")]
    ShapeMismatch(String),
    #[error("Index Out of Bounds: {0}")]
    IndexOutOfBounds(String),
    #[error("Unsupported Type: {0}")]
    UnsupportedType(String),
    #[error("Unsupported Operation: {0}")]
    UnsupportedOperation(String),
    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),
}
