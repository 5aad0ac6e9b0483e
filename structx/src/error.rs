//! Error types for structx

use thiserror::Error;

/// Errors from a bounded walk
#[derive(Debug, Error)]
pub enum WalkError<E> {
    /// A field filter returned an error; the walk was abandoned.
    #[error("field filter failed")]
    Filter(#[source] E),
    /// Nesting exceeded the configured depth limit.
    #[error("depth limit exceeded at `{path}`: depth {depth} > max {max_depth}")]
    DepthLimitExceeded {
        /// Path of the value that was too deep
        path: String,
        /// Depth of that value (root is 0)
        depth: usize,
        /// Configured maximum
        max_depth: usize,
    },
}

impl<E> WalkError<E> {
    /// The filter error, if this walk was aborted by a filter
    pub fn into_filter_error(self) -> Option<E> {
        match self {
            WalkError::Filter(err) => Some(err),
            WalkError::DepthLimitExceeded { .. } => None,
        }
    }
}

/// Errors from typed access to a recorded field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Nothing was recorded at the path.
    #[error("no field recorded at `{path}`")]
    NotFound {
        /// Requested path
        path: String,
    },
    /// The recorded value has a different type.
    #[error("field at `{path}` is {found}, expected {expected}")]
    TypeMismatch {
        /// Requested path
        path: String,
        /// Requested type
        expected: &'static str,
        /// Type of the recorded value
        found: &'static str,
    },
}

/// Result type alias for field access
pub type FieldResult<T> = std::result::Result<T, FieldError>;
