//! Errors raised while assembling compressed sparse containers.

use thiserror::Error;

/// Result type alias using spmx-core's [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Structural problems detected by `from_parts`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// `indptr` must hold one offset per major slice plus the terminating nnz.
    #[error("indptr length must be {expected} (major dimension + 1), got {got}")]
    IndptrLength { expected: usize, got: usize },

    /// `indices` and `data` are parallel arrays.
    #[error("indices and data must have equal length ({indices} != {data})")]
    LengthMismatch { indices: usize, data: usize },

    #[error("indptr first element must be 0")]
    IndptrStart,

    #[error("indptr last element must equal nnz ({nnz})")]
    IndptrEnd { nnz: usize },

    #[error("indptr must be non-decreasing and non-negative (slice {slice})")]
    IndptrOrder { slice: usize },

    /// A minor index falls outside `[0, bound)`.
    #[error("index {index} out of bounds for dimension {bound} (slice {slice})")]
    IndexOutOfBounds { slice: usize, index: i64, bound: usize },

    /// Kernels merge on sorted indices, so duplicates and inversions are rejected.
    #[error("indices must be strictly increasing within each slice (slice {slice})")]
    Unsorted { slice: usize },
}
