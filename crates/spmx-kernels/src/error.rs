//! Error type for the product kernels.

use thiserror::Error;

/// Result type alias using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;

/// Failures that abort a whole kernel call. No partial results are promised
/// when one of these is returned.
#[derive(Error, Debug)]
pub enum KernelError {
    /// The dedicated worker pool for this call could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A worker could not allocate its scratch row.
    #[error("failed to allocate a scratch row of {len} elements")]
    ScratchAlloc { len: usize },

    /// Operand extents do not chain into the output extents.
    #[error("shape mismatch in {op}: {lhs:?} x {rhs:?} cannot produce {out:?}")]
    ShapeMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
        out: (usize, usize),
    },

    /// The requested operand/layout combination needs a format conversion first.
    #[error("unsupported orientation: {0}")]
    UnsupportedOrientation(&'static str),
}
