//! Sparse × dense and sparse × sparse product kernels (pure Rust, SIMD/parallel)
//!
//! Every kernel takes its worker count from a [`Parallelism`]; the default
//! follows rayon, so users may set `RAYON_NUM_THREADS`.

pub mod blas;
pub mod error;
pub mod linalg;
pub mod parallel;
pub mod real;
pub mod spmm;
pub mod spmv;
mod util;

pub use blas::{axpy, axpy_scalar, copy_strided};
pub use error::{KernelError, Result};
pub use linalg::{
    crossprod, dot_sparse_binary, dot_sparse_sparse, matmul, matmul_dense_csc,
    matvec_csr_sparse, matvec_csr_sparse_binary, matvec_csr_sparse_binary_into,
    matvec_csr_sparse_into, outer_dense_sparse, outer_sparse_binary, outer_sparse_sparse, spmm,
    tcrossprod, tcrossprod_csr_dense, tcrossprod_dense_csr, Operand, SparseFormat,
    SparseOperand, Trans,
};
pub use parallel::{Parallelism, ScratchArena};
pub use real::Real;
pub use spmm::{gemm_csr_drm_as_dcm, gemm_csr_drm_as_drm, spmm_csr_dense};
pub use spmv::{
    matvec_csr_dense, matvec_csr_dense_into, vecmat_dense_csc, vecmat_dense_csc_binary,
    vecmat_dense_csc_binary_into, vecmat_dense_csc_into,
};
