//! Products that pair a sparse operand with another operand.

pub mod matmul;
pub mod outer;
pub mod vecdot;

pub use matmul::{
    crossprod, matmul, matmul_dense_csc, spmm, tcrossprod, tcrossprod_csr_dense,
    tcrossprod_dense_csr, Operand, SparseFormat, SparseOperand, Trans,
};
pub use outer::{outer_dense_sparse, outer_sparse_binary, outer_sparse_sparse};
pub use vecdot::{
    dot_sparse_binary, dot_sparse_sparse, matvec_csr_sparse, matvec_csr_sparse_binary,
    matvec_csr_sparse_binary_into, matvec_csr_sparse_into,
};
