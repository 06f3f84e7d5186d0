//! Core data structures for spmx (pure Rust)
//!
//! Owned CSR/CSC containers, borrowed views over caller buffers, and the
//! missing-value convention shared by the product kernels.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod compressed;
pub mod csc;
pub mod csr;
pub mod error;
pub mod na;
pub mod view;

pub use csc::Csc;
pub use csr::Csr;
pub use error::{CoreError, Result};
pub use na::{is_na_real, DenseValue, Logical, NA_INTEGER, NA_LOGICAL, NA_REAL};
pub use view::{CsView, DenseView, DenseViewMut, IndexBase, Layout, SparseVec};
