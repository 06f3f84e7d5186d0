//! Matrix products with one sparse and one dense operand.
//!
//! Every product here runs on the two kernels in [`crate::spmm`], which only
//! know how to multiply *rows of a compressed matrix* by *a row-major dense
//! matrix*. This module decides, for `out = op(lhs) · op(rhs)`, which operand
//! plays which role:
//!
//! - A sparse right operand is handled by transposing the whole product,
//!   `t(out) = t(op(rhs)) · t(op(lhs))`. Transposing a dense view or the
//!   output is free (same buffer, flipped layout); transposing a sparse
//!   operand only flips which of CSR/CSC is needed.
//! - Compressed rows of `op(S)` are available for CSR untransposed and for
//!   CSC transposed (a CSC matrix read row-wise is its transpose in CSR).
//! - `op(D)` must read as row-major: row-major untransposed, or
//!   column-major transposed.
//! - The output is always accumulated into (`out += ...`), whichever layout
//!   it has and whichever side the sparse factor sits on. A row-major result
//!   row is added in place; a column-major one is summed in a scratch row
//!   first and then added with a stride.
//!
//! ```text
//! matmul(x, y)     = x · y
//! crossprod(x, y)  = t(x) · y
//! tcrossprod(x, y) = x · t(y)
//! ```

use crate::error::{KernelError, Result};
use crate::parallel::Parallelism;
use crate::real::Real;
use crate::spmm::{gemm_csr_drm_as_dcm, gemm_csr_drm_as_drm};
use log::debug;
use spmx_core::{Csc, Csr, CsView, DenseView, DenseViewMut, Layout};

/// Which dimension a compressed operand is compressed along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SparseFormat {
    Csr,
    Csc,
}

/// Compressed operand with its logical extents.
#[derive(Debug, Clone, Copy)]
pub struct SparseOperand<'a> {
    pub view: CsView<'a>,
    pub format: SparseFormat,
    pub nrows: usize,
    pub ncols: usize,
}

impl<'a> SparseOperand<'a> {
    #[must_use]
    pub const fn csr(view: CsView<'a>, nrows: usize, ncols: usize) -> Self {
        Self {
            view,
            format: SparseFormat::Csr,
            nrows,
            ncols,
        }
    }

    #[must_use]
    pub const fn csc(view: CsView<'a>, nrows: usize, ncols: usize) -> Self {
        Self {
            view,
            format: SparseFormat::Csc,
            nrows,
            ncols,
        }
    }

    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl<'a> From<&'a Csr<f64, i64>> for SparseOperand<'a> {
    fn from(a: &'a Csr<f64, i64>) -> Self {
        Self::csr(a.view(), a.nrows, a.ncols)
    }
}

impl<'a> From<&'a Csc<f64, i64>> for SparseOperand<'a> {
    fn from(a: &'a Csc<f64, i64>) -> Self {
        Self::csc(a.view(), a.nrows, a.ncols)
    }
}

/// One factor of a product.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a, T> {
    Sparse(SparseOperand<'a>),
    Dense(DenseView<'a, T>),
}

impl<T> Operand<'_, T> {
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        match self {
            Self::Sparse(s) => s.shape(),
            Self::Dense(d) => d.shape(),
        }
    }
}

impl<'a, T> From<SparseOperand<'a>> for Operand<'a, T> {
    fn from(s: SparseOperand<'a>) -> Self {
        Self::Sparse(s)
    }
}

impl<'a, T> From<DenseView<'a, T>> for Operand<'a, T> {
    fn from(d: DenseView<'a, T>) -> Self {
        Self::Dense(d)
    }
}

/// Whether a factor enters the product transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trans {
    No,
    Yes,
}

impl Trans {
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::No => Self::Yes,
            Self::Yes => Self::No,
        }
    }

    #[inline]
    const fn apply(self, (r, c): (usize, usize)) -> (usize, usize) {
        match self {
            Self::No => (r, c),
            Self::Yes => (c, r),
        }
    }
}

/// `out += op(lhs) · op(rhs)` with exactly one sparse factor.
///
/// Existing contents of `out` are kept and added to, for either layout. Pass
/// a zeroed buffer to get the plain product.
///
/// # Errors
/// - [`KernelError::ShapeMismatch`] if the extents do not chain.
/// - [`KernelError::UnsupportedOrientation`] if both or neither factor is
///   sparse, or if the combination would need a sparse format conversion or a
///   dense transpose copy.
/// - Kernel errors from [`crate::spmm`].
pub fn spmm<T: Real>(
    lhs: Operand<'_, T>,
    lhs_trans: Trans,
    rhs: Operand<'_, T>,
    rhs_trans: Trans,
    out: DenseViewMut<'_, T>,
    par: &Parallelism,
) -> Result<()> {
    let (m, k) = lhs_trans.apply(lhs.shape());
    let (k2, n) = rhs_trans.apply(rhs.shape());
    if k != k2 || out.shape() != (m, n) {
        return Err(KernelError::ShapeMismatch {
            op: "spmm",
            lhs: (m, k),
            rhs: (k2, n),
            out: out.shape(),
        });
    }
    match (lhs, rhs) {
        (Operand::Sparse(s), Operand::Dense(d)) => {
            sparse_times_dense(s, lhs_trans, d, rhs_trans, out, par)
        }
        (Operand::Dense(d), Operand::Sparse(s)) => {
            sparse_times_dense(s, rhs_trans.flip(), d, lhs_trans.flip(), out.transposed(), par)
        }
        _ => Err(KernelError::UnsupportedOrientation(
            "exactly one factor must be sparse",
        )),
    }
}

fn sparse_times_dense<T: Real>(
    s: SparseOperand<'_>,
    s_trans: Trans,
    d: DenseView<'_, T>,
    d_trans: Trans,
    out: DenseViewMut<'_, T>,
    par: &Parallelism,
) -> Result<()> {
    match (s.format, s_trans) {
        (SparseFormat::Csr, Trans::No) | (SparseFormat::Csc, Trans::Yes) => {}
        _ => {
            return Err(KernelError::UnsupportedOrientation(
                "sparse factor is not stored along the rows it contributes",
            ))
        }
    }
    let d = match d_trans {
        Trans::No => d,
        Trans::Yes => d.transposed(),
    };
    if d.layout != Layout::RowMajor {
        return Err(KernelError::UnsupportedOrientation(
            "dense factor cannot be read row-wise without a copy",
        ));
    }
    let (m, n) = out.shape();
    debug!(
        "spmm: {:?}{} x dense{} -> {m}x{n} {:?}",
        s.format,
        if s_trans == Trans::Yes { "^T" } else { "" },
        if d_trans == Trans::Yes { "^T" } else { "" },
        out.layout
    );
    match out.layout {
        Layout::RowMajor => gemm_csr_drm_as_drm(m, n, s.view, d.data, d.ld, out.data, out.ld, par),
        Layout::ColMajor => gemm_csr_drm_as_dcm(m, n, s.view, d.data, d.ld, out.data, out.ld, par),
    }
}

/// `out += x · y`.
///
/// # Errors
/// See [`spmm`].
pub fn matmul<T: Real>(
    x: Operand<'_, T>,
    y: Operand<'_, T>,
    out: DenseViewMut<'_, T>,
    par: &Parallelism,
) -> Result<()> {
    spmm(x, Trans::No, y, Trans::No, out, par)
}

/// `out += t(x) · y`.
///
/// # Errors
/// See [`spmm`].
pub fn crossprod<T: Real>(
    x: Operand<'_, T>,
    y: Operand<'_, T>,
    out: DenseViewMut<'_, T>,
    par: &Parallelism,
) -> Result<()> {
    spmm(x, Trans::Yes, y, Trans::No, out, par)
}

/// `out += x · t(y)`.
///
/// # Errors
/// See [`spmm`].
pub fn tcrossprod<T: Real>(
    x: Operand<'_, T>,
    y: Operand<'_, T>,
    out: DenseViewMut<'_, T>,
    par: &Parallelism,
) -> Result<()> {
    spmm(x, Trans::No, y, Trans::Yes, out, par)
}

/// Column-major `x · y` for dense column-major `x` and CSC `y`.
///
/// # Errors
/// See [`spmm`].
pub fn matmul_dense_csc<T: Real>(
    x: DenseView<'_, T>,
    y: &Csc<f64, i64>,
    par: &Parallelism,
) -> Result<Vec<T>> {
    let (nrows, ncols) = (x.nrows, y.ncols);
    let mut out = vec![T::zero(); nrows * ncols];
    matmul(
        x.into(),
        SparseOperand::from(y).into(),
        DenseViewMut::col_major(&mut out, nrows, ncols),
        par,
    )?;
    Ok(out)
}

/// Column-major `x · t(y)` for dense column-major `x` and CSR `y`.
///
/// # Errors
/// See [`spmm`].
pub fn tcrossprod_dense_csr<T: Real>(
    x: DenseView<'_, T>,
    y: &Csr<f64, i64>,
    par: &Parallelism,
) -> Result<Vec<T>> {
    let (nrows, ncols) = (x.nrows, y.nrows);
    let mut out = vec![T::zero(); nrows * ncols];
    tcrossprod(
        x.into(),
        SparseOperand::from(y).into(),
        DenseViewMut::col_major(&mut out, nrows, ncols),
        par,
    )?;
    Ok(out)
}

/// Column-major `x · t(y)` for CSR `x` and dense column-major `y`.
///
/// # Errors
/// See [`spmm`].
pub fn tcrossprod_csr_dense<T: Real>(
    x: &Csr<f64, i64>,
    y: DenseView<'_, T>,
    par: &Parallelism,
) -> Result<Vec<T>> {
    let (nrows, ncols) = (x.nrows, y.nrows);
    let mut out = vec![T::zero(); nrows * ncols];
    tcrossprod(
        SparseOperand::from(x).into(),
        y.into(),
        DenseViewMut::col_major(&mut out, nrows, ncols),
        par,
    )?;
    Ok(out)
}
