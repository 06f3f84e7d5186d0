#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k/p to denote indices and pointers"
)]
//! Sparse matrix times dense vector, in both directions.
//!
//! `matvec_*` multiplies CSR rows by a dense column vector whose elements may
//! carry the missing sentinel. `vecmat_*` multiplies a dense row vector by a
//! CSC matrix; there is a single output row, so it runs on the calling
//! thread.

use crate::error::Result;
use crate::parallel::Parallelism;
use crate::real::Real;
use crate::util::i64_to_usize;
use log::{debug, trace};
use spmx_core::{Csc, Csr, CsView, DenseValue};

#[inline]
fn csr_row_dot<V: DenseValue>(a: &CsView<'_>, x: &[V], row: usize) -> V::Output {
    let mut acc = 0.0f64;
    for p in a.range(row) {
        let xj = x[i64_to_usize(a.indices[p])];
        if xj.is_na() {
            return V::missing();
        }
        acc += a.values[p] * xj.as_f64();
    }
    V::finish(acc)
}

/// `out[r] = sum_p values[p] * x[indices[p]]` for every row of `a`.
///
/// Sums are formed in `f64` and converted once per row. A row touching a
/// missing element of `x` is written as [`DenseValue::missing`].
///
/// # Errors
/// [`crate::KernelError::ThreadPool`] if the worker pool cannot be started.
///
/// # Panics
/// If `out` is shorter than the number of rows of `a`.
pub fn matvec_csr_dense_into<V: DenseValue>(
    a: CsView<'_>,
    x: &[V],
    out: &mut [V::Output],
    par: &Parallelism,
) -> Result<()> {
    let nrows = a.nmajor();
    assert!(out.len() >= nrows, "out length must be at least nrows");
    let out = &mut out[..nrows];
    if a.is_structurally_empty() {
        trace!("matvec_csr_dense: no entries, {nrows} zero rows");
        out.fill(V::finish(0.0));
        return Ok(());
    }
    debug!(
        "matvec_csr_dense: nrows={nrows} nnz={} workers={}",
        a.nnz(),
        par.workers_for(nrows)
    );
    par.for_each_row_chunk(out, 1, nrows, |row, slot| {
        slot[0] = csr_row_dot(&a, x, row);
    })
}

/// y = A @ x
///
/// # Errors
/// See [`matvec_csr_dense_into`].
///
/// # Panics
/// If `x.len() != a.ncols`.
pub fn matvec_csr_dense<V: DenseValue>(
    a: &Csr<f64, i64>,
    x: &[V],
    par: &Parallelism,
) -> Result<Vec<V::Output>> {
    assert_eq!(x.len(), a.ncols, "x length must equal ncols");
    let mut y = vec![V::Output::default(); a.nrows];
    matvec_csr_dense_into(a.view(), x, &mut y, par)?;
    Ok(y)
}

/// `out[col] = sum_p values[p] * x[indices[p]]` over the columns of CSC `a`.
///
/// # Panics
/// If `out` is shorter than the number of columns of `a`.
pub fn vecmat_dense_csc_into<T: Real>(x: &[T], a: CsView<'_>, out: &mut [T]) {
    let ncols = a.nmajor();
    assert!(out.len() >= ncols, "out length must be at least ncols");
    for (col, o) in out.iter_mut().enumerate().take(ncols) {
        let mut acc = 0.0f64;
        for p in a.range(col) {
            acc += a.values[p] * x[i64_to_usize(a.indices[p])].widen();
        }
        *o = T::narrow(acc);
    }
}

/// Pattern-only form of [`vecmat_dense_csc_into`]: every stored entry counts
/// as one.
///
/// # Panics
/// If `out` is shorter than the number of columns of `a`.
pub fn vecmat_dense_csc_binary_into<T: Real>(x: &[T], a: CsView<'_>, out: &mut [T]) {
    let ncols = a.nmajor();
    assert!(out.len() >= ncols, "out length must be at least ncols");
    for (col, o) in out.iter_mut().enumerate().take(ncols) {
        let mut acc = 0.0f64;
        for p in a.range(col) {
            acc += x[i64_to_usize(a.indices[p])].widen();
        }
        *o = T::narrow(acc);
    }
}

/// y = x @ A for a dense row vector `x` and CSC `A`.
///
/// # Panics
/// If `x.len() != a.nrows`.
#[must_use]
pub fn vecmat_dense_csc<T: Real>(x: &[T], a: &Csc<f64, i64>) -> Vec<T> {
    assert_eq!(x.len(), a.nrows, "x length must equal nrows");
    let mut y = vec![T::zero(); a.ncols];
    vecmat_dense_csc_into(x, a.view(), &mut y);
    y
}

/// y = x @ pattern(A) for a dense row vector `x` and CSC `A`.
///
/// # Panics
/// If `x.len() != a.nrows`.
#[must_use]
pub fn vecmat_dense_csc_binary<T: Real>(x: &[T], a: &Csc<f64, i64>) -> Vec<T> {
    assert_eq!(x.len(), a.nrows, "x length must equal nrows");
    let mut y = vec![T::zero(); a.ncols];
    vecmat_dense_csc_binary_into(x, a.view(), &mut y);
    y
}
