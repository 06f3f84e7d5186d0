//! Dot products between sparse vectors, and CSR times a sparse vector.
//!
//! Both operands list their indices in ascending order. The intersection
//! walks the two lists together; when the cursors disagree, the lagging one
//! jumps straight to the first index not below the other cursor's index with
//! a binary search, so long runs with no overlap cost a logarithmic number of
//! steps instead of a linear one.

use crate::error::Result;
use crate::parallel::Parallelism;
use log::{debug, trace};
use spmx_core::{Csr, CsView, DenseValue, IndexBase, SparseVec, NA_REAL};
use std::ops::ControlFlow;

/// Visit every matching pair `(i, j)` with `a[i] - a_shift == b[j] - b_shift`,
/// in ascending index order.
fn gallop<F>(a: &[i64], a_shift: i64, b: &[i64], b_shift: i64, mut visit: F) -> ControlFlow<()>
where
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        let ai = a[i] - a_shift;
        let bj = b[j] - b_shift;
        if ai == bj {
            if visit(i, j).is_break() {
                return ControlFlow::Break(());
            }
            i += 1;
            j += 1;
        } else if ai < bj {
            i += a[i..].partition_point(|&x| x - a_shift < bj);
        } else {
            j += b[j..].partition_point(|&x| x - b_shift < ai);
        }
    }
    ControlFlow::Continue(())
}

/// `sum u[k] * v[k]` over the indices present in both vectors.
///
/// Index bases are reconciled before matching. An empty operand gives `0.0`;
/// a matched missing element of `v` makes the whole result [`NA_REAL`].
#[must_use]
pub fn dot_sparse_sparse<V: DenseValue>(u: SparseVec<'_, f64>, v: SparseVec<'_, V>) -> f64 {
    if u.is_empty() || v.is_empty() {
        return 0.0;
    }
    let mut acc = 0.0f64;
    let flow = gallop(
        u.indices,
        u.base.offset(),
        v.indices,
        v.base.offset(),
        |i, j| {
            let vj = v.values[j];
            if vj.is_na() {
                return ControlFlow::Break(());
            }
            acc += u.values[i] * vj.as_f64();
            ControlFlow::Continue(())
        },
    );
    match flow {
        ControlFlow::Continue(()) => acc,
        ControlFlow::Break(()) => NA_REAL,
    }
}

/// Sum of `u`'s values at the positions listed in `v_indices`.
#[must_use]
pub fn dot_sparse_binary(u: SparseVec<'_, f64>, v_indices: &[i64], v_base: IndexBase) -> f64 {
    if u.is_empty() || v_indices.is_empty() {
        return 0.0;
    }
    let mut acc = 0.0f64;
    let _ = gallop(u.indices, u.base.offset(), v_indices, v_base.offset(), |i, _| {
        acc += u.values[i];
        ControlFlow::Continue(())
    });
    acc
}

#[inline]
fn csr_row<'a>(a: &CsView<'a>, row: usize) -> SparseVec<'a, f64> {
    let r = a.range(row);
    SparseVec {
        indices: &a.indices[r.clone()],
        values: &a.values[r],
        base: IndexBase::Zero,
    }
}

/// `out[r] = dot(row r of a, y)` for every row of CSR `a`.
///
/// # Errors
/// [`crate::KernelError::ThreadPool`] if the worker pool cannot be started.
///
/// # Panics
/// If `out` is shorter than the number of rows of `a`.
pub fn matvec_csr_sparse_into<V: DenseValue>(
    a: CsView<'_>,
    y: SparseVec<'_, V>,
    out: &mut [f64],
    par: &Parallelism,
) -> Result<()> {
    let nrows = a.nmajor();
    assert!(out.len() >= nrows, "out length must be at least nrows");
    let out = &mut out[..nrows];
    if y.is_empty() || a.is_structurally_empty() {
        trace!("matvec_csr_sparse: nothing to intersect");
        out.fill(0.0);
        return Ok(());
    }
    debug!(
        "matvec_csr_sparse: nrows={nrows} nnz={} y_nnz={} workers={}",
        a.nnz(),
        y.nnz(),
        par.workers_for(nrows)
    );
    par.for_each_row_chunk(out, 1, nrows, |row, slot| {
        slot[0] = dot_sparse_sparse(csr_row(&a, row), y);
    })
}

/// Pattern-only form of [`matvec_csr_sparse_into`]: `y` contributes only
/// its positions.
///
/// # Errors
/// [`crate::KernelError::ThreadPool`] if the worker pool cannot be started.
///
/// # Panics
/// If `out` is shorter than the number of rows of `a`.
pub fn matvec_csr_sparse_binary_into(
    a: CsView<'_>,
    y_indices: &[i64],
    y_base: IndexBase,
    out: &mut [f64],
    par: &Parallelism,
) -> Result<()> {
    let nrows = a.nmajor();
    assert!(out.len() >= nrows, "out length must be at least nrows");
    let out = &mut out[..nrows];
    if y_indices.is_empty() || a.is_structurally_empty() {
        trace!("matvec_csr_sparse_binary: nothing to intersect");
        out.fill(0.0);
        return Ok(());
    }
    debug!(
        "matvec_csr_sparse_binary: nrows={nrows} nnz={} y_nnz={} workers={}",
        a.nnz(),
        y_indices.len(),
        par.workers_for(nrows)
    );
    par.for_each_row_chunk(out, 1, nrows, |row, slot| {
        slot[0] = dot_sparse_binary(csr_row(&a, row), y_indices, y_base);
    })
}

/// y = A @ v for CSR `A` and sparse `v`.
///
/// # Errors
/// See [`matvec_csr_sparse_into`].
pub fn matvec_csr_sparse<V: DenseValue>(
    a: &Csr<f64, i64>,
    y: SparseVec<'_, V>,
    par: &Parallelism,
) -> Result<Vec<f64>> {
    let mut out = vec![0.0f64; a.nrows];
    matvec_csr_sparse_into(a.view(), y, &mut out, par)?;
    Ok(out)
}

/// y = A @ pattern(v) for CSR `A` and sparse `v`.
///
/// # Errors
/// See [`matvec_csr_sparse_binary_into`].
pub fn matvec_csr_sparse_binary(
    a: &Csr<f64, i64>,
    y_indices: &[i64],
    y_base: IndexBase,
    par: &Parallelism,
) -> Result<Vec<f64>> {
    let mut out = vec![0.0f64; a.nrows];
    matvec_csr_sparse_binary_into(a.view(), y_indices, y_base, &mut out, par)?;
    Ok(out)
}
