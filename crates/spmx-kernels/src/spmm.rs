#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use m/n/a/b/c for GEMM operands"
)]
#![allow(
    clippy::too_many_arguments,
    reason = "GEMM-style entry points take extents and leading dimensions explicitly"
)]
//! Sparse rows times a row-major dense matrix.
//!
//! Both kernels read `a` as CSR with `m` rows and `b` as a row-major matrix
//! whose row `j` starts at `b[j * ldb]` and has `n` used columns.
//!
//! `gemm_csr_drm_as_drm` computes `C <- A*B + C` with `C` row-major. Reading
//! the operands through different lenses gives, with no extra code:
//!
//! ```text
//! C <- A*t(B) + C     A(m,k) CSR, B(n,k) column-major, C(m,n) row-major
//! C <- t(A)*B + C     A(k,m) CSC, B(k,n) row-major,    C(m,n) row-major
//! C <- t(A)*t(B) + C  A(k,m) CSC, B(n,k) column-major, C(m,n) row-major
//! C <- B*t(A) + C     A(k,m) CSR, B(n,k) column-major, C(n,m) column-major
//! C <- B*A + C        A(k,m) CSC, B(n,k) column-major, C(n,m) column-major
//! ```
//!
//! `gemm_csr_drm_as_dcm` computes the same `C <- A*B + C` (or `A*t(B) + C`
//! for a column-major `B`) into a column-major `C`, going through a
//! per-worker scratch row so that the accumulation itself stays contiguous.
//! Both kernels add into `C`; neither one overwrites it.

use crate::blas::{add_strided_raw, axpy};
use crate::error::Result;
use crate::parallel::{Parallelism, ScratchArena};
use crate::real::Real;
use crate::util::i64_to_usize;
use log::{debug, trace};
use spmx_core::CsView;

#[inline]
fn no_work(m: usize, n: usize, a: &CsView<'_>) -> bool {
    m == 0 || n == 0 || a.indptr[0] == a.indptr[m]
}

/// `C[r, :n] += sum_p values[p] * B[indices[p], :n]` for every row `r < m`.
///
/// `c` is row-major with leading dimension `ldc`. Rows are scheduled one at a
/// time over `par` workers; each row's output slice belongs to one worker.
///
/// # Errors
/// [`crate::KernelError::ThreadPool`] if the worker pool cannot be started.
///
/// # Panics
/// If `a` has fewer than `m` rows, `ldc < n`, or `c` is too short.
pub fn gemm_csr_drm_as_drm<T: Real>(
    m: usize,
    n: usize,
    a: CsView<'_>,
    b: &[T],
    ldb: usize,
    c: &mut [T],
    ldc: usize,
    par: &Parallelism,
) -> Result<()> {
    assert!(a.indptr.len() > m, "sparse operand must have at least {m} rows");
    if no_work(m, n, &a) {
        trace!("gemm_csr_drm_as_drm: nothing to accumulate ({m}x{n})");
        return Ok(());
    }
    assert!(ldc >= n, "ldc must be at least n");
    assert!(c.len() >= (m - 1) * ldc + n, "C must hold m rows of ldc");
    debug!(
        "gemm_csr_drm_as_drm<{}>: m={m} n={n} nnz={} workers={}",
        T::NAME,
        a.indptr[m] - a.indptr[0],
        par.workers_for(m)
    );

    par.for_each_row_chunk(c, ldc, m, |row, c_row| {
        let c_row = &mut c_row[..n];
        for p in a.range(row) {
            let base = i64_to_usize(a.indices[p]) * ldb;
            axpy(n, a.values[p], &b[base..base + n], 1, c_row, 1);
        }
    })
}

/// `C[r, :n] += sum_p values[p] * B[indices[p], :n]` into column-major `C`.
///
/// `c` has leading dimension `ldc` (at least `m`), so row `r` of the result is
/// the strided sequence `c[r], c[r + ldc], ...`. Each non-empty row is summed
/// into the worker's scratch row and added to `c` once. Rows without entries
/// are not touched.
///
/// # Errors
/// [`crate::KernelError::ThreadPool`] if the worker pool cannot be started,
/// [`crate::KernelError::ScratchAlloc`] if a scratch row cannot be allocated.
///
/// # Panics
/// If `a` has fewer than `m` rows, `ldc < m`, or `c` is too short.
pub fn gemm_csr_drm_as_dcm<T: Real>(
    m: usize,
    n: usize,
    a: CsView<'_>,
    b: &[T],
    ldb: usize,
    c: &mut [T],
    ldc: usize,
    par: &Parallelism,
) -> Result<()> {
    assert!(a.indptr.len() > m, "sparse operand must have at least {m} rows");
    if no_work(m, n, &a) {
        trace!("gemm_csr_drm_as_dcm: nothing to materialize ({m}x{n})");
        return Ok(());
    }
    assert!(ldc >= m, "ldc must be at least m");
    assert!(c.len() >= (n - 1) * ldc + m, "C must hold n columns of ldc");
    debug!(
        "gemm_csr_drm_as_dcm<{}>: m={m} n={n} nnz={} workers={}",
        T::NAME,
        a.indptr[m] - a.indptr[0],
        par.workers_for(m)
    );

    let scratch: ScratchArena<T> = ScratchArena::new(ldb.max(n));
    let c_addr = c.as_mut_ptr() as usize;
    par.try_for_each_row(m, |row| {
        if a.slice_is_empty(row) {
            return Ok(());
        }
        scratch.with_row(|buf| {
            let acc = &mut buf[..n];
            acc.fill(T::zero());
            for p in a.range(row) {
                let base = i64_to_usize(a.indices[p]) * ldb;
                axpy(n, a.values[p], &b[base..base + n], 1, acc, 1);
            }
            // Row `row` owns c[row + i*ldc] for i < n; row < m <= ldc keeps
            // those positions disjoint from every other row's.
            unsafe {
                let c_ptr = (c_addr as *mut T).add(row);
                add_strided_raw(n, acc, 1, c_ptr, ldc);
            }
        })
    })?;
    debug!(
        "gemm_csr_drm_as_dcm: released {} scratch rows",
        scratch.allocated()
    );
    Ok(())
}

/// Row-major `Y = A @ B` for CSR `A` with `B` row-major `(ncols, k)`.
///
/// Convenience form of [`gemm_csr_drm_as_drm`] returning a fresh buffer.
///
/// # Errors
/// See [`gemm_csr_drm_as_drm`].
///
/// # Panics
/// If `b.len() != ncols * k`.
pub fn spmm_csr_dense<T: Real>(
    a: CsView<'_>,
    ncols: usize,
    b: &[T],
    k: usize,
    par: &Parallelism,
) -> Result<Vec<T>> {
    assert_eq!(b.len(), ncols * k, "B must be ncols x k row-major");
    let nrows = a.nmajor();
    let mut y = vec![T::zero(); nrows * k];
    gemm_csr_drm_as_drm(nrows, k, a, b, k, &mut y, k, par)?;
    Ok(y)
}
