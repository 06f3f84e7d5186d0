//! Outer products of a column vector with a sparse column vector.
//!
//! The sparse factor arrives as a single-column matrix stored in CSR form,
//! so each of its rows holds at most one entry and that entry (the first in
//! the row) is the row's weight. Rows of the sparse factor without an entry
//! produce empty rows (or no entry in a column) of the result.

use crate::blas::axpy;
use crate::real::Real;
use crate::util::{i64_to_usize, usize_to_i64};
use log::debug;
use spmx_core::{Csc, Csr, CsView, DenseValue, IndexBase, NA_REAL};

/// `v · t(s)` laid out row by row: row `r` is `s[r] * v` when `s` has an entry
/// in row `r`, and empty otherwise.
///
/// Products are formed in `T` and stored widened to `f64`.
#[must_use]
pub fn outer_dense_sparse<T: Real>(v: &[T], s: CsView<'_>) -> Csr<f64, i64> {
    let nrows = s.nmajor();
    let k = v.len();
    let filled = (0..nrows).filter(|&r| !s.slice_is_empty(r)).count();
    debug!("outer_dense_sparse<{}>: {nrows} rows, {filled} filled, width {k}", T::NAME);

    let mut indptr = Vec::with_capacity(nrows + 1);
    let mut indices = Vec::with_capacity(filled * k);
    let mut data = Vec::with_capacity(filled * k);
    let mut row_buf = vec![T::zero(); k];
    indptr.push(0i64);
    for r in 0..nrows {
        if !s.slice_is_empty(r) {
            let weight = s.values[i64_to_usize(s.indptr[r])];
            row_buf.fill(T::zero());
            axpy(k, weight, v, 1, &mut row_buf, 1);
            indices.extend((0..k).map(usize_to_i64));
            data.extend(row_buf.iter().map(|x| x.widen()));
        }
        indptr.push(usize_to_i64(data.len()));
    }
    Csr::from_parts_unchecked(nrows, k, indptr, indices, data)
}

/// Column `col` of the result is `weights[col] * x` for each position `col`
/// listed in `y_indices`; unlisted columns are empty.
///
/// A missing weight turns every entry of its column into [`NA_REAL`].
///
/// # Panics
/// If `weights.len() != ncols` or a listed position falls outside `ncols`.
#[must_use]
pub fn outer_sparse_sparse<V: DenseValue>(
    x: CsView<'_>,
    y_indices: &[i64],
    y_base: IndexBase,
    weights: &[V],
    ncols: usize,
) -> Csc<f64, i64> {
    assert_eq!(weights.len(), ncols, "weights length must equal ncols");
    spread_columns(x, y_indices, y_base, ncols, |col, xv| {
        let w = weights[col];
        if w.is_na() {
            NA_REAL
        } else {
            w.as_f64() * xv
        }
    })
}

/// Pattern-only form of [`outer_sparse_sparse`]: every listed column is a
/// copy of `x`.
///
/// # Panics
/// If a listed position falls outside `ncols`.
#[must_use]
pub fn outer_sparse_binary(
    x: CsView<'_>,
    y_indices: &[i64],
    y_base: IndexBase,
    ncols: usize,
) -> Csc<f64, i64> {
    spread_columns(x, y_indices, y_base, ncols, |_, xv| xv)
}

fn spread_columns(
    x: CsView<'_>,
    y_indices: &[i64],
    y_base: IndexBase,
    ncols: usize,
    value: impl Fn(usize, f64) -> f64,
) -> Csc<f64, i64> {
    let nrows = x.nmajor();
    let filled: Vec<usize> = (0..nrows).filter(|&r| !x.slice_is_empty(r)).collect();
    debug!(
        "outer_sparse_sparse: {} of {nrows} rows filled, {} of {ncols} columns selected",
        filled.len(),
        y_indices.len()
    );

    let mut counts = vec![0i64; ncols + 1];
    let mut indices = Vec::with_capacity(filled.len() * y_indices.len());
    let mut data = Vec::with_capacity(filled.len() * y_indices.len());
    for &pos in y_indices {
        let col = i64_to_usize(pos - y_base.offset());
        assert!(col < ncols, "column {col} out of bounds for {ncols} columns");
        for &r in &filled {
            indices.push(usize_to_i64(r));
            data.push(value(col, x.values[i64_to_usize(x.indptr[r])]));
        }
        counts[col + 1] = usize_to_i64(filled.len());
    }
    for c in 0..ncols {
        counts[c + 1] += counts[c];
    }
    Csc::from_parts_unchecked(nrows, ncols, counts, indices, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spmx_core::is_na_real;

    #[test]
    fn broadcast_skips_empty_rows() {
        // 3x1 sparse column with entries in rows 0 and 2.
        let indptr = [0i64, 1, 1, 2];
        let indices = [0i64, 0];
        let values = [2.0, -1.0];
        let s = CsView::new(&indptr, &indices, &values);
        let out = outer_dense_sparse(&[1.0f32, 0.5], s);
        assert_eq!(out.shape(), (3, 2));
        assert_eq!(out.indptr, vec![0, 2, 2, 4]);
        assert_eq!(out.indices, vec![0, 1, 0, 1]);
        assert_eq!(out.data, vec![2.0, 1.0, -1.0, -0.5]);
    }

    #[test]
    fn missing_weight_fills_its_column() {
        let indptr = [0i64, 1, 2];
        let indices = [0i64, 0];
        let values = [3.0, 4.0];
        let x = CsView::new(&indptr, &indices, &values);
        let weights = [2i32, 0, spmx_core::NA_INTEGER];
        let out = outer_sparse_sparse(x, &[1, 3], IndexBase::One, &weights, 3);
        assert_eq!(out.indptr, vec![0, 2, 2, 4]);
        assert_eq!(&out.data[..2], &[6.0, 8.0]);
        assert!(out.data[2..].iter().all(|&v| is_na_real(v)));
    }
}
