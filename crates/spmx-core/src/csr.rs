//! CSR format definitions and constructors

use crate::compressed::validate;
use crate::error::Result;
use crate::view::CsView;

#[derive(Debug, Clone, PartialEq)]
pub struct Csr<T, I> {
    pub nrows: usize,
    pub ncols: usize,
    pub indptr: Vec<I>,
    pub indices: Vec<I>,
    pub data: Vec<T>,
}

impl<T, I> Csr<T, I> {
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }
}

impl Csr<f64, i64> {
    /// Assemble a CSR matrix from its parts.
    ///
    /// Lengths and the `indptr` end points are always checked. With `check`
    /// set, `indptr` monotonicity, column bounds and strictly increasing
    /// column indices within each row are checked as well.
    ///
    /// # Errors
    /// The first structural violation found, as a [`crate::CoreError`].
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self> {
        validate(nrows, ncols, &indptr, &indices, data.len(), check)?;
        Ok(Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        })
    }

    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
    ) -> Self {
        Self {
            nrows,
            ncols,
            indptr,
            indices,
            data,
        }
    }

    /// All-zero matrix of the given shape.
    #[must_use]
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::from_parts_unchecked(nrows, ncols, vec![0; nrows + 1], Vec::new(), Vec::new())
    }

    /// Borrow as a row-major compressed view.
    #[inline]
    #[must_use]
    pub fn view(&self) -> CsView<'_> {
        CsView::new(&self.indptr, &self.indices, &self.data)
    }
}
