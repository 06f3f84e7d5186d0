//! CSC format definitions and constructors

use crate::compressed::validate;
use crate::error::Result;
use crate::view::CsView;

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Csc<T, I> {
    pub data: Vec<T>,
    pub indices: Vec<I>, // row indices per column
    pub indptr: Vec<I>,  // column pointer, length ncols + 1
    pub ncols: usize,
    pub nrows: usize,
}

impl<T, I> Csc<T, I> {
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl Csc<f64, i64> {
    /// Assemble a CSC matrix; see [`crate::Csr::from_parts`] for what is checked.
    ///
    /// # Errors
    /// The first structural violation found, as a [`crate::CoreError`].
    #[inline]
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<i64>,
        indices: Vec<i64>,
        data: Vec<f64>,
        check: bool,
    ) -> Result<Self> {
        validate(ncols, nrows, &indptr, &indices, data.len(), check)?;
        Ok(Self {
            data,
            indices,
            indptr,
            ncols,
            nrows,
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
            data,
            indices,
            indptr,
            ncols,
            nrows,
        }
    }

    /// Borrow as a column-major compressed view.
    #[inline]
    #[must_use]
    pub fn view(&self) -> CsView<'_> {
        CsView::new(&self.indptr, &self.indices, &self.data)
    }
}
