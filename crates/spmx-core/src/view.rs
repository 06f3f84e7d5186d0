//! Borrowed views over caller-owned buffers.
//!
//! None of these types own storage. The product kernels read sparse and dense
//! operands through them and write through [`DenseViewMut`].

use core::ops::Range;

#[inline]
fn offset(x: i64) -> usize {
    debug_assert!(x >= 0);
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    {
        x as usize
    }
}

/// Compressed sparse triple with no orientation tag.
///
/// Whether the major dimension is rows (CSR) or columns (CSC) is decided by
/// the consuming kernel. A CSC matrix read by a row-oriented kernel is the CSR
/// form of its transpose.
#[derive(Debug, Clone, Copy)]
pub struct CsView<'a> {
    pub indptr: &'a [i64],
    pub indices: &'a [i64],
    pub values: &'a [f64],
}

impl<'a> CsView<'a> {
    #[inline]
    #[must_use]
    pub const fn new(indptr: &'a [i64], indices: &'a [i64], values: &'a [f64]) -> Self {
        Self {
            indptr,
            indices,
            values,
        }
    }

    /// Number of major slices (rows for CSR, columns for CSC).
    #[inline]
    #[must_use]
    pub const fn nmajor(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    #[inline]
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Entry positions of major slice `i`.
    #[inline]
    #[must_use]
    pub fn range(&self, i: usize) -> Range<usize> {
        offset(self.indptr[i])..offset(self.indptr[i + 1])
    }

    #[inline]
    #[must_use]
    pub fn slice_is_empty(&self, i: usize) -> bool {
        self.indptr[i] >= self.indptr[i + 1]
    }

    /// No slices, or no entries in any slice.
    #[inline]
    #[must_use]
    pub fn is_structurally_empty(&self) -> bool {
        let n = self.nmajor();
        n == 0 || self.indptr[0] == self.indptr[n]
    }
}

/// Storage order of a dense buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    RowMajor,
    ColMajor,
}

impl Layout {
    /// The same buffer read as the transposed matrix.
    #[inline]
    #[must_use]
    pub const fn transposed(self) -> Self {
        match self {
            Self::RowMajor => Self::ColMajor,
            Self::ColMajor => Self::RowMajor,
        }
    }
}

#[inline]
const fn required_len(nrows: usize, ncols: usize, ld: usize, layout: Layout) -> usize {
    let (major, minor) = match layout {
        Layout::RowMajor => (nrows, ncols),
        Layout::ColMajor => (ncols, nrows),
    };
    if major == 0 || minor == 0 {
        0
    } else {
        (major - 1) * ld + minor
    }
}

/// Read-only dense matrix over a flat buffer with a leading dimension.
#[derive(Debug, Clone, Copy)]
pub struct DenseView<'a, T> {
    pub data: &'a [T],
    pub nrows: usize,
    pub ncols: usize,
    pub ld: usize,
    pub layout: Layout,
}

impl<'a, T> DenseView<'a, T> {
    /// # Panics
    /// If `ld` is shorter than a contiguous slice or `data` cannot hold the extents.
    #[must_use]
    pub fn new(data: &'a [T], nrows: usize, ncols: usize, ld: usize, layout: Layout) -> Self {
        let minor = match layout {
            Layout::RowMajor => ncols,
            Layout::ColMajor => nrows,
        };
        assert!(ld >= minor, "leading dimension must be at least {minor}");
        assert!(
            data.len() >= required_len(nrows, ncols, ld, layout),
            "dense buffer too short for {nrows}x{ncols} with ld {ld}"
        );
        Self {
            data,
            nrows,
            ncols,
            ld,
            layout,
        }
    }

    #[must_use]
    pub fn row_major(data: &'a [T], nrows: usize, ncols: usize) -> Self {
        Self::new(data, nrows, ncols, ncols, Layout::RowMajor)
    }

    #[must_use]
    pub fn col_major(data: &'a [T], nrows: usize, ncols: usize) -> Self {
        Self::new(data, nrows, ncols, nrows, Layout::ColMajor)
    }

    /// View of the transpose over the same buffer.
    #[inline]
    #[must_use]
    pub const fn transposed(self) -> Self {
        Self {
            data: self.data,
            nrows: self.ncols,
            ncols: self.nrows,
            ld: self.ld,
            layout: self.layout.transposed(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

/// Writable dense matrix over a caller-owned buffer.
#[derive(Debug)]
pub struct DenseViewMut<'a, T> {
    pub data: &'a mut [T],
    pub nrows: usize,
    pub ncols: usize,
    pub ld: usize,
    pub layout: Layout,
}

impl<'a, T> DenseViewMut<'a, T> {
    /// # Panics
    /// If `ld` is shorter than a contiguous slice or `data` cannot hold the extents.
    #[must_use]
    pub fn new(data: &'a mut [T], nrows: usize, ncols: usize, ld: usize, layout: Layout) -> Self {
        let minor = match layout {
            Layout::RowMajor => ncols,
            Layout::ColMajor => nrows,
        };
        assert!(ld >= minor, "leading dimension must be at least {minor}");
        assert!(
            data.len() >= required_len(nrows, ncols, ld, layout),
            "output buffer too short for {nrows}x{ncols} with ld {ld}"
        );
        Self {
            data,
            nrows,
            ncols,
            ld,
            layout,
        }
    }

    #[must_use]
    pub fn row_major(data: &'a mut [T], nrows: usize, ncols: usize) -> Self {
        Self::new(data, nrows, ncols, ncols, Layout::RowMajor)
    }

    #[must_use]
    pub fn col_major(data: &'a mut [T], nrows: usize, ncols: usize) -> Self {
        Self::new(data, nrows, ncols, nrows, Layout::ColMajor)
    }

    /// View of the transpose over the same buffer.
    #[inline]
    #[must_use]
    pub fn transposed(self) -> Self {
        Self {
            data: self.data,
            nrows: self.ncols,
            ncols: self.nrows,
            ld: self.ld,
            layout: self.layout.transposed(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

/// Position convention of a sparse vector's indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexBase {
    #[default]
    Zero,
    One,
}

impl IndexBase {
    #[inline]
    #[must_use]
    pub const fn offset(self) -> i64 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// Sparse vector: ascending indices with a parallel value list.
#[derive(Debug, Clone, Copy)]
pub struct SparseVec<'a, V> {
    pub indices: &'a [i64],
    pub values: &'a [V],
    pub base: IndexBase,
}

impl<'a, V> SparseVec<'a, V> {
    /// # Panics
    /// If `indices` and `values` differ in length.
    #[must_use]
    pub fn new(indices: &'a [i64], values: &'a [V], base: IndexBase) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "sparse vector indices and values must have equal length"
        );
        Self {
            indices,
            values,
            base,
        }
    }

    #[inline]
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
