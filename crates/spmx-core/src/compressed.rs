//! Structural checks shared by the CSR and CSC constructors.

use crate::error::{CoreError, Result};

pub(crate) fn validate(
    nmajor: usize,
    nminor: usize,
    indptr: &[i64],
    indices: &[i64],
    data_len: usize,
    check: bool,
) -> Result<()> {
    let Some(expected) = nmajor.checked_add(1) else {
        return Err(CoreError::IndptrLength {
            expected: usize::MAX,
            got: indptr.len(),
        });
    };
    if indptr.len() != expected {
        return Err(CoreError::IndptrLength {
            expected,
            got: indptr.len(),
        });
    }
    if indices.len() != data_len {
        return Err(CoreError::LengthMismatch {
            indices: indices.len(),
            data: data_len,
        });
    }
    let nnz = indices.len();
    if indptr.first().copied().unwrap_or(0) != 0 {
        return Err(CoreError::IndptrStart);
    }
    if usize::try_from(indptr.last().copied().unwrap_or(0)).ok() != Some(nnz) {
        return Err(CoreError::IndptrEnd { nnz });
    }
    if !check {
        return Ok(());
    }
    for (slice, w) in indptr.windows(2).enumerate() {
        let (Ok(start), Ok(end)) = (usize::try_from(w[0]), usize::try_from(w[1])) else {
            return Err(CoreError::IndptrOrder { slice });
        };
        if end < start || end > nnz {
            return Err(CoreError::IndptrOrder { slice });
        }
        let mut prev = -1_i64;
        for &j in &indices[start..end] {
            let in_bounds = usize::try_from(j).is_ok_and(|j| j < nminor);
            if !in_bounds {
                return Err(CoreError::IndexOutOfBounds {
                    slice,
                    index: j,
                    bound: nminor,
                });
            }
            if j <= prev {
                return Err(CoreError::Unsorted { slice });
            }
            prev = j;
        }
    }
    Ok(())
}
