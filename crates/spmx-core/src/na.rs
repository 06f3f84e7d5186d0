//! Missing value (NA) convention for dense operands.
//!
//! Integer and logical inputs carry a reserved sentinel that has no floating
//! point counterpart, so kernels test it explicitly with [`DenseValue::is_na`]
//! and write [`NA_REAL`] for any output that touched one. Floating point
//! inputs report no sentinel: their NaNs already propagate through the sums.

/// Sentinel for a missing 32-bit integer.
pub const NA_INTEGER: i32 = i32::MIN;

/// Sentinel for a missing logical, shares the integer representation.
pub const NA_LOGICAL: i32 = i32::MIN;

/// Missing `f64`: a NaN whose low word carries the payload 1954.
///
/// Only its bit pattern distinguishes it from an arithmetic NaN, see
/// [`is_na_real`].
pub const NA_REAL: f64 = f64::from_bits(0x7FF0_0000_0000_07A2);

/// True when `x` is exactly the [`NA_REAL`] bit pattern.
#[inline]
#[must_use]
pub fn is_na_real(x: f64) -> bool {
    x.to_bits() == NA_REAL.to_bits()
}

/// Tri-state boolean stored as `i32`: 0, non-zero, or [`NA_LOGICAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Logical(pub i32);

impl Logical {
    pub const FALSE: Self = Self(0);
    pub const TRUE: Self = Self(1);
    pub const NA: Self = Self(NA_LOGICAL);

    #[inline]
    #[must_use]
    pub const fn is_na(self) -> bool {
        self.0 == NA_LOGICAL
    }
}

impl From<bool> for Logical {
    #[inline]
    fn from(b: bool) -> Self {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

/// Element type of a dense vector consumed by the vector kernels.
///
/// Products are accumulated in `f64` (the wider of the two operand widths,
/// sparse values being `f64`) and converted once per output via
/// [`DenseValue::finish`].
pub trait DenseValue: Copy + Send + Sync {
    /// Element type written by the kernel for one row.
    type Output: Copy + Send + Sync + Default + core::fmt::Debug;

    /// Whether this element is the missing sentinel.
    fn is_na(self) -> bool;

    /// Multiplicand value. Only meaningful when `!self.is_na()`.
    fn as_f64(self) -> f64;

    /// Convert a finished accumulator.
    fn finish(acc: f64) -> Self::Output;

    /// Value written for a row forced to missing.
    fn missing() -> Self::Output;
}

impl DenseValue for f64 {
    type Output = f64;

    #[inline]
    fn is_na(self) -> bool {
        false
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    #[inline]
    fn finish(acc: f64) -> f64 {
        acc
    }

    #[inline]
    fn missing() -> f64 {
        NA_REAL
    }
}

impl DenseValue for f32 {
    type Output = f32;

    #[inline]
    fn is_na(self) -> bool {
        false
    }

    #[inline]
    fn as_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation, reason = "output keeps the operand width")]
    fn finish(acc: f64) -> f32 {
        acc as f32
    }

    #[inline]
    fn missing() -> f32 {
        f32::NAN
    }
}

impl DenseValue for i32 {
    type Output = f64;

    #[inline]
    fn is_na(self) -> bool {
        self == NA_INTEGER
    }

    #[inline]
    fn as_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn finish(acc: f64) -> f64 {
        acc
    }

    #[inline]
    fn missing() -> f64 {
        NA_REAL
    }
}

impl DenseValue for Logical {
    type Output = f64;

    #[inline]
    fn is_na(self) -> bool {
        Self::is_na(self)
    }

    #[inline]
    fn as_f64(self) -> f64 {
        if self.0 == 0 {
            0.0
        } else {
            1.0
        }
    }

    #[inline]
    fn finish(acc: f64) -> f64 {
        acc
    }

    #[inline]
    fn missing() -> f64 {
        NA_REAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_real_is_distinct_from_plain_nan() {
        assert!(NA_REAL.is_nan());
        assert!(is_na_real(NA_REAL));
        assert!(!is_na_real(f64::NAN));
        assert!(!is_na_real(0.0));
    }

    #[test]
    fn logical_truthiness() {
        assert_eq!(Logical(7).as_f64(), 1.0);
        assert_eq!(Logical::FALSE.as_f64(), 0.0);
        assert!(DenseValue::is_na(Logical::NA));
        assert!(DenseValue::is_na(NA_INTEGER));
        assert!(!DenseValue::is_na(f64::NAN));
    }
}
