//! Floating point element widths understood by the product kernels.
//!
//! Sparse values are always stored as `f64`. A dense operand may be `f64` or
//! `f32`; the kernels narrow a sparse weight to the dense width exactly once,
//! at the point of multiplication, through [`Real::narrow`].

use num_traits::Float;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for f32 {}
}

/// Precision tag for dense operands and outputs.
pub trait Real: Float + Default + Send + Sync + core::fmt::Debug + sealed::Sealed + 'static {
    /// Width name, used in log lines.
    const NAME: &'static str;

    /// Narrow (or pass through) a 64-bit scalar.
    fn narrow(x: f64) -> Self;

    /// Widen to 64 bits. Exact for both implementors.
    fn widen(self) -> f64;

    /// `y[i] += x[i]` over two equally long contiguous slices.
    ///
    /// Vectorised; lane-wise IEEE addition gives the same bits as the scalar loop.
    fn add_assign_slice(y: &mut [Self], x: &[Self]);
}

impl Real for f64 {
    const NAME: &'static str = "f64";

    #[inline]
    fn narrow(x: f64) -> Self {
        x
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn add_assign_slice(y: &mut [Self], x: &[Self]) {
        crate::blas::add_assign_f64(y, x);
    }
}

impl Real for f32 {
    const NAME: &'static str = "f32";

    #[inline]
    #[allow(clippy::cast_possible_truncation, reason = "narrowing is the point")]
    fn narrow(x: f64) -> Self {
        x as f32
    }

    #[inline]
    fn widen(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn add_assign_slice(y: &mut [Self], x: &[Self]) {
        crate::blas::add_assign_f32(y, x);
    }
}
