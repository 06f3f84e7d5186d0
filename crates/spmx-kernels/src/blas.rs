//! Level-1 primitives: strided `y += alpha * x` and strided copy.
//!
//! `alpha` always arrives as `f64`. It is narrowed to the operand width once
//! per call, never per element, so every element sees the same rounded scalar.

#![allow(
    clippy::many_single_char_names,
    reason = "BLAS argument names (n, x, y) are kept"
)]

use crate::real::Real;
use wide::{f32x8, f64x4};

/// `y[i*incy] += alpha * x[i*incx]` for `i` in `0..n`.
///
/// Unit strides with `alpha == 1` (after narrowing) take a vectorised
/// elementwise add. The general loop multiplies and adds separately, never
/// fused, so both paths give identical bits for the same inputs.
///
/// # Panics
/// If either slice is too short for `n` strided elements.
#[inline]
pub fn axpy<T: Real>(n: usize, alpha: f64, x: &[T], incx: usize, y: &mut [T], incy: usize) {
    if n == 0 {
        return;
    }
    let alpha = T::narrow(alpha);
    if incx == 1 && incy == 1 {
        let (x, y) = (&x[..n], &mut y[..n]);
        if alpha == T::one() {
            T::add_assign_slice(y, x);
        } else {
            for (yi, &xi) in y.iter_mut().zip(x) {
                *yi = *yi + alpha * xi;
            }
        }
        return;
    }
    for i in 0..n {
        let yi = &mut y[i * incy];
        *yi = *yi + alpha * x[i * incx];
    }
}

/// Single-value form of [`axpy`].
#[inline]
pub fn axpy_scalar<T: Real>(alpha: f64, x: T, y: &mut T) {
    *y = *y + T::narrow(alpha) * x;
}

/// `y[i*incy] = x[i*incx]` for `i` in `0..n`.
///
/// # Panics
/// If either slice is too short for `n` strided elements.
#[inline]
pub fn copy_strided<T: Copy>(n: usize, x: &[T], incx: usize, y: &mut [T], incy: usize) {
    if n == 0 {
        return;
    }
    if incx == 1 && incy == 1 {
        y[..n].copy_from_slice(&x[..n]);
        return;
    }
    for i in 0..n {
        y[i * incy] = x[i * incx];
    }
}

/// `*y.add(i*incy) += x[i*incx]` for `i` in `0..n`: the unit-`alpha` form of
/// [`axpy`] writing through a pointer, for outputs shared between workers
/// that own disjoint strided positions.
///
/// # Safety
/// `y.add(i * incy)` must be valid for reads and writes for every `i < n`, and
/// no other thread may access those positions for the duration of the call.
#[inline]
pub(crate) unsafe fn add_strided_raw<T: Real>(
    n: usize,
    x: &[T],
    incx: usize,
    y: *mut T,
    incy: usize,
) {
    for i in 0..n {
        unsafe {
            let yi = y.add(i * incy);
            yi.write(yi.read() + x[i * incx]);
        }
    }
}

#[inline]
pub(crate) fn add_assign_f64(y: &mut [f64], x: &[f64]) {
    let len = y.len().min(x.len());
    let limit4 = len & !3;
    let mut i = 0usize;
    while i < limit4 {
        let vx = unsafe {
            let q = x.as_ptr().add(i).cast::<[f64; 4]>();
            f64x4::new(core::ptr::read_unaligned(q))
        };
        let vy = unsafe {
            let q = y.as_ptr().add(i).cast::<[f64; 4]>();
            f64x4::new(core::ptr::read_unaligned(q))
        };
        let r = vy + vx;
        unsafe {
            let q = y.as_mut_ptr().add(i).cast::<[f64; 4]>();
            core::ptr::write_unaligned(q, r.to_array());
        }
        i += 4;
    }
    while i < len {
        y[i] += x[i];
        i += 1;
    }
}

#[inline]
pub(crate) fn add_assign_f32(y: &mut [f32], x: &[f32]) {
    let len = y.len().min(x.len());
    let limit8 = len & !7;
    let mut i = 0usize;
    while i < limit8 {
        let vx = unsafe {
            let q = x.as_ptr().add(i).cast::<[f32; 8]>();
            f32x8::new(core::ptr::read_unaligned(q))
        };
        let vy = unsafe {
            let q = y.as_ptr().add(i).cast::<[f32; 8]>();
            f32x8::new(core::ptr::read_unaligned(q))
        };
        let r = vy + vx;
        unsafe {
            let q = y.as_mut_ptr().add(i).cast::<[f32; 8]>();
            core::ptr::write_unaligned(q, r.to_array());
        }
        i += 8;
    }
    while i < len {
        y[i] += x[i];
        i += 1;
    }
}
