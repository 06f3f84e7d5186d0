use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spmx_core::{Csc, Csr, DenseView, DenseViewMut};
use spmx_kernels::*;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Row-major matrix with roughly `density` of its entries non-zero.
fn random_dense(rng: &mut StdRng, nrows: usize, ncols: usize, density: f64) -> Vec<f64> {
    (0..nrows * ncols)
        .map(|_| {
            if rng.gen_bool(density) {
                rng.gen_range(-2.0..2.0)
            } else {
                0.0
            }
        })
        .collect()
}

fn csr_from_dense(d: &[f64], nrows: usize, ncols: usize) -> Csr<f64, i64> {
    let mut indptr = vec![0i64];
    let mut indices = Vec::new();
    let mut data = Vec::new();
    for i in 0..nrows {
        for j in 0..ncols {
            let v = d[i * ncols + j];
            if v != 0.0 {
                indices.push(j as i64);
                data.push(v);
            }
        }
        indptr.push(indices.len() as i64);
    }
    Csr::from_parts(nrows, ncols, indptr, indices, data, true).unwrap()
}

fn csc_from_dense(d: &[f64], nrows: usize, ncols: usize) -> Csc<f64, i64> {
    let mut indptr = vec![0i64];
    let mut indices = Vec::new();
    let mut data = Vec::new();
    for j in 0..ncols {
        for i in 0..nrows {
            let v = d[i * ncols + j];
            if v != 0.0 {
                indices.push(i as i64);
                data.push(v);
            }
        }
        indptr.push(indices.len() as i64);
    }
    Csc::from_parts(nrows, ncols, indptr, indices, data, true).unwrap()
}

fn transpose(d: &[f64], nrows: usize, ncols: usize) -> Vec<f64> {
    let mut t = vec![0.0; d.len()];
    for i in 0..nrows {
        for j in 0..ncols {
            t[j * nrows + i] = d[i * ncols + j];
        }
    }
    t
}

/// Triple-loop reference, all row-major.
fn naive(a: &[f64], m: usize, k: usize, b: &[f64], n: usize) -> Vec<f64> {
    let mut c = vec![0.0; m * n];
    for i in 0..m {
        for p in 0..k {
            for j in 0..n {
                c[i * n + j] += a[i * k + p] * b[p * n + j];
            }
        }
    }
    c
}

fn assert_close(got: &[f64], want: &[f64], eps: f64) {
    assert_eq!(got.len(), want.len());
    for (g, w) in got.iter().zip(want) {
        assert_abs_diff_eq!(*g, *w, epsilon = eps);
    }
}

fn simple_csr() -> Csr<f64, i64> {
    // A = [[1,0,2],[0,3,0]]
    Csr::from_parts(2, 3, vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0], true).unwrap()
}

#[test]
fn test_spmm() {
    let a = simple_csr();
    // B row-major (3x2): [[1,2],[3,4],[5,6]]
    let b = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let y = spmm_csr_dense(a.view(), 3, &b, 2, &Parallelism::default()).unwrap();
    assert_eq!(y.len(), 2 * 2);
    assert!(approx_eq(y[0], 11.0) && approx_eq(y[1], 14.0));
    assert!(approx_eq(y[2], 9.0) && approx_eq(y[3], 12.0));
}

#[test]
fn test_identity_keeps_the_sparse_pattern() {
    let a = Csr::from_parts(3, 3, vec![0, 2, 2, 3], vec![0, 1, 2], vec![1.0, 2.0, 3.0], true)
        .unwrap();
    let eye = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    let mut out = vec![0.0; 9];
    matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&eye, 3, 3).into(),
        DenseViewMut::row_major(&mut out, 3, 3),
        &Parallelism::new(2),
    )
    .unwrap();
    assert_eq!(out, vec![1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0]);
}

#[test]
fn test_row_major_output_accumulates() {
    let a = simple_csr();
    let b = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let mut out = vec![1.0; 4];
    matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b, 3, 2).into(),
        DenseViewMut::row_major(&mut out, 2, 2),
        &Parallelism::sequential(),
    )
    .unwrap();
    assert_eq!(out, vec![12.0, 15.0, 10.0, 13.0]);
}

#[test]
fn test_dense_times_sparse_adds_into_prefilled_output() {
    // X = I2 column-major, Y = CSR [[1,0],[0,0]]; X . t(Y) = [[1,0],[0,0]].
    let eye = [1.0, 0.0, 0.0, 1.0];
    let y = Csr::from_parts(2, 2, vec![0, 1, 1], vec![0], vec![1.0], true).unwrap();
    for col_major in [false, true] {
        let mut out = vec![10.0; 4];
        let view = if col_major {
            DenseViewMut::col_major(&mut out, 2, 2)
        } else {
            DenseViewMut::row_major(&mut out, 2, 2)
        };
        tcrossprod(
            DenseView::col_major(&eye, 2, 2).into(),
            SparseOperand::from(&y).into(),
            view,
            &Parallelism::new(2),
        )
        .unwrap();
        assert_eq!(out, vec![11.0, 10.0, 10.0, 10.0]);
    }
}

#[test]
fn test_column_major_output_accumulates() {
    let a = simple_csr();
    let b = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let mut out = vec![1.0; 4];
    matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b, 3, 2).into(),
        DenseViewMut::col_major(&mut out, 2, 2),
        &Parallelism::new(2),
    )
    .unwrap();
    // [[11,14],[9,12]] + 1, stored column by column.
    assert_eq!(out, vec![12.0, 10.0, 15.0, 13.0]);
}

#[test]
fn test_csr_dense_matches_reference_both_layouts() {
    let mut rng = StdRng::seed_from_u64(7);
    let (m, k, n) = (23, 17, 9);
    let ad = random_dense(&mut rng, m, k, 0.2);
    let b = random_dense(&mut rng, k, n, 1.0);
    let a = csr_from_dense(&ad, m, k);
    let want = naive(&ad, m, k, &b, n);
    let par = Parallelism::new(3);

    let mut rm = vec![0.0; m * n];
    matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b, k, n).into(),
        DenseViewMut::row_major(&mut rm, m, n),
        &par,
    )
    .unwrap();
    assert_close(&rm, &want, 1e-12);

    let mut cm = vec![0.0; m * n];
    matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b, k, n).into(),
        DenseViewMut::col_major(&mut cm, m, n),
        &par,
    )
    .unwrap();
    assert_close(&transpose(&cm, n, m), &want, 1e-12);
}

#[test]
fn test_f32_matches_reference() {
    let mut rng = StdRng::seed_from_u64(11);
    let (m, k, n) = (15, 12, 10);
    let ad = random_dense(&mut rng, m, k, 0.3);
    let b = random_dense(&mut rng, k, n, 1.0);
    let a = csr_from_dense(&ad, m, k);
    let want = naive(&ad, m, k, &b, n);
    let b32: Vec<f32> = b.iter().map(|&v| v as f32).collect();

    let y = spmm_csr_dense(a.view(), k, &b32, n, &Parallelism::new(4)).unwrap();
    let y64: Vec<f64> = y.iter().map(|&v| f64::from(v)).collect();
    assert_close(&y64, &want, 1e-4);

    let mut cm = vec![0.0f32; m * n];
    matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b32, k, n).into(),
        DenseViewMut::col_major(&mut cm, m, n),
        &Parallelism::new(4),
    )
    .unwrap();
    let cm64: Vec<f64> = cm.iter().map(|&v| f64::from(v)).collect();
    assert_close(&transpose(&cm64, n, m), &want, 1e-4);
}

#[test]
fn test_matmul_equals_tcrossprod_of_transposed_buffer() {
    let mut rng = StdRng::seed_from_u64(3);
    let (m, k, n) = (20, 14, 6);
    let ad = random_dense(&mut rng, m, k, 0.25);
    let b = random_dense(&mut rng, k, n, 1.0);
    let a = csr_from_dense(&ad, m, k);
    let par = Parallelism::new(2);

    let mut lhs = vec![0.0; m * n];
    matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b, k, n).into(),
        DenseViewMut::row_major(&mut lhs, m, n),
        &par,
    )
    .unwrap();

    // The same buffer read column-major is t(B), n x k.
    let mut rhs = vec![0.0; m * n];
    tcrossprod(
        SparseOperand::from(&a).into(),
        DenseView::col_major(&b, n, k).into(),
        DenseViewMut::row_major(&mut rhs, m, n),
        &par,
    )
    .unwrap();
    assert_eq!(lhs, rhs);
}

#[test]
fn test_crossprod_with_csc() {
    let mut rng = StdRng::seed_from_u64(5);
    let (k, m, n) = (16, 11, 7);
    let ad = random_dense(&mut rng, k, m, 0.3);
    let b = random_dense(&mut rng, k, n, 1.0);
    let a = csc_from_dense(&ad, k, m);
    let want = naive(&transpose(&ad, k, m), m, k, &b, n);

    for out_col_major in [false, true] {
        let mut out = vec![0.0; m * n];
        let view = if out_col_major {
            DenseViewMut::col_major(&mut out, m, n)
        } else {
            DenseViewMut::row_major(&mut out, m, n)
        };
        crossprod(
            SparseOperand::from(&a).into(),
            DenseView::row_major(&b, k, n).into(),
            view,
            &Parallelism::new(3),
        )
        .unwrap();
        let got = if out_col_major { transpose(&out, n, m) } else { out };
        assert_close(&got, &want, 1e-12);
    }
}

#[test]
fn test_dense_times_sparse_forms() {
    let mut rng = StdRng::seed_from_u64(9);
    let (n, k, m) = (8, 13, 19);
    let xd = random_dense(&mut rng, n, k, 1.0);
    let x_cm = transpose(&xd, n, k);
    let x = DenseView::col_major(&x_cm, n, k);
    let par = Parallelism::new(4);

    // X . Y with Y CSC (k x m)
    let yd = random_dense(&mut rng, k, m, 0.2);
    let y = csc_from_dense(&yd, k, m);
    let got = matmul_dense_csc(x, &y, &par).unwrap();
    assert_close(&transpose(&got, m, n), &naive(&xd, n, k, &yd, m), 1e-12);

    // X . t(Y) with Y CSR (m x k)
    let yd = random_dense(&mut rng, m, k, 0.2);
    let y = csr_from_dense(&yd, m, k);
    let got = tcrossprod_dense_csr(x, &y, &par).unwrap();
    let want = naive(&xd, n, k, &transpose(&yd, m, k), m);
    assert_close(&transpose(&got, m, n), &want, 1e-12);

    // Y . t(X) with Y CSR (m x k), X column-major
    let got = tcrossprod_csr_dense(&y, x, &par).unwrap();
    let want = naive(&yd, m, k, &transpose(&xd, n, k), n);
    assert_close(&transpose(&got, n, m), &want, 1e-12);
}

#[test]
fn test_thread_count_does_not_change_bits() {
    let mut rng = StdRng::seed_from_u64(42);
    let (m, k, n) = (200, 60, 33);
    let ad = random_dense(&mut rng, m, k, 0.15);
    let b = random_dense(&mut rng, k, n, 1.0);
    let a = csr_from_dense(&ad, m, k);

    let run = |threads: usize, col_major: bool| {
        let mut out = vec![0.0f64; m * n];
        let view = if col_major {
            DenseViewMut::col_major(&mut out, m, n)
        } else {
            DenseViewMut::row_major(&mut out, m, n)
        };
        matmul(
            SparseOperand::from(&a).into(),
            DenseView::row_major(&b, k, n).into(),
            view,
            &Parallelism::new(threads),
        )
        .unwrap();
        out.iter().map(|v| v.to_bits()).collect::<Vec<u64>>()
    };
    for col_major in [false, true] {
        let one = run(1, col_major);
        assert_eq!(one, run(4, col_major));
        assert_eq!(one, run(7, col_major));
    }
}

#[test]
fn test_empty_sparse_gives_zero_output() {
    let a = Csr::zeros(4, 3);
    let b = vec![1.0; 3 * 2];
    let y = spmm_csr_dense(a.view(), 3, &b, 2, &Parallelism::new(4)).unwrap();
    assert_eq!(y, vec![0.0; 8]);

    let mut cm = vec![0.0; 8];
    matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b, 3, 2).into(),
        DenseViewMut::col_major(&mut cm, 4, 2),
        &Parallelism::new(4),
    )
    .unwrap();
    assert_eq!(cm, vec![0.0; 8]);

    let none = Csr::zeros(0, 3);
    let y = spmm_csr_dense(none.view(), 3, &b, 2, &Parallelism::new(4)).unwrap();
    assert!(y.is_empty());
}

#[test]
fn test_unsupported_orientations_are_rejected() {
    let a = simple_csr();
    let b = vec![1.0; 6];
    let mut out = vec![0.0; 4];

    // CSR read as t(A) would need a conversion to CSC.
    let err = crossprod(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b, 2, 3).into(),
        DenseViewMut::row_major(&mut vec![0.0; 9], 3, 3),
        &Parallelism::sequential(),
    )
    .unwrap_err();
    assert!(matches!(err, KernelError::UnsupportedOrientation(_)));

    // Column-major B is not readable row-wise without a copy.
    let err = matmul(
        SparseOperand::from(&a).into(),
        DenseView::col_major(&b, 3, 2).into(),
        DenseViewMut::row_major(&mut out, 2, 2),
        &Parallelism::sequential(),
    )
    .unwrap_err();
    assert!(matches!(err, KernelError::UnsupportedOrientation(_)));

    let err = matmul::<f64>(
        DenseView::row_major(&b, 2, 3).into(),
        DenseView::row_major(&b, 3, 2).into(),
        DenseViewMut::row_major(&mut out, 2, 2),
        &Parallelism::sequential(),
    )
    .unwrap_err();
    assert!(matches!(err, KernelError::UnsupportedOrientation(_)));
}

#[test]
fn test_shape_mismatch() {
    let a = simple_csr();
    let b = vec![1.0; 4];
    let mut out = vec![0.0; 4];
    let err = matmul(
        SparseOperand::from(&a).into(),
        DenseView::row_major(&b, 2, 2).into(),
        DenseViewMut::row_major(&mut out, 2, 2),
        &Parallelism::sequential(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        KernelError::ShapeMismatch { lhs: (2, 3), rhs: (2, 2), .. }
    ));
}
