use sharemat::kernel::{Naive, Strided};
use sharemat::{Matrix, MatrixError};

const TOL: f64 = 1e-10;

fn assert_near(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
    assert_eq!((a.nrows(), a.ncols()), (b.nrows(), b.ncols()), "shape");
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            assert!(
                (a.get(i, j) - b.get(i, j)).abs() < tol,
                "({}, {}): {} vs {}",
                i,
                j,
                a.get(i, j),
                b.get(i, j)
            );
        }
    }
}

// ── Views and sharing ───────────────────────────────────────────────

#[test]
fn transpose_times_identity() {
    let m = Matrix::<f64>::new(3, 3);
    m.set(0, 0, 1.0);
    m.set(1, 1, 2.0);
    m.set(2, 2, 3.0);
    m.set(0, 1, 4.0);

    let r = m.transpose() * Matrix::eye(3);
    let expected = Matrix::from_rows(3, 3, &[1.0, 0.0, 0.0, 4.0, 2.0, 0.0, 0.0, 0.0, 3.0]);
    assert_eq!(r, expected);
    assert!(!r.is_view());
    assert_eq!(format!("{:.0}", r), "{\n{1,0,0},\n{4,2,0},\n{0,0,3}\n}");
}

#[test]
fn partial_view_aliases_until_copied() {
    let parent = Matrix::from_fn(4, 4, |i, j| (i * 4 + j) as f64);
    let block = parent.partial(2, 2, 1, 2).unwrap();
    block.set(1, 0, -1.0);
    assert_eq!(parent.get(2, 2), -1.0);

    let detached = block.copy();
    detached.set(0, 0, 99.0);
    assert_eq!(parent.get(1, 2), 6.0);
    assert_eq!(block.get(0, 0), 6.0);
}

#[test]
fn shallow_copies_share_and_release() {
    let a = Matrix::from_rows(2, 2, &[1, 2, 3, 4]);
    let root = a.storage().root().buffer().clone();
    assert_eq!(root.ref_count(), 2);
    {
        let b = a.clone();
        let t = b.transpose();
        let p = t.partial(1, 1, 1, 0).unwrap();
        assert_eq!(root.ref_count(), 5);
        p.set(0, 0, 20);
        assert_eq!(a.get(0, 1), 20);
    }
    assert_eq!(root.ref_count(), 2);
    drop(a);
    assert_eq!(root.ref_count(), 1);
}

#[test]
fn rebind_versus_assign_from() {
    let target = Matrix::<i32>::new(2, 2);
    let source = Matrix::from_rows(2, 2, &[1, 2, 3, 4]);

    // Re-pointing a handle leaves the old elements alone.
    let mut handle = target.clone();
    handle.rebind(&source);
    assert!(handle.shares_buffer_with(&source));
    assert_eq!(target.to_vec(), [0, 0, 0, 0]);

    // Assigning into a view writes the aliased region.
    target.transpose().assign_from(&source);
    assert_eq!(target.to_vec(), [1, 3, 2, 4]);
    assert!(!target.shares_buffer_with(&source));
}

#[test]
fn nested_views_resolve_to_root() {
    let m = Matrix::from_fn(3, 4, |i, j| (10 * i + j) as i32);
    let v = m.transpose().partial(2, 2, 1, 1).unwrap().transpose();
    // v(r, c) = p(c, r) = t(1 + c, 1 + r) = m(1 + r, 1 + c)
    assert_eq!(v.to_vec(), [11, 12, 21, 22]);
    v.set(1, 1, 0);
    assert_eq!(m.get(2, 2), 0);
    assert!(v.shares_buffer_with(&m));
}

// ── Mutators ────────────────────────────────────────────────────────

#[test]
fn exchange_rows_mutates_same_instance() {
    let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let returned = m.exchange_rows(0, 1).unwrap();
    assert!(returned.shares_buffer_with(&m));
    assert_eq!(m, Matrix::from_rows(2, 2, &[3.0, 4.0, 1.0, 2.0]));
}

#[test]
fn pivot_merge_places_single_element() {
    let m = Matrix::<f64>::new(3, 3);
    m.pivot_merge(1, 1, &Matrix::from_rows(1, 1, &[10.0]));
    let mut expected = [0.0; 9];
    expected[4] = 10.0;
    assert_eq!(m.to_vec(), expected);
}

// ── Algorithms ──────────────────────────────────────────────────────

#[test]
fn lu_reconstructs() {
    let a = Matrix::from_rows(2, 2, &[4.0, 3.0, 6.0, 3.0]);
    let lu = a.lu().unwrap();
    assert_near(&(lu.l() * lu.u()), &a, TOL);

    let packed = a.decompose_lu().unwrap();
    let l = packed.partial(2, 2, 0, 0).unwrap();
    let u = packed.partial(2, 2, 0, 2).unwrap();
    assert_near(&(&l * &u), &a, TOL);
}

#[test]
fn ud_reconstructs() {
    let a = Matrix::from_rows(3, 3, &[4.0, 2.0, 0.6, 2.0, 3.0, 0.4, 0.6, 0.4, 2.0]);
    let ud = a.ud().unwrap();
    let back = ud.u() * ud.d() * ud.u().transpose();
    assert_near(&back, &a, TOL);
}

#[test]
fn determinants() {
    assert_eq!(Matrix::from_rows(1, 1, &[3.5]).determinant(), Ok(3.5));
    let (a, b, c, d) = (1.5, -2.0, 4.0, 0.5);
    let m = Matrix::from_rows(2, 2, &[a, b, c, d]);
    assert_eq!(m.determinant(), Ok(a * d - b * c));
}

#[test]
fn inverse_round_trip() {
    let a = Matrix::from_rows(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 0.0, 3.0, 0.0, 1.0]);
    let inv = a.inverse().unwrap();
    assert_near(&(&a * &inv), &Matrix::eye(3), TOL);
    assert_near(&inv.inverse().unwrap(), &a, TOL);
    assert_near(&(&a / &a), &Matrix::eye(3), TOL);
}

#[test]
fn errors_instead_of_garbage() {
    let singular = Matrix::from_rows(2, 2, &[2.0, 4.0, 1.0, 2.0]);
    assert_eq!(singular.inverse().unwrap_err(), MatrixError::Singular);
    assert_eq!(singular.decompose_lu().unwrap_err(), MatrixError::Singular);

    // Rank one up to the rounding of the literals.
    let nearly = Matrix::from_rows(2, 2, &[0.1_f64, 0.7, 0.3, 2.1]);
    assert_eq!(nearly.inverse().unwrap_err(), MatrixError::Singular);
    assert_eq!(nearly.lu().unwrap_err(), MatrixError::Singular);

    let rect = Matrix::<f64>::new(2, 3);
    assert!(matches!(rect.trace(), Err(MatrixError::NotSquare { .. })));
    assert!(matches!(rect.inverse(), Err(MatrixError::NotSquare { .. })));
    assert!(matches!(
        rect.checked_add(&Matrix::<f64>::new(3, 2)),
        Err(MatrixError::DimensionMismatch { op: "+", .. })
    ));
    assert!(matches!(
        rect.partial(2, 2, 0, 2),
        Err(MatrixError::OutOfBounds { .. })
    ));
}

#[test]
#[should_panic(expected = "dimension mismatch: 2x3 * 2x3")]
fn operator_panics_with_error_message() {
    let a = Matrix::<f64>::new(2, 3);
    let _ = &a * &a;
}

// ── Kernels and layouts ─────────────────────────────────────────────

#[test]
fn kernels_agree_on_views_and_aligned_buffers() {
    let data: Vec<f64> = (0..15).map(|x| (x as f64 * 0.7).sin()).collect();
    let compact = Matrix::from_rows(3, 5, &data);
    let aligned = Matrix::from_rows_aligned(3, 5, &data);
    assert_eq!(compact, aligned);

    let expected = &compact * &compact.transpose();
    for lhs in [&compact, &aligned] {
        let naive = lhs.mul_with(&lhs.transpose(), &Naive).unwrap();
        let strided = lhs.mul_with(&lhs.transpose(), &Strided).unwrap();
        assert_near(&naive, &expected, TOL);
        assert_near(&strided, &expected, TOL);
    }
}

#[test]
fn inspect_into_small_buffer() {
    let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let mut buf = [0u8; 16];
    let dump = m.inspect(&mut buf);
    assert!(dump.is_truncated());
    assert_eq!(dump.written, 16);
    assert_eq!(&buf[..], &format!("{}", m).as_bytes()[..16]);
}
