//! Dense linear algebra for the model fit — just enough to solve the
//! ridge-regularized normal equations.

/// Row-major square matrix view over a flat buffer.
#[inline]
fn at(a: &[f64], n: usize, row: usize, col: usize) -> f64 {
    a[row * n + col]
}

/// Solve `A x = b` for symmetric positive-definite `A` via Cholesky.
///
/// `a` is row-major `n x n`. Returns `None` when the decomposition breaks
/// down (matrix not positive definite within tolerance).
pub fn solve_spd(a: &[f64], b: &[f64], n: usize) -> Option<Vec<f64>> {
    debug_assert_eq!(a.len(), n * n);
    debug_assert_eq!(b.len(), n);

    // Lower-triangular factor L with A = L L^T.
    let mut l = vec![0.0f64; n * n];
    for j in 0..n {
        let mut diag = at(a, n, j, j);
        for k in 0..j {
            diag -= l[j * n + k] * l[j * n + k];
        }
        if !(diag > 1e-12) {
            return None;
        }
        let diag_sqrt = diag.sqrt();
        l[j * n + j] = diag_sqrt;

        for i in (j + 1)..n {
            let mut sum = at(a, n, i, j);
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            l[i * n + j] = sum / diag_sqrt;
        }
    }

    // Forward substitution: L y = b.
    let mut y = vec![0.0f64; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[i * n + k] * y[k];
        }
        y[i] = sum / l[i * n + i];
    }

    // Back substitution: L^T x = y.
    let mut x = vec![0.0f64; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[k * n + i] * x[k];
        }
        x[i] = sum / l[i * n + i];
    }

    Some(x)
}

/// Build the normal equations `(X^T X + diag(ridge)) β = X^T y` and solve.
///
/// `rows` is the design matrix row by row; `ridge` holds one penalty per
/// column. Returns `None` when the system is not solvable.
pub fn ridge_least_squares(
    rows: &[Vec<f64>],
    y: &[f64],
    ridge: &[f64],
) -> Option<Vec<f64>> {
    let n_rows = rows.len();
    if n_rows == 0 || n_rows != y.len() {
        return None;
    }
    let n_cols = rows[0].len();
    debug_assert!(rows.iter().all(|r| r.len() == n_cols));
    debug_assert_eq!(ridge.len(), n_cols);

    // X^T X (symmetric — fill both halves)
    let mut xtx = vec![0.0f64; n_cols * n_cols];
    for row in rows {
        for i in 0..n_cols {
            let ri = row[i];
            if ri == 0.0 {
                continue;
            }
            for j in i..n_cols {
                xtx[i * n_cols + j] += ri * row[j];
            }
        }
    }
    for i in 0..n_cols {
        xtx[i * n_cols + i] += ridge[i];
        for j in (i + 1)..n_cols {
            xtx[j * n_cols + i] = xtx[i * n_cols + j];
        }
    }

    // X^T y
    let mut xty = vec![0.0f64; n_cols];
    for (row, &yv) in rows.iter().zip(y) {
        for i in 0..n_cols {
            xty[i] += row[i] * yv;
        }
    }

    solve_spd(&xtx, &xty, n_cols)
}
