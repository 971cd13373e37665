//! Bicubic B-spline interpolation over a regular grid.
//!
//! The interpolant passes exactly through every grid sample and uses natural
//! end conditions (zero second derivative at the first and last sample of each
//! axis). Outside the sampled index range the boundary polynomial piece is
//! extended, so queries slightly past a tile edge extrapolate smoothly instead
//! of failing. Treat those extrapolated values as approximate.

/// Tensor-product cubic spline fitted to a `rows x cols` grid.
///
/// Coefficients are stored with one extra control point on each side of each
/// axis, giving a `(rows + 2) x (cols + 2)` array in row-major order.
#[derive(Debug, Clone)]
pub struct BicubicSpline {
    rows: usize,
    cols: usize,
    coeffs: Vec<f32>,
}

impl BicubicSpline {
    /// Fit a spline to row-major `values`.
    ///
    /// Callers guarantee `rows >= 2`, `cols >= 2` and `values.len() == rows * cols`.
    pub(crate) fn fit(values: &[f32], rows: usize, cols: usize) -> Self {
        debug_assert!(rows >= 2 && cols >= 2);
        debug_assert_eq!(values.len(), rows * cols);

        let stride = cols + 2;

        // Pass 1: solve along the column axis for every row.
        let mut along_cols = vec![0.0f64; rows * stride];
        let mut line = vec![0.0f64; cols];
        for r in 0..rows {
            for (c, v) in line.iter_mut().enumerate() {
                *v = values[r * cols + c] as f64;
            }
            solve_axis(&line, &mut along_cols[r * stride..(r + 1) * stride]);
        }

        // Pass 2: solve along the row axis for every coefficient column.
        let mut coeffs = vec![0.0f32; (rows + 2) * stride];
        let mut column = vec![0.0f64; rows];
        let mut solved = vec![0.0f64; rows + 2];
        for k in 0..stride {
            for (r, v) in column.iter_mut().enumerate() {
                *v = along_cols[r * stride + k];
            }
            solve_axis(&column, &mut solved);
            for (r, v) in solved.iter().enumerate() {
                coeffs[r * stride + k] = *v as f32;
            }
        }

        Self { rows, cols, coeffs }
    }

    /// Evaluate the spline at a fractional `(row, col)` grid position.
    pub fn evaluate(&self, row: f64, col: f64) -> f64 {
        let (i, wr) = basis(row, self.rows);
        let (j, wc) = basis(col, self.cols);
        let stride = self.cols + 2;

        let mut value = 0.0;
        for (a, wa) in wr.iter().enumerate() {
            let base = (i + a) * stride + j;
            let mut acc = 0.0;
            for (b, wb) in wc.iter().enumerate() {
                acc += self.coeffs[base + b] as f64 * wb;
            }
            value += acc * wa;
        }
        value
    }

    /// Grid shape the spline was fitted to.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Locate the polynomial piece for `x` and return its first control point
/// index (in padded storage) together with the four basis weights.
fn basis(x: f64, n: usize) -> (usize, [f64; 4]) {
    let last_piece = (n - 2) as f64;
    let piece = x.floor().clamp(0.0, last_piece);
    let t = if x.is_nan() { 0.0 } else { x - piece };

    let t2 = t * t;
    let t3 = t2 * t;
    let u = 1.0 - t;
    let weights = [
        u * u * u / 6.0,
        (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0,
        (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0,
        t3 / 6.0,
    ];

    // Logical control point `piece - 1` lives at padded index `piece`.
    (piece as usize, weights)
}

/// Solve the 1-D natural cubic B-spline interpolation problem.
///
/// `out` receives `f.len() + 2` control points; `out[l + 1]` is logical
/// control point `l` for `l` in `-1..=n`.
fn solve_axis(f: &[f64], out: &mut [f64]) {
    let n = f.len();
    debug_assert!(n >= 2);
    debug_assert_eq!(out.len(), n + 2);

    // Natural end conditions pin the end control points to the samples.
    out[1] = f[0];
    out[n] = f[n - 1];

    // Interior: c[j-1] + 4 c[j] + c[j+1] = 6 f[j] for j in 1..n-1 (Thomas algorithm).
    let m = n - 2;
    if m > 0 {
        let mut cp = vec![0.0f64; m];
        let mut dp = vec![0.0f64; m];
        for k in 0..m {
            let j = k + 1;
            let mut rhs = 6.0 * f[j];
            if k == 0 {
                rhs -= f[0];
            }
            if k == m - 1 {
                rhs -= f[n - 1];
            }
            if k == 0 {
                cp[0] = 0.25;
                dp[0] = rhs / 4.0;
            } else {
                let denom = 4.0 - cp[k - 1];
                cp[k] = 1.0 / denom;
                dp[k] = (rhs - dp[k - 1]) / denom;
            }
        }
        out[m + 1] = dp[m - 1];
        for k in (0..m - 1).rev() {
            out[k + 2] = dp[k] - cp[k] * out[k + 3];
        }
    }

    out[0] = 2.0 * out[1] - out[2];
    out[n + 1] = 2.0 * out[n] - out[n - 1];
}
