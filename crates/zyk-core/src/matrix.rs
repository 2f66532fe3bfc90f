//! Small dense matrices for per-branch parameter algebra.
//!
//! Branch matrices are at most 4×4 (three phases plus neutral), so everything
//! here uses dense row-major storage. Two numeric kernels live in this
//! module:
//!
//! - a complex determinant by partial-pivot Gaussian elimination, used to
//!   detect degenerate sequence data;
//! - a real LU inversion backed by faer, used to invert the potential
//!   (elastance) coefficient matrix of the geometric line model.
//!
//! Complex matrices serialize as a `[real_rows, imag_rows]` pair of plain
//! `f64` matrices, the stable wire shape consumed by the solver side.

use anyhow::{anyhow, Result};
use faer::{prelude::*, solvers::PartialPivLu, Mat};
use num_complex::Complex64;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ZykError, ZykResult};

/// Dense complex square matrix in row-major order.
///
/// Element (i, j) is at index `i * order + j`, the same layout the admittance
/// matrices of the solver side use.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    order: usize,
    data: Vec<Complex64>,
}

impl SquareMatrix {
    /// All-zero matrix of the given order.
    pub fn zeros(order: usize) -> Self {
        Self {
            order,
            data: vec![Complex64::new(0.0, 0.0); order * order],
        }
    }

    /// Build from explicit rows; every row must have `rows.len()` entries.
    pub fn from_rows(rows: &[Vec<Complex64>]) -> ZykResult<Self> {
        let order = rows.len();
        if rows.iter().any(|row| row.len() != order) {
            return Err(ZykError::Shape(format!(
                "expected a square matrix, got {} rows of unequal length",
                order
            )));
        }
        let mut matrix = Self::zeros(order);
        for (i, row) in rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                *matrix.get_mut(i, j) = *value;
            }
        }
        Ok(matrix)
    }

    /// Matrix order (3 for phase-only, 4 for phases + neutral).
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Element at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.order + col]
    }

    /// Mutable reference to element at (row, col).
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut Complex64 {
        &mut self.data[row * self.order + col]
    }

    /// Multiply every entry in place.
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.data {
            *value *= factor;
        }
    }

    /// Iterate over all entries with their (row, col) position.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        let order = self.order;
        self.data
            .iter()
            .enumerate()
            .map(move |(idx, value)| (idx / order, idx % order, *value))
    }

    /// Determinant by partial-pivot Gaussian elimination.
    ///
    /// Stable for the well- and ill-conditioned 3×3/4×4 matrices this crate
    /// produces; an exactly rank-deficient matrix returns 0.
    pub fn det(&self) -> Complex64 {
        let n = self.order;
        let mut a = self.data.clone();
        let mut det = Complex64::new(1.0, 0.0);

        for i in 0..n {
            let mut pivot = i;
            for row in i + 1..n {
                if a[row * n + i].norm() > a[pivot * n + i].norm() {
                    pivot = row;
                }
            }
            if a[pivot * n + i].norm() == 0.0 {
                return Complex64::new(0.0, 0.0);
            }
            if pivot != i {
                for col in 0..n {
                    a.swap(i * n + col, pivot * n + col);
                }
                det = -det;
            }

            let diag = a[i * n + i];
            det *= diag;

            for row in i + 1..n {
                let factor = a[row * n + i] / diag;
                for col in i..n {
                    let pivot_value = a[i * n + col];
                    a[row * n + col] -= factor * pivot_value;
                }
            }
        }

        det
    }

    /// Entry-wise comparison within an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.order == other.order
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// Split into (real, imaginary) row matrices for serialization.
    pub fn to_parts(&self) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let mut re = Vec::with_capacity(self.order);
        let mut im = Vec::with_capacity(self.order);
        for i in 0..self.order {
            let row = &self.data[i * self.order..(i + 1) * self.order];
            re.push(row.iter().map(|v| v.re).collect());
            im.push(row.iter().map(|v| v.im).collect());
        }
        (re, im)
    }

    /// Rebuild from (real, imaginary) row matrices.
    pub fn from_parts(re: &[Vec<f64>], im: &[Vec<f64>]) -> ZykResult<Self> {
        let order = re.len();
        if im.len() != order {
            return Err(ZykError::Shape(format!(
                "real part has {} rows but imaginary part has {}",
                order,
                im.len()
            )));
        }
        let square = |rows: &[Vec<f64>]| rows.iter().all(|row| row.len() == order);
        if !square(re) || !square(im) {
            return Err(ZykError::Shape(
                "matrix parts must be square and of equal order".into(),
            ));
        }
        let mut matrix = Self::zeros(order);
        for i in 0..order {
            for j in 0..order {
                *matrix.get_mut(i, j) = Complex64::new(re[i][j], im[i][j]);
            }
        }
        Ok(matrix)
    }
}

impl Serialize for SquareMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_parts().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SquareMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (re, im): (Vec<Vec<f64>>, Vec<Vec<f64>>) = Deserialize::deserialize(deserializer)?;
        SquareMatrix::from_parts(&re, &im).map_err(D::Error::custom)
    }
}

/// Invert a real square matrix via faer's partial-pivot LU decomposition.
///
/// Used for the 4×4 elastance matrix of the geometric line model. A singular
/// or non-finite input is reported as an error rather than propagating NaN
/// into the capacitance matrix.
pub(crate) fn invert_real(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = matrix.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if matrix.iter().any(|row| row.len() != n) {
        return Err(anyhow!("matrix must be square"));
    }

    let mat = Mat::from_fn(n, n, |i, j| matrix[i][j]);
    let eye = Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 });
    let lu = PartialPivLu::new(mat.as_ref());
    let inv = lu.solve(&eye);

    let mut out = vec![vec![0.0; n]; n];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = inv.read(i, j);
            if !value.is_finite() {
                return Err(anyhow!("singular matrix"));
            }
        }
    }
    Ok(out)
}
