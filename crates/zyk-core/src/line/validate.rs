//! Invariant checks shared by every line construction path.
//!
//! A line parameter pair is physically meaningful only when the impedance
//! and shunt admittance matrices are square, of equal order, passive (no
//! negative real parts) and carry purely reactive coupling (off-diagonal
//! real parts within floating tolerance of zero). These checks run before
//! any matrix is wrapped into a value object; a violation is a hard
//! construction failure, never a silent clamp.

use crate::error::{ZykError, ZykResult};
use crate::matrix::SquareMatrix;

/// Absolute tolerance for the off-diagonal real-part check.
const REAL_ATOL: f64 = 1e-8;

/// Validate a line impedance / shunt admittance pair.
///
/// Checks run in order and stop at the first failure:
///
/// 1. the impedance matrix is square of order 3 or 4;
/// 2. the shunt admittance matrix, when present, has the same order;
/// 3. off-diagonal entries of each matrix have a real part within tolerance
///    of zero;
/// 4. every real part is non-negative.
///
/// Error messages name the failing matrix (`line impedance` or
/// `shunt admittance`) and the owning identifier. Validation is a pure
/// function: re-validating an already valid pair always succeeds.
pub fn check_line_matrices(
    id: &str,
    z_line: &SquareMatrix,
    y_shunt: Option<&SquareMatrix>,
) -> ZykResult<()> {
    let order = z_line.order();
    if order != 3 && order != 4 {
        return Err(ZykError::Shape(format!(
            "line {id:?}: the line impedance matrix must have order 3 or 4, got {order}"
        )));
    }
    if let Some(y) = y_shunt {
        if y.order() != order {
            return Err(ZykError::Shape(format!(
                "line {id:?}: the shunt admittance matrix has order {} but the line impedance \
                 matrix has order {order}",
                y.order()
            )));
        }
    }

    let named = [
        (Some(z_line), "line impedance"),
        (y_shunt, "shunt admittance"),
    ];

    for (matrix, name) in named {
        let Some(matrix) = matrix else { continue };
        for (i, j, value) in matrix.entries() {
            if i != j && value.re.abs() > REAL_ATOL {
                return Err(ZykError::Physical(format!(
                    "line {id:?}: the {name} matrix has an off-diagonal entry ({i}, {j}) with a \
                     non-zero real part {:.3e}",
                    value.re
                )));
            }
        }
    }

    for (matrix, name) in named {
        let Some(matrix) = matrix else { continue };
        for (i, j, value) in matrix.entries() {
            if value.re < 0.0 && (i == j || value.re.abs() > REAL_ATOL) {
                return Err(ZykError::Physical(format!(
                    "line {id:?}: the {name} matrix has an entry ({i}, {j}) with a negative real \
                     part {:.3e}",
                    value.re
                )));
            }
        }
    }

    Ok(())
}
