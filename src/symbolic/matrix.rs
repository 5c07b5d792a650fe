//! Exact linear algebra on matrices of expressions.
//!
//! Elimination runs over canonical rational functions, so pivots are chosen
//! by an exact zero test and no intermediate swell survives a step.

use ndarray::Array2;
use num_traits::{One, Zero};

use super::expr::Expr;
use super::rational::RationalFunction;
use super::simplify::Simplifier;
use crate::core::error::{Error, Result};

fn square_dim(matrix: &Array2<Expr>) -> Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(Error::DimensionMismatch {
            expected: rows,
            got: cols,
        });
    }
    Ok(rows)
}

fn to_rows(
    matrix: &Array2<Expr>,
    simplifier: &mut Simplifier,
) -> Result<Vec<Vec<RationalFunction>>> {
    matrix
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .map(|e| simplifier.canonical(e))
                .collect::<Result<Vec<_>>>()
        })
        .collect()
}

/// Determinant by Gaussian elimination with exact pivot tests.
pub fn determinant(matrix: &Array2<Expr>, simplifier: &mut Simplifier) -> Result<Expr> {
    let n = square_dim(matrix)?;
    let mut rows = to_rows(matrix, simplifier)?;
    let mut det = RationalFunction::one();
    for col in 0..n {
        let Some(pivot) = (col..n).find(|&r| !rows[r][col].is_zero()) else {
            return Ok(Expr::zero());
        };
        if pivot != col {
            rows.swap(pivot, col);
            det = det.neg();
        }
        let pivot_value = rows[col][col].clone();
        det = det.mul(&pivot_value);
        let pivot_inverse = pivot_value.inv()?;
        for r in col + 1..n {
            if rows[r][col].is_zero() {
                continue;
            }
            let factor = rows[r][col].mul(&pivot_inverse);
            for c in col..n {
                let update = factor.mul(&rows[col][c]);
                rows[r][c] = rows[r][c].sub(&update);
            }
        }
    }
    Ok(det.to_expr())
}

/// Inverse by Gauss-Jordan elimination.
///
/// Returns [`Error::SingularMetric`] when no nonzero pivot exists.
pub fn inverse(matrix: &Array2<Expr>, simplifier: &mut Simplifier) -> Result<Array2<Expr>> {
    let n = square_dim(matrix)?;
    let mut left = to_rows(matrix, simplifier)?;
    let mut right: Vec<Vec<RationalFunction>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        RationalFunction::one()
                    } else {
                        RationalFunction::zero()
                    }
                })
                .collect()
        })
        .collect();

    for col in 0..n {
        let pivot = (col..n)
            .find(|&r| !left[r][col].is_zero())
            .ok_or(Error::SingularMetric)?;
        left.swap(pivot, col);
        right.swap(pivot, col);

        let pivot_inverse = left[col][col].inv()?;
        for c in 0..n {
            left[col][c] = left[col][c].mul(&pivot_inverse);
            right[col][c] = right[col][c].mul(&pivot_inverse);
        }
        for r in 0..n {
            if r == col || left[r][col].is_zero() {
                continue;
            }
            let factor = left[r][col].clone();
            for c in 0..n {
                let l = factor.mul(&left[col][c]);
                left[r][c] = left[r][c].sub(&l);
                let rr = factor.mul(&right[col][c]);
                right[r][c] = right[r][c].sub(&rr);
            }
        }
    }
    Ok(Array2::from_shape_fn((n, n), |(i, j)| right[i][j].to_expr()))
}

/// Unsimplified matrix product.
pub fn matmul(a: &Array2<Expr>, b: &Array2<Expr>) -> Result<Array2<Expr>> {
    let (n, k) = a.dim();
    let (k2, m) = b.dim();
    if k != k2 {
        return Err(Error::DimensionMismatch {
            expected: k,
            got: k2,
        });
    }
    Ok(Array2::from_shape_fn((n, m), |(i, j)| {
        (0..k)
            .filter(|&l| !a[[i, l]].is_zero() && !b[[l, j]].is_zero())
            .map(|l| &a[[i, l]] * &b[[l, j]])
            .sum()
    }))
}

/// Whether `matrix` is exactly the identity.
pub fn is_identity(matrix: &Array2<Expr>, simplifier: &mut Simplifier) -> Result<bool> {
    let n = square_dim(matrix)?;
    for i in 0..n {
        for j in 0..n {
            let expected = if i == j { Expr::one() } else { Expr::zero() };
            if !simplifier.equivalent(&matrix[[i, j]], &expected)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
