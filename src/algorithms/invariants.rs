//! Scalar curvature invariants.

use ndarray::Array4;
use num_traits::Zero;
use tracing::debug;

use crate::core::error::{Error, Result};
use crate::symbolic::{Expr, Simplifier, SimplifyBudget};

/// Kretschmann scalar K = Σ R_abcd · R^abcd, simplified.
///
/// `riemann_cov` is the all-lower tensor, `riemann_cont` the all-upper one;
/// they must have the same shape.
pub fn kretschmann_scalar(
    riemann_cov: &Array4<Expr>,
    riemann_cont: &Array4<Expr>,
    budget: &SimplifyBudget,
) -> Result<Expr> {
    if riemann_cov.shape() != riemann_cont.shape() {
        let position = riemann_cov
            .shape()
            .iter()
            .zip(riemann_cont.shape())
            .position(|(a, b)| a != b)
            .unwrap_or(0);
        return Err(Error::DimensionMismatch {
            expected: riemann_cov.shape()[position],
            got: riemann_cont.shape()[position],
        });
    }

    let terms: Vec<Expr> = riemann_cov
        .iter()
        .zip(riemann_cont.iter())
        .filter(|(lower, upper)| !lower.is_zero() && !upper.is_zero())
        .map(|(lower, upper)| lower * upper)
        .collect();
    debug!(terms = terms.len(), "kretschmann contraction");

    let mut simplifier = Simplifier::new(budget.clone());
    simplifier.simplify(&Expr::add_all(terms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contraction_pairs_components() {
        let x = Expr::var("x");
        let lower = Array4::from_shape_fn((2, 2, 2, 2), |(a, _, _, _)| {
            if a == 0 {
                x.clone()
            } else {
                Expr::zero()
            }
        });
        let upper = Array4::from_elem((2, 2, 2, 2), x.recip());
        let k = kretschmann_scalar(&lower, &upper, &SimplifyBudget::default()).unwrap();
        assert_eq!(k, Expr::integer(8));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = Array4::from_elem((2, 2, 2, 2), Expr::zero());
        let b = Array4::from_elem((2, 2, 3, 2), Expr::zero());
        assert_eq!(
            kretschmann_scalar(&a, &b, &SimplifyBudget::default()).unwrap_err(),
            Error::DimensionMismatch {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_budget_is_enforced() {
        let x = Expr::var("x");
        let lower = Array4::from_elem((2, 2, 2, 2), (&x + Expr::integer(1)).powi(3));
        let upper = lower.clone();
        let budget = SimplifyBudget::default().with_max_operations(3);
        assert!(matches!(
            kretschmann_scalar(&lower, &upper, &budget),
            Err(Error::SimplificationTimeout { .. })
        ));
    }
}
