//! Ricci tensor from the Christoffel symbols.
//!
//! With R^a_bcd = ∂_c Γ^a_db − ∂_d Γ^a_cb + Γ^a_ci Γ^i_db − Γ^a_di Γ^i_cb,
//! the contraction over the first and third index is
//!
//! ```text
//! raw[a,b] = Σ_c (∂_c Γ[c,a,b] − ∂_b Γ[c,a,c])
//!          + Σ_c Σ_d (Γ[c,a,b] Γ[d,c,d] − Γ[d,b,c] Γ[c,a,d])
//! ```
//!
//! which equals R^c_acb. [`RicciConvention`] decides whether that value or
//! its negative is reported.

use ndarray::{Array2, Array3, Array4};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::connection::{check_connection_shape, connection_derivatives};
use super::tensor::{build_tensor, Execution};
use crate::core::error::{Error, Result};
use crate::core::metric::Coordinates;
use crate::symbolic::Expr;

/// Sign convention for the Ricci tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RicciConvention {
    /// Ricci[a,b] = −R^c_acb
    ///
    /// With this choice the unit 2-sphere has Ricci = −g.
    Negated,
    /// Ricci[a,b] = R^c_acb, the trace of the Riemann tensor built here
    Contracted,
}

impl Default for RicciConvention {
    fn default() -> Self {
        RicciConvention::Negated
    }
}

impl RicciConvention {
    fn apply(self, raw: Expr) -> Expr {
        match self {
            RicciConvention::Negated => -raw,
            RicciConvention::Contracted => raw,
        }
    }
}

/// Shared formula; `partial(a, b, c, k)` must return ∂Γ[a,b,c]/∂x^k.
fn ricci_contraction<P>(gamma: &Array3<Expr>, dim: usize, [a, b]: [usize; 2], partial: P) -> Expr
where
    P: Fn(usize, usize, usize, usize) -> Expr,
{
    let mut terms = Vec::new();
    for c in 0..dim {
        terms.push(partial(c, a, b, c));
        terms.push(-partial(c, a, c, b));
    }
    for c in 0..dim {
        for d in 0..dim {
            let (g1, g2) = (&gamma[[c, a, b]], &gamma[[d, c, d]]);
            if !g1.is_zero() && !g2.is_zero() {
                terms.push(g1 * g2);
            }
            let (g3, g4) = (&gamma[[d, b, c]], &gamma[[c, a, d]]);
            if !g3.is_zero() && !g4.is_zero() {
                terms.push(-(g3 * g4));
            }
        }
    }
    Expr::add_all(terms)
}

/// Single Ricci component under the default (negated) convention, unsimplified.
pub fn ricci_component(
    gamma: &Array3<Expr>,
    coordinates: &Coordinates,
    index: [usize; 2],
) -> Result<Expr> {
    ricci_component_with(gamma, coordinates, index, RicciConvention::default())
}

/// Single Ricci component under `convention`.
pub fn ricci_component_with(
    gamma: &Array3<Expr>,
    coordinates: &Coordinates,
    index: [usize; 2],
    convention: RicciConvention,
) -> Result<Expr> {
    let dim = check_connection_shape(gamma, coordinates)?;
    coordinates.check_index(&index)?;
    let raw = ricci_contraction(gamma, dim, index, |a, b, c, k| {
        gamma[[a, b, c]].diff(&coordinates[k])
    });
    Ok(convention.apply(raw))
}

/// Full Ricci array under the default convention.
pub fn ricci_array(
    gamma: &Array3<Expr>,
    coordinates: &Coordinates,
    execution: Execution,
) -> Result<Array2<Expr>> {
    let dgamma = connection_derivatives(gamma, coordinates, execution)?;
    ricci_array_from(gamma, &dgamma, coordinates, RicciConvention::default(), execution)
}

/// Full Ricci array from precomputed connection derivatives dgamma[a,b,c,k].
pub fn ricci_array_from(
    gamma: &Array3<Expr>,
    dgamma: &Array4<Expr>,
    coordinates: &Coordinates,
    convention: RicciConvention,
    execution: Execution,
) -> Result<Array2<Expr>> {
    let dim = check_connection_shape(gamma, coordinates)?;
    if dgamma.shape() != [dim; 4] {
        return Err(Error::DimensionMismatch {
            expected: dim,
            got: dgamma.shape()[0],
        });
    }
    let ricci = build_tensor(dim, execution, |idx| {
        let raw = ricci_contraction(gamma, dim, [idx[0], idx[1]], |a, b, c, k| {
            dgamma[[a, b, c, k]].clone()
        });
        Ok(convention.apply(raw))
    })?;
    debug!(dim, ?convention, "ricci tensor built");
    Ok(ricci)
}

/// Ricci[a,b] = Σ_c R[c,a,c,b] for a Riemann tensor R[a,b,c,d] = R^a_bcd.
pub fn contract_riemann(riemann: &Array4<Expr>) -> Result<Array2<Expr>> {
    let dim = riemann.shape()[0];
    if riemann.shape() != [dim; 4] {
        return Err(Error::DimensionMismatch {
            expected: dim,
            got: riemann.shape().iter().copied().find(|&n| n != dim).unwrap_or(dim),
        });
    }
    Ok(Array2::from_shape_fn((dim, dim), |(a, b)| {
        (0..dim)
            .map(|c| &riemann[[c, a, c, b]])
            .filter(|e| !e.is_zero())
            .sum()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::connection::christoffel_array;
    use crate::core::MetricProvider;
    use crate::manifolds::{Euclidean, Sphere};

    fn sphere_connection() -> (Array3<Expr>, Coordinates) {
        let metric = Sphere::new(2).metric().unwrap();
        let gamma = christoffel_array(
            metric.covariant(),
            metric.contravariant(),
            metric.coordinates(),
            Execution::Sequential,
        )
        .unwrap();
        (gamma, metric.coordinates().clone())
    }

    #[test]
    fn test_two_sphere_ricci_negated() {
        let (gamma, coords) = sphere_connection();
        let ricci = ricci_array(&gamma, &coords, Execution::Sequential).unwrap();
        let theta = Expr::var("theta");
        assert!(ricci[[0, 0]].equivalent(&Expr::integer(-1)).unwrap());
        assert!(ricci[[1, 1]].equivalent(&(-theta.sin().powi(2))).unwrap());
        assert!(ricci[[0, 1]].is_identically_zero().unwrap());
    }

    #[test]
    fn test_two_sphere_ricci_contracted() {
        let (gamma, coords) = sphere_connection();
        let rtt =
            ricci_component_with(&gamma, &coords, [0, 0], RicciConvention::Contracted).unwrap();
        assert!(rtt.equivalent(&Expr::integer(1)).unwrap());
    }

    #[test]
    fn test_component_matches_array() {
        let (gamma, coords) = sphere_connection();
        let ricci = ricci_array(&gamma, &coords, Execution::Parallel).unwrap();
        for a in 0..2 {
            for b in 0..2 {
                let single = ricci_component(&gamma, &coords, [a, b]).unwrap();
                assert!(single.equivalent(&ricci[[a, b]]).unwrap());
            }
        }
    }

    #[test]
    fn test_flat_ricci_vanishes() {
        let metric = Euclidean::new(2).metric().unwrap();
        let gamma = christoffel_array(
            metric.covariant(),
            metric.contravariant(),
            metric.coordinates(),
            Execution::Sequential,
        )
        .unwrap();
        let ricci = ricci_array(&gamma, metric.coordinates(), Execution::Sequential).unwrap();
        assert!(ricci.iter().all(|r| r.is_zero()));
    }

    #[test]
    fn test_index_out_of_range() {
        let (gamma, coords) = sphere_connection();
        assert!(matches!(
            ricci_component(&gamma, &coords, [2, 0]),
            Err(Error::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_contract_riemann_rejects_ragged_shape() {
        let riemann = Array4::from_elem((2, 2, 3, 2), Expr::zero());
        assert!(contract_riemann(&riemann).is_err());
    }
}
