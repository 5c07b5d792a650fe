//! Riemann curvature tensor R[a,b,c,d] = R^a_bcd.
//!
//! R[a,b,c,d] = ∂_c Γ[a,d,b] − ∂_d Γ[a,c,b]
//!            + Σ_i (Γ[a,c,i] Γ[i,d,b] − Γ[a,d,i] Γ[i,c,b])

use ndarray::{Array3, Array4};
use num_traits::Zero;
use tracing::debug;

use super::connection::{check_connection_shape, connection_derivatives};
use super::tensor::{build_tensor, Execution};
use crate::core::error::{Error, Result};
use crate::core::metric::Coordinates;
use crate::symbolic::Expr;

/// Shared formula; `partial(a, b, c, k)` must return ∂Γ[a,b,c]/∂x^k.
fn riemann_from<P>(gamma: &Array3<Expr>, dim: usize, [a, b, c, d]: [usize; 4], partial: P) -> Expr
where
    P: Fn(usize, usize, usize, usize) -> Expr,
{
    let mut terms = vec![partial(a, d, b, c), -partial(a, c, b, d)];
    for i in 0..dim {
        let (g1, g2) = (&gamma[[a, c, i]], &gamma[[i, d, b]]);
        if !g1.is_zero() && !g2.is_zero() {
            terms.push(g1 * g2);
        }
        let (g3, g4) = (&gamma[[a, d, i]], &gamma[[i, c, b]]);
        if !g3.is_zero() && !g4.is_zero() {
            terms.push(-(g3 * g4));
        }
    }
    Expr::add_all(terms)
}

/// Single component R[a,b,c,d], unsimplified.
pub fn riemann_component(
    gamma: &Array3<Expr>,
    coordinates: &Coordinates,
    index: [usize; 4],
) -> Result<Expr> {
    let dim = check_connection_shape(gamma, coordinates)?;
    coordinates.check_index(&index)?;
    Ok(riemann_from(gamma, dim, index, |a, b, c, k| {
        gamma[[a, b, c]].diff(&coordinates[k])
    }))
}

/// Full Riemann array.
pub fn riemann_array(
    gamma: &Array3<Expr>,
    coordinates: &Coordinates,
    execution: Execution,
) -> Result<Array4<Expr>> {
    let dgamma = connection_derivatives(gamma, coordinates, execution)?;
    riemann_array_from(gamma, &dgamma, coordinates, execution)
}

/// Full Riemann array from precomputed connection derivatives dgamma[a,b,c,k].
pub fn riemann_array_from(
    gamma: &Array3<Expr>,
    dgamma: &Array4<Expr>,
    coordinates: &Coordinates,
    execution: Execution,
) -> Result<Array4<Expr>> {
    let dim = check_connection_shape(gamma, coordinates)?;
    if dgamma.shape() != [dim; 4] {
        return Err(Error::DimensionMismatch {
            expected: dim,
            got: dgamma.shape()[0],
        });
    }
    let riemann = build_tensor(dim, execution, |idx| {
        Ok(riemann_from(
            gamma,
            dim,
            [idx[0], idx[1], idx[2], idx[3]],
            |a, b, c, k| dgamma[[a, b, c, k]].clone(),
        ))
    })?;
    debug!(dim, "riemann tensor built");
    Ok(riemann)
}

/// Riemann array from an arbitrary per-component function.
///
/// Lets callers substitute their own component rule (e.g. one that simplifies
/// as it goes) while keeping the builder's ordering and parallelism.
pub fn riemann_tensor<F>(
    gamma: &Array3<Expr>,
    coordinates: &Coordinates,
    execution: Execution,
    component: F,
) -> Result<Array4<Expr>>
where
    F: Fn(&Array3<Expr>, &Coordinates, [usize; 4]) -> Result<Expr> + Sync,
{
    let dim = check_connection_shape(gamma, coordinates)?;
    build_tensor(dim, execution, |idx| {
        component(gamma, coordinates, [idx[0], idx[1], idx[2], idx[3]])
    })
}
