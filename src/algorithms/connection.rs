//! Christoffel symbols of the second kind.
//!
//! Γ[a,b,c] = ½ Σ_d g^ad (∂_b g_dc + ∂_c g_bd − ∂_d g_bc)
//!
//! The index order follows the usual Γ^a_bc: the upper index first.

use ndarray::{Array2, Array3, Array4};
use num_traits::Zero;
use tracing::debug;

use super::tensor::{build_tensor, Execution};
use crate::core::error::{Error, Result};
use crate::core::metric::Coordinates;
use crate::symbolic::Expr;

/// Checks that both metric arrays are square with side `coordinates.len()`.
pub(crate) fn check_metric_shapes(
    g_cov: &Array2<Expr>,
    g_cont: &Array2<Expr>,
    coordinates: &Coordinates,
) -> Result<usize> {
    let dim = coordinates.len();
    for g in [g_cov, g_cont] {
        let (rows, cols) = g.dim();
        if rows != dim || cols != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                got: if rows != dim { rows } else { cols },
            });
        }
    }
    Ok(dim)
}

/// Checks that `gamma` has shape (dim, dim, dim).
pub(crate) fn check_connection_shape(
    gamma: &Array3<Expr>,
    coordinates: &Coordinates,
) -> Result<usize> {
    let dim = coordinates.len();
    if let Some(&got) = gamma.shape().iter().find(|&&len| len != dim) {
        return Err(Error::DimensionMismatch { expected: dim, got });
    }
    Ok(dim)
}

/// Shared formula; `partial(i, j, k)` must return ∂g_ij/∂x^k.
fn christoffel_from<P>(g_cont: &Array2<Expr>, dim: usize, [a, b, c]: [usize; 3], partial: P) -> Expr
where
    P: Fn(usize, usize, usize) -> Expr,
{
    let sum: Expr = (0..dim)
        .filter(|&d| !g_cont[[a, d]].is_zero())
        .map(|d| &g_cont[[a, d]] * (partial(d, c, b) + partial(b, d, c) - partial(b, c, d)))
        .sum();
    Expr::rational(1, 2) * sum
}

/// Single Christoffel symbol Γ[a,b,c], unsimplified.
pub fn christoffel_component(
    g_cov: &Array2<Expr>,
    g_cont: &Array2<Expr>,
    coordinates: &Coordinates,
    index: [usize; 3],
) -> Result<Expr> {
    let dim = check_metric_shapes(g_cov, g_cont, coordinates)?;
    coordinates.check_index(&index)?;
    Ok(christoffel_from(g_cont, dim, index, |i, j, k| {
        g_cov[[i, j]].diff(&coordinates[k])
    }))
}

/// ∂g_ij/∂x^k for every i, j, k, laid out as dg[i,j,k].
pub fn metric_derivatives(
    g_cov: &Array2<Expr>,
    coordinates: &Coordinates,
    execution: Execution,
) -> Result<Array3<Expr>> {
    let dim = coordinates.len();
    if g_cov.dim() != (dim, dim) {
        return Err(Error::DimensionMismatch {
            expected: dim,
            got: g_cov.nrows(),
        });
    }
    build_tensor(dim, execution, |idx| {
        let (entry, coordinate) = (&g_cov[[idx[0], idx[1]]], &coordinates[idx[2]]);
        if entry.contains(coordinate) {
            Ok(entry.diff(coordinate))
        } else {
            Ok(Expr::zero())
        }
    })
}

/// Full Γ array. Each metric derivative is taken once and shared by all
/// components that need it.
pub fn christoffel_array(
    g_cov: &Array2<Expr>,
    g_cont: &Array2<Expr>,
    coordinates: &Coordinates,
    execution: Execution,
) -> Result<Array3<Expr>> {
    let dim = check_metric_shapes(g_cov, g_cont, coordinates)?;
    let dg = metric_derivatives(g_cov, coordinates, execution)?;
    let gamma = build_tensor(dim, execution, |idx| {
        Ok(christoffel_from(
            g_cont,
            dim,
            [idx[0], idx[1], idx[2]],
            |i, j, k| dg[[i, j, k]].clone(),
        ))
    })?;
    debug!(dim, "christoffel symbols built");
    Ok(gamma)
}

/// ∂Γ[a,b,c]/∂x^k for every a, b, c, k, laid out as dgamma[a,b,c,k].
pub fn connection_derivatives(
    gamma: &Array3<Expr>,
    coordinates: &Coordinates,
    execution: Execution,
) -> Result<Array4<Expr>> {
    let dim = check_connection_shape(gamma, coordinates)?;
    build_tensor(dim, execution, |idx| {
        Ok(gamma[[idx[0], idx[1], idx[2]]].diff(&coordinates[idx[3]]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MetricProvider;
    use crate::manifolds::{Euclidean, Sphere};

    #[test]
    fn test_flat_space_connection_vanishes() {
        let metric = Euclidean::new(3).metric().unwrap();
        let gamma = christoffel_array(
            metric.covariant(),
            metric.contravariant(),
            metric.coordinates(),
            Execution::Sequential,
        )
        .unwrap();
        assert!(gamma.iter().all(|g| g.is_zero()));
    }

    #[test]
    fn test_two_sphere_symbols() {
        let metric = Sphere::new(2).metric().unwrap();
        let (g, gi, x) = (metric.covariant(), metric.contravariant(), metric.coordinates());
        let theta = Expr::var("theta");

        // Γ^θ_φφ = −sin θ cos θ
        let g011 = christoffel_component(g, gi, x, [0, 1, 1]).unwrap();
        assert!(g011
            .equivalent(&(-(theta.sin() * theta.cos())))
            .unwrap());

        // Γ^φ_θφ = cos θ / sin θ
        let g101 = christoffel_component(g, gi, x, [1, 0, 1]).unwrap();
        assert!(g101.equivalent(&(theta.cos() / theta.sin())).unwrap());

        let g000 = christoffel_component(g, gi, x, [0, 0, 0]).unwrap();
        assert!(g000.is_identically_zero().unwrap());
    }

    #[test]
    fn test_component_matches_array() {
        let metric = Sphere::new(2).metric().unwrap();
        let (g, gi, x) = (metric.covariant(), metric.contravariant(), metric.coordinates());
        let gamma = christoffel_array(g, gi, x, Execution::Parallel).unwrap();
        for a in 0..2 {
            for b in 0..2 {
                for c in 0..2 {
                    let single = christoffel_component(g, gi, x, [a, b, c]).unwrap();
                    assert!(single.equivalent(&gamma[[a, b, c]]).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_lower_indices_are_symmetric() {
        let metric = Sphere::new(3).metric().unwrap();
        let gamma = christoffel_array(
            metric.covariant(),
            metric.contravariant(),
            metric.coordinates(),
            Execution::Sequential,
        )
        .unwrap();
        for a in 0..3 {
            for b in 0..3 {
                for c in 0..3 {
                    assert!(gamma[[a, b, c]].equivalent(&gamma[[a, c, b]]).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_one_dimensional_chart() {
        let coordinates = Coordinates::from_names(&["u"]).unwrap();
        let u = Expr::var("u");
        let g = Array2::from_elem((1, 1), u.powi(2));
        let gi = Array2::from_elem((1, 1), u.powi(-2));
        // Γ^u_uu = ½ g^uu ∂_u g_uu = 1/u
        let gamma = christoffel_component(&g, &gi, &coordinates, [0, 0, 0]).unwrap();
        assert!(gamma.equivalent(&u.recip()).unwrap());
    }

    #[test]
    fn test_rejects_bad_input() {
        let metric = Sphere::new(2).metric().unwrap();
        let (g, gi, x) = (metric.covariant(), metric.contravariant(), metric.coordinates());
        assert_eq!(
            christoffel_component(g, gi, x, [0, 2, 0]).unwrap_err(),
            Error::IndexOutOfRange {
                index: vec![0, 2, 0],
                dim: 2
            }
        );
        let three = Coordinates::from_names(&["a", "b", "c"]).unwrap();
        assert!(matches!(
            christoffel_array(g, gi, &three, Execution::Sequential),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_connection_derivatives_layout() {
        let metric = Sphere::new(2).metric().unwrap();
        let gamma = christoffel_array(
            metric.covariant(),
            metric.contravariant(),
            metric.coordinates(),
            Execution::Sequential,
        )
        .unwrap();
        let dgamma =
            connection_derivatives(&gamma, metric.coordinates(), Execution::Sequential).unwrap();
        assert_eq!(dgamma.dim(), (2, 2, 2, 2));
        // ∂_θ Γ^θ_φφ = sin²θ − cos²θ
        let theta = Expr::var("theta");
        let expected = theta.sin().powi(2) - theta.cos().powi(2);
        assert!(dgamma[[0, 1, 1, 0]].equivalent(&expected).unwrap());
    }
}
