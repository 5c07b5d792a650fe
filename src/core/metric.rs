//! Coordinate charts and validated metrics.

use std::collections::{BTreeSet, HashSet};

use ndarray::Array2;
use num_traits::Zero;
use tracing::debug;

use crate::core::error::{Error, Result};
use crate::symbolic::matrix;
use crate::symbolic::{Expr, Simplifier, SimplifyBudget, Symbol};

/// Ordered, duplicate-free list of coordinate symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates(Vec<Symbol>);

impl Coordinates {
    pub fn new(symbols: Vec<Symbol>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::EmptyChart);
        }
        let mut seen = HashSet::new();
        for symbol in &symbols {
            if !seen.insert(symbol) {
                return Err(Error::DuplicateCoordinate(symbol.name().to_string()));
            }
        }
        Ok(Coordinates(symbols))
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Coordinates::new(names.iter().map(|n| Symbol::new(n.as_ref())).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a chart has at least one coordinate
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.0.iter()
    }

    /// Symbol at `index`
    pub fn symbol(&self, index: usize) -> Result<&Symbol> {
        self.0.get(index).ok_or_else(|| Error::IndexOutOfRange {
            index: vec![index],
            dim: self.len(),
        })
    }

    /// Checks every entry of a component index against the dimension
    pub fn check_index(&self, index: &[usize]) -> Result<()> {
        if index.iter().any(|&i| i >= self.len()) {
            return Err(Error::IndexOutOfRange {
                index: index.to_vec(),
                dim: self.len(),
            });
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Coordinates {
    type Output = Symbol;

    fn index(&self, index: usize) -> &Symbol {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Coordinates {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A symmetric, non-degenerate metric on a chart together with its inverse.
///
/// Construction is the only place the inverse is computed; every later stage
/// reads `contravariant()`.
#[derive(Debug, Clone)]
pub struct Metric {
    coordinates: Coordinates,
    covariant: Array2<Expr>,
    contravariant: Array2<Expr>,
    determinant: Expr,
}

impl Metric {
    pub fn new(coordinates: Coordinates, covariant: Array2<Expr>) -> Result<Self> {
        Metric::with_budget(coordinates, covariant, SimplifyBudget::default())
    }

    /// Like [`Metric::new`] with a bound on the simplification work.
    pub fn with_budget(
        coordinates: Coordinates,
        covariant: Array2<Expr>,
        budget: SimplifyBudget,
    ) -> Result<Self> {
        let dim = coordinates.len();
        let (rows, cols) = covariant.dim();
        if rows != cols {
            return Err(Error::DimensionMismatch {
                expected: rows,
                got: cols,
            });
        }
        if rows != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                got: rows,
            });
        }

        let mut simplifier = Simplifier::new(budget);
        for i in 0..dim {
            for j in i + 1..dim {
                if !simplifier.equivalent(&covariant[[i, j]], &covariant[[j, i]])? {
                    return Err(Error::AsymmetricMetric { row: i, col: j });
                }
            }
        }

        let determinant = matrix::determinant(&covariant, &mut simplifier)?;
        if determinant.is_zero() {
            return Err(Error::SingularMetric);
        }
        let contravariant = matrix::inverse(&covariant, &mut simplifier)?;
        debug!(
            dim,
            operations = simplifier.operations(),
            "inverted metric"
        );

        Ok(Metric {
            coordinates,
            covariant,
            contravariant,
            determinant,
        })
    }

    /// Diagonal metric `diag(entries)`.
    pub fn diagonal(coordinates: Coordinates, entries: Vec<Expr>) -> Result<Self> {
        if entries.len() != coordinates.len() {
            return Err(Error::DimensionMismatch {
                expected: coordinates.len(),
                got: entries.len(),
            });
        }
        Metric::new(coordinates, diagonal_matrix(entries))
    }

    pub fn dim(&self) -> usize {
        self.coordinates.len()
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// g_ab
    pub fn covariant(&self) -> &Array2<Expr> {
        &self.covariant
    }

    /// g^ab, simplified
    pub fn contravariant(&self) -> &Array2<Expr> {
        &self.contravariant
    }

    /// det g, simplified
    pub fn determinant(&self) -> &Expr {
        &self.determinant
    }

    /// Symbols in the metric that are not coordinates, such as a radius or mass.
    pub fn parameters(&self) -> BTreeSet<Symbol> {
        let mut symbols: BTreeSet<Symbol> = self
            .covariant
            .iter()
            .flat_map(|entry| entry.free_symbols())
            .collect();
        for coordinate in &self.coordinates {
            symbols.remove(coordinate);
        }
        symbols
    }

    /// Exact check that g_ab g^bc is the identity
    pub fn verify_inverse(&self) -> Result<bool> {
        let product = matrix::matmul(&self.covariant, &self.contravariant)?;
        matrix::is_identity(&product, &mut Simplifier::unlimited())
    }
}

/// Square matrix with `entries` on the diagonal and exact zeros elsewhere.
pub fn diagonal_matrix(entries: Vec<Expr>) -> Array2<Expr> {
    let n = entries.len();
    let mut matrix = Array2::zeros((n, n));
    for (i, entry) in entries.into_iter().enumerate() {
        matrix[[i, i]] = entry;
    }
    matrix
}

/// Contravariant metric g^ab for a covariant metric on `coordinates`.
pub fn contravariant_metric(
    coordinates: &Coordinates,
    covariant: &Array2<Expr>,
) -> Result<Array2<Expr>> {
    Ok(Metric::new(coordinates.clone(), covariant.clone())?.contravariant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_traits::One;

    fn polar() -> Coordinates {
        Coordinates::from_names(&["r", "theta"]).unwrap()
    }

    #[test]
    fn test_coordinates_validation() {
        assert_eq!(Coordinates::new(vec![]), Err(Error::EmptyChart));
        assert_eq!(
            Coordinates::from_names(&["x", "x"]),
            Err(Error::DuplicateCoordinate("x".into()))
        );
        let coords = polar();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1].name(), "theta");
        assert!(coords.check_index(&[0, 1]).is_ok());
        assert_eq!(
            coords.check_index(&[0, 2]),
            Err(Error::IndexOutOfRange {
                index: vec![0, 2],
                dim: 2
            })
        );
    }

    #[test]
    fn test_polar_metric_inverse() {
        let r = Expr::var("r");
        let metric = Metric::diagonal(polar(), vec![Expr::one(), r.powi(2)]).unwrap();
        let inverse = metric.contravariant();
        assert!(inverse[[0, 0]].equivalent(&Expr::one()).unwrap());
        assert!(inverse[[1, 1]].equivalent(&r.powi(-2)).unwrap());
        assert!(inverse[[0, 1]].is_zero());
        assert!(metric.determinant().equivalent(&r.powi(2)).unwrap());
        assert!(metric.verify_inverse().unwrap());
        assert!(metric.parameters().is_empty());
    }

    #[test]
    fn test_parameters_exclude_coordinates() {
        let a = Expr::var("a");
        let theta = Expr::var("theta");
        let entries = vec![a.powi(2), a.powi(2) * theta.sin().powi(2)];
        let coordinates = Coordinates::from_names(&["theta", "phi"]).unwrap();
        let metric = Metric::diagonal(coordinates, entries).unwrap();
        let params = metric.parameters();
        let names: Vec<&str> = params.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_singular_metric_is_rejected() {
        let result = Metric::diagonal(polar(), vec![Expr::zero(), Expr::one()]);
        assert_eq!(result.unwrap_err(), Error::SingularMetric);

        let r = Expr::var("r");
        let rank_one = array![[r.clone(), r.clone()], [r.clone(), r.clone()]];
        assert_eq!(
            Metric::new(polar(), rank_one).unwrap_err(),
            Error::SingularMetric
        );
    }

    #[test]
    fn test_asymmetric_metric_is_rejected() {
        let r = Expr::var("r");
        let g = array![[Expr::one(), r.clone()], [Expr::zero(), Expr::one()]];
        assert_eq!(
            Metric::new(polar(), g).unwrap_err(),
            Error::AsymmetricMetric { row: 0, col: 1 }
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let g = diagonal_matrix(vec![Expr::one(), Expr::one(), Expr::one()]);
        assert_eq!(
            Metric::new(polar(), g).unwrap_err(),
            Error::DimensionMismatch {
                expected: 2,
                got: 3
            }
        );
        assert!(Metric::diagonal(polar(), vec![Expr::one()]).is_err());
    }

    #[test]
    fn test_contravariant_metric_helper() {
        let r = Expr::var("r");
        let g = diagonal_matrix(vec![Expr::one(), r.powi(2)]);
        let inverse = contravariant_metric(&polar(), &g).unwrap();
        assert!((&inverse[[1, 1]] * r.powi(2)).equivalent(&Expr::one()).unwrap());
    }
}
