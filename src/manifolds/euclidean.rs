use ndarray::Array2;

use crate::core::MetricProvider;
use crate::symbolic::{Expr, Symbol};

/// Euclidean space R^n with the standard metric in Cartesian coordinates
pub struct Euclidean {
    coordinates: Vec<Symbol>,
}

impl Euclidean {
    /// Coordinates x, y, z for n <= 3, x1..xn otherwise
    pub fn new(dim: usize) -> Self {
        let coordinates = match dim {
            1..=3 => ["x", "y", "z"][..dim].iter().map(|n| Symbol::new(n)).collect(),
            _ => (1..=dim).map(|i| Symbol::new(&format!("x{i}"))).collect(),
        };
        Euclidean { coordinates }
    }

    pub fn with_coordinates<S: AsRef<str>>(names: &[S]) -> Self {
        Euclidean {
            coordinates: names.iter().map(|n| Symbol::new(n.as_ref())).collect(),
        }
    }
}

impl MetricProvider for Euclidean {
    fn name(&self) -> String {
        format!("{}-dimensional Euclidean space", self.coordinates.len())
    }

    fn coordinates(&self) -> Vec<Symbol> {
        self.coordinates.clone()
    }

    /// g = identity
    fn covariant(&self) -> Array2<Expr> {
        Array2::eye(self.coordinates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use num_traits::{One, Zero};

    #[test]
    fn test_euclidean_coordinates() {
        let names: Vec<String> = Euclidean::new(3)
            .coordinates()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert_eq!(Euclidean::new(5).coordinates()[4].name(), "x5");
    }

    #[test]
    fn test_euclidean_metric_is_identity() {
        let metric = Euclidean::new(3).metric().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let entry = &metric.contravariant()[[i, j]];
                assert_eq!(entry.is_one(), i == j);
                assert_eq!(entry.is_zero(), i != j);
            }
        }
    }

    #[test]
    fn test_euclidean_validation() {
        assert_eq!(Euclidean::new(0).metric().unwrap_err(), Error::EmptyChart);
        assert!(matches!(
            Euclidean::with_coordinates(&["x", "x"]).metric(),
            Err(Error::DuplicateCoordinate(_))
        ));
    }
}
