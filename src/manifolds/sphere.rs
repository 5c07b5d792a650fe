use ndarray::Array2;

use crate::core::{diagonal_matrix, MetricProvider};
use crate::symbolic::{Expr, Symbol};

/// Round n-sphere S^n of radius r in hyperspherical coordinates
///
/// ds² = r² (dθ₁² + sin²θ₁ dθ₂² + ... + sin²θ₁···sin²θₙ₋₁ dφ²)
pub struct Sphere {
    dim: usize,
    radius: Expr,
    coordinates: Vec<Symbol>,
}

impl Sphere {
    /// Sphere of symbolic radius `r`; coordinates (theta, phi) for n = 2,
    /// (theta1, ..., theta{n-1}, phi) in general
    pub fn new(dim: usize) -> Self {
        let coordinates = match dim {
            0 => Vec::new(),
            1 => vec![Symbol::new("phi")],
            2 => vec![Symbol::new("theta"), Symbol::new("phi")],
            _ => (1..dim)
                .map(|i| Symbol::new(&format!("theta{i}")))
                .chain(std::iter::once(Symbol::new("phi")))
                .collect(),
        };
        Sphere {
            dim,
            radius: Expr::var("r"),
            coordinates,
        }
    }

    pub fn with_radius(mut self, radius: Expr) -> Self {
        self.radius = radius;
        self
    }

    /// Rename the angles; the count must match the dimension for `metric()` to succeed
    pub fn with_coordinates<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.coordinates = names.iter().map(|n| Symbol::new(n.as_ref())).collect();
        self
    }

    pub fn radius(&self) -> &Expr {
        &self.radius
    }
}

impl MetricProvider for Sphere {
    fn name(&self) -> String {
        format!("{}-sphere", self.dim)
    }

    fn coordinates(&self) -> Vec<Symbol> {
        self.coordinates.clone()
    }

    fn covariant(&self) -> Array2<Expr> {
        let r2 = self.radius.powi(2);
        let mut entries = Vec::with_capacity(self.dim);
        let mut scale = r2;
        for k in 0..self.dim {
            entries.push(scale.clone());
            if let Some(angle) = self.coordinates.get(k) {
                scale = scale * Expr::symbol(angle).sin().powi(2);
            }
        }
        diagonal_matrix(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use num_traits::Zero;

    #[test]
    fn test_two_sphere_metric() {
        let sphere = Sphere::new(2);
        assert_eq!(sphere.name(), "2-sphere");
        let g = sphere.covariant();
        let r = Expr::var("r");
        let theta = Expr::var("theta");
        assert!(g[[0, 0]].equivalent(&r.powi(2)).unwrap());
        assert!(g[[1, 1]]
            .equivalent(&(r.powi(2) * theta.sin().powi(2)))
            .unwrap());
        assert!(g[[0, 1]].is_zero());
    }

    #[test]
    fn test_three_sphere_nested_sines() {
        let sphere = Sphere::new(3).with_radius(Expr::integer(1));
        let names: Vec<String> = sphere
            .coordinates()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["theta1", "theta2", "phi"]);

        let g = sphere.covariant();
        let t1 = Expr::var("theta1");
        let t2 = Expr::var("theta2");
        let expected = t1.sin().powi(2) * t2.sin().powi(2);
        assert!(g[[2, 2]].equivalent(&expected).unwrap());
    }

    #[test]
    fn test_sphere_inverse_is_exact() {
        let metric = Sphere::new(2).metric().unwrap();
        assert!(metric.verify_inverse().unwrap());
    }

    #[test]
    fn test_wrong_coordinate_count() {
        let sphere = Sphere::new(2).with_coordinates(&["a", "b", "c"]);
        assert!(matches!(
            sphere.metric(),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
