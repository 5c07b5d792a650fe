use ndarray::Array2;

use crate::core::{diagonal_matrix, MetricProvider};
use crate::symbolic::{Expr, Symbol};

/// Static, spherically symmetric spacetime in coordinates (t, r, θ, φ)
///
/// ds² = A dt² − B dr² − r² dθ² − r² sin²θ dφ²
///
/// `A` and `B` are arbitrary expressions, by default the undefined functions
/// `A(r)` and `B(r)`.
pub struct StaticSpherical {
    name: String,
    a: Expr,
    b: Expr,
}

impl StaticSpherical {
    pub fn new(a: Expr, b: Expr) -> Self {
        StaticSpherical {
            name: "static spherically symmetric spacetime".to_string(),
            a,
            b,
        }
    }

    /// A = A(r), B = B(r)
    pub fn general() -> Self {
        let r = Expr::var("r");
        StaticSpherical::new(Expr::function("A", &[r.clone()]), Expr::function("B", &[r]))
    }

    /// A = 1 − 2M/r, B = 1/A
    pub fn schwarzschild(mass: Expr) -> Self {
        let r = Expr::var("r");
        let a = Expr::integer(1) - Expr::integer(2) * mass / r;
        let b = a.recip();
        StaticSpherical {
            name: "Schwarzschild spacetime".to_string(),
            a,
            b,
        }
    }

    pub fn a(&self) -> &Expr {
        &self.a
    }

    pub fn b(&self) -> &Expr {
        &self.b
    }
}

impl MetricProvider for StaticSpherical {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn coordinates(&self) -> Vec<Symbol> {
        ["t", "r", "theta", "phi"].iter().map(|n| Symbol::new(n)).collect()
    }

    fn covariant(&self) -> Array2<Expr> {
        let r = Expr::var("r");
        let theta = Expr::var("theta");
        diagonal_matrix(vec![
            self.a.clone(),
            -&self.b,
            -r.powi(2),
            -(r.powi(2) * theta.sin().powi(2)),
        ])
    }
}
