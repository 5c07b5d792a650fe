use ndarray::{s, Array2};

use crate::core::MetricProvider;
use crate::symbolic::{Expr, Symbol};

/// Product of two charts M1 × M2
///
/// The metric is block diagonal: g = g1 ⊕ g2, with the coordinates of M1
/// first. Used e.g. for S² × S², whose Kretschmann scalar is the sum of the
/// factors' scalars. The two charts must use distinct coordinate names.
pub struct ProductMetric<M1: MetricProvider, M2: MetricProvider> {
    pub m1: M1,
    pub m2: M2,
}

impl<M1, M2> ProductMetric<M1, M2>
where
    M1: MetricProvider,
    M2: MetricProvider,
{
    pub fn new(m1: M1, m2: M2) -> Self {
        ProductMetric { m1, m2 }
    }
}

impl<M1, M2> MetricProvider for ProductMetric<M1, M2>
where
    M1: MetricProvider,
    M2: MetricProvider,
{
    fn name(&self) -> String {
        format!("{} × {}", self.m1.name(), self.m2.name())
    }

    fn coordinates(&self) -> Vec<Symbol> {
        let mut coordinates = self.m1.coordinates();
        coordinates.extend(self.m2.coordinates());
        coordinates
    }

    fn covariant(&self) -> Array2<Expr> {
        let g1 = self.m1.covariant();
        let g2 = self.m2.covariant();
        let n1 = g1.nrows();
        let n = n1 + g2.nrows();

        let mut g = Array2::zeros((n, n));
        g.slice_mut(s![..n1, ..n1]).assign(&g1);
        g.slice_mut(s![n1.., n1..]).assign(&g2);
        g
    }
}
