//! Property tests for canonical forms and curvature symmetries

use curvature::algorithms::{christoffel_array, riemann_array, Execution};
use curvature::core::{Coordinates, Metric};
use curvature::symbolic::{parse, Expr, Symbol};
use proptest::prelude::*;

/// k + v², never identically zero for k >= 1
fn shifted_square(k: i64, name: &str) -> Expr {
    Expr::integer(k) + Expr::var(name).powi(2)
}

/// Sums, products, small powers, sin and cos, square roots, and quotients by
/// k + x² or by a cosine, none of which can vanish identically.
fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-4i64..=4).prop_map(Expr::integer),
        Just(Expr::var("x")),
        Just(Expr::var("y")),
        Just(Expr::var("x").sqrt()),
        (1i64..=3).prop_map(|k| shifted_square(k, "y").sqrt()),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a + b),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a * b),
            (inner.clone(), 0i64..=3).prop_map(|(a, n)| a.powi(n)),
            inner.clone().prop_map(|a| a.sin()),
            inner.clone().prop_map(|a| a.cos()),
            (inner.clone(), 1i64..=3).prop_map(|(a, k)| a / shifted_square(k, "x")),
            (inner.clone(), inner).prop_map(|(a, b)| a / b.cos()),
        ]
    })
}

/// k + (a x + b y)², never identically zero for k >= 1
fn arb_positive_entry() -> impl Strategy<Value = Expr> {
    (1i64..=3, -2i64..=2, -2i64..=2).prop_map(|(k, a, b)| {
        let linear = Expr::integer(a) * Expr::var("x") + Expr::integer(b) * Expr::var("y");
        Expr::integer(k) + linear.powi(2)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// u − u = 0
    #[test]
    fn difference_with_self_vanishes(u in arb_expr()) {
        prop_assert!((&u - &u).is_identically_zero().unwrap());
    }

    #[test]
    fn addition_and_multiplication_commute(u in arb_expr(), v in arb_expr()) {
        prop_assert!((&u + &v).equivalent(&(&v + &u)).unwrap());
        prop_assert!((&u * &v).equivalent(&(&v * &u)).unwrap());
    }

    /// u (v + w) = u v + u w
    #[test]
    fn multiplication_distributes(u in arb_expr(), v in arb_expr(), w in arb_expr()) {
        let lhs = &u * &(&v + &w);
        let rhs = &u * &v + &u * &w;
        prop_assert!(lhs.equivalent(&rhs).unwrap());
    }

    /// sin²u + cos²u = 1
    #[test]
    fn pythagorean_identity(u in arb_expr()) {
        let identity = u.sin().powi(2) + u.cos().powi(2);
        prop_assert!(identity.equivalent(&Expr::integer(1)).unwrap());
    }

    /// ∂(a u + b v) = a ∂u + b ∂v
    #[test]
    fn derivative_is_linear(u in arb_expr(), v in arb_expr(), a in -3i64..=3, b in -3i64..=3) {
        let x = Symbol::new("x");
        let (a, b) = (Expr::integer(a), Expr::integer(b));
        let lhs = (&a * &u + &b * &v).diff(&x);
        let rhs = &a * &u.diff(&x) + &b * &v.diff(&x);
        prop_assert!(lhs.equivalent(&rhs).unwrap());
    }

    /// Mixed partials commute
    #[test]
    fn partial_derivatives_commute(u in arb_expr()) {
        let (x, y) = (Symbol::new("x"), Symbol::new("y"));
        prop_assert!(u.diff(&x).diff(&y).equivalent(&u.diff(&y).diff(&x)).unwrap());
    }

    /// u / u = 1 whenever u is not identically zero
    #[test]
    fn quotient_with_self_is_one(u in arb_expr()) {
        prop_assume!(!u.is_identically_zero().unwrap());
        prop_assert!((&u / &u).equivalent(&Expr::integer(1)).unwrap());
    }

    /// Simplification does not change the value
    #[test]
    fn simplified_form_is_equivalent(u in arb_expr()) {
        let simplified = u.simplify().unwrap();
        prop_assert!(simplified.equivalent(&u).unwrap());
        prop_assert!(simplified.simplify().unwrap().equivalent(&simplified).unwrap());
    }

    /// Displayed expressions parse back to an equivalent expression
    #[test]
    fn display_parses_back(u in arb_expr()) {
        let reparsed = parse(&u.to_string()).unwrap();
        prop_assert!(reparsed.equivalent(&u).unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn diagonal_metric_curvature_symmetries(
        g0 in arb_positive_entry(),
        g1 in arb_positive_entry(),
    ) {
        let coordinates = Coordinates::from_names(&["x", "y"]).unwrap();
        let metric = Metric::diagonal(coordinates, vec![g0, g1]).unwrap();
        prop_assert!(metric.verify_inverse().unwrap());

        let gamma = christoffel_array(
            metric.covariant(),
            metric.contravariant(),
            metric.coordinates(),
            Execution::Sequential,
        )
        .unwrap();
        let riemann = riemann_array(&gamma, metric.coordinates(), Execution::Parallel).unwrap();

        for a in 0..2 {
            for b in 0..2 {
                for c in 0..2 {
                    let swapped = &gamma[[a, b, c]] - &gamma[[a, c, b]];
                    prop_assert!(swapped.is_identically_zero().unwrap());
                    for d in 0..2 {
                        let sum = &riemann[[a, b, c, d]] + &riemann[[a, b, d, c]];
                        prop_assert!(sum.is_identically_zero().unwrap());
                    }
                }
            }
        }
    }
}
