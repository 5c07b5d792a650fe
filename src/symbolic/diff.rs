//! Exact partial differentiation.
//!
//! A derivative pass walks the DAG once, caching the result for every node id
//! it visits, so shared sub-expressions are differentiated a single time.

use std::collections::HashMap;

use num_traits::{One, Zero};

use super::expr::{Expr, Function, Node, NodeId, Rational, Symbol};

impl Expr {
    /// Partial derivative with respect to `var`.
    ///
    /// The result is not simplified; constant factors and zero terms are
    /// folded by the smart constructors only.
    pub fn diff(&self, var: &Symbol) -> Expr {
        Differentiator::new(var).derivative(self)
    }
}

/// One differentiation pass with respect to a fixed variable.
pub(crate) struct Differentiator<'a> {
    var: &'a Symbol,
    memo: HashMap<NodeId, Expr>,
}

impl<'a> Differentiator<'a> {
    pub(crate) fn new(var: &'a Symbol) -> Self {
        Differentiator {
            var,
            memo: HashMap::new(),
        }
    }

    pub(crate) fn derivative(&mut self, expr: &Expr) -> Expr {
        if let Some(done) = self.memo.get(&expr.id()) {
            return done.clone();
        }
        let result = match expr.node() {
            Node::Number(_) => Expr::zero(),
            Node::Symbol(symbol) => {
                if symbol == self.var {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Node::Add(terms) => {
                let parts: Vec<Expr> = terms.iter().map(|t| self.derivative(t)).collect();
                Expr::add_all(parts)
            }
            Node::Mul(factors) => {
                // Product rule, one term per factor that depends on the variable
                let mut terms = Vec::new();
                for (i, factor) in factors.iter().enumerate() {
                    let d = self.derivative(factor);
                    if d.is_zero() {
                        continue;
                    }
                    let mut product = factors.clone();
                    product[i] = d;
                    terms.push(Expr::mul_all(product));
                }
                Expr::add_all(terms)
            }
            Node::Pow(base, exponent) => {
                let d = self.derivative(base);
                if d.is_zero() {
                    Expr::zero()
                } else {
                    Expr::mul_all([
                        Expr::number(exponent.clone()),
                        base.pow_rational(exponent - Rational::one()),
                        d,
                    ])
                }
            }
            Node::Apply(function, args) => self.apply_rule(function, args),
        };
        self.memo.insert(expr.id(), result.clone());
        result
    }

    fn apply_rule(&mut self, function: &Function, args: &[Expr]) -> Expr {
        match function {
            Function::Sin => self.chain(args, |u| u.cos()),
            Function::Cos => self.chain(args, |u| -u.sin()),
            Function::Exp => self.chain(args, |u| u.exp()),
            Function::Ln => self.chain(args, |u| u.recip()),
            Function::Undefined { .. } => {
                let mut terms = Vec::new();
                for (k, arg) in args.iter().enumerate() {
                    let d = self.derivative(arg);
                    if d.is_zero() {
                        continue;
                    }
                    let partial = Expr::apply(function.differentiated(k), args.to_vec());
                    terms.push(partial * d);
                }
                Expr::add_all(terms)
            }
        }
    }

    /// `outer(u) * du` for a one-argument function.
    fn chain<F: Fn(&Expr) -> Expr>(&mut self, args: &[Expr], outer: F) -> Expr {
        let Some(u) = args.first() else {
            return Expr::zero();
        };
        let du = self.derivative(u);
        if du.is_zero() {
            return Expr::zero();
        }
        outer(u) * du
    }
}
