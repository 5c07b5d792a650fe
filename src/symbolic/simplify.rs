//! Simplification to canonical rational-function form.
//!
//! [`Simplifier::canonical`] maps an expression to a [`RationalFunction`]
//! whose structure is unique for equivalent inputs (modulo the atoms it
//! treats as independent). Zero tests and equivalence checks are therefore
//! exact: `a - b` simplifies to the zero polynomial iff `a == b` as rational
//! functions of the atoms, with `sin^2 + cos^2 = 1` built in.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::expr::{Expr, Function, Node, NodeId, Rational};
use super::poly::Atom;
use super::rational::RationalFunction;
use crate::core::error::{Error, Result};

/// How often (in operations) the wall clock is consulted.
const CLOCK_CHECK_INTERVAL: u64 = 256;

/// Limits on the work a [`Simplifier`] may do before giving up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifyBudget {
    /// Maximum number of canonicalisation steps
    pub max_operations: Option<u64>,
    /// Wall-clock limit measured from the simplifier's creation
    pub time_limit: Option<Duration>,
}

impl SimplifyBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_operations(mut self, operations: u64) -> Self {
        self.max_operations = Some(operations);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_operations.is_none() && self.time_limit.is_none()
    }

    fn describe(&self) -> String {
        match (self.max_operations, self.time_limit) {
            (Some(ops), Some(limit)) => format!("limit {ops} operations or {limit:?}"),
            (Some(ops), None) => format!("limit {ops} operations"),
            (None, Some(limit)) => format!("limit {limit:?}"),
            (None, None) => "unlimited".to_string(),
        }
    }
}

/// Canonicalising simplifier with a per-node memo.
///
/// The memo is keyed by node identity, so it pays off when many expressions
/// share sub-trees, as curvature components built from one connection do.
#[derive(Debug)]
pub struct Simplifier {
    budget: SimplifyBudget,
    started: Instant,
    operations: u64,
    memo: HashMap<NodeId, RationalFunction>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Simplifier::new(SimplifyBudget::default())
    }
}

impl Simplifier {
    pub fn new(budget: SimplifyBudget) -> Self {
        Simplifier {
            budget,
            started: Instant::now(),
            operations: 0,
            memo: HashMap::new(),
        }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn budget(&self) -> &SimplifyBudget {
        &self.budget
    }

    /// Canonicalisation steps performed so far.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Simplified form of `expr`.
    pub fn simplify(&mut self, expr: &Expr) -> Result<Expr> {
        Ok(self.canonical(expr)?.to_expr())
    }

    /// Whether `expr` is identically zero.
    pub fn is_zero(&mut self, expr: &Expr) -> Result<bool> {
        Ok(self.canonical(expr)?.is_zero())
    }

    /// Whether `a` and `b` are mathematically equal.
    pub fn equivalent(&mut self, a: &Expr, b: &Expr) -> Result<bool> {
        let lhs = self.canonical(a)?;
        let rhs = self.canonical(b)?;
        Ok(lhs.sub(&rhs).is_zero())
    }

    pub fn canonical(&mut self, expr: &Expr) -> Result<RationalFunction> {
        if let Some(done) = self.memo.get(&expr.id()) {
            return Ok(done.clone());
        }
        self.tick()?;
        let result = match expr.node() {
            Node::Number(value) => RationalFunction::constant(value.clone()),
            Node::Symbol(symbol) => RationalFunction::from_atom(Atom::Symbol(symbol.clone())),
            Node::Add(terms) => {
                let mut sum = RationalFunction::zero();
                for term in terms {
                    let term = self.canonical(term)?;
                    sum = sum.add(&term).bounded()?;
                    self.tick()?;
                }
                sum
            }
            Node::Mul(factors) => {
                let mut product = RationalFunction::one();
                for factor in factors {
                    let factor = self.canonical(factor)?;
                    product = product.mul(&factor).bounded()?;
                    self.tick()?;
                }
                product
            }
            Node::Pow(base, exponent) => self.power(base, exponent)?,
            Node::Apply(function, args) => self.application(function, args)?,
        };
        self.memo.insert(expr.id(), result.clone());
        Ok(result)
    }

    fn power(&mut self, base: &Expr, exponent: &Rational) -> Result<RationalFunction> {
        self.canonical(base)?.pow_rational(exponent)
    }

    fn application(&mut self, function: &Function, args: &[Expr]) -> Result<RationalFunction> {
        let mut canonical_args = Vec::with_capacity(args.len());
        for arg in args {
            canonical_args.push(self.canonical(arg)?);
        }

        // sin(-u) = -sin(u), cos(-u) = cos(u)
        if let (Function::Sin | Function::Cos, [arg]) = (function, canonical_args.as_slice()) {
            if arg.is_negative() {
                let flipped = RationalFunction::from_atom(Atom::Apply(
                    function.clone(),
                    vec![arg.neg().to_expr()],
                ));
                return Ok(match function {
                    Function::Sin => flipped.neg(),
                    _ => flipped,
                });
            }
        }

        let rebuilt = Expr::apply(
            function.clone(),
            canonical_args.iter().map(RationalFunction::to_expr).collect(),
        );
        match rebuilt.node() {
            Node::Apply(function, args) => {
                Ok(RationalFunction::from_atom(Atom::Apply(function.clone(), args.clone())))
            }
            _ => self.canonical(&rebuilt),
        }
    }

    fn tick(&mut self) -> Result<()> {
        self.operations += 1;
        let over_operations = self
            .budget
            .max_operations
            .is_some_and(|max| self.operations > max);
        let over_time = self.operations % CLOCK_CHECK_INTERVAL == 0
            && self
                .budget
                .time_limit
                .is_some_and(|limit| self.started.elapsed() > limit);
        if over_operations || over_time {
            return Err(Error::SimplificationTimeout {
                operations: self.operations,
                limit: self.budget.describe(),
            });
        }
        Ok(())
    }
}

impl Expr {
    /// Simplified form without a budget.
    pub fn simplify(&self) -> Result<Expr> {
        Simplifier::unlimited().simplify(self)
    }

    /// Exact test for an identically vanishing expression.
    pub fn is_identically_zero(&self) -> Result<bool> {
        Simplifier::unlimited().is_zero(self)
    }

    /// Exact mathematical equality.
    pub fn equivalent(&self, other: &Expr) -> Result<bool> {
        Simplifier::unlimited().equivalent(self, other)
    }
}
