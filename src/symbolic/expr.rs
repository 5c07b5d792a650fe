//! Expression DAG for the symbolic engine.
//!
//! An [`Expr`] is a reference-counted handle to an immutable node. Cloning is
//! O(1) and lets one sub-expression be shared by many parents, which is what
//! the curvature builders do constantly (every Christoffel symbol is reused in
//! dozens of Riemann components). Each allocation carries a unique [`NodeId`]
//! so that caches can be keyed by node identity rather than by structure.
//!
//! The smart constructors only do cheap local cleanup: flattening nested sums
//! and products, folding numeric constants and dropping neutral elements.
//! Anything deeper is the job of [`crate::symbolic::Simplifier`].

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::rational::MAX_DEGREE;

/// Exact rational number used for every numeric constant.
pub type Rational = BigRational;

/// Global counter for node identities.
static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_node_id() -> NodeId {
    NodeId(NODE_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed))
}

/// Identity of one node allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// A named variable. Two symbols are equal when their names are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

/// Functions an expression can apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    Sin,
    Cos,
    Exp,
    Ln,
    /// An unspecified function such as `A(r)`.
    ///
    /// `derivatives[k]` counts the partial derivatives taken with respect to
    /// argument `k`, so `A'(r)` is `Undefined { name: "A", derivatives: [1] }`.
    Undefined { name: Arc<str>, derivatives: Vec<u32> },
}

impl Function {
    /// An undefined function of `arity` arguments with no derivatives taken.
    pub fn undefined(name: &str, arity: usize) -> Self {
        Function::Undefined {
            name: Arc::from(name),
            derivatives: vec![0; arity],
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Undefined { name, .. } => name,
        }
    }

    /// Same function with one more derivative taken in argument `arg`.
    pub(crate) fn differentiated(&self, arg: usize) -> Function {
        match self {
            Function::Undefined { name, derivatives } => {
                let mut derivatives = derivatives.clone();
                if let Some(count) = derivatives.get_mut(arg) {
                    *count += 1;
                }
                Function::Undefined {
                    name: name.clone(),
                    derivatives,
                }
            }
            other => other.clone(),
        }
    }
}

/// The operation stored in a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// Exact rational constant
    Number(Rational),
    Symbol(Symbol),
    /// Sum of at least two terms
    Add(Vec<Expr>),
    /// Product of at least two factors; a numeric coefficient comes first
    Mul(Vec<Expr>),
    /// Base raised to a constant rational exponent
    Pow(Expr, Rational),
    Apply(Function, Vec<Expr>),
}

#[derive(Debug)]
struct Inner {
    id: NodeId,
    node: Node,
}

/// A symbolic expression.
///
/// Equality, ordering and hashing are structural: `x*y` and `y*x` are
/// different expressions. Use [`Expr::equivalent`] for mathematical equality.
#[derive(Clone)]
pub struct Expr(Arc<Inner>);

impl Expr {
    pub(crate) fn from_node(node: Node) -> Self {
        Expr(Arc::new(Inner {
            id: next_node_id(),
            node,
        }))
    }

    pub fn number(value: Rational) -> Self {
        Expr::from_node(Node::Number(value))
    }

    pub fn integer(value: i64) -> Self {
        Expr::number(Rational::from_integer(BigInt::from(value)))
    }

    /// The constant `numer/denom`.
    ///
    /// # Panics
    /// Panics if `denom` is zero.
    pub fn rational(numer: i64, denom: i64) -> Self {
        Expr::number(Rational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn symbol(symbol: &Symbol) -> Self {
        Expr::from_node(Node::Symbol(symbol.clone()))
    }

    /// Shorthand for a symbol expression by name.
    pub fn var(name: &str) -> Self {
        Expr::symbol(&Symbol::new(name))
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn node(&self) -> &Node {
        &self.0.node
    }

    pub fn as_number(&self) -> Option<&Rational> {
        match self.node() {
            Node::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self.node() {
            Node::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Sum of `terms`, flattened and with constants folded.
    pub fn add_all<I: IntoIterator<Item = Expr>>(terms: I) -> Expr {
        let mut constant = Rational::zero();
        let mut flat = Vec::new();
        for term in terms {
            if let Node::Number(value) = term.node() {
                constant += value;
                continue;
            }
            if let Node::Add(inner) = term.node() {
                for t in inner {
                    match t.node() {
                        Node::Number(value) => constant += value,
                        _ => flat.push(t.clone()),
                    }
                }
                continue;
            }
            flat.push(term);
        }
        if !constant.is_zero() {
            flat.insert(0, Expr::number(constant));
        }
        match flat.len() {
            0 => Expr::zero(),
            1 => flat.swap_remove(0),
            _ => Expr::from_node(Node::Add(flat)),
        }
    }

    /// Product of `factors`, flattened and with constants folded.
    ///
    /// A zero factor collapses the whole product to zero.
    pub fn mul_all<I: IntoIterator<Item = Expr>>(factors: I) -> Expr {
        let mut coefficient = Rational::one();
        let mut flat = Vec::new();
        for factor in factors {
            if let Node::Number(value) = factor.node() {
                coefficient *= value;
                continue;
            }
            if let Node::Mul(inner) = factor.node() {
                for f in inner {
                    match f.node() {
                        Node::Number(value) => coefficient *= value,
                        _ => flat.push(f.clone()),
                    }
                }
                continue;
            }
            flat.push(factor);
        }
        if coefficient.is_zero() {
            return Expr::zero();
        }
        if flat.is_empty() {
            return Expr::number(coefficient);
        }
        if !coefficient.is_one() {
            flat.insert(0, Expr::number(coefficient));
        }
        match flat.len() {
            1 => flat.swap_remove(0),
            _ => Expr::from_node(Node::Mul(flat)),
        }
    }

    /// Raise to an integer power.
    pub fn powi(&self, exponent: i64) -> Expr {
        self.pow_rational(Rational::from_integer(BigInt::from(exponent)))
    }

    /// Raise to a constant rational power.
    pub fn pow_rational(&self, exponent: Rational) -> Expr {
        if exponent.is_zero() {
            return Expr::one();
        }
        if exponent.is_one() {
            return self.clone();
        }
        if let Node::Number(base) = self.node() {
            if base.is_one() {
                return Expr::one();
            }
            if exponent.is_integer() {
                let folded = exponent.to_integer().to_i64().and_then(|n| rational_powi(base, n));
                if let Some(value) = folded {
                    return Expr::number(value);
                }
            }
        }
        if let Node::Pow(base, inner) = self.node() {
            if exponent.is_integer() {
                return base.pow_rational(inner * &exponent);
            }
        }
        Expr::from_node(Node::Pow(self.clone(), exponent))
    }

    pub fn recip(&self) -> Expr {
        self.powi(-1)
    }

    pub fn sqrt(&self) -> Expr {
        self.pow_rational(Rational::new(BigInt::from(1), BigInt::from(2)))
    }

    pub fn sin(&self) -> Expr {
        Expr::apply(Function::Sin, vec![self.clone()])
    }

    pub fn cos(&self) -> Expr {
        Expr::apply(Function::Cos, vec![self.clone()])
    }

    pub fn exp(&self) -> Expr {
        Expr::apply(Function::Exp, vec![self.clone()])
    }

    pub fn ln(&self) -> Expr {
        Expr::apply(Function::Ln, vec![self.clone()])
    }

    /// Apply an undefined function, e.g. `Expr::function("A", &[r])` for `A(r)`.
    pub fn function(name: &str, args: &[Expr]) -> Expr {
        Expr::apply(Function::undefined(name, args.len()), args.to_vec())
    }

    /// Apply `function`, folding the trivial values at zero and one.
    pub(crate) fn apply(function: Function, args: Vec<Expr>) -> Expr {
        if let [arg] = args.as_slice() {
            match function {
                Function::Sin if arg.is_zero() => return Expr::zero(),
                Function::Cos | Function::Exp if arg.is_zero() => return Expr::one(),
                Function::Ln if arg.is_one() => return Expr::zero(),
                _ => {}
            }
        }
        Expr::from_node(Node::Apply(function, args))
    }

    /// Symbols occurring anywhere in the expression.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut seen = HashSet::new();
        let mut symbols = BTreeSet::new();
        let mut stack = vec![self.clone()];
        while let Some(expr) = stack.pop() {
            if !seen.insert(expr.id()) {
                continue;
            }
            match expr.node() {
                Node::Number(_) => {}
                Node::Symbol(symbol) => {
                    symbols.insert(symbol.clone());
                }
                Node::Add(children) | Node::Mul(children) | Node::Apply(_, children) => {
                    stack.extend(children.iter().cloned());
                }
                Node::Pow(base, _) => stack.push(base.clone()),
            }
        }
        symbols
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.free_symbols().contains(symbol)
    }
}

/// `base^n` for rationals; `None` for zero raised to a negative power and for
/// powers beyond the degree limit, which stay symbolic.
fn rational_powi(base: &Rational, n: i64) -> Option<Rational> {
    if (n < 0 && base.is_zero()) || n.unsigned_abs() > u64::from(MAX_DEGREE) {
        return None;
    }
    let mut result = Rational::one();
    let mut square = base.clone();
    let mut remaining = n.unsigned_abs();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result *= &square;
        }
        square = &square * &square;
        remaining >>= 1;
    }
    Some(if n < 0 { result.recip() } else { result })
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.node == other.0.node
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.node.hash(state);
    }
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Expr {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Ordering::Equal;
        }
        self.0.node.cmp(&other.0.node)
    }
}

impl Zero for Expr {
    fn zero() -> Self {
        Expr::number(Rational::zero())
    }

    fn is_zero(&self) -> bool {
        matches!(self.node(), Node::Number(value) if value.is_zero())
    }
}

impl One for Expr {
    fn one() -> Self {
        Expr::number(Rational::one())
    }

    fn is_one(&self) -> bool {
        matches!(self.node(), Node::Number(value) if value.is_one())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::integer(value)
    }
}

impl From<Rational> for Expr {
    fn from(value: Rational) -> Self {
        Expr::number(value)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::from_node(Node::Symbol(symbol))
    }
}

impl From<&Symbol> for Expr {
    fn from(symbol: &Symbol) -> Self {
        Expr::symbol(symbol)
    }
}

// === Operator overloads ===

fn add_pair(lhs: Expr, rhs: Expr) -> Expr {
    Expr::add_all([lhs, rhs])
}

fn sub_pair(lhs: Expr, rhs: Expr) -> Expr {
    Expr::add_all([lhs, -rhs])
}

fn mul_pair(lhs: Expr, rhs: Expr) -> Expr {
    Expr::mul_all([lhs, rhs])
}

fn div_pair(lhs: Expr, rhs: Expr) -> Expr {
    Expr::mul_all([lhs, rhs.recip()])
}

macro_rules! impl_binary_op {
    ($op:ident, $method:ident, $build:ident) => {
        impl std::ops::$op<Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $build(self, rhs)
            }
        }

        impl std::ops::$op<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $build(self, rhs.clone())
            }
        }

        impl std::ops::$op<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $build(self.clone(), rhs)
            }
        }

        impl std::ops::$op<&Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $build(self.clone(), rhs.clone())
            }
        }
    };
}

impl_binary_op!(Add, add, add_pair);
impl_binary_op!(Sub, sub, sub_pair);
impl_binary_op!(Mul, mul, mul_pair);
impl_binary_op!(Div, div, div_pair);

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::mul_all([Expr::integer(-1), self])
    }
}

impl std::ops::Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        -self.clone()
    }
}

impl std::iter::Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        Expr::add_all(iter)
    }
}

impl<'a> std::iter::Sum<&'a Expr> for Expr {
    fn sum<I: Iterator<Item = &'a Expr>>(iter: I) -> Expr {
        Expr::add_all(iter.cloned())
    }
}

impl std::iter::Product for Expr {
    fn product<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        Expr::mul_all(iter)
    }
}

// === Printing ===

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

fn precedence(expr: &Expr) -> u8 {
    match expr.node() {
        Node::Number(value) if value.is_negative() || !value.is_integer() => PREC_MUL,
        Node::Number(_) | Node::Symbol(_) | Node::Apply(..) => PREC_ATOM,
        Node::Add(_) => PREC_ADD,
        Node::Mul(_) => PREC_MUL,
        Node::Pow(_, exponent) if exponent.is_negative() => PREC_MUL,
        Node::Pow(..) => PREC_POW,
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, parent: u8) -> fmt::Result {
    if precedence(expr) < parent {
        f.write_str("(")?;
        write_node(f, expr)?;
        return f.write_str(")");
    }
    write_node(f, expr)
}

fn write_node(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr.node() {
        Node::Number(value) => write!(f, "{value}"),
        Node::Symbol(symbol) => write!(f, "{symbol}"),
        Node::Add(terms) => {
            for (i, term) in terms.iter().enumerate() {
                match (i, negated_term(term)) {
                    (0, _) => write_expr(f, term, PREC_ADD)?,
                    (_, Some(positive)) => {
                        f.write_str(" - ")?;
                        write_expr(f, &positive, PREC_MUL)?;
                    }
                    (_, None) => {
                        f.write_str(" + ")?;
                        write_expr(f, term, PREC_ADD)?;
                    }
                }
            }
            Ok(())
        }
        Node::Mul(factors) => write_product(f, factors),
        Node::Pow(_, exponent) if exponent.is_negative() => {
            write_product(f, std::slice::from_ref(expr))
        }
        Node::Pow(base, exponent) => {
            write_expr(f, base, PREC_ATOM)?;
            if exponent.is_integer() {
                write!(f, "^{exponent}")
            } else {
                write!(f, "^({exponent})")
            }
        }
        Node::Apply(function, args) => {
            write_function_name(f, function)?;
            f.write_str("(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_expr(f, arg, 0)?;
            }
            f.write_str(")")
        }
    }
}

fn write_function_name(f: &mut fmt::Formatter<'_>, function: &Function) -> fmt::Result {
    match function {
        Function::Undefined { name, derivatives } => {
            f.write_str(name)?;
            match derivatives.as_slice() {
                [order @ 1..=3] => f.write_str(&"'".repeat(*order as usize)),
                [order] if *order > 3 => write!(f, "^({order})"),
                orders if orders.iter().any(|order| *order > 0) => {
                    let orders: Vec<String> = orders.iter().map(u32::to_string).collect();
                    write!(f, "^({})", orders.join(","))
                }
                _ => Ok(()),
            }
        }
        builtin => f.write_str(builtin.name()),
    }
}

/// Writes `coef*a*b/(c*d)` for a product, pulling negative powers below the bar.
fn write_product(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    let mut coefficient = Rational::one();
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors {
        match factor.node() {
            Node::Number(value) => coefficient *= value,
            Node::Pow(base, exponent) if exponent.is_negative() => {
                denominator.push(base.pow_rational(-exponent))
            }
            _ => numerator.push(factor),
        }
    }
    if coefficient.is_negative() {
        f.write_str("-")?;
        coefficient = -coefficient;
    }

    let mut written = false;
    if !coefficient.numer().is_one() || numerator.is_empty() {
        write!(f, "{}", coefficient.numer())?;
        written = true;
    }
    for factor in numerator {
        if written {
            f.write_str("*")?;
        }
        write_expr(f, factor, PREC_MUL)?;
        written = true;
    }

    let denom_coefficient = coefficient.denom();
    let below = denominator.len() + usize::from(!denom_coefficient.is_one());
    if below == 0 {
        return Ok(());
    }
    f.write_str("/")?;
    if below > 1 {
        f.write_str("(")?;
    }
    let mut first = true;
    if !denom_coefficient.is_one() {
        write!(f, "{denom_coefficient}")?;
        first = false;
    }
    for factor in &denominator {
        if !first {
            f.write_str("*")?;
        }
        write_expr(f, factor, if below > 1 { PREC_MUL } else { PREC_POW })?;
        first = false;
    }
    if below > 1 {
        f.write_str(")")?;
    }
    Ok(())
}

/// For a term printed with a leading minus, the positive counterpart.
fn negated_term(term: &Expr) -> Option<Expr> {
    match term.node() {
        Node::Number(value) if value.is_negative() => Some(Expr::number(-value)),
        Node::Mul(factors) => match factors.first().map(Expr::node) {
            Some(Node::Number(value)) if value.is_negative() => {
                let mut positive = factors.clone();
                positive[0] = Expr::number(-value);
                Some(Expr::mul_all(positive))
            }
            _ => None,
        },
        _ => None,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self, 0)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_folding() {
        let x = Expr::var("x");
        let sum = Expr::integer(2) + &x + Expr::integer(3);
        assert_eq!(sum.to_string(), "5 + x");

        let product = Expr::integer(2) * &x * Expr::rational(1, 2);
        assert_eq!(product, x);

        assert!((Expr::integer(0) * &x).is_zero());
        assert!((&x - &x).to_string() == "x - x");
    }

    #[test]
    fn test_neutral_elements() {
        let x = Expr::var("x");
        assert_eq!(&x + Expr::zero(), x);
        assert_eq!(&x * Expr::one(), x);
        assert_eq!(x.powi(1), x);
        assert!(x.powi(0).is_one());
    }

    #[test]
    fn test_power_folding() {
        assert_eq!(Expr::integer(2).powi(-2), Expr::rational(1, 4));
        let x = Expr::var("x");
        assert_eq!(x.powi(2).powi(3), x.powi(6));
        // Zero to a negative power stays symbolic so the simplifier can report it
        assert!(matches!(Expr::zero().powi(-1).node(), Node::Pow(..)));
    }

    #[test]
    fn test_function_folding() {
        let zero = Expr::zero();
        assert!(zero.sin().is_zero());
        assert!(zero.cos().is_one());
        assert!(zero.exp().is_one());
        assert!(Expr::one().ln().is_zero());
    }

    #[test]
    fn test_structural_equality_and_identity() {
        let a = Expr::var("x") * Expr::var("y");
        let b = Expr::var("x") * Expr::var("y");
        assert_eq!(a, b);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_display() {
        let r = Expr::var("r");
        let theta = Expr::var("theta");
        assert_eq!((Expr::integer(4) / r.powi(4)).to_string(), "4/r^4");
        assert_eq!((-theta.sin().powi(2)).to_string(), "-sin(theta)^2");
        assert_eq!((Expr::integer(1) - &r).to_string(), "1 - r");
        assert_eq!(
            ((&r + Expr::one()) * &theta).to_string(),
            "(1 + r)*theta"
        );
        assert_eq!(r.sqrt().to_string(), "r^(1/2)");
        assert_eq!((Expr::rational(1, 2) * &r / &theta).to_string(), "r/(2*theta)");
    }

    #[test]
    fn test_display_derivatives() {
        let r = Expr::var("r");
        let a = Function::undefined("A", 1).differentiated(0);
        assert_eq!(Expr::apply(a, vec![r.clone()]).to_string(), "A'(r)");

        let f = Function::undefined("f", 2).differentiated(1);
        let applied = Expr::apply(f, vec![r.clone(), Expr::var("t")]);
        assert_eq!(applied.to_string(), "f^(0,1)(r, t)");
    }

    #[test]
    fn test_free_symbols() {
        let expr = Expr::var("x") * Expr::var("y").sin() + Expr::integer(3);
        let names: Vec<String> = expr
            .free_symbols()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(!expr.contains(&Symbol::new("z")));
    }

    #[test]
    fn test_sum_and_product_iterators() {
        let terms = vec![Expr::var("a"), Expr::var("b")];
        let sum: Expr = terms.iter().sum();
        assert_eq!(sum.to_string(), "a + b");
        let empty: Expr = Vec::<Expr>::new().into_iter().sum();
        assert!(empty.is_zero());
        let product: Expr = terms.into_iter().product();
        assert_eq!(product.to_string(), "a*b");
    }
}
