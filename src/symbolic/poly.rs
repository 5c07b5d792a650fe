//! Sparse multivariate polynomials over opaque atoms.
//!
//! Symbols, function applications and roots are all treated as independent
//! variables ("atoms"). Two relations are imposed after every multiplication:
//! `cos(u)^2 = 1 - sin(u)^2`, and `root(p, q)^q = p` for the `q`-th root of a
//! radicand `p`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use super::expr::{Expr, Function, Rational, Symbol};

/// An indivisible polynomial variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Atom {
    Symbol(Symbol),
    /// A function applied to canonical arguments
    Apply(Function, Vec<Expr>),
    /// `q`-th root of a primitive polynomial or of a non-perfect integer
    Root(Poly, u32),
}

impl Atom {
    pub fn to_expr(&self) -> Expr {
        match self {
            Atom::Symbol(symbol) => Expr::symbol(symbol),
            Atom::Apply(function, args) => Expr::apply(function.clone(), args.clone()),
            Atom::Root(radicand, index) => radicand
                .to_expr()
                .pow_rational(Rational::new(BigInt::one(), BigInt::from(*index))),
        }
    }

    pub(super) fn cos_argument(&self) -> Option<&Expr> {
        match self {
            Atom::Apply(Function::Cos, args) => args.first(),
            _ => None,
        }
    }

    pub(super) fn sin_of(argument: &Expr) -> Atom {
        Atom::Apply(Function::Sin, vec![argument.clone()])
    }

    pub(super) fn radicand(&self) -> Option<(&Poly, u32)> {
        match self {
            Atom::Root(radicand, index) => Some((radicand, *index)),
            _ => None,
        }
    }
}

/// Product of atoms with positive exponents, kept sorted by atom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Monomial(Vec<(Atom, u32)>);

impl Monomial {
    pub fn one() -> Self {
        Monomial(Vec::new())
    }

    pub fn atom(atom: Atom, exponent: u32) -> Self {
        if exponent == 0 {
            return Monomial::one();
        }
        Monomial(vec![(atom, exponent)])
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree(&self) -> u32 {
        self.0.iter().map(|(_, e)| e).sum()
    }

    pub fn factors(&self) -> &[(Atom, u32)] {
        &self.0
    }

    /// Largest exponent of any atom.
    pub fn max_exponent(&self) -> u32 {
        self.0.iter().map(|(_, e)| *e).max().unwrap_or(0)
    }

    /// Exponent sums saturate at `u32::MAX`; the simplifier rejects anything
    /// past `MAX_DEGREE` long before that.
    pub fn mul(&self, other: &Monomial) -> Monomial {
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                Ordering::Less => {
                    out.push(a[i].clone());
                    i += 1;
                }
                Ordering::Greater => {
                    out.push(b[j].clone());
                    j += 1;
                }
                Ordering::Equal => {
                    out.push((a[i].0.clone(), a[i].1.saturating_add(b[j].1)));
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        Monomial(out)
    }

    /// `self / other`, if `other` divides `self`.
    pub fn div(&self, other: &Monomial) -> Option<Monomial> {
        let mut out = Vec::with_capacity(self.0.len());
        let mut j = 0;
        for (atom, exponent) in &self.0 {
            if let Some((divisor, _)) = other.0.get(j) {
                if divisor < atom {
                    return None;
                }
            }
            match other.0.get(j) {
                Some((divisor, d)) if divisor == atom => {
                    match d.cmp(exponent) {
                        Ordering::Greater => return None,
                        Ordering::Less => out.push((atom.clone(), exponent - d)),
                        Ordering::Equal => {}
                    }
                    j += 1;
                }
                _ => out.push((atom.clone(), *exponent)),
            }
        }
        if j < other.0.len() {
            return None;
        }
        Some(Monomial(out))
    }

    /// Greatest common divisor.
    pub fn gcd(&self, other: &Monomial) -> Monomial {
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].0.cmp(&other.0[j].0) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    out.push((self.0[i].0.clone(), self.0[i].1.min(other.0[j].1)));
                    i += 1;
                    j += 1;
                }
            }
        }
        Monomial(out)
    }

    pub fn to_expr(&self) -> Expr {
        Expr::mul_all(
            self.0
                .iter()
                .map(|(atom, exponent)| atom.to_expr().powi(i64::from(*exponent))),
        )
    }
}

/// Graded lexicographic order: total degree first, then the exponent of the
/// smallest atom where the two monomials differ.
impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.degree().cmp(&other.degree()).then_with(|| {
            let (a, b) = (&self.0, &other.0);
            let (mut i, mut j) = (0, 0);
            loop {
                match (a.get(i), b.get(j)) {
                    (None, None) => return Ordering::Equal,
                    (Some(_), None) => return Ordering::Greater,
                    (None, Some(_)) => return Ordering::Less,
                    (Some((x, ex)), Some((y, ey))) => match x.cmp(y) {
                        Ordering::Equal => {
                            if ex != ey {
                                return ex.cmp(ey);
                            }
                            i += 1;
                            j += 1;
                        }
                        Ordering::Less => return Ordering::Greater,
                        Ordering::Greater => return Ordering::Less,
                    },
                }
            }
        })
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Polynomial with exact rational coefficients. Zero coefficients are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Poly {
    terms: BTreeMap<Monomial, Rational>,
}

impl Poly {
    pub fn zero() -> Self {
        Poly::default()
    }

    pub fn constant(value: Rational) -> Self {
        Poly::from_term(Monomial::one(), value)
    }

    pub fn atom(atom: Atom) -> Self {
        Poly::from_term(Monomial::atom(atom, 1), Rational::one())
    }

    pub fn from_term(monomial: Monomial, coefficient: Rational) -> Self {
        let mut poly = Poly::zero();
        poly.add_term(monomial, coefficient);
        poly
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (&Monomial, &Rational)> {
        self.terms.iter()
    }

    /// The value if the polynomial has no atoms.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::zero()),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(m, _)| m.is_one())
                .map(|(_, c)| c.clone()),
            _ => None,
        }
    }

    /// The atom if the polynomial is exactly one atom to the first power.
    pub fn as_atom(&self) -> Option<&Atom> {
        let (monomial, coefficient) = self.terms.first_key_value()?;
        match monomial.factors() {
            [(atom, 1)] if self.terms.len() == 1 && coefficient.is_one() => Some(atom),
            _ => None,
        }
    }

    pub fn max_exponent(&self) -> u32 {
        self.terms.keys().map(Monomial::max_exponent).max().unwrap_or(0)
    }

    /// Term with the greatest monomial.
    pub fn leading(&self) -> Option<(&Monomial, &Rational)> {
        self.terms.last_key_value()
    }

    pub fn add_term(&mut self, monomial: Monomial, coefficient: Rational) {
        if coefficient.is_zero() {
            return;
        }
        match self.terms.entry(monomial) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(coefficient);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                *slot.get_mut() += coefficient;
                if slot.get().is_zero() {
                    slot.remove();
                }
            }
        }
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let (mut sum, smaller) = if self.len() >= other.len() {
            (self.clone(), other)
        } else {
            (other.clone(), self)
        };
        for (m, c) in &smaller.terms {
            sum.add_term(m.clone(), c.clone());
        }
        sum
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Poly {
        Poly {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }

    pub fn scale(&self, factor: &Rational) -> Poly {
        if factor.is_zero() {
            return Poly::zero();
        }
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.clone(), c * factor))
                .collect(),
        }
    }

    /// Product in the free polynomial ring, without trigonometric reduction.
    pub fn mul_raw(&self, other: &Poly) -> Poly {
        let mut product = Poly::zero();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                product.add_term(m1.mul(m2), c1 * c2);
            }
        }
        product
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        self.mul_raw(other).reduce_roots().reduce_trig()
    }

    pub fn pow(&self, exponent: u32) -> Poly {
        let mut result = Poly::constant(Rational::one());
        let mut square = self.clone();
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.mul(&square);
            }
            remaining >>= 1;
            if remaining > 0 {
                square = square.mul(&square);
            }
        }
        result
    }

    /// Rewrites every `cos(u)^k` with `k >= 2` using `cos(u)^2 = 1 - sin(u)^2`,
    /// leaving at most a single power of each cosine.
    pub fn reduce_trig(self) -> Poly {
        let reducible = self.terms.keys().any(|m| {
            m.factors()
                .iter()
                .any(|(atom, e)| *e >= 2 && atom.cos_argument().is_some())
        });
        if !reducible {
            return self;
        }

        let mut reduced = Poly::zero();
        for (monomial, coefficient) in self.terms {
            let mut kept = Vec::new();
            let mut expansions = Vec::new();
            for (atom, exponent) in monomial.0 {
                let sin = atom.cos_argument().filter(|_| exponent >= 2).map(Atom::sin_of);
                match sin {
                    Some(sin) => {
                        expansions.push((sin, exponent / 2));
                        if exponent % 2 == 1 {
                            kept.push((atom, 1));
                        }
                    }
                    None => kept.push((atom, exponent)),
                }
            }
            let mut term = Poly::from_term(Monomial(kept), coefficient);
            for (sin, count) in expansions {
                let mut one_minus_sin2 = Poly::constant(Rational::one());
                one_minus_sin2.add_term(Monomial::atom(sin, 2), -Rational::one());
                for _ in 0..count {
                    term = term.mul_raw(&one_minus_sin2);
                }
            }
            reduced = reduced.add(&term);
        }
        reduced
    }

    /// Rewrites every `root(p, q)^k` with `k >= q` as `p^(k / q) * root(p, q)^(k % q)`.
    pub fn reduce_roots(self) -> Poly {
        let reducible = self.terms.keys().any(|m| {
            m.factors()
                .iter()
                .any(|(atom, e)| atom.radicand().is_some_and(|(_, index)| *e >= index))
        });
        if !reducible {
            return self;
        }

        let mut reduced = Poly::zero();
        for (monomial, coefficient) in self.terms {
            let mut kept = Vec::new();
            let mut expansions = Vec::new();
            for (atom, exponent) in monomial.0 {
                let expansion = atom
                    .radicand()
                    .filter(|(_, index)| exponent >= *index)
                    .map(|(radicand, index)| (radicand.pow(exponent / index), exponent % index));
                match expansion {
                    Some((power, rest)) => {
                        expansions.push(power);
                        if rest > 0 {
                            kept.push((atom, rest));
                        }
                    }
                    None => kept.push((atom, exponent)),
                }
            }
            let term = expansions
                .iter()
                .fold(Poly::from_term(Monomial(kept), coefficient), |term, power| {
                    term.mul(power)
                });
            reduced = reduced.add(&term);
        }
        reduced
    }

    /// Principal `index`-th root. Exact constant roots fold to rationals;
    /// anything else becomes a root atom of the primitive part.
    pub fn root(&self, index: u32) -> Poly {
        if index <= 1 || self.is_zero() {
            return self.clone();
        }
        if let Some(value) = self.as_constant() {
            return constant_root(&value, index);
        }
        let (scale, primitive) = self.primitive();
        constant_root(&scale, index).mul(&Poly::atom(Atom::Root(primitive, index)))
    }

    /// Largest monomial dividing every term.
    pub fn monomial_content(&self) -> Monomial {
        let mut monomials = self.terms.keys();
        let Some(first) = monomials.next() else {
            return Monomial::one();
        };
        monomials.fold(first.clone(), |acc, m| acc.gcd(m))
    }

    /// Divides every term by `divisor`, if it divides all of them.
    pub fn div_monomial(&self, divisor: &Monomial) -> Option<Poly> {
        let mut terms = BTreeMap::new();
        for (m, c) in &self.terms {
            terms.insert(m.div(divisor)?, c.clone());
        }
        Some(Poly { terms })
    }

    /// Exact quotient `self / divisor` in the free polynomial ring, or `None`
    /// when the division leaves a remainder.
    pub fn exact_div(&self, divisor: &Poly) -> Option<Poly> {
        let (lead_m, lead_c) = divisor.leading()?;
        if divisor.len() == 1 {
            let inverse = lead_c.recip();
            return self.div_monomial(lead_m).map(|q| q.scale(&inverse));
        }
        let mut remainder = self.clone();
        let mut quotient = Poly::zero();
        while let Some((m, c)) = remainder.leading() {
            let step = Poly::from_term(m.div(lead_m)?, c / lead_c);
            remainder = remainder.sub(&divisor.mul_raw(&step));
            quotient = quotient.add(&step);
        }
        Some(quotient)
    }

    /// Splits into `scale * primitive` where `primitive` has coprime integer
    /// coefficients and a positive leading coefficient.
    pub fn primitive(&self) -> (Rational, Poly) {
        let Some((_, lead)) = self.leading() else {
            return (Rational::one(), Poly::zero());
        };
        let denominators = self
            .terms
            .values()
            .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
        let numerators = self.terms.values().fold(BigInt::zero(), |acc, c| {
            acc.gcd(&(c.numer() * (&denominators / c.denom())))
        });
        let mut scale = Rational::new(numerators, denominators);
        if lead.is_negative() {
            scale = -scale;
        }
        let primitive = self.scale(&scale.recip());
        (scale, primitive)
    }

    pub fn to_expr(&self) -> Expr {
        Expr::add_all(self.terms.iter().rev().map(|(m, c)| {
            Expr::mul_all([Expr::number(c.clone()), m.to_expr()])
        }))
    }
}

/// `(n/d)^(1/q) = (n d^(q-1))^(1/q) / d`, folded when the radicand is a perfect power.
fn constant_root(value: &Rational, index: u32) -> Poly {
    let denom = value.denom();
    let radicand = value.numer() * denom.pow(index - 1);
    let magnitude = radicand.abs();
    let root = magnitude.nth_root(index);
    let real = !radicand.is_negative() || index % 2 == 1;
    if real && root.pow(index) == magnitude {
        let root = if radicand.is_negative() { -root } else { root };
        return Poly::constant(Rational::new(root, denom.clone()));
    }
    let atom = Atom::Root(Poly::constant(Rational::from_integer(radicand)), index);
    Poly::from_term(
        Monomial::atom(atom, 1),
        Rational::new(BigInt::one(), denom.clone()),
    )
}
