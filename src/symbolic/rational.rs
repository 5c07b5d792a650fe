//! Rational functions: a polynomial over a product of polynomial factors.
//!
//! Denominator factors are kept in factored form, each one normalised to
//! coprime integer coefficients with a positive leading term. Keeping them
//! factored makes common denominators cheap (a factor-wise maximum) and makes
//! cancellation a sequence of exact divisions instead of a polynomial gcd.
//!
//! Cosines and roots never appear as bare denominator factors: `1/cos(u)` is
//! kept as `cos(u)/(1 - sin(u)^2)` and `1/root(p, q)` as `root(p, q)^(q-1)/p`,
//! so they cancel against numerators written in terms of `sin(u)` and `p`.

use std::collections::BTreeMap;

use num_traits::{One, Signed, ToPrimitive};

use super::expr::{Expr, Rational};
use super::poly::{Atom, Poly};
use crate::core::error::{Error, Result};

/// Largest exponent any atom may reach in a numerator or expanded denominator.
pub const MAX_DEGREE: u32 = 1 << 24;

/// Largest root index accepted in a rational exponent.
pub const MAX_ROOT_INDEX: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalFunction {
    numerator: Poly,
    denominator: BTreeMap<Poly, u32>,
}

impl RationalFunction {
    pub fn zero() -> Self {
        RationalFunction::from_poly(Poly::zero())
    }

    pub fn one() -> Self {
        RationalFunction::constant(Rational::one())
    }

    pub fn constant(value: Rational) -> Self {
        RationalFunction::from_poly(Poly::constant(value))
    }

    pub fn from_poly(numerator: Poly) -> Self {
        RationalFunction {
            numerator,
            denominator: BTreeMap::new(),
        }
    }

    pub fn from_atom(atom: Atom) -> Self {
        RationalFunction::from_poly(Poly::atom(atom))
    }

    pub fn numerator(&self) -> &Poly {
        &self.numerator
    }

    pub fn denominator(&self) -> impl Iterator<Item = (&Poly, u32)> {
        self.denominator.iter().map(|(f, k)| (f, *k))
    }

    /// Exact zero test; canonical form makes this a structural check.
    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn as_constant(&self) -> Option<Rational> {
        if self.denominator.is_empty() {
            self.numerator.as_constant()
        } else {
            None
        }
    }

    /// Sign of the leading numerator coefficient.
    pub fn is_negative(&self) -> bool {
        self.numerator
            .leading()
            .is_some_and(|(_, coefficient)| coefficient.is_negative())
    }

    pub fn neg(&self) -> Self {
        RationalFunction {
            numerator: self.numerator.neg(),
            denominator: self.denominator.clone(),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        if other.is_zero() {
            return self.clone();
        }
        if self.is_zero() {
            return other.clone();
        }
        if self.denominator == other.denominator {
            return RationalFunction {
                numerator: self.numerator.add(&other.numerator),
                denominator: self.denominator.clone(),
            }
            .cancelled();
        }

        let mut common = self.denominator.clone();
        for (factor, k) in &other.denominator {
            let slot = common.entry(factor.clone()).or_insert(0);
            *slot = (*slot).max(*k);
        }
        let lhs = self.numerator.mul(&cofactor(&common, &self.denominator));
        let rhs = other.numerator.mul(&cofactor(&common, &other.denominator));
        RationalFunction {
            numerator: lhs.add(&rhs),
            denominator: common,
        }
        .cancelled()
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return RationalFunction::zero();
        }
        let mut denominator = self.denominator.clone();
        for (factor, k) in &other.denominator {
            *denominator.entry(factor.clone()).or_insert(0) += k;
        }
        RationalFunction {
            numerator: self.numerator.mul(&other.numerator),
            denominator,
        }
        .cancelled()
    }

    pub fn inv(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let (scale, factors) = factorize(&self.numerator);
        let numerator = expand(&self.denominator).scale(&scale.recip());
        Ok(RationalFunction {
            numerator,
            denominator: factors,
        }
        .cancelled())
    }

    /// Largest exponent of any atom across the numerator and the expanded
    /// denominator.
    pub fn degree(&self) -> u64 {
        let denominator = self
            .denominator
            .iter()
            .map(|(factor, k)| u64::from(factor.max_exponent()) * u64::from(*k))
            .sum();
        u64::from(self.numerator.max_exponent()).max(denominator)
    }

    /// Rejects values whose degree exceeds [`MAX_DEGREE`].
    pub fn bounded(self) -> Result<Self> {
        let degree = self.degree();
        if degree > u64::from(MAX_DEGREE) {
            return Err(Error::InvalidParameter(format!(
                "degree {degree} exceeds the limit of {MAX_DEGREE}"
            )));
        }
        Ok(self)
    }

    pub fn powi(&self, exponent: i64) -> Result<Self> {
        if exponent == 0 || self.as_constant().is_some_and(|value| value.is_one()) {
            return Ok(RationalFunction::one());
        }
        if self.is_zero() {
            return if exponent > 0 {
                Ok(RationalFunction::zero())
            } else {
                Err(Error::DivisionByZero)
            };
        }
        let reach = exponent.unsigned_abs().saturating_mul(self.degree().max(1));
        if reach > u64::from(MAX_DEGREE) {
            return Err(Error::InvalidParameter(format!(
                "power {exponent} exceeds the degree limit of {MAX_DEGREE}"
            )));
        }
        if exponent < 0 {
            return self.inv()?.powi(-exponent);
        }
        let mut result = RationalFunction::one();
        let mut square = self.clone();
        let mut remaining = exponent.unsigned_abs();
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.mul(&square);
            }
            remaining >>= 1;
            if remaining > 0 {
                square = square.mul(&square);
            }
        }
        Ok(result)
    }

    /// `self^exponent` for a rational `p/q`. The `q`-th root is taken of the
    /// numerator and of the expanded denominator separately.
    pub fn pow_rational(&self, exponent: &Rational) -> Result<Self> {
        let out_of_range =
            || Error::InvalidParameter(format!("exponent {exponent} is out of range"));
        let index = exponent
            .denom()
            .to_u32()
            .filter(|index| *index <= MAX_ROOT_INDEX)
            .ok_or_else(out_of_range)?;
        let power = exponent.numer().to_i64().ok_or_else(out_of_range)?;
        if index == 1 {
            return self.powi(power);
        }
        if self.is_zero() {
            return if power > 0 {
                Ok(RationalFunction::zero())
            } else {
                Err(Error::DivisionByZero)
            };
        }

        // (n/d)^(1/q) = n^(1/q) * d^((q-1)/q) / d
        let denominator = expand(&self.denominator);
        let root = RationalFunction {
            numerator: self
                .numerator
                .root(index)
                .mul(&denominator.root(index).pow(index - 1)),
            denominator: self.denominator.clone(),
        }
        .cancelled();

        let whole = power.div_euclid(i64::from(index));
        let rest = power.rem_euclid(i64::from(index));
        self.powi(whole)?.mul(&root.powi(rest)?).bounded()
    }

    pub fn to_expr(&self) -> Expr {
        let numerator = self.numerator.to_expr();
        if self.denominator.is_empty() {
            return numerator;
        }
        let mut factors = vec![numerator];
        for (factor, k) in &self.denominator {
            factors.push(factor.to_expr().powi(-i64::from(*k)));
        }
        Expr::mul_all(factors)
    }

    /// Removes every denominator factor that divides the numerator exactly.
    fn cancelled(mut self) -> Self {
        if self.numerator.is_zero() {
            self.denominator.clear();
            return self;
        }
        self.rationalize();
        let mut remaining = BTreeMap::new();
        for (factor, mut k) in std::mem::take(&mut self.denominator) {
            while k > 0 {
                match self.numerator.exact_div(&factor) {
                    Some(quotient) => {
                        self.numerator = quotient.reduce_trig();
                        k -= 1;
                    }
                    None => break,
                }
            }
            if k > 0 {
                remaining.insert(factor, k);
            }
        }
        self.denominator = remaining;
        self
    }
}

impl RationalFunction {
    /// Moves cosine and root atoms out of the denominator. `cos(u)^2` is
    /// replaced by `-(sin(u) - 1)(sin(u) + 1)` and `root(p, q)^q` by the
    /// factors of `p`, after multiplying the numerator up to a full period.
    fn rationalize(&mut self) {
        loop {
            let next = self
                .denominator
                .iter()
                .find(|(factor, _)| factor.as_atom().is_some_and(is_algebraic))
                .map(|(factor, k)| (factor.clone(), *k));
            let Some((factor, k)) = next else {
                break;
            };
            self.denominator.remove(&factor);
            let Some((period, scale, replacement)) = factor.as_atom().and_then(period_of) else {
                continue;
            };
            let missing = (period - k % period) % period;
            self.numerator = self.numerator.mul(&factor.pow(missing));
            let periods = (k + missing) / period;
            self.numerator = self.numerator.scale(&pow(&scale.recip(), periods));
            for (replacement, multiplicity) in replacement {
                *self.denominator.entry(replacement).or_insert(0) += multiplicity * periods;
            }
        }
    }
}

fn is_algebraic(atom: &Atom) -> bool {
    atom.cos_argument().is_some() || atom.radicand().is_some()
}

/// Power of the atom that rewrites into polynomial factors, as
/// `(period, scale, factors)` with `atom^period = scale * product(factors)`.
fn period_of(atom: &Atom) -> Option<(u32, Rational, BTreeMap<Poly, u32>)> {
    if let Some(argument) = atom.cos_argument() {
        let sin = Poly::atom(Atom::sin_of(argument));
        let one = Poly::constant(Rational::one());
        let factors = BTreeMap::from([(sin.sub(&one), 1), (sin.add(&one), 1)]);
        return Some((2, -Rational::one(), factors));
    }
    let (radicand, index) = atom.radicand()?;
    let (scale, factors) = factorize(radicand);
    Some((index, scale, factors))
}

fn pow(value: &Rational, exponent: u32) -> Rational {
    (0..exponent).fold(Rational::one(), |acc, _| acc * value)
}

/// Product of `common` factors not already present in `own`.
fn cofactor(common: &BTreeMap<Poly, u32>, own: &BTreeMap<Poly, u32>) -> Poly {
    let mut product = Poly::constant(Rational::one());
    for (factor, k) in common {
        let missing = k - own.get(factor).copied().unwrap_or(0);
        if missing > 0 {
            product = product.mul(&factor.pow(missing));
        }
    }
    product
}

fn expand(factors: &BTreeMap<Poly, u32>) -> Poly {
    factors
        .iter()
        .fold(Poly::constant(Rational::one()), |acc, (factor, k)| {
            acc.mul(&factor.pow(*k))
        })
}

/// Splits a nonzero polynomial into `scale * product(factor^k)`.
///
/// Each atom of the monomial content becomes its own factor; what is left is
/// taken as a single primitive factor.
fn factorize(poly: &Poly) -> (Rational, BTreeMap<Poly, u32>) {
    let content = poly.monomial_content();
    let rest = poly.div_monomial(&content).unwrap_or_else(|| poly.clone());
    let mut factors = BTreeMap::new();
    for (atom, k) in content.factors() {
        *factors.entry(Poly::atom(atom.clone())).or_insert(0) += k;
    }
    let scale = match rest.as_constant() {
        Some(value) => value,
        None => {
            let (scale, primitive) = rest.primitive();
            *factors.entry(primitive).or_insert(0) += 1;
            scale
        }
    };
    (scale, factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::expr::{Function, Symbol};
    use num_bigint::BigInt;

    fn var(name: &str) -> RationalFunction {
        RationalFunction::from_atom(Atom::Symbol(Symbol::new(name)))
    }

    fn int(n: i64) -> RationalFunction {
        RationalFunction::constant(Rational::from_integer(BigInt::from(n)))
    }

    #[test]
    fn test_inverse_cancels() {
        let x = var("x");
        let product = x.mul(&x.inv().unwrap());
        assert_eq!(product, RationalFunction::one());
    }

    #[test]
    fn test_common_denominator() {
        // 1/x + 1/y - (x + y)/(x*y) = 0
        let x = var("x");
        let y = var("y");
        let lhs = x.inv().unwrap().add(&y.inv().unwrap());
        let rhs = x.add(&y).mul(&x.mul(&y).inv().unwrap());
        assert!(lhs.sub(&rhs).is_zero());
    }

    #[test]
    fn test_polynomial_factor_cancels() {
        // (x^2 - 1)/(x - 1) = x + 1
        let x = var("x");
        let numerator = x.mul(&x).sub(&int(1));
        let quotient = numerator.mul(&x.sub(&int(1)).inv().unwrap());
        assert_eq!(quotient, x.add(&int(1)));
    }

    #[test]
    fn test_denominator_normalisation() {
        // 1/(2 - 2x) and -1/(2x - 2) are the same object
        let x = var("x");
        let a = int(2).sub(&int(2).mul(&x)).inv().unwrap();
        let b = int(2).mul(&x).sub(&int(2)).inv().unwrap().neg();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_inverse_fails() {
        let x = var("x");
        assert_eq!(x.sub(&x).inv(), Err(Error::DivisionByZero));
    }

    #[test]
    fn test_cosine_denominator_cancels() {
        let x = Expr::var("x");
        let cos = RationalFunction::from_atom(Atom::Apply(Function::Cos, vec![x.clone()]));
        let sin = RationalFunction::from_atom(Atom::Apply(Function::Sin, vec![x]));
        // (1 - sin^2)/cos^2 = 1
        let ratio = int(1)
            .sub(&sin.mul(&sin))
            .mul(&cos.powi(-2).unwrap());
        assert_eq!(ratio, RationalFunction::one());
        // cos^2/cos = cos
        assert_eq!(cos.mul(&cos).mul(&cos.inv().unwrap()), cos);
        // no bare cosine is left in a denominator
        assert!(cos
            .powi(-3)
            .unwrap()
            .denominator()
            .all(|(factor, _)| factor.as_atom().is_none()));
    }

    #[test]
    fn test_roots() {
        let x = var("x");
        let half = Rational::new(BigInt::from(1), BigInt::from(2));
        let root = x.pow_rational(&half).unwrap();
        assert_eq!(root.mul(&root), x);
        // x / sqrt(x) = sqrt(x)
        assert_eq!(x.mul(&root.inv().unwrap()), root);
        // (1/4)^(1/2) = 1/2 and 4^(-3/2) = 1/8
        let quarter = RationalFunction::constant(Rational::new(BigInt::from(1), BigInt::from(4)));
        assert_eq!(quarter.pow_rational(&half).unwrap(), int(2).inv().unwrap());
        let minus_three_halves = Rational::new(BigInt::from(-3), BigInt::from(2));
        assert_eq!(
            int(4).pow_rational(&minus_three_halves).unwrap(),
            int(8).inv().unwrap()
        );
        // (x/y)^(1/2) * (y/x)^(1/2) = 1
        let y = var("y");
        let ratio = x.mul(&y.inv().unwrap());
        let product = ratio
            .pow_rational(&half)
            .unwrap()
            .mul(&ratio.inv().unwrap().pow_rational(&half).unwrap());
        assert_eq!(product, RationalFunction::one());
    }

    #[test]
    fn test_degree_limit() {
        let x = var("x");
        assert!(matches!(
            x.powi(i64::from(MAX_DEGREE) + 1),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(x.powi(i64::MIN), Err(Error::InvalidParameter(_))));
        let big = x.powi(i64::from(MAX_DEGREE / 2 + 1)).unwrap();
        assert!(matches!(big.mul(&big).bounded(), Err(Error::InvalidParameter(_))));
        assert_eq!(int(1).powi(i64::MAX).unwrap(), RationalFunction::one());
    }

    #[test]
    fn test_negative_powers() {
        let x = var("x");
        let cube = x.powi(3).unwrap();
        let inverse_square = x.powi(-2).unwrap();
        assert_eq!(cube.mul(&inverse_square), x);
        assert_eq!(x.powi(0).unwrap(), RationalFunction::one());
    }
}
