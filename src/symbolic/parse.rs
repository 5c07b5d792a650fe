//! Expression parser for metric files and the command line.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | ident '(' expr (',' expr)* ')' | ident | '(' expr ')'
//! ```
//!
//! Exponents must fold to rational constants. `sin`, `cos`, `exp`, `ln`
//! (alias `log`) and `sqrt` are built in; any other call is an undefined
//! function of its arguments.

use std::fmt;
use std::ops::Range;

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use chumsky::Stream;
use num_bigint::BigInt;

use super::expr::{Expr, Rational, Symbol};
use crate::core::error::{Error, Result};

/// Character range of a token in the source
type Span = Range<usize>;

/// Parse a complete expression.
pub fn parse(source: &str) -> Result<Expr> {
    let tokens = lexer()
        .parse(source)
        .map_err(|errors| parse_error(source, &errors, describe_char_error))?;

    let eoi = source.chars().count();
    expression()
        .then_ignore(end())
        .parse(Stream::from_iter(eoi..eoi + 1, tokens.into_iter()))
        .map_err(|errors| parse_error(source, &errors, describe_token_error))
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Token {
    Number(Rational),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "number {value}"),
            Token::Ident(name) => write!(f, "identifier '{name}'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Caret => write!(f, "'^'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Comma => write!(f, "','"),
        }
    }
}

fn lexer() -> impl Parser<char, Vec<(Token, Span)>, Error = Simple<char>> {
    let digits = filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>();

    // `12`, `12.`, `12.5` or `.5`
    let number = digits
        .clone()
        .then(just('.').ignore_then(digits.clone().or_not()).or_not())
        .map(|(whole, fraction)| (whole, fraction.flatten().unwrap_or_default()))
        .or(just('.')
            .ignore_then(digits)
            .map(|fraction| (String::new(), fraction)))
        .try_map(|(whole, fraction), span| {
            decimal(&whole, &fraction).map(Token::Number).ok_or_else(|| {
                Simple::custom(span, format!("invalid number '{whole}.{fraction}'"))
            })
        });

    // Unicode letters are allowed, so `θ` can name a coordinate
    let ident = filter(|c: &char| c.is_alphabetic() || *c == '_')
        .chain(filter(|c: &char| c.is_alphanumeric() || *c == '_').repeated())
        .collect::<String>()
        .map(Token::Ident);

    // `**` before `*`
    let punctuation = choice((
        just("**").to(Token::Caret),
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('^').to(Token::Caret),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
    ));

    choice((number, ident, punctuation))
        .map_with_span(|token, span| (token, span))
        .padded()
        .repeated()
        .then_ignore(end())
}

fn decimal(whole: &str, fraction: &str) -> Option<Rational> {
    let numer: BigInt = format!("{whole}{fraction}").parse().ok()?;
    let denom = num_traits::pow(BigInt::from(10), fraction.len());
    Some(Rational::new(numer, denom))
}

#[derive(Clone, Copy)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn apply(self, lhs: Expr, rhs: Expr) -> Expr {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
        }
    }
}

fn expression() -> impl Parser<Token, Expr, Error = Simple<Token>> + Clone {
    recursive(|expr| {
        let number = select! { Token::Number(value) => Expr::number(value) };
        let name = select! { Token::Ident(name) => name };

        let arguments = expr
            .clone()
            .separated_by(just(Token::Comma))
            .at_least(1)
            .delimited_by(just(Token::LParen), just(Token::RParen));
        let call = name
            .clone()
            .then(arguments)
            .try_map(|(name, args), span| {
                apply_function(&name, args).map_err(|message| Simple::custom(span, message))
            });
        let variable = name.map(|name| Expr::symbol(&Symbol::new(&name)));
        let group = expr.delimited_by(just(Token::LParen), just(Token::RParen));

        let primary = choice((number, call, variable, group));

        let unary = recursive(|unary| {
            let exponent = just(Token::Caret)
                .ignore_then(unary.clone().map_with_span(|e: Expr, span: Span| (e, span)));
            let power = primary
                .clone()
                .then(exponent.or_not())
                .try_map(|(base, exponent): (Expr, Option<(Expr, Span)>), _| match exponent {
                    None => Ok(base),
                    Some((exponent, span)) => match exponent.as_number() {
                        Some(value) => Ok(base.pow_rational(value.clone())),
                        None => Err(Simple::custom(
                            span,
                            format!("exponent '{exponent}' is not a rational constant"),
                        )),
                    },
                });

            choice((
                just(Token::Minus).ignore_then(unary.clone()).map(|e: Expr| -e),
                just(Token::Plus).ignore_then(unary),
                power,
            ))
        });

        let product_op = just(Token::Star)
            .to(BinaryOp::Mul)
            .or(just(Token::Slash).to(BinaryOp::Div));
        let term = unary
            .clone()
            .then(product_op.then(unary).repeated())
            .foldl(|lhs, (op, rhs)| op.apply(lhs, rhs));

        let sum_op = just(Token::Plus)
            .to(BinaryOp::Add)
            .or(just(Token::Minus).to(BinaryOp::Sub));
        term.clone()
            .then(sum_op.then(term).repeated())
            .foldl(|lhs, (op, rhs)| op.apply(lhs, rhs))
    })
}

fn apply_function(name: &str, args: Vec<Expr>) -> std::result::Result<Expr, String> {
    let unary = |f: fn(&Expr) -> Expr| match args.as_slice() {
        [arg] => Ok(f(arg)),
        _ => Err(format!("{name} takes one argument, got {}", args.len())),
    };
    match name {
        "sin" => unary(Expr::sin),
        "cos" => unary(Expr::cos),
        "exp" => unary(Expr::exp),
        "ln" | "log" => unary(Expr::ln),
        "sqrt" => unary(Expr::sqrt),
        _ => Ok(Expr::function(name, &args)),
    }
}

/// Reports the first error at its byte position.
fn parse_error<T: std::hash::Hash + Eq>(
    source: &str,
    errors: &[Simple<T>],
    describe: fn(&Simple<T>) -> String,
) -> Error {
    match errors.first() {
        Some(error) => Error::Parse {
            position: byte_offset(source, error.span().start),
            message: describe(error),
        },
        None => Error::Parse {
            position: 0,
            message: "invalid expression".into(),
        },
    }
}

fn byte_offset(source: &str, chars: usize) -> usize {
    source
        .char_indices()
        .nth(chars)
        .map_or(source.len(), |(byte, _)| byte)
}

fn describe_char_error(error: &Simple<char>) -> String {
    if let SimpleReason::Custom(message) = error.reason() {
        return message.clone();
    }
    match error.found() {
        Some(c) => format!("unexpected character '{c}'"),
        None => "unexpected end of input".into(),
    }
}

fn describe_token_error(error: &Simple<Token>) -> String {
    if let SimpleReason::Custom(message) = error.reason() {
        return message.clone();
    }
    let describe =
        |token: Option<&Token>| token.map_or_else(|| "end of input".into(), Token::to_string);
    let found = describe(error.found());
    let mut expected: Vec<String> = error
        .expected()
        .map(|token| describe(token.as_ref()))
        .collect();
    expected.sort();
    match expected.as_slice() {
        [] => format!("unexpected {found}"),
        [only] => format!("expected {only}, found {found}"),
        _ => format!("unexpected {found}, expected one of {}", expected.join(", ")),
    }
}
