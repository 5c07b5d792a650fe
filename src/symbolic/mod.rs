//! Exact symbolic algebra: expressions, differentiation and simplification.

pub mod diff;
pub mod expr;
pub mod matrix;
pub mod parse;
pub mod poly;
pub mod rational;
pub mod simplify;

pub use expr::{Expr, Function, Node, NodeId, Rational, Symbol};
pub use parse::parse;
pub use rational::RationalFunction;
pub use simplify::{Simplifier, SimplifyBudget};
