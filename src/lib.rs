mod clause;
mod error;
mod formula;
mod literal;
mod report;
mod sign;
mod solver;
mod symbols;
mod trail;

pub use clause::Clause;
pub use error::{Error, Result};
pub use formula::Formula;
pub use literal::Literal;
pub use report::Report;
pub use sign::Sign;
pub use solver::{Solution, Solver, SolverConfig, Stats};
pub use symbols::{Symbol, SymbolTable, Symbols};
pub use trail::Trail;

/// Numeric id of a symbol as it appears in the clause file
pub type Variable = usize;
/// Dense index of a symbol, assigned in order of first appearance
pub type SymbolIdx = usize;

pub trait Evaluate {
    fn evaluate(&self, symbols: &Symbols) -> Option<bool>;
}
