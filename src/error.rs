use crate::Variable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A clause refers to a symbol missing from the symbol table
    #[error("line {line}: symbol {symbol} is not declared")]
    UndeclaredSymbol { line: usize, symbol: Variable },

    #[error("line {line}: malformed literal {token:?}")]
    MalformedToken { line: usize, token: String },

    #[error("line {line}: clause has no literals")]
    EmptyClause { line: usize },

    /// The search hit its deadline or was cancelled before reaching a verdict
    #[error("search interrupted after {nodes} nodes")]
    Interrupted { nodes: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
