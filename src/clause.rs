use crate::{Error, Evaluate, Literal, Result, SymbolTable, Symbols};

/// A disjunction of literals together with its satisfaction status as of the last recompute
#[derive(Clone, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
    status: Option<bool>,
    unsatisfied: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self {
            literals,
            status: None,
            unsatisfied: Vec::new(),
        }
    }

    /// Parses a line of signed symbol ids (`-` marks negation); `line` is only used for errors
    pub fn parse(text: &str, line: usize, table: &SymbolTable) -> Result<Self> {
        let literals = text
            .split_whitespace()
            .map(|token| -> Result<Literal> {
                // `+3` would not survive rendering back to text
                let value = Some(token)
                    .filter(|token| !token.starts_with('+'))
                    .and_then(|token| token.parse::<isize>().ok())
                    .filter(|value| *value != 0)
                    .ok_or_else(|| Error::MalformedToken {
                        line,
                        token: token.to_string(),
                    })?;
                let symbol = value.unsigned_abs();
                table
                    .get(symbol)
                    .map(|idx| Literal::new(idx, value > 0))
                    .ok_or(Error::UndeclaredSymbol { line, symbol })
            })
            .collect::<Result<Vec<_>>>()?;

        if literals.is_empty() {
            return Err(Error::EmptyClause { line });
        }
        Ok(Self::new(literals))
    }

    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Status as of the last call to [`Clause::recompute`]
    #[inline]
    pub fn status(&self) -> Option<bool> {
        self.status
    }

    /// Literals whose symbol was unassigned at the last recompute, in clause order.
    /// Empty once the clause is satisfied.
    #[inline]
    pub fn unsatisfied(&self) -> &[Literal] {
        &self.unsatisfied
    }

    /// Refreshes the cached status and unsatisfied literals against the current values
    pub fn recompute(&mut self, symbols: &Symbols) -> Option<bool> {
        self.unsatisfied.clear();
        self.status = Some(false);

        for literal in self.literals.iter() {
            match literal.evaluate(symbols) {
                Some(true) => {
                    self.unsatisfied.clear();
                    self.status = Some(true);
                    break;
                }
                Some(false) => (),
                None => {
                    self.status = None;
                    self.unsatisfied.push(*literal);
                }
            }
        }

        self.status
    }

    /// Renders the clause in its input form, e.g. `3 -1 7`
    pub fn display<'a>(&'a self, symbols: &'a Symbols) -> impl std::fmt::Display + 'a {
        Show {
            clause: self,
            symbols,
        }
    }
}

impl Evaluate for Clause {
    fn evaluate(&self, symbols: &Symbols) -> Option<bool> {
        let mut status = Some(false);
        for literal in self.literals() {
            match literal.evaluate(symbols) {
                Some(true) => return Some(true),
                Some(false) => (),
                None => status = None,
            }
        }
        status
    }
}

struct Show<'a> {
    clause: &'a Clause,
    symbols: &'a Symbols,
}

impl std::fmt::Display for Show<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, literal) in self.clause.literals().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", literal.display(self.symbols))?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn table(ids: &[usize]) -> SymbolTable {
    let mut table = SymbolTable::new();
    for id in ids {
        table.declare(*id);
    }
    table
}

#[test]
fn parse_clause() -> Result<()> {
    let table = table(&[4, 9, 2]);
    let clause = Clause::parse("9 -4  2 ", 1, &table)?;

    assert_eq!(
        clause.literals().collect::<Vec<_>>(),
        vec![
            Literal::new(1, true),
            Literal::new(0, false),
            Literal::new(2, true)
        ]
    );
    assert_eq!(clause.status(), None);
    assert!(clause.unsatisfied().is_empty());

    let symbols = table.into_symbols();
    assert_eq!(clause.display(&symbols).to_string(), "9 -4 2");
    Ok(())
}

#[test]
fn parse_errors() {
    let table = table(&[1, 2]);

    assert!(matches!(
        Clause::parse("1 -3", 4, &table),
        Err(Error::UndeclaredSymbol { line: 4, symbol: 3 })
    ));
    assert!(matches!(
        Clause::parse("1 x", 2, &table),
        Err(Error::MalformedToken { line: 2, ref token }) if token == "x"
    ));
    assert!(matches!(
        Clause::parse("1 0 2", 3, &table),
        Err(Error::MalformedToken { line: 3, .. })
    ));
    assert!(matches!(
        Clause::parse("+2 1", 6, &table),
        Err(Error::MalformedToken { line: 6, ref token }) if token == "+2"
    ));
    assert!(matches!(
        Clause::parse("   ", 5, &table),
        Err(Error::EmptyClause { line: 5 })
    ));
}

#[test]
fn recompute_clause() {
    let (l0, l1, l2) = (
        Literal::new(0, true),
        Literal::new(1, false),
        Literal::new(2, true),
    );
    let clause = &mut Clause::new(vec![l0, l1, l2]);

    let symbols = Symbols::new_with(vec![None, None, None]);
    assert_eq!(clause.recompute(&symbols), None);
    assert_eq!(clause.unsatisfied(), &[l0, l1, l2][..]);

    let symbols = Symbols::new_with(vec![Some(false), None, None]);
    assert_eq!(clause.recompute(&symbols), None);
    assert_eq!(clause.unsatisfied(), &[l1, l2][..]);

    let symbols = Symbols::new_with(vec![Some(false), Some(true), None]);
    assert_eq!(clause.recompute(&symbols), None);
    assert_eq!(clause.unsatisfied(), &[l2][..]);

    // A true literal clears whatever was collected before it
    let symbols = Symbols::new_with(vec![None, Some(false), None]);
    assert_eq!(clause.recompute(&symbols), Some(true));
    assert!(clause.unsatisfied().is_empty());
    assert_eq!(clause.status(), Some(true));

    let symbols = Symbols::new_with(vec![Some(false), Some(true), Some(false)]);
    assert_eq!(clause.recompute(&symbols), Some(false));
    assert!(clause.unsatisfied().is_empty());
    assert_eq!(clause.evaluate(&symbols), Some(false));
}

#[test]
fn evaluate_matches_recompute() {
    let clause = &mut Clause::new(vec![Literal::new(0, false), Literal::new(1, true)]);
    for a in [None, Some(true), Some(false)].iter() {
        for b in [None, Some(true), Some(false)].iter() {
            let symbols = Symbols::new_with(vec![*a, *b]);
            assert_eq!(clause.evaluate(&symbols), clause.recompute(&symbols));
        }
    }
}
