use crate::{Clause, Report, Result, Solver, SolverConfig, SymbolTable, Symbols, Trail};
use std::{fs, path::Path};
use tracing::info;

/// A parsed clause file: the symbols, the clauses and the trailer that follows them
#[derive(Clone, Debug)]
pub struct Formula {
    symbols: Symbols,
    clauses: Vec<Clause>,
    trailer: String,
}

impl Formula {
    /// Reads one clause per line up to a line holding only `0`; whatever follows is the trailer
    pub fn parse(text: &str) -> Result<Self> {
        let mut table = SymbolTable::new();
        let mut lines = Vec::new();
        let mut trailer = "";

        let mut offset = 0;
        for (line_no, raw) in text.split_inclusive('\n').enumerate() {
            offset += raw.len();
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line == "0" {
                trailer = &text[offset..];
                break;
            }

            // Symbols are declared by their first appearance
            for token in line.split_whitespace() {
                if let Ok(value) = token.parse::<isize>() {
                    if value != 0 {
                        table.declare(value.unsigned_abs());
                    }
                }
            }
            lines.push((line_no + 1, line));
        }

        let clauses = lines
            .into_iter()
            .map(|(line_no, line)| Clause::parse(line, line_no, &table))
            .collect::<Result<Vec<_>>>()?;

        let trailer = trailer
            .strip_suffix('\n')
            .map(|t| t.strip_suffix('\r').unwrap_or(t))
            .unwrap_or(trailer)
            .to_string();

        info!(
            symbols = table.len(),
            clauses = clauses.len(),
            trailer_bytes = trailer.len(),
            "parsed formula"
        );

        Ok(Self {
            symbols: table.into_symbols(),
            clauses,
            trailer,
        })
    }

    pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse_and_solve(text: &str) -> Result<Report> {
        Self::parse(text)?.solve()
    }

    pub fn parse_and_solve_file(path: impl AsRef<Path>, config: SolverConfig) -> Result<Report> {
        Self::parse_file(path)?.solve_with(config)
    }

    pub fn solve(self) -> Result<Report> {
        self.solve_with(SolverConfig::default())
    }

    pub fn solve_with(self, config: SolverConfig) -> Result<Report> {
        let (trail, trailer) = self.into_parts();
        let mut solver = Solver::with_config(trail, config);
        let solution = solver.solve()?;
        Ok(Report {
            solution,
            trailer,
            stats: solver.stats(),
        })
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn trailer(&self) -> &str {
        &self.trailer
    }

    pub fn into_parts(self) -> (Trail, String) {
        (Trail::new(self.symbols, self.clauses), self.trailer)
    }
}

#[test]
fn parse_formula() -> Result<()> {
    let formula = Formula::parse("3 -1 \n\n1 2\n0\n3 a 1\n1 a 2\n")?;

    assert_eq!(
        formula.symbols().iter().map(|s| s.id()).collect::<Vec<_>>(),
        vec![3, 1, 2]
    );
    assert_eq!(
        formula
            .clauses()
            .iter()
            .map(|c| c.display(formula.symbols()).to_string())
            .collect::<Vec<_>>(),
        vec!["3 -1", "1 2"]
    );
    assert_eq!(formula.trailer(), "3 a 1\n1 a 2");
    Ok(())
}

#[test]
fn trailer_is_copied_verbatim() -> Result<()> {
    let formula = Formula::parse("1\n0\n  spaced\t line \n\nlast")?;
    assert_eq!(formula.trailer(), "  spaced\t line \n\nlast");

    let formula = Formula::parse("1\r\n0\r\nx y\r\n")?;
    assert_eq!(formula.trailer(), "x y");

    let formula = Formula::parse("1\n-1\n")?;
    assert_eq!(formula.trailer(), "");
    Ok(())
}

#[test]
fn malformed_lines_are_fatal() {
    use crate::Error;

    assert!(matches!(
        Formula::parse("1 2\n1 two\n0\n"),
        Err(Error::MalformedToken { line: 2, .. })
    ));
    assert!(matches!(
        Formula::parse("1 2 0\n"),
        Err(Error::MalformedToken { line: 1, .. })
    ));
    assert!(matches!(
        Formula::parse_file("/nonexistent/clauses.txt"),
        Err(Error::Io(_))
    ));
}
