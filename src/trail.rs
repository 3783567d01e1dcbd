use crate::{Clause, SymbolIdx, Symbols, Variable};

/// The stack of assignments made so far, along with the symbols and clauses they affect.
///
/// Clause caches are refreshed lazily: pushing or popping only marks the trail dirty,
/// and the next [`Trail::solve_status`] recomputes the clauses.
#[derive(Clone, Debug)]
pub struct Trail {
    symbols: Symbols,
    clauses: Vec<Clause>,
    entries: Vec<(SymbolIdx, bool)>,
    dirty: bool,
    status: Option<bool>,
    /// Whether the last refresh reached every clause (it stops at the first false one)
    caches_complete: bool,
    recomputations: usize,
}

impl Trail {
    pub fn new(symbols: Symbols, clauses: Vec<Clause>) -> Self {
        Self {
            entries: Vec::with_capacity(symbols.len()),
            symbols,
            clauses,
            dirty: true,
            status: None,
            caches_complete: false,
            recomputations: 0,
        }
    }

    /// Assigns `value` to an unassigned symbol
    pub fn push(&mut self, symbol: SymbolIdx, value: bool) {
        debug_assert!(
            self.symbols.value(symbol).is_none(),
            "symbol {} is already assigned",
            self.symbols.id(symbol)
        );
        self.symbols.set(symbol, Some(value));
        self.entries.push((symbol, value));
        self.dirty = true;
    }

    /// Undoes the most recent assignment, returning the symbol it cleared
    pub fn pop(&mut self) -> SymbolIdx {
        let (symbol, _) = match self.entries.pop() {
            Some(entry) => entry,
            None => panic!("popped an empty trail"),
        };
        self.symbols.set(symbol, None);
        self.dirty = true;
        symbol
    }

    /// Id of the symbol assigned last
    pub fn most_recent(&self) -> Option<Variable> {
        self.entries.last().map(|(symbol, _)| self.symbols.id(*symbol))
    }

    /// `Some(false)` if a clause is falsified, `Some(true)` if all clauses are satisfied,
    /// `None` otherwise or when nothing has been assigned yet
    pub fn solve_status(&mut self) -> Option<bool> {
        if self.dirty {
            self.refresh();
        }
        if self.entries.is_empty() {
            None
        } else {
            self.status
        }
    }

    fn refresh(&mut self) {
        let mut status = Some(true);
        self.caches_complete = true;

        for clause in self.clauses.iter_mut() {
            self.recomputations += 1;
            match clause.recompute(&self.symbols) {
                Some(true) => (),
                Some(false) => {
                    status = Some(false);
                    self.caches_complete = false;
                    break;
                }
                None => status = None,
            }
        }

        self.status = status;
        self.dirty = false;
    }

    /// Clauses not yet satisfied, in input order. Only meaningful after
    /// [`Trail::solve_status`] has returned something other than `Some(false)`.
    pub fn open_clauses(&self) -> impl Iterator<Item = &Clause> {
        debug_assert!(
            !self.dirty && self.caches_complete,
            "clause caches read before a complete refresh"
        );
        self.clauses
            .iter()
            .filter(|clause| clause.status() != Some(true))
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    /// The clauses in input order. Their cached status and unsatisfied literals are current
    /// only while [`Trail::solve_status`] reports something other than `Some(false)`: a
    /// refresh stops at the first false clause and leaves the ones after it untouched.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn entries(&self) -> &[(SymbolIdx, bool)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of clause recomputations performed so far
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

#[cfg(test)]
use crate::Literal;

#[cfg(test)]
fn trail(clauses: Vec<Vec<isize>>) -> Trail {
    let num_symbols = clauses
        .iter()
        .flatten()
        .map(|x| x.unsigned_abs())
        .max()
        .unwrap_or(0);
    let clauses = clauses
        .into_iter()
        .map(|clause| {
            Clause::new(
                clause
                    .into_iter()
                    .map(|x| Literal::new(x.unsigned_abs() - 1, x > 0))
                    .collect(),
            )
        })
        .collect();
    Trail::new(Symbols::new_with(vec![None; num_symbols]), clauses)
}

#[test]
fn push_and_pop() {
    let mut trail = trail(vec![vec![1, 2], vec![-2, 3]]);
    assert!(trail.is_empty());
    assert_eq!(trail.most_recent(), None);

    trail.push(1, true);
    trail.push(0, false);
    assert_eq!(trail.most_recent(), Some(1));
    assert_eq!(trail.entries(), &[(1, true), (0, false)][..]);
    assert_eq!(trail.symbols().value(0), Some(false));

    assert_eq!(trail.pop(), 0);
    assert_eq!(trail.symbols().value(0), None);
    assert_eq!(trail.most_recent(), Some(2));

    assert_eq!(trail.pop(), 1);
    assert_eq!(trail.symbols().value(1), None);
    assert!(trail.is_empty());
}

#[test]
#[should_panic(expected = "popped an empty trail")]
fn pop_empty() {
    trail(vec![vec![1]]).pop();
}

#[test]
fn status_of_empty_trail() {
    let mut trail = trail(vec![vec![1, 2], vec![-1]]);
    assert_eq!(trail.solve_status(), None);

    // Caches are still primed so the first scan can use them
    assert_eq!(trail.recomputations(), 2);
    assert_eq!(trail.open_clauses().count(), 2);
    assert_eq!(trail.clauses()[1].unsatisfied().len(), 1);
}

#[test]
fn status_transitions() {
    let mut trail = trail(vec![vec![1, 2], vec![-1, 3]]);

    trail.push(0, true);
    assert_eq!(trail.solve_status(), None);
    assert_eq!(trail.open_clauses().count(), 1);

    trail.push(2, false);
    assert_eq!(trail.solve_status(), Some(false));

    trail.pop();
    trail.push(2, true);
    assert_eq!(trail.solve_status(), Some(true));
    assert_eq!(trail.open_clauses().count(), 0);
}

#[test]
fn status_is_idempotent() {
    let mut trail = trail(vec![vec![1, 2], vec![-1, 3], vec![2, 3]]);
    trail.push(0, true);

    let first = trail.solve_status();
    let recomputed = trail.recomputations();
    assert_eq!(recomputed, 3);
    assert_eq!(trail.solve_status(), first);
    assert_eq!(trail.recomputations(), recomputed);
}

#[test]
fn refresh_stops_at_first_false_clause() {
    let mut trail = trail(vec![vec![1], vec![2], vec![3]]);
    trail.push(0, false);
    assert_eq!(trail.solve_status(), Some(false));
    assert_eq!(trail.recomputations(), 1);

    // Undoing the assignment forces a full pass again
    trail.pop();
    trail.push(0, true);
    assert_eq!(trail.solve_status(), None);
    assert_eq!(trail.recomputations(), 4);
}

#[test]
fn clauses_after_a_false_clause_keep_old_caches() {
    let mut trail = trail(vec![vec![1, 2], vec![-1], vec![1, 3]]);
    assert_eq!(trail.solve_status(), None);
    assert_eq!(trail.clauses()[2].unsatisfied().len(), 2);

    trail.push(0, true);
    assert_eq!(trail.solve_status(), Some(false));
    assert_eq!(trail.recomputations(), 5);
    assert_eq!(trail.solve_status(), Some(false));
    assert_eq!(trail.recomputations(), 5);
    // The last clause is satisfied by 1 but was never looked at
    assert_eq!(trail.clauses()[2].status(), None);
    assert_eq!(trail.clauses()[2].unsatisfied().len(), 2);

    trail.pop();
    trail.push(0, false);
    assert_eq!(trail.solve_status(), None);
    assert_eq!(trail.clauses()[2].unsatisfied(), &[Literal::new(2, true)][..]);
}
