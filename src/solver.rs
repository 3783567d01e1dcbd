use crate::{Error, Literal, Result, Sign, SymbolIdx, Trail, Variable};
use fixedbitset::FixedBitSet;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tracing::{debug, info, trace};

/// Limits on a search. The verdict is unaffected; an exhausted limit aborts the search instead.
#[derive(Clone, Debug, Default)]
pub struct SolverConfig {
    pub timeout: Option<Duration>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The search stops at the next node once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Search nodes visited, i.e. status checks performed
    pub nodes: usize,
    pub pure_decisions: usize,
    pub unit_decisions: usize,
    /// Symbols guessed without being forced
    pub branches: usize,
    pub backtracks: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Solution {
    Unsat,
    /// Every symbol in ascending id order; `None` for symbols the search never had to assign
    Sat(Vec<(Variable, Option<bool>)>),
}

impl Solution {
    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Sat(_))
    }

    pub fn value(&self, id: Variable) -> Option<bool> {
        match self {
            Solution::Unsat => None,
            Solution::Sat(assignment) => assignment
                .binary_search_by_key(&id, |(var, _)| *var)
                .ok()
                .and_then(|idx| assignment[idx].1),
        }
    }
}

/// Pending work for a search node that has descended into a child
#[derive(Clone, Copy, Debug)]
enum Frame {
    /// A pure or unit assignment; there is no alternative to try
    Forced(SymbolIdx),
    /// A guess of `true`; `false` is still to be tried
    TrueBranch(SymbolIdx),
    /// A guess of `false` after `true` failed
    FalseBranch(SymbolIdx),
}

enum Step {
    Done(bool),
    Descend(Frame),
}

enum Decision {
    Pure(Literal),
    Unit(Literal),
    Branch,
}

pub struct Solver {
    trail: Trail,
    /// Unassigned symbols; branching takes the front, finished symbols are returned to the back
    pool: Vec<SymbolIdx>,
    config: SolverConfig,
    stats: Stats,
    polarity: Vec<Option<Sign>>,
    impure: FixedBitSet,
}

impl Solver {
    pub fn new(trail: Trail) -> Self {
        Self::with_config(trail, SolverConfig::default())
    }

    pub fn with_config(trail: Trail, config: SolverConfig) -> Self {
        let num_symbols = trail.symbols().len();
        Self {
            trail,
            pool: (0..num_symbols).collect(),
            config,
            stats: Stats::default(),
            polarity: vec![None; num_symbols],
            impure: FixedBitSet::with_capacity(num_symbols),
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Runs the search to completion. On success the satisfying assignment is left on the trail.
    pub fn solve(&mut self) -> Result<Solution> {
        // A deadline too far out to represent is no deadline at all
        let deadline = self
            .config
            .timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));
        let mut frames = Vec::new();

        loop {
            self.check_interrupt(deadline)?;

            let satisfiable = match self.expand() {
                Step::Descend(frame) => {
                    frames.push(frame);
                    continue;
                }
                Step::Done(satisfiable) => satisfiable,
            };

            // Hand the verdict back up until a frame has an alternative left to try
            loop {
                match frames.pop() {
                    None => return Ok(self.finish(satisfiable)),
                    Some(Frame::Forced(symbol)) | Some(Frame::FalseBranch(symbol)) => {
                        self.pool.push(symbol);
                        if !satisfiable {
                            self.backtrack();
                        }
                    }
                    Some(Frame::TrueBranch(symbol)) => {
                        if !satisfiable {
                            self.backtrack();
                            debug!(symbol = self.trail.symbols().id(symbol), "retrying as false");
                            self.trail.push(symbol, false);
                            frames.push(Frame::FalseBranch(symbol));
                            break;
                        }
                    }
                }
            }
        }
    }

    fn check_interrupt(&self, deadline: Option<Instant>) -> Result<()> {
        let cancelled = self
            .config
            .cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed));
        let expired = deadline.map_or(false, |deadline| Instant::now() >= deadline);

        if cancelled || expired {
            info!(nodes = self.stats.nodes, cancelled, expired, "search interrupted");
            Err(Error::Interrupted {
                nodes: self.stats.nodes,
            })
        } else {
            Ok(())
        }
    }

    /// Visits the node described by the current trail
    fn expand(&mut self) -> Step {
        self.stats.nodes += 1;
        trace!(
            node = self.stats.nodes,
            most_recent = ?self.trail.most_recent(),
            "visiting"
        );

        if let Some(satisfiable) = self.trail.solve_status() {
            return Step::Done(satisfiable);
        }

        match self.decide() {
            Decision::Pure(literal) => {
                self.stats.pure_decisions += 1;
                Step::Descend(self.force(literal, "pure literal"))
            }
            Decision::Unit(literal) => {
                self.stats.unit_decisions += 1;
                Step::Descend(self.force(literal, "unit clause"))
            }
            Decision::Branch if self.pool.is_empty() => {
                // Only a formula without clauses gets here
                debug_assert!(self.trail.clauses().is_empty());
                Step::Done(true)
            }
            Decision::Branch => {
                let symbol = self.pool.remove(0);
                self.stats.branches += 1;
                debug!(symbol = self.trail.symbols().id(symbol), "branching");
                self.trail.push(symbol, true);
                Step::Descend(Frame::TrueBranch(symbol))
            }
        }
    }

    /// Scans the open clauses once, looking for a pure literal and the first unit clause
    fn decide(&mut self) -> Decision {
        let Self {
            trail,
            pool,
            polarity,
            impure,
            ..
        } = self;

        polarity.iter_mut().for_each(|sign| *sign = None);
        impure.clear();
        let mut unit = None;

        for clause in trail.open_clauses() {
            let unsatisfied = clause.unsatisfied();
            for literal in unsatisfied {
                let symbol = literal.symbol();
                if impure.contains(symbol) {
                    continue;
                }
                match polarity[symbol] {
                    None => polarity[symbol] = Some(literal.sign()),
                    Some(sign) if sign != literal.sign() => impure.insert(symbol),
                    Some(_) => (),
                }
            }
            if unit.is_none() && unsatisfied.len() == 1 {
                unit = Some(unsatisfied[0]);
            }
        }

        let pure = pool.iter().find_map(|&symbol| match polarity[symbol] {
            Some(sign) if !impure.contains(symbol) => Some(Literal::new(symbol, sign)),
            _ => None,
        });

        match (pure, unit) {
            (Some(literal), _) => Decision::Pure(literal),
            (None, Some(literal)) => Decision::Unit(literal),
            (None, None) => Decision::Branch,
        }
    }

    /// Assigns the value that makes `literal` true and takes its symbol out of the pool
    fn force(&mut self, literal: Literal, reason: &'static str) -> Frame {
        let symbol = literal.symbol();
        let value = literal.sign().satisfying_value();

        match self.pool.iter().position(|s| *s == symbol) {
            Some(idx) => {
                self.pool.remove(idx);
            }
            None => panic!(
                "forced symbol {} is not in the pool",
                self.trail.symbols().id(symbol)
            ),
        }

        debug!(symbol = self.trail.symbols().id(symbol), value, reason, "forcing");
        self.trail.push(symbol, value);
        Frame::Forced(symbol)
    }

    fn backtrack(&mut self) {
        let symbol = self.trail.pop();
        self.stats.backtracks += 1;
        trace!(symbol = self.trail.symbols().id(symbol), "backtracked");
    }

    fn finish(&self, satisfiable: bool) -> Solution {
        let stats = &self.stats;
        info!(
            satisfiable,
            nodes = stats.nodes,
            pure = stats.pure_decisions,
            unit = stats.unit_decisions,
            branches = stats.branches,
            backtracks = stats.backtracks,
            "search finished"
        );

        if !satisfiable {
            debug_assert!(self.trail.is_empty());
            return Solution::Unsat;
        }

        Solution::Sat(
            self.trail
                .symbols()
                .sorted()
                .into_iter()
                .map(|symbol| (symbol.id(), symbol.value()))
                .collect(),
        )
    }
}

#[cfg(test)]
fn solve(text: &str) -> Result<(Solution, Solver)> {
    let (trail, _) = crate::Formula::parse(text)?.into_parts();
    let mut solver = Solver::new(trail);
    let solution = solver.solve()?;
    Ok((solution, solver))
}

#[cfg(test)]
fn assert_sound(solver: &Solver) {
    use crate::Evaluate;

    let trail = solver.trail();
    assert!(trail
        .clauses()
        .iter()
        .all(|clause| clause.evaluate(trail.symbols()) == Some(true)));
}

#[test]
fn unit_propagation_needs_no_branch() -> Result<()> {
    let (solution, solver) = solve("1\n-1 2\n-2 3\n")?;

    assert_eq!(
        solution,
        Solution::Sat(vec![(1, Some(true)), (2, Some(true)), (3, Some(true))])
    );
    assert_eq!(solver.stats().branches, 0);
    assert_eq!(solver.stats().backtracks, 0);
    assert_sound(&solver);
    Ok(())
}

#[test]
fn pure_literal_is_forced_first() -> Result<()> {
    let (solution, solver) = solve("1 2\n1 3\n-2 -3\n")?;

    assert_eq!(solver.trail().entries()[0], (0, true));
    assert_eq!(solver.stats().branches, 0);
    assert_eq!(solver.stats().backtracks, 0);
    assert_eq!(
        solution,
        Solution::Sat(vec![(1, Some(true)), (2, Some(false)), (3, None)])
    );
    assert_sound(&solver);
    Ok(())
}

#[test]
fn branches_true_first() -> Result<()> {
    let (solution, solver) = solve("1 2\n-1 -2\n1 -2\n")?;

    assert_eq!(solution, Solution::Sat(vec![(1, Some(true)), (2, Some(false))]));
    assert_eq!(solver.trail().entries(), &[(0, true), (1, false)][..]);
    assert_eq!(solver.stats().branches, 1);
    assert_eq!(solver.stats().pure_decisions, 1);
    Ok(())
}

#[test]
fn failed_branch_retries_false() -> Result<()> {
    let (solution, solver) = solve("-1 2\n-1 -2\n1 2 3\n-2 -3 1\n")?;

    // 2 is put back at the end of the pool after the failed unit assignment,
    // so the second guess is 3
    assert_eq!(
        solver.trail().entries(),
        &[(0, false), (2, true), (1, false)][..]
    );
    assert_eq!(solution.value(1), Some(false));
    assert_eq!(solution.value(2), Some(false));
    assert_eq!(solution.value(3), Some(true));
    assert_eq!(
        solver.stats(),
        Stats {
            nodes: 6,
            pure_decisions: 1,
            unit_decisions: 1,
            branches: 2,
            backtracks: 2,
        }
    );
    assert_sound(&solver);
    Ok(())
}

#[test]
fn unsatisfiable_units() -> Result<()> {
    let (solution, solver) = solve("1\n-1 2\n-1 -2\n")?;

    assert_eq!(solution, Solution::Unsat);
    assert!(solver.trail().is_empty());
    assert_eq!(solver.stats().unit_decisions, 2);
    assert_eq!(solver.stats().branches, 0);
    Ok(())
}

#[test]
fn contradiction() -> Result<()> {
    let (solution, solver) = solve("1\n-1\n0\n")?;
    assert_eq!(solution, Solution::Unsat);
    assert!(solver.trail().is_empty());
    Ok(())
}

#[test]
fn empty_formula_is_satisfiable() -> Result<()> {
    let (solution, _) = solve("0\ntrailer\n")?;
    assert_eq!(solution, Solution::Sat(Vec::new()));
    Ok(())
}

#[test]
fn cancelled_search() -> Result<()> {
    let (trail, _) = crate::Formula::parse("1 2\n-1 -2\n")?.into_parts();
    let flag = Arc::new(AtomicBool::new(true));
    let mut solver = Solver::with_config(trail, SolverConfig::new().with_cancel_flag(flag));

    assert!(matches!(
        solver.solve(),
        Err(Error::Interrupted { nodes: 0 })
    ));
    Ok(())
}

#[test]
fn expired_deadline() -> Result<()> {
    let (trail, _) = crate::Formula::parse("1 2\n-1 -2\n")?.into_parts();
    let mut solver = Solver::with_config(
        trail,
        SolverConfig::new().with_timeout(Duration::from_secs(0)),
    );

    assert!(matches!(solver.solve(), Err(Error::Interrupted { .. })));
    Ok(())
}

#[test]
fn unrepresentable_deadline_is_ignored() -> Result<()> {
    let (trail, _) = crate::Formula::parse("1 2\n")?.into_parts();
    let mut solver = Solver::with_config(
        trail,
        SolverConfig::new().with_timeout(Duration::from_secs(u64::MAX)),
    );

    assert!(solver.solve()?.is_sat());
    Ok(())
}
