use hamsat::*;
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;
use rand::Rng;

/// A random clause set over at most 10 symbols, small enough to check by truth table
#[derive(Clone, Debug)]
struct SmallCnf {
    clauses: Vec<Vec<isize>>,
}

impl SmallCnf {
    fn text(&self) -> String {
        let mut text = String::new();
        for clause in self.clauses.iter() {
            let tokens = clause.iter().map(|x| x.to_string()).collect::<Vec<_>>();
            text.push_str(&tokens.join(" "));
            text.push('\n');
        }
        text
    }

    fn symbols(&self) -> Vec<usize> {
        let mut symbols = self
            .clauses
            .iter()
            .flatten()
            .map(|x| x.unsigned_abs())
            .collect::<Vec<_>>();
        symbols.sort();
        symbols.dedup();
        symbols
    }

    fn satisfied_by(&self, value: impl Fn(usize) -> Option<bool>) -> bool {
        self.clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|x| value(x.unsigned_abs()) == Some(*x > 0))
        })
    }

    fn brute_force(&self) -> bool {
        let symbols = self.symbols();
        (0..1u32 << symbols.len()).any(|bits| {
            self.satisfied_by(|id| {
                symbols
                    .iter()
                    .position(|s| *s == id)
                    .map(|i| bits & (1 << i) != 0)
            })
        })
    }
}

impl Arbitrary for SmallCnf {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let num_symbols = g.gen_range(1, 11);
        let num_clauses = g.gen_range(1, 5 * num_symbols);
        let clauses = (0..num_clauses)
            .map(|_| {
                let len = g.gen_range(1, 4);
                (0..len)
                    .map(|_| {
                        let id = g.gen_range(1, num_symbols + 1) as isize;
                        if g.gen() {
                            id
                        } else {
                            -id
                        }
                    })
                    .collect()
            })
            .collect();
        Self { clauses }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.clauses.len() < 2 {
            return Box::new(std::iter::empty());
        }
        let clauses = self.clauses.clone();
        Box::new((0..clauses.len()).map(move |skip| {
            let mut clauses = clauses.clone();
            clauses.remove(skip);
            Self { clauses }
        }))
    }
}

#[quickcheck]
fn assignments_satisfy_every_clause(cnf: SmallCnf) -> bool {
    match Formula::parse_and_solve(&cnf.text()).map(|report| report.solution) {
        Ok(Solution::Sat(assignment)) => cnf.satisfied_by(|id| {
            assignment
                .iter()
                .find(|(var, _)| *var == id)
                .and_then(|(_, value)| *value)
        }),
        Ok(Solution::Unsat) => true,
        Err(_) => false,
    }
}

#[quickcheck]
fn agrees_with_truth_table(cnf: SmallCnf) -> bool {
    match Formula::parse_and_solve(&cnf.text()) {
        Ok(report) => report.solution.is_sat() == cnf.brute_force(),
        Err(_) => false,
    }
}

#[quickcheck]
fn failed_search_leaves_trail_empty(cnf: SmallCnf) -> bool {
    let (trail, _) = match Formula::parse(&cnf.text()) {
        Ok(formula) => formula.into_parts(),
        Err(_) => return false,
    };
    let mut solver = Solver::new(trail);
    match solver.solve() {
        Ok(Solution::Unsat) => solver.trail().is_empty(),
        Ok(Solution::Sat(_)) => true,
        Err(_) => false,
    }
}

#[quickcheck]
fn trailer_round_trips(cnf: SmallCnf, trailer: String) -> TestResult {
    if trailer.ends_with('\r') || trailer.ends_with('\n') {
        return TestResult::discard();
    }
    let input = format!("{}0\n{}\n", cnf.text(), trailer);
    match Formula::parse_and_solve(&input) {
        Ok(report) => {
            TestResult::from_bool(report.to_string().ends_with(&format!("0\n{}", trailer)))
        }
        Err(_) => TestResult::failed(),
    }
}
