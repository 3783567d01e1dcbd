use crate::{Result, Solution, Stats};
use std::{fmt, fs, io::Write, path::Path};

/// Solver output in the form the path decoder reads:
/// `<id> <T|F>` lines for a satisfiable formula, then `0`, then the trailer
#[derive(Clone, Debug)]
pub struct Report {
    pub solution: Solution,
    pub trailer: String,
    pub stats: Stats,
}

impl Report {
    pub fn write_to(&self, mut out: impl Write) -> Result<()> {
        write!(out, "{}", self)?;
        out.flush()?;
        Ok(())
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_to(fs::File::create(path)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Solution::Sat(assignment) = &self.solution {
            for (id, value) in assignment {
                // Symbols left unassigned are reported false
                let value = if value.unwrap_or(false) { 'T' } else { 'F' };
                writeln!(f, "{} {}", id, value)?;
            }
        }
        write!(f, "0\n{}", self.trailer)
    }
}

#[test]
fn satisfiable_report() {
    let report = Report {
        solution: Solution::Sat(vec![(1, Some(true)), (2, Some(false)), (5, None)]),
        trailer: "1 a 1\n2 a 2".to_string(),
        stats: Stats::default(),
    };
    assert_eq!(report.to_string(), "1 T\n2 F\n5 F\n0\n1 a 1\n2 a 2");
}

#[test]
fn unsatisfiable_report() -> Result<()> {
    let report = Report {
        solution: Solution::Unsat,
        trailer: String::new(),
        stats: Stats::default(),
    };

    let mut out = Vec::new();
    report.write_to(&mut out)?;
    assert_eq!(out, b"0\n");
    Ok(())
}
