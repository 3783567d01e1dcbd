use hamsat::*;

#[test]
fn unique_assignment() -> Result<()> {
    let report = Formula::parse_and_solve("1 2\n-1 -2\n1 -2\n")?;
    assert_eq!(report.to_string(), "1 T\n2 F\n0\n");
    Ok(())
}

#[test]
fn unsatisfiable() -> Result<()> {
    let report = Formula::parse_and_solve("1\n-1\n0\n")?;
    assert_eq!(report.solution, Solution::Unsat);
    assert_eq!(report.to_string(), "0\n");
    Ok(())
}

#[test]
fn trailer_follows_the_verdict() -> Result<()> {
    let trailer = "1 a 1\n2 a 2\n3 b 1\n4 b 2";

    let sat = Formula::parse_and_solve(&format!("1 3\n-1 -3\n0\n{}\n", trailer))?;
    assert!(sat.to_string().ends_with(&format!("0\n{}", trailer)));

    let unsat = Formula::parse_and_solve(&format!("2\n-2\n0\n{}\n", trailer))?;
    assert_eq!(unsat.to_string(), format!("0\n{}", trailer));
    Ok(())
}

#[test]
fn output_is_sorted_by_id() -> Result<()> {
    let report = Formula::parse_and_solve("10 -3\n-10\n7 3\n")?;
    let ids = report
        .to_string()
        .lines()
        .take_while(|line| *line != "0")
        .map(|line| line.split(' ').next().unwrap().parse::<usize>().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![3, 7, 10]);
    Ok(())
}

#[test]
fn status_is_cached_between_mutations() -> Result<()> {
    let (mut trail, _) = Formula::parse("1 2\n-1 3\n-2 -3\n")?.into_parts();

    trail.push(0, true);
    let status = trail.solve_status();
    let recomputations = trail.recomputations();

    assert_eq!(trail.solve_status(), status);
    assert_eq!(trail.recomputations(), recomputations);

    trail.pop();
    trail.solve_status();
    assert!(trail.recomputations() > recomputations);
    Ok(())
}

#[test]
fn files_round_trip() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("hamsat-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let (input, output) = (dir.join("input.txt"), dir.join("output.txt"));

    std::fs::write(&input, "1 2\n-1 -2\n1 -2\n0\n1 x 1\n2 y 1\n")?;
    Formula::parse_and_solve_file(&input, SolverConfig::new())?.write_file(&output)?;
    assert_eq!(
        std::fs::read_to_string(&output)?,
        "1 T\n2 F\n0\n1 x 1\n2 y 1"
    );

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn undeclared_symbol_is_reported() {
    let mut table = SymbolTable::new();
    table.declare(1);
    let err = Clause::parse("1 -2", 3, &table).unwrap_err();
    assert_eq!(err.to_string(), "line 3: symbol 2 is not declared");
}
