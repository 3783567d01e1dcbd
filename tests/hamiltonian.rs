//! Clause files in the layout produced by the graph encoder: atom `n * v + t` says vertex `v`
//! sits at position `t` of the path, and the trailer lists `<atom> <vertex> <position>`.

use hamsat::*;
use std::collections::HashMap;

fn encode(vertices: &[&str], edges: &[(&str, &str)]) -> String {
    let n = vertices.len() as isize;
    let atom = |v: usize, t: isize| n * v as isize + t;
    let index = |name: &str| vertices.iter().position(|v| *v == name).unwrap();
    let mut text = String::new();
    let mut line = |literals: Vec<isize>| {
        let tokens = literals.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        text.push_str(&tokens.join(" "));
        text.push('\n');
    };

    // Every vertex is visited
    for v in 0..vertices.len() {
        line((1..=n).map(|t| atom(v, t)).collect());
    }
    // At most one vertex per position
    for t in 1..=n {
        for v1 in 0..vertices.len() {
            for v2 in v1 + 1..vertices.len() {
                line(vec![-atom(v1, t), -atom(v2, t)]);
            }
        }
    }
    // Consecutive positions follow an edge
    for v1 in 0..vertices.len() {
        for v2 in 0..vertices.len() {
            let connected = v1 == v2
                || edges
                    .iter()
                    .any(|(from, to)| index(from) == v1 && index(to) == v2);
            if !connected {
                for t in 2..=n {
                    line(vec![-atom(v1, t - 1), -atom(v2, t)]);
                }
            }
        }
    }
    // Some vertex at every position
    for t in 1..=n {
        line((0..vertices.len()).map(|v| atom(v, t)).collect());
    }
    // No vertex visited twice
    for v in 0..vertices.len() {
        for t1 in 1..=n {
            for t2 in t1 + 1..=n {
                line(vec![-atom(v, t1), -atom(v, t2)]);
            }
        }
    }

    text.push_str("0\n");
    let mut trailer = Vec::new();
    for (v, name) in vertices.iter().enumerate() {
        for t in 1..=n {
            trailer.push(format!("{} {} {}", atom(v, t), name, t));
        }
    }
    text.push_str(&trailer.join("\n"));
    text
}

/// Reads the solver output back into the visiting order, or `None` if there is no path
fn decode(output: &str) -> Option<Vec<String>> {
    let mut lines = output.lines();
    let mut truths = HashMap::new();
    loop {
        let line = lines.next()?;
        if line == "0" {
            break;
        }
        let mut parts = line.split(' ');
        let atom = parts.next()?.to_string();
        truths.insert(atom, parts.next()? == "T");
    }
    if truths.is_empty() {
        return None;
    }

    let mut visits = lines
        .filter_map(|line| {
            let parts = line.split(' ').collect::<Vec<_>>();
            if truths.get(parts[0]).copied().unwrap_or(false) {
                Some((parts[2].parse::<usize>().ok()?, parts[1].to_string()))
            } else {
                None
            }
        })
        .collect::<Vec<_>>();
    visits.sort();
    Some(visits.into_iter().map(|(_, vertex)| vertex).collect())
}

#[test]
fn finds_the_only_path() -> Result<()> {
    let vertices = ["a", "b", "c", "d"];
    let edges = [("c", "a"), ("a", "d"), ("d", "b")];

    let report = Formula::parse_and_solve(&encode(&vertices, &edges))?;
    assert!(report.solution.is_sat());
    assert_eq!(
        decode(&report.to_string()),
        Some(vec!["c".to_string(), "a".into(), "d".into(), "b".into()])
    );
    Ok(())
}

#[test]
fn path_follows_edges() -> Result<()> {
    let vertices = ["p", "q", "r", "s", "t"];
    let edges = [
        ("p", "q"),
        ("q", "r"),
        ("r", "p"),
        ("r", "s"),
        ("s", "t"),
        ("t", "q"),
        ("q", "t"),
    ];

    let report = Formula::parse_and_solve(&encode(&vertices, &edges))?;
    let path = decode(&report.to_string()).expect("graph has a Hamiltonian path");

    let mut visited = path.clone();
    visited.sort();
    assert_eq!(visited, vec!["p", "q", "r", "s", "t"]);
    for step in path.windows(2) {
        assert!(edges
            .iter()
            .any(|(from, to)| *from == step[0] && *to == step[1]));
    }
    Ok(())
}

#[test]
fn disconnected_graph_has_no_path() -> Result<()> {
    let vertices = ["a", "b", "c", "d"];
    let edges = [("a", "b"), ("b", "a"), ("c", "d"), ("d", "c")];

    let input = encode(&vertices, &edges);
    let trailer = input.split("\n0\n").nth(1).unwrap().to_string();

    let report = Formula::parse_and_solve(&input)?;
    assert_eq!(report.solution, Solution::Unsat);
    assert_eq!(report.to_string(), format!("0\n{}", trailer));
    assert_eq!(decode(&report.to_string()), None);
    Ok(())
}
