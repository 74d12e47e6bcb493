use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::formula::{Clause, Cnf, VariableParseError};
use crate::prelude::*;

/// Comments start with this character in the first column.
const COMMENT: char = '#';

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unable to open formula file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("I/O error occurred while reading line {}", line))]
    ReadError {
        line: usize,
        source: std::io::Error,
    },
    #[snafu(display("Invalid literal '{}' on line {}", token, line))]
    MalformedLiteral {
        line: usize,
        token: String,
        source: VariableParseError,
    },
}

/// Parse a line to a clause.
/// Returns `None` for blank and comment lines.
fn parse_line(cnf: &mut Cnf, line: &str, line_number: usize) -> Result<Option<Clause>, Error> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with(COMMENT) {
        return Ok(None);
    }

    let mut clause = Clause::empty();
    for token in line.split_whitespace() {
        let literal = cnf
            .parse_literal(token)
            .with_context(|| MalformedLiteral {
                line: line_number,
                token: token.to_owned(),
            })?;
        clause.push(literal);
    }

    Ok(Some(clause))
}

/// Parses a formula, one clause per line.
///
/// Any invalid literal fails the whole load. Tautologies are dropped.
pub fn parse_reader(reader: impl BufRead) -> Result<Cnf, Error> {
    let mut cnf = Cnf::new();
    let mut dropped = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.context(ReadError { line: line_number })?;

        if let Some(clause) = parse_line(&mut cnf, &line, line_number)? {
            if !cnf.add_clause(clause) {
                trace!("Dropping tautology on line {}", line_number);
                dropped += 1;
            }
        }
    }

    debug!(
        "Loaded {} clauses over {} variables ({} tautologies dropped)",
        cnf.clauses().len(),
        cnf.num_variables(),
        dropped
    );

    Ok(cnf)
}

pub fn parse_str(input: &str) -> Result<Cnf, Error> {
    parse_reader(input.as_bytes())
}

/// Parses a formula from a file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf, Error> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path).context(IoError {
        path: path.to_owned(),
    })?);

    debug!("Reading formula from '{}'", path.display());
    parse_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Clause;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let cnf = parse_str("# header\n\n   \t\nA B\n#!A\n").unwrap();

        assert_eq!(cnf.clauses().len(), 1);
        assert_eq!(cnf.num_variables(), 2);
    }

    #[test]
    fn literal_order_is_irrelevant() {
        let cnf = parse_str("A !B\n!B A\n").unwrap();
        let clauses = cnf.clauses();

        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].num_literals(), 2);
        assert_eq!(clauses[0], clauses[1]);
        assert!(cnf.contains(&clauses[0], "B", true));
    }

    #[test]
    fn duplicate_clauses_are_kept() {
        let cnf = parse_str("A B\nB A\nA B\n").unwrap();
        assert_eq!(cnf.clauses().len(), 3);
    }

    #[test]
    fn tabs_and_trailing_whitespace() {
        let cnf = parse_str("A\t!B   C  \r\n").unwrap();
        let a = cnf.find_literal("A", true).unwrap();
        let b = cnf.find_literal("B", false).unwrap();
        let c = cnf.find_literal("C", true).unwrap();

        assert_eq!(cnf.clauses(), &[Clause::new(vec![c, b, a])]);
    }

    #[test]
    fn tautologies_are_dropped() {
        let cnf = parse_str("A !A B\nC\n").unwrap();
        assert_eq!(cnf.clauses().len(), 1);
    }

    #[test]
    fn invalid_identifier_fails_whole_load() {
        let err = parse_str("A B\n!C\n1bad D\nE\n").unwrap_err();
        match err {
            Error::MalformedLiteral { line, token, .. } => {
                assert_eq!(line, 3);
                assert_eq!(token, "1bad");
            }
            other => panic!("unexpected error: {}", other),
        }

        assert!(parse_str("A !\n").is_err());
        assert!(parse_str("A b-c\n").is_err());
        assert!(parse_str(" # indented comment\n").is_err());
    }

    #[test]
    fn comment_only_input_is_empty_formula() {
        let cnf = parse_str("# nothing here\n# at all\n").unwrap();
        assert!(cnf.clauses().is_empty());
    }

    #[test]
    fn long_names_are_accepted() {
        let name = "a".repeat(64);
        let cnf = parse_str(&format!("{} B\n!{}\n", name, name)).unwrap();

        assert_eq!(cnf.clauses().len(), 2);
        assert!(cnf.find_literal(&name, false).is_some());
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let input: &[u8] = b"A B\n!C\n\xff\xfe D\n";
        match parse_reader(input).unwrap_err() {
            Error::ReadError { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let err = parse_file("testcases/does/not/exist.cnf").unwrap_err();
        assert!(matches!(err, Error::IoError { .. }));
    }
}
