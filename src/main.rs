use std::{
    convert::TryFrom,
    env::args,
    path::{Path, PathBuf},
};

use pretty_env_logger::formatted_builder;
use resolute::{
    config::{self, Config},
    parser::{self, parse_file},
    prelude::*,
    report::Report,
    solver::{ResolutionSolver, Solver, Verdict},
};

fn usage_string() -> String {
    format!(
        "Usage: {} <file_name>

Decides whether the formula in <file_name> is satisfiable.
Each non-empty line not starting with '#' is a clause of
whitespace separated literals, negated with a leading '!'.

Environment:
    {}=1    simplify unit clauses before resolution
    {}=<n>    give up after <n> clauses (reports satisfiable)",
        program_name(),
        config::UNIT_SIMPLIFY_VAR,
        config::MAX_CLAUSES_VAR,
    )
}

fn program_name() -> String {
    args().next().unwrap_or_else(|| "resolute".to_owned())
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Expected exactly one argument, found {}\n\n{}", count, usage_string()))]
    WrongArgumentCount { count: usize },
    #[snafu(display("Failed to load formula"))]
    ParserError { source: parser::Error },
    #[snafu(display("Invalid configuration"))]
    ConfigError { source: config::Error },
}

/// Returns the formula path, the only accepted argument.
fn input_path(args: Vec<String>) -> Result<PathBuf, Error> {
    match <[String; 1]>::try_from(args) {
        Ok([path]) => Ok(PathBuf::from(path)),
        Err(args) => WrongArgumentCount { count: args.len() }.fail(),
    }
}

fn solve_path<T: Solver>(path: &Path, config: Config) -> Result<Verdict, Error> {
    let formula = parse_file(path).context(ParserError)?;
    let solver = T::new(formula, config);
    Ok(solver.solve())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else {
        builder.parse_filters("resolute=warn");
    }

    builder.try_init().expect("Failed to initialize the logger");
}

fn main() -> Result<(), Report> {
    init_logger();

    // drop arg[0]
    let path = input_path(args().skip(1).collect())?;

    let config = Config::from_env().context(ConfigError)?;
    let verdict = solve_path::<ResolutionSolver>(&path, config)?;
    println!("{}", verdict);

    Ok(())
}
