/*!
Engine configuration, read from the environment.
*/

use std::env;

use crate::prelude::*;

pub const UNIT_SIMPLIFY_VAR: &str = "RESOLUTE_UNIT_SIMPLIFY";
pub const MAX_CLAUSES_VAR: &str = "RESOLUTE_MAX_CLAUSES";

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{} must be a boolean (1/0, true/false, yes/no, on/off), found '{}'", var, value))]
    InvalidFlag { var: &'static str, value: String },
    #[snafu(display("{} must be a positive integer, found '{}'", var, value))]
    InvalidLimit {
        var: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("{} must be a positive integer, found 0", var))]
    ZeroLimit { var: &'static str },
    #[snafu(display("{} is not valid unicode", var))]
    NotUnicode { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// Run unit simplification before resolution.
    pub unit_simplify: bool,
    /// Upper bound on the working clause set. `None` means unbounded.
    /// Reaching the bound is handled like running out of memory.
    pub max_clauses: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|var| match env::var(var) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => NotUnicode { var }.fail(),
        })
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&'static str) -> Result<Option<String>, Error>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup(UNIT_SIMPLIFY_VAR)? {
            config.unit_simplify = parse_flag(UNIT_SIMPLIFY_VAR, &value)?;
        }

        if let Some(value) = lookup(MAX_CLAUSES_VAR)? {
            let limit = value.trim().parse::<usize>().context(InvalidLimit {
                var: MAX_CLAUSES_VAR,
                value: value.as_str(),
            })?;
            ensure!(limit > 0, ZeroLimit { var: MAX_CLAUSES_VAR });
            config.max_clauses = Some(limit);
        }

        Ok(config)
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, Error> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => InvalidFlag { var, value }.fail(),
    }
}
