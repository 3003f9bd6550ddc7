//! Command line parsing and [`Config`] construction.

use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command, builder::EnumValueParser, value_parser};

use crate::logger::LogLevel;

/// Settings collected from the command line and the environment before the session starts.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Config {
    /// The file to read commands from, or `None` to read them from stdin.
    pub input: Option<PathBuf>,
    /// The least severe [`LogLevel`] that is logged.
    pub log_level: LogLevel,
}

/// Parses `vma`'s arguments to construct a [`Config`].
pub fn get_config() -> Config {
    parse_arguments(&command_parser().get_matches())
}

/// Parses the arguments required to produce a valid [`Config`].
pub fn parse_arguments(matches: &ArgMatches) -> Config {
    let input = matches.get_one::<PathBuf>("input").cloned();

    let log_level = matches
        .get_one::<LogLevel>("log-level")
        .copied()
        .unwrap_or_else(|| unreachable!("`log-level` should have a default value"));

    Config { input, log_level }
}

/// Returns the command parser for `vma`.
pub fn command_parser() -> Command {
    let input = Arg::new("input")
        .long("input")
        .value_name("PATH")
        .help("Reads commands from the file at PATH instead of stdin")
        .value_parser(value_parser!(PathBuf));

    let log_level = Arg::new("log-level")
        .long("log-level")
        .env("VMA_LOG")
        .help("The least severe level of diagnostics written to stderr")
        .value_parser(EnumValueParser::<LogLevel>::new())
        .default_value("off");

    Command::new("vma")
        .about("Simulates a virtual address space driven by commands on stdin")
        .arg(input)
        .arg(log_level)
}
