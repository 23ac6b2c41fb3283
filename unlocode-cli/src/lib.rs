//! Command-line interface for querying a UN/LOCODE SQLite database.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod lookup;

pub use error::CliError;
use lookup::{FunctionArgs, LocodeArgs, SearchArgs, run_function, run_locode, run_search};

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_FUNCTION: &str = "function";
pub(crate) const ARG_SEARCH_TERM: &str = "term";
pub(crate) const ARG_FUNCTION_SYMBOL: &str = "symbol";
pub(crate) const ARG_LOCODE_CODE: &str = "code";
pub(crate) const ENV_SEARCH_TERM: &str = "UNLOCODE_CMDS_SEARCH_TERM";
pub(crate) const ENV_FUNCTION_SYMBOL: &str = "UNLOCODE_CMDS_FUNCTION_SYMBOL";
pub(crate) const ENV_LOCODE_CODE: &str = "UNLOCODE_CMDS_LOCODE_CODE";
/// Database used when no `--database` is configured.
pub(crate) const DEFAULT_DATABASE: &str = "unlocode.db";

/// Run the CLI with the current process arguments and environment, writing
/// results to standard output.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli.command, &mut stdout)
}

fn run_with(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Search(args) => run_search(args, writer),
        Command::Function(args) => run_function(args, writer),
        Command::Locode(args) => run_locode(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "unlocode",
    about = "Query UN/LOCODE locations stored in SQLite",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find locations whose names contain a term.
    Search(SearchArgs),
    /// List locations serving a function.
    Function(FunctionArgs),
    /// Resolve a locode such as "NL VEN".
    Locode(LocodeArgs),
}

#[cfg(test)]
mod tests;
