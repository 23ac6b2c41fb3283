//! Lookup commands for the UN/LOCODE CLI.
//!
//! Each command resolves its layered configuration, checks the database path,
//! opens the store read-only and prints the external JSON view of the results.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use unlocode_core::{LocodeStore, LookupError, SqliteLocodeStore, SqliteLocodeStoreError};

use crate::{
    ARG_DATABASE, ARG_FUNCTION, ARG_FUNCTION_SYMBOL, ARG_LOCODE_CODE, ARG_SEARCH_TERM, CliError,
    DEFAULT_DATABASE, ENV_FUNCTION_SYMBOL, ENV_LOCODE_CODE, ENV_SEARCH_TERM, fs,
};

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "search",
    long_about = "Search the name, diacritic-free name and alternative names \
                 of every location for a case-insensitive substring. Pass \
                 --function to keep only locations serving that function.",
    about = "Find locations by name"
)]
#[ortho_config(prefix = "UNLOCODE")]
pub(crate) struct SearchArgs {
    /// Text to look for in location names.
    #[arg(value_name = "term")]
    #[serde(default)]
    pub(crate) term: Option<String>,
    /// Only return locations serving this function (e.g. "port").
    #[arg(long = ARG_FUNCTION, value_name = "symbol")]
    #[serde(default)]
    pub(crate) function: Option<String>,
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `function` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "function",
    long_about = "List every location serving a function. Supported symbols \
                 are port, rail_terminal, road_terminal, airport, \
                 postal_exchange_office, inland_clearance_depot, \
                 fixed_transport and border_crossing.",
    about = "List locations by function"
)]
#[ortho_config(prefix = "UNLOCODE")]
pub(crate) struct FunctionArgs {
    /// Function symbol such as "airport".
    #[arg(value_name = "symbol")]
    #[serde(default)]
    pub(crate) symbol: Option<String>,
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `locode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "locode",
    long_about = "Resolve a combined code such as \"NL VEN\", \"NLVEN\" or \
                 \"nlven\". Prints null when no location matches.",
    about = "Look up a location by locode"
)]
#[ortho_config(prefix = "UNLOCODE")]
pub(crate) struct LocodeArgs {
    /// Locode to resolve.
    #[arg(value_name = "code")]
    #[serde(default)]
    pub(crate) code: Option<String>,
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

impl FunctionArgs {
    pub(crate) fn into_config(self) -> Result<FunctionConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        FunctionConfig::try_from(merged)
    }
}

impl LocodeArgs {
    pub(crate) fn into_config(self) -> Result<LocodeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LocodeConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) term: String,
    pub(crate) function: Option<String>,
    pub(crate) database: Utf8PathBuf,
}

/// Resolved `function` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FunctionConfig {
    pub(crate) symbol: String,
    pub(crate) database: Utf8PathBuf,
}

/// Resolved `locode` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LocodeConfig {
    pub(crate) code: String,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let term = args.term.ok_or(CliError::MissingArgument {
            field: ARG_SEARCH_TERM,
            env: ENV_SEARCH_TERM,
        })?;
        Ok(Self {
            term,
            function: args.function,
            database: database_or_default(args.database),
        })
    }
}

impl TryFrom<FunctionArgs> for FunctionConfig {
    type Error = CliError;

    fn try_from(args: FunctionArgs) -> Result<Self, Self::Error> {
        let symbol = args.symbol.ok_or(CliError::MissingArgument {
            field: ARG_FUNCTION_SYMBOL,
            env: ENV_FUNCTION_SYMBOL,
        })?;
        Ok(Self {
            symbol,
            database: database_or_default(args.database),
        })
    }
}

impl TryFrom<LocodeArgs> for LocodeConfig {
    type Error = CliError;

    fn try_from(args: LocodeArgs) -> Result<Self, Self::Error> {
        let code = args.code.ok_or(CliError::MissingArgument {
            field: ARG_LOCODE_CODE,
            env: ENV_LOCODE_CODE,
        })?;
        Ok(Self {
            code,
            database: database_or_default(args.database),
        })
    }
}

fn database_or_default(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE))
}

/// Check the database path before SQLite gets a chance to create it.
pub(crate) fn require_database(path: &Utf8Path) -> Result<(), CliError> {
    match fs::path_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::DatabaseNotFile {
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingDatabase {
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectDatabase {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn open_store(path: &Utf8Path) -> Result<SqliteLocodeStore, CliError> {
    require_database(path)?;
    debug!("opening locode database {path}");
    SqliteLocodeStore::open_read_only(path.as_std_path()).map_err(|source| CliError::OpenStore {
        path: path.to_path_buf(),
        source,
    })
}

fn map_lookup_error(err: LookupError<SqliteLocodeStoreError>) -> CliError {
    match err {
        LookupError::UnsupportedFunction(source) => CliError::UnsupportedFunction(source),
        LookupError::Store(source) => CliError::Query(source),
    }
}

pub(super) fn run_search(args: SearchArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_search(&config, writer)
}

pub(super) fn execute_search(
    config: &SearchConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let locodes = match config.function.as_deref() {
        Some(symbol) => store
            .find_by_name_and_function_symbol(&config.term, symbol)
            .map_err(map_lookup_error)?,
        None => store
            .find_by_fuzzy_name(&config.term)
            .map_err(CliError::Query)?,
    };
    write_json(writer, &locodes)
}

pub(super) fn run_function(args: FunctionArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_function(&config, writer)
}

pub(super) fn execute_function(
    config: &FunctionConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let locodes = store
        .find_by_function_symbol(&config.symbol)
        .map_err(map_lookup_error)?;
    write_json(writer, &locodes)
}

pub(super) fn run_locode(args: LocodeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_locode(&config, writer)
}

pub(super) fn execute_locode(
    config: &LocodeConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let store = open_store(&config.database)?;
    let locode = store
        .find_by_locode(&config.code)
        .map_err(CliError::Query)?;
    write_json(writer, &locode)
}

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn search_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SearchConfig, CliError> {
    let merged = SearchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SearchConfig::try_from(merged)
}
