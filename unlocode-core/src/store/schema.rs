use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

use crate::Function;

/// Version of the schema created by [`initialise_schema`].
pub const SCHEMA_VERSION: i64 = 1;

/// Initialise the UN/LOCODE schema inside an SQLite database.
///
/// The function enables foreign keys, creates the `countries` and `locodes`
/// tables with their indexes, and records the schema version. Existing
/// installations must already match the expected version; mismatches are
/// rejected so migrations can be applied explicitly.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use unlocode_core::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create UN/LOCODE schema");
///
/// let version: i64 = conn
///     .query_row(
///         "SELECT version FROM unlocode_schema_version LIMIT 1",
///         [],
///         |row| row.get(0),
///     )
///     .expect("read schema version");
/// assert_eq!(version, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), LocodeSchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| LocodeSchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| LocodeSchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| LocodeSchemaError::Migration {
            step: "commit schema transaction",
            source,
        })?;

    Ok(())
}

/// Check that a database carries the expected schema version without writing
/// to it.
pub fn verify_schema(connection: &Connection) -> Result<(), LocodeSchemaError> {
    match read_schema_version(connection)? {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(LocodeSchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => Err(LocodeSchemaError::Uninitialised),
    }
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), LocodeSchemaError> {
    run_migration_step(
        transaction,
        "create countries",
        "CREATE TABLE IF NOT EXISTS countries (
            id INTEGER PRIMARY KEY,
            code TEXT NOT NULL UNIQUE CHECK (length(code) = 2),
            name TEXT NOT NULL
        )",
    )?;

    let function_columns: String = Function::ALL
        .iter()
        .map(|function| {
            format!(
                ",\n            {column} INTEGER NOT NULL DEFAULT 0 CHECK ({column} IN (0, 1))",
                column = function.as_str()
            )
        })
        .collect();
    let create_locodes = format!(
        "CREATE TABLE IF NOT EXISTS locodes (
            id INTEGER PRIMARY KEY,
            country_id INTEGER REFERENCES countries(id),
            name TEXT NOT NULL DEFAULT '',
            name_wo_diacritics TEXT NOT NULL DEFAULT '',
            alternative_name TEXT NOT NULL DEFAULT '',
            alternative_name_wo_diacritics TEXT NOT NULL DEFAULT '',
            city_code TEXT NOT NULL DEFAULT ''{function_columns}
        )"
    );
    run_migration_step(transaction, "create locodes", &create_locodes)
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), LocodeSchemaError> {
    run_migration_step(
        transaction,
        "index locodes by code",
        "CREATE INDEX IF NOT EXISTS idx_locodes_country_city
            ON locodes(country_id, city_code)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), LocodeSchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS unlocode_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    match read_schema_version(transaction)? {
        Some(version) if version == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(LocodeSchemaError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }
        None => {
            transaction
                .execute(
                    "INSERT INTO unlocode_schema_version (version) VALUES (?1)",
                    [SCHEMA_VERSION],
                )
                .map_err(|source| LocodeSchemaError::Migration {
                    step: "record schema version",
                    source,
                })?;
        }
    }

    Ok(())
}

fn read_schema_version(connection: &Connection) -> Result<Option<i64>, LocodeSchemaError> {
    let table_exists = connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'unlocode_schema_version'",
            [],
            |_| Ok(()),
        )
        .optional()
        .map_err(|source| LocodeSchemaError::Migration {
            step: "look up schema version table",
            source,
        })?
        .is_some();
    if !table_exists {
        return Ok(None);
    }

    connection
        .query_row(
            "SELECT version FROM unlocode_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| LocodeSchemaError::Migration {
            step: "read schema version",
            source,
        })
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), LocodeSchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| LocodeSchemaError::Migration { step, source })
}

/// Errors raised when initialising or checking the UN/LOCODE schema.
#[derive(Debug, Error)]
pub enum LocodeSchemaError {
    /// Foreign key enforcement could not be switched on.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A migration statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Human-readable name of the failed step.
        step: &'static str,
        /// Error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was created by a different schema version.
    #[error(
        "expected UN/LOCODE schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch {
        /// Version this library understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
    /// The database has never been initialised.
    #[error("database does not contain a UN/LOCODE schema")]
    Uninitialised,
}
