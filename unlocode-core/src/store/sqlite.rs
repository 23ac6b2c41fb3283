//! SQLite-backed store implementation for UN/LOCODE locations.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::debug;
use rusqlite::{
    Connection, OpenFlags, OptionalExtension, Params, Row, ToSql, functions::FunctionFlags,
    params, params_from_iter,
};
use thiserror::Error;

use crate::{
    Country, CountryId, Function, Functions, Locode, LocodeCode, LocodeId, NewCountry, NewLocode,
    contains_ignoring_case,
};

use super::LocodeStore;
use super::schema::{LocodeSchemaError, initialise_schema, verify_schema};

/// Name of the scalar SQL function implementing case-insensitive matching.
///
/// SQLite's built-in `LIKE` only folds ASCII, which would miss accented names.
const CONTAINS_FUNCTION: &str = "unlocode_contains";

/// Columns read for every location, in the order [`read_locode`] expects.
const LOCODE_COLUMNS: &str = "l.id, l.name, l.name_wo_diacritics, l.alternative_name, \
     l.alternative_name_wo_diacritics, l.city_code, l.country_id, c.code, c.name";

/// Number of entries in [`LOCODE_COLUMNS`]; function flags follow.
const FUNCTION_COLUMN_OFFSET: usize = 9;

/// Error raised when opening, writing to or querying the SQLite store.
#[derive(Debug, Error)]
pub enum SqliteLocodeStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The schema could not be created or did not match.
    #[error(transparent)]
    Schema(#[from] LocodeSchemaError),
    /// Registering the matching function on the connection failed.
    #[error("failed to register SQL function {CONTAINS_FUNCTION}: {source}")]
    RegisterFunction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A location referenced a country that is not stored.
    #[error("country {id} referenced by locode '{name}' is missing from the countries table")]
    MissingCountry {
        /// Identifier of the missing country.
        id: CountryId,
        /// Name of the location being inserted.
        name: String,
    },
    /// A statement failed.
    #[error("failed to {operation}: {source}")]
    Sqlite {
        /// What the store was doing.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// UN/LOCODE store backed by an SQLite database.
pub struct SqliteLocodeStore {
    connection: Connection,
}

impl fmt::Debug for SqliteLocodeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteLocodeStore")
            .field("path", &self.connection.path())
            .finish_non_exhaustive()
    }
}

impl SqliteLocodeStore {
    /// Open, creating if needed, a writable store at `database_path`.
    pub fn open<P: AsRef<Path>>(database_path: P) -> Result<Self, SqliteLocodeStoreError> {
        let database_path = database_path.as_ref();
        let connection = Connection::open(database_path).map_err(|source| {
            SqliteLocodeStoreError::OpenDatabase {
                path: database_path.to_path_buf(),
                source,
            }
        })?;
        Self::initialise(connection)
    }

    /// Open an existing store without write access.
    ///
    /// The schema must already exist at the current version.
    pub fn open_read_only<P: AsRef<Path>>(
        database_path: P,
    ) -> Result<Self, SqliteLocodeStoreError> {
        let database_path = database_path.as_ref();
        let connection =
            Connection::open_with_flags(database_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
                |source| SqliteLocodeStoreError::OpenDatabase {
                    path: database_path.to_path_buf(),
                    source,
                },
            )?;
        verify_schema(&connection)?;
        register_functions(&connection)?;
        Ok(Self { connection })
    }

    /// Create a store in a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self, SqliteLocodeStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteLocodeStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::initialise(connection)
    }

    fn initialise(mut connection: Connection) -> Result<Self, SqliteLocodeStoreError> {
        initialise_schema(&mut connection)?;
        register_functions(&connection)?;
        Ok(Self { connection })
    }

    /// Store a country and return it with its assigned identifier.
    ///
    /// # Examples
    /// ```
    /// use unlocode_core::{NewCountry, SqliteLocodeStore};
    ///
    /// let store = SqliteLocodeStore::open_in_memory().expect("open store");
    /// let country = NewCountry::new("NL", "NETHERLANDS").expect("valid code");
    /// let stored = store.insert_country(&country).expect("insert country");
    /// assert_eq!(stored.code, "NL");
    /// ```
    pub fn insert_country(&self, country: &NewCountry) -> Result<Country, SqliteLocodeStoreError> {
        self.connection
            .execute(
                "INSERT INTO countries (code, name) VALUES (?1, ?2)",
                params![country.code(), country.name()],
            )
            .map_err(|source| SqliteLocodeStoreError::Sqlite {
                operation: "insert country",
                source,
            })?;
        let id = CountryId(self.connection.last_insert_rowid());
        debug!("stored country {} as {id}", country.code());
        Ok(country.clone().into_country(id))
    }

    /// Store a location and return it with its identifier and resolved
    /// country.
    pub fn insert_locode(&self, locode: &NewLocode) -> Result<Locode, SqliteLocodeStoreError> {
        let country = locode
            .country_id
            .map(|id| {
                self.country(id)?
                    .ok_or_else(|| SqliteLocodeStoreError::MissingCountry {
                        id,
                        name: locode.name.clone(),
                    })
            })
            .transpose()?;

        let country_id = locode.country_id.map(|id| id.0);
        let flags = Function::ALL.map(|function| locode.functions.contains(function));
        let mut values: Vec<&dyn ToSql> = vec![
            &locode.name,
            &locode.name_wo_diacritics,
            &locode.alternative_name,
            &locode.alternative_name_wo_diacritics,
            &locode.city_code,
            &country_id,
        ];
        values.extend(flags.iter().map(|flag| flag as &dyn ToSql));

        self.connection
            .execute(&insert_locode_sql(), params_from_iter(values))
            .map_err(|source| SqliteLocodeStoreError::Sqlite {
                operation: "insert locode",
                source,
            })?;
        let id = LocodeId(self.connection.last_insert_rowid());
        debug!("stored locode {:?} as {id}", locode.name);
        Ok(locode.clone().into_locode(id, country))
    }

    /// The stored country with identifier `id`, if any.
    pub fn country(&self, id: CountryId) -> Result<Option<Country>, SqliteLocodeStoreError> {
        self.connection
            .query_row(
                "SELECT id, code, name FROM countries WHERE id = ?1",
                [id.0],
                |row| {
                    Ok(Country {
                        id: CountryId(row.get(0)?),
                        code: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|source| SqliteLocodeStoreError::Sqlite {
                operation: "load country",
                source,
            })
    }

    /// The stored location with identifier `id`, if any.
    pub fn locode(&self, id: LocodeId) -> Result<Option<Locode>, SqliteLocodeStoreError> {
        let mut locodes = self.query_locodes("load locode", "l.id = ?1", [id.0])?;
        Ok(locodes.pop())
    }

    fn query_locodes<P: Params>(
        &self,
        operation: &'static str,
        predicate: &str,
        params: P,
    ) -> Result<Vec<Locode>, SqliteLocodeStoreError> {
        let sql = select_locodes(predicate);
        let to_error =
            move |source: rusqlite::Error| SqliteLocodeStoreError::Sqlite { operation, source };

        let mut statement = self.connection.prepare_cached(&sql).map_err(to_error)?;
        let locodes = statement
            .query_map(params, read_locode)
            .map_err(to_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_error)?;
        Ok(locodes)
    }
}

impl LocodeStore for SqliteLocodeStore {
    type Error = SqliteLocodeStoreError;

    fn find_by_fuzzy_name(&self, term: &str) -> Result<Vec<Locode>, Self::Error> {
        let locodes = self.query_locodes("find locodes by name", &fuzzy_name_predicate(), [term])?;
        debug!("fuzzy name lookup for {term:?} matched {} locodes", locodes.len());
        Ok(locodes)
    }

    fn find_by_name_and_function(
        &self,
        term: &str,
        function: Function,
    ) -> Result<Vec<Locode>, Self::Error> {
        let predicate = format!(
            "({}) AND {}",
            fuzzy_name_predicate(),
            function_predicate(function)
        );
        let locodes = self.query_locodes("find locodes by name and function", &predicate, [term])?;
        debug!(
            "name and {function} lookup for {term:?} matched {} locodes",
            locodes.len()
        );
        Ok(locodes)
    }

    fn find_by_function(&self, function: Function) -> Result<Vec<Locode>, Self::Error> {
        let locodes = self.query_locodes(
            "find locodes by function",
            &function_predicate(function),
            [],
        )?;
        debug!("{function} lookup matched {} locodes", locodes.len());
        Ok(locodes)
    }

    fn find_by_code(&self, code: &LocodeCode) -> Result<Option<Locode>, Self::Error> {
        let locodes = self.query_locodes(
            "find locode by code",
            "upper(c.code) = ?1 AND upper(l.city_code) = ?2",
            [code.country(), code.city()],
        )?;
        debug!("locode lookup for {code} matched {} locodes", locodes.len());
        // Lowest identifier wins when the table carries duplicates.
        Ok(locodes.into_iter().next())
    }
}

fn register_functions(connection: &Connection) -> Result<(), SqliteLocodeStoreError> {
    connection
        .create_scalar_function(
            CONTAINS_FUNCTION,
            2,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |context| {
                let haystack: Option<String> = context.get(0)?;
                let needle: Option<String> = context.get(1)?;
                Ok(match (haystack, needle) {
                    (Some(haystack), Some(needle)) => contains_ignoring_case(&haystack, &needle),
                    _ => false,
                })
            },
        )
        .map_err(|source| SqliteLocodeStoreError::RegisterFunction { source })
}

fn insert_locode_sql() -> String {
    let columns: Vec<&str> = Function::ALL
        .iter()
        .map(|function| function.as_str())
        .collect();
    let placeholders: Vec<String> = (1..=6 + columns.len())
        .map(|index| format!("?{index}"))
        .collect();
    format!(
        "INSERT INTO locodes (name, name_wo_diacritics, alternative_name, \
         alternative_name_wo_diacritics, city_code, country_id, {}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn select_locodes(predicate: &str) -> String {
    let function_columns: Vec<String> = Function::ALL
        .iter()
        .map(|function| format!("l.{}", function.as_str()))
        .collect();
    format!(
        "SELECT {LOCODE_COLUMNS}, {}
         FROM locodes AS l
         LEFT JOIN countries AS c ON c.id = l.country_id
         WHERE {predicate}
         ORDER BY l.id",
        function_columns.join(", ")
    )
}

fn fuzzy_name_predicate() -> String {
    [
        "l.name",
        "l.name_wo_diacritics",
        "l.alternative_name",
        "l.alternative_name_wo_diacritics",
    ]
    .iter()
    .map(|column| format!("{CONTAINS_FUNCTION}({column}, ?1)"))
    .collect::<Vec<_>>()
    .join(" OR ")
}

/// Column names come from the closed [`Function`] vocabulary, never from
/// caller input.
fn function_predicate(function: Function) -> String {
    format!("l.{} = 1", function.as_str())
}

fn read_locode(row: &Row<'_>) -> rusqlite::Result<Locode> {
    let country_id: Option<i64> = row.get(6)?;
    let country_code: Option<String> = row.get(7)?;
    let country_name: Option<String> = row.get(8)?;
    let country = match (country_id, country_code, country_name) {
        (Some(id), Some(code), Some(name)) => Some(Country {
            id: CountryId(id),
            code,
            name,
        }),
        _ => None,
    };

    let mut functions = Functions::empty();
    for (offset, function) in Function::ALL.into_iter().enumerate() {
        let flag: bool = row.get(FUNCTION_COLUMN_OFFSET + offset)?;
        if flag {
            functions.insert(function);
        }
    }

    Ok(Locode {
        id: LocodeId(row.get(0)?),
        name: row.get(1)?,
        name_wo_diacritics: row.get(2)?,
        alternative_name: row.get(3)?,
        alternative_name_wo_diacritics: row.get(4)?,
        city_code: row.get(5)?,
        country_id: country_id.map(CountryId),
        country,
        functions,
    })
}
