//! Data access traits for UN/LOCODE locations.
//!
//! The `LocodeStore` trait defines the read-only queries the library offers:
//! fuzzy name search, name plus function, function only, and lookup by the
//! combined locode string. Each query is an explicit method call; there is no
//! shared query state between calls.

use log::{debug, warn};
use thiserror::Error;

use crate::{Function, Locode, LocodeCode, UnsupportedFunction};

#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use schema::{LocodeSchemaError, SCHEMA_VERSION, initialise_schema, verify_schema};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqliteLocodeStore, SqliteLocodeStoreError};

/// Errors returned by lookups that accept a function symbol.
///
/// An unknown symbol is always reported as [`LookupError::UnsupportedFunction`],
/// whichever lookup received it.
#[derive(Debug, Error)]
pub enum LookupError<E: std::error::Error + 'static> {
    /// The symbol does not name a supported function.
    #[error(transparent)]
    UnsupportedFunction(#[from] UnsupportedFunction),
    /// The backing store failed.
    #[error("locode store lookup failed: {0}")]
    Store(#[source] E),
}

/// Read-only access to stored locations.
///
/// Results are ordered by internal identifier. Empty results are not errors.
///
/// # Examples
///
/// ```rust
/// use unlocode_core::{Function, LocodeStore, NewLocode, test_support::MemoryStore};
///
/// let mut store = MemoryStore::default();
/// store.insert_locode(NewLocode::named("Eindhoven").with_function(Function::Port));
/// store.insert_locode(NewLocode::named("Weert"));
///
/// let found = store.find_by_fuzzy_name("hove").expect("lookup");
/// assert_eq!(found.len(), 1);
/// assert!(store.find_by_function_symbol("derp").is_err());
/// ```
pub trait LocodeStore {
    /// Failure raised by the backing store.
    type Error: std::error::Error + 'static;

    /// Locations whose name, diacritic-free name, alternative name or
    /// diacritic-free alternative name contains `term`, ignoring case.
    fn find_by_fuzzy_name(&self, term: &str) -> Result<Vec<Locode>, Self::Error>;

    /// Locations matching `term` as in [`LocodeStore::find_by_fuzzy_name`]
    /// that also serve `function`.
    fn find_by_name_and_function(
        &self,
        term: &str,
        function: Function,
    ) -> Result<Vec<Locode>, Self::Error>;

    /// Locations that serve `function`.
    fn find_by_function(&self, function: Function) -> Result<Vec<Locode>, Self::Error>;

    /// The location identified by `code`, if any.
    fn find_by_code(&self, code: &LocodeCode) -> Result<Option<Locode>, Self::Error>;

    /// The location identified by a combined string such as `NL VEN`, `NLVEN`
    /// or `NlVen`.
    ///
    /// Input that does not parse as a [`LocodeCode`] identifies nothing and
    /// yields `Ok(None)`.
    fn find_by_locode(&self, code: &str) -> Result<Option<Locode>, Self::Error> {
        match code.parse::<LocodeCode>() {
            Ok(parsed) => self.find_by_code(&parsed),
            Err(err) => {
                debug!("locode lookup for {code:?} matched nothing: {err}");
                Ok(None)
            }
        }
    }

    /// [`LocodeStore::find_by_function`] for a function named by symbol.
    fn find_by_function_symbol(
        &self,
        symbol: &str,
    ) -> Result<Vec<Locode>, LookupError<Self::Error>> {
        let function = parse_function(symbol)?;
        self.find_by_function(function).map_err(LookupError::Store)
    }

    /// [`LocodeStore::find_by_name_and_function`] for a function named by
    /// symbol.
    fn find_by_name_and_function_symbol(
        &self,
        term: &str,
        symbol: &str,
    ) -> Result<Vec<Locode>, LookupError<Self::Error>> {
        let function = parse_function(symbol)?;
        self.find_by_name_and_function(term, function)
            .map_err(LookupError::Store)
    }
}

fn parse_function(symbol: &str) -> Result<Function, UnsupportedFunction> {
    symbol.parse::<Function>().inspect_err(|err| {
        warn!("rejecting lookup: {err}");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewLocode, test_support::MemoryStore};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.insert_locode(NewLocode::named("Eindhoven").with_function(Function::Port));
        store.insert_locode(NewLocode::named("Eindhoven").with_function(Function::Airport));
        store
    }

    fn assert_unsupported(result: Result<Vec<Locode>, LookupError<std::convert::Infallible>>) {
        match result {
            Err(LookupError::UnsupportedFunction(err)) => assert_eq!(err.symbol, "derp"),
            other => panic!("expected UnsupportedFunction, found {other:?}"),
        }
    }

    #[rstest]
    fn function_lookup_rejects_unsupported_symbol(store: MemoryStore) {
        assert_unsupported(store.find_by_function_symbol("derp"));
    }

    #[rstest]
    fn name_and_function_lookup_rejects_unsupported_symbol(store: MemoryStore) {
        assert_unsupported(store.find_by_name_and_function_symbol("Eindhoven", "derp"));
    }

    #[rstest]
    fn supported_symbol_with_no_matches_is_empty(store: MemoryStore) {
        let found = store
            .find_by_name_and_function_symbol("Eindhoven", "rail_terminal")
            .expect("supported function");
        assert!(found.is_empty());
    }

    #[rstest]
    fn symbol_lookups_delegate_to_typed_queries(store: MemoryStore) {
        let by_symbol = store.find_by_function_symbol("airport").expect("lookup");
        let typed = store.find_by_function(Function::Airport).expect("lookup");
        assert_eq!(by_symbol, typed);
    }

    #[rstest]
    #[case("")]
    #[case("NL")]
    #[case("not a locode")]
    fn malformed_locodes_find_nothing(store: MemoryStore, #[case] input: &str) {
        assert_eq!(store.find_by_locode(input).expect("lookup"), None);
    }
}
