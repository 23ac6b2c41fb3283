//! Facade crate for the UN/LOCODE data-access library.
//!
//! This crate re-exports the core domain types and lookups and exposes the
//! SQLite store behind a feature flag.

#![forbid(unsafe_code)]

pub use unlocode_core::{
    Country, CountryCodeError, CountryId, CountryView, Function, FunctionFlags, Functions,
    InvalidClassifier, Locode, LocodeCode, LocodeCodeError, LocodeId, LocodeStore, LocodeView,
    LookupError, NewCountry, NewLocode, UnsupportedFunction, contains_ignoring_case,
};

#[cfg(feature = "store-sqlite")]
pub use unlocode_core::{LocodeSchemaError, SqliteLocodeStore, SqliteLocodeStoreError};
