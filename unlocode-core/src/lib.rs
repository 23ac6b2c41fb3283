//! Core domain types and queries for UN/LOCODE locations.
//!
//! A [`Locode`] is a trade or transport location identified by a two-letter
//! country code and a three-character city code, such as `NL VEN`. Locations
//! carry four name variants and a set of [`Functions`] describing what the
//! location serves. The [`LocodeStore`] trait exposes the lookups; the SQLite
//! implementation lives behind the `store-sqlite` feature.
//!
//! # Examples
//!
//! ```
//! use unlocode_core::{Function, LocodeStore, NewLocode, test_support::MemoryStore};
//!
//! let mut store = MemoryStore::default();
//! store.insert_locode(NewLocode::named("Eindhoven").with_function(Function::Airport));
//!
//! let airports = store.find_by_name_and_function("eind", Function::Airport).expect("lookup");
//! assert_eq!(airports.len(), 1);
//! ```

#![forbid(unsafe_code)]

mod code;
mod country;
mod function;
mod locode;
pub mod store;
pub mod test_support;
pub mod view;

pub use code::{LocodeCode, LocodeCodeError};
pub use country::{Country, CountryCodeError, CountryId, NewCountry};
pub use function::{Function, Functions, InvalidClassifier, UnsupportedFunction};
pub use locode::{Locode, LocodeId, NewLocode, contains_ignoring_case};
pub use store::{LocodeStore, LookupError};
#[cfg(feature = "store-sqlite")]
pub use store::{LocodeSchemaError, SqliteLocodeStore, SqliteLocodeStoreError};
pub use view::{CountryView, FunctionFlags, LocodeView};
