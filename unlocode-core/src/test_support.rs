//! In-memory `LocodeStore` implementation used by unit and behaviour tests.

use std::convert::Infallible;

use thiserror::Error;

use crate::{
    Country, CountryId, Function, Locode, LocodeCode, LocodeId, LocodeStore, NewCountry, NewLocode,
};

/// Raised when a country code is stored twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("country code {code} is already stored")]
pub struct DuplicateCountryCode {
    /// The code that was already present.
    pub code: String,
}

/// In-memory `LocodeStore` implementation used in tests.
///
/// The store performs a linear scan and is intended only for small datasets.
/// Identifiers are assigned sequentially from 1 in insertion order.
#[derive(Default, Debug)]
pub struct MemoryStore {
    countries: Vec<Country>,
    locodes: Vec<Locode>,
}

impl MemoryStore {
    /// Create a store holding the given locations, none of which has a
    /// country.
    pub fn with_locodes<I>(locodes: I) -> Self
    where
        I: IntoIterator<Item = NewLocode>,
    {
        let mut store = Self::default();
        for locode in locodes {
            store.insert_locode(locode);
        }
        store
    }

    /// Store a country and return it with its assigned identifier.
    ///
    /// # Errors
    /// Returns [`DuplicateCountryCode`] when a country with the same code is
    /// already stored; codes are unique, as in the SQLite store.
    pub fn insert_country(
        &mut self,
        country: NewCountry,
    ) -> Result<Country, DuplicateCountryCode> {
        if self.countries.iter().any(|stored| stored.code == country.code()) {
            return Err(DuplicateCountryCode {
                code: country.code().to_owned(),
            });
        }
        let id = CountryId(next_id(self.countries.len()));
        let country = country.into_country(id);
        self.countries.push(country.clone());
        Ok(country)
    }

    /// Store a location and return it with its identifier and resolved
    /// country.
    ///
    /// A `country_id` that names no stored country is kept but resolves to no
    /// country.
    pub fn insert_locode(&mut self, locode: NewLocode) -> Locode {
        let id = LocodeId(next_id(self.locodes.len()));
        let country = locode.country_id.and_then(|country_id| {
            self.countries
                .iter()
                .find(|country| country.id == country_id)
                .cloned()
        });
        let locode = locode.into_locode(id, country);
        self.locodes.push(locode.clone());
        locode
    }

    fn matching(&self, predicate: impl Fn(&Locode) -> bool) -> Vec<Locode> {
        self.locodes
            .iter()
            .filter(|locode| predicate(locode))
            .cloned()
            .collect()
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |len| len + 1)
}

impl LocodeStore for MemoryStore {
    type Error = Infallible;

    fn find_by_fuzzy_name(&self, term: &str) -> Result<Vec<Locode>, Self::Error> {
        Ok(self.matching(|locode| locode.matches_name(term)))
    }

    fn find_by_name_and_function(
        &self,
        term: &str,
        function: Function,
    ) -> Result<Vec<Locode>, Self::Error> {
        Ok(self.matching(|locode| locode.has_function(function) && locode.matches_name(term)))
    }

    fn find_by_function(&self, function: Function) -> Result<Vec<Locode>, Self::Error> {
        Ok(self.matching(|locode| locode.has_function(function)))
    }

    fn find_by_code(&self, code: &LocodeCode) -> Result<Option<Locode>, Self::Error> {
        Ok(self
            .locodes
            .iter()
            .find(|locode| locode.matches_code(code))
            .cloned())
    }
}
