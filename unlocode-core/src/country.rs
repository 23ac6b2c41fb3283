use std::fmt;

use thiserror::Error;

/// Internal identifier of a stored [`Country`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryId(pub i64);

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A country that locations belong to.
///
/// The identifier is internal to the store and never appears in the external
/// representation; see [`crate::view::CountryView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// Store-assigned identifier.
    pub id: CountryId,
    /// Two-letter uppercase country code, e.g. `NL`.
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Validated attributes for a country that has not been stored yet.
///
/// # Examples
/// ```
/// use unlocode_core::NewCountry;
///
/// let country = NewCountry::new("nl", "Netherlands").expect("valid code");
/// assert_eq!(country.code(), "NL");
/// assert!(NewCountry::new("NLD", "Netherlands").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCountry {
    code: String,
    name: String,
}

impl NewCountry {
    /// Validate `code` as two ASCII letters and normalise it to uppercase.
    pub fn new(code: &str, name: impl Into<String>) -> Result<Self, CountryCodeError> {
        let trimmed = code.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CountryCodeError {
                code: code.to_owned(),
            });
        }
        Ok(Self {
            code: trimmed.to_ascii_uppercase(),
            name: name.into(),
        })
    }

    /// Normalised country code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the identifier assigned by a store.
    #[must_use]
    pub fn into_country(self, id: CountryId) -> Country {
        Country {
            id,
            code: self.code,
            name: self.name,
        }
    }
}

/// Returned by [`NewCountry::new`] when the code is not two ASCII letters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("country code '{code}' must be exactly two ASCII letters")]
pub struct CountryCodeError {
    /// The rejected input.
    pub code: String,
}
