//! Parsing of combined locode strings such as `"NL VEN"`.

use std::{fmt, str::FromStr};

use thiserror::Error;

const COUNTRY_LEN: usize = 2;
const CITY_LEN: usize = 3;

/// A parsed UN/LOCODE: a two-letter country code and a three-character city
/// code, both uppercase.
///
/// Parsing accepts any case, ignores surrounding whitespace and allows a single
/// space between the two parts.
///
/// # Examples
/// ```
/// use unlocode_core::LocodeCode;
///
/// let spaced: LocodeCode = "NL VEN".parse().expect("valid locode");
/// let compact: LocodeCode = "NLVEN".parse().expect("valid locode");
/// let mixed: LocodeCode = "NlVen".parse().expect("valid locode");
/// assert_eq!(spaced, compact);
/// assert_eq!(compact, mixed);
/// assert_eq!(mixed.to_string(), "NL VEN");
/// assert_eq!(mixed.compact(), "NLVEN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocodeCode {
    country: String,
    city: String,
}

impl LocodeCode {
    /// Build a code from its parts, applying the same validation as parsing.
    pub fn new(country: &str, city: &str) -> Result<Self, LocodeCodeError> {
        Ok(Self {
            country: normalise_country(country)?,
            city: normalise_city(city)?,
        })
    }

    /// Uppercase country part.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Uppercase city part.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Code without the separating space, e.g. `NLVEN`.
    #[must_use]
    pub fn compact(&self) -> String {
        format!("{}{}", self.country, self.city)
    }
}

impl fmt::Display for LocodeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.country, self.city)
    }
}

impl FromStr for LocodeCode {
    type Err = LocodeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LocodeCodeError::Empty);
        }

        let country: String = trimmed.chars().take(COUNTRY_LEN).collect();
        let remainder: String = trimmed.chars().skip(COUNTRY_LEN).collect();
        let city = remainder.strip_prefix(' ').unwrap_or(&remainder);

        Self::new(&country, city)
    }
}

fn normalise_country(country: &str) -> Result<String, LocodeCodeError> {
    if country.chars().count() == COUNTRY_LEN && country.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(country.to_ascii_uppercase())
    } else {
        Err(LocodeCodeError::InvalidCountry {
            country: country.to_owned(),
        })
    }
}

fn normalise_city(city: &str) -> Result<String, LocodeCodeError> {
    if city.chars().count() == CITY_LEN && city.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(city.to_ascii_uppercase())
    } else {
        Err(LocodeCodeError::InvalidCity {
            city: city.to_owned(),
        })
    }
}

/// Errors returned when a locode string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocodeCodeError {
    /// The input was empty or whitespace.
    #[error("locode is empty")]
    Empty,
    /// The country part is not two ASCII letters.
    #[error("country part '{country}' must be two ASCII letters")]
    InvalidCountry {
        /// The rejected country part.
        country: String,
    },
    /// The city part is not three ASCII letters or digits.
    #[error("city part '{city}' must be three ASCII letters or digits")]
    InvalidCity {
        /// The rejected city part.
        city: String,
    },
}
