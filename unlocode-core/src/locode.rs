use std::fmt;

use crate::{Country, CountryId, Function, Functions, LocodeCode};

/// Internal identifier of a stored [`Locode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocodeId(pub i64);

impl fmt::Display for LocodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A UN/LOCODE location as read from a store.
///
/// `id` and `country_id` mirror storage and are omitted from the external
/// representation produced by [`Locode::to_external_view`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locode {
    /// Store-assigned identifier.
    pub id: LocodeId,
    /// Name as published, possibly with diacritics.
    pub name: String,
    /// Name with diacritics removed.
    pub name_wo_diacritics: String,
    /// Alternative (often former or local) name.
    pub alternative_name: String,
    /// Alternative name with diacritics removed.
    pub alternative_name_wo_diacritics: String,
    /// Three-character city code, unique within the country.
    pub city_code: String,
    /// Raw reference to the owning country.
    pub country_id: Option<CountryId>,
    /// The owning country, resolved by the store.
    pub country: Option<Country>,
    /// Functions the location serves.
    pub functions: Functions,
}

impl Locode {
    /// The combined code, available once the location has a country.
    ///
    /// Returns `None` when the country is unknown or the stored parts do not
    /// form a valid code.
    #[must_use]
    pub fn locode(&self) -> Option<LocodeCode> {
        let country = self.country.as_ref()?;
        LocodeCode::new(&country.code, &self.city_code).ok()
    }

    /// Whether the location serves `function`.
    #[must_use]
    pub const fn has_function(&self, function: Function) -> bool {
        self.functions.contains(function)
    }

    /// Whether `term` occurs in any of the four name fields, ignoring case.
    ///
    /// # Examples
    /// ```
    /// use unlocode_core::{NewLocode, LocodeId};
    ///
    /// let locode = NewLocode::named("Eindhoven").into_locode(LocodeId(1), None);
    /// assert!(locode.matches_name("ndho"));
    /// assert!(locode.matches_name("EINDHOVEN"));
    /// assert!(!locode.matches_name("Weert"));
    /// ```
    #[must_use]
    pub fn matches_name(&self, term: &str) -> bool {
        self.name_fields()
            .iter()
            .any(|field| contains_ignoring_case(field, term))
    }

    /// Whether the location is identified by `code`.
    #[must_use]
    pub fn matches_code(&self, code: &LocodeCode) -> bool {
        self.country
            .as_ref()
            .is_some_and(|country| country.code.eq_ignore_ascii_case(code.country()))
            && self.city_code.eq_ignore_ascii_case(code.city())
    }

    fn name_fields(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.name_wo_diacritics.as_str(),
            self.alternative_name.as_str(),
            self.alternative_name_wo_diacritics.as_str(),
        ]
    }
}

/// Case-insensitive substring test shared by every store.
///
/// Both sides are folded character by character with Unicode lowercase
/// mapping, so `"ÉVORA"` contains `"évo"`. Folding ignores context and maps
/// the final sigma `ς` to `σ`, so a needle ending in `Σ` or `ς` still matches
/// the same letter inside a word. An empty needle matches every haystack.
#[must_use]
pub fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

/// Attributes for a location that has not been stored yet.
///
/// Fields default to empty strings and no functions, so callers only set what
/// they know.
///
/// # Examples
/// ```
/// use unlocode_core::{Function, NewLocode};
///
/// let locode = NewLocode::named("Venlo")
///     .with_city_code("VEN")
///     .with_function(Function::RailTerminal);
/// assert_eq!(locode.name, "Venlo");
/// assert!(locode.functions.contains(Function::RailTerminal));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLocode {
    /// Name as published.
    pub name: String,
    /// Name with diacritics removed.
    pub name_wo_diacritics: String,
    /// Alternative name.
    pub alternative_name: String,
    /// Alternative name with diacritics removed.
    pub alternative_name_wo_diacritics: String,
    /// Three-character city code.
    pub city_code: String,
    /// Owning country, if any.
    pub country_id: Option<CountryId>,
    /// Functions the location serves.
    pub functions: Functions,
}

impl NewLocode {
    /// Start a location with the given primary name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the diacritic-free name.
    #[must_use]
    pub fn with_name_wo_diacritics(mut self, name: impl Into<String>) -> Self {
        self.name_wo_diacritics = name.into();
        self
    }

    /// Set the alternative name.
    #[must_use]
    pub fn with_alternative_name(mut self, name: impl Into<String>) -> Self {
        self.alternative_name = name.into();
        self
    }

    /// Set the diacritic-free alternative name.
    #[must_use]
    pub fn with_alternative_name_wo_diacritics(mut self, name: impl Into<String>) -> Self {
        self.alternative_name_wo_diacritics = name.into();
        self
    }

    /// Set the city code.
    #[must_use]
    pub fn with_city_code(mut self, city_code: impl Into<String>) -> Self {
        self.city_code = city_code.into();
        self
    }

    /// Attach the location to a stored country.
    #[must_use]
    pub fn in_country(mut self, country: &Country) -> Self {
        self.country_id = Some(country.id);
        self
    }

    /// Add a function flag.
    #[must_use]
    pub fn with_function(mut self, function: Function) -> Self {
        self.functions = self.functions.with(function);
        self
    }

    /// Replace all function flags.
    #[must_use]
    pub fn with_functions(mut self, functions: Functions) -> Self {
        self.functions = functions;
        self
    }

    /// Attach the identifier assigned by a store and the resolved country.
    #[must_use]
    pub fn into_locode(self, id: LocodeId, country: Option<Country>) -> Locode {
        Locode {
            id,
            name: self.name,
            name_wo_diacritics: self.name_wo_diacritics,
            alternative_name: self.alternative_name,
            alternative_name_wo_diacritics: self.alternative_name_wo_diacritics,
            city_code: self.city_code,
            country_id: self.country_id,
            country,
            functions: self.functions,
        }
    }
}
