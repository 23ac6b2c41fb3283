//! External representation of stored locations.
//!
//! Views borrow from the stored records and carry only what callers outside
//! the store may see: the country is nested as `{code, name}` and internal
//! identifiers (`id`, `country_id`) are never included.
//!
//! # Examples
//! ```
//! use unlocode_core::{Country, CountryId, Function, LocodeId, NewLocode};
//!
//! let belgium = Country { id: CountryId(4), code: "BE".into(), name: "Belgium".into() };
//! let locode = NewLocode::named("Eindhoven")
//!     .with_function(Function::Port)
//!     .in_country(&belgium)
//!     .into_locode(LocodeId(7), Some(belgium));
//!
//! let json = serde_json::to_value(&locode).expect("serialise view");
//! assert_eq!(json["country"], serde_json::json!({"code": "BE", "name": "Belgium"}));
//! assert_eq!(json["port"], true);
//! assert!(json.get("id").is_none());
//! assert!(json.get("country_id").is_none());
//! ```

use crate::{Country, Function, Functions, Locode};

/// Country as exposed to callers: code and name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CountryView<'a> {
    /// Two-letter country code.
    pub code: &'a str,
    /// Display name.
    pub name: &'a str,
}

impl<'a> From<&'a Country> for CountryView<'a> {
    fn from(country: &'a Country) -> Self {
        Self {
            code: &country.code,
            name: &country.name,
        }
    }
}

/// Location as exposed to callers.
///
/// Function flags serialise as one boolean key per [`Function`], so a view
/// always lists the full vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocodeView<'a> {
    /// Name as published.
    pub name: &'a str,
    /// Name with diacritics removed.
    pub name_wo_diacritics: &'a str,
    /// Alternative name.
    pub alternative_name: &'a str,
    /// Alternative name with diacritics removed.
    pub alternative_name_wo_diacritics: &'a str,
    /// City code.
    pub city_code: &'a str,
    /// Canonical combined code such as `NL VEN`, when a country is known.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub locode: Option<String>,
    /// Function flags.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub functions: FunctionFlags,
    /// Nested country, or `null` when the location has none.
    pub country: Option<CountryView<'a>>,
}

/// Function flags rendered as `{"port": true, "airport": false, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionFlags(pub Functions);

impl FunctionFlags {
    /// Flag value for a single function.
    #[must_use]
    pub const fn get(self, function: Function) -> bool {
        self.0.contains(function)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FunctionFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Function::ALL.len()))?;
        for function in Function::ALL {
            map.serialize_entry(function.as_str(), &self.get(function))?;
        }
        map.end()
    }
}

impl Locode {
    /// Shape the location for callers outside the store.
    #[must_use]
    pub fn to_external_view(&self) -> LocodeView<'_> {
        LocodeView {
            name: &self.name,
            name_wo_diacritics: &self.name_wo_diacritics,
            alternative_name: &self.alternative_name,
            alternative_name_wo_diacritics: &self.alternative_name_wo_diacritics,
            city_code: &self.city_code,
            locode: self.locode().map(|code| code.to_string()),
            functions: FunctionFlags(self.functions),
            country: self.country.as_ref().map(CountryView::from),
        }
    }

    /// The external view as a JSON value.
    #[cfg(feature = "serde")]
    pub fn as_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.to_external_view())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Locode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_external_view().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Country {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CountryView::from(self).serialize(serializer)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::{CountryId, LocodeId, NewLocode};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn belgium() -> Country {
        Country {
            id: CountryId(1),
            code: "BE".into(),
            name: "Belgium".into(),
        }
    }

    #[fixture]
    fn eindhoven(belgium: Country) -> Locode {
        NewLocode::named("Eindhoven")
            .with_function(Function::Port)
            .in_country(&belgium)
            .into_locode(LocodeId(12), Some(belgium))
    }

    #[rstest]
    fn nests_country_code_and_name_only(eindhoven: Locode) {
        let json = eindhoven.as_json().expect("serialise view");
        assert_eq!(json["country"], json!({"code": "BE", "name": "Belgium"}));
    }

    #[rstest]
    #[case("id")]
    #[case("country_id")]
    fn omits_internal_identifiers(eindhoven: Locode, #[case] key: &str) {
        let json = eindhoven.as_json().expect("serialise view");
        assert!(json.get(key).is_none(), "view must not expose {key}");
    }

    #[rstest]
    fn lists_every_function_flag(eindhoven: Locode) {
        let json = eindhoven.as_json().expect("serialise view");
        for function in Function::ALL {
            let expected = function == Function::Port;
            assert_eq!(json[function.as_str()], json!(expected), "{function}");
        }
    }

    #[rstest]
    fn includes_names_and_locode(belgium: Country) {
        let locode = NewLocode::named("Antwerpen")
            .with_alternative_name("Anvers")
            .with_city_code("ANR")
            .in_country(&belgium)
            .into_locode(LocodeId(2), Some(belgium));
        let json = locode.as_json().expect("serialise view");
        assert_eq!(json["name"], "Antwerpen");
        assert_eq!(json["alternative_name"], "Anvers");
        assert_eq!(json["city_code"], "ANR");
        assert_eq!(json["locode"], "BE ANR");
    }

    #[test]
    fn country_is_null_without_one() {
        let locode = NewLocode::named("Weert").into_locode(LocodeId(3), None);
        let json = locode.as_json().expect("serialise view");
        assert!(json["country"].is_null());
        assert!(json.get("locode").is_none());
    }

    #[rstest]
    fn serialising_a_country_hides_its_id(belgium: Country) {
        let json = serde_json::to_value(&belgium).expect("serialise country");
        assert_eq!(json, json!({"code": "BE", "name": "Belgium"}));
    }
}
