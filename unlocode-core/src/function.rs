//! Functions describing the roles a location serves.
//!
//! The vocabulary is closed: every flag a [`crate::Locode`] may carry is a
//! variant of [`Function`], and symbols outside it are rejected with
//! [`UnsupportedFunction`] rather than matching nothing.
//!
//! # Examples
//! ```
//! use unlocode_core::{Function, Functions};
//!
//! assert_eq!(Function::RailTerminal.as_str(), "rail_terminal");
//! assert!("derp".parse::<Function>().is_err());
//!
//! let functions: Functions = "1--4----".parse().expect("valid classifier");
//! assert!(functions.contains(Function::Port));
//! assert!(functions.contains(Function::Airport));
//! ```

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A role served by a UN/LOCODE location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    /// Sea or inland port.
    Port,
    /// Rail terminal.
    RailTerminal,
    /// Road terminal.
    RoadTerminal,
    /// Airport.
    Airport,
    /// Postal exchange office.
    PostalExchangeOffice,
    /// Inland clearance depot or other multimodal facility.
    InlandClearanceDepot,
    /// Fixed transport installation such as a pipeline terminal.
    FixedTransport,
    /// Border crossing.
    BorderCrossing,
}

impl Function {
    /// Every supported function, in classifier order.
    pub const ALL: [Self; 8] = [
        Self::Port,
        Self::RailTerminal,
        Self::RoadTerminal,
        Self::Airport,
        Self::PostalExchangeOffice,
        Self::InlandClearanceDepot,
        Self::FixedTransport,
        Self::BorderCrossing,
    ];

    /// Return the snake-case symbol, which doubles as the storage column name.
    ///
    /// # Examples
    /// ```
    /// use unlocode_core::Function;
    ///
    /// assert_eq!(Function::Airport.as_str(), "airport");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Port => "port",
            Self::RailTerminal => "rail_terminal",
            Self::RoadTerminal => "road_terminal",
            Self::Airport => "airport",
            Self::PostalExchangeOffice => "postal_exchange_office",
            Self::InlandClearanceDepot => "inland_clearance_depot",
            Self::FixedTransport => "fixed_transport",
            Self::BorderCrossing => "border_crossing",
        }
    }

    /// Character used for this function in the UN/LOCODE classifier column.
    #[must_use]
    pub const fn classifier_code(self) -> char {
        match self {
            Self::Port => '1',
            Self::RailTerminal => '2',
            Self::RoadTerminal => '3',
            Self::Airport => '4',
            Self::PostalExchangeOffice => '5',
            Self::InlandClearanceDepot => '6',
            Self::FixedTransport => '7',
            Self::BorderCrossing => 'B',
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Zero-based slot this function occupies in a classifier.
    const fn position(self) -> usize {
        self as usize
    }

    fn from_classifier_code(code: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|function| function.classifier_code() == code.to_ascii_uppercase())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Function {
    type Err = UnsupportedFunction;

    /// Parse a function symbol. Matching ignores case and treats `-` as `_`,
    /// so `"Rail-Terminal"` resolves to [`Function::RailTerminal`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|function| function.as_str() == symbol)
            .ok_or_else(|| UnsupportedFunction {
                symbol: s.to_owned(),
            })
    }
}

/// Raised when a caller names a function outside the supported vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported function '{symbol}'")]
pub struct UnsupportedFunction {
    /// The symbol exactly as supplied by the caller.
    pub symbol: String,
}

/// Errors returned when parsing a UN/LOCODE function classifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidClassifier {
    /// The classifier contained a character outside `1`-`7`, `B`, `-` and `0`.
    #[error("invalid character '{found}' at position {position} of function classifier")]
    UnknownCode {
        /// Offending character.
        found: char,
        /// Zero-based character position.
        position: usize,
    },
    /// A known function code appeared outside the position that code occupies.
    #[error("function code '{found}' at position {position} belongs at position {expected}")]
    MisplacedCode {
        /// Offending character.
        found: char,
        /// Zero-based character position.
        position: usize,
        /// Zero-based position the code belongs at.
        expected: usize,
    },
    /// The classifier was longer than the eight positions UN/LOCODE defines.
    #[error("function classifier has {length} positions; at most 8 are allowed")]
    TooLong {
        /// Number of characters supplied.
        length: usize,
    },
}

/// The set of functions a location serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Functions {
    bits: u8,
}

impl Functions {
    /// An empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Return a copy of the set with `function` added.
    #[must_use]
    pub const fn with(self, function: Function) -> Self {
        Self {
            bits: self.bits | function.bit(),
        }
    }

    /// Add `function` to the set.
    pub const fn insert(&mut self, function: Function) {
        self.bits |= function.bit();
    }

    /// Whether the set contains `function`.
    #[must_use]
    pub const fn contains(self, function: Function) -> bool {
        self.bits & function.bit() != 0
    }

    /// Whether no function is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterate over the contained functions in classifier order.
    pub fn iter(self) -> impl Iterator<Item = Function> {
        Function::ALL
            .into_iter()
            .filter(move |function| self.contains(*function))
    }

    /// Render the set as an eight-position UN/LOCODE classifier, e.g. `"1--4----"`.
    ///
    /// # Examples
    /// ```
    /// use unlocode_core::{Function, Functions};
    ///
    /// let functions = Functions::empty()
    ///     .with(Function::RoadTerminal)
    ///     .with(Function::BorderCrossing);
    /// assert_eq!(functions.classifier(), "--3----B");
    /// ```
    #[must_use]
    pub fn classifier(self) -> String {
        Function::ALL
            .into_iter()
            .map(|function| {
                if self.contains(function) {
                    function.classifier_code()
                } else {
                    '-'
                }
            })
            .collect()
    }
}

impl FromIterator<Function> for Functions {
    fn from_iter<I: IntoIterator<Item = Function>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl From<Function> for Functions {
    fn from(function: Function) -> Self {
        Self::empty().with(function)
    }
}

impl FromStr for Functions {
    type Err = InvalidClassifier;

    /// Parse a UN/LOCODE classifier. `-` and `0` (function not known) add
    /// nothing. Each function code must sit in its own position, so `4` is
    /// only accepted as the fourth character.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if length > Function::ALL.len() {
            return Err(InvalidClassifier::TooLong { length });
        }

        s.chars()
            .enumerate()
            .try_fold(Self::empty(), |functions, (position, code)| match code {
                '-' | '0' => Ok(functions),
                other => classify_at(other, position).map(|function| functions.with(function)),
            })
    }
}

fn classify_at(code: char, position: usize) -> Result<Function, InvalidClassifier> {
    let function = Function::from_classifier_code(code).ok_or(InvalidClassifier::UnknownCode {
        found: code,
        position,
    })?;
    let expected = function.position();
    if expected == position {
        Ok(function)
    } else {
        Err(InvalidClassifier::MisplacedCode {
            found: code,
            position,
            expected,
        })
    }
}
