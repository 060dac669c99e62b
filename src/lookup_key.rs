//! Built-in lookup keys and the service names they select.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Lookup keys reserved by the validation runtime.
///
/// Any other string is still a legal lookup key once a service registers it;
/// these are the spellings known without any registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKey {
    Number,
    Integer,
    String,
    Boolean,
    Date,
    DateTime,
    LocalDate,
    UtcDate,
    TimeOfDay,
    TimeOfDayHms,
    Month,
    Percentage,
    Percentage100,
    Currency,
    Capitalize,
    Uppercase,
    Lowercase,
    TotalDays,
    YesNoBoolean,
    CheckboxBoolean,
}

impl LookupKey {
    pub const ALL: [LookupKey; 20] = [
        LookupKey::Number,
        LookupKey::Integer,
        LookupKey::String,
        LookupKey::Boolean,
        LookupKey::Date,
        LookupKey::DateTime,
        LookupKey::LocalDate,
        LookupKey::UtcDate,
        LookupKey::TimeOfDay,
        LookupKey::TimeOfDayHms,
        LookupKey::Month,
        LookupKey::Percentage,
        LookupKey::Percentage100,
        LookupKey::Currency,
        LookupKey::Capitalize,
        LookupKey::Uppercase,
        LookupKey::Lowercase,
        LookupKey::TotalDays,
        LookupKey::YesNoBoolean,
        LookupKey::CheckboxBoolean,
    ];

    /// Canonical spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            LookupKey::Number => "Number",
            LookupKey::Integer => "Integer",
            LookupKey::String => "String",
            LookupKey::Boolean => "Boolean",
            LookupKey::Date => "Date",
            LookupKey::DateTime => "DateTime",
            LookupKey::LocalDate => "LocalDate",
            LookupKey::UtcDate => "UTCDate",
            LookupKey::TimeOfDay => "TimeOfDay",
            LookupKey::TimeOfDayHms => "TimeOfDayHMS",
            LookupKey::Month => "Month",
            LookupKey::Percentage => "Percentage",
            LookupKey::Percentage100 => "Percentage100",
            LookupKey::Currency => "Currency",
            LookupKey::Capitalize => "Capitalize",
            LookupKey::Uppercase => "Uppercase",
            LookupKey::Lowercase => "Lowercase",
            LookupKey::TotalDays => "TotalDays",
            LookupKey::YesNoBoolean => "YesNoBoolean",
            LookupKey::CheckboxBoolean => "CheckboxBoolean",
        }
    }

    /// Exact case-insensitive match against the canonical spellings.
    ///
    /// Whitespace is significant: `" Number"` does not match.
    pub fn parse_ignore_case(raw: &str) -> Option<LookupKey> {
        Self::ALL
            .into_iter()
            .find(|key| eq_ignore_case(key.as_str(), raw))
    }
}

/// Case folding used wherever names or lookup keys compare case-insensitively.
pub fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// Unicode-aware case-insensitive equality, consistent with [`fold_case`].
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || fold_case(a) == fold_case(b)
}

impl Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pluggable service families a lookup key can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceName {
    Converter,
    Comparer,
    Parser,
    Formatter,
    Identifier,
}

impl ServiceName {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceName::Converter => "converter",
            ServiceName::Comparer => "comparer",
            ServiceName::Parser => "parser",
            ServiceName::Formatter => "formatter",
            ServiceName::Identifier => "identifier",
        }
    }

    /// Name of the class a host registers to satisfy this service, used in
    /// "register a ..." guidance.
    pub fn implementation_class(self) -> &'static str {
        match self {
            ServiceName::Converter => "DataTypeConverter",
            ServiceName::Comparer => "DataTypeComparer",
            ServiceName::Parser => "DataTypeParser",
            ServiceName::Formatter => "DataTypeFormatter",
            ServiceName::Identifier => "DataTypeIdentifier",
        }
    }
}

impl Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignore_case_returns_canonical_spelling() {
        assert_eq!(LookupKey::parse_ignore_case("number"), Some(LookupKey::Number));
        assert_eq!(LookupKey::parse_ignore_case("utcdate"), Some(LookupKey::UtcDate));
        assert_eq!(LookupKey::UtcDate.as_str(), "UTCDate");
    }

    #[test]
    fn test_parse_is_whitespace_sensitive() {
        assert_eq!(LookupKey::parse_ignore_case(" Number "), None);
        assert_eq!(LookupKey::parse_ignore_case("Numbers"), None);
    }

    #[test]
    fn test_eq_ignore_case_folds_non_ascii() {
        assert!(eq_ignore_case("Ärger", "ärger"));
        assert!(eq_ignore_case("ÉCLAIR", "éclair"));
        assert!(!eq_ignore_case("Ärger", "Arger"));
        assert_eq!(fold_case("Straße"), "straße");
    }

    #[test]
    fn test_service_name_classes() {
        assert_eq!(ServiceName::Formatter.implementation_class(), "DataTypeFormatter");
        assert_eq!(ServiceName::Comparer.to_string(), "comparer");
    }
}
