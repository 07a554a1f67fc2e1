//! Shared identifiers for widgets placed on a tilegrid layout.
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Identifier for one widget (dashboard tile or record-detail field).
///
/// Hosts hand us either numeric or string keys, so both are accepted and
/// round-tripped in their original JSON form. Ids are unique within one
/// layout; two ids compare equal only when both kind and value match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetId {
    /// Numeric key, typically a database row id.
    Int(u64),
    /// String key, typically a field name or slug.
    Name(String),
}

impl WidgetId {
    /// Construct a string-keyed identifier.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Numeric value when this is an integer id.
    #[must_use]
    pub const fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Name(_) => None,
        }
    }
}

impl Display for WidgetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for WidgetId {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_json_keeps_kind() {
        let a: WidgetId = serde_json::from_str("7").unwrap();
        let b: WidgetId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, WidgetId::Int(7));
        assert_eq!(b, WidgetId::name("7"));
        assert_ne!(a, b);
        assert_eq!(serde_json::to_string(&b).unwrap(), "\"7\"");
    }

    #[test]
    fn display_is_bare_value() {
        assert_eq!(WidgetId::from(12).to_string(), "12");
        assert_eq!(WidgetId::from("title").to_string(), "title");
        assert_eq!(WidgetId::from("title").as_int(), None);
    }
}
