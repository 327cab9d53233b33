//! Tagged outcome returned by every fetch against Wikidata or Wikipedia.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a lookup produced nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyReason {
    /// The query ran but matched no row.
    NoMatch,
    /// The entity has no article in the requested language.
    NoArticle,
    /// The article title does not exist on the requested wiki.
    PageMissing,
}

impl EmptyReason {
    /// Informational text rendered in place of the missing content.
    pub fn placeholder(&self) -> &'static str {
        match self {
            EmptyReason::NoMatch => "No data available.",
            EmptyReason::NoArticle => "No Wikipedia article is available in this language.",
            EmptyReason::PageMissing => "Wikipedia page not found.",
        }
    }
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.placeholder())
    }
}

/// Result of one external lookup.
///
/// None of the variants is an error for the caller: `Empty` renders as a
/// placeholder and `Unavailable` as an inline network notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Lookup<T> {
    Found(T),
    Empty(EmptyReason),
    Unavailable(String),
}

impl<T> Lookup<T> {
    pub fn found(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Lookup::Unavailable(_))
    }

    /// Only settled outcomes are worth caching; a network failure should be
    /// retried on the next interaction.
    pub fn is_cacheable(&self) -> bool {
        !self.is_unavailable()
    }
}

impl<T> From<anyhow::Error> for Lookup<T> {
    fn from(err: anyhow::Error) -> Self {
        Lookup::Unavailable(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_accessors() {
        let found: Lookup<Vec<u32>> = Lookup::Found(vec![1, 2]);
        assert!(found.is_found());
        assert!(found.is_cacheable());
        assert_eq!(found.found(), Some(&vec![1, 2]));

        let empty: Lookup<Vec<u32>> = Lookup::Empty(EmptyReason::NoMatch);
        assert!(!empty.is_found());
        assert!(empty.is_cacheable());
        assert_eq!(empty.found(), None);

        let down: Lookup<Vec<u32>> = Lookup::from(anyhow::anyhow!("connection refused"));
        assert!(down.is_unavailable());
        assert!(!down.is_cacheable());
        assert_eq!(down, Lookup::Unavailable("connection refused".to_string()));
    }

    #[test]
    fn test_lookup_serde_roundtrip_shape() {
        let value: Lookup<String> = Lookup::Empty(EmptyReason::NoArticle);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["status"], "empty");
        assert_eq!(json["value"], "NoArticle");
        let back: Lookup<String> = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }
}
