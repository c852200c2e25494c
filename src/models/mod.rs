//! Data models for quotebook
//!
//! These represent the JSON shape persisted in the key-value store and
//! exchanged through import/export files

use serde::{Deserialize, Serialize};

/// Sentinel persisted for the "no filter" selection
pub const ALL_CATEGORIES: &str = "all";

/// A quote shown to the user
///
/// Missing fields deserialize to empty strings. Imported files go through
/// [`Quote::from_value`] instead, which accepts any JSON value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Identity of a quote for deduplication.
    ///
    /// Quotes carry no identifier, so two quotes with the exact same text
    /// are the same quote regardless of category. Comparison is
    /// case- and whitespace-sensitive.
    pub fn identity_key(&self) -> &str {
        &self.text
    }

    /// Lenient conversion for imported entries
    ///
    /// A field that is missing or not a string becomes empty, and a value
    /// that is not an object becomes an empty quote.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            text: field("text"),
            category: field("category"),
        }
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

/// Quotes bundled with a fresh install
pub fn starter_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The only limit to our realization of tomorrow is our doubts of today.",
            "Inspiration",
        ),
        Quote::new(
            "Do what you can, with what you have, where you are.",
            "Motivation",
        ),
        Quote::new(
            "The best way to predict the future is to invent it.",
            "Innovation",
        ),
    ]
}

/// Category selection used to narrow displayed quotes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(c) => quote.category == *c,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "{}", ALL_CATEGORIES),
            CategoryFilter::Category(c) => write!(f, "{}", c),
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Category filter cannot be empty. Use a category name or 'all'".to_string());
        }
        if s == ALL_CATEGORIES {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(s.to_string()))
        }
    }
}

/// How to pick a category when the same text arrives from two sources
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Keep the category of the first occurrence
    #[default]
    FirstWins,
    /// Keep the position of the first occurrence, take the category of the last
    LastWins,
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergePolicy::FirstWins => write!(f, "first-wins"),
            MergePolicy::LastWins => write!(f, "last-wins"),
        }
    }
}

impl std::str::FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first-wins" => Ok(MergePolicy::FirstWins),
            "last-wins" => Ok(MergePolicy::LastWins),
            _ => Err(format!("Invalid merge policy: {}. Use: first-wins, last-wins", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parses_sentinel() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Motivation".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Category("Motivation".to_string())
        );
        assert!("  ".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_filter_matches_exact_category() {
        let quote = Quote::new("A", "X");
        assert!(CategoryFilter::All.matches(&quote));
        assert!(CategoryFilter::Category("X".to_string()).matches(&quote));
        assert!(!CategoryFilter::Category("x".to_string()).matches(&quote));
    }

    #[test]
    fn test_quote_with_missing_fields_deserializes_empty() {
        let quote: Quote = serde_json::from_str(r#"{"text":"only text"}"#).unwrap();
        assert_eq!(quote.text, "only text");
        assert_eq!(quote.category, "");
    }

    #[test]
    fn test_merge_policy_roundtrips_through_toml_names() {
        assert_eq!("last-wins".parse::<MergePolicy>().unwrap(), MergePolicy::LastWins);
        assert_eq!(MergePolicy::FirstWins.to_string(), "first-wins");
        assert!("newest".parse::<MergePolicy>().is_err());
    }
}
