use std::collections::BTreeMap;

use crate::catalog::Category;

/// Keywords that short-circuit substring matching into a category filter.
///
/// Keys are stored trimmed and lower-cased; lookups expect an already
/// normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, Category>,
}

impl AliasTable {
    /// `beach(es)`, `temple(s)`, and `country`/`countries`. Countries have no
    /// records of their own, so they map to their cities.
    pub fn standard() -> Self {
        Self::from_entries([
            ("beach", Category::Beach),
            ("beaches", Category::Beach),
            ("temple", Category::Temple),
            ("temples", Category::Temple),
            ("country", Category::City),
            ("countries", Category::City),
        ])
    }

    /// Every query falls through to substring matching.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Category)>,
        K: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(keyword, category)| (keyword.as_ref().trim().to_lowercase(), category))
                .filter(|(keyword, _)| !keyword.is_empty())
                .collect(),
        }
    }

    pub fn lookup(&self, normalized_query: &str) -> Option<Category> {
        self.entries.get(normalized_query).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::standard()
    }
}
