//! Query engine: empty-query policy, alias keywords, and case-insensitive
//! substring filtering over destination records.

mod alias;

pub use alias::AliasTable;

use clap::ValueEnum;
use serde::Deserialize;

use crate::catalog::{Category, DestinationRecord};

/// What a blank query (after trimming) returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyQueryPolicy {
    /// Every record, unfiltered.
    #[default]
    ShowAll,
    /// Nothing; the caller should ask for a query.
    ShowNone,
}

/// How a query will be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Blank,
    Category(Category),
    Text(String),
}

#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    empty_query: EmptyQueryPolicy,
    aliases: AliasTable,
}

impl QueryEngine {
    pub fn new(empty_query: EmptyQueryPolicy, aliases: AliasTable) -> Self {
        Self {
            empty_query,
            aliases,
        }
    }

    pub fn empty_query(&self) -> EmptyQueryPolicy {
        self.empty_query
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn classify(&self, query: &str) -> QueryKind {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            QueryKind::Blank
        } else if let Some(category) = self.aliases.lookup(&needle) {
            QueryKind::Category(category)
        } else {
            QueryKind::Text(needle)
        }
    }

    /// Return the matching records in their original relative order.
    /// `records` is never modified.
    pub fn filter(&self, records: &[DestinationRecord], query: &str) -> Vec<DestinationRecord> {
        match self.classify(query) {
            QueryKind::Blank => match self.empty_query {
                EmptyQueryPolicy::ShowAll => records.to_vec(),
                EmptyQueryPolicy::ShowNone => Vec::new(),
            },
            QueryKind::Category(category) => records
                .iter()
                .filter(|r| r.category == category)
                .cloned()
                .collect(),
            QueryKind::Text(needle) => records
                .iter()
                .filter(|r| matches_text(r, &needle))
                .cloned()
                .collect(),
        }
    }
}

/// `needle` must already be lower-cased.
fn matches_text(record: &DestinationRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || (!record.parent_name.is_empty() && record.parent_name.to_lowercase().contains(needle))
}
