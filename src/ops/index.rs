use std::collections::BTreeSet;
use std::str::FromStr;

use crate::model::record::Record;

/// Optional category restriction for `filter`. Parses `"all"` as `All`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Keep only records whose category field equals this exactly
    Only(String),
}

impl CategoryFilter {
    pub fn from_option(category: Option<&str>) -> Self {
        match category {
            None => CategoryFilter::All,
            Some(c) => c.parse().unwrap_or_default(),
        }
    }

    fn admits(&self, category: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(wanted.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.to_string()))
        }
    }
}

/// Every tag used by any record, deduplicated and sorted.
pub fn distinct_tags<R: Record>(records: &[R]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.tags().iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether the lower-cased `needle` occurs in any searched field or tag.
/// `needle` must already be lower-case.
fn matches_text<R: Record>(record: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .text_fields()
        .into_iter()
        .chain(record.tags().iter().map(String::as_str))
        .any(|field| field.to_lowercase().contains(needle))
}

/// Records matching a case-insensitive substring query and a category
/// filter, in input order. An empty query matches everything.
pub fn filter<'a, R: Record>(
    records: &'a [R],
    query: &str,
    category: &CategoryFilter,
) -> Vec<&'a R> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| category.admits(r.category()) && matches_text(*r, &needle))
        .collect()
}

/// Records carrying `tag` exactly, in input order.
pub fn filter_by_tag<'a, R: Record>(records: &'a [R], tag: &str) -> Vec<&'a R> {
    let tag = tag.trim_start_matches('#');
    records
        .iter()
        .filter(|r| r.tags().iter().any(|t| t == tag))
        .collect()
}
