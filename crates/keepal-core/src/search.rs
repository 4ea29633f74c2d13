//! Recursive entry search over the group tree.

use crate::error::{Error, Result};
use crate::models::{SearchResult, PATH_SEPARATOR};
use crate::tree::{entries, split_path, subgroups};
use keepass::db::{Entry, Group};

/// Case-insensitive, all-terms-must-match title filter.
#[derive(Debug, Clone, Default)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    /// Build a query from raw terms. Blank terms are dropped.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        let title = entry.get_title().unwrap_or_default().to_lowercase();
        self.terms.iter().all(|term| title.contains(term.as_str()))
    }
}

/// Find all entries under `root` whose title contains every term.
///
/// Traversal is depth-first: a group's own entries come before its subgroups,
/// and subgroups are visited in stored order. Results keep that order.
/// No terms matches every entry.
pub fn search<'a, S: AsRef<str>>(root: &'a Group, terms: &[S]) -> Vec<SearchResult<'a>> {
    let query = Query::new(terms);
    let mut results = Vec::new();
    let mut trail = Vec::new();
    collect(root, &query, &mut trail, &mut results);
    tracing::debug!("Search for {} term(s) matched {} entries", terms.len(), results.len());
    results
}

fn collect<'a>(
    group: &'a Group,
    query: &Query,
    trail: &mut Vec<&'a str>,
    results: &mut Vec<SearchResult<'a>>,
) {
    trail.push(&group.name);

    for entry in entries(group) {
        if query.matches(entry) {
            results.push(SearchResult {
                entry,
                group_path: trail.clone(),
            });
        }
    }

    for child in subgroups(group) {
        collect(child, query, trail, results);
    }

    trail.pop();
}

/// Resolve a single entry from its lookup path.
///
/// Titles may themselves contain the separator, so `path` is tried three
/// ways, each in traversal order: as a full path (see [`SearchResult::path`]),
/// as a whole title, and finally by its last segment as title. Duplicate
/// titles are resolved silently by that order.
pub fn find_entry<'a>(root: &'a Group, path: &str) -> Result<SearchResult<'a>> {
    let normalized = split_path(path).collect::<Vec<_>>().join(&PATH_SEPARATOR.to_string());
    let Some(last) = split_path(path).last() else {
        return Err(Error::NotFound(format!("entry '{path}'")));
    };

    let mut all = search::<&str>(root, &[]);
    let index = all
        .iter()
        .position(|r| r.path() == normalized)
        .or_else(|| all.iter().position(|r| r.title() == path))
        .or_else(|| {
            let matching = all.iter().filter(|r| r.title() == last).count();
            if matching > 1 {
                tracing::debug!(
                    "{} entries are titled '{}', picking the first in traversal order",
                    matching,
                    last
                );
            }
            all.iter().position(|r| r.title() == last)
        })
        .ok_or_else(|| Error::NotFound(format!("entry '{path}'")))?;

    Ok(all.swap_remove(index))
}
