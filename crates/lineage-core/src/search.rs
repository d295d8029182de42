use crate::config::SearchConfig;
use crate::tree::{LineageTree, NodeId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub node: NodeId,
    pub name: String,
    pub year: i64,
    /// `"<name> '<yy>"`, the form the results list shows.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "hits", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The query is too short to run.
    BelowThreshold,
    NoResults,
    Results(Vec<SearchHit>),
}

impl SearchOutcome {
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            SearchOutcome::Results(hits) => hits,
            SearchOutcome::BelowThreshold | SearchOutcome::NoResults => &[],
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    node: NodeId,
    folded: String,
    name: String,
    year: i64,
}

/// Case-insensitive substring index over record names, built once per load.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    entries: Vec<Entry>,
    min_query_len: usize,
}

impl SearchIndex {
    pub fn new(tree: &LineageTree, config: &SearchConfig) -> Self {
        let entries = tree
            .records()
            .map(|(node, r)| Entry {
                node,
                folded: r.name.to_lowercase(),
                name: r.name.clone(),
                year: tree.node(node).year,
            })
            .collect();
        Self {
            entries,
            min_query_len: config.min_query_len,
        }
    }

    /// Matches ordered by year; equal years keep input order.
    pub fn search(&self, query: &str) -> SearchOutcome {
        if query.chars().count() < self.min_query_len {
            return SearchOutcome::BelowThreshold;
        }
        let needle = query.to_lowercase();
        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter(|e| e.folded.contains(&needle))
            .map(|e| SearchHit {
                node: e.node,
                name: e.name.clone(),
                year: e.year,
                label: format!("{} '{}", e.name, short_year(e.year)),
            })
            .collect();
        if hits.is_empty() {
            return SearchOutcome::NoResults;
        }
        hits.sort_by_key(|h| h.year);
        SearchOutcome::Results(hits)
    }
}

/// One-shot search without keeping an index around.
pub fn search(query: &str, tree: &LineageTree, config: &SearchConfig) -> SearchOutcome {
    SearchIndex::new(tree, config).search(query)
}

/// Drops the century digits: `2003` becomes `03`.
fn short_year(year: i64) -> String {
    let digits = year.to_string();
    digits.get(2..).unwrap_or_default().to_string()
}
