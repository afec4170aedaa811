use crate::STATEMENT_SEPARATOR;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Direction
///
/// Sort direction; `Display` yields the query-language keyword.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum Direction {
    #[default]
    #[display("asc")]
    Asc,
    #[display("desc")]
    Desc,
}

///
/// FetchEntry
///
/// One projection inside the fetch block: either every attribute of a bound
/// variable, or a role-keyed sub-projection for relation fetches.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FetchEntry {
    All { var: String },
    Nested { key: String, entries: Vec<Self> },
}

impl FetchEntry {
    #[must_use]
    pub fn all(var: impl Into<String>) -> Self {
        Self::All { var: var.into() }
    }

    #[must_use]
    pub fn nested(key: impl Into<String>, entries: Vec<Self>) -> Self {
        Self::Nested {
            key: key.into(),
            entries,
        }
    }

    fn render(&self) -> String {
        match self {
            Self::All { var } => format!("${var}.*"),
            Self::Nested { key, entries } => {
                format!("\"{key}\": {{ {} }}", render_entries(entries))
            }
        }
    }
}

fn render_entries(entries: &[FetchEntry]) -> String {
    entries
        .iter()
        .map(FetchEntry::render)
        .collect::<Vec<_>>()
        .join(", ")
}

///
/// ClauseBuilder
///
/// Ordered, append-only clause accumulator. Fragments are collected per
/// clause kind in construction order and rendered once by `build()` in the
/// fixed block order the target language requires: match, delete, insert,
/// put, sort, offset, limit, reduce, fetch. Offset must follow sort and
/// precede limit for pagination to be well-defined.
///
/// This layer performs no validation of field names or variables; callers
/// hand it resolved fragments.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClauseBuilder {
    match_fragments: Vec<String>,
    delete_fragments: Vec<String>,
    insert_fragments: Vec<String>,
    put_fragments: Vec<String>,
    sort_entries: Vec<(String, Direction)>,
    offset: Option<u32>,
    limit: Option<u32>,
    reduce_fragments: Vec<String>,
    fetch_entries: Vec<FetchEntry>,
}

impl ClauseBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn match_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.match_fragments.push(fragment.into());
        self
    }

    #[must_use]
    pub fn delete_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.delete_fragments.push(fragment.into());
        self
    }

    #[must_use]
    pub fn insert_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.insert_fragments.push(fragment.into());
        self
    }

    #[must_use]
    pub fn put_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.put_fragments.push(fragment.into());
        self
    }

    #[must_use]
    pub fn sort_entry(mut self, var: impl Into<String>, direction: Direction) -> Self {
        self.sort_entries.push((var.into(), direction));
        self
    }

    #[must_use]
    pub const fn offset(mut self, n: u32) -> Self {
        self.offset = Some(n);
        self
    }

    #[must_use]
    pub const fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    #[must_use]
    pub fn reduce_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.reduce_fragments.push(fragment.into());
        self
    }

    #[must_use]
    pub fn fetch(mut self, entry: FetchEntry) -> Self {
        self.fetch_entries.push(entry);
        self
    }

    #[must_use]
    pub fn has_sort(&self) -> bool {
        !self.sort_entries.is_empty()
    }

    /// Render the accumulated clauses as final query text.
    #[must_use]
    pub fn build(self) -> String {
        let mut blocks = Vec::new();

        if !self.match_fragments.is_empty() {
            blocks.push(keyworded("match", &self.match_fragments));
        }
        if !self.delete_fragments.is_empty() {
            blocks.push(keyworded("delete", &self.delete_fragments));
        }
        if !self.insert_fragments.is_empty() {
            blocks.push(keyworded("insert", &self.insert_fragments));
        }
        if !self.put_fragments.is_empty() {
            blocks.push(keyworded("put", &self.put_fragments));
        }
        if !self.sort_entries.is_empty() {
            let entries = self
                .sort_entries
                .iter()
                .map(|(var, direction)| format!("{var} {direction}"))
                .collect::<Vec<_>>()
                .join(", ");
            blocks.push(format!("sort {entries};"));
        }
        if let Some(offset) = self.offset {
            blocks.push(format!("offset {offset};"));
        }
        if let Some(limit) = self.limit {
            blocks.push(format!("limit {limit};"));
        }
        if !self.reduce_fragments.is_empty() {
            blocks.push(format!("reduce {};", self.reduce_fragments.join(", ")));
        }
        if !self.fetch_entries.is_empty() {
            blocks.push(format!("fetch {{ {} }};", render_entries(&self.fetch_entries)));
        }

        blocks.join("\n")
    }
}

/// Render one keyworded block: fragments joined by the statement separator
/// and terminated by it.
fn keyworded(keyword: &str, fragments: &[String]) -> String {
    format!(
        "{keyword} {};",
        fragments.join(STATEMENT_SEPARATOR)
    )
}
