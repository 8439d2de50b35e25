//! The search term of the transactions page.

use serde::Deserialize;

/// The query string of a page that can be searched, e.g. `?search=rent`.
///
/// A missing term is the empty string, which matches everything.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    /// The term to look for.
    #[serde(default)]
    pub search: String,
}

impl SearchQuery {
    /// Whether there is a term to search for.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
    }
}
