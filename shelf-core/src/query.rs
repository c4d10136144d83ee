//! View queries over the catalog: text search, tag filter and sort
//!
//! Everything here is a pure function of the catalog and a [`ViewQuery`]. The
//! pipeline runs text filter, then tag filter, then sort.

use crate::catalog::Catalog;
use crate::types::Book;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use unicase::UniCase;

/// How a book's tags must relate to the selected tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMatch {
    /// The book has every selected tag
    #[default]
    All,

    /// The book has at least one selected tag
    Any,
}

/// Display order for the catalog view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Alphabetical by title, ignoring case
    #[default]
    Title,

    /// Most recently added first
    Recent,
}

/// Ephemeral view state: what to show and in which order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub tags: Vec<String>,
    pub tag_match: TagMatch,
    pub sort: SortOrder,
}

impl ViewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tag_match(mut self, tag_match: TagMatch) -> Self {
        self.tag_match = tag_match;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Whether the query hides any books
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty() || !self.tags.is_empty()
    }
}

/// Run the full pipeline over a catalog
pub fn apply<'a>(catalog: &'a Catalog, query: &ViewQuery) -> Vec<&'a Book> {
    let books = filter_by_text(catalog.iter(), &query.search);
    let mut books = filter_by_tags(books, &query.tags, query.tag_match);
    sort_books(&mut books, query.sort);
    books
}

/// Keep books whose title or author contains `query`, ignoring case.
///
/// A blank query keeps everything.
pub fn filter_by_text<'a>(books: impl IntoIterator<Item = &'a Book>, query: &str) -> Vec<&'a Book> {
    if query.trim().is_empty() {
        return books.into_iter().collect();
    }

    let needle = query.to_lowercase();
    books
        .into_iter()
        .filter(|book| {
            book.title.to_lowercase().contains(&needle)
                || book.author.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Keep books matching the selected tags under `policy`.
///
/// An empty selection keeps everything.
pub fn filter_by_tags<'a>(books: Vec<&'a Book>, selected: &[String], policy: TagMatch) -> Vec<&'a Book> {
    if selected.is_empty() {
        return books;
    }

    books
        .into_iter()
        .filter(|book| match policy {
            TagMatch::All => selected.iter().all(|tag| book.has_tag(tag)),
            TagMatch::Any => selected.iter().any(|tag| book.has_tag(tag)),
        })
        .collect()
}

/// Stable sort; ties keep their incoming order
pub fn sort_books(books: &mut [&Book], order: SortOrder) {
    match order {
        SortOrder::Title => books.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortOrder::Recent => books.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Case-folded title comparison
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    UniCase::new(a).cmp(&UniCase::new(b))
}

/// Every tag used in the catalog, sorted and de-duplicated
pub fn all_tags(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .flat_map(|book| book.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str, author: &str, tags: &[&str], created_at: i64) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            cover_image: String::new(),
            drive_link: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at,
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_books(vec![
            book("1", "dune", "Frank Herbert", &["sci-fi", "classic"], 30),
            book("2", "Emma", "Jane Austen", &["classic", "romance"], 10),
            book("3", "Neuromancer", "William Gibson", &["sci-fi", "cyberpunk"], 40),
            book("4", "Anathem", "Neal Stephenson", &["sci-fi"], 20),
        ])
        .unwrap()
    }

    fn ids(books: &[&Book]) -> Vec<String> {
        books.iter().map(|b| b.id.clone()).collect()
    }

    #[test]
    fn test_text_filter_matches_title_or_author() {
        let catalog = sample_catalog();
        assert_eq!(ids(&filter_by_text(catalog.iter(), "DUNE")), vec!["1"]);
        assert_eq!(ids(&filter_by_text(catalog.iter(), "austen")), vec!["2"]);
        assert_eq!(ids(&filter_by_text(catalog.iter(), "an")), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_blank_query_is_identity() {
        let catalog = sample_catalog();
        assert_eq!(filter_by_text(catalog.iter(), "").len(), 4);
        assert_eq!(filter_by_text(catalog.iter(), "   ").len(), 4);
    }

    #[test]
    fn test_query_is_not_trimmed() {
        let catalog = sample_catalog();
        // " Gibson" only matches where a space precedes the name
        assert_eq!(ids(&filter_by_text(catalog.iter(), " gibson")), vec!["3"]);
        assert!(filter_by_text(catalog.iter(), "dune ").is_empty());
    }

    #[test]
    fn test_tag_filter_all() {
        let catalog = sample_catalog();
        let selected = vec!["sci-fi".to_string(), "classic".to_string()];
        let books = filter_by_tags(catalog.iter().collect(), &selected, TagMatch::All);
        assert_eq!(ids(&books), vec!["1"]);
    }

    #[test]
    fn test_tag_filter_any() {
        let catalog = sample_catalog();
        let selected = vec!["romance".to_string(), "cyberpunk".to_string()];
        let books = filter_by_tags(catalog.iter().collect(), &selected, TagMatch::Any);
        assert_eq!(ids(&books), vec!["2", "3"]);
    }

    #[test]
    fn test_tag_filter_is_case_sensitive() {
        let catalog = sample_catalog();
        let selected = vec!["Sci-Fi".to_string()];
        assert!(filter_by_tags(catalog.iter().collect(), &selected, TagMatch::Any).is_empty());
    }

    #[test]
    fn test_sort_by_title_ignores_case() {
        let catalog = sample_catalog();
        let mut books: Vec<&Book> = catalog.iter().collect();
        sort_books(&mut books, SortOrder::Title);
        assert_eq!(ids(&books), vec!["4", "1", "2", "3"]);
    }

    #[test]
    fn test_sort_by_recent() {
        let catalog = sample_catalog();
        let mut books: Vec<&Book> = catalog.iter().collect();
        sort_books(&mut books, SortOrder::Recent);
        assert_eq!(ids(&books), vec!["3", "1", "4", "2"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_titles() {
        let catalog = Catalog::from_books(vec![
            book("x", "Dune", "A", &[], 1),
            book("y", "DUNE", "B", &[], 2),
            book("z", "dune", "C", &[], 3),
        ])
        .unwrap();
        let mut books: Vec<&Book> = catalog.iter().collect();
        sort_books(&mut books, SortOrder::Title);
        assert_eq!(ids(&books), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_apply_composes_pipeline() {
        let catalog = sample_catalog();
        let query = ViewQuery::new()
            .with_search("e")
            .with_tag("sci-fi")
            .with_sort(SortOrder::Recent);
        assert!(query.is_filtered());
        assert_eq!(ids(&apply(&catalog, &query)), vec!["3", "1", "4"]);
    }

    #[test]
    fn test_apply_default_query_sorts_only() {
        let catalog = sample_catalog();
        let query = ViewQuery::new();
        assert!(!query.is_filtered());
        assert_eq!(ids(&apply(&catalog, &query)), vec!["4", "1", "2", "3"]);
    }

    #[test]
    fn test_all_tags() {
        assert_eq!(
            all_tags(&sample_catalog()),
            vec!["classic", "cyberpunk", "romance", "sci-fi"]
        );
        assert!(all_tags(&Catalog::new()).is_empty());
    }

    #[test]
    fn test_enums_deserialize_lowercase() {
        let policy: TagMatch = serde_json::from_str("\"any\"").unwrap();
        assert_eq!(policy, TagMatch::Any);
        let order: SortOrder = serde_json::from_str("\"recent\"").unwrap();
        assert_eq!(order, SortOrder::Recent);
    }
}
