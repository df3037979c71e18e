//! Plain data types that mirror the SQLite schema and the search inputs. They
//! carry no behavior beyond formatting so both the store and the UI can pass
//! them around freely.

use std::fmt;

/// Selector value that disables the language filter.
pub const ALL_LANGUAGES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A stored language row.
pub struct Language {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One search hit: an English sentence, its translation, and the language the
/// translation belongs to.
pub struct PairMatch {
    pub english: String,
    pub foreign: String,
    pub language: String,
}

impl fmt::Display for PairMatch {
    /// Two-line block used by the results pane.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "English: {}\n{}: {}",
            self.english, self.language, self.foreign
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Restricts a search to one language, or not at all.
pub enum LanguageFilter {
    #[default]
    All,
    Named(String),
}

impl LanguageFilter {
    /// Interpret a selector value. `"All"` and blank values disable the filter.
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection.map(str::trim) {
            None | Some("") | Some(ALL_LANGUAGES) => LanguageFilter::All,
            Some(name) => LanguageFilter::Named(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Inputs for [`crate::db::Store::search_pairs`].
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub language: LanguageFilter,
}

impl SearchQuery {
    pub fn new(keyword: Option<&str>, language: LanguageFilter) -> Self {
        Self {
            keyword: keyword.map(str::to_string),
            language,
        }
    }

    /// The keyword to match on, or `None` when it is blank.
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}
