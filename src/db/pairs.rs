use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::{LanguageFilter, PairMatch, SearchQuery};

use super::connection::Store;
use super::languages::lookup_language_id;

impl Store {
    /// Store a sentence and its translation under an existing language. The
    /// lookup and the insert share one transaction; if the language is missing
    /// the transaction is dropped and nothing is written.
    pub fn save_pair(&self, english: &str, foreign: &str, language: &str) -> StoreResult<i64> {
        let english = english.trim();
        let foreign = foreign.trim();
        let language = language.trim();
        if english.is_empty() || foreign.is_empty() || language.is_empty() {
            return Err(StoreError::InvalidInput("All fields are required!"));
        }

        let mut conn = self.connect()?;
        let tx = conn
            .transaction()
            .map_err(|err| StoreError::storage("failed to begin transaction", err))?;

        let Some(language_id) = lookup_language_id(&tx, language)? else {
            warn!(language, "refusing to save pair for unknown language");
            return Err(StoreError::UnknownLanguage(language.to_string()));
        };

        tx.execute(
            "INSERT INTO language_pairs (english_sentence, foreign_sentence, language_id)
             VALUES (?1, ?2, ?3)",
            params![english, foreign, language_id],
        )
        .map_err(|err| StoreError::storage("failed to insert sentence pair", err))?;
        let id = tx.last_insert_rowid();

        tx.commit()
            .map_err(|err| StoreError::storage("failed to commit sentence pair", err))?;

        info!(id, language, "saved sentence pair");
        Ok(id)
    }

    /// Find pairs matching the keyword (in either sentence) and the language
    /// filter. Both filters are optional and combine with AND.
    pub fn search_pairs(&self, query: &SearchQuery) -> StoreResult<Vec<PairMatch>> {
        let mut sql = String::from(
            "SELECT lp.english_sentence, lp.foreign_sentence, l.language_name
             FROM language_pairs lp
             INNER JOIN languages l ON lp.language_id = l.id
             WHERE 1 = 1",
        );
        let mut values: Vec<Value> = Vec::new();

        if let Some(keyword) = query.effective_keyword() {
            sql.push_str(
                " AND (lp.english_sentence LIKE ?1 ESCAPE '\\'
                       OR lp.foreign_sentence LIKE ?1 ESCAPE '\\')",
            );
            values.push(Value::Text(like_pattern(keyword)));
        }

        if let LanguageFilter::Named(name) = &query.language {
            sql.push_str(&format!(" AND l.language_name = ?{}", values.len() + 1));
            values.push(Value::Text(name.clone()));
        }

        sql.push_str(" ORDER BY lp.id");

        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|err| StoreError::storage("failed to prepare search query", err))?;

        let matches = stmt
            .query_map(params_from_iter(values), |row| {
                Ok(PairMatch {
                    english: row.get(0)?,
                    foreign: row.get(1)?,
                    language: row.get(2)?,
                })
            })
            .map_err(|err| StoreError::storage("failed to run search query", err))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::storage("failed to collect search results", err))?;

        debug!(
            keyword = query.effective_keyword().unwrap_or(""),
            hits = matches.len(),
            "searched sentence pairs"
        );
        Ok(matches)
    }

    /// Total number of stored pairs.
    pub fn count_pairs(&self) -> StoreResult<usize> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM language_pairs", [], |row| row.get(0))
            .map_err(|err| StoreError::storage("failed to count sentence pairs", err))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// Wrap the keyword in `%` after escaping LIKE metacharacters so it matches as
/// a literal substring.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
