use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::{Language, ALL_LANGUAGES};

use super::connection::Store;

impl Store {
    /// Every language name in the order it was added.
    pub fn list_languages(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .fetch_languages()?
            .into_iter()
            .map(|language| language.name)
            .collect())
    }

    /// Full language rows, oldest first.
    pub fn fetch_languages(&self) -> StoreResult<Vec<Language>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, language_name FROM languages ORDER BY id")
            .map_err(|err| StoreError::storage("failed to prepare language query", err))?;

        let languages = stmt
            .query_map([], |row| {
                Ok(Language {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(|err| StoreError::storage("failed to load languages", err))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| StoreError::storage("failed to collect languages", err))?;

        debug!(count = languages.len(), "loaded languages");
        Ok(languages)
    }

    /// Insert a new language. The name is trimmed first; names are compared
    /// exactly, so "french" and "French" are different languages.
    pub fn add_language(&self, name: &str) -> StoreResult<Language> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("Please enter a language name"));
        }
        if name == ALL_LANGUAGES {
            return Err(StoreError::InvalidInput(
                "\"All\" is reserved for the search filter",
            ));
        }

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO languages (language_name) VALUES (?1)",
            params![name],
        )
        .map_err(|err| map_unique_constraint(err, name))?;

        let language = Language {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        };
        info!(id = language.id, name = %language.name, "added language");
        Ok(language)
    }

    /// Resolve a language name to its row id.
    pub fn language_id(&self, name: &str) -> StoreResult<Option<i64>> {
        let conn = self.connect()?;
        lookup_language_id(&conn, name.trim())
    }
}

/// Shared by `language_id` and `save_pair`, which runs it inside its own
/// transaction.
pub(super) fn lookup_language_id(conn: &Connection, name: &str) -> StoreResult<Option<i64>> {
    conn.query_row(
        "SELECT id FROM languages WHERE language_name = ?1",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .map_err(|err| StoreError::storage("failed to look up language", err))
}

/// Turn the unique-constraint violation into a typed duplicate error. Any other
/// failure means the database itself is in trouble.
fn map_unique_constraint(err: SqlError, name: &str) -> StoreError {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        warn!(name, "language already exists");
        StoreError::DuplicateLanguage(name.to_string())
    } else {
        StoreError::storage("failed to insert language", err)
    }
}
