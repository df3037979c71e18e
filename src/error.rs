//! Error types surfaced by the persistence layer. The UI matches on these to
//! decide between showing a notification and shutting down.

use thiserror::Error;

/// Everything that can go wrong inside [`crate::db::Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique constraint on `languages.language_name` rejected the insert.
    #[error("\"{0}\" already exists!")]
    DuplicateLanguage(String),
    /// A required value was empty once surrounding whitespace was removed.
    #[error("{0}")]
    InvalidInput(&'static str),
    /// `save_pair` referenced a language that is not stored.
    #[error("Language \"{0}\" does not exist.")]
    UnknownLanguage(String),
    /// The database could not be opened, created, or queried.
    #[error("storage unavailable: {context}")]
    StorageUnavailable {
        context: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl StoreError {
    /// Wrap a low-level failure with a short description of what was attempted.
    pub(crate) fn storage<E>(context: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::StorageUnavailable {
            context,
            source: Box::new(source),
        }
    }

    /// Only storage failures are fatal; the rest are shown to the user.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, StoreError::StorageUnavailable { .. })
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_fatal() {
        let err = StoreError::storage(
            "failed to open SQLite database",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "storage unavailable: failed to open SQLite database"
        );
    }

    #[test]
    fn user_errors_are_recoverable() {
        assert!(StoreError::DuplicateLanguage("French".into()).is_recoverable());
        assert!(StoreError::UnknownLanguage("Klingon".into()).is_recoverable());
        assert!(StoreError::InvalidInput("Language name is required.").is_recoverable());
    }

    #[test]
    fn duplicate_message_matches_notification_text() {
        let err = StoreError::DuplicateLanguage("French".into());
        assert_eq!(err.to_string(), "\"French\" already exists!");
    }
}
