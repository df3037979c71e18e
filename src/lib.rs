//! Core library surface for the Language Memo terminal application.
//!
//! The store is usable on its own; the `ui` module layers the interactive
//! front end on top of it.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::Config;
pub use db::Store;
pub use error::{StoreError, StoreResult};
pub use models::{Language, LanguageFilter, PairMatch, SearchQuery};
pub use ui::{run_app, App, Command};
