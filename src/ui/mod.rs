//! Ratatui front end: one form for entering pairs, a results pane, and a
//! search bar. All store access goes through [`App`].

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::{App, Command};
pub use terminal::run_app;
