//! Persistence module split across logical submodules. [`Store`] is the only
//! entry point; the submodules add its operations.

mod connection;
mod languages;
mod pairs;

pub use connection::Store;

#[cfg(test)]
pub(crate) use connection::tests::temp_store;
