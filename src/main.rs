//! Binary entry point: resolve paths, start logging, open the store, and run
//! the terminal UI until the user quits.
use anyhow::Context;
use language_memo::{logging, run_app, App, Config, Store};
use tracing::{error, info};

/// Returning a `Result` prints the error chain and exits non-zero when the
/// database cannot be opened or fails mid-session.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to resolve configuration")?;

    if let Err(err) = logging::init(&config.log_path) {
        eprintln!("logging disabled: {err:#}");
    }
    info!(db = %config.db_path.display(), "starting language memo");

    let store = Store::open(&config.db_path)
        .with_context(|| format!("cannot open database at {}", config.db_path.display()))?;
    let mut app = App::new(store)?;

    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "exiting after fatal error");
    }
    result
}
