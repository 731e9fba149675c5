//! Diagnostics logging setup.
//!
//! The terminal belongs to the front end, so log records go to a file.
//! The filter comes from `RUST_LOG` and defaults to `info`.

use env_logger::{Builder, Env, Target};
use std::{fs::OpenOptions, io, path::Path};

/// Initialize the global logger, appending to `path`.
///
/// # Example
///
/// ```no_run
/// ct_client::logging::init("card_tracker.log").unwrap();
/// log::info!("Tracker starting");
/// ```
pub fn init(path: impl AsRef<Path>) -> io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .target(Target::Pipe(Box::new(file)))
        .init();

    log::info!("Diagnostics logging to {}", path.as_ref().display());
    Ok(())
}
