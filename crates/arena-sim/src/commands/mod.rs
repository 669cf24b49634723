//! Subcommand implementations.

mod check;
mod simulate;

pub use check::Check;
pub use simulate::Simulate;

use std::path::PathBuf;

/// Content directory shipped with this crate.
pub(crate) fn default_content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content")
}
