//! Content loaders for reading combat data from files.
//!
//! Every loader has a `parse` entry point taking file contents and a `load`
//! entry point taking a path; the factory wires them to a data directory.

pub mod bosses;
pub mod config;
pub mod factory;
pub mod units;

pub use bosses::{AbilitySpec, BossBlueprint, BossLoader, BossSpec, PhaseSpec};
pub use config::ConfigLoader;
pub use factory::{ContentCatalog, ContentFactory};
pub use units::{UnitBlueprint, UnitLoader, UnitTemplate};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
