//! Data-driven combat content and loaders.
//!
//! This crate turns RON/TOML data files into `combat-core` values:
//! - Unit catalogs (stats, tags, passive identifiers) via RON
//! - Boss catalogs (named abilities, phase lists) via RON
//! - Combat configuration via TOML
//!
//! Identifiers are resolved here, at load time, so unknown passive names fail
//! before a fight starts. Content never appears in session state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilitySpec, BossBlueprint, BossLoader, BossSpec, ConfigLoader, ContentCatalog,
    ContentFactory, LoadResult, PhaseSpec, UnitBlueprint, UnitLoader, UnitTemplate,
};
