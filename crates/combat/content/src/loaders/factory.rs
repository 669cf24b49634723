//! Content factory for building a combat catalog from a data directory.

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;

use crate::loaders::{
    BossBlueprint, BossLoader, ConfigLoader, LoadResult, UnitBlueprint, UnitLoader,
};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml   (optional)
/// ├── units.ron
/// └── bosses.ron    (optional)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat configuration from `config.toml`, or defaults if absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the unit catalog from `units.ron`.
    pub fn load_units(&self) -> LoadResult<Vec<UnitBlueprint>> {
        UnitLoader::load(&self.data_dir.join("units.ron"))
    }

    /// Load the boss catalog from `bosses.ron`, or an empty catalog if absent.
    pub fn load_bosses(&self) -> LoadResult<Vec<BossBlueprint>> {
        let path = self.data_dir.join("bosses.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        BossLoader::load(&path)
    }

    /// Load everything and check cross-references between catalogs.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let catalog = ContentCatalog {
            config: self.load_config()?,
            units: self.load_units()?,
            bosses: self.load_bosses()?,
        };
        catalog.check_references()?;
        Ok(catalog)
    }
}

/// Every loaded catalog, with identifiers resolved.
#[derive(Clone, Debug, Default)]
pub struct ContentCatalog {
    pub config: CombatConfig,
    pub units: Vec<UnitBlueprint>,
    pub bosses: Vec<BossBlueprint>,
}

impl ContentCatalog {
    pub fn unit(&self, id: &str) -> Option<&UnitBlueprint> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn boss(&self, id: &str) -> Option<&BossBlueprint> {
        self.bosses.iter().find(|boss| boss.id == id)
    }

    /// Fails on duplicate ids and on bosses whose unit template is missing.
    pub fn check_references(&self) -> LoadResult<()> {
        for (index, unit) in self.units.iter().enumerate() {
            if self.units[..index].iter().any(|other| other.id == unit.id) {
                anyhow::bail!("duplicate unit id '{}'", unit.id);
            }
        }
        for (index, boss) in self.bosses.iter().enumerate() {
            if self.bosses[..index].iter().any(|other| other.id == boss.id) {
                anyhow::bail!("duplicate boss id '{}'", boss.id);
            }
            if self.unit(&boss.unit).is_none() {
                anyhow::bail!(
                    "boss '{}' references unknown unit template '{}'",
                    boss.id,
                    boss.unit
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const UNITS: &str = r#"[
        ("hero", (name: "Hero", max_hp: 100, attack_power: 12, tags: "PLAYER")),
        ("golem", (name: "Golem", max_hp: 300, attack_power: 9, armor: 20, tags: "ENEMY | BOSS")),
    ]"#;

    const BOSSES: &str = r#"[
        ("golem_boss", (unit: "golem", phases: [(trigger_percent: 100, attack_interval: 2)])),
    ]"#;

    #[test]
    fn loads_directory_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("units.ron"), UNITS).unwrap();
        fs::write(dir.path().join("bosses.ron"), BOSSES).unwrap();

        let catalog = ContentFactory::new(dir.path()).load_catalog().unwrap();

        assert_eq!(catalog.config, CombatConfig::default());
        assert_eq!(catalog.units.len(), 2);
        assert_eq!(catalog.boss("golem_boss").unwrap().unit, "golem");
        assert_eq!(catalog.unit("golem").unwrap().stats.armor, 20);
    }

    #[test]
    fn reads_config_when_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("units.ron"), UNITS).unwrap();
        fs::write(dir.path().join("config.toml"), "seed = 99\nrecord_notifications = false\n")
            .unwrap();

        let catalog = ContentFactory::new(dir.path()).load_catalog().unwrap();

        assert_eq!(catalog.config.seed, 99);
        assert!(!catalog.config.record_notifications);
        assert!(catalog.bosses.is_empty());
    }

    #[test]
    fn missing_units_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
        assert!(err.to_string().contains("units.ron"));
    }

    #[test]
    fn dangling_boss_unit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("units.ron"), UNITS).unwrap();
        fs::write(
            dir.path().join("bosses.ron"),
            r#"[("lich", (unit: "lich_body", phases: [(trigger_percent: 100, attack_interval: 1)]))]"#,
        )
        .unwrap();

        let err = ContentFactory::new(dir.path()).load_catalog().unwrap_err();
        assert!(err.to_string().contains("lich_body"));
    }
}
