//! Unit catalog loader.
//!
//! Loads unit templates from RON files and resolves passive identifiers
//! through the passive constructor table.

use std::path::Path;

use anyhow::Context;
use combat_core::{CombatResult, CombatSession, Passive, Stats, Unit, UnitId, UnitTags};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Raw unit entry as written in content files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UnitTemplate {
    pub name: String,
    pub max_hp: i32,
    pub attack_power: i32,
    #[serde(default)]
    pub armor: i32,
    #[serde(default = "default_speed")]
    pub speed: i32,
    /// Written as a flags string, e.g. `"ENEMY | BOSS"`.
    #[serde(default)]
    pub tags: UnitTags,
    /// Passive identifiers such as `"death_shield"`.
    #[serde(default)]
    pub passives: Vec<String>,
}

fn default_speed() -> i32 {
    10
}

/// A unit template with every identifier resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitBlueprint {
    pub id: String,
    pub name: String,
    pub stats: Stats,
    pub tags: UnitTags,
    pub passives: Vec<Passive>,
}

impl UnitBlueprint {
    /// Builds a fresh unit at full HP, without passives.
    pub fn instantiate(&self) -> Unit {
        Unit::new(self.name.clone(), self.stats).with_tags(self.tags)
    }

    /// Spawns the unit into a session and attaches its passives as one batch.
    pub fn spawn(&self, session: &mut CombatSession) -> CombatResult<UnitId> {
        let unit = session.spawn(self.instantiate())?;
        session.attach_passives(unit, self.passives.clone())?;
        Ok(unit)
    }
}

/// Loader for unit catalogs from RON files.
pub struct UnitLoader;

impl UnitLoader {
    /// Load a unit catalog from a RON file.
    ///
    /// RON format: `Vec<(String, UnitTemplate)>`
    pub fn load(path: &Path) -> LoadResult<Vec<UnitBlueprint>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in unit catalog {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<UnitBlueprint>> {
        let raw_data: Vec<(String, UnitTemplate)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        raw_data
            .into_iter()
            .map(|(id, template)| Self::resolve(id, template))
            .collect()
    }

    fn resolve(id: String, template: UnitTemplate) -> LoadResult<UnitBlueprint> {
        let stats = Stats::new(
            template.max_hp,
            template.attack_power,
            template.armor,
            template.speed,
        );
        stats
            .validate()
            .map_err(|reason| anyhow::anyhow!("unit '{}' has invalid stats: {}", id, reason))?;

        let passives = template
            .passives
            .iter()
            .map(|identifier| Passive::from_identifier(identifier))
            .collect::<CombatResult<Vec<_>>>()
            .with_context(|| format!("Failed to resolve passives for unit '{}'", id))?;

        Ok(UnitBlueprint {
            id,
            name: template.name,
            stats,
            tags: template.tags,
            passives,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        ("knight", (
            name: "Knight",
            max_hp: 120,
            attack_power: 14,
            armor: 25,
            tags: "PLAYER",
            passives: ["death_shield", "lifesteal"],
        )),
        ("slime", (
            name: "Slime",
            max_hp: 40,
            attack_power: 4,
        )),
    ]"#;

    #[test]
    fn parses_and_resolves_catalog() {
        let units = UnitLoader::parse(CATALOG).unwrap();

        assert_eq!(units.len(), 2);
        let knight = &units[0];
        assert_eq!(knight.id, "knight");
        assert_eq!(knight.stats.current_hp, 120);
        assert_eq!(knight.tags, UnitTags::PLAYER);
        let names: Vec<_> = knight.passives.iter().map(Passive::name).collect();
        assert_eq!(names, vec!["death_shield", "lifesteal"]);

        let slime = &units[1];
        assert_eq!(slime.stats.armor, 0);
        assert_eq!(slime.stats.speed, 10);
        assert!(slime.passives.is_empty());
    }

    #[test]
    fn unknown_passive_fails_at_load() {
        let err = UnitLoader::parse(
            r#"[("rogue", (name: "Rogue", max_hp: 50, attack_power: 9, passives: ["backstab"]))]"#,
        )
        .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("rogue"));
        assert!(message.contains("backstab"));
    }

    #[test]
    fn invalid_stats_fail_at_load() {
        let err =
            UnitLoader::parse(r#"[("ghost", (name: "Ghost", max_hp: 0, attack_power: 1))]"#)
                .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn blueprint_spawns_with_passives() {
        let units = UnitLoader::parse(CATALOG).unwrap();
        let mut session = CombatSession::default();

        let knight = units[0].spawn(&mut session).unwrap();

        assert_eq!(session.unit(knight).unwrap().passives().len(), 2);
        assert_eq!(session.unit(knight).unwrap().name(), "Knight");
    }
}
