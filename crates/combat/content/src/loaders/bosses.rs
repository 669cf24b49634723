//! Boss catalog loader.
//!
//! A boss entry names the unit template it fights as, declares a catalog of
//! named abilities, and lists phases that refer to those abilities by name:
//!
//! ```ron
//! [
//!     ("warden", (
//!         unit: "stone_warden",
//!         abilities: {
//!             "harden": Fortify(armor: 50),
//!             "frenzy": Enrage(percent: 150),
//!         },
//!         phases: [
//!             (trigger_percent: 100, attack_interval: 3),
//!             (trigger_percent: 50, attack_interval: 2, abilities: ["harden", "frenzy"]),
//!         ],
//!     )),
//! ]
//! ```
//!
//! A phase that names an ability missing from the catalog is tolerated: the
//! reference is logged and skipped.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use combat_core::{Ability, BossDefinition, BossPhaseDefinition, Passive};
use serde::Deserialize;
use tracing::warn;

use crate::loaders::{LoadResult, read_file};

/// Ability as written in content; passives are referenced by identifier.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub enum AbilitySpec {
    Enrage { percent: u32 },
    Empower { amount: i32 },
    Fortify { armor: i32 },
    GrantPassive(String),
    Cleanse,
}

impl AbilitySpec {
    pub fn resolve(&self) -> LoadResult<Ability> {
        Ok(match self {
            Self::Enrage { percent } => Ability::Enrage { percent: *percent },
            Self::Empower { amount } => Ability::Empower { amount: *amount },
            Self::Fortify { armor } => Ability::Fortify { armor: *armor },
            Self::GrantPassive(identifier) => Ability::GrantPassive(
                Passive::from_identifier(identifier)
                    .context("Failed to resolve granted passive")?,
            ),
            Self::Cleanse => Ability::Cleanse,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PhaseSpec {
    pub trigger_percent: u32,
    pub attack_interval: u32,
    #[serde(default)]
    pub abilities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BossSpec {
    /// Id of the unit template this boss fights as.
    pub unit: String,
    #[serde(default)]
    pub abilities: BTreeMap<String, AbilitySpec>,
    pub phases: Vec<PhaseSpec>,
}

/// A boss with its phase definition fully resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BossBlueprint {
    pub id: String,
    pub unit: String,
    pub definition: BossDefinition,
}

/// Loader for boss catalogs from RON files.
pub struct BossLoader;

impl BossLoader {
    /// Load a boss catalog from a RON file.
    ///
    /// RON format: `Vec<(String, BossSpec)>`
    pub fn load(path: &Path) -> LoadResult<Vec<BossBlueprint>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in boss catalog {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<BossBlueprint>> {
        let raw_data: Vec<(String, BossSpec)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse boss catalog RON: {}", e))?;

        raw_data
            .into_iter()
            .map(|(id, spec)| Self::resolve(id, spec))
            .collect()
    }

    fn resolve(id: String, spec: BossSpec) -> LoadResult<BossBlueprint> {
        let catalog = spec
            .abilities
            .iter()
            .map(|(name, ability)| {
                ability
                    .resolve()
                    .map(|resolved| (name.as_str(), resolved))
                    .with_context(|| format!("ability '{}' of boss '{}'", name, id))
            })
            .collect::<LoadResult<BTreeMap<_, _>>>()?;

        let mut phases = Vec::with_capacity(spec.phases.len());
        for (index, phase) in spec.phases.iter().enumerate() {
            let mut definition =
                BossPhaseDefinition::new(phase.trigger_percent, phase.attack_interval);
            for name in &phase.abilities {
                match catalog.get(name.as_str()) {
                    Some(ability) => definition = definition.with_ability(ability.clone()),
                    None => warn!(
                        boss = %id,
                        phase = index,
                        ability = %name,
                        "phase references an unknown ability; skipping"
                    ),
                }
            }
            phases.push(definition);
        }

        let definition = BossDefinition::new(id.clone(), phases);
        definition
            .validate()
            .with_context(|| format!("boss '{}' is not runnable", id))?;

        Ok(BossBlueprint {
            id,
            unit: spec.unit,
            definition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        ("warden", (
            unit: "stone_warden",
            abilities: {
                "harden": Fortify(armor: 50),
                "frenzy": Enrage(percent: 150),
                "spikes": GrantPassive("thorns"),
            },
            phases: [
                (trigger_percent: 100, attack_interval: 3, abilities: ["harden"]),
                (trigger_percent: 50, attack_interval: 2, abilities: ["frenzy", "spikes", "meteor"]),
                (trigger_percent: 20, attack_interval: 1),
            ],
        )),
    ]"#;

    #[test]
    fn resolves_phases_and_skips_unknown_abilities() {
        let bosses = BossLoader::parse(CATALOG).unwrap();

        assert_eq!(bosses.len(), 1);
        let warden = &bosses[0];
        assert_eq!(warden.unit, "stone_warden");

        let phases = &warden.definition.phases;
        assert_eq!(phases.len(), 3);
        assert_eq!(phases[0].abilities, vec![Ability::Fortify { armor: 50 }]);
        assert_eq!(phases[1].abilities.len(), 2);
        assert!(matches!(phases[1].abilities[1], Ability::GrantPassive(Passive::Thorns(_))));
        assert!(phases[2].abilities.is_empty());
    }

    #[test]
    fn out_of_order_triggers_still_load() {
        let bosses = BossLoader::parse(
            r#"[("odd", (unit: "x", phases: [(trigger_percent: 90, attack_interval: 1), (trigger_percent: 95, attack_interval: 1)]))]"#,
        )
        .unwrap();
        assert_eq!(bosses[0].definition.phases.len(), 2);
    }

    #[test]
    fn empty_phase_list_is_rejected() {
        let err = BossLoader::parse(r#"[("hollow", (unit: "x", phases: []))]"#).unwrap_err();
        assert!(format!("{err:#}").contains("hollow"));
    }

    #[test]
    fn unknown_granted_passive_fails_at_load() {
        let err = BossLoader::parse(
            r#"[("w", (unit: "x", abilities: {"bad": GrantPassive("nope")}, phases: [(trigger_percent: 100, attack_interval: 1)]))]"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("nope"));
    }
}
