//! Content lint: load every catalog and report what was found.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use combat_content::ContentFactory;
use combat_core::PassiveKind;

use super::default_content_dir;

/// Load every catalog and report problems
#[derive(Parser, Debug)]
pub struct Check {
    /// Content directory (units.ron, bosses.ron, config.toml)
    #[arg(long, default_value_os_t = default_content_dir())]
    pub content: PathBuf,

    /// Also list every passive identifier units may reference
    #[arg(long)]
    pub list_passives: bool,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let catalog = ContentFactory::new(&self.content)
            .load_catalog()
            .with_context(|| format!("Content in {} is invalid", self.content.display()))?;

        println!("Content OK: {}", self.content.display());
        println!(
            "  Config:  seed={:#x} mitigation={}",
            catalog.config.seed, catalog.config.mitigation_constant
        );
        println!("  Units:   {}", catalog.units.len());
        for unit in &catalog.units {
            let passives: Vec<_> = unit.passives.iter().map(|p| p.name()).collect();
            println!(
                "    {:<16} hp={:<5} atk={:<4} armor={:<4} passives=[{}]",
                unit.id,
                unit.stats.max_hp,
                unit.stats.attack_power,
                unit.stats.armor,
                passives.join(", ")
            );
        }
        println!("  Bosses:  {}", catalog.bosses.len());
        for boss in &catalog.bosses {
            let triggers: Vec<_> = boss
                .definition
                .phases
                .iter()
                .map(|phase| phase.trigger_percent.to_string())
                .collect();
            println!(
                "    {:<16} unit={} phases=[{}]",
                boss.id,
                boss.unit,
                triggers.join(", ")
            );
        }

        if self.list_passives {
            println!("  Passive identifiers:");
            for identifier in PassiveKind::identifiers() {
                println!("    {identifier}");
            }
        }
        Ok(())
    }
}
