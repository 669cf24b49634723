//! Simulate one fight.
//!
//! The scheduler here is deliberately plain: each turn ticks status effects on
//! both combatants, the hero attacks, and the boss attacks every
//! `attack_interval` turns of its current phase.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use combat_content::{BossBlueprint, ContentFactory, UnitBlueprint};
use combat_core::{CombatConfig, CombatSession, UnitId};
use tracing::{debug, info};

use super::default_content_dir;

/// Play out one hero-versus-boss fight
#[derive(Parser, Debug)]
pub struct Simulate {
    /// Content directory (units.ron, bosses.ron, config.toml)
    #[arg(long, default_value_os_t = default_content_dir())]
    pub content: PathBuf,

    /// Hero unit id from units.ron
    #[arg(long)]
    pub hero: String,

    /// Boss id from bosses.ron
    #[arg(long)]
    pub boss: String,

    /// Override the RNG seed from config.toml
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many turns even if both sides are alive
    #[arg(long, default_value_t = 200)]
    pub max_turns: u32,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let catalog = ContentFactory::new(&self.content)
            .load_catalog()
            .with_context(|| format!("Failed to load content from {}", self.content.display()))?;

        let hero = catalog
            .unit(&self.hero)
            .with_context(|| format!("Unknown hero '{}'", self.hero))?;
        let boss = catalog
            .boss(&self.boss)
            .with_context(|| format!("Unknown boss '{}'", self.boss))?;
        let boss_unit = catalog
            .unit(&boss.unit)
            .with_context(|| format!("Boss '{}' has no unit template", boss.id))?;

        let mut config = catalog.config.clone();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        let summary = run_fight(config, hero, boss, boss_unit, self.max_turns)?;

        println!("Fight: {} vs {}", hero.name, boss_unit.name);
        println!("  Turns:        {}", summary.turns);
        match summary.outcome {
            Outcome::HeroWon => println!("  Winner:       {}", hero.name),
            Outcome::BossWon => println!("  Winner:       {}", boss_unit.name),
            Outcome::Timeout => println!("  Winner:       none (turn limit reached)"),
        }
        println!("  Boss phase:   {}", summary.boss_phase);
        println!("  Hero HP:      {}/{}", summary.hero_hp, hero.stats.max_hp);
        println!("  Boss HP:      {}/{}", summary.boss_hp, boss_unit.stats.max_hp);
        println!("  Hero damage:  {}", summary.hero_damage);
        println!("  Boss damage:  {}", summary.boss_damage);
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    HeroWon,
    BossWon,
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FightSummary {
    pub turns: u32,
    pub outcome: Outcome,
    pub boss_phase: usize,
    pub hero_hp: i32,
    pub boss_hp: i32,
    pub hero_damage: u64,
    pub boss_damage: u64,
}

pub fn run_fight(
    config: CombatConfig,
    hero: &UnitBlueprint,
    boss: &BossBlueprint,
    boss_unit: &UnitBlueprint,
    max_turns: u32,
) -> Result<FightSummary> {
    let mut session = CombatSession::new(config);
    let hero_id = hero.spawn(&mut session)?;
    let boss_id = boss_unit.spawn(&mut session)?;
    session.initialize_boss(boss_id, boss.definition.clone())?;
    info!(hero = %hero.id, boss = %boss.id, seed = session.config().seed, "fight started");

    let mut turns = 0;
    let mut hero_damage = 0u64;
    let mut boss_damage = 0u64;
    let mut since_boss_attack = 0;

    while turns < max_turns && both_alive(&session, hero_id, boss_id)? {
        turns += 1;

        session.tick_turn_start(hero_id)?;
        session.tick_turn_start(boss_id)?;

        if both_alive(&session, hero_id, boss_id)? {
            let power = session.unit(hero_id)?.stats().attack_power;
            hero_damage += u64::from(session.resolve_attack(hero_id, boss_id, power)?);
        }

        since_boss_attack += 1;
        let interval = session
            .boss(boss_id)
            .map_or(1, |controller| controller.phase().attack_interval.max(1));
        if since_boss_attack >= interval && both_alive(&session, hero_id, boss_id)? {
            since_boss_attack = 0;
            let power = session.unit(boss_id)?.stats().attack_power;
            boss_damage += u64::from(session.resolve_attack(boss_id, hero_id, power)?);
        }

        for notification in session.drain_notifications() {
            debug!(
                turn = turns,
                unit = %notification.subject(),
                ?notification,
                "combat notification"
            );
        }
    }

    let hero_unit = session.unit(hero_id)?;
    let boss_state = session.unit(boss_id)?;
    let outcome = if boss_state.is_dead() {
        Outcome::HeroWon
    } else if hero_unit.is_dead() {
        Outcome::BossWon
    } else {
        Outcome::Timeout
    };
    info!(
        turns,
        ?outcome,
        boss_health_percent = boss_state.stats().health_percent(),
        "fight finished"
    );

    Ok(FightSummary {
        turns,
        outcome,
        boss_phase: session.boss_phase(boss_id).unwrap_or_default(),
        hero_hp: hero_unit.hp(),
        boss_hp: boss_state.hp(),
        hero_damage,
        boss_damage,
    })
}

fn both_alive(session: &CombatSession, hero: UnitId, boss: UnitId) -> Result<bool> {
    Ok(session.unit(hero)?.is_alive() && session.unit(boss)?.is_alive())
}
