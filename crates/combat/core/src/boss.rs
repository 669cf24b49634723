//! Boss phase state machine.
//!
//! A boss moves through an ordered list of phases, driven by its health:
//!
//! ```text
//! phase 0 (100%) ──hp ≤ t1──▶ phase 1 ──hp ≤ t2──▶ … ──▶ phase N-1 (terminal)
//! ```
//!
//! - Phase 0 is entered at initialization.
//! - Each health observation advances **at most one** phase, even if HP fell
//!   past several thresholds; the next observation advances again.
//! - Phases never go backwards (healing does not revert a phase).

use tracing::{debug, warn};

use crate::ability::Ability;
use crate::error::{CombatError, CombatResult};
use crate::stats::UnitId;

/// One stage of a boss fight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossPhaseDefinition {
    /// Phase is entered when HP falls to or below this percent (0–100).
    pub trigger_percent: u32,
    /// Turns between the boss's attacks while in this phase.
    pub attack_interval: u32,
    /// Abilities activated when the phase is entered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<Ability>,
}

impl BossPhaseDefinition {
    pub fn new(trigger_percent: u32, attack_interval: u32) -> Self {
        Self {
            trigger_percent,
            attack_interval,
            abilities: Vec::new(),
        }
    }

    /// Adds an ability (builder pattern).
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }
}

/// Ordered phase list for one boss.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossDefinition {
    pub name: String,
    pub phases: Vec<BossPhaseDefinition>,
}

impl BossDefinition {
    pub fn new(name: impl Into<String>, phases: Vec<BossPhaseDefinition>) -> Self {
        Self {
            name: name.into(),
            phases,
        }
    }

    /// Rejects definitions the state machine cannot run and logs ordering
    /// problems it can tolerate.
    ///
    /// Returns the number of consistency warnings emitted.
    pub fn validate(&self) -> CombatResult<usize> {
        if self.phases.is_empty() {
            return Err(CombatError::InvalidBossDefinition {
                name: self.name.clone(),
                reason: "at least one phase is required",
            });
        }

        let mut warnings = 0;
        if self.phases[0].trigger_percent != 100 {
            warn!(
                boss = %self.name,
                trigger = self.phases[0].trigger_percent,
                "first boss phase should trigger at 100%"
            );
            warnings += 1;
        }
        for (index, pair) in self.phases.windows(2).enumerate() {
            if pair[1].trigger_percent >= pair[0].trigger_percent {
                warn!(
                    boss = %self.name,
                    phase = index + 1,
                    previous = pair[0].trigger_percent,
                    trigger = pair[1].trigger_percent,
                    "boss phase triggers are not strictly decreasing"
                );
                warnings += 1;
            }
        }
        Ok(warnings)
    }
}

/// Tracks which phase a boss is in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BossController {
    boss: UnitId,
    definition: BossDefinition,
    current: usize,
}

impl BossController {
    /// Creates a controller in phase 0.
    ///
    /// Activating phase 0's abilities is the caller's job; see
    /// [`CombatSession::initialize_boss`](crate::CombatSession::initialize_boss).
    pub fn new(boss: UnitId, definition: BossDefinition) -> CombatResult<Self> {
        definition.validate()?;
        Ok(Self {
            boss,
            definition,
            current: 0,
        })
    }

    pub fn boss(&self) -> UnitId {
        self.boss
    }

    pub fn definition(&self) -> &BossDefinition {
        &self.definition
    }

    pub fn current_phase(&self) -> usize {
        self.current
    }

    pub fn phase(&self) -> &BossPhaseDefinition {
        &self.definition.phases[self.current]
    }

    pub fn is_final_phase(&self) -> bool {
        self.current + 1 >= self.definition.phases.len()
    }

    /// Feeds an integer health percent. Returns the phase entered, if any.
    pub fn observe_percent(&mut self, percent: u32) -> Option<usize> {
        self.advance_if(|trigger| percent <= trigger)
    }

    /// Feeds raw HP. Threshold comparison is exact (no percent flooring).
    pub fn observe_health(&mut self, current_hp: i32, max_hp: i32) -> Option<usize> {
        let current = current_hp.max(0) as i64;
        let max = max_hp.max(1) as i64;
        self.advance_if(|trigger| current * 100 <= trigger as i64 * max)
    }

    fn advance_if(&mut self, reached: impl Fn(u32) -> bool) -> Option<usize> {
        let next = self.definition.phases.get(self.current + 1)?;
        if !reached(next.trigger_percent) {
            return None;
        }
        self.current += 1;
        debug!(
            boss = %self.boss,
            name = %self.definition.name,
            phase = self.current,
            trigger = next.trigger_percent,
            "boss phase advanced"
        );
        Some(self.current)
    }
}
