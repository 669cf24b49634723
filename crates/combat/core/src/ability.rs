//! Phase-scoped boss abilities.
//!
//! An ability is activated once, when its phase is entered, and registers its
//! own effects into the session (modifiers, passives, stat changes). Nothing is
//! deactivated when a later phase begins: phase effects are cumulative.

use tracing::debug;

use crate::error::CombatResult;
use crate::modifier::Modifier;
use crate::passive::Passive;
use crate::session::CombatSession;
use crate::stats::UnitId;

/// Closed set of abilities a boss phase can activate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ability {
    /// Percentage damage modifier on the boss's own attacks (`150` = ×1.5).
    Enrage { percent: u32 },
    /// Flat damage bonus on the boss's own attacks.
    Empower { amount: i32 },
    /// Permanent armor increase.
    Fortify { armor: i32 },
    /// Attaches a passive to the boss.
    GrantPassive(Passive),
    /// Removes every active status effect from the boss.
    Cleanse,
}

impl Ability {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enrage { .. } => "enrage",
            Self::Empower { .. } => "empower",
            Self::Fortify { .. } => "fortify",
            Self::GrantPassive(_) => "grant_passive",
            Self::Cleanse => "cleanse",
        }
    }

    /// Registers this ability's effects for `boss`.
    pub fn activate(&self, boss: UnitId, session: &mut CombatSession) -> CombatResult<()> {
        debug!(boss = %boss, ability = self.name(), "activating ability");
        match self {
            Self::Enrage { percent } => {
                session.register_modifier(Modifier::percentage(*percent).for_unit(boss));
            }
            Self::Empower { amount } => {
                session.register_modifier(Modifier::flat(*amount).for_unit(boss));
            }
            Self::Fortify { armor } => {
                session.adjust_armor(boss, *armor)?;
            }
            Self::GrantPassive(passive) => {
                session.attach_passive(boss, passive.clone())?;
            }
            Self::Cleanse => {
                session.clear_statuses(boss)?;
            }
        }
        Ok(())
    }
}
