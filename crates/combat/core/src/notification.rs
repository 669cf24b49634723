//! Outward notifications consumed by systems outside the engine.
//!
//! Presentation, reward, and logging layers read these from the session's
//! outbox after an operation completes. They carry facts only; nothing in the
//! engine reacts to them.

use crate::stats::UnitId;
use crate::status::{ApplyOutcome, StatusKind};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    /// An attack (primary or follow-up) was resolved against a living target.
    AttackResolved {
        source: UnitId,
        target: UnitId,
        damage: u32,
        critical: bool,
        follow_up: bool,
    },

    /// A unit's HP changed.
    HealthChanged {
        unit: UnitId,
        current_hp: i32,
        max_hp: i32,
    },

    /// A dying event was cancelled.
    DeathPrevented { unit: UnitId, revive_hp: i32 },

    UnitDied {
        unit: UnitId,
        killer: Option<UnitId>,
    },

    UnitRevived { unit: UnitId, hp: i32 },

    StatusApplied {
        unit: UnitId,
        kind: StatusKind,
        outcome: ApplyOutcome,
    },

    StatusTicked {
        unit: UnitId,
        kind: StatusKind,
        damage: i32,
    },

    StatusExpired { unit: UnitId, kind: StatusKind },

    ExtraAttackQueued { source: UnitId, target: UnitId },

    PhaseEntered { boss: UnitId, phase: usize },
}

impl Notification {
    /// The unit this notification is primarily about.
    pub fn subject(&self) -> UnitId {
        match self {
            Self::AttackResolved { target, .. } => *target,
            Self::HealthChanged { unit, .. }
            | Self::DeathPrevented { unit, .. }
            | Self::UnitDied { unit, .. }
            | Self::UnitRevived { unit, .. }
            | Self::StatusApplied { unit, .. }
            | Self::StatusTicked { unit, .. }
            | Self::StatusExpired { unit, .. } => *unit,
            Self::ExtraAttackQueued { source, .. } => *source,
            Self::PhaseEntered { boss, .. } => *boss,
        }
    }
}
