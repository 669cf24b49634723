//! Deterministic turn-based combat rules.
//!
//! `combat-core` resolves attacks between units: armor mitigation, an ordered
//! damage modifier pipeline, passive abilities reacting to combat events,
//! stacking status effects, and boss phase transitions. All state for a fight
//! lives in a [`CombatSession`]; every mutation flows through it.
pub mod ability;
pub mod boss;
pub mod config;
pub mod damage;
pub mod error;
pub mod event;
pub mod modifier;
pub mod notification;
pub mod passive;
pub mod rng;
pub mod session;
pub mod stats;
pub mod status;
pub mod unit;

pub use ability::Ability;
pub use boss::{BossController, BossDefinition, BossPhaseDefinition};
pub use config::CombatConfig;
pub use error::{CombatError, CombatFault, CombatResult, ErrorSeverity};
pub use event::{
    CombatEvent, DyingEvent, EventBus, EventKind, HitEvent, Reaction, SubscriptionHandle,
};
pub use modifier::{
    DamageContext, Modifier, ModifierHandle, ModifierKind, ModifierPipeline, ModifierScope,
    SourceFilter,
};
pub use notification::Notification;
pub use passive::{
    DeathShield, DoubleStrike, Executioner, Lifesteal, Passive, PassiveBehavior, PassiveBinding,
    PassiveContext, PassiveId, PassiveKind, StatusOnHit, Thorns,
};
pub use rng::CombatRng;
pub use session::CombatSession;
pub use stats::{Stats, UnitId, UnitTags};
pub use status::{ApplyOutcome, StatusEffect, StatusEffects, StatusKind, StatusTick};
pub use unit::{AttachedPassive, Unit};
