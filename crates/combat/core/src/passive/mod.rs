//! Passives: persistent unit behaviors with an attach/detach lifecycle.
//!
//! A passive is attached to exactly one unit. During [`PassiveBehavior::attach`]
//! it subscribes to events on its owner and may register damage modifiers; every
//! registration goes through a [`PassiveContext`] which records the returned
//! handles in the passive's [`PassiveBinding`]. [`PassiveBehavior::detach`] must
//! reverse all of them; the default implementation does so with [`release`].
//! The session reports a passive that leaves registrations behind as a
//! [`CombatError::DetachLeak`](crate::CombatError::DetachLeak).
//!
//! Passives attached together are attached in ascending priority order, which
//! also fixes their position in each event's listener list.

pub mod common;

use core::fmt;

use strum::IntoEnumIterator;

pub use common::{DeathShield, DoubleStrike, Executioner, Lifesteal, StatusOnHit, Thorns};

use crate::error::{CombatError, CombatResult};
use crate::event::{CombatEvent, EventBus, EventKind, Reaction, SubscriptionHandle};
use crate::modifier::{Modifier, ModifierHandle, ModifierPipeline};
use crate::rng::CombatRng;
use crate::stats::UnitId;
use crate::status::StatusEffect;

/// Identity of one attached passive instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveId(pub u64);

impl fmt::Display for PassiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "passive#{}", self.0)
    }
}

/// Registrations a passive made while attached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassiveBinding {
    subscriptions: Vec<SubscriptionHandle>,
    modifiers: Vec<ModifierHandle>,
}

impl PassiveBinding {
    pub fn subscriptions(&self) -> &[SubscriptionHandle] {
        &self.subscriptions
    }

    pub fn modifiers(&self) -> &[ModifierHandle] {
        &self.modifiers
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len() + self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration surface handed to a passive during attach and detach.
pub struct PassiveContext<'a> {
    owner: UnitId,
    passive: PassiveId,
    priority: i32,
    events: &'a mut EventBus,
    modifiers: &'a mut ModifierPipeline,
    binding: &'a mut PassiveBinding,
}

impl<'a> PassiveContext<'a> {
    pub(crate) fn new(
        owner: UnitId,
        passive: PassiveId,
        priority: i32,
        events: &'a mut EventBus,
        modifiers: &'a mut ModifierPipeline,
        binding: &'a mut PassiveBinding,
    ) -> Self {
        Self {
            owner,
            passive,
            priority,
            events,
            modifiers,
            binding,
        }
    }

    pub fn owner(&self) -> UnitId {
        self.owner
    }

    pub fn passive(&self) -> PassiveId {
        self.passive
    }

    /// Subscribes to `kind` events on the owner at the passive's priority.
    pub fn subscribe(&mut self, kind: EventKind) -> SubscriptionHandle {
        let handle = self
            .events
            .subscribe(self.owner, self.passive, kind, self.priority);
        self.binding.subscriptions.push(handle);
        handle
    }

    /// Registers a damage modifier owned by this passive.
    pub fn register_modifier(&mut self, modifier: Modifier) -> ModifierHandle {
        let handle = self.modifiers.register(modifier);
        self.binding.modifiers.push(handle);
        handle
    }

    pub fn binding(&self) -> &PassiveBinding {
        self.binding
    }
}

/// Reverses every registration recorded in the context's binding.
pub fn release(cx: &mut PassiveContext<'_>) {
    for handle in cx.binding.subscriptions.drain(..) {
        cx.events.unsubscribe(handle);
    }
    for handle in cx.binding.modifiers.drain(..) {
        cx.modifiers.unregister(handle);
    }
}

/// Lifecycle and event capability implemented by every passive variant.
pub trait PassiveBehavior {
    fn name(&self) -> &'static str;

    /// Lower attaches (and observes events) first.
    fn priority(&self) -> i32;

    /// Called exactly once when the passive is added to a unit.
    fn attach(&mut self, cx: &mut PassiveContext<'_>);

    /// Called exactly once when the passive is removed. Must undo `attach`.
    fn detach(&mut self, cx: &mut PassiveContext<'_>) {
        release(cx);
    }

    /// Handles an event the passive subscribed to.
    fn on_event(
        &mut self,
        _owner: UnitId,
        _event: &mut CombatEvent,
        _rng: &mut CombatRng,
        _reactions: &mut Vec<Reaction>,
    ) {
    }
}

/// Closed set of passive behaviors.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Passive {
    DeathShield(DeathShield),
    Lifesteal(Lifesteal),
    Thorns(Thorns),
    DoubleStrike(DoubleStrike),
    StatusOnHit(StatusOnHit),
    Executioner(Executioner),
}

impl Passive {
    pub fn behavior(&self) -> &dyn PassiveBehavior {
        match self {
            Self::DeathShield(p) => p,
            Self::Lifesteal(p) => p,
            Self::Thorns(p) => p,
            Self::DoubleStrike(p) => p,
            Self::StatusOnHit(p) => p,
            Self::Executioner(p) => p,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn PassiveBehavior {
        match self {
            Self::DeathShield(p) => p,
            Self::Lifesteal(p) => p,
            Self::Thorns(p) => p,
            Self::DoubleStrike(p) => p,
            Self::StatusOnHit(p) => p,
            Self::Executioner(p) => p,
        }
    }

    pub fn name(&self) -> &'static str {
        self.behavior().name()
    }

    pub fn priority(&self) -> i32 {
        self.behavior().priority()
    }

    /// Builds a passive from its content identifier (e.g. `"death_shield"`).
    pub fn from_identifier(identifier: &str) -> CombatResult<Self> {
        identifier
            .parse::<PassiveKind>()
            .map(PassiveKind::construct)
            .map_err(|_| CombatError::UnknownIdentifier {
                kind: "passive",
                identifier: identifier.to_string(),
            })
    }
}

/// Content identifiers for passives, each mapped to a default-tuned constructor.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PassiveKind {
    DeathShield,
    Lifesteal,
    Thorns,
    DoubleStrike,
    VenomousStrikes,
    SearingStrikes,
    SerratedStrikes,
    Executioner,
}

impl PassiveKind {
    pub fn construct(self) -> Passive {
        match self {
            Self::DeathShield => Passive::DeathShield(DeathShield::new(30)),
            Self::Lifesteal => Passive::Lifesteal(Lifesteal::new(20)),
            Self::Thorns => Passive::Thorns(Thorns::new(25)),
            Self::DoubleStrike => Passive::DoubleStrike(DoubleStrike::new(25)),
            Self::VenomousStrikes => {
                Passive::StatusOnHit(StatusOnHit::new(StatusEffect::poison(1, 3), 100))
            }
            Self::SearingStrikes => {
                Passive::StatusOnHit(StatusOnHit::new(StatusEffect::burn(3, 3), 35))
            }
            Self::SerratedStrikes => {
                Passive::StatusOnHit(StatusOnHit::new(StatusEffect::bleed(2, 2), 50))
            }
            Self::Executioner => Passive::Executioner(Executioner::new(30, 150)),
        }
    }

    /// Every known identifier, for content validation and listings.
    pub fn identifiers() -> impl Iterator<Item = &'static str> {
        Self::iter().map(|kind| kind.into())
    }
}
