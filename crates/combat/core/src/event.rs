//! Unit-level combat events and the ordered listener registry.
//!
//! Passives subscribe to events on their owner through an [`EventBus`] owned by
//! the combat session. Each subscription returns a [`SubscriptionHandle`] that
//! is the only way to remove it. Listeners are ordered by passive priority and
//! then by subscription order, so the earliest subscriber observes (and for
//! [`CombatEvent::Dying`], may cancel) an event before later ones.
//!
//! Handlers never mutate the session directly: they emit [`Reaction`]s which the
//! session applies after the handler returns.

use core::fmt;

use crate::passive::PassiveId;
use crate::stats::UnitId;
use crate::status::StatusEffect;

/// Kinds of events a passive can subscribe to, from its owner's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    /// The owner is about to attack.
    BeforeAttack,
    /// The owner landed a hit.
    Hit,
    /// The owner was hit.
    Damaged,
    /// The owner finished an attack (after all on-hit handlers).
    AfterAttack,
    /// The owner's HP reached zero; cancellable.
    Dying,
    /// The owner died. Not cancellable.
    Died,
}

/// A landed hit, as seen by both the attacker (`Hit`) and the target (`Damaged`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitEvent {
    pub attacker: UnitId,
    pub target: UnitId,
    /// Base damage requested for the attack, before mitigation.
    pub base_damage: i32,
    /// Final damage applied to the target.
    pub damage: i32,
    pub critical: bool,
    /// The hit came from the extra-attack queue.
    pub follow_up: bool,
}

/// Cancellable notification fired before a unit's death is finalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DyingEvent {
    pub unit: UnitId,
    pub killer: Option<UnitId>,
    /// HP after the lethal damage (zero or negative).
    pub hp: i32,
    pub max_hp: i32,
    pub cancelled: bool,
    /// HP to restore when cancelled.
    pub revive_hp: i32,
}

impl DyingEvent {
    pub fn new(unit: UnitId, killer: Option<UnitId>, hp: i32, max_hp: i32) -> Self {
        Self {
            unit,
            killer,
            hp,
            max_hp,
            cancelled: false,
            revive_hp: 0,
        }
    }

    /// Cancels the death, restoring the unit to `revive_hp`.
    pub fn cancel(&mut self, revive_hp: i32) {
        self.cancelled = true;
        self.revive_hp = revive_hp;
    }
}

/// Event payload handed to passive handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatEvent {
    BeforeAttack {
        attacker: UnitId,
        target: UnitId,
        follow_up: bool,
    },
    Hit(HitEvent),
    Damaged(HitEvent),
    AfterAttack {
        attacker: UnitId,
        target: UnitId,
        follow_up: bool,
    },
    Dying(DyingEvent),
    Died {
        unit: UnitId,
        killer: Option<UnitId>,
    },
}

impl CombatEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::BeforeAttack { .. } => EventKind::BeforeAttack,
            Self::Hit(_) => EventKind::Hit,
            Self::Damaged(_) => EventKind::Damaged,
            Self::AfterAttack { .. } => EventKind::AfterAttack,
            Self::Dying(_) => EventKind::Dying,
            Self::Died { .. } => EventKind::Died,
        }
    }
}

/// Side effects requested by a passive handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    /// Restore HP (clamped to maximum).
    Heal { unit: UnitId, amount: i32 },
    /// Lose HP directly, bypassing mitigation and the modifier pipeline.
    DirectDamage {
        source: UnitId,
        target: UnitId,
        amount: i32,
    },
    ApplyStatus { unit: UnitId, effect: StatusEffect },
    /// Enqueue a follow-up attack, resolved after the current attack's events.
    QueueAttack {
        source: UnitId,
        target: UnitId,
        base_damage: i32,
    },
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(pub u64);

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Listener {
    handle: SubscriptionHandle,
    owner: UnitId,
    passive: PassiveId,
    kind: EventKind,
    priority: i32,
}

/// Per-fight ordered listener registry.
#[derive(Clone, Debug, Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    next_handle: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `passive` to `kind` events on `owner`.
    pub fn subscribe(
        &mut self,
        owner: UnitId,
        passive: PassiveId,
        kind: EventKind,
        priority: i32,
    ) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;

        let index = self
            .listeners
            .partition_point(|listener| listener.priority <= priority);
        self.listeners.insert(
            index,
            Listener {
                handle,
                owner,
                passive,
                kind,
                priority,
            },
        );
        handle
    }

    /// Removes a subscription. Returns false if the handle is unknown.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        match self.listeners.iter().position(|l| l.handle == handle) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Passives listening for `kind` on `owner`, in dispatch order.
    ///
    /// Returns a snapshot so handlers may attach or detach passives while the
    /// event is being dispatched.
    pub fn listeners(&self, owner: UnitId, kind: EventKind) -> Vec<PassiveId> {
        self.listeners
            .iter()
            .filter(|l| l.owner == owner && l.kind == kind)
            .map(|l| l.passive)
            .collect()
    }

    /// Number of live subscriptions held by a passive.
    pub fn subscription_count(&self, passive: PassiveId) -> usize {
        self.listeners.iter().filter(|l| l.passive == passive).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
