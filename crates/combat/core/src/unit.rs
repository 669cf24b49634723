//! Units: identity, stats, and attached behavior lists.
//!
//! A unit is plain data. HP and the status list are written only by the
//! [`CombatSession`](crate::CombatSession) (attack resolution and status ticks);
//! callers get read access.

use crate::ability::Ability;
use crate::passive::{Passive, PassiveBinding, PassiveId};
use crate::stats::{Stats, UnitId, UnitTags};
use crate::status::StatusEffects;

/// A passive together with the registrations it made while attaching.
#[derive(Clone, Debug)]
pub struct AttachedPassive {
    pub(crate) id: PassiveId,
    pub(crate) passive: Passive,
    pub(crate) binding: PassiveBinding,
}

impl AttachedPassive {
    pub fn id(&self) -> PassiveId {
        self.id
    }

    pub fn passive(&self) -> &Passive {
        &self.passive
    }

    pub fn binding(&self) -> &PassiveBinding {
        &self.binding
    }
}

/// A combatant.
#[derive(Clone, Debug)]
pub struct Unit {
    pub(crate) id: UnitId,
    name: String,
    tags: UnitTags,
    pub(crate) stats: Stats,
    /// Ordered by priority, then attach order.
    pub(crate) passives: Vec<AttachedPassive>,
    pub(crate) abilities: Vec<Ability>,
    pub(crate) statuses: StatusEffects,
    pub(crate) alive: bool,
}

impl Unit {
    /// Creates an unspawned unit. The session assigns its id on spawn.
    pub fn new(name: impl Into<String>, stats: Stats) -> Self {
        Self {
            id: UnitId(u32::MAX),
            name: name.into(),
            tags: UnitTags::empty(),
            stats,
            passives: Vec::new(),
            abilities: Vec::new(),
            statuses: StatusEffects::new(),
            alive: true,
        }
    }

    /// Sets classification tags (builder pattern).
    pub fn with_tags(mut self, tags: UnitTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> UnitTags {
        self.tags
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn hp(&self) -> i32 {
        self.stats.current_hp
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_dead(&self) -> bool {
        !self.alive
    }

    pub fn passives(&self) -> &[AttachedPassive] {
        &self.passives
    }

    pub fn passive(&self, id: PassiveId) -> Option<&Passive> {
        self.passives
            .iter()
            .find(|attached| attached.id == id)
            .map(|attached| &attached.passive)
    }

    pub(crate) fn passive_mut(&mut self, id: PassiveId) -> Option<&mut Passive> {
        self.passives
            .iter_mut()
            .find(|attached| attached.id == id)
            .map(|attached| &mut attached.passive)
    }

    /// Abilities activated on this unit, in activation order.
    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn statuses(&self) -> &StatusEffects {
        &self.statuses
    }

    /// Inserts a passive after every passive of equal or lower priority.
    pub(crate) fn insert_passive(&mut self, attached: AttachedPassive) {
        let priority = attached.passive.priority();
        let index = self
            .passives
            .partition_point(|existing| existing.passive.priority() <= priority);
        self.passives.insert(index, attached);
    }

    pub(crate) fn take_passive(&mut self, id: PassiveId) -> Option<AttachedPassive> {
        let index = self.passives.iter().position(|attached| attached.id == id)?;
        Some(self.passives.remove(index))
    }
}
