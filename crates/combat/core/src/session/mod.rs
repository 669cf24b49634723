//! Combat session: the per-fight owner of units and registries.
//!
//! One [`CombatSession`] is constructed per fight and dropped when the fight
//! ends. It owns everything that would otherwise be process-wide state (the
//! modifier pipeline, the event listener registry, boss controllers, the RNG),
//! so fights cannot leak registrations into each other.
//!
//! All mutation of unit HP and status lists happens here, on one logical thread
//! of control: an operation runs to completion before the next one starts.
//!
//! # Operations
//!
//! - [`resolve_attack`](CombatSession::resolve_attack): one full attack, including queued follow-ups
//! - [`attach_passive`](CombatSession::attach_passive) / [`detach_passive`](CombatSession::detach_passive)
//! - [`register_modifier`](CombatSession::register_modifier) / [`unregister_modifier`](CombatSession::unregister_modifier)
//! - [`apply_status`](CombatSession::apply_status) / [`tick_turn_start`](CombatSession::tick_turn_start)
//! - [`initialize_boss`](CombatSession::initialize_boss) / [`boss_phase`](CombatSession::boss_phase)

mod resolver;

use tracing::{debug, trace, warn};

use crate::boss::{BossController, BossDefinition};
use crate::config::CombatConfig;
use crate::error::{CombatError, CombatResult};
use crate::event::EventBus;
use crate::modifier::{Modifier, ModifierHandle, ModifierPipeline};
use crate::notification::Notification;
use crate::passive::{Passive, PassiveBinding, PassiveContext, PassiveId, release};
use crate::rng::CombatRng;
use crate::stats::UnitId;
use crate::status::{ApplyOutcome, StatusEffect, StatusKind};
use crate::unit::{AttachedPassive, Unit};

use resolver::ExtraAttackQueue;

/// Per-fight combat state and entry point for every engine operation.
#[derive(Debug)]
pub struct CombatSession {
    config: CombatConfig,
    units: Vec<Unit>,
    modifiers: ModifierPipeline,
    events: EventBus,
    bosses: Vec<BossController>,
    rng: CombatRng,
    extra_attacks: ExtraAttackQueue,
    outbox: Vec<Notification>,
    next_passive: u64,
}

impl CombatSession {
    pub fn new(config: CombatConfig) -> Self {
        let rng = CombatRng::new(config.seed);
        Self {
            config,
            units: Vec::new(),
            modifiers: ModifierPipeline::new(),
            events: EventBus::new(),
            bosses: Vec::new(),
            rng,
            extra_attacks: ExtraAttackQueue::default(),
            outbox: Vec::new(),
            next_passive: 0,
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    // ========================================================================
    // Units
    // ========================================================================

    /// Adds a unit to the fight at its current (normally full) HP.
    pub fn spawn(&mut self, mut unit: Unit) -> CombatResult<UnitId> {
        unit.stats
            .validate()
            .map_err(|reason| CombatError::InvalidStats {
                name: unit.name().to_string(),
                reason,
            })?;

        let id = UnitId(self.units.len() as u32);
        unit.id = id;
        unit.alive = true;
        debug!(unit = %id, name = unit.name(), hp = unit.hp(), "unit spawned");
        self.units.push(unit);
        Ok(id)
    }

    pub fn unit(&self, id: UnitId) -> CombatResult<&Unit> {
        self.units
            .get(id.0 as usize)
            .ok_or(CombatError::UnknownUnit(id))
    }

    fn unit_mut(&mut self, id: UnitId) -> CombatResult<&mut Unit> {
        self.units
            .get_mut(id.0 as usize)
            .ok_or(CombatError::UnknownUnit(id))
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Restores HP to a living unit, clamped to maximum. Returns HP gained.
    pub fn heal(&mut self, unit: UnitId, amount: i32) -> CombatResult<i32> {
        let target = self.unit_mut(unit)?;
        if amount <= 0 || target.is_dead() || target.stats.is_full() {
            return Ok(0);
        }

        let before = target.stats.current_hp;
        target.stats.current_hp = (before.saturating_add(amount)).min(target.stats.max_hp);
        let healed = target.stats.current_hp - before;
        if healed > 0 {
            self.health_changed(unit)?;
        }
        Ok(healed)
    }

    /// Brings a dead unit back with `hp` clamped to `1..=max_hp`.
    ///
    /// Returns false (and does nothing) if the unit is alive.
    pub fn revive(&mut self, unit: UnitId, hp: i32) -> CombatResult<bool> {
        let target = self.unit_mut(unit)?;
        if target.is_alive() {
            return Ok(false);
        }

        let hp = hp.clamp(1, target.stats.max_hp);
        target.stats.current_hp = hp;
        target.alive = true;
        debug!(unit = %unit, hp, "unit revived");
        self.notify(Notification::UnitRevived { unit, hp });
        self.health_changed(unit)?;
        Ok(true)
    }

    pub(crate) fn adjust_armor(&mut self, unit: UnitId, delta: i32) -> CombatResult<()> {
        let target = self.unit_mut(unit)?;
        target.stats.armor = target.stats.armor.saturating_add(delta).max(0);
        Ok(())
    }

    // ========================================================================
    // Modifiers
    // ========================================================================

    pub fn register_modifier(&mut self, modifier: Modifier) -> ModifierHandle {
        self.modifiers.register(modifier)
    }

    pub fn unregister_modifier(&mut self, handle: ModifierHandle) -> CombatResult<Modifier> {
        self.modifiers
            .unregister(handle)
            .ok_or(CombatError::ModifierNotRegistered(handle))
    }

    pub fn modifiers(&self) -> &ModifierPipeline {
        &self.modifiers
    }

    // ========================================================================
    // Passives
    // ========================================================================

    /// Attaches one passive and returns its instance id.
    pub fn attach_passive(&mut self, unit: UnitId, passive: Passive) -> CombatResult<PassiveId> {
        self.unit(unit)?;
        Ok(self.attach_one(unit, passive))
    }

    /// Attaches a batch of passives in ascending priority order (stable for ties).
    ///
    /// Returned ids follow the attach order, not the input order.
    pub fn attach_passives(
        &mut self,
        unit: UnitId,
        mut passives: Vec<Passive>,
    ) -> CombatResult<Vec<PassiveId>> {
        self.unit(unit)?;
        passives.sort_by_key(Passive::priority);
        Ok(passives
            .into_iter()
            .map(|passive| self.attach_one(unit, passive))
            .collect())
    }

    fn attach_one(&mut self, unit: UnitId, mut passive: Passive) -> PassiveId {
        let id = PassiveId(self.next_passive);
        self.next_passive += 1;

        let mut binding = PassiveBinding::default();
        let priority = passive.priority();
        let mut cx = PassiveContext::new(
            unit,
            id,
            priority,
            &mut self.events,
            &mut self.modifiers,
            &mut binding,
        );
        passive.behavior_mut().attach(&mut cx);

        debug!(
            unit = %unit,
            passive = %id,
            name = passive.name(),
            priority,
            registrations = binding.len(),
            "passive attached"
        );
        if let Some(owner) = self.units.get_mut(unit.0 as usize) {
            owner.insert_passive(AttachedPassive {
                id,
                passive,
                binding,
            });
        }
        id
    }

    /// Detaches a passive, reversing every registration it made.
    pub fn detach_passive(&mut self, unit: UnitId, passive: PassiveId) -> CombatResult<Passive> {
        let mut attached = self
            .unit_mut(unit)?
            .take_passive(passive)
            .ok_or(CombatError::PassiveNotAttached { unit, passive })?;

        let priority = attached.passive.priority();
        let mut cx = PassiveContext::new(
            unit,
            passive,
            priority,
            &mut self.events,
            &mut self.modifiers,
            &mut attached.binding,
        );
        attached.passive.behavior_mut().detach(&mut cx);

        // The built-in passives all detach through `release`, so this only
        // fires for a `detach` override that skips registrations.
        let remaining = cx.binding().len();
        if remaining > 0 {
            release(&mut cx);
            return Err(CombatError::DetachLeak {
                unit,
                passive,
                remaining,
            });
        }

        debug!(unit = %unit, passive = %passive, name = attached.passive.name(), "passive detached");
        Ok(attached.passive)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ========================================================================
    // Status effects
    // ========================================================================

    /// Applies (or merges) a status effect. Dead units ignore new effects.
    pub fn apply_status(
        &mut self,
        unit: UnitId,
        effect: StatusEffect,
    ) -> CombatResult<ApplyOutcome> {
        let target = self.unit_mut(unit)?;
        if target.is_dead() {
            return Ok(ApplyOutcome::Ignored);
        }

        let outcome = target.statuses.apply(effect);
        match outcome {
            ApplyOutcome::Ignored => return Ok(outcome),
            ApplyOutcome::Rejected => {
                warn!(unit = %unit, kind = %effect.kind, "status effect limit reached; application dropped");
            }
            ApplyOutcome::Added | ApplyOutcome::Merged => {}
        }
        self.notify(Notification::StatusApplied {
            unit,
            kind: effect.kind,
            outcome,
        });
        Ok(outcome)
    }

    pub fn status(&self, unit: UnitId, kind: StatusKind) -> CombatResult<Option<StatusEffect>> {
        Ok(self.unit(unit)?.statuses.get(kind).copied())
    }

    pub fn remove_status(
        &mut self,
        unit: UnitId,
        kind: StatusKind,
    ) -> CombatResult<Option<StatusEffect>> {
        Ok(self.unit_mut(unit)?.statuses.remove(kind))
    }

    /// Removes every status effect from a unit. Returns how many were removed.
    pub fn clear_statuses(&mut self, unit: UnitId) -> CombatResult<usize> {
        Ok(self.unit_mut(unit)?.statuses.clear())
    }

    /// Ticks a unit's status effects once. Called by the turn scheduler at the
    /// start of the unit's turn. Returns the total HP lost.
    pub fn tick_turn_start(&mut self, unit: UnitId) -> CombatResult<i32> {
        let target = self.unit_mut(unit)?;
        if target.is_dead() {
            return Ok(0);
        }
        let ticks = target.statuses.tick();

        let mut total = 0;
        for tick in ticks {
            if tick.damage > 0 && self.unit(unit)?.is_alive() {
                trace!(unit = %unit, kind = %tick.kind, damage = tick.damage, "status tick");
                self.notify(Notification::StatusTicked {
                    unit,
                    kind: tick.kind,
                    damage: tick.damage,
                });
                self.apply_hp_loss(unit, tick.damage, None)?;
                total += tick.damage;
            }
            if tick.expired {
                self.notify(Notification::StatusExpired {
                    unit,
                    kind: tick.kind,
                });
            }
        }
        Ok(total)
    }

    // ========================================================================
    // Bosses
    // ========================================================================

    /// Binds a phase definition to a boss unit and enters phase 0, activating
    /// its abilities immediately.
    pub fn initialize_boss(
        &mut self,
        boss: UnitId,
        definition: BossDefinition,
    ) -> CombatResult<()> {
        self.unit(boss)?;
        if self.bosses.iter().any(|controller| controller.boss() == boss) {
            return Err(CombatError::BossAlreadyInitialized(boss));
        }

        let controller = BossController::new(boss, definition)?;
        debug!(boss = %boss, name = %controller.definition().name, phases = controller.definition().phases.len(), "boss initialized");
        self.bosses.push(controller);
        self.enter_phase(self.bosses.len() - 1, 0)
    }

    pub fn boss(&self, unit: UnitId) -> Option<&BossController> {
        self.bosses.iter().find(|controller| controller.boss() == unit)
    }

    /// Current phase index of a boss, or `None` if the unit has no controller.
    pub fn boss_phase(&self, unit: UnitId) -> Option<usize> {
        self.boss(unit).map(BossController::current_phase)
    }

    fn observe_boss(&mut self, unit: UnitId) -> CombatResult<()> {
        let Some(index) = self
            .bosses
            .iter()
            .position(|controller| controller.boss() == unit)
        else {
            return Ok(());
        };

        let boss = self.unit(unit)?;
        if boss.is_dead() {
            return Ok(());
        }
        let stats = *boss.stats();
        match self.bosses[index].observe_health(stats.current_hp, stats.max_hp) {
            Some(phase) => self.enter_phase(index, phase),
            None => Ok(()),
        }
    }

    fn enter_phase(&mut self, index: usize, phase: usize) -> CombatResult<()> {
        let controller = &self.bosses[index];
        let boss = controller.boss();
        let abilities = controller.definition().phases[phase].abilities.clone();

        self.notify(Notification::PhaseEntered { boss, phase });
        for ability in abilities {
            ability.activate(boss, self)?;
            self.unit_mut(boss)?.abilities.push(ability);
        }
        Ok(())
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub fn notifications(&self) -> &[Notification] {
        &self.outbox
    }

    /// Takes every notification recorded since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    fn notify(&mut self, notification: Notification) {
        if self.config.record_notifications {
            self.outbox.push(notification);
        }
    }

    fn health_changed(&mut self, unit: UnitId) -> CombatResult<()> {
        let stats = *self.unit(unit)?.stats();
        self.notify(Notification::HealthChanged {
            unit,
            current_hp: stats.current_hp,
            max_hp: stats.max_hp,
        });
        self.observe_boss(unit)
    }
}

impl Default for CombatSession {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}
