//! Attack resolution.
//!
//! A strike runs in a fixed order:
//!
//! 1. `BeforeAttack` on the attacker
//! 2. armor mitigation, then the modifier pipeline
//! 3. HP loss on the target (which may raise `Dying` and `Died`)
//! 4. `Hit` on the attacker, `Damaged` on the target if it is still alive
//! 5. `AfterAttack` on the attacker
//!
//! Follow-up attacks requested during the primary strike are queued and
//! resolved afterwards. While the queue drains, further follow-up requests are
//! dropped, so extra attacks cannot chain.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::CombatSession;
use crate::damage::mitigate;
use crate::error::CombatResult;
use crate::event::{CombatEvent, DyingEvent, HitEvent, Reaction};
use crate::modifier::DamageContext;
use crate::notification::Notification;
use crate::stats::UnitId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QueuedAttack {
    source: UnitId,
    target: UnitId,
    base_damage: i32,
}

/// FIFO of pending follow-up attacks plus the re-entrancy flag.
#[derive(Clone, Debug, Default)]
pub(crate) struct ExtraAttackQueue {
    pending: VecDeque<QueuedAttack>,
    draining: bool,
}

impl CombatSession {
    /// Resolves one attack of `base_damage` from `source` against `target`,
    /// then any follow-up attacks it triggered.
    ///
    /// Returns the damage dealt by the primary strike. Attacks by or against a
    /// dead unit do nothing and return 0.
    pub fn resolve_attack(
        &mut self,
        source: UnitId,
        target: UnitId,
        base_damage: i32,
    ) -> CombatResult<u32> {
        let damage = match self.strike(source, target, base_damage, false) {
            Ok(damage) => damage,
            Err(err) => {
                self.extra_attacks.pending.clear();
                return Err(err);
            }
        };
        if !self.extra_attacks.draining {
            self.drain_extra_attacks()?;
        }
        Ok(damage)
    }

    /// Number of follow-up attacks waiting to be resolved.
    pub fn pending_extra_attacks(&self) -> usize {
        self.extra_attacks.pending.len()
    }

    fn drain_extra_attacks(&mut self) -> CombatResult<()> {
        if self.extra_attacks.pending.is_empty() {
            return Ok(());
        }

        self.extra_attacks.draining = true;
        let result = self.drain_pending();
        self.extra_attacks.draining = false;
        if result.is_err() {
            self.extra_attacks.pending.clear();
        }
        result
    }

    fn drain_pending(&mut self) -> CombatResult<()> {
        while let Some(attack) = self.extra_attacks.pending.pop_front() {
            trace!(source = %attack.source, target = %attack.target, "resolving follow-up attack");
            self.strike(attack.source, attack.target, attack.base_damage, true)?;
        }
        Ok(())
    }

    fn strike(
        &mut self,
        source: UnitId,
        target: UnitId,
        base_damage: i32,
        follow_up: bool,
    ) -> CombatResult<u32> {
        if !self.unit(source)?.is_alive() || !self.unit(target)?.is_alive() {
            trace!(source = %source, target = %target, "attack skipped; participant is dead");
            return Ok(0);
        }

        self.dispatch(
            source,
            CombatEvent::BeforeAttack {
                attacker: source,
                target,
                follow_up,
            },
        )?;

        let source_tags = self.unit(source)?.tags();
        let defender = self.unit(target)?;
        if defender.is_dead() {
            return Ok(0);
        }
        let stats = *defender.stats();

        let mitigated = mitigate(base_damage, stats.armor, self.config.mitigation_constant);
        let ctx = DamageContext::new(source, target, mitigated)
            .with_source_tags(source_tags)
            .with_target_health(stats.current_hp, stats.max_hp);
        let ctx = self.modifiers.process(ctx, &mut self.rng);
        let damage = ctx.final_value.max(0);

        debug!(
            source = %source,
            target = %target,
            base_damage,
            mitigated,
            damage,
            critical = ctx.is_critical,
            follow_up,
            "attack resolved"
        );

        self.apply_hp_loss(target, damage, Some(source))?;
        self.notify(Notification::AttackResolved {
            source,
            target,
            damage: damage as u32,
            critical: ctx.is_critical,
            follow_up,
        });

        let hit = HitEvent {
            attacker: source,
            target,
            base_damage,
            damage,
            critical: ctx.is_critical,
            follow_up,
        };
        self.dispatch(source, CombatEvent::Hit(hit))?;
        if self.unit(target)?.is_alive() {
            self.dispatch(target, CombatEvent::Damaged(hit))?;
        }
        self.dispatch(
            source,
            CombatEvent::AfterAttack {
                attacker: source,
                target,
                follow_up,
            },
        )?;

        Ok(damage as u32)
    }

    /// Removes HP from a living unit, running the dying/died sequence if the
    /// loss is lethal. Returns true if the unit died.
    pub(super) fn apply_hp_loss(
        &mut self,
        unit: UnitId,
        amount: i32,
        killer: Option<UnitId>,
    ) -> CombatResult<bool> {
        let victim = self.unit_mut(unit)?;
        if amount <= 0 || victim.is_dead() {
            return Ok(false);
        }

        victim.stats.current_hp -= amount;
        let (hp, max_hp) = (victim.stats.current_hp, victim.stats.max_hp);
        if hp > 0 {
            self.health_changed(unit)?;
            return Ok(false);
        }

        let event = self.dispatch(
            unit,
            CombatEvent::Dying(DyingEvent::new(unit, killer, hp, max_hp)),
        )?;
        if let CombatEvent::Dying(dying) = event
            && dying.cancelled
        {
            let revive_hp = dying.revive_hp.clamp(1, max_hp);
            self.unit_mut(unit)?.stats.current_hp = revive_hp;
            debug!(unit = %unit, revive_hp, "death prevented");
            self.notify(Notification::DeathPrevented { unit, revive_hp });
            self.health_changed(unit)?;
            return Ok(false);
        }

        let victim = self.unit_mut(unit)?;
        victim.stats.current_hp = 0;
        victim.alive = false;
        victim.statuses.clear();
        debug!(unit = %unit, killer = ?killer, "unit died");
        self.health_changed(unit)?;
        self.notify(Notification::UnitDied { unit, killer });
        self.dispatch(unit, CombatEvent::Died { unit, killer })?;
        Ok(true)
    }

    /// Delivers an event to `owner`'s listeners in priority order and applies
    /// the reactions each handler requests before the next handler runs.
    ///
    /// Returns the event as left by the last handler.
    fn dispatch(&mut self, owner: UnitId, mut event: CombatEvent) -> CombatResult<CombatEvent> {
        let listeners = self.events.listeners(owner, event.kind());
        let mut reactions = Vec::new();

        for passive_id in listeners {
            let Some(unit) = self.units.get_mut(owner.0 as usize) else {
                break;
            };
            // Detached by an earlier handler's reaction.
            let Some(passive) = unit.passive_mut(passive_id) else {
                continue;
            };
            passive
                .behavior_mut()
                .on_event(owner, &mut event, &mut self.rng, &mut reactions);

            for reaction in reactions.drain(..) {
                self.apply_reaction(reaction)?;
            }
        }
        Ok(event)
    }

    fn apply_reaction(&mut self, reaction: Reaction) -> CombatResult<()> {
        match reaction {
            Reaction::Heal { unit, amount } => {
                self.heal(unit, amount)?;
            }
            Reaction::DirectDamage {
                source,
                target,
                amount,
            } => {
                self.apply_hp_loss(target, amount, Some(source))?;
            }
            Reaction::ApplyStatus { unit, effect } => {
                self.apply_status(unit, effect)?;
            }
            Reaction::QueueAttack {
                source,
                target,
                base_damage,
            } => {
                if self.extra_attacks.draining {
                    trace!(source = %source, target = %target, "follow-up suppressed while draining");
                } else {
                    self.extra_attacks.pending.push_back(QueuedAttack {
                        source,
                        target,
                        base_damage,
                    });
                    self.notify(Notification::ExtraAttackQueued { source, target });
                }
            }
        }
        Ok(())
    }
}
