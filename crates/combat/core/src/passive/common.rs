//! Built-in passive implementations.

use tracing::debug;

use super::{PassiveBehavior, PassiveContext};
use crate::damage::{percent_of_floor, scale_percent_ceil};
use crate::event::{CombatEvent, EventKind, Reaction};
use crate::modifier::Modifier;
use crate::rng::CombatRng;
use crate::stats::UnitId;
use crate::status::StatusEffect;

/// Death shield: cancels the owner's first death and revives it.
///
/// Runs at priority 0 so it observes the dying event before any other handler.
/// Single-use: once triggered, later dying events pass through untouched. An
/// event already cancelled by an earlier handler is left alone and does not
/// consume the shield.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathShield {
    /// Percent of maximum HP restored on revive (at least 1 HP).
    pub revive_percent: u32,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing))]
    triggered: bool,
}

impl DeathShield {
    pub fn new(revive_percent: u32) -> Self {
        Self {
            revive_percent,
            triggered: false,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }
}

impl PassiveBehavior for DeathShield {
    fn name(&self) -> &'static str {
        "death_shield"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn attach(&mut self, cx: &mut PassiveContext<'_>) {
        cx.subscribe(EventKind::Dying);
    }

    fn on_event(
        &mut self,
        owner: UnitId,
        event: &mut CombatEvent,
        _rng: &mut CombatRng,
        _reactions: &mut Vec<Reaction>,
    ) {
        let CombatEvent::Dying(dying) = event else {
            return;
        };
        if dying.unit != owner || self.triggered || dying.cancelled {
            return;
        }

        let revive_hp = percent_of_floor(dying.max_hp, self.revive_percent).max(1);
        dying.cancel(revive_hp);
        self.triggered = true;
        debug!(unit = %owner, revive_hp, "death shield consumed");
    }
}

/// Heals the owner for a share of the damage it deals.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lifesteal {
    pub percent: u32,
}

impl Lifesteal {
    pub fn new(percent: u32) -> Self {
        Self { percent }
    }
}

impl PassiveBehavior for Lifesteal {
    fn name(&self) -> &'static str {
        "lifesteal"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn attach(&mut self, cx: &mut PassiveContext<'_>) {
        cx.subscribe(EventKind::Hit);
    }

    fn on_event(
        &mut self,
        owner: UnitId,
        event: &mut CombatEvent,
        _rng: &mut CombatRng,
        reactions: &mut Vec<Reaction>,
    ) {
        let CombatEvent::Hit(hit) = event else {
            return;
        };
        let amount = percent_of_floor(hit.damage, self.percent);
        if amount > 0 {
            reactions.push(Reaction::Heal {
                unit: owner,
                amount,
            });
        }
    }
}

/// Reflects a share of incoming hit damage back at the attacker.
///
/// Reflected damage is direct HP loss: it skips mitigation and the modifier
/// pipeline and does not raise hit events, so two thorned units cannot bounce
/// damage back and forth.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thorns {
    pub reflect_percent: u32,
}

impl Thorns {
    pub fn new(reflect_percent: u32) -> Self {
        Self { reflect_percent }
    }
}

impl PassiveBehavior for Thorns {
    fn name(&self) -> &'static str {
        "thorns"
    }

    fn priority(&self) -> i32 {
        60
    }

    fn attach(&mut self, cx: &mut PassiveContext<'_>) {
        cx.subscribe(EventKind::Damaged);
    }

    fn on_event(
        &mut self,
        owner: UnitId,
        event: &mut CombatEvent,
        _rng: &mut CombatRng,
        reactions: &mut Vec<Reaction>,
    ) {
        let CombatEvent::Damaged(hit) = event else {
            return;
        };
        if hit.attacker == owner || hit.damage <= 0 {
            return;
        }
        reactions.push(Reaction::DirectDamage {
            source: owner,
            target: hit.attacker,
            amount: scale_percent_ceil(hit.damage, self.reflect_percent),
        });
    }
}

/// Chance on hit to queue a follow-up attack with the same base damage.
///
/// The session drains queued attacks after the triggering attack's events and
/// ignores new requests while draining, so a follow-up never chains into
/// another one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoubleStrike {
    pub chance_percent: u32,
}

impl DoubleStrike {
    pub fn new(chance_percent: u32) -> Self {
        Self { chance_percent }
    }
}

impl PassiveBehavior for DoubleStrike {
    fn name(&self) -> &'static str {
        "double_strike"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn attach(&mut self, cx: &mut PassiveContext<'_>) {
        cx.subscribe(EventKind::Hit);
    }

    fn on_event(
        &mut self,
        owner: UnitId,
        event: &mut CombatEvent,
        rng: &mut CombatRng,
        reactions: &mut Vec<Reaction>,
    ) {
        let CombatEvent::Hit(hit) = event else {
            return;
        };
        if rng.roll_percent(self.chance_percent) {
            reactions.push(Reaction::QueueAttack {
                source: owner,
                target: hit.target,
                base_damage: hit.base_damage,
            });
        }
    }
}

/// Chance on hit to apply a status effect to the target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusOnHit {
    pub effect: StatusEffect,
    pub chance_percent: u32,
}

impl StatusOnHit {
    pub fn new(effect: StatusEffect, chance_percent: u32) -> Self {
        Self {
            effect,
            chance_percent,
        }
    }
}

impl PassiveBehavior for StatusOnHit {
    fn name(&self) -> &'static str {
        match self.effect.kind {
            crate::status::StatusKind::Poison => "venomous_strikes",
            crate::status::StatusKind::Burn => "searing_strikes",
            crate::status::StatusKind::Bleed => "serrated_strikes",
        }
    }

    fn priority(&self) -> i32 {
        120
    }

    fn attach(&mut self, cx: &mut PassiveContext<'_>) {
        cx.subscribe(EventKind::Hit);
    }

    fn on_event(
        &mut self,
        _owner: UnitId,
        event: &mut CombatEvent,
        rng: &mut CombatRng,
        reactions: &mut Vec<Reaction>,
    ) {
        let CombatEvent::Hit(hit) = event else {
            return;
        };
        if rng.roll_percent(self.chance_percent) {
            reactions.push(Reaction::ApplyStatus {
                unit: hit.target,
                effect: self.effect,
            });
        }
    }
}

/// Bonus damage against low-health targets, as an execute modifier scoped to
/// the owner for as long as the passive is attached.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Executioner {
    pub threshold_percent: u32,
    pub multiplier_percent: u32,
}

impl Executioner {
    pub fn new(threshold_percent: u32, multiplier_percent: u32) -> Self {
        Self {
            threshold_percent,
            multiplier_percent,
        }
    }
}

impl PassiveBehavior for Executioner {
    fn name(&self) -> &'static str {
        "executioner"
    }

    fn priority(&self) -> i32 {
        150
    }

    fn attach(&mut self, cx: &mut PassiveContext<'_>) {
        let owner = cx.owner();
        cx.register_modifier(
            Modifier::execute(self.threshold_percent, self.multiplier_percent).for_unit(owner),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DyingEvent, HitEvent};

    const OWNER: UnitId = UnitId(0);
    const OTHER: UnitId = UnitId(1);

    fn hit(attacker: UnitId, target: UnitId, damage: i32) -> HitEvent {
        HitEvent {
            attacker,
            target,
            base_damage: damage,
            damage,
            critical: false,
            follow_up: false,
        }
    }

    #[test]
    fn death_shield_is_single_use() {
        let mut shield = DeathShield::new(30);
        let mut rng = CombatRng::new(0);
        let mut reactions = Vec::new();

        let mut first = CombatEvent::Dying(DyingEvent::new(OWNER, Some(OTHER), -5, 100));
        shield.on_event(OWNER, &mut first, &mut rng, &mut reactions);
        let CombatEvent::Dying(first) = first else {
            unreachable!()
        };
        assert!(first.cancelled);
        assert_eq!(first.revive_hp, 30);

        let mut second = CombatEvent::Dying(DyingEvent::new(OWNER, Some(OTHER), -5, 100));
        shield.on_event(OWNER, &mut second, &mut rng, &mut reactions);
        let CombatEvent::Dying(second) = second else {
            unreachable!()
        };
        assert!(!second.cancelled);
    }

    #[test]
    fn death_shield_respects_earlier_cancellation() {
        let mut shield = DeathShield::new(30);
        let mut rng = CombatRng::new(0);
        let mut reactions = Vec::new();

        let mut dying = DyingEvent::new(OWNER, None, 0, 100);
        dying.cancel(77);
        let mut event = CombatEvent::Dying(dying);
        shield.on_event(OWNER, &mut event, &mut rng, &mut reactions);

        let CombatEvent::Dying(dying) = event else {
            unreachable!()
        };
        assert_eq!(dying.revive_hp, 77);
        assert!(!shield.is_triggered());
    }

    #[test]
    fn lifesteal_heals_owner_for_share_of_damage() {
        let mut lifesteal = Lifesteal::new(20);
        let mut rng = CombatRng::new(0);
        let mut reactions = Vec::new();
        lifesteal.on_event(
            OWNER,
            &mut CombatEvent::Hit(hit(OWNER, OTHER, 23)),
            &mut rng,
            &mut reactions,
        );
        assert_eq!(
            reactions,
            vec![Reaction::Heal {
                unit: OWNER,
                amount: 4
            }]
        );
    }

    #[test]
    fn thorns_reflect_rounds_up() {
        let mut thorns = Thorns::new(25);
        let mut rng = CombatRng::new(0);
        let mut reactions = Vec::new();
        thorns.on_event(
            OWNER,
            &mut CombatEvent::Damaged(hit(OTHER, OWNER, 10)),
            &mut rng,
            &mut reactions,
        );
        assert_eq!(
            reactions,
            vec![Reaction::DirectDamage {
                source: OWNER,
                target: OTHER,
                amount: 3
            }]
        );
    }

    #[test]
    fn guaranteed_double_strike_queues_same_base() {
        let mut strike = DoubleStrike::new(100);
        let mut rng = CombatRng::new(0);
        let mut reactions = Vec::new();
        let mut event = CombatEvent::Hit(HitEvent {
            base_damage: 12,
            ..hit(OWNER, OTHER, 7)
        });
        strike.on_event(OWNER, &mut event, &mut rng, &mut reactions);
        assert_eq!(
            reactions,
            vec![Reaction::QueueAttack {
                source: OWNER,
                target: OTHER,
                base_damage: 12
            }]
        );
    }
}
