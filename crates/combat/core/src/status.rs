//! Status effect engine: damage-over-time conditions on a unit.
//!
//! Effects are independent of each other and tick once per turn start:
//!
//! 1. Tick damage is the stack count for Poison/Bleed, or the stored damage for Burn.
//! 2. The damage is applied straight to HP, bypassing armor and the modifier pipeline.
//! 3. Duration drops by one.
//! 4. Effects that reach zero duration still deal that final tick, then expire and
//!    are removed at the end of the tick.
//!
//! Re-applying an effect of an active kind merges into it instead of adding a
//! second instance (see [`StatusEffect::merge`]).

use arrayvec::ArrayVec;

use crate::config::CombatConfig;

/// Types of status effects.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    /// Stacking; ticks for its stack count.
    Poison,
    /// Non-stacking; refreshes duration and keeps the stronger damage.
    Burn,
    /// Stacking; ticks for its stack count.
    Bleed,
}

impl StatusKind {
    pub const fn stacks(&self) -> bool {
        matches!(self, Self::Poison | Self::Bleed)
    }
}

/// A single active status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub stacks: u32,
    /// Turns remaining.
    pub duration: u32,
    /// Duration a refresh restores (set by the application that created or
    /// last overwrote the effect).
    pub base_duration: u32,
    pub base_damage: i32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, stacks: u32, duration: u32, base_damage: i32) -> Self {
        Self {
            kind,
            stacks,
            duration,
            base_duration: duration,
            base_damage,
        }
    }

    pub fn poison(stacks: u32, duration: u32) -> Self {
        Self::new(StatusKind::Poison, stacks, duration, 0)
    }

    pub fn bleed(stacks: u32, duration: u32) -> Self {
        Self::new(StatusKind::Bleed, stacks, duration, 0)
    }

    pub fn burn(damage: i32, duration: u32) -> Self {
        Self::new(StatusKind::Burn, 1, duration, damage)
    }

    /// Damage dealt by one tick.
    pub fn tick_damage(&self) -> i32 {
        match self.kind {
            StatusKind::Poison | StatusKind::Bleed => self.stacks.min(i32::MAX as u32) as i32,
            StatusKind::Burn => self.base_damage,
        }
    }

    /// Merges a re-application of the same kind into this effect.
    ///
    /// - Burn: duration resets to the original base duration; the higher damage is kept.
    /// - Poison/Bleed: stacks accumulate; the newest application's duration and
    ///   base damage replace the old ones.
    pub fn merge(&mut self, incoming: &StatusEffect) {
        debug_assert_eq!(self.kind, incoming.kind);
        if self.kind.stacks() {
            self.stacks = self.stacks.saturating_add(incoming.stacks);
            self.duration = incoming.duration;
            self.base_duration = incoming.duration;
            self.base_damage = incoming.base_damage;
        } else {
            self.duration = self.base_duration;
            self.base_damage = self.base_damage.max(incoming.base_damage);
        }
    }
}

/// What happened to an application request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    /// A new effect instance was created.
    Added,
    /// Merged into an active effect of the same kind.
    Merged,
    /// Zero duration, zero stacks, or a dead target: nothing to apply.
    Ignored,
    /// The unit already carries the maximum number of distinct effects.
    Rejected,
}

/// Damage produced by one effect during a turn-start tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusTick {
    pub kind: StatusKind,
    pub damage: i32,
    /// The effect reached zero duration on this tick and was removed.
    pub expired: bool,
}

/// Active status effects on a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Applies an effect, merging into an active effect of the same kind.
    pub fn apply(&mut self, effect: StatusEffect) -> ApplyOutcome {
        if effect.duration == 0 || effect.stacks == 0 {
            return ApplyOutcome::Ignored;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.merge(&effect);
            return ApplyOutcome::Merged;
        }

        match self.effects.try_push(effect) {
            Ok(()) => ApplyOutcome::Added,
            Err(_) => ApplyOutcome::Rejected,
        }
    }

    /// Ticks every effect once and removes the ones that expired.
    pub fn tick(&mut self) -> Vec<StatusTick> {
        let ticks = self
            .effects
            .iter_mut()
            .map(|effect| {
                let damage = effect.tick_damage();
                effect.duration = effect.duration.saturating_sub(1);
                StatusTick {
                    kind: effect.kind,
                    damage,
                    expired: effect.duration == 0,
                }
            })
            .collect();

        self.effects.retain(|e| e.duration > 0);
        ticks
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Removes an effect immediately, without an expiry tick.
    pub fn remove(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    /// Removes every effect, returning how many were active.
    pub fn clear(&mut self) -> usize {
        let count = self.effects.len();
        self.effects.clear();
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
