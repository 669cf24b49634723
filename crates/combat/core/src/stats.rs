//! Unit identity and combat attributes.

use core::fmt;

/// Handle to a unit inside a [`CombatSession`](crate::CombatSession).
///
/// Handles are the only way engine components refer to units; they never hold
/// borrows of the unit itself. Units are never removed during a fight, so a
/// handle stays valid for the session's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags::bitflags! {
    /// Classification tags used by global modifier predicates.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct UnitTags: u8 {
        const PLAYER = 1 << 0;
        const ENEMY = 1 << 1;
        const BOSS = 1 << 2;
        const SUMMON = 1 << 3;
    }
}

/// Mutable combat attributes of a unit.
///
/// `current_hp` stays within `0..=max_hp`, except in the window between a lethal
/// hit and the resolution of the dying event, where it may be zero or negative
/// pending a possible revive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub max_hp: i32,
    pub current_hp: i32,
    pub attack_power: i32,
    pub armor: i32,
    pub speed: i32,
}

impl Stats {
    /// Creates stats at full health.
    pub fn new(max_hp: i32, attack_power: i32, armor: i32, speed: i32) -> Self {
        Self {
            max_hp,
            current_hp: max_hp,
            attack_power,
            armor,
            speed,
        }
    }

    /// Checks the invariants required at spawn time.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_hp <= 0 {
            return Err("max_hp must be positive");
        }
        if self.current_hp <= 0 || self.current_hp > self.max_hp {
            return Err("current_hp must be within 1..=max_hp");
        }
        if self.armor < 0 {
            return Err("armor must not be negative");
        }
        Ok(())
    }

    /// Current HP as an integer percentage of maximum (floored).
    pub fn health_percent(&self) -> u32 {
        if self.max_hp <= 0 {
            return 0;
        }
        (self.current_hp.max(0) as i64 * 100 / self.max_hp as i64) as u32
    }

    /// Returns true when current HP is at or below `percent` of maximum.
    ///
    /// Compared by cross-multiplication, so 59.5% counts as below a 60%
    /// threshold even though [`health_percent`](Self::health_percent) floors.
    pub fn is_at_or_below_percent(&self, percent: u32) -> bool {
        self.current_hp as i64 * 100 <= percent as i64 * self.max_hp as i64
    }

    pub fn is_full(&self) -> bool {
        self.current_hp >= self.max_hp
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new(100, 10, 0, 10)
    }
}
