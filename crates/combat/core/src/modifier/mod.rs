//! Damage modifiers: priority-ordered transformations of a single damage computation.
//!
//! Modifiers are applied by the [`ModifierPipeline`] in ascending priority order.
//! Priority bands are a convention, not enforced:
//!
//! ```text
//!   0 –  99   base-value adjustments (flat bonuses)
//! 100 – 199   standard percentage multipliers
//! 200 – 299   late multipliers (critical, execute, combo)
//! 300 +       post-processing caps and floors
//! ```
//!
//! Every multiplicative step rounds up (see [`crate::damage`]).

mod pipeline;

pub use pipeline::{ModifierHandle, ModifierPipeline};

use crate::damage::scale_percent_ceil;
use crate::rng::CombatRng;
use crate::stats::{UnitId, UnitTags};

/// Ephemeral state of one damage computation.
///
/// Created by the attack resolver after mitigation, threaded through the
/// pipeline, and discarded once the final value is applied. Units are referred
/// to by handle; the target's health is captured at creation so execute-style
/// modifiers can read it without touching the unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DamageContext {
    pub source: UnitId,
    pub target: UnitId,
    /// Tags of the source, for global modifier predicates.
    pub source_tags: UnitTags,
    pub target_hp: i32,
    pub target_max_hp: i32,
    /// Value entering the pipeline (already mitigated).
    pub base_value: i32,
    /// Running value, mutated by each modifier.
    pub final_value: i32,
    pub is_critical: bool,
}

impl DamageContext {
    pub fn new(source: UnitId, target: UnitId, base_value: i32) -> Self {
        Self {
            source,
            target,
            source_tags: UnitTags::empty(),
            target_hp: 1,
            target_max_hp: 1,
            base_value,
            final_value: base_value,
            is_critical: false,
        }
    }

    pub fn with_source_tags(mut self, tags: UnitTags) -> Self {
        self.source_tags = tags;
        self
    }

    pub fn with_target_health(mut self, current: i32, max: i32) -> Self {
        self.target_hp = current;
        self.target_max_hp = max;
        self
    }

    /// Returns true when the target is at or below `percent` of its maximum HP.
    pub fn target_at_or_below_percent(&self, percent: u32) -> bool {
        self.target_hp as i64 * 100 <= percent as i64 * self.target_max_hp as i64
    }
}

/// Which damage sources a modifier applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierScope {
    /// Bound to a single source unit.
    Unit(UnitId),
    /// Applies to every source matching the filter.
    Global(SourceFilter),
}

/// Predicate over damage sources for global modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceFilter {
    Any,
    /// Matches sources carrying any of the given tags.
    Tags(UnitTags),
}

impl ModifierScope {
    pub fn matches(&self, ctx: &DamageContext) -> bool {
        match self {
            Self::Unit(unit) => *unit == ctx.source,
            Self::Global(SourceFilter::Any) => true,
            Self::Global(SourceFilter::Tags(tags)) => ctx.source_tags.intersects(*tags),
        }
    }
}

/// The transformation a modifier performs.
///
/// Percentages are integer percents of the running value: `150` means ×1.5.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    /// Adds a flat amount.
    Flat { amount: i32 },

    /// Multiplies by `percent / 100`.
    Percentage { percent: u32 },

    /// Rolls a critical hit; on success marks the context critical and multiplies.
    /// A context that is already critical is not rolled again.
    Critical {
        chance_percent: u32,
        multiplier_percent: u32,
    },

    /// Multiplies when the target is at or below `threshold_percent` HP.
    Execute {
        threshold_percent: u32,
        multiplier_percent: u32,
    },

    /// Multiplies every `every`-th processed hit. Tracks its own hit counter.
    Combo {
        every: u32,
        multiplier_percent: u32,
        #[cfg_attr(feature = "serde", serde(default, skip_serializing))]
        hits: u32,
    },

    /// Caps the running value.
    Cap { max: i32 },

    /// Raises the running value to at least `min`.
    Floor { min: i32 },
}

impl ModifierKind {
    /// Default priority inside the kind's band.
    pub const fn default_priority(&self) -> i32 {
        match self {
            Self::Flat { .. } => 10,
            Self::Percentage { .. } => 100,
            Self::Critical { .. } => 200,
            Self::Execute { .. } => 210,
            Self::Combo { .. } => 220,
            Self::Cap { .. } => 300,
            Self::Floor { .. } => 310,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Flat { .. } => "flat",
            Self::Percentage { .. } => "percentage",
            Self::Critical { .. } => "critical",
            Self::Execute { .. } => "execute",
            Self::Combo { .. } => "combo",
            Self::Cap { .. } => "cap",
            Self::Floor { .. } => "floor",
        }
    }
}

/// A registered damage transformation with a priority and a scope.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub kind: ModifierKind,
    /// Lower runs earlier; ties keep registration order.
    pub priority: i32,
    pub scope: ModifierScope,
}

impl Modifier {
    /// Creates a modifier with its kind's default priority and a global
    /// (any source) scope.
    pub fn new(kind: ModifierKind) -> Self {
        Self {
            priority: kind.default_priority(),
            kind,
            scope: ModifierScope::Global(SourceFilter::Any),
        }
    }

    pub fn flat(amount: i32) -> Self {
        Self::new(ModifierKind::Flat { amount })
    }

    pub fn percentage(percent: u32) -> Self {
        Self::new(ModifierKind::Percentage { percent })
    }

    pub fn critical(chance_percent: u32, multiplier_percent: u32) -> Self {
        Self::new(ModifierKind::Critical {
            chance_percent,
            multiplier_percent,
        })
    }

    pub fn execute(threshold_percent: u32, multiplier_percent: u32) -> Self {
        Self::new(ModifierKind::Execute {
            threshold_percent,
            multiplier_percent,
        })
    }

    pub fn combo(every: u32, multiplier_percent: u32) -> Self {
        Self::new(ModifierKind::Combo {
            every: every.max(1),
            multiplier_percent,
            hits: 0,
        })
    }

    pub fn cap(max: i32) -> Self {
        Self::new(ModifierKind::Cap { max })
    }

    pub fn floor(min: i32) -> Self {
        Self::new(ModifierKind::Floor { min })
    }

    /// Overrides the priority (builder pattern).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Binds the modifier to a single source unit (builder pattern).
    pub fn for_unit(mut self, unit: UnitId) -> Self {
        self.scope = ModifierScope::Unit(unit);
        self
    }

    /// Applies the modifier to every source matching `filter` (builder pattern).
    pub fn global(mut self, filter: SourceFilter) -> Self {
        self.scope = ModifierScope::Global(filter);
        self
    }

    /// Applies this modifier to the context in place.
    pub fn modify(&mut self, ctx: &mut DamageContext, rng: &mut CombatRng) {
        match &mut self.kind {
            ModifierKind::Flat { amount } => {
                ctx.final_value = ctx.final_value.saturating_add(*amount);
            }
            ModifierKind::Percentage { percent } => {
                ctx.final_value = scale_percent_ceil(ctx.final_value, *percent);
            }
            ModifierKind::Critical {
                chance_percent,
                multiplier_percent,
            } => {
                if !ctx.is_critical && rng.roll_percent(*chance_percent) {
                    ctx.is_critical = true;
                    ctx.final_value = scale_percent_ceil(ctx.final_value, *multiplier_percent);
                }
            }
            ModifierKind::Execute {
                threshold_percent,
                multiplier_percent,
            } => {
                if ctx.target_at_or_below_percent(*threshold_percent) {
                    ctx.final_value = scale_percent_ceil(ctx.final_value, *multiplier_percent);
                }
            }
            ModifierKind::Combo {
                every,
                multiplier_percent,
                hits,
            } => {
                *hits += 1;
                if *hits % (*every).max(1) == 0 {
                    ctx.final_value = scale_percent_ceil(ctx.final_value, *multiplier_percent);
                }
            }
            ModifierKind::Cap { max } => {
                ctx.final_value = ctx.final_value.min(*max);
            }
            ModifierKind::Floor { min } => {
                ctx.final_value = ctx.final_value.max(*min);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(value: i32) -> DamageContext {
        DamageContext::new(UnitId(0), UnitId(1), value).with_target_health(100, 100)
    }

    #[test]
    fn default_priorities_fall_in_bands() {
        assert!((0..100).contains(&Modifier::flat(1).priority));
        assert!((100..200).contains(&Modifier::percentage(150).priority));
        assert!((200..300).contains(&Modifier::critical(10, 200).priority));
        assert!((200..300).contains(&Modifier::execute(30, 150).priority));
        assert!(Modifier::cap(10).priority >= 300);
    }

    #[test]
    fn execute_only_below_threshold() {
        let mut rng = CombatRng::new(1);
        let mut modifier = Modifier::execute(30, 200);

        let mut healthy = ctx(10);
        modifier.modify(&mut healthy, &mut rng);
        assert_eq!(healthy.final_value, 10);

        let mut wounded = ctx(10).with_target_health(30, 100);
        modifier.modify(&mut wounded, &mut rng);
        assert_eq!(wounded.final_value, 20);
    }

    #[test]
    fn guaranteed_critical_marks_context() {
        let mut rng = CombatRng::new(1);
        let mut modifier = Modifier::critical(100, 150);
        let mut context = ctx(9);
        modifier.modify(&mut context, &mut rng);
        assert!(context.is_critical);
        assert_eq!(context.final_value, 14); // 13.5 → 14
    }

    #[test]
    fn combo_counts_its_own_hits() {
        let mut rng = CombatRng::new(1);
        let mut modifier = Modifier::combo(3, 200);
        let values: Vec<i32> = (0..6)
            .map(|_| {
                let mut context = ctx(10);
                modifier.modify(&mut context, &mut rng);
                context.final_value
            })
            .collect();
        assert_eq!(values, vec![10, 10, 20, 10, 10, 20]);
    }

    #[test]
    fn scope_matching() {
        let context = ctx(10).with_source_tags(UnitTags::BOSS);
        assert!(ModifierScope::Unit(UnitId(0)).matches(&context));
        assert!(!ModifierScope::Unit(UnitId(5)).matches(&context));
        assert!(ModifierScope::Global(SourceFilter::Any).matches(&context));
        assert!(
            ModifierScope::Global(SourceFilter::Tags(UnitTags::BOSS | UnitTags::ENEMY))
                .matches(&context)
        );
        assert!(!ModifierScope::Global(SourceFilter::Tags(UnitTags::PLAYER)).matches(&context));
    }
}
