//! Ordered modifier registry and the damage pipeline that runs it.

use core::fmt;

use tracing::trace;

use super::{DamageContext, Modifier};
use crate::rng::CombatRng;

/// Handle returned by [`ModifierPipeline::register`], used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierHandle(pub u64);

impl fmt::Display for ModifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modifier#{}", self.0)
    }
}

#[derive(Clone, Debug)]
struct Entry {
    handle: ModifierHandle,
    modifier: Modifier,
}

/// Per-fight modifier registry.
///
/// Entries are kept sorted by priority; registration order breaks ties, so the
/// application order is fully determined by the registration sequence.
#[derive(Clone, Debug, Default)]
pub struct ModifierPipeline {
    entries: Vec<Entry>,
    next_handle: u64,
}

impl ModifierPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a modifier and returns the handle that unregisters it.
    pub fn register(&mut self, modifier: Modifier) -> ModifierHandle {
        let handle = ModifierHandle(self.next_handle);
        self.next_handle += 1;

        // Insert after every entry with priority <= ours (stable).
        let index = self
            .entries
            .partition_point(|entry| entry.modifier.priority <= modifier.priority);
        trace!(
            %handle,
            kind = modifier.kind.name(),
            priority = modifier.priority,
            "modifier registered"
        );
        self.entries.insert(index, Entry { handle, modifier });
        handle
    }

    /// Removes a modifier. Returns `None` if the handle is not registered.
    pub fn unregister(&mut self, handle: ModifierHandle) -> Option<Modifier> {
        let index = self.entries.iter().position(|entry| entry.handle == handle)?;
        trace!(%handle, "modifier unregistered");
        Some(self.entries.remove(index).modifier)
    }

    /// Runs every modifier whose scope matches `ctx.source`, in ascending
    /// priority order, exactly once each.
    pub fn process(&mut self, mut ctx: DamageContext, rng: &mut CombatRng) -> DamageContext {
        for entry in self.entries.iter_mut() {
            if !entry.modifier.scope.matches(&ctx) {
                continue;
            }
            let before = ctx.final_value;
            entry.modifier.modify(&mut ctx, rng);
            trace!(
                handle = %entry.handle,
                kind = entry.modifier.kind.name(),
                priority = entry.modifier.priority,
                before,
                after = ctx.final_value,
                "modifier applied"
            );
        }
        ctx
    }

    /// Registered modifiers in application order.
    pub fn iter(&self) -> impl Iterator<Item = (ModifierHandle, &Modifier)> {
        self.entries.iter().map(|entry| (entry.handle, &entry.modifier))
    }

    pub fn get(&self, handle: ModifierHandle) -> Option<&Modifier> {
        self.entries
            .iter()
            .find(|entry| entry.handle == handle)
            .map(|entry| &entry.modifier)
    }

    pub fn contains(&self, handle: ModifierHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
