/// Combat configuration constants and tunable parameters.
///
/// One configuration is fixed for the lifetime of a [`CombatSession`](crate::CombatSession);
/// a fight replayed with the same configuration and the same call sequence produces
/// the same outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Seed for the session RNG (critical hits, on-hit procs).
    pub seed: u64,

    /// Armor constant `K` in `damage × K / (K + armor)`.
    pub mitigation_constant: i32,

    /// Whether the session records outward notifications in its outbox.
    ///
    /// Disabling this is useful for bulk simulations that only care about
    /// the final state.
    pub record_notifications: bool,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of concurrently active status effects per unit.
    pub const MAX_STATUS_EFFECTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0x5eed_a7e4a;
    pub const DEFAULT_MITIGATION_CONSTANT: i32 = 100;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            mitigation_constant: Self::DEFAULT_MITIGATION_CONSTANT,
            record_notifications: true,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
