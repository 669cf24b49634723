//! Error infrastructure for combat-core.
//!
//! The engine distinguishes three kinds of failure:
//!
//! - **Contract violations** (unknown unit handle, detaching a passive that is not
//!   attached, malformed definitions) are returned as [`CombatError`] to the
//!   immediate caller. The engine never catches or retries them.
//! - **Empty inputs** (attacking a dead unit, healing for zero) are not errors at
//!   all: the operation is a no-op with a zero/empty result.
//! - **Data-consistency warnings** (boss phases out of order) are logged through
//!   `tracing` and tolerated.

use crate::modifier::ModifierHandle;
use crate::passive::PassiveId;
use crate::stats::UnitId;

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input from the caller; reject without retry.
    ///
    /// Examples: unknown unit handle, malformed boss definition
    Validation,

    /// Unexpected engine state inconsistency.
    ///
    /// Examples: a passive left subscriptions behind after detaching
    /// These indicate bugs and should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an engine bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common classification trait for combat-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by who is at fault, not by impact
pub trait CombatFault: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors surfaced by [`CombatSession`](crate::CombatSession) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("unit {0} does not exist in this session")]
    UnknownUnit(UnitId),

    #[error("passive {passive} is not attached to unit {unit}")]
    PassiveNotAttached { unit: UnitId, passive: PassiveId },

    #[error("modifier {0} is not registered")]
    ModifierNotRegistered(ModifierHandle),

    #[error("unit '{name}' has invalid stats: {reason}")]
    InvalidStats { name: String, reason: &'static str },

    #[error("boss definition '{name}' is invalid: {reason}")]
    InvalidBossDefinition { name: String, reason: &'static str },

    #[error("unit {0} already has a boss controller")]
    BossAlreadyInitialized(UnitId),

    #[error("unknown {kind} identifier '{identifier}'")]
    UnknownIdentifier {
        kind: &'static str,
        identifier: String,
    },

    #[error("passive {passive} on unit {unit} left {remaining} registrations behind after detach")]
    DetachLeak {
        unit: UnitId,
        passive: PassiveId,
        remaining: usize,
    },
}

impl CombatFault for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownUnit(_)
            | Self::PassiveNotAttached { .. }
            | Self::ModifierNotRegistered(_)
            | Self::InvalidStats { .. }
            | Self::InvalidBossDefinition { .. }
            | Self::BossAlreadyInitialized(_)
            | Self::UnknownIdentifier { .. } => ErrorSeverity::Validation,
            Self::DetachLeak { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "UNKNOWN_UNIT",
            Self::PassiveNotAttached { .. } => "PASSIVE_NOT_ATTACHED",
            Self::ModifierNotRegistered(_) => "MODIFIER_NOT_REGISTERED",
            Self::InvalidStats { .. } => "INVALID_STATS",
            Self::InvalidBossDefinition { .. } => "INVALID_BOSS_DEFINITION",
            Self::BossAlreadyInitialized(_) => "BOSS_ALREADY_INITIALIZED",
            Self::UnknownIdentifier { .. } => "UNKNOWN_IDENTIFIER",
            Self::DetachLeak { .. } => "DETACH_LEAK",
        }
    }
}

/// Result alias for combat-core operations.
pub type CombatResult<T> = Result<T, CombatError>;
