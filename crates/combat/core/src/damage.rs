//! Damage arithmetic shared by the attack resolver and the modifier pipeline.
//!
//! All scaling rounds **up** after each multiplicative step so that large
//! mitigation values never round a landed hit down to zero.
//!
//! # Formula
//!
//! ```text
//! mitigated = ceil(base × K / (K + armor))      K = mitigation constant (100)
//! scaled    = ceil(value × percent / 100)       percent = 150 means ×1.5
//! ```

/// Integer division rounding toward positive infinity.
#[inline]
fn div_ceil(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator.div_euclid(denominator);
    if numerator.rem_euclid(denominator) != 0 {
        quotient + 1
    } else {
        quotient
    }
}

/// Clamps a 64-bit intermediate back into the `i32` damage domain.
#[inline]
fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Applies armor mitigation to a base damage value.
///
/// Negative armor is treated as zero; a non-positive constant disables mitigation.
pub fn mitigate(base: i32, armor: i32, constant: i32) -> i32 {
    if base <= 0 || constant <= 0 {
        return base.max(0);
    }
    let armor = armor.max(0) as i64;
    let constant = constant as i64;
    saturate(div_ceil(base as i64 * constant, constant + armor))
}

/// Scales `value` by `percent / 100`, rounding up.
pub fn scale_percent_ceil(value: i32, percent: u32) -> i32 {
    saturate(div_ceil(value as i64 * percent as i64, 100))
}

/// Takes `percent` of `value`, rounding down. Used for healing shares.
pub fn percent_of_floor(value: i32, percent: u32) -> i32 {
    saturate((value as i64 * percent as i64).div_euclid(100))
}
