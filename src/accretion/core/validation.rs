//! Validation helpers: reusable checks for constants, depths, and flows.
//!
//! Purpose
//! -------
//! Centralize the small numeric checks used across the accretion stack so
//! constructors and column operations can fail fast with structured errors
//! before any state is touched.
//!
//! Key behaviors
//! -------------
//! - `check_*` helpers validate configuration constants and return
//!   [`ParamResult`]; they back [`ParameterBundle::validate`].
//! - `validate_*` helpers validate runtime inputs (biomass densities, depths,
//!   deposition, timestep lengths, measurement tags) and return
//!   [`AccretionResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every helper rejects NaN and ±∞ before checking sign or range.
//! - Complementary fractions must sum to one within [`FRACTION_TOLERANCE`].
//!
//! Conventions
//! -----------
//! - On success the validated value is returned so callers can bind it
//!   directly (`let depth = validate_non_negative("depth", depth)?;`).
//! - No I/O and no logging.
//!
//! [`ParameterBundle::validate`]: crate::accretion::core::params::ParameterBundle::validate
use crate::accretion::{
    core::units::Measurement,
    errors::{AccretionError, AccretionResult, ParamError, ParamResult},
};

/// Absolute tolerance for complementary fractions summing to one.
pub const FRACTION_TOLERANCE: f64 = 1e-9;

// ---- Configuration constants ----

/// Reject NaN/±∞ constants.
pub fn check_finite(name: &'static str, value: f64) -> ParamResult<f64> {
    if !value.is_finite() {
        return Err(ParamError::NonFinite { name, value });
    }
    Ok(value)
}

/// Require a finite, strictly positive constant.
pub fn check_positive(name: &'static str, value: f64) -> ParamResult<f64> {
    let value = check_finite(name, value)?;
    if value <= 0.0 {
        return Err(ParamError::NonPositive { name, value });
    }
    Ok(value)
}

/// Require a finite, non-negative constant.
pub fn check_non_negative(name: &'static str, value: f64) -> ParamResult<f64> {
    let value = check_finite(name, value)?;
    if value < 0.0 {
        return Err(ParamError::Negative { name, value });
    }
    Ok(value)
}

/// Require a finite fraction in the closed interval `[0, 1]`.
pub fn check_fraction(name: &'static str, value: f64) -> ParamResult<f64> {
    let value = check_finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ParamError::FractionOutOfRange { name, value });
    }
    Ok(value)
}

/// Require a finite constant in the open interval `(0, 1)`.
pub fn check_open_unit(name: &'static str, value: f64) -> ParamResult<f64> {
    let value = check_finite(name, value)?;
    if value <= 0.0 || value >= 1.0 {
        return Err(ParamError::OpenUnitInterval { name, value });
    }
    Ok(value)
}

/// Validate two complementary fractions.
///
/// Parameters
/// ----------
/// - `first`, `second`: names used in the error message.
/// - `a`, `b`: the fractions; each must lie in `[0, 1]`.
///
/// Errors
/// ------
/// - `ParamError::FractionOutOfRange` if either lies outside `[0, 1]`.
/// - `ParamError::FractionsDoNotSum` if `|a + b - 1| > FRACTION_TOLERANCE`.
pub fn check_fraction_pair(
    first: &'static str, a: f64, second: &'static str, b: f64,
) -> ParamResult<()> {
    check_fraction(first, a)?;
    check_fraction(second, b)?;
    let sum = a + b;
    if (sum - 1.0).abs() > FRACTION_TOLERANCE {
        return Err(ParamError::FractionsDoNotSum { first, second, sum });
    }
    Ok(())
}

// ---- Runtime inputs ----

/// Reject NaN/±∞ inputs.
pub fn validate_finite(name: &'static str, value: f64) -> AccretionResult<f64> {
    if !value.is_finite() {
        return Err(AccretionError::NonFiniteValue { name, value });
    }
    Ok(value)
}

/// Require a finite, non-negative input (biomass densities, depths, masses).
pub fn validate_non_negative(name: &'static str, value: f64) -> AccretionResult<f64> {
    let value = validate_finite(name, value)?;
    if value < 0.0 {
        return Err(AccretionError::NegativeValue { name, value });
    }
    Ok(value)
}

/// Require a finite, strictly positive input (timestep lengths).
pub fn validate_positive(name: &'static str, value: f64) -> AccretionResult<f64> {
    let value = validate_finite(name, value)?;
    if value <= 0.0 {
        return Err(AccretionError::NonPositiveValue { name, value });
    }
    Ok(value)
}

/// Validate a `(top, bottom)` depth pair: both finite and ≥ 0 with
/// `top <= bottom`.
pub fn validate_depth_range(top: f64, bottom: f64) -> AccretionResult<(f64, f64)> {
    let top = validate_non_negative("top depth", top)?;
    let bottom = validate_non_negative("bottom depth", bottom)?;
    if top > bottom {
        return Err(AccretionError::DepthsNotAscending { top, bottom });
    }
    Ok((top, bottom))
}

/// Require a flow's measurement type to match its destination.
pub fn validate_measurement(expected: Measurement, actual: Measurement) -> AccretionResult<()> {
    if expected != actual {
        return Err(AccretionError::MeasurementMismatch { expected, actual });
    }
    Ok(())
}
