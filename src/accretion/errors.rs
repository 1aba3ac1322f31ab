//! Errors for the marsh accretion stack (configuration checks, numeric
//! preconditions, domain-consistency violations, and unimplemented paths).
//!
//! This module defines a model error type, [`AccretionError`], and a
//! configuration error type, [`ParamError`], used across the Rust core, the
//! storage layer, and the Python-facing API. Both implement `Display`/`Error`
//! and, with the `python-bindings` feature, convert to `PyErr` for PyO3.
//!
//! ## Conventions
//! - Depths are measured downward from a layer or column surface and must be
//!   **finite and non-negative**.
//! - Every public operation validates its inputs before mutating state, so an
//!   `Err` always leaves the receiver unchanged.
//! - Erosion (negative deposition) is surfaced as
//!   [`AccretionError::ErosionUnsupported`], never silently clamped.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::accretion::core::{stock::StockTag, units::Measurement};

/// Crate-wide result alias for column, layer, and stock operations.
pub type AccretionResult<T> = Result<T, AccretionError>;

/// Result alias for parameter-bundle construction and validation.
pub type ParamResult<T> = Result<T, ParamError>;

/// Unified error type for the sediment column.
///
/// Covers numeric precondition failures (negative/non-finite inputs,
/// inverted depth ranges), domain-consistency violations (live biomass below
/// the root zone, measurement-type mismatches, broken layer stacking), and
/// the explicitly unimplemented erosion path.
#[derive(Debug, Clone, PartialEq)]
pub enum AccretionError {
    // ---- Numeric preconditions ----
    /// An input value is NaN/±inf.
    NonFiniteValue { name: &'static str, value: f64 },

    /// An input that must be ≥ 0 was negative.
    NegativeValue { name: &'static str, value: f64 },

    /// An input that must be > 0 was zero or negative.
    NonPositiveValue { name: &'static str, value: f64 },

    /// A depth range was supplied with `top > bottom`.
    DepthsNotAscending { top: f64, bottom: f64 },

    /// A biomass integral evaluated to a negative mass.
    NegativeIntegral { value: f64 },

    // ---- Domain consistency ----
    /// Positive biomass was requested for a layer starting at or below the
    /// maximum root depth.
    LiveBiomassBelowRootZone { top: f64, root_depth: f64, biomass: f64 },

    /// A flow was expressed in a different measurement type than its target.
    MeasurementMismatch { expected: Measurement, actual: Measurement },

    /// A stored stock sits in the slot of another pool.
    StockTagMismatch { expected: StockTag, actual: StockTag },

    /// A stored depth triple does not match `clamp(rd, top, bottom)`.
    InconsistentDepths { top: f64, live_bottom: f64, bottom: f64 },

    /// Layer elevations do not stack contiguously.
    DiscontiguousLayers { index: usize, top: f64, next_bottom: f64 },

    /// The column holds no layers.
    EmptyColumn,

    /// The substep count evaluated to zero.
    ZeroSubsteps,

    // ---- Unimplemented paths ----
    /// Negative deposition (erosion) is not modelled.
    ErosionUnsupported { deposition: f64 },

    // ---- Configuration ----
    /// Wrapper for a parameter-bundle error surfaced by a column operation.
    Param(ParamError),
}

impl std::error::Error for AccretionError {}

impl std::fmt::Display for AccretionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Numeric preconditions ----
            AccretionError::NonFiniteValue { name, value } => {
                write!(f, "{name} must be finite; got: {value}")
            }
            AccretionError::NegativeValue { name, value } => {
                write!(f, "{name} must be non-negative; got: {value}")
            }
            AccretionError::NonPositiveValue { name, value } => {
                write!(f, "{name} must be strictly positive; got: {value}")
            }
            AccretionError::DepthsNotAscending { top, bottom } => {
                write!(f, "Depth range must satisfy top <= bottom; got top {top}, bottom {bottom}")
            }
            AccretionError::NegativeIntegral { value } => {
                write!(f, "Biomass between depths evaluated to a negative mass: {value}")
            }
            // ---- Domain consistency ----
            AccretionError::LiveBiomassBelowRootZone { top, root_depth, biomass } => {
                write!(
                    f,
                    "Layer top depth {top} is at or below the root depth {root_depth} but carries biomass {biomass}"
                )
            }
            AccretionError::MeasurementMismatch { expected, actual } => {
                write!(f, "Measurement type mismatch: expected {expected}, got {actual}")
            }
            AccretionError::StockTagMismatch { expected, actual } => {
                write!(f, "Stock slot expects {} but holds {}", expected.name(), actual.name())
            }
            AccretionError::InconsistentDepths { top, live_bottom, bottom } => {
                write!(
                    f,
                    "Depths (top {top}, live bottom {live_bottom}, bottom {bottom}) are inconsistent with the root depth"
                )
            }
            AccretionError::DiscontiguousLayers { index, top, next_bottom } => {
                write!(
                    f,
                    "Layer {index} top elevation {top} does not meet the next layer's bottom {next_bottom}"
                )
            }
            AccretionError::EmptyColumn => write!(f, "Sediment column holds no layers."),
            AccretionError::ZeroSubsteps => write!(f, "Number of substeps must be at least one."),
            // ---- Unimplemented paths ----
            AccretionError::ErosionUnsupported { deposition } => {
                write!(f, "Erosion is not supported; deposition must be >= 0, got: {deposition}")
            }
            // ---- Configuration ----
            AccretionError::Param(err) => write!(f, "Invalid parameters: {err}"),
        }
    }
}

impl From<ParamError> for AccretionError {
    fn from(err: ParamError) -> Self {
        AccretionError::Param(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<AccretionError> for PyErr {
    fn from(err: AccretionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

/// Error type for building a parameter bundle from configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A constant is NaN/±inf.
    NonFinite { name: &'static str, value: f64 },

    /// A constant that must be > 0 is not.
    NonPositive { name: &'static str, value: f64 },

    /// A constant that must be ≥ 0 is negative.
    Negative { name: &'static str, value: f64 },

    /// A fraction lies outside `[0, 1]`.
    FractionOutOfRange { name: &'static str, value: f64 },

    /// Complementary fractions do not sum to one.
    FractionsDoNotSum { first: &'static str, second: &'static str, sum: f64 },

    /// A constant must lie strictly inside `(0, 1)`.
    OpenUnitInterval { name: &'static str, value: f64 },

    /// The initial top elevation must lie above the bottom elevation.
    ElevationsNotDescending { top: f64, bottom: f64 },

    /// The seed layer is shallower than the maximum root depth.
    InitialDepthBelowRootDepth { depth: f64, root_depth: f64 },
}

impl std::error::Error for ParamError {}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::NonFinite { name, value } => {
                write!(f, "Constant {name} must be finite; got: {value}")
            }
            ParamError::NonPositive { name, value } => {
                write!(f, "Constant {name} must be > 0; got: {value}")
            }
            ParamError::Negative { name, value } => {
                write!(f, "Constant {name} must be >= 0; got: {value}")
            }
            ParamError::FractionOutOfRange { name, value } => {
                write!(f, "Fraction {name} must lie in [0, 1]; got: {value}")
            }
            ParamError::FractionsDoNotSum { first, second, sum } => {
                write!(f, "Fractions {first} + {second} must equal 1; got: {sum}")
            }
            ParamError::OpenUnitInterval { name, value } => {
                write!(f, "Constant {name} must satisfy 0 < {name} < 1; got: {value}")
            }
            ParamError::ElevationsNotDescending { top, bottom } => {
                write!(f, "Initial top elevation du ({top}) must exceed bottom elevation db ({bottom})")
            }
            ParamError::InitialDepthBelowRootDepth { depth, root_depth } => {
                write!(
                    f,
                    "Initial layer depth du - db ({depth}) must be at least the root depth rd ({root_depth})"
                )
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ParamError> for PyErr {
    fn from(err: ParamError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
