//! accretion — marsh sediment column: parameters, stocks, layers, and errors.
//!
//! Purpose
//! -------
//! Provide a self-contained Morris & Bowden style accretion model. A column
//! of layers receives mineral and organic sediment each year while live roots,
//! distributed exponentially with depth, turn over into labile, refractory,
//! and ash pools and are buried below the root zone as the surface rises.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the parameter bundle, unit tags, the root-profile engine,
//!   and the stock types.
//! - [`models`] holds [`Layer`] and [`SedimentCore`], the step-forward state
//!   machine.
//! - [`errors`] centralizes [`AccretionError`] / [`ParamError`] and their
//!   result aliases.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameter bundles are validated once and shared read-only; the column
//!   never mutates them.
//! - Layer elevations stack contiguously from the base elevation upward.
//! - Failed operations leave all state unchanged.
//!
//! Conventions
//! -----------
//! - Elevations in cm relative to a datum; depths in cm below the column
//!   surface, measured downward.
//! - Layer index 0 is the oldest (bottom) layer.
//! - The model performs no I/O; persistence lives in `crate::storage` and
//!   logging is emitted through `tracing`.
pub mod core;
pub mod errors;
pub mod models;

pub use self::{
    core::{
        BiomassDistribution, Flows, InertStockGroup, Measured, Measurement, ParameterBundle,
        Stock, StockTag,
    },
    errors::{AccretionError, AccretionResult, ParamError, ParamResult},
    models::{Layer, LayerSummary, SedimentCore, StepOutcome},
};

// ---- Convenience prelude ---------------------------------------------------
//
//     use marsh_accretion::accretion::prelude::*;
//
// imports the column surface without the stock internals.

pub mod prelude {
    pub use super::{
        AccretionError, AccretionResult, Measured, Measurement, ParamError, ParameterBundle,
        SedimentCore, StepOutcome,
    };
}
