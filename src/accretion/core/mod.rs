//! core — parameters, stocks, and the root-profile engine.
//!
//! Purpose
//! -------
//! Collect the leaf building blocks of a sediment column: the validated
//! [`ParameterBundle`], measurement and material tags, the
//! [`BiomassDistribution`] engine, the tagged [`Stock`] type with its
//! [`Measured`] capability, the live [`Biomass`] stock, and the
//! [`InertStockGroup`]. Layers and the column in `models` build on these.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every constructor validates its numeric inputs; a value that exists
//!   satisfies its documented invariants.
//! - Nothing here holds a parameter bundle. Operations take
//!   `&ParameterBundle` explicitly.
//! - No I/O. Logging happens only at the layer/column level.
pub mod biomass;
pub mod distribution;
pub mod inert;
pub mod params;
pub mod stock;
pub mod units;
pub mod validation;

pub use self::{
    biomass::{Biomass, BiomassTransfer, DensityProfile, Depths},
    distribution::BiomassDistribution,
    inert::InertStockGroup,
    params::ParameterBundle,
    stock::{Flows, Measured, Stock, StockTag},
    units::{Material, Measurement},
};
