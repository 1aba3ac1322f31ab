//! Layer — one stratigraphic band of the sediment column.
//!
//! Purpose
//! -------
//! Pair a live [`Biomass`] stock with an [`InertStockGroup`], anchor the band
//! at a bottom elevation, and move material between the two each step.
//!
//! Key behaviors
//! -------------
//! - [`Layer::new`] builds a fresh surface band from a deposition depth and a
//!   surface biomass density.
//! - [`Layer::transfer`] buries the band by one step's deposition: turnover
//!   (scaled by years) plus removal flows enter the inert pools, and the
//!   biomass stock is replaced for the shifted depths.
//! - [`Layer::summary`] reports elevations and every pool in both units.
//!
//! Invariants & assumptions
//! ------------------------
//! - Thickness is the length of the active inert pools; live roots occupy
//!   pore space and add no height. A fresh layer is exactly as thick as its
//!   deposition.
//! - The top elevation is always `bottom_elevation + thickness`; only the
//!   bottom is stored.
//! - `transfer` is all-or-nothing.
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::accretion::{
    core::{
        biomass::Biomass,
        inert::InertStockGroup,
        params::ParameterBundle,
        stock::{Measured, Stock, StockTag},
        units::Measurement,
        validation::{validate_finite, validate_positive},
    },
    errors::AccretionResult,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    bottom_elevation: f64,
    biomass: Biomass,
    biomass_out: Stock,
    inert: InertStockGroup,
}

/// Amount of one pool in both units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Amount {
    pub weight: f64,
    pub length: f64,
}

impl Amount {
    fn of<S: Measured + ?Sized>(stock: &S) -> Self {
        Self { weight: stock.weight(), length: stock.length() }
    }

    pub fn in_units(&self, measurement: Measurement) -> f64 {
        match measurement {
            Measurement::Weight => self.weight,
            Measurement::Length => self.length,
        }
    }
}

/// Read-only report of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub top_elevation: f64,
    pub bottom_elevation: f64,
    pub top_depth: f64,
    pub biomass: Amount,
    pub labile: Amount,
    pub refractory: Amount,
    pub inorganic: Amount,
    /// Material that has left the system from this layer.
    pub exported: Amount,
}

impl Layer {
    /// Build a surface layer of `deposition` cm with top density
    /// `biomass_at_surface`, resting on `bottom_elevation`.
    ///
    /// Errors
    /// ------
    /// - Validation errors from [`Biomass::new`] and
    ///   [`InertStockGroup::new`].
    pub fn new(
        params: &ParameterBundle, biomass_at_surface: f64, deposition: f64, bottom_elevation: f64,
        measurement: Measurement,
    ) -> AccretionResult<Self> {
        let biomass = Biomass::new(params, biomass_at_surface, 0.0, deposition)?;
        let inert = InertStockGroup::new(params, deposition, measurement)?;
        Ok(Self {
            bottom_elevation,
            biomass,
            biomass_out: Stock::empty(params, StockTag::BiomassOut, Measurement::Weight),
            inert,
        })
    }

    pub fn biomass(&self) -> &Biomass {
        &self.biomass
    }

    pub fn inert(&self) -> &InertStockGroup {
        &self.inert
    }

    pub fn thickness(&self) -> f64 {
        self.inert.length()
    }

    /// `(top, bottom)` elevations in cm.
    pub fn elevations(&self) -> (f64, f64) {
        (self.bottom_elevation + self.thickness(), self.bottom_elevation)
    }

    /// Depth of the layer top below the column surface.
    pub fn top_depth(&self) -> f64 {
        self.biomass.depths().top
    }

    /// Check a stored layer against `params` before it joins a column.
    ///
    /// Errors
    /// ------
    /// - Any error from the biomass, tracker, or inert-pool checks, and
    ///   `NonFiniteValue` for the bottom elevation.
    pub(crate) fn revalidate(&mut self, params: &ParameterBundle) -> AccretionResult<()> {
        validate_finite("bottom elevation", self.bottom_elevation)?;
        self.biomass.revalidate(params)?;
        self.biomass_out.revalidate(params, StockTag::BiomassOut, Measurement::Weight)?;
        self.inert.revalidate(params)
    }

    pub(crate) fn set_bottom_elevation(&mut self, elevation: f64) {
        self.bottom_elevation = elevation;
    }

    /// Bury the layer by `deposition` cm over `years`.
    ///
    /// Parameters
    /// ----------
    /// - `biomass_at_top`: root density at the layer's new top depth.
    /// - `deposition`: burial increment, ≥ 0.
    /// - `years`: step length, > 0. Scales the turnover inputs; removal and
    ///   the inert pools' decay and uptake are per transfer.
    ///
    /// Errors
    /// ------
    /// - Any precondition or domain error from the biomass or inert stocks.
    ///   The layer is unchanged on error.
    pub fn transfer(
        &mut self, params: &ParameterBundle, biomass_at_top: f64, deposition: f64, years: f64,
    ) -> AccretionResult<()> {
        let years = validate_positive("years", years)?;
        let measurement = self.inert.measurement();
        let step = self.biomass.transfer(params, biomass_at_top, deposition, measurement)?;
        let inputs = step.turnover.scaled(years) + step.removal;

        self.inert.transfer(params, inputs, measurement)?;
        self.biomass = step.replacement;
        trace!(
            top_depth = self.top_depth(),
            biomass_at_top,
            inflow = inputs.total(),
            "layer transferred"
        );
        Ok(())
    }

    pub fn summary(&self) -> LayerSummary {
        let (top_elevation, bottom_elevation) = self.elevations();
        let mut exported = Amount::default();
        for stock in self.inert.exported().into_iter().chain([&self.biomass_out]) {
            exported.weight += stock.weight();
            exported.length += stock.length();
        }
        LayerSummary {
            top_elevation,
            bottom_elevation,
            top_depth: self.top_depth(),
            biomass: Amount::of(&self.biomass),
            labile: Amount::of(self.inert.labile()),
            refractory: Amount::of(self.inert.refractory()),
            inorganic: Amount::of(self.inert.inorganic()),
            exported,
        }
    }
}
