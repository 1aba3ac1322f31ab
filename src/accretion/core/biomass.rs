//! Live biomass stock: root mass within one layer and its depth profile.
//!
//! Purpose
//! -------
//! Track the live root mass held by a layer, the layer's position relative to
//! the root zone ([`Depths`]), and the root densities at its top, live
//! bottom, and bottom ([`DensityProfile`]). Expose the per-step turnover and
//! removal flows the layer forwards into its inert pools.
//!
//! Key behaviors
//! -------------
//! - [`Biomass::new`] clamps the live bottom into the root zone, evaluates the
//!   density profile, and integrates the stored weight.
//! - [`Biomass::turnover`] reads flows without changing the stock.
//! - [`Biomass::removal`] returns the flows from the bottom `depth_delta` cm
//!   of the live band and a new stock with that mass taken out.
//! - [`Biomass::transfer`] bundles turnover, removal, and the replacement
//!   stock for shifted depths. Stocks are replaced, never patched.
//!
//! Invariants & assumptions
//! ------------------------
//! - `0 <= top <= live_bottom <= bottom`, with
//!   `live_bottom = clamp(rd, top, bottom)`.
//! - A layer whose top is at or below `rd` carries zero biomass; asking for
//!   positive biomass there is a [`AccretionError::LiveBiomassBelowRootZone`].
//! - The stored amount is always in WEIGHT.
//!
//! Conventions
//! -----------
//! - Densities are g/cm² and are evaluated relative to the layer's own top,
//!   so `densities.top` equals the `biomass_at_top` the stock was built from.
use serde::{Deserialize, Serialize};

use crate::accretion::{
    core::{
        distribution::BiomassDistribution,
        params::ParameterBundle,
        stock::{Flows, Measured, Stock, StockTag},
        units::Measurement,
        validation::{validate_depth_range, validate_non_negative},
    },
    errors::{AccretionError, AccretionResult},
};

/// A layer's depth band relative to the column surface, in cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Depths {
    pub top: f64,
    pub live_bottom: f64,
    pub bottom: f64,
}

impl Depths {
    /// Build the triple for `(top, bottom)` against a maximum root depth.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::NegativeValue` / `NonFiniteValue` /
    ///   `DepthsNotAscending` for an invalid pair.
    pub fn new(top: f64, bottom: f64, max_root_depth: f64) -> AccretionResult<Self> {
        let (top, bottom) = validate_depth_range(top, bottom)?;
        let live_bottom = max_root_depth.max(top).min(bottom);
        Ok(Self { top, live_bottom, bottom })
    }

    /// Whether the band starts at or below the root zone.
    pub fn below_root_zone(&self, max_root_depth: f64) -> bool {
        self.top >= max_root_depth
    }
}

/// Root densities (g/cm²) at a layer's top, live bottom, and bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DensityProfile {
    pub top: f64,
    pub live_bottom: f64,
    pub bottom: f64,
}

/// Live biomass held by one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biomass {
    stock: Stock,
    depths: Depths,
    densities: DensityProfile,
}

/// Result of moving a biomass stock one step deeper.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomassTransfer {
    /// Yearly turnover flows of the outgoing stock.
    pub turnover: Flows,
    /// Flows from the mass removed at the bottom of the live band.
    pub removal: Flows,
    /// Stock for the shifted depths and new top density.
    pub replacement: Biomass,
}

impl Biomass {
    /// Build the stock for a layer spanning `(top, bottom)` whose top carries
    /// `biomass_at_top` g/cm².
    ///
    /// Errors
    /// ------
    /// - Depth-pair and biomass precondition errors from validation.
    /// - `AccretionError::LiveBiomassBelowRootZone` if `top >= rd` and
    ///   `biomass_at_top > 0`.
    pub fn new(
        params: &ParameterBundle, biomass_at_top: f64, top: f64, bottom: f64,
    ) -> AccretionResult<Self> {
        let biomass_at_top = validate_non_negative("biomass at top", biomass_at_top)?;
        let rd = params.max_root_depth;
        let depths = Depths::new(top, bottom, rd)?;

        if depths.below_root_zone(rd) {
            if biomass_at_top > 0.0 {
                return Err(AccretionError::LiveBiomassBelowRootZone {
                    top: depths.top,
                    root_depth: rd,
                    biomass: biomass_at_top,
                });
            }
            let stock = Stock::empty(params, StockTag::Biomass, Measurement::Weight);
            return Ok(Self { stock, depths, densities: DensityProfile::default() });
        }

        let engine = BiomassDistribution::new(params);
        let densities = DensityProfile {
            top: biomass_at_top,
            live_bottom: engine.density_within_layer(biomass_at_top, depths.top, depths.live_bottom),
            bottom: engine.density_within_layer(biomass_at_top, depths.top, depths.bottom),
        };
        let weight =
            engine.biomass_between_depths(biomass_at_top, (0.0, depths.live_bottom - depths.top))?;
        let stock = Stock::new(params, StockTag::Biomass, Measurement::Weight, weight)?;
        Ok(Self { stock, depths, densities })
    }

    /// Check a stored stock against `params`: depths must match the root
    /// zone clamp, densities and weight must be non-negative, and a band
    /// below the root zone must be empty. Recomputes the conversion constant.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::InconsistentDepths`, `LiveBiomassBelowRootZone`,
    ///   and the precondition errors from validation.
    pub(crate) fn revalidate(&mut self, params: &ParameterBundle) -> AccretionResult<()> {
        let rd = params.max_root_depth;
        let d = self.depths;
        if Depths::new(d.top, d.bottom, rd)? != d {
            return Err(AccretionError::InconsistentDepths {
                top: d.top,
                live_bottom: d.live_bottom,
                bottom: d.bottom,
            });
        }
        validate_non_negative("density at top", self.densities.top)?;
        validate_non_negative("density at live bottom", self.densities.live_bottom)?;
        validate_non_negative("density at bottom", self.densities.bottom)?;
        if d.below_root_zone(rd) && self.stock.amount() > 0.0 {
            return Err(AccretionError::LiveBiomassBelowRootZone {
                top: d.top,
                root_depth: rd,
                biomass: self.stock.amount(),
            });
        }
        self.stock.revalidate(params, StockTag::Biomass, Measurement::Weight)
    }

    pub fn depths(&self) -> Depths {
        self.depths
    }

    pub fn densities(&self) -> DensityProfile {
        self.densities
    }

    /// Density at the layer top (g/cm²).
    pub fn biomass_at_top(&self) -> f64 {
        self.densities.top
    }

    /// Turnover flows for one year, expressed in `output`.
    ///
    /// Does not change the stock: turned-over roots are replaced by new
    /// growth within the same year.
    pub fn turnover(
        &self, params: &ParameterBundle, output: Measurement,
    ) -> AccretionResult<Flows> {
        let grams = BiomassDistribution::new(params).turnover(self.weight())?;
        Ok(grams.into_measurement(params, output))
    }

    /// Flows from roots at the bottom of the live band when the layer sinks
    /// by `depth_delta`, and the stock left behind.
    ///
    /// Parameters
    /// ----------
    /// - `depth_delta`: burial increment in cm, ≥ 0.
    /// - `output`: unit for the returned flows.
    ///
    /// Notes
    /// -----
    /// - The removal band is `[max(top, live_bottom - depth_delta), bottom]`.
    ///   The profile is zero below `live_bottom`, so only the live part of
    ///   the band carries mass.
    ///
    /// Returns
    /// -------
    /// `(flows, remaining)` where `remaining` keeps the depths, has the
    /// removed mass subtracted, and densities `(top, at_removal, 0)`.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::NegativeValue` / `NonFiniteValue` for an invalid
    ///   `depth_delta`.
    pub fn removal(
        &self, params: &ParameterBundle, depth_delta: f64, output: Measurement,
    ) -> AccretionResult<(Flows, Biomass)> {
        let depth_delta = validate_non_negative("depth delta", depth_delta)?;
        let engine = BiomassDistribution::new(params);
        let d = self.depths;

        let top_of_removal = d.top.max(d.live_bottom - depth_delta);
        let density = engine.density_within_layer(self.densities.top, d.top, top_of_removal);
        let removed = engine
            .biomass_between_depths(density, (0.0, d.live_bottom - top_of_removal))?
            .min(self.weight());

        let mut stock = self.stock.clone();
        stock.withdraw(removed, Measurement::Weight);
        let remaining = Biomass {
            stock,
            depths: d,
            densities: DensityProfile { top: self.densities.top, live_bottom: density, bottom: 0.0 },
        };
        Ok((engine.split(removed).into_measurement(params, output), remaining))
    }

    /// Turnover and removal flows for a step that buries the layer by
    /// `depth_delta`, plus the replacement stock for the shifted depths.
    ///
    /// Errors
    /// ------
    /// - Any error from [`Biomass::removal`] or [`Biomass::new`]; nothing is
    ///   mutated.
    pub fn transfer(
        &self, params: &ParameterBundle, biomass_at_top: f64, depth_delta: f64, output: Measurement,
    ) -> AccretionResult<BiomassTransfer> {
        let turnover = self.turnover(params, output)?;
        let (removal, _) = self.removal(params, depth_delta, output)?;
        let replacement = Biomass::new(
            params,
            biomass_at_top,
            self.depths.top + depth_delta,
            self.depths.bottom + depth_delta,
        )?;
        Ok(BiomassTransfer { turnover, removal, replacement })
    }
}

impl Measured for Biomass {
    fn tag(&self) -> StockTag {
        StockTag::Biomass
    }

    fn measurement(&self) -> Measurement {
        self.stock.measurement()
    }

    fn amount(&self) -> f64 {
        self.stock.amount()
    }

    fn weight_to_length(&self) -> f64 {
        self.stock.weight_to_length()
    }
}
