//! Biomass distribution engine — exponential root profile and turnover split.
//!
//! Purpose
//! -------
//! Evaluate the live-root density profile `b(z) = b_top · exp(-k1 · z)`,
//! truncated below the maximum root depth, integrate it between depths, and
//! split biomass mass into labile, refractory, and ash flows.
//!
//! Key behaviors
//! -------------
//! - [`BiomassDistribution::biomass_at_depth`]: areal density (or absolute
//!   weight) at a depth below the reference surface; exactly zero below `rd`.
//! - [`BiomassDistribution::biomass_between_depths`]: closed-form integral
//!   `(f(d1) - f(d0)) / -k1` in grams.
//! - [`BiomassDistribution::turnover`]: `split(biomass × k2)`.
//! - [`BiomassDistribution::split`]: `(m·fl, m·fc, m·k3)`. The three outputs
//!   are not normalized; ash draws on a separate above-ground quantity.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated (finite, non-negative, ascending) before use.
//! - The engine borrows a validated [`ParameterBundle`] and holds no other
//!   state; construct one wherever needed.
use crate::accretion::{
    core::{
        params::ParameterBundle,
        stock::Flows,
        validation::{validate_depth_range, validate_non_negative},
    },
    errors::{AccretionError, AccretionResult},
};

/// Stateless view over a parameter bundle for root-profile computations.
#[derive(Debug, Clone, Copy)]
pub struct BiomassDistribution<'p> {
    params: &'p ParameterBundle,
}

impl<'p> BiomassDistribution<'p> {
    pub fn new(params: &'p ParameterBundle) -> Self {
        Self { params }
    }

    /// Biomass at `depth` below a surface carrying `biomass_at_top` (g/cm²).
    ///
    /// Parameters
    /// ----------
    /// - `biomass_at_top`: areal density at depth 0, ≥ 0.
    /// - `depth`: depth in cm, ≥ 0.
    /// - `output_weight`: multiply by the surface area to return grams
    ///   instead of g/cm².
    ///
    /// Returns
    /// -------
    /// `0.0` when `depth > rd`, else `biomass_at_top · exp(-k1 · depth)`.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::NegativeValue` if `depth < 0` or
    ///   `biomass_at_top < 0`.
    /// - `AccretionError::NonFiniteValue` for NaN/±∞ inputs.
    pub fn biomass_at_depth(
        &self, biomass_at_top: f64, depth: f64, output_weight: bool,
    ) -> AccretionResult<f64> {
        let biomass_at_top = validate_non_negative("biomass at top", biomass_at_top)?;
        let depth = validate_non_negative("depth", depth)?;
        Ok(self.profile(biomass_at_top, depth, output_weight))
    }

    fn profile(&self, biomass_at_top: f64, depth: f64, output_weight: bool) -> f64 {
        if depth > self.params.max_root_depth {
            return 0.0;
        }
        let density = biomass_at_top * (-self.params.biomass_depth_decay * depth).exp();
        if output_weight {
            density * self.params.surface_area
        } else {
            density
        }
    }

    /// Grams of live biomass between `depths.0` and `depths.1`.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::DepthsNotAscending` / `NegativeValue` for an
    ///   invalid depth pair or negative biomass.
    /// - `AccretionError::NegativeIntegral` if the integral is negative.
    pub fn biomass_between_depths(
        &self, biomass_at_top: f64, depths: (f64, f64),
    ) -> AccretionResult<f64> {
        let biomass_at_top = validate_non_negative("biomass at top", biomass_at_top)?;
        let (upper, lower) = validate_depth_range(depths.0, depths.1)?;
        if upper == lower {
            return Ok(0.0);
        }
        let k1 = self.params.biomass_depth_decay;
        let mass = (self.profile(biomass_at_top, lower, true)
            - self.profile(biomass_at_top, upper, true))
            / -k1;
        if mass < 0.0 {
            return Err(AccretionError::NegativeIntegral { value: mass });
        }
        Ok(mass)
    }

    /// Density at absolute `depth` inside a layer whose top sits at
    /// `layer_top` with density `biomass_at_top`.
    ///
    /// Returns 0 when `depth` is below the root depth.
    pub fn density_within_layer(&self, biomass_at_top: f64, layer_top: f64, depth: f64) -> f64 {
        if depth > self.params.max_root_depth {
            return 0.0;
        }
        biomass_at_top * (-self.params.biomass_depth_decay * (depth - layer_top)).exp()
    }

    /// Surface density carried down to a layer top at `depth`; zero once the
    /// top reaches the root depth.
    pub fn density_at_layer_top(&self, biomass_at_surface: f64, depth: f64) -> f64 {
        if depth >= self.params.max_root_depth {
            return 0.0;
        }
        self.profile(biomass_at_surface, depth.max(0.0), false)
    }

    /// Split a mass into (labile, refractory, ash) flows.
    pub fn split(&self, mass: f64) -> Flows {
        Flows::new(
            mass * self.params.labile_fraction,
            mass * self.params.refractory_fraction,
            mass * self.params.ash_fraction,
        )
    }

    /// Yearly turnover flows (grams) for a biomass weight.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::NegativeValue` if `biomass < 0`.
    pub fn turnover(&self, biomass: f64) -> AccretionResult<Flows> {
        let biomass = validate_non_negative("biomass", biomass)?;
        Ok(self.split(biomass * self.params.turnover_rate))
    }
}
