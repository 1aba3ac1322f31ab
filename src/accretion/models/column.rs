//! Sediment column: an ordered stack of layers stepped forward in time.
//!
//! [`SedimentCore`] owns the layer sequence (index 0 = oldest/bottom) and a
//! shared, read-only [`ParameterBundle`]. Each call to
//! [`SedimentCore::step_forward`] buries every existing layer by the year's
//! deposition, moves turnover and removal flows into their inert pools, and
//! appends one new surface layer.
//!
//! Key ideas:
//! - A step works on a copy of the layers and swaps it in only on success, so
//!   any error leaves the column exactly as it was.
//! - After the existing layers are transferred they are restacked from the
//!   base elevation, so each top meets the next bottom and the new layer sits
//!   on the current surface.
//! - Substeps are supported by [`SedimentCore::substep_forward`]; the
//!   temporary layers of a multi-substep run are merged into one.
use std::sync::Arc;

use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

use crate::accretion::{
    core::{
        distribution::BiomassDistribution,
        params::ParameterBundle,
        stock::Measured,
        units::Measurement,
        validation::{validate_finite, validate_non_negative, validate_positive},
    },
    errors::{AccretionError, AccretionResult},
    models::layer::{Layer, LayerSummary},
};

/// Tolerance for layer contiguity checks on restored columns.
const STACKING_TOLERANCE: f64 = 1e-9;

/// Column of the profile matrix returned by [`SedimentCore::profile`].
pub const PROFILE_COLUMNS: [&str; 6] =
    ["top_elevation", "bottom_elevation", "biomass", "labile", "refractory", "inorganic"];

/// Layered marsh sediment column.
///
/// # Notes
/// - Inert pools are stored in `measurement` units; biomass is always stored
///   as weight.
/// - The bundle is shared behind an `Arc`; several columns may use one.
#[derive(Debug, Clone, PartialEq)]
pub struct SedimentCore {
    params: Arc<ParameterBundle>,
    measurement: Measurement,
    layers: Vec<Layer>,
}

/// Summary of a completed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub substeps: usize,
    pub layer_count: usize,
    pub surface_elevation: f64,
    pub total_biomass: f64,
}

impl SedimentCore {
    /// Build a column holding one seed layer from `db` to `du` with surface
    /// biomass `ro`.
    ///
    /// # Errors
    /// - `AccretionError::Param` if the bundle is invalid, including a root
    ///   depth deeper than the seed layer.
    pub fn new(params: Arc<ParameterBundle>, measurement: Measurement) -> AccretionResult<Self> {
        params.validate()?;
        let seed = Layer::new(
            &params,
            params.initial_surface_biomass,
            params.initial_depth(),
            params.initial_bottom_elevation,
            measurement,
        )?;
        debug!(depth = params.initial_depth(), %measurement, "seeded sediment column");
        Ok(Self { params, measurement, layers: vec![seed] })
    }

    /// Rebuild a column from stored layers (bottom to top).
    ///
    /// # Errors
    /// - `AccretionError::EmptyColumn` for no layers.
    /// - `AccretionError::MeasurementMismatch` if a layer's inert pools use
    ///   another unit.
    /// - `AccretionError::DiscontiguousLayers` if a layer top does not meet
    ///   the next bottom.
    /// - Any error from the per-layer record checks (negative amounts,
    ///   misplaced stocks, depths inconsistent with `rd`).
    ///
    /// Stock conversion constants are recomputed from `params`, so stored
    /// values never disagree with the bundle.
    pub fn from_layers(
        params: Arc<ParameterBundle>, measurement: Measurement, mut layers: Vec<Layer>,
    ) -> AccretionResult<Self> {
        params.validate()?;
        if layers.is_empty() {
            return Err(AccretionError::EmptyColumn);
        }
        for layer in &mut layers {
            if layer.inert().measurement() != measurement {
                return Err(AccretionError::MeasurementMismatch {
                    expected: measurement,
                    actual: layer.inert().measurement(),
                });
            }
            layer.revalidate(&params)?;
        }
        for (index, pair) in layers.windows(2).enumerate() {
            let top = pair[0].elevations().0;
            let next_bottom = pair[1].elevations().1;
            if (top - next_bottom).abs() > STACKING_TOLERANCE {
                return Err(AccretionError::DiscontiguousLayers { index, top, next_bottom });
            }
        }
        Ok(Self { params, measurement, layers })
    }

    pub fn params(&self) -> &Arc<ParameterBundle> {
        &self.params
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    /// Layers, oldest first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// `(top, bottom)` elevations of the whole column.
    pub fn elevations(&self) -> (f64, f64) {
        let bottom = self.layers.first().map_or(0.0, |l| l.elevations().1);
        let top = self.layers.last().map_or(bottom, |l| l.elevations().0);
        (top, bottom)
    }

    /// Root density at the column surface (g/cm²).
    pub fn surface_biomass(&self) -> f64 {
        self.layers.last().map_or(0.0, |l| l.biomass().biomass_at_top())
    }

    /// Number of substeps for a step. Fixed at one.
    pub fn number_of_substeps(&self, _biomass_at_surface: f64, _deposition: f64, _years: f64) -> usize {
        1
    }

    /// Advance the column by one timestep.
    ///
    /// ## Arguments
    /// - `biomass_at_surface`: root density at the new surface (g/cm²), ≥ 0.
    /// - `deposition`: sediment added this step (cm), ≥ 0.
    /// - `years`: step length, > 0.
    ///
    /// ## Errors
    /// - `AccretionError::ErosionUnsupported` for negative deposition.
    /// - Precondition errors for invalid inputs and any error raised by a
    ///   layer transfer. The column is unchanged on error.
    pub fn step_forward(
        &mut self, biomass_at_surface: f64, deposition: f64, years: f64,
    ) -> AccretionResult<StepOutcome> {
        let biomass_at_surface = validate_non_negative("biomass at surface", biomass_at_surface)?;
        let deposition = validate_finite("deposition", deposition)?;
        if deposition < 0.0 {
            warn!(deposition, "rejected erosion input");
            return Err(AccretionError::ErosionUnsupported { deposition });
        }
        let years = validate_positive("years", years)?;

        let n = self.number_of_substeps(biomass_at_surface, deposition, years);
        if n == 0 {
            return Err(AccretionError::ZeroSubsteps);
        }
        let biomass_delta = (biomass_at_surface - self.surface_biomass()) / n as f64;
        self.substep_forward(biomass_delta, deposition / n as f64, years, n)?;

        let outcome = StepOutcome {
            substeps: n,
            layer_count: self.len(),
            surface_elevation: self.elevations().0,
            total_biomass: self.total_biomass(),
        };
        debug!(
            deposition,
            biomass_at_surface,
            years,
            layers = outcome.layer_count,
            surface = outcome.surface_elevation,
            "stepped sediment column"
        );
        Ok(outcome)
    }

    /// Run `substeps` transfers of `deposition_delta` cm each.
    ///
    /// ## Steps
    /// 1. Add `biomass_delta` to the running surface density.
    /// 2. Transfer every layer, top to bottom, with the density carried down
    ///    to its new top depth and `years / substeps`.
    /// 3. Restack and append a surface layer of `deposition_delta` cm.
    /// 4. With more than one substep, replace the temporary surface layers by
    ///    one layer of `deposition_delta × substeps` cm.
    ///
    /// ## Errors
    /// - `AccretionError::ZeroSubsteps`, `ErosionUnsupported`, and any layer
    ///   error. The column is unchanged on error.
    pub fn substep_forward(
        &mut self, biomass_delta: f64, deposition_delta: f64, years: f64, substeps: usize,
    ) -> AccretionResult<()> {
        if substeps == 0 {
            return Err(AccretionError::ZeroSubsteps);
        }
        let biomass_delta = validate_finite("biomass delta", biomass_delta)?;
        let deposition_delta = validate_finite("deposition", deposition_delta)?;
        if deposition_delta < 0.0 {
            return Err(AccretionError::ErosionUnsupported { deposition: deposition_delta });
        }
        let sub_years = validate_positive("years", years)? / substeps as f64;

        let params = Arc::clone(&self.params);
        let engine = BiomassDistribution::new(&params);
        let base = self.elevations().1;
        let mut layers = self.layers.clone();
        let mut surface = self.surface_biomass();

        for _ in 0..substeps {
            surface = (surface + biomass_delta).max(0.0);
            for layer in layers.iter_mut().rev() {
                let biomass_at_top =
                    engine.density_at_layer_top(surface, layer.top_depth() + deposition_delta);
                layer.transfer(&params, biomass_at_top, deposition_delta, sub_years)?;
            }
            restack(&mut layers, base);
            let top = layers.last().map_or(base, |l| l.elevations().0);
            layers.push(Layer::new(&params, surface, deposition_delta, top, self.measurement)?);
        }

        if substeps > 1 {
            layers.truncate(layers.len() - substeps);
            let top = layers.last().map_or(base, |l| l.elevations().0);
            let full = deposition_delta * substeps as f64;
            layers.push(Layer::new(&params, surface, full, top, self.measurement)?);
        }

        self.layers = layers;
        Ok(())
    }

    /// Build a surface layer resting on the current column top.
    pub fn layer_factory(&self, biomass_at_surface: f64, deposition: f64) -> AccretionResult<Layer> {
        Layer::new(&self.params, biomass_at_surface, deposition, self.elevations().0, self.measurement)
    }

    /// Layer reports, bottom to top.
    pub fn summaries(&self) -> Vec<LayerSummary> {
        self.layers.iter().map(Layer::summary).collect()
    }

    /// Layer reports, top to bottom.
    pub fn iter_top_down(&self) -> impl Iterator<Item = LayerSummary> + '_ {
        self.layers.iter().rev().map(Layer::summary)
    }

    /// Live biomass in the root zone, in the column's measurement units.
    ///
    /// Sums from the surface down and stops at the first layer whose top is
    /// at or below the root depth.
    pub fn total_biomass(&self) -> f64 {
        let rd = self.params.max_root_depth;
        self.layers
            .iter()
            .rev()
            .take_while(|l| l.top_depth() < rd)
            .map(|l| l.biomass().amount_in(self.measurement))
            .sum()
    }

    /// One row per layer (bottom to top), columns as in [`PROFILE_COLUMNS`],
    /// pools in the column's measurement units.
    pub fn profile(&self) -> Array2<f64> {
        let m = self.measurement;
        let mut out = Array2::zeros((self.layers.len(), PROFILE_COLUMNS.len()));
        for (mut row, layer) in out.axis_iter_mut(Axis(0)).zip(&self.layers) {
            let s = layer.summary();
            row.assign(&Array1::from(vec![
                s.top_elevation,
                s.bottom_elevation,
                s.biomass.in_units(m),
                s.labile.in_units(m),
                s.refractory.in_units(m),
                s.inorganic.in_units(m),
            ]));
        }
        out
    }

    /// Column totals of the pool columns of [`SedimentCore::profile`]
    /// (biomass, labile, refractory, inorganic).
    pub fn pool_totals(&self) -> Array1<f64> {
        let profile = self.profile();
        profile.slice(ndarray::s![.., 2..]).sum_axis(Axis(0))
    }
}

/// Re-anchor layer bottoms upward from `base` so the stack is contiguous.
fn restack(layers: &mut [Layer], base: f64) {
    let mut bottom = base;
    for layer in layers.iter_mut() {
        layer.set_bottom_elevation(bottom);
        bottom += layer.thickness();
    }
}
