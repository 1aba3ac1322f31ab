//! Parameter bundle: validated, immutable constants for a sediment column.
//!
//! Purpose
//! -------
//! Hold every physical and biological constant the column needs, enforce
//! their cross-constant invariants once at construction, and provide the
//! weight ↔ length conversions used by every stock.
//!
//! Key behaviors
//! -------------
//! - [`ParameterBundle::validate`] checks all constants and returns the first
//!   violation as a [`ParamError`].
//! - [`ParameterBundle::morris_bowden`] is an explicit preset matching the
//!   bundled `data/morris_constants.toml`; there is no implicit global
//!   default.
//! - Conversions are per [`Material`]: one centimetre of column holds
//!   `bulk_density × surface_area` grams.
//!
//! Invariants & assumptions
//! ------------------------
//! - `fo + fi = 1` and `fc + fl = 1` (within
//!   [`FRACTION_TOLERANCE`](crate::accretion::core::validation::FRACTION_TOLERANCE)).
//! - `du > db` and the seed layer depth `du - db` is at least `rd`.
//! - `0 < k1 < 1`; `k3 ∈ [0, 1]`; every density, rate, and ratio is > 0.
//! - Bundles are never mutated by the column; share them behind an `Arc`.
//!
//! Conventions
//! -----------
//! - Lengths in cm, weights in g, areas in cm², rates per year.
//! - Field names are descriptive; the docs give the conventional symbol used
//!   in constants files.
use crate::accretion::{
    core::{
        units::{Material, Measurement},
        validation::{
            check_finite, check_fraction, check_fraction_pair, check_non_negative,
            check_open_unit, check_positive, validate_non_negative,
        },
    },
    errors::{AccretionResult, ParamError, ParamResult},
};

/// Constants for a marsh sediment column.
///
/// Fields
/// ------
/// Each field documents its constants-file symbol in parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBundle {
    /// Litter transport factor (`b`). Carried for reporting.
    pub litter_transport: f64,
    /// Column surface area in cm² (`sa`).
    pub surface_area: f64,
    /// Initial upper elevation in cm (`du`).
    pub initial_top_elevation: f64,
    /// Initial lower elevation in cm (`db`).
    pub initial_bottom_elevation: f64,
    /// Organic bulk density in g/cm³ (`bo`).
    pub organic_bulk_density: f64,
    /// Inorganic bulk density in g/cm³ (`bi`).
    pub inorganic_bulk_density: f64,
    /// Organic fraction of deposited sediment (`fo`).
    pub organic_fraction: f64,
    /// Inorganic fraction of deposited sediment (`fi`).
    pub inorganic_fraction: f64,
    /// Labile decay rate per year (`k`).
    pub labile_decay_rate: f64,
    /// Refractory fraction of organic matter (`fc`).
    pub refractory_fraction: f64,
    /// Labile fraction of organic matter (`fl`).
    pub labile_fraction: f64,
    /// Initial surface biomass density in g/cm² (`ro`).
    pub initial_surface_biomass: f64,
    /// Maximum root depth in cm (`rd`).
    pub max_root_depth: f64,
    /// Exponential decay of biomass density with depth, per cm (`k1`).
    pub biomass_depth_decay: f64,
    /// Biomass turnover rate per year (`k2`).
    pub turnover_rate: f64,
    /// Ash fraction of turnover (`k3`).
    pub ash_fraction: f64,
    /// Stem volume to surface biomass ratio (`sv_to_ro`).
    pub stem_volume_to_biomass: f64,
    /// Aboveground weight to root length ratio (`wa_to_rl`).
    pub aboveground_to_root: f64,
}

impl ParameterBundle {
    /// Morris & Bowden preset with the same values as
    /// `data/morris_constants.toml`.
    pub fn morris_bowden() -> Self {
        Self {
            litter_transport: 0.0,
            surface_area: 1.0,
            initial_top_elevation: 0.0,
            initial_bottom_elevation: -30.0,
            organic_bulk_density: 0.085,
            inorganic_bulk_density: 1.99,
            organic_fraction: 0.1,
            inorganic_fraction: 0.9,
            labile_decay_rate: 0.5,
            refractory_fraction: 0.2,
            labile_fraction: 0.8,
            initial_surface_biomass: 0.06,
            max_root_depth: 30.0,
            biomass_depth_decay: 0.1,
            turnover_rate: 1.0,
            ash_fraction: 0.05,
            stem_volume_to_biomass: 0.02,
            aboveground_to_root: 1.0,
        }
    }

    /// Validate all constants and return `self` on success.
    ///
    /// Errors
    /// ------
    /// - Any [`ParamError`] produced by [`ParameterBundle::validate`].
    pub fn validated(self) -> ParamResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Check every constant and the cross-constant invariants.
    ///
    /// Errors
    /// ------
    /// - `ParamError::NonFinite` for any NaN/±∞ constant.
    /// - `ParamError::NonPositive` for `sa`, `bo`, `bi`, `k`, `rd`, `k2`,
    ///   `sv_to_ro`, `wa_to_rl` ≤ 0.
    /// - `ParamError::Negative` for `b` or `ro` < 0.
    /// - `ParamError::ElevationsNotDescending` if `du <= db`.
    /// - `ParamError::FractionOutOfRange` / `FractionsDoNotSum` for the
    ///   `fo`/`fi` and `fc`/`fl` pairs and for `k3`.
    /// - `ParamError::OpenUnitInterval` if `k1 ∉ (0, 1)`.
    /// - `ParamError::InitialDepthBelowRootDepth` if `du - db < rd`.
    pub fn validate(&self) -> ParamResult<()> {
        check_non_negative("b", self.litter_transport)?;
        check_positive("sa", self.surface_area)?;
        let du = check_finite("du", self.initial_top_elevation)?;
        let db = check_finite("db", self.initial_bottom_elevation)?;
        if du <= db {
            return Err(ParamError::ElevationsNotDescending { top: du, bottom: db });
        }
        check_positive("bo", self.organic_bulk_density)?;
        check_positive("bi", self.inorganic_bulk_density)?;
        check_fraction_pair("fo", self.organic_fraction, "fi", self.inorganic_fraction)?;
        check_positive("k", self.labile_decay_rate)?;
        check_fraction_pair("fc", self.refractory_fraction, "fl", self.labile_fraction)?;
        check_non_negative("ro", self.initial_surface_biomass)?;
        let rd = check_positive("rd", self.max_root_depth)?;
        if du - db < rd {
            return Err(ParamError::InitialDepthBelowRootDepth { depth: du - db, root_depth: rd });
        }
        check_open_unit("k1", self.biomass_depth_decay)?;
        check_positive("k2", self.turnover_rate)?;
        check_fraction("k3", self.ash_fraction)?;
        check_positive("sv_to_ro", self.stem_volume_to_biomass)?;
        check_positive("wa_to_rl", self.aboveground_to_root)?;
        Ok(())
    }

    /// Depth of the seed layer, `du - db`.
    pub fn initial_depth(&self) -> f64 {
        self.initial_top_elevation - self.initial_bottom_elevation
    }

    /// Bulk density for a material in g/cm³.
    pub fn bulk_density(&self, material: Material) -> f64 {
        match material {
            Material::Organic => self.organic_bulk_density,
            Material::Inorganic => self.inorganic_bulk_density,
        }
    }

    /// Centimetres of column height occupied by one gram of `material`.
    pub fn weight_to_length(&self, material: Material) -> f64 {
        1.0 / (self.bulk_density(material) * self.surface_area)
    }

    /// Volume in cm³ occupied by `grams` of `material`.
    pub fn grams_to_cubic_cm(&self, grams: f64, material: Material) -> f64 {
        grams / self.bulk_density(material)
    }

    /// Column height in cm occupied by `grams` of `material`.
    pub fn grams_to_cm(&self, grams: f64, material: Material) -> f64 {
        grams * self.weight_to_length(material)
    }

    /// Grams of `material` filling `cm` of column height.
    pub fn cm_to_grams(&self, cm: f64, material: Material) -> f64 {
        cm / self.weight_to_length(material)
    }

    /// Express `value` (given in `from` units) in `to` units.
    pub fn convert(&self, value: f64, from: Measurement, to: Measurement, material: Material) -> f64 {
        match (from, to) {
            (Measurement::Weight, Measurement::Length) => self.grams_to_cm(value, material),
            (Measurement::Length, Measurement::Weight) => self.cm_to_grams(value, material),
            _ => value,
        }
    }

    /// Surface biomass density (g/cm²) implied by a measured stem volume.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::NegativeValue` / `NonFiniteValue` for invalid
    ///   volumes.
    pub fn surface_biomass_from_stem_volume(&self, stem_volume: f64) -> AccretionResult<f64> {
        let stem_volume = validate_non_negative("stem volume", stem_volume)?;
        Ok(stem_volume * self.stem_volume_to_biomass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accretion::errors::AccretionError;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation of the preset and of individual constant violations.
    // - Weight/length conversions for both materials.
    //
    // They intentionally DO NOT cover:
    // - Parsing constants files (see `storage::constants`).
    // -------------------------------------------------------------------------

    #[test]
    fn morris_bowden_preset_is_valid() {
        assert!(ParameterBundle::morris_bowden().validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Each class of constant violation surfaces as its own error variant.
    //
    // Given
    // -----
    // - The preset with one field modified per case.
    //
    // Expect
    // ------
    // - The documented `ParamError` variant for each case.
    fn validate_reports_each_violation() {
        // Arrange
        let base = ParameterBundle::morris_bowden();

        // Act & Assert
        let mut p = base.clone();
        p.organic_bulk_density = 0.0;
        assert_eq!(p.validate(), Err(ParamError::NonPositive { name: "bo", value: 0.0 }));

        let mut p = base.clone();
        p.initial_top_elevation = -40.0;
        assert!(matches!(p.validate(), Err(ParamError::ElevationsNotDescending { .. })));

        let mut p = base.clone();
        p.inorganic_fraction = 0.8;
        assert!(matches!(p.validate(), Err(ParamError::FractionsDoNotSum { first: "fo", .. })));

        let mut p = base.clone();
        p.labile_fraction = 0.5;
        assert!(matches!(p.validate(), Err(ParamError::FractionsDoNotSum { first: "fc", .. })));

        let mut p = base.clone();
        p.biomass_depth_decay = 1.0;
        assert!(matches!(p.validate(), Err(ParamError::OpenUnitInterval { name: "k1", .. })));

        let mut p = base.clone();
        p.ash_fraction = 1.5;
        assert!(matches!(p.validate(), Err(ParamError::FractionOutOfRange { name: "k3", .. })));

        let mut p = base;
        p.initial_surface_biomass = f64::NAN;
        assert!(matches!(p.validate(), Err(ParamError::NonFinite { name: "ro", .. })));
    }

    #[test]
    // Purpose
    // -------
    // A root depth deeper than the seed layer is rejected.
    //
    // Given
    // -----
    // - `rd = du - db + 1`.
    //
    // Expect
    // ------
    // - `ParamError::InitialDepthBelowRootDepth`.
    fn root_depth_deeper_than_seed_layer_is_rejected() {
        // Arrange
        let mut p = ParameterBundle::morris_bowden();
        p.max_root_depth = p.initial_depth() + 1.0;

        // Act
        let err = p.validated().unwrap_err();

        // Assert
        match err {
            ParamError::InitialDepthBelowRootDepth { depth, root_depth } => {
                assert_eq!(depth, 30.0);
                assert_eq!(root_depth, 31.0);
            }
            other => panic!("expected InitialDepthBelowRootDepth, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Conversions use the material's bulk density and the surface area.
    //
    // Given
    // -----
    // - The preset with `sa = 2`.
    //
    // Expect
    // ------
    // - `grams_to_cm(g) = g / (bulk * sa)` and `cm_to_grams` inverts it.
    fn conversions_use_bulk_density_and_surface_area() {
        // Arrange
        let mut p = ParameterBundle::morris_bowden();
        p.surface_area = 2.0;

        // Act
        let organic_cm = p.grams_to_cm(0.17, Material::Organic);
        let mineral_cm = p.grams_to_cm(3.98, Material::Inorganic);

        // Assert
        assert_relative_eq!(organic_cm, 1.0, epsilon = 1e-12);
        assert_relative_eq!(mineral_cm, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.cm_to_grams(organic_cm, Material::Organic), 0.17, epsilon = 1e-12);
        assert_relative_eq!(p.grams_to_cubic_cm(0.17, Material::Organic), 2.0, epsilon = 1e-12);
        assert_eq!(
            p.convert(5.0, Measurement::Length, Measurement::Length, Material::Inorganic),
            5.0
        );
    }

    #[test]
    fn stem_volume_scales_by_ratio() {
        let p = ParameterBundle::morris_bowden();
        assert_relative_eq!(p.surface_biomass_from_stem_volume(3.0).unwrap(), 0.06, epsilon = 1e-12);
        assert!(matches!(
            p.surface_biomass_from_stem_volume(-1.0),
            Err(AccretionError::NegativeValue { .. })
        ));
    }
}
