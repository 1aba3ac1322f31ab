//! Integration tests for the marsh sediment column.
//!
//! Purpose
//! -------
//! - Validate the end-to-end column pipeline: constants file → validated
//!   bundle → seed column → repeated steps → snapshot → restored column.
//! - Check the column-level guarantees a driver relies on: one layer per
//!   step, contiguous elevations, surface anchoring, root-zone biomass
//!   bookkeeping, and untouched state after a rejected step.
//!
//! Coverage
//! --------
//! - `storage::constants::load` on the bundled `data/morris_constants.toml`.
//! - `accretion::models::column::SedimentCore`: seeding, `step_forward`,
//!   traversal, totals, and the profile matrix.
//! - `storage::snapshot`: save, load, and continued stepping.
//!
//! Exclusions
//! ----------
//! - Per-function validation of stocks and the distribution engine; those
//!   are covered by unit tests.
//! - The CLI and Python bindings.
use std::{path::Path, sync::Arc};

use approx::assert_relative_eq;
use marsh_accretion::{
    accretion::{
        AccretionError, Measured, Measurement, ParamError, ParameterBundle, SedimentCore,
    },
    storage::{StorageError, constants, snapshot},
};

const CONSTANTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/morris_constants.toml");

/// Seed column built from the bundled constants file.
fn seed_from_file(measurement: Measurement) -> SedimentCore {
    let params = constants::load(Path::new(CONSTANTS)).expect("bundled constants load");
    SedimentCore::new(Arc::new(params), measurement).expect("seed column builds")
}

fn total_stock_amounts(core: &SedimentCore) -> Vec<f64> {
    core.layers()
        .iter()
        .flat_map(|l| {
            let mut v = vec![l.biomass().amount()];
            v.extend(l.inert().active().iter().map(|s| s.amount()));
            v.extend(l.inert().exported().iter().map(|s| s.amount()));
            v
        })
        .collect()
}

#[test]
// Purpose
// -------
// The bundled constants seed a single layer spanning (du, db).
//
// Given
// -----
// - `data/morris_constants.toml` with du = 0, db = -30, rd = 30.
//
// Expect
// ------
// - One layer with elevations (0, -30) and surface biomass `ro`.
fn seed_column_from_constants_file() {
    // Arrange / Act
    let core = seed_from_file(Measurement::Length);

    // Assert
    assert_eq!(core.len(), 1);
    let (top, bottom) = core.layers()[0].elevations();
    assert_relative_eq!(top, 0.0, epsilon = 1e-9);
    assert_eq!(bottom, -30.0);
    assert_eq!(core.surface_biomass(), core.params().initial_surface_biomass);
}

#[test]
// Purpose
// -------
// A root depth deeper than the seed layer is a construction error.
//
// Given
// -----
// - The bundled constants with `rd = du - db + 1`.
//
// Expect
// ------
// - `AccretionError::Param(InitialDepthBelowRootDepth)`.
fn seed_with_root_depth_beyond_initial_depth_fails() {
    // Arrange
    let mut params = constants::load(Path::new(CONSTANTS)).unwrap();
    params.max_root_depth = params.initial_depth() + 1.0;

    // Act
    let result = SedimentCore::new(Arc::new(params), Measurement::Length);

    // Assert
    match result {
        Err(AccretionError::Param(ParamError::InitialDepthBelowRootDepth { depth, root_depth })) => {
            assert_eq!(depth, 30.0);
            assert_eq!(root_depth, 31.0);
        }
        other => panic!("expected InitialDepthBelowRootDepth, got {other:?}"),
    }
}

#[test]
// Purpose
// -------
// Two unit steps grow the column to three contiguous layers, the newest
// spanning exactly the deposition on top of the prior surface.
//
// Given
// -----
// - A seed column; two steps with deposition 2, biomass 1, years 1.
//
// Expect
// ------
// - 3 layers; newest = [prior surface, prior surface + 2]; every top meets
//   the next bottom; the base stays at db.
fn two_steps_grow_column_by_two_layers() {
    // Arrange
    let mut core = seed_from_file(Measurement::Length);

    // Act
    core.step_forward(1.0, 2.0, 1.0).unwrap();
    core.step_forward(1.0, 2.0, 1.0).unwrap();

    // Assert
    assert_eq!(core.len(), 3);
    let prior_surface = core.layers()[1].elevations().0;
    let (newest_top, newest_bottom) = core.layers()[2].elevations();
    assert_relative_eq!(newest_bottom, prior_surface, epsilon = 1e-9);
    assert_relative_eq!(newest_top, prior_surface + 2.0, epsilon = 1e-9);
    for pair in core.layers().windows(2) {
        assert_relative_eq!(pair[0].elevations().0, pair[1].elevations().1, epsilon = 1e-9);
    }
    assert_eq!(core.elevations().1, -30.0);
    assert_relative_eq!(core.layers()[0].top_depth(), 4.0, epsilon = 1e-12);
}

#[test]
// Purpose
// -------
// Rejected steps leave layer count and every stock amount unchanged.
//
// Given
// -----
// - A column stepped three times; then erosion (deposition -1), a negative
//   biomass, and zero years.
//
// Expect
// ------
// - `ErosionUnsupported`, `NegativeValue`, `NonPositiveValue`; identical
//   stock amounts before and after.
fn rejected_steps_leave_stocks_untouched() {
    // Arrange
    let mut core = seed_from_file(Measurement::Weight);
    for _ in 0..3 {
        core.step_forward(0.3, 0.8, 1.0).unwrap();
    }
    let count = core.len();
    let amounts = total_stock_amounts(&core);

    // Act
    let erosion = core.step_forward(0.3, -1.0, 1.0);
    let negative = core.step_forward(-0.3, 0.8, 1.0);
    let no_time = core.step_forward(0.3, 0.8, 0.0);

    // Assert
    assert_eq!(erosion, Err(AccretionError::ErosionUnsupported { deposition: -1.0 }));
    assert!(matches!(negative, Err(AccretionError::NegativeValue { .. })));
    assert!(matches!(no_time, Err(AccretionError::NonPositiveValue { .. })));
    assert_eq!(core.len(), count);
    assert_eq!(total_stock_amounts(&core), amounts);
}

#[test]
// Purpose
// -------
// Decomposed labile matter and ash uptake leave the active pools and are
// tracked as exported material; buried layers lose their roots.
//
// Given
// -----
// - A seed column stepped 25 times with deposition 1.5 and biomass 0.05.
//
// Expect
// ------
// - Every layer below the root zone holds zero biomass; root-zone biomass
//   equals the sum over layers with top depth < rd; exports are positive.
fn long_run_buries_roots_and_exports_decay() {
    // Arrange
    let mut core = seed_from_file(Measurement::Length);
    let rd = core.params().max_root_depth;

    // Act
    for _ in 0..25 {
        core.step_forward(0.05, 1.5, 1.0).unwrap();
    }

    // Assert
    assert_eq!(core.len(), 26);
    let buried: Vec<_> = core.iter_top_down().filter(|s| s.top_depth >= rd).collect();
    assert!(!buried.is_empty());
    assert!(buried.iter().all(|s| s.biomass.weight == 0.0));
    let root_zone: f64 =
        core.iter_top_down().filter(|s| s.top_depth < rd).map(|s| s.biomass.length).sum();
    assert_relative_eq!(core.total_biomass(), root_zone, epsilon = 1e-12);
    assert!(core.summaries().iter().all(|s| s.exported.weight >= 0.0));
    assert!(core.summaries()[0].exported.weight > 0.0);

    let profile = core.profile();
    assert_eq!(profile.nrows(), 26);
    assert_relative_eq!(profile[[25, 0]], core.elevations().0, epsilon = 1e-9);
}

#[test]
// Purpose
// -------
// A saved column restores exactly and keeps stepping like the original.
//
// Given
// -----
// - A WEIGHT column stepped twice and saved to a temp directory.
//
// Expect
// ------
// - The loaded column equals the original before and after one more step.
fn snapshot_round_trip_continues_identically() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("column.json");
    let mut original = seed_from_file(Measurement::Weight);
    original.step_forward(0.2, 0.5, 1.0).unwrap();
    original.step_forward(0.25, 0.7, 1.0).unwrap();

    // Act
    snapshot::save(&original, Some(CONSTANTS.into()), &path).unwrap();
    let mut restored = snapshot::load(&path).unwrap();

    // Assert
    assert_eq!(restored, original);
    let a = original.step_forward(0.3, 0.6, 0.5).unwrap();
    let b = restored.step_forward(0.3, 0.6, 0.5).unwrap();
    assert_eq!(a, b);
    assert_eq!(restored, original);
}

#[test]
fn invalid_constants_file_surfaces_param_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    let text = std::fs::read_to_string(CONSTANTS).unwrap().replace("k1 = 0.1", "k1 = 1.5");
    std::fs::write(&path, text).unwrap();

    match constants::load(&path) {
        Err(StorageError::Param(ParamError::OpenUnitInterval { name, value })) => {
            assert_eq!(name, "k1");
            assert_eq!(value, 1.5);
        }
        other => panic!("expected OpenUnitInterval for k1, got {other:?}"),
    }
    assert!(ParameterBundle::morris_bowden().validate().is_ok());
}
