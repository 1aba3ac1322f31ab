//! marsh_accretion — layered marsh sediment accretion with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the sediment column to Python via the `_marsh_accretion`
//! extension module when the `python-bindings` feature is enabled.
//!
//! Key behaviors
//! -------------
//! - Re-export the model ([`accretion`]) and persistence ([`storage`])
//!   modules as the public crate surface.
//! - Define the `SedimentColumn` `#[pyclass]` and the `#[pymodule]`
//!   initializer, registering the `marsh_accretion.column` submodule so
//!   dot-notation imports work.
//!
//! Invariants & assumptions
//! ------------------------
//! - All model logic lives in [`accretion`]; this file is FFI glue and
//!   error mapping only.
//! - Errors surface to Python as `ValueError` through the `From` impls on
//!   the crate's error types.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on [`accretion::prelude`] and [`storage`] and
//!   ignores the PyO3 items.
//! - The `marsh` binary drives the same API from the command line.

pub mod accretion;
pub mod storage;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::{path::PathBuf, sync::Arc};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::{
    accretion::models::column::SedimentCore,
    storage::snapshot::{self, ColumnSnapshot},
    utils::{extract_bundle, extract_measurement},
};

/// SedimentColumn — Python-facing wrapper for [`SedimentCore`].
///
/// Constructed from Python via
/// `SedimentColumn(config=None, measurement=None)`:
/// - `config`: path to a constants TOML file; the Morris & Bowden preset
///   when `None`.
/// - `measurement`: `"length"` (default) or `"weight"` for the inert pools.
///
/// Notes
/// -----
/// - The constants path is remembered and written into saved snapshots.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "marsh_accretion.column", unsendable)]
pub struct SedimentColumn {
    inner: SedimentCore,
    source: Option<PathBuf>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl SedimentColumn {
    #[new]
    #[pyo3(signature = (config = None, measurement = None))]
    pub fn new(config: Option<&str>, measurement: Option<&str>) -> PyResult<Self> {
        let params = extract_bundle(config)?;
        let measurement = extract_measurement(measurement)?;
        let inner = SedimentCore::new(Arc::new(params), measurement)?;
        Ok(SedimentColumn { inner, source: config.map(PathBuf::from) })
    }

    /// Advance one timestep; returns the new layer count.
    #[pyo3(signature = (biomass_at_surface, deposition, years = 1.0))]
    pub fn step_forward(
        &mut self, biomass_at_surface: f64, deposition: f64, years: f64,
    ) -> PyResult<usize> {
        let outcome = self.inner.step_forward(biomass_at_surface, deposition, years)?;
        Ok(outcome.layer_count)
    }

    #[getter]
    pub fn layer_count(&self) -> usize {
        self.inner.len()
    }

    /// `(top, bottom)` elevations of the column in cm.
    #[getter]
    pub fn elevations(&self) -> (f64, f64) {
        self.inner.elevations()
    }

    #[getter]
    pub fn surface_biomass(&self) -> f64 {
        self.inner.surface_biomass()
    }

    /// Root-zone biomass in the column's measurement units.
    #[getter]
    pub fn total_biomass(&self) -> f64 {
        self.inner.total_biomass()
    }

    /// Layer table as a `(n_layers, 6)` array, oldest layer first.
    pub fn profile<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        self.inner.profile().into_pyarray(py)
    }

    pub fn save(&self, path: &str) -> PyResult<()> {
        Ok(snapshot::save(&self.inner, self.source.clone(), path.as_ref())?)
    }

    #[staticmethod]
    pub fn load(path: &str) -> PyResult<Self> {
        let stored = ColumnSnapshot::read(path.as_ref())?;
        let source = stored.source.clone();
        Ok(SedimentColumn { inner: stored.restore()?, source })
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _marsh_accretion<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let column_mod = PyModule::new(_py, "column")?;
    column_mod.add_class::<SedimentColumn>()?;
    m.add_submodule(&column_mod)?;

    // Register the submodule so `import marsh_accretion.column` works.
    _py.import("sys")?.getattr("modules")?.set_item("marsh_accretion.column", column_mod)?;
    Ok(())
}
