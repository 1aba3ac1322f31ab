//! Python-boundary helpers shared by the PyO3 wrappers in `lib.rs`.
//!
//! Every item is gated on the `python-bindings` feature; native Rust callers
//! use [`crate::storage::constants::load`] and
//! [`Measurement::from_name`](crate::accretion::core::units::Measurement::from_name)
//! directly.
#[cfg(feature = "python-bindings")]
use std::path::Path;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

#[cfg(feature = "python-bindings")]
use crate::{
    accretion::core::{params::ParameterBundle, units::Measurement},
    storage::constants,
};

/// Parse an optional measurement name; `None` selects LENGTH.
#[cfg(feature = "python-bindings")]
pub fn extract_measurement(name: Option<&str>) -> PyResult<Measurement> {
    match name {
        None => Ok(Measurement::default()),
        Some(raw) => Measurement::from_name(raw).ok_or_else(|| {
            PyValueError::new_err(format!("measurement must be 'length' or 'weight'; got {raw:?}"))
        }),
    }
}

/// Load a bundle from an optional constants path; `None` selects the
/// Morris & Bowden preset.
#[cfg(feature = "python-bindings")]
pub fn extract_bundle(config: Option<&str>) -> PyResult<ParameterBundle> {
    match config {
        None => Ok(ParameterBundle::morris_bowden()),
        Some(path) => Ok(constants::load(Path::new(path))?),
    }
}
