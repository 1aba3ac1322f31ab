//! Constants file: TOML layout for a column's parameter bundle.
//!
//! Purpose
//! -------
//! Read the Morris & Bowden constants file and turn it into a validated
//! [`ParameterBundle`]; write a bundle back out in the same layout.
//!
//! Key behaviors
//! -------------
//! - Three tables: `[core]` (`b`, `sa`), `[layer]` (`du`, `db`), and
//!   `[stocks]` (`bo`, `bi`, `fo`, `fi`, `k`, `fc`, `fl`, `ro`, `rd`, `k1`,
//!   `k2`, `k3`, `sv_to_ro`, `wa_to_rl`). Unknown keys are rejected.
//! - `fi` and `fl` are optional and default to `1 - fo` and `1 - fc`; when
//!   present they must still complement their partner.
//! - [`load`] validates before returning, so a bundle from disk is always
//!   safe to hand to a column.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    accretion::{core::params::ParameterBundle, errors::ParamError},
    storage::errors::{StorageError, StorageResult},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantsFile {
    pub core: CoreSection,
    pub layer: LayerSection,
    pub stocks: StocksSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreSection {
    pub b: f64,
    pub sa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSection {
    pub du: f64,
    pub db: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StocksSection {
    pub bo: f64,
    pub bi: f64,
    pub fo: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fi: Option<f64>,
    pub k: f64,
    pub fc: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fl: Option<f64>,
    pub ro: f64,
    pub rd: f64,
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub sv_to_ro: f64,
    pub wa_to_rl: f64,
}

impl ConstantsFile {
    /// Parse TOML text; `origin` is used in error messages.
    pub fn parse(text: &str, origin: &Path) -> StorageResult<Self> {
        toml::from_str(text).map_err(|e| StorageError::Toml {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse a constants file without validating it.
    pub fn read(path: &Path) -> StorageResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StorageError::Io { path: path.to_path_buf(), message: e.to_string() })?;
        Self::parse(&text, path)
    }

    /// Serialize to TOML text.
    pub fn to_toml(&self) -> StorageResult<String> {
        toml::to_string_pretty(self).map_err(|e| StorageError::Toml {
            path: Default::default(),
            message: e.to_string(),
        })
    }

    /// Record a bundle with every fraction written out explicitly.
    pub fn from_bundle(params: &ParameterBundle) -> Self {
        Self {
            core: CoreSection { b: params.litter_transport, sa: params.surface_area },
            layer: LayerSection {
                du: params.initial_top_elevation,
                db: params.initial_bottom_elevation,
            },
            stocks: StocksSection {
                bo: params.organic_bulk_density,
                bi: params.inorganic_bulk_density,
                fo: params.organic_fraction,
                fi: Some(params.inorganic_fraction),
                k: params.labile_decay_rate,
                fc: params.refractory_fraction,
                fl: Some(params.labile_fraction),
                ro: params.initial_surface_biomass,
                rd: params.max_root_depth,
                k1: params.biomass_depth_decay,
                k2: params.turnover_rate,
                k3: params.ash_fraction,
                sv_to_ro: params.stem_volume_to_biomass,
                wa_to_rl: params.aboveground_to_root,
            },
        }
    }
}

impl TryFrom<&ConstantsFile> for ParameterBundle {
    type Error = ParamError;

    fn try_from(file: &ConstantsFile) -> Result<Self, Self::Error> {
        let s = &file.stocks;
        ParameterBundle {
            litter_transport: file.core.b,
            surface_area: file.core.sa,
            initial_top_elevation: file.layer.du,
            initial_bottom_elevation: file.layer.db,
            organic_bulk_density: s.bo,
            inorganic_bulk_density: s.bi,
            organic_fraction: s.fo,
            inorganic_fraction: s.fi.unwrap_or(1.0 - s.fo),
            labile_decay_rate: s.k,
            refractory_fraction: s.fc,
            labile_fraction: s.fl.unwrap_or(1.0 - s.fc),
            initial_surface_biomass: s.ro,
            max_root_depth: s.rd,
            biomass_depth_decay: s.k1,
            turnover_rate: s.k2,
            ash_fraction: s.k3,
            stem_volume_to_biomass: s.sv_to_ro,
            aboveground_to_root: s.wa_to_rl,
        }
        .validated()
    }
}

/// Read, parse, and validate a constants file.
///
/// Errors
/// ------
/// - `StorageError::Io` if the file cannot be read.
/// - `StorageError::Toml` for malformed TOML, missing or unknown keys.
/// - `StorageError::Param` for constants that violate a bundle invariant.
pub fn load(path: &Path) -> StorageResult<ParameterBundle> {
    let file = ConstantsFile::read(path)?;
    Ok(ParameterBundle::try_from(&file)?)
}
